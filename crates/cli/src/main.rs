//! tempus CLI - Temporally filtered corpus packaging

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tempus_core::Config;

mod commands;
mod logging;

use commands::{
  PackageOptions, cmd_classify, cmd_config_init, cmd_config_show, cmd_estimate, cmd_lexicon, cmd_package,
};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "tempus")]
#[command(about = "Filter historical text for temporal contamination and package it into training shards")]
#[command(after_help = "\
QUICK START:
  tempus package --input books.jsonl --output-dir out --cutoff 1913
  tempus classify --cutoff 1913 \"Hitler invaded Poland in 1939.\"
  tempus estimate out/manifest_1913.json

CUTOFF PRESETS:
  1850  Pre-industrial/early Victorian
  1900  Victorian/pre-Edwardian
  1913  Pre-WWI
  1950  Pre-Cold War")]
struct Cli {
  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

/// Subcommands for `tempus config`
#[derive(Subcommand)]
pub enum ConfigCommand {
  /// Show current effective configuration
  #[command(long_about = "Show the current effective configuration.\n\n\
    Displays which config file is being used and its contents as TOML.")]
  Show,

  /// Write a default ./tempus.toml
  Init {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
  },
}

#[derive(Subcommand)]
enum Commands {
  /// Filter, deduplicate, shuffle and shard source records
  #[command(after_help = "\
OUTPUT:
  shard_NNNNN_<cutoff>.jsonl    one {\"text\": ...} object per line
  contamination_<cutoff>.jsonl  dropped documents with reasons
  manifest_<cutoff>.json        written last; present only for complete runs

Exits non-zero when no document survives filtering.")]
  Package {
    /// JSONL input files (one record per line)
    #[arg(short, long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,
    /// Directory for shards and manifest
    #[arg(short, long)]
    output_dir: PathBuf,
    /// Latest year allowed in retained text
    #[arg(short, long)]
    cutoff: Option<i32>,
    /// Character budget per shard
    #[arg(long)]
    chars_per_shard: Option<usize>,
    /// Shuffle seed
    #[arg(long)]
    seed: Option<u64>,
    /// Skip records shorter than this many characters
    #[arg(long)]
    min_chars: Option<usize>,
    /// Also drop near-duplicates
    #[arg(long)]
    near_duplicates: bool,
    /// Keep Project Gutenberg license headers
    #[arg(long)]
    no_clean_headers: bool,
  },
  /// Check a single text for contamination
  Classify {
    /// Latest year allowed in the text
    #[arg(short, long)]
    cutoff: i32,
    /// Text to check (reads stdin when neither TEXT nor --file is given)
    text: Option<String>,
    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// List lexicon entries
  Lexicon {
    /// Only entries that fire for this cutoff
    #[arg(short, long)]
    cutoff: Option<i32>,
  },
  /// Estimate training capacity from a manifest
  Estimate {
    /// Path to manifest_<cutoff>.json
    manifest: PathBuf,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Manage configuration
  #[command(after_help = "\
CONFIG LOCATIONS:
  Working dir: ./tempus.toml
  User:        ~/.config/tempus/config.toml")]
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
  let config = Config::load_for_dir(&cwd).context("Failed to load configuration")?;

  let _guard = init_logging(&config.logging, cli.verbose);

  match cli.command {
    Commands::Package {
      inputs,
      output_dir,
      cutoff,
      chars_per_shard,
      seed,
      min_chars,
      near_duplicates,
      no_clean_headers,
    } => {
      let mut config = config;
      if let Some(cutoff) = cutoff {
        config.packaging.cutoff_year = cutoff;
      }
      if let Some(chars) = chars_per_shard {
        config.packaging.chars_per_shard = chars;
      }
      if let Some(seed) = seed {
        config.packaging.shuffle_seed = seed;
      }
      if let Some(min_chars) = min_chars {
        config.loader.min_chars = min_chars;
      }
      if near_duplicates {
        config.dedup.near_duplicates = true;
      }
      if no_clean_headers {
        config.loader.clean_headers = false;
      }
      config.validate().context("Invalid configuration")?;

      cmd_package(PackageOptions {
        inputs,
        output_dir,
        config,
      })
      .await
    }
    Commands::Classify {
      cutoff,
      text,
      file,
      json,
    } => cmd_classify(&config, cutoff, text, file, json).await,
    Commands::Lexicon { cutoff } => cmd_lexicon(cutoff),
    Commands::Estimate { manifest, json } => cmd_estimate(&manifest, json),
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(&cwd, &config),
      ConfigCommand::Init { force } => cmd_config_init(&cwd, force),
    },
  }
}
