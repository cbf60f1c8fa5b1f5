//! Pipeline driver: load, filter, shard, write

use super::estimate::print_estimate;
use anyhow::{Context, Result, bail};
use filter::{ContaminationDetector, Lexicon};
use shard::{Loader, Packager, RetryPolicy, ShardWriter};
use std::path::PathBuf;
use std::time::Instant;
use tempus_core::{Config, estimate_capacity, preset_for};
use tracing::info;

pub struct PackageOptions {
  pub inputs: Vec<PathBuf>,
  pub output_dir: PathBuf,
  /// Effective configuration, flags already applied
  pub config: Config,
}

pub async fn cmd_package(options: PackageOptions) -> Result<()> {
  let PackageOptions {
    inputs,
    output_dir,
    config,
  } = options;
  let started = Instant::now();
  let cutoff_year = config.packaging.cutoff_year;
  let retry = RetryPolicy::from(&config.retry);

  match preset_for(cutoff_year) {
    Some(preset) => info!(cutoff_year, preset = preset.description, "Packaging"),
    None => info!(cutoff_year, "Packaging"),
  }

  let report = Loader::new(config.loader.clone(), retry.clone())
    .load(&inputs)
    .await
    .context("Failed to load input")?;
  let loaded = report.documents.len();
  let skipped = report.skipped;

  let detector = ContaminationDetector::new(&Lexicon::standard(), config.detector.clone())
    .context("Failed to build contamination detector")?;
  let packaging = config.packaging.clone();
  let dedup = config.dedup.clone();

  // Filtering and sharding are CPU-bound
  let packaged = tokio::task::spawn_blocking(move || {
    Packager::new(&detector, &dedup).package(
      report.documents,
      packaging.cutoff_year,
      packaging.chars_per_shard,
      packaging.shuffle_seed,
    )
  })
  .await
  .context("Packaging task failed")?
  .context("Packaging failed")?;

  let written = ShardWriter::new(&output_dir, retry)
    .write(&packaged)
    .await
    .context("Failed to write output")?;

  let manifest = &packaged.manifest;
  println!("Packaged corpus for cutoff {}", cutoff_year);
  println!("================================\n");
  println!("Loaded:         {} documents", loaded);
  if skipped.total() > 0 {
    println!(
      "Skipped:        {} records ({} invalid UTF-8, {} malformed, {} missing id, {} missing text, {} too short)",
      skipped.total(),
      skipped.invalid_utf8,
      skipped.malformed_json,
      skipped.missing_id,
      skipped.missing_text,
      skipped.too_short
    );
  }
  println!("Duplicates:     {} dropped", manifest.documents_dropped_duplicate);
  println!("Contaminated:   {} dropped", manifest.documents_dropped_contaminated);
  println!("Kept:           {} documents", manifest.total_documents);
  println!("Characters:     {}", manifest.total_characters);
  println!("Shards:         {}", manifest.shard_count);
  for (source, count) in &manifest.source_distribution {
    println!("                - {}: {}", source, count);
  }
  println!("Manifest:       {}", written.manifest.display());
  println!("Elapsed:        {:.1}s", started.elapsed().as_secs_f64());

  if manifest.is_empty() {
    bail!(
      "No documents survived filtering for cutoff {}; wrote empty manifest {}",
      cutoff_year,
      written.manifest.display()
    );
  }

  let mut reasons: Vec<(&String, &usize)> = packaged.audit.reason_counts.iter().collect();
  reasons.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
  if !reasons.is_empty() {
    println!("\nTop contamination reasons:");
    for (reason, count) in reasons.iter().take(5) {
      println!("  {:>6}  {}", count, reason);
    }
  }

  println!("\nTraining capacity:");
  print_estimate(&estimate_capacity(manifest.total_characters as u64));

  Ok(())
}
