//! Single-text contamination check

use anyhow::{Context, Result};
use filter::{ContaminationDetector, Lexicon};
use std::path::PathBuf;
use tempus_core::{Config, validate_cutoff_year};
use tokio::io::AsyncReadExt;

async fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
  if let Some(text) = text {
    return Ok(text);
  }
  if let Some(path) = file {
    return tokio::fs::read_to_string(&path)
      .await
      .with_context(|| format!("Failed to read {}", path.display()));
  }
  let mut buf = String::new();
  tokio::io::stdin()
    .read_to_string(&mut buf)
    .await
    .context("Failed to read stdin")?;
  Ok(buf)
}

pub async fn cmd_classify(
  config: &Config,
  cutoff: i32,
  text: Option<String>,
  file: Option<PathBuf>,
  json: bool,
) -> Result<()> {
  validate_cutoff_year(cutoff)?;
  let text = read_input(text, file).await?;

  let detector = ContaminationDetector::new(&Lexicon::standard(), config.detector.clone())
    .context("Failed to build contamination detector")?;
  let result = detector.classify_text(&text, cutoff);

  if json {
    println!("{}", serde_json::to_string_pretty(&result)?);
    return Ok(());
  }

  if result.is_contaminated {
    println!("CONTAMINATED for cutoff {}", cutoff);
  } else {
    println!("clean for cutoff {}", cutoff);
  }

  if !result.reasons.is_empty() {
    println!("\nReasons:");
    for reason in &result.reasons {
      println!("  - {}", reason);
    }
  }
  if !result.matched_terms.is_empty() {
    let terms: Vec<&str> = result.matched_terms.iter().map(String::as_str).collect();
    println!("\nMatched terms: {}", terms.join(", "));
  }
  if !result.matched_years.is_empty() {
    let years: Vec<String> = result.matched_years.iter().map(i32::to_string).collect();
    println!("Matched years: {}", years.join(", "));
  }

  Ok(())
}
