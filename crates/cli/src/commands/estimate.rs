//! Training capacity estimate for a packaged run

use anyhow::{Context, Result};
use std::path::Path;
use tempus_core::{CapacityEstimate, Manifest, estimate_capacity};

fn format_count(n: u64) -> String {
  match n {
    n if n >= 1_000_000_000 => format!("{:.2}B", n as f64 / 1e9),
    n if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1e6),
    n if n >= 1_000 => format!("{:.1}K", n as f64 / 1e3),
    n => n.to_string(),
  }
}

pub fn print_estimate(estimate: &CapacityEstimate) {
  println!("Tokens:         ~{}", format_count(estimate.total_tokens));
  println!("Optimal params: ~{}", format_count(estimate.optimal_params));
  match (estimate.recommended_depth, estimate.training_hours_8xh100) {
    (Some(depth), Some(hours)) => {
      println!("Model depth:    d{}", depth);
      println!("Training time:  ~{:.1} hours on 8xH100", hours);
    }
    _ => println!("Model depth:    corpus too small for the smallest depth (d20)"),
  }
}

pub fn cmd_estimate(manifest_path: &Path, json: bool) -> Result<()> {
  let manifest =
    Manifest::load(manifest_path).with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
  let estimate = estimate_capacity(manifest.total_characters as u64);

  if json {
    println!("{}", serde_json::to_string_pretty(&estimate)?);
    return Ok(());
  }

  println!("Capacity estimate for cutoff {}", manifest.cutoff_year);
  println!("================================\n");
  println!("Characters:     {}", format_count(manifest.total_characters as u64));
  print_estimate(&estimate);

  Ok(())
}
