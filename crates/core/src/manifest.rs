//! Summary record of a completed packaging run.
//!
//! The manifest is written after every shard file of the run is durable, so
//! its presence on disk is the signal that the run completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Shard file name: zero-padded index plus cutoff year
pub fn shard_file_name(index: usize, cutoff_year: i32) -> String {
  format!("shard_{:05}_{}.jsonl", index, cutoff_year)
}

pub fn manifest_file_name(cutoff_year: i32) -> String {
  format!("manifest_{}.json", cutoff_year)
}

/// Side-channel log of documents dropped as contaminated
pub fn audit_file_name(cutoff_year: i32) -> String {
  format!("contamination_{}.jsonl", cutoff_year)
}

/// Per-shard line in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardSummary {
  pub index: usize,
  pub file: String,
  pub documents: usize,
  pub characters: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  pub cutoff_year: i32,
  pub shard_count: usize,
  pub total_documents: usize,
  pub total_characters: usize,
  pub documents_dropped_contaminated: usize,
  pub documents_dropped_duplicate: usize,
  pub source_distribution: BTreeMap<String, usize>,
  pub shuffle_seed: u64,

  pub target_chars_per_shard: usize,
  pub lexicon_version: u32,
  #[serde(default)]
  pub shards: Vec<ShardSummary>,
  pub created_at: DateTime<Utc>,
}

impl Manifest {
  /// True when the run completed but no document survived filtering
  pub fn is_empty(&self) -> bool {
    self.total_documents == 0
  }

  pub fn load(path: &Path) -> crate::Result<Self> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
  }
}
