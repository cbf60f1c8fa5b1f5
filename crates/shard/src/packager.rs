//! Filtering, shuffling and greedy sharding of a document collection.
//!
//! Output depends only on the input set, the cutoff, the shard budget and the
//! seed. Arrival order and thread scheduling never leak into it.

use chrono::Utc;
use filter::{ContaminationDetector, Deduplicator};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tempus_core::{
  DedupConfig, Document, Manifest, Result, ShardSummary, Source, shard_file_name, validate_chars_per_shard,
  validate_cutoff_year, validate_shard_fits,
};
use tracing::{debug, info};

/// One output shard
#[derive(Debug, Clone, PartialEq)]
pub struct Shard {
  pub index: usize,
  pub documents: Vec<Document>,
  pub char_count: usize,
}

impl Shard {
  pub fn summary(&self, cutoff_year: i32) -> ShardSummary {
    ShardSummary {
      index: self.index,
      file: shard_file_name(self.index, cutoff_year),
      documents: self.documents.len(),
      characters: self.char_count,
    }
  }
}

/// A document removed by the contamination detector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedDocument {
  pub id: String,
  pub source: Source,
  pub reasons: Vec<String>,
}

/// Why documents were dropped as contaminated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContaminationAudit {
  /// In input order
  pub dropped: Vec<DroppedDocument>,
  /// How many dropped documents carried each reason
  pub reason_counts: BTreeMap<String, usize>,
}

impl ContaminationAudit {
  fn record(&mut self, document: Document, reasons: Vec<String>) {
    for reason in &reasons {
      *self.reason_counts.entry(reason.clone()).or_default() += 1;
    }
    self.dropped.push(DroppedDocument {
      id: document.id,
      source: document.source,
      reasons,
    });
  }
}

#[derive(Debug, Clone)]
pub struct Packaged {
  pub shards: Vec<Shard>,
  pub manifest: Manifest,
  pub audit: ContaminationAudit,
}

/// Shuffle key: first 8 bytes of SHA-256(seed little-endian ‖ id)
pub fn shuffle_key(seed: u64, id: &str) -> u64 {
  let mut hasher = Sha256::new();
  hasher.update(seed.to_le_bytes());
  hasher.update(id.as_bytes());
  let digest = hasher.finalize();
  let mut prefix = [0u8; 8];
  prefix.copy_from_slice(&digest[..8]);
  u64::from_be_bytes(prefix)
}

/// Greedy accumulation: a shard closes when the next document would push it
/// past `target`. A document larger than `target` gets a shard of its own.
fn accumulate(documents: Vec<Document>, target: usize) -> Vec<Shard> {
  let mut shards = Vec::new();
  let mut current = Vec::new();
  let mut current_chars = 0;

  for document in documents {
    let chars = document.char_count();
    if !current.is_empty() && current_chars + chars > target {
      shards.push(Shard {
        index: shards.len(),
        documents: std::mem::take(&mut current),
        char_count: current_chars,
      });
      current_chars = 0;
    }
    current_chars += chars;
    current.push(document);
  }

  if !current.is_empty() {
    shards.push(Shard {
      index: shards.len(),
      documents: current,
      char_count: current_chars,
    });
  }

  shards
}

pub struct Packager<'a> {
  detector: &'a ContaminationDetector,
  deduplicator: Deduplicator,
}

impl<'a> Packager<'a> {
  pub fn new(detector: &'a ContaminationDetector, dedup: &DedupConfig) -> Self {
    Self {
      detector,
      deduplicator: Deduplicator::new(dedup),
    }
  }

  pub fn package(
    &self,
    documents: Vec<Document>,
    cutoff_year: i32,
    target_chars_per_shard: usize,
    seed: u64,
  ) -> Result<Packaged> {
    validate_cutoff_year(cutoff_year)?;
    validate_chars_per_shard(target_chars_per_shard)?;

    let input = documents.len();
    let deduped = self.deduplicator.dedupe(documents);
    debug!(input, kept = deduped.kept.len(), dropped = deduped.dropped, "Deduplicated");

    let classified: Vec<(Document, Vec<String>)> = deduped
      .kept
      .into_par_iter()
      .map(|document| {
        let result = self.detector.classify(&document, cutoff_year);
        (document, result.reasons)
      })
      .collect();

    let mut audit = ContaminationAudit::default();
    let mut survivors = Vec::with_capacity(classified.len());
    for (document, reasons) in classified {
      if reasons.is_empty() {
        survivors.push(document);
      } else {
        audit.record(document, reasons);
      }
    }

    survivors.sort_by_cached_key(|d| (shuffle_key(seed, &d.id), d.id.clone()));

    if let Some(smallest) = survivors.iter().map(Document::char_count).min() {
      validate_shard_fits(target_chars_per_shard, smallest)?;
    }

    let mut source_distribution = BTreeMap::new();
    for document in &survivors {
      *source_distribution.entry(document.source.to_string()).or_default() += 1;
    }
    let total_documents = survivors.len();

    let shards = accumulate(survivors, target_chars_per_shard);

    let manifest = Manifest {
      cutoff_year,
      shard_count: shards.len(),
      total_documents,
      total_characters: shards.iter().map(|s| s.char_count).sum(),
      documents_dropped_contaminated: audit.dropped.len(),
      documents_dropped_duplicate: deduped.dropped,
      source_distribution,
      shuffle_seed: seed,
      target_chars_per_shard,
      lexicon_version: self.detector.lexicon_version(),
      shards: shards.iter().map(|s| s.summary(cutoff_year)).collect(),
      created_at: Utc::now(),
    };

    info!(
      cutoff_year,
      shards = manifest.shard_count,
      documents = manifest.total_documents,
      characters = manifest.total_characters,
      contaminated = manifest.documents_dropped_contaminated,
      duplicates = manifest.documents_dropped_duplicate,
      "Packaged corpus"
    );

    Ok(Packaged { shards, manifest, audit })
  }
}

/// Package with exact-duplicate removal only
pub fn package(
  documents: Vec<Document>,
  cutoff_year: i32,
  target_chars_per_shard: usize,
  seed: u64,
  detector: &ContaminationDetector,
) -> Result<Packaged> {
  Packager::new(detector, &DedupConfig::default()).package(documents, cutoff_year, target_chars_per_shard, seed)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use tempus_core::Error;

  fn doc(id: &str, chars: usize) -> Document {
    Document::new(id, "a".repeat(chars), Source::Gutenberg)
  }

  #[test]
  fn test_shuffle_key_depends_on_seed_and_id() {
    assert_eq!(shuffle_key(42, "a"), shuffle_key(42, "a"));
    assert_ne!(shuffle_key(42, "a"), shuffle_key(43, "a"));
    assert_ne!(shuffle_key(42, "a"), shuffle_key(42, "b"));
  }

  #[test]
  fn test_accumulate_closes_before_overflow() {
    let docs = vec![doc("a", 150), doc("b", 150), doc("c", 150), doc("d", 50)];
    let shards = accumulate(docs, 300);
    let sizes: Vec<usize> = shards.iter().map(|s| s.char_count).collect();
    assert_eq!(sizes, vec![300, 200]);
    assert_eq!(shards[1].index, 1);
  }

  #[test]
  fn test_oversized_document_gets_own_shard() {
    let docs = vec![doc("a", 50), doc("big", 500), doc("c", 50)];
    let shards = accumulate(docs, 100);
    let sizes: Vec<usize> = shards.iter().map(|s| s.char_count).collect();
    assert_eq!(sizes, vec![50, 500, 50]);
  }

  #[test]
  fn test_invalid_arguments_are_rejected() {
    let detector = ContaminationDetector::standard().unwrap();
    let err = package(vec![doc("a", 10)], 1913, 0, 42, &detector).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = package(vec![doc("a", 10)], 3000, 100, 42, &detector).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = package(vec![doc("a", 10), doc("b", 20)], 1913, 5, 42, &detector).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn test_audit_records_reasons() {
    let detector = ContaminationDetector::standard().unwrap();
    let docs = vec![
      Document::new("clean", "The trial concluded in 1805 before the assizes.", Source::Oldbailey),
      Document::new("bad", "Hitler invaded Poland in 1939.", Source::Caselaw),
    ];
    let packaged = package(docs, 1913, 1000, 42, &detector).unwrap();
    assert_eq!(packaged.manifest.documents_dropped_contaminated, 1);
    assert_eq!(packaged.audit.dropped.len(), 1);
    assert_eq!(packaged.audit.dropped[0].id, "bad");
    assert_eq!(packaged.audit.dropped[0].source, Source::Caselaw);
    assert!(!packaged.audit.reason_counts.is_empty());
    assert_eq!(
      packaged.manifest.source_distribution,
      BTreeMap::from([("oldbailey".to_string(), 1)])
    );
  }
}
