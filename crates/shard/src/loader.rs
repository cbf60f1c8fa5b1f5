//! JSONL source record intake.
//!
//! Each line is one JSON object with at least `id` and `text`. Bad records are
//! skipped and counted; only an unreadable input path stops the run.

use crate::retry::RetryPolicy;
use filter::strip_gutenberg_boilerplate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempus_core::{Document, LoaderConfig, Result, Source, ValidationError};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Fields probed in order for the publication year
const YEAR_FIELDS: &[&str] = &["published_year", "year", "estimated_year"];

const RESERVED_FIELDS: &[&str] = &["id", "text", "source"];

/// A single record that could not become a [`Document`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
  #[error("line {line}: invalid UTF-8")]
  InvalidUtf8 { line: usize },

  #[error("line {line}: malformed JSON: {message}")]
  MalformedJson { line: usize, message: String },

  #[error("line {line}: missing id")]
  MissingId { line: usize },

  #[error("line {line}: missing text")]
  MissingText { line: usize },
}

/// Per-kind counts of skipped records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordStats {
  pub invalid_utf8: usize,
  pub malformed_json: usize,
  pub missing_id: usize,
  pub missing_text: usize,
  pub too_short: usize,
}

impl RecordStats {
  pub fn record(&mut self, error: &RecordError) {
    match error {
      RecordError::InvalidUtf8 { .. } => self.invalid_utf8 += 1,
      RecordError::MalformedJson { .. } => self.malformed_json += 1,
      RecordError::MissingId { .. } => self.missing_id += 1,
      RecordError::MissingText { .. } => self.missing_text += 1,
    }
  }

  pub fn total(&self) -> usize {
    self.invalid_utf8 + self.malformed_json + self.missing_id + self.missing_text + self.too_short
  }

  fn merge(&mut self, other: &RecordStats) {
    self.invalid_utf8 += other.invalid_utf8;
    self.malformed_json += other.malformed_json;
    self.missing_id += other.missing_id;
    self.missing_text += other.missing_text;
    self.too_short += other.too_short;
  }
}

#[derive(Debug, Default)]
pub struct LoadReport {
  /// Documents in file order, then line order
  pub documents: Vec<Document>,
  pub skipped: RecordStats,
}

/// Turn one JSONL line into a document
pub fn parse_record(line: usize, raw: &str) -> std::result::Result<Document, RecordError> {
  let fields: Map<String, Value> = serde_json::from_str(raw).map_err(|e| RecordError::MalformedJson {
    line,
    message: e.to_string(),
  })?;

  let id = match fields.get("id") {
    Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
    Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
    _ => return Err(RecordError::MissingId { line }),
  };

  let text = match fields.get("text") {
    Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
    _ => return Err(RecordError::MissingText { line }),
  };

  let source = match fields.get("source") {
    Some(Value::String(s)) if !s.trim().is_empty() => Source::from(s.as_str()),
    _ => Source::Other("unknown".to_string()),
  };

  let published_year = YEAR_FIELDS
    .iter()
    .filter_map(|key| fields.get(*key)?.as_i64())
    .find_map(|year| i32::try_from(year).ok());

  let metadata: BTreeMap<String, String> = fields
    .iter()
    .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()) && !YEAR_FIELDS.contains(&key.as_str()))
    .filter_map(|(key, value)| {
      let value = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
      };
      Some((key.clone(), value))
    })
    .collect();

  let mut document = Document::new(id, text, source).with_published_year(published_year);
  document.metadata = metadata;
  Ok(document)
}

/// Reads source records from JSONL files
pub struct Loader {
  config: LoaderConfig,
  retry: RetryPolicy,
}

impl Loader {
  pub fn new(config: LoaderConfig, retry: RetryPolicy) -> Self {
    Self { config, retry }
  }

  /// Load every path in order. Missing or unreadable paths are fatal.
  pub async fn load(&self, paths: &[PathBuf]) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for path in paths {
      let before = report.documents.len();
      let stats = self.load_file(path, &mut report.documents).await?;
      report.skipped.merge(&stats);

      info!(
        path = %path.display(),
        loaded = report.documents.len() - before,
        skipped = stats.total(),
        "Loaded source file"
      );
      if stats.total() > 0 {
        warn!(
          path = %path.display(),
          invalid_utf8 = stats.invalid_utf8,
          malformed_json = stats.malformed_json,
          missing_id = stats.missing_id,
          missing_text = stats.missing_text,
          too_short = stats.too_short,
          "Skipped records"
        );
      }
    }

    Ok(report)
  }

  async fn load_file(&self, path: &Path, out: &mut Vec<Document>) -> Result<RecordStats> {
    let unreadable = |e: &dyn std::fmt::Display| ValidationError::unreadable(path.display(), e);

    let file = self
      .retry
      .run(&path.display().to_string(), || tokio::fs::File::open(path))
      .await
      .map_err(|failure| unreadable(&failure.error))?;

    // Split on raw bytes so one undecodable record does not end the file
    let mut lines = BufReader::new(file).split(b'\n');
    let mut stats = RecordStats::default();
    let mut line_no = 0;

    while let Some(bytes) = lines.next_segment().await.map_err(|e| unreadable(&e))? {
      line_no += 1;
      let parsed = match std::str::from_utf8(&bytes) {
        Ok(line) if line.trim().is_empty() => continue,
        Ok(line) => parse_record(line_no, line),
        Err(_) => Err(RecordError::InvalidUtf8 { line: line_no }),
      };

      match parsed {
        Ok(document) => {
          let document = self.prepare(document);
          if document.char_count() < self.config.min_chars {
            debug!(id = %document.id, "Skipping short record");
            stats.too_short += 1;
            continue;
          }
          out.push(document);
        }
        Err(e) => {
          debug!(path = %path.display(), "{}", e);
          stats.record(&e);
        }
      }
    }

    Ok(stats)
  }

  fn prepare(&self, document: Document) -> Document {
    if self.config.clean_headers && document.source == Source::Gutenberg {
      let text = strip_gutenberg_boilerplate(&document.text);
      Document { text, ..document }
    } else {
      document
    }
  }
}

/// Load with default retry settings
pub async fn load_documents(paths: &[PathBuf], config: &LoaderConfig) -> Result<LoadReport> {
  Loader::new(config.clone(), RetryPolicy::default()).load(paths).await
}
