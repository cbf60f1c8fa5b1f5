use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Archive a document was collected from
///
/// Declaration order is the deduplication priority: when two sources carry the
/// same text, the earlier variant keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
  /// Project Gutenberg books
  Gutenberg,
  /// Old Bailey court proceedings
  Oldbailey,
  /// Chronicling America newspaper OCR
  ChroniclingAmerica,
  /// Caselaw Access Project decisions
  Caselaw,
  /// Any other collaborator, by name
  Other(String),
}

impl Source {
  pub fn as_str(&self) -> &str {
    match self {
      Source::Gutenberg => "gutenberg",
      Source::Oldbailey => "oldbailey",
      Source::ChroniclingAmerica => "chronicling_america",
      Source::Caselaw => "caselaw",
      Source::Other(name) => name,
    }
  }

  /// Lower wins when duplicates collide
  pub fn priority(&self) -> u8 {
    match self {
      Source::Gutenberg => 0,
      Source::Oldbailey => 1,
      Source::ChroniclingAmerica => 2,
      Source::Caselaw => 3,
      Source::Other(_) => 4,
    }
  }
}

impl From<&str> for Source {
  fn from(s: &str) -> Self {
    match s.trim().to_lowercase().as_str() {
      "gutenberg" => Source::Gutenberg,
      "oldbailey" | "old_bailey" => Source::Oldbailey,
      "chronicling_america" | "chroniclingamerica" => Source::ChroniclingAmerica,
      "caselaw" => Source::Caselaw,
      _ => Source::Other(s.trim().to_string()),
    }
  }
}

impl From<String> for Source {
  fn from(s: String) -> Self {
    Source::from(s.as_str())
  }
}

impl From<Source> for String {
  fn from(source: Source) -> Self {
    source.as_str().to_string()
  }
}

impl std::fmt::Display for Source {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single source record, immutable once built by a source collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  pub id: String,
  pub text: String,
  pub source: Source,

  /// Publication year when the collaborator knows it
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub published_year: Option<i32>,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub metadata: BTreeMap<String, String>,
}

impl Document {
  pub fn new(id: impl Into<String>, text: impl Into<String>, source: Source) -> Self {
    Self {
      id: id.into(),
      text: text.into(),
      source,
      published_year: None,
      metadata: BTreeMap::new(),
    }
  }

  pub fn with_published_year(mut self, year: Option<i32>) -> Self {
    self.published_year = year;
    self
  }

  pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.metadata.insert(key.into(), value.into());
    self
  }

  /// Character count in Unicode scalar values (the unit shard budgets use)
  pub fn char_count(&self) -> usize {
    self.text.chars().count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_source_parse() {
    assert_eq!(Source::from("gutenberg"), Source::Gutenberg);
    assert_eq!(Source::from("OldBailey"), Source::Oldbailey);
    assert_eq!(Source::from("chronicling_america"), Source::ChroniclingAmerica);
    assert_eq!(Source::from("caselaw"), Source::Caselaw);
    assert_eq!(Source::from("hansard"), Source::Other("hansard".to_string()));
  }

  #[test]
  fn test_source_priority_order() {
    assert!(Source::Gutenberg.priority() < Source::Oldbailey.priority());
    assert!(Source::Oldbailey.priority() < Source::ChroniclingAmerica.priority());
    assert!(Source::Caselaw.priority() < Source::Other("x".into()).priority());
  }

  #[test]
  fn test_source_serializes_as_plain_string() {
    let json = serde_json::to_string(&Source::ChroniclingAmerica).unwrap();
    assert_eq!(json, "\"chronicling_america\"");
    let parsed: Source = serde_json::from_str("\"hansard\"").unwrap();
    assert_eq!(parsed, Source::Other("hansard".to_string()));
  }

  #[test]
  fn test_char_count_is_unicode_aware() {
    let doc = Document::new("d1", "café", Source::Gutenberg);
    assert_eq!(doc.char_count(), 4);
    assert_eq!(doc.text.len(), 5);
  }
}
