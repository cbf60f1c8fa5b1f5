//! Shared fixtures for shard integration tests

use filter::ContaminationDetector;
use tempus_core::{Document, Source};

/// Detector over the built-in lexicon
#[allow(dead_code)]
pub fn detector() -> ContaminationDetector {
  ContaminationDetector::standard().expect("built-in lexicon compiles")
}

/// A clean document of exactly `chars` characters
#[allow(dead_code)]
pub fn clean_doc(id: &str, chars: usize) -> Document {
  let text = format!("{:a<width$}", format!("Register entry {} ", id), width = chars);
  assert_eq!(text.chars().count(), chars, "fixture id too long for {} chars", chars);
  Document::new(id, text, Source::Gutenberg)
}

/// Every 4-digit token between 1000 and 2100 in `text`
#[allow(dead_code)]
pub fn years_in(text: &str) -> Vec<i32> {
  text
    .split(|c: char| !c.is_ascii_digit())
    .filter(|t| t.len() == 4)
    .filter_map(|t| t.parse().ok())
    .filter(|y| (1000..=2100).contains(y))
    .collect()
}
