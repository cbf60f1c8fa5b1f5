use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Verdict for one (document, cutoff year) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContaminationResult {
  pub is_contaminated: bool,

  /// Detector declaration order, then first-match order within a detector
  pub reasons: Vec<String>,

  pub matched_terms: BTreeSet<String>,
  pub matched_years: BTreeSet<i32>,
}

impl ContaminationResult {
  /// No evidence found
  pub fn clean() -> Self {
    Self::default()
  }
}
