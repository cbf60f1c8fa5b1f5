//! Input validation utilities
//!
//! Configuration and run parameters are checked here before any work starts,
//! so a bad invocation fails fast with the offending field named.

use std::fmt;
use thiserror::Error;

/// Earliest year treated as a plausible calendar year
pub const YEAR_MIN: i32 = 1000;

/// Latest year treated as a plausible calendar year
pub const YEAR_MAX: i32 = 2100;

/// A validation error with field information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
  pub field: String,
  pub message: String,
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.field, self.message)
  }
}

impl ValidationError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: message.into(),
    }
  }

  /// Create error for out of range value
  pub fn out_of_range(field: impl Into<String>, min: impl fmt::Display, max: impl fmt::Display) -> Self {
    Self {
      field: field.into(),
      message: format!("must be between {} and {}", min, max),
    }
  }

  /// Create error for a path that cannot be read
  pub fn unreadable(path: impl fmt::Display, reason: impl fmt::Display) -> Self {
    Self {
      field: path.to_string(),
      message: format!("unreadable input: {}", reason),
    }
  }
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Cutoff must fall inside the plausible calendar range
pub fn validate_cutoff_year(year: i32) -> ValidationResult<i32> {
  if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
    return Err(ValidationError::out_of_range("cutoff_year", YEAR_MIN, YEAR_MAX));
  }
  Ok(year)
}

/// Shard budget must be positive
pub fn validate_chars_per_shard(chars: usize) -> ValidationResult<usize> {
  if chars == 0 {
    return Err(ValidationError::new("target_chars_per_shard", "must be greater than 0"));
  }
  Ok(chars)
}

/// Shard budget may not be smaller than the smallest document it has to hold
pub fn validate_shard_fits(chars: usize, smallest_document: usize) -> ValidationResult<usize> {
  if chars < smallest_document {
    return Err(ValidationError::new(
      "target_chars_per_shard",
      format!(
        "{} is smaller than the smallest document ({} characters)",
        chars, smallest_document
      ),
    ));
  }
  Ok(chars)
}
