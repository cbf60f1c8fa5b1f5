use crate::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Validation: {0}")]
  Validation(#[from] ValidationError),

  #[error("Pattern: {0}")]
  Pattern(String),

  #[error("Write {path} failed after {attempts} attempts: {source}")]
  Write {
    path: PathBuf,
    attempts: u32,
    #[source]
    source: std::io::Error,
  },

  #[error("JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("IO: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
