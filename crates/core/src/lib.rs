pub mod capacity;
pub mod config;
pub mod contamination;
pub mod cutoff;
pub mod document;
pub mod error;
pub mod manifest;
pub mod validation;

pub use capacity::{CapacityEstimate, estimate_capacity};
pub use config::{Config, DedupConfig, DetectorConfig, LoaderConfig, LoggingConfig, PackagingConfig, RetryConfig};
pub use contamination::ContaminationResult;
pub use cutoff::{CUTOFF_PRESETS, CutoffPreset, preset_for};
pub use document::{Document, Source};
pub use error::{Error, Result};
pub use manifest::{Manifest, ShardSummary, audit_file_name, manifest_file_name, shard_file_name};
pub use validation::{
  ValidationError, ValidationResult, YEAR_MAX, YEAR_MIN, validate_chars_per_shard, validate_cutoff_year,
  validate_shard_fits,
};
