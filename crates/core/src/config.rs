//! Configuration system for tempus.
//!
//! Config priority: working directory (./tempus.toml) > user (~/.config/tempus/config.toml) > defaults.
//! Command-line flags override whatever is loaded here.

use crate::validation::{ValidationError, validate_chars_per_shard, validate_cutoff_year};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "tempus.toml";

// ============================================================================
// Packaging Configuration
// ============================================================================

/// Shard packaging defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingConfig {
  /// Latest year whose content may appear in a retained document (default: 1913)
  pub cutoff_year: i32,

  /// Character budget per shard (default: 250M, the downstream shard granularity)
  pub chars_per_shard: usize,

  /// Seed for the id-keyed shuffle (default: 42)
  pub shuffle_seed: u64,
}

impl Default for PackagingConfig {
  fn default() -> Self {
    Self {
      cutoff_year: 1913,
      chars_per_shard: 250_000_000,
      shuffle_seed: 42,
    }
  }
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Contamination detector settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
  /// Smallest 4-digit token treated as a calendar year (default: 1000)
  pub year_min: i32,

  /// Largest 4-digit token treated as a calendar year (default: 2100)
  pub year_max: i32,

  /// Leading characters searched for a Project Gutenberg header (default: 2000)
  pub header_window_chars: usize,

  /// Leading characters searched for edition markers like "edited by" (default: 5000)
  pub marker_window_chars: usize,
}

impl Default for DetectorConfig {
  fn default() -> Self {
    Self {
      year_min: 1000,
      year_max: 2100,
      header_window_chars: 2000,
      marker_window_chars: 5000,
    }
  }
}

// ============================================================================
// Dedup Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
  /// Also drop near-duplicates via SimHash + Jaccard (default: false)
  pub near_duplicates: bool,

  /// Jaccard similarity needed to confirm a SimHash candidate (default: 0.8)
  pub jaccard_threshold: f32,
}

impl Default for DedupConfig {
  fn default() -> Self {
    Self {
      near_duplicates: false,
      jaccard_threshold: 0.8,
    }
  }
}

// ============================================================================
// Loader Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
  /// Records with fewer characters are skipped (default: 100)
  pub min_chars: usize,

  /// Strip Project Gutenberg license header/footer (default: true)
  pub clean_headers: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      min_chars: 100,
      clean_headers: true,
    }
  }
}

// ============================================================================
// Retry Configuration
// ============================================================================

/// Bounded exponential backoff for file I/O
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  /// Maximum number of retry attempts (default: 3)
  pub max_retries: u32,

  /// Initial backoff in milliseconds (default: 200)
  pub initial_backoff_ms: u64,

  /// Backoff ceiling in milliseconds (default: 5000)
  pub max_backoff_ms: u64,

  /// Exponential factor (default: 2.0)
  pub backoff_multiplier: f64,

  /// Add up to 25% jitter (default: true)
  pub add_jitter: bool,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_retries: 3,
      initial_backoff_ms: 200,
      max_backoff_ms: 5000,
      backoff_multiplier: 2.0,
      add_jitter: true,
    }
  }
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: off, error, warn, info, debug, trace (default: info)
  pub level: String,

  /// Also log to files in this directory
  #[serde(skip_serializing_if = "Option::is_none")]
  pub directory: Option<PathBuf>,

  /// File rotation: daily, hourly, never (default: daily)
  pub rotation: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      directory: None,
      rotation: "daily".to_string(),
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// tempus configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub packaging: PackagingConfig,
  pub detector: DetectorConfig,
  pub dedup: DedupConfig,
  pub loader: LoaderConfig,
  pub retry: RetryConfig,
  pub logging: LoggingConfig,
}

impl Config {
  /// Load config for a working directory, with fallback to user config.
  ///
  /// A config file that exists but cannot be read or parsed is an error
  /// naming that file, never a silent fall back to defaults.
  pub fn load_for_dir(dir: &Path) -> Result<Self, ValidationError> {
    let local_config = Self::project_config_path(dir);
    if local_config.exists() {
      return Self::load_file(&local_config);
    }

    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
    {
      return Self::load_file(&user_config_path);
    }

    Ok(Self::default())
  }

  /// Parse a single config file
  pub fn load_file(path: &Path) -> Result<Self, ValidationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ValidationError::unreadable(path.display(), e))?;
    toml::from_str(&content)
      .map_err(|e| ValidationError::new(path.display().to_string(), format!("invalid config: {}", e)))
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TEMPUS_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("tempus").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("tempus").join("config.toml"))
  }

  pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(PROJECT_CONFIG_FILE)
  }

  /// Reject values no run could succeed with
  pub fn validate(&self) -> Result<(), ValidationError> {
    validate_cutoff_year(self.packaging.cutoff_year)?;
    validate_chars_per_shard(self.packaging.chars_per_shard)?;

    if self.detector.year_min > self.detector.year_max {
      return Err(ValidationError::new("detector.year_min", "must not exceed detector.year_max"));
    }
    if !(0.0..=1.0).contains(&self.dedup.jaccard_threshold) {
      return Err(ValidationError::out_of_range("dedup.jaccard_threshold", 0.0, 1.0));
    }
    if self.retry.backoff_multiplier < 1.0 {
      return Err(ValidationError::new("retry.backoff_multiplier", "must be at least 1.0"));
    }
    Ok(())
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Self::default();
    format!(
      r#"# tempus configuration
# Place in ./tempus.toml or ~/.config/tempus/config.toml

[packaging]
# Latest year whose content may appear in retained documents
cutoff_year = {cutoff}
# Character budget per shard
chars_per_shard = {chars}
# Seed for the id-keyed shuffle
shuffle_seed = {seed}

[detector]
# 4-digit tokens outside this range are not treated as years
year_min = {year_min}
year_max = {year_max}
# Leading window searched for a Project Gutenberg header
header_window_chars = {header}
# Leading window searched for edition markers ("edited by", ...)
marker_window_chars = {marker}

[dedup]
# Drop near-duplicates (SimHash + Jaccard) in addition to exact copies
near_duplicates = false
jaccard_threshold = 0.8

[loader]
# Skip records shorter than this many characters
min_chars = {min_chars}
# Strip Project Gutenberg license header/footer
clean_headers = true

[retry]
max_retries = {retries}
initial_backoff_ms = {initial}
max_backoff_ms = {max_backoff}
backoff_multiplier = 2.0
add_jitter = true

[logging]
# off, error, warn, info, debug, trace (RUST_LOG overrides)
level = "info"
# directory = "logs"
rotation = "daily"
"#,
      cutoff = defaults.packaging.cutoff_year,
      chars = defaults.packaging.chars_per_shard,
      seed = defaults.packaging.shuffle_seed,
      year_min = defaults.detector.year_min,
      year_max = defaults.detector.year_max,
      header = defaults.detector.header_window_chars,
      marker = defaults.detector.marker_window_chars,
      min_chars = defaults.loader.min_chars,
      retries = defaults.retry.max_retries,
      initial = defaults.retry.initial_backoff_ms,
      max_backoff = defaults.retry.max_backoff_ms,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_load_local_config() {
    let temp = TempDir::new().unwrap();
    let config_content = r#"
[packaging]
cutoff_year = 1850
chars_per_shard = 1000

[dedup]
near_duplicates = true
"#;
    std::fs::write(temp.path().join(PROJECT_CONFIG_FILE), config_content).unwrap();

    let config = Config::load_for_dir(temp.path()).unwrap();
    assert_eq!(config.packaging.cutoff_year, 1850);
    assert_eq!(config.packaging.chars_per_shard, 1000);
    assert_eq!(config.packaging.shuffle_seed, 42);
    assert!(config.dedup.near_duplicates);
    assert_eq!(config.loader.min_chars, 100);
  }

  #[test]
  fn test_malformed_local_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(PROJECT_CONFIG_FILE);
    std::fs::write(&path, "[packaging]\ncutoff_year = 1850\nchars_per_shard = \"lots\"\n").unwrap();

    let err = Config::load_for_dir(temp.path()).unwrap_err();
    assert_eq!(err.field, path.display().to_string());
    assert!(err.message.starts_with("invalid config"), "{}", err.message);
  }

  #[test]
  fn test_unreadable_local_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    // A directory where the file should be cannot be read as text
    std::fs::create_dir(temp.path().join(PROJECT_CONFIG_FILE)).unwrap();

    let err = Config::load_for_dir(temp.path()).unwrap_err();
    assert!(err.message.starts_with("unreadable"), "{}", err.message);
  }

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.packaging.cutoff_year, 1913);
    assert_eq!(config.packaging.chars_per_shard, 250_000_000);
    assert_eq!(config.detector, DetectorConfig::default());
    assert!(config.loader.clean_headers);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_template_parses_to_defaults() {
    let template = Config::generate_template();
    let parsed: Config = toml::from_str(&template).unwrap();
    assert_eq!(parsed.packaging.cutoff_year, 1913);
    assert_eq!(parsed.detector, DetectorConfig::default());
    assert_eq!(parsed.retry.max_retries, 3);
    assert!(parsed.logging.directory.is_none());
  }

  #[test]
  fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.packaging.chars_per_shard = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.packaging.cutoff_year = 3000;
    assert_eq!(config.validate().unwrap_err().field, "cutoff_year");

    let mut config = Config::default();
    config.detector.year_min = 2200;
    assert!(config.validate().is_err());
  }
}
