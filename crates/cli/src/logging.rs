//! Logging setup for CLI commands

use std::path::Path;
use tempus_core::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::writer::MakeWriterExt;

const LOG_FILE: &str = "tempus.log";

/// Parse log level from config string
fn parse_log_level(level: &str) -> Option<tracing::Level> {
  match level.to_lowercase().as_str() {
    "off" => None,
    "error" => Some(tracing::Level::ERROR),
    "warn" => Some(tracing::Level::WARN),
    "debug" => Some(tracing::Level::DEBUG),
    "trace" => Some(tracing::Level::TRACE),
    _ => Some(tracing::Level::INFO),
  }
}

/// `-v` forces debug and `-vv` trace; otherwise the configured level
fn effective_level(config: &LoggingConfig, verbose: u8) -> Option<tracing::Level> {
  match verbose {
    0 => parse_log_level(&config.level),
    1 => Some(tracing::Level::DEBUG),
    _ => Some(tracing::Level::TRACE),
  }
}

fn env_filter(level: Option<tracing::Level>) -> EnvFilter {
  let directive: Directive = match level {
    Some(level) => level.into(),
    None => LevelFilter::OFF.into(),
  };
  // RUST_LOG overrides the configured level
  EnvFilter::builder().with_default_directive(directive).from_env_lossy()
}

/// Initialize console logging, plus a rolling file log when
/// `logging.directory` is set.
///
/// Returns the guard that must be kept alive for the duration of the program
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> Option<WorkerGuard> {
  let filter = env_filter(effective_level(config, verbose));

  let Some(dir) = config.directory.as_deref() else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .init();
    return None;
  };

  if std::fs::create_dir_all(dir).is_err() {
    // Fall back to console-only logging
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .init();
    tracing::warn!("Could not create log directory {}", dir.display());
    return None;
  }

  let (file_writer, guard) = tracing_appender::non_blocking(file_appender(dir, &config.rotation));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(true)
    .with_ansi(false)
    .with_writer(std::io::stderr.and(file_writer))
    .init();

  Some(guard)
}

fn file_appender(dir: &Path, rotation: &str) -> tracing_appender::rolling::RollingFileAppender {
  match rotation {
    "hourly" => tracing_appender::rolling::hourly(dir, LOG_FILE),
    "never" => tracing_appender::rolling::never(dir, LOG_FILE),
    _ => tracing_appender::rolling::daily(dir, LOG_FILE),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_effective_level() {
    let config = LoggingConfig::default();
    assert_eq!(effective_level(&config, 0), Some(tracing::Level::INFO));
    assert_eq!(effective_level(&config, 1), Some(tracing::Level::DEBUG));
    assert_eq!(effective_level(&config, 3), Some(tracing::Level::TRACE));

    let quiet = LoggingConfig {
      level: "off".to_string(),
      ..Default::default()
    };
    assert_eq!(effective_level(&quiet, 0), None);
    assert_eq!(effective_level(&quiet, 1), Some(tracing::Level::DEBUG));
  }
}
