// Bounded retry for file I/O
//
// - Exponential backoff with jitter
// - Retry only on transient io::ErrorKind values
// - Attempt count reported on exhaustion

use std::future::Future;
use std::io;
use std::time::Duration;
use tempus_core::RetryConfig;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Backoff schedule derived from [`RetryConfig`]
#[derive(Debug, Clone)]
pub struct RetryPolicy {
  /// Maximum number of retry attempts
  pub max_retries: u32,
  /// Initial backoff duration
  pub initial_backoff: Duration,
  /// Maximum backoff duration
  pub max_backoff: Duration,
  /// Backoff multiplier (exponential factor)
  pub backoff_multiplier: f64,
  /// Whether to add jitter to backoff
  pub add_jitter: bool,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self::from(&RetryConfig::default())
  }
}

impl From<&RetryConfig> for RetryPolicy {
  fn from(config: &RetryConfig) -> Self {
    Self {
      max_retries: config.max_retries,
      initial_backoff: Duration::from_millis(config.initial_backoff_ms),
      max_backoff: Duration::from_millis(config.max_backoff_ms),
      backoff_multiplier: config.backoff_multiplier,
      add_jitter: config.add_jitter,
    }
  }
}

/// The last error once every attempt has failed
#[derive(Debug)]
pub struct RetryFailure {
  pub attempts: u32,
  pub error: io::Error,
}

impl RetryPolicy {
  /// No retries, for callers that must fail fast
  pub fn none() -> Self {
    Self {
      max_retries: 0,
      ..Self::default()
    }
  }

  /// Calculate backoff duration for a given attempt
  pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
    let base = self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
    let mut backoff = Duration::from_secs_f64(base.min(self.max_backoff.as_secs_f64()));

    if self.add_jitter {
      // Add up to 25% jitter
      let jitter_factor = 1.0 + (rand_f64() * 0.25);
      backoff = Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor);
    }

    backoff.min(self.max_backoff)
  }

  /// Run `op` until it succeeds, fails with a permanent error, or retries run out
  pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, RetryFailure>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
  {
    let mut attempt = 0;
    loop {
      if attempt > 0 {
        let backoff = self.backoff_for_attempt(attempt - 1);
        debug!("Retry attempt {} for {} after {:?}", attempt, what, backoff);
        sleep(backoff).await;
      }

      match op().await {
        Ok(value) => return Ok(value),
        Err(e) if is_retryable(&e) && attempt < self.max_retries => {
          warn!("Retryable error on attempt {} for {}: {}", attempt + 1, what, e);
          attempt += 1;
        }
        Err(error) => {
          return Err(RetryFailure {
            attempts: attempt + 1,
            error,
          });
        }
      }
    }
  }
}

/// Clock-derived value in [0, 1) for jitter
fn rand_f64() -> f64 {
  use std::time::{SystemTime, UNIX_EPOCH};

  let nanos = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .subsec_nanos();

  (nanos as f64 / u32::MAX as f64).fract()
}

/// Transient failures worth another attempt
pub fn is_retryable(error: &io::Error) -> bool {
  matches!(
    error.kind(),
    io::ErrorKind::Interrupted
      | io::ErrorKind::WouldBlock
      | io::ErrorKind::TimedOut
      | io::ErrorKind::ResourceBusy
      | io::ErrorKind::StorageFull
  )
}
