//! Rough training-capacity estimate for a packaged corpus.
//!
//! Uses the downstream trainer's typical tokenizer ratio and the
//! Chinchilla-optimal tokens-per-parameter rule.

use serde::{Deserialize, Serialize};

/// Average characters per token for the downstream tokenizer
pub const CHARS_PER_TOKEN: f64 = 4.8;

/// Chinchilla-optimal training tokens per parameter
pub const TOKENS_PER_PARAM: f64 = 20.0;

/// Model depth to parameter count, ascending
const DEPTH_PARAMS: &[(u32, u64)] = &[
  (20, 561_000_000),
  (26, 1_100_000_000),
  (32, 1_800_000_000),
  (34, 2_200_000_000),
];

/// Reference throughput: 11B tokens in 3 hours on 8xH100
const TOKENS_PER_HOUR: f64 = 11_000_000_000.0 / 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityEstimate {
  pub total_tokens: u64,
  pub optimal_params: u64,
  /// Largest model depth the corpus can train compute-optimally
  pub recommended_depth: Option<u32>,
  /// Only set when a depth is recommended
  pub training_hours_8xh100: Option<f64>,
}

pub fn estimate_capacity(total_characters: u64) -> CapacityEstimate {
  let total_tokens = total_characters as f64 / CHARS_PER_TOKEN;
  let optimal_params = total_tokens / TOKENS_PER_PARAM;

  let recommended_depth = DEPTH_PARAMS
    .iter()
    .filter(|(_, params)| optimal_params >= *params as f64)
    .map(|(depth, _)| *depth)
    .next_back();

  let training_hours_8xh100 = recommended_depth.map(|_| total_tokens / TOKENS_PER_HOUR);

  CapacityEstimate {
    total_tokens: total_tokens as u64,
    optimal_params: optimal_params as u64,
    recommended_depth,
    training_hours_8xh100,
  }
}
