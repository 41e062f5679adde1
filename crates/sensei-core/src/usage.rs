//! Token accounting and cost estimation.
//!
//! Usage totals arrive from the model provider at the end of each response;
//! the cost estimate is a fixed linear function of the two token counts so
//! that the billing collaborator sees deterministic numbers.

use serde::{Deserialize, Serialize};

/// USD per million input tokens for the pinned model.
pub const INPUT_RATE_USD_PER_MTOK: f64 = 3.0;

/// USD per million output tokens for the pinned model.
pub const OUTPUT_RATE_USD_PER_MTOK: f64 = 15.0;

/// Token counts and derived cost for one completed response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    /// Always `input_tokens + output_tokens`.
    pub total_tokens: u32,
    pub cost_estimate_usd: f64,
}

impl TokenUsage {
    /// Builds a usage record from raw provider counts, deriving the total
    /// and the cost estimate.
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cost_estimate_usd: estimate_cost(input_tokens, output_tokens),
        }
    }
}

/// Linear cost model over the fixed per-token rates.
pub fn estimate_cost(input_tokens: u32, output_tokens: u32) -> f64 {
    let input = input_tokens as f64 / 1_000_000.0 * INPUT_RATE_USD_PER_MTOK;
    let output = output_tokens as f64 / 1_000_000.0 * OUTPUT_RATE_USD_PER_MTOK;
    input + output
}
