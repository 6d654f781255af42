//! Central Configuration Constants
//!
//! Single source of truth for defaults shared by the core and the server.

use std::time::Duration;

/// App name
pub const APP_NAME: &str = "Accident Severity";

/// Artificial latency of one prediction call (milliseconds)
///
/// Simulates the round-trip to a remote model.
pub const DEFAULT_PREDICTION_LATENCY_MS: u64 = 1500;

/// Banner shown when a prediction could not be produced or saved
pub const PREDICTION_FAILED_MESSAGE: &str = "Failed to generate prediction. Please try again.";

/// Banner shown when the history could not be loaded
pub const HISTORY_LOAD_FAILED_MESSAGE: &str = "Failed to load prediction history";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get prediction latency from environment or use default
pub fn get_prediction_latency() -> Duration {
    let millis = std::env::var("PREDICTION_LATENCY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PREDICTION_LATENCY_MS);
    Duration::from_millis(millis)
}
