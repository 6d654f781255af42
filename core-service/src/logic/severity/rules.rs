//! Severity Rules
//!
//! The fixed rule table behind the classifier.
//! No classification logic here - only constants.

use std::ops::Range;

// ============================================================================
// CONTRIBUTION WEIGHTS
// ============================================================================

/// Contribution of a high-risk condition
pub const MAJOR_RISK: u32 = 2;

/// Contribution of a moderate-risk condition
pub const MINOR_RISK: u32 = 1;

// ============================================================================
// WEATHER
// ============================================================================

/// Weather adding `MAJOR_RISK`
pub const HIGH_RISK_WEATHER: &[&str] = &["Snow", "Fog"];

/// Weather adding `MINOR_RISK`. Any other weather is treated as benign.
pub const MODERATE_RISK_WEATHER: &[&str] = &["Rain"];

// ============================================================================
// ROAD CONDITION
// ============================================================================

pub const HIGH_RISK_ROAD: &[&str] = &["Icy"];

pub const MODERATE_RISK_ROAD: &[&str] = &["Wet"];

// ============================================================================
// VISIBILITY (meters)
// ============================================================================

/// Below this visibility adds `MAJOR_RISK`
pub const LOW_VISIBILITY_METERS: f64 = 200.0;

/// Below this visibility adds `MINOR_RISK`
pub const REDUCED_VISIBILITY_METERS: f64 = 500.0;

// ============================================================================
// OUTPUT BOUNDS
// ============================================================================

/// Index of `Severity::Critical`; the score is clamped here
pub const MAX_SEVERITY_INDEX: u32 = 3;

/// Confidence is drawn uniformly from this half-open range
pub const CONFIDENCE_RANGE: Range<f64> = 0.70..0.95;
