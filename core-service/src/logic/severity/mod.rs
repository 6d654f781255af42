//! Severity Module
//!
//! Rule-based accident severity prediction.
//! A handful of additive rules over weather, road condition and visibility,
//! clamped at Critical, plus a confidence drawn independently of the inputs.
//!
//! ## Structure
//! - `types`: Severity, RiskBreakdown, PredictionResult, ConfidenceBand
//! - `rules`: rule table constants
//! - `sources`: injectable confidence source and clock
//! - `classifier`: assess / classify
//!
//! ## Usage
//! ```ignore
//! use severity_core::logic::severity::{classify, FixedConfidence, SystemClock};
//!
//! let result = classify(&values, &mut FixedConfidence(0.8), &SystemClock);
//! println!("{} ({}%)", result.severity, result.confidence_percent());
//! ```

pub mod classifier;
pub mod rules;
pub mod sources;
pub mod types;

pub use classifier::{assess, classify};
pub use sources::{Clock, ConfidenceSource, FixedClock, FixedConfidence, RandomConfidence, SystemClock};
pub use types::{
    confidence_percent, ConfidenceBand, PredictionReport, PredictionResult, RiskBreakdown, Severity,
    UnknownSeverity,
};
