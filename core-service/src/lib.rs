//! Accident Severity Core
//!
//! Everything the prediction flow needs that is not presentation:
//!
//! - `logic::conditions` - the static condition schema and form validation
//! - `logic::severity` - the rule-based severity classifier
//! - `logic::service` - latency-simulating, single-flight prediction service
//! - `logic::history` - newest-first prediction history
//! - `logic::session` - session observation and view gating
//! - `logic::stats` - admin dashboard aggregates
//! - `app` - the caller-owned application state tying the above together
//!
//! ## Usage
//! ```ignore
//! use severity_core::logic::conditions::ConditionValues;
//! use severity_core::logic::severity::assess;
//!
//! let mut values = ConditionValues::new();
//! values.insert("weather", "Fog");
//! values.insert("roadCondition", "Wet");
//! values.insert("visibilityMeters", 150.0);
//!
//! assert_eq!(assess(&values).severity.as_str(), "Critical");
//! ```

pub mod app;
pub mod constants;
pub mod logic;

pub use app::{HistoryView, PredictionApp, SubmitError};
pub use logic::conditions::{
    AccidentCondition, ConditionValue, ConditionValues, FieldType, ValidationErrors,
    ACCIDENT_CONDITIONS,
};
pub use logic::history::{HistoryError, HistorySource, HistoryStore};
pub use logic::service::{PredictError, PredictionService};
pub use logic::session::{AccessError, Session, SessionHandle, SessionWatch};
pub use logic::severity::{PredictionReport, PredictionResult, RiskBreakdown, Severity};
pub use logic::stats::AdminStats;
