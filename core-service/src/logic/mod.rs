//! Logic Module - Prediction Rules & Caller-side State
//!
//! ## Structure
//! - `conditions/` - schema of the accident condition form + validation
//! - `severity/` - risk accumulation rules and the classifier
//! - `history/` - prediction history store
//! - `service` - async prediction call with single-flight guard
//! - `session` - session-change stream and view gating
//! - `stats` - admin aggregates

pub mod conditions;
pub mod history;
pub mod service;
pub mod session;
pub mod severity;
pub mod stats;
