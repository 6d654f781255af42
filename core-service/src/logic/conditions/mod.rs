//! Conditions Module
//!
//! The accident condition form: which fields exist, what values they hold,
//! and when a filled-in form may be submitted.
//!
//! ## Structure
//! - `types`: FieldType, ConditionValue, ConditionValues
//! - `schema`: AccidentCondition and the static form definition
//! - `validate`: submission checks

pub mod schema;
pub mod types;
pub mod validate;

pub use schema::{field, find_condition, AccidentCondition, ACCIDENT_CONDITIONS};
pub use types::{ConditionValue, ConditionValues, FieldType};
pub use validate::{validate, ValidationErrors};
