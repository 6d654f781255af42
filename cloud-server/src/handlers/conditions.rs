//! Condition schema handler

use axum::Json;
use severity_core::{AccidentCondition, ACCIDENT_CONDITIONS};

/// The input fields of a prediction, in display order
pub async fn list() -> Json<&'static [AccidentCondition]> {
    Json(ACCIDENT_CONDITIONS.as_slice())
}
