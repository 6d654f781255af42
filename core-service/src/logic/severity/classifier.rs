//! Severity Classifier
//!
//! Only the classify logic - no types, no rule constants.
//! Input: ConditionValues (weather, roadCondition, visibilityMeters)
//! Output: RiskBreakdown / PredictionResult

use uuid::{NoContext, Timestamp, Uuid};

use crate::logic::conditions::{field, ConditionValues};

use super::rules::{
    HIGH_RISK_ROAD, HIGH_RISK_WEATHER, LOW_VISIBILITY_METERS, MAJOR_RISK, MINOR_RISK,
    MODERATE_RISK_ROAD, MODERATE_RISK_WEATHER, REDUCED_VISIBILITY_METERS,
};
use super::sources::{Clock, ConfidenceSource};
use super::types::{PredictionResult, RiskBreakdown, Severity};

// ============================================================================
// RISK ACCUMULATION
// ============================================================================

/// Deterministic part of the prediction
///
/// Adds up the weather, road and visibility contributions and maps the
/// sum onto a severity, clamped at Critical. Fields other than these
/// three are ignored. Missing or unparsable visibility contributes 0;
/// callers validate before classifying.
pub fn assess(values: &ConditionValues) -> RiskBreakdown {
    let mut reasons = Vec::new();

    let weather = values.text(field::WEATHER).unwrap_or_default();
    let weather_contribution = tiered(weather, HIGH_RISK_WEATHER, MODERATE_RISK_WEATHER);
    if weather_contribution > 0 {
        reasons.push(format!("Weather: {} (+{})", weather, weather_contribution));
    }

    let road = values.text(field::ROAD_CONDITION).unwrap_or_default();
    let road_contribution = tiered(road, HIGH_RISK_ROAD, MODERATE_RISK_ROAD);
    if road_contribution > 0 {
        reasons.push(format!("Road condition: {} (+{})", road, road_contribution));
    }

    let visibility_contribution = match values.number(field::VISIBILITY_METERS) {
        Some(meters) if meters < LOW_VISIBILITY_METERS => MAJOR_RISK,
        Some(meters) if meters < REDUCED_VISIBILITY_METERS => MINOR_RISK,
        _ => 0,
    };
    if visibility_contribution > 0 {
        if let Some(meters) = values.number(field::VISIBILITY_METERS) {
            reasons.push(format!("Visibility: {} m (+{})", meters, visibility_contribution));
        }
    }

    let raw_score = weather_contribution + road_contribution + visibility_contribution;
    let severity = Severity::from_index(raw_score);

    RiskBreakdown {
        weather_contribution,
        road_contribution,
        visibility_contribution,
        raw_score,
        severity,
        reasons,
    }
}

fn tiered(value: &str, major: &[&str], minor: &[&str]) -> u32 {
    if major.contains(&value) {
        MAJOR_RISK
    } else if minor.contains(&value) {
        MINOR_RISK
    } else {
        0
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Full prediction: assessed severity plus one confidence draw
///
/// The confidence does not depend on the conditions.
pub fn classify(
    values: &ConditionValues,
    confidence: &mut dyn ConfidenceSource,
    clock: &dyn Clock,
) -> PredictionResult {
    let breakdown = assess(values);
    let timestamp = clock.now();

    let id = Uuid::new_v7(Timestamp::from_unix(
        NoContext,
        timestamp.timestamp().max(0) as u64,
        timestamp.timestamp_subsec_nanos(),
    ));

    let result = PredictionResult {
        id,
        timestamp,
        severity: breakdown.severity,
        confidence: confidence.draw(),
        conditions: values.clone(),
    };

    log::debug!(
        "Classified {}: score {} -> {} ({:.2})",
        result.id,
        breakdown.raw_score,
        result.severity,
        result.confidence
    );

    result
}

// ============================================================================
// TESTS
// ============================================================================
