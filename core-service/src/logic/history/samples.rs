//! Demo history shown before any prediction is made

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::logic::conditions::{ConditionValue, ConditionValues};
use crate::logic::severity::{PredictionResult, Severity};

struct Sample {
    id: u128,
    at: (i32, u32, u32, u32, u32, u32),
    severity: Severity,
    confidence: f64,
    weather: &'static str,
    location: &'static str,
    speed_limit: f64,
    traffic: &'static str,
    road: &'static str,
    visibility: f64,
}

const SAMPLES: [Sample; 3] = [
    Sample {
        id: 1,
        at: (2025, 3, 15, 9, 23, 45),
        severity: Severity::Moderate,
        confidence: 0.78,
        weather: "Rain",
        location: "Urban",
        speed_limit: 35.0,
        traffic: "Medium",
        road: "Wet",
        visibility: 500.0,
    },
    Sample {
        id: 2,
        at: (2025, 3, 12, 18, 5, 12),
        severity: Severity::Severe,
        confidence: 0.92,
        weather: "Fog",
        location: "Highway",
        speed_limit: 65.0,
        traffic: "High",
        road: "Wet",
        visibility: 150.0,
    },
    Sample {
        id: 3,
        at: (2025, 3, 10, 14, 30, 22),
        severity: Severity::Minor,
        confidence: 0.85,
        weather: "Clear",
        location: "Rural",
        speed_limit: 45.0,
        traffic: "Low",
        road: "Dry",
        visibility: 1000.0,
    },
];

/// The canned records, newest first
///
/// These are recorded outcomes, not re-derived from the current rules.
pub fn sample_history() -> Vec<PredictionResult> {
    SAMPLES.iter().filter_map(to_prediction).collect()
}

fn to_prediction(sample: &Sample) -> Option<PredictionResult> {
    let (y, mo, d, h, mi, s) = sample.at;
    let timestamp = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single()?;

    let conditions: ConditionValues = [
        ("weather", ConditionValue::from(sample.weather)),
        ("time", ConditionValue::from(format!("{:02}:{:02}", h, mi))),
        ("date", ConditionValue::from(timestamp.format("%Y-%m-%d").to_string())),
        ("location", ConditionValue::from(sample.location)),
        ("speedLimit", ConditionValue::from(sample.speed_limit)),
        ("trafficDensity", ConditionValue::from(sample.traffic)),
        ("roadCondition", ConditionValue::from(sample.road)),
        ("visibilityMeters", ConditionValue::from(sample.visibility)),
    ]
    .into_iter()
    .collect();

    Some(PredictionResult {
        id: Uuid::from_u128(sample.id),
        timestamp,
        severity: sample.severity,
        confidence: sample.confidence,
        conditions,
    })
}
