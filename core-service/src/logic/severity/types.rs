//! Severity Types
//!
//! Core types for severity prediction.
//! No classification logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::conditions::ConditionValues;

use super::rules::MAX_SEVERITY_INDEX;

// ============================================================================
// SEVERITY
// ============================================================================

/// Predicted accident severity, ordered from lowest to highest risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Minor,
        Severity::Moderate,
        Severity::Severe,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Critical => "Critical",
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Severity::Minor => 0,
            Severity::Moderate => 1,
            Severity::Severe => 2,
            Severity::Critical => 3,
        }
    }

    /// Map an accumulated risk score to a level, clamping at Critical
    pub fn from_index(index: u32) -> Self {
        Self::ALL[index.min(MAX_SEVERITY_INDEX) as usize]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Severity::Minor => "Minor injuries or property damage only",
            Severity::Moderate => "Non-life-threatening injuries requiring medical attention",
            Severity::Severe => "Serious injuries that may be life-threatening",
            Severity::Critical => "Life-threatening injuries with high risk of fatality",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity level: {0}")]
pub struct UnknownSeverity(pub String);

impl std::str::FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

// ============================================================================
// CONFIDENCE BAND
// ============================================================================

/// Coarse reading of a confidence value for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    VeryHigh,
    Good,
    Moderate,
    Low,
}

impl ConfidenceBand {
    pub fn of(confidence: f64) -> Self {
        if confidence >= 0.9 {
            ConfidenceBand::VeryHigh
        } else if confidence >= 0.7 {
            ConfidenceBand::Good
        } else if confidence >= 0.5 {
            ConfidenceBand::Moderate
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfidenceBand::VeryHigh => "Very high confidence in this prediction",
            ConfidenceBand::Good => "Good confidence in this prediction",
            ConfidenceBand::Moderate => "Moderate confidence in this prediction",
            ConfidenceBand::Low => "Low confidence in this prediction, consider additional factors",
        }
    }
}

/// Confidence as a whole percentage (0.784 -> 78)
pub fn confidence_percent(confidence: f64) -> u8 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

// ============================================================================
// RISK BREAKDOWN
// ============================================================================

/// How the risk score was accumulated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub weather_contribution: u32,
    pub road_contribution: u32,
    pub visibility_contribution: u32,
    /// Sum of contributions before clamping (may exceed 3)
    pub raw_score: u32,
    pub severity: Severity,
    pub reasons: Vec<String>,
}

// ============================================================================
// PREDICTION RESULT
// ============================================================================

/// One classifier output. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Time-ordered unique id
    pub id: Uuid,
    /// Creation time, serialized as RFC 3339
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    /// In [0, 1]; independent of the conditions
    pub confidence: f64,
    pub conditions: ConditionValues,
}

impl PredictionResult {
    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::of(self.confidence)
    }

    pub fn confidence_percent(&self) -> u8 {
        confidence_percent(self.confidence)
    }
}

// ============================================================================
// PREDICTION REPORT
// ============================================================================

/// A prediction together with its human-readable readings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    #[serde(flatten)]
    pub prediction: PredictionResult,
    /// Expected impact of the severity level
    pub description: &'static str,
    pub confidence_percent: u8,
    pub confidence_band: ConfidenceBand,
    pub confidence_note: &'static str,
}

impl From<PredictionResult> for PredictionReport {
    fn from(prediction: PredictionResult) -> Self {
        let band = prediction.confidence_band();
        Self {
            description: prediction.severity.description(),
            confidence_percent: prediction.confidence_percent(),
            confidence_band: band,
            confidence_note: band.description(),
            prediction,
        }
    }
}
