//! Admin dashboard aggregates
//!
//! Derived by a single linear scan over stored predictions.

use serde::{Deserialize, Serialize};

use crate::logic::severity::{PredictionResult, Severity};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_predictions: u64,
    pub total_users: u64,
    /// Mean confidence as a rounded whole percentage; 0 with no predictions
    pub average_confidence: u8,
    pub critical_predictions: u64,
}

impl AdminStats {
    /// Aggregate `(severity, confidence)` pairs
    pub fn compute<I>(records: I, total_users: u64) -> Self
    where
        I: IntoIterator<Item = (Severity, f64)>,
    {
        let mut total = 0u64;
        let mut critical = 0u64;
        let mut confidence_sum = 0.0f64;

        for (severity, confidence) in records {
            total += 1;
            confidence_sum += confidence;
            if severity == Severity::Critical {
                critical += 1;
            }
        }

        let average_confidence = if total == 0 {
            0
        } else {
            ((confidence_sum / total as f64).clamp(0.0, 1.0) * 100.0).round() as u8
        };

        Self {
            total_predictions: total,
            total_users,
            average_confidence,
            critical_predictions: critical,
        }
    }

    pub fn from_predictions<'a, I>(predictions: I, total_users: u64) -> Self
    where
        I: IntoIterator<Item = &'a PredictionResult>,
    {
        Self::compute(
            predictions.into_iter().map(|p| (p.severity, p.confidence)),
            total_users,
        )
    }
}
