//! Prediction model - persisted history

use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use severity_core::{ConditionValues, PredictionResult, Severity};

use crate::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct PredictionRow {
    pub id: Uuid,
    pub severity: String,
    pub confidence: f64,
    pub conditions: Json<ConditionValues>,
    pub created_at: DateTime<Utc>,
}

impl PredictionRow {
    pub async fn insert(
        pool: &PgPool,
        user_id: Uuid,
        prediction: &PredictionResult,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO predictions (id, user_id, severity, confidence, conditions, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#
        )
        .bind(prediction.id)
        .bind(user_id)
        .bind(prediction.severity.as_str())
        .bind(prediction.confidence)
        .bind(Json(&prediction.conditions))
        .bind(prediction.timestamp)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Full history of one user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT id, severity, confidence, conditions, created_at
            FROM predictions
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT id, severity, confidence, conditions, created_at
            FROM predictions
            WHERE id = $1 AND user_id = $2
            "#
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Every stored (severity, confidence) pair, for the admin aggregates
    pub async fn all_scores(pool: &PgPool) -> Result<Vec<(String, f64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, f64)>("SELECT severity, confidence FROM predictions")
            .fetch_all(pool)
            .await
    }

    pub fn into_result(self) -> Result<PredictionResult, AppError> {
        let severity: Severity = self.severity.parse()
            .map_err(|e: severity_core::logic::severity::UnknownSeverity| {
                AppError::InternalError(format!("prediction {}: {}", self.id, e))
            })?;

        Ok(PredictionResult {
            id: self.id,
            timestamp: self.created_at,
            severity,
            confidence: self.confidence,
            conditions: self.conditions.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use severity_core::{ConditionValue, PredictionReport};

    fn row(severity: &str) -> PredictionRow {
        let mut conditions = ConditionValues::new();
        conditions.insert("weather", ConditionValue::from("Fog"));

        PredictionRow {
            id: Uuid::new_v4(),
            severity: severity.to_string(),
            confidence: 0.81,
            conditions: Json(conditions),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_result() {
        let r = row("Critical");
        let id = r.id;
        let result = r.into_result().unwrap();

        assert_eq!(result.id, id);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.conditions.text("weather"), Some("Fog"));

        let report = PredictionReport::from(result);
        assert_eq!(report.description, "Life-threatening injuries with high risk of fatality");
        assert_eq!(report.confidence_percent, 81);
    }

    #[test]
    fn test_unknown_severity_is_internal_error() {
        assert!(matches!(row("Apocalyptic").into_result(), Err(AppError::InternalError(_))));
    }
}
