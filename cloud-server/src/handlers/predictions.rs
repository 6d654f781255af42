//! Prediction handlers

use axum::{extract::{Path, State}, http::StatusCode, Json};
use uuid::Uuid;
use severity_core::{ConditionValues, PredictionReport};

use crate::{AppState, AppError, AppResult};
use crate::models::PredictionRow;
use crate::middleware::auth::UserContext;

/// Classify the submitted conditions and store the result
pub async fn create(
    State(state): State<AppState>,
    user: UserContext,
    Json(values): Json<ConditionValues>,
) -> AppResult<(StatusCode, Json<PredictionReport>)> {
    // Runs detached so a client hanging up mid-latency cannot cancel the insert
    let task = tokio::spawn(async move {
        // The session stays busy until the row is written
        let flight = state.predictor.begin(user.session_id, &values)?;
        let prediction = state.predictor.run(&flight, &values).await;
        PredictionRow::insert(&state.pool, user.user_id, &prediction).await?;
        drop(flight);
        Ok::<_, AppError>(prediction)
    });

    let prediction = task
        .await
        .map_err(|e| AppError::InternalError(format!("prediction task failed: {}", e)))??;

    tracing::info!(
        "Prediction {} stored: {} ({}%)",
        prediction.id, prediction.severity, prediction.confidence_percent()
    );

    Ok((StatusCode::CREATED, Json(prediction.into())))
}

/// The caller's history, newest first
pub async fn list(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<Vec<PredictionReport>>> {
    let predictions = PredictionRow::list_by_user(&state.pool, user.user_id)
        .await?
        .into_iter()
        .map(|row| row.into_result().map(PredictionReport::from))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(predictions))
}

pub async fn get(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PredictionReport>> {
    let row = PredictionRow::find_for_user(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prediction not found".to_string()))?;

    Ok(Json(row.into_result()?.into()))
}
