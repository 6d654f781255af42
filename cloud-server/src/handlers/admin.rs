//! Admin dashboard handler

use axum::{extract::State, Json};
use severity_core::{AdminStats, Severity};

use crate::{AppState, AppError, AppResult};
use crate::models::{PredictionRow, User};
use crate::middleware::auth::UserContext;

/// Aggregates over every stored prediction
pub async fn stats(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<AdminStats>> {
    let scores = PredictionRow::all_scores(&state.pool)
        .await?
        .into_iter()
        .map(|(severity, confidence)| {
            severity
                .parse::<Severity>()
                .map(|s| (s, confidence))
                .map_err(|e| AppError::InternalError(e.to_string()))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let total_users = User::count(&state.pool).await?.max(0) as u64;
    let stats = AdminStats::compute(scores, total_users);

    tracing::debug!("Admin stats requested by {}: {:?}", user.email, stats);

    Ok(Json(stats))
}
