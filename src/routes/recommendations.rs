use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{AnswerSet, QuestionKey, Recommendation},
    routes::AppState,
};

/// Handler for the stateless recommendations endpoint
///
/// Accepts a complete answer map in the body, bypassing the session flow.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(answers): Json<AnswerSet>,
) -> AppResult<Json<Recommendation>> {
    tracing::info!(
        request_id = %request_id,
        perfume_type = answers.get(QuestionKey::Type).unwrap_or_default(),
        "Processing recommendation request"
    );

    let recommendation = state.recommend(answers).await?;

    tracing::info!(
        request_id = %request_id,
        kind = recommendation.kind(),
        "Recommendation completed"
    );

    Ok(Json(recommendation))
}
