use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::SessionId,
    error::AppResult,
    middleware::RequestId,
    models::{AnswerSet, QuestionKey, Recommendation},
    routes::AppState,
    services::{questionnaire, Theme},
};

#[derive(Debug, Serialize)]
pub struct SessionStarted {
    pub session_id: SessionId,
    pub next_question: QuestionKey,
    pub prompt: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub recommendation: Recommendation,
    pub theme: Theme,
    pub answers: AnswerSet,
}

/// Starts a fresh questionnaire session
pub async fn start_session(
    State(state): State<Arc<AppState>>,
) -> AppResult<(StatusCode, Json<SessionStarted>)> {
    let session_id = state.sessions.create().await?;
    let first = QuestionKey::first();

    tracing::info!(
        session_id = %session_id,
        store = state.sessions.name(),
        "Session started"
    );

    Ok((
        StatusCode::CREATED,
        Json(SessionStarted {
            session_id,
            next_question: first,
            prompt: first.prompt(),
        }),
    ))
}

/// Computes the recommendation for everything answered so far
pub async fn get_result(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<ResultResponse>> {
    let session_id = SessionId(session_id);
    let answers = questionnaire::session_answers(state.sessions.as_ref(), session_id).await?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        answered = answers.len(),
        complete = answers.is_complete(),
        "Processing recommendation request"
    );

    let theme = Theme::for_answers(&answers);
    let recommendation = state.recommend(answers.clone()).await?;

    tracing::info!(
        request_id = %request_id,
        kind = recommendation.kind(),
        "Recommendation completed"
    );

    Ok(Json(ResultResponse {
        recommendation,
        theme,
        answers,
    }))
}

/// Discards a session and its answers
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(SessionId(session_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
