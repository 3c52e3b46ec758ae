use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::SessionId,
    error::{AppError, AppResult},
    models::QuestionKey,
    routes::AppState,
    services::questionnaire,
};

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: QuestionKey,
    pub prompt: &'static str,
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub next_question: Option<QuestionKey>,
    pub prompt: Option<&'static str>,
}

fn parse_question(raw: &str) -> AppResult<QuestionKey> {
    raw.parse()
        .map_err(|e: crate::models::UnknownQuestion| AppError::NotFound(e.to_string()))
}

/// Returns the prompt for a question, with any answer already given
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    Path((session_id, question)): Path<(Uuid, String)>,
) -> AppResult<Json<QuestionResponse>> {
    let question = parse_question(&question)?;
    let answers = questionnaire::session_answers(state.sessions.as_ref(), SessionId(session_id)).await?;

    Ok(Json(QuestionResponse {
        question,
        prompt: question.prompt(),
        answer: answers.get(question).map(str::to_string),
    }))
}

/// Saves the answer to a question and points at the next one
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path((session_id, question)): Path<(Uuid, String)>,
    Json(request): Json<AnswerRequest>,
) -> AppResult<Json<AnswerResponse>> {
    let question = parse_question(&question)?;
    let next = questionnaire::answer_question(
        state.sessions.as_ref(),
        SessionId(session_id),
        question,
        request.answer.unwrap_or_default(),
    )
    .await?;

    Ok(Json(AnswerResponse {
        next_question: next,
        prompt: next.map(QuestionKey::prompt),
    }))
}
