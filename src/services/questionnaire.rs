use serde::Serialize;

use crate::{
    db::{SessionId, SessionStore},
    error::{AppError, AppResult},
    models::{AnswerSet, QuestionKey},
};

/// Colour theme for the result page, picked from the gender answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Blue,
    Pink,
    Purple,
}

impl Theme {
    pub fn for_answers(answers: &AnswerSet) -> Self {
        match answers.normalized(QuestionKey::Gender).as_str() {
            "men" => Theme::Blue,
            "women" => Theme::Pink,
            _ => Theme::Purple,
        }
    }
}

/// Stores the answer to `key` and returns the question that follows it
pub async fn answer_question(
    store: &dyn SessionStore,
    id: SessionId,
    key: QuestionKey,
    answer: String,
) -> AppResult<Option<QuestionKey>> {
    store.record_answer(id, key, answer).await?;
    let next = key.next();

    tracing::debug!(
        session_id = %id,
        question = %key,
        next_question = ?next,
        "Answer recorded"
    );

    Ok(next)
}

/// Loads a session's answers, failing with `NotFound` when it does not exist
pub async fn session_answers(store: &dyn SessionStore, id: SessionId) -> AppResult<AnswerSet> {
    store
        .get(id)
        .await?
        .map(|record| record.answers)
        .ok_or_else(|| AppError::NotFound(format!("session {}", id)))
}
