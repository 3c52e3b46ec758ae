use std::{collections::HashMap, sync::Arc};

use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;

use super::{session_ttl, SessionId, SessionRecord, SessionStore};
use crate::{
    error::{AppError, AppResult},
    models::QuestionKey,
};

/// Process-local session store
///
/// Sessions are dropped once their TTL has passed; expired entries are
/// pruned whenever a new session is created.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionRecord>>>,
    ttl: TimeDelta,
}

impl InMemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: session_ttl(ttl_secs),
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> AppResult<SessionId> {
        let id = SessionId::new();
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(self.ttl, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned expired sessions");
        }

        sessions.insert(id, SessionRecord::new());
        Ok(id)
    }

    async fn get(&self, id: SessionId) -> AppResult<Option<SessionRecord>> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(&id)
            .filter(|record| !record.is_expired(self.ttl, now))
            .cloned())
    }

    async fn record_answer(
        &self,
        id: SessionId,
        key: QuestionKey,
        answer: String,
    ) -> AppResult<SessionRecord> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        if sessions
            .get(&id)
            .is_some_and(|record| record.is_expired(self.ttl, now))
        {
            sessions.remove(&id);
        }

        let record = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))?;
        record.answers.set(key, answer);
        Ok(record.clone())
    }

    async fn remove(&self, id: SessionId) -> AppResult<()> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
