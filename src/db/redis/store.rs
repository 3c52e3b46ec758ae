use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::Client;
use std::collections::HashMap;
use std::fmt::Display;

use crate::db::{SessionId, SessionRecord, SessionStore};
use crate::error::{AppError, AppResult};
use crate::models::{AnswerSet, QuestionKey};

/// Hash field holding the RFC 3339 start time; every other field is an answer
const STARTED_AT_FIELD: &str = "started_at";

/// Sets one answer only while the session hash still exists, so an answer can
/// never resurrect an expired session as a hash without a TTL
const RECORD_ANSWER_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
return 1
"#;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Answers(SessionId),
}

impl Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKey::Answers(id) => write!(f, "session:{}", id),
        }
    }
}

/// Creates a Redis client for session storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Session store backed by Redis
///
/// Each session is a hash keyed by `session:{id}`. The TTL is set once when
/// the session is created and answers are written with `HSET`, which keeps
/// it, so a session expires a fixed time after it started.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_client: Client,
    ttl: u64,
}

impl RedisSessionStore {
    pub fn new(redis_client: Client, ttl: u64) -> Self {
        Self { redis_client, ttl }
    }

    fn expire_secs(&self) -> i64 {
        i64::try_from(self.ttl).unwrap_or(i64::MAX)
    }
}

/// Rebuilds a session from its hash fields; unknown answer fields are skipped
fn record_from_fields(fields: HashMap<String, String>) -> AppResult<SessionRecord> {
    let mut started_at = None;
    let mut answers = AnswerSet::new();

    for (field, value) in fields {
        if field == STARTED_AT_FIELD {
            let parsed = DateTime::parse_from_rfc3339(&value).map_err(|e| {
                AppError::Internal(format!("Session deserialization error: {}", e))
            })?;
            started_at = Some(parsed.with_timezone(&Utc));
            continue;
        }

        match field.parse::<QuestionKey>() {
            Ok(key) => answers.set(key, value),
            Err(e) => tracing::warn!(error = %e, "Skipping unknown session field"),
        }
    }

    let started_at = started_at.ok_or_else(|| {
        AppError::Internal(format!("Session is missing its {} field", STARTED_AT_FIELD))
    })?;

    Ok(SessionRecord {
        answers,
        started_at,
    })
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self) -> AppResult<SessionId> {
        let id = SessionId::new();
        let record = SessionRecord::new();
        let key = SessionKey::Answers(id).to_string();

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = redis::pipe()
            .atomic()
            .hset(&key, STARTED_AT_FIELD, record.started_at.to_rfc3339())
            .ignore()
            .expire(&key, self.expire_secs())
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, session_id = %id, "Redis session create failed");
                e
            })?;

        tracing::debug!(session_id = %id, ttl = self.ttl, "Session created");
        Ok(id)
    }

    async fn get(&self, id: SessionId) -> AppResult<Option<SessionRecord>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let fields: HashMap<String, String> =
            conn.hgetall(SessionKey::Answers(id).to_string()).await?;

        if fields.is_empty() {
            return Ok(None);
        }
        record_from_fields(fields).map(Some)
    }

    async fn record_answer(
        &self,
        id: SessionId,
        key: QuestionKey,
        answer: String,
    ) -> AppResult<SessionRecord> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let updated: i64 = redis::Script::new(RECORD_ANSWER_SCRIPT)
            .key(SessionKey::Answers(id).to_string())
            .arg(key.as_str())
            .arg(answer)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, session_id = %id, "Redis answer write failed");
                e
            })?;

        if updated == 0 {
            return Err(AppError::NotFound(format!("session {}", id)));
        }

        self.get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))
    }

    async fn remove(&self, id: SessionId) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(SessionKey::Answers(id).to_string()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

// Round-trip tests need a live server; REDIS_URL selects it.
