use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AnswerSet, QuestionKey},
};

pub mod memory;
pub mod redis;

pub use memory::InMemorySessionStore;
pub use self::redis::{create_redis_client, RedisSessionStore, SessionKey};

/// Identifier of a questionnaire session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything stored for one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub answers: AnswerSet,
    pub started_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self {
            answers: AnswerSet::new(),
            started_at: Utc::now(),
        }
    }

    /// Whether a session with lifetime `ttl` is over at `now`
    pub fn is_expired(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        self.started_at
            .checked_add_signed(ttl)
            .is_some_and(|expires_at| now >= expires_at)
    }
}

/// Converts a TTL in seconds to a `TimeDelta`, saturating at the maximum
pub fn session_ttl(ttl_secs: u64) -> TimeDelta {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage for per-session questionnaire answers
///
/// Sessions are independent; a store only has to keep one session's writes
/// from leaking into another. A session expires a fixed TTL after it was
/// started; expired sessions read as absent.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a new, empty session
    async fn create(&self) -> AppResult<SessionId>;

    /// Fetches a session, or `None` if it does not exist (or has expired)
    async fn get(&self, id: SessionId) -> AppResult<Option<SessionRecord>>;

    /// Records one answer; fails with `NotFound` for an unknown session
    async fn record_answer(&self, id: SessionId, key: QuestionKey, answer: String)
        -> AppResult<SessionRecord>;

    /// Discards a session; removing an unknown session is not an error
    async fn remove(&self, id: SessionId) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
