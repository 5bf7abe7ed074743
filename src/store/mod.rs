// ABOUTME: Persistent session store abstraction keyed by session id
// Provides the store contract, the monotonic write clock, and file/memory backends

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::models::Session;
use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable record storage for clipboard panels.
///
/// Every operation initializes the store on first use, so calling
/// [`SessionStore::init`] up front is optional.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn init(&self) -> StoreResult<()>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<Session>>;

    /// All records, oldest `updated_at` first.
    async fn get_all(&self) -> StoreResult<Vec<Session>>;

    async fn put(&self, session: &Session) -> StoreResult<()>;

    /// Upsert in order; later records get strictly later stamps.
    async fn put_many(&self, sessions: &[Session]) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn clear(&self) -> StoreResult<()>;
}

/// Millisecond stamps that never repeat or go backwards, even when several
/// writes land inside the same wall-clock tick.
#[derive(Debug, Default)]
pub struct StampClock {
    last: Mutex<i64>,
}

impl StampClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    pub fn next(&self) -> i64 {
        let mut last = self.last.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let stamp = Self::now_millis().max(*last + 1);
        *last = stamp;
        stamp
    }

    /// Make sure future stamps sort after something already persisted.
    pub fn observe(&self, stamp: i64) {
        let mut last = self.last.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if stamp > *last {
            *last = stamp;
        }
    }

    /// Fill in the store-owned timestamps for a record about to be written.
    pub fn stamp(&self, session: &Session) -> Session {
        let updated_at = self.next();
        Session {
            created_at: Some(session.created_at.unwrap_or(updated_at)),
            updated_at: Some(updated_at),
            ..session.clone()
        }
    }
}

/// Canonical load order: ascending `updated_at`, records without one first.
pub(crate) fn sort_by_updated(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| {
        a.updated_at
            .unwrap_or(0)
            .cmp(&b.updated_at.unwrap_or(0))
            .then_with(|| a.id.cmp(&b.id))
    });
}
