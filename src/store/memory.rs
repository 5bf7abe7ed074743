// ABOUTME: In-process session store with the same semantics as the file store
// Backs ephemeral runs where nothing should touch the disk

use super::{sort_by_updated, SessionStore, StampClock, StoreResult};
use crate::models::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Uuid, Session>>,
    clock: StampClock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn stamp_record(&self, records: &HashMap<Uuid, Session>, session: &Session) -> Session {
        let created_at = session
            .created_at
            .or_else(|| records.get(&session.id).and_then(|s| s.created_at));
        self.clock.stamp(&Session {
            created_at,
            ..session.clone()
        })
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn init(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Session>> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self.records.lock().await.values().cloned().collect();
        sort_by_updated(&mut sessions);
        Ok(sessions)
    }

    async fn put(&self, session: &Session) -> StoreResult<()> {
        let mut records = self.records.lock().await;
        let stamped = self.stamp_record(&records, session);
        records.insert(stamped.id, stamped);
        Ok(())
    }

    async fn put_many(&self, sessions: &[Session]) -> StoreResult<()> {
        let mut records = self.records.lock().await;
        for session in sessions {
            let stamped = self.stamp_record(&records, session);
            records.insert(stamped.id, stamped);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.records.lock().await.remove(&id);
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        self.records.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites_caller_timestamp() {
        let store = MemoryStore::new();
        let mut session = Session::new();
        session.updated_at = Some(1);

        store.put(&session).await.unwrap();
        let stored = store.get(session.id).await.unwrap().unwrap();
        assert!(stored.updated_at.unwrap() > 1);
        assert!(stored.created_at.is_some());
    }

    #[tokio::test]
    async fn test_rewrites_keep_first_created_at() {
        let store = MemoryStore::new();
        let session = Session::new().with_value("v1");

        store.put_many(&[session.clone()]).await.unwrap();
        let first = store.get(session.id).await.unwrap().unwrap();
        // The in-memory copy never learns its stamps
        store.put_many(&[session.with_value("v2")]).await.unwrap();
        let second = store.get(session.id).await.unwrap().unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.delete(Uuid::new_v4()).await.is_ok());
    }
}
