// ABOUTME: Tests for SessionManager persistence behaviour against a recording store
// Verifies the trailing debounce, load-time ordering, and degraded mode on store failures

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use quickcopy::app::notification::{NotificationFeed, NotificationType, Notifier};
use quickcopy::models::Session;
use quickcopy::session::{DragEnded, ReorderController, SessionManager, DEFAULT_DEBOUNCE};
use quickcopy::store::{MemoryStore, SessionStore, StoreError, StoreResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Memory store that remembers every batch it was asked to write.
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    batches: Mutex<Vec<Vec<Session>>>,
    deletes: Mutex<Vec<Uuid>>,
}

impl RecordingStore {
    fn put_many_calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    fn last_batch(&self) -> Vec<Session> {
        self.batches.lock().unwrap().last().cloned().unwrap_or_default()
    }

    fn deletes(&self) -> Vec<Uuid> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn init(&self) -> StoreResult<()> {
        self.inner.init().await
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Session>> {
        self.inner.get(id).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Session>> {
        self.inner.get_all().await
    }

    async fn put(&self, session: &Session) -> StoreResult<()> {
        self.inner.put(session).await
    }

    async fn put_many(&self, sessions: &[Session]) -> StoreResult<()> {
        self.batches.lock().unwrap().push(sessions.to_vec());
        self.inner.put_many(sessions).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.deletes.lock().unwrap().push(id);
        self.inner.delete(id).await
    }

    async fn clear(&self) -> StoreResult<()> {
        self.inner.clear().await
    }
}

/// Store whose backing storage is gone.
struct BrokenStore;

#[async_trait]
impl SessionStore for BrokenStore {
    async fn init(&self) -> StoreResult<()> {
        Err(StoreError::Unavailable("disk unplugged".to_string()))
    }

    async fn get(&self, _id: Uuid) -> StoreResult<Option<Session>> {
        Err(StoreError::ReadFailed("disk unplugged".to_string()))
    }

    async fn get_all(&self) -> StoreResult<Vec<Session>> {
        Err(StoreError::ReadFailed("disk unplugged".to_string()))
    }

    async fn put(&self, _session: &Session) -> StoreResult<()> {
        Err(StoreError::WriteFailed("disk unplugged".to_string()))
    }

    async fn put_many(&self, _sessions: &[Session]) -> StoreResult<()> {
        Err(StoreError::WriteFailed("disk unplugged".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> StoreResult<()> {
        Err(StoreError::DeleteFailed("disk unplugged".to_string()))
    }

    async fn clear(&self) -> StoreResult<()> {
        Err(StoreError::DeleteFailed("disk unplugged".to_string()))
    }
}

fn create_manager<S: SessionStore + 'static>(store: Arc<S>) -> (SessionManager, NotificationFeed) {
    let (notifier, feed) = Notifier::channel();
    (SessionManager::new(store, notifier, DEFAULT_DEBOUNCE), feed)
}

fn ids(sessions: &[Session]) -> Vec<Uuid> {
    sessions.iter().map(|s| s.id).collect()
}

#[tokio::test(start_paused = true)]
async fn test_rapid_updates_coalesce_into_one_write() {
    let store = Arc::new(RecordingStore::default());
    let (mut manager, _feed) = create_manager(store.clone());
    let id = manager.load().await[0].id;

    let first = manager.get(id).unwrap().with_value("first");
    manager.update(id, first);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let second = manager.get(id).unwrap().with_value("second");
    manager.update(id, second);

    // The window restarted with the second update
    tokio::time::sleep(Duration::from_millis(450)).await;
    assert_eq!(store.put_many_calls(), 0);
    assert!(manager.has_pending_flush());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.put_many_calls(), 1);
    assert_eq!(store.last_batch()[0].value, "second");
    assert!(!manager.has_pending_flush());

    let stored = store.get(id).await.unwrap().unwrap();
    assert_eq!(stored.value, "second");
}

#[tokio::test(start_paused = true)]
async fn test_debounced_write_reads_collection_at_fire_time() {
    let store = Arc::new(RecordingStore::default());
    let (mut manager, _feed) = create_manager(store.clone());
    let first = manager.load().await[0].id;

    let second = manager.add();
    let third = manager.add();
    manager.reorder(third, first);

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(store.put_many_calls(), 1);
    assert_eq!(ids(&store.last_batch()), vec![third, first, second]);
    assert_eq!(ids(&store.get_all().await.unwrap()), vec![third, first, second]);
}

#[tokio::test(start_paused = true)]
async fn test_noop_mutations_do_not_arm_the_timer() {
    let store = Arc::new(RecordingStore::default());
    let (mut manager, _feed) = create_manager(store.clone());
    let id = manager.load().await[0].id;

    let unchanged = manager.get(id).unwrap();
    manager.update(id, unchanged);
    manager.reorder(id, id);
    manager.reorder(id, Uuid::new_v4());

    assert!(!manager.has_pending_flush());
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(store.put_many_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reorder_controller_applies_drops_and_ignores_cancels() {
    let store = Arc::new(RecordingStore::default());
    let (mut manager, _feed) = create_manager(store.clone());
    let a = manager.load().await[0].id;
    let b = manager.add();
    let c = manager.add();
    manager.flush().await.unwrap();
    let controller = ReorderController::new();

    assert!(!controller.on_drag_end(DragEnded::cancelled(a), &mut manager));
    assert!(!controller.on_drag_end(DragEnded::dropped_on(a, a), &mut manager));
    assert!(!manager.has_pending_flush());

    assert!(controller.on_drag_end(DragEnded::dropped_on(a, c), &mut manager));
    let order = ids(&manager.sessions());
    assert_eq!(order, vec![b, c, a]);

    let mut sorted = order.clone();
    sorted.sort();
    let mut original = vec![a, b, c];
    original.sort();
    assert_eq!(sorted, original);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(ids(&store.get_all().await.unwrap()), vec![b, c, a]);
}

#[tokio::test(start_paused = true)]
async fn test_reload_inside_debounce_window_keeps_the_edit() {
    let store = Arc::new(RecordingStore::default());
    let (mut manager, _feed) = create_manager(store.clone());
    let id = manager.load().await[0].id;

    let typed = manager.get(id).unwrap().with_value("typed text");
    manager.update(id, typed);
    let reloaded = manager.load().await;

    assert_eq!(ids(&reloaded), vec![id]);
    assert_eq!(reloaded[0].value, "typed text");

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(store.get(id).await.unwrap().unwrap().value, "typed text");
    // Written once by the reload; the cancelled timer adds nothing
    assert_eq!(store.put_many_calls(), 1);
    assert!(!manager.has_pending_flush());
}

#[tokio::test(start_paused = true)]
async fn test_reload_of_unreadable_store_keeps_panels_in_memory() {
    let (mut manager, mut feed) = create_manager(Arc::new(BrokenStore));
    manager.load().await;
    let extra = manager.add();
    let first = manager.sessions()[0].id;

    let reloaded = manager.load().await;

    assert_eq!(ids(&reloaded), vec![first, extra]);
    // The failed save and the failed re-read are both reported as errors
    assert!(feed
        .drain()
        .iter()
        .all(|n| n.notification_type == NotificationType::Error));
}

#[tokio::test]
async fn test_remove_deletes_exactly_that_id_immediately() {
    let store = Arc::new(RecordingStore::default());
    let (mut manager, _feed) = create_manager(store.clone());
    let keep = manager.load().await[0].id;
    let drop_me = manager.add();
    manager.flush().await.unwrap();

    assert_eq!(manager.remove(drop_me).await, Ok(true));

    assert_eq!(manager.len(), 1);
    assert_eq!(store.deletes(), vec![drop_me]);
    assert_eq!(ids(&store.get_all().await.unwrap()), vec![keep]);
}

#[tokio::test]
async fn test_load_round_trips_batch_in_write_order() {
    let store = Arc::new(MemoryStore::new());
    let mut written = Vec::new();
    for (i, text) in ["one", "two\nlines", "three"].iter().enumerate() {
        let mut session = Session::new().with_value(*text);
        session.current_index = i;
        session.is_editing = i == 0;
        written.push(session);
    }
    // Same wall-clock millisecond for the whole batch; order must still hold
    store.put_many(&written).await.unwrap();

    let (mut manager, _feed) = create_manager(store);
    let loaded = manager.load().await;

    assert_eq!(ids(&loaded), ids(&written));
    for (loaded, written) in loaded.iter().zip(&written) {
        assert_eq!(loaded.value, written.value);
        assert_eq!(loaded.current_index, written.current_index);
        assert_eq!(loaded.is_editing, written.is_editing);
        assert!(loaded.updated_at.is_some());
    }
}

#[tokio::test]
async fn test_unreadable_store_falls_back_to_one_panel() {
    let (mut manager, mut feed) = create_manager(Arc::new(BrokenStore));

    let loaded = manager.load().await;
    assert_eq!(loaded.len(), 1);
    assert!(loaded[0].is_editing);

    let notices = feed.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].notification_type, NotificationType::Error);
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_keeps_memory_authoritative() {
    let (mut manager, mut feed) = create_manager(Arc::new(BrokenStore));
    let id = manager.load().await[0].id;
    feed.drain();

    let edited = manager.get(id).unwrap().with_value("still here");
    manager.update(id, edited);
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(manager.get(id).unwrap().value, "still here");
    let notices = feed.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].notification_type, NotificationType::Error);
}

#[tokio::test]
async fn test_failed_delete_still_removes_from_memory() {
    let (mut manager, mut feed) = create_manager(Arc::new(BrokenStore));
    manager.load().await;
    let extra = manager.add();
    feed.drain();

    assert_eq!(manager.remove(extra).await, Ok(true));
    assert_eq!(manager.len(), 1);

    let notices = feed.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].notification_type, NotificationType::Error);
}
