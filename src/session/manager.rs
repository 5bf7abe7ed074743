// ABOUTME: Session collection lifecycle management for clipboard panels
// Mediates every mutation of the ordered panel set and keeps the store in sync

use super::reorder::move_item;
use super::SessionError;
use crate::app::notification::Notifier;
use crate::models::Session;
use crate::store::{SessionStore, StoreResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

type SharedSessions = Arc<Mutex<Vec<Session>>>;

fn lock(sessions: &Mutex<Vec<Session>>) -> MutexGuard<'_, Vec<Session>> {
    sessions.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single armed persistence timer.
struct PendingFlush {
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct SessionManager {
    sessions: SharedSessions,
    store: Arc<dyn SessionStore>,
    notifier: Notifier,
    debounce: Duration,
    pending_flush: Option<PendingFlush>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, notifier: Notifier, debounce: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(vec![Session::new()])),
            store,
            notifier,
            debounce,
            pending_flush: None,
        }
    }

    /// Seed the collection from the store.
    ///
    /// Edits still waiting on the debounce are written first, so a reload
    /// never loses them. On first run a default panel is created and written
    /// immediately. If the store cannot be read the in-memory collection is
    /// kept (one default panel before anything was loaded).
    pub async fn load(&mut self) -> Vec<Session> {
        if self.has_pending_flush() {
            // Failures already raised a notice; memory stays authoritative
            let _ = self.flush().await;
        } else {
            self.cancel_pending_flush();
        }

        let loaded = match self.store.get_all().await {
            Ok(sessions) if !sessions.is_empty() => {
                info!("Restored {} panels from store", sessions.len());
                sessions
            }
            Ok(_) => {
                info!("No saved panels found, creating a default panel");
                let session = Session::new();
                if let Err(e) = self.store.put(&session).await {
                    warn!("Failed to save default panel: {}", e);
                    self.notifier.error(format!("Failed to save: {}", e));
                }
                vec![session]
            }
            Err(e) => {
                error!("Failed to load panels: {}", e);
                self.notifier
                    .error(format!("Failed to load saved panels: {}", e));
                let current = self.sessions();
                if current.is_empty() {
                    vec![Session::new()]
                } else {
                    current
                }
            }
        };

        *lock(&self.sessions) = loaded.clone();
        loaded
    }

    /// Append a fresh panel and return its id. New panels always go last.
    pub fn add(&mut self) -> Uuid {
        let session = Session::new();
        let id = session.id;
        lock(&self.sessions).push(session);
        debug!("Added panel {}", id);
        self.schedule_flush();
        id
    }

    /// Replace the panel with a matching id.
    ///
    /// Returns `false` when the id is unknown, which happens when a delayed
    /// continuation races a removal. The store-owned timestamps and identity
    /// of the existing record are kept, and a changed `value` always resets
    /// copy progress.
    pub fn update(&mut self, id: Uuid, next: Session) -> bool {
        let changed = {
            let mut sessions = lock(&self.sessions);
            let Some(slot) = sessions.iter_mut().find(|s| s.id == id) else {
                debug!("Ignoring update for missing panel {}", id);
                return false;
            };

            let mut next = Session {
                id: slot.id,
                created_at: slot.created_at,
                updated_at: slot.updated_at,
                ..next
            };
            if next.value != slot.value {
                next.current_index = 0;
            }

            if *slot == next {
                false
            } else {
                *slot = next;
                true
            }
        };

        if changed {
            self.schedule_flush();
        }
        true
    }

    /// Derive the replacement from the latest state of the panel.
    ///
    /// `f` returning `None` leaves the panel alone.
    pub fn update_with<F>(&mut self, id: Uuid, f: F) -> bool
    where
        F: FnOnce(&Session) -> Option<Session>,
    {
        let Some(current) = self.get(id) else {
            return false;
        };
        match f(&current) {
            Some(next) => self.update(id, next),
            None => false,
        }
    }

    /// Remove a panel and delete it from the store right away.
    ///
    /// The last remaining panel can never be removed. Returns `Ok(false)` for
    /// an unknown id.
    pub async fn remove(&mut self, id: Uuid) -> Result<bool, SessionError> {
        {
            let mut sessions = lock(&self.sessions);
            let Some(position) = sessions.iter().position(|s| s.id == id) else {
                return Ok(false);
            };
            if sessions.len() <= 1 {
                drop(sessions);
                info!("Refusing to remove the last panel {}", id);
                self.notifier
                    .warning(SessionError::LastSessionRemovalRejected.to_string());
                return Err(SessionError::LastSessionRemovalRejected);
            }
            sessions.remove(position);
        }

        match self.store.delete(id).await {
            Ok(()) => self.notifier.success("Panel removed"),
            Err(e) => {
                warn!("Failed to delete panel {}: {}", id, e);
                self.notifier.error(format!("Failed to delete: {}", e));
            }
        }
        Ok(true)
    }

    /// Move `from_id` to the position currently held by `to_id`.
    pub fn reorder(&mut self, from_id: Uuid, to_id: Uuid) -> bool {
        if from_id == to_id {
            return false;
        }
        {
            let mut sessions = lock(&self.sessions);
            let from = sessions.iter().position(|s| s.id == from_id);
            let to = sessions.iter().position(|s| s.id == to_id);
            let (Some(from), Some(to)) = (from, to) else {
                return false;
            };
            move_item(&mut sessions, from, to);
        }

        debug!("Moved panel {} to the slot of {}", from_id, to_id);
        self.schedule_flush();
        true
    }

    /// Write the whole collection now, replacing any pending timer.
    pub async fn flush(&mut self) -> StoreResult<()> {
        self.cancel_pending_flush();
        let snapshot = self.sessions();
        write_snapshot(self.store.as_ref(), &self.notifier, &snapshot).await
    }

    pub fn sessions(&self) -> Vec<Session> {
        lock(&self.sessions).clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Session> {
        lock(&self.sessions).iter().find(|s| s.id == id).cloned()
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        lock(&self.sessions).iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.sessions).is_empty()
    }

    pub fn has_pending_flush(&self) -> bool {
        self.pending_flush
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    fn cancel_pending_flush(&mut self) {
        if let Some(previous) = self.pending_flush.take() {
            // A timer that already fired keeps writing; only sleeping ones stop
            let _ = previous.cancel.send(());
        }
    }

    /// Arm the trailing debounce. The write reads the collection when the
    /// timer fires, not when it was armed.
    fn schedule_flush(&mut self) {
        self.cancel_pending_flush();

        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let sessions = Arc::clone(&self.sessions);
        let store = Arc::clone(&self.store);
        let notifier = self.notifier.clone();
        let delay = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                // A dropped manager closes the channel without cancelling
                Ok(()) = &mut cancelled => return,
            }

            let snapshot = lock(&sessions).clone();
            let _ = write_snapshot(store.as_ref(), &notifier, &snapshot).await;
        });

        self.pending_flush = Some(PendingFlush { cancel, handle });
    }
}

async fn write_snapshot(
    store: &dyn SessionStore,
    notifier: &Notifier,
    snapshot: &[Session],
) -> StoreResult<()> {
    match store.put_many(snapshot).await {
        Ok(()) => {
            debug!("Persisted {} panels", snapshot.len());
            Ok(())
        }
        Err(e) => {
            warn!("Failed to persist panels: {}", e);
            notifier.error(format!("Failed to save: {}", e));
            Err(e)
        }
    }
}
