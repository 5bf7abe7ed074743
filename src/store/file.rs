// ABOUTME: File-backed session store writing one JSON document per panel
// Saves and restores panel state so sessions survive application restarts

use super::{sort_by_updated, SessionStore, StampClock, StoreError, StoreResult};
use crate::models::Session;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct FileStore {
    storage_path: PathBuf,
    initialized: OnceCell<()>,
    clock: StampClock,
    // Held from stamping until the rename, so writes land in stamp order
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store rooted at `data_dir`; records live in `data_dir/sessions`.
    ///
    /// Nothing touches the disk until the first operation.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_path: data_dir.as_ref().join("sessions"),
            initialized: OnceCell::new(),
            clock: StampClock::new(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    fn session_file(&self, id: Uuid) -> PathBuf {
        self.storage_path.join(format!("{}.json", id))
    }

    async fn ensure_init(&self) -> StoreResult<()> {
        self.initialized
            .get_or_try_init(|| self.open())
            .await
            .map(|_| ())
    }

    async fn open(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.storage_path).await.map_err(|e| {
            StoreError::Unavailable(format!("{}: {}", self.storage_path.display(), e))
        })?;

        // Seed the clock so new stamps always sort after what is on disk
        let existing = self.read_all().await?;
        if let Some(latest) = existing.iter().filter_map(|s| s.updated_at).max() {
            self.clock.observe(latest);
        }

        info!(
            "Opened session store at {:?} ({} records)",
            self.storage_path,
            existing.len()
        );
        Ok(())
    }

    async fn read_all(&self) -> StoreResult<Vec<Session>> {
        let mut sessions = Vec::new();

        let mut entries = match fs::read_dir(&self.storage_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(sessions),
            Err(e) => return Err(StoreError::ReadFailed(e.to_string())),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match fs::read_to_string(&path).await {
                Ok(content) => match serde_json::from_str::<Session>(&content) {
                    Ok(session) => sessions.push(session),
                    Err(e) => {
                        warn!("Failed to parse session file {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read session file {:?}: {}", path, e);
                }
            }
        }

        Ok(sessions)
    }

    async fn read_record(&self, id: Uuid) -> StoreResult<Option<Session>> {
        match fs::read_to_string(self.session_file(id)).await {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| StoreError::ReadFailed(format!("{}: {}", id, e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadFailed(format!("{}: {}", id, e))),
        }
    }

    /// Stamp a record, keeping the `created_at` already on disk when the
    /// caller does not carry one.
    async fn stamp_record(&self, session: &Session) -> Session {
        if session.created_at.is_some() {
            return self.clock.stamp(session);
        }
        let created_at = match self.read_record(session.id).await {
            Ok(existing) => existing.and_then(|s| s.created_at),
            Err(e) => {
                debug!("No readable previous record for {}: {}", session.id, e);
                None
            }
        };
        self.clock.stamp(&Session {
            created_at,
            ..session.clone()
        })
    }

    async fn remove_record(&self, id: Uuid) -> StoreResult<()> {
        match fs::remove_file(self.session_file(id)).await {
            Ok(()) => {
                info!("Session {} deleted", id);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::DeleteFailed(format!("{}: {}", id, e))),
        }
    }

    async fn write_record(&self, session: &Session) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", session.id, e)))?;

        // Write-then-rename so a crash never leaves a truncated record behind
        let target = self.session_file(session.id);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, json)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", session.id, e)))?;
        fs::rename(&staging, &target)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", session.id, e)))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn init(&self) -> StoreResult<()> {
        self.ensure_init().await
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Session>> {
        self.ensure_init().await?;
        self.read_record(id).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Session>> {
        self.ensure_init().await?;

        let mut sessions = self.read_all().await?;
        sort_by_updated(&mut sessions);
        debug!("Loaded {} sessions from {:?}", sessions.len(), self.storage_path);
        Ok(sessions)
    }

    async fn put(&self, session: &Session) -> StoreResult<()> {
        self.ensure_init().await?;
        let _guard = self.write_lock.lock().await;

        let stamped = self.stamp_record(session).await;
        self.write_record(&stamped).await
    }

    async fn put_many(&self, sessions: &[Session]) -> StoreResult<()> {
        self.ensure_init().await?;
        let _guard = self.write_lock.lock().await;

        // Stamp everything first so write order, not I/O timing, decides the order
        let mut stamped = Vec::with_capacity(sessions.len());
        for session in sessions {
            stamped.push(self.stamp_record(session).await);
        }
        for session in &stamped {
            self.write_record(session).await?;
        }
        debug!("Saved {} sessions", stamped.len());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.ensure_init().await?;
        let _guard = self.write_lock.lock().await;
        self.remove_record(id).await
    }

    async fn clear(&self) -> StoreResult<()> {
        self.ensure_init().await?;
        let _guard = self.write_lock.lock().await;

        let sessions = self
            .read_all()
            .await
            .map_err(|e| StoreError::DeleteFailed(e.to_string()))?;
        for session in sessions {
            self.remove_record(session.id).await?;
        }
        info!("All sessions cleared");
        Ok(())
    }
}
