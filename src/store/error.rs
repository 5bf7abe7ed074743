// ABOUTME: Error types for the persistent session store
// Each store operation reports its own failure kind so callers can log and notify

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read sessions: {0}")]
    ReadFailed(String),

    #[error("Failed to save sessions: {0}")]
    WriteFailed(String),

    #[error("Failed to delete sessions: {0}")]
    DeleteFailed(String),
}
