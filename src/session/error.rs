// ABOUTME: Error types for session collection mutations
// Policy rejections surfaced to the user rather than hard failures

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("At least one panel is required")]
    LastSessionRemovalRejected,
}
