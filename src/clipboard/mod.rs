// ABOUTME: Line-copy engine and the system clipboard boundary
// Copies the current line of a panel and describes how progress advances afterwards

pub mod engine;
pub mod system;

pub use engine::{copy_current, AdvanceRequest, CopyError, DEFAULT_FEEDBACK_DELAY};
pub use system::SystemClipboard;

use async_trait::async_trait;

/// Write-only access to the platform clipboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), String>;
}
