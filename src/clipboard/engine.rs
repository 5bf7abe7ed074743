// ABOUTME: Copy-current-line operation and the delayed progress advance it produces

use super::ClipboardWriter;
use crate::models::Session;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// How long the "copied" affordance shows before the cursor moves on.
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CopyError {
    #[error("Nothing to copy")]
    NothingToCopy,

    #[error("Failed to copy: {0}")]
    ClipboardUnavailable(String),
}

/// Move a panel's cursor past the line that was just copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceRequest {
    pub session_id: Uuid,
    pub from_index: usize,
    pub delay: Duration,
}

impl AdvanceRequest {
    /// The advanced panel, or `None` if the panel moved on in the meantime
    /// (back in the editor, reset, or an earlier advance already applied).
    pub fn apply(&self, session: &Session) -> Option<Session> {
        if session.id != self.session_id
            || session.is_editing
            || session.current_index != self.from_index
        {
            return None;
        }
        Some(session.advanced())
    }
}

/// Copy the panel's current line to the clipboard.
///
/// Nothing is sent to the clipboard when the current line is blank. On
/// success the caller schedules the returned request after its delay.
pub async fn copy_current(
    session: &Session,
    clipboard: &dyn ClipboardWriter,
    delay: Duration,
) -> Result<AdvanceRequest, CopyError> {
    let line = session.current_line();
    if line.trim().is_empty() {
        return Err(CopyError::NothingToCopy);
    }

    clipboard.write_text(line).await.map_err(|e| {
        warn!("Clipboard write failed for panel {}: {}", session.id, e);
        CopyError::ClipboardUnavailable(e)
    })?;

    info!(
        "Copied line {}/{} of panel {}",
        session.current_index + 1,
        session.total_lines(),
        session.id
    );
    Ok(AdvanceRequest {
        session_id: session.id,
        from_index: session.current_index,
        delay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MockClipboardWriter;
    use mockall::predicate::eq;

    fn copying(value: &str, index: usize) -> Session {
        let mut session = Session::new().with_value(value).start_copying().unwrap();
        session.current_index = index;
        session
    }

    #[tokio::test]
    async fn test_copies_current_line() {
        let mut clipboard = MockClipboardWriter::new();
        clipboard
            .expect_write_text()
            .with(eq("b"))
            .times(1)
            .returning(|_| Ok(()));

        let session = copying("a\n\nb\nc", 1);
        let request = copy_current(&session, &clipboard, DEFAULT_FEEDBACK_DELAY)
            .await
            .unwrap();

        assert_eq!(request.session_id, session.id);
        assert_eq!(request.from_index, 1);
        assert_eq!(request.apply(&session).unwrap().current_index, 2);
    }

    #[tokio::test]
    async fn test_nothing_to_copy_skips_clipboard() {
        let mut clipboard = MockClipboardWriter::new();
        clipboard.expect_write_text().times(0);

        let complete = copying("a", 1);
        let result = copy_current(&complete, &clipboard, DEFAULT_FEEDBACK_DELAY).await;
        assert_eq!(result, Err(CopyError::NothingToCopy));

        let empty = Session::new();
        let result = copy_current(&empty, &clipboard, DEFAULT_FEEDBACK_DELAY).await;
        assert_eq!(result, Err(CopyError::NothingToCopy));
    }

    #[tokio::test]
    async fn test_clipboard_failure_is_reported() {
        let mut clipboard = MockClipboardWriter::new();
        clipboard
            .expect_write_text()
            .returning(|_| Err("permission denied".to_string()));

        let session = copying("a\nb", 0);
        let result = copy_current(&session, &clipboard, DEFAULT_FEEDBACK_DELAY).await;
        assert_eq!(
            result,
            Err(CopyError::ClipboardUnavailable("permission denied".to_string()))
        );
        assert_eq!(session.current_index, 0);
    }

    #[test]
    fn test_stale_advance_is_ignored() {
        let session = copying("a\nb\nc", 0);
        let request = AdvanceRequest {
            session_id: session.id,
            from_index: 0,
            delay: DEFAULT_FEEDBACK_DELAY,
        };

        let advanced = request.apply(&session).unwrap();
        assert_eq!(advanced.current_index, 1);
        // Applying the same request twice never skips a line
        assert!(request.apply(&advanced).is_none());
        // Nor does it touch a different panel
        assert!(request.apply(&Session::new()).is_none());
        // A panel sent back to the editor keeps its position
        assert!(request.apply(&session.edit()).is_none());
    }
}
