// ABOUTME: Session data model representing one clipboard panel and its copy-progress state machine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Split panel text into copyable lines.
///
/// Blank and whitespace-only segments are dropped; everything else keeps its
/// original order and content. Lines are identified by position, so duplicate
/// text yields distinct lines.
pub fn derive_lines(value: &str) -> Vec<&str> {
    value
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub value: String,
    pub current_index: usize,
    pub is_editing: bool,
    // Stamped by the store on write, never by the in-memory model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            value: String::new(),
            current_index: 0,
            is_editing: true,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        derive_lines(&self.value)
    }

    pub fn total_lines(&self) -> usize {
        self.lines().len()
    }

    /// The line the cursor points at, or an empty string once past the end.
    pub fn current_line(&self) -> &str {
        self.lines().get(self.current_index).copied().unwrap_or("")
    }

    pub fn remaining_lines(&self) -> usize {
        self.total_lines().saturating_sub(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        let total = self.total_lines();
        total > 0 && self.current_index >= total
    }

    /// Replace the text. Any change to the text invalidates copy progress.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        let value = value.into();
        let current_index = if value == self.value { self.current_index } else { 0 };
        Self {
            value,
            current_index,
            ..self.clone()
        }
    }

    /// Leave edit mode and start from the first line. Only allowed when there
    /// is at least one line to copy.
    pub fn start_copying(&self) -> Option<Self> {
        if !self.is_editing || self.total_lines() == 0 {
            return None;
        }
        Some(Self {
            current_index: 0,
            is_editing: false,
            ..self.clone()
        })
    }

    /// Go back to the editor without touching progress.
    pub fn edit(&self) -> Self {
        Self {
            is_editing: true,
            ..self.clone()
        }
    }

    pub fn reset(&self) -> Self {
        Self {
            current_index: 0,
            is_editing: true,
            ..self.clone()
        }
    }

    pub fn advanced(&self) -> Self {
        Self {
            current_index: self.current_index + 1,
            ..self.clone()
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_editing {
            SessionStatus::Editing
        } else if self.is_complete() {
            SessionStatus::Complete
        } else {
            SessionStatus::Copying
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Editing,
    Copying,
    Complete,
}

impl SessionStatus {
    pub fn indicator(&self) -> &'static str {
        match self {
            SessionStatus::Editing => "✎",
            SessionStatus::Copying => "●",
            SessionStatus::Complete => "✓",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session_with(value: &str) -> Session {
        Session::new().with_value(value)
    }

    #[test]
    fn test_derive_lines_drops_blank_segments() {
        assert_eq!(derive_lines("a\n\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(derive_lines("  \n\t\n"), Vec::<&str>::new());
        assert_eq!(derive_lines(""), Vec::<&str>::new());
    }

    #[test]
    fn test_derive_lines_keeps_duplicates_and_inner_whitespace() {
        let lines = derive_lines("x\n  x  \nx");
        assert_eq!(lines, vec!["x", "  x  ", "x"]);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert!(session.is_editing);
        assert_eq!(session.current_index, 0);
        assert_eq!(session.value, "");
        assert!(session.created_at.is_none());
        assert!(session.updated_at.is_none());
    }

    #[test]
    fn test_current_line_out_of_range_is_empty() {
        let mut session = session_with("one\ntwo");
        session.current_index = 1;
        assert_eq!(session.current_line(), "two");
        session.current_index = 2;
        assert_eq!(session.current_line(), "");
    }

    #[test]
    fn test_changing_value_resets_progress() {
        let mut session = session_with("a\nb\nc");
        session.current_index = 2;

        let same = session.with_value("a\nb\nc");
        assert_eq!(same.current_index, 2);

        let changed = session.with_value("a\nb\nc\nd");
        assert_eq!(changed.current_index, 0);
    }

    #[test]
    fn test_start_copying_requires_lines() {
        let empty = session_with("   \n");
        assert!(empty.start_copying().is_none());

        let ready = session_with("line");
        let copying = ready.start_copying().unwrap();
        assert!(!copying.is_editing);
        assert_eq!(copying.current_index, 0);
    }

    #[test]
    fn test_edit_keeps_progress_until_copying_restarts() {
        let mut session = session_with("a\nb\nc").start_copying().unwrap();
        session.current_index = 1;

        let editing = session.edit();
        assert!(editing.is_editing);
        assert_eq!(editing.current_index, 1);

        let restarted = editing.start_copying().unwrap();
        assert_eq!(restarted.current_index, 0);
    }

    #[test]
    fn test_completion_is_monotonic() {
        let mut session = session_with("a\nb");
        assert!(!session.is_complete());
        session.current_index = 2;
        assert!(session.is_complete());
        for index in 3..10 {
            session.current_index = index;
            assert!(session.is_complete());
        }
    }

    #[test]
    fn test_empty_session_is_never_complete() {
        let mut session = Session::new();
        session.current_index = 5;
        assert!(!session.is_complete());
    }

    #[test]
    fn test_edit_keeps_index_and_reset_clears_it() {
        let mut session = session_with("a\nb\nc").start_copying().unwrap();
        session.current_index = 2;

        let editing = session.edit();
        assert!(editing.is_editing);
        assert_eq!(editing.current_index, 2);

        let reset = session.reset();
        assert!(reset.is_editing);
        assert_eq!(reset.current_index, 0);
        assert_eq!(reset.value, "a\nb\nc");
    }

    #[test]
    fn test_serialized_record_uses_camel_case() {
        let session = session_with("hello");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["value"], "hello");
        assert_eq!(json["currentIndex"], 0);
        assert_eq!(json["isEditing"], true);
        assert!(json.get("updatedAt").is_none());
    }
}
