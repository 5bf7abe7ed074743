// ABOUTME: Session collection management for clipboard panels
// Owns the ordered panel set, debounced persistence, and reordering

pub mod error;
pub mod manager;
pub mod reorder;

pub use error::SessionError;
pub use manager::{SessionManager, DEFAULT_DEBOUNCE};
pub use reorder::{DragEnded, ReorderController};
