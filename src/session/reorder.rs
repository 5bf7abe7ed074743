// ABOUTME: Reorder controller turning drag-ended events into panel moves
// The gesture source is abstract: anything that reports (source, destination) on drop works

use super::SessionManager;
use tracing::debug;
use uuid::Uuid;

/// Emitted when a drag gesture finishes.
///
/// `destination` is `None` when the gesture was cancelled or dropped
/// outside any panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnded {
    pub source: Uuid,
    pub destination: Option<Uuid>,
}

impl DragEnded {
    pub fn dropped_on(source: Uuid, destination: Uuid) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    pub fn cancelled(source: Uuid) -> Self {
        Self {
            source,
            destination: None,
        }
    }
}

/// Remove the element at `from` and reinsert it at `to`; every other element
/// keeps its relative order.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReorderController;

impl ReorderController {
    pub fn new() -> Self {
        Self
    }

    /// Apply a finished drag to the collection. Returns whether the order changed.
    pub fn on_drag_end(&self, event: DragEnded, manager: &mut SessionManager) -> bool {
        let Some(destination) = event.destination else {
            debug!("Drag of {} cancelled", event.source);
            return false;
        };
        if destination == event.source {
            return false;
        }
        manager.reorder(event.source, destination)
    }
}
