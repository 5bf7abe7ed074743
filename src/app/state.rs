// ABOUTME: Application state management tying panels, clipboard, and notifications together

use crate::app::notification::{Notification, NotificationFeed, Notifier};
use crate::clipboard::{copy_current, AdvanceRequest, ClipboardWriter};
use crate::config::AppConfig;
use crate::models::Session;
use crate::session::{DragEnded, ReorderController, SessionManager};
use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    CopyCurrentLine,
    RemovePanel(Uuid),
    ReloadPanels,
}

/// Keyboard drag in progress: the grabbed panel and where it would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub source: Uuid,
    pub target_index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct PendingAdvance {
    pub due: Instant,
    pub request: AdvanceRequest,
}

pub struct AppState {
    pub manager: SessionManager,
    pub selected_index: usize,
    pub should_quit: bool,
    pub help_visible: bool,
    pub drag: Option<DragState>,
    pub notifications: Vec<Notification>,
    // Async action processing
    pub pending_async_action: Option<AsyncAction>,
    pub pending_advances: Vec<PendingAdvance>,
    pub ui_needs_refresh: bool,
    notifier: Notifier,
    feed: NotificationFeed,
    clipboard: Arc<dyn ClipboardWriter>,
    reorder: ReorderController,
    feedback_delay: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        clipboard: Arc<dyn ClipboardWriter>,
        config: &AppConfig,
    ) -> Self {
        let (notifier, feed) = Notifier::channel();
        let manager = SessionManager::new(store, notifier.clone(), config.debounce());
        Self {
            manager,
            selected_index: 0,
            should_quit: false,
            help_visible: false,
            drag: None,
            notifications: Vec::new(),
            pending_async_action: None,
            pending_advances: Vec::new(),
            ui_needs_refresh: false,
            notifier,
            feed,
            clipboard,
            reorder: ReorderController::new(),
            feedback_delay: config.feedback_delay(),
        }
    }

    pub async fn load_panels(&mut self) {
        let sessions = self.manager.load().await;
        info!("Loaded {} panels", sessions.len());
        self.selected_index = 0;
        self.drag = None;
        self.pending_advances.clear();
        self.ui_needs_refresh = true;
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.manager.sessions()
    }

    pub fn selected_session(&self) -> Option<Session> {
        self.manager.sessions().get(self.selected_index).cloned()
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected_session().map(|s| s.id)
    }

    pub fn selected_is_editing(&self) -> bool {
        self.selected_session().is_some_and(|s| s.is_editing)
    }

    pub fn next_panel(&mut self) {
        let len = self.manager.len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
        }
    }

    pub fn previous_panel(&mut self) {
        let len = self.manager.len();
        if len > 0 {
            self.selected_index = if self.selected_index == 0 {
                len - 1
            } else {
                self.selected_index - 1
            };
        }
    }

    pub fn go_to_top(&mut self) {
        self.selected_index = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected_index = self.manager.len().saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn add_panel(&mut self) {
        let id = self.manager.add();
        if let Some(position) = self.manager.position(id) {
            self.selected_index = position;
        }
    }

    fn modify_selected<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&Session) -> Option<Session>,
    {
        match self.selected_id() {
            Some(id) => self.manager.update_with(id, f),
            None => false,
        }
    }

    fn edit_text<F>(&mut self, f: F)
    where
        F: FnOnce(&mut String),
    {
        self.modify_selected(|session| {
            if !session.is_editing {
                return None;
            }
            let mut value = session.value.clone();
            f(&mut value);
            Some(session.with_value(value))
        });
    }

    pub fn insert_char(&mut self, ch: char) {
        self.edit_text(|value| value.push(ch));
    }

    pub fn insert_newline(&mut self) {
        self.edit_text(|value| value.push('\n'));
    }

    pub fn backspace(&mut self) {
        self.edit_text(|value| {
            value.pop();
        });
    }

    pub fn paste(&mut self, text: &str) {
        // Terminals may deliver pasted line breaks as CR or CRLF
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.edit_text(|value| value.push_str(&normalized));
    }

    pub fn start_copying(&mut self) {
        let started = self.modify_selected(Session::start_copying);
        if !started && self.selected_is_editing() {
            self.notifier.warning("Add some text before copying");
        }
    }

    pub fn edit_selected(&mut self) {
        self.modify_selected(|session| (!session.is_editing).then(|| session.edit()));
    }

    pub fn reset_selected(&mut self) {
        self.modify_selected(|session| Some(session.reset()));
    }

    pub fn begin_drag(&mut self) {
        if self.manager.len() < 2 {
            return;
        }
        if let Some(source) = self.selected_id() {
            self.drag = Some(DragState {
                source,
                target_index: self.selected_index,
            });
        }
    }

    pub fn drag_target_next(&mut self) {
        let len = self.manager.len();
        if let Some(ref mut drag) = self.drag {
            if drag.target_index + 1 < len {
                drag.target_index += 1;
            }
        }
    }

    pub fn drag_target_previous(&mut self) {
        if let Some(ref mut drag) = self.drag {
            drag.target_index = drag.target_index.saturating_sub(1);
        }
    }

    pub fn drop_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let destination = self
            .manager
            .sessions()
            .get(drag.target_index)
            .map(|s| s.id);
        let event = DragEnded {
            source: drag.source,
            destination,
        };

        if self.reorder.on_drag_end(event, &mut self.manager) {
            if let Some(position) = self.manager.position(drag.source) {
                self.selected_index = position;
            }
            self.notifier.success("Panel moved");
        }
    }

    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.reorder
                .on_drag_end(DragEnded::cancelled(drag.source), &mut self.manager);
        }
    }

    /// Panels whose "copied" affordance is showing.
    pub fn is_copy_feedback_active(&self, id: Uuid) -> bool {
        self.pending_advances
            .iter()
            .any(|pending| pending.request.session_id == id)
    }

    pub async fn copy_current_line(&mut self) {
        let Some(session) = self.selected_session() else {
            return;
        };

        match copy_current(&session, self.clipboard.as_ref(), self.feedback_delay).await {
            Ok(request) => {
                self.notifier.success(format!(
                    "Copied line {}/{}",
                    request.from_index + 1,
                    session.total_lines()
                ));
                self.pending_advances.push(PendingAdvance {
                    due: Instant::now() + request.delay,
                    request,
                });
            }
            Err(e) => {
                warn!("Copy failed for panel {}: {}", session.id, e);
                self.notifier.error(e.to_string());
            }
        }
    }

    /// Apply every advance whose feedback delay has elapsed.
    pub fn apply_due_advances(&mut self) {
        let now = Instant::now();
        let (due, waiting): (Vec<PendingAdvance>, Vec<PendingAdvance>) = self
            .pending_advances
            .drain(..)
            .partition(|pending| pending.due <= now);
        self.pending_advances = waiting;

        for pending in due {
            let request = pending.request;
            self.manager
                .update_with(request.session_id, |session| request.apply(session));
            self.ui_needs_refresh = true;
        }
    }

    pub async fn remove_panel(&mut self, id: Uuid) {
        // Rejections and store failures are already reported by the manager
        if let Ok(true) = self.manager.remove(id).await {
            self.pending_advances
                .retain(|pending| pending.request.session_id != id);
            let len = self.manager.len();
            if self.selected_index >= len {
                self.selected_index = len.saturating_sub(1);
            }
            self.ui_needs_refresh = true;
        }
    }

    pub fn collect_notifications(&mut self) {
        let fresh = self.feed.drain();
        if !fresh.is_empty() {
            self.ui_needs_refresh = true;
        }
        self.notifications.extend(fresh);
        self.notifications.retain(|n| !n.is_expired());
    }

    /// Run the deferred action, if any. Failures surface as notifications.
    pub async fn process_async_action(&mut self) {
        if let Some(action) = self.pending_async_action.take() {
            match action {
                AsyncAction::CopyCurrentLine => self.copy_current_line().await,
                AsyncAction::RemovePanel(id) => self.remove_panel(id).await,
                AsyncAction::ReloadPanels => self.load_panels().await,
            }
        }
    }
}

pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new(
        store: Arc<dyn SessionStore>,
        clipboard: Arc<dyn ClipboardWriter>,
        config: &AppConfig,
    ) -> Self {
        Self {
            state: AppState::new(store, clipboard, config),
        }
    }

    pub async fn init(&mut self) {
        self.state.load_panels().await;
        self.state.collect_notifications();
    }

    pub async fn tick(&mut self) {
        self.state.process_async_action().await;
        self.state.apply_due_advances();
        self.state.collect_notifications();
    }

    pub fn needs_ui_refresh(&mut self) -> bool {
        std::mem::take(&mut self.state.ui_needs_refresh)
    }

    /// Persist whatever the debounce has not written yet.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.state.manager.flush().await {
            warn!("Final save failed: {}", e);
        }
    }
}
