// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::{state::AsyncAction, AppState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    NextPanel,
    PreviousPanel,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    NewPanel,
    DeletePanel,
    ReloadPanels,
    // Copy-progress view
    CopyLine,
    EditPanel,
    ResetPanel,
    // Editor
    StartCopying,
    InputChar(char),
    InputNewline,
    InputBackspace,
    Paste(String),
    // Keyboard drag for reordering
    BeginMove,
    MoveTargetNext,
    MoveTargetPrev,
    DropMove,
    CancelMove,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        // Force quit works everywhere
        if ctrl && matches!(key_event.code, KeyCode::Char('c' | 'q')) {
            return Some(AppEvent::Quit);
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        if state.drag.is_some() {
            return Self::handle_drag_keys(key_event);
        }

        if state.selected_is_editing() {
            return Self::handle_editor_keys(key_event);
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextPanel),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousPanel),
            KeyCode::Char('g') => Some(AppEvent::GoToTop),
            KeyCode::Char('G') => Some(AppEvent::GoToBottom),
            KeyCode::Char(' ' | 'c') | KeyCode::Enter => Some(AppEvent::CopyLine),
            KeyCode::Char('e') => Some(AppEvent::EditPanel),
            KeyCode::Char('r') => Some(AppEvent::ResetPanel),
            KeyCode::Char('n') => Some(AppEvent::NewPanel),
            KeyCode::Char('d') => Some(AppEvent::DeletePanel),
            KeyCode::Char('m') => Some(AppEvent::BeginMove),
            KeyCode::Char('f') => Some(AppEvent::ReloadPanels),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            _ => None,
        }
    }

    fn handle_editor_keys(key_event: KeyEvent) -> Option<AppEvent> {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            return match key_event.code {
                KeyCode::Char('n') => Some(AppEvent::NewPanel),
                KeyCode::Char('d') => Some(AppEvent::DeletePanel),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Esc => Some(AppEvent::StartCopying),
            KeyCode::Enter => Some(AppEvent::InputNewline),
            KeyCode::Backspace => Some(AppEvent::InputBackspace),
            KeyCode::Up => Some(AppEvent::PreviousPanel),
            KeyCode::Down => Some(AppEvent::NextPanel),
            KeyCode::Char(ch) => Some(AppEvent::InputChar(ch)),
            _ => None,
        }
    }

    fn handle_drag_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::MoveTargetNext),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::MoveTargetPrev),
            KeyCode::Char('m') | KeyCode::Enter => Some(AppEvent::DropMove),
            KeyCode::Esc => Some(AppEvent::CancelMove),
            _ => None,
        }
    }

    /// Bracketed paste only lands in a panel that is being edited.
    pub fn handle_paste(text: String, state: &AppState) -> Option<AppEvent> {
        (state.selected_is_editing() && !state.help_visible && state.drag.is_none())
            .then_some(AppEvent::Paste(text))
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::NextPanel => state.next_panel(),
            AppEvent::PreviousPanel => state.previous_panel(),
            AppEvent::GoToTop => state.go_to_top(),
            AppEvent::GoToBottom => state.go_to_bottom(),
            AppEvent::NewPanel => state.add_panel(),
            AppEvent::DeletePanel => {
                if let Some(id) = state.selected_id() {
                    state.pending_async_action = Some(AsyncAction::RemovePanel(id));
                }
            }
            AppEvent::ReloadPanels => {
                state.pending_async_action = Some(AsyncAction::ReloadPanels);
            }
            AppEvent::CopyLine => {
                // Mark for async processing
                state.pending_async_action = Some(AsyncAction::CopyCurrentLine);
            }
            AppEvent::EditPanel => state.edit_selected(),
            AppEvent::ResetPanel => state.reset_selected(),
            AppEvent::StartCopying => state.start_copying(),
            AppEvent::InputChar(ch) => state.insert_char(ch),
            AppEvent::InputNewline => state.insert_newline(),
            AppEvent::InputBackspace => state.backspace(),
            AppEvent::Paste(text) => state.paste(&text),
            AppEvent::BeginMove => state.begin_drag(),
            AppEvent::MoveTargetNext => state.drag_target_next(),
            AppEvent::MoveTargetPrev => state.drag_target_previous(),
            AppEvent::DropMove => state.drop_drag(),
            AppEvent::CancelMove => state.cancel_drag(),
        }
    }
}
