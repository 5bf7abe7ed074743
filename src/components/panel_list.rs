// ABOUTME: Panel list component showing every clipboard panel with its copy progress

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::AppState;
use crate::models::{Session, SessionStatus};

pub struct PanelListComponent {
    list_state: ListState,
}

impl Default for PanelListComponent {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }
}

impl PanelListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let sessions = state.sessions();
        let order = display_order(&sessions, state);

        let highlighted = state.drag.map_or(state.selected_index, |drag| drag.target_index);
        self.list_state.select(Some(highlighted));

        let items: Vec<ListItem> = order
            .iter()
            .enumerate()
            .map(|(position, session)| {
                let grabbed = state.drag.is_some_and(|drag| drag.source == session.id);
                Self::build_item(position, session, grabbed)
            })
            .collect();

        let title = if state.drag.is_some() { "Panels (moving)" } else { "Panels" };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title_style(Style::default().fg(Color::Yellow)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn build_item(position: usize, session: &Session, grabbed: bool) -> ListItem<'static> {
        let status = session.status();
        let total = session.total_lines();
        let progress = match status {
            SessionStatus::Editing if total == 0 => "empty".to_string(),
            SessionStatus::Editing => format!("{} lines", total),
            _ => format!("{}/{}", session.current_index.min(total), total),
        };

        let style = if grabbed {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            match status {
                SessionStatus::Editing => Style::default().fg(Color::White),
                SessionStatus::Copying => Style::default().fg(Color::Yellow),
                SessionStatus::Complete => Style::default().fg(Color::Green),
            }
        };

        ListItem::new(format!(
            "{} Panel {} · {}",
            status.indicator(),
            position + 1,
            progress
        ))
        .style(style)
    }
}

/// While dragging, preview the order the drop would produce.
fn display_order(sessions: &[Session], state: &AppState) -> Vec<Session> {
    let mut order = sessions.to_vec();
    if let Some(drag) = state.drag {
        if let Some(from) = order.iter().position(|s| s.id == drag.source) {
            crate::session::reorder::move_item(&mut order, from, drag.target_index);
        }
    }
    order
}
