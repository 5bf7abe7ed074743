// ABOUTME: Selected panel view: text editor while editing, line-by-line progress while copying

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::models::Session;

pub struct PanelViewComponent {
    list_state: ListState,
}

impl PanelViewComponent {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(session) = state.selected_session() else {
            let empty = Paragraph::new("No panel selected")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        };

        if session.is_editing {
            Self::render_editor(frame, area, &session);
        } else {
            let copied = state.is_copy_feedback_active(session.id);
            self.render_progress(frame, area, &session, copied);
        }
    }

    fn render_editor(frame: &mut Frame, area: Rect, session: &Session) {
        let title = format!("Edit · {} lines", session.total_lines());
        let text = if session.value.is_empty() {
            Text::styled(
                "Type or paste text here... every line can be copied on its own",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            // Trailing block shows where typing lands
            Text::raw(format!("{}█", session.value))
        };

        let editor = Paragraph::new(text)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(editor, area);
    }

    fn render_progress(&mut self, frame: &mut Frame, area: Rect, session: &Session, copied: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let total = session.total_lines();
        let done = session.current_index.min(total);
        let label = if session.is_complete() {
            format!("All {} lines copied · [r] to start over", total)
        } else {
            format!("{}/{} copied · {} remaining", done, total, session.remaining_lines())
        };
        #[allow(clippy::cast_precision_loss)]
        let ratio = if total == 0 { 0.0 } else { done as f64 / total as f64 };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, chunks[0]);

        let items: Vec<ListItem> = session
            .lines()
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let (marker, style) = if index < session.current_index {
                    ("✓", Style::default().fg(Color::DarkGray))
                } else if index == session.current_index && copied {
                    ("⧉", Style::default().fg(Color::Black).bg(Color::Green))
                } else if index == session.current_index {
                    ("▶", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                } else {
                    (" ", Style::default().fg(Color::White))
                };
                ListItem::new(format!("{} {:>3}  {}", marker, index + 1, line)).style(style)
            })
            .collect();

        let title = if copied { "Lines · copied!" } else { "Lines" };
        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        let cursor = (session.current_index < total).then_some(session.current_index);
        self.list_state.select(cursor);
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }
}

impl Default for PanelViewComponent {
    fn default() -> Self {
        Self::new()
    }
}
