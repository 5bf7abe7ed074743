// ABOUTME: Main layout component handling split-pane arrangement and bottom menu bar

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::{HelpComponent, NotificationsComponent, PanelListComponent, PanelViewComponent};
use crate::app::AppState;

pub struct LayoutComponent {
    panel_list: PanelListComponent,
    panel_view: PanelViewComponent,
    help: HelpComponent,
    notifications: NotificationsComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            panel_list: PanelListComponent::new(),
            panel_view: PanelViewComponent::new(),
            help: HelpComponent::new(),
            notifications: NotificationsComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Bottom menu bar
            ])
            .split(frame.size());

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Panel list
                Constraint::Percentage(70), // Selected panel
            ])
            .split(main_chunks[0]);

        self.panel_list.render(frame, content_chunks[0], state);
        self.panel_view.render(frame, content_chunks[1], state);
        self.render_menu_bar(frame, main_chunks[1], state);

        self.notifications.render(frame, frame.size(), state);

        if state.help_visible {
            self.help.render(frame, frame.size());
        }
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let menu_text = if state.drag.is_some() {
            "Moving panel: [j/k] choose slot [Enter] drop [Esc] cancel"
        } else if state.selected_is_editing() {
            "Editing: type or paste text [Esc] start copying [^N]ew [^D]elete [^C] quit"
        } else {
            "[Space] copy line [e]dit [r]eset [n]ew [d]elete [m]ove [?]help [q]uit"
        };

        let menu = Paragraph::new(menu_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);

        frame.render_widget(menu, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
