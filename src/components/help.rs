// ABOUTME: Help overlay component displaying keyboard shortcuts for panels, editing, and copying

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem},
    style::{Color, Modifier, Style},
};

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = self.centered_rect(60, 80, area);
        
        frame.render_widget(Clear, popup_area);
        
        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Panels:").style(heading),
            ListItem::new("  j/↓        Next panel"),
            ListItem::new("  k/↑        Previous panel"),
            ListItem::new("  g / G      First / last panel"),
            ListItem::new("  n          New panel (Ctrl+N while editing)"),
            ListItem::new("  d          Delete panel (Ctrl+D while editing)"),
            ListItem::new("  m          Move panel, then j/k and Enter to drop"),
            ListItem::new("  f          Reload panels from disk"),
            ListItem::new(""),
            ListItem::new("Editing:").style(heading),
            ListItem::new("  type/paste Add text, one copyable item per line"),
            ListItem::new("  Enter      New line"),
            ListItem::new("  Esc        Start copying"),
            ListItem::new(""),
            ListItem::new("Copying:").style(heading),
            ListItem::new("  Space/c    Copy current line and move to the next"),
            ListItem::new("  e          Back to the editor"),
            ListItem::new("  r          Reset progress"),
            ListItem::new(""),
            ListItem::new("General:").style(heading),
            ListItem::new("  ?          Toggle this help"),
            ListItem::new("  q/Esc      Quit application"),
            ListItem::new("  Ctrl+C     Force quit"),
        ];

        let help_list = List::new(help_items)
            .block(
                Block::default()
                    .title("Help - Press ? or Esc to close")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
            );

        frame.render_widget(help_list, popup_area);
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}