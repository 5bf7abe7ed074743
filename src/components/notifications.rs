// ABOUTME: Toast-style overlay listing the most recent notifications

use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{AppState, NotificationType};

const MAX_VISIBLE: usize = 3;

pub struct NotificationsComponent;

impl NotificationsComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let width = area.width.min(48);
        let x = area.x + area.width.saturating_sub(width + 1);
        let mut y = area.y + 1;

        for notification in state.notifications.iter().rev().take(MAX_VISIBLE) {
            if y + 3 > area.y + area.height {
                break;
            }
            let toast_area = Rect::new(x, y, width, 3);
            let color = match notification.notification_type {
                NotificationType::Success => Color::Green,
                NotificationType::Error => Color::Red,
                NotificationType::Warning => Color::Yellow,
                NotificationType::Info => Color::Blue,
            };

            let toast = Paragraph::new(notification.message.as_str())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true });

            frame.render_widget(Clear, toast_area);
            frame.render_widget(toast, toast_area);
            y += 3;
        }
    }
}

impl Default for NotificationsComponent {
    fn default() -> Self {
        Self::new()
    }
}
