// ABOUTME: Notification system for displaying temporary messages to users
// Provides different types of notifications with automatic expiry, delivered over a channel

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn new(message: String, notification_type: NotificationType) -> Self {
        Self {
            message,
            notification_type,
            created_at: Instant::now(),
            duration: Duration::from_secs(5), // Default 5 second duration
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), NotificationType::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), NotificationType::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), NotificationType::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), NotificationType::Warning)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Fire-and-forget sender for user-facing notices.
///
/// Cloneable so background persistence tasks can report failures too.
/// Sending never blocks and never fails the caller, even after the
/// receiving side is gone.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, NotificationFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, NotificationFeed { rx })
    }

    pub fn notify(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notification::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notification::error(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notification::info(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Notification::warning(message));
    }
}

/// Receiving end of a [`Notifier`].
#[derive(Debug)]
pub struct NotificationFeed {
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationFeed {
    /// Everything sent since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.rx.try_recv() {
            drained.push(notification);
        }
        drained
    }
}
