//! User-facing failure notifications.
//!
//! [`Notifier`] publishes [`Notification`]s on a `tokio::sync::broadcast`
//! channel; the view layer subscribes and renders them as toasts. With no
//! subscriber, notifications are dropped.

use chrono::Utc;
use hakwon_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral status message.
    Info,
    /// A failed operation; the view may be out of sync with the server.
    Destructive,
}

/// A single toast-style message.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Short headline, e.g. `작업 실패`.
    pub title: String,
    /// Detail line, usually the underlying error message.
    pub description: String,
    pub severity: Severity,
    /// When the notification was created.
    pub timestamp: Timestamp,
}

impl Notification {
    /// Create a notification stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for a [`Severity::Destructive`] notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Destructive)
    }
}

/// Cloneable publishing handle.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    /// Create a notifier whose channel buffers up to `capacity` messages
    /// per subscriber. Slow subscribers lose the oldest messages.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send `notification` to every current subscriber.
    pub fn publish(&self, notification: Notification) {
        // SendError only means nobody is listening.
        let _ = self.sender.send(notification);
    }

    /// Receive every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_notification() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.publish(Notification::destructive("작업 실패", "network down"));

        let received = rx.recv().await.expect("should receive the notification");
        assert_eq!(received.title, "작업 실패");
        assert_eq!(received.description, "network down");
        assert_eq!(received.severity, Severity::Destructive);
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        Notifier::default().publish(Notification::new("t", "d", Severity::Info));
    }
}
