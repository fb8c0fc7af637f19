//! Transient notifications (toasts).

use std::time::Duration;

use web_time::Instant;

use crate::config::NotificationConfig;
use crate::error::Error;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Something needs attention
    Warning,
    /// Neutral information
    Info,
}

impl NotificationKind {
    /// Icon shown next to the message.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
            NotificationKind::Warning => "⚠️",
            NotificationKind::Info => "ℹ️",
        }
    }
}

/// One notification on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Identifier for [`Notifications::dismiss`]
    pub id: u64,
    /// Text shown to the user
    pub message: String,
    /// Severity
    pub kind: NotificationKind,
    /// When it was pushed
    pub created: Instant,
}

/// Queue of notifications that expire on their own.
#[derive(Debug)]
pub struct Notifications {
    entries: Vec<Notification>,
    next_id: u64,
    dismiss_after: Duration,
}

impl Notifications {
    /// Empty queue using the configured lifetime.
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            dismiss_after: config.dismiss_after(),
        }
    }

    /// Show a message. Returns its id.
    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        self.push_at(message, kind, Instant::now())
    }

    /// Show a message as if pushed at `now`.
    pub fn push_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) -> u64 {
        let message = message.into();
        match kind {
            NotificationKind::Error => log::error!("{} {}", kind.icon(), message),
            NotificationKind::Warning => log::warn!("{} {}", kind.icon(), message),
            NotificationKind::Success | NotificationKind::Info => {
                log::info!("{} {}", kind.icon(), message)
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            message,
            kind,
            created: now,
        });
        id
    }

    /// Show an error using its user-facing message.
    pub fn push_error(&mut self, error: &Error) -> u64 {
        log::debug!("Notifying error: {}", error);
        self.push(error.user_message(), NotificationKind::Error)
    }

    /// Remove a notification before it expires.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    /// Drop expired notifications.
    pub fn prune(&mut self) -> usize {
        self.prune_at(Instant::now())
    }

    /// Drop notifications expired at `now`. Returns how many were dropped.
    pub fn prune_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let lifetime = self.dismiss_after;
        self.entries
            .retain(|n| now.saturating_duration_since(n.created) < lifetime);
        before - self.entries.len()
    }

    /// Notifications currently shown, oldest first.
    pub fn visible(&self) -> &[Notification] {
        &self.entries
    }

    /// Whether nothing is shown.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_after_lifetime() {
        let mut notifications = Notifications::default();
        let start = Instant::now();
        notifications.push_at("Saved", NotificationKind::Success, start);
        notifications.push_at("Later", NotificationKind::Info, start + Duration::from_secs(3));

        assert_eq!(notifications.prune_at(start + Duration::from_secs(4)), 0);
        assert_eq!(notifications.prune_at(start + Duration::from_secs(5)), 1);
        assert_eq!(notifications.visible()[0].message, "Later");
        assert_eq!(notifications.prune_at(start + Duration::from_secs(8)), 1);
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let mut notifications = Notifications::default();
        let a = notifications.push("a", NotificationKind::Warning);
        let b = notifications.push("b", NotificationKind::Info);
        assert_ne!(a, b);
        assert!(notifications.dismiss(a));
        assert!(!notifications.dismiss(a));
        assert_eq!(notifications.visible().len(), 1);
    }

    #[test]
    fn test_push_error_uses_user_message() {
        let mut notifications = Notifications::default();
        notifications.push_error(&Error::NothingSelected);
        let shown = &notifications.visible()[0];
        assert_eq!(shown.kind, NotificationKind::Error);
        assert_eq!(shown.message, "No image selected.");
    }

    #[test]
    fn test_custom_lifetime() {
        let config = NotificationConfig {
            dismiss_after_secs: 1,
        };
        let mut notifications = Notifications::new(&config);
        let start = Instant::now();
        notifications.push_at("short", NotificationKind::Info, start);
        assert_eq!(notifications.prune_at(start + Duration::from_secs(1)), 1);
    }
}
