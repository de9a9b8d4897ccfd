//! Transient user notifications (toasts).
//!
//! # Invariants
//! - Every failed save produces exactly one `Destructive` notification.
//! - Successful field saves are silent; only the strategic toggle and
//!   add/delete flows announce success.

use parking_lot::Mutex;

/// Visual style of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Destructive,
}

/// One toast shown by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Destructive,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    /// Failure toast naming the action that was not saved.
    pub fn failure(action: &str, reason: impl Into<String>) -> Self {
        Self::destructive(format!("Could not save {action}"), reason)
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that buffers toasts until the UI drains them.
#[derive(Debug, Default)]
pub struct NotificationLog {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears buffered notifications, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.pending.lock().push(notification);
    }
}
