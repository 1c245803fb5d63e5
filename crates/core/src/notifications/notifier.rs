//! Notifier trait and implementations.

use std::sync::{Arc, Mutex};

use super::Notification;

/// Trait for delivering user-facing notifications.
///
/// Implementations translate notifications into platform-specific delivery
/// (system tray, push, etc.). The mutation pipeline calls this after
/// successful local writes.
///
/// # Design Rules
///
/// - `notify()` must be fast and non-blocking (no network calls, no DB writes)
/// - Implementations should queue for async delivery
/// - Delivery failure (e.g. permission denied) must never affect the
///   operation that triggered the notification (best-effort)
pub trait Notifier: Send + Sync {
    /// Request delivery of a single notification.
    fn notify(&self, notification: Notification);
}

/// No-op implementation for tests or headless contexts.
#[derive(Clone, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {
        // Intentionally empty - notifications are discarded
    }
}

/// Mock notifier for testing - collects requested notifications.
#[derive(Clone, Default)]
pub struct MockNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Clears collected notifications.
    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }

    /// Returns the number of collected notifications.
    pub fn len(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.notifications.lock().unwrap().is_empty()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
