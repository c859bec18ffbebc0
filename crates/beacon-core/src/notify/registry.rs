//! Notification registry for managing and looking up notification backends.

use std::sync::LazyLock;

use tracing::debug;

use super::backends::{LinuxNotificationBackend, MacOsNotificationBackend};
use super::traits::NotificationBackend;

/// Global registry of all supported notification backends.
static REGISTRY: LazyLock<NotificationRegistry> = LazyLock::new(NotificationRegistry::new);

/// Registry that manages all notification backend implementations.
struct NotificationRegistry {
    backends: Vec<Box<dyn NotificationBackend>>,
}

impl NotificationRegistry {
    fn new() -> Self {
        Self {
            backends: vec![
                Box::new(MacOsNotificationBackend),
                Box::new(LinuxNotificationBackend),
            ],
        }
    }

    /// First backend, in registration order, reporting `is_available()`.
    fn detect(&self) -> Option<&dyn NotificationBackend> {
        self.backends
            .iter()
            .find(|b| b.is_available())
            .map(|b| b.as_ref())
    }
}

/// The platform backend notifications will be delivered through, if any.
pub fn detect_backend() -> Option<&'static dyn NotificationBackend> {
    let backend = REGISTRY.detect();
    if backend.is_none() {
        debug!(
            event = "core.notify.detect_skipped",
            reason = "no backend available",
        );
    }
    backend
}
