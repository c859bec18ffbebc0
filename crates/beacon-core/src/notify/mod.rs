//! Platform-native desktop notification dispatch.
//!
//! Best-effort notifications: failures are logged but never propagate.
//! The sync session hands every detected transition to the
//! [`NotificationDispatcher`], which notifies only for finished and
//! failed builds.
//!
//! Notifications are delivered via the [`NotificationBackend`] trait, with
//! platform-specific backends registered in [`registry`].

pub mod backends;
pub mod dispatcher;
pub mod errors;
pub mod registry;
pub mod traits;

pub use dispatcher::NotificationDispatcher;
pub use errors::NotifyError;
pub use traits::NotificationBackend;

use tracing::debug;

/// Delivers through the first available platform backend.
///
/// With no backend on the system, sends are skipped and succeed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Notifier;

impl NotificationBackend for Notifier {
    fn name(&self) -> &'static str {
        registry::detect_backend().map_or("none", |b| b.name())
    }

    fn is_available(&self) -> bool {
        registry::detect_backend().is_some()
    }

    fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let Some(backend) = registry::detect_backend() else {
            debug!(
                event = "core.notify.send_skipped",
                reason = "no backend available",
            );
            return Ok(());
        };
        backend.send(title, message)
    }
}
