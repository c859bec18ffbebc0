//! Notification backend trait definition.

use crate::notify::errors::NotifyError;

/// Trait defining the interface for desktop notification backends.
///
/// Each platform (macOS, Linux) implements this trait. Tests substitute
/// recording backends.
pub trait NotificationBackend: Send + Sync {
    /// The canonical name of this backend (e.g., "macos", "linux").
    fn name(&self) -> &'static str;

    /// Whether this backend can deliver notifications on this system.
    fn is_available(&self) -> bool;

    /// Deliver one notification.
    fn send(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}
