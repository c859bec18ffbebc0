//! Deploy alerts on macOS through `osascript -e 'display notification ...'`.

use std::process::Command;

use crate::notify::backends::run_notifier;
use crate::notify::errors::NotifyError;
use crate::notify::traits::NotificationBackend;

pub struct MacOsNotificationBackend;

/// Escape a value for an AppleScript string literal.
fn applescript_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn display_script(title: &str, message: &str) -> String {
    format!(
        "display notification {} with title {}",
        applescript_quote(message),
        applescript_quote(title)
    )
}

impl NotificationBackend for MacOsNotificationBackend {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "macos") && which::which("osascript").is_ok()
    }

    fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        run_notifier(
            "osascript",
            Command::new("osascript")
                .arg("-e")
                .arg(display_script(title, message)),
        )
    }
}
