//! Desktop notifier backends for deploy alerts.
//!
//! Each backend shells out to the platform's notifier; [`run_notifier`]
//! turns the process outcome into a [`NotifyError`].

pub mod linux;
pub mod macos;

pub use linux::LinuxNotificationBackend;
pub use macos::MacOsNotificationBackend;

use std::process::Command;

use crate::notify::errors::NotifyError;

/// Run a notifier command to completion.
///
/// A missing binary is `ToolNotFound`; a non-zero exit carries the trimmed
/// stderr in `SendFailed`.
pub(crate) fn run_notifier(tool: &'static str, command: &mut Command) -> Result<(), NotifyError> {
    let output = command.output().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => NotifyError::ToolNotFound {
            tool: tool.to_string(),
        },
        _ => NotifyError::SendFailed {
            message: format!("could not start {}: {}", tool, e),
        },
    })?;

    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(NotifyError::SendFailed {
        message: format!("{} exited with {}: {}", tool, output.status, stderr.trim()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_notifier_is_tool_not_found() {
        let err = run_notifier(
            "beacon-missing-notifier",
            &mut Command::new("beacon-missing-notifier"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NotifyError::ToolNotFound { ref tool } if tool == "beacon-missing-notifier"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failing_notifier_reports_exit_and_stderr() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo 'no dbus session' >&2; exit 3"]);
        let err = run_notifier("sh", &mut command).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sh exited with"));
        assert!(message.contains("no dbus session"));
    }
}
