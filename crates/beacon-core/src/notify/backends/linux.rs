//! Deploy alerts on Linux through `notify-send`.

use std::process::Command;

use crate::notify::backends::run_notifier;
use crate::notify::errors::NotifyError;
use crate::notify::traits::NotificationBackend;

const TOOL: &str = "notify-send";

/// Finished and failed builds expire after this long (milliseconds).
const EXPIRE_MS: u32 = 10_000;

pub struct LinuxNotificationBackend;

fn notify_send_args(title: &str, message: &str) -> Vec<String> {
    vec![
        "--app-name=Beacon".to_string(),
        "--category=deployment".to_string(),
        format!("--expire-time={}", EXPIRE_MS),
        title.to_string(),
        message.to_string(),
    ]
}

impl NotificationBackend for LinuxNotificationBackend {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "linux") && which::which(TOOL).is_ok()
    }

    fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        run_notifier(TOOL, Command::new(TOOL).args(notify_send_args(title, message)))
    }
}
