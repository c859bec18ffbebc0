use crate::errors::BeaconError;

/// Why a deploy alert could not be shown.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The platform notifier binary is not installed.
    #[error("Desktop notifier '{tool}' is not installed")]
    ToolNotFound { tool: String },

    #[error("Desktop notification failed: {message}")]
    SendFailed { message: String },
}

impl BeaconError for NotifyError {
    fn error_code(&self) -> &'static str {
        match self {
            NotifyError::ToolNotFound { .. } => "NOTIFY_TOOL_NOT_FOUND",
            NotifyError::SendFailed { .. } => "NOTIFY_SEND_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, NotifyError::ToolNotFound { .. })
    }
}
