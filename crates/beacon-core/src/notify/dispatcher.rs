use std::sync::Arc;

use tracing::{info, warn};

use crate::deployments::{CanonicalStatus, TransitionEvent, UnifiedDeployment};
use crate::notify::errors::NotifyError;
use crate::notify::traits::NotificationBackend;

const BODY_PLACEHOLDER: &str = "No commit details";

/// Sends one notification per notable transition.
pub struct NotificationDispatcher {
    backend: Arc<dyn NotificationBackend>,
    enabled: bool,
}

impl NotificationDispatcher {
    pub fn new(backend: Arc<dyn NotificationBackend>, enabled: bool) -> Self {
        Self { backend, enabled }
    }

    /// Notify for every notable event, in order. Returns how many were sent.
    ///
    /// Backends shell out to `notify-send`/`osascript`, so each send runs on
    /// the blocking pool and is awaited before the next one. A failed send is
    /// logged and the rest of the batch still goes out.
    pub async fn dispatch(&self, events: &[TransitionEvent]) -> usize {
        if !self.enabled {
            return 0;
        }

        let mut sent = 0;
        for event in events.iter().filter(|e| e.is_notable()) {
            let title = notification_title(event);
            let body = notification_body(&event.deployment);

            let backend = Arc::clone(&self.backend);
            let send_title = title.clone();
            let result = tokio::task::spawn_blocking(move || backend.send(&send_title, &body))
                .await
                .unwrap_or_else(|e| {
                    Err(NotifyError::SendFailed {
                        message: format!("notification task failed: {}", e),
                    })
                });

            match result {
                Ok(()) => {
                    sent += 1;
                    info!(
                        event = "core.notify.send_completed",
                        deployment = %event.deployment.key(),
                        title = %title,
                    );
                }
                Err(e) => {
                    warn!(
                        event = "core.notify.send_failed",
                        deployment = %event.deployment.key(),
                        title = %title,
                        error = %e,
                    );
                }
            }
        }
        sent
    }
}

/// e.g. "web deployed on Vercel", "shop / api failed on Railway".
pub fn notification_title(event: &TransitionEvent) -> String {
    let outcome = match event.to {
        CanonicalStatus::Error => "failed",
        _ => "deployed",
    };
    format!(
        "{} {} on {}",
        event.deployment.name,
        outcome,
        event.deployment.provider.display_name()
    )
}

/// "branch: commit message", degrading to whichever part exists, then the
/// deployment name, then a fixed placeholder.
pub fn notification_body(deployment: &UnifiedDeployment) -> String {
    let branch = deployment.branch.as_deref().filter(|s| !s.is_empty());
    let message = deployment
        .commit_message
        .as_deref()
        .and_then(|m| m.lines().next())
        .filter(|s| !s.is_empty());

    match (branch, message) {
        (Some(branch), Some(message)) => format!("{}: {}", branch, message),
        (Some(branch), None) => branch.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) if !deployment.name.is_empty() => deployment.name.clone(),
        (None, None) => BODY_PLACEHOLDER.to_string(),
    }
}
