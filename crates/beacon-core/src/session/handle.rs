use beacon_config::AccountConfig;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::session::{SessionView, Trigger};

/// Cloneable control surface for a running [`SyncSession`](super::SyncSession).
///
/// Every method only enqueues a trigger; the session task applies them in
/// order and never runs two refreshes at once.
#[derive(Clone)]
pub struct SessionHandle {
    triggers: mpsc::UnboundedSender<Trigger>,
    cancel: CancellationToken,
    view: watch::Receiver<SessionView>,
}

impl SessionHandle {
    pub(crate) fn new(
        triggers: mpsc::UnboundedSender<Trigger>,
        cancel: CancellationToken,
        view: watch::Receiver<SessionView>,
    ) -> Self {
        Self {
            triggers,
            cancel,
            view,
        }
    }

    pub fn refresh(&self) {
        self.send(Trigger::Refresh);
    }

    /// Grow the window by one page and refresh.
    pub fn load_more(&self) {
        self.send(Trigger::LoadMore);
    }

    /// The user is looking again (window focused, terminal resumed).
    pub fn visibility_regained(&self) {
        self.send(Trigger::VisibilityRegained);
    }

    /// Replace the polled accounts. Resets window, history and baseline.
    pub fn set_accounts(&self, accounts: Vec<AccountConfig>) {
        self.send(Trigger::SetAccounts(accounts));
    }

    /// Stop the session. An in-flight fetch is abandoned without committing.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Receiver that observes the view published after each completed refresh.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    fn send(&self, trigger: Trigger) {
        if self.triggers.send(trigger).is_err() {
            debug!(event = "core.sync.trigger_dropped", reason = "session ended");
        }
    }
}
