//! The sync session: composition root of the engine.
//!
//! A [`SyncSession`] owns every piece of mutable polling state (the retained
//! snapshot, the previous-status table, the window, the scheduler and the
//! per-account backoff). It runs as a single task fed by one trigger
//! channel, so refreshes never overlap:
//!
//! 1. Collect: fetch every account in turn. Nothing is mutated, so a stop
//!    during this phase leaves the session exactly as it was.
//! 2. Commit: merge, diff, notify, reconcile the scheduler, update the
//!    indicator and replace the snapshot. Commit is never raced against
//!    stop; its only awaits are notification sends on the blocking pool.
//!
//! Triggers that arrive while a refresh is in flight are drained afterwards.
//! Timer ticks among them are dropped; everything else collapses into at
//! most one follow-up refresh.

pub mod handle;
pub mod indicator;

pub use handle::SessionHandle;
pub use indicator::{BuildIndicator, IndicatorError, NoopIndicator};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use beacon_config::{AccountConfig, BeaconConfig};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backoff::AccountBackoff;
use crate::deployments::{CanonicalStatus, Snapshot, UnifiedDeployment, sort_most_recent_first};
use crate::detect::TransitionDetector;
use crate::notify::{NotificationBackend, NotificationDispatcher};
use crate::pagination::PaginationManager;
use crate::providers::{DeploymentSource, ProviderError};
use crate::scheduler::{AdaptiveScheduler, CadenceState};

/// Reasons to refresh, delivered on the session's trigger channel.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Scheduler tick.
    Timer,
    /// Explicit user refresh.
    Refresh,
    /// Grow the window, then refresh.
    LoadMore,
    /// The user came back; refresh right away.
    VisibilityRegained,
    /// Replace the polled accounts and start over from a fresh baseline.
    SetAccounts(Vec<AccountConfig>),
}

/// Tunables for one session, usually taken from [`BeaconConfig`].
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub active_interval: Duration,
    pub idle_interval: Option<Duration>,
    pub initial_window: usize,
    pub page_increment: usize,
    pub prune_after_missed: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub notifications_enabled: bool,
}

impl SessionSettings {
    pub fn from_config(config: &BeaconConfig) -> Self {
        Self {
            active_interval: Duration::from_secs(config.polling.active_interval_secs()),
            idle_interval: config
                .polling
                .idle_interval_secs()
                .map(Duration::from_secs),
            initial_window: config.polling.initial_window(),
            page_increment: config.polling.page_increment(),
            prune_after_missed: config.polling.prune_after_missed(),
            backoff_base: Duration::from_secs(config.backoff.base_secs()),
            backoff_max: Duration::from_secs(config.backoff.max_secs()),
            notifications_enabled: config.notifications.enabled(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&BeaconConfig::default())
    }
}

/// What observers see after each completed refresh.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub snapshot: Snapshot,
    pub window: usize,
    pub has_more: bool,
    pub building: bool,
    /// Number of completed refreshes that published this view.
    pub generation: u64,
}

enum FetchOutcome {
    Fetched(Vec<UnifiedDeployment>),
    Failed(ProviderError),
    BackedOff,
}

struct AccountOutcome {
    account_id: String,
    outcome: FetchOutcome,
}

/// Summary of one committed refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub fetched_accounts: usize,
    pub failed_accounts: usize,
    pub transitions: usize,
    pub notifications: usize,
    /// False when every account failed and the previous snapshot was kept.
    pub snapshot_replaced: bool,
}

pub struct SyncSession {
    accounts: Vec<AccountConfig>,
    source: Arc<dyn DeploymentSource>,
    dispatcher: NotificationDispatcher,
    indicator: Arc<dyn BuildIndicator>,
    detector: TransitionDetector,
    pagination: PaginationManager,
    scheduler: AdaptiveScheduler,
    backoff: AccountBackoff,
    snapshot: Snapshot,
    has_completed: bool,
    generation: u64,
    last_report: Option<RefreshReport>,
    triggers_tx: mpsc::UnboundedSender<Trigger>,
    triggers_rx: mpsc::UnboundedReceiver<Trigger>,
    cancel: CancellationToken,
    view_tx: watch::Sender<SessionView>,
}

impl SyncSession {
    /// Must be called inside a tokio runtime: the scheduler spawns its timer there.
    pub fn new(
        accounts: Vec<AccountConfig>,
        settings: SessionSettings,
        source: Arc<dyn DeploymentSource>,
        notifier: Arc<dyn NotificationBackend>,
        indicator: Arc<dyn BuildIndicator>,
    ) -> Self {
        let (triggers_tx, triggers_rx) = mpsc::unbounded_channel();
        let pagination = PaginationManager::new(settings.initial_window, settings.page_increment);
        let (view_tx, _) = watch::channel(SessionView {
            window: pagination.window(),
            has_more: true,
            ..Default::default()
        });

        Self {
            accounts,
            source,
            dispatcher: NotificationDispatcher::new(notifier, settings.notifications_enabled),
            indicator,
            detector: TransitionDetector::new(settings.prune_after_missed),
            pagination,
            scheduler: AdaptiveScheduler::new(
                settings.active_interval,
                settings.idle_interval,
                triggers_tx.clone(),
            ),
            backoff: AccountBackoff::new(settings.backoff_base, settings.backoff_max),
            snapshot: Vec::new(),
            has_completed: false,
            generation: 0,
            last_report: None,
            triggers_tx,
            triggers_rx,
            cancel: CancellationToken::new(),
            view_tx,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(
            self.triggers_tx.clone(),
            self.cancel.clone(),
            self.view_tx.subscribe(),
        )
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn accounts(&self) -> &[AccountConfig] {
        &self.accounts
    }

    pub fn window(&self) -> usize {
        self.pagination.window()
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn has_completed(&self) -> bool {
        self.has_completed
    }

    pub fn cadence(&self) -> CadenceState {
        self.scheduler.state()
    }

    pub fn scheduler(&self) -> &AdaptiveScheduler {
        &self.scheduler
    }

    pub fn tracked_deployments(&self) -> usize {
        self.detector.len()
    }

    pub fn last_report(&self) -> Option<&RefreshReport> {
        self.last_report.as_ref()
    }

    /// Fetch every account once and commit the result.
    ///
    /// `explicit_window` overrides the session window for this one fetch
    /// without changing it.
    pub async fn refresh(&mut self, explicit_window: Option<usize>) -> Snapshot {
        let window = explicit_window.unwrap_or_else(|| self.pagination.window());
        let outcomes = self.collect(window).await;
        self.commit(outcomes, window).await;
        self.snapshot.clone()
    }

    /// Grow the window by one increment. The next refresh requests it.
    pub fn load_more(&mut self) -> usize {
        let window = self.pagination.load_more();
        info!(event = "core.sync.load_more_applied", window = window);
        window
    }

    /// Replace the polled accounts and reset window, history and baseline.
    pub fn set_accounts(&mut self, accounts: Vec<AccountConfig>) {
        info!(event = "core.sync.scope_changed", accounts = accounts.len());
        self.accounts = accounts;
        self.pagination.reset();
        self.detector.clear();
        self.backoff.clear();
        self.snapshot.clear();
        self.has_completed = false;
    }

    /// Error log text for a deployment owned by `account_id`.
    pub async fn fetch_error_logs_text(
        &self,
        deployment_id: &str,
        account_id: &str,
    ) -> Result<String, ProviderError> {
        crate::providers::fetch_error_logs_text(
            self.source.as_ref(),
            &self.accounts,
            deployment_id,
            account_id,
        )
        .await
    }

    /// Run until stopped: refresh once, then serve triggers.
    ///
    /// Returns the session so callers can inspect its final state.
    pub async fn run(mut self) -> Self {
        info!(event = "core.sync.session_started", accounts = self.accounts.len());
        let cancel = self.cancel.clone();

        let mut pending = Some(Trigger::Refresh);
        'session: loop {
            while let Some(trigger) = pending.take() {
                self.apply(trigger);

                let window = self.pagination.window();
                let outcomes = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!(event = "core.sync.refresh_abandoned");
                        break 'session;
                    }
                    outcomes = self.collect(window) => outcomes,
                };
                self.commit(outcomes, window).await;

                if self.drain_pending() {
                    pending = Some(Trigger::Refresh);
                }
            }

            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'session,
                next = self.triggers_rx.recv() => next,
            };
            match next {
                Some(trigger) => pending = Some(trigger),
                None => break 'session,
            }
        }

        self.scheduler.stop();
        info!(event = "core.sync.session_stopped", generation = self.generation);
        self
    }

    /// Apply the non-refresh part of a trigger.
    fn apply(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Timer | Trigger::Refresh | Trigger::VisibilityRegained => {}
            Trigger::LoadMore => {
                self.load_more();
            }
            Trigger::SetAccounts(accounts) => self.set_accounts(accounts),
        }
    }

    /// Consume triggers queued during a refresh. Returns whether a
    /// follow-up refresh is needed.
    fn drain_pending(&mut self) -> bool {
        let mut follow_up = false;
        while let Ok(trigger) = self.triggers_rx.try_recv() {
            match trigger {
                Trigger::Timer => {
                    debug!(event = "core.sync.timer_tick_dropped");
                }
                other => {
                    self.apply(other);
                    follow_up = true;
                }
            }
        }
        follow_up
    }

    /// Fetch every account in order. Never mutates the session.
    async fn collect(&self, window: usize) -> Vec<AccountOutcome> {
        info!(
            event = "core.sync.refresh_started",
            accounts = self.accounts.len(),
            window = window
        );

        let now = Instant::now();
        let mut outcomes = Vec::with_capacity(self.accounts.len());
        for account in &self.accounts {
            let outcome = if self.backoff.is_backed_off(&account.id, now) {
                FetchOutcome::BackedOff
            } else {
                match self.source.fetch(account, window).await {
                    Ok(deployments) => FetchOutcome::Fetched(deployments),
                    Err(e) => FetchOutcome::Failed(e),
                }
            };
            outcomes.push(AccountOutcome {
                account_id: account.id.clone(),
                outcome,
            });
        }
        outcomes
    }

    /// Apply fetched outcomes. Runs to completion once started; the only
    /// awaits are notification sends.
    async fn commit(&mut self, outcomes: Vec<AccountOutcome>, window: usize) -> RefreshReport {
        let now = Instant::now();
        let mut fetched_accounts = HashSet::new();
        let mut merged = Vec::new();
        let mut failed = 0usize;

        for AccountOutcome {
            account_id,
            outcome,
        } in outcomes
        {
            match outcome {
                FetchOutcome::Fetched(deployments) => {
                    self.backoff.record_success(&account_id);
                    merged.extend(deployments);
                    fetched_accounts.insert(account_id);
                }
                FetchOutcome::Failed(e) => {
                    failed += 1;
                    let delay = self.backoff.record_failure(&account_id, now);
                    warn!(
                        event = "core.sync.fetch_failed",
                        account = %account_id,
                        error = %e,
                        backoff_secs = delay.as_secs()
                    );
                }
                FetchOutcome::BackedOff => {
                    failed += 1;
                    debug!(event = "core.sync.fetch_skipped", account = %account_id, reason = "backoff");
                }
            }
        }

        if fetched_accounts.is_empty() && !self.accounts.is_empty() {
            warn!(
                event = "core.sync.refresh_failed",
                accounts = self.accounts.len(),
                reason = "every account failed, keeping previous snapshot"
            );
            let report = RefreshReport {
                fetched_accounts: 0,
                failed_accounts: failed,
                transitions: 0,
                notifications: 0,
                snapshot_replaced: false,
            };
            self.last_report = Some(report.clone());
            return report;
        }

        let returned = merged.len();
        sort_most_recent_first(&mut merged);
        merged.truncate(window);

        let is_baseline = !self.has_completed;
        let events = self.detector.diff(&merged, is_baseline);
        self.detector.prune(&merged, &fetched_accounts);
        if !fetched_accounts.is_empty() {
            self.has_completed = true;
        }

        let notifications = self.dispatcher.dispatch(&events).await;
        self.scheduler.reconcile(&merged);

        let building = merged.iter().find(|d| {
            matches!(
                d.canonical_status,
                CanonicalStatus::Building | CanonicalStatus::Queued
            )
        });
        if let Err(e) = self
            .indicator
            .update(building.is_some(), building.map(|d| d.name.as_str()))
        {
            warn!(event = "core.sync.indicator_update_failed", error = %e);
        }

        self.pagination.record(returned, window);
        self.snapshot = merged;
        self.generation += 1;
        self.publish();

        let report = RefreshReport {
            fetched_accounts: fetched_accounts.len(),
            failed_accounts: failed,
            transitions: events.len(),
            notifications,
            snapshot_replaced: true,
        };
        info!(
            event = "core.sync.refresh_completed",
            deployments = self.snapshot.len(),
            fetched = report.fetched_accounts,
            failed = report.failed_accounts,
            transitions = report.transitions,
            notifications = report.notifications,
            baseline = is_baseline,
            cadence = ?self.scheduler.state()
        );
        self.last_report = Some(report.clone());
        report
    }

    fn publish(&self) {
        let view = SessionView {
            snapshot: self.snapshot.clone(),
            window: self.pagination.window(),
            has_more: self.pagination.has_more(),
            building: self.scheduler.state() == CadenceState::Active,
            generation: self.generation,
        };
        self.view_tx.send_replace(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_default_config() {
        let settings = SessionSettings::default();
        assert_eq!(settings.active_interval, Duration::from_secs(10));
        assert_eq!(settings.idle_interval, None);
        assert_eq!(settings.initial_window, 8);
        assert_eq!(settings.page_increment, 8);
        assert_eq!(settings.prune_after_missed, 20);
        assert_eq!(settings.backoff_base, Duration::from_secs(10));
        assert_eq!(settings.backoff_max, Duration::from_secs(300));
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_settings_from_config_overrides() {
        let mut config = BeaconConfig::default();
        config.polling.active_interval_secs = Some(3);
        config.polling.idle_interval_secs = Some(90);
        config.notifications.enabled = Some(false);
        let settings = SessionSettings::from_config(&config);
        assert_eq!(settings.active_interval, Duration::from_secs(3));
        assert_eq!(settings.idle_interval, Some(Duration::from_secs(90)));
        assert!(!settings.notifications_enabled);
    }
}
