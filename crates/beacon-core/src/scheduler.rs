//! Adaptive polling cadence.
//!
//! While any deployment is building or queued the scheduler keeps one
//! recurring timer armed that feeds [`Trigger::Timer`] into the session's
//! trigger channel. When nothing is in flight the timer is cancelled, or
//! re-armed at the slow idle cadence when one is configured.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::deployments::UnifiedDeployment;
use crate::session::Trigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceState {
    Idle,
    Active,
}

/// Owns a spawned timer task. Dropping the guard cancels the task.
struct TimerGuard {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.token.cancel();
        self.handle.abort();
    }
}

/// Decrements the live-timer count when the timer future is dropped,
/// whether it finished, was aborted, or never ran.
struct LiveTimer(Arc<AtomicUsize>);

impl Drop for LiveTimer {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct AdaptiveScheduler {
    state: CadenceState,
    active_interval: Duration,
    idle_interval: Option<Duration>,
    triggers: UnboundedSender<Trigger>,
    timer: Option<TimerGuard>,
    armed_interval: Option<Duration>,
    live_timers: Arc<AtomicUsize>,
}

impl AdaptiveScheduler {
    pub fn new(
        active_interval: Duration,
        idle_interval: Option<Duration>,
        triggers: UnboundedSender<Trigger>,
    ) -> Self {
        Self {
            state: CadenceState::Idle,
            active_interval,
            idle_interval,
            triggers,
            timer: None,
            armed_interval: None,
            live_timers: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> CadenceState {
        self.state
    }

    /// Interval of the armed timer, if any.
    pub fn armed_interval(&self) -> Option<Duration> {
        self.armed_interval
    }

    /// Number of timer tasks still alive. Never more than one once
    /// cancelled tasks have been dropped by the runtime.
    pub fn live_timers(&self) -> usize {
        self.live_timers.load(Ordering::SeqCst)
    }

    /// Pick the cadence for a completed snapshot and (re)arm or cancel the timer.
    ///
    /// Every call restarts the period, so the next tick is one full interval
    /// after the refresh that produced `snapshot`.
    pub fn reconcile(&mut self, snapshot: &[UnifiedDeployment]) -> CadenceState {
        let building = snapshot
            .iter()
            .filter(|d| d.canonical_status.is_active())
            .count();
        let previous = self.state;

        if building > 0 {
            self.state = CadenceState::Active;
            self.arm(self.active_interval);
        } else {
            self.state = CadenceState::Idle;
            match self.idle_interval {
                Some(interval) => self.arm(interval),
                None => self.cancel(),
            }
        }

        if previous != self.state {
            debug!(
                event = "core.scheduler.state_changed",
                from = ?previous,
                to = ?self.state,
                building = building
            );
        }
        self.state
    }

    /// Cancel any timer and return to idle.
    pub fn stop(&mut self) {
        self.cancel();
        self.state = CadenceState::Idle;
    }

    fn cancel(&mut self) {
        if self.timer.take().is_some() {
            debug!(event = "core.scheduler.timer_cancelled");
        }
        self.armed_interval = None;
    }

    fn arm(&mut self, period: Duration) {
        // Drop the old guard first so two timers never run together.
        self.timer = None;

        let token = CancellationToken::new();
        let child = token.clone();
        let triggers = self.triggers.clone();
        self.live_timers.fetch_add(1, Ordering::SeqCst);
        let live = LiveTimer(self.live_timers.clone());

        let handle = tokio::spawn(async move {
            let _live = live;
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        if triggers.send(Trigger::Timer).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        debug!(
            event = "core.scheduler.timer_armed",
            interval_ms = period.as_millis() as u64
        );
        self.timer = Some(TimerGuard { token, handle });
        self.armed_interval = Some(period);
    }
}

impl Drop for AdaptiveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
