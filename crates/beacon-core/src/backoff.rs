//! Per-account exponential backoff after fetch failures.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct BackoffState {
    failures: u32,
    until: Instant,
}

/// Tracks consecutive fetch failures per account.
///
/// After the n-th consecutive failure an account is skipped for
/// `base * 2^(n-1)`, capped at `max`. A success clears it.
#[derive(Debug, Clone)]
pub struct AccountBackoff {
    base: Duration,
    max: Duration,
    states: HashMap<String, BackoffState>,
}

impl AccountBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            states: HashMap::new(),
        }
    }

    /// Delay applied after `failures` consecutive failures.
    pub fn delay_for(&self, failures: u32) -> Duration {
        if failures == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(failures - 1);
        self.base.saturating_mul(factor).min(self.max)
    }

    pub fn is_backed_off(&self, account_id: &str, now: Instant) -> bool {
        self.states
            .get(account_id)
            .is_some_and(|state| now < state.until)
    }

    /// Record a failure and return how long the account is now skipped.
    pub fn record_failure(&mut self, account_id: &str, now: Instant) -> Duration {
        let failures = self
            .states
            .get(account_id)
            .map_or(1, |state| state.failures.saturating_add(1));
        let delay = self.delay_for(failures);
        self.states.insert(
            account_id.to_string(),
            BackoffState {
                failures,
                until: now + delay,
            },
        );
        delay
    }

    pub fn record_success(&mut self, account_id: &str) {
        self.states.remove(account_id);
    }

    pub fn failures(&self, account_id: &str) -> u32 {
        self.states.get(account_id).map_or(0, |s| s.failures)
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff() -> AccountBackoff {
        AccountBackoff::new(Duration::from_secs(10), Duration::from_secs(300))
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let b = backoff();
        assert_eq!(b.delay_for(0), Duration::ZERO);
        assert_eq!(b.delay_for(1), Duration::from_secs(10));
        assert_eq!(b.delay_for(2), Duration::from_secs(20));
        assert_eq!(b.delay_for(3), Duration::from_secs(40));
        assert_eq!(b.delay_for(6), Duration::from_secs(300));
        assert_eq!(b.delay_for(60), Duration::from_secs(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_backs_off_until_deadline() {
        let mut b = backoff();
        let now = Instant::now();
        assert!(!b.is_backed_off("a", now));

        assert_eq!(b.record_failure("a", now), Duration::from_secs(10));
        assert!(b.is_backed_off("a", now));
        assert!(!b.is_backed_off("other", now));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!b.is_backed_off("a", Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_failures_grow_and_success_resets() {
        let mut b = backoff();
        let now = Instant::now();
        b.record_failure("a", now);
        assert_eq!(b.record_failure("a", now), Duration::from_secs(20));
        assert_eq!(b.failures("a"), 2);

        b.record_success("a");
        assert_eq!(b.failures("a"), 0);
        assert!(!b.is_backed_off("a", now));
        assert_eq!(b.record_failure("a", now), Duration::from_secs(10));
    }
}
