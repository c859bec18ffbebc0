//! Snapshot diffing against the retained previous-status table.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::deployments::{CanonicalStatus, DeploymentKey, TransitionEvent, UnifiedDeployment};

#[derive(Debug, Clone)]
struct TrackedStatus {
    status: CanonicalStatus,
    account_id: String,
    /// Consecutive successful snapshots of the owning account without this deployment.
    missed: u32,
}

/// Previous-status table keyed by deployment identity.
///
/// Events are produced only for identities already in the table whose
/// canonical status changed. First sightings and disappearances are silent.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    entries: HashMap<DeploymentKey, TrackedStatus>,
    prune_after_missed: u32,
}

impl TransitionDetector {
    /// `prune_after_missed == 0` keeps entries forever.
    pub fn new(prune_after_missed: u32) -> Self {
        Self {
            entries: HashMap::new(),
            prune_after_missed,
        }
    }

    /// Diff `current` against the table, then record every status in it.
    ///
    /// A baseline diff populates the table and yields nothing.
    pub fn diff(&mut self, current: &[UnifiedDeployment], is_baseline: bool) -> Vec<TransitionEvent> {
        let mut events = Vec::new();

        for deployment in current {
            let key = deployment.key();
            let to = deployment.canonical_status;

            if !is_baseline
                && let Some(previous) = self.entries.get(&key)
                && previous.status != to
            {
                debug!(
                    event = "core.detect.transition_detected",
                    deployment = %key,
                    from = %previous.status,
                    to = %to
                );
                events.push(TransitionEvent {
                    deployment_id: deployment.id.clone(),
                    from: previous.status,
                    to,
                    deployment: deployment.clone(),
                });
            }

            self.entries.insert(
                key,
                TrackedStatus {
                    status: to,
                    account_id: deployment.account_id.clone(),
                    missed: 0,
                },
            );
        }

        events
    }

    /// Age out entries missing from `current`.
    ///
    /// Only entries owned by an account in `fetched_accounts` accrue a miss,
    /// so a failing or backed-off account never loses its history.
    pub fn prune(&mut self, current: &[UnifiedDeployment], fetched_accounts: &HashSet<String>) {
        if self.prune_after_missed == 0 {
            return;
        }

        let present: HashSet<DeploymentKey> = current.iter().map(|d| d.key()).collect();
        let limit = self.prune_after_missed;
        let before = self.entries.len();

        self.entries.retain(|key, entry| {
            if present.contains(key) || !fetched_accounts.contains(&entry.account_id) {
                return true;
            }
            entry.missed += 1;
            entry.missed < limit
        });

        let pruned = before - self.entries.len();
        if pruned > 0 {
            debug!(
                event = "core.detect.prune_completed",
                pruned = pruned,
                remaining = self.entries.len()
            );
        }
    }

    pub fn status_of(&self, key: &DeploymentKey) -> Option<CanonicalStatus> {
        self.entries.get(key).map(|e| e.status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployments::types::test_support::deployment;
    use beacon_config::ProviderKind;

    fn accounts(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_baseline_produces_no_events() {
        let mut detector = TransitionDetector::new(0);
        let events = detector.diff(&[deployment("d1", CanonicalStatus::Building)], true);
        assert!(events.is_empty());
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_first_sighting_after_baseline_is_silent() {
        let mut detector = TransitionDetector::new(0);
        detector.diff(&[], true);
        let events = detector.diff(&[deployment("d2", CanonicalStatus::Queued)], false);
        assert!(events.is_empty());
        assert_eq!(
            detector.status_of(&DeploymentKey::new(ProviderKind::Vercel, "d2")),
            Some(CanonicalStatus::Queued)
        );
    }

    #[test]
    fn test_single_fire() {
        let mut detector = TransitionDetector::new(0);
        detector.diff(&[deployment("d1", CanonicalStatus::Building)], true);

        let changed = [deployment("d1", CanonicalStatus::Ready)];
        let first = detector.diff(&changed, false);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].deployment_id, "d1");
        assert_eq!(first[0].from, CanonicalStatus::Building);
        assert_eq!(first[0].to, CanonicalStatus::Ready);

        let second = detector.diff(&changed, false);
        assert!(second.is_empty());
    }

    #[test]
    fn test_events_follow_snapshot_order() {
        let mut detector = TransitionDetector::new(0);
        detector.diff(
            &[
                deployment("a", CanonicalStatus::Queued),
                deployment("b", CanonicalStatus::Building),
            ],
            true,
        );
        let events = detector.diff(
            &[
                deployment("b", CanonicalStatus::Error),
                deployment("a", CanonicalStatus::Building),
            ],
            false,
        );
        let ids: Vec<&str> = events.iter().map(|e| e.deployment_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_disappearance_is_not_a_transition() {
        let mut detector = TransitionDetector::new(0);
        detector.diff(&[deployment("d1", CanonicalStatus::Building)], true);
        let events = detector.diff(&[], false);
        assert!(events.is_empty());

        // Reappearing with the old status is also silent.
        let events = detector.diff(&[deployment("d1", CanonicalStatus::Building)], false);
        assert!(events.is_empty());
    }

    #[test]
    fn test_same_id_different_provider_is_separate_identity() {
        let mut detector = TransitionDetector::new(0);
        detector.diff(&[deployment("x", CanonicalStatus::Building)], true);

        let mut railway = deployment("x", CanonicalStatus::Ready);
        railway.provider = ProviderKind::Railway;
        let events = detector.diff(&[railway], false);
        assert!(events.is_empty());
        assert_eq!(detector.len(), 2);
    }

    #[test]
    fn test_prune_after_consecutive_misses() {
        let mut detector = TransitionDetector::new(2);
        let seen = [deployment("d1", CanonicalStatus::Ready)];
        detector.diff(&seen, true);

        detector.diff(&[], false);
        detector.prune(&[], &accounts(&["acct"]));
        assert_eq!(detector.len(), 1);

        detector.diff(&[], false);
        detector.prune(&[], &accounts(&["acct"]));
        assert!(detector.is_empty());
    }

    #[test]
    fn test_reappearance_resets_miss_count() {
        let mut detector = TransitionDetector::new(2);
        let seen = [deployment("d1", CanonicalStatus::Ready)];
        detector.diff(&seen, true);

        detector.prune(&[], &accounts(&["acct"]));
        detector.diff(&seen, false);
        detector.prune(&seen, &accounts(&["acct"]));
        detector.prune(&[], &accounts(&["acct"]));
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_failed_account_entries_never_pruned() {
        let mut detector = TransitionDetector::new(1);
        detector.diff(&[deployment("d1", CanonicalStatus::Building)], true);

        for _ in 0..5 {
            detector.prune(&[], &accounts(&["other"]));
        }
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn test_prune_disabled() {
        let mut detector = TransitionDetector::new(0);
        detector.diff(&[deployment("d1", CanonicalStatus::Ready)], true);
        for _ in 0..100 {
            detector.prune(&[], &accounts(&["acct"]));
        }
        assert_eq!(detector.len(), 1);
    }
}
