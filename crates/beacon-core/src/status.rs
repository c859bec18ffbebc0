//! Collapse provider status vocabularies into [`CanonicalStatus`].

use beacon_config::ProviderKind;

use crate::deployments::CanonicalStatus;

/// Normalize a raw provider status. Total and case-insensitive; anything
/// unrecognized is `Unknown`.
pub fn normalize(raw: &str, provider: ProviderKind) -> CanonicalStatus {
    let upper = raw.trim().to_ascii_uppercase();
    match provider {
        ProviderKind::Vercel => vercel_status(&upper),
        ProviderKind::Railway => railway_status(&upper),
    }
}

fn vercel_status(status: &str) -> CanonicalStatus {
    match status {
        "READY" => CanonicalStatus::Ready,
        "BUILDING" | "INITIALIZING" => CanonicalStatus::Building,
        "QUEUED" => CanonicalStatus::Queued,
        "ERROR" => CanonicalStatus::Error,
        "CANCELED" => CanonicalStatus::Canceled,
        _ => CanonicalStatus::Unknown,
    }
}

fn railway_status(status: &str) -> CanonicalStatus {
    match status {
        "SUCCESS" | "SLEEPING" | "READY" => CanonicalStatus::Ready,
        "BUILDING" | "DEPLOYING" | "INITIALIZING" => CanonicalStatus::Building,
        "QUEUED" | "WAITING" => CanonicalStatus::Queued,
        "FAILED" | "CRASHED" | "ERROR" => CanonicalStatus::Error,
        "REMOVED" | "REMOVING" | "SKIPPED" | "CANCELED" => CanonicalStatus::Canceled,
        _ => CanonicalStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vercel_vocabulary() {
        let cases = [
            ("READY", CanonicalStatus::Ready),
            ("BUILDING", CanonicalStatus::Building),
            ("INITIALIZING", CanonicalStatus::Building),
            ("QUEUED", CanonicalStatus::Queued),
            ("ERROR", CanonicalStatus::Error),
            ("CANCELED", CanonicalStatus::Canceled),
            ("DELETED", CanonicalStatus::Unknown),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize(raw, ProviderKind::Vercel), expected, "{}", raw);
        }
    }

    #[test]
    fn test_railway_vocabulary() {
        let cases = [
            ("SUCCESS", CanonicalStatus::Ready),
            ("SLEEPING", CanonicalStatus::Ready),
            ("DEPLOYING", CanonicalStatus::Building),
            ("BUILDING", CanonicalStatus::Building),
            ("INITIALIZING", CanonicalStatus::Building),
            ("WAITING", CanonicalStatus::Queued),
            ("QUEUED", CanonicalStatus::Queued),
            ("FAILED", CanonicalStatus::Error),
            ("CRASHED", CanonicalStatus::Error),
            ("REMOVED", CanonicalStatus::Canceled),
            ("REMOVING", CanonicalStatus::Canceled),
            ("SKIPPED", CanonicalStatus::Canceled),
            ("NEEDS_APPROVAL", CanonicalStatus::Unknown),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize(raw, ProviderKind::Railway), expected, "{}", raw);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(normalize("ready", ProviderKind::Vercel), CanonicalStatus::Ready);
        assert_eq!(normalize("Success", ProviderKind::Railway), CanonicalStatus::Ready);
        assert_eq!(normalize(" building ", ProviderKind::Vercel), CanonicalStatus::Building);
    }

    #[test]
    fn test_empty_is_unknown() {
        for provider in ProviderKind::all() {
            assert_eq!(normalize("", *provider), CanonicalStatus::Unknown);
        }
    }

    #[test]
    fn test_canonical_names_are_fixed_points() {
        for provider in ProviderKind::all() {
            for status in CanonicalStatus::all() {
                assert_eq!(normalize(status.as_str(), *provider), *status);
                let once = normalize(status.as_str(), *provider);
                assert_eq!(normalize(once.as_str(), *provider), once);
            }
        }
    }
}
