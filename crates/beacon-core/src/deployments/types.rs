use std::fmt;

use beacon_config::ProviderKind;
use serde::{Deserialize, Serialize};

/// Closed set of deployment statuses every provider vocabulary maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalStatus {
    Ready,
    Building,
    Queued,
    Error,
    Canceled,
    Unknown,
}

impl CanonicalStatus {
    pub fn all() -> &'static [CanonicalStatus] {
        &[
            CanonicalStatus::Ready,
            CanonicalStatus::Building,
            CanonicalStatus::Queued,
            CanonicalStatus::Error,
            CanonicalStatus::Canceled,
            CanonicalStatus::Unknown,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::Ready => "READY",
            CanonicalStatus::Building => "BUILDING",
            CanonicalStatus::Queued => "QUEUED",
            CanonicalStatus::Error => "ERROR",
            CanonicalStatus::Canceled => "CANCELED",
            CanonicalStatus::Unknown => "UNKNOWN",
        }
    }

    /// Building and queued deployments keep the scheduler in its fast cadence.
    pub fn is_active(&self) -> bool {
        matches!(self, CanonicalStatus::Building | CanonicalStatus::Queued)
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global identity of a deployment: ids are only unique within a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentKey {
    pub provider: ProviderKind,
    pub id: String,
}

impl DeploymentKey {
    pub fn new(provider: ProviderKind, id: impl Into<String>) -> Self {
        Self {
            provider,
            id: id.into(),
        }
    }
}

impl fmt::Display for DeploymentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.id)
    }
}

/// One observed deployment, normalized from a provider record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedDeployment {
    pub id: String,
    pub provider: ProviderKind,
    pub name: String,
    pub url: Option<String>,
    /// Raw provider status, verbatim.
    pub status: String,
    pub canonical_status: CanonicalStatus,
    /// Creation time in epoch milliseconds.
    pub created_at: Option<i64>,
    pub commit_message: Option<String>,
    pub branch: Option<String>,
    pub project_id: Option<String>,
    pub service_id: Option<String>,
    pub team_slug: Option<String>,
    pub account_id: String,
}

impl UnifiedDeployment {
    pub fn key(&self) -> DeploymentKey {
        DeploymentKey::new(self.provider, self.id.clone())
    }

    /// Link to the deployment in the provider's web dashboard.
    ///
    /// Vercel links need the team slug and fall back to the deployment URL.
    /// Railway links need both project and service ids.
    pub fn dashboard_url(&self) -> Option<String> {
        match self.provider {
            ProviderKind::Vercel => match &self.team_slug {
                Some(slug) => Some(format!(
                    "https://vercel.com/{}/{}/{}",
                    slug,
                    self.name,
                    self.id.trim_start_matches("dpl_")
                )),
                None => self.url.as_ref().map(|url| absolute_url(url)),
            },
            ProviderKind::Railway => match (&self.project_id, &self.service_id) {
                (Some(project), Some(service)) => Some(format!(
                    "https://railway.com/project/{}/service/{}",
                    project, service
                )),
                _ => None,
            },
        }
    }
}

fn absolute_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Ordered deployments, most recent first, bounded by the session window.
pub type Snapshot = Vec<UnifiedDeployment>;

/// Stable sort by `created_at` descending. Records without a timestamp keep
/// their relative order after every timestamped record.
pub fn sort_most_recent_first(deployments: &mut [UnifiedDeployment]) {
    deployments.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// A canonical status change of a previously seen deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvent {
    pub deployment_id: String,
    pub from: CanonicalStatus,
    pub to: CanonicalStatus,
    pub deployment: UnifiedDeployment,
}

impl TransitionEvent {
    /// Finished builds and failures deserve a notification.
    pub fn is_notable(&self) -> bool {
        (self.from == CanonicalStatus::Building && self.to == CanonicalStatus::Ready)
            || self.to == CanonicalStatus::Error
    }
}
