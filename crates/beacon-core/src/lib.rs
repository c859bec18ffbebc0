//! beacon-core: Deployment synchronization engine
//!
//! Polls deployment lists from every configured provider account, collapses
//! provider vocabularies into one canonical status set, diffs consecutive
//! snapshots into transition events and notifies the user of finished and
//! failed builds. It is used by the `beacon` CLI.
//!
//! # Main Entry Points
//!
//! - [`session`] - The sync session actor and its handle
//! - [`providers`] - Vercel and Railway adapters
//! - [`detect`] - Snapshot diffing
//! - [`notify`] - Desktop notification dispatch
//! - [`scheduler`] - Adaptive polling cadence

pub mod backoff;
pub mod deployments;
pub mod detect;
pub mod errors;
pub mod logging;
pub mod notify;
pub mod pagination;
pub mod providers;
pub mod scheduler;
pub mod session;
pub mod status;

// Re-export config types from beacon-config
pub use beacon_config::{
    AccountConfig, BackoffConfig, BeaconConfig, ConfigError, NotificationConfig, PollingConfig,
    ProviderKind,
};

pub use deployments::{CanonicalStatus, DeploymentKey, Snapshot, TransitionEvent, UnifiedDeployment};
pub use detect::TransitionDetector;
pub use errors::{BeaconError, BeaconResult};
pub use notify::{NotificationBackend, NotificationDispatcher, Notifier, NotifyError};
pub use pagination::PaginationManager;
pub use providers::{DeploymentSource, ProviderAdapter, ProviderError, ProviderSource};
pub use scheduler::{AdaptiveScheduler, CadenceState};
pub use session::{
    BuildIndicator, IndicatorError, NoopIndicator, RefreshReport, SessionHandle, SessionSettings,
    SessionView, SyncSession, Trigger,
};
pub use status::normalize;

// Re-export logging initialization
pub use logging::init_logging;
