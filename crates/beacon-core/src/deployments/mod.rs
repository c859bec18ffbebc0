//! Unified deployment model shared by every provider.

pub mod types;

pub use types::{
    CanonicalStatus, DeploymentKey, Snapshot, TransitionEvent, UnifiedDeployment,
    sort_most_recent_first,
};
