//! Provider adapter trait definition.

use async_trait::async_trait;
use beacon_config::{AccountConfig, ProviderKind};

use crate::deployments::UnifiedDeployment;
use crate::providers::errors::ProviderError;

/// Trait defining the interface for deployment provider adapters.
///
/// Each supported provider (Vercel, Railway) implements this trait to fetch
/// raw deployment records and map them into [`UnifiedDeployment`].
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The provider this adapter serves.
    fn kind(&self) -> ProviderKind;

    /// Fetch up to `window` most recent deployments for `account`.
    ///
    /// Records that fail to map are logged and skipped; only transport,
    /// authentication and response-level failures return an error.
    async fn fetch(
        &self,
        account: &AccountConfig,
        window: usize,
    ) -> Result<Vec<UnifiedDeployment>, ProviderError>;

    /// Build log text for one deployment: the error lines if there are any,
    /// otherwise every line.
    async fn fetch_error_logs_text(
        &self,
        account: &AccountConfig,
        deployment_id: &str,
    ) -> Result<String, ProviderError>;
}
