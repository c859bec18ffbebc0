//! Deployment providers.
//!
//! Each provider kind has one [`ProviderAdapter`] in the [`registry`].
//! The sync session never talks to adapters directly; it goes through the
//! [`DeploymentSource`] seam so tests can substitute scripted sources.

pub mod backends;
pub mod errors;
pub mod logs;
pub mod registry;
pub mod traits;

pub use errors::{MappingError, ProviderError};
pub use traits::ProviderAdapter;

use std::time::Duration;

use async_trait::async_trait;
use beacon_config::AccountConfig;

use crate::deployments::UnifiedDeployment;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for all adapters.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("beacon/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(event = "core.provider.client_build_failed", error = %e);
            reqwest::Client::new()
        })
}

/// Per-account deployment fetching, as seen by the sync session.
#[async_trait]
pub trait DeploymentSource: Send + Sync {
    async fn fetch(
        &self,
        account: &AccountConfig,
        limit: usize,
    ) -> Result<Vec<UnifiedDeployment>, ProviderError>;

    async fn fetch_error_logs_text(
        &self,
        account: &AccountConfig,
        deployment_id: &str,
    ) -> Result<String, ProviderError>;
}

/// Production source: dispatches to the registered adapter for the account's provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderSource;

#[async_trait]
impl DeploymentSource for ProviderSource {
    async fn fetch(
        &self,
        account: &AccountConfig,
        limit: usize,
    ) -> Result<Vec<UnifiedDeployment>, ProviderError> {
        adapter_for(account)?.fetch(account, limit).await
    }

    async fn fetch_error_logs_text(
        &self,
        account: &AccountConfig,
        deployment_id: &str,
    ) -> Result<String, ProviderError> {
        adapter_for(account)?
            .fetch_error_logs_text(account, deployment_id)
            .await
    }
}

/// Route an error-log request to the source for the account that owns the deployment.
pub async fn fetch_error_logs_text(
    source: &dyn DeploymentSource,
    accounts: &[AccountConfig],
    deployment_id: &str,
    account_id: &str,
) -> Result<String, ProviderError> {
    let account = accounts
        .iter()
        .find(|a| a.id == account_id)
        .ok_or_else(|| ProviderError::UnknownAccount {
            account: account_id.to_string(),
        })?;
    source.fetch_error_logs_text(account, deployment_id).await
}

fn adapter_for(account: &AccountConfig) -> Result<&'static dyn ProviderAdapter, ProviderError> {
    registry::get_adapter(account.provider).ok_or_else(|| ProviderError::RequestFailed {
        provider: account.provider.display_name(),
        message: "no adapter registered".to_string(),
    })
}

/// Resolve the account token or fail with [`ProviderError::MissingToken`].
pub(crate) fn require_token(account: &AccountConfig) -> Result<String, ProviderError> {
    account
        .resolve_token()
        .ok_or_else(|| ProviderError::MissingToken {
            account: account.id.clone(),
        })
}

/// Turn a non-success HTTP response into [`ProviderError::HttpStatus`].
pub(crate) async fn check_status(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::HttpStatus {
        provider,
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    })
}

pub(crate) fn request_failed(provider: &'static str, error: reqwest::Error) -> ProviderError {
    ProviderError::RequestFailed {
        provider,
        message: error.to_string(),
    }
}

pub(crate) fn decode_failed(provider: &'static str, error: impl std::fmt::Display) -> ProviderError {
    ProviderError::DecodeFailed {
        provider,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_config::ProviderKind;

    #[test]
    fn test_require_token_missing() {
        let account = AccountConfig::new("bare", ProviderKind::Vercel);
        let err = require_token(&account).unwrap_err();
        assert!(matches!(err, ProviderError::MissingToken { ref account } if account == "bare"));
    }

    #[test]
    fn test_require_token_literal() {
        let mut account = AccountConfig::new("a", ProviderKind::Railway);
        account.token = Some("tok".to_string());
        assert_eq!(require_token(&account).unwrap(), "tok");
    }

    #[test]
    fn test_require_token_from_env() {
        let mut account = AccountConfig::new("env", ProviderKind::Vercel);
        account.token_env = Some("BEACON_TEST_PROVIDER_TOKEN".to_string());

        temp_env::with_var("BEACON_TEST_PROVIDER_TOKEN", Some("from-env"), || {
            assert_eq!(require_token(&account).unwrap(), "from-env");
        });
        temp_env::with_var("BEACON_TEST_PROVIDER_TOKEN", Some(""), || {
            assert!(matches!(
                require_token(&account),
                Err(ProviderError::MissingToken { .. })
            ));
        });
    }

    #[tokio::test]
    async fn test_fetch_error_logs_text_unknown_account() {
        let accounts = vec![AccountConfig::new("known", ProviderKind::Vercel)];
        let result = fetch_error_logs_text(&ProviderSource, &accounts, "dpl_1", "other").await;
        assert!(matches!(
            result,
            Err(ProviderError::UnknownAccount { ref account }) if account == "other"
        ));
    }

    #[tokio::test]
    async fn test_provider_source_missing_token_fails_before_network() {
        let mut account = AccountConfig::new("nobody", ProviderKind::Vercel);
        account.api_base = Some("http://127.0.0.1:9".to_string());
        let result = ProviderSource.fetch(&account, 8).await;
        assert!(matches!(result, Err(ProviderError::MissingToken { .. })));
    }
}
