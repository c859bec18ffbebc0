use serde::Serialize;

use beacon_config::{AccountConfig, ProviderKind};
use beacon_core::UnifiedDeployment;

/// Deployment plus the derived dashboard link, for `--json` output.
#[derive(Serialize)]
pub struct DeploymentJson<'a> {
    #[serde(flatten)]
    pub deployment: &'a UnifiedDeployment,
    pub dashboard_url: Option<String>,
}

impl<'a> From<&'a UnifiedDeployment> for DeploymentJson<'a> {
    fn from(deployment: &'a UnifiedDeployment) -> Self {
        Self {
            dashboard_url: deployment.dashboard_url(),
            deployment,
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse<'a> {
    pub deployments: Vec<DeploymentJson<'a>>,
    pub window: usize,
    pub has_more: bool,
    pub failed_accounts: usize,
}

/// Account summary; the token itself is never serialized.
#[derive(Serialize)]
pub struct AccountJson<'a> {
    pub id: &'a str,
    pub provider: &'static str,
    pub label: &'a str,
    pub token_source: String,
    pub token_available: bool,
    /// Railway only: "workspace" or "project".
    pub token_type: Option<&'static str>,
    pub team_id: Option<&'a str>,
    pub team_slug: Option<&'a str>,
    pub api_base: &'a str,
}

impl<'a> From<&'a AccountConfig> for AccountJson<'a> {
    fn from(account: &'a AccountConfig) -> Self {
        Self {
            id: &account.id,
            provider: account.provider.as_str(),
            label: account.display_label(),
            token_source: account.token_source(),
            token_available: account.resolve_token().is_some(),
            token_type: (account.provider == ProviderKind::Railway)
                .then(|| account.token_type().as_str()),
            team_id: account.team_id.as_deref(),
            team_slug: account.team_slug.as_deref(),
            api_base: account.api_base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_config::TokenType;

    #[test]
    fn test_account_json_never_contains_token() {
        let mut account = AccountConfig::new("personal", ProviderKind::Vercel);
        account.token = Some("super-secret-token".to_string());

        let json = serde_json::to_string(&AccountJson::from(&account)).unwrap();
        assert!(!json.contains("super-secret-token"));
        assert!(json.contains("\"token_source\":\"config\""));
        assert!(json.contains("\"token_available\":true"));
        assert!(json.contains("\"api_base\":\"https://api.vercel.com\""));
        assert!(json.contains("\"token_type\":null"));
    }

    #[test]
    fn test_account_json_reports_railway_token_type() {
        let mut account = AccountConfig::new("infra", ProviderKind::Railway);
        account.token_env = Some("RAILWAY_TOKEN".to_string());
        account.token_type = Some(TokenType::Project);

        let json = serde_json::to_string(&AccountJson::from(&account)).unwrap();
        assert!(json.contains("\"token_type\":\"project\""));
    }
}
