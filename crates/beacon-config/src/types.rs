//! Configuration types for Beacon.
//!
//! Every scalar field is optional so that a config file only has to name
//! what it overrides. Accessor methods apply the built-in defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ACTIVE_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_INITIAL_WINDOW: usize = 8;
pub const DEFAULT_PAGE_INCREMENT: usize = 8;
pub const DEFAULT_PRUNE_AFTER_MISSED: u32 = 20;
pub const DEFAULT_BACKOFF_BASE_SECS: u64 = 10;
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 300;

/// Supported deployment provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Vercel,
    Railway,
}

impl ProviderKind {
    /// All provider kinds, in display order.
    pub fn all() -> &'static [ProviderKind] {
        &[ProviderKind::Vercel, ProviderKind::Railway]
    }

    /// The canonical lowercase identifier (matches the config file value).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Vercel => "vercel",
            ProviderKind::Railway => "railway",
        }
    }

    /// Human-readable provider name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Vercel => "Vercel",
            ProviderKind::Railway => "Railway",
        }
    }

    /// Default API base URL for this provider.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            ProviderKind::Vercel => "https://api.vercel.com",
            ProviderKind::Railway => "https://backboard.railway.com/graphql/v2",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vercel" => Ok(ProviderKind::Vercel),
            "railway" => Ok(ProviderKind::Railway),
            other => Err(format!(
                "Unknown provider '{}'. Supported: vercel, railway",
                other
            )),
        }
    }
}

/// How a Railway token authenticates.
///
/// Workspace (team or personal) tokens go in `Authorization: Bearer`;
/// project tokens go in the `Project-Access-Token` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Workspace,
    Project,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Workspace => "workspace",
            TokenType::Project => "project",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level Beacon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeaconConfig {
    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub backoff: BackoffConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// Polling cadence, window and pruning settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between refreshes while any deployment is building or queued.
    #[serde(default)]
    pub active_interval_secs: Option<u64>,

    /// Seconds between refreshes while idle. 0 disables idle polling.
    #[serde(default)]
    pub idle_interval_secs: Option<u64>,

    /// Window size requested on the first fetch.
    #[serde(default)]
    pub initial_window: Option<usize>,

    /// Amount added to the window on each "load more".
    #[serde(default)]
    pub page_increment: Option<usize>,

    /// Consecutive missed snapshots before a tracked deployment is forgotten.
    /// 0 disables pruning.
    #[serde(default)]
    pub prune_after_missed: Option<u32>,
}

impl PollingConfig {
    pub fn active_interval_secs(&self) -> u64 {
        self.active_interval_secs
            .unwrap_or(DEFAULT_ACTIVE_INTERVAL_SECS)
    }

    /// Idle cadence in seconds, or `None` when idle polling is off.
    pub fn idle_interval_secs(&self) -> Option<u64> {
        self.idle_interval_secs.filter(|secs| *secs > 0)
    }

    pub fn initial_window(&self) -> usize {
        self.initial_window.unwrap_or(DEFAULT_INITIAL_WINDOW)
    }

    pub fn page_increment(&self) -> usize {
        self.page_increment.unwrap_or(DEFAULT_PAGE_INCREMENT)
    }

    pub fn prune_after_missed(&self) -> u32 {
        self.prune_after_missed.unwrap_or(DEFAULT_PRUNE_AFTER_MISSED)
    }
}

/// Per-account exponential backoff after fetch failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackoffConfig {
    #[serde(default)]
    pub base_secs: Option<u64>,

    #[serde(default)]
    pub max_secs: Option<u64>,
}

impl BackoffConfig {
    pub fn base_secs(&self) -> u64 {
        self.base_secs.unwrap_or(DEFAULT_BACKOFF_BASE_SECS)
    }

    pub fn max_secs(&self) -> u64 {
        self.max_secs.unwrap_or(DEFAULT_BACKOFF_MAX_SECS)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Send desktop notifications for finished and failed builds.
    /// Default: true.
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl NotificationConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// One provider account Beacon polls.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub id: String,
    pub provider: ProviderKind,

    #[serde(default)]
    pub label: Option<String>,

    /// Literal API token. Takes precedence over `token_env`.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Name of an environment variable holding the API token.
    #[serde(default)]
    pub token_env: Option<String>,

    /// Railway token kind. Defaults to workspace.
    #[serde(default)]
    pub token_type: Option<TokenType>,

    /// Vercel team scope for API requests.
    #[serde(default)]
    pub team_id: Option<String>,

    /// Vercel team slug for dashboard links.
    #[serde(default)]
    pub team_slug: Option<String>,

    /// Override for the provider API base URL.
    #[serde(default)]
    pub api_base: Option<String>,
}

impl AccountConfig {
    pub fn new(id: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            id: id.into(),
            provider,
            label: None,
            token: None,
            token_env: None,
            token_type: None,
            team_id: None,
            team_slug: None,
            api_base: None,
        }
    }

    /// Label shown to the user, falling back to the account id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// API base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_base())
            .trim_end_matches('/')
    }

    /// Resolve the API token: literal `token` first, then `token_env`.
    ///
    /// Returns `None` when neither yields a non-empty value.
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_empty()) {
            return Some(token.clone());
        }
        let var = self.token_env.as_ref()?;
        std::env::var(var).ok().filter(|t| !t.is_empty())
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type.unwrap_or_default()
    }

    /// Where the token comes from, for display. Never includes the token.
    pub fn token_source(&self) -> String {
        match (&self.token, &self.token_env) {
            (Some(_), _) => "config".to_string(),
            (None, Some(var)) => format!("env:{}", var),
            (None, None) => "none".to_string(),
        }
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("id", &self.id)
            .field("provider", &self.provider)
            .field("label", &self.label)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_env", &self.token_env)
            .field("token_type", &self.token_type)
            .field("team_id", &self.team_id)
            .field("team_slug", &self.team_slug)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("vercel".parse::<ProviderKind>(), Ok(ProviderKind::Vercel));
        assert_eq!("Railway".parse::<ProviderKind>(), Ok(ProviderKind::Railway));
        assert!("heroku".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_serde_lowercase() {
        let account: AccountConfig = toml::from_str(
            r#"
id = "a"
provider = "railway"
"#,
        )
        .unwrap();
        assert_eq!(account.provider, ProviderKind::Railway);
    }

    #[test]
    fn test_polling_defaults() {
        let polling = PollingConfig::default();
        assert_eq!(polling.active_interval_secs(), 10);
        assert_eq!(polling.idle_interval_secs(), None);
        assert_eq!(polling.initial_window(), 8);
        assert_eq!(polling.page_increment(), 8);
        assert_eq!(polling.prune_after_missed(), 20);
    }

    #[test]
    fn test_idle_interval_zero_means_disabled() {
        let polling = PollingConfig {
            idle_interval_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(polling.idle_interval_secs(), None);

        let polling = PollingConfig {
            idle_interval_secs: Some(120),
            ..Default::default()
        };
        assert_eq!(polling.idle_interval_secs(), Some(120));
    }

    #[test]
    fn test_backoff_and_notification_defaults() {
        assert_eq!(BackoffConfig::default().base_secs(), 10);
        assert_eq!(BackoffConfig::default().max_secs(), 300);
        assert!(NotificationConfig::default().enabled());
    }

    #[test]
    fn test_api_base_default_and_override() {
        let mut account = AccountConfig::new("a", ProviderKind::Vercel);
        assert_eq!(account.api_base(), "https://api.vercel.com");

        account.api_base = Some("http://127.0.0.1:9999/".to_string());
        assert_eq!(account.api_base(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_resolve_token_literal_wins() {
        let mut account = AccountConfig::new("a", ProviderKind::Vercel);
        account.token = Some("literal".to_string());
        account.token_env = Some("BEACON_TEST_TOKEN_LITERAL".to_string());

        temp_env::with_var("BEACON_TEST_TOKEN_LITERAL", Some("from-env"), || {
            assert_eq!(account.resolve_token().as_deref(), Some("literal"));
        });
    }

    #[test]
    fn test_resolve_token_from_env() {
        let mut account = AccountConfig::new("a", ProviderKind::Railway);
        account.token_env = Some("BEACON_TEST_TOKEN_ENV".to_string());

        temp_env::with_var("BEACON_TEST_TOKEN_ENV", Some("from-env"), || {
            assert_eq!(account.resolve_token().as_deref(), Some("from-env"));
        });
        temp_env::with_var_unset("BEACON_TEST_TOKEN_ENV", || {
            assert_eq!(account.resolve_token(), None);
        });
    }

    #[test]
    fn test_token_type_defaults_to_workspace() {
        let account: AccountConfig = toml::from_str(
            r#"
id = "a"
provider = "railway"
"#,
        )
        .unwrap();
        assert_eq!(account.token_type(), TokenType::Workspace);

        let account: AccountConfig = toml::from_str(
            r#"
id = "b"
provider = "railway"
token_type = "project"
"#,
        )
        .unwrap();
        assert_eq!(account.token_type(), TokenType::Project);
    }

    #[test]
    fn test_unknown_token_type_fails_to_parse() {
        let result: Result<AccountConfig, _> = toml::from_str(
            r#"
id = "a"
provider = "railway"
token_type = "team-admin"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut account = AccountConfig::new("a", ProviderKind::Vercel);
        account.token = Some("super-secret".to_string());
        let debug = format!("{:?}", account);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_token_source() {
        let mut account = AccountConfig::new("a", ProviderKind::Vercel);
        assert_eq!(account.token_source(), "none");
        account.token_env = Some("TOKEN".to_string());
        assert_eq!(account.token_source(), "env:TOKEN");
        account.token = Some("x".to_string());
        assert_eq!(account.token_source(), "config");
    }
}
