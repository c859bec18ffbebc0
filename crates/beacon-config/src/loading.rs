//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.beacon/config.toml`
//! 3. **Project config** - `./.beacon/config.toml`
//!
//! A `--config <path>` on the command line bypasses the hierarchy entirely.

use crate::errors::ConfigError;
use crate::types::{
    AccountConfig, BackoffConfig, BeaconConfig, NotificationConfig, PollingConfig,
};
use crate::validation::validate_config;
use std::fs;
use std::path::Path;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be parsed, or if validation
/// fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<BeaconConfig, ConfigError> {
    let paths = beacon_paths::BeaconPaths::resolve().map_err(|e| ConfigError::PathUnavailable {
        message: e.to_string(),
    })?;
    let project_root = std::env::current_dir()?;
    load_hierarchy_from(
        &paths.user_config(),
        &beacon_paths::BeaconPaths::project_config(&project_root),
    )
}

/// Load and merge the user and project config files at explicit paths.
pub fn load_hierarchy_from(
    user_path: &Path,
    project_path: &Path,
) -> Result<BeaconConfig, ConfigError> {
    let mut config = BeaconConfig::default();

    for path in [user_path, project_path] {
        match load_config_file(path) {
            Ok(layer) => {
                tracing::debug!(
                    event = "config.load.layer_applied",
                    path = %path.display(),
                    accounts = layer.accounts.len()
                );
                config = merge_configs(config, layer);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load a configuration file from the given path without validating it.
pub fn load_config_file(path: &Path) -> Result<BeaconConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Scalar settings are overridden field by field. Accounts are merged by
/// `id`: an override account replaces the base account with the same id in
/// place, new ids are appended.
pub fn merge_configs(base: BeaconConfig, override_config: BeaconConfig) -> BeaconConfig {
    BeaconConfig {
        polling: PollingConfig {
            active_interval_secs: override_config
                .polling
                .active_interval_secs
                .or(base.polling.active_interval_secs),
            idle_interval_secs: override_config
                .polling
                .idle_interval_secs
                .or(base.polling.idle_interval_secs),
            initial_window: override_config
                .polling
                .initial_window
                .or(base.polling.initial_window),
            page_increment: override_config
                .polling
                .page_increment
                .or(base.polling.page_increment),
            prune_after_missed: override_config
                .polling
                .prune_after_missed
                .or(base.polling.prune_after_missed),
        },
        backoff: BackoffConfig {
            base_secs: override_config.backoff.base_secs.or(base.backoff.base_secs),
            max_secs: override_config.backoff.max_secs.or(base.backoff.max_secs),
        },
        notifications: NotificationConfig {
            enabled: override_config
                .notifications
                .enabled
                .or(base.notifications.enabled),
        },
        accounts: merge_accounts(base.accounts, override_config.accounts),
    }
}

fn merge_accounts(base: Vec<AccountConfig>, overrides: Vec<AccountConfig>) -> Vec<AccountConfig> {
    let mut merged = base;
    for account in overrides {
        match merged.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => merged.push(account),
        }
    }
    merged
}
