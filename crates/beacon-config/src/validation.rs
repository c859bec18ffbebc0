//! Configuration validation logic.

use crate::errors::ConfigError;
use crate::types::{BeaconConfig, ProviderKind, TokenType};
use std::collections::HashSet;

/// Validate a BeaconConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - Active interval, initial window and page increment must be > 0
///   (idle interval and prune threshold may be 0, meaning disabled)
/// - Backoff base must be > 0 and no larger than the backoff maximum
/// - Account ids must be non-empty and unique
/// - Every account needs either `token` or `token_env`
/// - `token_type = "project"` is only valid on Railway accounts
pub fn validate_config(config: &BeaconConfig) -> Result<(), ConfigError> {
    let polling = &config.polling;
    if polling.active_interval_secs() == 0 {
        return Err(invalid("polling.active_interval_secs must be greater than 0"));
    }
    if polling.initial_window() == 0 {
        return Err(invalid("polling.initial_window must be greater than 0"));
    }
    if polling.page_increment() == 0 {
        return Err(invalid("polling.page_increment must be greater than 0"));
    }

    let backoff = &config.backoff;
    if backoff.base_secs() == 0 {
        return Err(invalid("backoff.base_secs must be greater than 0"));
    }
    if backoff.max_secs() < backoff.base_secs() {
        return Err(invalid(format!(
            "backoff.max_secs ({}) must be >= backoff.base_secs ({})",
            backoff.max_secs(),
            backoff.base_secs()
        )));
    }

    let mut seen = HashSet::new();
    for account in &config.accounts {
        if account.id.trim().is_empty() {
            return Err(invalid("account id must not be empty"));
        }
        if !seen.insert(account.id.as_str()) {
            return Err(invalid(format!("duplicate account id '{}'", account.id)));
        }
        if account.token.is_none() && account.token_env.is_none() {
            return Err(invalid(format!(
                "account '{}' needs either 'token' or 'token_env'",
                account.id
            )));
        }
        if account.token_type() == TokenType::Project && account.provider != ProviderKind::Railway {
            return Err(invalid(format!(
                "account '{}': token_type = \"project\" is only supported for railway accounts",
                account.id
            )));
        }
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidConfiguration {
        message: message.into(),
    }
}
