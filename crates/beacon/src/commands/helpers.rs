use std::path::Path;

use clap::ArgMatches;
use tracing::{error, info};

use beacon_config::{BeaconConfig, ConfigError};

use crate::color;

/// Load configuration from `--config` when given, otherwise the user/project hierarchy.
///
/// Unlike most settings, a broken config cannot fall back to defaults: without
/// accounts there is nothing to watch. Errors are reported on stderr here.
pub(crate) fn load_config(matches: &ArgMatches) -> Result<BeaconConfig, ConfigError> {
    let result = match matches.get_one::<String>("config") {
        Some(path) => BeaconConfig::load_from(Path::new(path)),
        None => BeaconConfig::load_hierarchy(),
    };

    match result {
        Ok(config) => {
            info!(
                event = "cli.config.load_completed",
                accounts = config.accounts.len()
            );
            Ok(config)
        }
        Err(e) => {
            eprintln!("{}", color::error(&format!("Could not load config: {e}")));
            eprintln!(
                "{}",
                color::hint("Tip: Check ~/.beacon/config.toml and ./.beacon/config.toml.")
            );
            error!(event = "cli.config.load_failed", error = %e);
            Err(e)
        }
    }
}

/// Fail early with guidance when no account is configured.
pub(crate) fn require_accounts(config: &BeaconConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.accounts.is_empty() {
        eprintln!("{}", color::error("No accounts configured."));
        eprintln!(
            "{}",
            color::hint(
                "Add an [[accounts]] entry with id, provider and token_env to ~/.beacon/config.toml."
            )
        );
        return Err("No accounts configured".into());
    }
    Ok(())
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Runtime::new()?)
}
