use clap::ArgMatches;
use tracing::{error, info};

use beacon_core::{BeaconError, ProviderSource};

use super::helpers::{load_config, runtime};
use crate::color;

pub(crate) fn handle_logs_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let deployment_id = matches
        .get_one::<String>("deployment")
        .ok_or("Deployment argument is required")?;
    let account_id = matches
        .get_one::<String>("account")
        .ok_or("Account argument is required")?;

    info!(
        event = "cli.logs_started",
        deployment_id = deployment_id.as_str(),
        account_id = account_id.as_str()
    );

    let config = load_config(matches)?;
    let rt = runtime()?;
    let result = rt.block_on(beacon_core::providers::fetch_error_logs_text(
        &ProviderSource,
        &config.accounts,
        deployment_id,
        account_id,
    ));

    match result {
        Ok(text) => {
            if text.trim().is_empty() {
                println!("{}", color::muted("(no log output)"));
            } else {
                println!("{text}");
            }
            info!(
                event = "cli.logs_completed",
                deployment_id = deployment_id.as_str(),
                bytes = text.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "{}",
                color::error(&format!("❌ Failed to fetch logs for '{deployment_id}': {e}"))
            );
            if e.is_user_error() {
                eprintln!(
                    "{}",
                    color::hint("Check the account id and its token with `beacon accounts`.")
                );
            }
            error!(
                event = "cli.logs_failed",
                deployment_id = deployment_id.as_str(),
                error_code = e.error_code(),
                error = %e
            );
            Err(e.into())
        }
    }
}
