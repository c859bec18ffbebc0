use std::sync::Arc;

use chrono::Utc;
use clap::ArgMatches;
use tracing::{error, info};

use beacon_core::{NoopIndicator, Notifier, ProviderSource, SessionSettings, SyncSession};

use super::helpers::{load_config, require_accounts, runtime};
use super::json_types::{DeploymentJson, ListResponse};
use crate::color;
use crate::table::DeploymentTable;

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let limit = matches.get_one::<usize>("limit").copied();

    info!(event = "cli.list_started", json_output = json_output, limit = ?limit);

    let config = load_config(matches)?;
    require_accounts(&config)?;

    // A one-shot fetch is always a baseline; nothing to notify about.
    let mut settings = SessionSettings::from_config(&config);
    settings.notifications_enabled = false;

    let rt = runtime()?;
    let (snapshot, report, window, has_more) = rt.block_on(async {
        let mut session = SyncSession::new(
            config.accounts.clone(),
            settings,
            Arc::new(ProviderSource),
            Arc::new(Notifier),
            Arc::new(NoopIndicator),
        );
        let snapshot = session.refresh(limit).await;
        let window = limit.unwrap_or_else(|| session.window());
        (
            snapshot,
            session.last_report().cloned(),
            window,
            session.has_more(),
        )
    });

    let failed_accounts = report.as_ref().map_or(0, |r| r.failed_accounts);
    if failed_accounts > 0 && failed_accounts == config.accounts.len() {
        eprintln!(
            "{}",
            color::error("❌ Failed to fetch deployments from every account")
        );
        eprintln!("{}", color::hint("Run with --verbose for provider errors."));
        error!(event = "cli.list_failed", failed_accounts = failed_accounts);
        return Err("Failed to fetch deployments".into());
    }

    if json_output {
        let response = ListResponse {
            deployments: snapshot.iter().map(DeploymentJson::from).collect(),
            window,
            has_more,
            failed_accounts,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if snapshot.is_empty() {
        println!("No deployments found.");
    } else {
        DeploymentTable::new(&snapshot, Utc::now()).print_table();
        if failed_accounts > 0 {
            eprintln!(
                "{}",
                color::warning(&format!(
                    "Warning: {failed_accounts} account(s) could not be fetched."
                ))
            );
        }
        if has_more {
            println!(
                "{}",
                color::muted(&format!(
                    "Showing {} deployments. Use --limit to see more.",
                    snapshot.len()
                ))
            );
        }
    }

    info!(
        event = "cli.list_completed",
        count = snapshot.len(),
        failed_accounts = failed_accounts
    );
    Ok(())
}
