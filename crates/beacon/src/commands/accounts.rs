use clap::ArgMatches;
use tracing::info;

use super::helpers::load_config;
use super::json_types::AccountJson;
use crate::color;
use crate::table::{display_width, pad};

pub(crate) fn handle_accounts_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.accounts_started", json_output = json_output);

    let config = load_config(matches)?;
    let accounts: Vec<AccountJson<'_>> = config.accounts.iter().map(AccountJson::from).collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
    } else if accounts.is_empty() {
        println!("No accounts configured.");
    } else {
        let id_width = accounts
            .iter()
            .map(|a| display_width(a.id))
            .max()
            .unwrap_or(0)
            .max("ID".len());
        let label_width = accounts
            .iter()
            .map(|a| display_width(a.label))
            .max()
            .unwrap_or(0)
            .max("Label".len());

        println!(
            "{}  {}  {}  {}",
            color::bold(&pad("ID", id_width)),
            color::bold(&pad("Provider", 8)),
            color::bold(&pad("Label", label_width)),
            color::bold("Token")
        );
        for account in &accounts {
            let token = if account.token_available {
                color::ready(&account.token_source)
            } else {
                color::failed(&format!("{} (missing)", account.token_source))
            };
            println!(
                "{}  {}  {}  {}",
                color::accent(&pad(account.id, id_width)),
                pad(account.provider, 8),
                pad(account.label, label_width),
                token
            );
        }
    }

    info!(event = "cli.accounts_completed", count = accounts.len());
    Ok(())
}
