use clap::ArgMatches;
use tracing::error;

mod accounts;
mod helpers;
mod json_types;
mod list;
mod logs;
mod watch;

use accounts::handle_accounts_command;
use list::handle_list_command;
use logs::handle_logs_command;
use watch::handle_watch_command;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches),
        Some(("list", sub_matches)) => handle_list_command(sub_matches),
        Some(("logs", sub_matches)) => handle_logs_command(sub_matches),
        Some(("accounts", sub_matches)) => handle_accounts_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
