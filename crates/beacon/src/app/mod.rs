mod global;
mod query;
mod watch;

#[cfg(test)]
mod tests;

use clap::Command;

pub fn build_cli() -> Command {
    global::root_command()
        .subcommand(watch::watch_command())
        .subcommand(query::list_command())
        .subcommand(query::logs_command())
        .subcommand(query::accounts_command())
}
