use clap::{Arg, ArgAction, Command};

pub fn root_command() -> Command {
    Command::new("beacon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch Vercel and Railway deployments and get notified when builds finish")
        .long_about("Beacon polls every configured Vercel and Railway account, keeps a live view of recent deployments, speeds up while anything is building and sends a desktop notification when a build finishes or fails.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Load this config file instead of ~/.beacon/config.toml and ./.beacon/config.toml")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}
