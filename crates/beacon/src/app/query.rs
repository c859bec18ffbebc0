use clap::{Arg, ArgAction, Command};

pub fn list_command() -> Command {
    Command::new("list")
        .about("Fetch deployments once and print them")
        .arg(
            Arg::new("limit")
                .long("limit")
                .short('n')
                .help("Number of deployments to request (default: polling.initial_window)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue),
        )
}

pub fn logs_command() -> Command {
    Command::new("logs")
        .about("Print the build error log of a deployment")
        .arg(
            Arg::new("deployment")
                .help("Deployment id")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("account")
                .long("account")
                .short('a')
                .help("Id of the configured account that owns the deployment")
                .required(true),
        )
}

pub fn accounts_command() -> Command {
    Command::new("accounts")
        .about("List configured accounts (tokens are never printed)")
        .arg(
            Arg::new("json")
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue),
        )
}
