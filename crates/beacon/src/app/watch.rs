use clap::Command;

pub fn watch_command() -> Command {
    Command::new("watch")
        .about("Continuously watch deployments until Ctrl-C")
        .after_help(
            "Commands (type and press Enter):\n  r  refresh now\n  m  load more deployments\n  v  refresh as if the window regained focus\n  q  quit",
        )
}
