use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use clap::ArgMatches;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use beacon_core::{
    AccountConfig, BuildIndicator, IndicatorError, Notifier, ProviderSource, SessionHandle, SessionSettings,
    SessionView, SyncSession,
};

use super::helpers::{load_config, require_accounts, runtime};
use crate::color;
use crate::table::DeploymentTable;

/// A command typed on stdin while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchCommand {
    Refresh,
    LoadMore,
    VisibilityRegained,
    Quit,
}

fn parse_command(line: &str) -> Option<WatchCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "refresh" => Some(WatchCommand::Refresh),
        "m" | "more" => Some(WatchCommand::LoadMore),
        "v" | "focus" => Some(WatchCommand::VisibilityRegained),
        "q" | "quit" | "exit" => Some(WatchCommand::Quit),
        _ => None,
    }
}

/// Prints a status line whenever the building state changes.
#[derive(Default)]
struct StatusLineIndicator {
    last: Mutex<Option<(bool, Option<String>)>>,
}

impl StatusLineIndicator {
    fn status_line(is_building: bool, building_name: Option<&str>) -> String {
        match (is_building, building_name) {
            (true, Some(name)) => format!("● Building: {name}"),
            (true, None) => "● Building".to_string(),
            (false, _) => "○ Nothing building".to_string(),
        }
    }
}

impl BuildIndicator for StatusLineIndicator {
    fn update(&self, is_building: bool, building_name: Option<&str>) -> Result<(), IndicatorError> {
        let state = (is_building, building_name.map(str::to_string));
        let mut last = self.last.lock().map_err(|e| IndicatorError::UpdateFailed {
            message: e.to_string(),
        })?;
        if last.as_ref() == Some(&state) {
            return Ok(());
        }

        let line = Self::status_line(is_building, building_name);
        let styled = if is_building {
            color::building(&line)
        } else {
            color::muted(&line)
        };
        writeln!(std::io::stdout(), "{styled}").map_err(|e| IndicatorError::UpdateFailed {
            message: e.to_string(),
        })?;
        *last = Some(state);
        Ok(())
    }
}

pub(crate) fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.watch_started");

    let config = load_config(matches)?;
    require_accounts(&config)?;
    let settings = SessionSettings::from_config(&config);

    let rt = runtime()?;
    let result = rt.block_on(watch(config.accounts.clone(), settings));
    // The stdin reader sits on a blocking thread that never returns on its own.
    rt.shutdown_timeout(Duration::from_millis(100));

    match result {
        Ok(generations) => {
            info!(event = "cli.watch_completed", refreshes = generations);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", color::error(&format!("❌ Watch stopped: {e}")));
            error!(event = "cli.watch_failed", error = %e);
            Err(e)
        }
    }
}

async fn watch(
    accounts: Vec<AccountConfig>,
    settings: SessionSettings,
) -> Result<u64, Box<dyn std::error::Error>> {
    let cadence = Cadence::from_settings(&settings);
    let session = SyncSession::new(
        accounts,
        settings,
        Arc::new(ProviderSource),
        Arc::new(Notifier),
        Arc::new(StatusLineIndicator::default()),
    );
    let handle = session.handle();
    let mut views = handle.subscribe();

    tokio::spawn(stop_on_signal(handle.clone()));
    tokio::spawn(read_commands(handle.clone()));

    println!(
        "{}",
        color::muted("Watching deployments. Type r=refresh m=more v=focus q=quit, then Enter.")
    );

    let mut session_task = tokio::spawn(session.run());
    let mut generation = 0;
    loop {
        tokio::select! {
            finished = &mut session_task => {
                finished?;
                break;
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                generation = view.generation;
                print_view(&view, &cadence);
            }
        }
    }

    Ok(generation)
}

fn print_view(view: &SessionView, cadence: &Cadence) {
    if view.snapshot.is_empty() {
        println!("No deployments found.");
    } else {
        DeploymentTable::new(&view.snapshot, Utc::now()).print_table();
    }

    let polling = if view.building {
        format!("polling every {}s", cadence.active_secs)
    } else {
        match cadence.idle_secs {
            Some(secs) => format!("polling every {secs}s"),
            None => "idle, waiting for input".to_string(),
        }
    };
    let more = if view.has_more { ", m for more" } else { "" };
    println!(
        "{}",
        color::muted(&format!(
            "{} shown (window {}), {polling}{more}. Updated {}.",
            view.snapshot.len(),
            view.window,
            Utc::now().format("%H:%M:%S")
        ))
    );
}

struct Cadence {
    active_secs: u64,
    idle_secs: Option<u64>,
}

impl Cadence {
    fn from_settings(settings: &SessionSettings) -> Self {
        Self {
            active_secs: settings.active_interval.as_secs(),
            idle_secs: settings.idle_interval.map(|d| d.as_secs()),
        }
    }
}

async fn stop_on_signal(handle: SessionHandle) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!(event = "cli.watch.signal_received", signal = "SIGINT");
            handle.stop();
        }
        Err(e) => {
            warn!(event = "cli.watch.signal_listen_failed", error = %e);
        }
    }
}

async fn read_commands(handle: SessionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!(event = "cli.watch.stdin_closed");
                return;
            }
            Err(e) => {
                warn!(event = "cli.watch.stdin_failed", error = %e);
                return;
            }
        };

        match parse_command(&line) {
            Some(WatchCommand::Refresh) => handle.refresh(),
            Some(WatchCommand::LoadMore) => handle.load_more(),
            Some(WatchCommand::VisibilityRegained) => handle.visibility_regained(),
            Some(WatchCommand::Quit) => {
                handle.stop();
                return;
            }
            None if line.trim().is_empty() => {}
            None => eprintln!(
                "{}",
                color::hint(&format!("Unknown command '{}'. Use r, m, v or q.", line.trim()))
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_short_and_long_forms() {
        assert_eq!(parse_command("r"), Some(WatchCommand::Refresh));
        assert_eq!(parse_command(" M \n"), Some(WatchCommand::LoadMore));
        assert_eq!(parse_command("focus"), Some(WatchCommand::VisibilityRegained));
        assert_eq!(parse_command("quit"), Some(WatchCommand::Quit));
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("deploy"), None);
    }

    #[test]
    fn test_status_line_text() {
        assert_eq!(
            StatusLineIndicator::status_line(true, Some("web")),
            "● Building: web"
        );
        assert_eq!(
            StatusLineIndicator::status_line(false, Some("web")),
            "○ Nothing building"
        );
    }

    #[test]
    fn test_indicator_records_last_state() {
        crate::color::set_no_color();
        let indicator = StatusLineIndicator::default();
        indicator.update(true, Some("web")).unwrap();
        indicator.update(true, Some("web")).unwrap();
        assert_eq!(
            *indicator.last.lock().unwrap(),
            Some((true, Some("web".to_string())))
        );
        indicator.update(false, None).unwrap();
        assert_eq!(*indicator.last.lock().unwrap(), Some((false, None)));
    }
}
