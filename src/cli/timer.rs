use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::cli::commands::TimerCommands;
use crate::db::{connection, settings_repo};
use crate::engine::TimerController;
use crate::error::LifeorgError;
use crate::models::TimerState;
use crate::notify::{LogNotifier, Notifier};
use crate::output;

pub fn run(cmd: TimerCommands, db_path: &Path, json_output: bool) -> i32 {
    let result = match cmd {
        TimerCommands::Status => run_status(db_path, json_output),
        TimerCommands::Run { start } => run_session(start, db_path, json_output),
    };
    super::finish(result, json_output)
}

fn run_status(db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let durations = settings_repo::load_timer_durations(&conn)?;
    let state = TimerState::new(&durations);

    if json_output {
        output::json::print(&output::json::success(output::json::timer_json(
            &state, &durations,
        )));
    } else {
        output::text::print_timer(&state);
        output::text::print_durations(&durations);
    }
    Ok(0)
}

/// Prints completion messages to the terminal as they happen.
struct ConsoleNotifier {
    json_output: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        LogNotifier.notify(message);
        if self.json_output {
            println!("{}", json!({ "event": "completed", "message": message }));
        } else {
            println!("{message}");
        }
    }
}

enum SessionCommand<'a> {
    Start,
    Pause,
    Reset,
    Status,
    Export(&'a str),
    Quit,
}

fn parse_command(line: &str) -> Result<SessionCommand<'_>, LifeorgError> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "start" => Ok(SessionCommand::Start),
        "pause" => Ok(SessionCommand::Pause),
        "reset" => Ok(SessionCommand::Reset),
        "status" => Ok(SessionCommand::Status),
        "quit" | "exit" => Ok(SessionCommand::Quit),
        "export" if rest.is_empty() => Err(LifeorgError::validation("export needs a path")),
        "export" => Ok(SessionCommand::Export(rest)),
        other => Err(LifeorgError::validation(format!(
            "Unknown command '{other}' (start, pause, reset, status, export <path>, quit)"
        ))),
    }
}

fn run_session(start: bool, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let durations = settings_repo::load_timer_durations(&conn)?;
    let notifier = Arc::new(ConsoleNotifier { json_output });
    let mut timer = TimerController::new(durations, notifier);

    if start {
        timer.start();
    }
    report(&timer, "status", json_output);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Settings may change from another process while the session runs.
        timer.set_durations(settings_repo::load_timer_durations(&conn)?);

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                report_error(&e, json_output);
                continue;
            }
        };
        match command {
            SessionCommand::Start => {
                if !timer.start() {
                    debug!("start ignored; already running");
                }
                report(&timer, "start", json_output);
            }
            SessionCommand::Pause => {
                timer.pause();
                report(&timer, "pause", json_output);
            }
            SessionCommand::Reset => {
                timer.reset();
                report(&timer, "reset", json_output);
            }
            SessionCommand::Status => report(&timer, "status", json_output),
            SessionCommand::Export(path) => {
                match export_live(&conn, &timer.state(), Path::new(path)) {
                    Ok(written) => {
                        if json_output {
                            println!(
                                "{}",
                                output::json::success(json!({
                                    "command": "export",
                                    "path": written.display().to_string()
                                }))
                            );
                        } else {
                            println!("Exported to {}", written.display());
                        }
                    }
                    Err(e) => report_error(&e, json_output),
                }
            }
            SessionCommand::Quit => break,
        }
    }

    timer.pause();
    info!("timer session ended");
    Ok(0)
}

fn export_live(
    conn: &Connection,
    state: &TimerState,
    path: &Path,
) -> Result<std::path::PathBuf, LifeorgError> {
    let written = super::data::write_snapshot(conn, state, path)?;
    info!(path = %written.display(), "snapshot written from timer session");
    Ok(written)
}

fn report(timer: &TimerController, command: &str, json_output: bool) {
    let state = timer.state();
    if json_output {
        let mut data: Value = output::json::timer_json(&state, &timer.durations());
        data["command"] = json!(command);
        println!("{}", output::json::success(data));
    } else {
        output::text::print_timer(&state);
    }
}

fn report_error(e: &LifeorgError, json_output: bool) {
    warn!(code = e.code.as_str(), "{}", e.message);
    if json_output {
        println!("{}", output::json::error(e));
    } else {
        eprintln!("Error: {}", e.message);
    }
}
