use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

use crate::db::{self, connection, settings_repo};
use crate::error::LifeorgError;
use crate::models::TimerState;
use crate::output;
use crate::snapshot;

pub fn run_export(output_path: Option<&Path>, db_path: &Path, json_output: bool) -> i32 {
    super::finish(export_inner(output_path, db_path, json_output), json_output)
}

pub fn run_import(file: &Path, yes: bool, db_path: &Path, json_output: bool) -> i32 {
    super::finish(import_inner(file, yes, db_path, json_output), json_output)
}

pub fn run_reset(yes: bool, db_path: &Path, json_output: bool) -> i32 {
    super::finish(reset_inner(yes, db_path, json_output), json_output)
}

/// Export with the timer as a fresh process sees it: stopped, at the start
/// of a focus interval.
fn export_inner(
    output_path: Option<&Path>,
    db_path: &Path,
    json_output: bool,
) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let durations = settings_repo::load_timer_durations(&conn)?;
    let timer = TimerState::new(&durations);

    let Some(path) = output_path else {
        // The document itself is the output; no envelope even with --json.
        let snap = snapshot::export_snapshot(&conn, &timer, Utc::now())?;
        println!("{}", snapshot::to_json(&snap)?);
        return Ok(0);
    };

    let written = write_snapshot(&conn, &timer, path)?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "path": written.display().to_string()
        })));
    } else {
        println!("Exported to {}", written.display());
    }
    Ok(0)
}

/// Write a snapshot to `path`, or into it under the dated backup name when it
/// is a directory. Returns the file actually written.
pub(crate) fn write_snapshot(
    conn: &Connection,
    timer: &TimerState,
    path: &Path,
) -> Result<PathBuf, LifeorgError> {
    let now = Utc::now();
    let target = if path.is_dir() {
        path.join(snapshot::backup_file_name(now))
    } else {
        path.to_path_buf()
    };
    let snap = snapshot::export_snapshot(conn, timer, now)?;
    let text = snapshot::to_json(&snap)?;
    fs::write(&target, text + "\n").map_err(|e| {
        LifeorgError::storage(format!("Cannot write {}: {e}", target.display()))
    })?;
    Ok(target)
}

fn import_inner(
    file: &Path,
    yes: bool,
    db_path: &Path,
    json_output: bool,
) -> Result<i32, LifeorgError> {
    let text = fs::read_to_string(file).map_err(|e| {
        LifeorgError::import_format(format!("Cannot read {}: {e}", file.display()))
    })?;
    // Validate before asking for confirmation so a bad file fails the same
    // way with or without --yes.
    let doc = snapshot::parse_snapshot(&text)?;
    if !yes {
        return Err(LifeorgError::confirmation_required("Import"));
    }

    let conn = connection::open_db(db_path)?;
    let summary = snapshot::apply_import(&conn, doc, &Local)?;

    if json_output {
        output::json::print(&output::json::success(json!({ "imported": summary })));
    } else {
        let describe = |n: Option<usize>| n.map_or("kept".to_string(), |n| format!("{n} imported"));
        println!("Tasks: {}", describe(summary.tasks));
        println!("Habits: {}", describe(summary.habits));
        println!(
            "Settings: {}",
            summary.settings.map_or("kept".to_string(), |n| format!("{n} merged"))
        );
    }
    Ok(0)
}

fn reset_inner(yes: bool, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    if !yes {
        return Err(LifeorgError::confirmation_required("Reset"));
    }
    let conn = connection::open_db(db_path)?;
    let cleared = db::clear_all(&conn)?;
    info!(path = %db_path.display(), ?cleared, "store reset");

    if json_output {
        output::json::print(&output::json::success(json!({ "cleared": cleared })));
    } else {
        println!(
            "Deleted {} task(s), {} habit(s), {} setting(s).",
            cleared.tasks, cleared.habits, cleared.settings
        );
    }
    Ok(0)
}
