//! Versioned JSON backup of every collection plus the timer.
//!
//! Import replaces the task and habit collections wholesale but merges
//! settings key by key. The whole document is validated before the first
//! write, and all writes share one transaction.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::db::{habit_repo, settings_repo, task_repo, with_transaction};
use crate::engine::streak;
use crate::error::LifeorgError;
use crate::models::{Habit, Setting, Task, TimerState};

pub const SNAPSHOT_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u64,
    pub export_date: DateTime<Utc>,
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub settings: BTreeMap<String, Value>,
    pub pomodoro_state: TimerState,
}

/// A validated import document. Absent sections leave their collection alone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    pub version: u64,
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub habits: Option<Vec<Habit>>,
    #[serde(default)]
    pub settings: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub pomodoro_state: Option<TimerState>,
}

/// Records written per collection; `None` for sections the document lacked.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub tasks: Option<usize>,
    pub habits: Option<usize>,
    pub settings: Option<usize>,
}

pub fn export_snapshot(
    conn: &Connection,
    timer: &TimerState,
    now: DateTime<Utc>,
) -> Result<Snapshot, LifeorgError> {
    let tasks = task_repo::list_tasks(conn)?;
    let habits = habit_repo::list_habits(conn)?;
    let settings = settings_repo::list_settings(conn)?
        .into_iter()
        .map(|s| (s.key, s.value))
        .collect();
    info!(tasks = tasks.len(), habits = habits.len(), "snapshot exported");
    Ok(Snapshot {
        version: SNAPSHOT_VERSION,
        export_date: now,
        tasks,
        habits,
        settings,
        pomodoro_state: timer.clone(),
    })
}

pub fn to_json(snapshot: &Snapshot) -> Result<String, LifeorgError> {
    serde_json::to_string_pretty(snapshot)
        .map_err(|e| LifeorgError::storage(format!("Cannot encode snapshot: {e}")))
}

/// Parse and validate a document without touching any store.
///
/// Fails closed on a missing or unknown `version`.
pub fn parse_snapshot(text: &str) -> Result<ImportDocument, LifeorgError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| LifeorgError::import_format(format!("Invalid JSON: {e}")))?;

    let Value::Object(ref fields) = value else {
        return Err(LifeorgError::import_format(
            "Snapshot must be a JSON object",
        ));
    };
    match fields.get("version") {
        None => return Err(LifeorgError::import_format("Snapshot has no version")),
        Some(v) => match v.as_u64() {
            Some(SNAPSHOT_VERSION) => {}
            Some(other) => {
                return Err(LifeorgError::import_format(format!(
                    "Unsupported snapshot version {other} (expected {SNAPSHOT_VERSION})"
                )))
            }
            None => {
                return Err(LifeorgError::import_format(format!(
                    "Snapshot version must be a positive integer, got {v}"
                )))
            }
        },
    }

    let doc: ImportDocument = serde_json::from_value(value)
        .map_err(|e| LifeorgError::import_format(format!("Malformed snapshot: {e}")))?;
    validate(&doc)?;
    Ok(doc)
}

fn validate(doc: &ImportDocument) -> Result<(), LifeorgError> {
    if let Some(tasks) = &doc.tasks {
        let mut seen = HashSet::new();
        for task in tasks {
            if task.title.trim().is_empty() {
                return Err(LifeorgError::import_format(format!(
                    "Task {} has an empty title",
                    task.id
                )));
            }
            if !seen.insert(task.id.as_str()) {
                return Err(LifeorgError::import_format(format!(
                    "Duplicate task id {}",
                    task.id
                )));
            }
        }
    }
    if let Some(habits) = &doc.habits {
        let mut seen = HashSet::new();
        for habit in habits {
            if habit.name.trim().is_empty() {
                return Err(LifeorgError::import_format(format!(
                    "Habit {} has an empty name",
                    habit.id
                )));
            }
            if habit.goal == 0 {
                return Err(LifeorgError::import_format(format!(
                    "Habit {} has a goal of 0",
                    habit.id
                )));
            }
            if !seen.insert(habit.id.as_str()) {
                return Err(LifeorgError::import_format(format!(
                    "Duplicate habit id {}",
                    habit.id
                )));
            }
        }
    }
    Ok(())
}

/// Write a parsed document into the store in a single transaction.
///
/// Habit streaks are recomputed in `tz` rather than trusted from the file.
pub fn apply_import<Tz: TimeZone>(
    conn: &Connection,
    doc: ImportDocument,
    tz: &Tz,
) -> Result<ImportSummary, LifeorgError> {
    let summary = with_transaction(conn, |conn| {
        let mut summary = ImportSummary::default();

        if let Some(tasks) = doc.tasks {
            task_repo::clear_tasks(conn)?;
            for task in &tasks {
                task_repo::put_task(conn, task)?;
            }
            summary.tasks = Some(tasks.len());
        }

        if let Some(habits) = doc.habits {
            habit_repo::clear_habits(conn)?;
            let count = habits.len();
            for mut habit in habits {
                streak::refresh(&mut habit, tz);
                habit_repo::put_habit(conn, &habit)?;
            }
            summary.habits = Some(count);
        }

        if let Some(settings) = doc.settings {
            let count = settings.len();
            for (key, value) in settings {
                settings_repo::put_setting(conn, &Setting::new(key, value))?;
            }
            summary.settings = Some(count);
        }

        Ok(summary)
    })?;
    info!(?summary, "snapshot imported");
    Ok(summary)
}

/// Parse, validate and apply in one go. Nothing is written unless the
/// whole document is acceptable.
pub fn import_snapshot<Tz: TimeZone>(
    conn: &Connection,
    text: &str,
    tz: &Tz,
) -> Result<ImportSummary, LifeorgError> {
    let doc = parse_snapshot(text)?;
    apply_import(conn, doc, tz)
}

/// Default file name for an export taken on `now`'s date.
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("life-organizer-backup-{}.json", now.format("%Y-%m-%d"))
}
