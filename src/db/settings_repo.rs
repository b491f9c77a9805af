use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::error::LifeorgError;
use crate::models::{Setting, TimerDurations};

/// Insert or overwrite a single key.
pub fn put_setting(conn: &Connection, setting: &Setting) -> Result<(), LifeorgError> {
    let value = serde_json::to_string(&setting.value)
        .map_err(|e| LifeorgError::storage(format!("Cannot encode setting {}: {e}", setting.key)))?;
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        params![setting.key, value],
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<Setting>, LifeorgError> {
    let setting = conn
        .query_row(
            "SELECT key, value FROM settings WHERE key = ?1",
            params![key],
            row_to_setting,
        )
        .optional()?;
    Ok(setting)
}

pub fn list_settings(conn: &Connection) -> Result<Vec<Setting>, LifeorgError> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key ASC")?;
    let settings = stmt
        .query_map([], row_to_setting)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(settings)
}

pub fn delete_setting(conn: &Connection, key: &str) -> Result<bool, LifeorgError> {
    let changed = conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
    Ok(changed > 0)
}

pub fn clear_settings(conn: &Connection) -> Result<usize, LifeorgError> {
    Ok(conn.execute("DELETE FROM settings", [])?)
}

/// Timer durations currently in force, with defaults for unset keys.
pub fn load_timer_durations(conn: &Connection) -> Result<TimerDurations, LifeorgError> {
    Ok(TimerDurations::from_settings(&list_settings(conn)?))
}

fn row_to_setting(row: &rusqlite::Row) -> rusqlite::Result<Setting> {
    let raw: String = row.get(1)?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Setting {
        key: row.get(0)?,
        value,
    })
}
