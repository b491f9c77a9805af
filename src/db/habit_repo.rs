use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::LifeorgError;
use crate::models::Habit;

use super::task_repo::escape_like;

const HABIT_COLUMNS: &str =
    "id, name, goal, checked_dates, last_checked, current_streak, created_at";

/// Insert the habit or replace the stored record with the same id.
pub fn put_habit(conn: &Connection, habit: &Habit) -> Result<(), LifeorgError> {
    let checked_dates = serde_json::to_string(&habit.checked_dates)
        .map_err(|e| LifeorgError::storage(format!("Cannot encode check-ins: {e}")))?;
    conn.execute(
        "INSERT OR REPLACE INTO habits (id, name, goal, checked_dates, last_checked, current_streak, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            habit.id,
            habit.name,
            habit.goal,
            checked_dates,
            habit.last_checked,
            habit.current_streak,
            habit.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_habit(conn: &Connection, id: &str) -> Result<Option<Habit>, LifeorgError> {
    let habit = conn
        .query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
            params![id],
            row_to_habit,
        )
        .optional()?;
    Ok(habit)
}

/// Resolve a habit by exact id, then by unique id prefix.
pub fn resolve_habit(conn: &Connection, reference: &str) -> Result<Habit, LifeorgError> {
    if let Some(habit) = get_habit(conn, reference)? {
        return Ok(habit);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLUMNS} FROM habits WHERE id LIKE ?1 ESCAPE '\\'"
    ))?;
    let prefix = format!("{}%", escape_like(reference));
    let mut habits: Vec<Habit> = stmt
        .query_map(params![prefix], row_to_habit)?
        .collect::<Result<Vec<_>, _>>()?;

    match habits.len() {
        0 => Err(LifeorgError::habit_not_found(reference)),
        1 => Ok(habits.remove(0)),
        _ => {
            let candidates: Vec<String> = habits
                .iter()
                .map(|h| format!("{} ({})", h.name, h.id))
                .collect();
            Err(LifeorgError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_habits(conn: &Connection) -> Result<Vec<Habit>, LifeorgError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLUMNS} FROM habits ORDER BY created_at ASC, id ASC"
    ))?;
    let habits = stmt
        .query_map([], row_to_habit)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(habits)
}

/// Remove the habit if present. Returns whether a row was deleted.
pub fn delete_habit(conn: &Connection, id: &str) -> Result<bool, LifeorgError> {
    let changed = conn.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn clear_habits(conn: &Connection) -> Result<usize, LifeorgError> {
    Ok(conn.execute("DELETE FROM habits", [])?)
}

fn row_to_habit(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
    let raw_dates: String = row.get(3)?;
    let checked_dates: Vec<DateTime<Utc>> = serde_json::from_str(&raw_dates).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        goal: row.get(2)?,
        checked_dates,
        last_checked: row.get(4)?,
        current_streak: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_in_memory;
    use crate::engine::streak;
    use chrono::{FixedOffset, TimeZone};

    fn sample_habit() -> Habit {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut habit = Habit::new("Read", 21, Utc.with_ymd_and_hms(2026, 9, 1, 7, 0, 0).unwrap());
        for day in [10, 11, 12] {
            let now = tz.with_ymd_and_hms(2026, 10, day, 8, 30, 15).unwrap();
            streak::toggle_check_in(&mut habit, &now);
        }
        habit
    }

    #[test]
    fn put_then_get_round_trips() {
        let conn = open_in_memory().unwrap();
        let habit = sample_habit();
        put_habit(&conn, &habit).unwrap();
        let loaded = get_habit(&conn, &habit.id).unwrap().unwrap();
        assert_eq!(loaded, habit);
        assert_eq!(loaded.current_streak(), 3);
    }

    #[test]
    fn delete_and_clear() {
        let conn = open_in_memory().unwrap();
        let habit = sample_habit();
        put_habit(&conn, &habit).unwrap();
        assert!(!delete_habit(&conn, "missing").unwrap());
        assert_eq!(list_habits(&conn).unwrap().len(), 1);
        assert!(delete_habit(&conn, &habit.id).unwrap());
        assert!(get_habit(&conn, &habit.id).unwrap().is_none());

        put_habit(&conn, &habit).unwrap();
        assert_eq!(clear_habits(&conn).unwrap(), 1);
        assert!(list_habits(&conn).unwrap().is_empty());
    }

    #[test]
    fn corrupt_history_surfaces_as_storage_error() {
        let conn = open_in_memory().unwrap();
        let habit = sample_habit();
        put_habit(&conn, &habit).unwrap();
        conn.execute(
            "UPDATE habits SET checked_dates = 'not json' WHERE id = ?1",
            params![habit.id],
        )
        .unwrap();
        let err = get_habit(&conn, &habit.id).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::StorageError);
    }
}
