use rusqlite::Connection;
use tracing::info;

use crate::error::LifeorgError;

pub const SCHEMA_VERSION: i64 = 1;

pub fn schema_version(conn: &Connection) -> Result<i64, LifeorgError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

pub fn run_migrations(conn: &Connection) -> Result<(), LifeorgError> {
    let version = schema_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(LifeorgError::storage(format!(
            "Database schema version {version} is newer than supported ({SCHEMA_VERSION})"
        )));
    }

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            completed INTEGER NOT NULL DEFAULT 0 CHECK (completed IN (0, 1)),
            created_at TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('matrix', 'board')),
            quadrant TEXT
                CHECK (quadrant IN ('urgent-important', 'not-urgent-important',
                                    'urgent-not-important', 'not-urgent-not-important')),
            status TEXT
                CHECK (status IN ('backlog', 'in-progress', 'done')),
            CHECK ((kind = 'matrix' AND quadrant IS NOT NULL AND status IS NULL)
                OR (kind = 'board' AND status IS NOT NULL AND quadrant IS NULL))
        );

        CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            goal INTEGER NOT NULL CHECK (goal > 0),
            checked_dates TEXT NOT NULL DEFAULT '[]',
            last_checked TEXT,
            current_streak INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_quadrant ON tasks(quadrant) WHERE kind = 'matrix';
        CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status) WHERE kind = 'board';
        CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
        ",
    )?;

    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))?;
        info!(from = version, to = SCHEMA_VERSION, "store schema initialized");
    }
    Ok(())
}
