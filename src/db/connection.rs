use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::error::LifeorgError;

use super::migrations;

pub const DB_FILE_NAME: &str = "lifeorg.db";

/// Default location of the store: `<data dir>/lifeorg/lifeorg.db`, or the
/// working directory when the platform has no data dir.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("lifeorg").join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}

/// Open the store at `path`, creating it and its schema on first use.
/// Safe to call on every start: migrations only add what is missing.
pub fn open_db(path: &Path) -> Result<Connection, LifeorgError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LifeorgError::storage(format!("Cannot create {}: {e}", parent.display()))
        })?;
    }
    debug!(path = %path.display(), "opening store");
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// In-memory store with the full schema, used by tests.
pub fn open_in_memory() -> Result<Connection, LifeorgError> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), LifeorgError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=FULL;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}

/// Run `f` inside `BEGIN IMMEDIATE` and commit, or roll back on error.
pub fn with_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T, LifeorgError>,
) -> Result<T, LifeorgError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
