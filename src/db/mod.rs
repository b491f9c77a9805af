pub mod connection;
pub mod habit_repo;
pub mod migrations;
pub mod settings_repo;
pub mod task_repo;

pub use connection::*;

use rusqlite::Connection;
use tracing::warn;

use crate::error::LifeorgError;

#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct ClearedCounts {
    pub tasks: usize,
    pub habits: usize,
    pub settings: usize,
}

/// Empty all three collections, one after the other. Not atomic across
/// collections: a failure part-way leaves the earlier ones cleared.
pub fn clear_all(conn: &Connection) -> Result<ClearedCounts, LifeorgError> {
    let tasks = task_repo::clear_tasks(conn)?;
    let habits = habit_repo::clear_habits(conn)?;
    let settings = settings_repo::clear_settings(conn)?;
    warn!(tasks, habits, settings, "all collections cleared");
    Ok(ClearedCounts {
        tasks,
        habits,
        settings,
    })
}
