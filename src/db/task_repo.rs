use rusqlite::{params, Connection, OptionalExtension};

use crate::error::LifeorgError;
use crate::models::{BoardStatus, Placement, Quadrant, Task};

const TASK_COLUMNS: &str =
    "id, title, description, completed, created_at, kind, quadrant, status";

/// Insert the task or replace the stored record with the same id.
pub fn put_task(conn: &Connection, task: &Task) -> Result<(), LifeorgError> {
    conn.execute(
        "INSERT OR REPLACE INTO tasks (id, title, description, completed, created_at, kind, quadrant, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            task.id,
            task.title,
            task.description,
            task.completed,
            task.created_at,
            task.kind().as_str(),
            task.placement.quadrant().map(|q| q.as_str()),
            task.placement.status().map(|s| s.as_str()),
        ],
    )?;
    Ok(())
}

pub fn get_task(conn: &Connection, id: &str) -> Result<Option<Task>, LifeorgError> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id],
            row_to_task,
        )
        .optional()?;
    Ok(task)
}

/// Resolve a task by exact id, then by unique id prefix.
pub fn resolve_task(conn: &Connection, reference: &str) -> Result<Task, LifeorgError> {
    if let Some(task) = get_task(conn, reference)? {
        return Ok(task);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id LIKE ?1 ESCAPE '\\'"
    ))?;
    let prefix = format!("{}%", escape_like(reference));
    let tasks: Vec<Task> = stmt
        .query_map(params![prefix], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut tasks = tasks.into_iter();
    match (tasks.next(), tasks.next()) {
        (None, _) => Err(LifeorgError::task_not_found(reference)),
        (Some(task), None) => Ok(task),
        (Some(first), Some(second)) => {
            let candidates: Vec<String> = [first, second]
                .into_iter()
                .chain(tasks)
                .map(|t| format!("{} ({})", t.title, t.id))
                .collect();
            Err(LifeorgError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>, LifeorgError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at ASC, id ASC"
    ))?;
    let tasks = stmt
        .query_map([], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn list_tasks_by_quadrant(
    conn: &Connection,
    quadrant: Quadrant,
) -> Result<Vec<Task>, LifeorgError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE kind = 'matrix' AND quadrant = ?1
         ORDER BY completed ASC, created_at ASC"
    ))?;
    let tasks = stmt
        .query_map(params![quadrant.as_str()], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn list_tasks_by_status(
    conn: &Connection,
    status: BoardStatus,
) -> Result<Vec<Task>, LifeorgError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE kind = 'board' AND status = ?1
         ORDER BY completed ASC, created_at ASC"
    ))?;
    let tasks = stmt
        .query_map(params![status.as_str()], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Remove the task if present. Returns whether a row was deleted.
pub fn delete_task(conn: &Connection, id: &str) -> Result<bool, LifeorgError> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn clear_tasks(conn: &Connection) -> Result<usize, LifeorgError> {
    Ok(conn.execute("DELETE FROM tasks", [])?)
}

#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct TaskCounts {
    pub total: i64,
    pub matrix: i64,
    pub board: i64,
    pub completed: i64,
}

pub fn task_counts(conn: &Connection) -> Result<TaskCounts, LifeorgError> {
    let counts = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(kind = 'matrix'), 0),
                COALESCE(SUM(kind = 'board'), 0),
                COALESCE(SUM(completed), 0)
         FROM tasks",
        [],
        |row| {
            Ok(TaskCounts {
                total: row.get(0)?,
                matrix: row.get(1)?,
                board: row.get(2)?,
                completed: row.get(3)?,
            })
        },
    )?;
    Ok(counts)
}

pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let kind: String = row.get(5)?;
    let quadrant: Option<String> = row.get(6)?;
    let status: Option<String> = row.get(7)?;
    let placement = Placement::from_parts(&kind, quadrant.as_deref(), status.as_deref())
        .ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("invalid task placement: kind={kind} quadrant={quadrant:?} status={status:?}")
                    .into(),
            )
        })?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        created_at: row.get(4)?,
        placement,
    })
}
