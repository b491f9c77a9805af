use std::path::Path;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::cli::commands::{TaskCommands, TaskView};
use crate::db::{connection, task_repo};
use crate::error::LifeorgError;
use crate::models::{normalize_description, BoardStatus, Placement, Quadrant, Task, TaskKind};
use crate::output;

pub fn run(cmd: TaskCommands, db_path: &Path, json_output: bool) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            description,
            quadrant,
            status,
        } => run_add(&title, description.as_deref(), quadrant, status, db_path, json_output),
        TaskCommands::List { view } => run_list(view, db_path, json_output),
        TaskCommands::Show { id } => run_show(&id, db_path, json_output),
        TaskCommands::Edit {
            id,
            title,
            description,
            quadrant,
            status,
        } => run_edit(
            &id,
            title.as_deref(),
            description.as_deref(),
            quadrant,
            status,
            db_path,
            json_output,
        ),
        TaskCommands::Toggle { id } => run_toggle(&id, db_path, json_output),
        TaskCommands::Delete { id } => run_delete(&id, db_path, json_output),
    };
    super::finish(result, json_output)
}

fn placement_from_args(
    quadrant: Option<Quadrant>,
    status: Option<BoardStatus>,
) -> Result<Placement, LifeorgError> {
    match (quadrant, status) {
        (Some(quadrant), None) => Ok(Placement::Matrix { quadrant }),
        (None, Some(status)) => Ok(Placement::Board { status }),
        _ => Err(LifeorgError::validation(
            "A task needs exactly one of --quadrant or --status",
        )),
    }
}

fn run_add(
    title: &str,
    description: Option<&str>,
    quadrant: Option<Quadrant>,
    status: Option<BoardStatus>,
    db_path: &Path,
    json_output: bool,
) -> Result<i32, LifeorgError> {
    super::require_text("Task title", title)?;
    let placement = placement_from_args(quadrant, status)?;

    let conn = connection::open_db(db_path)?;
    let task = Task::new(title, description, placement, Utc::now());
    task_repo::put_task(&conn, &task)?;
    info!(id = %task.id, kind = task.kind().as_str(), "task added");

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        println!("Added task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_list(view: Option<TaskView>, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;

    let show_matrix = view != Some(TaskView::Board);
    let show_board = view != Some(TaskView::Matrix);

    let mut matrix = Vec::new();
    if show_matrix {
        for quadrant in Quadrant::ALL {
            matrix.push((quadrant, task_repo::list_tasks_by_quadrant(&conn, quadrant)?));
        }
    }
    let mut board = Vec::new();
    if show_board {
        for status in BoardStatus::ALL {
            board.push((status, task_repo::list_tasks_by_status(&conn, status)?));
        }
    }

    if json_output {
        let mut data = json!({});
        if show_matrix {
            data["matrix"] = matrix
                .iter()
                .map(|(q, tasks)| {
                    let list: Vec<_> = tasks.iter().map(output::json::task_json).collect();
                    (q.as_str().to_string(), json!(list))
                })
                .collect::<serde_json::Map<_, _>>()
                .into();
        }
        if show_board {
            data["board"] = board
                .iter()
                .map(|(s, tasks)| {
                    let list: Vec<_> = tasks.iter().map(output::json::task_json).collect();
                    (s.as_str().to_string(), json!(list))
                })
                .collect::<serde_json::Map<_, _>>()
                .into();
        }
        data["counts"] = output::json::counts_json(&task_repo::task_counts(&conn)?);
        output::json::print(&output::json::success(data));
    } else {
        if show_matrix {
            println!("Matrix:");
            output::text::print_matrix(&matrix);
        }
        if show_board {
            if show_matrix {
                println!();
            }
            println!("Board:");
            output::text::print_board(&board);
        }
    }
    Ok(0)
}

fn run_show(id: &str, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let task = task_repo::resolve_task(&conn, id)?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        output::text::print_task(&task);
    }
    Ok(0)
}

#[allow(clippy::too_many_arguments)]
fn run_edit(
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
    quadrant: Option<Quadrant>,
    status: Option<BoardStatus>,
    db_path: &Path,
    json_output: bool,
) -> Result<i32, LifeorgError> {
    if let Some(title) = title {
        super::require_text("Task title", title)?;
    }

    let conn = connection::open_db(db_path)?;
    let mut task = task_repo::resolve_task(&conn, id)?;

    if let Some(title) = title {
        task.title = title.trim().to_string();
    }
    if let Some(description) = description {
        task.description = normalize_description(Some(description));
    }
    match (task.kind(), quadrant, status) {
        (_, None, None) => {}
        (TaskKind::Matrix, Some(quadrant), None) => task.placement = Placement::Matrix { quadrant },
        (TaskKind::Board, None, Some(status)) => task.placement = Placement::Board { status },
        (kind, _, _) => {
            return Err(LifeorgError::validation(format!(
                "Task {} is a {} task; use {}",
                task.id,
                kind.as_str(),
                match kind {
                    TaskKind::Matrix => "--quadrant",
                    TaskKind::Board => "--status",
                }
            )))
        }
    }

    task_repo::put_task(&conn, &task)?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        println!("Updated task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_toggle(id: &str, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let mut task = task_repo::resolve_task(&conn, id)?;
    task.completed = !task.completed;
    task_repo::put_task(&conn, &task)?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "task": output::json::task_json(&task)
        })));
    } else {
        let state = if task.completed { "completed" } else { "open" };
        println!("Task {} is now {}", task.id, state);
    }
    Ok(0)
}

fn run_delete(id: &str, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    // Exact id only: a prefix must never select some other record to remove.
    let target = task_repo::get_task(&conn, id)?;
    let deleted = task_repo::delete_task(&conn, id)?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "deleted": deleted,
            "id": id
        })));
    } else if let Some(task) = target {
        println!("Deleted task: {} ({})", task.title, task.id);
    } else {
        println!("No task {id}; nothing to delete.");
    }
    Ok(0)
}
