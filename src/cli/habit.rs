use std::path::Path;

use chrono::{Local, Utc};
use serde_json::json;
use tracing::info;

use crate::cli::commands::HabitCommands;
use crate::db::{connection, habit_repo};
use crate::engine::streak;
use crate::error::LifeorgError;
use crate::models::Habit;
use crate::output;

pub fn run(cmd: HabitCommands, db_path: &Path, json_output: bool) -> i32 {
    let result = match cmd {
        HabitCommands::Add { name, goal } => run_add(&name, goal, db_path, json_output),
        HabitCommands::List => run_list(db_path, json_output),
        HabitCommands::Show { id } => run_show(&id, db_path, json_output),
        HabitCommands::Check { id } => run_check(&id, db_path, json_output),
        HabitCommands::Delete { id } => run_delete(&id, db_path, json_output),
    };
    super::finish(result, json_output)
}

fn run_add(name: &str, goal: u32, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    super::require_text("Habit name", name)?;
    if goal == 0 {
        return Err(LifeorgError::validation("Goal must be at least 1 day"));
    }

    let conn = connection::open_db(db_path)?;
    let habit = Habit::new(name, goal, Utc::now());
    habit_repo::put_habit(&conn, &habit)?;
    info!(id = %habit.id, goal, "habit added");

    if json_output {
        let today = Local::now().date_naive();
        output::json::print(&output::json::success(json!({
            "habit": output::json::habit_json(&habit, today, &Local)
        })));
    } else {
        println!("Added habit: {} ({}), goal {} days", habit.name, habit.id, habit.goal);
    }
    Ok(0)
}

fn run_list(db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let habits = habit_repo::list_habits(&conn)?;
    let today = Local::now().date_naive();

    if json_output {
        let list: Vec<_> = habits
            .iter()
            .map(|h| output::json::habit_json(h, today, &Local))
            .collect();
        output::json::print(&output::json::success(json!({ "habits": list })));
    } else {
        output::text::print_habit_list(&habits, today);
    }
    Ok(0)
}

fn run_show(id: &str, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let habit = habit_repo::resolve_habit(&conn, id)?;
    let today = Local::now().date_naive();

    if json_output {
        output::json::print(&output::json::success(json!({
            "habit": output::json::habit_json(&habit, today, &Local)
        })));
    } else {
        output::text::print_habit(&habit, today);
        if habit.checked_dates().is_empty() {
            println!("  No check-ins yet.");
        } else {
            println!("  Check-ins:");
            let mut dates: Vec<_> = habit.checked_dates().to_vec();
            dates.sort();
            for d in dates.iter().rev() {
                println!("    {}", d.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            }
        }
    }
    Ok(0)
}

fn run_check(id: &str, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let mut habit = habit_repo::resolve_habit(&conn, id)?;
    let now = Local::now();
    let checked = streak::toggle_check_in(&mut habit, &now);
    habit_repo::put_habit(&conn, &habit)?;
    info!(id = %habit.id, checked, streak = habit.current_streak(), "habit toggled");

    if json_output {
        output::json::print(&output::json::success(json!({
            "checked": checked,
            "habit": output::json::habit_json(&habit, now.date_naive(), &Local)
        })));
    } else if checked {
        println!(
            "Checked in {} for today. Streak: {} day(s)",
            habit.name,
            habit.current_streak()
        );
    } else {
        println!(
            "Removed today's check-in for {}. Streak: {} day(s)",
            habit.name,
            habit.current_streak()
        );
    }
    Ok(0)
}

fn run_delete(id: &str, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    // Exact id only: a prefix must never select some other record to remove.
    let target = habit_repo::get_habit(&conn, id)?;
    let deleted = habit_repo::delete_habit(&conn, id)?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "deleted": deleted,
            "id": id
        })));
    } else if let Some(habit) = target {
        println!("Deleted habit: {} ({})", habit.name, habit.id);
    } else {
        println!("No habit {id}; nothing to delete.");
    }
    Ok(0)
}
