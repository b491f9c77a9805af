use std::path::Path;

use chrono::Local;
use serde_json::json;

use crate::db::{connection, habit_repo, settings_repo, task_repo};
use crate::engine::streak;
use crate::error::LifeorgError;
use crate::output;

pub fn run(db_path: &Path, json_output: bool) -> i32 {
    super::finish(run_inner(db_path, json_output), json_output)
}

fn run_inner(db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let counts = task_repo::task_counts(&conn)?;
    let habits = habit_repo::list_habits(&conn)?;
    let durations = settings_repo::load_timer_durations(&conn)?;

    let today = Local::now().date_naive();
    let checked_today = habits
        .iter()
        .filter(|h| streak::is_checked_on(h, today, &Local))
        .count();
    let best_streak = habits.iter().map(|h| h.current_streak()).max().unwrap_or(0);

    if json_output {
        output::json::print(&output::json::success(json!({
            "store": db_path.display().to_string(),
            "tasks": output::json::counts_json(&counts),
            "habits": {
                "total": habits.len(),
                "checkedToday": checked_today,
                "bestStreak": best_streak
            },
            "durations": durations
        })));
    } else {
        println!("Store: {}", db_path.display());
        output::text::print_counts(&counts);
        println!(
            "Habits: {} total, {} checked today, best streak {} day(s)",
            habits.len(),
            checked_today,
            best_streak
        );
        output::text::print_durations(&durations);
    }
    Ok(0)
}
