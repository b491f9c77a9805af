use chrono::{Local, NaiveDate};

use crate::db::task_repo::TaskCounts;
use crate::engine::streak;
use crate::models::{BoardStatus, Habit, Quadrant, Task, TimerDurations, TimerState};

fn short_id(id: &str) -> &str {
    &id[..id.char_indices().nth(8).map_or(id.len(), |(i, _)| i)]
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.title, t.id);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    println!("  Type: {}", t.kind().as_str());
    if let Some(q) = t.placement.quadrant() {
        println!("  Quadrant: {} ({})", q.as_str(), q.label());
    }
    if let Some(s) = t.placement.status() {
        println!("  Status: {}", s.as_str());
    }
    println!("  Completed: {}", if t.completed { "yes" } else { "no" });
    println!("  Created: {}", t.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
}

pub fn print_task_lines(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("    (empty)");
        return;
    }
    for t in tasks {
        println!("    {} {} ({})", checkbox(t.completed), t.title, short_id(&t.id));
    }
}

pub fn print_matrix(cells: &[(Quadrant, Vec<Task>)]) {
    for (quadrant, tasks) in cells {
        println!("  {} - {}", quadrant.as_str(), quadrant.label());
        print_task_lines(tasks);
    }
}

pub fn print_board(columns: &[(BoardStatus, Vec<Task>)]) {
    for (status, tasks) in columns {
        println!("  {}", status.as_str());
        print_task_lines(tasks);
    }
}

pub fn print_habit(h: &Habit, today: NaiveDate) {
    let checked = streak::is_checked_on(h, today, &Local);
    println!(
        "  {} {} ({}) streak {}/{} {:.0}%",
        checkbox(checked),
        h.name,
        short_id(&h.id),
        h.current_streak(),
        h.goal,
        h.progress() * 100.0
    );
}

pub fn print_habit_list(habits: &[Habit], today: NaiveDate) {
    if habits.is_empty() {
        println!("No habits yet.");
        return;
    }
    for h in habits {
        print_habit(h, today);
    }
}

pub fn print_timer(state: &TimerState) {
    println!(
        "{} {} [{}] completed today: {}",
        state.mode.label(),
        state.display(),
        if state.is_running { "running" } else { "stopped" },
        state.completed_today
    );
}

pub fn print_durations(d: &TimerDurations) {
    println!(
        "Focus {}m, short break {}m, long break {}m",
        d.focus_minutes, d.short_break_minutes, d.long_break_minutes
    );
}

pub fn print_counts(c: &TaskCounts) {
    println!(
        "Tasks: {} total ({} matrix, {} board), {} completed",
        c.total, c.matrix, c.board, c.completed
    );
}
