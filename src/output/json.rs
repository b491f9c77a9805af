use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::db::task_repo::TaskCounts;
use crate::engine::streak;
use crate::error::LifeorgError;
use crate::models::{Habit, Task, TimerDurations, TimerState};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &LifeorgError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn print(value: &Value) {
    println!("{value:#}");
}

pub fn task_json(t: &Task) -> Value {
    json!(t)
}

pub fn habit_json<Tz: chrono::TimeZone>(h: &Habit, today: NaiveDate, tz: &Tz) -> Value {
    let mut v = json!(h);
    v["checkedToday"] = json!(streak::is_checked_on(h, today, tz));
    v["progress"] = json!((h.progress() * 1000.0).round() / 1000.0);
    v
}

pub fn timer_json(state: &TimerState, durations: &TimerDurations) -> Value {
    json!({
        "state": state,
        "display": state.display(),
        "durations": durations
    })
}

pub fn counts_json(c: &TaskCounts) -> Value {
    json!({
        "total": c.total,
        "matrix": c.matrix,
        "board": c.board,
        "completed": c.completed
    })
}
