use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HABIT_GOAL: u32 = 30;

/// A recurring habit and its check-in history.
///
/// `last_checked` and `current_streak` are derived from `checked_dates`.
/// They are only written by the functions in [`crate::engine::streak`], which
/// recompute both on every change to the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub goal: u32,
    #[serde(default)]
    pub(crate) checked_dates: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) current_streak: u32,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(name: &str, goal: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name: name.trim().to_string(),
            goal,
            checked_dates: Vec::new(),
            last_checked: None,
            current_streak: 0,
            created_at: now,
        }
    }

    pub fn checked_dates(&self) -> &[DateTime<Utc>] {
        &self.checked_dates
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    /// Share of the goal reached by the current streak, capped at 1.0.
    pub fn progress(&self) -> f64 {
        if self.goal == 0 {
            return 1.0;
        }
        (self.current_streak as f64 / self.goal as f64).min(1.0)
    }
}
