use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::ShortBreak => "shortBreak",
            Self::LongBreak => "longBreak",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::ShortBreak => "Short break",
            Self::LongBreak => "Long break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Self::Focus)
    }
}

/// Focus/break interval state. Transitions live in [`crate::engine::timer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    #[serde(rename = "timeLeft", alias = "timeLeftSeconds")]
    pub time_left_secs: u32,
    pub is_running: bool,
    pub mode: TimerMode,
    pub completed_today: u32,
}

impl TimerState {
    /// `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.time_left_secs / 60,
            self.time_left_secs % 60
        )
    }
}
