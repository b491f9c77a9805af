use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FOCUS_TIME_KEY: &str = "focusTime";
pub const SHORT_BREAK_KEY: &str = "shortBreak";
pub const LONG_BREAK_KEY: &str = "longBreak";

/// One entry of the settings collection. Values are opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: Value,
}

impl Setting {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// The timer settings the app knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SettingKey {
    #[value(name = "focusTime", alias = "focus")]
    FocusTime,
    #[value(name = "shortBreak", alias = "short-break")]
    ShortBreak,
    #[value(name = "longBreak", alias = "long-break")]
    LongBreak,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [Self::FocusTime, Self::ShortBreak, Self::LongBreak];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FocusTime => FOCUS_TIME_KEY,
            Self::ShortBreak => SHORT_BREAK_KEY,
            Self::LongBreak => LONG_BREAK_KEY,
        }
    }

    pub fn default_minutes(&self) -> u32 {
        match self {
            Self::FocusTime => 25,
            Self::ShortBreak => 5,
            Self::LongBreak => 15,
        }
    }
}

/// Interval lengths in minutes, as read from the settings collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerDurations {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            focus_minutes: SettingKey::FocusTime.default_minutes(),
            short_break_minutes: SettingKey::ShortBreak.default_minutes(),
            long_break_minutes: SettingKey::LongBreak.default_minutes(),
        }
    }
}

impl TimerDurations {
    /// Build durations from stored settings. A missing key, or a value that is
    /// not a positive integer, falls back to the default for that key.
    pub fn from_settings(settings: &[Setting]) -> Self {
        let minutes = |key: SettingKey| {
            settings
                .iter()
                .find(|s| s.key == key.as_str())
                .and_then(|s| positive_minutes(&s.value))
                .unwrap_or_else(|| key.default_minutes())
        };
        Self {
            focus_minutes: minutes(SettingKey::FocusTime),
            short_break_minutes: minutes(SettingKey::ShortBreak),
            long_break_minutes: minutes(SettingKey::LongBreak),
        }
    }

    pub fn minutes(&self, key: SettingKey) -> u32 {
        match key {
            SettingKey::FocusTime => self.focus_minutes,
            SettingKey::ShortBreak => self.short_break_minutes,
            SettingKey::LongBreak => self.long_break_minutes,
        }
    }

    pub fn focus_secs(&self) -> u32 {
        self.focus_minutes.saturating_mul(60)
    }

    pub fn short_break_secs(&self) -> u32 {
        self.short_break_minutes.saturating_mul(60)
    }
}

/// Accepts JSON numbers and numeric strings, as older exports stored both.
fn positive_minutes(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|m| *m > 0 && *m <= 24 * 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_nothing_is_stored() {
        let d = TimerDurations::from_settings(&[]);
        assert_eq!(d, TimerDurations::default());
        assert_eq!(d.focus_secs(), 1500);
        assert_eq!(d.short_break_secs(), 300);
    }

    #[test]
    fn seconds_saturate_for_oversized_minutes() {
        let d = TimerDurations {
            focus_minutes: u32::MAX,
            short_break_minutes: u32::MAX / 2,
            long_break_minutes: 15,
        };
        assert_eq!(d.focus_secs(), u32::MAX);
        assert_eq!(d.short_break_secs(), u32::MAX);
    }

    #[test]
    fn stored_values_override_defaults() {
        let settings = vec![
            Setting::new(FOCUS_TIME_KEY, json!(50)),
            Setting::new(SHORT_BREAK_KEY, json!("10")),
            Setting::new("theme", json!("dark")),
        ];
        let d = TimerDurations::from_settings(&settings);
        assert_eq!(d.focus_minutes, 50);
        assert_eq!(d.short_break_minutes, 10);
        assert_eq!(d.long_break_minutes, 15);
    }

    #[test]
    fn invalid_values_fall_back() {
        let settings = vec![
            Setting::new(FOCUS_TIME_KEY, json!(0)),
            Setting::new(SHORT_BREAK_KEY, json!(-3)),
            Setting::new(LONG_BREAK_KEY, json!(null)),
        ];
        assert_eq!(
            TimerDurations::from_settings(&settings),
            TimerDurations::default()
        );
    }
}
