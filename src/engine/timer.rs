//! Focus/break state transitions.
//!
//! These are plain functions over an owned [`TimerState`]; scheduling the
//! one-second ticks is the job of [`super::ticker::TimerController`].

use tracing::debug;

use crate::models::{TimerDurations, TimerMode, TimerState};

/// What a finished interval was. Callers turn this into a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    FocusFinished,
    BreakFinished,
}

impl Completion {
    pub fn message(&self) -> &'static str {
        match self {
            Self::FocusFinished => "Pomodoro complete! Time for a break.",
            Self::BreakFinished => "Break is over! Ready to focus?",
        }
    }
}

impl TimerState {
    /// The stopped focus state for the given durations.
    pub fn new(durations: &TimerDurations) -> Self {
        Self {
            time_left_secs: durations.focus_secs(),
            is_running: false,
            mode: TimerMode::Focus,
            completed_today: 0,
        }
    }

    /// Returns `false` and changes nothing if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Back to a stopped focus interval of the configured length.
    /// `completed_today` is kept.
    pub fn reset(&mut self, durations: &TimerDurations) {
        self.is_running = false;
        self.mode = TimerMode::Focus;
        self.time_left_secs = durations.focus_secs();
    }

    /// Advance one second. Ignored while stopped. Reaching zero completes
    /// the interval, which always leaves the timer stopped.
    pub fn tick(&mut self, durations: &TimerDurations) -> Option<Completion> {
        if !self.is_running {
            return None;
        }
        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs == 0 {
            Some(self.complete(durations))
        } else {
            None
        }
    }

    fn complete(&mut self, durations: &TimerDurations) -> Completion {
        self.pause();
        let completion = if self.mode.is_break() {
            self.reset(durations);
            Completion::BreakFinished
        } else {
            self.completed_today += 1;
            self.mode = TimerMode::ShortBreak;
            self.time_left_secs = durations.short_break_secs();
            Completion::FocusFinished
        };
        debug!(?completion, mode = self.mode.as_str(), "interval completed");
        completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations() -> TimerDurations {
        TimerDurations::default()
    }

    fn run_ticks(state: &mut TimerState, n: u32) -> Vec<Completion> {
        (0..n).filter_map(|_| state.tick(&durations())).collect()
    }

    #[test]
    fn fresh_state_is_stopped_focus() {
        let state = TimerState::new(&durations());
        assert_eq!(state.time_left_secs, 1500);
        assert!(!state.is_running);
        assert_eq!(state.mode, TimerMode::Focus);
        assert_eq!(state.completed_today, 0);
        assert_eq!(state.display(), "25:00");
    }

    #[test]
    fn full_focus_interval_moves_to_short_break_once() {
        let mut state = TimerState::new(&durations());
        assert!(state.start());
        let completions = run_ticks(&mut state, 1500);

        assert_eq!(completions, vec![Completion::FocusFinished]);
        assert_eq!(state.mode, TimerMode::ShortBreak);
        assert_eq!(state.time_left_secs, 300);
        assert_eq!(state.completed_today, 1);
        assert!(!state.is_running);

        // Stopped: further ticks do nothing until started again.
        assert!(run_ticks(&mut state, 10).is_empty());
        assert_eq!(state.time_left_secs, 300);
    }

    #[test]
    fn finished_break_resets_to_focus() {
        let mut state = TimerState::new(&durations());
        state.start();
        run_ticks(&mut state, 1500);
        state.start();
        let completions = run_ticks(&mut state, 300);

        assert_eq!(completions, vec![Completion::BreakFinished]);
        assert_eq!(state.mode, TimerMode::Focus);
        assert_eq!(state.time_left_secs, 1500);
        assert!(!state.is_running);
        assert_eq!(state.completed_today, 1);
    }

    #[test]
    fn long_break_completes_like_short_break() {
        let mut state = TimerState {
            time_left_secs: 2,
            is_running: true,
            mode: TimerMode::LongBreak,
            completed_today: 4,
        };
        assert_eq!(run_ticks(&mut state, 2), vec![Completion::BreakFinished]);
        assert_eq!(state, TimerState {
            completed_today: 4,
            ..TimerState::new(&durations())
        });
    }

    #[test]
    fn start_twice_is_ignored() {
        let mut state = TimerState::new(&durations());
        assert!(state.start());
        assert!(!state.start());
        assert!(state.is_running);
    }

    #[test]
    fn pause_preserves_remaining_time() {
        let mut state = TimerState::new(&durations());
        state.start();
        run_ticks(&mut state, 42);
        state.pause();
        run_ticks(&mut state, 100);
        assert_eq!(state.time_left_secs, 1500 - 42);
        assert_eq!(state.display(), "24:18");
    }

    #[test]
    fn reset_from_any_state() {
        let custom = TimerDurations {
            focus_minutes: 40,
            ..durations()
        };
        let states = [
            TimerState::new(&durations()),
            TimerState { time_left_secs: 17, is_running: true, mode: TimerMode::Focus, completed_today: 2 },
            TimerState { time_left_secs: 0, is_running: false, mode: TimerMode::ShortBreak, completed_today: 0 },
            TimerState { time_left_secs: 899, is_running: true, mode: TimerMode::LongBreak, completed_today: 9 },
        ];
        for mut state in states {
            let completed = state.completed_today;
            state.reset(&custom);
            assert!(!state.is_running);
            assert_eq!(state.mode, TimerMode::Focus);
            assert_eq!(state.time_left_secs, 40 * 60);
            assert_eq!(state.completed_today, completed);
        }
    }

    #[test]
    fn manual_reset_never_counts_a_session() {
        let mut state = TimerState::new(&durations());
        state.start();
        run_ticks(&mut state, 1499);
        state.reset(&durations());
        assert_eq!(state.completed_today, 0);
    }

    #[test]
    fn durations_are_read_at_transition_time() {
        let mut state = TimerState::new(&durations());
        state.start();
        run_ticks(&mut state, 1000);
        let changed = TimerDurations {
            focus_minutes: 50,
            short_break_minutes: 10,
            long_break_minutes: 20,
        };
        // The running countdown keeps its remaining time...
        assert_eq!(state.time_left_secs, 500);
        let completions: Vec<_> = (0..500).filter_map(|_| state.tick(&changed)).collect();
        // ...and the break picks up the new length.
        assert_eq!(completions, vec![Completion::FocusFinished]);
        assert_eq!(state.time_left_secs, 600);
    }
}
