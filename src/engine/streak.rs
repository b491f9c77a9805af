//! Habit check-ins and streak computation.
//!
//! Everything here works on calendar days in the caller's time zone: two
//! check-ins on the same local day count once, and day gaps are measured
//! between dates, never as elapsed hours.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::Habit;

/// Check the habit in for the local day of `now`, or undo today's check-in
/// if there already is one. Derived fields are recomputed either way.
///
/// Returns `true` when the habit is checked for that day afterwards.
pub fn toggle_check_in<Tz: TimeZone>(habit: &mut Habit, now: &DateTime<Tz>) -> bool {
    let tz = now.timezone();
    let today = now.date_naive();

    let before = habit.checked_dates.len();
    habit
        .checked_dates
        .retain(|d| local_day(d, &tz) != today);
    let was_checked = habit.checked_dates.len() != before;

    if !was_checked {
        habit.checked_dates.push(now.with_timezone(&Utc));
    }
    refresh(habit, &tz);
    !was_checked
}

/// Recompute `last_checked` and `current_streak` from the check-in history.
pub fn refresh<Tz: TimeZone>(habit: &mut Habit, tz: &Tz) {
    habit.last_checked = habit.checked_dates.iter().max().copied();
    habit.current_streak = compute_streak(&habit.checked_dates, tz);
}

/// Length of the run of consecutive days ending at the most recent check-in.
///
/// The run is anchored at the latest checked day even if that day is in the
/// past; whether the streak is still "alive" is for the caller to judge.
pub fn compute_streak<Tz: TimeZone>(checked_dates: &[DateTime<Utc>], tz: &Tz) -> u32 {
    let days: BTreeSet<NaiveDate> = checked_dates.iter().map(|d| local_day(d, tz)).collect();

    let mut iter = days.iter().rev();
    let Some(mut previous) = iter.next().copied() else {
        return 0;
    };

    let mut streak = 1;
    for day in iter {
        if (previous - *day).num_days() != 1 {
            break;
        }
        streak += 1;
        previous = *day;
    }
    streak
}

pub fn is_checked_on<Tz: TimeZone>(habit: &Habit, day: NaiveDate, tz: &Tz) -> bool {
    habit.checked_dates.iter().any(|d| local_day(d, tz) == day)
}

fn local_day<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2026, 10, day, hour, 15, 0).unwrap()
    }

    fn utc(day: u32, hour: u32) -> DateTime<Utc> {
        at(day, hour).with_timezone(&Utc)
    }

    fn new_habit() -> Habit {
        Habit::new("Stretch", 10, utc(1, 8))
    }

    #[test]
    fn empty_history_has_zero_streak() {
        assert_eq!(compute_streak(&[], &tz()), 0);
    }

    #[test]
    fn non_empty_history_has_positive_streak() {
        assert_eq!(compute_streak(&[utc(3, 12)], &tz()), 1);
        assert_eq!(compute_streak(&[utc(3, 12), utc(9, 12)], &tz()), 1);
    }

    #[test]
    fn three_consecutive_days() {
        let dates = vec![utc(18, 9), utc(17, 22), utc(16, 6)];
        assert_eq!(compute_streak(&dates, &tz()), 3);
    }

    #[test]
    fn gap_stops_the_scan() {
        // N, N-1, N-2 and N-4: the missing N-3 ends the run.
        let dates = vec![utc(18, 9), utc(17, 9), utc(16, 9), utc(14, 9)];
        assert_eq!(compute_streak(&dates, &tz()), 3);
    }

    #[test]
    fn latest_day_anchors_even_if_old() {
        let dates = vec![utc(5, 9), utc(4, 9), utc(1, 9)];
        assert_eq!(compute_streak(&dates, &tz()), 2);
    }

    #[test]
    fn duplicate_days_count_once() {
        let dates = vec![utc(10, 7), utc(10, 21), utc(9, 12)];
        assert_eq!(compute_streak(&dates, &tz()), 2);
    }

    #[test]
    fn days_follow_the_local_calendar() {
        // 23:30 and 00:30 local are one hour apart but on different days.
        let late = tz().with_ymd_and_hms(2026, 10, 9, 23, 30, 0).unwrap();
        let early = late + Duration::hours(1);
        let dates = vec![late.with_timezone(&Utc), early.with_timezone(&Utc)];
        assert_eq!(compute_streak(&dates, &tz()), 2);

        // 00:10 and 23:50 on the same local day are almost 24h apart.
        let start = tz().with_ymd_and_hms(2026, 10, 9, 0, 10, 0).unwrap();
        let end = tz().with_ymd_and_hms(2026, 10, 9, 23, 50, 0).unwrap();
        let dates = vec![start.with_timezone(&Utc), end.with_timezone(&Utc)];
        assert_eq!(compute_streak(&dates, &tz()), 1);
    }

    #[test]
    fn toggle_on_then_off_restores_history() {
        let mut habit = new_habit();
        toggle_check_in(&mut habit, &at(7, 9));
        toggle_check_in(&mut habit, &at(8, 9));
        let before = habit.clone();

        assert!(toggle_check_in(&mut habit, &at(9, 10)));
        assert_eq!(habit.checked_dates().len(), 3);
        assert_eq!(habit.current_streak(), 3);
        assert_eq!(habit.last_checked(), Some(utc(9, 10)));

        assert!(!toggle_check_in(&mut habit, &at(9, 18)));
        assert_eq!(habit, before);
    }

    #[test]
    fn toggle_never_double_inserts_a_day() {
        let mut habit = new_habit();
        toggle_check_in(&mut habit, &at(9, 8));
        toggle_check_in(&mut habit, &at(9, 20));
        assert!(habit.checked_dates().is_empty());
        assert_eq!(habit.last_checked(), None);
        assert_eq!(habit.current_streak(), 0);
    }

    #[test]
    fn untoggle_removes_every_entry_for_the_day() {
        let mut habit = new_habit();
        habit.checked_dates = vec![utc(8, 9), utc(9, 7), utc(9, 19)];
        refresh(&mut habit, &tz());
        assert_eq!(habit.current_streak(), 2);

        assert!(!toggle_check_in(&mut habit, &at(9, 21)));
        assert_eq!(habit.checked_dates(), &[utc(8, 9)]);
        assert_eq!(habit.last_checked(), Some(utc(8, 9)));
        assert_eq!(habit.current_streak(), 1);
    }

    #[test]
    fn cached_streak_matches_recompute_after_each_toggle() {
        let mut habit = new_habit();
        for (day, hour) in [(1, 9), (2, 9), (2, 11), (4, 9), (3, 9), (5, 9), (3, 10)] {
            toggle_check_in(&mut habit, &at(day, hour));
            assert_eq!(
                habit.current_streak(),
                compute_streak(habit.checked_dates(), &tz())
            );
            assert_eq!(
                habit.last_checked(),
                habit.checked_dates().iter().max().copied()
            );
        }
    }

    #[test]
    fn checked_on_uses_local_day() {
        let mut habit = new_habit();
        toggle_check_in(&mut habit, &at(9, 23));
        let day = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        assert!(is_checked_on(&habit, day, &tz()));
        assert!(!is_checked_on(&habit, day.succ_opt().unwrap(), &tz()));
    }

    #[test]
    fn progress_is_capped() {
        let mut habit = Habit::new("Walk", 2, utc(1, 8));
        for day in 1..=3 {
            toggle_check_in(&mut habit, &at(day, 9));
        }
        assert_eq!(habit.current_streak(), 3);
        assert_eq!(habit.progress(), 1.0);
    }
}
