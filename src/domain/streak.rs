//! Habit streak calculation
//!
//! A streak is a run of consecutive calendar days on which a habit was
//! completed. Two numbers come out of a completion history:
//!
//! - `longest`: the longest run anywhere in the history
//! - `current`: the run ending at the anchor day, where the anchor is today
//!   if today is logged, otherwise yesterday. Not having logged today yet
//!   does not break the streak; missing both today and yesterday does.
//!
//! Inputs are compared at calendar-day granularity. Timestamps are reduced
//! to the calendar day of their own timezone before anything else happens,
//! and duplicate days collapse into one.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Current and longest streak for one habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
}

impl Streak {
    /// Computes streaks from timestamps, each reduced to its local calendar day
    pub fn from_timestamps<I, Tz>(stamps: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = DateTime<Tz>>,
        Tz: TimeZone,
    {
        compute_streak(stamps.into_iter().map(|ts| ts.date_naive()), today)
    }

    /// Computes streaks from ISO strings, skipping any that do not parse
    pub fn from_iso_dates<I, S>(dates: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        compute_streak(dates.into_iter().filter_map(|s| parse_day(s.as_ref())), today)
    }
}

/// Computes current and longest streaks over a set of completion days
pub fn compute_streak<I>(days: I, today: NaiveDate) -> Streak
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = days.into_iter().collect();
    if days.is_empty() {
        return Streak::default();
    }

    Streak {
        current: current_run(&days, today),
        longest: longest_run(&days),
    }
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar day
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(day);
    }
    match DateTime::parse_from_rfc3339(s) {
        Ok(ts) => Some(ts.date_naive()),
        Err(_) => {
            log::warn!("skipping unparseable completion date {:?}", s);
            None
        }
    }
}

/// Length of the longest run of consecutive days (ascending walk)
fn longest_run(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        let extends = previous
            .and_then(|prev| prev.succ_opt())
            .is_some_and(|next| next == day);
        run = if extends { run + 1 } else { 1 };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

/// Length of the run ending at today (or yesterday when today is missing)
fn current_run(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let anchor = if days.contains(&today) {
        Some(today)
    } else {
        today.pred_opt().filter(|yesterday| days.contains(yesterday))
    };

    let mut current = 0;
    let mut check = anchor;
    while let Some(day) = check.filter(|day| days.contains(day)) {
        current += 1;
        check = day.pred_opt();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(chrono::Days::new(n)).unwrap()
    }

    #[test]
    fn empty_history() {
        let streak = compute_streak(Vec::new(), today());

        assert_eq!(streak, Streak { current: 0, longest: 0 });
    }

    #[test]
    fn consecutive_days_ending_today() {
        let days = (0..5).map(days_ago);
        let streak = compute_streak(days, today());

        assert_eq!(streak, Streak { current: 5, longest: 5 });
    }

    #[test]
    fn yesterday_keeps_streak_alive() {
        let days = [days_ago(1), days_ago(2), days_ago(3)];
        let streak = compute_streak(days, today());

        assert_eq!(streak, Streak { current: 3, longest: 3 });
    }

    #[test]
    fn missing_today_and_yesterday_breaks_streak() {
        let days = [days_ago(10), days_ago(9), days_ago(2)];
        let streak = compute_streak(days, today());

        assert_eq!(streak, Streak { current: 0, longest: 2 });
    }

    #[test]
    fn old_run_does_not_inflate_current() {
        let mut days: Vec<NaiveDate> = (10..17).map(days_ago).collect();
        days.extend([days_ago(0), days_ago(1)]);
        let streak = compute_streak(days, today());

        assert_eq!(streak, Streak { current: 2, longest: 7 });
    }

    #[test]
    fn input_order_and_duplicates_do_not_matter() {
        let days = [days_ago(0), days_ago(2), days_ago(1), days_ago(0), days_ago(1)];
        let streak = compute_streak(days, today());

        assert_eq!(streak, Streak { current: 3, longest: 3 });
    }

    #[test]
    fn single_completion_today() {
        let streak = compute_streak([today()], today());

        assert_eq!(streak, Streak { current: 1, longest: 1 });
    }

    #[test]
    fn future_days_are_not_part_of_current() {
        let tomorrow = today().succ_opt().unwrap();
        let streak = compute_streak([today(), tomorrow], today());

        assert_eq!(streak, Streak { current: 1, longest: 2 });
    }

    #[test]
    fn iso_strings_are_parsed_and_bad_ones_skipped() {
        let streak = Streak::from_iso_dates(
            ["2024-03-20", "2024-03-19", "not a date", "2024-03-18T23:15:00+02:00"],
            today(),
        );

        assert_eq!(streak, Streak { current: 3, longest: 3 });
    }

    #[test]
    fn timestamps_normalize_to_their_calendar_day() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let stamps = [
            offset.with_ymd_and_hms(2024, 3, 20, 0, 30, 0).unwrap(),
            offset.with_ymd_and_hms(2024, 3, 20, 23, 59, 0).unwrap(),
            offset.with_ymd_and_hms(2024, 3, 19, 12, 0, 0).unwrap(),
        ];
        let streak = Streak::from_timestamps(stamps, today());

        assert_eq!(streak, Streak { current: 2, longest: 2 });
    }

    #[test]
    fn utc_timestamps() {
        let stamps = [Utc.with_ymd_and_hms(2024, 3, 19, 8, 0, 0).unwrap()];
        let streak = Streak::from_timestamps(stamps, today());

        assert_eq!(streak, Streak { current: 1, longest: 1 });
    }

    #[test]
    fn parse_day_formats() {
        assert_eq!(parse_day(" 2024-03-20 "), Some(today()));
        assert_eq!(parse_day("2024-03-20T10:00:00Z"), Some(today()));
        assert_eq!(parse_day("20/03/2024"), None);
    }

    proptest! {
        #[test]
        fn longest_is_never_below_current(offsets in prop::collection::vec(0u64..60, 0..40)) {
            let days: Vec<NaiveDate> = offsets.into_iter().map(days_ago).collect();
            let has_recent = days.contains(&today()) || days.contains(&days_ago(1));
            let streak = compute_streak(days, today());

            prop_assert!(streak.longest >= streak.current);
            prop_assert_eq!(streak.current == 0, !has_recent);
        }
    }
}
