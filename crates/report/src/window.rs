//! Calendar-week arithmetic.
//!
//! Weeks run Sunday to Sunday in UTC. A window is always the half-open
//! interval `[Sunday 00:00, next Sunday 00:00)`, so consecutive offsets tile
//! the timeline without gaps or overlap.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::{TimeWindow, Timestamp};

/// Offsets are clamped to roughly ±10 000 years so date arithmetic never
/// leaves chrono's representable range.
const MAX_WEEK_OFFSET: i64 = 520_000;

/// Returns the week window `offset` weeks away from the week containing `now`.
///
/// `offset == 0` is the current week, `-1` the previous one, `1` the next.
pub fn week_window(now: DateTime<Utc>, offset: i64) -> TimeWindow {
    let offset = offset.clamp(-MAX_WEEK_OFFSET, MAX_WEEK_OFFSET);
    let today = now.date_naive();
    let shifted = today
        .checked_add_signed(TimeDelta::weeks(offset))
        .unwrap_or(today);
    let sunday = shifted - Days::new(u64::from(shifted.weekday().num_days_from_sunday()));
    let start = Utc.from_utc_datetime(&sunday.and_time(NaiveTime::MIN));

    TimeWindow::starting_week(Timestamp::from_utc(start))
}

/// Week number of `date` in US numbering: weeks start on Sunday and week 1 is
/// the week containing 1 January. Late-December days that share a week with
/// the next 1 January belong to week 1.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let week_start = date - Days::new(u64::from(date.weekday().num_days_from_sunday()));
    let week_end = week_start + Days::new(6);
    if week_end.year() != week_start.year() {
        return 1;
    }

    // week_start and date share a year here, so 1 January is representable.
    let Some(jan1) = NaiveDate::from_ymd_opt(week_start.year(), 1, 1) else {
        return 1;
    };
    let first_week = jan1 - Days::new(u64::from(jan1.weekday().num_days_from_sunday()));
    ((week_start - first_week).num_days() / 7) as u32 + 1
}

/// How the user selected the reporting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSelector {
    /// Weeks relative to the current one (`0` = this week, negative = past).
    Offset(i64),
    /// Week number within the current year (US numbering, see [`week_of_year`]).
    WeekOfYear(u32),
}

impl WeekSelector {
    /// Resolves the selector against `now`.
    pub fn resolve(self, now: DateTime<Utc>) -> TimeWindow {
        match self {
            WeekSelector::Offset(offset) => week_window(now, offset),
            WeekSelector::WeekOfYear(week) => {
                let current = week_of_year(now.date_naive());
                week_window(now, i64::from(week) - i64::from(current))
            }
        }
    }
}

impl std::fmt::Display for WeekSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekSelector::Offset(offset) => write!(f, "{offset}"),
            WeekSelector::WeekOfYear(week) => write!(f, "#{week}"),
        }
    }
}
