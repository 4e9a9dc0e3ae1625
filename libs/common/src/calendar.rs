//! Pure date/calendar computations
//!
//! Week windows, month grids, ISO day keys, and event status classification.
//! Weeks start on Monday. All functions are stateless and perform no I/O;
//! callers pass wall-clock time in explicitly.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Number of cells in a month grid (6 rows of 7 days).
pub const MONTH_GRID_CELLS: i64 = 42;

/// Format a date as its ISO day key (`YYYY-MM-DD`).
pub fn iso_day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an ISO `YYYY-MM-DD` day key. Returns `None` for anything else.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Monday on or before `date`, shifted by `offset_weeks` whole weeks.
pub fn start_of_week(date: NaiveDate, offset_weeks: i64) -> NaiveDate {
    let days_back = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(days_back) + Duration::weeks(offset_weeks)
}

/// One day of a week strip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub iso: String,
    pub date: NaiveDate,
    pub is_today: bool,
}

/// The seven days of the week containing `today`, shifted by `offset_weeks`.
pub fn week_days(today: NaiveDate, offset_weeks: i64) -> Vec<WeekDay> {
    let start = start_of_week(today, offset_weeks);
    (0..7)
        .map(|i| {
            let date = start + Duration::days(i);
            WeekDay {
                iso: iso_day_key(date),
                date,
                is_today: date == today,
            }
        })
        .collect()
}

/// Whole weeks between the week containing `today` and the week containing
/// `target`. Negative when `target` lies in an earlier week.
pub fn week_offset_between(today: NaiveDate, target: NaiveDate) -> i64 {
    let diff = start_of_week(target, 0) - start_of_week(today, 0);
    diff.num_days() / 7
}

/// One cell of a month grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub iso: String,
    pub label: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_events: bool,
    pub is_past: bool,
}

/// 42-cell month grid for the month containing `reference`, anchored on the
/// Monday on or before the 1st.
pub fn month_grid(
    reference: NaiveDate,
    event_days: &HashSet<NaiveDate>,
    today: NaiveDate,
    selected: NaiveDate,
) -> Vec<DayCell> {
    // Day 1 exists in every month the reference date belongs to.
    let first = reference
        .with_day(1)
        .expect("first day of month is always valid");
    let grid_start = first - Duration::days(first.weekday().num_days_from_monday() as i64);

    (0..MONTH_GRID_CELLS)
        .map(|i| {
            let date = grid_start + Duration::days(i);
            DayCell {
                iso: iso_day_key(date),
                label: date.day(),
                is_current_month: date.year() == reference.year()
                    && date.month() == reference.month(),
                is_today: date == today,
                is_selected: date == selected,
                has_events: event_days.contains(&date),
                is_past: date < today,
            }
        })
        .collect()
}

/// Combine a calendar day with a 24h `HH:MM` time of day into a UTC instant.
/// Returns `None` when the time string is malformed or out of range.
pub fn apply_time(date: NaiveDate, time: &str) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    Some(date.and_time(time).and_utc())
}

/// Event status relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Past,
    Upcoming,
}

/// Classify an event against `now`. An event with no end time is considered
/// active only at its exact start instant.
pub fn event_status(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> EventStatus {
    let end = end.unwrap_or(start);

    if now >= start && now <= end {
        EventStatus::Active
    } else if now > end {
        EventStatus::Past
    } else {
        EventStatus::Upcoming
    }
}
