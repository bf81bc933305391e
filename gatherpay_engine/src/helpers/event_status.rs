//! Lifecycle status of an event.
//!
//! An event's status is never read from storage. It is derived from the scheduled date and time, the current instant
//! and the optional manual override. Listing, detail views and sorting all go through [`derive_status`].
use std::sync::OnceLock;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use thiserror::Error;

use crate::db_types::EventStatus;

/// Half-width, in hours, of the window around the start time during which a same-day event counts as ongoing.
pub const ONGOING_WINDOW_HOURS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid event time '{0}'. Expected HH:MM")]
    MalformedTime(String),
    #[error("Invalid event time '{0}'. Hour or minute is out of range")]
    OutOfRange(String),
    #[error("The scheduled time {0} does not exist in the event time zone")]
    NonexistentInstant(String),
    #[error("Invalid UTC offset '{0}'. Expected something like +05:30")]
    InvalidOffset(String),
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap())
}

fn offset_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").unwrap())
}

/// Parses a local `HH:MM` start time. Single-digit hours are accepted. Surrounding whitespace is not.
pub fn parse_scheduled_time(time: &str) -> Result<NaiveTime, ScheduleError> {
    let caps = time_regex().captures(time).ok_or_else(|| ScheduleError::MalformedTime(time.to_string()))?;
    let hour = caps[1].parse::<u32>().map_err(|_| ScheduleError::MalformedTime(time.to_string()))?;
    let minute = caps[2].parse::<u32>().map_err(|_| ScheduleError::MalformedTime(time.to_string()))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| ScheduleError::OutOfRange(time.to_string()))
}

/// Parses a fixed UTC offset, e.g. `+05:30`, `-0800` or `Z`.
pub fn parse_utc_offset(offset: &str) -> Result<FixedOffset, ScheduleError> {
    let s = offset.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| ScheduleError::InvalidOffset(offset.to_string()));
    }
    let caps = offset_regex().captures(s).ok_or_else(|| ScheduleError::InvalidOffset(offset.to_string()))?;
    let hours = caps[2].parse::<i32>().map_err(|_| ScheduleError::InvalidOffset(offset.to_string()))?;
    let minutes = caps[3].parse::<i32>().map_err(|_| ScheduleError::InvalidOffset(offset.to_string()))?;
    if minutes >= 60 {
        return Err(ScheduleError::InvalidOffset(offset.to_string()));
    }
    let secs = (hours * 3600 + minutes * 60) * if &caps[1] == "-" { -1 } else { 1 };
    FixedOffset::east_opt(secs).ok_or_else(|| ScheduleError::InvalidOffset(offset.to_string()))
}

/// Computes the lifecycle phase of an event.
///
/// * A `Cancelled` override always wins.
/// * If the event falls on the same calendar day as `now` (in `tz`) and starts within [`ONGOING_WINDOW_HOURS`] of `now`,
///   in either direction, it is `Ongoing`.
/// * Otherwise it is `Upcoming` if it starts after `now`, and `Completed` if not.
pub fn derive_status(
    date: NaiveDate,
    time: &str,
    now: DateTime<Utc>,
    status_override: Option<EventStatus>,
    tz: &FixedOffset,
) -> Result<EventStatus, ScheduleError> {
    if status_override == Some(EventStatus::Cancelled) {
        return Ok(EventStatus::Cancelled);
    }
    let start = parse_scheduled_time(time)?;
    let local = date.and_time(start);
    let event_instant = tz
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| ScheduleError::NonexistentInstant(local.to_string()))?
        .with_timezone(&Utc);
    let today = now.with_timezone(tz).date_naive();
    let distance = (event_instant - now).abs();
    let status = if date == today && distance <= Duration::hours(ONGOING_WINDOW_HOURS) {
        EventStatus::Ongoing
    } else if event_instant > now {
        EventStatus::Upcoming
    } else {
        EventStatus::Completed
    };
    Ok(status)
}
