//! Time handling for transaction logs
//!
//! Transaction logs carry a calendar `date` and a wall-clock `time` column.
//! Records are ordered by the combined timestamp, with `arrival_time_min`
//! (minutes since the log's reference origin) as the tie-breaker.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Minutes in one hour; converts per-hour rates into per-minute waits.
pub const MINUTES_PER_HOUR: f64 = 60.0;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Combine a `date` and `time` column into one timestamp
///
/// Accepts `YYYY-MM-DD` dates and `HH:MM:SS` or `HH:MM` times.
/// Returns `None` when either part cannot be parsed.
///
/// # Example
/// ```
/// use atm_queue_core_rs::core::time::parse_timestamp;
///
/// let ts = parse_timestamp("2024-03-01", "09:15").unwrap();
/// assert_eq!(ts.to_string(), "2024-03-01 09:15:00");
/// assert!(parse_timestamp("2024-03-01", "quarter past nine").is_none());
/// ```
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time.trim(), fmt).ok())?;
    Some(date.and_time(time))
}

/// Format a timestamp back into the log's `date` and `time` columns
pub fn format_timestamp(ts: &NaiveDateTime) -> (String, String) {
    (
        ts.format(DATE_FORMAT).to_string(),
        ts.format(TIME_FORMATS[0]).to_string(),
    )
}
