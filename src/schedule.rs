use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::{AppError, Result};

const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMATS: [&str; 3] = ["%H:%M", "%I:%M %p", "%I:%M%p"];

/// Parses a `DD-MM-YYYY` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected DD-MM-YYYY", raw)))
}

/// Parses `HH:mm` or `hh:mm AM/PM`, truncated to the minute.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
        .and_then(|t| t.with_second(0))
        .ok_or_else(|| AppError::Validation(format!("Invalid time '{}', expected HH:mm", raw)))
}

/// Parses a `[from, to]` working-hours pair.
pub fn parse_timings(raw: &[String]) -> Result<(NaiveTime, NaiveTime)> {
    let [from, to] = raw else {
        return Err(AppError::Validation(
            "Timings must be a [from, to] pair".to_string(),
        ));
    };
    let from = parse_time(from)?;
    let to = parse_time(to)?;
    if from > to {
        return Err(AppError::Validation(
            "Working hours must start before they end".to_string(),
        ));
    }
    Ok((from, to))
}
