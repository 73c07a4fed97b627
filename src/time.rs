use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::dates::{render, shift_days, DATE_FORMAT};
use crate::error::{Result, VaxError};

pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse::<Tz>()
        .ok()
        .or_else(|| Tz::from_str_insensitive(tz).ok())
        .ok_or_else(|| VaxError::UnknownTimezone(tz.to_string()))
}

/// Returns the local date in `tz` (default UTC) as `YYYY-MM-DD`, or in
/// `date_format` if given.
///
/// Today only counts once the local hour has reached `hour_cutoff`; before
/// that, or when no cutoff is given, yesterday is returned.
pub fn today_for_timezone(
    tz: Option<&str>,
    hour_cutoff: Option<u32>,
    date_format: Option<&str>,
) -> Result<String> {
    local_date_at(Utc::now(), tz, hour_cutoff, date_format)
}

/// Today's local date in `tz`, never rolled back.
pub fn local_date_now(tz: Option<&str>) -> Result<String> {
    today_for_timezone(tz, Some(0), None)
}

pub fn local_date_at(
    now: DateTime<Utc>,
    tz: Option<&str>,
    hour_cutoff: Option<u32>,
    date_format: Option<&str>,
) -> Result<String> {
    let tz = parse_tz(tz.unwrap_or("UTC"))?;
    let local = now.with_timezone(&tz);

    let mut date = local.date_naive();
    if hour_cutoff.map_or(true, |cutoff| local.hour() < cutoff) {
        date = shift_days(date, -1)
            .ok_or_else(|| VaxError::DateOutOfRange(format!("day before {date}")))?;
    }
    render(&date, date_format.unwrap_or(DATE_FORMAT))
}
