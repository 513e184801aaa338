//! Time zone resolution and midnight truncation.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
pub use chrono_tz::Tz;
use tracing::warn;

/// Longest DST gap we walk across when midnight itself does not exist.
const MAX_GAP_MINUTES: i64 = 180;

/// Parse an IANA zone name.
pub fn parse_timezone(name: &str) -> Result<Tz, crate::WindowError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| crate::WindowError::InvalidTimezone(format!("'{}'", name)))
}

/// Resolve a zone name, using `fallback` when it is not a known IANA zone.
pub fn resolve_or(name: &str, fallback: Tz) -> Tz {
    match parse_timezone(name) {
        Ok(tz) => tz,
        Err(e) => {
            warn!(error = %e, fallback = %fallback.name(), "using fallback time zone");
            fallback
        }
    }
}

/// The process' default zone: `TZ` when it names an IANA zone, UTC otherwise.
pub fn system_default_with<F>(mut get: F) -> Tz
where
    F: FnMut(&str) -> Option<String>,
{
    get("TZ")
        .map(|v| v.trim_start_matches(':').to_string())
        .and_then(|v| v.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Calendar date of `instant` as seen in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// First instant of `date` in `tz`.
///
/// Ambiguous midnights resolve to the earlier instant. When midnight falls in
/// a DST gap the first valid local time of that day is used instead.
pub fn midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    let start = date.and_time(NaiveTime::MIN);
    (0..=MAX_GAP_MINUTES).find_map(|minute| {
        let local = start.checked_add_signed(TimeDelta::minutes(minute))?;
        tz.from_local_datetime(&local).earliest()
    })
}

/// Epoch seconds of [`midnight`]; falls back to UTC midnight if the zone has
/// no valid instant on that date at all.
pub fn midnight_timestamp(date: NaiveDate, tz: Tz) -> i64 {
    midnight(date, tz)
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// Calendar date of an epoch-seconds timestamp in `tz`.
pub fn date_from_timestamp(ts: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|utc| local_date(utc, tz))
}
