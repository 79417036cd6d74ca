//! Conversion of automation API timestamps into the operator's time zone.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use snafu::ResultExt;

use crate::error::{self, Error, Result};

/// Layout of every timestamp shown in a notification.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolves an IANA zone name such as `Asia/Dubai`.
///
/// # Errors
///
/// Returns an error if the name is not in the time zone database.
pub fn parse_time_zone(name: &str) -> Result<Tz> {
    Tz::from_str(name)
        .map_err(|err| Error::UnknownTimeZone { name: name.to_string(), message: err.to_string() })
}

/// Converts a UTC timestamp like `2021-12-22T10:15:30.123456Z` into `zone`,
/// dropping the fractional seconds.
///
/// # Errors
///
/// Returns an error if the text does not hold a `YYYY-MM-DDTHH:MM:SS` prefix.
pub fn to_local_display(raw: &str, zone: Tz) -> Result<String> {
    let cleaned = raw.replace('T', " ").replace('Z', "");
    let whole_seconds = cleaned.split_once('.').map_or(cleaned.as_str(), |(seconds, _)| seconds);

    let naive = NaiveDateTime::parse_from_str(whole_seconds, DISPLAY_FORMAT)
        .context(error::InvalidTimestampSnafu { value: raw.to_string() })?;

    Ok(local_display(Utc.from_utc_datetime(&naive), zone))
}

/// Same as [`to_local_display`] but an absent timestamp becomes `""`.
///
/// # Errors
///
/// Returns an error if a present timestamp cannot be parsed.
pub fn to_local_display_or_empty(raw: Option<&str>, zone: Tz) -> Result<String> {
    raw.map_or_else(|| Ok(String::new()), |raw| to_local_display(raw, zone))
}

#[must_use]
pub fn local_display(instant: DateTime<Utc>, zone: Tz) -> String {
    instant.with_timezone(&zone).format(DISPLAY_FORMAT).to_string()
}
