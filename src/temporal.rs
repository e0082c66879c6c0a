//! Recognition of date and time values inside gateway responses.
//!
//! The gateway returns dates as plain JSON strings in a handful of shapes.
//! [`extract`] tries an ordered list of rules against a string and the first
//! rule that matches wins:
//!
//! 1. ISO-8601-like dates and datetimes: `2023-01-15`, `2023-01-15T10:30`,
//!    `2023-01-15T10:30:00`, `2023-01-15T10:30:00.123456`;
//! 2. fixed-width `MMDDYYYY` dates: `01152023`;
//! 3. clock times: `9:05`, `09:05`, `9:05 PM`.
//!
//! Only ASCII digits are recognized. A clock time with an AM/PM marker must use a 12-hour
//! clock, so `0:30 AM` is not a time while `00:30` is.

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::fmt;

/// Fields whose naive datetimes are expressed in the gateway's local timezone.
pub static TZ_AWARE_FIELDS: &[&str] = &["trans_date_and_time"];

static ISO_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2})(?:T([0-9]{2}):([0-9]{2})(?::([0-9]{2})(?:\.([0-9]+))?)?)?$",
    )
        .expect("valid regex")
});
static FIXED_WIDTH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})([0-9]{2})([0-9]{4})$").expect("valid regex"));
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{2})(?:\s*([AaPp][Mm]))?$").expect("valid regex")
});

type Parser = fn(&Captures) -> Option<Temporal>;

/// Rules tried in order by [`extract`].
static RULES: Lazy<[(&'static Regex, Parser); 3]> = Lazy::new(|| {
    [
        (&*ISO_DATETIME, parse_iso as Parser),
        (&*FIXED_WIDTH_DATE, parse_fixed_width_date as Parser),
        (&*CLOCK_TIME, parse_clock_time as Parser),
    ]
});

/// A date or time value recognized in a gateway response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Temporal {
    /// Calendar date without a time component.
    Date(NaiveDate),
    /// Time of day without a date.
    Time(NaiveTime),
    /// Date and time without timezone information.
    DateTime(NaiveDateTime),
    /// Instant normalized to UTC.
    Utc(DateTime<Utc>),
}

impl Temporal {
    /// Returns the date component, if this value has one.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Temporal::Date(d) => Some(*d),
            Temporal::Time(_) => None,
            Temporal::DateTime(dt) => Some(dt.date()),
            Temporal::Utc(dt) => Some(dt.date_naive()),
        }
    }

    /// Returns the time component, if this value has one.
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Temporal::Date(_) => None,
            Temporal::Time(t) => Some(*t),
            Temporal::DateTime(dt) => Some(dt.time()),
            Temporal::Utc(dt) => Some(dt.time()),
        }
    }

    /// ISO-8601 rendering of the value.
    ///
    /// Fractional seconds are printed only when non-zero and UTC instants carry an explicit
    /// `+00:00` offset.
    pub fn to_iso8601(&self) -> String {
        match self {
            Temporal::Date(d) => d.format("%Y-%m-%d").to_string(),
            Temporal::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            Temporal::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Temporal::Utc(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Classifies `value` as a date, time or datetime.
///
/// Returns `None` for non-string values, for strings matching none of the known shapes,
/// and for strings that match a shape but are not a valid calendar value (e.g. `13452023`).
pub fn extract(value: &Value) -> Option<Temporal> {
    let s = value.as_str()?;
    RULES
        .iter()
        .find_map(|(pattern, parser)| pattern.captures(s).map(|caps| parser(&caps)))
        .flatten()
}

/// Like [`extract`], additionally normalizing timezone-aware fields to UTC.
///
/// `field` is the snake_case name of the field holding `value`. Naive datetimes held by one of
/// the [`TZ_AWARE_FIELDS`] are interpreted in `gateway_tz` and converted to UTC. Every other
/// value is returned exactly as parsed.
pub fn extract_field(field: &str, value: &Value, gateway_tz: Option<&Tz>) -> Option<Temporal> {
    let temporal = extract(value)?;

    match (temporal, gateway_tz) {
        (Temporal::DateTime(naive), Some(tz)) if TZ_AWARE_FIELDS.contains(&field) => {
            Some(localize_to_utc(&naive, tz).map_or(temporal, Temporal::Utc))
        }
        _ => Some(temporal),
    }
}

/// Interprets `naive` as a wall-clock time in `tz` and converts it to UTC.
///
/// Ambiguous times (when clocks fall back) resolve to the earlier instant. Returns `None` for
/// times skipped when clocks spring forward.
pub fn localize_to_utc<Z: TimeZone>(naive: &NaiveDateTime, tz: &Z) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _later) => Some(earlier.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

fn number(caps: &Captures, i: usize) -> Option<u32> {
    caps.get(i)?.as_str().parse().ok()
}

fn parse_iso(caps: &Captures) -> Option<Temporal> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(caps, 2)?, number(caps, 3)?)?;

    let hour = match number(caps, 4) {
        Some(hour) => hour,
        None => return Some(Temporal::Date(date)),
    };
    let minute = number(caps, 5)?;
    let second = number(caps, 6).unwrap_or(0);
    let nanos = caps.get(7).map_or(Some(0), |m| fraction_to_nanos(m.as_str()))?;

    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    Some(Temporal::DateTime(date.and_time(time)))
}

/// Converts the digits after the decimal point into nanoseconds, ignoring digits past the ninth.
fn fraction_to_nanos(digits: &str) -> Option<u32> {
    let truncated: String = digits.chars().take(9).collect();
    let value: u32 = truncated.parse().ok()?;
    Some(value * 10u32.pow(9 - truncated.chars().count() as u32))
}

fn parse_fixed_width_date(caps: &Captures) -> Option<Temporal> {
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, number(caps, 1)?, number(caps, 2)?).map(Temporal::Date)
}

fn parse_clock_time(caps: &Captures) -> Option<Temporal> {
    let mut hour = number(caps, 1)?;
    let minute = number(caps, 2)?;

    if let Some(marker) = caps.get(3) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = marker.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, 0).map(Temporal::Time)
}
