//! Extraction of the backup date embedded in an artifact name.
//!
//! Two notations are recognized, each optionally followed by a `_HH:MM:SS`
//! time of day and an arbitrary suffix:
//!
//! - `DD.MM.YYYY`, e.g. `phpmyadmin-02.05.2016_08:10:02.tar.gz`
//! - `YYYY-MM-DD`, e.g. `mysql-2016-05-12_15:34:45.gz`
//!
//! The first date-shaped substring of the name is used. The time of day is
//! validated but not part of the result.

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use thiserror::Error;

// A date must not be glued to other digits on either side. This is also what
// makes the hyphen in `prefix-2016-05-12` a separator: it is consumed by the
// leading non-digit class and never read as the sign of the year.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^0-9])(?:(?P<dmy_day>[0-9]{2})\.(?P<dmy_month>[0-9]{2})\.(?P<dmy_year>[0-9]{4})|(?P<ymd_year>[0-9]{4})-(?P<ymd_month>[0-9]{2})-(?P<ymd_day>[0-9]{2}))(?:_(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2}))?(?:[^0-9]|$)",
    )
    .unwrap()
});

/// Reasons a name does not resolve to a date.
///
/// This is an expected outcome for files such as `README`, not a failure of
/// the batch. Names that produce it are left out of the record set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotADate {
    /// The name contains nothing shaped like a date
    #[error("No date found in {name:?}")]
    Missing { name: String },

    /// The name contains a date-shaped substring that is not a real date or time
    #[error("Invalid date {text:?} in {name:?}")]
    Invalid { name: String, text: String },
}

/// The notation a date was written in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Notation {
    /// `DD.MM.YYYY`
    DayMonthYear,
    /// `YYYY-MM-DD`
    YearMonthDay,
}

/// Resolves the calendar date a backup name was stamped with.
pub fn resolve(name: &str) -> Result<NaiveDate, NotADate> {
    resolve_with_notation(name).map(|(date, _)| date)
}

/// Like [`resolve`], also reporting which notation matched.
pub fn resolve_with_notation(name: &str) -> Result<(NaiveDate, Notation), NotADate> {
    let Some(caps) = DATE_PATTERN.captures(name) else {
        return Err(NotADate::Missing {
            name: name.to_string(),
        });
    };

    let (notation, (year, month, day)) = if caps.name("dmy_year").is_some() {
        (
            Notation::DayMonthYear,
            (
                number(&caps, "dmy_year"),
                number(&caps, "dmy_month"),
                number(&caps, "dmy_day"),
            ),
        )
    } else {
        (
            Notation::YearMonthDay,
            (
                number(&caps, "ymd_year"),
                number(&caps, "ymd_month"),
                number(&caps, "ymd_day"),
            ),
        )
    };

    let invalid = || NotADate::Invalid {
        name: name.to_string(),
        text: matched_text(name, &caps).to_string(),
    };

    if caps.name("hour").is_some() {
        NaiveTime::from_hms_opt(
            number(&caps, "hour"),
            number(&caps, "minute"),
            number(&caps, "second"),
        )
        .ok_or_else(invalid)?;
    }

    let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)?;
    Ok((date, notation))
}

// Capture groups only ever hold ASCII digits of bounded width.
fn number(caps: &Captures<'_>, group: &str) -> u32 {
    caps.name(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_default()
}

/// The date (and time, if any) portion of a match, without the boundary characters.
fn matched_text<'h>(name: &'h str, caps: &Captures<'h>) -> &'h str {
    let Some(whole) = caps.get(0) else {
        return "";
    };

    let first = ["dmy_day", "ymd_year"]
        .iter()
        .filter_map(|g| caps.name(g))
        .map(|m| m.start())
        .min()
        .unwrap_or(whole.start());
    let last = ["second", "dmy_year", "ymd_day"]
        .iter()
        .filter_map(|g| caps.name(g))
        .map(|m| m.end())
        .max()
        .unwrap_or(whole.end());

    &name[first..last]
}
