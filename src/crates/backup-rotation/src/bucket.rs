use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity at which one representative backup is kept.
///
/// Weeks follow ISO 8601, so the week bucket of 2016-01-01 belongs to
/// week 53 of ISO year 2015.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Year,
    Month,
    Week,
    Day,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Year, Bucket::Month, Bucket::Week, Bucket::Day];

    /// Returns the bucket value `date` falls into.
    pub fn key(self, date: NaiveDate) -> BucketKey {
        let iso = date.iso_week();

        match self {
            Bucket::Year => BucketKey::Year { year: date.year() },
            Bucket::Month => BucketKey::Month {
                year: date.year(),
                month: date.month(),
            },
            Bucket::Week => BucketKey::Week {
                year: iso.year(),
                week: iso.week(),
            },
            Bucket::Day => BucketKey::Day {
                year: iso.year(),
                week: iso.week(),
                weekday: date.weekday().number_from_monday(),
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Year => "year",
            Bucket::Month => "month",
            Bucket::Week => "week",
            Bucket::Day => "day",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "year" | "yearly" => Ok(Bucket::Year),
            "month" | "monthly" => Ok(Bucket::Month),
            "week" | "weekly" => Ok(Bucket::Week),
            "day" | "daily" => Ok(Bucket::Day),
            _ => Err(format!(
                "Invalid bucket: {}. Use 'year', 'month', 'week' or 'day'",
                s
            )),
        }
    }
}

/// A composite grouping key derived from a date.
///
/// Each variant carries its components as separate fields, so keys of
/// different periods never alias the way concatenated strings could.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Year { year: i32 },
    Month { year: i32, month: u32 },
    Week { year: i32, week: u32 },
    Day { year: i32, week: u32, weekday: u32 },
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Year { year } => write!(f, "{year:04}"),
            BucketKey::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            BucketKey::Week { year, week } => write!(f, "{year:04}-W{week:02}"),
            BucketKey::Day {
                year,
                week,
                weekday,
            } => write!(f, "{year:04}-W{week:02}-{weekday}"),
        }
    }
}
