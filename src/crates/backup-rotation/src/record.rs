use crate::bucket::{Bucket, BucketKey};
use crate::resolver::{self, NotADate};
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::fmt;

/// The instant backup ages are measured against.
///
/// Only the calendar date matters: ages are whole days.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference(pub NaiveDate);

impl Reference {
    /// The current local date.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days from `date` to this reference. Negative for future dates.
    pub fn days_since(&self, date: NaiveDate) -> i64 {
        (self.0 - date).num_days()
    }
}

impl From<NaiveDate> for Reference {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A backup name together with the date parsed out of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Record {
    name: String,
    date: NaiveDate,
    age_in_days: i64,
}

impl Record {
    /// Resolves `name` and computes its age at `reference`.
    pub fn new(name: impl Into<String>, reference: Reference) -> Result<Self, NotADate> {
        let name = name.into();
        let date = resolver::resolve(&name)?;

        Ok(Self {
            age_in_days: reference.days_since(date),
            name,
            date,
        })
    }

    /// The name exactly as it was supplied.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn age_in_days(&self) -> i64 {
        self.age_in_days
    }

    pub fn bucket(&self, bucket: Bucket) -> BucketKey {
        bucket.key(self.date)
    }

    pub fn bucket_year(&self) -> BucketKey {
        self.bucket(Bucket::Year)
    }

    pub fn bucket_month(&self) -> BucketKey {
        self.bucket(Bucket::Month)
    }

    pub fn bucket_week(&self) -> BucketKey {
        self.bucket(Bucket::Week)
    }

    pub fn bucket_day(&self) -> BucketKey {
        self.bucket(Bucket::Day)
    }
}

/// An ordered collection of distinct records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Builds a set from records in the given order, keeping the first of any
    /// identical records.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|record| seen.insert(record.clone()))
            .collect();

        Self { records }
    }

    /// Wraps records already known to be distinct.
    pub(crate) fn from_distinct(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.records.contains(record)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(Record::name).collect()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Whether every record of `self` is also in `other`.
    pub fn is_subset(&self, other: &RecordSet) -> bool {
        let other: HashSet<&Record> = other.iter().collect();
        self.records.iter().all(|r| other.contains(r))
    }

    /// Whether no record is in both sets.
    pub fn is_disjoint(&self, other: &RecordSet) -> bool {
        let other: HashSet<&Record> = other.iter().collect();
        !self.records.iter().any(|r| other.contains(r))
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
