use crate::bucket::{Bucket, BucketKey};
use crate::deleter::{Deleter, DeletionFailure, FsDeleter, PurgeReport};
use crate::error::{Result, RotationError};
use crate::listing::list_directory;
use crate::policy::RetentionPolicy;
use crate::record::{Record, RecordSet, Reference};
use crate::resolver::NotADate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Decides which backups to keep and which to remove.
///
/// The candidate names are captured when the engine is constructed. Records
/// are resolved from them on first use and cached for the lifetime of the
/// engine, so every query answers against the same snapshot.
#[derive(Debug)]
pub struct RetentionEngine {
    directory: PathBuf,
    names: Vec<String>,
    reference: Reference,
    records: OnceLock<RecordSet>,
}

impl RetentionEngine {
    /// Creates an engine over the backups found directly inside `directory`.
    ///
    /// Fails with [`RotationError::DirectoryNotFound`] if the directory does
    /// not exist.
    pub fn from_directory(directory: impl Into<PathBuf>, reference: Reference) -> Result<Self> {
        let directory = directory.into();
        let names = list_directory(&directory)?;

        debug!(
            "Found {} candidate names in {}",
            names.len(),
            directory.display()
        );

        Ok(Self {
            directory,
            names,
            reference,
            records: OnceLock::new(),
        })
    }

    /// Creates an engine over an explicit list of names.
    ///
    /// Deletions target the current directory unless
    /// [`in_directory`](Self::in_directory) says otherwise.
    pub fn from_names<I, S>(names: I, reference: Reference) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directory: PathBuf::from("."),
            names: names.into_iter().map(Into::into).collect(),
            reference,
            records: OnceLock::new(),
        }
    }

    /// Sets the directory the backups live in.
    pub fn in_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Returns an engine over the same names, aged against `reference`.
    pub fn with_reference(self, reference: Reference) -> Self {
        Self {
            reference,
            records: OnceLock::new(),
            ..self
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// All candidate names, including those without a date.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The backups whose names carry a date.
    pub fn records(&self) -> &RecordSet {
        self.records.get_or_init(|| {
            let records = self.names.iter().filter_map(|name| {
                match Record::new(name.as_str(), self.reference) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        debug!("Skipping {}", e);
                        None
                    }
                }
            });

            RecordSet::from_records(records)
        })
    }

    /// The candidate names that did not resolve to a date, with the reason.
    pub fn unresolved(&self) -> Vec<NotADate> {
        self.names
            .iter()
            .filter_map(|name| Record::new(name.as_str(), self.reference).err())
            .collect()
    }

    /// Number of dated backups.
    pub fn count(&self) -> usize {
        self.records().len()
    }

    /// Backups at most `days` old.
    pub fn within_days(&self, days: i64) -> RecordSet {
        self.within_days_or_last_per_bucket(days, &[])
    }

    /// Backups at most `days` old, plus the newest backup of every bucket of
    /// each granularity in `buckets`.
    ///
    /// When two backups in a bucket share the newest date, the one that comes
    /// first in [`records`](Self::records) is kept.
    pub fn within_days_or_last_per_bucket(&self, days: i64, buckets: &[Bucket]) -> RecordSet {
        self.partition(days, buckets).0
    }

    /// Backups kept under `policy`.
    pub fn kept(&self, policy: &RetentionPolicy) -> RecordSet {
        self.within_days_or_last_per_bucket(policy.keep_days, &policy.keep_last_per)
    }

    /// Backups older than `days`.
    pub fn removable(&self, days: i64) -> RecordSet {
        self.partition(days, &[]).1
    }

    /// Backups not kept under `policy`.
    pub fn removable_with(&self, policy: &RetentionPolicy) -> RecordSet {
        self.partition(policy.keep_days, &policy.keep_last_per).1
    }

    /// Deletes from disk every backup older than `days`.
    pub fn purge(&self, days: i64) -> Result<PurgeReport> {
        self.purge_with(&RetentionPolicy::keep_days(days), &mut FsDeleter)
    }

    /// Deletes every backup not kept under `policy` through `deleter`.
    ///
    /// A failed deletion does not stop the pass. Once every removable backup
    /// has been attempted, failures are returned as
    /// [`RotationError::PartialPurge`].
    pub fn purge_with<D: Deleter + ?Sized>(
        &self,
        policy: &RetentionPolicy,
        deleter: &mut D,
    ) -> Result<PurgeReport> {
        let mut report = PurgeReport::default();

        for record in &self.removable_with(policy) {
            match deleter.delete(&self.directory, record.name()) {
                Ok(()) => {
                    debug!(
                        "Deleted {} ({} days old)",
                        record.name(),
                        record.age_in_days()
                    );
                    report.deleted.push(record.name().to_string());
                }
                Err(source) => {
                    warn!(
                        "Failed to delete {:?}: {}",
                        self.directory.join(record.name()),
                        source
                    );
                    report.failed.push(DeletionFailure {
                        name: record.name().to_string(),
                        source,
                    });
                }
            }
        }

        info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Purged backups in {}",
            self.directory.display()
        );

        if report.is_complete() {
            Ok(report)
        } else {
            Err(RotationError::PartialPurge(report))
        }
    }

    /// Splits the records into (kept, removable), both in record order.
    fn partition(&self, days: i64, buckets: &[Bucket]) -> (RecordSet, RecordSet) {
        let records = self.records().as_slice();

        let mut keep: Vec<bool> = records.iter().map(|r| r.age_in_days() <= days).collect();

        for &bucket in buckets {
            let mut newest: HashMap<BucketKey, usize> = HashMap::new();

            for (index, record) in records.iter().enumerate() {
                newest
                    .entry(record.bucket(bucket))
                    .and_modify(|best| {
                        // Strictly newer only, so ties keep the earlier record.
                        if record.date() > records[*best].date() {
                            *best = index;
                        }
                    })
                    .or_insert(index);
            }

            for index in newest.into_values() {
                keep[index] = true;
            }
        }

        let (kept, removable): (Vec<_>, Vec<_>) = records
            .iter()
            .zip(keep)
            .partition(|(_, keep)| *keep);

        (
            RecordSet::from_distinct(kept.into_iter().map(|(r, _)| r.clone()).collect()),
            RecordSet::from_distinct(removable.into_iter().map(|(r, _)| r.clone()).collect()),
        )
    }
}
