use crate::bucket::Bucket;
use serde::{Deserialize, Serialize};

/// Number of days kept when nothing else is configured.
pub const DEFAULT_KEEP_DAYS: i64 = 30;

/// Controls which backups survive a rotation.
///
/// A backup is kept when it is at most `keep_days` old, *or* when it is the
/// most recent backup of its bucket for any of the `keep_last_per` buckets.
/// Everything else is removable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionPolicy {
    /// Maximum age, in days, of backups that are always kept
    #[serde(default = "default_keep_days")]
    pub keep_days: i64,
    /// Buckets for which the newest backup is kept regardless of age
    #[serde(default)]
    pub keep_last_per: Vec<Bucket>,
}

fn default_keep_days() -> i64 {
    DEFAULT_KEEP_DAYS
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            keep_days: DEFAULT_KEEP_DAYS,
            keep_last_per: Vec::new(),
        }
    }
}

impl RetentionPolicy {
    /// A policy that only keeps backups up to `days` old.
    pub fn keep_days(days: i64) -> Self {
        Self {
            keep_days: days,
            keep_last_per: Vec::new(),
        }
    }

    /// Specifies the maximum age of backups that are always kept.
    pub fn with_keep_days(mut self, keep_days: i64) -> Self {
        self.keep_days = keep_days;
        self
    }

    /// Also keeps the newest backup of every `bucket`.
    pub fn with_keep_last_per(mut self, bucket: Bucket) -> Self {
        if !self.keep_last_per.contains(&bucket) {
            self.keep_last_per.push(bucket);
        }
        self
    }

    /// Specifies the full list of buckets, replacing any previous ones.
    pub fn with_buckets(mut self, buckets: impl IntoIterator<Item = Bucket>) -> Self {
        self.keep_last_per.clear();
        for bucket in buckets {
            self = self.with_keep_last_per(bucket);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.keep_days, 30);
        assert!(policy.keep_last_per.is_empty());
    }

    #[test]
    fn test_builder_skips_repeated_buckets() {
        let policy = RetentionPolicy::keep_days(7)
            .with_keep_last_per(Bucket::Week)
            .with_keep_last_per(Bucket::Month)
            .with_keep_last_per(Bucket::Week);

        assert_eq!(policy.keep_days, 7);
        assert_eq!(policy.keep_last_per, vec![Bucket::Week, Bucket::Month]);
    }

    #[test]
    fn test_with_buckets_replaces() {
        let policy = RetentionPolicy::default()
            .with_keep_last_per(Bucket::Day)
            .with_buckets([Bucket::Year, Bucket::Year]);

        assert_eq!(policy.keep_last_per, vec![Bucket::Year]);
    }

    #[test]
    fn test_deserialize_policy() {
        let policy: RetentionPolicy =
            serde_yaml::from_str("keep_days: 7\nkeep_last_per: [week, month]\n").unwrap();
        assert_eq!(
            policy,
            RetentionPolicy::keep_days(7)
                .with_keep_last_per(Bucket::Week)
                .with_keep_last_per(Bucket::Month)
        );

        let policy: RetentionPolicy = serde_yaml::from_str("keep_last_per: [year]\n").unwrap();
        assert_eq!(policy.keep_days, DEFAULT_KEEP_DAYS);

        assert!(serde_yaml::from_str::<RetentionPolicy>("keep_weeks: 3\n").is_err());
    }
}
