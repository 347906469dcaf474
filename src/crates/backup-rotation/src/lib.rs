//! Retention decisions for directories of dated backups.
//!
//! This crate provides:
//! - Date extraction from backup names: [`resolver`] module
//! - Records, record sets and bucketing: [`record`] and [`bucket`] modules
//! - The retention engine and purge pass: [`engine`] module
//!
//! # Examples
//!
//! ```no_run
//! use backup_rotation::{Bucket, Reference, RetentionEngine, RetentionPolicy};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let engine = RetentionEngine::from_directory("/var/backups/mysql", Reference::today())?;
//!
//! // Keep a week of backups, plus the newest one of every month.
//! let policy = RetentionPolicy::keep_days(7).with_keep_last_per(Bucket::Month);
//!
//! for record in &engine.removable_with(&policy) {
//!     println!("{} ({} days old)", record.name(), record.age_in_days());
//! }
//! # Ok(())
//! # }
//! ```

// Core error types used throughout the crate
pub mod error;

// Name to date resolution
pub mod resolver;

// Grouping keys
pub mod bucket;

// Records and record sets
pub mod record;

// Retention policy configuration
pub mod policy;

// Directory enumeration
pub mod listing;

// Deletion collaborator
pub mod deleter;

// Retention engine
pub mod engine;

pub use bucket::{Bucket, BucketKey};
pub use deleter::{Deleter, DeletionFailure, FsDeleter, PurgeReport};
pub use engine::RetentionEngine;
pub use error::{Result, RotationError};
pub use policy::{DEFAULT_KEEP_DAYS, RetentionPolicy};
pub use record::{Record, RecordSet, Reference};
pub use resolver::{NotADate, Notation, resolve};
