//! Integration tests for deleting removable backups from disk.

use backup_rotation::{
    Bucket, FsDeleter, Reference, RetentionEngine, RetentionPolicy, RotationError,
};
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

const DATED: [&str; 5] = [
    "phpmyadmin-02.05.2016_08:10:02.tar.gz",
    "phpmyadmin-03.05.2016_18:00:05.tar.gz",
    "phpmyadmin-02.05.2016_09:59:02.tar.gz",
    "phpmyadmin-08.05.2016_13:10:02.tar.gz",
    "phpmyadmin-10.05.2016_13:10:02.tar.gz",
];

const UNDATED: [&str; 2] = ["phpmyadmin-README", "phpmyadmin-install"];

fn reference(year: i32, month: u32, day: u32) -> Reference {
    Reference(NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

fn create_backup_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for name in names {
        fs::write(dir.path().join(name), b"").expect("create backup file");
    }
    dir
}

/// Names of the regular files left in `dir`, sorted
fn remaining(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().unwrap().is_file())
        .map(|entry| entry.file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

#[test]
fn purge_all_dated_backups() {
    let dir = create_backup_dir(&[&DATED[..4], &UNDATED[..]].concat());
    let engine = RetentionEngine::from_directory(dir.path(), reference(2016, 5, 10)).unwrap();

    let report = engine.purge(0).unwrap();

    assert_eq!(report.deleted.len(), 4);
    assert_eq!(remaining(dir.path()), vec!["phpmyadmin-README", "phpmyadmin-install"]);
}

#[test]
fn purge_all_but_today() {
    let dir = create_backup_dir(&[&DATED[..], &UNDATED[..]].concat());
    let engine = RetentionEngine::from_directory(dir.path(), reference(2016, 5, 10)).unwrap();

    engine.purge(0).unwrap();

    assert_eq!(
        remaining(dir.path()),
        vec![
            "phpmyadmin-10.05.2016_13:10:02.tar.gz",
            "phpmyadmin-README",
            "phpmyadmin-install",
        ]
    );
}

#[test]
fn purge_some_left() {
    let dir = create_backup_dir(&[&DATED[..], &UNDATED[..]].concat());
    let engine = RetentionEngine::from_directory(dir.path(), reference(2016, 5, 10)).unwrap();

    let removable = engine.removable(3);
    let kept = engine.within_days(3);
    engine.purge(3).unwrap();

    let left = remaining(dir.path());
    assert_eq!(left.len(), 4);
    for record in &removable {
        assert!(!left.iter().any(|name| name == record.name()));
    }
    for record in &kept {
        assert!(left.iter().any(|name| name == record.name()));
    }
    for name in UNDATED {
        assert!(left.iter().any(|left| left == name));
    }
}

#[test]
fn purge_keeps_newest_per_bucket() {
    let dir = create_backup_dir(&[
        "db-2016-03-30.gz",
        "db-2016-03-31.gz",
        "db-2016-04-15.gz",
        "db-2016-04-29.gz",
        "db-2016-05-09.gz",
        "db-2016-05-10.gz",
    ]);
    let engine = RetentionEngine::from_directory(dir.path(), reference(2016, 5, 10)).unwrap();

    let policy = RetentionPolicy::keep_days(0).with_keep_last_per(Bucket::Month);
    engine.purge_with(&policy, &mut FsDeleter).unwrap();

    assert_eq!(
        remaining(dir.path()),
        vec!["db-2016-03-31.gz", "db-2016-04-29.gz", "db-2016-05-10.gz"]
    );
}

#[test]
fn purge_leaves_subdirectories_alone() {
    let dir = create_backup_dir(&DATED);
    fs::create_dir(dir.path().join("phpmyadmin-01.05.2016")).unwrap();

    let engine = RetentionEngine::from_directory(dir.path(), reference(2016, 5, 10)).unwrap();
    engine.purge(0).unwrap();

    assert!(dir.path().join("phpmyadmin-01.05.2016").is_dir());
}

#[test]
fn purge_reports_files_removed_behind_its_back() {
    let dir = create_backup_dir(&DATED);
    let engine = RetentionEngine::from_directory(dir.path(), reference(2016, 5, 10)).unwrap();

    // Gone between the listing and the purge.
    fs::remove_file(dir.path().join(DATED[1])).unwrap();

    let err = engine.purge(0).unwrap_err();
    let report = match err {
        RotationError::PartialPurge(report) => report,
        other => panic!("expected a partial purge, got {other:?}"),
    };

    assert_eq!(report.deleted.len(), 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, DATED[1]);
    assert_eq!(report.failed[0].source.kind(), io::ErrorKind::NotFound);
    assert_eq!(
        remaining(dir.path()),
        vec!["phpmyadmin-10.05.2016_13:10:02.tar.gz"]
    );
}

#[test]
fn name_list_purges_in_configured_directory() {
    let dir = create_backup_dir(&[&DATED[..], &UNDATED[..]].concat());
    let engine = RetentionEngine::from_names(
        ["phpmyadmin-02.05.2016_08:10:02.tar.gz", "phpmyadmin-README"],
        reference(2016, 5, 10),
    )
    .in_directory(dir.path());

    let report = engine.purge(0).unwrap();

    assert_eq!(report.deleted, vec!["phpmyadmin-02.05.2016_08:10:02.tar.gz"]);
    assert_eq!(remaining(dir.path()).len(), 6);
}
