#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `link` operation.

mod common;

use std::io;
use std::path::PathBuf;

use common::{Farm, QuietLog};
use dploy_cli::api::{self, Options, Outcome};
use dploy_cli::error::{DployError, Operation, ValidationError};

fn try_link(farm: &Farm, source: &str, dest: &str) -> Result<Outcome, DployError> {
    api::link(farm.path(source), farm.path(dest), &Options::default(), &QuietLog)
}

#[test]
fn link_with_basic_file() {
    let farm = Farm::new();
    let outcome = try_link(&farm, "file_a", "dest/file_a").unwrap();

    assert_eq!(outcome.summary.applied, 1);
    assert_eq!(farm.read_link("dest/file_a"), PathBuf::from("../file_a"));
    assert!(farm.path("dest/file_a").is_file());
}

#[test]
fn link_with_directory() {
    let farm = Farm::new();
    try_link(&farm, "source_a/aaa", "dest/aaa").unwrap();

    assert_eq!(farm.read_link("dest/aaa"), PathBuf::from("../source_a/aaa"));
    assert!(farm.path("dest/aaa/bbb").is_file());
}

#[test]
fn link_twice_is_a_no_op() {
    let farm = Farm::new();
    try_link(&farm, "file_a", "dest/file_a").unwrap();

    let outcome = try_link(&farm, "file_a", "dest/file_a").unwrap();

    assert_eq!(outcome.summary.applied, 0);
    assert_eq!(outcome.summary.already_correct, 1);
}

#[test]
fn link_resolves_relative_destination_parent() {
    let farm = Farm::new();
    let outcome = api::link(
        farm.path("file_a"),
        farm.path("source_a/../dest/renamed"),
        &Options::default(),
        &QuietLog,
    )
    .unwrap();

    assert_eq!(outcome.summary.applied, 1);
    assert_eq!(farm.read_link("dest/renamed"), PathBuf::from("../file_a"));
}

#[test]
fn link_with_existing_file_conflicts() {
    let farm = Farm::new();
    let err = try_link(&farm, "file_a", "file_b").unwrap_err();

    assert!(matches!(
        err,
        DployError::Conflicts {
            operation: Operation::Link,
            count: 1
        }
    ));
    assert!(err.to_string().starts_with("dploy link:"));
    assert!(!farm.is_link("file_b"));
}

#[test]
fn link_with_existing_directory_conflicts() {
    let farm = Farm::new();
    farm.mkdir("dest/aaa");
    let err = try_link(&farm, "source_a/aaa", "dest/aaa").unwrap_err();
    assert!(matches!(err, DployError::Conflicts { count: 1, .. }));
}

#[test]
fn link_with_missing_parent_conflicts() {
    let farm = Farm::new();
    let err = try_link(&farm, "file_a", "dest/missing/file_a").unwrap_err();
    assert!(matches!(err, DployError::Conflicts { count: 1, .. }));
    assert!(!farm.exists("dest/missing"));
}

#[test]
fn link_with_non_existent_source() {
    let farm = Farm::new();
    let err = try_link(&farm, "missing", "dest/missing").unwrap_err();
    assert!(matches!(
        err,
        DployError::Validation {
            operation: Operation::Link,
            source: ValidationError::MissingSource { .. }
        }
    ));
}

#[test]
fn link_dry_run_changes_nothing() {
    let farm = Farm::new();
    let options = Options {
        dry_run: true,
        ..Options::default()
    };

    let outcome = api::link(farm.path("file_a"), farm.path("dest/x"), &options, &QuietLog).unwrap();

    assert!(outcome.summary.dry_run);
    assert!(!farm.exists("dest/x"));
}

#[cfg(unix)]
#[test]
fn link_with_read_only_dest() {
    if !common::permissions_enforced() {
        return;
    }
    let farm = Farm::new();
    common::remove_permission(&farm.path("dest"), 0o222);

    let err = try_link(&farm, "file_a", "dest/file_a").unwrap_err();

    common::restore_permission(&farm.path("dest"));
    assert!(matches!(err, DployError::Execution { .. }));
    assert_eq!(
        err.io_error().map(io::Error::kind),
        Some(io::ErrorKind::PermissionDenied)
    );
}
