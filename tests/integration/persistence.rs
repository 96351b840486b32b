//! Integration tests for writing snapshots to disk.

use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use hwmd::collector::mock::MockRunner;
use hwmd::snapshot::{Snapshot, SnapshotBuilder, SnapshotWriter};

use crate::common::fixtures::fixed_session;

fn build() -> Snapshot {
    SnapshotBuilder::new(MockRunner::healthy())
        .with_settings_version(Some("2022.11 usody".into()))
        .build(&fixed_session())
}

#[test]
fn test_save_and_read_back() {
    let dir = TempDir::new().unwrap();
    let snapshot = build();

    let name = SnapshotWriter::new(dir.path()).save(&snapshot).unwrap();
    assert_eq!(name, "2023-02-14_09h05m07s_02603_snapshot.json");

    let text = fs::read_to_string(dir.path().join("snapshots").join(&name)).unwrap();
    let on_disk: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(on_disk, serde_json::to_value(&snapshot).unwrap());
    assert!(on_disk["timestamp"].as_str().unwrap().starts_with("2023-02-14T09:05:07"));

    let parsed: Snapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn test_save_overwrites_same_name() {
    let dir = TempDir::new().unwrap();
    let writer = SnapshotWriter::new(dir.path());
    let first = build();
    writer.save(&first).unwrap();

    let mut second = first.clone();
    second.settings_version = "other".into();
    let name = writer.save(&second).unwrap();

    let on_disk: Snapshot = serde_json::from_str(
        &fs::read_to_string(writer.snapshots_dir().join(name)).unwrap(),
    )
    .unwrap();
    assert_eq!(on_disk.settings_version, "other");
    assert_eq!(fs::read_dir(writer.snapshots_dir()).unwrap().count(), 1);
}

#[test]
fn test_unwritable_location_returns_none() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"occupied").unwrap();

    assert!(SnapshotWriter::new(&blocker).save(&build()).is_none());
    assert!(SnapshotWriter::new(&blocker).try_save(&build()).is_err());
}
