//! Integration tests for collection and snapshot assembly.

use serde_json::{Value, json};

use hwmd::collector::mock::{LSHW_JSON, MockRunner};
use hwmd::collector::{ExitState, SmartData};
use hwmd::snapshot::{NO_SETTINGS_VERSION, SCHEMA_API, SNAPSHOT_TYPE, SnapshotBuilder};

use crate::common::fixtures::fixed_session;
use crate::common::init_test_logging;

const SOURCE_KEYS: [&str; 5] = ["lshw", "dmidecode", "lspci", "hwinfo", "smart"];

fn data_of(snapshot: &hwmd::snapshot::Snapshot) -> serde_json::Map<String, Value> {
    let value = serde_json::to_value(snapshot).unwrap();
    value["data"].as_object().unwrap().clone()
}

#[test]
fn test_healthy_run_has_every_source() {
    init_test_logging();
    let session = fixed_session();
    let snapshot = SnapshotBuilder::new(MockRunner::healthy()).build(&session);

    let data = data_of(&snapshot);
    for key in SOURCE_KEYS {
        assert!(data.contains_key(key), "missing {key}");
    }
    assert_eq!(data.len(), SOURCE_KEYS.len());

    assert_eq!(snapshot.data.lshw, serde_json::from_str::<Value>(LSHW_JSON).unwrap());
    assert!(snapshot.data.dmidecode.as_str().unwrap().contains("System Information"));
    match &snapshot.data.smart {
        SmartData::Disks(disks) => {
            assert_eq!(disks.keys().collect::<Vec<_>>(), ["nvme0n1", "sda"]);
        }
        other => panic!("Expected per-disk SMART data, got {other:?}"),
    }
}

#[test]
fn test_metadata_comes_from_session() {
    let session = fixed_session();
    let snapshot = SnapshotBuilder::new(MockRunner::healthy()).build(&session);

    assert_eq!(snapshot.kind, SNAPSHOT_TYPE);
    assert_eq!(snapshot.uuid, *session.uuid());
    assert_eq!(snapshot.sid, "02603");
    assert_eq!(snapshot.timestamp, *session.timestamp());
    assert_eq!(snapshot.schema_api, SCHEMA_API);
    assert_eq!(snapshot.settings_version, NO_SETTINGS_VERSION);
}

#[test]
fn test_failing_sources_yield_error_text() {
    init_test_logging();
    let runner = MockRunner::healthy()
        .with_output("dmidecode", 1, "")
        .with_signal("lspci -vv", 9, "")
        .with_bytes("hwinfo --reallyall", ExitState::Exited(0), &[0xff, 0xfe, 0x00])
        .with_spawn_error("lshw -json", "No such file or directory");

    let snapshot = SnapshotBuilder::new(runner).build(&fixed_session());

    for (key, value) in [
        ("lshw", &snapshot.data.lshw),
        ("dmidecode", &snapshot.data.dmidecode),
        ("lspci", &snapshot.data.lspci),
        ("hwinfo", &snapshot.data.hwinfo),
    ] {
        let text = value.as_str().unwrap_or_else(|| panic!("{key} is not text: {value}"));
        assert!(!text.trim().is_empty(), "{key} error text is empty");
    }
    assert!(snapshot.data.lspci.as_str().unwrap().contains("signal 9"));
    assert!(snapshot.data.dmidecode.as_str().unwrap().contains("status 1"));

    // The other sources are unaffected
    assert!(matches!(snapshot.data.smart, SmartData::Disks(_)));
}

#[test]
fn test_malformed_lshw_json_kept_as_text() {
    let runner = MockRunner::healthy().with_output("lshw -json", 0, "{\"id\": \"trunc");
    let snapshot = SnapshotBuilder::new(runner).build(&fixed_session());
    assert_eq!(snapshot.data.lshw, json!("{\"id\": \"trunc"));
}

#[test]
fn test_hwinfo_disabled_is_empty_but_present() {
    let runner = MockRunner::healthy();
    let snapshot = SnapshotBuilder::new(&runner)
        .with_hwinfo_disabled(true)
        .build(&fixed_session());

    assert_eq!(snapshot.data.hwinfo, json!(""));
    assert!(data_of(&snapshot).contains_key("hwinfo"));
    assert!(snapshot.data.lshw.is_object());
    assert!(snapshot.data.lspci.as_str().unwrap().contains("Host bridge"));
    assert_eq!(runner.call_count("hwinfo --reallyall"), 0);
}

#[test]
fn test_smart_enumeration_failure_short_circuits() {
    let runner = MockRunner::healthy().with_output(
        "lsblk -Jdo KNAME,TYPE",
        32,
        "lsblk: failed to access sysfs directory",
    );
    let snapshot = SnapshotBuilder::new(&runner).build(&fixed_session());

    match &snapshot.data.smart {
        SmartData::Unavailable(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("sysfs"));
        }
        other => panic!("Expected unavailable SMART data, got {other:?}"),
    }
    assert!(runner.calls().iter().all(|c| !c.starts_with("smartctl")));
    assert!(serde_json::to_value(&snapshot.data.smart).unwrap().is_array());
}

#[test]
fn test_each_command_runs_once() {
    let runner = MockRunner::healthy();
    let _ = SnapshotBuilder::new(&runner).build(&fixed_session());
    for command in [
        "lshw -json",
        "dmidecode",
        "lspci -vv",
        "hwinfo --reallyall",
        "lsblk -Jdo KNAME,TYPE",
        "smartctl -x --json=cosviu /dev/sda",
    ] {
        assert_eq!(runner.call_count(command), 1, "{command}");
    }
}
