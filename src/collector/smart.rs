//! SMART collection: list disks with `lsblk`, then query each with `smartctl`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use super::{CollectError, CollectErrorKind, CommandRunner, CommandSpec, Collector};

/// SMART payload of a snapshot.
///
/// Serialized as an object keyed by kernel device name when disks could be
/// enumerated, or as a one-element list holding the enumeration error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SmartData {
    Disks(BTreeMap<String, Value>),
    Unavailable(Vec<String>),
}

impl SmartData {
    fn unavailable(message: String) -> Self {
        Self::Unavailable(vec![message])
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Disks(disks) => Value::Object(disks.into_iter().collect()),
            Self::Unavailable(errors) => {
                Value::Array(errors.into_iter().map(Value::String).collect())
            }
        }
    }
}

#[derive(Deserialize)]
struct BlockDevices {
    blockdevices: Vec<BlockDevice>,
}

#[derive(Deserialize)]
struct BlockDevice {
    kname: String,
    #[serde(rename = "type")]
    kind: String,
}

pub fn lsblk_command() -> CommandSpec {
    CommandSpec::new("lsblk", ["-Jdo", "KNAME,TYPE"])
}

pub fn smartctl_command(kname: &str) -> CommandSpec {
    CommandSpec::new(
        "smartctl",
        [
            "-x".to_string(),
            "--json=cosviu".to_string(),
            format!("/dev/{kname}"),
        ],
    )
}

/// Kernel names of all block devices of type `disk` in `lsblk -J` output.
pub fn parse_disk_names(lsblk_json: &str) -> Result<Vec<String>, serde_json::Error> {
    let devices: BlockDevices = serde_json::from_str(lsblk_json)?;
    Ok(devices
        .blockdevices
        .into_iter()
        .filter(|d| d.kind == "disk")
        .map(|d| d.kname)
        .collect())
}

fn enumerate_disks<R: CommandRunner>(runner: &R) -> Result<Vec<String>, CollectError> {
    let failed = |message: String| CollectError::new(CollectErrorKind::Enumeration, message);
    let spec = lsblk_command();
    let raw = runner
        .run(&spec)
        .map_err(|e| failed(format!("lsblk could not be executed: {e}")))?;
    let text = String::from_utf8_lossy(&raw.output);

    if !raw.status.is_success() {
        return Err(failed(if text.trim().is_empty() {
            format!("lsblk failed with status {}", raw.status.code())
        } else {
            text.into_owned()
        }));
    }
    parse_disk_names(&text).map_err(|e| failed(format!("lsblk output could not be parsed: {e}")))
}

pub(super) fn collect<R: CommandRunner>(collector: &Collector<R>) -> SmartData {
    let disks = match enumerate_disks(collector.runner()) {
        Ok(disks) => disks,
        Err(err) => {
            error!("Getting disks information failed with output: {err}");
            return SmartData::unavailable(err.message);
        }
    };
    info!(count = disks.len(), "Found {} disk(s) for SMART", disks.len());

    let results = disks
        .into_iter()
        .map(|kname| {
            let label = format!("SMART on {kname}");
            let value = collector
                .capture(&label, &smartctl_command(&kname), true)
                .into_value();
            (kname, value)
        })
        .collect();
    SmartData::Disks(results)
}
