//! Snapshot document types.
//!
//! The serialized field names are the wire schema consumed by the inventory
//! server; [`SCHEMA_API`] is bumped whenever they change.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::collector::SmartData;

/// Document kind tag.
pub const SNAPSHOT_TYPE: &str = "Snapshot";
/// Wire schema version.
pub const SCHEMA_API: &str = "1.0.0";
/// Producer name.
pub const SOFTWARE_NAME: &str = "Workbench";
/// `settings_version` when no settings profile is configured.
pub const NO_SETTINGS_VERSION: &str = "No Settings Version (NaN)";

/// Producer identity stamped into every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareInfo {
    pub software: String,
    pub version: String,
    pub schema_api: String,
}

impl SoftwareInfo {
    /// Identity of this build.
    pub fn current() -> Self {
        Self {
            software: SOFTWARE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema_api: SCHEMA_API.to_string(),
        }
    }
}

impl Default for SoftwareInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// One inventory run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When generation started.
    pub timestamp: DateTime<Local>,
    /// Always [`SNAPSHOT_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    pub uuid: Uuid,
    pub sid: String,
    pub software: String,
    pub version: String,
    pub schema_api: String,
    pub settings_version: String,
    pub data: SnapshotData,
}

/// Output of every source, keyed by source name.
///
/// All keys are always present. A failed source holds its error text; a
/// disabled `hwinfo` holds an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    pub lshw: Value,
    pub dmidecode: Value,
    pub lspci: Value,
    pub hwinfo: Value,
    pub smart: SmartData,
}
