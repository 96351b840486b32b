//! Assembles a [`Snapshot`] from every data source.

use serde_json::Value;
use tracing::{debug, info};

use super::schema::{NO_SETTINGS_VERSION, SNAPSHOT_TYPE, Snapshot, SnapshotData, SoftwareInfo};
use super::session::Session;
use crate::collector::{Collector, CommandRunner, Source};

/// Runs the collector over all sources and merges the results with run
/// metadata.
pub struct SnapshotBuilder<R> {
    collector: Collector<R>,
    software: SoftwareInfo,
    settings_version: Option<String>,
    disable_hwinfo: bool,
}

impl<R: CommandRunner> SnapshotBuilder<R> {
    pub fn new(runner: R) -> Self {
        Self {
            collector: Collector::new(runner),
            software: SoftwareInfo::current(),
            settings_version: None,
            disable_hwinfo: false,
        }
    }

    pub fn with_software(mut self, software: SoftwareInfo) -> Self {
        self.software = software;
        self
    }

    pub fn with_settings_version(mut self, version: Option<String>) -> Self {
        self.settings_version = version.filter(|v| !v.is_empty());
        self
    }

    /// Skip the slow `hwinfo` source; its field becomes an empty string.
    pub fn with_hwinfo_disabled(mut self, disabled: bool) -> Self {
        self.disable_hwinfo = disabled;
        self
    }

    /// Collect every source and build the snapshot for `session`.
    pub fn build(&self, session: &Session) -> Snapshot {
        let hwinfo = if self.disable_hwinfo {
            debug!("hwinfo disabled, leaving field empty");
            Value::String(String::new())
        } else {
            self.collector.collect(Source::Hwinfo)
        };

        let data = SnapshotData {
            lshw: self.collector.collect(Source::Lshw),
            dmidecode: self.collector.collect(Source::Dmidecode),
            lspci: self.collector.collect(Source::Lspci),
            hwinfo,
            smart: self.collector.smart(),
        };

        let snapshot = Snapshot {
            timestamp: *session.timestamp(),
            kind: SNAPSHOT_TYPE.to_string(),
            uuid: *session.uuid(),
            sid: session.sid().to_string(),
            software: self.software.software.clone(),
            version: self.software.version.clone(),
            schema_api: self.software.schema_api.clone(),
            settings_version: self
                .settings_version
                .clone()
                .unwrap_or_else(|| NO_SETTINGS_VERSION.to_string()),
            data,
        };

        info!(sid = %snapshot.sid, "Snapshot generated properly.");
        snapshot
    }
}
