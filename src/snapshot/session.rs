//! Identity of one inventory run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::identifier::{new_snapshot_uuid, sid_for};

/// `strftime` format of the date part of snapshot and log file names.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d_%Hh%Mm%Ss";

/// Timestamp, UUID and SID fixed when a run starts.
///
/// The fields are private so none of them can change after creation; the SID
/// is always recomputed from the UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    timestamp: DateTime<Local>,
    uuid: Uuid,
    sid: String,
}

impl Session {
    /// Start a new run now, with a fresh UUID.
    pub fn start() -> Self {
        Self::from_parts(Local::now(), new_snapshot_uuid())
    }

    pub fn from_parts(timestamp: DateTime<Local>, uuid: Uuid) -> Self {
        let sid = sid_for(&uuid);
        Self {
            timestamp,
            uuid,
            sid,
        }
    }

    pub const fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub const fn uuid(&self) -> &Uuid {
        &self.uuid
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// `{date}_{sid}_snapshot.{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        run_file_name(&self.timestamp, &self.sid, extension)
    }

    /// Per-run log file inside `{logs_dir}/logs/`.
    pub fn log_file_path(&self, logs_dir: &Path) -> PathBuf {
        logs_dir.join("logs").join(self.file_name("log"))
    }
}

/// File name shared by a run's snapshot and log files.
pub fn run_file_name(timestamp: &DateTime<Local>, sid: &str, extension: &str) -> String {
    format!(
        "{}_{sid}_snapshot.{extension}",
        timestamp.format(FILE_DATE_FORMAT)
    )
}
