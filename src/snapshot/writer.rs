//! Saves snapshots as JSON files on local storage.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use super::schema::Snapshot;
use super::session::run_file_name;
use crate::error::{HwError, Result};
use crate::logging::{Category, highlight};

/// Writes snapshots to `{base}/snapshots/`.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    base_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.base_dir.join("snapshots")
    }

    /// `{date}_{sid}_snapshot.json`, from the snapshot's own timestamp.
    pub fn file_name(snapshot: &Snapshot) -> String {
        run_file_name(&snapshot.timestamp, &snapshot.sid, "json")
    }

    /// Write `snapshot`, replacing any file with the same name.
    pub fn try_save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let dir = self.snapshots_dir();
        fs::create_dir_all(&dir).map_err(|source| HwError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(Self::file_name(snapshot));
        write_json(&path, snapshot)?;
        Ok(path)
    }

    /// Write `snapshot` and return its file name, or `None` if nothing was
    /// written. Failures are logged, never returned.
    pub fn save(&self, snapshot: &Snapshot) -> Option<String> {
        match self.try_save(snapshot) {
            Ok(path) => {
                info!("Snapshot successfully saved on {}", self.snapshots_dir().display());
                let name = Self::file_name(snapshot);
                highlight(Category::Snapshot, &name);
                debug!(path = %path.display(), "Snapshot file written");
                Some(name)
            }
            Err(e) => {
                error!("Save snapshot: {e}");
                debug!(error = ?e, "Save snapshot failed");
                None
            }
        }
    }
}

fn write_json(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let write_err = |source| HwError::WriteSnapshot {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush().map_err(write_err)?;
    Ok(())
}
