//! One inventory run: generate, save, upload, summarize.
//!
//! No step aborts the run. A failed save still leads to an upload attempt
//! and a failed upload still reaches the summary; the only fatal condition
//! is missing root privileges, checked by [`ensure_root`] before any
//! collection starts.

use chrono::{DateTime, Local};
use nix::unistd::geteuid;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::collector::CommandRunner;
use crate::config::Settings;
use crate::error::{HwError, Result};
use crate::logging::{Category, highlight};
use crate::output::{Output, Stage};
use crate::snapshot::{Session, Snapshot, SnapshotBuilder, SnapshotWriter};
use crate::upload::{ConnectivityProbe, SkipReason, Transport, UploadClient, UploadOutcome};

/// Per-run switches from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Skip step 3 entirely.
    pub no_upload: bool,
    /// Force `hwinfo` off regardless of settings.
    pub disable_hwinfo: bool,
    /// Include the snapshot document in the report.
    pub print_snapshot: bool,
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub sid: String,
    pub uuid: Uuid,
    pub timestamp: DateTime<Local>,
    pub version: String,
    pub settings_version: String,
    /// `None` when the snapshot could not be written.
    pub snapshot_file: Option<String>,
    pub upload: UploadOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
}

/// Fail unless the effective user is root.
pub fn ensure_root() -> Result<()> {
    if geteuid().is_root() {
        Ok(())
    } else {
        Err(HwError::InsufficientPrivilege)
    }
}

/// Wires settings, the command runner and the upload transport together.
pub struct Workbench<R, T> {
    settings: Settings,
    builder: SnapshotBuilder<R>,
    writer: SnapshotWriter,
    uploader: UploadClient<T>,
}

impl<R: CommandRunner, T: Transport> Workbench<R, T> {
    pub fn new(settings: Settings, runner: R, transport: T) -> Self {
        let builder = SnapshotBuilder::new(runner)
            .with_software(settings.software_info())
            .with_settings_version(settings.settings_version.clone())
            .with_hwinfo_disabled(settings.disable_hwinfo);
        let writer = SnapshotWriter::new(settings.snapshots_dir());
        let uploader = UploadClient::new(
            transport,
            settings.dh_url.clone(),
            settings.dh_token.clone(),
        );
        Self {
            settings,
            builder,
            writer,
            uploader,
        }
    }

    /// Replace or disable (`None`) the connectivity probe run before upload.
    pub fn with_probe(mut self, probe: Option<ConnectivityProbe>) -> Self {
        self.uploader = self.uploader.with_probe(probe);
        self
    }

    /// Run every step for `session`, announcing each through `out`.
    pub fn run(self, session: &Session, options: RunOptions, out: &dyn Output) -> RunReport {
        let builder = self
            .builder
            .with_hwinfo_disabled(self.settings.disable_hwinfo || options.disable_hwinfo);

        out.stage(Stage::Starting);
        print_snapshot_info(&self.settings, session);

        out.stage(Stage::Generate);
        debug!("{}", Stage::Generate.title());
        let snapshot = builder.build(session);

        out.stage(Stage::Save);
        debug!("{}", Stage::Save.title());
        let snapshot_file = self.writer.save(&snapshot);

        out.stage(Stage::Upload);
        debug!("{}", Stage::Upload.title());
        let upload = if options.no_upload {
            info!("Upload disabled for this run.");
            UploadOutcome::Skipped {
                reason: SkipReason::Disabled,
            }
        } else {
            self.uploader.upload(&snapshot)
        };

        out.stage(Stage::Finished);
        print_summary(&self.settings, session, snapshot_file.as_deref(), &upload);

        RunReport {
            sid: session.sid().to_string(),
            uuid: *session.uuid(),
            timestamp: *session.timestamp(),
            version: snapshot.version.clone(),
            settings_version: snapshot.settings_version.clone(),
            snapshot_file,
            upload,
            snapshot: options.print_snapshot.then_some(snapshot),
        }
    }
}

fn print_snapshot_info(settings: &Settings, session: &Session) {
    highlight(Category::Version, env!("CARGO_PKG_VERSION"));
    highlight(
        Category::Settings,
        settings
            .settings_version
            .as_deref()
            .unwrap_or(crate::snapshot::NO_SETTINGS_VERSION),
    );
    highlight(Category::Sid, session.sid());
}

fn print_summary(
    settings: &Settings,
    session: &Session,
    snapshot_file: Option<&str>,
    upload: &UploadOutcome,
) {
    info!("=================== ( SUMMARY ) ===================");
    print_snapshot_info(settings, session);
    highlight(Category::Snapshot, snapshot_file.unwrap_or("None"));
    if let Some(device) = upload.device() {
        highlight(Category::DeviceId, &device.dhid);
        highlight(Category::DeviceUrl, &device.url);
        highlight(Category::DevicePublicUrl, &device.public_url);
    }
    info!("Finished properly. You can press the power button to turn off.");
}
