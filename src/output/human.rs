//! Human-friendly output implementation using console styling.

use console::Style;
use tracing::{debug, instrument};

use crate::error::HwError;
use crate::upload::UploadOutcome;
use crate::workbench::RunReport;

use super::{Output, Stage, VersionInfo};

/// Width of step banners, padding included.
const STEP_WIDTH: usize = 63;

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    color: bool,
}

impl HumanOutput {
    #[instrument]
    pub fn new(color: bool) -> Self {
        debug!("Creating HumanOutput");
        Self { color }
    }

    fn style(&self) -> Style {
        Style::new().force_styling(self.color)
    }

    /// Banner line for `stage`.
    pub fn format_stage(&self, stage: Stage) -> String {
        if stage.is_marker() {
            let line = format!("------------------- {} -------------------", stage.title());
            self.style().bold().cyan().apply_to(line).to_string()
        } else {
            let line = format!("{:_<STEP_WIDTH$}", format!("___________________{}", stage.title()));
            self.style().bold().apply_to(line).to_string()
        }
    }

    /// Closing lines of a run; the snapshot document follows when requested.
    pub fn format_report(&self, report: &RunReport) -> String {
        let label = |name: &str| self.style().dim().apply_to(format!("  {name:<10}")).to_string();
        let mut out = String::new();

        out.push_str(&label("SID"));
        out.push_str(&report.sid);
        out.push('\n');

        out.push_str(&label("Snapshot"));
        match &report.snapshot_file {
            Some(file) => out.push_str(file),
            None => out.push_str(&self.style().red().apply_to("not saved").to_string()),
        }
        out.push('\n');

        out.push_str(&label("Upload"));
        out.push_str(&self.format_upload(&report.upload));
        out.push('\n');

        if let Some(snapshot) = &report.snapshot {
            match serde_json::to_string_pretty(snapshot) {
                Ok(json) => {
                    out.push('\n');
                    out.push_str(&json);
                    out.push('\n');
                }
                Err(e) => debug!("Snapshot could not be printed: {e}"),
            }
        }
        out
    }

    fn format_upload(&self, outcome: &UploadOutcome) -> String {
        let ok = self.style().green().bold();
        let warn = self.style().yellow();
        let err = self.style().red().bold();
        match outcome {
            UploadOutcome::Uploaded { device } => {
                format!("{} {} ({})", ok.apply_to("[OK]"), device.dhid, device.public_url)
            }
            UploadOutcome::Skipped { reason } => {
                format!("{} ({reason})", warn.apply_to("skipped"))
            }
            UploadOutcome::Rejected {
                http_status, reason, ..
            } => format!("{} {http_status} {reason}", err.apply_to("[ERR]")),
            UploadOutcome::Failed { http_status, .. } => {
                let code = outcome
                    .server_code()
                    .map_or_else(String::new, |c| format!(" (code {c})"));
                format!("{} HTTP {http_status}{code}", err.apply_to("[ERR]"))
            }
            UploadOutcome::InvalidResponse { message, .. } => {
                format!("{} invalid response: {message}", warn.apply_to("[WARN]"))
            }
            UploadOutcome::TransportError { message } => {
                format!("{} {message}", err.apply_to("[ERR]"))
            }
        }
    }
}

impl Output for HumanOutput {
    fn stage(&self, stage: Stage) {
        println!("{}", self.format_stage(stage));
    }

    #[instrument(skip(self, report), fields(sid = %report.sid))]
    fn run_report(&self, report: &RunReport) {
        debug!("Outputting run report");
        print!("{}", self.format_report(report));
    }

    #[instrument(skip(self, info))]
    fn version_info(&self, info: &VersionInfo) {
        debug!(version = info.version, "Outputting version info");
        let label = |name: &str| self.style().dim().apply_to(format!("{name:<8}")).to_string();
        println!(
            "{} {}",
            self.style().bold().cyan().apply_to("hwmd"),
            info.version
        );
        println!(
            "{}{}{}",
            label("git:"),
            info.git_sha,
            if info.git_dirty { " (dirty)" } else { "" }
        );
        println!("{}{}", label("built:"), info.build_timestamp);
        println!("{}{}", label("rustc:"), info.rustc_version);
        println!("{}{}", label("target:"), info.target);
        println!("{}{} {}", label("schema:"), info.software, info.schema_api);
    }

    #[instrument(skip(self))]
    fn error(&self, error: &HwError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!("{}: {error}", self.style().red().bold().apply_to("Error"));
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {suggestion}", self.style().yellow().apply_to("Hint"));
        }
    }
}
