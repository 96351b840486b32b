//! Robot mode JSON output implementation.

use serde::Serialize;
use tracing::{debug, error, instrument, trace};

use crate::error::HwError;
use crate::workbench::RunReport;

use super::{Output, RobotFormat, Stage, VersionInfo};

/// JSON output implementation for scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Serialize `data` in the configured format.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> serde_json::Result<String> {
        match self.format {
            RobotFormat::Json => {
                trace!("Serializing as pretty JSON");
                serde_json::to_string_pretty(data)
            }
            RobotFormat::JsonCompact => {
                trace!("Serializing as compact JSON");
                serde_json::to_string(data)
            }
        }
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        match self.render(data) {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                println!("{json}");
            }
            Err(e) => error!("Output serialization failed: {e}"),
        }
    }
}

/// Error document written to stderr.
pub fn error_json(error: &HwError) -> serde_json::Value {
    serde_json::json!({
        "error": true,
        "message": error.to_string(),
        "suggestion": error.suggestion(),
        "recoverable": error.is_user_recoverable(),
    })
}

impl Output for RobotOutput {
    fn stage(&self, stage: Stage) {
        // stdout carries a single document per command
        trace!(?stage, "Robot: stage");
    }

    #[instrument(skip(self, report), fields(sid = %report.sid))]
    fn run_report(&self, report: &RunReport) {
        debug!("Robot: run_report");
        self.output_json(report);
    }

    #[instrument(skip(self, info))]
    fn version_info(&self, info: &VersionInfo) {
        debug!("Robot: version_info");
        self.output_json(info);
    }

    #[instrument(skip(self))]
    fn error(&self, error: &HwError) {
        debug!(error = %error, "Robot: error");
        let json = error_json(error);
        match serde_json::to_string_pretty(&json) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("{json}"),
        }
    }
}
