//! Output mode abstraction for robot and human output.
//!
//! Logs go to stderr through `tracing`; this module owns stdout. Human mode
//! prints the step banners and a short result line, robot mode prints one
//! JSON document per command.

use serde::Serialize;

use crate::cli::Cli;
use crate::error::HwError;
use crate::workbench::RunReport;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// Milestones of a run, announced on stdout in human mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Starting,
    Generate,
    Save,
    Upload,
    Finished,
}

impl Stage {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Starting => "[ STARTING ]",
            Self::Generate => "(STEP 1:Generating Snapshot)",
            Self::Save => "(STEP 2:Saving Snapshot)",
            Self::Upload => "(STEP 3:Uploading Snapshot)",
            Self::Finished => "[ FINISHED ]",
        }
    }

    /// Start and end markers; steps are drawn as underlined rules.
    pub const fn is_marker(self) -> bool {
        matches!(self, Self::Starting | Self::Finished)
    }
}

/// Build and toolchain details shown by `hwmd version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub software: &'static str,
    pub schema_api: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug)]
pub enum OutputMode {
    /// JSON output for scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color && console::colors_enabled(),
            }
        }
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color } => Box::new(HumanOutput::new(color)),
        }
    }
}

/// Trait for all stdout output.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    /// A run reached `stage`.
    fn stage(&self, stage: Stage);

    /// Final result of a run.
    fn run_report(&self, report: &RunReport);

    fn version_info(&self, info: &VersionInfo);

    /// Fatal error; written to stderr.
    fn error(&self, error: &HwError);
}
