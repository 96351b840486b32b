//! Structured logging initialization for hwmd.
//!
//! Every run logs to stderr and, when a log directory is usable, to a
//! per-run file next to the snapshot naming scheme. Console and file have
//! independent filters: the file always keeps hwmd's debug events.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self as tfmt, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Filter for the per-run log file.
const FILE_DIRECTIVE: &str = "hwmd=debug";

/// Logging options derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Emit JSON lines on the console.
    pub robot_mode: bool,
    /// 0 = info, 1 = debug, 2+ = trace
    pub verbose: u8,
    /// Only errors on the console.
    pub quiet: bool,
    /// Per-run log file to create.
    pub log_file: Option<PathBuf>,
}

/// Console filter directive for the given verbosity.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "hwmd=error";
    }
    match verbose {
        0 => "hwmd=info",
        1 => "hwmd=debug",
        _ => "hwmd=trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns the log file actually in use. A log file that cannot be created
/// is reported as a warning and the run continues with console output only.
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override the console filter (e.g., "hwmd=debug,reqwest=warn")
///
/// # Output Behavior
///
/// | Mode | TTY | Console |
/// |------|-----|--------|
/// | Robot | any | JSON lines to stderr |
/// | Human | yes | Pretty colored output to stderr |
/// | Human | no | Compact plain output to stderr |
pub fn init_logging(opts: &LogOptions) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(opts.verbose, opts.quiet)));

    let console = if opts.robot_mode {
        tfmt::layer()
            .json()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .boxed()
    } else if io::stderr().is_terminal() {
        tfmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .boxed()
    } else {
        tfmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .with_writer(io::stderr)
            .boxed()
    };

    let (file, file_error) = match opts.log_file.as_deref().map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let log_path = file.as_ref().and(opts.log_file.clone());

    let file_layer = file.map(|file| {
        tfmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
            .with_filter(EnvFilter::new(FILE_DIRECTIVE))
    });

    tracing_subscriber::registry()
        .with(console.with_filter(filter))
        .with(file_layer)
        .init();

    if let (Some(path), Some(e)) = (opts.log_file.as_deref(), file_error) {
        warn!(path = %path.display(), "Log file could not be created: {e}");
    }
    log_path
}

/// Create the log file, including its parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Display emphasis for key facts of a run.
///
/// These are ordinary info-level events carrying a `category` field, so
/// they can be picked out of the log file and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Version,
    Settings,
    Sid,
    Snapshot,
    DeviceId,
    DeviceUrl,
    DevicePublicUrl,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Settings => "settings",
            Self::Sid => "sid",
            Self::Snapshot => "snapshot",
            Self::DeviceId => "dhid",
            Self::DeviceUrl => "device_url",
            Self::DevicePublicUrl => "device_public_url",
        }
    }

    /// Bracketed tag shown in front of the value.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Version => "VERSION",
            Self::Settings => "SETTINGS",
            Self::Sid => "SID",
            Self::Snapshot => "SNAPSHOT",
            Self::DeviceId => "DH_ID",
            Self::DeviceUrl => "DH_URL",
            Self::DevicePublicUrl => "DEVICE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit `value` as an emphasized info event.
pub fn highlight(category: Category, value: &str) {
    info!(category = category.as_str(), "[{}] {value}", category.label());
}
