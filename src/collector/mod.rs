//! Hardware data collection from external inventory tools.
//!
//! Each [`Source`] maps to one command (`smart` to a device listing followed
//! by one `smartctl` call per disk). Commands run exactly once and the result
//! is classified into a [`Capture`]:
//!
//! | Process outcome | JSON source (`lshw`, `smart`) | Text source |
//! |---|---|---|
//! | exited, output decodes | parsed JSON, or raw text if parsing fails | raw text |
//! | exited non-zero, no output | synthetic error text | synthetic error text |
//! | killed by signal | captured text, or synthetic error text | same |
//! | could not be started | synthetic error text | same |
//!
//! Collection never fails as a whole: every capture turns into a JSON value
//! for its field in the snapshot.

pub mod mock;
mod runner;
mod smart;

pub use runner::{CommandRunner, CommandSpec, ExitState, RawOutput, SystemRunner};
pub use smart::{SmartData, lsblk_command, parse_disk_names, smartctl_command};

use std::fmt;
use std::io;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// An inventory data source, named as its key in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Lshw,
    Dmidecode,
    Lspci,
    Hwinfo,
    Smart,
}

impl Source {
    /// All sources in snapshot key order.
    pub const ALL: [Self; 5] = [
        Self::Lshw,
        Self::Dmidecode,
        Self::Lspci,
        Self::Hwinfo,
        Self::Smart,
    ];

    /// Key of this source in the snapshot `data` map.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Lshw => "lshw",
            Self::Dmidecode => "dmidecode",
            Self::Lspci => "lspci",
            Self::Hwinfo => "hwinfo",
            Self::Smart => "smart",
        }
    }

    /// Upper-case label used in log messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lshw => "LSHW",
            Self::Dmidecode => "DMIDECODE",
            Self::Lspci => "LSPCI",
            Self::Hwinfo => "HWINFO",
            Self::Smart => "SMART",
        }
    }

    /// The command run for this source. For `smart` this is the disk listing.
    pub fn command(self) -> CommandSpec {
        match self {
            Self::Lshw => CommandSpec::new("lshw", ["-json"]),
            Self::Dmidecode => CommandSpec::new("dmidecode", Vec::<String>::new()),
            Self::Lspci => CommandSpec::new("lspci", ["-vv"]),
            Self::Hwinfo => CommandSpec::new("hwinfo", ["--reallyall"]),
            Self::Smart => lsblk_command(),
        }
    }

    /// Whether the output is expected to be JSON.
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Lshw | Self::Smart)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a capture produced no usable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectErrorKind {
    /// The process could not be started.
    Spawn,
    /// The process was killed by a signal.
    Terminated,
    /// The process exited non-zero without any output.
    NoOutput,
    /// The output is not valid UTF-8.
    Decode,
    /// Disk enumeration for SMART failed.
    Enumeration,
}

/// A failed capture, carried as the field value instead of data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CollectError {
    pub kind: CollectErrorKind,
    pub message: String,
}

impl CollectError {
    pub fn new(kind: CollectErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Classified result of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// Output parsed as JSON.
    Json(Value),
    /// Output kept as text.
    Text(String),
    /// JSON was expected but the output did not parse; the text is kept.
    Unparsed { text: String, reason: String },
    /// No usable output.
    Failed(CollectError),
}

impl Capture {
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Value embedded in the snapshot for this capture.
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) | Self::Unparsed { text, .. } => Value::String(text),
            Self::Failed(err) => Value::String(err.message),
        }
    }
}

/// Classify the result of running a command.
///
/// `label` names the command in synthetic error messages.
pub fn classify(label: &str, structured: bool, result: io::Result<RawOutput>) -> Capture {
    let raw = match result {
        Ok(raw) => raw,
        Err(e) => {
            return Capture::Failed(CollectError::new(
                CollectErrorKind::Spawn,
                format!("{label} could not be executed: {e}"),
            ));
        }
    };

    let text = match String::from_utf8(raw.output) {
        Ok(text) => text,
        Err(e) => {
            return Capture::Failed(CollectError::new(
                CollectErrorKind::Decode,
                format!("{label} output is not valid UTF-8: {e}"),
            ));
        }
    };

    match raw.status {
        ExitState::Signaled(signal) => {
            let message = if text.trim().is_empty() {
                format!("{label} was terminated by signal {signal}")
            } else {
                text
            };
            Capture::Failed(CollectError::new(CollectErrorKind::Terminated, message))
        }
        ExitState::Exited(code) if code != 0 && text.trim().is_empty() => {
            Capture::Failed(CollectError::new(
                CollectErrorKind::NoOutput,
                format!("{label} exited with status {code} and no output"),
            ))
        }
        ExitState::Exited(_) if structured => match serde_json::from_str(&text) {
            Ok(value) => Capture::Json(value),
            Err(e) => Capture::Unparsed {
                text,
                reason: e.to_string(),
            },
        },
        ExitState::Exited(_) => Capture::Text(text),
    }
}

/// Runs inventory commands and turns their output into snapshot values.
pub struct Collector<R> {
    runner: R,
}

impl<R: CommandRunner> Collector<R> {
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Run one command, classify it, and log the outcome.
    pub fn capture(&self, label: &str, spec: &CommandSpec, structured: bool) -> Capture {
        debug!(command = %spec, "Running {label}");
        let result = self.runner.run(spec);
        let status = result.as_ref().ok().map(|raw| raw.status);
        let capture = classify(label, structured, result);

        match &capture {
            Capture::Json(_) | Capture::Text(_) => {
                if let Some(ExitState::Exited(code)) = status.filter(|s| !s.is_success()) {
                    warn!(command = %spec, code, "{label} exited with status {code}");
                }
                info!("{label} successfully completed.");
            }
            Capture::Unparsed { reason, .. } => {
                error!("{label} exception: output is not valid JSON");
                debug!(command = %spec, %reason, "{label} JSON parse failure");
            }
            Capture::Failed(err) => {
                error!(kind = ?err.kind, "{label} failed execution with output: {}", err.message);
            }
        }
        capture
    }

    /// Collect one source as a snapshot value.
    pub fn collect(&self, source: Source) -> Value {
        match source {
            Source::Smart => self.smart().into_value(),
            other => self
                .capture(other.label(), &other.command(), other.is_structured())
                .into_value(),
        }
    }

    /// Collect SMART data for every disk.
    pub fn smart(&self) -> SmartData {
        smart::collect(self)
    }
}
