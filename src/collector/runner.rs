//! Child process execution for inventory commands.

use std::fmt;
use std::io;
use std::process::{Command, ExitStatus, Stdio};

use tracing::trace;

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Space-joined command line, used for display and mock lookups.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Command line with every word quoted for `sh -c`.
    pub fn shell_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | '=' | ','));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Ran to completion with this exit code.
    Exited(i32),
    /// Killed by this signal number.
    Signaled(i32),
}

impl ExitState {
    /// Numeric status: exit codes are non-negative, signal deaths negative.
    pub const fn code(self) -> i32 {
        match self {
            Self::Exited(code) => code,
            Self::Signaled(signal) => -signal,
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

/// Exit status plus combined stdout and stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    pub status: ExitState,
    pub output: Vec<u8>,
}

/// Seam between the collector and the operating system.
pub trait CommandRunner {
    /// Run `spec` to completion with no stdin.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process could not be started.
    fn run(&self, spec: &CommandSpec) -> io::Result<RawOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> io::Result<RawOutput> {
        (**self).run(spec)
    }
}

/// Runs commands through `sh` with stderr folded into stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<RawOutput> {
        let script = format!("exec 2>&1; {}", spec.shell_line());
        trace!(command = %spec, "Spawning inventory command");

        let out = Command::new("sh")
            .arg("-c")
            .arg(&script)
            .stdin(Stdio::null())
            .output()?;

        let mut output = out.stdout;
        output.extend_from_slice(&out.stderr);

        Ok(RawOutput {
            status: exit_state(out.status),
            output,
        })
    }
}

fn exit_state(status: ExitStatus) -> ExitState {
    if let Some(code) = status.code() {
        return ExitState::Exited(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitState::Signaled(signal);
        }
    }
    ExitState::Signaled(0)
}
