//! Scripted command runner for tests.
//!
//! Responses are keyed by the space-joined command line. Commands without a
//! scripted response behave like a missing binary under `sh`: exit status 127
//! with a "not found" message.
//!
//! ```rust,ignore
//! use hwmd::collector::mock::MockRunner;
//!
//! let runner = MockRunner::new()
//!     .with_output("lspci -vv", 0, "00:00.0 Host bridge")
//!     .with_signal("lshw -json", 9, "");
//! ```

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use tracing::trace;

use super::{CommandRunner, CommandSpec, ExitState, RawOutput};

/// Canned result for one command line.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Output { status: ExitState, output: Vec<u8> },
    SpawnError(String),
}

/// Command runner returning scripted results and recording every call.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, MockResponse>,
    calls: Mutex<Vec<String>>,
}

pub const LSHW_JSON: &str = r#"{"id":"workstation","class":"system","product":"ThinkPad X1","serial":"PF0ABCDE"}"#;
pub const DMIDECODE_TEXT: &str = "# dmidecode 3.3\nHandle 0x0001, DMI type 1, 27 bytes\nSystem Information\n\tManufacturer: LENOVO\n";
pub const LSPCI_TEXT: &str = "00:00.0 Host bridge: Intel Corporation Device 9a14 (rev 01)\n";
pub const HWINFO_TEXT: &str = "01: None 00.0: 10105 BIOS\n  [Created at bios.186]\n";
pub const LSBLK_JSON: &str = r#"{"blockdevices":[{"kname":"loop0","type":"loop"},{"kname":"nvme0n1","type":"disk"},{"kname":"sda","type":"disk"}]}"#;

/// smartctl JSON for `kname`.
pub fn smartctl_json(kname: &str) -> String {
    format!(r#"{{"device":{{"name":"/dev/{kname}","type":"sat"}},"smart_status":{{"passed":true}}}}"#)
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host where every tool is installed and succeeds.
    pub fn healthy() -> Self {
        Self::new()
            .with_output("lshw -json", 0, LSHW_JSON)
            .with_output("dmidecode", 0, DMIDECODE_TEXT)
            .with_output("lspci -vv", 0, LSPCI_TEXT)
            .with_output("hwinfo --reallyall", 0, HWINFO_TEXT)
            .with_output("lsblk -Jdo KNAME,TYPE", 0, LSBLK_JSON)
            .with_output("smartctl -x --json=cosviu /dev/nvme0n1", 0, &smartctl_json("nvme0n1"))
            .with_output("smartctl -x --json=cosviu /dev/sda", 0, &smartctl_json("sda"))
    }

    /// Script a process that exits with `code` and prints `output`.
    #[must_use]
    pub fn with_output(self, command_line: &str, code: i32, output: &str) -> Self {
        self.with_bytes(command_line, ExitState::Exited(code), output.as_bytes())
    }

    /// Script a process killed by `signal` after printing `output`.
    #[must_use]
    pub fn with_signal(self, command_line: &str, signal: i32, output: &str) -> Self {
        self.with_bytes(command_line, ExitState::Signaled(signal), output.as_bytes())
    }

    #[must_use]
    pub fn with_bytes(mut self, command_line: &str, status: ExitState, output: &[u8]) -> Self {
        self.responses.insert(
            command_line.to_string(),
            MockResponse::Output {
                status,
                output: output.to_vec(),
            },
        );
        self
    }

    /// Script a process that cannot be started at all.
    #[must_use]
    pub fn with_spawn_error(mut self, command_line: &str, message: &str) -> Self {
        self.responses.insert(
            command_line.to_string(),
            MockResponse::SpawnError(message.to_string()),
        );
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `command_line` was run.
    pub fn call_count(&self, command_line: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == command_line)
            .count()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<RawOutput> {
        let line = spec.command_line();
        trace!(command = %line, "Mock command");
        self.calls.lock().unwrap().push(line.clone());

        match self.responses.get(&line) {
            Some(MockResponse::Output { status, output }) => Ok(RawOutput {
                status: *status,
                output: output.clone(),
            }),
            Some(MockResponse::SpawnError(message)) => Err(io::Error::other(message.clone())),
            None => Ok(RawOutput {
                status: ExitState::Exited(127),
                output: format!("sh: 1: {}: not found\n", spec.program).into_bytes(),
            }),
        }
    }
}
