//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::DEFAULT_SETTINGS_DIR;

/// hwmd - Collect a hardware snapshot of this machine and upload it.
///
/// Runs lshw, dmidecode, lspci, hwinfo and smartctl, saves the combined JSON
/// snapshot and posts it to the inventory server. Must be run as root.
#[derive(Parser, Debug)]
#[command(name = "hwmd", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "HWMD_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors on the console)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Directory containing settings.toml
    #[arg(
        long,
        global = true,
        env = "HWMD_SETTINGS_DIR",
        default_value = DEFAULT_SETTINGS_DIR
    )]
    pub settings_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }

    /// Arguments of the run, also when no subcommand was given.
    pub fn run_args(&self) -> RunArgs {
        match &self.command {
            Some(Commands::Run(args)) => args.clone(),
            _ => RunArgs::default(),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate, save and upload a snapshot (default)
    Run(RunArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Save the snapshot locally without uploading it
    #[arg(long)]
    pub no_upload: bool,

    /// Skip the slow hwinfo source (same as DISABLE_HWINFO=1)
    #[arg(long)]
    pub disable_hwinfo: bool,

    /// Also print the snapshot document to stdout
    #[arg(long)]
    pub print: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
