//! hwmd - hardware metadata snapshot tool.
//!
//! Provides both human-friendly and script-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, warn};

use hwmd::cli::{Cli, Commands, CompletionsArgs, RunArgs};
use hwmd::collector::SystemRunner;
use hwmd::config::Settings;
use hwmd::error::HwError;
use hwmd::logging::{LogOptions, init_logging};
use hwmd::output::{OutputMode, VersionInfo};
use hwmd::snapshot::{SCHEMA_API, SOFTWARE_NAME, Session};
use hwmd::upload::{HttpTransport, TransportError};
use hwmd::workbench::{RunOptions, Workbench, ensure_root};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }
    if cli.no_color || !io::stderr().is_terminal() {
        console::set_colors_enabled_stderr(false);
    }

    if let Err(e) = run(&cli) {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        None | Some(Commands::Run(_)) => cmd_run(cli, &cli.run_args()),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

fn log_options(cli: &Cli) -> LogOptions {
    LogOptions {
        robot_mode: cli.use_json(),
        verbose: cli.verbose,
        quiet: cli.quiet,
        log_file: None,
    }
}

fn cmd_run(cli: &Cli, args: &RunArgs) -> anyhow::Result<()> {
    let session = Session::start();

    // Logging needs the settings for its file location, so a settings
    // error is held until the subscriber is up.
    let (settings, settings_error) = match Settings::load(&cli.settings_dir) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::from_env(), Some(e)),
    };

    let log_file = session.log_file_path(&settings.logs_dir());
    init_logging(&LogOptions {
        log_file: Some(log_file),
        ..log_options(cli)
    });
    if let Some(e) = settings_error {
        warn!("{e}");
        warn!("Continuing with settings from the environment only.");
    }
    debug!(
        settings_dir = %cli.settings_dir.display(),
        dh_url = ?settings.dh_url,
        token_set = settings.dh_token.is_some(),
        disable_hwinfo = settings.disable_hwinfo,
        "Settings loaded"
    );

    if let Err(e) = ensure_root() {
        error!("{e}");
        return Err(e.into());
    }

    let transport = HttpTransport::new().map_err(|e| TransportError::Request(e.to_string()));
    let options = RunOptions {
        no_upload: args.no_upload,
        disable_hwinfo: args.disable_hwinfo,
        print_snapshot: args.print,
    };

    let out = OutputMode::from_cli(cli).into_output();
    let report =
        Workbench::new(settings, SystemRunner, transport).run(&session, options, out.as_ref());
    out.run_report(&report);
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> anyhow::Result<()> {
    init_logging(&log_options(cli));
    let info = VersionInfo {
        version: build_info::VERSION,
        software: SOFTWARE_NAME,
        schema_api: SCHEMA_API,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty() == "true",
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    };
    OutputMode::from_cli(cli).into_output().version_info(&info);
    Ok(())
}

fn cmd_completions(_cli: &Cli, args: &CompletionsArgs) -> anyhow::Result<()> {
    use clap::CommandFactory;
    use std::io::Write;

    let mut stdout = io::stdout();
    clap_complete::generate(args.shell, &mut Cli::command(), "hwmd", &mut stdout);
    stdout.flush().context("Writing completions")?;
    Ok(())
}

fn output_error(cli: &Cli, error: &anyhow::Error) {
    let out = OutputMode::from_cli(cli).into_output();
    match error.downcast_ref::<HwError>() {
        Some(e) => out.error(e),
        None => out.error(&HwError::Other(format!("{error:#}"))),
    }
}
