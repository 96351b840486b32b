//! hwmd library - hardware metadata snapshots for Linux hosts.
//!
//! This library exposes the core functionality of the `hwmd` CLI for use in
//! tests and potentially other applications.
//!
//! # Modules
//!
//! - `collector`: Runs the inventory commands and normalizes their output
//! - `identifier`: Snapshot UUID and short SID
//! - `snapshot`: Snapshot document, builder and JSON writer
//! - `upload`: HTTP upload to the inventory server
//! - `workbench`: One full run (generate, save, upload)
//! - `config`: Settings file and environment handling
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod output;
pub mod snapshot;
pub mod upload;
pub mod workbench;
