//! Common test utilities for hwmd.
//!
//! - `env`: Serialized environment variable changes
//! - `fixtures`: Sessions, settings directories and canned server replies
//! - `logging`: Log output verification helpers
#![allow(dead_code)]

pub mod fixtures;
pub mod logging;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
