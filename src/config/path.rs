//! Path resolution helpers for configured directories.
//!
//! Supports absolute paths, paths relative to the working directory, and "~"
//! home directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::{HwError, Result};

/// Expand a leading `~` in `path`.
///
/// Resolution rules:
/// 1. `~` and `~/...`: expanded to the home directory
/// 2. Anything else: returned unchanged
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    trace!(path = %path.display(), "Resolving path");

    let path_str = path.to_string_lossy();
    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() {
            home
        } else {
            home.join(rest)
        };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }
    Ok(path.to_path_buf())
}

/// Resolve the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(HwError::NoHomeDir)
}

/// Directory under which `snapshots/` or `logs/` is created.
///
/// Falls back to the current working directory when nothing is configured or
/// the configured path cannot be expanded.
pub fn resolve_base_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        match expand_home(path) {
            Ok(resolved) => return resolved,
            Err(e) => warn!(path = %path.display(), "Ignoring configured path: {e}"),
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
