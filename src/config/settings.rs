//! Runtime settings from `settings.toml` and the environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::path::resolve_base_dir;
use crate::error::{HwError, Result};
use crate::snapshot::SoftwareInfo;

/// Directory searched for the settings file by default.
pub const DEFAULT_SETTINGS_DIR: &str = "/mnt/settings";
/// Settings file name inside the settings directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

pub const ENV_DH_URL: &str = "DH_URL";
pub const ENV_DH_TOKEN: &str = "DH_TOKEN";
pub const ENV_SNAPSHOTS_PATH: &str = "SNAPSHOTS_PATH";
pub const ENV_LOGS_PATH: &str = "LOGS_PATH";
pub const ENV_SETTINGS_VERSION: &str = "SETTINGS_VERSION";
pub const ENV_VERSION: &str = "VERSION";
pub const ENV_DISABLE_HWINFO: &str = "DISABLE_HWINFO";
pub const ENV_SOFTWARE: &str = "SOFTWARE";
pub const ENV_SOFTWARE_VERSION: &str = "SOFTWARE_VERSION";

/// Effective settings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Inventory server endpoint.
    pub dh_url: Option<String>,
    /// Credential sent as `Authorization: Basic <token>`.
    pub dh_token: Option<String>,
    /// Base directory for `snapshots/`.
    pub snapshots_path: Option<PathBuf>,
    /// Base directory for `logs/`.
    pub logs_path: Option<PathBuf>,
    /// Name of the settings profile.
    pub settings_version: Option<String>,
    /// Skip the slow `hwinfo` source.
    pub disable_hwinfo: bool,
    /// Producer name stamped into snapshots, when rebranded.
    pub software: Option<String>,
    /// Producer version stamped into snapshots.
    pub software_version: Option<String>,
}

/// On-disk settings file. Keys use the environment variable names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
struct SettingsFile {
    dh_url: Option<String>,
    dh_token: Option<String>,
    #[serde(alias = "SNAPSHOT_PATH")]
    snapshots_path: Option<String>,
    logs_path: Option<String>,
    #[serde(alias = "VERSION")]
    settings_version: Option<String>,
    disable_hwinfo: Option<Flag>,
    software: Option<String>,
    software_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Text(s) => parse_flag(s),
        }
    }
}

/// Truthiness of a flag value: anything non-empty except 0/false/no/off.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    !matches!(value.as_str(), "" | "0" | "false" | "no" | "off")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    /// Load `settings.toml` from `dir`, then apply the process environment.
    ///
    /// A missing file is not an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE_NAME);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), "Loaded settings file");
                Some(contents)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file");
                None
            }
            Err(e) => {
                return Err(HwError::ConfigRead {
                    path,
                    reason: e.to_string(),
                });
            }
        };
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Settings from the process environment only.
    pub fn from_env() -> Self {
        Self::merge(SettingsFile::default(), |key| std::env::var(key).ok())
    }

    /// Merge a settings file (if any) with `lookup`, which wins when it
    /// returns a non-empty value.
    pub fn from_sources<F>(file: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match file {
            Some(contents) => {
                toml::from_str(contents).map_err(|e| HwError::ConfigParse(e.to_string()))?
            }
            None => SettingsFile::default(),
        };
        Ok(Self::merge(file, lookup))
    }

    fn merge<F>(file: SettingsFile, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| non_empty(lookup(key));

        let disable_hwinfo = match lookup(ENV_DISABLE_HWINFO) {
            Some(value) => parse_flag(&value),
            None => file.disable_hwinfo.is_some_and(|f| f.is_set()),
        };

        Self {
            dh_url: env(ENV_DH_URL).or_else(|| non_empty(file.dh_url)),
            dh_token: env(ENV_DH_TOKEN).or_else(|| non_empty(file.dh_token)),
            snapshots_path: env(ENV_SNAPSHOTS_PATH)
                .or_else(|| non_empty(file.snapshots_path))
                .map(PathBuf::from),
            logs_path: env(ENV_LOGS_PATH)
                .or_else(|| non_empty(file.logs_path))
                .map(PathBuf::from),
            settings_version: env(ENV_SETTINGS_VERSION)
                .or_else(|| env(ENV_VERSION))
                .or_else(|| non_empty(file.settings_version)),
            disable_hwinfo,
            software: env(ENV_SOFTWARE).or_else(|| non_empty(file.software)),
            software_version: env(ENV_SOFTWARE_VERSION)
                .or_else(|| non_empty(file.software_version)),
        }
    }

    /// Directory in which `snapshots/` is created.
    pub fn snapshots_dir(&self) -> PathBuf {
        resolve_base_dir(self.snapshots_path.as_deref())
    }

    /// Directory in which `logs/` is created.
    pub fn logs_dir(&self) -> PathBuf {
        resolve_base_dir(self.logs_path.as_deref())
    }

    /// Producer identity, with this build's values for anything unset.
    pub fn software_info(&self) -> SoftwareInfo {
        let current = SoftwareInfo::current();
        SoftwareInfo {
            software: self.software.clone().unwrap_or(current.software),
            version: self.software_version.clone().unwrap_or(current.version),
            schema_api: current.schema_api,
        }
    }

    /// Endpoint and token, when both are configured.
    pub fn upload_target(&self) -> Option<(&str, &str)> {
        Some((self.dh_url.as_deref()?, self.dh_token.as_deref()?))
    }
}
