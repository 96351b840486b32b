//! Integration tests for settings loading from file and environment.

use std::path::PathBuf;

use tempfile::TempDir;

use hwmd::collector::mock::MockRunner;
use hwmd::config::Settings;
use hwmd::error::HwError;
use hwmd::snapshot::{Session, SnapshotBuilder};

use crate::common::env::EnvGuard;
use crate::common::fixtures::settings_dir;

#[test]
fn test_missing_file_uses_environment() {
    let _env = EnvGuard::settings(&[("DH_URL", "https://env.example/api/"), ("DH_TOKEN", "tok")]);
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(dir.path()).unwrap();
    assert_eq!(
        settings.upload_target(),
        Some(("https://env.example/api/", "tok"))
    );
    assert!(!settings.disable_hwinfo);
}

#[test]
fn test_file_values_and_env_precedence() {
    let dir = settings_dir(
        r#"
        DH_URL = "https://file.example/api/"
        DH_TOKEN = "file-token"
        SNAPSHOTS_PATH = "/srv/hwmd"
        VERSION = "2022.11 usody"
        DISABLE_HWINFO = "yes"
        "#,
    );
    let _env = EnvGuard::settings(&[("DH_TOKEN", "env-token"), ("DISABLE_HWINFO", "0")]);

    let settings = Settings::load(dir.path()).unwrap();
    assert_eq!(settings.dh_url.as_deref(), Some("https://file.example/api/"));
    assert_eq!(settings.dh_token.as_deref(), Some("env-token"));
    assert_eq!(settings.snapshots_dir(), PathBuf::from("/srv/hwmd"));
    assert_eq!(settings.settings_version.as_deref(), Some("2022.11 usody"));
    assert!(!settings.disable_hwinfo);
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let dir = settings_dir("DH_URL = [unterminated");
    let _env = EnvGuard::settings(&[]);

    let err = Settings::load(dir.path()).unwrap_err();
    assert!(matches!(err, HwError::ConfigParse(_)));
    assert!(err.is_user_recoverable());
}

#[test]
fn test_unknown_key_is_rejected() {
    let dir = settings_dir(r#"DH_ULR = "typo""#);
    let _env = EnvGuard::settings(&[]);
    assert!(Settings::load(dir.path()).is_err());
}

#[test]
fn test_software_keys_rebrand_snapshot() {
    let dir = settings_dir(
        r#"
        SOFTWARE = "UsodyWorkbench"
        SOFTWARE_VERSION = "2022.12.1"
        "#,
    );
    let _env = EnvGuard::settings(&[]);

    let settings = Settings::load(dir.path()).unwrap();
    let snapshot = SnapshotBuilder::new(MockRunner::healthy())
        .with_software(settings.software_info())
        .build(&Session::start());
    assert_eq!(snapshot.software, "UsodyWorkbench");
    assert_eq!(snapshot.version, "2022.12.1");
}
