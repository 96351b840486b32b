//! Fixtures shared by the integration tests.

use std::fs;
use std::path::Path;

use chrono::{Local, TimeZone};
use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

use hwmd::snapshot::Session;

/// UUID whose `time_mid` field is 0x0a2b, i.e. SID "02603".
pub const FIXED_UUID: &str = "6c1f2d9e-0a2b-4c3d-8e4f-5a6b7c8d9e0f";

/// A session at 2023-02-14 09:05:07 local time with [`FIXED_UUID`].
#[must_use]
pub fn fixed_session() -> Session {
    let timestamp = Local
        .with_ymd_and_hms(2023, 2, 14, 9, 5, 7)
        .single()
        .expect("unambiguous local time");
    Session::from_parts(timestamp, Uuid::parse_str(FIXED_UUID).expect("valid uuid"))
}

/// Body of a `201 Created` upload reply.
#[must_use]
pub fn created_body(dhid: &str) -> Value {
    json!({
        "dhid": dhid,
        "url": format!("https://inventory.example.org/devices/{dhid}"),
        "public_url": format!("https://inventory.example.org/public/devices/{dhid}"),
        "type": "Snapshot",
    })
}

/// Body of a validation error reply.
#[must_use]
pub fn validation_error_body(code: i64) -> Value {
    json!({
        "code": code,
        "type": "ValidationError",
        "message": {"device": ["Missing data for required field."]},
    })
}

/// A temporary settings directory holding `settings.toml` with `contents`.
#[must_use]
pub fn settings_dir(contents: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    write_settings(dir.path(), contents);
    dir
}

pub fn write_settings(dir: &Path, contents: &str) {
    fs::write(dir.join("settings.toml"), contents).expect("write settings.toml");
}
