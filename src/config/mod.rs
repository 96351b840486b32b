//! Runtime configuration.
//!
//! Settings come from an optional `settings.toml` (in `/mnt/settings` unless
//! overridden) and from environment variables of the same names, which take
//! precedence. The resulting [`Settings`] value is built once at startup and
//! passed to each component.

mod path;
mod settings;

pub use path::{expand_home, home_dir, resolve_base_dir};
pub use settings::{
    DEFAULT_SETTINGS_DIR, ENV_DH_TOKEN, ENV_DH_URL, ENV_DISABLE_HWINFO, ENV_LOGS_PATH,
    ENV_SETTINGS_VERSION, ENV_SNAPSHOTS_PATH, ENV_SOFTWARE, ENV_SOFTWARE_VERSION, ENV_VERSION,
    SETTINGS_FILE_NAME, Settings, parse_flag,
};
