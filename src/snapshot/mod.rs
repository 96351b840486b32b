//! Hardware snapshot generation and local persistence.
//!
//! A [`Session`] fixes the run's timestamp, UUID and SID. The
//! [`SnapshotBuilder`] collects every source into a [`Snapshot`], which the
//! [`SnapshotWriter`] stores as JSON.
//!
//! # Directory Structure
//!
//! ```text
//! $SNAPSHOTS_PATH/
//! └── snapshots/
//!     └── 2023-02-14_09h05m07s_02603_snapshot.json
//! $LOGS_PATH/
//! └── logs/
//!     └── 2023-02-14_09h05m07s_02603_snapshot.log
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use hwmd::collector::SystemRunner;
//! use hwmd::snapshot::{Session, SnapshotBuilder, SnapshotWriter};
//!
//! let session = Session::start();
//! let snapshot = SnapshotBuilder::new(SystemRunner).build(&session);
//! let file = SnapshotWriter::new("/mnt").save(&snapshot);
//! ```

mod builder;
mod schema;
mod session;
mod writer;

pub use builder::SnapshotBuilder;
pub use schema::{
    NO_SETTINGS_VERSION, SCHEMA_API, SNAPSHOT_TYPE, SOFTWARE_NAME, Snapshot, SnapshotData,
    SoftwareInfo,
};
pub use session::{FILE_DATE_FORMAT, Session, run_file_name};
pub use writer::SnapshotWriter;
