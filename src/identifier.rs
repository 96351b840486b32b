//! Snapshot identifiers.
//!
//! Every run gets a random UUIDv4. The SID is a short, human-friendly alias
//! taken from the UUID's `time_mid` field and printed as a zero-padded
//! five-digit decimal. It is used to name the snapshot and log files and as a
//! display id while no server-assigned DHID exists. It is not unique across
//! runs: there are only 65,536 possible values.

use uuid::Uuid;

/// Width of a SID in characters. `u16::MAX` has five decimal digits.
pub const SID_LEN: usize = 5;

/// Generate a fresh random snapshot UUID.
pub fn new_snapshot_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Derive the SID for `uuid`.
pub fn sid_for(uuid: &Uuid) -> String {
    let (_time_low, time_mid, _time_hi, _rest) = uuid.as_fields();
    format!("{time_mid:0width$}", width = SID_LEN)
}
