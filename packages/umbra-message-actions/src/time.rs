//! Time utilities.
//!
//! Message and tombstone timestamps are Unix milliseconds, the same unit
//! Umbra uses on the wire.

/// Returns the current Unix timestamp in milliseconds.
pub fn now_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
