//! Simulated-time helpers.
//!
//! All timestamps are milliseconds since the Unix epoch. Durations supplied by
//! callers are whole minutes.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u128 = 60_000;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Convert a minute count to milliseconds.
pub const fn minutes_to_ms(minutes: u32) -> u128 {
    minutes as u128 * MS_PER_MINUTE
}

/// Elapsed milliseconds between `from` and `to`.
///
/// `to` earlier than `from` is a broken clock invariant: debug builds panic,
/// release builds clamp to zero.
pub fn elapsed_ms(from: u128, to: u128) -> u128 {
    debug_assert!(
        to >= from,
        "clock invariant violated: end {to} precedes start {from}"
    );
    to.saturating_sub(from)
}
