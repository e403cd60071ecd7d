//! Time handling for the detection engine
//!
//! The engine never reads a clock of its own: every `Sample` arrives stamped
//! by the transport layer with a monotonic timestamp, and all timing decisions
//! (warm-up, window close, refractory) are comparisons between those stamps.
//! Timestamps are milliseconds since an arbitrary origin (typically device
//! boot or monitoring start).
//!
//! Configured durations are expressed in seconds on the profile for human
//! readability and converted to milliseconds once, at engine construction.

/// Timestamp in milliseconds since an arbitrary monotonic origin
pub type Timestamp = u64;

/// Milliseconds per second, for duration conversions
pub const MS_PER_SECOND: u64 = 1_000;

/// Convert a duration in seconds to whole milliseconds (rounded)
///
/// Negative inputs clamp to zero; durations are never negative after
/// profile validation, this just keeps the conversion total.
pub fn secs_to_ms(secs: f32) -> u64 {
    if secs <= 0.0 {
        return 0;
    }
    (secs * MS_PER_SECOND as f32 + 0.5) as u64
}

/// Convert milliseconds to seconds as f32
pub fn ms_to_secs(ms: u64) -> f32 {
    ms as f32 / MS_PER_SECOND as f32
}

/// Elapsed seconds between two timestamps, saturating at zero
pub fn elapsed_secs(from: Timestamp, to: Timestamp) -> f32 {
    ms_to_secs(to.saturating_sub(from))
}
