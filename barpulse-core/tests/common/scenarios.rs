//! Pre-built session scenarios with known expected outcomes
//!
//! Each scenario returns a complete 50 Hz sample stream, starting from a
//! cold, uncalibrated engine: a 4 s rest preamble (3 s warm-up plus the
//! baseline sampling window at 1.00 g), followed by the scenario's movement
//! content.

use super::generators::{calibration_preamble, peak_for_mean_velocity, StreamBuilder};
use barpulse_core::Sample;

/// Rest, then one clean repetition with a 1.20 g peak
///
/// Expected: exactly one accepted rep, time-to-peak 0.70 s, mean velocity
/// ≈ 0.981 m/s (|1.20 − 1.00| · 9.81 · 0.5).
pub fn single_clean_rep() -> Vec<Sample> {
    calibration_preamble(1.00)
        .rep_pulse(1.20)
        .hold(1.00, 2500)
        .build()
}

/// A set of repetitions whose mean velocities decline as given
///
/// Peaks are spaced far enough apart that every pulse gets its own window
/// and the pre-buffer refills in between.
pub fn declining_set(mean_velocities: &[f32]) -> Vec<Sample> {
    let mut builder = calibration_preamble(1.00);
    for &mv in mean_velocities {
        builder = builder.rep_pulse(peak_for_mean_velocity(mv)).hold(1.00, 2000);
    }
    builder.hold(1.00, 1000).build()
}

/// Rest held within the sensor-noise band for `duration_ms`
///
/// Expected: the engine never leaves CLOSED.
pub fn noisy_rest(amplitude: f32, duration_ms: u64) -> Vec<Sample> {
    calibration_preamble(1.00)
        .hold_noisy(1.00, amplitude, duration_ms)
        .build()
}

/// Two pulses so close together that both land in one capture window
///
/// Expected: one window, at most one rep (single-trigger-per-refractory).
pub fn double_pulse_burst() -> Vec<Sample> {
    calibration_preamble(1.00)
        .rep_pulse(1.20)
        .rep_pulse(1.18)
        .hold(1.00, 2500)
        .build()
}

/// Vigorous movement starting immediately, ending before the warm-up
/// delay expires
///
/// Expected: no calibration, no windows, no reps.
pub fn movement_before_calibration() -> Vec<Sample> {
    StreamBuilder::new(0)
        .rep_pulse(1.40)
        .rep_pulse(1.40)
        .hold(1.00, 500)
        .build()
}

/// One pulse whose peak stays below the default 1.05 g threshold
///
/// Expected: a window opens and is rejected for a sub-threshold peak.
pub fn sub_threshold_pulse() -> Vec<Sample> {
    calibration_preamble(1.00)
        .rep_pulse(1.03)
        .hold(1.00, 2500)
        .build()
}
