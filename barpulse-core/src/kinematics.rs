//! Kinematics — Velocity Metrics for Accepted Repetitions
//!
//! ## Per-repetition metrics
//!
//! The engine does not claim metrologically calibrated velocity. The mean
//! concentric velocity is a proportional estimate:
//!
//! ```text
//! delta         = |peak_magnitude - baseline|          (g)
//! mean_velocity = delta * 9.81 * velocity_factor       (m/s)
//! ```
//!
//! where `velocity_factor` is an explicitly uncalibrated profile tunable.
//! Peak and mean propulsive velocity are fixed heuristic multiples (×1.3 and
//! ×1.15) of the mean — estimates carried as estimates, not measurements
//! dressed up as independent observations.
//!
//! A second, fixed conversion factor
//! ([`VALIDATION_VELOCITY_FACTOR`](crate::constants::VALIDATION_VELOCITY_FACTOR))
//! exists for the validator's diagnostic estimate. The two factors disagree
//! in deployed firmware and which is authoritative is unresolved; they are
//! kept visibly separate here.
//!
//! ## Live telemetry integrator
//!
//! [`LiveVelocityIntegrator`] integrates net acceleration continuously for
//! display: `v += (magnitude - 1.0) * 9.81 * dt`. It compensates gravity
//! with a fixed 1.0 g — not the calibrated baseline — and accumulates error
//! without bound between resets. It exists for live charts only; it never
//! contributes to repetition metrics. The engine resets it at accepted-rep
//! boundaries to keep the drift window short.

use crate::constants::{
    PEAK_VELOCITY_RATIO, PROPULSIVE_VELOCITY_RATIO, REST_MAGNITUDE_G, STANDARD_GRAVITY_MS2,
    VALIDATION_VELOCITY_FACTOR,
};
use crate::events::{Marker, Sample};
use crate::time::{elapsed_secs, Timestamp};

/// Velocity metrics computed for one accepted repetition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepMetrics {
    /// Mean concentric velocity estimate, m/s
    pub mean_velocity: f32,
    /// Peak velocity estimate, m/s (heuristic multiple of the mean)
    pub peak_velocity: f32,
    /// Mean propulsive velocity estimate, m/s (heuristic multiple)
    pub mean_propulsive_velocity: f32,
    /// Window start to concentric peak, seconds
    pub time_to_peak_s: f32,
}

/// Compute the metrics for an accepted window's peak marker
pub fn concentric_metrics(
    peak: &Marker,
    window_start: Timestamp,
    baseline: f32,
    velocity_factor: f32,
) -> RepMetrics {
    let delta = (peak.magnitude - baseline).abs();
    let mean_velocity = delta * STANDARD_GRAVITY_MS2 * velocity_factor;

    RepMetrics {
        mean_velocity,
        peak_velocity: mean_velocity * PEAK_VELOCITY_RATIO,
        mean_propulsive_velocity: mean_velocity * PROPULSIVE_VELOCITY_RATIO,
        time_to_peak_s: elapsed_secs(window_start, peak.timestamp),
    }
}

/// Diagnostic velocity estimate using the fixed validation-path factor
///
/// Logged alongside rejection/acceptance decisions so tuning sessions can
/// compare both conversion constants; never reported as a metric.
pub fn validation_velocity_estimate(peak_magnitude: f32, baseline: f32) -> f32 {
    (peak_magnitude - baseline).abs() * STANDARD_GRAVITY_MS2 * VALIDATION_VELOCITY_FACTOR
}

/// Continuous velocity integrator for live display
///
/// Display-only and known to drift: gravity compensation subtracts a fixed
/// 1.0 g rather than the calibrated baseline, and integration error
/// accumulates until [`reset`](LiveVelocityIntegrator::reset) is called.
#[derive(Debug, Clone, Default)]
pub struct LiveVelocityIntegrator {
    velocity: f32,
    last: Option<Timestamp>,
}

impl LiveVelocityIntegrator {
    /// Create an integrator at rest
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate one sample and return the updated velocity, m/s
    pub fn update(&mut self, sample: &Sample) -> f32 {
        if let Some(last) = self.last {
            let dt = elapsed_secs(last, sample.timestamp);
            let accel_net = (sample.magnitude - REST_MAGNITUDE_G) * STANDARD_GRAVITY_MS2;
            self.velocity += accel_net * dt;
        }
        self.last = Some(sample.timestamp);
        self.velocity
    }

    /// Current integrated velocity, m/s
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Zero the integrator; invoked by the engine at rep boundaries
    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }
}
