//! Constants for the BarPulse detection engine
//!
//! Centralized numeric values used across the engine, grouped by domain.
//! Detection *thresholds* live on [`DetectionProfile`](crate::DetectionProfile)
//! because they are per-exercise tunables; everything here is either a fixed
//! physical constant, a structural capacity, or the default value a profile
//! starts from.
//!
//! Use these constants instead of magic numbers, and include units in names
//! where the quantity has one.

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

/// Standard gravity in m/s² — converts magnitudes in g to accelerations
pub const STANDARD_GRAVITY_MS2: f32 = 9.81;

/// Magnitude reported by a resting sensor, in g
///
/// The live-telemetry velocity integrator subtracts this fixed value rather
/// than the calibrated session baseline; see
/// [`LiveVelocityIntegrator`](crate::kinematics::LiveVelocityIntegrator) for
/// why that estimator is display-only.
pub const REST_MAGNITUDE_G: f32 = 1.0;

// ---------------------------------------------------------------------------
// Marker extraction and kinematics
// ---------------------------------------------------------------------------

/// Counter-movement threshold as a fraction of baseline
///
/// The eccentric dip is recognized when raw magnitude falls below
/// `baseline * CM_DIP_FACTOR` within the eccentric search window.
pub const CM_DIP_FACTOR: f32 = 0.92;

/// Peak velocity as a multiple of mean velocity
///
/// Heuristic estimate, not derived from the signal; reported values carry
/// this assumption explicitly.
pub const PEAK_VELOCITY_RATIO: f32 = 1.3;

/// Mean propulsive velocity as a multiple of mean velocity
///
/// Heuristic estimate, same caveat as [`PEAK_VELOCITY_RATIO`].
pub const PROPULSIVE_VELOCITY_RATIO: f32 = 1.15;

/// Fixed acceleration-to-velocity factor used by the validator's diagnostic
/// velocity estimate
///
/// Deliberately distinct from
/// [`DetectionProfile::velocity_factor`](crate::DetectionProfile::velocity_factor):
/// the two constants disagree in the field today and which one is
/// authoritative is an open product question. Keep them separate; do not
/// unify silently.
pub const VALIDATION_VELOCITY_FACTOR: f32 = 0.5;

/// Minimum samples required after the recoil trough for a deceleration
/// marker; a single trailing sample is just the window tail
pub const MIN_DECEL_SUFFIX_SAMPLES: usize = 2;

/// Required ratio between the movement gate and the noise ceiling
///
/// A profile whose `min_movement_std` is not at least this multiple of
/// `max_noise_std` cannot discriminate motion from sensor noise and is
/// rejected at construction.
pub const MIN_STD_GAP_RATIO: f32 = 2.0;

// ---------------------------------------------------------------------------
// Capacities (compile-time maxima; runtime lengths come from the profile)
// ---------------------------------------------------------------------------

/// Maximum magnitude-smoothing window, in samples
pub const MAX_SMOOTH_WINDOW: usize = 16;

/// Maximum variability (standard deviation) window, in samples
pub const MAX_STD_WINDOW: usize = 64;

/// Maximum pre-trigger rolling buffer, in samples
pub const MAX_PRE_BUFFER: usize = 64;

/// Maximum samples a capture window can hold
///
/// 2.5 s at 100 Hz plus a full pre-buffer fits comfortably; streams faster
/// than ~175 Hz would saturate a default-duration window and start counting
/// drops (see [`EventWindow::dropped`](crate::window::EventWindow::dropped)).
pub const MAX_WINDOW_SAMPLES: usize = 512;

/// Maximum samples the baseline calibrator can accumulate
pub const MAX_BASELINE_SAMPLES: usize = 64;

/// Maximum repetitions retained per session
pub const MAX_SESSION_REPS: usize = 128;

/// Capacity of the engine's pending-event buffer, drained via
/// [`RepEngine::drain_events`](crate::RepEngine::drain_events)
pub const PENDING_EVENT_CAPACITY: usize = 32;

// ---------------------------------------------------------------------------
// Profile defaults
// ---------------------------------------------------------------------------

/// Default trigger zone as a fraction of baseline (6%)
pub const DEFAULT_BASELINE_ZONE: f32 = 0.06;

/// Default artifact floor for the counter-movement dip, in g
pub const DEFAULT_MIN_DEPTH_MAG: f32 = 0.60;

/// Default minimum concentric peak magnitude, in g
pub const DEFAULT_MIN_PEAK_MAG: f32 = 1.05;

/// Default eccentric search window from window start, in seconds
pub const DEFAULT_MIN_ECCENTRIC_WINDOW_S: f32 = 0.5;

/// Default upper bound on time-to-peak, in seconds
pub const DEFAULT_MAX_CONCENTRIC_WINDOW_S: f32 = 2.0;

/// Default lower bound on time-to-peak, in seconds
pub const DEFAULT_MIN_CONCENTRIC_DURATION_S: f32 = 0.15;

/// Default refractory period between a rep's peak and the next trigger,
/// in seconds
pub const DEFAULT_REFRACTORY_PERIOD_S: f32 = 1.0;

/// Default magnitude-smoothing window, in samples (~0.1 s at 50 Hz)
pub const DEFAULT_MAG_SMOOTH_WINDOW: usize = 5;

/// Default variability window, in samples (~0.4 s at 50 Hz)
pub const DEFAULT_STD_WINDOW: usize = 20;

/// Default minimum standard deviation indicating genuine movement, in g
pub const DEFAULT_MIN_MOVEMENT_STD: f32 = 0.03;

/// Default ceiling for pure sensor noise, in g
pub const DEFAULT_MAX_NOISE_STD: f32 = 0.015;

/// Default capture window duration, in seconds
pub const DEFAULT_WINDOW_DURATION_S: f32 = 2.5;

/// Default pre-trigger buffer length, in samples (~0.5 s at 50 Hz)
pub const DEFAULT_PRE_BUFFER_SIZE: usize = 25;

/// Default acceleration-to-velocity conversion factor
///
/// Explicitly uncalibrated: reported velocities are proportional estimates,
/// not metrological measurements.
pub const DEFAULT_VELOCITY_FACTOR: f32 = 0.5;

/// Default settle time before baseline sampling begins, in seconds
pub const DEFAULT_WARMUP_DELAY_S: f32 = 3.0;

/// Default number of raw samples the baseline median is taken over
/// (~0.5 s at 50 Hz)
pub const DEFAULT_BASELINE_SAMPLE_COUNT: usize = 25;
