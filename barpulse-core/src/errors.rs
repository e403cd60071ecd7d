//! Error and Rejection Types for the Detection Engine
//!
//! ## Design Philosophy
//!
//! Two distinct failure surfaces exist, and they deliberately share the same
//! small-and-`Copy` shape:
//!
//! 1. **Configuration errors** (`ConfigError`) — a detection profile whose
//!    values violate ordering invariants is rejected at engine construction,
//!    before any sample is processed. These are real errors: the engine
//!    cannot run at all.
//!
//! 2. **Semantic rejection** (`RejectReason`) — a closed capture window that
//!    does not qualify as a repetition. This is not an exceptional condition;
//!    it happens every time the athlete racks the bar, adjusts their grip, or
//!    bumps the sensor. The engine reports the reason through a
//!    [`RepetitionRejected`](crate::events::EngineEvent::RepetitionRejected)
//!    event and returns to listening.
//!
//! Both types follow the same constraints as the rest of the crate:
//!
//! - **Small size**: every variant is a handful of `f32`s at most, since
//!   rejection reasons travel inside events through bounded queues.
//! - **No heap allocation**: no `String`, payloads are inline values.
//! - **Copy semantics**: returned from hot-path functions without move
//!   complications.
//! - **Actionable messages**: each variant's display text names the offending
//!   values so a log line is enough to diagnose a mis-tuned profile.

use thiserror_no_std::Error;

/// Result type for profile validation and engine construction
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detection profile rejected at construction time
///
/// Every variant names the offending field(s) and values; none of these can
/// occur after construction because the profile is immutable once an engine
/// owns it.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Depth floor must sit strictly below the peak threshold
    #[error("min_depth_mag {depth}g must be below min_peak_mag {peak}g")]
    ThresholdOrder {
        /// Configured artifact floor for the eccentric dip
        depth: f32,
        /// Configured minimum concentric peak
        peak: f32,
    },

    /// Movement gate too close to the noise ceiling to discriminate
    #[error("min_movement_std {movement}g must be at least {ratio}x max_noise_std {noise}g")]
    NoiseGapTooSmall {
        /// Configured movement gate
        movement: f32,
        /// Configured noise ceiling
        noise: f32,
        /// Required multiple between the two
        ratio: f32,
    },

    /// A sample-count window is zero or exceeds its compile-time capacity
    #[error("{name} of {requested} samples outside supported range 1..={max}")]
    WindowSize {
        /// Field name on the profile
        name: &'static str,
        /// Requested length
        requested: usize,
        /// Compile-time capacity
        max: usize,
    },

    /// A duration or factor that must be positive is zero or negative
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Field name on the profile
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Trigger zone fraction outside the open interval (0, 1)
    #[error("baseline_zone {zone} must be within (0, 1)")]
    ZoneOutOfRange {
        /// Offending zone fraction
        zone: f32,
    },

    /// A sub-window duration does not fit inside the capture window
    #[error("{name} of {value}s must be shorter than window_duration {window}s")]
    ExceedsWindow {
        /// Field name on the profile
        name: &'static str,
        /// Offending duration in seconds
        value: f32,
        /// Configured capture window duration in seconds
        window: f32,
    },

    /// Concentric duration bounds are inverted
    #[error("min_concentric_duration {min}s exceeds max_concentric_window {max}s")]
    ConcentricOrder {
        /// Lower bound in seconds
        min: f32,
        /// Upper bound in seconds
        max: f32,
    },

    /// A threshold is NaN or infinite
    #[error("{name} is not a finite number")]
    NotFinite {
        /// Field name on the profile
        name: &'static str,
    },
}

/// Why a closed capture window was not accepted as a repetition
///
/// Emitted inside
/// [`EngineEvent::RepetitionRejected`](crate::events::EngineEvent::RepetitionRejected)
/// so rendering and export layers can surface diagnostics; the engine itself
/// just returns to the CLOSED state.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    /// No concentric peak marker was found in the window
    #[error("no concentric peak found in window")]
    MissingPeak,

    /// Peak found, but no recoil trough followed it
    #[error("no recoil trough found after peak")]
    MissingRecoil,

    /// Peak magnitude below the profile threshold
    #[error("peak {magnitude}g below threshold {min}g")]
    PeakBelowThreshold {
        /// Observed peak magnitude in g
        magnitude: f32,
        /// Profile minimum in g
        min: f32,
    },

    /// Markers present but not in eccentric-concentric order
    #[error("recoil does not follow peak in time")]
    OutOfOrder,

    /// Counter-movement dipped below the artifact floor (free-fall or impact
    /// transient, not a controlled eccentric)
    #[error("counter-movement {magnitude}g below artifact floor {floor}g")]
    DipArtifact {
        /// Observed dip magnitude in g
        magnitude: f32,
        /// Profile floor in g
        floor: f32,
    },

    /// Concentric phase shorter than a controlled lift allows
    #[error("time-to-peak {duration_s}s below minimum {min_s}s")]
    ConcentricTooFast {
        /// Observed time-to-peak in seconds
        duration_s: f32,
        /// Profile minimum in seconds
        min_s: f32,
    },

    /// Concentric phase too drawn out to be a single drive
    #[error("time-to-peak {duration_s}s above maximum {max_s}s")]
    ConcentricTooSlow {
        /// Observed time-to-peak in seconds
        duration_s: f32,
        /// Profile maximum in seconds
        max_s: f32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ThresholdOrder { depth, peak } => {
                defmt::write!(fmt, "depth {} !< peak {}", depth, peak)
            }
            Self::NoiseGapTooSmall { movement, noise, ratio } => {
                defmt::write!(fmt, "movement {} !>= {}x noise {}", movement, ratio, noise)
            }
            Self::WindowSize { name, requested, max } => {
                defmt::write!(fmt, "{} = {} outside 1..={}", name, requested, max)
            }
            Self::NonPositive { name, value } => {
                defmt::write!(fmt, "{} = {} not positive", name, value)
            }
            Self::ZoneOutOfRange { zone } => {
                defmt::write!(fmt, "zone {} outside (0,1)", zone)
            }
            Self::ExceedsWindow { name, value, window } => {
                defmt::write!(fmt, "{} = {}s exceeds window {}s", name, value, window)
            }
            Self::ConcentricOrder { min, max } => {
                defmt::write!(fmt, "concentric bounds {}s > {}s", min, max)
            }
            Self::NotFinite { name } => {
                defmt::write!(fmt, "{} not finite", name)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RejectReason {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::MissingPeak => defmt::write!(fmt, "missing peak"),
            Self::MissingRecoil => defmt::write!(fmt, "missing recoil"),
            Self::PeakBelowThreshold { magnitude, min } => {
                defmt::write!(fmt, "peak {} below {}", magnitude, min)
            }
            Self::OutOfOrder => defmt::write!(fmt, "markers out of order"),
            Self::DipArtifact { magnitude, floor } => {
                defmt::write!(fmt, "dip {} below floor {}", magnitude, floor)
            }
            Self::ConcentricTooFast { duration_s, min_s } => {
                defmt::write!(fmt, "ttp {}s below {}s", duration_s, min_s)
            }
            Self::ConcentricTooSlow { duration_s, max_s } => {
                defmt::write!(fmt, "ttp {}s above {}s", duration_s, max_s)
            }
        }
    }
}
