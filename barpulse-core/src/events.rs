//! Event Types and Data Model for the Detection Engine
//!
//! ## Overview
//!
//! This module defines the values that cross the engine boundary: the
//! `Sample` coming in from the transport layer, and the `EngineEvent` stream,
//! `Repetition` records, and `Telemetry` snapshots going out to rendering and
//! export collaborators.
//!
//! ## Design Philosophy
//!
//! ### Why Events?
//!
//! The original style of engine in this domain interleaves console printing
//! with control flow — every trigger, marker, and rejection becomes a
//! `println!` that downstream code cannot consume. Here every observable
//! state change is a typed event instead:
//!
//! ```text
//! Sample → ingest() → [CalibrationComplete | WindowOpened | MarkerFound
//!                      | WindowClosed | RepetitionAccepted
//!                      | RepetitionRejected]
//! ```
//!
//! The engine decides *what happened*; the consumer decides presentation.
//!
//! ### Memory Model
//!
//! Events are designed for bounded, copy-based hand-off across threads:
//!
//! - **`Copy`**: events travel through queues by value; a consumer never
//!   holds a reference into engine-internal buffers, so torn reads are
//!   impossible by construction.
//! - **Inline payloads**: no heap allocation anywhere in an event; the
//!   largest variant carries a complete [`Repetition`] inline.
//! - **Bounded size**: a unit test pins the enum size so queue sizing stays
//!   predictable.
//!
//! ### Type Safety
//!
//! Tagged unions mean a consumer cannot misinterpret a rejection as an
//! acceptance, and exhaustive matching forces new event kinds to be handled
//! everywhere when they are added.

use crate::errors::RejectReason;
use crate::time::{elapsed_secs, Timestamp};
use core::fmt;

/// One accelerometer magnitude reading
///
/// Produced by the transport/frame-decoding layer from checksum-verified
/// device frames; the engine assumes the stream is chronologically ordered
/// and de-duplicated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Monotonic timestamp in milliseconds
    pub timestamp: Timestamp,
    /// Acceleration magnitude in g (≈1.0 at rest)
    pub magnitude: f32,
}

impl Sample {
    /// Construct a sample from a timestamp in milliseconds and a magnitude
    /// in g
    pub const fn new(timestamp: Timestamp, magnitude: f32) -> Self {
        Self { timestamp, magnitude }
    }
}

/// Detection state of the engine, reported in telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TriggerState {
    /// Listening; pre-buffer rolling, no capture window live
    Closed = 0,
    /// Capture window open and accumulating samples
    Open = 1,
}

impl TriggerState {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            TriggerState::Closed => "closed",
            TriggerState::Open => "open",
        }
    }
}

/// The four candidate landmarks searched for in a closed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MarkerKind {
    /// Eccentric dip below baseline preceding the drive
    CounterMovement = 0,
    /// Global magnitude maximum, interpreted as the concentric drive
    Peak = 1,
    /// Magnitude minimum after the peak
    Recoil = 2,
    /// Magnitude maximum after the recoil
    Deceleration = 3,
}

impl MarkerKind {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            MarkerKind::CounterMovement => "counter-movement",
            MarkerKind::Peak => "peak",
            MarkerKind::Recoil => "recoil",
            MarkerKind::Deceleration => "deceleration",
        }
    }
}

/// A landmark found in a capture window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// Which landmark this is
    pub kind: MarkerKind,
    /// Sample index from window start
    pub index: u16,
    /// Raw magnitude at the marker, in g
    pub magnitude: f32,
    /// Absolute timestamp of the marked sample
    pub timestamp: Timestamp,
}

impl Marker {
    /// Offset of this marker from the window's logical start, in seconds
    pub fn offset_secs(&self, window_start: Timestamp) -> f32 {
        elapsed_secs(window_start, self.timestamp)
    }
}

/// Zero-or-one of each marker kind extracted from a window
///
/// When present, markers satisfy the temporal ordering
/// `CounterMovement < Peak < Recoil < Deceleration`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerSet {
    /// Eccentric dip, if one preceded the peak
    pub counter_movement: Option<Marker>,
    /// Concentric drive maximum
    pub peak: Option<Marker>,
    /// Post-peak trough
    pub recoil: Option<Marker>,
    /// Post-recoil maximum
    pub deceleration: Option<Marker>,
}

impl MarkerSet {
    /// Iterate over the markers that were found, in temporal order
    pub fn iter_found(&self) -> impl Iterator<Item = &Marker> {
        self.counter_movement
            .iter()
            .chain(self.peak.iter())
            .chain(self.recoil.iter())
            .chain(self.deceleration.iter())
    }

    /// Number of markers found
    pub fn count(&self) -> usize {
        self.iter_found().count()
    }
}

/// Set-level fatigue interpretation of velocity loss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FatigueLevel {
    /// Velocity loss under 10%
    Normal = 0,
    /// Velocity loss between 10% and 20%
    Caution = 1,
    /// Velocity loss above 20% — consider ending the set
    High = 2,
}

impl FatigueLevel {
    /// Tier a velocity-loss percentage
    pub fn from_loss_pct(loss_pct: f32) -> Self {
        if loss_pct > 20.0 {
            FatigueLevel::High
        } else if loss_pct >= 10.0 {
            FatigueLevel::Caution
        } else {
            FatigueLevel::Normal
        }
    }
}

impl fmt::Display for FatigueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FatigueLevel::Normal => "normal",
            FatigueLevel::Caution => "caution",
            FatigueLevel::High => "high fatigue",
        };
        write!(f, "{}", s)
    }
}

/// One validated repetition with its kinematic metrics
///
/// Created only when a window passes validation; immutable once created.
/// Velocities are proportional estimates (see
/// [`DetectionProfile::velocity_factor`](crate::DetectionProfile::velocity_factor)),
/// and `peak_velocity` / `mean_propulsive_velocity` are fixed heuristic
/// multiples of `mean_velocity`, not independently measured.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repetition {
    /// Zero-based position of this rep within the session
    pub index: u16,
    /// Landmarks the rep was built from
    pub markers: MarkerSet,
    /// Mean concentric velocity estimate, m/s
    pub mean_velocity: f32,
    /// Peak concentric velocity estimate, m/s (heuristic ×1.3)
    pub peak_velocity: f32,
    /// Mean propulsive velocity estimate, m/s (heuristic ×1.15)
    pub mean_propulsive_velocity: f32,
    /// Time from window start to the concentric peak, seconds
    pub time_to_peak_s: f32,
    /// Velocity loss versus the first rep of the session, percent
    /// (0.0 for the first rep)
    pub velocity_loss_pct: f32,
}

impl Repetition {
    /// Fatigue tier implied by this rep's velocity loss
    pub fn fatigue_level(&self) -> FatigueLevel {
        FatigueLevel::from_loss_pct(self.velocity_loss_pct)
    }
}

/// Live scalar telemetry snapshot
///
/// `Copy` by design: consumers receive a coherent snapshot by value, never a
/// reference into engine-internal buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telemetry {
    /// Timestamp of the most recently ingested sample
    pub timestamp: Timestamp,
    /// Current detection state
    pub state: TriggerState,
    /// Whether the baseline has been calibrated
    pub calibrated: bool,
    /// Calibrated rest magnitude in g (0.0 until calibrated)
    pub baseline: f32,
    /// Current smoothed magnitude in g
    pub smoothed_magnitude: f32,
    /// Current magnitude standard deviation in g
    pub magnitude_std: f32,
    /// Continuously integrated velocity in m/s — display only, drifts
    pub live_velocity: f32,
    /// Repetitions accepted so far this session
    pub rep_count: u16,
}

/// Observable state changes emitted by the engine
///
/// Drained after each `ingest` call via
/// [`RepEngine::drain_events`](crate::RepEngine::drain_events); forward them
/// through an [`EventQueue`](crate::queue::EventQueue) to move them across
/// threads.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    /// Baseline calibration finished; triggering is now armed
    CalibrationComplete {
        /// Median rest magnitude in g
        baseline: f32,
        /// Timestamp of the sample that completed calibration
        timestamp: Timestamp,
    },

    /// A capture window opened
    WindowOpened {
        /// Logical start: timestamp of the oldest pre-buffered sample
        start: Timestamp,
        /// Timestamp of the sample that fired the trigger
        trigger_time: Timestamp,
    },

    /// A capture window reached its fixed duration and was analyzed
    WindowClosed {
        /// Logical start of the window
        start: Timestamp,
        /// Number of samples captured
        samples: u16,
    },

    /// A landmark was found during window analysis
    MarkerFound {
        /// Which landmark
        kind: MarkerKind,
        /// Sample index from window start
        index: u16,
        /// Raw magnitude at the marker, in g
        magnitude: f32,
        /// Absolute timestamp of the marked sample
        timestamp: Timestamp,
    },

    /// A window passed validation and produced a repetition
    RepetitionAccepted {
        /// The completed repetition
        repetition: Repetition,
        /// Timestamp at which the window closed
        timestamp: Timestamp,
    },

    /// A window failed validation and was discarded
    RepetitionRejected {
        /// Why the window did not qualify
        reason: RejectReason,
        /// Logical start of the rejected window
        window_start: Timestamp,
    },
}

impl EngineEvent {
    /// Timestamp the event refers to
    pub fn timestamp(&self) -> Timestamp {
        match self {
            EngineEvent::CalibrationComplete { timestamp, .. } => *timestamp,
            EngineEvent::WindowOpened { trigger_time, .. } => *trigger_time,
            EngineEvent::WindowClosed { start, .. } => *start,
            EngineEvent::MarkerFound { timestamp, .. } => *timestamp,
            EngineEvent::RepetitionAccepted { timestamp, .. } => *timestamp,
            EngineEvent::RepetitionRejected { window_start, .. } => *window_start,
        }
    }

    /// True for the two terminal window outcomes
    pub fn is_window_outcome(&self) -> bool {
        matches!(
            self,
            EngineEvent::RepetitionAccepted { .. } | EngineEvent::RepetitionRejected { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size_bounded() {
        // Events travel by value through bounded queues; keep them compact
        assert!(core::mem::size_of::<EngineEvent>() <= 256);
    }

    #[test]
    fn fatigue_tiers() {
        assert_eq!(FatigueLevel::from_loss_pct(5.0), FatigueLevel::Normal);
        assert_eq!(FatigueLevel::from_loss_pct(10.0), FatigueLevel::Caution);
        assert_eq!(FatigueLevel::from_loss_pct(15.0), FatigueLevel::Caution);
        assert_eq!(FatigueLevel::from_loss_pct(20.0), FatigueLevel::Caution);
        assert_eq!(FatigueLevel::from_loss_pct(33.3), FatigueLevel::High);
    }

    #[test]
    fn marker_offset() {
        let marker = Marker {
            kind: MarkerKind::Peak,
            index: 35,
            magnitude: 1.2,
            timestamp: 4700,
        };
        assert_eq!(marker.offset_secs(4000), 0.7);
    }

    #[test]
    fn marker_set_iteration_order() {
        let mk = |kind, timestamp| Marker {
            kind,
            index: 0,
            magnitude: 1.0,
            timestamp,
        };
        let set = MarkerSet {
            counter_movement: Some(mk(MarkerKind::CounterMovement, 100)),
            peak: Some(mk(MarkerKind::Peak, 700)),
            recoil: None,
            deceleration: Some(mk(MarkerKind::Deceleration, 1100)),
        };

        assert_eq!(set.count(), 3);
        let kinds: heapless::Vec<MarkerKind, 4> = set.iter_found().map(|m| m.kind).collect();
        assert_eq!(
            &kinds[..],
            &[
                MarkerKind::CounterMovement,
                MarkerKind::Peak,
                MarkerKind::Deceleration
            ]
        );
    }

    #[test]
    fn event_timestamps() {
        let ev = EngineEvent::WindowOpened {
            start: 3500,
            trigger_time: 4000,
        };
        assert_eq!(ev.timestamp(), 4000);
        assert!(!ev.is_window_outcome());

        let ev = EngineEvent::RepetitionRejected {
            reason: crate::errors::RejectReason::MissingPeak,
            window_start: 3500,
        };
        assert_eq!(ev.timestamp(), 3500);
        assert!(ev.is_window_outcome());
    }
}
