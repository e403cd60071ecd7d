//! Session Aggregation — Set-Level Velocity Loss and Fatigue
//!
//! The session accumulates accepted repetitions and derives the set-level
//! fatigue signal central to velocity-based training: as a set progresses,
//! mean velocity at a fixed load drops, and the percentage drop against the
//! *first* rep is a practical fatigue proxy:
//!
//! ```text
//! velocity_loss % = (first_rep_mv - current_mv) / first_rep_mv * 100
//! ```
//!
//! Tiers: under 10 % is normal, 10–20 % warrants caution, above 20 % flags
//! high fatigue (typically the cue to end the set).

use crate::constants::MAX_SESSION_REPS;
use crate::events::{FatigueLevel, MarkerSet, Repetition};
use crate::kinematics::RepMetrics;
use heapless::Vec;

/// One monitoring session: load, accepted reps, and the first-rep reference
#[derive(Clone)]
pub struct Session {
    load_weight_kg: Option<f32>,
    reps: Vec<Repetition, MAX_SESSION_REPS>,
    first_rep_velocity: Option<f32>,
    total: u16,
    overflow: u16,
}

impl Session {
    /// Start an empty session, optionally tagged with the bar load for
    /// downstream power derivation
    pub fn new(load_weight_kg: Option<f32>) -> Self {
        Self {
            load_weight_kg,
            reps: Vec::new(),
            first_rep_velocity: None,
            total: 0,
            overflow: 0,
        }
    }

    /// Record an accepted repetition, assigning its index and velocity loss
    ///
    /// Returns the completed, immutable [`Repetition`]. Storage is bounded;
    /// past [`MAX_SESSION_REPS`] the record is still produced and counted
    /// but no longer retained.
    pub fn record(&mut self, markers: MarkerSet, metrics: RepMetrics) -> Repetition {
        let first = *self
            .first_rep_velocity
            .get_or_insert(metrics.mean_velocity);

        let velocity_loss_pct = if first > 0.0 {
            (first - metrics.mean_velocity) / first * 100.0
        } else {
            0.0
        };

        let rep = Repetition {
            index: self.total,
            markers,
            mean_velocity: metrics.mean_velocity,
            peak_velocity: metrics.peak_velocity,
            mean_propulsive_velocity: metrics.mean_propulsive_velocity,
            time_to_peak_s: metrics.time_to_peak_s,
            velocity_loss_pct,
        };

        self.total = self.total.saturating_add(1);
        if self.reps.push(rep).is_err() {
            self.overflow = self.overflow.saturating_add(1);
        }

        rep
    }

    /// Retained repetitions in order of occurrence
    pub fn reps(&self) -> &[Repetition] {
        &self.reps
    }

    /// Total accepted repetitions, including any past retention capacity
    pub fn rep_count(&self) -> u16 {
        self.total
    }

    /// Repetitions produced but not retained (storage full)
    pub fn overflow(&self) -> u16 {
        self.overflow
    }

    /// Mean velocity of the first accepted rep, the velocity-loss reference
    pub fn first_rep_velocity(&self) -> Option<f32> {
        self.first_rep_velocity
    }

    /// Velocity loss of the most recent rep, percent
    pub fn current_velocity_loss_pct(&self) -> Option<f32> {
        self.reps.last().map(|r| r.velocity_loss_pct)
    }

    /// Fatigue tier of the most recent rep; `Normal` before any rep
    pub fn fatigue_level(&self) -> FatigueLevel {
        self.reps
            .last()
            .map(|r| r.fatigue_level())
            .unwrap_or(FatigueLevel::Normal)
    }

    /// Bar load this session was recorded under, if configured
    pub fn load_weight_kg(&self) -> Option<f32> {
        self.load_weight_kg
    }
}
