//! Event-Window Trigger — the CLOSED → OPEN Decision
//!
//! The trigger arms a capture window when three independent conditions hold
//! on the same sample:
//!
//! 1. **Zone crossing** — the *smoothed* magnitude leaves the baseline zone:
//!    below `baseline * (1 - zone)` for every profile, or above
//!    `baseline * (1 + zone)` when the profile enables the rise trigger
//!    (ballistic movements that start with the drive instead of a dip).
//! 2. **Motion gate** — the windowed standard deviation is at or above the
//!    profile's movement threshold. Baseline drift and electrical noise can
//!    cross the zone; they cannot raise variability.
//! 3. **Refractory** — enough time has passed since the previous accepted
//!    repetition's peak. Bar whip and racking oscillations right after a rep
//!    would otherwise re-trigger immediately.
//!
//! The OPEN → CLOSED transition is purely time-based and lives in
//! [`WindowAccumulator`](crate::window::WindowAccumulator); the engine
//! composes the two.

use crate::config::DetectionProfile;
use crate::time::{secs_to_ms, Timestamp};

/// Trigger decision logic plus refractory bookkeeping
#[derive(Clone)]
pub struct WindowTrigger {
    zone: f32,
    rise_trigger: bool,
    min_movement_std: f32,
    refractory_ms: u64,
    last_peak: Option<Timestamp>,
}

impl WindowTrigger {
    /// Build the trigger from a validated profile
    pub fn from_profile(profile: &DetectionProfile) -> Self {
        Self {
            zone: profile.baseline_zone,
            rise_trigger: profile.rise_trigger,
            min_movement_std: profile.min_movement_std,
            refractory_ms: secs_to_ms(profile.refractory_period),
            last_peak: None,
        }
    }

    /// Should a window open on this sample?
    ///
    /// `smoothed` and `std_dev` come from the trackers, `baseline` from the
    /// calibrator; the caller guarantees calibration completed and no window
    /// is currently open.
    pub fn should_open(&self, smoothed: f32, std_dev: f32, baseline: f32, now: Timestamp) -> bool {
        if !self.in_refractory(now) && std_dev >= self.min_movement_std {
            let dip = smoothed < baseline * (1.0 - self.zone);
            let rise = self.rise_trigger && smoothed > baseline * (1.0 + self.zone);
            dip || rise
        } else {
            false
        }
    }

    /// Record the peak timestamp of an accepted repetition; the next window
    /// cannot open until the refractory period has passed it
    pub fn record_peak(&mut self, peak_time: Timestamp) {
        self.last_peak = Some(peak_time);
    }

    /// Peak timestamp of the last accepted repetition, if any
    pub fn last_peak(&self) -> Option<Timestamp> {
        self.last_peak
    }

    fn in_refractory(&self, now: Timestamp) -> bool {
        match self.last_peak {
            Some(peak) => now.saturating_sub(peak) < self.refractory_ms,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger() -> WindowTrigger {
        WindowTrigger::from_profile(&DetectionProfile::default())
    }

    #[test]
    fn fires_on_dip_with_movement() {
        let t = trigger();
        // baseline 1.0, zone 6%: threshold 0.94
        assert!(t.should_open(0.93, 0.05, 1.0, 5000));
    }

    #[test]
    fn ignores_dip_without_movement() {
        let t = trigger();
        // Zone crossed but variability reads noise-level
        assert!(!t.should_open(0.93, 0.0, 1.0, 5000));
        assert!(!t.should_open(0.93, 0.01, 1.0, 5000));
    }

    #[test]
    fn ignores_smoothed_inside_zone() {
        let t = trigger();
        assert!(!t.should_open(0.95, 0.05, 1.0, 5000));
        assert!(!t.should_open(1.05, 0.05, 1.0, 5000));
    }

    #[test]
    fn rise_requires_profile_opt_in() {
        let dip_only = trigger();
        assert!(!dip_only.should_open(1.07, 0.05, 1.0, 5000));

        let ballistic = WindowTrigger::from_profile(&DetectionProfile::jump_squat());
        assert!(ballistic.should_open(1.07, 0.05, 1.0, 5000));
    }

    #[test]
    fn refractory_blocks_until_elapsed() {
        let mut t = trigger(); // refractory 1.0 s
        t.record_peak(10_000);

        assert!(!t.should_open(0.90, 0.05, 1.0, 10_500));
        assert!(!t.should_open(0.90, 0.05, 1.0, 10_999));
        assert!(t.should_open(0.90, 0.05, 1.0, 11_000));
    }
}
