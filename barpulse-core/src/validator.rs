//! Repetition Validation — Accept or Reject a Closed Window
//!
//! A capture window is only a *candidate* repetition. The validator applies
//! the profile's acceptance rules and either returns typed proof of the
//! markers a repetition requires, or a [`RejectReason`] describing exactly
//! why the window was discarded:
//!
//! - the concentric peak must exist and clear the profile's magnitude
//!   threshold;
//! - the recoil trough must exist and follow the peak in time;
//! - a counter-movement, when present, must stay above the artifact floor
//!   (a dip into free-fall territory is a dropped sensor, not an eccentric);
//! - time-to-peak, measured from the window's logical start, must fit the
//!   concentric duration bounds — too fast is not a controlled lift, too
//!   slow is not a single drive. The lower bound is inclusive: a rep exactly
//!   at the minimum is accepted.
//!
//! Returning [`AcceptedMarkers`] rather than a bare `Ok(())` means the
//! kinematics stage gets the peak and recoil by value with no re-unwrapping
//! of `Option`s that validation already proved present.

use crate::config::DetectionProfile;
use crate::errors::RejectReason;
use crate::events::{Marker, MarkerSet};
use crate::time::{elapsed_secs, ms_to_secs, secs_to_ms};
use crate::window::EventWindow;

/// Proof that a window passed validation
///
/// Carries the markers acceptance guarantees by value, alongside the full
/// set for the produced [`Repetition`](crate::events::Repetition).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedMarkers {
    /// All markers found in the window
    pub set: MarkerSet,
    /// The concentric peak (guaranteed present and above threshold)
    pub peak: Marker,
    /// The recoil trough (guaranteed present and after the peak)
    pub recoil: Marker,
}

/// Window acceptance rules derived from a validated profile
#[derive(Clone)]
pub struct RepValidator {
    min_peak_mag: f32,
    min_depth_mag: f32,
    min_concentric_ms: u64,
    max_concentric_ms: u64,
}

impl RepValidator {
    /// Build the validator from a validated profile
    pub fn from_profile(profile: &DetectionProfile) -> Self {
        Self {
            min_peak_mag: profile.min_peak_mag,
            min_depth_mag: profile.min_depth_mag,
            min_concentric_ms: secs_to_ms(profile.min_concentric_duration),
            max_concentric_ms: secs_to_ms(profile.max_concentric_window),
        }
    }

    /// Apply every acceptance rule to a closed window
    pub fn validate(
        &self,
        window: &EventWindow,
        markers: MarkerSet,
    ) -> Result<AcceptedMarkers, RejectReason> {
        let peak = markers.peak.ok_or(RejectReason::MissingPeak)?;

        if peak.magnitude <= self.min_peak_mag {
            return Err(RejectReason::PeakBelowThreshold {
                magnitude: peak.magnitude,
                min: self.min_peak_mag,
            });
        }

        let recoil = markers.recoil.ok_or(RejectReason::MissingRecoil)?;

        // The extractor searches strictly after the peak, so this only fires
        // on a hand-built marker set; cheap enough to keep the invariant
        // checked at the boundary that matters
        if recoil.timestamp <= peak.timestamp {
            return Err(RejectReason::OutOfOrder);
        }

        if let Some(cm) = markers.counter_movement {
            if cm.magnitude < self.min_depth_mag {
                return Err(RejectReason::DipArtifact {
                    magnitude: cm.magnitude,
                    floor: self.min_depth_mag,
                });
            }
        }

        let time_to_peak_ms = peak.timestamp.saturating_sub(window.start());
        if time_to_peak_ms < self.min_concentric_ms {
            return Err(RejectReason::ConcentricTooFast {
                duration_s: elapsed_secs(window.start(), peak.timestamp),
                min_s: ms_to_secs(self.min_concentric_ms),
            });
        }
        if time_to_peak_ms > self.max_concentric_ms {
            return Err(RejectReason::ConcentricTooSlow {
                duration_s: elapsed_secs(window.start(), peak.timestamp),
                max_s: ms_to_secs(self.max_concentric_ms),
            });
        }

        Ok(AcceptedMarkers {
            set: markers,
            peak,
            recoil,
        })
    }
}
