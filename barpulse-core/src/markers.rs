//! Marker Extraction — Landmark Search Over a Closed Window
//!
//! Runs once per window, after it closes, over the full *raw* magnitude
//! sequence (smoothing is for trigger decisions only; landmarks need sample
//! precision). Four rule-based searches, each building on the previous:
//!
//! 1. **CounterMovement** — the first sample inside the eccentric search
//!    window (from window start) whose magnitude drops below
//!    `baseline * 0.92`; discarded if it does not precede the peak, so the
//!    marker ordering invariant holds by construction.
//! 2. **Peak** — the global magnitude maximum of the window, read as the
//!    concentric drive. First index wins ties.
//! 3. **Recoil** — the minimum in the suffix strictly after the peak;
//!    undefined when the peak is the last sample.
//! 4. **Deceleration** — the maximum in the suffix strictly after the
//!    recoil; undefined when fewer than two samples remain there.
//!
//! Absence of a marker is data, not an error — the validator decides which
//! ones a repetition actually requires.

use crate::constants::{CM_DIP_FACTOR, MIN_DECEL_SUFFIX_SAMPLES};
use crate::events::{Marker, MarkerKind, MarkerSet, Sample};
use crate::window::EventWindow;

/// Extract all four candidate markers from a closed window
///
/// `eccentric_window_ms` bounds the counter-movement search from the
/// window's logical start.
pub fn extract(window: &EventWindow, baseline: f32, eccentric_window_ms: u64) -> MarkerSet {
    let samples = window.samples();

    let peak = find_peak(samples);
    let counter_movement = find_counter_movement(
        samples,
        window.start(),
        baseline,
        eccentric_window_ms,
        peak.as_ref(),
    );
    let recoil = find_recoil(samples, peak.as_ref());
    let deceleration = find_deceleration(samples, recoil.as_ref());

    MarkerSet {
        counter_movement,
        peak,
        recoil,
        deceleration,
    }
}

fn marker_at(kind: MarkerKind, index: usize, sample: &Sample) -> Marker {
    Marker {
        kind,
        index: index as u16,
        magnitude: sample.magnitude,
        timestamp: sample.timestamp,
    }
}

/// Global maximum over the whole window; first index on ties
fn find_peak(samples: &[Sample]) -> Option<Marker> {
    let mut best: Option<(usize, &Sample)> = None;

    for (i, sample) in samples.iter().enumerate() {
        match best {
            Some((_, current)) if sample.magnitude <= current.magnitude => {}
            _ => best = Some((i, sample)),
        }
    }

    best.map(|(i, s)| marker_at(MarkerKind::Peak, i, s))
}

/// First sub-threshold sample in the eccentric search window, kept only if
/// it precedes the peak
fn find_counter_movement(
    samples: &[Sample],
    window_start: u64,
    baseline: f32,
    eccentric_window_ms: u64,
    peak: Option<&Marker>,
) -> Option<Marker> {
    let threshold = baseline * CM_DIP_FACTOR;

    for (i, sample) in samples.iter().enumerate() {
        if sample.timestamp.saturating_sub(window_start) > eccentric_window_ms {
            break;
        }
        if sample.magnitude < threshold {
            let marker = marker_at(MarkerKind::CounterMovement, i, sample);
            return match peak {
                Some(p) if marker.index >= p.index => None,
                _ => Some(marker),
            };
        }
    }

    None
}

/// Minimum strictly after the peak
fn find_recoil(samples: &[Sample], peak: Option<&Marker>) -> Option<Marker> {
    let peak = peak?;
    let suffix_start = peak.index as usize + 1;
    let suffix = samples.get(suffix_start..)?;

    let mut best: Option<(usize, &Sample)> = None;
    for (offset, sample) in suffix.iter().enumerate() {
        match best {
            Some((_, current)) if sample.magnitude >= current.magnitude => {}
            _ => best = Some((suffix_start + offset, sample)),
        }
    }

    best.map(|(i, s)| marker_at(MarkerKind::Recoil, i, s))
}

/// Maximum strictly after the recoil, when enough samples remain
fn find_deceleration(samples: &[Sample], recoil: Option<&Marker>) -> Option<Marker> {
    let recoil = recoil?;
    let suffix_start = recoil.index as usize + 1;
    let suffix = samples.get(suffix_start..)?;

    if suffix.len() < MIN_DECEL_SUFFIX_SAMPLES {
        return None;
    }

    let mut best: Option<(usize, &Sample)> = None;
    for (offset, sample) in suffix.iter().enumerate() {
        match best {
            Some((_, current)) if sample.magnitude <= current.magnitude => {}
            _ => best = Some((suffix_start + offset, sample)),
        }
    }

    best.map(|(i, s)| marker_at(MarkerKind::Deceleration, i, s))
}
