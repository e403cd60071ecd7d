//! Baseline Calibration — the Rest-State Magnitude Reference
//!
//! Every threshold in the trigger and marker extractor is relative to the
//! athlete's rest-state magnitude (≈1 g, but offset by sensor bias and wrist
//! orientation). The calibrator establishes that reference once per session:
//!
//! 1. **Settling** — ignore everything for a fixed warm-up delay (default
//!    3 s) so strap adjustments and setup fidgeting stay out of the data.
//! 2. **Sampling** — accumulate the next N raw magnitudes (default 25,
//!    ≈0.5 s at 50 Hz).
//! 3. **Complete** — the baseline is the *median* of those samples, robust
//!    to a single outlier spike in a way the mean is not.
//!
//! The baseline is set once and never revised; re-calibration means a new
//! session with a fresh engine. There is deliberately no timeout or retry
//! for a noisy warm-up — a restless athlete produces a noisy median, and
//! whether the engine should detect and re-sample that case is an open
//! product question, not something to guess at here.

use crate::constants::MAX_BASELINE_SAMPLES;
use crate::events::Sample;
use crate::time::Timestamp;
use heapless::Vec;

/// Calibration progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting out the warm-up delay
    Settling,
    /// Accumulating baseline samples
    Sampling,
    /// Baseline established
    Complete,
}

/// Median-of-N rest baseline calibrator
#[derive(Clone)]
pub struct BaselineCalibrator {
    phase: Phase,
    warmup_ms: u64,
    target: usize,
    first_seen: Option<Timestamp>,
    samples: Vec<f32, MAX_BASELINE_SAMPLES>,
    baseline: f32,
}

impl BaselineCalibrator {
    /// Create a calibrator with the given warm-up delay and sample count
    ///
    /// `target` is clamped to the storage capacity; profile validation
    /// rejects out-of-range counts before an engine is built.
    pub fn new(warmup_ms: u64, target: usize) -> Self {
        Self {
            phase: Phase::Settling,
            warmup_ms,
            target: target.clamp(1, MAX_BASELINE_SAMPLES),
            first_seen: None,
            samples: Vec::new(),
            baseline: 0.0,
        }
    }

    /// Feed one raw sample; returns `Some(baseline)` on the sample that
    /// completes calibration, `None` otherwise
    pub fn ingest(&mut self, sample: Sample) -> Option<f32> {
        match self.phase {
            Phase::Complete => None,
            Phase::Settling => {
                let first = *self.first_seen.get_or_insert(sample.timestamp);
                if sample.timestamp.saturating_sub(first) >= self.warmup_ms {
                    self.phase = Phase::Sampling;
                    self.accumulate(sample)
                } else {
                    None
                }
            }
            Phase::Sampling => self.accumulate(sample),
        }
    }

    /// True once the baseline is established
    pub fn is_calibrated(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// The established baseline, if calibration has completed
    pub fn baseline(&self) -> Option<f32> {
        match self.phase {
            Phase::Complete => Some(self.baseline),
            _ => None,
        }
    }

    fn accumulate(&mut self, sample: Sample) -> Option<f32> {
        // Capacity matches `target`, so this push cannot fail
        let _ = self.samples.push(sample.magnitude);

        if self.samples.len() < self.target {
            return None;
        }

        self.baseline = median(&mut self.samples);
        self.phase = Phase::Complete;
        Some(self.baseline)
    }
}

/// Median of a non-empty slice; even lengths average the two middle values
///
/// Sorts in place — callers are done with the sample order by the time the
/// median is taken.
fn median(values: &mut [f32]) -> f32 {
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
