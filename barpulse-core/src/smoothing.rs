//! Magnitude Smoothing and Variability Tracking
//!
//! Two independent rolling statistics feed the trigger decision:
//!
//! - [`MagnitudeSmoother`] — a short moving average (default 5 samples) that
//!   removes per-sample jitter from the threshold comparison. Only the
//!   trigger consumes it; marker extraction always reads raw magnitudes for
//!   precision.
//! - [`VariabilityTracker`] — a longer standard-deviation window (default 20
//!   samples) acting as a motion gate: a threshold crossing with near-zero
//!   variability is baseline drift or electrical noise, not an athlete
//!   moving.
//!
//! Until its window has filled, the variability tracker reports 0.0 — the
//! "no movement" state — which keeps the trigger disarmed on a cold buffer.

use crate::buffer::RingBuffer;
use crate::constants::{MAX_SMOOTH_WINDOW, MAX_STD_WINDOW};

/// Moving average over the last K magnitudes
#[derive(Clone)]
pub struct MagnitudeSmoother {
    window: RingBuffer<f32, MAX_SMOOTH_WINDOW>,
}

impl MagnitudeSmoother {
    /// Create a smoother averaging over `window` samples
    pub fn new(window: usize) -> Self {
        Self {
            window: RingBuffer::new(window),
        }
    }

    /// Record a magnitude and return the updated moving average
    pub fn push(&mut self, magnitude: f32) -> f32 {
        self.window.push(magnitude);
        self.mean()
    }

    /// Current moving average; averages whatever is present before the
    /// window fills, 0.0 when empty
    pub fn mean(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }

        let sum: f32 = self.window.iter().sum();
        sum / self.window.len() as f32
    }
}

/// Windowed standard deviation over the last M magnitudes
#[derive(Clone)]
pub struct VariabilityTracker {
    window: RingBuffer<f32, MAX_STD_WINDOW>,
}

impl VariabilityTracker {
    /// Create a tracker over `window` samples
    pub fn new(window: usize) -> Self {
        Self {
            window: RingBuffer::new(window),
        }
    }

    /// Record a magnitude
    pub fn push(&mut self, magnitude: f32) {
        self.window.push(magnitude);
    }

    /// Population standard deviation of the window
    ///
    /// Reports 0.0 until the window is full: a partially-filled window is
    /// the "no movement" state and must never arm the trigger.
    pub fn std_dev(&self) -> f32 {
        if !self.window.is_full() {
            return 0.0;
        }

        let n = self.window.len() as f32;
        let mean: f32 = self.window.iter().sum::<f32>() / n;
        let variance: f32 = self
            .window
            .iter()
            .map(|m| {
                let d = m - mean;
                d * d
            })
            .sum::<f32>()
            / n;

        // libm keeps this path identical on no_std targets
        libm::sqrtf(variance)
    }
}
