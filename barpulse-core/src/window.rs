//! Capture Windows and the Pre-Trigger Buffer
//!
//! ## Overview
//!
//! Detection latency is unavoidable: by the time the smoothed magnitude
//! crosses the trigger threshold, the true onset of the movement is already
//! several samples in the past. The accumulator solves this with a rolling
//! pre-buffer: while the engine is CLOSED it continuously keeps the last
//! ~0.5 s of raw samples, and when a window opens those samples are copied
//! in ahead of the live stream. The window's *logical start* is therefore
//! the timestamp of the oldest pre-buffered sample, not the trigger instant
//! — time-to-peak is measured from where the movement actually began.
//!
//! ## Lifecycle
//!
//! ```text
//!          CLOSED                    OPEN
//!   ┌──────────────────┐    ┌──────────────────────┐
//!   │ samples → pre-buf │ → │ samples → window      │ → close after
//!   │ (rolling, bounded)│    │ (pre-buf paused)      │   fixed duration
//!   └──────────────────┘    └──────────────────────┘
//! ```
//!
//! Closing is unconditional on elapsed time — whether or not the window
//! contains a repetition is the validator's question, not the accumulator's.
//! At most one window is live at a time; the sample whose timestamp closes
//! the window is not part of it and goes back through the CLOSED path.

use crate::buffer::RingBuffer;
use crate::constants::{MAX_PRE_BUFFER, MAX_WINDOW_SAMPLES};
use crate::events::Sample;
use crate::time::Timestamp;
use heapless::Vec;

/// A closed-duration capture buffer around a candidate repetition
#[derive(Debug, Clone)]
pub struct EventWindow {
    start: Timestamp,
    trigger_time: Timestamp,
    samples: Vec<Sample, MAX_WINDOW_SAMPLES>,
    dropped: u16,
}

impl EventWindow {
    fn new(trigger_time: Timestamp) -> Self {
        Self {
            start: trigger_time,
            trigger_time,
            samples: Vec::new(),
            dropped: 0,
        }
    }

    /// Logical start: timestamp of the oldest pre-buffered sample
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Timestamp of the sample that fired the trigger
    pub fn trigger_time(&self) -> Timestamp {
        self.trigger_time
    }

    /// Captured samples in chronological order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of captured samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample was captured (cannot normally happen: the
    /// trigger sample itself is always appended)
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples discarded because the window hit capacity; non-zero only on
    /// streams far above the supported sample rate
    pub fn dropped(&self) -> u16 {
        self.dropped
    }

    fn append(&mut self, sample: Sample) {
        if self.samples.push(sample).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}

/// Owns the rolling pre-buffer and the (at most one) live window
#[derive(Clone)]
pub struct WindowAccumulator {
    pre_buffer: RingBuffer<Sample, MAX_PRE_BUFFER>,
    active: Option<EventWindow>,
    duration_ms: u64,
}

impl WindowAccumulator {
    /// Create an accumulator with a `pre_size`-sample pre-buffer and a
    /// fixed window duration
    pub fn new(pre_size: usize, duration_ms: u64) -> Self {
        Self {
            pre_buffer: RingBuffer::new(pre_size),
            active: None,
            duration_ms,
        }
    }

    /// True while a capture window is live
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Route a sample: into the live window when open, into the rolling
    /// pre-buffer when closed
    pub fn observe(&mut self, sample: Sample) {
        match self.active.as_mut() {
            Some(window) => window.append(sample),
            None => self.pre_buffer.push(sample),
        }
    }

    /// Open a window triggered at `trigger_time`, seeded with the
    /// pre-buffer contents
    ///
    /// Returns the window's logical start. Call only while closed — the
    /// engine guarantees at most one live window.
    pub fn open(&mut self, trigger_time: Timestamp) -> Timestamp {
        let mut window = EventWindow::new(trigger_time);

        if let Some(oldest) = self.pre_buffer.oldest() {
            window.start = oldest.timestamp;
        }
        for sample in self.pre_buffer.iter() {
            window.append(*sample);
        }

        // The pre-buffer resumes from empty once this window closes
        self.pre_buffer.clear();

        let start = window.start;
        self.active = Some(window);
        start
    }

    /// True when the live window's fixed duration has elapsed at `now`
    pub fn should_close(&self, now: Timestamp) -> bool {
        match &self.active {
            Some(window) => now.saturating_sub(window.start) >= self.duration_ms,
            None => false,
        }
    }

    /// Take the live window for analysis, returning the engine to CLOSED
    pub fn close(&mut self) -> Option<EventWindow> {
        self.active.take()
    }

    /// Discard the live window without analysis (cancellation)
    pub fn abort(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: Timestamp) -> Sample {
        Sample::new(ts, 1.0)
    }

    #[test]
    fn prebuffer_seeds_window_start() {
        let mut acc = WindowAccumulator::new(3, 2500);

        // Rolling pre-buffer keeps the newest 3: 40, 60, 80
        for ts in [0, 20, 40, 60, 80] {
            acc.observe(sample(ts));
        }

        let start = acc.open(100);
        assert_eq!(start, 40);

        let window = acc.close().unwrap();
        assert_eq!(window.start(), 40);
        assert_eq!(window.trigger_time(), 100);
        assert_eq!(window.len(), 3);
        assert_eq!(window.samples()[0].timestamp, 40);
    }

    #[test]
    fn empty_prebuffer_starts_at_trigger() {
        let mut acc = WindowAccumulator::new(8, 2500);
        let start = acc.open(500);
        assert_eq!(start, 500);
    }

    #[test]
    fn open_window_captures_and_pauses_prebuffer() {
        let mut acc = WindowAccumulator::new(4, 2500);
        acc.observe(sample(0));
        acc.open(20);
        assert!(acc.is_open());

        acc.observe(sample(40));
        acc.observe(sample(60));

        let window = acc.close().unwrap();
        assert_eq!(window.len(), 3); // seeded 1 + appended 2
        assert!(!acc.is_open());

        // Pre-buffer restarted empty after the window consumed it
        let start = acc.open(1000);
        assert_eq!(start, 1000);
    }

    #[test]
    fn closes_on_duration_from_logical_start() {
        let mut acc = WindowAccumulator::new(2, 2500);
        acc.observe(sample(1000));
        acc.open(1500); // logical start = 1000

        assert!(!acc.should_close(3499));
        assert!(acc.should_close(3500));
    }

    #[test]
    fn abort_discards_without_analysis() {
        let mut acc = WindowAccumulator::new(2, 2500);
        acc.open(100);
        acc.abort();
        assert!(!acc.is_open());
        assert!(acc.close().is_none());
    }

    #[test]
    fn capacity_overflow_counts_drops() {
        let mut acc = WindowAccumulator::new(1, 1_000_000);
        acc.open(0);
        for ts in 0..(MAX_WINDOW_SAMPLES as u64 + 10) {
            acc.observe(sample(ts));
        }
        let window = acc.close().unwrap();
        assert_eq!(window.len(), MAX_WINDOW_SAMPLES);
        assert_eq!(window.dropped(), 10);
    }
}
