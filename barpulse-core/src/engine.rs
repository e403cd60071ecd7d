//! The Repetition Detection Engine
//!
//! ## Overview
//!
//! [`RepEngine`] composes every stage of the detection pipeline behind a
//! single synchronous entry point:
//!
//! ```text
//! Sample ─→ smoothing/variability ─→ calibration gate
//!                 │
//!                 ├─ CLOSED: pre-buffer + trigger decision ─→ open window
//!                 └─ OPEN:   append ─→ (duration elapsed) close
//!                                        │
//!                    markers ─→ validation ─→ kinematics ─→ session
//! ```
//!
//! One engine instance owns all mutable state — buffers, baseline, the live
//! window, the repetition history — exclusively. There are no globals and
//! no interior locks: the engine is intended to live on whatever thread (or
//! callback context) receives decoded samples, and [`RepEngine::ingest`]
//! is cheap and non-blocking so it never back-pressures the transport
//! notification source.
//!
//! ## Hand-off to consumers
//!
//! Rendering and export collaborators never see engine internals. They get:
//!
//! - the `Option<Repetition>` return of `ingest` — by value;
//! - the [`EngineEvent`] stream via [`RepEngine::drain_events`] — by value,
//!   typically forwarded through an [`EventQueue`](crate::queue::EventQueue)
//!   to another thread;
//! - [`Telemetry`] snapshots via [`RepEngine::telemetry`] — `Copy`.
//!
//! ## Cancellation
//!
//! Stopping monitoring is immediate: [`RepEngine::finish`] (or
//! [`RepEngine::abort_window`]) discards any open, not-yet-closed window.
//! No partial repetition is ever emitted.

use crate::baseline::BaselineCalibrator;
use crate::config::DetectionProfile;
use crate::constants::PENDING_EVENT_CAPACITY;
use crate::errors::ConfigResult;
use crate::events::{EngineEvent, Repetition, Sample, Telemetry, TriggerState};
use crate::kinematics::{concentric_metrics, LiveVelocityIntegrator};
use crate::markers;
use crate::session::Session;
use crate::smoothing::{MagnitudeSmoother, VariabilityTracker};
use crate::time::{secs_to_ms, Timestamp};
use crate::trigger::WindowTrigger;
use crate::validator::RepValidator;
use crate::window::{EventWindow, WindowAccumulator};
use heapless::Deque;

// Optional logging, compiled out when the `log` feature is off
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

/// Repetition detection engine; one instance per monitoring session
pub struct RepEngine {
    profile: DetectionProfile,
    eccentric_window_ms: u64,

    smoother: MagnitudeSmoother,
    variability: VariabilityTracker,
    calibrator: BaselineCalibrator,
    trigger: WindowTrigger,
    accumulator: WindowAccumulator,
    validator: RepValidator,
    session: Session,
    live_velocity: LiveVelocityIntegrator,

    pending: Deque<EngineEvent, PENDING_EVENT_CAPACITY>,
    events_dropped: u32,

    last_timestamp: Timestamp,
    smoothed: f32,
    std_dev: f32,
}

impl RepEngine {
    /// Build an engine from a profile, validating it first
    ///
    /// Every ordering invariant on the profile is checked here, before any
    /// sample is processed; see [`DetectionProfile::validate`].
    pub fn new(profile: DetectionProfile) -> ConfigResult<Self> {
        profile.validate()?;

        Ok(Self {
            eccentric_window_ms: secs_to_ms(profile.min_eccentric_window),
            smoother: MagnitudeSmoother::new(profile.mag_smooth_window),
            variability: VariabilityTracker::new(profile.std_window),
            calibrator: BaselineCalibrator::new(
                secs_to_ms(profile.warmup_delay),
                profile.baseline_sample_count,
            ),
            trigger: WindowTrigger::from_profile(&profile),
            accumulator: WindowAccumulator::new(
                profile.pre_buffer_size,
                secs_to_ms(profile.window_duration),
            ),
            validator: RepValidator::from_profile(&profile),
            session: Session::new(profile.load_weight_kg),
            live_velocity: LiveVelocityIntegrator::new(),
            pending: Deque::new(),
            events_dropped: 0,
            last_timestamp: 0,
            smoothed: 0.0,
            std_dev: 0.0,
            profile,
        })
    }

    /// Process one sample; returns a repetition when this sample closed a
    /// window that passed validation
    ///
    /// Must be called from a single thread with chronologically ordered
    /// samples. The call never blocks and performs no allocation.
    pub fn ingest(&mut self, sample: Sample) -> Option<Repetition> {
        if !sample.magnitude.is_finite() {
            // The transport contract excludes these; don't let one poison
            // the buffers if it slips through anyway
            log_warn!("dropping non-finite magnitude at t={}ms", sample.timestamp);
            return None;
        }

        self.last_timestamp = sample.timestamp;
        self.live_velocity.update(&sample);
        self.smoothed = self.smoother.push(sample.magnitude);
        self.variability.push(sample.magnitude);
        self.std_dev = self.variability.std_dev();

        // No window may open before the baseline exists; the pre-buffer
        // still rolls so the first trigger after calibration is seeded
        if !self.calibrator.is_calibrated() {
            if let Some(baseline) = self.calibrator.ingest(sample) {
                log_info!("baseline calibrated at {:.3}g", baseline);
                self.emit(EngineEvent::CalibrationComplete {
                    baseline,
                    timestamp: sample.timestamp,
                });
            }
            self.accumulator.observe(sample);
            return None;
        }

        let Some(baseline) = self.calibrator.baseline() else {
            return None; // unreachable once calibrated; keeps unwrap out
        };

        let mut produced = None;

        if self.accumulator.should_close(sample.timestamp) {
            if let Some(window) = self.accumulator.close() {
                produced = self.analyze_window(window, sample.timestamp, baseline);
            }
        }

        self.accumulator.observe(sample);

        if !self.accumulator.is_open()
            && self
                .trigger
                .should_open(self.smoothed, self.std_dev, baseline, sample.timestamp)
        {
            let start = self.accumulator.open(sample.timestamp);
            log_debug!(
                "window opened: start={}ms trigger={}ms smoothed={:.3}g std={:.4}g",
                start,
                sample.timestamp,
                self.smoothed,
                self.std_dev
            );
            self.emit(EngineEvent::WindowOpened {
                start,
                trigger_time: sample.timestamp,
            });
        }

        produced
    }

    /// Drain pending events, oldest first
    ///
    /// Call after `ingest` (or in batches); the internal buffer is bounded
    /// and drops its oldest events once full.
    pub fn drain_events(&mut self) -> EventDrain<'_> {
        EventDrain {
            pending: &mut self.pending,
        }
    }

    /// Coherent copy of the live scalar telemetry
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            timestamp: self.last_timestamp,
            state: self.state(),
            calibrated: self.calibrator.is_calibrated(),
            baseline: self.calibrator.baseline().unwrap_or(0.0),
            smoothed_magnitude: self.smoothed,
            magnitude_std: self.std_dev,
            live_velocity: self.live_velocity.velocity(),
            rep_count: self.session.rep_count(),
        }
    }

    /// Current detection state
    pub fn state(&self) -> TriggerState {
        if self.accumulator.is_open() {
            TriggerState::Open
        } else {
            TriggerState::Closed
        }
    }

    /// Whether the baseline has been established
    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    /// The calibrated baseline, if established
    pub fn baseline(&self) -> Option<f32> {
        self.calibrator.baseline()
    }

    /// The session accumulated so far
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The profile this engine runs
    pub fn profile(&self) -> &DetectionProfile {
        &self.profile
    }

    /// Events dropped because the pending buffer was not drained in time
    pub fn events_dropped(&self) -> u32 {
        self.events_dropped
    }

    /// Discard an in-progress window without analysis
    pub fn abort_window(&mut self) {
        self.accumulator.abort();
    }

    /// Stop monitoring: discard any open window and hand back the session
    pub fn finish(mut self) -> Session {
        self.accumulator.abort();
        self.session
    }

    /// Run a closed window through markers → validation → kinematics
    fn analyze_window(
        &mut self,
        window: EventWindow,
        now: Timestamp,
        baseline: f32,
    ) -> Option<Repetition> {
        self.emit(EngineEvent::WindowClosed {
            start: window.start(),
            samples: window.len().min(u16::MAX as usize) as u16,
        });

        let found = markers::extract(&window, baseline, self.eccentric_window_ms);
        for marker in found.iter_found() {
            self.emit(EngineEvent::MarkerFound {
                kind: marker.kind,
                index: marker.index,
                magnitude: marker.magnitude,
                timestamp: marker.timestamp,
            });
        }

        match self.validator.validate(&window, found) {
            Err(reason) => {
                log_debug!(
                    "window at {}ms rejected: {} (diagnostic v={:.3}m/s)",
                    window.start(),
                    reason,
                    found
                        .peak
                        .map(|p| crate::kinematics::validation_velocity_estimate(
                            p.magnitude,
                            baseline
                        ))
                        .unwrap_or(0.0)
                );
                self.emit(EngineEvent::RepetitionRejected {
                    reason,
                    window_start: window.start(),
                });
                None
            }
            Ok(accepted) => {
                let metrics = concentric_metrics(
                    &accepted.peak,
                    window.start(),
                    baseline,
                    self.profile.velocity_factor,
                );

                self.trigger.record_peak(accepted.peak.timestamp);
                // Keep the display integrator's drift window short
                self.live_velocity.reset();

                let rep = self.session.record(accepted.set, metrics);
                log_info!(
                    "rep {} accepted: mv={:.3}m/s ttp={:.2}s loss={:.1}%",
                    rep.index,
                    rep.mean_velocity,
                    rep.time_to_peak_s,
                    rep.velocity_loss_pct
                );
                self.emit(EngineEvent::RepetitionAccepted {
                    repetition: rep,
                    timestamp: now,
                });
                Some(rep)
            }
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        if self.pending.is_full() {
            // Oldest-first drop keeps the most recent outcomes visible
            let _ = self.pending.pop_front();
            self.events_dropped = self.events_dropped.saturating_add(1);
        }
        // Cannot fail after the fullness check above
        let _ = self.pending.push_back(event);
    }
}

/// Draining iterator over the engine's pending events
pub struct EventDrain<'a> {
    pending: &'a mut Deque<EngineEvent, PENDING_EVENT_CAPACITY>,
}

impl Iterator for EventDrain<'_> {
    type Item = EngineEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;

    #[test]
    fn construction_validates_profile() {
        assert!(RepEngine::new(DetectionProfile::default()).is_ok());

        let bad = DetectionProfile {
            min_depth_mag: 2.0,
            ..DetectionProfile::default()
        };
        assert!(matches!(
            RepEngine::new(bad),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let mut engine = RepEngine::new(DetectionProfile::default()).unwrap();
        assert!(engine.ingest(Sample::new(0, f32::NAN)).is_none());
        assert_eq!(engine.telemetry().timestamp, 0);
        assert_eq!(engine.drain_events().count(), 0);
    }

    #[test]
    fn telemetry_reflects_uncalibrated_start() {
        let mut engine = RepEngine::new(DetectionProfile::default()).unwrap();
        engine.ingest(Sample::new(0, 1.0));

        let t = engine.telemetry();
        assert!(!t.calibrated);
        assert_eq!(t.baseline, 0.0);
        assert_eq!(t.state, TriggerState::Closed);
        assert_eq!(t.rep_count, 0);
    }

    #[test]
    fn calibration_emits_event() {
        let mut engine = RepEngine::new(DetectionProfile {
            warmup_delay: 0.0,
            baseline_sample_count: 3,
            ..DetectionProfile::default()
        })
        .unwrap();

        for i in 0..3u64 {
            engine.ingest(Sample::new(i * 20, 1.0));
        }

        assert!(engine.is_calibrated());
        assert_eq!(engine.baseline(), Some(1.0));

        let events: heapless::Vec<EngineEvent, 8> = engine.drain_events().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::CalibrationComplete { baseline, .. } if *baseline == 1.0)));
    }

    #[test]
    fn event_buffer_drops_oldest_when_full() {
        let mut engine = RepEngine::new(DetectionProfile::default()).unwrap();
        for _ in 0..(PENDING_EVENT_CAPACITY + 5) {
            engine.emit(EngineEvent::WindowClosed { start: 0, samples: 0 });
        }
        assert_eq!(engine.events_dropped(), 5);
        assert_eq!(engine.drain_events().count(), PENDING_EVENT_CAPACITY);
    }
}
