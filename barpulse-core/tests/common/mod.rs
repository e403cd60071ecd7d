//! Common test utilities for integration tests
//!
//! Provides:
//! - Synthetic magnitude-stream generators (rest, noise, repetition pulses)
//! - Canned full-session scenarios with known expected outcomes
//! - Helpers for driving an engine over a stream and collecting results

#![allow(dead_code)]

use barpulse_core::{EngineEvent, RepEngine, Repetition, Sample};

pub mod generators;
pub mod scenarios;

/// Everything an engine produced over a stream
pub struct RunResult {
    pub reps: Vec<Repetition>,
    pub events: Vec<EngineEvent>,
}

/// Drive an engine over a sample stream, collecting reps and events
pub fn run_stream(engine: &mut RepEngine, samples: &[Sample]) -> RunResult {
    let mut reps = Vec::new();
    let mut events = Vec::new();

    for &sample in samples {
        if let Some(rep) = engine.ingest(sample) {
            reps.push(rep);
        }
        events.extend(engine.drain_events());
    }

    RunResult { reps, events }
}

/// Count events matching a predicate
pub fn count_events(events: &[EngineEvent], pred: impl Fn(&EngineEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

/// Number of windows that opened during a run
pub fn windows_opened(events: &[EngineEvent]) -> usize {
    count_events(events, |e| matches!(e, EngineEvent::WindowOpened { .. }))
}

/// Number of rejected windows during a run
pub fn rejections(events: &[EngineEvent]) -> usize {
    count_events(events, |e| matches!(e, EngineEvent::RepetitionRejected { .. }))
}
