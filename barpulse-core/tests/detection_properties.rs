//! Property tests for detection invariants
//!
//! Uses randomized streams to probe the invariants that hold for *any*
//! input, not just the canned scenarios: noise rejection, the
//! single-trigger-per-refractory guarantee, and marker ordering.

mod common;

use barpulse_core::{
    markers, DetectionProfile, RepEngine, Sample,
    window::WindowAccumulator,
};
use proptest::prelude::*;

use common::generators::{NoiseSource, StreamBuilder, SAMPLE_INTERVAL_MS};
use common::{run_stream, windows_opened};

/// Calibrated engine plus noisy rest at the given amplitude and seed
fn noisy_rest_stream(amplitude: f32, seed: u32, duration_ms: u64) -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut noise = NoiseSource::new(seed);
    let mut ts = 0u64;

    // Clean preamble covers warm-up + baseline sampling
    while ts < 4000 {
        samples.push(Sample::new(ts, 1.00));
        ts += SAMPLE_INTERVAL_MS;
    }
    let end = ts + duration_ms;
    while ts < end {
        samples.push(Sample::new(ts, 1.00 + noise.next_unit() * amplitude));
        ts += SAMPLE_INTERVAL_MS;
    }

    samples
}

proptest! {
    /// A stream held within ±max_noise_std of baseline never opens a window
    #[test]
    fn noise_inside_gate_stays_closed(
        amplitude in 0.0f32..=0.015,
        seed in any::<u32>(),
    ) {
        let mut engine = RepEngine::new(DetectionProfile::default()).unwrap();
        let stream = noisy_rest_stream(amplitude, seed, 10_000);
        let result = run_stream(&mut engine, &stream);

        prop_assert!(engine.is_calibrated());
        prop_assert_eq!(windows_opened(&result.events), 0);
        prop_assert_eq!(result.reps.len(), 0);
    }

    /// Two candidate movements closer than the refractory period produce at
    /// most one repetition
    #[test]
    fn sub_refractory_candidates_yield_at_most_one_rep(
        gap_ms in 0u64..=300,
        second_peak in 1.10f32..=1.35,
    ) {
        let gap_ms = gap_ms - gap_ms % SAMPLE_INTERVAL_MS;

        let mut engine = RepEngine::new(DetectionProfile::default()).unwrap();
        let stream = StreamBuilder::new(0)
            .hold(1.00, 4000)
            .rep_pulse(1.20)
            .hold(1.00, gap_ms)
            .rep_pulse(second_peak)
            .hold(1.00, 3000)
            .build();
        let result = run_stream(&mut engine, &stream);

        prop_assert!(result.reps.len() <= 1);
    }

    /// On any unimodal-then-recoiling window, the peak is the global
    /// maximum and the recoil is the minimum strictly after it
    #[test]
    fn marker_ordering_on_unimodal_windows(
        dip in 0.65f32..0.90,
        peak in 1.10f32..1.60,
        trough in 0.70f32..0.92,
        dip_steps in 3u64..8,
        rise_steps in 5u64..20,
        fall_steps in 5u64..15,
        recover_steps in 5u64..15,
    ) {
        // baseline → dip → peak → trough → recovery
        let samples = StreamBuilder::new(0)
            .hold(1.00, 100)
            .ramp(1.00, dip, dip_steps)
            .ramp(dip, peak, rise_steps)
            .ramp(peak, trough, fall_steps)
            .ramp(trough, 1.00, recover_steps)
            .hold(1.00, 100)
            .build();

        let mut acc = WindowAccumulator::new(1, u64::MAX);
        acc.observe(samples[0]);
        acc.open(samples[0].timestamp);
        for &s in &samples[1..] {
            acc.observe(s);
        }
        let window = acc.close().unwrap();

        let set = markers::extract(&window, 1.00, 500);

        // Peak is the global maximum of the window
        let peak_marker = set.peak.expect("peak always exists");
        let global_max = window
            .samples()
            .iter()
            .map(|s| s.magnitude)
            .fold(f32::MIN, f32::max);
        prop_assert_eq!(peak_marker.magnitude, global_max);

        // Recoil is the minimum strictly after the peak
        let recoil_marker = set.recoil.expect("samples follow the peak");
        prop_assert!(recoil_marker.index > peak_marker.index);
        let suffix_min = window.samples()[peak_marker.index as usize + 1..]
            .iter()
            .map(|s| s.magnitude)
            .fold(f32::MAX, f32::min);
        prop_assert_eq!(recoil_marker.magnitude, suffix_min);

        // Whatever was found is temporally ordered
        let times: Vec<u64> = set.iter_found().map(|m| m.timestamp).collect();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
}
