//! Detection Profiles — Per-Exercise Tuning for the Engine
//!
//! A [`DetectionProfile`] carries every threshold and window the engine uses.
//! Profiles are plain data: construct one with struct-update syntax from
//! [`Default`] or start from a named preset, then hand it to
//! [`RepEngine::new`](crate::RepEngine::new), which validates it before any
//! sample is processed. A profile that violates an ordering invariant (depth
//! floor above peak threshold, movement gate inside the noise band, a
//! pre-buffer that cannot fit in the capture window) is rejected with a
//! descriptive [`ConfigError`] — never deferred to first use.
//!
//! External configuration loading (files, CLI) belongs to the application
//! layer; only the validated shape lives here.

use crate::constants::*;
use crate::errors::{ConfigError, ConfigResult};

/// Immutable engine configuration
///
/// All durations are seconds, magnitudes are g, and window lengths are
/// sample counts. Defaults assume a ~50 Hz wrist sensor and a barbell
/// movement with a clear eccentric dip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionProfile {
    /// Trigger zone as a fraction of baseline: the smoothed magnitude must
    /// leave `baseline * (1 ± zone)` to open a window
    pub baseline_zone: f32,

    /// Artifact floor for the counter-movement dip, in g; a dip below this
    /// reads as free-fall/impact, not a controlled eccentric
    pub min_depth_mag: f32,

    /// Minimum concentric peak magnitude, in g
    pub min_peak_mag: f32,

    /// How far into the window the counter-movement search extends, seconds
    pub min_eccentric_window: f32,

    /// Upper bound on time-to-peak, seconds
    pub max_concentric_window: f32,

    /// Lower bound on time-to-peak, seconds; movements faster than this are
    /// not controlled lifts
    pub min_concentric_duration: f32,

    /// Minimum time between an accepted rep's peak and the next window
    /// opening, seconds
    pub refractory_period: f32,

    /// Moving-average window for trigger decisions, samples
    pub mag_smooth_window: usize,

    /// Standard-deviation window for the motion gate, samples
    pub std_window: usize,

    /// Minimum standard deviation indicating genuine movement, in g
    pub min_movement_std: f32,

    /// Ceiling for pure sensor noise, in g; must sit well below
    /// `min_movement_std` (see [`MIN_STD_GAP_RATIO`])
    pub max_noise_std: f32,

    /// Capture window duration from logical start to close, seconds
    pub window_duration: f32,

    /// Rolling pre-trigger buffer length, samples
    pub pre_buffer_size: usize,

    /// Acceleration-to-velocity conversion factor — an explicitly
    /// uncalibrated tunable, not a measured constant
    pub velocity_factor: f32,

    /// Load on the bar, for power derivation by external consumers
    pub load_weight_kg: Option<f32>,

    /// Settle time before baseline sampling begins, seconds
    pub warmup_delay: f32,

    /// Raw samples the baseline median is taken over
    pub baseline_sample_count: usize,

    /// Also trigger on the smoothed magnitude *rising* above
    /// `baseline * (1 + zone)` — for movements that start with a drive
    /// rather than a dip (jumps, throws)
    pub rise_trigger: bool,
}

impl Default for DetectionProfile {
    fn default() -> Self {
        Self {
            baseline_zone: DEFAULT_BASELINE_ZONE,
            min_depth_mag: DEFAULT_MIN_DEPTH_MAG,
            min_peak_mag: DEFAULT_MIN_PEAK_MAG,
            min_eccentric_window: DEFAULT_MIN_ECCENTRIC_WINDOW_S,
            max_concentric_window: DEFAULT_MAX_CONCENTRIC_WINDOW_S,
            min_concentric_duration: DEFAULT_MIN_CONCENTRIC_DURATION_S,
            refractory_period: DEFAULT_REFRACTORY_PERIOD_S,
            mag_smooth_window: DEFAULT_MAG_SMOOTH_WINDOW,
            std_window: DEFAULT_STD_WINDOW,
            min_movement_std: DEFAULT_MIN_MOVEMENT_STD,
            max_noise_std: DEFAULT_MAX_NOISE_STD,
            window_duration: DEFAULT_WINDOW_DURATION_S,
            pre_buffer_size: DEFAULT_PRE_BUFFER_SIZE,
            velocity_factor: DEFAULT_VELOCITY_FACTOR,
            load_weight_kg: None,
            warmup_delay: DEFAULT_WARMUP_DELAY_S,
            baseline_sample_count: DEFAULT_BASELINE_SAMPLE_COUNT,
            rise_trigger: false,
        }
    }
}

impl DetectionProfile {
    /// Back squat: pronounced eccentric dip, moderate bar speed
    pub fn back_squat() -> Self {
        Self::default()
    }

    /// Bench press: shallower dip, shorter concentric drive
    pub fn bench_press() -> Self {
        Self {
            baseline_zone: 0.05,
            min_peak_mag: 1.04,
            max_concentric_window: 1.5,
            refractory_period: 0.8,
            ..Self::default()
        }
    }

    /// Jump squat: ballistic, starts with the drive, so the rise trigger is
    /// enabled and the concentric bounds tighten
    pub fn jump_squat() -> Self {
        Self {
            rise_trigger: true,
            min_peak_mag: 1.25,
            min_concentric_duration: 0.10,
            max_concentric_window: 1.0,
            refractory_period: 1.5,
            ..Self::default()
        }
    }

    /// Check every ordering invariant, returning the first violation
    ///
    /// Called by [`RepEngine::new`](crate::RepEngine::new); applications
    /// loading profiles from external configuration should call it directly
    /// to report problems at load time.
    pub fn validate(&self) -> ConfigResult<()> {
        self.check_finite()?;

        if self.baseline_zone <= 0.0 || self.baseline_zone >= 1.0 {
            return Err(ConfigError::ZoneOutOfRange {
                zone: self.baseline_zone,
            });
        }

        if self.min_depth_mag >= self.min_peak_mag {
            return Err(ConfigError::ThresholdOrder {
                depth: self.min_depth_mag,
                peak: self.min_peak_mag,
            });
        }

        if self.min_movement_std < self.max_noise_std * MIN_STD_GAP_RATIO {
            return Err(ConfigError::NoiseGapTooSmall {
                movement: self.min_movement_std,
                noise: self.max_noise_std,
                ratio: MIN_STD_GAP_RATIO,
            });
        }

        Self::check_window("mag_smooth_window", self.mag_smooth_window, MAX_SMOOTH_WINDOW)?;
        Self::check_window("std_window", self.std_window, MAX_STD_WINDOW)?;
        Self::check_window("pre_buffer_size", self.pre_buffer_size, MAX_PRE_BUFFER)?;
        Self::check_window(
            "baseline_sample_count",
            self.baseline_sample_count,
            MAX_BASELINE_SAMPLES,
        )?;

        // The std window needs at least two samples to produce a deviation
        if self.std_window < 2 {
            return Err(ConfigError::WindowSize {
                name: "std_window",
                requested: self.std_window,
                max: MAX_STD_WINDOW,
            });
        }

        Self::check_positive("window_duration", self.window_duration)?;
        Self::check_positive("min_concentric_duration", self.min_concentric_duration)?;
        Self::check_positive("max_concentric_window", self.max_concentric_window)?;
        Self::check_positive("min_eccentric_window", self.min_eccentric_window)?;
        Self::check_positive("velocity_factor", self.velocity_factor)?;
        Self::check_positive("min_movement_std", self.min_movement_std)?;
        Self::check_positive("min_peak_mag", self.min_peak_mag)?;

        if self.refractory_period < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "refractory_period",
                value: self.refractory_period,
            });
        }

        if self.warmup_delay < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "warmup_delay",
                value: self.warmup_delay,
            });
        }

        if self.min_concentric_duration > self.max_concentric_window {
            return Err(ConfigError::ConcentricOrder {
                min: self.min_concentric_duration,
                max: self.max_concentric_window,
            });
        }

        if self.min_eccentric_window >= self.window_duration {
            return Err(ConfigError::ExceedsWindow {
                name: "min_eccentric_window",
                value: self.min_eccentric_window,
                window: self.window_duration,
            });
        }

        if self.max_concentric_window >= self.window_duration {
            return Err(ConfigError::ExceedsWindow {
                name: "max_concentric_window",
                value: self.max_concentric_window,
                window: self.window_duration,
            });
        }

        Ok(())
    }

    fn check_window(name: &'static str, requested: usize, max: usize) -> ConfigResult<()> {
        if requested == 0 || requested > max {
            return Err(ConfigError::WindowSize {
                name,
                requested,
                max,
            });
        }
        Ok(())
    }

    fn check_positive(name: &'static str, value: f32) -> ConfigResult<()> {
        if value <= 0.0 {
            return Err(ConfigError::NonPositive { name, value });
        }
        Ok(())
    }

    fn check_finite(&self) -> ConfigResult<()> {
        let fields = [
            ("baseline_zone", self.baseline_zone),
            ("min_depth_mag", self.min_depth_mag),
            ("min_peak_mag", self.min_peak_mag),
            ("min_eccentric_window", self.min_eccentric_window),
            ("max_concentric_window", self.max_concentric_window),
            ("min_concentric_duration", self.min_concentric_duration),
            ("refractory_period", self.refractory_period),
            ("min_movement_std", self.min_movement_std),
            ("max_noise_std", self.max_noise_std),
            ("window_duration", self.window_duration),
            ("velocity_factor", self.velocity_factor),
            ("warmup_delay", self.warmup_delay),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name });
            }
        }

        if let Some(load) = self.load_weight_kg {
            if !load.is_finite() {
                return Err(ConfigError::NotFinite {
                    name: "load_weight_kg",
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(DetectionProfile::default().validate().is_ok());
    }

    #[test]
    fn presets_validate() {
        assert!(DetectionProfile::back_squat().validate().is_ok());
        assert!(DetectionProfile::bench_press().validate().is_ok());
        assert!(DetectionProfile::jump_squat().validate().is_ok());
    }

    #[test]
    fn rejects_threshold_inversion() {
        let profile = DetectionProfile {
            min_depth_mag: 1.10,
            min_peak_mag: 1.05,
            ..DetectionProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn rejects_narrow_noise_gap() {
        let profile = DetectionProfile {
            min_movement_std: 0.02,
            max_noise_std: 0.015,
            ..DetectionProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::NoiseGapTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_oversized_prebuffer() {
        let profile = DetectionProfile {
            pre_buffer_size: MAX_PRE_BUFFER + 1,
            ..DetectionProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::WindowSize { name: "pre_buffer_size", .. })
        ));
    }

    #[test]
    fn rejects_zero_smooth_window() {
        let profile = DetectionProfile {
            mag_smooth_window: 0,
            ..DetectionProfile::default()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn rejects_inverted_concentric_bounds() {
        let profile = DetectionProfile {
            min_concentric_duration: 1.8,
            max_concentric_window: 1.0,
            ..DetectionProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::ConcentricOrder { .. })
        ));
    }

    #[test]
    fn rejects_eccentric_window_past_capture_window() {
        let profile = DetectionProfile {
            min_eccentric_window: 3.0,
            ..DetectionProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::ExceedsWindow { .. })
        ));
    }

    #[test]
    fn rejects_nan_threshold() {
        let profile = DetectionProfile {
            min_peak_mag: f32::NAN,
            ..DetectionProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::NotFinite { name: "min_peak_mag" })
        ));
    }

    #[test]
    fn rejects_negative_refractory() {
        let profile = DetectionProfile {
            refractory_period: -0.5,
            ..DetectionProfile::default()
        };
        assert!(profile.validate().is_err());
    }
}
