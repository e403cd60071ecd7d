//! Repetition detection engine for BarPulse
//!
//! Converts a wrist-worn accelerometer magnitude stream into discrete
//! resistance-training repetitions with velocity-based-training metrics
//! (mean/peak/propulsive velocity, time-to-peak, set-level velocity loss).
//!
//! Key constraints:
//! - Synchronous, per-sample ingestion off the transport callback
//! - No heap allocation in the hot path (fixed-capacity buffers throughout)
//! - No blocking, no I/O; timing comes from sample timestamps alone
//! - All observable state changes are typed events, never prints
//!
//! ```no_run
//! use barpulse_core::{DetectionProfile, RepEngine, Sample};
//!
//! let mut engine = RepEngine::new(DetectionProfile::back_squat()).unwrap();
//!
//! // Samples arrive decoded and timestamped from the transport layer
//! for (i, magnitude) in [1.0f32, 0.98, 1.02].into_iter().enumerate() {
//!     let sample = Sample::new(i as u64 * 20, magnitude);
//!     if let Some(rep) = engine.ingest(sample) {
//!         println!("rep {}: {:.2} m/s", rep.index, rep.mean_velocity);
//!     }
//!     for event in engine.drain_events() {
//!         // forward to rendering/export
//!         let _ = event;
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod baseline;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod kinematics;
pub mod markers;
pub mod queue;
pub mod session;
pub mod smoothing;
pub mod time;
pub mod trigger;
pub mod validator;
pub mod window;

// Public API
pub use config::DetectionProfile;
pub use engine::RepEngine;
pub use errors::{ConfigError, ConfigResult, RejectReason};
pub use events::{
    EngineEvent, FatigueLevel, Marker, MarkerKind, MarkerSet, Repetition, Sample, Telemetry,
    TriggerState,
};
pub use queue::{EventConsumer, EventProducer, EventQueue};
pub use session::Session;
pub use time::Timestamp;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
