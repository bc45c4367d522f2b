//! Squat coaching analysis core.
//!
//! This library is the computational heart of a squat coaching app. It
//! consumes per-frame human-body joint coordinates from an external pose
//! detector and derives:
//! 1. A repetition count, via a hysteretic four-state machine on the knee
//!    angle
//! 2. A form-quality assessment with one prioritized feedback message per
//!    frame
//! 3. A camera-distance classification to guide user positioning
//!
//! Camera capture, the pose-detection model, UI rendering and speech
//! output are external collaborators: the core consumes and produces
//! plain data only.
//!
//! # Examples
//!
//! ## Driving a session
//!
//! ```
//! use std::sync::Arc;
//! use squat_coach::clock::ManualClock;
//! use squat_coach::config::Config;
//! use squat_coach::joints::JointSet;
//! use squat_coach::session::{FrameOutcome, SessionCoordinator};
//!
//! let clock = Arc::new(ManualClock::new());
//! let mut session = SessionCoordinator::new(Config::default(), clock.clone());
//!
//! // One frame with no visible joints: a degraded but valid result
//! match session.process_frame(Ok(JointSet::default())) {
//!     FrameOutcome::Processed(update) => {
//!         assert_eq!(update.analysis.form_score, 0);
//!         assert!(update.voice.is_empty());
//!     }
//!     FrameOutcome::Dropped => unreachable!(),
//! }
//! ```
//!
//! ## Counting reps from a knee-angle signal
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use squat_coach::clock::ManualClock;
//! use squat_coach::config::CounterConfig;
//! use squat_coach::rep_counter::RepCounter;
//!
//! let clock = Arc::new(ManualClock::new());
//! let mut counter = RepCounter::new(CounterConfig::default(), clock.clone());
//!
//! for angle in [150.0, 80.0, 120.0] {
//!     clock.advance(Duration::from_millis(100));
//!     counter.update(angle);
//! }
//! clock.advance(Duration::from_millis(100));
//! assert!(counter.update(178.0)); // back up: one rep
//! assert_eq!(counter.snapshot().rep_count, 1);
//! ```

/// Time injection: production and manually advanced clocks
pub mod clock;

/// Configuration management
pub mod config;

/// Constants used throughout the analysis core
pub mod constants;

/// Camera-distance classification from body vertical span
pub mod distance;

/// Error types and result handling
pub mod error;

/// Squat form analysis with prioritized feedback
pub mod form;

/// Pure 2D geometry over optional joint positions
pub mod geometry;

/// Joint identifiers and per-frame joint sets
pub mod joints;

/// Hysteretic squat repetition counter
pub mod rep_counter;

/// Recorded pose-frame loading for offline replay
pub mod replay;

/// Per-frame session orchestration
pub mod session;

/// Message novelty and interval gating for vocalization
pub mod speech;

pub use error::{Error, PoseError, Result};
