//! Configuration management for the squat coaching core

use crate::constants::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Form analysis thresholds
    pub form: FormConfig,

    /// Repetition counter thresholds and timers
    pub counter: CounterConfig,

    /// Camera-distance classification parameters
    pub distance: DistanceConfig,

    /// Session coordination parameters
    pub session: SessionConfig,
}

/// Form analysis thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Lower bound of the ideal knee-depth range, degrees
    pub depth_min_degrees: f32,

    /// Upper bound of the ideal knee-depth range, degrees
    pub depth_max_degrees: f32,

    /// Maximum acceptable back lean from vertical, degrees
    pub back_lean_max_degrees: f32,

    /// Maximum acceptable forward knee offset, normalized units
    pub knee_forward_max: f32,

    /// Minimum interval between analyzer voice announcements, seconds
    pub voice_interval_secs: f32,
}

/// Repetition counter thresholds and timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Knee angle above which the legs count as extended, degrees
    pub standing_angle_degrees: f32,

    /// Knee angle below which the squat is at its bottom, degrees
    pub bottom_angle_degrees: f32,

    /// Hysteresis buffer applied to transition thresholds, degrees
    pub hysteresis_degrees: f32,

    /// Post-rep cooldown suppressing double counting, seconds
    pub rep_cooldown_secs: f32,

    /// Stale-signal window after which tracking is lost, seconds
    pub tracking_timeout_secs: f32,
}

/// Camera-distance classification parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceConfig {
    /// Aggregate-confidence threshold for the smoothing counter (0.0-1.0)
    pub confidence_threshold: f32,

    /// Consecutive confident frames required before classifying
    pub smoothing_frames: u32,

    /// Body span below which the user is too close (0.0-1.0)
    pub too_close_span: f32,

    /// Body span at or above which the user is too far (0.0-1.0)
    pub too_far_span: f32,
}

/// Session coordination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minimum interval between accepted frames, seconds
    pub min_frame_interval_secs: f32,

    /// Minimum interval between coordinator voice announcements, seconds
    pub voice_interval_secs: f32,

    /// Dwell time in the too-close zone before the step-back prompt, seconds
    pub step_back_after_secs: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            form: FormConfig::default(),
            counter: CounterConfig::default(),
            distance: DistanceConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            depth_min_degrees: DEFAULT_DEPTH_MIN_DEGREES,
            depth_max_degrees: DEFAULT_DEPTH_MAX_DEGREES,
            back_lean_max_degrees: DEFAULT_BACK_LEAN_MAX_DEGREES,
            knee_forward_max: DEFAULT_KNEE_FORWARD_MAX,
            voice_interval_secs: DEFAULT_ANALYZER_VOICE_INTERVAL_SECS,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            standing_angle_degrees: DEFAULT_STANDING_ANGLE,
            bottom_angle_degrees: DEFAULT_BOTTOM_ANGLE,
            hysteresis_degrees: DEFAULT_HYSTERESIS_DEGREES,
            rep_cooldown_secs: DEFAULT_REP_COOLDOWN_SECS,
            tracking_timeout_secs: DEFAULT_TRACKING_TIMEOUT_SECS,
        }
    }
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_DISTANCE_CONFIDENCE,
            smoothing_frames: DEFAULT_DISTANCE_SMOOTHING_FRAMES,
            too_close_span: DEFAULT_TOO_CLOSE_SPAN,
            too_far_span: DEFAULT_TOO_FAR_SPAN,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_frame_interval_secs: DEFAULT_MIN_FRAME_INTERVAL_SECS,
            voice_interval_secs: DEFAULT_COORDINATOR_VOICE_INTERVAL_SECS,
            step_back_after_secs: DEFAULT_STEP_BACK_AFTER_SECS,
        }
    }
}

impl FormConfig {
    /// Analyzer speech-gate interval as a duration
    #[must_use]
    pub fn voice_interval(&self) -> Duration {
        Duration::from_secs_f32(self.voice_interval_secs)
    }
}

impl CounterConfig {
    /// Post-rep cooldown as a duration
    #[must_use]
    pub fn rep_cooldown(&self) -> Duration {
        Duration::from_secs_f32(self.rep_cooldown_secs)
    }

    /// Tracking timeout as a duration
    #[must_use]
    pub fn tracking_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.tracking_timeout_secs)
    }
}

impl SessionConfig {
    /// Frame-throttle interval as a duration, at millisecond resolution
    /// so a source pacing frames at exactly this interval is accepted
    #[must_use]
    pub fn min_frame_interval(&self) -> Duration {
        Duration::from_millis((self.min_frame_interval_secs * 1000.0).round() as u64)
    }

    /// Coordinator speech-gate interval as a duration
    #[must_use]
    pub fn voice_interval(&self) -> Duration {
        Duration::from_secs_f32(self.voice_interval_secs)
    }

    /// Step-back debounce as a duration
    #[must_use]
    pub fn step_back_after(&self) -> Duration {
        Duration::from_secs_f32(self.step_back_after_secs)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.form.depth_min_degrees >= self.form.depth_max_degrees {
            return Err(Error::Config(
                "Depth minimum must be below depth maximum".to_string(),
            ));
        }
        if !(0.0..=180.0).contains(&self.form.back_lean_max_degrees) {
            return Err(Error::Config(
                "Back lean maximum must be between 0 and 180 degrees".to_string(),
            ));
        }
        if self.form.voice_interval_secs < 0.0 {
            return Err(Error::Config(
                "Analyzer voice interval must be non-negative".to_string(),
            ));
        }

        if self.counter.bottom_angle_degrees >= self.counter.standing_angle_degrees {
            return Err(Error::Config(
                "Bottom angle must be below standing angle".to_string(),
            ));
        }
        let band = self.counter.standing_angle_degrees - self.counter.bottom_angle_degrees;
        if self.counter.hysteresis_degrees < 0.0 || self.counter.hysteresis_degrees * 2.0 >= band {
            return Err(Error::Config(
                "Hysteresis must be non-negative and smaller than half the standing-bottom band"
                    .to_string(),
            ));
        }
        if self.counter.rep_cooldown_secs < 0.0 || self.counter.tracking_timeout_secs <= 0.0 {
            return Err(Error::Config(
                "Counter timers must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.distance.confidence_threshold) {
            return Err(Error::Config(
                "Distance confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.distance.smoothing_frames == 0 {
            return Err(Error::Config(
                "Distance smoothing frames must be greater than 0".to_string(),
            ));
        }
        if self.distance.too_close_span >= self.distance.too_far_span {
            return Err(Error::Config(
                "Too-close span must be below too-far span".to_string(),
            ));
        }

        if self.session.min_frame_interval_secs <= 0.0 {
            return Err(Error::Config(
                "Frame interval must be greater than 0".to_string(),
            ));
        }
        if self.session.voice_interval_secs < 0.0 || self.session.step_back_after_secs < 0.0 {
            return Err(Error::Config(
                "Session intervals must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Squat Coach Configuration

# Form analysis thresholds
form:
  depth_min_degrees: 70.0
  depth_max_degrees: 90.0
  back_lean_max_degrees: 20.0
  knee_forward_max: 0.05
  voice_interval_secs: 3.0

# Repetition counter
counter:
  standing_angle_degrees: 160.0
  bottom_angle_degrees: 90.0
  hysteresis_degrees: 5.0
  rep_cooldown_secs: 0.5
  tracking_timeout_secs: 2.0

# Camera-distance classification
distance:
  confidence_threshold: 0.6
  smoothing_frames: 10
  too_close_span: 0.4
  too_far_span: 0.75

# Session coordination
session:
  min_frame_interval_secs: 0.067
  voice_interval_secs: 4.0
  step_back_after_secs: 3.0
"#;
