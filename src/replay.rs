//! Recorded pose-frame loading for offline replay.
//!
//! Recordings are YAML files produced by the capture side: a list of
//! frames, each with a millisecond timestamp and the raw joint detections
//! before confidence filtering.

use log::warn;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::joints::{Joint, JointSet};

/// One raw joint detection in a recorded frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedJoint {
    /// Wire name, e.g. "leftKnee"
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// One recorded camera frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Milliseconds since the start of the recording
    pub timestamp_ms: u64,
    /// Raw detections; empty when the detector found no body
    #[serde(default)]
    pub joints: Vec<RecordedJoint>,
}

/// A full recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
}

impl RecordedFrame {
    /// Convert the raw detections into a `JointSet`, applying the
    /// confidence filter. Unknown joint names are skipped with a warning.
    #[must_use]
    pub fn joint_set(&self) -> JointSet {
        JointSet::from_detections(self.joints.iter().filter_map(|j| {
            match Joint::from_name(&j.name) {
                Some(joint) => Some((joint, Point2::new(j.x, j.y), j.confidence)),
                None => {
                    warn!("unknown joint name in recording: {}", j.name);
                    None
                }
            }
        }))
    }
}

impl Recording {
    /// Load a recording from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Save a recording to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
