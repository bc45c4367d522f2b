//! Joint identifiers and per-frame joint sets.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::constants::JOINT_CONFIDENCE_THRESHOLD;

/// Number of named joints tracked by the pose detector
pub const JOINT_COUNT: usize = 14;

/// Named anatomical landmarks produced by the pose detector.
///
/// The set is closed, so "required joints present" checks are exhaustive
/// over these variants rather than relying on string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    Nose,
    Neck,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// All joints, in detector order.
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Nose,
        Joint::Neck,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Wire name of the joint as produced by the pose source.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::Neck => "neck",
            Joint::LeftShoulder => "leftShoulder",
            Joint::RightShoulder => "rightShoulder",
            Joint::LeftElbow => "leftElbow",
            Joint::RightElbow => "rightElbow",
            Joint::LeftWrist => "leftWrist",
            Joint::RightWrist => "rightWrist",
            Joint::LeftHip => "leftHip",
            Joint::RightHip => "rightHip",
            Joint::LeftKnee => "leftKnee",
            Joint::RightKnee => "rightKnee",
            Joint::LeftAnkle => "leftAnkle",
            Joint::RightAnkle => "rightAnkle",
        }
    }

    /// Parse a wire name back into a joint.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Joint::ALL.iter().copied().find(|j| j.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A single confident joint detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointDetection {
    /// Position normalized to [0, 1], origin top-left, Y increasing downward
    pub position: Point2<f32>,
    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

/// Immutable per-frame mapping from joint to its detected position.
///
/// Only detections whose confidence exceeded the threshold are present.
/// Absent joints are unknown, never zero; every accessor returns an
/// `Option` so callers cannot mistake a missing joint for the origin.
#[derive(Debug, Clone, Default)]
pub struct JointSet {
    joints: [Option<JointDetection>; JOINT_COUNT],
}

impl JointSet {
    /// Build a joint set from raw detections, dropping low-confidence ones.
    pub fn from_detections<I>(detections: I) -> Self
    where
        I: IntoIterator<Item = (Joint, Point2<f32>, f32)>,
    {
        let mut joints = [None; JOINT_COUNT];
        for (joint, position, confidence) in detections {
            if confidence > JOINT_CONFIDENCE_THRESHOLD {
                joints[joint.index()] = Some(JointDetection { position, confidence });
            }
        }
        Self { joints }
    }

    /// Full detection for a joint, if present.
    #[must_use]
    pub fn detection(&self, joint: Joint) -> Option<JointDetection> {
        self.joints[joint.index()]
    }

    /// Position of a joint, if present.
    #[must_use]
    pub fn point(&self, joint: Joint) -> Option<Point2<f32>> {
        self.detection(joint).map(|d| d.position)
    }

    /// Confidence of a joint, if present.
    #[must_use]
    pub fn confidence(&self, joint: Joint) -> Option<f32> {
        self.detection(joint).map(|d| d.confidence)
    }

    /// Whether a joint passed the confidence filter this frame.
    #[must_use]
    pub fn contains(&self, joint: Joint) -> bool {
        self.detection(joint).is_some()
    }

    /// Number of joints present this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }

    /// Whether no joints at all were detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.iter().all(|j| j.is_none())
    }

    /// Iterate over the joints present this frame.
    pub fn present(&self) -> impl Iterator<Item = (Joint, JointDetection)> + '_ {
        Joint::ALL
            .iter()
            .filter_map(move |&j| self.joints[j.index()].map(|d| (j, d)))
    }
}
