//! Squat form analysis with prioritized corrective feedback.
//!
//! Each frame is scored against three independent postural criteria (knee
//! depth, back posture, knee tracking). A single primary message is chosen
//! by a fixed safety-first priority, classified by keyword, and run through
//! the analyzer's speech gate.

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::FormConfig;
use crate::constants::{COINCIDENCE_TOLERANCE, MIN_REQUIRED_JOINTS};
use crate::geometry;
use crate::joints::{Joint, JointSet};
use crate::speech::SpeechGate;

/// Feedback category derived from message keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCategory {
    Positive,
    Corrective,
    Neutral,
}

/// Fallback message when too few joints are visible for analysis
pub const MSG_POSITION_YOURSELF: &str = "Position yourself so your full body is visible";

const MSG_DEPTH_PERFECT: &str = "Perfect depth!";
const MSG_DEPTH_EXCELLENT: &str = "Excellent depth!";
const MSG_DEPTH_GO_LOWER: &str = "Go lower";
const MSG_DEPTH_MISSING: &str = "Cannot see your legs clearly";

const MSG_BACK_GOOD: &str = "Great back posture";
const MSG_BACK_STRAIGHTEN: &str = "Keep your back straight";
const MSG_BACK_MISSING: &str = "Cannot see your upper body";

const MSG_KNEES_GOOD: &str = "Good knee position";
const MSG_KNEES_FORWARD: &str = "Sit back, knees behind your toes";
const MSG_KNEES_MISSING: &str = "Cannot see your feet";

/// Rotating affirmations for frames where all three criteria pass. The
/// phrase is picked by wall-clock second, so repeated evaluations within
/// the same second stay stable.
const AFFIRMATIONS: [&str; 7] = [
    "Perfect form!",
    "Great squat!",
    "Excellent work!",
    "Keep it up!",
    "Nice and controlled!",
    "Well done!",
    "Good depth, good form!",
];

const POSITIVE_KEYWORDS: [&str; 7] = [
    "perfect",
    "great",
    "excellent",
    "good",
    "nice",
    "well done",
    "keep it up",
];

const CORRECTIVE_KEYWORDS: [&str; 7] = [
    "go lower",
    "straighten",
    "back straight",
    "knees",
    "forward",
    "deeper",
    "sit back",
];

/// Joints the analyzer works from; at least [`MIN_REQUIRED_JOINTS`] of
/// these must be present for a frame to be analyzed.
const REQUIRED_JOINTS: [Joint; 8] = [
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftKnee,
    Joint::RightKnee,
    Joint::LeftAnkle,
    Joint::RightAnkle,
    Joint::LeftShoulder,
    Joint::RightShoulder,
];

/// Per-frame form analysis result. Computed fresh each frame and not
/// retained by the analyzer.
#[derive(Debug, Clone)]
pub struct SquatAnalysis {
    /// Primary feedback message chosen by priority
    pub feedback: String,
    /// Category of the primary message
    pub category: FeedbackCategory,
    /// Whether the analyzer's speech gate admitted the message
    pub should_speak: bool,
    /// Mean knee angle, degrees
    pub knee_angle: Option<f32>,
    /// Back lean from vertical, degrees
    pub back_lean_angle: Option<f32>,
    /// Forward knee offset, normalized units (positive = knees ahead)
    pub knee_forward_offset: Option<f32>,
    pub depth_good: bool,
    pub back_good: bool,
    pub knees_good: bool,
    /// Percentage of criteria satisfied, always one of {0, 33, 66, 100}
    pub form_score: u8,
    /// Per-criterion messages in fixed order: depth, back, knees
    pub detailed_feedback: Vec<String>,
}

impl SquatAnalysis {
    /// Degraded result carrying only a fallback message. Used when the
    /// frame cannot be analyzed; never vocalized.
    pub(crate) fn unavailable(message: &str) -> Self {
        Self {
            feedback: message.to_owned(),
            category: FeedbackCategory::Neutral,
            should_speak: false,
            knee_angle: None,
            back_lean_angle: None,
            knee_forward_offset: None,
            depth_good: false,
            back_good: false,
            knees_good: false,
            form_score: 0,
            detailed_feedback: Vec::new(),
        }
    }
}

/// One evaluated postural criterion
struct Criterion {
    value: Option<f32>,
    is_good: bool,
    message: &'static str,
}

impl Criterion {
    fn good(value: f32, message: &'static str) -> Self {
        Self {
            value: Some(value),
            is_good: true,
            message,
        }
    }

    fn bad(value: f32, message: &'static str) -> Self {
        Self {
            value: Some(value),
            is_good: false,
            message,
        }
    }

    fn missing(message: &'static str) -> Self {
        Self {
            value: None,
            is_good: false,
            message,
        }
    }
}

/// Session-scoped form analyzer.
///
/// The only state retained across frames is the speech gate (last message
/// and last vocalization time); everything else is recomputed per frame.
pub struct FormAnalyzer {
    config: FormConfig,
    clock: Arc<dyn Clock>,
    gate: SpeechGate,
}

impl FormAnalyzer {
    #[must_use]
    pub fn new(config: FormConfig, clock: Arc<dyn Clock>) -> Self {
        let gate = SpeechGate::new(config.voice_interval(), clock.clone());
        Self {
            config,
            clock,
            gate,
        }
    }

    /// Analyze one frame of joints.
    ///
    /// Never fails: frames with too few visible joints produce a neutral
    /// "position yourself" result with a zero score.
    pub fn analyze(&mut self, joints: &JointSet) -> SquatAnalysis {
        let present = REQUIRED_JOINTS.iter().filter(|&&j| joints.contains(j)).count();
        if present < MIN_REQUIRED_JOINTS {
            return SquatAnalysis::unavailable(MSG_POSITION_YOURSELF);
        }

        let depth = self.evaluate_depth(joints);
        let back = self.evaluate_back(joints);
        let knees = self.evaluate_knees(joints);

        // Safety first: back posture outranks knee tracking outranks depth
        let feedback: String = if !back.is_good {
            back.message.to_owned()
        } else if !knees.is_good {
            knees.message.to_owned()
        } else if !depth.is_good {
            depth.message.to_owned()
        } else {
            let index = (self.clock.unix_seconds() % AFFIRMATIONS.len() as u64) as usize;
            AFFIRMATIONS[index].to_owned()
        };

        let category = classify_message(&feedback);
        let should_speak = self.gate.admit(&feedback, category);

        let good_count =
            u32::from(depth.is_good) + u32::from(back.is_good) + u32::from(knees.is_good);

        SquatAnalysis {
            detailed_feedback: vec![
                format!("Depth: {}", depth.message),
                format!("Back: {}", back.message),
                format!("Knees: {}", knees.message),
            ],
            feedback,
            category,
            should_speak,
            knee_angle: depth.value,
            back_lean_angle: back.value,
            knee_forward_offset: knees.value,
            depth_good: depth.is_good,
            back_good: back.is_good,
            knees_good: knees.is_good,
            form_score: (good_count * 100 / 3) as u8,
        }
    }

    /// Forget speech-gate history (new exercise set, session reset).
    pub fn reset(&mut self) {
        self.gate.reset();
    }

    /// Knee depth: mean of the available hip-knee-ankle angles. Deeper
    /// than the ideal range still counts as good.
    fn evaluate_depth(&self, joints: &JointSet) -> Criterion {
        let left = geometry::angle_at(
            joints.point(Joint::LeftHip),
            joints.point(Joint::LeftKnee),
            joints.point(Joint::LeftAnkle),
        );
        let right = geometry::angle_at(
            joints.point(Joint::RightHip),
            joints.point(Joint::RightKnee),
            joints.point(Joint::RightAnkle),
        );

        let angle = match (left, right) {
            (Some(l), Some(r)) => Some((l + r) / 2.0),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        };

        match angle {
            None => Criterion::missing(MSG_DEPTH_MISSING),
            Some(a) if a > self.config.depth_max_degrees => Criterion::bad(a, MSG_DEPTH_GO_LOWER),
            Some(a) if a >= self.config.depth_min_degrees => Criterion::good(a, MSG_DEPTH_PERFECT),
            Some(a) => Criterion::good(a, MSG_DEPTH_EXCELLENT),
        }
    }

    /// Back posture: lean of the shoulder-midpoint to hip-midpoint vector
    /// away from vertical.
    fn evaluate_back(&self, joints: &JointSet) -> Criterion {
        let shoulder_mid = geometry::midpoint(
            joints.point(Joint::LeftShoulder),
            joints.point(Joint::RightShoulder),
        );
        let hip_mid = geometry::midpoint(joints.point(Joint::LeftHip), joints.point(Joint::RightHip));

        let lean = match (shoulder_mid, hip_mid) {
            (Some(shoulder), Some(hip)) => {
                let torso = shoulder - hip;
                let length = torso.norm();
                if length < COINCIDENCE_TOLERANCE {
                    None
                } else {
                    // Y grows downward, so an upright torso points toward -Y
                    let cos = (-torso.y / length).clamp(-1.0, 1.0);
                    Some(cos.acos().to_degrees())
                }
            }
            _ => None,
        };

        match lean {
            None => Criterion::missing(MSG_BACK_MISSING),
            Some(a) if a <= self.config.back_lean_max_degrees => Criterion::good(a, MSG_BACK_GOOD),
            Some(a) => Criterion::bad(a, MSG_BACK_STRAIGHTEN),
        }
    }

    /// Knee tracking: signed forward offset of the knee midpoint past the
    /// ankle midpoint. Knees behind the ankles (negative offset) is good.
    fn evaluate_knees(&self, joints: &JointSet) -> Criterion {
        let knee_mid =
            geometry::midpoint(joints.point(Joint::LeftKnee), joints.point(Joint::RightKnee));
        let ankle_mid =
            geometry::midpoint(joints.point(Joint::LeftAnkle), joints.point(Joint::RightAnkle));

        match (knee_mid, ankle_mid) {
            (Some(knee), Some(ankle)) => {
                let offset = knee.x - ankle.x;
                if offset <= self.config.knee_forward_max {
                    Criterion::good(offset, MSG_KNEES_GOOD)
                } else {
                    Criterion::bad(offset, MSG_KNEES_FORWARD)
                }
            }
            _ => Criterion::missing(MSG_KNEES_MISSING),
        }
    }
}

/// Classify a message by keyword. Positive keywords are checked first,
/// matching the order the closed message set was written against.
#[must_use]
pub fn classify_message(message: &str) -> FeedbackCategory {
    let lower = message.to_lowercase();
    if POSITIVE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        FeedbackCategory::Positive
    } else if CORRECTIVE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        FeedbackCategory::Corrective
    } else {
        FeedbackCategory::Neutral
    }
}
