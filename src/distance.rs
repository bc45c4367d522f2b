//! Camera-distance classification from body vertical span.
//!
//! Single-frame span measurements jitter near the category boundaries, so
//! a classification only commits after a run of consecutive confident
//! frames.

use log::debug;

use crate::config::DistanceConfig;
use crate::joints::{Joint, JointSet};

/// Distance category used to guide user positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceClassification {
    TooClose,
    Optimal,
    TooFar,
    Unknown,
}

/// Joints preferred for the aggregate confidence measure
const PREFERRED_JOINTS: [Joint; 4] = [Joint::Nose, Joint::Neck, Joint::LeftAnkle, Joint::RightAnkle];

/// Head-end candidates for the vertical span
const HEAD_JOINTS: [Joint; 2] = [Joint::Nose, Joint::Neck];

/// Foot-end candidates for the vertical span
const LOWER_JOINTS: [Joint; 4] = [
    Joint::LeftAnkle,
    Joint::RightAnkle,
    Joint::LeftKnee,
    Joint::RightKnee,
];

/// Classifier with temporal smoothing over consecutive confident frames.
pub struct DistanceClassifier {
    config: DistanceConfig,
    consecutive_confident: u32,
    last: DistanceClassification,
}

impl DistanceClassifier {
    #[must_use]
    pub fn new(config: DistanceConfig) -> Self {
        Self {
            config,
            consecutive_confident: 0,
            last: DistanceClassification::Unknown,
        }
    }

    /// Classify the current frame's camera distance.
    ///
    /// Returns `Unknown` until the aggregate confidence has stayed above
    /// threshold for the configured number of consecutive frames.
    pub fn classify(&mut self, joints: &JointSet) -> DistanceClassification {
        let confidence = Self::aggregate_confidence(joints);
        if confidence > self.config.confidence_threshold {
            self.consecutive_confident += 1;
        } else {
            self.consecutive_confident = 0;
        }

        let classification = if self.consecutive_confident >= self.config.smoothing_frames {
            match Self::vertical_span(joints) {
                Some(span) if span < self.config.too_close_span => DistanceClassification::TooClose,
                Some(span) if span < self.config.too_far_span => DistanceClassification::Optimal,
                Some(_) => DistanceClassification::TooFar,
                None => DistanceClassification::Unknown,
            }
        } else {
            DistanceClassification::Unknown
        };

        if classification != self.last {
            debug!("distance classification: {:?} -> {:?}", self.last, classification);
        }
        self.last = classification;
        classification
    }

    /// Last classification, cached for diagnostics.
    #[must_use]
    pub fn last(&self) -> DistanceClassification {
        self.last
    }

    /// Clear the smoothing counter and cached classification.
    pub fn reset(&mut self) {
        self.consecutive_confident = 0;
        self.last = DistanceClassification::Unknown;
    }

    /// Mean confidence over the preferred joints, falling back to the mean
    /// over all detected joints when fewer than 2 preferred are present.
    fn aggregate_confidence(joints: &JointSet) -> f32 {
        let preferred: Vec<f32> = PREFERRED_JOINTS
            .iter()
            .filter_map(|&j| joints.confidence(j))
            .collect();

        if preferred.len() >= 2 {
            preferred.iter().sum::<f32>() / preferred.len() as f32
        } else {
            let mut sum = 0.0;
            let mut count = 0usize;
            for (_, detection) in joints.present() {
                sum += detection.confidence;
                count += 1;
            }
            if count == 0 {
                0.0
            } else {
                sum / count as f32
            }
        }
    }

    /// Vertical body span: lowest foot/knee Y minus highest head Y, falling
    /// back to the full span over all present joints when either candidate
    /// group is entirely absent.
    fn vertical_span(joints: &JointSet) -> Option<f32> {
        let head_min = HEAD_JOINTS
            .iter()
            .filter_map(|&j| joints.point(j))
            .map(|p| p.y)
            .fold(f32::INFINITY, f32::min);
        let lower_max = LOWER_JOINTS
            .iter()
            .filter_map(|&j| joints.point(j))
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max);

        if head_min.is_finite() && lower_max.is_finite() {
            return Some((lower_max - head_min).clamp(0.0, 1.0));
        }

        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (_, detection) in joints.present() {
            min_y = min_y.min(detection.position.y);
            max_y = max_y.max(detection.position.y);
        }
        if min_y.is_finite() {
            Some((max_y - min_y).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

impl Default for DistanceClassifier {
    fn default() -> Self {
        Self::new(DistanceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    /// Minimal body with a controllable head-to-ankle span
    fn spanned_body(span: f32) -> JointSet {
        JointSet::from_detections([
            (Joint::Nose, Point2::new(0.5, 0.1), 0.9),
            (Joint::Neck, Point2::new(0.5, 0.15), 0.9),
            (Joint::LeftAnkle, Point2::new(0.45, 0.1 + span), 0.9),
            (Joint::RightAnkle, Point2::new(0.55, 0.1 + span), 0.9),
        ])
    }

    #[test]
    fn test_unknown_until_tenth_confident_frame() {
        let mut classifier = DistanceClassifier::default();
        let body = spanned_body(0.3);

        for _ in 0..9 {
            assert_eq!(classifier.classify(&body), DistanceClassification::Unknown);
        }
        assert_eq!(classifier.classify(&body), DistanceClassification::TooClose);
    }

    #[test]
    fn test_low_confidence_resets_streak() {
        let mut classifier = DistanceClassifier::default();
        let body = spanned_body(0.5);
        let weak = JointSet::from_detections([
            (Joint::Nose, Point2::new(0.5, 0.1), 0.4),
            (Joint::Neck, Point2::new(0.5, 0.15), 0.4),
        ]);

        for _ in 0..9 {
            classifier.classify(&body);
        }
        classifier.classify(&weak);
        // The streak restarted, so nine more confident frames are needed
        for _ in 0..9 {
            assert_eq!(classifier.classify(&body), DistanceClassification::Unknown);
        }
        assert_eq!(classifier.classify(&body), DistanceClassification::Optimal);
    }

    #[test]
    fn test_span_boundaries() {
        for (span, expected) in [
            (0.2, DistanceClassification::TooClose),
            (0.5, DistanceClassification::Optimal),
            (0.74, DistanceClassification::Optimal),
            (0.8, DistanceClassification::TooFar),
        ] {
            let mut classifier = DistanceClassifier::default();
            let body = spanned_body(span);
            let mut result = DistanceClassification::Unknown;
            for _ in 0..10 {
                result = classifier.classify(&body);
            }
            assert_eq!(result, expected, "span {span}");
        }
    }

    #[test]
    fn test_span_falls_back_to_all_joints() {
        // No head candidates at all; hips and ankles still give a span,
        // confidence falls back to the mean over all detected joints
        let body = JointSet::from_detections([
            (Joint::LeftHip, Point2::new(0.45, 0.3), 0.9),
            (Joint::RightHip, Point2::new(0.55, 0.3), 0.9),
            (Joint::LeftAnkle, Point2::new(0.45, 0.85), 0.9),
            (Joint::RightAnkle, Point2::new(0.55, 0.85), 0.9),
        ]);

        let mut classifier = DistanceClassifier::default();
        let mut result = DistanceClassification::Unknown;
        for _ in 0..10 {
            result = classifier.classify(&body);
        }
        assert_eq!(result, DistanceClassification::Optimal);
    }

    #[test]
    fn test_empty_set_stays_unknown() {
        let mut classifier = DistanceClassifier::default();
        for _ in 0..20 {
            assert_eq!(classifier.classify(&JointSet::default()), DistanceClassification::Unknown);
        }
    }

    #[test]
    fn test_reset_clears_streak_and_cache() {
        let mut classifier = DistanceClassifier::default();
        let body = spanned_body(0.5);
        for _ in 0..10 {
            classifier.classify(&body);
        }
        assert_eq!(classifier.last(), DistanceClassification::Optimal);

        classifier.reset();
        assert_eq!(classifier.last(), DistanceClassification::Unknown);
        assert_eq!(classifier.classify(&body), DistanceClassification::Unknown);
    }
}
