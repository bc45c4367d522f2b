//! Tests for camera-distance classification smoothing

mod test_helpers;

use squat_coach::config::DistanceConfig;
use squat_coach::distance::{DistanceClassification, DistanceClassifier};
use test_helpers::{compact_body, standing_pose};

#[test]
fn test_too_close_commits_exactly_on_frame_ten() {
    let mut classifier = DistanceClassifier::new(DistanceConfig::default());
    let body = compact_body(0.3, 0.9);

    for frame in 1..=9 {
        assert_eq!(
            classifier.classify(&body),
            DistanceClassification::Unknown,
            "frame {frame} must stay unknown"
        );
    }
    assert_eq!(classifier.classify(&body), DistanceClassification::TooClose);
}

#[test]
fn test_full_body_pose_classifies_optimal() {
    let mut classifier = DistanceClassifier::new(DistanceConfig::default());
    let body = standing_pose();

    let mut result = DistanceClassification::Unknown;
    for _ in 0..10 {
        result = classifier.classify(&body);
    }
    assert_eq!(result, DistanceClassification::Optimal);
    assert_eq!(classifier.last(), DistanceClassification::Optimal);
}

#[test]
fn test_far_body_classifies_too_far() {
    let mut classifier = DistanceClassifier::new(DistanceConfig::default());
    let body = compact_body(0.8, 0.9);

    let mut result = DistanceClassification::Unknown;
    for _ in 0..10 {
        result = classifier.classify(&body);
    }
    assert_eq!(result, DistanceClassification::TooFar);
}

#[test]
fn test_low_confidence_frame_restarts_the_streak() {
    let mut classifier = DistanceClassifier::new(DistanceConfig::default());
    let confident = compact_body(0.3, 0.9);
    let hesitant = compact_body(0.3, 0.5);

    for _ in 0..9 {
        classifier.classify(&confident);
    }
    assert_eq!(classifier.classify(&hesitant), DistanceClassification::Unknown);

    // Nine more confident frames are not enough after the reset
    for frame in 1..=9 {
        assert_eq!(
            classifier.classify(&confident),
            DistanceClassification::Unknown,
            "frame {frame} after reset"
        );
    }
    assert_eq!(classifier.classify(&confident), DistanceClassification::TooClose);
}

#[test]
fn test_classification_follows_span_once_committed() {
    let mut classifier = DistanceClassifier::new(DistanceConfig::default());

    for _ in 0..10 {
        classifier.classify(&compact_body(0.3, 0.9));
    }
    assert_eq!(classifier.last(), DistanceClassification::TooClose);

    // The streak is about confidence, not span: stepping back takes
    // effect on the very next frame
    assert_eq!(
        classifier.classify(&compact_body(0.6, 0.9)),
        DistanceClassification::Optimal
    );
}
