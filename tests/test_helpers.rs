//! Helper functions and fixtures for tests

#![allow(dead_code)]

use nalgebra::{Point2, Rotation2, Vector2};
use squat_coach::joints::{Joint, JointSet};

const ANKLE_Y: f32 = 0.85;
const SHIN_LEN: f32 = 0.15;
const THIGH_LEN: f32 = 0.15;
const TORSO_LEN: f32 = 0.25;
const HALF_STANCE: f32 = 0.05;
const CONFIDENCE: f32 = 0.9;

/// Build a full-body squat pose with an exact knee angle, back lean and
/// knee-forward offset.
///
/// The thigh is placed by rotating the shin direction at the knee by the
/// requested angle, so the hip-knee-ankle angle the analyzer measures is
/// exactly `knee_angle_deg` regardless of the other two parameters.
pub fn pose(knee_angle_deg: f32, back_lean_deg: f32, knee_offset: f32) -> JointSet {
    let rotation = Rotation2::new(knee_angle_deg.to_radians());
    let lean = back_lean_deg.to_radians();

    let mut detections: Vec<(Joint, Point2<f32>, f32)> = Vec::new();
    let mut hips: Vec<Point2<f32>> = Vec::new();

    for (ankle_joint, knee_joint, hip_joint, base_x) in [
        (Joint::LeftAnkle, Joint::LeftKnee, Joint::LeftHip, 0.5 - HALF_STANCE),
        (Joint::RightAnkle, Joint::RightKnee, Joint::RightHip, 0.5 + HALF_STANCE),
    ] {
        let ankle = Point2::new(base_x, ANKLE_Y);
        let knee = Point2::new(base_x + knee_offset, ANKLE_Y - SHIN_LEN);
        let shin: Vector2<f32> = (ankle - knee).normalize();
        let hip = knee + THIGH_LEN * (rotation * shin);

        detections.push((ankle_joint, ankle, CONFIDENCE));
        detections.push((knee_joint, knee, CONFIDENCE));
        detections.push((hip_joint, hip, CONFIDENCE));
        hips.push(hip);
    }

    let hip_mid = Point2::new((hips[0].x + hips[1].x) / 2.0, (hips[0].y + hips[1].y) / 2.0);
    let shoulder_mid = Point2::new(
        hip_mid.x + TORSO_LEN * lean.sin(),
        hip_mid.y - TORSO_LEN * lean.cos(),
    );

    detections.push((
        Joint::LeftShoulder,
        Point2::new(shoulder_mid.x - HALF_STANCE, shoulder_mid.y),
        CONFIDENCE,
    ));
    detections.push((
        Joint::RightShoulder,
        Point2::new(shoulder_mid.x + HALF_STANCE, shoulder_mid.y),
        CONFIDENCE,
    ));
    detections.push((Joint::Neck, Point2::new(shoulder_mid.x, shoulder_mid.y - 0.03), CONFIDENCE));
    detections.push((Joint::Nose, Point2::new(shoulder_mid.x, shoulder_mid.y - 0.08), CONFIDENCE));

    JointSet::from_detections(detections)
}

/// Upright pose with extended legs and neutral posture
pub fn standing_pose() -> JointSet {
    pose(178.0, 0.0, 0.0)
}

/// Minimal body (head and ankles only) with a controllable vertical span
pub fn compact_body(span: f32, confidence: f32) -> JointSet {
    JointSet::from_detections([
        (Joint::Nose, Point2::new(0.5, 0.1), confidence),
        (Joint::Neck, Point2::new(0.5, 0.14), confidence),
        (Joint::LeftAnkle, Point2::new(0.45, 0.1 + span), confidence),
        (Joint::RightAnkle, Point2::new(0.55, 0.1 + span), confidence),
    ])
}
