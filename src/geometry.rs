//! Pure 2D geometry over optional joint positions.
//!
//! All functions are deterministic and stateless. Degenerate input (a
//! missing point, coincident points, a zero-length limb vector) yields
//! `None` rather than a fabricated value.

use nalgebra::Point2;

use crate::constants::COINCIDENCE_TOLERANCE;

/// Interior angle in degrees at `vertex` formed by the limbs to `a` and `b`.
///
/// Returns `None` when any point is missing, when any two of the three
/// points coincide within tolerance, or when either limb vector has zero
/// magnitude. The cosine is clamped to [-1, 1] before `acos` to absorb
/// floating-point overshoot.
#[must_use]
pub fn angle_at(
    a: Option<Point2<f32>>,
    vertex: Option<Point2<f32>>,
    b: Option<Point2<f32>>,
) -> Option<f32> {
    let (a, v, b) = (a?, vertex?, b?);
    if coincident(a, v) || coincident(b, v) || coincident(a, b) {
        return None;
    }

    let u = a - v;
    let w = b - v;
    let norms = u.norm() * w.norm();
    if norms == 0.0 {
        return None;
    }

    let cos = (u.dot(&w) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Euclidean distance between two points, `None` if either is missing.
#[must_use]
pub fn distance(a: Option<Point2<f32>>, b: Option<Point2<f32>>) -> Option<f32> {
    let (a, b) = (a?, b?);
    Some((b - a).norm())
}

/// Arithmetic midpoint of two points, `None` if either is missing.
#[must_use]
pub fn midpoint(a: Option<Point2<f32>>, b: Option<Point2<f32>>) -> Option<Point2<f32>> {
    let (a, b) = (a?, b?);
    Some(Point2::from((a.coords + b.coords) / 2.0))
}

fn coincident(a: Point2<f32>, b: Point2<f32>) -> bool {
    (b - a).norm() < COINCIDENCE_TOLERANCE
}
