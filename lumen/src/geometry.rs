//! 2D vector helpers.
//!
//! Addition, subtraction, scaling and dot products are nalgebra's own
//! operators (`a + b`, `a - b`, `v * s`, `a.dot(&b)`); this module only adds
//! what nalgebra doesn't do the way the engine needs it.

use super::{Float, Point};

/// Tolerance used for degenerate lengths, parallelism and self-intersection.
pub const EPSILON: Float = 1e-4;

/// Returns `v` scaled to unit length, or the zero vector if `‖v‖ < EPSILON`.
#[inline]
#[must_use]
pub fn normalize(v: &Point) -> Point {
    let len = v.norm();
    if len < EPSILON {
        Point::zeros()
    } else {
        v / len
    }
}

#[inline]
#[must_use]
pub fn is_zero(v: &Point) -> bool {
    v.x == 0.0 && v.y == 0.0
}

/// `v` rotated a quarter turn counter-clockwise.
#[inline]
#[must_use]
pub fn perp(v: &Point) -> Point {
    Point::new(-v.y, v.x)
}

/// The unit vector at `angle` radians from the positive x axis.
#[inline]
#[must_use]
pub fn from_angle(angle: Float) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(cos, sin)
}
