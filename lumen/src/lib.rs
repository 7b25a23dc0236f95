//! A 2D light-ray reflection engine.
//!
//! Lights emit fans of rays, rays bounce off mirror segments, and the traced
//! paths are grouped per light so that a renderer can either fill the lit area
//! (radial and conic lights) or stroke the beam (line lights).
//!
//! The engine holds no state: every entry point is a pure function of the
//! light and mirror snapshots it is handed.

mod aggregate;
mod config;
pub mod geometry;
mod light;
mod mirror;
mod scene;
mod trace;

pub use aggregate::*;
pub use config::*;
pub use light::*;
pub use mirror::*;
pub use scene::*;
pub use trace::*;

pub use indexmap;
pub use nalgebra;

use nalgebra::Vector2;

pub type Float = f64;

/// Used both as a position and as a direction.
pub type Point = Vector2<Float>;

/// A light ray, represented as a half-line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line
    pub origin: Point,
    /// The direction of the half-line.
    ///
    /// Unit length, except for degenerate rays, whose direction is zero.
    pub direction: Point,
}

impl Ray {
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Point>, direction: impl Into<Point>) -> Self {
        Self {
            origin: origin.into(),
            direction: direction.into(),
        }
    }

    /// A ray starting at `origin`, aimed at `target`.
    ///
    /// The direction is zero if both points (nearly) coincide.
    #[inline]
    #[must_use]
    pub fn towards(origin: impl Into<Point>, target: impl Into<Point>) -> Self {
        let origin = origin.into();
        let direction = geometry::normalize(&(target.into() - origin));
        Self { origin, direction }
    }

    /// Reflect the ray's direction off a surface with the given normal
    #[inline]
    pub fn reflect_dir(&mut self, normal: &Point) {
        self.direction = reflect(&self.direction, normal);
    }

    /// Move the ray's origin forward (or backward if `t < 0.0`) by `t`
    #[inline]
    pub fn advance(&mut self, t: Float) {
        self.origin = self.at(t);
    }

    /// Get the point at distance `t` (can be negative) from the ray's origin
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Point {
        self.origin + self.direction * t
    }

    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        geometry::is_zero(&self.direction)
    }
}

/// One straight leg of a traced path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySegment {
    pub start: Point,
    pub end: Point,
}

impl RaySegment {
    #[inline]
    #[must_use]
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> Float {
        (self.end - self.start).norm()
    }

    /// Zero-length segments mark "no visible beam"
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}
