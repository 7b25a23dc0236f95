use super::*;

use crate::geometry::{normalize, perp, EPSILON};
use std::{rc::Rc, sync::Arc};

pub const DEFAULT_MIRROR_LENGTH: Float = 200.0;

/// Reflect a direction vector off a surface with normal `normal`.
///
/// `d - 2(d·n)n`. The formula is symmetric under `n -> -n`, so `normal`
/// doesn't need to face any particular side. Norms are preserved.
#[inline]
#[must_use]
pub fn reflect(direction: &Point, normal: &Point) -> Point {
    direction - normal * (2.0 * direction.dot(normal))
}

/// A finite, infinitely thin reflective segment from `start` to `end`,
/// reflective on both faces.
#[derive(Clone, Debug, PartialEq)]
pub struct Mirror {
    pub id: String,
    pub start: Point,
    pub end: Point,
    /// Hidden mirrors neither occlude nor reflect.
    pub hidden: bool,
    pub locked: bool,
    pub fixed_width: bool,
}

/// Where a ray meets a mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub point: Point,
    /// The `t` such that [`ray.at(t)`](Ray::at) is `point`
    pub distance: Float,
}

impl Mirror {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            hidden: false,
            locked: false,
            fixed_width: false,
        }
    }

    /// A horizontal mirror of [`DEFAULT_MIRROR_LENGTH`] centered on `center`
    #[must_use]
    pub fn centered(id: impl Into<String>, center: impl Into<Point>) -> Self {
        let center = center.into();
        let half = Point::new(DEFAULT_MIRROR_LENGTH / 2.0, 0.0);
        Self::new(id, center - half, center + half)
    }

    #[inline]
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_fixed_width(mut self, fixed_width: bool) -> Self {
        self.fixed_width = fixed_width;
        self
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> Float {
        (self.end - self.start).norm()
    }

    /// A unit vector perpendicular to this mirror.
    ///
    /// Either perpendicular may be returned: callers must not rely on its sign.
    /// Zero if the mirror has (almost) no length.
    #[inline]
    #[must_use]
    pub fn normal(&self) -> Point {
        normalize(&perp(&(self.end - self.start)))
    }

    /// Returns the point where `ray` crosses this segment, if it does so
    /// strictly ahead of its origin and no further than `max_distance`.
    ///
    /// Rays parallel to the mirror never intersect it.
    #[must_use]
    pub fn intersection(&self, ray: &Ray, max_distance: Float) -> Option<Hit> {
        // ray: origin + t * direction, t >= 0
        // segment: start + s * (end - start), 0 <= s <= 1
        let v1 = ray.origin - self.start;
        let v2 = self.end - self.start;
        let v3 = perp(&ray.direction);

        let denom = v2.dot(&v3);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (v2.x * v1.y - v2.y * v1.x) / denom;
        let s = v1.dot(&v3) / denom;

        (t > EPSILON && (0.0..=1.0).contains(&s) && t <= max_distance).then(|| Hit {
            point: ray.at(t),
            distance: t,
        })
    }
}

/// State shared between the tracer and the reflectors it queries for one leg
/// of a ray's path.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationCtx {
    ray: Ray,
    max_distance: Float,
    closest: Option<(Hit, Point)>,
}

impl SimulationCtx {
    #[inline]
    #[must_use]
    pub fn new(ray: Ray, max_distance: Float) -> Self {
        Self {
            ray,
            max_distance,
            closest: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    /// Hits further than this are out of the ray's remaining budget
    #[inline]
    #[must_use]
    pub fn max_distance(&self) -> Float {
        self.max_distance
    }

    /// Offer a hit, and the surface normal at that hit.
    ///
    /// It replaces the current closest hit only if it is strictly nearer, so
    /// among hits at the same distance, the first one offered wins.
    #[inline]
    pub fn add_tangent(&mut self, hit: Hit, normal: Point) {
        if hit.distance > self.max_distance {
            return;
        }

        if self
            .closest
            .as_ref()
            .map_or(true, |(closest, _)| hit.distance < closest.distance)
        {
            self.closest = Some((hit, normal));
        }
    }

    #[inline]
    #[must_use]
    pub fn closest(&self) -> Option<&(Hit, Point)> {
        self.closest.as_ref()
    }

    #[inline]
    pub fn take_closest(&mut self) -> Option<(Hit, Point)> {
        self.closest.take()
    }
}

/// Anything a ray can bounce off.
///
/// Implementors offer every forward hit they have with
/// [`ctx.ray()`](SimulationCtx::ray) through
/// [`ctx.add_tangent(...)`](SimulationCtx::add_tangent), in a deterministic
/// order. The context keeps the nearest one.
pub trait Reflector {
    fn add_tangents(&self, ctx: &mut SimulationCtx);
}

impl Reflector for Mirror {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        if self.hidden {
            return;
        }

        if let Some(hit) = self.intersection(ctx.ray(), ctx.max_distance()) {
            ctx.add_tangent(hit, self.normal());
        }
    }
}

impl<T: Reflector> Reflector for [T] {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        self.iter().for_each(|mirror| mirror.add_tangents(ctx))
    }
}

impl<const N: usize, T: Reflector> Reflector for [T; N] {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        self.as_slice().add_tangents(ctx)
    }
}

impl<T: Reflector> Reflector for Vec<T> {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        self.as_slice().add_tangents(ctx)
    }
}

impl<T: Reflector + ?Sized> Reflector for Box<T> {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        self.as_ref().add_tangents(ctx)
    }
}

impl<T: Reflector + ?Sized> Reflector for Rc<T> {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        self.as_ref().add_tangents(ctx)
    }
}

impl<T: Reflector + ?Sized> Reflector for Arc<T> {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        self.as_ref().add_tangents(ctx)
    }
}

impl<T: Reflector + ?Sized> Reflector for &T {
    #[inline]
    fn add_tangents(&self, ctx: &mut SimulationCtx) {
        (**self).add_tangents(ctx)
    }
}
