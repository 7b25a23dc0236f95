use super::*;

use log::trace;

/// How far a reflected ray is pushed off the mirror it just hit, so that it
/// doesn't hit that same mirror again right away.
pub const SURFACE_OFFSET: Float = geometry::EPSILON * 10.0;

/// The path of a ray bouncing between reflectors, one leg at a time.
///
/// Tracing stops when the ray escapes (no reflector ahead within the remaining
/// distance budget), when it has used up `config.max_bounces` legs, or when its
/// intensity, decayed by `config.decay` at each bounce, has dropped to
/// `config.min_intensity` or below. A ray starting that dim, or with no
/// distance budget, yields nothing.
///
/// A ray with no direction yields a single zero-length segment at its origin.
pub struct RayPath<'a, M: ?Sized> {
    mirror: &'a M,
    config: &'a TraceConfig,
    ray: Ray,
    remaining: Float,
    intensity: Float,
    bounces: usize,
    done: bool,
}

impl<'a, M: Reflector + ?Sized> RayPath<'a, M> {
    #[inline]
    #[must_use]
    pub fn new(
        mirror: &'a M,
        ray: Ray,
        max_distance: Float,
        intensity: Float,
        config: &'a TraceConfig,
    ) -> Self {
        Self {
            mirror,
            config,
            ray,
            remaining: max_distance,
            intensity,
            bounces: 0,
            done: false,
        }
    }

    /// The ray the next leg will follow
    #[inline]
    #[must_use]
    pub fn current_ray(&self) -> &Ray {
        &self.ray
    }

    #[inline]
    #[must_use]
    pub fn remaining_distance(&self) -> Float {
        self.remaining
    }

    #[inline]
    #[must_use]
    pub fn intensity(&self) -> Float {
        self.intensity
    }

    /// Number of reflections so far
    #[inline]
    #[must_use]
    pub fn bounces(&self) -> usize {
        self.bounces
    }

    fn exhausted(&self) -> bool {
        self.bounces >= self.config.max_bounces
            || self.remaining <= 0.0
            || self.intensity <= self.config.min_intensity
    }
}

impl<M: Reflector + ?Sized> Iterator for RayPath<'_, M> {
    type Item = RaySegment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.exhausted() {
            self.done = true;
            return None;
        }

        if self.ray.is_degenerate() {
            self.done = true;
            return Some(RaySegment::new(self.ray.origin, self.ray.origin));
        }

        let mut ctx = SimulationCtx::new(self.ray, self.remaining);
        self.mirror.add_tangents(&mut ctx);

        let Some((hit, normal)) = ctx.take_closest() else {
            self.done = true;
            return Some(RaySegment::new(
                self.ray.origin,
                self.ray.at(self.remaining),
            ));
        };

        let segment = RaySegment::new(self.ray.origin, hit.point);

        let direction = reflect(&self.ray.direction, &normal);
        self.ray = Ray::new(hit.point + direction * SURFACE_OFFSET, direction);
        self.remaining -= hit.distance;
        self.intensity *= self.config.decay;
        self.bounces += 1;

        trace!(
            "bounce {} at ({}, {}), {} left",
            self.bounces,
            hit.point.x,
            hit.point.y,
            self.remaining
        );

        Some(segment)
    }
}

/// Traces `ray` through `mirror` with a distance budget of
/// `config.max_distance`, returning one segment per leg of its path.
#[must_use]
pub fn trace_ray<M: Reflector + ?Sized>(
    ray: Ray,
    mirror: &M,
    intensity: Float,
    config: &TraceConfig,
) -> Vec<RaySegment> {
    RayPath::new(mirror, ray, config.max_distance, intensity, config).collect()
}
