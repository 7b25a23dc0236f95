use super::*;

use thiserror::Error;

/// Tunables of ray emission and tracing.
///
/// The defaults are what the renderer is tuned for: fewer rays trade shape
/// fidelity for speed.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceConfig {
    /// Rays spread over the full circle of a radial light
    pub radial_rays: usize,
    /// Rays spread over the cone of a conic light, both edges included
    pub conic_rays: usize,
    /// Upper bound on the number of legs of any traced path
    pub max_bounces: usize,
    /// Distance budget of rays traced with [`trace_ray`]. Lights use their own.
    pub max_distance: Float,
    /// Rays stop, before their first leg or any later one, once their intensity is at or below this value
    pub min_intensity: Float,
    /// Intensity factor applied at each bounce
    pub decay: Float,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            radial_rays: 128,
            conic_rays: 64,
            max_bounces: 20,
            max_distance: 5000.0,
            min_intensity: 0.05,
            decay: 0.9,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("radial lights need at least one ray")]
    NoRadialRays,
    #[error("conic lights need at least two rays, got {0}")]
    TooFewConicRays(usize),
    #[error("rays must be allowed at least one leg")]
    NoBounces,
    #[error("max distance must be finite and non-negative, got {0}")]
    InvalidMaxDistance(Float),
    #[error("minimum intensity must be finite and non-negative, got {0}")]
    InvalidMinIntensity(Float),
    #[error("decay must lie in (0, 1], got {0}")]
    InvalidDecay(Float),
}

impl TraceConfig {
    #[inline]
    #[must_use]
    pub fn with_radial_rays(mut self, n: usize) -> Self {
        self.radial_rays = n;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_conic_rays(mut self, n: usize) -> Self {
        self.conic_rays = n;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_bounces(mut self, n: usize) -> Self {
        self.max_bounces = n;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_distance(mut self, d: Float) -> Self {
        self.max_distance = d;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_min_intensity(mut self, i: Float) -> Self {
        self.min_intensity = i;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_decay(mut self, decay: Float) -> Self {
        self.decay = decay;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radial_rays == 0 {
            return Err(ConfigError::NoRadialRays);
        }
        if self.conic_rays < 2 {
            return Err(ConfigError::TooFewConicRays(self.conic_rays));
        }
        if self.max_bounces == 0 {
            return Err(ConfigError::NoBounces);
        }
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(ConfigError::InvalidMaxDistance(self.max_distance));
        }
        if !self.min_intensity.is_finite() || self.min_intensity < 0.0 {
            return Err(ConfigError::InvalidMinIntensity(self.min_intensity));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(ConfigError::InvalidDecay(self.decay));
        }
        Ok(())
    }
}
