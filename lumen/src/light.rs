use super::*;

use core::{
    f64::consts::{PI, TAU},
    fmt,
    str::FromStr,
};
use crate::geometry::{from_angle, normalize};
use thiserror::Error;

pub const DEFAULT_LIGHT_RADIUS: Float = 300.0;
pub const DEFAULT_LIGHT_INTENSITY: Float = 1.0;
/// Full angular spread of a new conic light, in degrees
pub const DEFAULT_CONE_ANGLE: Float = 60.0;

/// An 8-bit RGBA colour. The engine never looks at it, renderers do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xff)
    }

    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("colour `{0}` must start with '#'")]
    MissingHash(String),
    #[error("colour `{0}` must have 6 or 8 hex digits")]
    InvalidLength(String),
    #[error("colour `{0}` contains invalid hex digits")]
    InvalidDigit(String),
}

impl FromStr for Color {
    type Err = ColorError;

    /// Parses `#RRGGBB` or `#RRGGBBAA`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.into()))?;

        if !matches!(digits.len(), 6 | 8) {
            return Err(ColorError::InvalidLength(s.into()));
        }

        // `from_str_radix` accepts a leading '+'
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(s.into()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidDigit(s.into()))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 0xff },
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// What sets the light variants apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Shines in every direction
    Radial,
    /// Shines towards `target`, spreading `cone_angle` degrees in total
    Conic { target: Point, cone_angle: Float },
    /// A single beam from the light's origin to `target`
    Line { target: Point },
}

impl LightKind {
    /// The variant's name in scene files
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Radial => "radial",
            Self::Conic { .. } => "conic",
            Self::Line { .. } => "line",
        }
    }

    #[must_use]
    pub const fn target(&self) -> Option<&Point> {
        match self {
            Self::Radial => None,
            Self::Conic { target, .. } | Self::Line { target } => Some(target),
        }
    }
}

/// How a light's traced geometry is meant to be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStyle {
    /// Fill the primary polygon as a fan around the light's origin
    Fill,
    /// Stroke every segment as a thick line
    Stroke,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub id: String,
    pub origin: Point,
    /// Reach of radial and conic lights, half the thickness of line lights
    pub radius: Float,
    /// In `[0, 1]`
    pub intensity: Float,
    pub color: Color,
    pub hidden: bool,
    pub locked: bool,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new(id: impl Into<String>, origin: impl Into<Point>, kind: LightKind) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            radius: DEFAULT_LIGHT_RADIUS,
            intensity: DEFAULT_LIGHT_INTENSITY,
            color: Color::WHITE,
            hidden: false,
            locked: false,
            kind,
        }
    }

    #[must_use]
    pub fn radial(id: impl Into<String>, origin: impl Into<Point>) -> Self {
        Self::new(id, origin, LightKind::Radial)
    }

    #[must_use]
    pub fn conic(
        id: impl Into<String>,
        origin: impl Into<Point>,
        target: impl Into<Point>,
        cone_angle: Float,
    ) -> Self {
        Self::new(
            id,
            origin,
            LightKind::Conic {
                target: target.into(),
                cone_angle,
            },
        )
    }

    #[must_use]
    pub fn line(id: impl Into<String>, origin: impl Into<Point>, target: impl Into<Point>) -> Self {
        Self::new(
            id,
            origin,
            LightKind::Line {
                target: target.into(),
            },
        )
    }

    #[inline]
    #[must_use]
    pub fn with_radius(mut self, radius: Float) -> Self {
        self.radius = radius;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_intensity(mut self, intensity: Float) -> Self {
        self.intensity = intensity;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
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

    #[must_use]
    pub const fn render_style(&self) -> RenderStyle {
        match self.kind {
            LightKind::Radial | LightKind::Conic { .. } => RenderStyle::Fill,
            LightKind::Line { .. } => RenderStyle::Stroke,
        }
    }

    /// How far this light's rays travel, reflections included.
    ///
    /// A line light's budget is its unreflected length.
    #[must_use]
    pub fn max_distance(&self) -> Float {
        match self.kind {
            LightKind::Line { target } => (target - self.origin).norm(),
            LightKind::Radial | LightKind::Conic { .. } => self.radius,
        }
    }

    /// The rays approximating this light's emission shape, in angular order.
    #[must_use]
    pub fn rays(&self, config: &TraceConfig) -> Vec<Ray> {
        match self.kind {
            LightKind::Radial => radial_rays(self.origin, config.radial_rays),
            LightKind::Conic { target, cone_angle } => {
                conic_rays(self.origin, target, cone_angle, config.conic_rays)
            }
            LightKind::Line { target } => vec![Ray::towards(self.origin, target)],
        }
    }
}

fn radial_rays(origin: Point, n: usize) -> Vec<Ray> {
    (0..n)
        .map(|i| Ray::new(origin, from_angle(TAU * i as Float / n as Float)))
        .collect()
}

/// Spreads `n` rays over `[base - half_cone, base + half_cone]`, both ends included.
/// A single ray goes straight at the target.
///
/// A light aimed at itself has no direction: it gets a single degenerate ray.
fn conic_rays(origin: Point, target: Point, cone_angle: Float, n: usize) -> Vec<Ray> {
    let aim = target - origin;

    if geometry::is_zero(&normalize(&aim)) {
        return vec![Ray::new(origin, Point::zeros())];
    }

    let base_angle = aim.y.atan2(aim.x);

    if n == 1 {
        return vec![Ray::new(origin, from_angle(base_angle))];
    }

    let half_cone = cone_angle * PI / 360.0;
    let last = n.saturating_sub(1) as Float;

    (0..n)
        .map(|i| {
            let angle = base_angle - half_cone + 2.0 * half_cone * (i as Float / last);
            Ray::new(origin, from_angle(angle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Point, b: &Point) {
        assert!((a - b).norm() < 1e-9, "{a:?} != {b:?}");
    }

    #[test_log::test]
    fn parses_colors() {
        assert_eq!("#ffffff".parse::<Color>(), Ok(Color::WHITE));
        assert_eq!("#FF8000".parse::<Color>(), Ok(Color::rgb(0xff, 0x80, 0x00)));
        assert_eq!(
            "#10203040".parse::<Color>(),
            Ok(Color::rgba(0x10, 0x20, 0x30, 0x40))
        );
    }

    #[test_log::test]
    fn rejects_bad_colors() {
        assert_eq!(
            "ffffff".parse::<Color>(),
            Err(ColorError::MissingHash("ffffff".into()))
        );
        assert_eq!(
            "#fff".parse::<Color>(),
            Err(ColorError::InvalidLength("#fff".into()))
        );
        assert_eq!(
            "#+fffff".parse::<Color>(),
            Err(ColorError::InvalidDigit("#+fffff".into()))
        );
        assert_eq!(
            "#gggggg".parse::<Color>(),
            Err(ColorError::InvalidDigit("#gggggg".into()))
        );
    }

    #[test_log::test]
    fn displays_colors() {
        assert_eq!(Color::rgb(0xab, 0x01, 0xff).to_string(), "#ab01ff");
        assert_eq!(Color::rgba(0, 0, 0, 0x80).to_string(), "#00000080");
    }

    #[test_log::test]
    fn radial_rays_cover_the_circle() {
        let light = Light::radial("r", [5.0, 5.0]);
        let config = TraceConfig::default().with_radial_rays(4);
        let rays = light.rays(&config);

        assert_eq!(rays.len(), 4);
        assert_close(&rays[0].direction, &Point::new(1.0, 0.0));
        assert_close(&rays[1].direction, &Point::new(0.0, 1.0));
        assert_close(&rays[2].direction, &Point::new(-1.0, 0.0));
        assert_close(&rays[3].direction, &Point::new(0.0, -1.0));
        assert!(rays.iter().all(|ray| ray.origin == Point::new(5.0, 5.0)));
    }

    #[test_log::test]
    fn conic_rays_include_both_edges() {
        let light = Light::conic("c", [0.0, 0.0], [0.0, 10.0], 90.0);
        let config = TraceConfig::default().with_conic_rays(3);
        let rays = light.rays(&config);

        let h = core::f64::consts::FRAC_1_SQRT_2;
        assert_eq!(rays.len(), 3);
        assert_close(&rays[0].direction, &Point::new(h, h));
        assert_close(&rays[1].direction, &Point::new(0.0, 1.0));
        assert_close(&rays[2].direction, &Point::new(-h, h));
    }

    #[test_log::test]
    fn single_conic_ray_follows_the_aim() {
        let light = Light::conic("c", [1.0, 1.0], [1.0, 11.0], 90.0);
        let config = TraceConfig {
            conic_rays: 1,
            ..TraceConfig::default()
        };

        let rays = light.rays(&config);
        assert_eq!(rays.len(), 1);
        assert_close(&rays[0].direction, &Point::new(0.0, 1.0));

        let config = TraceConfig {
            conic_rays: 0,
            ..TraceConfig::default()
        };
        assert!(light.rays(&config).is_empty());
    }

    #[test_log::test]
    fn conic_aimed_at_itself_is_degenerate() {
        let light = Light::conic("c", [1.0, 1.0], [1.0, 1.0], 45.0);
        let rays = light.rays(&TraceConfig::default());
        assert_eq!(rays.len(), 1);
        assert!(rays[0].is_degenerate());
    }

    #[test_log::test]
    fn line_light_emits_one_ray() {
        let light = Light::line("l", [0.0, 0.0], [0.0, -30.0]).with_radius(4.0);
        let rays = light.rays(&TraceConfig::default());

        assert_eq!(rays, vec![Ray::new([0.0, 0.0], [0.0, -1.0])]);
        assert_eq!(light.max_distance(), 30.0);
        assert_eq!(light.render_style(), RenderStyle::Stroke);
    }

    #[test_log::test]
    fn area_lights_reach_their_radius() {
        let radial = Light::radial("r", [0.0, 0.0]).with_radius(120.0);
        let conic = Light::conic("c", [0.0, 0.0], [1.0, 0.0], 30.0).with_radius(80.0);

        assert_eq!(radial.max_distance(), 120.0);
        assert_eq!(conic.max_distance(), 80.0);
        assert_eq!(radial.render_style(), RenderStyle::Fill);
        assert_eq!(conic.render_style(), RenderStyle::Fill);
    }

    #[test_log::test]
    fn kind_names_and_targets() {
        assert_eq!(LightKind::Radial.name(), "radial");
        assert_eq!(LightKind::Radial.target(), None);

        let line = LightKind::Line {
            target: Point::new(1.0, 2.0),
        };
        assert_eq!(line.name(), "line");
        assert_eq!(line.target(), Some(&Point::new(1.0, 2.0)));
    }
}
