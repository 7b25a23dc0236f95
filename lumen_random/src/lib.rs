use lumen::*;

use core::iter;
pub use rand;
use rand::Rng;

/// Half the side of the square random scenes are laid out in
pub const SCENE_HALF_EXTENT: Float = 1000.0;

pub trait Random: Sized {
    /// Generate a random instance of `Self` using the provided `rng`
    ///
    /// This method must not fail, and must produce valid values. If that
    /// takes more than one attempt, keep trying until success.
    fn random(rng: &mut (impl Rng + ?Sized)) -> Self;
}

impl Random for Color {
    fn random(rng: &mut (impl Rng + ?Sized)) -> Self {
        Self::rgb(rng.gen(), rng.gen(), rng.gen())
    }
}

impl Random for Ray {
    fn random(rng: &mut (impl Rng + ?Sized)) -> Self {
        let origin = rand_point(rng, SCENE_HALF_EXTENT);

        let direction = loop {
            let v = geometry::normalize(&rand_point(rng, 1.0));
            if !geometry::is_zero(&v) {
                break v;
            }
        };

        Self { origin, direction }
    }
}

impl Random for LightKind {
    fn random(rng: &mut (impl Rng + ?Sized)) -> Self {
        match rng.gen_range(0usize..3) {
            0 => Self::Radial,
            1 => Self::Conic {
                target: rand_point(rng, SCENE_HALF_EXTENT),
                cone_angle: rng.gen_range(1.0..=360.0),
            },
            2 => Self::Line {
                target: rand_point(rng, SCENE_HALF_EXTENT),
            },
            _ => unreachable!(),
        }
    }
}

impl Random for Light {
    /// The id is random too, [`random_scene`] replaces it with a unique one.
    fn random(rng: &mut (impl Rng + ?Sized)) -> Self {
        let kind = LightKind::random(rng);

        let radius = match kind {
            LightKind::Line { .. } => rng.gen_range(1.0..=10.0),
            LightKind::Radial | LightKind::Conic { .. } => {
                rng.gen_range(50.0..=DEFAULT_LIGHT_RADIUS * 2.0)
            }
        };

        Light::new(
            format!("light-{:08x}", rng.gen::<u32>()),
            rand_point(rng, SCENE_HALF_EXTENT),
            kind,
        )
        .with_radius(radius)
        .with_intensity(rng.gen_range(0.0..=1.0))
        .with_color(Color::random(rng))
        .with_hidden(rng.gen_bool(0.1))
    }
}

impl Random for Mirror {
    /// The id is random too, [`random_scene`] replaces it with a unique one.
    fn random(rng: &mut (impl Rng + ?Sized)) -> Self {
        let center = rand_point(rng, SCENE_HALF_EXTENT);
        let length = rng.gen_range(20.0..=DEFAULT_MIRROR_LENGTH * 2.0);
        let half = geometry::from_angle(rng.gen_range(0.0..core::f64::consts::PI)) * length / 2.0;

        Mirror::new(
            format!("mirror-{:08x}", rng.gen::<u32>()),
            center - half,
            center + half,
        )
        .with_fixed_width(rng.gen_bool(0.5))
        .with_hidden(rng.gen_bool(0.1))
    }
}

/// A scene of `num_lights` lights and `num_mirrors` mirrors, with ids
/// `light-0`, `light-1`, ... and `mirror-0`, `mirror-1`, ...
pub fn random_scene(
    rng: &mut (impl Rng + ?Sized),
    num_lights: usize,
    num_mirrors: usize,
) -> Scene {
    let lights = gen_random::<Light>(rng, num_lights)
        .into_iter()
        .enumerate()
        .map(|(i, light)| Light {
            id: format!("light-{i}"),
            ..light
        })
        .collect();

    let mirrors = gen_random::<Mirror>(rng, num_mirrors)
        .into_iter()
        .enumerate()
        .map(|(i, mirror)| Mirror {
            id: format!("mirror-{i}"),
            ..mirror
        })
        .collect();

    Scene::new(lights, mirrors)
}

pub fn gen_random<T: Random>(rng: &mut (impl Rng + ?Sized), n: usize) -> Vec<T> {
    iter::repeat_with(|| T::random(rng)).take(n).collect()
}

pub fn rand_point(rng: &mut (impl Rng + ?Sized), max_coord_mag: Float) -> Point {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly
    Point::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}
