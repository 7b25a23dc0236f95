use lumen::*;
use lumen_random::{
    rand::{rngs::StdRng, SeedableRng},
    *,
};

const SEED: u64 = 0x6c75_6d65_6e;

fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

#[test_log::test]
fn random_scenes_are_valid() {
    let mut rng = rng();
    for _ in 0..20 {
        assert_eq!(random_scene(&mut rng, 6, 16).validate(), Ok(()));
    }
}

#[test_log::test]
fn paths_respect_bounce_and_distance_bounds() {
    let mut rng = rng();
    let config = TraceConfig::default();
    let mirrors = gen_random::<Mirror>(&mut rng, 40);

    for _ in 0..500 {
        let ray = Ray::random(&mut rng);
        let segments = trace_ray(ray, mirrors.as_slice(), 1.0, &config);

        assert!(!segments.is_empty());
        assert!(segments.len() <= config.max_bounces);

        let total: Float = segments.iter().map(RaySegment::length).sum();
        assert!(total <= config.max_distance + 1e-6, "{total}");
    }
}

#[test_log::test]
fn consecutive_legs_are_chained() {
    let mut rng = rng();
    let config = TraceConfig::default();
    // a closed box keeps every ray bouncing
    let mirrors = [
        Mirror::new("bottom", [-20.0, -20.0], [20.0, -20.0]),
        Mirror::new("right", [20.0, -20.0], [20.0, 20.0]),
        Mirror::new("top", [20.0, 20.0], [-20.0, 20.0]),
        Mirror::new("left", [-20.0, 20.0], [-20.0, -20.0]),
    ];

    for _ in 0..100 {
        let ray = Ray::new(rand_point(&mut rng, 10.0), Ray::random(&mut rng).direction);
        let segments = trace_ray(ray, &mirrors, 1.0, &config);

        assert_eq!(segments.len(), config.max_bounces);
        for pair in segments.windows(2) {
            let gap = (pair[1].start - pair[0].end).norm();
            assert!((gap - SURFACE_OFFSET).abs() < 1e-9, "{gap}");
        }
    }
}

#[test_log::test]
fn tracing_is_deterministic() {
    let mut rng = rng();
    let scene = random_scene(&mut rng, 8, 24);
    let config = TraceConfig::default();

    assert_eq!(scene.reflection_data(&config), scene.reflection_data(&config));
    assert_eq!(scene.beams(&config), scene.beams(&config));
}

#[test_log::test]
fn hidden_mirrors_are_the_same_as_no_mirrors() {
    let mut rng = rng();
    let config = TraceConfig::default();
    let mut scene = random_scene(&mut rng, 8, 24);

    for mirror in &mut scene.mirrors {
        mirror.hidden = true;
    }
    let hidden = scene.reflection_data(&config);

    scene.mirrors.clear();
    assert_eq!(hidden, scene.reflection_data(&config));
}

#[test_log::test]
fn one_polygon_vertex_per_emitted_ray() {
    let mut rng = rng();
    let config = TraceConfig::default();
    let scene = random_scene(&mut rng, 12, 24);
    let data = scene.reflection_data(&config);

    for light in &scene.lights {
        let entry = &data[&light.id];
        let dark = light.hidden
            || light.intensity <= config.min_intensity
            || light.max_distance() <= 0.0;
        let expected = if dark { 0 } else { light.rays(&config).len() };

        assert_eq!(entry.primary_polygon.len(), expected, "{}", light.id);
        assert_eq!(
            entry.all_segments.len(),
            entry.primary_polygon.len() + entry.reflection_segments.len()
        );
        assert_eq!(entry.has_reflections, !entry.reflection_segments.is_empty());
    }
}

#[test_log::test]
fn reflection_preserves_length() {
    let mut rng = rng();

    for _ in 0..1000 {
        let direction = Ray::random(&mut rng).direction;
        let normal = Ray::random(&mut rng).direction;
        let reflected = reflect(&direction, &normal);

        assert!((reflected.norm() - direction.norm()).abs() < 1e-9);
        // reflecting twice gives the original direction back
        assert!((reflect(&reflected, &normal) - direction).norm() < 1e-9);
    }
}
