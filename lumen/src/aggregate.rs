use super::*;

use indexmap::IndexMap;
use log::debug;

/// Everything a renderer needs to draw one light.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightReflectionData {
    /// Every leg but the first, of every ray
    pub reflection_segments: Vec<RaySegment>,
    /// Every leg of every ray, grouped by ray, in emission order
    pub all_segments: Vec<RaySegment>,
    /// Whether any ray bounced at least once
    pub has_reflections: bool,
    /// The end of each ray's first leg, in emission order.
    ///
    /// A closed loop (the last vertex connects back to the first) bounding the
    /// unreflected lit area, already wound for a fan fill around the light's
    /// origin.
    pub primary_polygon: Vec<Point>,
}

/// The segment-only shape, for renderers stroking beams.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BeamData {
    pub all_segments: Vec<RaySegment>,
    pub has_reflections: bool,
}

/// Per-light results, in the order the lights were given.
pub type ReflectionMap = IndexMap<String, LightReflectionData>;
pub type BeamMap = IndexMap<String, BeamData>;

/// A light's geometry, in the shape its [`RenderStyle`] asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightShape<'a> {
    Fill {
        center: Point,
        polygon: &'a [Point],
        reflections: &'a [RaySegment],
    },
    Stroke {
        half_width: Float,
        segments: &'a [RaySegment],
    },
}

impl LightReflectionData {
    #[inline]
    #[must_use]
    pub fn into_beam(self) -> BeamData {
        BeamData {
            all_segments: self.all_segments,
            has_reflections: self.has_reflections,
        }
    }

    /// `light` must be the light this data was computed for
    #[must_use]
    pub fn shape<'a>(&'a self, light: &Light) -> LightShape<'a> {
        match light.render_style() {
            RenderStyle::Fill => LightShape::Fill {
                center: light.origin,
                polygon: &self.primary_polygon,
                reflections: &self.reflection_segments,
            },
            RenderStyle::Stroke => LightShape::Stroke {
                half_width: light.radius,
                segments: &self.all_segments,
            },
        }
    }
}

/// Traces every ray `light` emits through `mirrors`.
///
/// Hidden lights get an empty entry, and so do lights too dim to pass
/// `config.min_intensity`. Each ray's distance budget is
/// [`Light::max_distance`], whatever `config.max_distance` says.
#[must_use]
pub fn reflect_light<M: Reflector + ?Sized>(
    light: &Light,
    mirrors: &M,
    config: &TraceConfig,
) -> LightReflectionData {
    let mut data = LightReflectionData::default();

    if light.hidden {
        return data;
    }

    let max_distance = light.max_distance();

    for ray in light.rays(config) {
        let mut path = RayPath::new(mirrors, ray, max_distance, light.intensity, config);

        if let Some(primary) = path.next() {
            data.primary_polygon.push(primary.end);
            data.all_segments.push(primary);
        }

        for segment in path {
            data.reflection_segments.push(segment);
            data.all_segments.push(segment);
        }
    }

    data.has_reflections = !data.reflection_segments.is_empty();
    data
}

/// Computes the reflection data of every light, hidden ones included.
///
/// Lights sharing an id share an entry: the last one wins, at the position of
/// the first.
#[must_use]
pub fn reflection_data<M: Reflector + ?Sized>(
    lights: &[Light],
    mirrors: &M,
    config: &TraceConfig,
) -> ReflectionMap {
    debug!("computing reflections for {} lights", lights.len());

    lights
        .iter()
        .map(|light| (light.id.clone(), reflect_light(light, mirrors, config)))
        .collect()
}

/// Like [`reflection_data`], without the polygon and reflection-only segments.
#[must_use]
pub fn reflect_beams<M: Reflector + ?Sized>(
    lights: &[Light],
    mirrors: &M,
    config: &TraceConfig,
) -> BeamMap {
    debug!("computing beams for {} lights", lights.len());

    lights
        .iter()
        .map(|light| {
            let beam = reflect_light(light, mirrors, config).into_beam();
            (light.id.clone(), beam)
        })
        .collect()
}
