//! JSON (de)serialization of scenes, trace configurations, and reflection results.
//!
//! Lights and mirrors use the flat, camelCase layout of the scene store:
//!
//! ```json
//! {
//!     "lights": [
//!         { "id": "torch", "type": "radial", "x": 0, "y": 0, "radius": 300, "intensity": 1 },
//!         { "id": "lamp", "type": "conic", "x": 0, "y": 0, "radius": 300,
//!           "targetX": 10, "targetY": 0, "coneAngle": 60 },
//!         { "id": "laser", "type": "line", "x": 0, "y": 0, "radius": 4,
//!           "targetX": 100, "targetY": 0 }
//!     ],
//!     "mirrors": [
//!         { "id": "m", "x1": 150, "y1": -50, "x2": 150, "y2": 50 }
//!     ],
//!     "config": { "radialRays": 128, "conicRays": 64 }
//! }
//! ```

use lumen::{indexmap::IndexMap, *};
use std::io;
use thiserror::Error;

pub use serde_json;
use serde_json::{json, Value};

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("expected a JSON array")]
    NotAnArray,
    #[error("unknown light type `{0}`")]
    UnknownLightType(String),
    #[error("item {index}: {source}")]
    At { index: usize, source: Box<Error> },
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

fn object(json: &Value) -> Result<&serde_json::Map<String, Value>> {
    json.as_object().ok_or(Error::NotAnObject)
}

/// `null` counts as absent
fn optional<'a>(json: &'a Value, field: &'static str) -> Option<&'a Value> {
    json.get(field).filter(|v| !v.is_null())
}

fn required<'a>(json: &'a Value, field: &'static str) -> Result<&'a Value> {
    optional(json, field).ok_or(Error::MissingField(field))
}

fn as_float(value: &Value, field: &'static str) -> Result<Float> {
    value.as_f64().ok_or(Error::InvalidField {
        field,
        expected: "a number",
    })
}

fn float(json: &Value, field: &'static str) -> Result<Float> {
    as_float(required(json, field)?, field)
}

fn float_or(json: &Value, field: &'static str, default: Float) -> Result<Float> {
    optional(json, field).map_or(Ok(default), |v| as_float(v, field))
}

fn bool_or(json: &Value, field: &'static str, default: bool) -> Result<bool> {
    optional(json, field).map_or(Ok(default), |v| {
        v.as_bool().ok_or(Error::InvalidField {
            field,
            expected: "a boolean",
        })
    })
}

fn usize_or(json: &Value, field: &'static str, default: usize) -> Result<usize> {
    optional(json, field).map_or(Ok(default), |v| {
        v.as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(Error::InvalidField {
                field,
                expected: "a non-negative integer",
            })
    })
}

fn string<'a>(json: &'a Value, field: &'static str) -> Result<&'a str> {
    required(json, field)?.as_str().ok_or(Error::InvalidField {
        field,
        expected: "a string",
    })
}

fn point(json: &Value, x: &'static str, y: &'static str) -> Result<Point> {
    Ok(Point::new(float(json, x)?, float(json, y)?))
}

/// Applies `map` to every element of the JSON array `json`, reporting the
/// index of the first element that fails.
pub fn map_json_array<C: FromIterator<T>, T>(
    json: &Value,
    mut map: impl FnMut(&Value) -> Result<T>,
) -> Result<C> {
    json.as_array()
        .ok_or(Error::NotAnArray)?
        .iter()
        .enumerate()
        .map(|(index, value)| {
            map(value).map_err(|e| Error::At {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(T::to_json).collect())
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}

/// Keys keep their order
impl<T: JsonSer> JsonSer for IndexMap<String, T> {
    fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(id, value)| (id.clone(), value.to_json()))
                .collect(),
        )
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s layout or values are invalid.
    fn from_json(json: &Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &Value) -> Result<Self> {
        map_json_array(json, T::from_json)
    }
}

impl JsonSer for Point {
    fn to_json(&self) -> Value {
        json!({ "x": self.x, "y": self.y })
    }
}

impl JsonDes for Point {
    /// `{ "x": 1.0, "y": 2.0 }`
    fn from_json(json: &Value) -> Result<Self> {
        object(json)?;
        point(json, "x", "y")
    }
}

impl JsonSer for RaySegment {
    fn to_json(&self) -> Value {
        json!({
            "start": self.start.to_json(),
            "end": self.end.to_json(),
        })
    }
}

impl JsonSer for Light {
    fn to_json(&self) -> Value {
        let mut json = json!({
            "id": self.id,
            "type": self.kind.name(),
            "x": self.origin.x,
            "y": self.origin.y,
            "radius": self.radius,
            "color": self.color.to_string(),
            "intensity": self.intensity,
            "locked": self.locked,
            "hidden": self.hidden,
        });

        if let LightKind::Conic { cone_angle, .. } = self.kind {
            json["coneAngle"] = json!(cone_angle);
        }

        if let Some(target) = self.kind.target() {
            json["targetX"] = json!(target.x);
            json["targetY"] = json!(target.y);
        }

        json
    }
}

impl JsonDes for Light {
    /// Deserialize and validate a light.
    ///
    /// `intensity` defaults to 1, `coneAngle` to 60, `color` to `#ffffff`,
    /// `locked` and `hidden` to `false`.
    fn from_json(json: &Value) -> Result<Self> {
        object(json)?;

        let target = || point(json, "targetX", "targetY");

        let kind = match string(json, "type")? {
            "radial" => LightKind::Radial,
            "conic" => LightKind::Conic {
                target: target()?,
                cone_angle: float_or(json, "coneAngle", DEFAULT_CONE_ANGLE)?,
            },
            "line" => LightKind::Line { target: target()? },
            other => return Err(Error::UnknownLightType(other.into())),
        };

        let color = match optional(json, "color") {
            Some(value) => value
                .as_str()
                .ok_or(Error::InvalidField {
                    field: "color",
                    expected: "a string",
                })?
                .parse()?,
            None => Color::WHITE,
        };

        let light = Light {
            id: string(json, "id")?.into(),
            origin: point(json, "x", "y")?,
            radius: float(json, "radius")?,
            intensity: float_or(json, "intensity", DEFAULT_LIGHT_INTENSITY)?,
            color,
            hidden: bool_or(json, "hidden", false)?,
            locked: bool_or(json, "locked", false)?,
            kind,
        };

        light.validate()?;
        Ok(light)
    }
}

impl JsonSer for Mirror {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "x1": self.start.x,
            "y1": self.start.y,
            "x2": self.end.x,
            "y2": self.end.y,
            "locked": self.locked,
            "fixedWidth": self.fixed_width,
            "hidden": self.hidden,
        })
    }
}

impl JsonDes for Mirror {
    /// Deserialize and validate a mirror. Flags default to `false`.
    fn from_json(json: &Value) -> Result<Self> {
        object(json)?;

        let mirror = Mirror {
            id: string(json, "id")?.into(),
            start: point(json, "x1", "y1")?,
            end: point(json, "x2", "y2")?,
            hidden: bool_or(json, "hidden", false)?,
            locked: bool_or(json, "locked", false)?,
            fixed_width: bool_or(json, "fixedWidth", false)?,
        };

        mirror.validate()?;
        Ok(mirror)
    }
}

impl JsonSer for Scene {
    fn to_json(&self) -> Value {
        json!({
            "lights": self.lights.to_json(),
            "mirrors": self.mirrors.to_json(),
        })
    }
}

impl JsonDes for Scene {
    /// Deserialize and validate a scene. Missing collections are empty.
    fn from_json(json: &Value) -> Result<Self> {
        object(json)?;

        let collection = |field: &'static str| -> Result<Value> {
            Ok(optional(json, field).cloned().unwrap_or(json!([])))
        };

        let scene = Scene {
            lights: Vec::from_json(&collection("lights")?)?,
            mirrors: Vec::from_json(&collection("mirrors")?)?,
        };

        scene.validate()?;
        Ok(scene)
    }
}

impl JsonSer for TraceConfig {
    fn to_json(&self) -> Value {
        json!({
            "radialRays": self.radial_rays,
            "conicRays": self.conic_rays,
            "maxBounces": self.max_bounces,
            "maxDistance": self.max_distance,
            "minIntensity": self.min_intensity,
            "decay": self.decay,
        })
    }
}

impl JsonDes for TraceConfig {
    /// Every field is optional and falls back to [`TraceConfig::default`].
    fn from_json(json: &Value) -> Result<Self> {
        object(json)?;

        let default = TraceConfig::default();

        let config = TraceConfig {
            radial_rays: usize_or(json, "radialRays", default.radial_rays)?,
            conic_rays: usize_or(json, "conicRays", default.conic_rays)?,
            max_bounces: usize_or(json, "maxBounces", default.max_bounces)?,
            max_distance: float_or(json, "maxDistance", default.max_distance)?,
            min_intensity: float_or(json, "minIntensity", default.min_intensity)?,
            decay: float_or(json, "decay", default.decay)?,
        };

        config.validate()?;
        Ok(config)
    }
}

impl JsonSer for LightReflectionData {
    fn to_json(&self) -> Value {
        json!({
            "reflectionSegments": self.reflection_segments.to_json(),
            "allSegments": self.all_segments.to_json(),
            "hasReflections": self.has_reflections,
            "primaryPolygon": self.primary_polygon.to_json(),
        })
    }
}

impl JsonSer for BeamData {
    fn to_json(&self) -> Value {
        json!({
            "allSegments": self.all_segments.to_json(),
            "hasReflections": self.has_reflections,
        })
    }
}

/// The layout described in the crate docs. `config` is left out if `None`.
pub fn serialize_scene(scene: &Scene, config: Option<&TraceConfig>) -> Value {
    let mut json = scene.to_json();
    if let Some(config) = config {
        json["config"] = config.to_json();
    }
    json
}

/// Returns the scene, and its trace configuration if it has one, the default one otherwise.
pub fn deserialize_scene(json: &Value) -> Result<(Scene, TraceConfig)> {
    let scene = Scene::from_json(json)?;

    let config = optional(json, "config")
        .map(TraceConfig::from_json)
        .transpose()?
        .unwrap_or_default();

    Ok((scene, config))
}

pub fn read_scene(reader: impl io::Read) -> Result<(Scene, TraceConfig)> {
    let json: Value = serde_json::from_reader(reader)?;
    deserialize_scene(&json)
}
