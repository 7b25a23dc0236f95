use super::*;

use std::collections::HashSet;
use thiserror::Error;

/// A read-only snapshot of everything the engine traces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub lights: Vec<Light>,
    pub mirrors: Vec<Mirror>,
}

/// Data-model invariants a scene broke.
///
/// The engine doesn't check these: it is up to whoever builds the snapshot.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("{kind} id must not be empty")]
    EmptyId { kind: &'static str },
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} `{id}` has a non-finite coordinate")]
    NonFinite { kind: &'static str, id: String },
    #[error("light `{id}` must have a positive radius, got {radius}")]
    InvalidRadius { id: String, radius: Float },
    #[error("light `{id}` intensity must lie in [0, 1], got {intensity}")]
    InvalidIntensity { id: String, intensity: Float },
    #[error("light `{id}` cone angle must lie in [1, 360], got {cone_angle}")]
    InvalidConeAngle { id: String, cone_angle: Float },
}

fn finite(p: &Point) -> bool {
    p.iter().all(|c| c.is_finite())
}

impl Light {
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.id.is_empty() {
            return Err(SceneError::EmptyId { kind: "light" });
        }

        let target_finite = self.kind.target().map_or(true, finite);
        if !finite(&self.origin) || !target_finite {
            return Err(SceneError::NonFinite {
                kind: "light",
                id: self.id.clone(),
            });
        }

        // written so that NaN fails too
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(SceneError::InvalidRadius {
                id: self.id.clone(),
                radius: self.radius,
            });
        }

        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(SceneError::InvalidIntensity {
                id: self.id.clone(),
                intensity: self.intensity,
            });
        }

        if let LightKind::Conic { cone_angle, .. } = self.kind {
            if !(1.0..=360.0).contains(&cone_angle) {
                return Err(SceneError::InvalidConeAngle {
                    id: self.id.clone(),
                    cone_angle,
                });
            }
        }

        Ok(())
    }
}

impl Mirror {
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.id.is_empty() {
            return Err(SceneError::EmptyId { kind: "mirror" });
        }

        if !finite(&self.start) || !finite(&self.end) {
            return Err(SceneError::NonFinite {
                kind: "mirror",
                id: self.id.clone(),
            });
        }

        Ok(())
    }
}

impl Scene {
    #[inline]
    #[must_use]
    pub fn new(lights: Vec<Light>, mirrors: Vec<Mirror>) -> Self {
        Self { lights, mirrors }
    }

    /// Checks every light and mirror, and that ids are unique among lights and
    /// among mirrors. Returns the first problem found.
    pub fn validate(&self) -> Result<(), SceneError> {
        let mut ids = HashSet::new();
        for light in &self.lights {
            light.validate()?;
            if !ids.insert(light.id.as_str()) {
                return Err(SceneError::DuplicateId {
                    kind: "light",
                    id: light.id.clone(),
                });
            }
        }

        ids.clear();
        for mirror in &self.mirrors {
            mirror.validate()?;
            if !ids.insert(mirror.id.as_str()) {
                return Err(SceneError::DuplicateId {
                    kind: "mirror",
                    id: mirror.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// See [`reflection_data`]
    #[must_use]
    pub fn reflection_data(&self, config: &TraceConfig) -> ReflectionMap {
        reflection_data(&self.lights, self.mirrors.as_slice(), config)
    }

    /// See [`reflect_beams`]
    #[must_use]
    pub fn beams(&self, config: &TraceConfig) -> BeamMap {
        reflect_beams(&self.lights, self.mirrors.as_slice(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(
            vec![
                Light::radial("a", [0.0, 0.0]),
                Light::conic("b", [10.0, 0.0], [20.0, 0.0], 60.0),
                Light::line("c", [0.0, 10.0], [0.0, 20.0]),
            ],
            vec![
                Mirror::new("m1", [5.0, -5.0], [5.0, 5.0]),
                Mirror::new("m2", [-5.0, -5.0], [-5.0, 5.0]),
            ],
        )
    }

    #[test_log::test]
    fn valid_scene() {
        assert_eq!(scene().validate(), Ok(()));
    }

    #[test_log::test]
    fn light_and_mirror_ids_live_in_separate_namespaces() {
        let mut scene = scene();
        scene.mirrors[0].id = "a".into();
        assert_eq!(scene.validate(), Ok(()));
    }

    #[test_log::test]
    fn duplicate_ids() {
        let mut scene = scene();
        scene.lights[2].id = "a".into();
        assert_eq!(
            scene.validate(),
            Err(SceneError::DuplicateId {
                kind: "light",
                id: "a".into()
            })
        );

        let mut scene = self::scene();
        scene.mirrors[1].id = "m1".into();
        assert_eq!(
            scene.validate(),
            Err(SceneError::DuplicateId {
                kind: "mirror",
                id: "m1".into()
            })
        );
    }

    #[test_log::test]
    fn empty_ids() {
        let mut scene = scene();
        scene.mirrors[0].id.clear();
        assert_eq!(
            scene.validate(),
            Err(SceneError::EmptyId { kind: "mirror" })
        );
    }

    #[test_log::test]
    fn light_invariants() {
        let light = Light::radial("l", [0.0, 0.0]);

        assert!(matches!(
            light.clone().with_radius(0.0).validate(),
            Err(SceneError::InvalidRadius { .. })
        ));
        assert!(matches!(
            light.clone().with_radius(Float::NAN).validate(),
            Err(SceneError::InvalidRadius { .. })
        ));
        assert!(matches!(
            light.clone().with_intensity(1.5).validate(),
            Err(SceneError::InvalidIntensity { .. })
        ));
        assert!(matches!(
            Light::radial("l", [Float::INFINITY, 0.0]).validate(),
            Err(SceneError::NonFinite { kind: "light", .. })
        ));
        assert!(matches!(
            Light::line("l", [0.0, 0.0], [Float::NAN, 0.0]).validate(),
            Err(SceneError::NonFinite { kind: "light", .. })
        ));
        assert!(matches!(
            Light::conic("l", [0.0, 0.0], [1.0, 0.0], 0.5).validate(),
            Err(SceneError::InvalidConeAngle { .. })
        ));
        assert_eq!(
            Light::conic("l", [0.0, 0.0], [1.0, 0.0], 360.0).validate(),
            Ok(())
        );
    }

    #[test_log::test]
    fn scene_traces_every_light() {
        let scene = scene();
        let config = TraceConfig::default();

        let data = scene.reflection_data(&config);
        assert_eq!(
            data.keys().map(String::as_str).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );

        let beams = scene.beams(&config);
        assert_eq!(beams.len(), 3);
        assert_eq!(beams["c"].all_segments, data["c"].all_segments);
    }
}
