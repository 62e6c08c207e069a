//! Validated body table and the default solar scene.

use glam::Vec3;
use thiserror::Error;

use crate::body::{BodySpec, OrbitStyle};

/// Axes shorter than this cannot be normalized meaningfully.
const MIN_AXIS_LENGTH: f32 = 1e-6;

/// Errors produced while validating a body table.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene has no bodies")]
    Empty,
    #[error("body {index} ({name}) references parent {parent}, which does not precede it")]
    ParentOrder {
        index: usize,
        name: String,
        parent: usize,
    },
    #[error("body {index} ({name}) has degenerate {which} axis {axis:?}")]
    DegenerateAxis {
        index: usize,
        name: String,
        which: &'static str,
        axis: Vec3,
    },
    #[error("body {index} ({name}) has invalid scale {scale}; must be finite and positive")]
    InvalidScale {
        index: usize,
        name: String,
        scale: f32,
    },
    #[error("body {index} ({name}) has invalid orbit radius {radius}")]
    InvalidRadius {
        index: usize,
        name: String,
        radius: f32,
    },
    #[error("root body {index} ({name}) must have orbit radius 0, got {radius}")]
    RootWithRadius {
        index: usize,
        name: String,
        radius: f32,
    },
}

/// An ordered, validated table of bodies.
///
/// Parents precede their children, so one forward pass over the table is
/// enough to compose every world transform. Construction normalizes the
/// spin and orbit axes; after [`Scene::new`] succeeds they are unit length.
#[derive(Clone, Debug)]
pub struct Scene {
    bodies: Vec<BodySpec>,
}

impl Scene {
    /// Validates and takes ownership of a body table.
    pub fn new(mut bodies: Vec<BodySpec>) -> Result<Self, SceneError> {
        if bodies.is_empty() {
            return Err(SceneError::Empty);
        }
        for index in 0..bodies.len() {
            let body = &bodies[index];
            if let Some(parent) = body.parent
                && parent >= index
            {
                return Err(SceneError::ParentOrder {
                    index,
                    name: body.name.clone(),
                    parent,
                });
            }
            if !body.scale.is_finite() || body.scale <= 0.0 {
                return Err(SceneError::InvalidScale {
                    index,
                    name: body.name.clone(),
                    scale: body.scale,
                });
            }
            if !body.orbit_radius.is_finite() || body.orbit_radius < 0.0 {
                return Err(SceneError::InvalidRadius {
                    index,
                    name: body.name.clone(),
                    radius: body.orbit_radius,
                });
            }
            if body.parent.is_none() && body.orbit_radius != 0.0 {
                return Err(SceneError::RootWithRadius {
                    index,
                    name: body.name.clone(),
                    radius: body.orbit_radius,
                });
            }
            for (which, axis) in [("spin", body.spin_axis), ("orbit", body.orbit_axis)] {
                if !axis.is_finite() || axis.length() < MIN_AXIS_LENGTH {
                    return Err(SceneError::DegenerateAxis {
                        index,
                        name: body.name.clone(),
                        which,
                        axis,
                    });
                }
            }
            let body = &mut bodies[index];
            body.spin_axis = body.spin_axis.normalize();
            body.orbit_axis = body.orbit_axis.normalize();
        }
        Ok(Self { bodies })
    }

    /// The validated bodies, parents before children.
    pub fn bodies(&self) -> &[BodySpec] {
        &self.bodies
    }

    /// Number of bodies in the table.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always false for a validated scene; [`Scene::new`] rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The built-in sun / planet / moon scene.
    ///
    /// Scales, radii, and per-frame rates follow the classic demo this
    /// renderer reproduces: the planet sweeps 0.5°/frame at radius 0.5 and
    /// spins 1°/frame about a tilted axis; the moon rides the planet's
    /// revolution frame on a planar circle of radius 0.1 at 0.9°/frame and
    /// spins 1.5°/frame. The sun holds still at the origin.
    pub fn solar_system() -> Self {
        let bodies = vec![
            BodySpec {
                name: "sun".into(),
                parent: None,
                scale: 0.05,
                orbit_radius: 0.0,
                orbit_axis: Vec3::Y,
                orbit_style: OrbitStyle::Swept,
                spin_axis: Vec3::Y,
                spin_rate_deg: 0.0,
                orbit_rate_deg: 0.0,
                color: [1.0, 0.85, 0.3],
                emissive: true,
            },
            BodySpec {
                name: "planet".into(),
                parent: Some(0),
                scale: 0.033,
                orbit_radius: 0.5,
                orbit_axis: Vec3::Y,
                orbit_style: OrbitStyle::Swept,
                spin_axis: Vec3::new(1.0, 1.0, 0.0),
                spin_rate_deg: 1.0,
                orbit_rate_deg: 0.5,
                color: [0.18, 0.35, 0.8],
                emissive: false,
            },
            BodySpec {
                name: "moon".into(),
                parent: Some(1),
                scale: 0.015,
                orbit_radius: 0.1,
                orbit_axis: Vec3::Y,
                orbit_style: OrbitStyle::Planar,
                spin_axis: Vec3::Y,
                spin_rate_deg: 1.5,
                orbit_rate_deg: 0.9,
                color: [0.62, 0.6, 0.58],
                emissive: false,
            },
        ];
        Self::new(bodies).expect("built-in scene is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_body(name: &str, parent: Option<usize>, orbit_radius: f32) -> BodySpec {
        BodySpec {
            name: name.into(),
            parent,
            scale: 1.0,
            orbit_radius,
            orbit_axis: Vec3::Y,
            orbit_style: OrbitStyle::Swept,
            spin_axis: Vec3::Y,
            spin_rate_deg: 0.0,
            orbit_rate_deg: 0.0,
            color: [1.0, 1.0, 1.0],
            emissive: false,
        }
    }

    #[test]
    fn test_solar_system_is_valid_and_ordered() {
        let scene = Scene::solar_system();
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.bodies()[0].parent, None);
        assert_eq!(scene.bodies()[1].parent, Some(0));
        assert_eq!(scene.bodies()[2].parent, Some(1));
    }

    #[test]
    fn test_validation_normalizes_axes() {
        let mut body = plain_body("tilted", None, 0.0);
        body.spin_axis = Vec3::new(1.0, 1.0, 0.0);
        let scene = Scene::new(vec![body]).unwrap();
        let len = scene.bodies()[0].spin_axis.length();
        assert!((len - 1.0).abs() < 1e-6, "axis length {len}");
    }

    #[test]
    fn test_empty_scene_rejected() {
        assert!(matches!(Scene::new(Vec::new()), Err(SceneError::Empty)));
    }

    #[test]
    fn test_forward_parent_reference_rejected() {
        let bodies = vec![plain_body("a", Some(1), 1.0), plain_body("b", None, 0.0)];
        assert!(matches!(
            Scene::new(bodies),
            Err(SceneError::ParentOrder { index: 0, .. })
        ));
    }

    #[test]
    fn test_self_parent_rejected() {
        let bodies = vec![plain_body("root", None, 0.0), plain_body("loop", Some(1), 1.0)];
        assert!(matches!(
            Scene::new(bodies),
            Err(SceneError::ParentOrder { index: 1, .. })
        ));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let mut body = plain_body("flat", None, 0.0);
        body.orbit_axis = Vec3::ZERO;
        assert!(matches!(
            Scene::new(vec![body]),
            Err(SceneError::DegenerateAxis { which: "orbit", .. })
        ));
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let mut body = plain_body("point", None, 0.0);
        body.scale = 0.0;
        assert!(matches!(
            Scene::new(vec![body]),
            Err(SceneError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_root_with_orbit_radius_rejected() {
        let body = plain_body("adrift", None, 0.25);
        assert!(matches!(
            Scene::new(vec![body]),
            Err(SceneError::RootWithRadius { .. })
        ));
    }
}
