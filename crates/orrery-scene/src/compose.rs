//! Hierarchical transform composition.
//!
//! Turns a validated [`Scene`] plus the current [`BodyAngles`] into one
//! world matrix per body. Pure math, no GPU types, fully testable headless.
//!
//! Conventions: rotations are right-handed (glam), matrices compose
//! right-to-left, angles arrive in degrees. With an orbit axis of +Y, a
//! body resting at `(r, 0, 0)` sweeps to `(0, 0, -r)` at an orbit angle
//! of 90°.

use glam::{Mat4, Quat, Vec3};

use crate::angles::BodyAngles;
use crate::body::{BodySpec, OrbitStyle};
use crate::scene::Scene;

/// Composes the world transform of every body, parents before children.
///
/// Each body contributes an attachment transform mapping its local orbital
/// frame into the parent's:
///
/// - [`OrbitStyle::Swept`]: `Rotate(orbit, orbit_axis) · Translate(r, 0, 0)`
/// - [`OrbitStyle::Planar`]: `Translate(r·cos(orbit), 0, r·sin(orbit))`
///
/// Attachment frames multiply down the parent chain, and the body's own
/// spin and scale apply last:
///
/// ```text
/// world(i) = attach(root) · … · attach(i)
/// model(i) = world(i) · Rotate(spin, spin_axis) · Scale(scale)
/// ```
///
/// For the built-in three-body scene this reduces to the classic pair of
/// formulas: the planet is `Rotate(orbit) · Translate(r_p, 0, 0)` and the
/// moon, riding the same revolution frame, is
/// `Rotate(orbit_p) · Translate(r_p + r_m·cos θ, 0, r_m·sin θ)`.
///
/// Returned matrices are indexed like `scene.bodies()`.
pub fn world_transforms(scene: &Scene, angles: &[BodyAngles]) -> Vec<Mat4> {
    debug_assert_eq!(scene.len(), angles.len(), "one angle pair per body");

    let bodies = scene.bodies();
    // Attachment frames are kept for children to build on; parents precede
    // children, so one forward pass visits every body after its parent.
    let mut frames: Vec<Mat4> = Vec::with_capacity(bodies.len());
    let mut models: Vec<Mat4> = Vec::with_capacity(bodies.len());

    for (body, body_angles) in bodies.iter().zip(angles) {
        let frame = match body.parent {
            None => Mat4::IDENTITY,
            Some(parent) => frames[parent] * attachment(body, body_angles.orbit_deg),
        };

        let spin = Mat4::from_axis_angle(body.spin_axis, body_angles.spin_deg.to_radians());
        models.push(frame * spin * Mat4::from_scale(Vec3::splat(body.scale)));
        frames.push(frame);
    }

    models
}

/// The transform placing a body's orbital frame inside its parent's.
fn attachment(body: &BodySpec, orbit_deg: f32) -> Mat4 {
    let orbit_rad = orbit_deg.to_radians();
    match body.orbit_style {
        OrbitStyle::Swept => {
            Mat4::from_axis_angle(body.orbit_axis, orbit_rad)
                * Mat4::from_translation(Vec3::new(body.orbit_radius, 0.0, 0.0))
        }
        OrbitStyle::Planar => Mat4::from_translation(Vec3::new(
            body.orbit_radius * orbit_rad.cos(),
            0.0,
            body.orbit_radius * orbit_rad.sin(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    /// Angle table for the solar scene: sun fixed, planet and moon as given.
    fn solar_angles(
        planet_spin: f32,
        planet_orbit: f32,
        moon_spin: f32,
        moon_orbit: f32,
    ) -> Vec<BodyAngles> {
        vec![
            BodyAngles::default(),
            BodyAngles {
                spin_deg: planet_spin,
                orbit_deg: planet_orbit,
            },
            BodyAngles {
                spin_deg: moon_spin,
                orbit_deg: moon_orbit,
            },
        ]
    }

    fn position_of(transform: Mat4) -> Vec3 {
        transform.w_axis.truncate()
    }

    #[test]
    fn test_central_body_is_pure_scale_for_any_angles() {
        let scene = Scene::solar_system();
        let expected = Mat4::from_scale(Vec3::splat(scene.bodies()[0].scale));
        for angles in [
            solar_angles(0.0, 0.0, 0.0, 0.0),
            solar_angles(13.0, 290.5, 181.25, 359.9),
            solar_angles(90.0, 45.0, 270.0, 120.0),
        ] {
            let transforms = world_transforms(&scene, &angles);
            assert!(
                transforms[0].abs_diff_eq(expected, EPS),
                "sun transform drifted: {:?}",
                transforms[0]
            );
        }
    }

    #[test]
    fn test_primary_holds_orbit_radius_at_every_angle() {
        let scene = Scene::solar_system();
        let radius = scene.bodies()[1].orbit_radius;
        for step in 0..48 {
            let orbit = step as f32 * 7.5;
            let transforms = world_transforms(&scene, &solar_angles(33.0, orbit, 0.0, 0.0));
            let distance = position_of(transforms[1]).length();
            assert!(
                (distance - radius).abs() < EPS,
                "at orbit {orbit}: distance {distance}, want {radius}"
            );
        }
    }

    #[test]
    fn test_primary_cardinal_positions_follow_right_handed_sweep() {
        // Right-handed rotation about +Y carries +X toward -Z.
        let scene = Scene::solar_system();
        let r = scene.bodies()[1].orbit_radius;
        let cases = [
            (0.0, Vec3::new(r, 0.0, 0.0)),
            (90.0, Vec3::new(0.0, 0.0, -r)),
            (180.0, Vec3::new(-r, 0.0, 0.0)),
            (270.0, Vec3::new(0.0, 0.0, r)),
        ];
        for (orbit, expected) in cases {
            let transforms = world_transforms(&scene, &solar_angles(0.0, orbit, 0.0, 0.0));
            let position = position_of(transforms[1]);
            assert!(
                position.abs_diff_eq(expected, EPS),
                "at orbit {orbit}: {position:?}, want {expected:?}"
            );
        }
    }

    #[test]
    fn test_secondary_traces_planar_circle_in_primary_frame() {
        let scene = Scene::solar_system();
        let planet = &scene.bodies()[1];
        let moon = &scene.bodies()[2];
        for planet_orbit in [0.0, 30.0, 117.0, 245.0] {
            for moon_orbit in [0.0, 45.0, 90.0, 200.0, 315.0] {
                let angles = solar_angles(12.0, planet_orbit, 77.0, moon_orbit);
                let transforms = world_transforms(&scene, &angles);
                // Undo the planet's revolution; the moon must sit on its
                // planar circle around the planet's resting spot.
                let unswept = Quat::from_axis_angle(
                    planet.orbit_axis,
                    planet_orbit.to_radians(),
                )
                .inverse()
                    * position_of(transforms[2]);
                let theta = moon_orbit.to_radians();
                let expected = Vec3::new(
                    planet.orbit_radius + moon.orbit_radius * theta.cos(),
                    0.0,
                    moon.orbit_radius * theta.sin(),
                );
                assert!(
                    unswept.abs_diff_eq(expected, EPS),
                    "planet {planet_orbit}°, moon {moon_orbit}°: {unswept:?}, want {expected:?}"
                );
            }
        }
    }

    #[test]
    fn test_spin_never_moves_a_body() {
        let scene = Scene::solar_system();
        let still = world_transforms(&scene, &solar_angles(0.0, 40.0, 0.0, 160.0));
        let spun = world_transforms(&scene, &solar_angles(123.0, 40.0, 305.0, 160.0));
        for index in 0..scene.len() {
            let a = position_of(still[index]);
            let b = position_of(spun[index]);
            assert!(
                a.abs_diff_eq(b, EPS),
                "body {index} moved under spin: {a:?} vs {b:?}"
            );
        }
    }

    #[test]
    fn test_swept_grandchild_orbits_its_parent() {
        // A fully swept chain keeps each child at its own radius from the
        // parent's world position, whatever the ancestors are doing.
        let body = |name: &str, parent, radius| BodySpec {
            name: name.into(),
            parent,
            scale: 1.0,
            orbit_radius: radius,
            orbit_axis: Vec3::Y,
            orbit_style: OrbitStyle::Swept,
            spin_axis: Vec3::Y,
            spin_rate_deg: 0.0,
            orbit_rate_deg: 0.0,
            color: [1.0, 1.0, 1.0],
            emissive: false,
        };
        let scene = Scene::new(vec![
            body("star", None, 0.0),
            body("inner", Some(0), 2.0),
            body("outer", Some(1), 0.75),
        ])
        .unwrap();

        for inner_orbit in [0.0, 50.0, 190.0] {
            for outer_orbit in [0.0, 66.0, 280.0] {
                let angles = vec![
                    BodyAngles::default(),
                    BodyAngles {
                        spin_deg: 0.0,
                        orbit_deg: inner_orbit,
                    },
                    BodyAngles {
                        spin_deg: 0.0,
                        orbit_deg: outer_orbit,
                    },
                ];
                let transforms = world_transforms(&scene, &angles);
                let separation =
                    (position_of(transforms[2]) - position_of(transforms[1])).length();
                assert!(
                    (separation - 0.75).abs() < EPS,
                    "inner {inner_orbit}°, outer {outer_orbit}°: separation {separation}"
                );
            }
        }
    }

    #[test]
    fn test_model_matrix_applies_scale_last() {
        // With all angles at zero a unit-mesh point lands at the orbit
        // position plus the scaled local offset: scale shrinks the mesh,
        // never the orbit.
        let scene = Scene::solar_system();
        let transforms = world_transforms(&scene, &solar_angles(0.0, 0.0, 0.0, 0.0));
        let planet = &scene.bodies()[1];
        let mapped = transforms[1].transform_point3(Vec3::new(1.0, 0.0, 0.0));
        let expected = Vec3::new(planet.orbit_radius + planet.scale, 0.0, 0.0);
        assert!(
            mapped.abs_diff_eq(expected, EPS),
            "{mapped:?} vs {expected:?}"
        );
    }
}
