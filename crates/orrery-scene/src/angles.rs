//! Per-frame angle bookkeeping for spinning, orbiting bodies.

use crate::scene::Scene;

/// Spin and orbit angles for one body, in degrees, each kept in [0, 360).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyAngles {
    pub spin_deg: f32,
    pub orbit_deg: f32,
}

/// Per-body increments applied on every [`AngleState::advance`].
#[derive(Clone, Copy, Debug)]
struct BodyRates {
    spin_deg: f32,
    orbit_deg: f32,
}

/// Owns every animated angle in the scene and steps them forward one frame
/// at a time by the fixed per-body increments captured at construction.
///
/// The contract is exactly one [`advance`](Self::advance) per rendered
/// frame: angular speed is coupled to the frame rate, not to the wall
/// clock. Call [`snapshot`](Self::snapshot) before advancing so the frame
/// renders the pre-advance pose.
#[derive(Clone, Debug)]
pub struct AngleState {
    angles: Vec<BodyAngles>,
    rates: Vec<BodyRates>,
}

impl AngleState {
    /// All angles start at zero; rates come from the scene's body table.
    pub fn new(scene: &Scene) -> Self {
        let rates = scene
            .bodies()
            .iter()
            .map(|body| BodyRates {
                spin_deg: body.spin_rate_deg,
                orbit_deg: body.orbit_rate_deg,
            })
            .collect::<Vec<_>>();
        Self {
            angles: vec![BodyAngles::default(); rates.len()],
            rates,
        }
    }

    /// Adds each body's fixed increments and wraps back into [0, 360).
    ///
    /// Wrapping is a numeric safeguard, not a behavioral requirement —
    /// rotations are periodic — but it keeps the values bounded over
    /// arbitrarily long sessions.
    pub fn advance(&mut self) {
        for (angles, rates) in self.angles.iter_mut().zip(&self.rates) {
            angles.spin_deg = wrap_deg(angles.spin_deg + rates.spin_deg);
            angles.orbit_deg = wrap_deg(angles.orbit_deg + rates.orbit_deg);
        }
    }

    /// The current angles, indexed like the scene's body table.
    pub fn snapshot(&self) -> &[BodyAngles] {
        &self.angles
    }
}

/// Reduces an angle in degrees to [0, 360).
fn wrap_deg(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative input can round up to the modulus
    // itself in f32; fold that back to zero.
    if wrapped >= 360.0 { wrapped - 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodySpec, OrbitStyle};
    use glam::Vec3;

    /// Single-body scene with the given per-frame rates.
    fn rate_scene(spin_rate_deg: f32, orbit_rate_deg: f32) -> Scene {
        Scene::new(vec![BodySpec {
            name: "probe".into(),
            parent: None,
            scale: 1.0,
            orbit_radius: 0.0,
            orbit_axis: Vec3::Y,
            orbit_style: OrbitStyle::Swept,
            spin_axis: Vec3::Y,
            spin_rate_deg,
            orbit_rate_deg,
            color: [1.0, 1.0, 1.0],
            emissive: false,
        }])
        .unwrap()
    }

    /// Distance between two angles on the circle, in degrees.
    fn modular_distance_deg(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_angles_stay_wrapped_for_any_increment_sign() {
        for (spin_rate, orbit_rate) in [(1.0, 0.5), (359.9, 0.9), (725.0, -0.9), (-1.5, -400.0)] {
            let mut state = AngleState::new(&rate_scene(spin_rate, orbit_rate));
            for frame in 0..2000 {
                state.advance();
                let angles = state.snapshot()[0];
                for value in [angles.spin_deg, angles.orbit_deg] {
                    assert!(
                        (0.0..360.0).contains(&value),
                        "rates ({spin_rate}, {orbit_rate}): angle {value} escaped at frame {frame}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_full_period_returns_to_start() {
        // 0.5°/frame has an exact binary representation, so 720 frames must
        // land back on zero with no tolerance at all.
        let mut state = AngleState::new(&rate_scene(0.0, 0.5));
        for _ in 0..720 {
            state.advance();
        }
        assert_eq!(state.snapshot()[0].orbit_deg, 0.0);

        // 0.9°/frame accumulates rounding; 400 frames is one period within
        // a loose modular tolerance.
        let mut state = AngleState::new(&rate_scene(0.9, 0.0));
        for _ in 0..400 {
            state.advance();
        }
        let spin = state.snapshot()[0].spin_deg;
        assert!(
            modular_distance_deg(spin, 0.0) < 1e-2,
            "spin after one period: {spin}"
        );
    }

    #[test]
    fn test_speed_follows_call_count_not_time() {
        // Two advances produce exactly double the delta of one: playback
        // speed is coupled to the frame rate by design.
        let scene = rate_scene(1.0, 0.5);
        let mut once = AngleState::new(&scene);
        once.advance();
        let mut twice = AngleState::new(&scene);
        twice.advance();
        twice.advance();
        assert_eq!(once.snapshot()[0].spin_deg, 1.0);
        assert_eq!(twice.snapshot()[0].spin_deg, 2.0);
        assert_eq!(once.snapshot()[0].orbit_deg * 2.0, twice.snapshot()[0].orbit_deg);
    }

    #[test]
    fn test_snapshot_reads_do_not_mutate() {
        let mut state = AngleState::new(&rate_scene(1.0, 0.5));
        state.advance();
        let before = state.snapshot().to_vec();
        let again = state.snapshot().to_vec();
        assert_eq!(before, again);
        state.advance();
        let after = state.snapshot()[0];
        assert_eq!(before[0].spin_deg + 1.0, after.spin_deg);
    }

    #[test]
    fn test_zero_rate_body_never_moves() {
        let mut state = AngleState::new(&rate_scene(0.0, 0.0));
        for _ in 0..500 {
            state.advance();
        }
        assert_eq!(state.snapshot()[0], BodyAngles::default());
    }
}
