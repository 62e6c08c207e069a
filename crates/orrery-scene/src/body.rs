//! Static per-body placement and motion parameters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How a body's orbit angle enters its transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitStyle {
    /// The orbit angle rotates the body's whole attachment frame about the
    /// parent's origin before the radial translation. Children placed under
    /// this body inherit the sweep, and the body's spin axis rides it too.
    Swept,
    /// The orbit angle only displaces the body along a circle in the parent
    /// frame's XZ plane (`x = r·cos θ`, `z = r·sin θ`), introducing no new
    /// rotation. The body's orbital plane therefore tracks the parent's own
    /// revolution — the classic moon-follows-planet coupling.
    Planar,
}

/// Static placement and motion parameters for one body.
///
/// Built once at startup — from the config file or
/// [`Scene::solar_system`](crate::Scene::solar_system) — and never mutated
/// afterwards. Angles live in [`AngleState`](crate::AngleState), not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Display name, used in logs and GPU labels.
    pub name: String,
    /// Index of the parent body in the scene table, `None` for a root.
    /// Parents must precede their children.
    pub parent: Option<usize>,
    /// Uniform scale applied to the unit mesh.
    pub scale: f32,
    /// Distance from the parent's local origin. Must be zero for roots.
    pub orbit_radius: f32,
    /// Axis the body revolves about, in the parent frame. Only [`OrbitStyle::Swept`]
    /// orbits rotate about this axis; planar orbits lie in the parent
    /// frame's XZ plane regardless. Normalized during scene validation.
    pub orbit_axis: Vec3,
    /// How the orbit angle is applied.
    pub orbit_style: OrbitStyle,
    /// Axis the body spins about, in its own attachment frame. Normalized
    /// during scene validation.
    pub spin_axis: Vec3,
    /// Degrees added to the spin angle per frame.
    pub spin_rate_deg: f32,
    /// Degrees added to the orbit angle per frame.
    pub orbit_rate_deg: f32,
    /// Base color, linear RGB.
    pub color: [f32; 3],
    /// Emissive bodies are drawn unshaded (the sun lights itself).
    pub emissive: bool,
}
