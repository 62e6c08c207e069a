//! Pure scene core: body parameters, angle state, and hierarchical
//! transform composition. No GPU types — everything here runs headless.

pub mod angles;
pub mod body;
pub mod compose;
pub mod scene;

pub use angles::{AngleState, BodyAngles};
pub use body::{BodySpec, OrbitStyle};
pub use compose::world_transforms;
pub use scene::{Scene, SceneError};
