//! wgpu rendering layer for the orrery: device and surface plumbing, a
//! static camera, procedural sphere meshes, the full-screen background
//! pass, and the depth-tested body pipeline.

pub mod background;
pub mod body_pipeline;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod mesh;
pub mod pass;
pub mod sphere;

pub use background::{BackgroundError, BackgroundRenderer};
pub use body_pipeline::{BodyBinding, BodyPipeline, BodyUniform};
pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{FrameError, GpuContext, GpuError, init_gpu_blocking};
pub use mesh::{MeshBuffer, Vertex};
pub use pass::{CLEAR_GRAY, FrameEncoder, RenderPassBuilder};
pub use sphere::{SphereMesh, unit_sphere};
