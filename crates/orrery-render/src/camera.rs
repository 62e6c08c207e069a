//! Static look-at camera with a reverse-Z perspective projection.
//!
//! The orrery's camera never moves during a session; it is placed once from
//! config and only its aspect ratio changes, on window resize.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Near clip distance in world units. The whole scene sits within a couple
/// of units of the origin, so a tight near plane costs nothing.
const NEAR: f32 = 0.01;
/// Far clip distance in world units.
const FAR: f32 = 100.0;

/// Camera uniform as the shaders see it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// A fixed camera looking at a target point.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Width / height.
    pub aspect: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, fov_y_deg: f32, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y_deg,
            aspect,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Reverse-Z projection: near and far are swapped so the near plane
    /// lands on depth 1.0 and the far plane on 0.0, matching
    /// [`DepthBuffer`](crate::DepthBuffer)'s clear value and compare.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, FAR, NEAR)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio after a window resize.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
        }
    }
}
