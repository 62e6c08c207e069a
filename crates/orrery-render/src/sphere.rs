//! Procedural unit-sphere mesh for the celestial bodies.
//!
//! A latitude/longitude grid: `rings + 1` latitude rows from the north pole
//! (y = +1) to the south pole (y = -1), each holding `segments + 1` vertices
//! so the seam column can carry its own texture coordinate. Body size comes
//! from the model matrix's scale, never from the mesh.

use std::f32::consts::{PI, TAU};

use crate::mesh::{MeshBuffer, Vertex};

/// CPU-side sphere geometry, ready for upload.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Upload the geometry to the GPU.
    pub fn upload(&self, device: &wgpu::Device, label: &str) -> MeshBuffer {
        MeshBuffer::new(device, label, &self.vertices, &self.indices)
    }
}

/// Generate a unit sphere centered at the origin.
///
/// Triangles wind counter-clockwise seen from outside, so the mesh works
/// with back-face culling. On a unit sphere the normal is the position.
pub fn unit_sphere(rings: u32, segments: u32) -> SphereMesh {
    debug_assert!(rings >= 2, "a sphere needs at least 2 rings");
    debug_assert!(segments >= 3, "a sphere needs at least 3 segments");

    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = PI * v;
        let y = phi.cos();
        let ring_radius = phi.sin();
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let theta = TAU * u;
            let position = [ring_radius * theta.cos(), y, ring_radius * theta.sin()];
            vertices.push(Vertex {
                position,
                normal: position,
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    let row_stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * row_stride + segment;
            let next_row = current + row_stride;
            // Two triangles per grid cell; the cells touching a pole
            // degenerate to one but are emitted uniformly.
            indices.extend_from_slice(&[current, current + 1, next_row]);
            indices.extend_from_slice(&[current + 1, next_row + 1, next_row]);
        }
    }

    SphereMesh { vertices, indices }
}
