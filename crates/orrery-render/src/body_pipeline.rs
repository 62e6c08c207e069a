//! Depth-tested pipeline for the celestial bodies.
//!
//! One shared camera uniform (group 0) and one small per-body uniform
//! (group 1) carrying the model matrix, base color, and emissive flag.
//! Lit bodies get Lambert shading from the sun at the world origin;
//! emissive bodies are drawn flat.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::mesh::Vertex;

/// WGSL shader for the body pass.
const BODY_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
};

struct BodyUniform {
    model: mat4x4<f32>,
    color: vec3<f32>,
    emissive: f32,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;
@group(1) @binding(0)
var<uniform> body: BodyUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_body(in: VertexInput) -> VertexOutput {
    let world = body.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.world_position = world.xyz;
    // Scale is uniform, so the model matrix rotates normals correctly once
    // renormalized.
    out.world_normal = normalize((body.model * vec4<f32>(in.normal, 0.0)).xyz);
    return out;
}

@fragment
fn fs_body(in: VertexOutput) -> @location(0) vec4<f32> {
    // The sun lights itself; skip shading entirely so its fragments never
    // normalize a near-zero direction.
    if body.emissive > 0.5 {
        return vec4<f32>(body.color, 1.0);
    }

    // Lambertian shading, lit from the sun at the world origin.
    let to_sun = normalize(-in.world_position);
    let ndotl = max(dot(normalize(in.world_normal), to_sun), 0.0);
    let lit = body.color * (0.08 + 0.92 * ndotl);
    return vec4<f32>(lit, 1.0);
}
"#;

/// Per-body uniform as the shader sees it: model matrix, color, emissive.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BodyUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    /// 1.0 for emissive bodies, 0.0 for lit ones. Doubles as the vec3's
    /// 16-byte padding in the WGSL layout.
    pub emissive: f32,
}

impl BodyUniform {
    pub fn new(model: Mat4, color: [f32; 3], emissive: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            emissive: if emissive { 1.0 } else { 0.0 },
        }
    }
}

/// Uniform buffer and bind group for one body, created once at startup and
/// rewritten every frame with that frame's model matrix.
pub struct BodyBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl BodyBinding {
    /// Push this frame's uniform to the GPU.
    pub fn write(&self, queue: &wgpu::Queue, uniform: &BodyUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    /// Bind as group 1 for the next draw.
    pub fn bind(&self, pass: &mut wgpu::RenderPass) {
        pass.set_bind_group(1, &self.bind_group, &[]);
    }
}

/// The depth-tested render pipeline shared by every body.
pub struct BodyPipeline {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    body_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    /// Build the pipeline against the surface format and the shared depth
    /// buffer conventions.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-camera-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<CameraUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let body_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-uniform-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<BodyUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &body_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_body"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_body"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body-camera-uniform"),
            contents: bytemuck::cast_slice(&[CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("body-camera-bg"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            body_bind_group_layout,
        }
    }

    /// Update the shared camera uniform.
    pub fn update_camera(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    /// Allocate the uniform buffer and bind group for one body.
    pub fn create_binding(&self, device: &wgpu::Device, label: &str) -> BodyBinding {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-uniform")),
            contents: bytemuck::cast_slice(&[BodyUniform::new(
                Mat4::IDENTITY,
                [1.0, 1.0, 1.0],
                false,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bg")),
            layout: &self.body_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        BodyBinding { buffer, bind_group }
    }

    /// Set the pipeline and camera bind group for the body pass.
    pub fn activate(&self, pass: &mut wgpu::RenderPass) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    #[test]
    fn test_body_uniform_matches_wgsl_layout() {
        // mat4x4 (64) + vec3 + f32 padding slot (16) = 80 bytes.
        assert_eq!(std::mem::size_of::<BodyUniform>(), 80);
        assert_eq!(std::mem::size_of::<BodyUniform>() % 16, 0);
    }

    #[test]
    fn test_emissive_flag_encodes_as_float() {
        let lit = BodyUniform::new(Mat4::IDENTITY, [0.5, 0.5, 0.5], false);
        let glowing = BodyUniform::new(Mat4::IDENTITY, [1.0, 0.9, 0.3], true);
        assert_eq!(lit.emissive, 0.0);
        assert_eq!(glowing.emissive, 1.0);
    }

    #[test]
    fn test_uniform_carries_model_columns() {
        let model = Mat4::from_translation(glam::Vec3::new(0.5, 0.0, -0.25));
        let uniform = BodyUniform::new(model, [1.0, 1.0, 1.0], false);
        assert_eq!(uniform.model[3][0], 0.5);
        assert_eq!(uniform.model[3][2], -0.25);
    }

    #[test]
    fn test_pipeline_and_bindings_build() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let pipeline = BodyPipeline::new(&device, wgpu::TextureFormat::Rgba8UnormSrgb);
        let binding = pipeline.create_binding(&device, "test-body");
        binding.write(
            &queue,
            &BodyUniform::new(Mat4::IDENTITY, [0.2, 0.4, 0.6], false),
        );
    }
}
