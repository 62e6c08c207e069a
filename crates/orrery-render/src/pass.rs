//! Render pass configuration and per-frame command encoding.
//!
//! A frame here is two passes over the same surface texture: the background
//! pass clears color and draws with no depth attachment, then the body pass
//! preserves color, clears depth, and draws the depth-tested bodies.

use crate::depth::DepthBuffer;

/// The neutral gray the framebuffer is cleared to each frame.
pub const CLEAR_GRAY: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.4,
    b: 0.4,
    a: 1.0,
};

/// Declarative render pass configuration.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: Option<wgpu::Color>,
    depth_view: Option<wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// A pass that clears color to [`CLEAR_GRAY`] and has no depth attachment.
    pub fn new() -> Self {
        Self {
            clear_color: Some(CLEAR_GRAY),
            depth_view: None,
            label: None,
        }
    }

    /// Clear the color attachment to the given color.
    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = Some(color);
        self
    }

    /// Keep whatever a previous pass left in the color attachment.
    pub fn preserve_color(mut self) -> Self {
        self.clear_color = None;
        self
    }

    /// Attach a depth buffer, cleared to [`DepthBuffer::CLEAR_VALUE`].
    pub fn depth(mut self, view: wgpu::TextureView) -> Self {
        self.depth_view = Some(view);
        self
    }

    /// Debug label shown in GPU captures.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn create_render_pass<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let load = match self.clear_color {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_view
                .as_ref()
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Per-frame command encoding: holds the encoder and the acquired surface
/// texture, and presents on submit.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: wgpu::Queue,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: wgpu::TextureView,
    submitted: bool,
}

impl FrameEncoder {
    /// Start encoding a frame targeting the acquired surface texture.
    pub fn new(
        device: &wgpu::Device,
        queue: wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view,
            submitted: false,
        }
    }

    /// Begin a render pass over the surface using the builder's configuration.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        builder.create_render_pass(
            self.encoder.as_mut().expect("FrameEncoder already submitted"),
            &self.surface_view,
        )
    }

    /// Submit the recorded commands and present the frame.
    /// Consumes self so a frame cannot be submitted twice.
    pub fn submit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.submitted {
            return;
        }
        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            self.queue.submit([encoder.finish()]);
            surface_texture.present();
            self.submitted = true;
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if !self.submitted {
            log::warn!("FrameEncoder dropped without submit(), submitting now");
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builder_clears_to_gray() {
        let builder = RenderPassBuilder::new();
        let color = builder.clear_color.expect("default pass clears");
        assert_eq!(color.r, 0.4);
        assert_eq!(color.g, 0.4);
        assert_eq!(color.b, 0.4);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_preserve_color_disables_clearing() {
        let builder = RenderPassBuilder::new().preserve_color();
        assert!(builder.clear_color.is_none());
    }

    #[test]
    fn test_depth_attachment_is_optional() {
        let builder = RenderPassBuilder::new();
        assert!(builder.depth_view.is_none());
    }

    #[test]
    fn test_label_is_stored() {
        let builder = RenderPassBuilder::new().label("background-pass");
        assert_eq!(builder.label, Some("background-pass"));
    }
}
