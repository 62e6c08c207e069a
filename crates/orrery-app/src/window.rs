//! Window lifecycle and the per-frame render loop.
//!
//! One frame is: poll events, acquire the surface, draw the background with
//! no depth attachment, draw the bodies depth-tested, submit and present,
//! then advance the angle state exactly once. Present mode is Fifo, so the
//! display's refresh rate is also the animation clock.

use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use orrery_config::Config;
use orrery_render::{
    BackgroundError, BackgroundRenderer, BodyBinding, BodyPipeline, BodyUniform, CLEAR_GRAY,
    Camera, DepthBuffer, FrameEncoder, FrameError, GpuContext, GpuError, MeshBuffer,
    RenderPassBuilder, init_gpu_blocking, unit_sphere,
};
use orrery_scene::{AngleState, Scene, SceneError, world_transforms};

/// Frames between periodic frame-rate log lines.
const REPORT_INTERVAL_FRAMES: u32 = 300;

/// Latitude/longitude resolution of the shared body sphere.
const SPHERE_RINGS: u32 = 32;
const SPHERE_SEGMENTS: u32 = 48;

/// Errors that end the application before the event loop starts.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The configured body table failed validation.
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    /// The event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Startup failures inside `resumed`, after the event loop is already
/// running; these are logged and end the loop.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Background(#[from] BackgroundError),
}

/// GPU-side state, created once the window exists.
struct RenderState {
    gpu: GpuContext,
    depth: DepthBuffer,
    camera: Camera,
    background: BackgroundRenderer,
    pipeline: BodyPipeline,
    sphere: MeshBuffer,
    bindings: Vec<BodyBinding>,
}

impl RenderState {
    fn new(window: Arc<Window>, config: &Config, scene: &Scene) -> Result<Self, StartupError> {
        let size = window.inner_size();
        let gpu = init_gpu_blocking(window)?;

        let depth = DepthBuffer::new(&gpu.device, size.width.max(1), size.height.max(1));

        let mut camera = Camera::new(
            config.camera.eye,
            config.camera.target,
            config.camera.fov_y_deg,
            1.0,
        );
        camera.set_aspect(size.width, size.height);

        // Asset loads happen before the first frame; a failure here is fatal
        // and the render loop never starts.
        let background = BackgroundRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format(),
            &config.scene.background,
        )?;

        let pipeline = BodyPipeline::new(&gpu.device, gpu.surface_format());
        let sphere = unit_sphere(SPHERE_RINGS, SPHERE_SEGMENTS).upload(&gpu.device, "body-sphere");
        let bindings = scene
            .bodies()
            .iter()
            .map(|body| pipeline.create_binding(&gpu.device, &body.name))
            .collect();

        Ok(Self {
            gpu,
            depth,
            camera,
            background,
            pipeline,
            sphere,
            bindings,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.depth
            .resize(&self.gpu.device, width.max(1), height.max(1));
        self.camera.set_aspect(width, height);
    }
}

/// The application: scene and angle state on the CPU side, render state on
/// the GPU side once the window is up.
struct OrreryApp {
    config: Config,
    scene: Scene,
    angles: AngleState,
    window: Option<Arc<Window>>,
    render: Option<RenderState>,
    frame_count: u64,
    frames_since_report: u32,
    report_start: Instant,
}

impl OrreryApp {
    fn new(config: Config, scene: Scene) -> Self {
        let angles = AngleState::new(&scene);
        Self {
            config,
            scene,
            angles,
            window: None,
            render: None,
            frame_count: 0,
            frames_since_report: 0,
            report_start: Instant::now(),
        }
    }

    /// Render one frame from the current (pre-advance) angle snapshot.
    /// Returns `false` when the loop should shut down.
    fn render_frame(&mut self, render: &mut RenderState) -> bool {
        render
            .pipeline
            .update_camera(&render.gpu.queue, &render.camera.to_uniform());

        let transforms = world_transforms(&self.scene, self.angles.snapshot());
        for ((binding, transform), body) in render
            .bindings
            .iter()
            .zip(&transforms)
            .zip(self.scene.bodies())
        {
            binding.write(
                &render.gpu.queue,
                &BodyUniform::new(*transform, body.color, body.emissive),
            );
        }

        let frame = match render.gpu.acquire_frame() {
            Ok(frame) => frame,
            // Skip the frame; acquire_frame already reconfigured and logged.
            Err(FrameError::Lost | FrameError::Timeout) => return true,
            Err(FrameError::OutOfMemory) => {
                log::error!("GPU out of memory, shutting down");
                return false;
            }
        };

        let mut encoder = FrameEncoder::new(&render.gpu.device, render.gpu.queue.clone(), frame);

        let background_pass = RenderPassBuilder::new()
            .clear_color(CLEAR_GRAY)
            .label("background-pass");
        {
            let mut pass = encoder.begin_render_pass(&background_pass);
            render.background.draw(&mut pass);
        }

        let body_pass = RenderPassBuilder::new()
            .preserve_color()
            .depth(render.depth.view.clone())
            .label("body-pass");
        {
            let mut pass = encoder.begin_render_pass(&body_pass);
            render.pipeline.activate(&mut pass);
            for binding in &render.bindings {
                binding.bind(&mut pass);
                render.sphere.draw(&mut pass);
            }
        }

        encoder.submit();
        true
    }

    fn log_frame_rate(&mut self) {
        self.frames_since_report += 1;
        if self.frames_since_report >= REPORT_INTERVAL_FRAMES {
            let elapsed = self.report_start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                log::info!(
                    "Rendered {} frames in {:.1}s ({:.1} fps, {} total)",
                    self.frames_since_report,
                    elapsed,
                    f64::from(self.frames_since_report) / elapsed,
                    self.frame_count
                );
            }
            self.frames_since_report = 0;
            self.report_start = Instant::now();
        }
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match RenderState::new(window.clone(), &self.config, &self.scene) {
            Ok(render) => {
                log::info!(
                    "Renderer up: {} bodies, {}x{} surface",
                    self.scene.len(),
                    render.gpu.surface_config.width,
                    render.gpu.surface_config.height
                );
                self.render = Some(render);
            }
            Err(e) => {
                log::error!("Startup failed: {e}");
                event_loop.exit();
                return;
            }
        }

        self.report_start = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    log::info!("Escape pressed, shutting down");
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(new_size.width, new_size.height);
                    log::debug!("Window resized to {}x{}", new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(mut render) = self.render.take() else {
                    return;
                };

                let keep_running = self.render_frame(&mut render);
                self.render = Some(render);
                if !keep_running {
                    event_loop.exit();
                    return;
                }

                // Draw first, advance after: the frame above showed the
                // pre-advance pose, and each rendered frame steps the
                // angles exactly once.
                self.angles.advance();
                self.frame_count += 1;
                self.log_frame_rate();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Window attributes for the configured title and logical size.
fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ))
}

/// Validate the configured scene, then run the event loop until the window
/// closes or Escape is pressed. Blocks for the whole session.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), AppError> {
    let scene = Scene::new(config.scene.bodies.clone())?;
    log::info!(
        "Scene validated: {}",
        scene
            .bodies()
            .iter()
            .map(|body| body.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let event_loop = EventLoop::new()?;
    let mut app = OrreryApp::new(config, scene);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_follow_config() {
        let mut config = Config::default();
        config.window.title = "test orrery".to_string();
        config.window.width = 640;
        config.window.height = 480;

        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "test orrery");
        let size = attrs.inner_size.expect("size set from config");
        assert_eq!(
            size,
            winit::dpi::Size::Logical(winit::dpi::LogicalSize::new(640.0, 480.0))
        );
    }

    #[test]
    fn test_invalid_config_bodies_fail_before_event_loop() {
        let mut config = Config::default();
        // Forward parent reference is invalid; Scene::new must reject it.
        config.scene.bodies[1].parent = Some(2);
        let result = Scene::new(config.scene.bodies.clone());
        assert!(matches!(result, Err(SceneError::ParentOrder { .. })));
    }
}
