//! Galaxy builder and window driver.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::color::Rgb;
use crate::error::AppError;
use crate::frame_loop::{FrameLoop, LoopControl};
use crate::gpu::GpuState;
use crate::input::Input;
use crate::params::GalaxyParams;
use crate::scene::GalaxyScene;
use crate::viewport::Viewport;

#[cfg(feature = "egui")]
use crate::frame_loop::FrameInfo;
#[cfg(feature = "egui")]
use crate::gpu::{EguiOverlay, OverlayFrame};
#[cfg(feature = "egui")]
use crate::input::KeyCode;
#[cfg(feature = "egui")]
use crate::panel::{ControlPanel, PanelStats};

/// A galaxy viewer builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// Galaxy::new()
///     .with_params(GalaxyParams { branches: 5, ..Default::default() })
///     .with_seed(42)
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct Galaxy {
    params: GalaxyParams,
    seed: Option<u64>,
    title: String,
    window_size: (u32, u32),
    max_frames: Option<u64>,
    clear_color: Rgb,
}

impl Galaxy {
    /// Create a viewer with the default galaxy.
    pub fn new() -> Self {
        Self {
            params: GalaxyParams::default(),
            seed: None,
            title: "Galaxy".to_string(),
            window_size: (1280, 720),
            max_frames: None,
            clear_color: Rgb::BLACK,
        }
    }

    /// Set the initial generation parameters. Out-of-range values are
    /// snapped into range.
    pub fn with_params(mut self, params: GalaxyParams) -> Self {
        self.params = params;
        self
    }

    /// Seed the random source so every run produces the same galaxies.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Close the viewer after `frames` frames.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Background colour behind the galaxy.
    pub fn with_clear_color(mut self, color: Rgb) -> Self {
        self.clear_color = color;
        self
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    /// Run the viewer. This blocks until the window is closed.
    pub fn run(self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn scene(&self) -> GalaxyScene<GpuState> {
        match self.seed {
            Some(seed) => GalaxyScene::with_seed(self.params, seed),
            None => GalaxyScene::new(self.params),
        }
    }

    fn frame_loop(&self) -> FrameLoop {
        FrameLoop::new().with_max_frames(self.max_frames)
    }
}

impl Default for Galaxy {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    config: Galaxy,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    viewport: Option<Viewport>,
    scene: GalaxyScene<GpuState>,
    input: Input,
    frame_loop: FrameLoop,
    #[cfg(feature = "egui")]
    overlay: Option<EguiOverlay>,
    #[cfg(feature = "egui")]
    panel: ControlPanel,
    error: Option<AppError>,
}

impl App {
    fn new(config: Galaxy) -> Self {
        let scene = config.scene();
        Self {
            #[cfg(feature = "egui")]
            panel: ControlPanel::new(*scene.params()),
            #[cfg(feature = "egui")]
            overlay: None,
            window: None,
            gpu: None,
            viewport: None,
            input: Input::new(),
            frame_loop: config.frame_loop(),
            scene,
            config,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());

        let mut gpu = pollster::block_on(GpuState::new(
            window.clone(),
            viewport.surface_size(),
            self.config.clear_color,
        ))?;

        #[cfg(feature = "egui")]
        {
            self.overlay = Some(EguiOverlay::new(gpu.device(), gpu.surface_format(), &window));
        }

        self.scene.regenerate(&mut gpu);

        window.request_redraw();
        self.window = Some(window);
        self.viewport = Some(viewport);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let Some(viewport) = &mut self.viewport else {
            return;
        };
        if viewport.resize_physical(size, scale_factor) {
            if let Some(gpu) = &mut self.gpu {
                gpu.resize(viewport.surface_size());
            }
        }
    }

    /// Route an event to the panel first; the camera only sees what the
    /// panel didn't take, plus releases and motion so drags end cleanly.
    fn dispatch_input(&mut self, window: &Window, event: &WindowEvent) {
        #[cfg(feature = "egui")]
        let consumed = match &mut self.overlay {
            Some(overlay) => overlay.on_window_event(window, event),
            None => false,
        };
        #[cfg(not(feature = "egui"))]
        let consumed = {
            let _ = window;
            false
        };

        let passthrough = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } | WindowEvent::CursorMoved { .. }
                | WindowEvent::CursorLeft { .. }
                | WindowEvent::Focused(_)
        );
        if !consumed || passthrough {
            self.input.handle_event(event);
        }
        if matches!(event, WindowEvent::Focused(false)) {
            self.input.release_all();
        }
    }

    #[cfg(feature = "egui")]
    fn run_panel(&mut self, window: &Window, frame: &FrameInfo) -> Option<OverlayFrame> {
        if self.input.key_pressed(KeyCode::H) {
            self.panel.toggle();
        }

        let overlay = self.overlay.as_mut()?;
        let stats = PanelStats {
            particles: self.scene.buffers().len(),
            generation: self.scene.generation(),
            fps: frame.fps,
        };

        let panel = &mut self.panel;
        let mut committed = None;
        let output = overlay.run(window, |ctx| {
            if let Some(params) = panel.show(ctx, &stats) {
                committed = Some(params);
            }
        });

        if let (Some(params), Some(gpu)) = (committed, self.gpu.as_mut()) {
            self.scene.set_params(params);
            self.scene.regenerate(gpu);
            self.panel.sync(self.scene.params());
        }

        Some(output)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window: &Window) {
        let Some(frame) = self.frame_loop.advance() else {
            event_loop.exit();
            return;
        };

        log::trace!("Frame {} ({:.1} fps)", frame.frame, frame.fps);

        #[cfg(feature = "egui")]
        let mut overlay_frame = self.run_panel(window, &frame);

        if let Some(viewport) = &mut self.viewport {
            viewport.handle_input(&self.input);
            viewport.update();
        }
        self.input.end_frame();

        let (Some(gpu), Some(viewport)) = (self.gpu.as_mut(), self.viewport.as_ref()) else {
            return;
        };

        #[cfg(feature = "egui")]
        let result = {
            let overlay = &mut self.overlay;
            let size_in_pixels = [gpu.config.width, gpu.config.height];
            let surface_scale = viewport.surface_scale();
            let result = gpu.render(viewport, self.scene.points(), |device, queue, encoder, view| {
                match (overlay.as_mut(), overlay_frame.take()) {
                    (Some(overlay), Some(output)) => overlay.paint(
                        output,
                        device,
                        queue,
                        encoder,
                        view,
                        size_in_pixels,
                        surface_scale,
                    ),
                    _ => Vec::new(),
                }
            });
            // The surface was not acquired; keep the texture updates for next frame
            if let (Some(overlay), Some(output)) = (overlay.as_mut(), overlay_frame) {
                overlay.skip(output);
            }
            result
        };
        #[cfg(not(feature = "egui"))]
        let result = gpu.render(viewport, self.scene.points(), |_, _, _, _| Vec::new());

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, stopping");
                self.frame_loop.stop_signal().stop();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        match self.frame_loop.control() {
            LoopControl::Continue => window.request_redraw(),
            LoopControl::Stop => event_loop.exit(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        self.dispatch_input(&window, &event);

        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop_signal().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size, window.scale_factor());
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.resize(window.inner_size(), scale_factor);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop, &window);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &mut self.gpu {
            self.scene.dispose(gpu);
        }
        log::info!("Exiting after {} frames", self.frame_loop.frames());
    }
}
