//! Viewport sizing and camera state.
//!
//! Sizes are tracked in logical pixels plus the display's device pixel
//! ratio. The renderer draws at `min(device_pixel_ratio, 2)` pixels per
//! logical pixel, so very dense displays don't multiply the fill cost.

use glam::Mat4;
use winit::dpi::PhysicalSize;

use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::input::Input;

/// Highest pixel ratio the renderer will draw at.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Camera, orbit controls and drawing-surface size for one window.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: f64,
    height: f64,
    device_pixel_ratio: f64,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
}

impl Viewport {
    /// A viewport of `width` x `height` logical pixels.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let mut viewport = Self {
            width: 1.0,
            height: 1.0,
            device_pixel_ratio: 1.0,
            camera: PerspectiveCamera::default(),
            controls: OrbitControls::default(),
        };
        viewport.resize(width, height, device_pixel_ratio);
        viewport
    }

    /// A viewport matching a window's physical size and scale factor.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = size.to_logical::<f64>(scale_factor);
        Self::new(logical.width, logical.height, scale_factor)
    }

    /// Update for a new logical size and pixel ratio.
    ///
    /// Returns `false` (and changes nothing) for a zero-area viewport,
    /// e.g. a minimised window.
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> bool {
        if width <= 0.0 || height <= 0.0 || device_pixel_ratio <= 0.0 {
            return false;
        }
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self.camera.aspect = (width / height) as f32;
        log::debug!(
            "Viewport resized to {:.0}x{:.0} @ {:.2}x (drawing at {:.2}x)",
            width,
            height,
            device_pixel_ratio,
            self.pixel_ratio()
        );
        true
    }

    /// [`resize`](Self::resize) from a window's physical size.
    pub fn resize_physical(&mut self, size: PhysicalSize<u32>, scale_factor: f64) -> bool {
        let logical = size.to_logical::<f64>(scale_factor);
        self.resize(logical.width, logical.height, scale_factor)
    }

    /// Logical size in pixels.
    pub fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Pixel ratio used for rendering, capped at [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Size of the drawing surface in pixels.
    pub fn surface_size(&self) -> PhysicalSize<u32> {
        let ratio = self.pixel_ratio();
        PhysicalSize::new(
            ((self.width * ratio).round() as u32).max(1),
            ((self.height * ratio).round() as u32).max(1),
        )
    }

    /// Drawing-surface pixels per physical window pixel (1 unless capped).
    pub fn surface_scale(&self) -> f32 {
        (self.pixel_ratio() / self.device_pixel_ratio) as f32
    }

    /// Feed this frame's pointer input to the orbit controls.
    ///
    /// Drag deltas arrive in physical pixels and are compared against the
    /// physical viewport height.
    pub fn handle_input(&mut self, input: &Input) {
        let physical_height = (self.height * self.device_pixel_ratio) as f32;
        self.controls
            .handle_input(input, physical_height, self.camera.fov_y);
    }

    /// Advance the controls' damping. Call once per frame.
    pub fn update(&mut self) -> bool {
        self.controls.update()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.controls.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.camera.projection_matrix()
    }
}
