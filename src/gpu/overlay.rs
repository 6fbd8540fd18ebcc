//! egui overlay drawn on top of the galaxy.
//!
//! Available with the `egui` feature (on by default).

use winit::window::Window;

/// Egui integration state.
///
/// Wraps egui context, winit state, and wgpu renderer.
pub struct EguiOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    deferred: DeferredTextures,
}

/// Texture updates from frames that were never painted.
///
/// egui only sends a texture in full once; later deltas patch it in place, so
/// an update dropped with a skipped frame must reach the renderer before any
/// newer one.
#[derive(Default)]
pub struct DeferredTextures {
    delta: egui::TexturesDelta,
}

impl DeferredTextures {
    /// Hold on to `delta` until the next frame.
    pub fn defer(&mut self, delta: egui::TexturesDelta) {
        self.delta.append(delta);
    }

    /// Everything deferred so far followed by `newer`.
    pub fn take_with(&mut self, newer: egui::TexturesDelta) -> egui::TexturesDelta {
        let mut delta = std::mem::take(&mut self.delta);
        delta.append(newer);
        delta
    }

    pub fn is_empty(&self) -> bool {
        self.delta.is_empty()
    }
}

/// Tessellated output of one UI pass, ready to paint.
pub struct OverlayFrame {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl EguiOverlay {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();

        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self {
            ctx,
            state,
            renderer,
            deferred: DeferredTextures::default(),
        }
    }

    /// Process a winit event.
    ///
    /// Returns true if egui consumed the event (don't pass to camera controls).
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run one UI pass and tessellate it.
    ///
    /// Texture updates handed back through [`Self::skip`] are folded in
    /// ahead of this pass's own.
    pub fn run(&mut self, window: &Window, ui: impl FnMut(&egui::Context)) -> OverlayFrame {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, ui);

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        OverlayFrame {
            paint_jobs,
            textures_delta: self.deferred.take_with(full_output.textures_delta),
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Give back a frame that could not be painted so its texture updates
    /// go out with the next one.
    pub fn skip(&mut self, frame: OverlayFrame) {
        log::debug!(
            "Deferring {} egui texture update(s)",
            frame.textures_delta.set.len() + frame.textures_delta.free.len()
        );
        self.deferred.defer(frame.textures_delta);
    }

    /// Upload `frame` and record its render pass over `view`.
    ///
    /// `surface_scale` is the ratio of surface pixels to window pixels.
    /// Returns the command buffers egui's callbacks produced; they must be
    /// submitted before `encoder`.
    pub fn paint(
        &mut self,
        frame: OverlayFrame,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        surface_scale: f32,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point * surface_scale,
        };

        for (id, image_delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let command_buffers = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(
                &mut render_pass.forget_lifetime(),
                &frame.paint_jobs,
                &screen_descriptor,
            );
        }

        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }

        command_buffers
    }
}
