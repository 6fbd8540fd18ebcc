//! The tweak panel.
//!
//! One slider per numeric parameter and a colour picker per colour, generated
//! from [`GalaxyParams`]'s field attributes. The panel edits a draft copy of
//! the parameters and hands it back only when the user finishes an edit.

use crate::controls::{CommitTracker, ControlResponse};
use crate::params::GalaxyParams;
use crate::ParameterSet;

/// Read-only figures shown under the controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelStats {
    pub particles: usize,
    pub generation: u64,
    pub fps: f32,
}

/// Panel state kept across frames.
#[derive(Debug)]
pub struct ControlPanel {
    draft: GalaxyParams,
    tracker: CommitTracker,
    visible: bool,
}

impl ControlPanel {
    pub fn new(params: GalaxyParams) -> Self {
        Self {
            draft: params,
            tracker: CommitTracker::new(),
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the panel.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Values currently shown, including uncommitted edits.
    pub fn draft(&self) -> &GalaxyParams {
        &self.draft
    }

    /// Reset the draft to `params`, e.g. after they were clamped.
    pub fn sync(&mut self, params: &GalaxyParams) {
        self.draft = *params;
    }

    /// Number of committed edits.
    pub fn commits(&self) -> u64 {
        self.tracker.commits()
    }

    /// Draw the panel. Returns the new parameters when an edit finished.
    pub fn show(&mut self, ctx: &egui::Context, stats: &PanelStats) -> Option<GalaxyParams> {
        if !self.visible {
            return None;
        }

        let mut visible = self.visible;
        let mut response = ControlResponse::default();
        let draft = &mut self.draft;

        egui::Window::new("Galaxy")
            .open(&mut visible)
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.spacing_mut().slider_width = 180.0;
                response.merge(draft.render_controls(ui));

                ui.separator();
                ui.label(format!("Particles: {}", stats.particles));
                ui.label(format!("Generation: {}", stats.generation));
                ui.label(format!("FPS: {:.0}", stats.fps));
                ui.weak("Press H to hide");
            });
        self.visible = visible;

        // Colour pickers drag inside a popup, so a held pointer also counts
        response.interacting |= ctx.input(|i| i.pointer.any_down());

        if self.tracker.observe(response) {
            let mut committed = self.draft;
            committed.clamp_to_ranges();
            log::debug!("Panel edit committed: {:?}", committed);
            Some(committed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ctx: &egui::Context, panel: &mut ControlPanel) -> Option<GalaxyParams> {
        frame_with(ctx, panel, Vec::new())
    }

    fn frame_with(
        ctx: &egui::Context,
        panel: &mut ControlPanel,
        events: Vec<egui::Event>,
    ) -> Option<GalaxyParams> {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            events,
            ..Default::default()
        };
        let mut committed = None;
        let _ = ctx.run(input, |ctx| {
            committed = panel.show(ctx, &PanelStats::default());
        });
        committed
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Click down the window's left side until the first control (the
    /// particle count slider) takes the click. Returns the slider's y position.
    fn find_count_slider(ctx: &egui::Context, panel: &mut ControlPanel, x: f32) -> f32 {
        for y in (16..200).step_by(3).map(|y| y as f32) {
            let pos = egui::pos2(x, y);
            let before = panel.draft().count;
            let press = vec![egui::Event::PointerMoved(pos), button(pos, true)];
            assert_eq!(frame_with(ctx, panel, press), None, "committed while held");
            if let Some(params) = frame_with(ctx, panel, vec![button(pos, false)]) {
                assert_ne!(params.count, before);
                return y;
            }
        }
        panic!("count slider not found");
    }

    #[test]
    fn test_idle_panel_commits_nothing() {
        let ctx = egui::Context::default();
        let mut panel = ControlPanel::new(GalaxyParams::default());
        for _ in 0..3 {
            assert_eq!(frame(&ctx, &mut panel), None);
        }
        assert_eq!(panel.commits(), 0);
        assert_eq!(*panel.draft(), GalaxyParams::default());
    }

    #[test]
    fn test_slider_drag_commits_once_on_release() {
        let ctx = egui::Context::default();
        let mut panel = ControlPanel::new(GalaxyParams::default());
        // Lay the window out before interacting with it
        for _ in 0..2 {
            frame(&ctx, &mut panel);
        }

        let start_x = 60.0;
        let y = find_count_slider(&ctx, &mut panel, start_x);
        let commits = panel.commits();
        let count_at_start = panel.draft().count;

        let start = egui::pos2(start_x, y);
        let middle = egui::pos2(110.0, y);
        let end = egui::pos2(160.0, y);

        let drag = [
            vec![egui::Event::PointerMoved(start), button(start, true)],
            vec![egui::Event::PointerMoved(middle)],
            vec![egui::Event::PointerMoved(end)],
        ];
        for events in drag {
            assert_eq!(frame_with(&ctx, &mut panel, events), None);
            assert_eq!(panel.commits(), commits);
        }
        assert_ne!(panel.draft().count, count_at_start);

        let released = frame_with(&ctx, &mut panel, vec![button(end, false)])
            .expect("releasing the slider commits the edit");
        assert_eq!(released.count, panel.draft().count);
        assert!(released.count > count_at_start);
        assert_eq!(panel.commits(), commits + 1);

        assert_eq!(frame(&ctx, &mut panel), None);
        assert_eq!(panel.commits(), commits + 1);
    }

    #[test]
    fn test_toggle_hides_panel() {
        let mut panel = ControlPanel::new(GalaxyParams::default());
        assert!(panel.is_visible());
        panel.toggle();
        assert!(!panel.is_visible());

        let ctx = egui::Context::default();
        assert_eq!(frame(&ctx, &mut panel), None);
        panel.toggle();
        assert!(panel.is_visible());
    }

    #[test]
    fn test_sync_replaces_draft() {
        let mut panel = ControlPanel::new(GalaxyParams::default());
        let params = GalaxyParams {
            branches: 7,
            ..GalaxyParams::default()
        };
        panel.sync(&params);
        assert_eq!(panel.draft().branches, 7);
    }
}
