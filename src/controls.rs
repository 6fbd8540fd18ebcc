//! Panel widget helpers and commit detection.
//!
//! Regenerating a million particles on every slider tick would stall the
//! frame loop, so edits are only committed once the user lets go of a
//! control. [`CommitTracker`] turns per-frame widget activity into that
//! single "finished editing" event.

/// Activity reported by the widgets drawn in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlResponse {
    /// A bound value changed this frame.
    pub changed: bool,
    /// A widget is still being manipulated (dragged, focused, pointer held).
    pub interacting: bool,
    /// A widget explicitly finished this frame (drag released, focus lost).
    pub finished: bool,
}

impl ControlResponse {
    /// Merge another widget's activity into this one.
    pub fn merge(&mut self, other: ControlResponse) {
        self.changed |= other.changed;
        self.interacting |= other.interacting;
        self.finished |= other.finished;
    }

    /// Fold in an egui widget response.
    #[cfg(feature = "egui")]
    pub fn absorb(&mut self, response: &egui::Response) {
        self.merge(ControlResponse {
            changed: response.changed(),
            interacting: response.dragged() || response.has_focus(),
            finished: response.drag_stopped() || response.lost_focus(),
        });
    }
}

/// Accumulates edits and reports when they should be committed.
#[derive(Debug, Default)]
pub struct CommitTracker {
    pending: bool,
    commits: u64,
}

impl CommitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame of widget activity.
    ///
    /// Returns `true` on the frame where a pending edit should be committed:
    /// something changed and nothing is being manipulated anymore.
    pub fn observe(&mut self, response: ControlResponse) -> bool {
        if response.changed {
            self.pending = true;
        }
        if self.pending && (!response.interacting || response.finished) {
            self.pending = false;
            self.commits += 1;
            return true;
        }
        false
    }

    /// Whether an edit is waiting for the interaction to end.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of commits fired so far.
    pub fn commits(&self) -> u64 {
        self.commits
    }
}

#[cfg(feature = "egui")]
pub use widgets::{color_picker, f32_slider, u32_slider};

#[cfg(feature = "egui")]
mod widgets {
    use crate::color::Rgb;

    /// Slider bound to an `f32` with a fixed step.
    pub fn f32_slider(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        min: f32,
        max: f32,
        step: f32,
    ) -> egui::Response {
        let decimals = decimals_for_step(step);
        ui.add(
            egui::Slider::new(value, min..=max)
                .step_by(step as f64)
                .max_decimals(decimals)
                .text(label),
        )
    }

    /// Slider bound to a `u32` with a fixed step.
    pub fn u32_slider(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        min: u32,
        max: u32,
        step: u32,
    ) -> egui::Response {
        ui.add(
            egui::Slider::new(value, min..=max)
                .step_by(step as f64)
                .text(label),
        )
    }

    /// Colour button opening a picker popup.
    pub fn color_picker(ui: &mut egui::Ui, label: &str, color: &mut Rgb) -> egui::Response {
        ui.horizontal(|ui| {
            let mut rgb = color.to_array();
            let response = egui::color_picker::color_edit_button_rgb(ui, &mut rgb);
            if response.changed() {
                *color = Rgb::from_array(rgb);
            }
            ui.label(label);
            response
        })
        .inner
    }

    fn decimals_for_step(step: f32) -> usize {
        let mut decimals = 0;
        let mut scaled = step;
        while decimals < 6 && (scaled - scaled.round()).abs() > 1e-4 {
            scaled *= 10.0;
            decimals += 1;
        }
        decimals
    }

}
