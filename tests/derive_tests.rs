//! Integration tests for the `Parameters` derive macro.
//!
//! These tests verify that `#[derive(Parameters)]` generates correct
//! metadata, snapping and widgets by using the derived implementations.

use galaxy::{ParamKind, ParameterSet, Parameters, Rgb};

// ============================================================================
// Custom parameter set
// ============================================================================

#[derive(Parameters, Clone, Copy, Debug, PartialEq)]
struct Ring {
    #[param(min = 100, max = 10_000, step = 100)]
    count: u32,
    #[param(min = 0.5, max = 5.0, step = 0.5)]
    radius: f32,
    #[param(min = -1, max = 1, step = 0.25)]
    tilt: f32,
    #[param(color, label = "tint")]
    color: Rgb,
}

impl Default for Ring {
    fn default() -> Self {
        Self {
            count: 1_000,
            radius: 2.0,
            tilt: 0.0,
            color: Rgb::WHITE,
        }
    }
}

#[test]
fn test_fields_follow_declaration_order() {
    let names: Vec<_> = Ring::FIELDS.iter().map(|f| f.name).collect();
    assert_eq!(names, ["count", "radius", "tilt", "color"]);
}

#[test]
fn test_integer_field_metadata() {
    let count = &Ring::FIELDS[0];
    assert_eq!(count.label, "count");
    assert_eq!(
        count.kind,
        ParamKind::Integer {
            min: 100,
            max: 10_000,
            step: 100
        }
    );
}

#[test]
fn test_float_field_metadata() {
    assert_eq!(
        Ring::FIELDS[1].kind,
        ParamKind::Float {
            min: 0.5,
            max: 5.0,
            step: 0.5
        }
    );
    // Negative literals and integer literals on float fields
    assert_eq!(
        Ring::FIELDS[2].kind,
        ParamKind::Float {
            min: -1.0,
            max: 1.0,
            step: 0.25
        }
    );
}

#[test]
fn test_color_field_label_override() {
    let color = &Ring::FIELDS[3];
    assert_eq!(color.name, "color");
    assert_eq!(color.label, "tint");
    assert_eq!(color.kind, ParamKind::Color);
}

// ============================================================================
// clamp_to_ranges
// ============================================================================

#[test]
fn test_clamp_leaves_valid_values_alone() {
    let mut ring = Ring::default();
    ring.clamp_to_ranges();
    assert_eq!(ring, Ring::default());
}

#[test]
fn test_clamp_pulls_values_into_range() {
    let mut ring = Ring {
        count: 50,
        radius: 9.0,
        tilt: -3.0,
        color: Rgb::new(0.2, 0.4, 0.6),
    };
    ring.clamp_to_ranges();

    assert_eq!(ring.count, 100);
    assert_eq!(ring.radius, 5.0);
    assert_eq!(ring.tilt, -1.0);
    // Colours are unconstrained
    assert_eq!(ring.color, Rgb::new(0.2, 0.4, 0.6));
}

#[test]
fn test_clamp_snaps_to_step() {
    let mut ring = Ring {
        count: 1_049,
        radius: 1.7,
        tilt: 0.3,
        ..Ring::default()
    };
    ring.clamp_to_ranges();

    assert_eq!(ring.count, 1_000);
    assert!((ring.radius - 1.5).abs() < 1e-6);
    assert!((ring.tilt - 0.25).abs() < 1e-6);
}

#[test]
fn test_clamp_ties_round_up_for_integers() {
    let mut ring = Ring {
        count: 1_050,
        ..Ring::default()
    };
    ring.clamp_to_ranges();
    assert_eq!(ring.count, 1_100);
}

// ============================================================================
// Widgets
// ============================================================================

#[cfg(feature = "egui")]
#[test]
fn test_render_controls_without_input_reports_nothing() {
    use galaxy::egui;

    let ctx = egui::Context::default();
    let mut ring = Ring::default();
    let mut response = None;

    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            response = Some(ring.render_controls(ui));
        });
    });

    let response = response.expect("panel should have been drawn");
    assert!(!response.changed);
    assert!(!response.interacting);
    assert_eq!(ring, Ring::default());
}
