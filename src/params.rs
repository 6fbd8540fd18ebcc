//! Generation parameters for the galaxy.
//!
//! [`GalaxyParams`] is the single parameter set the panel edits and the
//! generator reads. Ranges and steps live on the fields themselves and are
//! exposed through [`ParameterSet::FIELDS`](crate::ParameterSet::FIELDS).
//!
//! # Example
//!
//! ```ignore
//! use galaxy::prelude::*;
//!
//! let mut params = GalaxyParams::default();
//! params.branches = 12; // out of range
//! params.clamp_to_ranges();
//! assert_eq!(params.branches, 10);
//! ```

use crate::color::Rgb;
use galaxy_derive::Parameters;

/// Widget/range description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Rust field name.
    pub name: &'static str,
    /// Label shown in the control panel.
    pub label: &'static str,
    pub kind: ParamKind,
}

/// Value domain of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Continuous value snapped to `step`, within `min..=max`.
    Float { min: f32, max: f32, step: f32 },
    /// Integer value snapped to `step`, within `min..=max`.
    Integer { min: u32, max: u32, step: u32 },
    /// RGB colour, unconstrained.
    Color,
}

/// Snap a float onto the `min + k * step` grid and clamp it to `min..=max`.
///
/// Non-finite input collapses to `min`. Values already on the grid come back
/// bit-for-bit, so snapping twice is a no-op.
pub fn snap_f32(value: f32, min: f32, max: f32, step: f32) -> f32 {
    if !value.is_finite() {
        return min;
    }
    let clamped = value.clamp(min, max);
    if step <= 0.0 {
        return clamped;
    }
    let steps = ((clamped - min) / step).round();
    let snapped = (min + steps * step).clamp(min, max);
    if (clamped - snapped).abs() <= step * GRID_TOLERANCE {
        clamped
    } else {
        snapped
    }
}

/// Fraction of a step within which a value counts as on the grid.
const GRID_TOLERANCE: f32 = 1e-3;

/// Integer counterpart of [`snap_f32`]; ties round up.
pub fn snap_u32(value: u32, min: u32, max: u32, step: u32) -> u32 {
    let clamped = value.clamp(min, max);
    if step == 0 {
        return clamped;
    }
    let steps = (clamped - min + step / 2) / step;
    min.saturating_add(steps.saturating_mul(step)).min(max)
}

/// Parameters of the procedural galaxy.
///
/// Defaults reproduce the classic three-armed orange/blue galaxy.
#[derive(Parameters, Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParams {
    /// Number of particles.
    #[param(min = 100, max = 1_000_000, step = 100)]
    pub count: u32,
    /// Point size in world units (with size attenuation).
    #[param(min = 0.001, max = 0.1, step = 0.001)]
    pub size: f32,
    /// Outer radius of the disk.
    #[param(min = 1, max = 20, step = 0.1)]
    pub radius: f32,
    /// Twist applied per unit of radius.
    #[param(min = 1, max = 10, step = 0.01)]
    pub spin: f32,
    /// Number of spiral arms.
    #[param(min = 1, max = 10, step = 1)]
    pub branches: u32,
    /// Jitter magnitude relative to a particle's radius.
    #[param(min = 0, max = 2, step = 0.01)]
    pub randomness: f32,
    /// Exponent biasing jitter towards the arm.
    #[param(min = 1, max = 10, step = 0.01)]
    pub power: f32,
    #[param(color, label = "insideColor")]
    pub inside_color: Rgb,
    #[param(color, label = "outsideColor")]
    pub outside_color: Rgb,
}

impl GalaxyParams {
    pub const DEFAULT_INSIDE_COLOR: Rgb = Rgb::from_hex(0xff6030);
    pub const DEFAULT_OUTSIDE_COLOR: Rgb = Rgb::from_hex(0x1b3984);
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.02,
            radius: 3.0,
            spin: 1.0,
            branches: 3,
            randomness: 0.2,
            power: 3.0,
            inside_color: Self::DEFAULT_INSIDE_COLOR,
            outside_color: Self::DEFAULT_OUTSIDE_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParameterSet;

    fn spec(name: &str) -> ParamSpec {
        *GalaxyParams::FIELDS
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no spec for {name}"))
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let names: Vec<_> = GalaxyParams::FIELDS.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "count",
                "size",
                "radius",
                "spin",
                "branches",
                "randomness",
                "power",
                "inside_color",
                "outside_color"
            ]
        );
    }

    #[test]
    fn test_declared_ranges() {
        assert_eq!(
            spec("count").kind,
            ParamKind::Integer { min: 100, max: 1_000_000, step: 100 }
        );
        assert_eq!(
            spec("branches").kind,
            ParamKind::Integer { min: 1, max: 10, step: 1 }
        );
        assert_eq!(
            spec("size").kind,
            ParamKind::Float { min: 0.001, max: 0.1, step: 0.001 }
        );
        assert_eq!(
            spec("randomness").kind,
            ParamKind::Float { min: 0.0, max: 2.0, step: 0.01 }
        );
        assert_eq!(spec("inside_color").kind, ParamKind::Color);
        assert_eq!(spec("inside_color").label, "insideColor");
        assert_eq!(spec("power").label, "power");
    }

    #[test]
    fn test_defaults_are_in_range() {
        let p = GalaxyParams::default();
        let values = [
            p.count as f64,
            p.size as f64,
            p.radius as f64,
            p.spin as f64,
            p.branches as f64,
            p.randomness as f64,
            p.power as f64,
        ];
        for (spec, value) in GalaxyParams::FIELDS.iter().zip(values) {
            let (min, max) = match spec.kind {
                ParamKind::Float { min, max, .. } => (min as f64, max as f64),
                ParamKind::Integer { min, max, .. } => (min as f64, max as f64),
                ParamKind::Color => unreachable!("{} is not numeric", spec.name),
            };
            assert!((min..=max).contains(&value), "{} = {} out of range", spec.name, value);
        }
    }

    #[test]
    fn test_clamp_to_ranges() {
        let mut p = GalaxyParams {
            count: 5,
            size: 0.5,
            radius: 0.0,
            spin: 3.456,
            branches: 0,
            randomness: -1.0,
            power: 42.0,
            ..GalaxyParams::default()
        };
        p.clamp_to_ranges();

        assert_eq!(p.count, 100);
        assert!((p.size - 0.1).abs() < 1e-6);
        assert_eq!(p.radius, 1.0);
        assert!((p.spin - 3.46).abs() < 1e-5);
        assert_eq!(p.branches, 1);
        assert_eq!(p.randomness, 0.0);
        assert_eq!(p.power, 10.0);
        assert_eq!(p.inside_color, GalaxyParams::DEFAULT_INSIDE_COLOR);
    }

    #[test]
    fn test_clamp_keeps_defaults() {
        let mut p = GalaxyParams::default();
        p.clamp_to_ranges();
        let d = GalaxyParams::default();
        assert_eq!(p, d);
        for (got, want) in [
            (p.size, d.size),
            (p.radius, d.radius),
            (p.spin, d.spin),
            (p.randomness, d.randomness),
            (p.power, d.power),
        ] {
            assert_eq!(got.to_bits(), want.to_bits());
        }
    }

    #[test]
    fn test_snap_f32_keeps_grid_values() {
        assert_eq!(snap_f32(0.02, 0.001, 0.1, 0.001).to_bits(), 0.02f32.to_bits());
        assert_eq!(snap_f32(0.2, 0.0, 2.0, 0.01).to_bits(), 0.2f32.to_bits());
        // Off-grid values still move
        assert!((snap_f32(0.0234, 0.001, 0.1, 0.001) - 0.023).abs() < 1e-6);
    }

    #[test]
    fn test_snap_u32_rounds_to_step() {
        assert_eq!(snap_u32(149, 100, 1_000_000, 100), 100);
        assert_eq!(snap_u32(150, 100, 1_000_000, 100), 200);
        assert_eq!(snap_u32(2_000_000, 100, 1_000_000, 100), 1_000_000);
        assert_eq!(snap_u32(7, 1, 10, 0), 7);
    }

    #[test]
    fn test_snap_f32_handles_nan() {
        assert_eq!(snap_f32(f32::NAN, 1.0, 20.0, 0.1), 1.0);
        assert_eq!(snap_f32(f32::INFINITY, 1.0, 20.0, 0.1), 1.0);
    }
}
