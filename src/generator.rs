//! Procedural spiral galaxy generation.
//!
//! Each particle is placed at a random radius on one of the spiral arms,
//! twisted by `radius * spin`, and scattered by a per-axis jitter whose
//! magnitude grows with the radius. The vertical axis only receives jitter,
//! which flattens the cloud into a disk.

use std::f32::consts::TAU;

use rand::Rng;

use crate::params::GalaxyParams;

/// Position and colour buffers for one generated galaxy.
///
/// `positions[i]` and `colors[i]` describe the same particle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloudBuffers {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl PointCloudBuffers {
    /// Allocate empty buffers sized for `count` particles.
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat `x, y, z, x, y, z, ...` view of the positions.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Flat `r, g, b, r, g, b, ...` view of the colours.
    pub fn color_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Angle of the arm a particle belongs to, before any spin.
#[inline]
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

/// Generate a galaxy from `params` using `rng` as the random source.
///
/// `params` must be inside its declared ranges (`branches >= 1`,
/// `radius > 0`); the control panel guarantees this. `count = 0` yields
/// empty buffers.
pub fn generate<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> PointCloudBuffers {
    debug_assert!(params.branches > 0, "branches must be at least 1");

    let count = params.count as usize;
    let mut buffers = PointCloudBuffers::with_capacity(count);

    for i in 0..params.count {
        let radius = rng.gen::<f32>() * params.radius;
        let angle = branch_angle(i, params.branches) + radius * params.spin;

        let jitter_x = jitter(rng, radius, params);
        let jitter_y = jitter(rng, radius, params);
        let jitter_z = jitter(rng, radius, params);

        buffers.positions.push([
            angle.cos() * radius + jitter_x,
            jitter_y,
            angle.sin() * radius + jitter_z,
        ]);

        // radius never exceeds params.radius, the clamp only guards float error
        let t = if params.radius > 0.0 {
            (radius / params.radius).clamp(0.0, 1.0)
        } else {
            0.0
        };
        buffers
            .colors
            .push(params.inside_color.lerp(params.outside_color, t).to_array());
    }

    buffers
}

/// Generate a galaxy using the thread-local random source.
pub fn generate_galaxy(params: &GalaxyParams) -> PointCloudBuffers {
    generate(params, &mut rand::thread_rng())
}

#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, radius: f32, params: &GalaxyParams) -> f32 {
    let magnitude = rng.gen::<f32>().powf(params.power) * radius * params.randomness;
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
