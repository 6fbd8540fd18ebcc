//! Material settings for the point cloud.
//!
//! A [`PointsMaterial`] travels alongside the generated buffers when a point
//! cloud is installed, and decides how each particle is rasterised:
//!
//! ```ignore
//! let material = PointsMaterial::galaxy(params.size);
//! assert_eq!(material.blend_mode, BlendMode::Additive);
//! assert!(!material.depth_write);
//! ```

/// Blend mode for particle rendering.
///
/// Controls how particle colors combine with the background and each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    #[default]
    Alpha,

    /// Additive blending.
    ///
    /// Overlapping particles add up and glow, which is what gives the
    /// galaxy core its bright look.
    Additive,
}

impl BlendMode {
    /// The wgpu blend state for this mode.
    pub fn to_blend_state(self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

/// How a point cloud is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    /// Point size. World units when `size_attenuation` is on, pixels otherwise.
    pub size: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
    pub blend_mode: BlendMode,
    /// Write to the depth buffer. Off for glowing, order-independent points.
    pub depth_write: bool,
    /// Use per-vertex colours; white otherwise.
    pub vertex_colors: bool,
}

impl PointsMaterial {
    /// The material used for galaxies: attenuated, additive, no depth
    /// writes, coloured per vertex.
    pub fn galaxy(size: f32) -> Self {
        Self {
            size,
            size_attenuation: true,
            blend_mode: BlendMode::Additive,
            depth_write: false,
            vertex_colors: true,
        }
    }
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            size: 1.0,
            size_attenuation: true,
            blend_mode: BlendMode::Alpha,
            depth_write: true,
            vertex_colors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_galaxy_material() {
        let m = PointsMaterial::galaxy(0.02);
        assert_eq!(m.size, 0.02);
        assert!(m.size_attenuation);
        assert_eq!(m.blend_mode, BlendMode::Additive);
        assert!(!m.depth_write);
        assert!(m.vertex_colors);
    }

    #[test]
    fn test_additive_adds_destination() {
        let state = BlendMode::Additive.to_blend_state();
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
    }
}
