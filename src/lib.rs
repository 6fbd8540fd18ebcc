//! # Galaxy
//!
//! A procedural spiral galaxy drawn as a GPU point cloud, with a live tweak
//! panel for its generation parameters.
//!
//! ## Quick Start
//!
//! ```ignore
//! use galaxy::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     Galaxy::new()
//!         .with_params(GalaxyParams {
//!             branches: 5,
//!             spin: 2.0,
//!             ..Default::default()
//!         })
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Parameters
//!
//! [`GalaxyParams`] holds particle count, point size, radius, spin, branch
//! count, randomness, randomness power and the inside/outside colours. Each
//! field declares its range and step with `#[param(...)]`; the
//! [`Parameters`] derive turns those into [`ParameterSet::FIELDS`],
//! [`ParameterSet::clamp_to_ranges`] and the panel widgets.
//!
//! ### Generation
//!
//! [`generate`] fills two flat buffers, positions and colours, with one
//! entry per particle. Particles are spread along `branches` spiral arms,
//! twisted by `spin` with distance, jittered by `randomness` raised to
//! `power`, and coloured from the inside colour at the centre to the outside
//! colour at the rim.
//!
//! ### Scene
//!
//! [`GalaxyScene`] owns the parameters and the live point cloud. Calling
//! [`GalaxyScene::regenerate`] releases the old point cloud before
//! installing the new one, so exactly one is ever shown.
//!
//! ### Viewport
//!
//! The window shows a 75° perspective camera starting at `(3, 3, 3)` with
//! damped orbit controls: left-drag rotates, right-drag pans, the wheel
//! zooms. Press `H` to hide the panel.
//!
//! ## Logging
//!
//! Uses the `log` facade. The binary installs `env_logger`, so set
//! `RUST_LOG=galaxy=debug` to see regeneration and resize details.

// Lets `#[derive(Parameters)]` refer to `galaxy::...` inside this crate too.
extern crate self as galaxy;

mod app;
pub mod camera;
pub mod color;
pub mod controls;
mod error;
pub mod frame_loop;
pub mod generator;
pub mod gpu;
pub mod input;
#[cfg(feature = "egui")]
pub mod panel;
pub mod params;
pub mod scene;
pub mod time;
pub mod viewport;
pub mod visuals;

pub use app::Galaxy;
pub use color::{ColorParseError, Rgb};
pub use controls::{CommitTracker, ControlResponse};
pub use error::{AppError, GpuError};
pub use frame_loop::{FrameInfo, FrameLoop, LoopControl, StopSignal};
pub use generator::{generate, generate_galaxy, PointCloudBuffers};
pub use params::{GalaxyParams, ParamKind, ParamSpec};
pub use scene::{GalaxyScene, PointCloudHost};
pub use visuals::{BlendMode, PointsMaterial};

pub use galaxy_derive::Parameters;

#[cfg(feature = "egui")]
pub use egui;

/// A struct of tweakable values with declared ranges.
///
/// Implemented by `#[derive(Parameters)]`; each field is annotated with
/// `#[param(min = .., max = .., step = ..)]` (`f32`/`u32`) or
/// `#[param(color)]` ([`Rgb`]).
pub trait ParameterSet {
    /// One entry per field, in declaration order.
    const FIELDS: &'static [ParamSpec];

    /// Snap every numeric field onto its step grid within its range.
    fn clamp_to_ranges(&mut self);

    /// Draw one widget per field and report what the user did with them.
    #[cfg(feature = "egui")]
    fn render_controls(&mut self, ui: &mut egui::Ui) -> ControlResponse;
}

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use galaxy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::{OrbitControls, PerspectiveCamera};
    pub use crate::color::Rgb;
    pub use crate::error::AppError;
    pub use crate::generator::{generate, generate_galaxy, PointCloudBuffers};
    pub use crate::params::GalaxyParams;
    pub use crate::scene::{GalaxyScene, PointCloudHost};
    pub use crate::visuals::{BlendMode, PointsMaterial};
    pub use crate::Galaxy;
    pub use crate::ParameterSet;
    pub use galaxy_derive::Parameters;
    #[cfg(feature = "egui")]
    pub use egui;
}
