//! Ownership of the live point cloud.
//!
//! [`GalaxyScene`] holds the current parameters, the buffers generated from
//! them and the handle of the displayable point cloud built from those
//! buffers. The displayable object itself is created and destroyed by a
//! [`PointCloudHost`] (the GPU renderer in the application, a recording
//! fake in tests).
//!
//! Regeneration always releases the previous point cloud before the new one
//! is installed, so at most one is ever alive.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::generator::{generate, PointCloudBuffers};
use crate::params::GalaxyParams;
use crate::visuals::PointsMaterial;
use crate::ParameterSet;

/// Something that can display a point cloud.
pub trait PointCloudHost {
    /// Handle to an installed point cloud.
    type Resource;

    /// Build a displayable point cloud from `buffers` and add it to the scene.
    fn install_point_cloud(
        &mut self,
        buffers: &PointCloudBuffers,
        material: &PointsMaterial,
    ) -> Self::Resource;

    /// Remove a point cloud from the scene and free what backs it.
    fn release_point_cloud(&mut self, resource: Self::Resource);
}

/// Owner of the galaxy's parameters, buffers and live point cloud.
pub struct GalaxyScene<H: PointCloudHost> {
    params: GalaxyParams,
    buffers: PointCloudBuffers,
    points: Option<H::Resource>,
    rng: StdRng,
    generation: u64,
}

impl<H: PointCloudHost> GalaxyScene<H> {
    /// Create a scene seeded from OS entropy. Nothing is installed yet.
    pub fn new(params: GalaxyParams) -> Self {
        Self::from_rng(params, StdRng::from_entropy())
    }

    /// Create a scene whose galaxies are reproducible for a given seed.
    pub fn with_seed(params: GalaxyParams, seed: u64) -> Self {
        Self::from_rng(params, StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut params: GalaxyParams, rng: StdRng) -> Self {
        params.clamp_to_ranges();
        Self {
            params,
            buffers: PointCloudBuffers::default(),
            points: None,
            rng,
            generation: 0,
        }
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    /// Replace the parameters, snapping them into their declared ranges.
    ///
    /// Takes effect on the next [`regenerate`](Self::regenerate).
    pub fn set_params(&mut self, mut params: GalaxyParams) {
        params.clamp_to_ranges();
        self.params = params;
    }

    /// Material derived from the current parameters.
    pub fn material(&self) -> PointsMaterial {
        PointsMaterial::galaxy(self.params.size)
    }

    /// Regenerate the galaxy and swap it into `host`.
    ///
    /// The previous point cloud is released before the new one is installed.
    pub fn regenerate(&mut self, host: &mut H) -> &PointCloudBuffers {
        let started = Instant::now();
        self.buffers = generate(&self.params, &mut self.rng);

        self.dispose(host);
        let material = self.material();
        self.points = Some(host.install_point_cloud(&self.buffers, &material));
        self.generation += 1;

        log::info!(
            "Generated galaxy #{}: {} particles, {} branches in {:.1} ms",
            self.generation,
            self.buffers.len(),
            self.params.branches,
            started.elapsed().as_secs_f64() * 1000.0
        );

        &self.buffers
    }

    /// Release the installed point cloud, if any.
    pub fn dispose(&mut self, host: &mut H) {
        if let Some(points) = self.points.take() {
            log::debug!("Releasing point cloud from generation {}", self.generation);
            host.release_point_cloud(points);
        }
    }

    /// The installed point cloud.
    pub fn points(&self) -> Option<&H::Resource> {
        self.points.as_ref()
    }

    pub fn is_installed(&self) -> bool {
        self.points.is_some()
    }

    /// Buffers of the most recent generation.
    pub fn buffers(&self) -> &PointCloudBuffers {
        &self.buffers
    }

    /// Number of completed regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
