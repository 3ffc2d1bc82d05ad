//! # Engine State Module
//!
//! The core engine module that owns the voxel world and drives its build and
//! edit cycle.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `rendering` - Vertex format, meshing pipeline and the upload hand-off
//! * `remesh` - Damaged-chunk tracking and incremental rebuilds
//! * `task_management` - The parallel initial world build
//! * `voxels` - Voxel data, chunks, generation and ray casting
//!
//! ## Architecture
//!
//! `EngineState` is the single entry point an input-handling host talks to. It
//! builds the world once, then serves edit requests: cast a ray, remove a sphere
//! of voxels around the hit, remesh the chunks that changed and hand their new
//! vertex lists to the uploader.
//!
//! All runtime edits run on the caller's thread. Only `build_world` spreads
//! work across threads, and it returns after every worker has joined.

use std::sync::MutexGuard;

use cgmath::{Point3, Vector3};
use log::{debug, info, warn};

use rendering::upload::MeshUploader;
use remesh::{DamagedChunks, RemeshScheduler};
use task_management::{WorldBuildCoordinator, WorldBuildSummary};
use voxels::generation::{remove_voxels, sphere_removal};
use voxels::ray_cast::{cast_ray, RayCastOutcome};
use voxels::world::World;

use crate::config::EngineConfig;
use crate::core::MtResource;
use crate::error::EngineError;

pub mod remesh;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Result of one [`EngineState::carve`] interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarveReport {
    /// How the targeting ray ended
    pub outcome: RayCastOutcome,
    /// Voxels that were present and are now cleared
    pub removed: usize,
    /// Chunks remeshed and re-uploaded, in ascending order
    pub refreshed: Vec<usize>,
    /// World triangle total after the remesh
    pub triangles: usize,
}

/// The main state container for the voxel engine.
///
/// # Type Parameters
/// - `U`: The mesh uploader finished chunk meshes are handed to
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use marching_voxels::config::EngineConfig;
/// use marching_voxels::engine_state::rendering::upload::RecordingUploader;
/// use marching_voxels::engine_state::voxels::layout::WorldLayout;
/// use marching_voxels::engine_state::EngineState;
///
/// let mut config = EngineConfig::default();
/// config.world = WorldLayout::new(2, 8);
/// config.edit.removal_radius = 2.0;
///
/// let mut engine = EngineState::new(config, RecordingUploader::new()).unwrap();
/// engine.build_world().unwrap();
///
/// let report = engine
///     .carve(Point3::new(-3.5, -0.5, -3.5), Vector3::new(0.0, -1.0, 0.0))
///     .unwrap();
/// assert!(report.outcome.hit().is_some());
/// assert_eq!(report.triangles, engine.world().recount_triangles());
/// ```
pub struct EngineState<U: MeshUploader> {
    config: EngineConfig,
    world: World,
    remesh: RemeshScheduler,
    coordinator: WorldBuildCoordinator,
    uploader: MtResource<U>,
}

impl<U: MeshUploader> EngineState<U> {
    /// Creates an engine with an allocated but unbuilt world.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn new(config: EngineConfig, uploader: U) -> Result<Self, EngineError> {
        config.validate()?;
        info!(
            "Allocating {} chunks of {}³ voxels",
            config.world.chunk_count(),
            config.world.chunk_dimension
        );

        Ok(EngineState {
            world: World::new(config.world),
            remesh: RemeshScheduler::new(),
            coordinator: WorldBuildCoordinator::new(config.build.worker_count),
            uploader: MtResource::new(uploader),
            config,
        })
    }

    /// The validated configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The voxel world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for tools that edit voxels themselves. Chunks they
    /// change must be recorded with [`EngineState::damaged_mut`].
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Chunks waiting for the next remesh pass.
    pub fn damaged(&self) -> &DamagedChunks {
        self.remesh.damaged()
    }

    /// Mutable access to the damaged set, for edits made through
    /// [`EngineState::world_mut`].
    pub fn damaged_mut(&mut self) -> &mut DamagedChunks {
        self.remesh.damaged_mut()
    }

    /// Exclusive access to the uploader.
    ///
    /// # Panics
    /// Panics if a build worker panicked while holding the upload lock.
    pub fn uploader(&self) -> MutexGuard<'_, U> {
        self.uploader.lock()
    }

    /// The world's running triangle total.
    pub fn total_triangle_count(&self) -> usize {
        self.world.total_triangle_count()
    }

    /// Fills and meshes every chunk in parallel with the configured generation
    /// method.
    ///
    /// Rebuilding an already built world starts over from the generation
    /// method; earlier edits are lost.
    pub fn build_world(&mut self) -> Result<WorldBuildSummary, EngineError> {
        let method = self.config.generation;
        let summary = self
            .coordinator
            .build(&mut self.world, &method, &self.uploader)?;
        self.remesh.damaged_mut().clear();
        Ok(summary)
    }

    /// Finds the first present voxel along a ray, within the configured step
    /// budget.
    pub fn cast_ray(&self, origin: Point3<f32>, direction: Vector3<f32>) -> RayCastOutcome {
        cast_ray(
            &self.world,
            origin,
            direction,
            self.config.edit.max_ray_steps,
        )
    }

    /// Removes a sphere of the configured radius around `center` and records
    /// the damaged chunks. Nothing is remeshed yet.
    ///
    /// # Returns
    /// The number of voxels that were present and are now cleared.
    pub fn remove_sphere(&mut self, center: Point3<f32>) -> usize {
        let positions = sphere_removal(center, self.config.edit.removal_radius);
        remove_voxels(&positions, &mut self.world, self.remesh.damaged_mut())
    }

    /// Rebuilds every damaged chunk and uploads its new mesh.
    ///
    /// Chunks left without vertices are uploaded too, so the renderer drops
    /// what it had for them.
    ///
    /// # Returns
    /// The refreshed chunk indices in ascending order.
    ///
    /// # Errors
    /// Returns [`EngineError::Upload`] when the uploader refuses a chunk. That
    /// chunk and every chunk after it stay damaged for the next pass.
    pub fn remesh_damaged(&mut self) -> Result<Vec<usize>, EngineError> {
        let refreshed = self.remesh.rebuild_damaged(&mut self.world);

        let mut uploader = self.uploader.lock();
        for (position, &chunk_index) in refreshed.iter().enumerate() {
            let Some(chunk) = self.world.chunk(chunk_index) else {
                continue;
            };
            if let Err(source) = uploader.upload(chunk.buffer_write_command()) {
                let damaged = self.remesh.damaged_mut();
                for &pending in &refreshed[position..] {
                    damaged.insert(pending);
                }
                warn!(
                    "Upload of chunk {} failed, {} chunks left damaged",
                    chunk_index,
                    damaged.len()
                );
                return Err(EngineError::Upload {
                    chunk_index,
                    source,
                });
            }
        }
        Ok(refreshed)
    }

    /// The full edit interaction: cast a ray, remove a sphere at the hit and
    /// remesh the chunks it touched.
    ///
    /// A ray that hits nothing leaves the world untouched.
    pub fn carve(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Result<CarveReport, EngineError> {
        let outcome = self.cast_ray(origin, direction);
        let Some(hit) = outcome.hit() else {
            debug!("Carve ray missed: {:?}", outcome);
            return Ok(CarveReport {
                outcome,
                removed: 0,
                refreshed: Vec::new(),
                triangles: self.total_triangle_count(),
            });
        };

        let removed = self.remove_sphere(Point3::new(hit.x as f32, hit.y as f32, hit.z as f32));
        let refreshed = self.remesh_damaged()?;
        info!(
            "Carved {} voxels at {:?}, refreshed {} chunks",
            removed,
            hit,
            refreshed.len()
        );

        Ok(CarveReport {
            outcome,
            removed,
            refreshed,
            triangles: self.total_triangle_count(),
        })
    }
}
