//! # Task Management System
//!
//! This module runs the initial world build across several worker threads.
//!
//! ## Architecture Overview
//!
//! - `Task`: a unit of work that runs on one worker
//! - `WorldBuildCoordinator`: splits the chunk arena into equal, contiguous
//!   slices, runs one task per slice and joins them
//!
//! ## Partitioning
//!
//! The worker count is a power of two derived from the available hardware
//! parallelism and reduced until it divides the chunk count, so every worker
//! owns exactly `chunk_count / workers` chunks. Slices are disjoint `&mut`
//! borrows of the arena: workers never contend on chunk data.
//!
//! The only shared resource is the mesh uploader. Workers take its lock around
//! the hand-off of a finished chunk and release it before building the next.
//!
//! ## Join Barrier
//!
//! Workers run on scoped threads. `build` returns only after every worker has
//! finished, so a caller never observes a partially built world. A panicking
//! worker surfaces as [`EngineError::WorkerPanicked`].

pub mod task;

use std::thread;

use log::info;
use web_time::Instant;

use task::Task;

use crate::core::MtResource;
use crate::engine_state::rendering::upload::MeshUploader;
use crate::engine_state::voxels::generation::GenerationMethod;
use crate::engine_state::voxels::tasks::chunk_build_task::{ChunkBuildReport, ChunkBuildTask};
use crate::engine_state::voxels::world::World;
use crate::error::EngineError;

/// Largest power of two that is at most `value`. `value` must be non-zero.
fn floor_power_of_two(value: usize) -> usize {
    1 << (usize::BITS - 1 - value.leading_zeros())
}

/// Chooses how many workers build a world of `chunk_count` chunks.
///
/// # Arguments
/// * `requested` - Explicit worker count; `None` uses the available hardware
///   parallelism
/// * `chunk_count` - Number of chunks to partition
///
/// # Returns
/// A power of two that divides `chunk_count`, at least 1. A requested count is
/// rounded down the same way.
pub fn worker_count(requested: Option<usize>, chunk_count: usize) -> usize {
    let available = requested.unwrap_or_else(|| {
        thread::available_parallelism()
            .map(|parallelism| parallelism.get())
            .unwrap_or(1)
    });
    let mut workers = floor_power_of_two(available.max(1));
    while workers > 1 && chunk_count % workers != 0 {
        workers >>= 1;
    }
    workers
}

/// Runs tasks on scoped worker threads and waits for all of them.
///
/// # Returns
/// The task outputs in task order, or the first error in task order.
pub fn run_tasks<T: Task>(tasks: Vec<T>) -> Result<Vec<T::Output>, EngineError> {
    thread::scope(|scope| {
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| scope.spawn(move || task.process()))
            .collect();

        // Join every worker before looking at any result.
        let joined: Vec<_> = handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .map_err(|_| EngineError::WorkerPanicked { worker })
                    .and_then(|result| result)
            })
            .collect();

        joined.into_iter().collect()
    })
}

/// Summary of a finished world build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldBuildSummary {
    /// Workers the arena was split across
    pub workers: usize,
    /// Chunks built
    pub chunks: usize,
    /// Chunks whose vertex list was handed to the uploader
    pub uploaded: usize,
    /// Triangle total after the build
    pub triangles: usize,
}

/// Builds every chunk of a world in parallel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldBuildCoordinator {
    worker_count: Option<usize>,
}

impl WorldBuildCoordinator {
    /// Creates a coordinator.
    ///
    /// # Arguments
    /// * `worker_count` - Explicit worker count, or `None` for the hardware
    ///   default. Either way the count is reduced per [`worker_count`].
    pub fn new(worker_count: Option<usize>) -> Self {
        Self { worker_count }
    }

    /// Fills, polygonizes and meshes every chunk, handing non-empty meshes to
    /// `uploader`.
    ///
    /// # Errors
    /// - [`EngineError::Upload`] when the uploader refuses a chunk
    /// - [`EngineError::WorkerPanicked`] when a worker panics
    ///
    /// On error the world's chunks may be partially rebuilt. The triangle total
    /// is resynced either way, so it always matches the chunks' meshes.
    pub fn build<U: MeshUploader>(
        &self,
        world: &mut World,
        method: &GenerationMethod,
        uploader: &MtResource<U>,
    ) -> Result<WorldBuildSummary, EngineError> {
        let start = Instant::now();
        let layout = *world.layout();
        let chunk_count = world.chunk_count();
        let workers = worker_count(self.worker_count, chunk_count);
        let slice_len = (chunk_count / workers).max(1);

        info!(
            "Building {} chunks on {} workers ({} chunks each)",
            chunk_count, workers, slice_len
        );

        let tasks: Vec<_> = world
            .chunks_mut()
            .chunks_mut(slice_len)
            .enumerate()
            .map(|(worker, chunks)| {
                ChunkBuildTask::new(worker, chunks, layout, *method, uploader.clone())
            })
            .collect();

        let reports = run_tasks(tasks);
        let triangles = world.sync_triangle_count();
        let reports: Vec<ChunkBuildReport> = reports?;
        let summary = WorldBuildSummary {
            workers,
            chunks: reports.iter().map(|report| report.chunks).sum(),
            uploaded: reports.iter().map(|report| report.uploaded).sum(),
            triangles,
        };

        info!(
            "World build finished in {:?}: {} triangles, {} chunk meshes uploaded",
            start.elapsed(),
            summary.triangles,
            summary.uploaded
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(usize);

    impl Task for Echo {
        type Output = usize;

        fn process(self) -> Result<usize, EngineError> {
            Ok(self.0 * 2)
        }
    }

    struct Panics;

    impl Task for Panics {
        type Output = ();

        fn process(self) -> Result<(), EngineError> {
            panic!("worker failure");
        }
    }

    #[test]
    fn floor_power_of_two_rounds_down() {
        assert_eq!(floor_power_of_two(1), 1);
        assert_eq!(floor_power_of_two(2), 2);
        assert_eq!(floor_power_of_two(3), 2);
        assert_eq!(floor_power_of_two(12), 8);
        assert_eq!(floor_power_of_two(16), 16);
    }

    #[test]
    fn worker_count_divides_chunk_count() {
        assert_eq!(worker_count(Some(8), 512), 8);
        assert_eq!(worker_count(Some(6), 512), 4);
        assert_eq!(worker_count(Some(16), 8), 8);
        assert_eq!(worker_count(Some(8), 27), 1);
        assert_eq!(worker_count(Some(8), 12), 4);
        assert_eq!(worker_count(Some(0), 512), 1);

        let default = worker_count(None, 512);
        assert!(default.is_power_of_two());
        assert_eq!(512 % default, 0);
    }

    #[test]
    fn run_tasks_keeps_task_order() {
        let outputs = run_tasks((0..5).map(Echo).collect()).unwrap();
        assert_eq!(outputs, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn worker_panic_becomes_an_error() {
        let result = run_tasks(vec![Panics]);
        assert!(matches!(
            result,
            Err(EngineError::WorkerPanicked { worker: 0 })
        ));
    }
}
