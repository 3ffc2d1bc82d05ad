//! # Chunk Build Task
//!
//! This module defines the `ChunkBuildTask`, the work one worker performs during
//! the initial world build: fill, polygonize and mesh a contiguous slice of
//! chunks, then hand every non-empty mesh to the shared uploader.

use log::debug;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::upload::MeshUploader,
        task_management::task::Task,
        voxels::{
            chunk::Chunk,
            generation::{fill_chunk_with, GenerationMethod},
            layout::WorldLayout,
        },
    },
    error::EngineError,
};

/// Builds a slice of chunks owned exclusively by one worker.
pub struct ChunkBuildTask<'a, U: MeshUploader> {
    /// Worker number, used for logging
    worker: usize,
    /// The chunks this worker owns for the duration of the build
    chunks: &'a mut [Chunk],
    layout: WorldLayout,
    method: GenerationMethod,
    /// Upload hand-off shared by every worker
    uploader: MtResource<U>,
}

impl<'a, U: MeshUploader> ChunkBuildTask<'a, U> {
    /// Creates a build task.
    ///
    /// # Arguments
    /// * `worker` - Worker number
    /// * `chunks` - Contiguous slice of the chunk arena
    /// * `layout` - World dimensions
    /// * `method` - How chunks are filled
    /// * `uploader` - Shared mesh uploader
    pub fn new(
        worker: usize,
        chunks: &'a mut [Chunk],
        layout: WorldLayout,
        method: GenerationMethod,
        uploader: MtResource<U>,
    ) -> Self {
        ChunkBuildTask {
            worker,
            chunks,
            layout,
            method,
            uploader,
        }
    }
}

/// What one worker did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkBuildReport {
    /// Chunks built
    pub chunks: usize,
    /// Chunks handed to the uploader
    pub uploaded: usize,
    /// Triangles across the built chunks
    pub triangles: usize,
}

impl<U: MeshUploader> Task for ChunkBuildTask<'_, U> {
    type Output = ChunkBuildReport;

    /// Builds every chunk of the slice.
    ///
    /// Chunks without vertices are not uploaded; the renderer has nothing to
    /// draw for them.
    fn process(self) -> Result<ChunkBuildReport, EngineError> {
        let ChunkBuildTask {
            worker,
            chunks,
            layout,
            method,
            uploader,
        } = self;
        let mut report = ChunkBuildReport::default();

        for chunk in chunks.iter_mut() {
            let index = chunk.index();
            fill_chunk_with(&mut chunk.voxels, &method, index, &layout);
            report.triangles += chunk.rebuild(&layout);
            report.chunks += 1;

            if chunk.vertex_count() == 0 {
                continue;
            }
            let command = chunk.buffer_write_command();
            uploader
                .lock()
                .upload(command)
                .map_err(|source| EngineError::Upload {
                    chunk_index: index,
                    source,
                })?;
            report.uploaded += 1;
        }

        debug!(
            "Worker {} built {} chunks, {} triangles",
            worker, report.chunks, report.triangles
        );
        Ok(report)
    }
}
