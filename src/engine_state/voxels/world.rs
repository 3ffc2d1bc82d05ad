//! # World Module
//!
//! This module provides the `World` struct which owns every chunk of the voxel
//! world and the running triangle total across them.
//!
//! ## Architecture
//!
//! The world is a fixed arena: `PLANET_DIMENSION³` chunks allocated once at
//! construction and addressed by their linear chunk index. Chunks are never
//! added, removed or moved, so an index stays valid for the world's lifetime.
//!
//! Voxel access goes through world positions. Positions outside
//! `[world_limit, 0]` on any axis are not an error: reads return `None` and
//! writes are dropped.
//!
//! ## Triangle Total
//!
//! The world keeps the sum of all chunks' triangle counts. It is only changed
//! by [`World::rebuild_chunk`] (which swaps a chunk's old count for its new one)
//! and by [`World::sync_triangle_count`] after a bulk build, so at any point
//! between rebuilds it equals [`World::recount_triangles`].

use cgmath::Point3;
use log::debug;

use super::chunk::voxel_grid::PRESENT_BIT;
use super::chunk::Chunk;
use super::generation::{fill_chunk_with, GenerationMethod};
use super::layout::WorldLayout;

/// A fixed grid of chunks.
#[derive(Clone, Debug)]
pub struct World {
    layout: WorldLayout,
    chunks: Vec<Chunk>,
    triangle_count: usize,
}

impl World {
    /// Allocates every chunk of `layout`, all empty and without meshes.
    pub fn new(layout: WorldLayout) -> Self {
        let chunks = (0..layout.chunk_count())
            .map(|index| Chunk::new(index, layout.chunk_dimension))
            .collect();
        World {
            layout,
            chunks,
            triangle_count: 0,
        }
    }

    /// World and chunk dimensions.
    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Number of chunks, `PLANET_DIMENSION³`.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The chunk at a linear chunk index.
    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub(crate) fn chunk_mut(&mut self, index: usize) -> Option<&mut Chunk> {
        self.chunks.get_mut(index)
    }

    /// All chunks in index order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// All chunks in index order, for partitioning across build workers.
    pub(crate) fn chunks_mut(&mut self) -> &mut [Chunk] {
        &mut self.chunks
    }

    /// Reads the voxel byte at a world position.
    ///
    /// # Returns
    /// `None` when the position lies outside the world.
    pub fn voxel_at(&self, pos: Point3<i32>) -> Option<u8> {
        let chunk_index = self.layout.world_pos_to_chunk_index(pos)?;
        let voxel_index = self.layout.world_pos_to_voxel_index(pos);
        self.chunks.get(chunk_index)?.voxels.get_index(voxel_index)
    }

    /// Returns `true` if the voxel at `pos` exists and is present.
    pub fn is_present(&self, pos: Point3<i32>) -> bool {
        self.voxel_at(pos)
            .is_some_and(|voxel| voxel & PRESENT_BIT != 0)
    }

    /// Writes the voxel byte at a world position.
    ///
    /// The chunk's mesh is not touched; the caller is responsible for
    /// rebuilding it.
    ///
    /// # Returns
    /// `false` when the position lies outside the world and nothing was written.
    pub fn set_voxel(&mut self, pos: Point3<i32>, value: u8) -> bool {
        let Some(chunk_index) = self.layout.world_pos_to_chunk_index(pos) else {
            return false;
        };
        let voxel_index = self.layout.world_pos_to_voxel_index(pos);
        self.chunks
            .get_mut(chunk_index)
            .is_some_and(|chunk| chunk.voxels.set_index(voxel_index, value))
    }

    /// Mesh-space anchor of a chunk, see [`WorldLayout::chunk_anchor`].
    pub fn chunk_anchor(&self, index: usize) -> Point3<i32> {
        self.layout.chunk_anchor(index)
    }

    /// Refills every chunk with `method`. Meshes are left stale until rebuilt.
    pub fn fill(&mut self, method: &GenerationMethod) {
        let layout = self.layout;
        for chunk in &mut self.chunks {
            let index = chunk.index();
            fill_chunk_with(&mut chunk.voxels, method, index, &layout);
        }
    }

    /// Rebuilds one chunk's mesh and updates the running triangle total.
    ///
    /// # Returns
    /// The chunk's new triangle count, or `None` for an invalid index.
    pub fn rebuild_chunk(&mut self, index: usize) -> Option<usize> {
        let layout = self.layout;
        let chunk = self.chunks.get_mut(index)?;
        let previous = chunk.triangle_count();
        let current = chunk.rebuild(&layout);

        debug_assert!(previous <= self.triangle_count);
        self.triangle_count = self.triangle_count.saturating_sub(previous) + current;
        debug!(
            "Rebuilt chunk {}: {} -> {} triangles",
            index, previous, current
        );
        Some(current)
    }

    /// Rebuilds every chunk on the calling thread.
    ///
    /// # Returns
    /// The new triangle total.
    pub fn rebuild_all(&mut self) -> usize {
        let layout = self.layout;
        for chunk in &mut self.chunks {
            chunk.rebuild(&layout);
        }
        self.sync_triangle_count()
    }

    /// Resets the running total to the sum of all chunks' triangle counts.
    ///
    /// Called once after chunks were rebuilt outside [`World::rebuild_chunk`],
    /// such as by the parallel world build.
    pub(crate) fn sync_triangle_count(&mut self) -> usize {
        self.triangle_count = self.recount_triangles();
        self.triangle_count
    }

    /// The running triangle total across all chunks.
    pub fn total_triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Sums the triangle counts of all chunks.
    pub fn recount_triangles(&self) -> usize {
        self.chunks.iter().map(Chunk::triangle_count).sum()
    }

    /// Number of present voxels across all chunks.
    pub fn present_voxel_count(&self) -> usize {
        self.chunks
            .iter()
            .map(|chunk| chunk.voxels.present_count())
            .sum()
    }
}
