//! # Remesh Scheduling
//!
//! Keeps remeshing cost proportional to the size of an edit. Edits record the
//! chunks they touched in a [`DamagedChunks`] set; a remesh pass then rebuilds
//! exactly those chunks and empties the set.
//!
//! Remeshing runs on the edit thread only. The set and the world's running
//! triangle total are never touched concurrently.

use std::collections::BTreeSet;

use log::info;
use web_time::Instant;

use super::voxels::world::World;

/// Chunks whose voxels changed since their last rebuild.
///
/// Insertion is idempotent: a chunk hit by many removed voxels is rebuilt once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DamagedChunks {
    indices: BTreeSet<usize>,
}

impl DamagedChunks {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a chunk as damaged.
    ///
    /// # Returns
    /// `true` if the chunk was not already marked.
    pub fn insert(&mut self, chunk_index: usize) -> bool {
        self.indices.insert(chunk_index)
    }

    /// Returns `true` if the chunk is waiting for a rebuild.
    pub fn contains(&self, chunk_index: usize) -> bool {
        self.indices.contains(&chunk_index)
    }

    /// Number of damaged chunks.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no chunk is damaged.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Damaged chunk indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Forgets every damaged chunk without rebuilding it.
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Empties the set, returning its indices in ascending order.
    fn take(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.indices).into_iter().collect()
    }
}

/// Owns the damaged set between an edit and the following remesh pass.
#[derive(Debug, Default)]
pub struct RemeshScheduler {
    damaged: DamagedChunks,
    passes: u64,
}

impl RemeshScheduler {
    /// Creates a scheduler with nothing damaged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunks waiting for the next pass.
    pub fn damaged(&self) -> &DamagedChunks {
        &self.damaged
    }

    /// Mutable access for edits that record damage.
    pub fn damaged_mut(&mut self) -> &mut DamagedChunks {
        &mut self.damaged
    }

    /// Number of completed [`RemeshScheduler::rebuild_damaged`] passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Rebuilds one chunk, keeping the world's triangle total in step.
    ///
    /// # Returns
    /// The chunk's new triangle count, or `None` for an invalid index.
    pub fn rebuild_chunk(&self, world: &mut World, chunk_index: usize) -> Option<usize> {
        world.rebuild_chunk(chunk_index)
    }

    /// Rebuilds every damaged chunk once and clears the set.
    ///
    /// # Returns
    /// The rebuilt chunk indices in ascending order. Indices outside the world
    /// are dropped.
    pub fn rebuild_damaged(&mut self, world: &mut World) -> Vec<usize> {
        let start = Instant::now();
        let mut rebuilt = self.damaged.take();
        rebuilt.retain(|&index| self.rebuild_chunk(world, index).is_some());
        self.passes += 1;

        info!(
            "Remeshed {} chunks in {:?}, {} triangles total",
            rebuilt.len(),
            start.elapsed(),
            world.total_triangle_count()
        );
        rebuilt
    }
}
