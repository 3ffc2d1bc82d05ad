//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one fixed slot of the world holding
//! a cubic block of voxel occupancy data together with the mesh derived from it.
//!
//! ## Derived Data
//!
//! A chunk carries three derived lists next to its voxels:
//! - `cells`: one Marching Cubes cell per 2×2×2 voxel neighbourhood
//! - `triangles`: the polygonized surface of those cells
//! - `vertices`: three vertices per triangle, the renderable artifact
//!
//! The derived lists are always recomputed in full by [`Chunk::rebuild`], never
//! patched. After a rebuild they describe exactly the current voxels; any voxel
//! mutation must be followed by a rebuild before the mesh is read again.
//!
//! ## Memory
//!
//! Voxels are stored densely (one byte each). Cells are scratch data kept only
//! so they can be inspected; they are rebuilt from scratch on every pass.

use cgmath::Point3;

use super::layout::WorldLayout;
use crate::engine_state::rendering::meshing::{build_cells, build_vertices, polygonize_cells};
use crate::engine_state::rendering::meshing::{Cell, Triangle};
use crate::engine_state::rendering::upload::BufferWriteCommand;
use crate::engine_state::rendering::Vertex;

pub mod voxel_grid;

use voxel_grid::VoxelGrid;

/// A fixed-size cubic sub-volume of the world, the unit of mesh regeneration.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Slot of this chunk in the world
    index: usize,
    /// Occupancy bytes, bit 0 marks a present voxel
    pub(crate) voxels: VoxelGrid,
    cells: Vec<Cell>,
    triangles: Vec<Triangle>,
    vertices: Vec<Vertex>,
}

impl Chunk {
    /// Creates an empty chunk with no mesh.
    ///
    /// # Arguments
    /// * `index` - Slot of the chunk in the world
    /// * `dimension` - Voxels per axis
    pub fn new(index: usize, dimension: i32) -> Self {
        Chunk {
            index,
            voxels: VoxelGrid::new(dimension),
            cells: Vec::new(),
            triangles: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Linear index of this chunk in the world.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The chunk's occupancy data.
    pub fn voxels(&self) -> &VoxelGrid {
        &self.voxels
    }

    /// Marching Cubes cells from the last rebuild.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mesh-space triangles from the last rebuild.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Vertex list from the last rebuild, three per triangle.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of triangles from the last rebuild.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of vertices from the last rebuild.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Recomputes cells, triangles and vertices from the current voxels.
    ///
    /// # Arguments
    /// * `layout` - World dimensions, used to place the mesh at the chunk anchor
    ///
    /// # Returns
    /// The new triangle count.
    pub fn rebuild(&mut self, layout: &WorldLayout) -> usize {
        self.cells.clear();
        self.triangles.clear();
        self.vertices.clear();

        let anchor: Point3<i32> = layout.chunk_anchor(self.index);
        build_cells(&self.voxels, anchor, &mut self.cells);
        polygonize_cells(&self.cells, &mut self.triangles);
        build_vertices(&self.triangles, &mut self.vertices);

        self.triangles.len()
    }

    /// Packs the current vertex list for the rendering layer.
    pub fn buffer_write_command(&self) -> BufferWriteCommand {
        BufferWriteCommand::from_vertices(self.index, &self.vertices)
    }
}
