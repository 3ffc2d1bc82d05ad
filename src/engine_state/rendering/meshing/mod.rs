//! Mesh generation for chunk occupancy data.
//!
//! This module converts a chunk's voxel grid into a renderable surface in three
//! stages:
//! 1. Cell derivation: every 2×2×2 voxel neighbourhood becomes a
//!    [`marching_cubes::Cell`] with an 8-bit corner mask
//! 2. Polygonization: Marching Cubes turns each cell into up to five triangles
//! 3. Vertex building: each triangle becomes three vertices with a shared face
//!    normal and tangent
//!
//! # Architecture
//! - `marching_cubes/`: Cells, triangles, the case tables and the polygonizer
//! - `mesh_builder`: Triangle to vertex conversion
//!
//! All stages are pure functions over owned buffers, so any number of chunks can
//! be meshed concurrently as long as each worker owns the chunks it writes.

pub mod marching_cubes;
pub mod mesh_builder;

pub use marching_cubes::{build_cells, polygonize, polygonize_cells, Cell, Triangle};
pub use mesh_builder::build_vertices;
