//! # Voxel Engine Core
//!
//! This module contains the voxel data model: how the world is laid out, how
//! chunks store occupancy, how they are filled and edited, and how rays find
//! the voxel they strike.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Layout**: Pure coordinate mapping between world positions, chunk indices
//!   and voxel indices
//! * **Chunk**: A fixed-size cube of voxels plus the mesh derived from it
//! * **World**: The arena owning every chunk and the running triangle total
//! * **Generation**: Procedural fills and sphere-shaped removal
//! * **Ray Cast**: DDA traversal to the first present voxel
//! * **Tasks**: The per-worker unit of the parallel world build
//!
//! ## Data Flow
//!
//! 1. The build coordinator hands each worker a slice of chunks to fill and mesh
//! 2. At runtime a ray cast picks a target voxel
//! 3. A removal clears voxels around it and marks the touched chunks damaged
//! 4. The remesh scheduler rebuilds only the damaged chunks
//!
//! ## Thread Safety
//!
//! * During the build each worker owns a disjoint `&mut` slice of chunks
//! * Edits and remeshes happen on one thread, never during the build

pub mod chunk;
pub mod generation;
pub mod layout;
pub mod ray_cast;
pub mod tasks;
pub mod world;
