//! # Voxel Task System
//!
//! This module contains the tasks run by the world build coordinator. Each task
//! owns a disjoint slice of the chunk arena for the duration of the build.

pub mod chunk_build_task;
