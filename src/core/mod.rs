//! # Core Module
//!
//! Fundamental concurrency primitives shared by the rest of the crate.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with exclusive locking,
//!   used to serialize the mesh upload hand-off during the parallel world build
//!
//! ## Usage
//! ```rust
//! use marching_voxels::core::MtResource;
//!
//! let uploads = MtResource::new(Vec::<usize>::new());
//! uploads.lock().push(3);
//! assert_eq!(uploads.lock().len(), 1);
//! ```

/// Shared, mutex-guarded resources.
pub mod mt_resource;

pub use mt_resource::MtResource;
