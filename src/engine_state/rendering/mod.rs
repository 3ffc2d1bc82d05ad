//! # Rendering Output
//!
//! Everything the engine produces for the rendering layer: the vertex format,
//! the meshing pipeline that fills it, and the upload hand-off that passes
//! finished meshes on.
//!
//! The engine itself owns no GPU objects. Pipelines, buffers, shaders and draw
//! submission belong to the host, which consumes:
//! * a vertex list and vertex count per chunk
//! * the world's total triangle count
//! * the set of chunk indices whose buffers must be refreshed after an edit

pub mod meshing;
pub mod upload;
mod vertex;

pub use vertex::Vertex;
