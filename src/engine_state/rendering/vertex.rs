//! Vertex data structures for chunk meshes.
//!
//! This module defines the vertex format handed to the rendering layer. The
//! layout is plain `#[repr(C)]` data so a chunk's vertex list can be
//! reinterpreted as bytes with `bytemuck` and copied straight into a GPU buffer.

use cgmath::{Point3, Vector3};

/// A vertex of a chunk's surface mesh.
///
/// Meshes are non-indexed: every triangle owns its three vertices, and all three
/// carry the triangle's face normal and tangent.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes), currently always zero
/// - Tangent: 3x f32 (12 bytes)
///
/// Total size: 44 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Mesh-space position
    pub position: [f32; 3],
    /// Unit face normal, pointing out of the solid
    pub normal: [f32; 3],
    /// Texture coordinates placeholder
    pub tex_coords: [f32; 2],
    /// Unit tangent along the triangle's second edge
    pub tangent: [f32; 3],
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `position` - Mesh-space position of the vertex
    /// * `normal` - Face normal shared by the owning triangle
    /// * `tangent` - Tangent shared by the owning triangle
    ///
    /// # Returns
    /// A new `Vertex` with zeroed texture coordinates
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tangent: Vector3<f32>) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords: [0.0, 0.0],
            tangent: tangent.into(),
        }
    }

    /// Size of one vertex in bytes, the stride of a vertex buffer.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}
