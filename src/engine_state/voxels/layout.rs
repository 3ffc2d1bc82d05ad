//! # World Layout Module
//!
//! Pure coordinate mapping between world-space voxel positions, linear chunk
//! indices and linear voxel indices inside a chunk.
//!
//! ## Coordinate Spaces
//!
//! The world starts at the origin and extends in the negative x, y and z
//! directions, down to [`WorldLayout::world_limit`] on every axis. There is no
//! wraparound: any position with a coordinate above `0` or below the limit is
//! outside the world.
//!
//! Meshes are produced in *mesh space*, the negation of world space, where a
//! chunk's anchor is its grid coordinate scaled by the chunk dimension. The
//! rendering layer is responsible for mapping mesh space back onto the world.
//!
//! ## Linearization
//!
//! Both chunk grids and voxel grids linearize as `x + y * D + z * D²`, where
//! `D` is the planet dimension (in chunks) or the chunk dimension (in voxels).

use cgmath::Point3;
use serde::{Deserialize, Serialize};

/// Number of chunks along each axis of the default world.
pub const PLANET_DIMENSION: i32 = 8;
/// Number of voxels along each axis of a default chunk.
pub const CHUNK_DIMENSION: i32 = 16;

/// Half of a chunk's face diagonal factor, used for the culling radius.
const CHUNK_RADIUS_FACTOR: f32 = 1.414;

/// The fixed dimensions of a world: how many chunks it has per axis and how
/// many voxels each chunk has per axis.
///
/// All mapping functions are pure; the layout itself is a small `Copy` value
/// handed to whoever needs to translate coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldLayout {
    /// Chunks per axis.
    pub planet_dimension: i32,
    /// Voxels per chunk axis.
    pub chunk_dimension: i32,
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self::new(PLANET_DIMENSION, CHUNK_DIMENSION)
    }
}

impl WorldLayout {
    /// Creates a layout of `planet_dimension³` chunks of `chunk_dimension³`
    /// voxels each.
    pub const fn new(planet_dimension: i32, chunk_dimension: i32) -> Self {
        Self {
            planet_dimension,
            chunk_dimension,
        }
    }

    /// Total number of chunks in the world.
    pub fn chunk_count(&self) -> usize {
        (self.planet_dimension * self.planet_dimension * self.planet_dimension) as usize
    }

    /// Number of voxels stored by a single chunk.
    pub fn voxels_per_chunk(&self) -> usize {
        (self.chunk_dimension * self.chunk_dimension * self.chunk_dimension) as usize
    }

    /// The most negative valid coordinate on every axis.
    pub fn world_limit(&self) -> i32 {
        -(self.planet_dimension * self.chunk_dimension) + 1
    }

    /// Returns `true` if every axis of `pos` lies in `[world_limit, 0]`.
    pub fn contains(&self, pos: Point3<i32>) -> bool {
        let limit = self.world_limit();
        [pos.x, pos.y, pos.z]
            .iter()
            .all(|axis| (limit..=0).contains(axis))
    }

    /// Maps a world position to the index of the chunk that owns it.
    ///
    /// # Returns
    /// `None` when any axis lies outside `[world_limit, 0]`.
    pub fn world_pos_to_chunk_index(&self, pos: Point3<i32>) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let d = self.chunk_dimension;
        let p = self.planet_dimension;
        let x = -pos.x / d;
        let y = -pos.y / d;
        let z = -pos.z / d;
        Some((z * p * p + y * p + x) as usize)
    }

    /// Inverse linearization of a chunk index into the chunk's grid coordinate
    /// (not scaled by the chunk dimension).
    pub fn chunk_index_to_world_pos(&self, index: usize) -> Point3<i32> {
        let p = self.planet_dimension;
        let index = index as i32;
        let z = index / (p * p);
        let rest = index - z * p * p;
        Point3::new(rest % p, rest / p, z)
    }

    /// Maps a world position to the linear index of its voxel inside the owning
    /// chunk.
    ///
    /// The position is expected to lie inside the world; positions outside it
    /// still produce an in-range index, but of an unrelated voxel.
    pub fn world_pos_to_voxel_index(&self, pos: Point3<i32>) -> usize {
        let local = self.world_pos_to_local_pos(pos);
        let d = self.chunk_dimension;
        (local.z * d * d + local.y * d + local.x) as usize
    }

    /// Maps a world position to its coordinate inside the owning chunk.
    pub fn world_pos_to_local_pos(&self, pos: Point3<i32>) -> Point3<i32> {
        let d = self.chunk_dimension;
        // Distance into the chunk along the negative axis.
        let local = |axis: i32| (d - axis.rem_euclid(d)) % d;
        Point3::new(local(pos.x), local(pos.y), local(pos.z))
    }

    /// Inverse linearization of a voxel index into a chunk-local position.
    pub fn voxel_index_to_local_pos(&self, index: usize) -> Point3<i32> {
        let d = self.chunk_dimension;
        let index = index as i32;
        let z = index / (d * d);
        let rest = index - z * d * d;
        Point3::new(rest % d, rest / d, z)
    }

    /// Reassembles the world position of a voxel from its chunk index and its
    /// chunk-local position.
    pub fn local_to_world_pos(&self, chunk_index: usize, local: Point3<i32>) -> Point3<i32> {
        let chunk = self.chunk_index_to_world_pos(chunk_index);
        let d = self.chunk_dimension;
        Point3::new(
            -(chunk.x * d + local.x),
            -(chunk.y * d + local.y),
            -(chunk.z * d + local.z),
        )
    }

    /// Mesh-space anchor of a chunk: its grid coordinate scaled by the chunk
    /// dimension. Cells, triangles and vertices of the chunk are offset from it.
    pub fn chunk_anchor(&self, index: usize) -> Point3<i32> {
        let chunk = self.chunk_index_to_world_pos(index);
        let d = self.chunk_dimension;
        Point3::new(chunk.x * d, chunk.y * d, chunk.z * d)
    }

    /// Converts a world-space point to mesh space.
    pub fn world_to_mesh(pos: Point3<f32>) -> Point3<f32> {
        Point3::new(-pos.x, -pos.y, -pos.z)
    }

    /// Radius of the sphere enclosing a chunk, consumed by frustum culling.
    pub fn chunk_bounding_radius(&self) -> f32 {
        (self.chunk_dimension >> 1) as f32 * CHUNK_RADIUS_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_world_limit_matches_dimensions() {
        let layout = WorldLayout::default();
        assert_eq!(layout.chunk_count(), 512);
        assert_eq!(layout.voxels_per_chunk(), 4096);
        assert_eq!(layout.world_limit(), -127);
    }

    #[test]
    fn chunk_index_of_known_positions() {
        let layout = WorldLayout::default();
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(0, 0, 0)), Some(0));
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(-15, -15, -15)), Some(0));
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(-16, 0, 0)), Some(1));
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(0, -16, 0)), Some(8));
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(0, 0, -16)), Some(64));
        assert_eq!(
            layout.world_pos_to_chunk_index(Point3::new(-127, -127, -127)),
            Some(511)
        );
    }

    #[test]
    fn positions_outside_world_have_no_chunk() {
        let layout = WorldLayout::default();
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(1, 0, 0)), None);
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(0, 1, 0)), None);
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(0, 0, 1)), None);
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(-128, 0, 0)), None);
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(0, -128, 0)), None);
        assert_eq!(layout.world_pos_to_chunk_index(Point3::new(0, 0, -128)), None);
    }

    #[test]
    fn voxel_index_is_distance_into_chunk() {
        let layout = WorldLayout::default();
        assert_eq!(layout.world_pos_to_voxel_index(Point3::new(0, 0, 0)), 0);
        assert_eq!(layout.world_pos_to_voxel_index(Point3::new(-1, 0, 0)), 1);
        assert_eq!(layout.world_pos_to_voxel_index(Point3::new(-17, 0, 0)), 1);
        assert_eq!(layout.world_pos_to_voxel_index(Point3::new(0, -2, 0)), 32);
        assert_eq!(layout.world_pos_to_voxel_index(Point3::new(0, 0, -3)), 768);
        assert_eq!(
            layout.world_pos_to_local_pos(Point3::new(-31, -16, -47)),
            Point3::new(15, 0, 15)
        );
    }

    #[test]
    fn every_position_round_trips() {
        let layout = WorldLayout::new(3, 4);
        let limit = layout.world_limit();
        for z in limit..=0 {
            for y in limit..=0 {
                for x in limit..=0 {
                    let pos = Point3::new(x, y, z);
                    let chunk_index = layout.world_pos_to_chunk_index(pos).unwrap();
                    assert!(chunk_index < layout.chunk_count());
                    let voxel_index = layout.world_pos_to_voxel_index(pos);
                    assert!(voxel_index < layout.voxels_per_chunk());
                    let local = layout.voxel_index_to_local_pos(voxel_index);
                    assert_eq!(layout.local_to_world_pos(chunk_index, local), pos);
                }
            }
        }
    }

    #[test]
    fn index_round_trips_through_positions() {
        let layout = WorldLayout::default();
        for index in 0..layout.chunk_count() {
            let chunk = layout.chunk_index_to_world_pos(index);
            let d = layout.chunk_dimension;
            let corner = Point3::new(-chunk.x * d, -chunk.y * d, -chunk.z * d);
            assert_eq!(layout.world_pos_to_chunk_index(corner), Some(index));
        }
        for index in 0..layout.voxels_per_chunk() {
            let local = layout.voxel_index_to_local_pos(index);
            let pos = layout.local_to_world_pos(0, local);
            assert_eq!(layout.world_pos_to_voxel_index(pos), index);
        }
    }

    #[test]
    fn chunk_anchor_scales_grid_coordinate() {
        let layout = WorldLayout::default();
        assert_eq!(layout.chunk_anchor(0), Point3::new(0, 0, 0));
        assert_eq!(layout.chunk_anchor(1), Point3::new(16, 0, 0));
        assert_eq!(layout.chunk_anchor(73), Point3::new(16, 16, 16));
        assert!((layout.chunk_bounding_radius() - 11.312).abs() < 1e-4);
    }
}
