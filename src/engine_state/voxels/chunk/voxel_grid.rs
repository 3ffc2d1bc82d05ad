//! # Voxel Grid Module
//!
//! A dense, cubic occupancy grid. Each voxel is one byte; bit 0 marks the voxel
//! as present (solid). The remaining bits are reserved and preserved as-is.
//!
//! ## Memory Layout
//!
//! Voxels are stored row-major, `x + y * D + z * D²`, which is the same formula
//! the world layout uses for voxel indices. All index arithmetic lives behind
//! the accessors here; callers address voxels by local position.

use cgmath::Point3;

/// Bit marking a voxel as present.
pub const PRESENT_BIT: u8 = 1;

/// A `D³` array of occupancy bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    dimension: i32,
    voxels: Vec<u8>,
}

impl VoxelGrid {
    /// Creates a grid of `dimension³` absent voxels.
    pub fn new(dimension: i32) -> Self {
        let size = (dimension * dimension * dimension) as usize;
        Self {
            dimension,
            voxels: vec![0; size],
        }
    }

    /// Voxels per axis.
    pub fn dimension(&self) -> i32 {
        self.dimension
    }

    /// Total number of voxels.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` for a zero-sized grid.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Linear index of a local position, or `None` if it lies outside the grid.
    pub fn linear_index(&self, local: Point3<i32>) -> Option<usize> {
        let d = self.dimension;
        let in_bounds = |axis: i32| (0..d).contains(&axis);
        if in_bounds(local.x) && in_bounds(local.y) && in_bounds(local.z) {
            Some((local.x + local.y * d + local.z * d * d) as usize)
        } else {
            None
        }
    }

    /// The raw byte at a local position.
    pub fn get(&self, local: Point3<i32>) -> Option<u8> {
        self.linear_index(local).map(|index| self.voxels[index])
    }

    /// The raw byte at a linear index.
    pub fn get_index(&self, index: usize) -> Option<u8> {
        self.voxels.get(index).copied()
    }

    /// Whether the voxel at `local` is present. Positions outside the grid read
    /// as absent.
    pub fn is_present(&self, local: Point3<i32>) -> bool {
        self.get(local).is_some_and(|voxel| voxel & PRESENT_BIT != 0)
    }

    /// Writes the raw byte at a local position.
    ///
    /// # Returns
    /// `false` if the position lies outside the grid and nothing was written.
    pub fn set(&mut self, local: Point3<i32>, value: u8) -> bool {
        match self.linear_index(local) {
            Some(index) => {
                self.voxels[index] = value;
                true
            }
            None => false,
        }
    }

    /// Writes the raw byte at a linear index.
    ///
    /// # Returns
    /// `false` if the index is out of range and nothing was written.
    pub fn set_index(&mut self, index: usize, value: u8) -> bool {
        match self.voxels.get_mut(index) {
            Some(voxel) => {
                *voxel = value;
                true
            }
            None => false,
        }
    }

    /// Number of present voxels.
    pub fn present_count(&self) -> usize {
        self.voxels
            .iter()
            .filter(|voxel| **voxel & PRESENT_BIT != 0)
            .count()
    }

    /// Marks every voxel absent.
    pub fn clear(&mut self) {
        self.voxels.fill(0);
    }

    /// The raw bytes in linear order.
    pub fn as_slice(&self) -> &[u8] {
        &self.voxels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linearization_is_row_major() {
        let grid = VoxelGrid::new(4);
        assert_eq!(grid.len(), 64);
        assert_eq!(grid.linear_index(Point3::new(1, 0, 0)), Some(1));
        assert_eq!(grid.linear_index(Point3::new(0, 1, 0)), Some(4));
        assert_eq!(grid.linear_index(Point3::new(0, 0, 1)), Some(16));
        assert_eq!(grid.linear_index(Point3::new(3, 3, 3)), Some(63));
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut grid = VoxelGrid::new(4);
        assert_eq!(grid.linear_index(Point3::new(4, 0, 0)), None);
        assert_eq!(grid.linear_index(Point3::new(0, -1, 0)), None);
        assert!(!grid.is_present(Point3::new(0, 0, 9)));
        assert!(!grid.set(Point3::new(-1, 0, 0), PRESENT_BIT));
        assert!(!grid.set_index(64, PRESENT_BIT));
        assert_eq!(grid.present_count(), 0);
    }

    #[test]
    fn only_bit_zero_marks_presence() {
        let mut grid = VoxelGrid::new(2);
        grid.set(Point3::new(1, 1, 1), 0b10);
        assert!(!grid.is_present(Point3::new(1, 1, 1)));
        grid.set(Point3::new(1, 1, 1), 0b11);
        assert!(grid.is_present(Point3::new(1, 1, 1)));
        assert_eq!(grid.get_index(7), Some(0b11));
        assert_eq!(grid.present_count(), 1);

        grid.clear();
        assert_eq!(grid.present_count(), 0);
    }
}
