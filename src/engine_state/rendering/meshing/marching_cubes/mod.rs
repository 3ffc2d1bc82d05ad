//! Marching Cubes polygonization of chunk occupancy data.
//!
//! A chunk's voxel grid is swept with a 2×2×2 window. Each window position is a
//! [`Cell`] whose 8-bit mask records which of its corners hold a present voxel.
//! [`polygonize`] turns one cell into zero to five triangles by looking up the
//! crossed edges and the triangle layout for its case in the canonical tables,
//! placing a vertex on every crossed edge by linear interpolation against the
//! iso-value.
//!
//! # Orientation
//! Occupancy is `1.0` for present corners and `0.0` for absent ones, so present
//! corners sit above the `0.5` iso-value. The canonical case index marks the
//! corners *below* the iso-value, which makes it the complement of the cell
//! mask. With that convention the table winding yields face normals pointing
//! out of the solid volume.

pub mod tables;

use cgmath::{EuclideanSpace, Point3};

use crate::engine_state::voxels::chunk::voxel_grid::VoxelGrid;

use tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Threshold between absent (`0.0`) and present (`1.0`) corners.
pub const ISO_VALUE: f32 = 0.5;

/// One cube of eight neighbouring voxels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Bit `i` is set when corner `i` (see [`CORNER_OFFSETS`]) is present.
    pub mask: u8,
    /// Mesh-space position of corner 0.
    pub anchor: Point3<f32>,
}

impl Cell {
    /// Creates a cell from its corner mask and anchor.
    pub fn new(mask: u8, anchor: Point3<f32>) -> Self {
        Cell { mask, anchor }
    }

    /// Index into the case tables: the set of corners below the iso-value.
    pub fn case_index(&self) -> usize {
        (!self.mask) as usize
    }

    /// Scalar field value at a corner.
    pub fn corner_value(&self, corner: usize) -> f32 {
        if self.mask & (1 << corner) != 0 {
            1.0
        } else {
            0.0
        }
    }

    /// Mesh-space position of a corner.
    pub fn corner_position(&self, corner: usize) -> Point3<f32> {
        let [dx, dy, dz] = CORNER_OFFSETS[corner];
        Point3::new(
            self.anchor.x + dx as f32,
            self.anchor.y + dy as f32,
            self.anchor.z + dz as f32,
        )
    }
}

/// Three mesh-space points, wound counter-clockwise when seen from outside the
/// solid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// Corners in winding order
    pub points: [Point3<f32>; 3],
}

/// Derives every cell of a voxel grid.
///
/// Cells are anchored at every local position from `0` to `D - 2` on each axis,
/// so corner lookups never leave the grid. `chunk_anchor` is the mesh-space
/// offset of the grid's origin.
///
/// # Arguments
/// * `grid` - The chunk's occupancy data
/// * `chunk_anchor` - Mesh-space anchor of the chunk
/// * `cells` - Output list; cells are appended
pub fn build_cells(grid: &VoxelGrid, chunk_anchor: Point3<i32>, cells: &mut Vec<Cell>) {
    let cells_per_axis = grid.dimension() - 1;
    if cells_per_axis <= 0 {
        return;
    }
    cells.reserve((cells_per_axis * cells_per_axis * cells_per_axis) as usize);

    for x in 0..cells_per_axis {
        for y in 0..cells_per_axis {
            for z in 0..cells_per_axis {
                let mut mask = 0u8;
                for (corner, [dx, dy, dz]) in CORNER_OFFSETS.iter().enumerate() {
                    if grid.is_present(Point3::new(x + dx, y + dy, z + dz)) {
                        mask |= 1 << corner;
                    }
                }
                let anchor = Point3::new(
                    (chunk_anchor.x + x) as f32,
                    (chunk_anchor.y + y) as f32,
                    (chunk_anchor.z + z) as f32,
                );
                cells.push(Cell::new(mask, anchor));
            }
        }
    }
}

/// Places the surface vertex on the edge between two corners.
fn interpolate_vertex(p1: Point3<f32>, p2: Point3<f32>, v1: f32, v2: f32) -> Point3<f32> {
    const EPSILON: f32 = 1e-5;
    if (ISO_VALUE - v1).abs() < EPSILON {
        return p1;
    }
    if (ISO_VALUE - v2).abs() < EPSILON {
        return p2;
    }
    if (v1 - v2).abs() < EPSILON {
        return p1;
    }
    let mu = (ISO_VALUE - v1) / (v2 - v1);
    p1 + (p2 - p1) * mu
}

/// Polygonizes one cell, appending its triangles.
///
/// # Returns
/// The number of triangles appended. All-absent and all-present cells produce
/// none.
pub fn polygonize(cell: &Cell, triangles: &mut Vec<Triangle>) -> usize {
    let case = cell.case_index();
    let crossed = EDGE_TABLE[case];
    if crossed == 0 {
        return 0;
    }

    let mut edge_vertices = [Point3::origin(); 12];
    for (edge, [a, b]) in EDGE_CORNERS.iter().enumerate() {
        if crossed & (1 << edge) != 0 {
            edge_vertices[edge] = interpolate_vertex(
                cell.corner_position(*a),
                cell.corner_position(*b),
                cell.corner_value(*a),
                cell.corner_value(*b),
            );
        }
    }

    let mut emitted = 0;
    for triple in TRI_TABLE[case].chunks_exact(3) {
        if triple[0] < 0 {
            break;
        }
        triangles.push(Triangle {
            points: [
                edge_vertices[triple[0] as usize],
                edge_vertices[triple[1] as usize],
                edge_vertices[triple[2] as usize],
            ],
        });
        emitted += 1;
    }
    emitted
}

/// Polygonizes a list of cells, appending all triangles.
///
/// # Returns
/// The number of triangles appended.
pub fn polygonize_cells(cells: &[Cell], triangles: &mut Vec<Triangle>) -> usize {
    cells.iter().map(|cell| polygonize(cell, triangles)).sum()
}
