//! # Volume Generation
//!
//! Procedural fills for a chunk's voxel grid and the geometric primitives used
//! by edits.
//!
//! ## Fills
//!
//! Every fill leaves the outermost layer of a chunk absent. That 1-voxel border
//! is padding: Marching Cubes samples 2×2×2 neighbourhoods, and keeping the
//! border empty means a chunk's surface closes on itself without reading any
//! neighbouring chunk.
//!
//! * **Solid**: every interior voxel present
//! * **Perlin**: 3D Perlin noise sampled at the voxel's world position; a voxel
//!   is present where the absolute sample exceeds the threshold
//! * **Checkerboard**: interior voxels alternate along every axis
//! * **Random**: each interior voxel present with a fixed probability, seeded
//!   per chunk so the result does not depend on which worker built it
//! * **Empty**: nothing
//!
//! ## Edits
//!
//! Removal is split in two steps. [`sphere_removal`] only enumerates lattice
//! points, without looking at the world; [`remove_voxels`] maps them to chunks,
//! clears them and records the damaged chunks. Positions outside the world are
//! clipped.

use cgmath::{MetricSpace, Point3};
use log::{debug, warn};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::chunk::voxel_grid::{VoxelGrid, PRESENT_BIT};
use super::layout::WorldLayout;
use super::world::World;
use crate::engine_state::remesh::DamagedChunks;

/// Default scaling applied to world coordinates before sampling noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Default magnitude a noise sample must exceed for a voxel to be present.
pub const PERLIN_THRESHOLD: f64 = 0.2;

/// Parameters of Perlin terrain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinSettings {
    /// Noise seed.
    pub seed: u32,
    /// Scale applied to world coordinates before sampling.
    pub scale: f64,
    /// Samples with an absolute value above this are solid.
    pub threshold: f64,
}

impl Default for PerlinSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: PERLIN_SCALE_FACTOR,
            threshold: PERLIN_THRESHOLD,
        }
    }
}

/// Parameters of random scatter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSettings {
    /// Base seed, mixed with the chunk index.
    pub seed: u64,
    /// Probability of a voxel being present, in `[0, 1]`.
    pub density: f64,
}

impl Default for RandomSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            density: 0.1,
        }
    }
}

/// How the initial world is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Every interior voxel present.
    #[default]
    Solid,
    /// Threshold terrain from 3D Perlin noise.
    Perlin(PerlinSettings),
    /// Alternating interior voxels.
    Checkerboard,
    /// Independently scattered interior voxels.
    Random(RandomSettings),
    /// No voxels at all.
    Empty,
}

/// Returns `true` when `local` is on the outermost layer of a chunk.
fn is_border(local: Point3<i32>, dimension: i32) -> bool {
    [local.x, local.y, local.z]
        .iter()
        .any(|&axis| axis == 0 || axis == dimension - 1)
}

/// Sets every interior voxel of `grid` present, leaving the 1-voxel border
/// absent.
pub fn fill_chunk(grid: &mut VoxelGrid) {
    let d = grid.dimension();
    for z in 1..d - 1 {
        for y in 1..d - 1 {
            for x in 1..d - 1 {
                grid.set(Point3::new(x, y, z), PRESENT_BIT);
            }
        }
    }
}

/// Fills a chunk's grid with the given generation method.
///
/// The grid is cleared first, so a fill always starts from an empty chunk.
///
/// # Arguments
/// * `grid` - The chunk's occupancy data
/// * `method` - Which fill to run
/// * `chunk_index` - Index of the chunk, used to place noise in world space
/// * `layout` - World dimensions
pub fn fill_chunk_with(
    grid: &mut VoxelGrid,
    method: &GenerationMethod,
    chunk_index: usize,
    layout: &WorldLayout,
) {
    grid.clear();
    match method {
        GenerationMethod::Solid => fill_chunk(grid),
        GenerationMethod::Perlin(settings) => fill_perlin(grid, settings, chunk_index, layout),
        GenerationMethod::Checkerboard => fill_checkerboard(grid),
        GenerationMethod::Random(settings) => fill_random(grid, settings, chunk_index),
        GenerationMethod::Empty => {}
    }
}

fn fill_perlin(
    grid: &mut VoxelGrid,
    settings: &PerlinSettings,
    chunk_index: usize,
    layout: &WorldLayout,
) {
    let perlin = Perlin::new(settings.seed);
    let d = grid.dimension();
    for z in 1..d - 1 {
        for y in 1..d - 1 {
            for x in 1..d - 1 {
                let local = Point3::new(x, y, z);
                let world = layout.local_to_world_pos(chunk_index, local);
                let sample = perlin.get(to_perlin_pos(world, settings.scale));
                if sample.abs() > settings.threshold {
                    grid.set(local, PRESENT_BIT);
                }
            }
        }
    }
}

/// Scales an integer world position into noise space.
fn to_perlin_pos(pos: Point3<i32>, scale: f64) -> [f64; 3] {
    [
        pos.x as f64 * scale,
        pos.y as f64 * scale,
        pos.z as f64 * scale,
    ]
}

fn fill_checkerboard(grid: &mut VoxelGrid) {
    let d = grid.dimension();
    for z in 0..d {
        for y in 0..d {
            for x in 0..d {
                let local = Point3::new(x, y, z);
                if !is_border(local, d) && (x + y + z) % 2 == 0 {
                    grid.set(local, PRESENT_BIT);
                }
            }
        }
    }
}

fn fill_random(grid: &mut VoxelGrid, settings: &RandomSettings, chunk_index: usize) {
    let mut rng = fastrand::Rng::with_seed(settings.seed ^ chunk_index as u64);
    let d = grid.dimension();
    for z in 1..d - 1 {
        for y in 1..d - 1 {
            for x in 1..d - 1 {
                if rng.f64() < settings.density {
                    grid.set(Point3::new(x, y, z), PRESENT_BIT);
                }
            }
        }
    }
}

/// Returns `true` if `pos` lies strictly inside the sphere.
pub fn is_in_sphere(center: Point3<f32>, radius: f32, pos: Point3<i32>) -> bool {
    let pos = Point3::new(pos.x as f32, pos.y as f32, pos.z as f32);
    center.distance2(pos) < radius * radius
}

/// Enumerates the world positions removed by a sphere-shaped edit.
///
/// Walks every integer lattice point of the sphere's axis-aligned bounding box
/// and keeps those whose squared distance to `center` is strictly less than
/// `radius²`. The world is not consulted; positions outside it are returned
/// too and clipped later by [`remove_voxels`].
///
/// # Returns
/// Unique positions in x, y, z scan order. Empty for a non-positive or
/// non-finite radius.
pub fn sphere_removal(center: Point3<f32>, radius: f32) -> Vec<Point3<i32>> {
    if !(radius.is_finite() && radius > 0.0) {
        return Vec::new();
    }

    let min = |axis: f32| (axis - radius).floor() as i32;
    let max = |axis: f32| (axis + radius).ceil() as i32;

    let mut positions = Vec::new();
    for x in min(center.x)..=max(center.x) {
        for y in min(center.y)..=max(center.y) {
            for z in min(center.z)..=max(center.z) {
                let pos = Point3::new(x, y, z);
                if is_in_sphere(center, radius, pos) {
                    positions.push(pos);
                }
            }
        }
    }
    positions
}

/// Clears the voxels at `positions` and records the chunks they belong to.
///
/// Positions outside the world are dropped. Every in-world position damages its
/// chunk, even if the voxel was already absent, so the chunk is remeshed with
/// the rest of the edit.
///
/// # Returns
/// The number of voxels that were present and are now cleared.
pub fn remove_voxels(
    positions: &[Point3<i32>],
    world: &mut World,
    damaged: &mut DamagedChunks,
) -> usize {
    let layout = *world.layout();
    let mut removed = 0;
    let mut clipped = 0;

    for &pos in positions {
        let Some(chunk_index) = layout.world_pos_to_chunk_index(pos) else {
            clipped += 1;
            continue;
        };
        damaged.insert(chunk_index);
        let voxel_index = layout.world_pos_to_voxel_index(pos);
        if let Some(chunk) = world.chunk_mut(chunk_index) {
            if chunk.voxels.get_index(voxel_index).unwrap_or(0) & PRESENT_BIT != 0 {
                removed += 1;
            }
            chunk.voxels.set_index(voxel_index, 0);
        }
    }

    if clipped > 0 {
        warn!(
            "Clipped {} of {} edit positions outside the world",
            clipped,
            positions.len()
        );
    }
    debug!("Removed {} voxels, {} chunks damaged", removed, damaged.len());
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_fill_leaves_border_empty() {
        let mut grid = VoxelGrid::new(16);
        fill_chunk(&mut grid);
        assert_eq!(grid.present_count(), 14 * 14 * 14);
        assert!(!grid.is_present(Point3::new(0, 5, 5)));
        assert!(!grid.is_present(Point3::new(15, 5, 5)));
        assert!(grid.is_present(Point3::new(1, 1, 1)));
        assert!(grid.is_present(Point3::new(14, 14, 14)));
    }

    #[test]
    fn every_method_keeps_the_border_absent() {
        let layout = WorldLayout::new(2, 8);
        let methods = [
            GenerationMethod::Solid,
            GenerationMethod::Perlin(PerlinSettings {
                threshold: 0.0,
                ..PerlinSettings::default()
            }),
            GenerationMethod::Checkerboard,
            GenerationMethod::Random(RandomSettings {
                seed: 3,
                density: 1.0,
            }),
            GenerationMethod::Empty,
        ];
        for method in methods {
            for chunk_index in 0..layout.chunk_count() {
                let mut grid = VoxelGrid::new(8);
                fill_chunk_with(&mut grid, &method, chunk_index, &layout);
                for index in 0..grid.len() {
                    let local = layout.voxel_index_to_local_pos(index);
                    if is_border(local, 8) {
                        assert!(!grid.is_present(local), "{:?} filled {:?}", method, local);
                    }
                }
            }
        }
    }

    #[test]
    fn checkerboard_alternates() {
        let mut grid = VoxelGrid::new(6);
        fill_chunk_with(
            &mut grid,
            &GenerationMethod::Checkerboard,
            0,
            &WorldLayout::new(1, 6),
        );
        assert!(grid.is_present(Point3::new(1, 1, 2)));
        assert!(!grid.is_present(Point3::new(1, 1, 1)));
        assert!(!grid.is_present(Point3::new(2, 1, 2)));
        assert_eq!(grid.present_count(), 32);
    }

    #[test]
    fn random_fill_is_deterministic_per_chunk() {
        let layout = WorldLayout::new(2, 8);
        let method = GenerationMethod::Random(RandomSettings {
            seed: 11,
            density: 0.5,
        });
        let mut first = VoxelGrid::new(8);
        let mut second = VoxelGrid::new(8);
        fill_chunk_with(&mut first, &method, 5, &layout);
        fill_chunk_with(&mut second, &method, 5, &layout);
        assert_eq!(first, second);
        assert!(first.present_count() > 0);
        assert!(first.present_count() < 6 * 6 * 6);

        let mut full = VoxelGrid::new(8);
        let dense = GenerationMethod::Random(RandomSettings {
            seed: 11,
            density: 1.0,
        });
        fill_chunk_with(&mut full, &dense, 5, &layout);
        assert_eq!(full.present_count(), 6 * 6 * 6);
    }

    #[test]
    fn refill_replaces_previous_content() {
        let layout = WorldLayout::new(1, 6);
        let mut grid = VoxelGrid::new(6);
        fill_chunk(&mut grid);
        fill_chunk_with(&mut grid, &GenerationMethod::Empty, 0, &layout);
        assert_eq!(grid.present_count(), 0);
    }

    #[test]
    fn sphere_keeps_points_strictly_inside() {
        let unit = sphere_removal(Point3::new(0.0, 0.0, 0.0), 1.0);
        assert_eq!(unit, vec![Point3::new(0, 0, 0)]);

        let points = sphere_removal(Point3::new(-8.0, -8.0, -8.0), 5.0);
        assert!(points.contains(&Point3::new(-8, -8, -8)));
        assert!(points.contains(&Point3::new(-12, -8, -8)));
        assert!(!points.contains(&Point3::new(-13, -8, -8)));
        assert!(!points.contains(&Point3::new(-3, -8, -8)));
        for point in &points {
            assert!(is_in_sphere(Point3::new(-8.0, -8.0, -8.0), 5.0, *point));
        }
    }

    #[test]
    fn sphere_matches_bounding_box_scan() {
        let center = Point3::new(-3.5, -7.25, -10.0);
        let radius = 2.5;
        let points = sphere_removal(center, radius);

        let mut expected = 0;
        for x in -10..=4 {
            for y in -14..=0 {
                for z in -16..=-4 {
                    if is_in_sphere(center, radius, Point3::new(x, y, z)) {
                        expected += 1;
                    }
                }
            }
        }
        assert_eq!(points.len(), expected);
    }

    #[test]
    fn degenerate_radius_removes_nothing() {
        assert!(sphere_removal(Point3::new(0.0, 0.0, 0.0), 0.0).is_empty());
        assert!(sphere_removal(Point3::new(0.0, 0.0, 0.0), -1.0).is_empty());
        assert!(sphere_removal(Point3::new(0.0, 0.0, 0.0), f32::NAN).is_empty());
    }

    #[test]
    fn removal_clips_positions_outside_the_world() {
        let layout = WorldLayout::new(2, 8);
        let mut world = World::new(layout);
        world.fill(&GenerationMethod::Solid);
        let mut damaged = DamagedChunks::new();

        let removed = remove_voxels(
            &[
                Point3::new(-1, -1, -1),
                Point3::new(1, -1, -1),
                Point3::new(-16, -1, -1),
                Point3::new(-1, -1, -1),
            ],
            &mut world,
            &mut damaged,
        );

        assert_eq!(removed, 1);
        assert_eq!(damaged.iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(world.voxel_at(Point3::new(-1, -1, -1)), Some(0));
    }

    #[test]
    fn removing_absent_voxels_still_damages_the_chunk() {
        let layout = WorldLayout::new(2, 8);
        let mut world = World::new(layout);
        let mut damaged = DamagedChunks::new();
        let removed = remove_voxels(&[Point3::new(-9, 0, 0)], &mut world, &mut damaged);
        assert_eq!(removed, 0);
        assert!(damaged.contains(1));
    }
}
