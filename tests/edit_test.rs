//! # Edit Cycle Integration Test
//!
//! Sphere removal must damage exactly the chunks it touches, remeshing must keep
//! the triangle total consistent, and rays must find the voxels they cross.

use std::collections::BTreeSet;

use cgmath::{Point3, Vector3};
use marching_voxels::config::EngineConfig;
use marching_voxels::engine_state::remesh::DamagedChunks;
use marching_voxels::engine_state::rendering::upload::{
    BufferWriteCommand, MeshUploader, RecordingUploader, UploadError,
};
use marching_voxels::engine_state::voxels::chunk::voxel_grid::PRESENT_BIT;
use marching_voxels::engine_state::voxels::generation::{
    remove_voxels, sphere_removal, GenerationMethod, PerlinSettings,
};
use marching_voxels::engine_state::voxels::layout::WorldLayout;
use marching_voxels::engine_state::voxels::ray_cast::{cast_ray, RayCastOutcome};
use marching_voxels::engine_state::voxels::world::World;
use marching_voxels::engine_state::EngineState;
use marching_voxels::error::EngineError;

fn built_engine(
    layout: WorldLayout,
    generation: GenerationMethod,
) -> EngineState<RecordingUploader> {
    let config = EngineConfig {
        world: layout,
        generation,
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(config, RecordingUploader::new()).unwrap();
    engine.build_world().unwrap();
    engine
}

/// Chunks owning at least one in-world point of the sphere.
fn expected_damage(layout: &WorldLayout, center: Point3<f32>, radius: f32) -> BTreeSet<usize> {
    sphere_removal(center, radius)
        .into_iter()
        .filter_map(|pos| layout.world_pos_to_chunk_index(pos))
        .collect()
}

fn damage_after_removal(center: Point3<f32>) -> BTreeSet<usize> {
    let layout = WorldLayout::new(4, 16);
    let mut world = World::new(layout);
    world.fill(&GenerationMethod::Solid);
    let mut damaged = DamagedChunks::new();
    remove_voxels(&sphere_removal(center, 5.0), &mut world, &mut damaged);
    damaged.iter().collect()
}

/// Test: a sphere inside one chunk damages only that chunk.
#[test]
fn test_sphere_inside_one_chunk() {
    let center = Point3::new(-8.0, -8.0, -8.0);
    let damaged = damage_after_removal(center);
    assert_eq!(damaged, BTreeSet::from([0]));
    assert_eq!(damaged, expected_damage(&WorldLayout::new(4, 16), center, 5.0));
}

/// Test: spheres straddling chunk faces and corners damage every touched chunk.
#[test]
fn test_sphere_straddling_chunks() {
    let layout = WorldLayout::new(4, 16);

    let face = Point3::new(-16.0, -8.0, -8.0);
    assert_eq!(damage_after_removal(face), BTreeSet::from([0, 1]));

    let corner = Point3::new(-16.0, -16.0, -16.0);
    let damaged = damage_after_removal(corner);
    assert_eq!(damaged, BTreeSet::from([0, 1, 4, 5, 16, 17, 20, 21]));
    assert_eq!(damaged, expected_damage(&layout, corner, 5.0));
}

/// Test: the part of a sphere outside the world is clipped.
#[test]
fn test_sphere_clipped_at_world_edge() {
    let center = Point3::new(-2.0, -2.0, -2.0);
    assert_eq!(damage_after_removal(center), BTreeSet::from([0]));
}

/// Test: a ray through an otherwise empty chunk finds the single solid voxel,
/// and leaves the world when aimed away from it.
#[test]
fn test_ray_hits_single_voxel() {
    let mut world = World::new(WorldLayout::new(2, 16));
    let target = Point3::new(-20, -5, -9);
    assert!(world.set_voxel(target, PRESENT_BIT));

    let origin = Point3::new(-0.5, -4.5, -8.5);
    let toward = cast_ray(&world, origin, Vector3::new(-1.0, 0.0, 0.0), 200);
    assert_eq!(toward, RayCastOutcome::Hit(target));

    let away = cast_ray(&world, origin, Vector3::new(0.0, 1.0, 0.0), 200);
    assert_eq!(away, RayCastOutcome::LeftWorld);
}

/// Test: rebuilding a chunk twice without edits yields identical meshes.
#[test]
fn test_rebuild_is_idempotent() {
    let mut engine = built_engine(
        WorldLayout::new(2, 16),
        GenerationMethod::Perlin(PerlinSettings {
            seed: 5,
            scale: 0.15,
            threshold: 0.1,
        }),
    );
    let world = engine.world_mut();

    for index in 0..world.chunk_count() {
        let first = world.rebuild_chunk(index).unwrap();
        let triangles = world.chunk(index).unwrap().triangles().to_vec();
        let vertices = world.chunk(index).unwrap().vertices().to_vec();

        let second = world.rebuild_chunk(index).unwrap();
        assert_eq!(first, second);
        assert_eq!(world.chunk(index).unwrap().triangles(), &triangles[..]);
        assert_eq!(world.chunk(index).unwrap().vertices(), &vertices[..]);
    }
    assert_eq!(world.total_triangle_count(), world.recount_triangles());
}

/// Test: after every remesh pass the running total equals the per-chunk sum.
#[test]
fn test_triangle_total_is_conserved() {
    let mut engine = built_engine(WorldLayout::new(4, 16), GenerationMethod::Solid);
    let initial = engine.total_triangle_count();
    assert_eq!(initial, 64 * 2348);

    for center in [
        Point3::new(-8.0, -8.0, -8.0),
        Point3::new(-16.0, -16.0, -16.0),
        Point3::new(-40.0, -3.0, -60.0),
        Point3::new(-1.0, -1.0, -1.0),
    ] {
        engine.remove_sphere(center);
        let refreshed = engine.remesh_damaged().unwrap();
        assert!(!refreshed.is_empty());
        assert!(engine.damaged().is_empty());
        assert_eq!(
            engine.total_triangle_count(),
            engine.world().recount_triangles()
        );
    }
    assert_ne!(engine.total_triangle_count(), initial);
}

/// Test: carving targets the struck voxel and re-uploads every refreshed chunk,
/// including chunks that end up empty.
#[test]
fn test_carve_uploads_refreshed_chunks() {
    let mut engine = built_engine(WorldLayout::new(1, 4), GenerationMethod::Solid);
    assert_eq!(engine.uploader().total_uploads(), 1);

    let report = engine
        .carve(Point3::new(-1.5, 0.5, -1.5), Vector3::new(0.0, -1.0, 0.0))
        .unwrap();

    assert_eq!(report.outcome, RayCastOutcome::Hit(Point3::new(-2, -1, -2)));
    assert_eq!(report.removed, 8);
    assert_eq!(report.refreshed, vec![0]);
    assert_eq!(report.triangles, 0);
    assert_eq!(engine.world().present_voxel_count(), 0);

    let uploader = engine.uploader();
    let buffer = uploader.buffer(0).unwrap();
    assert_eq!(buffer.vertex_count, 0);
    assert_eq!(buffer.times_written, 2);
}

/// Test: a ray that misses leaves the world untouched.
#[test]
fn test_carve_miss_changes_nothing() {
    let mut engine = built_engine(WorldLayout::new(2, 8), GenerationMethod::Empty);
    let report = engine
        .carve(Point3::new(-4.5, -4.5, -4.5), Vector3::new(1.0, 0.2, 0.0))
        .unwrap();

    assert_eq!(report.outcome, RayCastOutcome::LeftWorld);
    assert_eq!(report.removed, 0);
    assert!(report.refreshed.is_empty());
    assert_eq!(engine.uploader().total_uploads(), 0);
}

/// An uploader that refuses one chunk a single time and logs every accepted
/// upload.
#[derive(Default)]
struct FlakyUploader {
    refuse_once: Option<usize>,
    accepted: Vec<usize>,
}

impl MeshUploader for FlakyUploader {
    fn upload(&mut self, command: BufferWriteCommand) -> Result<(), UploadError> {
        if self.refuse_once == Some(command.chunk_index) {
            self.refuse_once = None;
            return Err(UploadError::Rejected("buffer busy".to_string()));
        }
        self.accepted.push(command.chunk_index);
        Ok(())
    }
}

/// Test: a chunk whose upload failed stays damaged and is uploaded by the
/// next remesh pass.
#[test]
fn test_failed_upload_is_retried_next_pass() {
    let config = EngineConfig {
        world: WorldLayout::new(2, 4),
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(config, FlakyUploader::default()).unwrap();
    engine.build_world().unwrap();
    {
        let mut uploader = engine.uploader();
        uploader.accepted.clear();
        uploader.refuse_once = Some(1);
    }

    assert!(engine.world_mut().set_voxel(Point3::new(-1, -1, -1), 0));
    assert!(engine.world_mut().set_voxel(Point3::new(-5, -1, -1), 0));
    engine.damaged_mut().insert(0);
    engine.damaged_mut().insert(1);

    match engine.remesh_damaged() {
        Err(EngineError::Upload { chunk_index, .. }) => assert_eq!(chunk_index, 1),
        other => panic!("unexpected remesh result {:?}", other),
    }
    assert_eq!(engine.damaged().iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(engine.uploader().accepted, vec![0]);
    assert_eq!(
        engine.total_triangle_count(),
        engine.world().recount_triangles()
    );

    assert_eq!(engine.remesh_damaged().unwrap(), vec![1]);
    assert!(engine.damaged().is_empty());
    assert_eq!(engine.uploader().accepted, vec![0, 1]);
}
