#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Marching Voxels
//!
//! A chunked voxel world meshed with Marching Cubes, with localized destructive
//! edits that remesh only the chunks they touch.
//!
//! ## Key Modules
//!
//! * `config` - Serde-backed engine configuration
//! * `core` - Shared-resource primitive used across worker threads
//! * `engine_state` - The world, its meshing pipeline, the parallel build and the
//!   edit cycle
//! * `error` - Error types
//!
//! ## Architecture
//!
//! The engine is headless. It owns voxel data and produces per-chunk vertex
//! lists; a host-supplied [`MeshUploader`] receives them. The flow is:
//! * Initial build: chunks are filled, polygonized and meshed on parallel workers
//! * Edit: a ray picks a voxel, a sphere around it is removed, the damaged
//!   chunks are remeshed and re-uploaded
//!
//! ## Usage
//!
//! ```rust
//! use marching_voxels::config::EngineConfig;
//! use marching_voxels::engine_state::rendering::upload::RecordingUploader;
//! use marching_voxels::engine_state::voxels::layout::WorldLayout;
//! use marching_voxels::engine_state::EngineState;
//!
//! let mut config = EngineConfig::default();
//! config.world = WorldLayout::new(2, 4);
//!
//! let mut engine = EngineState::new(config, RecordingUploader::new()).unwrap();
//! let summary = engine.build_world().unwrap();
//! assert_eq!(summary.triangles, 8 * 44);
//! ```
//!
//! [`MeshUploader`]: engine_state::rendering::upload::MeshUploader

use std::env;

use cgmath::{Point3, Vector3};
use log::info;
use web_time::Instant;

use config::EngineConfig;
use engine_state::rendering::upload::RecordingUploader;
use engine_state::EngineState;
use error::EngineError;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

/// Name used when logging the time spent building the world.
pub const WORLD_BUILD_STOPWATCH: &str = "World Build";

/// Runs the headless engine: builds the world, carves one sphere straight down
/// from the world's top centre and logs the resulting statistics.
///
/// The first command line argument, if present, is the path of a JSON
/// configuration file. `RUST_LOG` controls log verbosity.
///
/// # Errors
/// Returns an [`EngineError`] if the configuration cannot be loaded or the
/// build fails.
pub fn run() -> Result<(), EngineError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = match env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };

    let mut engine = EngineState::new(config, RecordingUploader::new())?;

    let start = Instant::now();
    let summary = engine.build_world()?;
    info!(
        "{}: {:?} for {} chunks on {} workers",
        WORLD_BUILD_STOPWATCH,
        start.elapsed(),
        summary.chunks,
        summary.workers
    );

    let layout = *engine.world().layout();
    let centre = layout.world_limit() as f32 * 0.5;
    let report = engine.carve(Point3::new(centre, -0.5, centre), Vector3::new(0.0, -1.0, 0.0))?;
    info!(
        "Carve {:?}: {} voxels removed, {} chunks refreshed",
        report.outcome,
        report.removed,
        report.refreshed.len()
    );

    let uploader = engine.uploader();
    info!(
        "{} triangles, {} present voxels, {} chunk buffers ({} bytes, {} uploads)",
        engine.total_triangle_count(),
        engine.world().present_voxel_count(),
        uploader.buffer_count(),
        uploader.resident_bytes(),
        uploader.total_uploads()
    );
    Ok(())
}
