//! # Configuration
//!
//! Runtime configuration for the engine, deserialized from JSON with `serde`.
//! Every field has a default, so an empty object (or no file at all) yields the
//! stock 8×8×8-chunk world of 16³ voxels with solid-interior generation.
//!
//! ```json
//! {
//!     "world": { "planet_dimension": 8, "chunk_dimension": 16 },
//!     "generation": { "method": "perlin", "seed": 7 },
//!     "edit": { "removal_radius": 5.0, "max_ray_steps": 200 },
//!     "build": { "worker_count": 4 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    engine_state::voxels::{generation::GenerationMethod, layout::WorldLayout},
    error::ConfigError,
};

/// Radius of the sphere carved out around a ray hit.
pub const DEFAULT_REMOVAL_RADIUS: f32 = 5.0;
/// Safety bound on DDA iterations per ray.
pub const DEFAULT_MAX_RAY_STEPS: u32 = 200;

/// Settings for the runtime edit interaction (ray cast + sphere removal).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Radius of the removal sphere, in voxels.
    pub removal_radius: f32,
    /// Maximum number of grid steps a ray may take before giving up.
    pub max_ray_steps: u32,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            removal_radius: DEFAULT_REMOVAL_RADIUS,
            max_ray_steps: DEFAULT_MAX_RAY_STEPS,
        }
    }
}

/// Settings for the one-time parallel world build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Number of build workers. `None` derives it from the available hardware
    /// parallelism.
    pub worker_count: Option<usize>,
}

/// Top-level engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World and chunk dimensions.
    pub world: WorldLayout,
    /// Procedural rule used to fill chunks during the initial build.
    pub generation: GenerationMethod,
    /// Edit interaction settings.
    pub edit: EditConfig,
    /// Parallel build settings.
    pub build: BuildConfig,
}

impl EngineConfig {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// same errors as [`EngineConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that every value is inside the range the engine supports.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.planet_dimension < 1 {
            return Err(ConfigError::Invalid(format!(
                "world.planet_dimension must be at least 1, got {}",
                world.planet_dimension
            )));
        }
        // A chunk needs at least one interior voxel inside its padding border.
        if world.chunk_dimension < 3 {
            return Err(ConfigError::Invalid(format!(
                "world.chunk_dimension must be at least 3, got {}",
                world.chunk_dimension
            )));
        }
        let fits = world
            .planet_dimension
            .checked_mul(world.chunk_dimension)
            .and_then(|extent| extent.checked_mul(extent)?.checked_mul(extent))
            .is_some();
        if !fits {
            return Err(ConfigError::Invalid(format!(
                "world of {}³ chunks of {}³ voxels is too large",
                world.planet_dimension, world.chunk_dimension
            )));
        }
        if !self.edit.removal_radius.is_finite() || self.edit.removal_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "edit.removal_radius must be a positive number, got {}",
                self.edit.removal_radius
            )));
        }
        // Any hit lies inside the world, so twice its extent already covers it.
        let max_radius = 2.0 * (world.planet_dimension * world.chunk_dimension) as f32;
        if self.edit.removal_radius > max_radius {
            return Err(ConfigError::Invalid(format!(
                "edit.removal_radius must not exceed {} for this world, got {}",
                max_radius, self.edit.removal_radius
            )));
        }
        if self.edit.max_ray_steps == 0 {
            return Err(ConfigError::Invalid(
                "edit.max_ray_steps must be at least 1".to_string(),
            ));
        }
        match self.generation {
            GenerationMethod::Perlin(settings)
                if !settings.scale.is_finite() || settings.scale <= 0.0 =>
            {
                return Err(ConfigError::Invalid(format!(
                    "generation.scale must be a positive number, got {}",
                    settings.scale
                )));
            }
            GenerationMethod::Random(settings) if !(0.0..=1.0).contains(&settings.density) => {
                return Err(ConfigError::Invalid(format!(
                    "generation.density must lie in [0, 1], got {}",
                    settings.density
                )));
            }
            _ => {}
        }
        if self.build.worker_count == Some(0) {
            return Err(ConfigError::Invalid(
                "build.worker_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
