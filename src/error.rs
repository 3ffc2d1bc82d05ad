//! # Error Types
//!
//! Errors surfaced by the engine. Boundary conditions (positions outside the
//! world, degenerate cells) are not errors and never appear here; they are
//! expressed as `Option::None` or as silently clipped edits.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine_state::rendering::upload::UploadError;

/// Errors that can occur while loading or validating an [`EngineConfig`].
///
/// [`EngineConfig`]: crate::config::EngineConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for the config schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed fine but is outside the range the engine supports.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors returned by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The supplied configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The external mesh uploader refused a chunk's vertex payload.
    #[error("mesh upload failed for chunk {chunk_index}: {source}")]
    Upload {
        /// Chunk whose payload was being handed off.
        chunk_index: usize,
        /// The uploader's failure.
        #[source]
        source: UploadError,
    },

    /// A world build worker panicked before finishing its slice.
    #[error("world build worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        worker: usize,
    },
}
