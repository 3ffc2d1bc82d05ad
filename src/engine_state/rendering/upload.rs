//! # Mesh Upload Hand-off
//!
//! The seam between the mesh pipeline and the rendering layer. The engine never
//! touches GPU objects itself: once a chunk's vertex list is ready it is packed
//! into a [`BufferWriteCommand`] and handed to a [`MeshUploader`], which owns
//! staging, buffer creation and command submission.
//!
//! During the parallel world build every worker shares one uploader behind a
//! single lock, because command submission contexts are not safe to use from
//! several threads at once. Only the hand-off itself runs under that lock.

use std::collections::HashMap;

use thiserror::Error;

use super::Vertex;

/// Failure reported by an uploader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The rendering layer could not allocate a buffer of the requested size.
    #[error("buffer allocation of {size} bytes failed")]
    OutOfMemory {
        /// Requested size in bytes.
        size: usize,
    },

    /// The rendering layer rejected the command for another reason.
    #[error("upload rejected: {0}")]
    Rejected(String),
}

/// A request to replace the vertex buffer of one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferWriteCommand {
    /// Human-readable label, used for debugging tools
    pub name: String,
    /// Chunk whose vertex buffer is replaced
    pub chunk_index: usize,
    /// Number of vertices in `data`
    pub vertex_count: u32,
    /// Vertex bytes, `vertex_count * Vertex::STRIDE` long
    pub data: Vec<u8>,
}

impl BufferWriteCommand {
    /// Packs a chunk's vertex list into a write command.
    pub fn from_vertices(chunk_index: usize, vertices: &[Vertex]) -> Self {
        BufferWriteCommand {
            name: format!("Chunk {} Vertex Buffer", chunk_index),
            chunk_index,
            vertex_count: vertices.len() as u32,
            data: bytemuck::cast_slice(vertices).to_vec(),
        }
    }
}

/// Receives finished chunk meshes on behalf of the rendering layer.
pub trait MeshUploader: Send {
    /// Uploads (or replaces) one chunk's vertex buffer.
    ///
    /// # Errors
    /// Returns an [`UploadError`] when the rendering layer cannot accept the
    /// data. The engine aborts the current build or remesh pass.
    fn upload(&mut self, command: BufferWriteCommand) -> Result<(), UploadError>;
}

/// What a [`RecordingUploader`] knows about one chunk's buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadedBuffer {
    /// Vertices in the latest upload
    pub vertex_count: u32,
    /// Bytes in the latest upload
    pub size: usize,
    /// How many times the chunk was uploaded
    pub times_written: u64,
}

/// An in-memory uploader that records what it was given.
///
/// Used by the headless binary and by tests in place of a GPU backend.
#[derive(Debug, Default)]
pub struct RecordingUploader {
    buffers: HashMap<usize, UploadedBuffer>,
    total_uploads: u64,
}

impl RecordingUploader {
    /// Creates an uploader with no recorded buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest state of a chunk's buffer, if it was ever uploaded.
    pub fn buffer(&self, chunk_index: usize) -> Option<&UploadedBuffer> {
        self.buffers.get(&chunk_index)
    }

    /// Number of distinct chunks that have a buffer.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of upload calls received.
    pub fn total_uploads(&self) -> u64 {
        self.total_uploads
    }

    /// Sum of the latest buffer sizes across all chunks.
    pub fn resident_bytes(&self) -> usize {
        self.buffers.values().map(|buffer| buffer.size).sum()
    }
}

impl MeshUploader for RecordingUploader {
    fn upload(&mut self, command: BufferWriteCommand) -> Result<(), UploadError> {
        let buffer = self.buffers.entry(command.chunk_index).or_default();
        buffer.vertex_count = command.vertex_count;
        buffer.size = command.data.len();
        buffer.times_written += 1;
        self.total_uploads += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Vector3};

    use super::*;

    #[test]
    fn command_carries_vertex_bytes() {
        let vertex = Vertex::new(
            Point3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        let command = BufferWriteCommand::from_vertices(9, &[vertex, vertex, vertex]);
        assert_eq!(command.chunk_index, 9);
        assert_eq!(command.vertex_count, 3);
        assert_eq!(command.data.len(), 3 * Vertex::STRIDE);
    }

    #[test]
    fn recording_uploader_tracks_latest_buffer() {
        let mut uploader = RecordingUploader::new();
        uploader
            .upload(BufferWriteCommand::from_vertices(2, &[]))
            .unwrap();
        let vertex = Vertex::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        uploader
            .upload(BufferWriteCommand::from_vertices(2, &[vertex; 6]))
            .unwrap();

        let buffer = uploader.buffer(2).unwrap();
        assert_eq!(buffer.vertex_count, 6);
        assert_eq!(buffer.size, 6 * Vertex::STRIDE);
        assert_eq!(buffer.times_written, 2);
        assert_eq!(uploader.buffer_count(), 1);
        assert_eq!(uploader.total_uploads(), 2);
        assert_eq!(uploader.resident_bytes(), 6 * Vertex::STRIDE);
    }
}
