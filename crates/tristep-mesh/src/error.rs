//! Error types for mesh construction and loading.

use thiserror::Error;

/// Errors that can occur while building or loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// I/O error reading a mesh file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Index buffer length is not a multiple of three.
    #[error("index buffer length {0} is not a multiple of 3")]
    RaggedIndices(usize),

    /// A triangle refers to a vertex that does not exist.
    #[error("triangle {triangle} refers to vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidIndex {
        /// Triangle number (0-indexed).
        triangle: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// More vertices than a `u32` index can address.
    #[error("mesh would hold {0} vertices, more than u32 indices can address")]
    TooManyVertices(usize),

    /// Flat position buffer length is not a multiple of three.
    #[error("position buffer length {0} is not a multiple of 3")]
    RaggedPositions(usize),
}
