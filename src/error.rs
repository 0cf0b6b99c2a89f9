//! Error types for decoding, encoding and triangulating.

use thiserror::Error;

/// Errors raised by the binary codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer than 4 bytes where a count field was expected.
    #[error("truncated header: expected {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },

    /// The declared element count needs more bytes than are available.
    #[error("truncated body: expected {expected} bytes, got {actual}")]
    TruncatedBody { expected: usize, actual: usize },

    /// An element count does not fit in the 32-bit count field.
    #[error("count {count} does not fit in a u32 field")]
    CountOverflow { count: usize },

    /// A vertex index does not fit in a 32-bit index field.
    #[error("vertex index {index} does not fit in a u32 field")]
    IndexOverflow { index: usize },

    /// A decoded triangle references a point that does not exist.
    #[error("vertex index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    /// A coordinate has no single-precision representation.
    #[error("coordinate of point {index} cannot be represented as f32")]
    UnrepresentableCoordinate { index: usize },
}

/// Errors raised by the triangulation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriangulationError {
    /// A NaN or infinite coordinate reached the engine.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}

/// Any failure of the decode, triangulate, encode pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid point set data: {0}")]
    Codec(#[from] CodecError),

    #[error("triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),
}
