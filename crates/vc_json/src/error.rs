use std::io;

use thiserror::Error;

// -----------------------------------------------------------------------------
// SinkError

/// Failure reported by a [`ByteSink`](crate::ByteSink).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkError {
    #[error("sink is full: {needed} bytes needed, {available} available")]
    Full { needed: usize, available: usize },

    #[error("sink is closed")]
    Closed,

    #[error("sink I/O failed: {0}")]
    Io(#[from] io::Error),
}

// -----------------------------------------------------------------------------
// SerializeError

/// Error returned when a value cannot be written.
///
/// `path` fields locate the failing value from the root, for example
/// `$.children[2].name` or `$.scores["alice"]`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{type_path}` has no JSON representation (at {path})")]
    UnsupportedShape {
        type_path: &'static str,
        path: String,
    },

    #[error("`{type_path}` cannot be used as an object key (at {path})")]
    UnsupportedKey {
        type_path: &'static str,
        path: String,
    },

    #[error("maximum depth {max_depth} exceeded (at {path})")]
    DepthExceeded { max_depth: usize, path: String },

    #[error("non-finite number {value} cannot be written")]
    NonFiniteNumber { value: f64 },

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("invariant violated: {0}")]
    Invariant(&'static str),
}

impl SerializeError {
    /// Returns `true` for failures raised by the output sink.
    #[inline]
    pub const fn is_sink(&self) -> bool {
        matches!(self, Self::Sink(_))
    }
}
