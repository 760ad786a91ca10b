//! Error types for meshrib.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh and ribbon operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A face id does not refer to a live triangle.
    #[error("face {face} does not exist or was already deleted")]
    StaleFace {
        /// The face index.
        face: usize,
    },

    /// A curve references a vertex that does not exist or was removed.
    #[error("{curve} curve references unknown vertex {vertex}")]
    UnknownVertex {
        /// Which curve ("top", "down", "center").
        curve: &'static str,
        /// The vertex index.
        vertex: usize,
    },

    /// A curve visits the same vertex twice.
    #[error("{curve} curve visits vertex {vertex} more than once")]
    DuplicateCurveVertex {
        /// Which curve.
        curve: &'static str,
        /// The repeated vertex index.
        vertex: usize,
    },

    /// A curve has too few vertices for the operation.
    #[error("{curve} curve has {len} vertices, at least {min} required: {reason}")]
    CurveTooShort {
        /// Which curve.
        curve: &'static str,
        /// Actual length.
        len: usize,
        /// Required minimum.
        min: usize,
        /// Why the minimum applies.
        reason: &'static str,
    },

    /// Top and down curves must pair up index by index.
    #[error("top curve has {top} vertices but down curve has {down}")]
    CurveLengthMismatch {
        /// Top curve length.
        top: usize,
        /// Down curve length.
        down: usize,
    },

    /// No path connects two vertices.
    #[error("no path between vertex {from} and vertex {to}")]
    NoPath {
        /// Start vertex.
        from: usize,
        /// End vertex.
        to: usize,
    },

    /// A collaborator service reported failure.
    #[error("{service} failed: {message}")]
    Service {
        /// Name of the failing service.
        service: &'static str,
        /// What went wrong.
        message: String,
    },

    /// A ribbon pipeline stage failed; the caller's mesh was left untouched.
    #[error("ribbon edit failed while {stage}: {source}")]
    StageFailed {
        /// Stage in progress when the failure happened.
        stage: &'static str,
        /// The underlying error.
        #[source]
        source: Box<MeshError>,
    },

    /// The operation was cancelled through its cancel token.
    #[error("operation cancelled")]
    Cancelled,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Malformed curve-set file.
    #[error("curve file line {line}: {message}")]
    CurveFormat {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a collaborator failure.
    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        MeshError::Service {
            service,
            message: message.into(),
        }
    }

    /// Wrap this error with the pipeline stage it happened in.
    ///
    /// Cancellation and already-wrapped errors pass through unchanged.
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            MeshError::Cancelled | MeshError::StageFailed { .. } => self,
            other => MeshError::StageFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Whether this error (or the error it wraps) is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MeshError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stage_wraps_once() {
        let err = MeshError::service("hole filling", "open loop").in_stage("patching");
        let err = err.in_stage("subdividing");
        match &err {
            MeshError::StageFailed { stage, source } => {
                assert_eq!(*stage, "patching");
                assert!(matches!(**source, MeshError::Service { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "ribbon edit failed while patching: hole filling failed: open loop"
        );
    }

    #[test]
    fn test_cancelled_is_not_wrapped() {
        let err = MeshError::Cancelled.in_stage("smoothing");
        assert!(err.is_cancelled());
    }
}
