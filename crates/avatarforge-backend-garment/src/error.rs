//! Error types for the garment backend.

use avatarforge_spec::{BackendError, SkeletonError};
use thiserror::Error;

/// Result type for garment backend operations.
pub type GarmentResult<T> = Result<T, GarmentError>;

/// Errors raised while loading a base mesh or configuring the pipeline.
///
/// Extraction itself is best-effort and does not fail: empty results are
/// `None`, unresolved joints are skipped.
#[derive(Debug, Error)]
pub enum GarmentError {
    /// A snapshot buffer has the wrong length.
    #[error("buffer '{buffer}' has length {actual}, expected {expected}")]
    BufferLength {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A triangle index points past the vertex list.
    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// A weighted joint influence points past the joint list.
    #[error("vertex {vertex} references joint {joint}, skeleton has {joint_count} joints")]
    JointOutOfRange {
        vertex: usize,
        joint: u32,
        joint_count: usize,
    },

    /// A snapshot region id is not a known region.
    #[error("vertex {vertex} has invalid region id {id}")]
    InvalidRegion { vertex: usize, id: u8 },

    /// The joint hierarchy is malformed.
    #[error("skeleton error: {0}")]
    Skeleton(#[from] SkeletonError),

    /// JSON parsing failed (snapshot or configuration).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation needs a loaded base mesh.
    #[error("no base mesh loaded")]
    NoBaseMesh,
}

impl GarmentError {
    /// Creates a buffer length error.
    pub fn buffer_length(buffer: &'static str, expected: usize, actual: usize) -> Self {
        Self::BufferLength {
            buffer,
            expected,
            actual,
        }
    }
}

impl BackendError for GarmentError {
    fn code(&self) -> &'static str {
        match self {
            GarmentError::BufferLength { .. } => "GARMENT_001",
            GarmentError::IndexOutOfRange { .. } => "GARMENT_002",
            GarmentError::JointOutOfRange { .. } => "GARMENT_003",
            GarmentError::InvalidRegion { .. } => "GARMENT_004",
            GarmentError::Skeleton(_) => "GARMENT_005",
            GarmentError::Json(_) => "GARMENT_006",
            GarmentError::NoBaseMesh => "GARMENT_007",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            GarmentError::Json(_) => "config",
            GarmentError::NoBaseMesh => "session",
            _ => "mesh",
        }
    }
}
