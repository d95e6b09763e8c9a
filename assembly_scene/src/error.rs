//! Error types for the assembly scene crate
//!
//! This module defines the error types used throughout the crate,
//! including GPU access, model hierarchy integrity, and draw range checks.

use std::fmt;

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scene errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL, Vulkan, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (absent geometry, mismatched buffer, etc.)
    InvalidResource(String),

    /// Initialization failed (device, buffers)
    InitializationFailed(String),

    /// Draw range outside the vertex or index count
    OutOfRange(String),

    /// Cyclic or dangling parent chain in the assembly hierarchy
    StructuralIntegrity(String),

    /// Unknown node or primitive id
    NotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::OutOfRange(msg) => write!(f, "Out of range: {}", msg),
            Error::StructuralIntegrity(msg) => write!(f, "Corrupted model hierarchy: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
