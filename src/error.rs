//! Error types for Mimic Web
//!
//! This module provides the error type hierarchy using `thiserror`.
//! The taxonomy follows the two real failure classes of the engine:
//! geometry that cannot be resolved, and driver primitives that reject.
//! Simulated human mistakes (typos, overshoots, pauses) are behavior,
//! never errors, and do not appear here.

use thiserror::Error;

/// The main error type for Mimic Web operations
#[derive(Error, Debug)]
pub enum Error {
    /// Target geometry could not be resolved
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// A driver primitive rejected
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Invalid behavior profile data
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Errors resolving on-screen geometry for a gesture
#[derive(Error, Debug)]
pub enum GeometryError {
    /// No element matched the selector
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The element matched but has a zero-sized rectangle
    #[error("Element has no visible area: {0}")]
    EmptyRect(String),
}

/// Errors from the underlying input driver
///
/// A driver failure aborts the in-progress gesture. Already-issued key
/// and mouse events cannot be undone, so there is no retry or rollback.
#[derive(Error, Debug)]
pub enum DriverError {
    /// An input dispatch or query command failed
    #[error("Driver command failed: {0}")]
    CommandFailed(String),

    /// Connection to the browser was lost
    #[error("Driver connection lost")]
    ConnectionLost,

    /// A driver call did not complete in time
    #[error("Driver operation timed out after {0}ms")]
    Timeout(u64),
}

/// Errors validating a behavior profile
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Error rate must be a probability
    #[error("Error rate must be within [0, 1], got {0}")]
    InvalidErrorRate(f64),

    /// Mouse speed multiplier must be positive
    #[error("Mouse speed multiplier must be > 0, got {0}")]
    InvalidSpeedMultiplier(f64),
}

/// Result type alias for Mimic Web operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}
