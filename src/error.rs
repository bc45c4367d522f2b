//! Error types for the squat coaching library.

use thiserror::Error;

/// Failure conditions signaled by the external pose source.
///
/// Each condition maps to its own fallback feedback message; none of them
/// is fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoseError {
    /// The detector found no body in the frame
    #[error("no body observed in frame")]
    NoObservation,

    /// A body was found but too few joints passed the confidence filter
    #[error("too few confident joints detected")]
    InsufficientJoints,

    /// The pose source itself failed (malformed frame, device error)
    #[error("pose source failure: {0}")]
    SourceFailure(String),
}

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input parameters provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failed
    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Pose source reported a failure condition
    #[error(transparent)]
    Pose(#[from] PoseError),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
