//! Error types for the dirgate gateway.
//!
//! Provides [`GatewayError`] as the single error type returned by every
//! gateway operation. It is non-exhaustive to allow future extension
//! without breaking downstream.

use std::path::PathBuf;

use thiserror::Error;

/// Which step of opening a configured directory failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionFailure {
    /// The configured path could not be made absolute.
    InvalidPath,
    /// The directory could not be opened as a containment handle
    /// (missing, not a directory, permission denied).
    DirectoryUnavailable,
}

impl std::fmt::Display for ConstructionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath => f.write_str("invalid path"),
            Self::DirectoryUnavailable => f.write_str("directory unavailable"),
        }
    }
}

/// Top-level error type for gateway operations.
///
/// Per-directory failures are never reported individually: the gateway
/// folds them into one [`GatewayError::ResolutionFailed`] carrying the
/// caller's relative path and the last underlying I/O error. A missing
/// file and a containment escape are indistinguishable here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    /// No directories are configured; every access is refused.
    #[error("filesystem access is not enabled (no directories configured)")]
    NotEnabled,

    /// The caller supplied an argument the operation cannot accept.
    #[error("{operation}: {reason}")]
    InvalidArgument {
        /// Operation that rejected the argument.
        operation: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Opening a configured directory failed. All capabilities opened
    /// earlier in the same construction call have already been released.
    #[error("cannot open allowed directory {}: {failure}: {source}", .path.display())]
    ConstructionFailed {
        /// The configured path as supplied.
        path: PathBuf,
        /// Which step failed.
        failure: ConstructionFailure,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Every eligible directory failed to serve the request.
    #[error("{operation} {path:?}: {source}")]
    ResolutionFailed {
        /// Operation that was attempted.
        operation: &'static str,
        /// The caller-supplied relative path.
        path: String,
        /// The last per-directory failure.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is malformed.
    #[error("invalid config: {reason}")]
    Config {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl GatewayError {
    /// Returns `true` for the uniform "no directories configured" refusal.
    pub fn is_not_enabled(&self) -> bool {
        matches!(self, Self::NotEnabled)
    }

    /// Returns `true` if the error came from gateway construction.
    pub fn is_construction_failure(&self) -> bool {
        matches!(self, Self::ConstructionFailed { .. })
    }

    /// The underlying I/O error kind, if any.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::ConstructionFailed { source, .. } | Self::ResolutionFailed { source, .. } => {
                Some(source.kind())
            }
            _ => None,
        }
    }
}

/// A convenience alias used throughout the dirgate crates.
pub type Result<T> = std::result::Result<T, GatewayError>;
