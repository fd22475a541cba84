//! Error types for treecmp
//!
//! Three tiers, each with a different blast radius:
//! - `ConfigError`: bad roots or patterns. Fatal before any output, exit status 2.
//! - `TraversalError`: one entry could not be read. Recorded, logged, and skipped.
//! - `OutputError`: the report could not be written. Fatal after the comparison ran.

use std::path::PathBuf;

use thiserror::Error;

use crate::output::ExitStatus;

/// Anything that ends a comparison run early.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl Error {
    /// Exit status the process should end with for this error.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Error::Config(_) => ExitStatus::Usage,
            Error::Output(_) => ExitStatus::OutputFailed,
        }
    }
}

/// Configuration and usage errors. Nothing has been compared yet.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root path is missing or is not a directory
    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Root exists but its listing cannot be read
    #[error("cannot read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Exclude pattern failed to compile
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// A single entry that could not be listed. The walk continues without it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("entry vanished during traversal")]
    NotFound,

    #[error("filesystem loop detected")]
    Loop,

    #[error("failed to read content: {0}")]
    Checksum(String),

    #[error("{0}")]
    Other(String),
}

impl TraversalError {
    /// Classify an I/O error into the traversal taxonomy.
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => TraversalError::PermissionDenied,
            std::io::ErrorKind::NotFound => TraversalError::NotFound,
            _ => TraversalError::Other(err.to_string()),
        }
    }

    /// Classify an error reported by the parallel walker.
    pub fn from_walk(err: &ignore::Error) -> Self {
        match err {
            ignore::Error::WithPath { err, .. }
            | ignore::Error::WithDepth { err, .. }
            | ignore::Error::WithLineNumber { err, .. } => Self::from_walk(err),
            ignore::Error::Loop { .. } => TraversalError::Loop,
            ignore::Error::Io(io) => Self::from_io(io),
            other => TraversalError::Other(other.to_string()),
        }
    }
}

/// Failures while writing the report.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("cannot write CSV to '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot write JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_permission_denied() {
        let err = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert_eq!(TraversalError::from_io(&err), TraversalError::PermissionDenied);
    }

    #[test]
    fn test_from_walk_unwraps_path_context() {
        let err = ignore::Error::WithPath {
            path: PathBuf::from("locked"),
            err: Box::new(ignore::Error::Io(std::io::Error::from(
                std::io::ErrorKind::PermissionDenied,
            ))),
        };
        assert_eq!(TraversalError::from_walk(&err), TraversalError::PermissionDenied);
    }

    #[test]
    fn test_exit_status_per_tier() {
        let config: Error = ConfigError::NotADirectory {
            path: PathBuf::from("x"),
        }
        .into();
        assert_eq!(config.exit_status(), ExitStatus::Usage);

        let output: Error = OutputError::Io(std::io::Error::other("closed")).into();
        assert_eq!(output.exit_status(), ExitStatus::OutputFailed);
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::NotADirectory {
            path: PathBuf::from("/nope"),
        };
        assert_eq!(err.to_string(), "'/nope' is not a directory");

        let err = ConfigError::InvalidPattern {
            pattern: "[".to_string(),
            reason: "unclosed".to_string(),
        };
        assert!(err.to_string().contains("invalid exclude pattern '['"));
    }
}
