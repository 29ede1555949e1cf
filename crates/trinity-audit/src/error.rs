//! Error types for the audit binary.

use std::path::PathBuf;

/// Top-level error for the audit binary.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: trinity_core::ConfigError,
    },

    /// The state file could not be read.
    #[error("failed to read state file {}: {source}", path.display())]
    Read {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The state file is not a serialized system state.
    #[error("failed to parse state JSON: {source}")]
    State {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A record in the state could not be inspected.
    #[error("state shape error: {source}")]
    Shape {
        /// The underlying shape error.
        #[from]
        source: trinity_validator::ShapeError,
    },

    /// The audit found violations.
    #[error("audit failed with {count} violation(s)")]
    Violations {
        /// Number of violations reported.
        count: usize,
    },
}
