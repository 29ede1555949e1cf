//! Configuration loading and typed config structures for the Trinity engine.
//!
//! The canonical configuration lives in `trinity-config.yaml` at the project
//! root. Every section and field is optional; anything left out takes the
//! default defined here.

use std::path::Path;

use serde::Deserialize;

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "TRINITY_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration, mirroring `trinity-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Incident log behavior.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Snapshot generator behavior.
    #[serde(default)]
    pub snapshots: SnapshotConfig,

    /// Audit behavior.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `TRINITY_LOG_LEVEL` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level from `TRINITY_LOG_LEVEL` when it is set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_override(std::env::var(LOG_LEVEL_ENV).ok());
    }

    /// Override the level when `level` is present and non-empty.
    pub fn apply_override(&mut self, level: Option<String>) {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Incident log configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Reject an incident whose `incident_id` is already in the log.
    #[serde(default = "default_true")]
    pub reject_duplicate_ids: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reject_duplicate_ids: default_true(),
        }
    }
}

/// Snapshot generator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SnapshotConfig {
    /// Keep identity snapshots in the generator's cache.
    #[serde(default = "default_true")]
    pub cache_identity_snapshots: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            cache_identity_snapshots: default_true(),
        }
    }
}

/// Audit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Treat any violation as a failed audit.
    #[serde(default = "default_true")]
    pub fail_on_violation: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            fail_on_violation: default_true(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
