//! Audit binary for the Trinity engine.
//!
//! Reads a serialized system state (incidents, entities, meanings and
//! snapshots as JSON), runs the system validator over it and prints the
//! report. Exits with an error when the state has violations and
//! `audit.fail_on_violation` is set.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `trinity-config.yaml` (defaults if missing)
//! 3. Initialize structured logging (tracing)
//! 4. Read and validate the state file
//! 5. Print the report

mod error;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trinity_core::EngineConfig;
use trinity_validator::{SystemState, ValidationReport, validate_system_state};

use crate::error::AuditError;

/// Validate a serialized Trinity system state.
#[derive(Debug, Parser)]
#[command(name = "trinity-audit", version)]
struct Args {
    /// Path to the JSON system state to audit.
    state: PathBuf,

    /// Path to the engine configuration file.
    #[arg(long, default_value = "trinity-config.yaml")]
    config: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

/// Application entry point for the audit binary.
///
/// # Errors
///
/// Returns an error if the configuration or state cannot be loaded, or if
/// the audit finds violations and the configuration treats them as fatal.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logging is configured from the file, so it starts after loading.
    let (config, from_file) = load_config(&args.config)?;
    init_tracing(&config.logging.level, args.json_logs);
    if from_file {
        info!(path = %args.config.display(), "Configuration loaded");
    } else {
        info!(path = %args.config.display(), "Config file not found, using defaults");
    }

    let report = audit_file(&args.state)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.valid && config.audit.fail_on_violation {
        return Err(AuditError::Violations {
            count: report.violations.len(),
        }
        .into());
    }
    Ok(())
}

/// Load the engine configuration, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<(EngineConfig, bool), AuditError> {
    if path.exists() {
        Ok((EngineConfig::from_file(path)?, true))
    } else {
        let mut config = EngineConfig::default();
        config.logging.apply_env_overrides();
        Ok((config, false))
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Read a state file and validate it.
fn audit_file(path: &Path) -> Result<ValidationReport, AuditError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AuditError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let report = audit_str(&contents)?;
    if report.valid {
        info!(
            warnings = report.warnings.len(),
            "system state is valid"
        );
    } else {
        warn!(
            violations = report.violations.len(),
            warnings = report.warnings.len(),
            "system state has violations"
        );
    }
    Ok(report)
}

/// Parse a JSON system state and validate it.
fn audit_str(json: &str) -> Result<ValidationReport, AuditError> {
    let state: SystemState = serde_json::from_str(json)?;
    Ok(validate_system_state(&state)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_is_valid() {
        let report = audit_str("{}").unwrap();
        assert!(report.valid);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn snapshot_without_disclaimer_is_reported() {
        let report = audit_str(r#"{"snapshots": [{"system": "chat", "metadata": {"note": "final"}}]}"#)
            .unwrap();
        assert!(!report.valid);
        assert!(report.violations[0].starts_with("Snapshot chat:"));
    }

    #[test]
    fn malformed_json_is_a_state_error() {
        let result = audit_str("not json");
        assert!(matches!(result, Err(AuditError::State { .. })));
    }

    #[test]
    fn non_mapping_record_is_a_shape_error() {
        let result = audit_str(r#"{"incidents": [42]}"#);
        assert!(matches!(result, Err(AuditError::Shape { .. })));
    }

    #[test]
    fn missing_state_file_names_the_path() {
        let result = audit_file(Path::new("/nonexistent/state.json"));
        assert!(matches!(
            &result,
            Err(AuditError::Read { path, .. }) if path.ends_with("state.json")
        ));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let (config, from_file) = load_config(Path::new("/nonexistent/trinity-config.yaml")).unwrap();
        assert!(!from_file);
        assert!(config.audit.fail_on_violation);
    }
}
