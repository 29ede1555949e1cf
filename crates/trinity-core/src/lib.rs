//! Engine facade, configuration and system audit for Trinity.
//!
//! The lower crates each own one concern: `trinity-ledger` the incident log
//! and entity derivation, `trinity-meaning` the descriptive overlay,
//! `trinity-snapshot` the regenerable views and `trinity-validator` the
//! rule engine. This crate ties them together behind [`Engine`], loads
//! [`EngineConfig`] from YAML, and assembles the serialized
//! [`SystemState`](trinity_validator::SystemState) an audit runs against.
//!
//! # Usage
//!
//! ```
//! use trinity_core::{Engine, EngineConfig};
//! use trinity_ledger::Incident;
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! let incident = Incident::builder("inc-1", "2024-01-01", "chat")
//!     .participant("alice")
//!     .fact("Alice joined the channel")
//!     .build();
//! if let Ok(incident) = incident {
//!     assert!(engine.record(incident).is_ok());
//! }
//! let report = engine.audit();
//! assert!(report.is_ok_and(|report| report.valid));
//! ```

pub mod config;
pub mod engine;
pub mod error;

// Re-export primary types at crate root.
pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use error::EngineError;
