//! Error types for the engine facade.
//!
//! [`EngineError`] wraps every subsystem error the [`Engine`](crate::Engine)
//! can surface, so callers can propagate a single type with `?`.

use trinity_types::IncidentId;

/// Top-level error for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An incident could not be constructed.
    #[error("incident error: {source}")]
    Incident {
        /// The underlying incident error.
        #[from]
        source: trinity_ledger::IncidentError,
    },

    /// An entity identity could not be derived.
    #[error("identity error: {source}")]
    Identity {
        /// The underlying identity error.
        #[from]
        source: trinity_ledger::IdentityError,
    },

    /// A meaning entry was rejected.
    #[error("meaning error: {source}")]
    Meaning {
        /// The underlying meaning error.
        #[from]
        source: trinity_meaning::MeaningError,
    },

    /// A serialized record did not have the shape the validator expects.
    #[error("state shape error: {source}")]
    Shape {
        /// The underlying shape error.
        #[from]
        source: trinity_validator::ShapeError,
    },

    /// An incident with the same identifier is already in the log.
    #[error("incident {incident_id} is already recorded")]
    DuplicateIncident {
        /// The identifier that was already present.
        incident_id: IncidentId,
    },
}
