//! Append-only incident store and derived entity identities for the Trinity
//! engine.
//!
//! The incident log is the only source of truth in the engine. Everything
//! else (entity identities, snapshots, meanings) is derived from it or
//! layered on top of it, and can be thrown away and rebuilt at any time.
//!
//! # Architecture
//!
//! - [`incident`] -- The immutable [`Incident`] record and its
//!   [`IncidentBuilder`]. Construction validates every fact.
//! - [`log`] -- The [`IncidentLog`]: append-only, with non-destructive
//!   filter queries.
//! - [`identity`] -- The [`EntityIdentity`] view derived from the incidents
//!   that list an entity as a participant.
//!
//! # Sharing
//!
//! Incidents are stored as `Arc<Incident>`. Query results and entity
//! identities hold clones of those `Arc`s, so copying a query result never
//! copies incident data and never aliases the log's own sequence.
//!
//! # Usage
//!
//! ```
//! use trinity_ledger::{Incident, IncidentLog};
//! use trinity_types::IncidentType;
//!
//! let mut log = IncidentLog::new();
//! let incident = Incident::builder("inc-1", "2024-01-01", "chat")
//!     .incident_type(IncidentType::Communication)
//!     .participant("alice")
//!     .participant("bob")
//!     .fact("Alice sent Bob a message")
//!     .build();
//! assert!(incident.is_ok());
//!
//! if let Ok(incident) = incident {
//!     log.append(incident);
//! }
//! assert_eq!(log.get_count(), 1);
//! assert_eq!(log.get_by_entity("bob").len(), 1);
//! ```

pub mod identity;
pub mod incident;
pub mod log;

// Re-export primary types at crate root.
pub use identity::{EntityHistory, EntityIdentity, EntitySummary};
pub use incident::{Incident, IncidentBuilder, IncidentRecord};
pub use log::IncidentLog;

use trinity_types::{EntityId, IncidentId};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that prevent an [`Incident`] from being constructed.
#[derive(Debug, thiserror::Error)]
pub enum IncidentError {
    /// A required field was empty.
    #[error("incident field `{0}` cannot be empty")]
    EmptyField(&'static str),

    /// A fact contains predictive or prescriptive language.
    #[error("fact contains forbidden pattern `{pattern}`: {fact}")]
    ForbiddenLanguage {
        /// The offending fact.
        fact: String,
        /// The pattern it matched.
        pattern: &'static str,
    },

    /// A serialized incident did not have the expected shape.
    #[error("malformed incident record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by [`EntityIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The entity identifier was empty.
    #[error("entity_id cannot be empty")]
    EmptyEntityId,

    /// An incident was added to an entity it does not involve.
    #[error("incident {incident_id} does not involve entity {entity_id}")]
    NotAParticipant {
        /// The entity the incident was added to.
        entity_id: EntityId,
        /// The incident that was rejected.
        incident_id: IncidentId,
    },
}
