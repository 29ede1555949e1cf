//! Derived entity identities.
//!
//! An [`EntityIdentity`] is nothing more than an entity identifier and the
//! incidents that list it as a participant. Every other property is
//! computed from that list on request, and the serialized form exposes
//! only the identifier and the list.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value as JsonValue;
use tracing::warn;

use trinity_types::{EntityId, IncidentType};

use crate::{IdentityError, Incident, IncidentRecord};

// ---------------------------------------------------------------------------
// Serialized summaries
// ---------------------------------------------------------------------------

/// Counts, dates and distinct-value sets computed from an entity's incidents.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntitySummary {
    /// The entity.
    pub entity_id: EntityId,
    /// Number of incidents listing the entity.
    pub incident_count: usize,
    /// Date of the earliest incident.
    pub first_seen: Option<String>,
    /// Date of the latest incident.
    pub last_seen: Option<String>,
    /// Distinct systems, sorted.
    pub systems: Vec<String>,
    /// Distinct incident types, sorted.
    pub incident_types: Vec<IncidentType>,
    /// Distinct other participants, sorted.
    pub co_participants: Vec<EntityId>,
}

/// An entity's summary together with its full incident history.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EntityHistory {
    /// The entity.
    pub entity_id: EntityId,
    /// Every incident, in the order it was added.
    pub incidents: Vec<IncidentRecord>,
    /// The computed summary.
    pub summary: EntitySummary,
}

// ---------------------------------------------------------------------------
// EntityIdentity
// ---------------------------------------------------------------------------

/// The read-only identity of one entity, derived from incidents.
///
/// Holds shared references into the incident log. It can be rebuilt from
/// the log at any time with [`crate::IncidentLog::derive_entity`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntityIdentity {
    entity_id: EntityId,
    incidents: Vec<Arc<Incident>>,
}

impl EntityIdentity {
    /// Create an identity with no incidents.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmptyEntityId`] if the identifier is blank.
    pub fn new(entity_id: impl Into<EntityId>) -> Result<Self, IdentityError> {
        let entity_id = entity_id.into();
        if entity_id.is_blank() {
            return Err(IdentityError::EmptyEntityId);
        }
        Ok(Self {
            entity_id,
            incidents: Vec::new(),
        })
    }

    /// Append an incident that lists this entity as a participant.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotAParticipant`] if the incident does not
    /// involve this entity. The identity is left unchanged.
    pub fn add_incident(&mut self, incident: impl Into<Arc<Incident>>) -> Result<(), IdentityError> {
        let incident = incident.into();
        if !incident.involves(self.entity_id.as_str()) {
            warn!(
                entity_id = %self.entity_id,
                incident_id = %incident.incident_id(),
                "rejected incident that does not involve entity"
            );
            return Err(IdentityError::NotAParticipant {
                entity_id: self.entity_id.clone(),
                incident_id: incident.incident_id().clone(),
            });
        }
        self.incidents.push(incident);
        Ok(())
    }

    /// The entity identifier.
    pub const fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// The incidents, in the order they were added.
    pub fn incidents(&self) -> &[Arc<Incident>] {
        &self.incidents
    }

    /// Number of incidents.
    pub const fn get_incident_count(&self) -> usize {
        self.incidents.len()
    }

    /// The incident with the earliest date. On ties the first added wins.
    pub fn get_first_incident(&self) -> Option<&Incident> {
        self.incidents
            .iter()
            .map(AsRef::as_ref)
            .reduce(|best, next| if next.date() < best.date() { next } else { best })
    }

    /// The incident with the latest date. On ties the first added wins.
    pub fn get_last_incident(&self) -> Option<&Incident> {
        self.incidents
            .iter()
            .map(AsRef::as_ref)
            .reduce(|best, next| if next.date() > best.date() { next } else { best })
    }

    /// Distinct systems the entity appears in.
    pub fn get_systems(&self) -> BTreeSet<&str> {
        self.incidents.iter().map(|incident| incident.system()).collect()
    }

    /// Distinct incident types involving the entity.
    pub fn get_incident_types(&self) -> BTreeSet<IncidentType> {
        self.incidents
            .iter()
            .map(|incident| incident.incident_type())
            .collect()
    }

    /// Every other participant across the entity's incidents.
    pub fn get_co_participants(&self) -> BTreeSet<&EntityId> {
        self.incidents
            .iter()
            .flat_map(|incident| incident.participants())
            .filter(|participant| **participant != self.entity_id)
            .collect()
    }

    /// The summary view: counts, dates and sets, without incident bodies.
    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            entity_id: self.entity_id.clone(),
            incident_count: self.get_incident_count(),
            first_seen: self.get_first_incident().map(|i| i.date().to_owned()),
            last_seen: self.get_last_incident().map(|i| i.date().to_owned()),
            systems: self.get_systems().into_iter().map(str::to_owned).collect(),
            incident_types: self.get_incident_types().into_iter().collect(),
            co_participants: self.get_co_participants().into_iter().cloned().collect(),
        }
    }

    /// The summary together with every incident record.
    pub fn full_record(&self) -> EntityHistory {
        EntityHistory {
            entity_id: self.entity_id.clone(),
            incidents: self.incidents.iter().map(|i| i.to_record()).collect(),
            summary: self.summary(),
        }
    }

    /// The JSON view form: `entity_id` and `incidents` only.
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Serialize for EntityIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let incidents: Vec<&Incident> = self.incidents.iter().map(AsRef::as_ref).collect();
        let mut state = serializer.serialize_struct("EntityIdentity", 2)?;
        state.serialize_field("entity_id", &self.entity_id)?;
        state.serialize_field("incidents", &incidents)?;
        state.end()
    }
}
