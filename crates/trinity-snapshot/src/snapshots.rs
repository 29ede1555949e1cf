//! Snapshot records.
//!
//! Every field of every record here is computed from the incident log or
//! an entity identity at generation time, plus the generation timestamp.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trinity_ledger::IncidentRecord;
use trinity_types::{EntityId, IncidentType};

use crate::{SnapshotMetadata, SnapshotView};

/// Summary of one entity's identity at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    /// The entity.
    pub entity_id: EntityId,
    /// When the snapshot was computed.
    pub snapshot_date: DateTime<Utc>,
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
    /// View disclaimer.
    pub metadata: SnapshotMetadata,
}

/// An entity's incidents in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    /// The entity.
    pub entity_id: EntityId,
    /// When the snapshot was computed.
    pub snapshot_date: DateTime<Utc>,
    /// Incidents sorted by date; equal dates keep their original order.
    pub incidents: Vec<IncidentRecord>,
    /// View disclaimer.
    pub metadata: SnapshotMetadata,
}

/// One entity's presence in a system, folded over the system's incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPresence {
    /// The entity.
    pub entity_id: EntityId,
    /// Number of the system's incidents listing the entity.
    pub incident_count: usize,
    /// Date of the first such incident in ledger order.
    pub first_seen: String,
    /// Date of the last such incident in ledger order.
    pub last_seen: String,
}

impl EntityPresence {
    /// Presence seeded from the first incident encountered, not yet counted.
    pub(crate) fn starting_at(entity_id: &EntityId, date: &str) -> Self {
        Self {
            entity_id: entity_id.clone(),
            incident_count: 0,
            first_seen: date.to_owned(),
            last_seen: date.to_owned(),
        }
    }

    /// Count one more incident, encountered after every earlier one.
    pub(crate) fn record(&mut self, date: &str) {
        self.incident_count = self.incident_count.saturating_add(1);
        date.clone_into(&mut self.last_seen);
    }
}

/// Every entity's presence in one system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// The system label.
    pub system: String,
    /// When the snapshot was computed.
    pub snapshot_date: DateTime<Utc>,
    /// Presence per entity.
    pub entities: BTreeMap<EntityId, EntityPresence>,
    /// Number of incidents in the system.
    pub incident_count: usize,
    /// View disclaimer.
    pub metadata: SnapshotMetadata,
}

/// The incidents two entities share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    /// First entity.
    pub entity1: EntityId,
    /// Second entity.
    pub entity2: EntityId,
    /// When the snapshot was computed.
    pub snapshot_date: DateTime<Utc>,
    /// Incidents listing both entities, in ledger order.
    pub shared_incidents: Vec<IncidentRecord>,
    /// Number of shared incidents.
    pub interaction_count: usize,
    /// View disclaimer.
    pub metadata: SnapshotMetadata,
}

/// The incidents within a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalSnapshot {
    /// Inclusive lower bound.
    pub start_date: String,
    /// Inclusive upper bound.
    pub end_date: String,
    /// When the snapshot was computed.
    pub snapshot_date: DateTime<Utc>,
    /// Number of incidents in range.
    pub incident_count: usize,
    /// Distinct systems touched, sorted.
    pub systems_involved: Vec<String>,
    /// Distinct entities touched, sorted.
    pub entities_involved: Vec<EntityId>,
    /// Incidents in range, in ledger order.
    pub incidents: Vec<IncidentRecord>,
    /// View disclaimer.
    pub metadata: SnapshotMetadata,
}

macro_rules! impl_snapshot_view {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl SnapshotView for $ty {
                fn snapshot_date(&self) -> DateTime<Utc> {
                    self.snapshot_date
                }

                fn metadata(&self) -> &SnapshotMetadata {
                    &self.metadata
                }
            }
        )+
    };
}

impl_snapshot_view!(
    IdentitySnapshot,
    TimelineSnapshot,
    SystemSnapshot,
    RelationshipSnapshot,
    TemporalSnapshot,
);

impl IdentitySnapshot {
    /// Whether two snapshots agree on everything except the timestamp.
    pub fn same_view_as(&self, other: &Self) -> bool {
        Self {
            snapshot_date: other.snapshot_date,
            ..self.clone()
        } == *other
    }
}
