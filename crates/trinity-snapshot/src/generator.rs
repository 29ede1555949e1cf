//! The snapshot generator and its identity-snapshot cache.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use trinity_ledger::{EntityIdentity, IdentityError, Incident, IncidentLog};
use trinity_types::EntityId;

use crate::SnapshotMetadata;
use crate::snapshots::{
    EntityPresence, IdentitySnapshot, RelationshipSnapshot, SystemSnapshot, TemporalSnapshot,
    TimelineSnapshot,
};

/// Source of snapshot timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Builds snapshot views from the incident log and entity identities.
///
/// The generator owns nothing but a cache of identity snapshots. Every
/// operation that needs incidents takes the log by shared reference, so a
/// generator can never write to it. Deleting or clearing cached snapshots
/// affects only the cache.
#[derive(Debug, Clone)]
pub struct SnapshotGenerator {
    /// Identity snapshots by entity.
    cache: BTreeMap<EntityId, IdentitySnapshot>,
    /// Whether identity snapshots are cached when created.
    caching: bool,
    /// Timestamp source.
    clock: Clock,
}

impl SnapshotGenerator {
    /// What the generator produces. None of it feeds back into the log.
    pub const OUTPUTS: &'static [&'static str] = &[
        "identity snapshot",
        "timeline snapshot",
        "system snapshot",
        "relationship snapshot",
        "temporal snapshot",
    ];

    /// Create a caching generator stamped with the current time.
    pub const fn new() -> Self {
        Self {
            cache: BTreeMap::new(),
            caching: true,
            clock: Utc::now,
        }
    }

    /// Enable or disable caching of identity snapshots.
    #[must_use]
    pub const fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    /// Replace the timestamp source.
    #[must_use]
    pub const fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Summarize an entity's identity, caching the result when enabled.
    pub fn create_identity_snapshot(&mut self, entity: &EntityIdentity) -> IdentitySnapshot {
        let summary = entity.summary();
        let snapshot = IdentitySnapshot {
            entity_id: summary.entity_id,
            snapshot_date: self.now(),
            incident_count: summary.incident_count,
            first_seen: summary.first_seen,
            last_seen: summary.last_seen,
            systems: summary.systems,
            incident_types: summary.incident_types,
            co_participants: summary.co_participants,
            metadata: SnapshotMetadata::view(),
        };

        if self.caching {
            self.cache
                .insert(snapshot.entity_id.clone(), snapshot.clone());
        }
        debug!(
            entity_id = %snapshot.entity_id,
            incidents = snapshot.incident_count,
            cached = self.caching,
            "identity snapshot created"
        );
        snapshot
    }

    /// An entity's incidents in ascending date order.
    pub fn create_timeline_snapshot(&self, entity: &EntityIdentity) -> TimelineSnapshot {
        let mut incidents: Vec<&Incident> = entity.incidents().iter().map(AsRef::as_ref).collect();
        incidents.sort_by(|a, b| a.date().cmp(b.date()));

        TimelineSnapshot {
            entity_id: entity.entity_id().clone(),
            snapshot_date: self.now(),
            incidents: incidents.into_iter().map(Incident::to_record).collect(),
            metadata: SnapshotMetadata::view(),
        }
    }

    /// Every entity's presence in `system`.
    ///
    /// Presence is folded over the system's incidents in ledger order:
    /// `first_seen` is the date of the first incident encountered and
    /// `last_seen` the date of the last, whatever their relative dates.
    /// A participant listed twice in one incident is counted once.
    pub fn create_system_snapshot(&self, log: &IncidentLog, system: &str) -> SystemSnapshot {
        let incidents = log.get_by_system(system);
        let mut entities: BTreeMap<EntityId, EntityPresence> = BTreeMap::new();

        for incident in &incidents {
            let participants: BTreeSet<&EntityId> = incident.participants().iter().collect();
            for entity_id in participants {
                entities
                    .entry(entity_id.clone())
                    .or_insert_with(|| EntityPresence::starting_at(entity_id, incident.date()))
                    .record(incident.date());
            }
        }

        SystemSnapshot {
            system: system.to_owned(),
            snapshot_date: self.now(),
            entities,
            incident_count: incidents.len(),
            metadata: SnapshotMetadata::view(),
        }
    }

    /// The incidents listing both entities.
    pub fn create_relationship_snapshot(
        &self,
        log: &IncidentLog,
        entity1: &str,
        entity2: &str,
    ) -> RelationshipSnapshot {
        let shared_incidents: Vec<_> = log
            .iter()
            .filter(|incident| incident.involves(entity1) && incident.involves(entity2))
            .map(|incident| incident.to_record())
            .collect();

        RelationshipSnapshot {
            entity1: EntityId::new(entity1),
            entity2: EntityId::new(entity2),
            snapshot_date: self.now(),
            interaction_count: shared_incidents.len(),
            shared_incidents,
            metadata: SnapshotMetadata::view(),
        }
    }

    /// The incidents dated within `[start_date, end_date]`.
    pub fn create_temporal_snapshot(
        &self,
        log: &IncidentLog,
        start_date: &str,
        end_date: &str,
    ) -> TemporalSnapshot {
        let incidents = log.get_by_date_range(start_date, end_date);
        let systems: BTreeSet<&str> = incidents.iter().map(|i| i.system()).collect();
        let entities: BTreeSet<&EntityId> =
            incidents.iter().flat_map(|i| i.participants()).collect();

        TemporalSnapshot {
            start_date: start_date.to_owned(),
            end_date: end_date.to_owned(),
            snapshot_date: self.now(),
            incident_count: incidents.len(),
            systems_involved: systems.into_iter().map(str::to_owned).collect(),
            entities_involved: entities.into_iter().cloned().collect(),
            incidents: incidents.iter().map(|i| i.to_record()).collect(),
            metadata: SnapshotMetadata::view(),
        }
    }

    // -----------------------------------------------------------------------
    // Cache
    // -----------------------------------------------------------------------

    /// The cached identity snapshot for `entity_id`, if any.
    pub fn cached_identity_snapshot(&self, entity_id: &str) -> Option<&IdentitySnapshot> {
        self.cache.get(entity_id)
    }

    /// The identity snapshot for `entity_id`, computed from the log when it
    /// is not cached.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmptyEntityId`] if `entity_id` is blank.
    pub fn identity_snapshot(
        &mut self,
        log: &IncidentLog,
        entity_id: &str,
    ) -> Result<IdentitySnapshot, IdentityError> {
        if let Some(cached) = self.cache.get(entity_id) {
            return Ok(cached.clone());
        }
        let entity = log.derive_entity(entity_id)?;
        Ok(self.create_identity_snapshot(&entity))
    }

    /// Every cached identity snapshot, ordered by entity.
    pub fn cached_snapshots(&self) -> impl Iterator<Item = &IdentitySnapshot> {
        self.cache.values()
    }

    /// Number of cached identity snapshots.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Drop the cached snapshot for `entity_id`. The log is not touched.
    pub fn delete_snapshot(&mut self, entity_id: &str) -> Option<IdentitySnapshot> {
        let removed = self.cache.remove(entity_id);
        debug!(entity_id, removed = removed.is_some(), "snapshot deleted from cache");
        removed
    }

    /// Drop the cached snapshots of every entity an incident involves.
    ///
    /// Called after the incident is appended, so the next identity snapshot
    /// for any participant is recomputed from the log. Returns how many
    /// cached snapshots were dropped.
    pub fn invalidate(&mut self, incident: &Incident) -> usize {
        let dropped = incident
            .participants()
            .iter()
            .filter(|entity_id| self.cache.remove(entity_id.as_str()).is_some())
            .count();
        if dropped > 0 {
            debug!(
                incident_id = %incident.incident_id(),
                dropped,
                "cached snapshots invalidated by new incident"
            );
        }
        dropped
    }

    /// Clear the cache so the next access recomputes from the log.
    ///
    /// Returns how many snapshots were discarded.
    pub fn regenerate_all_snapshots(&mut self) -> usize {
        let discarded = self.cache.len();
        self.cache.clear();
        info!(discarded, "snapshot cache cleared for regeneration");
        discarded
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl Default for SnapshotGenerator {
    fn default() -> Self {
        Self::new()
    }
}
