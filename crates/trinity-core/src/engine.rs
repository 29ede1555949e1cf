//! The [`Engine`] facade.
//!
//! Owns one incident log, one meaning overlay and one snapshot generator,
//! and wires them together the way a caller normally uses them: record
//! incidents, derive entities, attach meanings, generate views, audit.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use trinity_ledger::{EntityIdentity, Incident, IncidentLog};
use trinity_meaning::{MeaningEntry, MeaningOverlay};
use trinity_snapshot::{
    Clock, IdentitySnapshot, RelationshipSnapshot, SnapshotGenerator, SnapshotView, SystemSnapshot,
    TemporalSnapshot, TimelineSnapshot,
};
use trinity_types::EntityId;
use trinity_validator::{
    SystemState, ValidationReport, validate_append_only_operation, validate_no_control,
    validate_no_feedback_loops, validate_system_state,
};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Incident log, meaning overlay and snapshot generator behind one handle.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    log: IncidentLog,
    overlay: MeaningOverlay,
    snapshots: SnapshotGenerator,
}

impl Engine {
    /// Create an empty engine.
    pub const fn new(config: EngineConfig) -> Self {
        let snapshots =
            SnapshotGenerator::new().with_caching(config.snapshots.cache_identity_snapshots);
        Self {
            config,
            log: IncidentLog::new(),
            overlay: MeaningOverlay::new(),
            snapshots,
        }
    }

    /// Replace the clock used to timestamp snapshots.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.snapshots = self.snapshots.with_clock(clock);
        self
    }

    /// The configuration the engine was built with.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the incident log.
    pub const fn log(&self) -> &IncidentLog {
        &self.log
    }

    /// Read access to the meaning overlay.
    pub const fn overlay(&self) -> &MeaningOverlay {
        &self.overlay
    }

    /// Read access to the snapshot generator.
    pub const fn snapshots(&self) -> &SnapshotGenerator {
        &self.snapshots
    }

    // -----------------------------------------------------------------------
    // Incidents and entities
    // -----------------------------------------------------------------------

    /// Append an incident to the log.
    ///
    /// Cached identity snapshots of the incident's participants are dropped,
    /// so later snapshots reflect the new incident.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateIncident`] when duplicate rejection is
    /// enabled and an incident with the same identifier is already present.
    pub fn record(&mut self, incident: Incident) -> Result<Arc<Incident>, EngineError> {
        if self.config.ledger.reject_duplicate_ids
            && self.log.contains(incident.incident_id().as_str())
        {
            warn!(incident_id = %incident.incident_id(), "duplicate incident rejected");
            return Err(EngineError::DuplicateIncident {
                incident_id: incident.incident_id().clone(),
            });
        }
        let stored = self.log.append(incident);
        self.snapshots.invalidate(&stored);
        Ok(stored)
    }

    /// Parse, validate and append an incident from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Incident`] if the value is not a valid
    /// incident, or any error from [`Engine::record`].
    pub fn record_value(&mut self, value: JsonValue) -> Result<Arc<Incident>, EngineError> {
        let incident = Incident::from_value(value)?;
        self.record(incident)
    }

    /// Derive the identity view of one entity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Identity`] if `entity_id` is blank.
    pub fn entity(&self, entity_id: &str) -> Result<EntityIdentity, EngineError> {
        Ok(self.log.derive_entity(entity_id)?)
    }

    /// Every entity that participates in at least one incident.
    pub fn entity_ids(&self) -> BTreeSet<&EntityId> {
        self.log.entity_ids()
    }

    // -----------------------------------------------------------------------
    // Meanings
    // -----------------------------------------------------------------------

    /// Add a meaning entry to the overlay layer for its source.
    ///
    /// Returns the entry it displaced, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Meaning`] if the overlay rejects the entry.
    pub fn add_meaning(&mut self, entry: MeaningEntry) -> Result<Option<MeaningEntry>, EngineError> {
        Ok(self.overlay.add_meaning(entry)?)
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// The identity snapshot for an entity, served from the cache when
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Identity`] if `entity_id` is blank.
    pub fn identity_snapshot(&mut self, entity_id: &str) -> Result<IdentitySnapshot, EngineError> {
        Ok(self.snapshots.identity_snapshot(&self.log, entity_id)?)
    }

    /// The date-ordered timeline of an entity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Identity`] if `entity_id` is blank.
    pub fn timeline_snapshot(&self, entity_id: &str) -> Result<TimelineSnapshot, EngineError> {
        let entity = self.log.derive_entity(entity_id)?;
        Ok(self.snapshots.create_timeline_snapshot(&entity))
    }

    /// Every entity's presence in one system.
    pub fn system_snapshot(&self, system: &str) -> SystemSnapshot {
        self.snapshots.create_system_snapshot(&self.log, system)
    }

    /// The incidents two entities share.
    pub fn relationship_snapshot(&self, entity1: &str, entity2: &str) -> RelationshipSnapshot {
        self.snapshots
            .create_relationship_snapshot(&self.log, entity1, entity2)
    }

    /// The incidents within an inclusive date range.
    pub fn temporal_snapshot(&self, start_date: &str, end_date: &str) -> TemporalSnapshot {
        self.snapshots
            .create_temporal_snapshot(&self.log, start_date, end_date)
    }

    /// Drop one cached identity snapshot.
    pub fn delete_snapshot(&mut self, entity_id: &str) -> Option<IdentitySnapshot> {
        self.snapshots.delete_snapshot(entity_id)
    }

    /// Discard every cached snapshot. Returns how many were discarded.
    pub fn regenerate_all_snapshots(&mut self) -> usize {
        self.snapshots.regenerate_all_snapshots()
    }

    // -----------------------------------------------------------------------
    // Audit
    // -----------------------------------------------------------------------

    /// Serialize the engine into the shape the system validator consumes.
    ///
    /// Entities are derived fresh from the log; snapshots are the ones
    /// currently cached.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Identity`] if an entity cannot be derived.
    pub fn system_state(&self) -> Result<SystemState, EngineError> {
        let incidents = self.log.iter().map(|incident| incident.to_value()).collect();
        let entities = self
            .log
            .entity_ids()
            .into_iter()
            .map(|id| {
                self.log
                    .derive_entity(id.clone())
                    .map(|entity| entity.to_value())
            })
            .collect::<Result<Vec<_>, _>>()?;
        let meanings = self
            .overlay
            .all_entries()
            .into_iter()
            .map(MeaningEntry::to_value)
            .collect();
        let snapshots = self
            .snapshots
            .cached_snapshots()
            .map(SnapshotView::to_value)
            .collect();
        Ok(SystemState {
            incidents,
            entities,
            meanings,
            snapshots,
        })
    }

    /// Validate the whole engine: every record, plus the operations and
    /// capabilities each component exposes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if a serialized record cannot be read
    /// by the validator, or [`EngineError::Identity`] from
    /// [`Engine::system_state`].
    pub fn audit(&self) -> Result<ValidationReport, EngineError> {
        let state = self.system_state()?;
        let mut report = validate_system_state(&state)?;

        let mut component_failures: Vec<String> = IncidentLog::OPERATIONS
            .iter()
            .copied()
            .map(validate_append_only_operation)
            .filter(|verdict| !verdict.is_valid())
            .map(|verdict| format!("IncidentLog: {}", verdict.reason))
            .collect();
        let control = validate_no_control("MeaningOverlay", MeaningOverlay::CAPABILITIES);
        if !control.is_valid() {
            component_failures.push(control.reason);
        }
        let feedback = validate_no_feedback_loops("SnapshotGenerator", SnapshotGenerator::OUTPUTS);
        if !feedback.is_valid() {
            component_failures.push(feedback.reason);
        }

        for failure in component_failures {
            warn!(violation = %failure, "component check failed");
            report.valid = false;
            report.violations.push(failure);
        }

        info!(
            valid = report.valid,
            violations = report.violations.len(),
            warnings = report.warnings.len(),
            incidents = state.incidents.len(),
            "audit complete"
        );
        Ok(report)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
