//! The append-only incident log.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use trinity_types::EntityId;

use crate::{EntityIdentity, IdentityError, Incident};

/// The append-only ledger of incidents.
///
/// The only operation that changes the log is [`IncidentLog::append`].
/// Every query scans the ledger in order and returns a fresh `Vec` of
/// shared references; mutating that `Vec` never affects the log.
#[derive(Debug, Clone, Default)]
pub struct IncidentLog {
    /// All incidents, in insertion order.
    incidents: Vec<Arc<Incident>>,
}

impl IncidentLog {
    /// Names of the operations the log exposes.
    pub const OPERATIONS: &'static [&'static str] = &[
        "append",
        "get_all",
        "get_by_entity",
        "get_by_system",
        "get_by_date_range",
        "get_count",
        "find",
        "derive_entity",
    ];

    /// Create a new empty log.
    pub const fn new() -> Self {
        Self {
            incidents: Vec::new(),
        }
    }

    /// Append an incident to the tail of the log.
    ///
    /// The incident was validated when it was constructed, so appending
    /// cannot fail. Returns the shared handle now held by the log.
    pub fn append(&mut self, incident: impl Into<Arc<Incident>>) -> Arc<Incident> {
        let incident = incident.into();
        self.incidents.push(Arc::clone(&incident));
        debug!(
            incident_id = %incident.incident_id(),
            system = incident.system(),
            count = self.incidents.len(),
            "incident appended"
        );
        incident
    }

    /// All incidents, in ledger order.
    pub fn get_all(&self) -> Vec<Arc<Incident>> {
        self.incidents.clone()
    }

    /// Incidents that list `entity_id` as a participant, in ledger order.
    pub fn get_by_entity(&self, entity_id: &str) -> Vec<Arc<Incident>> {
        self.filter(|incident| incident.involves(entity_id))
    }

    /// Incidents observed in `system`, in ledger order.
    pub fn get_by_system(&self, system: &str) -> Vec<Arc<Incident>> {
        self.filter(|incident| incident.system() == system)
    }

    /// Incidents whose date lies in `[start, end]`, in ledger order.
    ///
    /// Dates are compared as plain strings; no timezone normalization
    /// takes place.
    pub fn get_by_date_range(&self, start: &str, end: &str) -> Vec<Arc<Incident>> {
        self.filter(|incident| start <= incident.date() && incident.date() <= end)
    }

    /// Number of incidents in the log.
    pub const fn get_count(&self) -> usize {
        self.incidents.len()
    }

    /// Number of incidents in the log.
    pub const fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the log holds no incidents.
    pub const fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Iterate over the incidents in ledger order without copying.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Incident>> {
        self.incidents.iter()
    }

    /// The first incident with the given identifier.
    pub fn find(&self, incident_id: &str) -> Option<&Arc<Incident>> {
        self.incidents
            .iter()
            .find(|incident| incident.incident_id().as_str() == incident_id)
    }

    /// Whether an incident with the given identifier has been appended.
    pub fn contains(&self, incident_id: &str) -> bool {
        self.find(incident_id).is_some()
    }

    /// Every distinct participant across the log.
    pub fn entity_ids(&self) -> BTreeSet<&EntityId> {
        self.incidents
            .iter()
            .flat_map(|incident| incident.participants())
            .collect()
    }

    /// Every distinct system label across the log.
    pub fn systems(&self) -> BTreeSet<&str> {
        self.incidents.iter().map(|incident| incident.system()).collect()
    }

    /// Derive the identity view of one entity from the log.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmptyEntityId`] if `entity_id` is blank.
    pub fn derive_entity(
        &self,
        entity_id: impl Into<EntityId>,
    ) -> Result<EntityIdentity, IdentityError> {
        let mut entity = EntityIdentity::new(entity_id)?;
        for incident in self.get_by_entity(entity.entity_id().as_str()) {
            entity.add_incident(incident)?;
        }
        Ok(entity)
    }

    fn filter(&self, predicate: impl Fn(&Incident) -> bool) -> Vec<Arc<Incident>> {
        self.incidents
            .iter()
            .filter(|incident| predicate(incident))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn incident(id: &str, date: &str, system: &str, participants: &[&str]) -> Incident {
        Incident::builder(id, date, system)
            .participants(participants.iter().copied())
            .fact("A message was sent")
            .build()
            .unwrap()
    }

    fn populated() -> IncidentLog {
        let mut log = IncidentLog::new();
        log.append(incident("i1", "2024-01-01", "chat", &["alice", "bob"]));
        log.append(incident("i2", "2024-02-01", "email", &["bob"]));
        log.append(incident("i3", "2024-03-01", "chat", &["alice", "carol"]));
        log
    }

    #[test]
    fn exposed_operations_are_append_only() {
        for op in IncidentLog::OPERATIONS {
            let verdict = trinity_validator::validate_append_only_operation(op);
            assert!(verdict.is_valid(), "{op}: {}", verdict.reason);
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = IncidentLog::new();
        assert!(log.is_empty());
        assert_eq!(log.get_count(), 0);
        assert!(log.get_all().is_empty());
    }

    #[test]
    fn get_all_preserves_order() {
        let log = populated();
        let ids: Vec<&str> = log
            .iter()
            .map(|incident| incident.incident_id().as_str())
            .collect();
        assert_eq!(ids, ["i1", "i2", "i3"]);
        assert_eq!(log.get_all().len(), 3);
        assert_eq!(log.get_count(), 3);
    }

    #[test]
    fn mutating_a_copy_leaves_log_intact() {
        let log = populated();
        let mut copy = log.get_all();
        copy.clear();
        copy.push(Arc::new(incident("i9", "2025-01-01", "chat", &["eve"])));

        let fresh = log.get_all();
        assert_eq!(fresh.len(), 3);
        assert_eq!(fresh[0].incident_id().as_str(), "i1");
    }

    #[test]
    fn query_by_entity_and_system() {
        let log = populated();
        assert_eq!(log.get_by_entity("alice").len(), 2);
        assert_eq!(log.get_by_entity("bob").len(), 2);
        assert!(log.get_by_entity("dave").is_empty());
        assert_eq!(log.get_by_system("chat").len(), 2);
        assert_eq!(log.get_by_system("email").len(), 1);
    }

    #[test]
    fn date_range_is_inclusive() {
        let log = populated();
        let hits = log.get_by_date_range("2024-01-01", "2024-02-01");
        let ids: Vec<&str> = hits.iter().map(|i| i.incident_id().as_str()).collect();
        assert_eq!(ids, ["i1", "i2"]);
        assert!(log.get_by_date_range("2025-01-01", "2025-12-31").is_empty());
    }

    #[test]
    fn find_and_projections() {
        let log = populated();
        assert!(log.contains("i2"));
        assert!(log.find("i7").is_none());
        let entities: Vec<&str> = log.entity_ids().into_iter().map(EntityId::as_str).collect();
        assert_eq!(entities, ["alice", "bob", "carol"]);
        assert_eq!(log.systems().into_iter().collect::<Vec<_>>(), ["chat", "email"]);
    }

    #[test]
    fn append_shares_the_stored_record() {
        let mut log = IncidentLog::new();
        let stored = log.append(incident("i1", "2024-01-01", "chat", &["alice"]));
        assert!(Arc::ptr_eq(&stored, &log.get_all()[0]));
    }

    #[test]
    fn derive_entity_collects_involving_incidents() {
        let log = populated();
        let alice = log.derive_entity("alice").unwrap();
        assert_eq!(alice.get_incident_count(), 2);
        assert!(matches!(log.derive_entity(""), Err(IdentityError::EmptyEntityId)));
    }
}
