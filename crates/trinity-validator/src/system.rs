//! System-wide validation of a serialized engine state.
//!
//! [`validate_system_state`] runs every structural check across every
//! collection in a [`SystemState`] and accumulates the results into a
//! [`ValidationReport`]. It never stops at the first violation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::ShapeError;
use crate::integrity::{
    validate_entity_is_derived, validate_entity_membership, validate_incident_integrity,
    validate_meaning_is_descriptive, validate_snapshot_is_view,
};

/// A serialized engine state, as handed to an auditor.
///
/// Every collection is optional in the JSON form and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    /// Serialized incidents, in ledger order.
    #[serde(default)]
    pub incidents: Vec<JsonValue>,
    /// Serialized entity views (`entity_id` plus `incidents`).
    #[serde(default)]
    pub entities: Vec<JsonValue>,
    /// Serialized meaning entries.
    #[serde(default)]
    pub meanings: Vec<JsonValue>,
    /// Serialized snapshots.
    #[serde(default)]
    pub snapshots: Vec<JsonValue>,
}

/// The outcome of a system-wide validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` when no violation was found.
    pub valid: bool,
    /// Every violation found, labelled with the offending record.
    pub violations: Vec<String>,
    /// Observations that do not invalidate the state.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn violation(&mut self, message: String) {
        warn!(violation = %message, "system validation violation");
        self.valid = false;
        self.violations.push(message);
    }

    fn warning(&mut self, message: String) {
        debug!(warning = %message, "system validation warning");
        self.warnings.push(message);
    }
}

/// Validate an entire serialized system state.
///
/// Checks, for every record:
/// - incidents: integrity, and uniqueness of `incident_id`;
/// - entities: closed field set and participant membership, with a
///   warning for incidents the audited ledger does not contain;
/// - meanings: descriptive definitions;
/// - snapshots: the view disclaimer.
///
/// # Errors
///
/// Returns [`ShapeError`] if any record is not shaped as expected.
pub fn validate_system_state(state: &SystemState) -> Result<ValidationReport, ShapeError> {
    let mut report = ValidationReport::new();
    let mut seen_ids: BTreeSet<&str> = BTreeSet::new();

    for incident in &state.incidents {
        let label = label(incident, &["incident_id"]);
        let verdict = validate_incident_integrity(incident)?;
        if !verdict.is_valid() {
            report.violation(format!("Incident {label}: {}", verdict.reason));
        }
        if let Some(id) = incident.get("incident_id").and_then(JsonValue::as_str)
            && !seen_ids.insert(id)
        {
            report.violation(format!("Incident {label}: duplicate incident_id"));
        }
    }

    for entity in &state.entities {
        let label = label(entity, &["entity_id"]);
        for verdict in [
            validate_entity_is_derived(entity)?,
            validate_entity_membership(entity)?,
        ] {
            if !verdict.is_valid() {
                report.violation(format!("Entity {label}: {}", verdict.reason));
            }
        }
        for incident_id in referenced_incident_ids(entity) {
            if !seen_ids.contains(incident_id) {
                report.warning(format!(
                    "Entity {label}: incident {incident_id} is not in the audited ledger"
                ));
            }
        }
    }

    for meaning in &state.meanings {
        let label = label(meaning, &["term"]);
        let verdict = validate_meaning_is_descriptive(meaning)?;
        if !verdict.is_valid() {
            report.violation(format!("Meaning {label}: {}", verdict.reason));
        }
    }

    for snapshot in &state.snapshots {
        let label = label(snapshot, &["entity_id", "system", "entity1", "start_date"]);
        let verdict = validate_snapshot_is_view(snapshot)?;
        if !verdict.is_valid() {
            report.violation(format!("Snapshot {label}: {}", verdict.reason));
        }
    }

    info!(
        incidents = state.incidents.len(),
        entities = state.entities.len(),
        meanings = state.meanings.len(),
        snapshots = state.snapshots.len(),
        violations = report.violations.len(),
        warnings = report.warnings.len(),
        "system state validated"
    );

    Ok(report)
}

/// The first string field among `keys`, for labelling report lines.
fn label<'a>(record: &'a JsonValue, keys: &[&str]) -> &'a str {
    keys.iter()
        .find_map(|key| record.get(key).and_then(JsonValue::as_str))
        .unwrap_or("<unknown>")
}

fn referenced_incident_ids(entity: &JsonValue) -> impl Iterator<Item = &str> {
    entity
        .get("incidents")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
        .filter_map(|incident| incident.get("incident_id").and_then(JsonValue::as_str))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn incident(id: &str, participants: &[&str], fact: &str) -> JsonValue {
        json!({
            "incident_id": id,
            "date": "2024-01-01",
            "system": "chat",
            "participants": participants,
            "facts": [fact],
        })
    }

    #[test]
    fn empty_state_is_valid() {
        let report = validate_system_state(&SystemState::default()).unwrap_or_default();
        assert!(report.valid);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn clean_state_is_valid() {
        let first = incident("i1", &["alice"], "Alice logged in");
        let state = SystemState {
            incidents: vec![first.clone()],
            entities: vec![json!({"entity_id": "alice", "incidents": [first]})],
            meanings: vec![json!({"term": "login", "definition": "Start of a session"})],
            snapshots: vec![json!({
                "entity_id": "alice",
                "metadata": {"note": "This snapshot is a view, not authoritative."},
            })],
        };
        let report = validate_system_state(&state).unwrap_or_default();
        assert!(report.valid, "{:?}", report.violations);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn all_violations_are_collected() {
        let state = SystemState {
            incidents: vec![
                incident("i1", &["alice"], "Alice will be promoted"),
                incident("i1", &["bob"], "Bob logged in"),
            ],
            entities: vec![json!({"entity_id": "alice", "incidents": [], "rank": 1})],
            meanings: vec![json!({"term": "fate", "definition": "What is meant to be"})],
            snapshots: vec![json!({"entity_id": "alice", "metadata": {}})],
        };
        let report = validate_system_state(&state).unwrap_or_default();
        assert!(!report.valid);
        assert_eq!(report.violations.len(), 5, "{:?}", report.violations);
        assert!(report.violations[0].starts_with("Incident i1: Incident contains invalid fact"));
        assert_eq!(report.violations[1], "Incident i1: duplicate incident_id");
        assert_eq!(
            report.violations[2],
            "Entity alice: Entity has extra keys (not derived): [rank]"
        );
        assert!(report.violations[3].starts_with("Meaning fate: "));
        assert_eq!(
            report.violations[4],
            "Snapshot alice: Snapshot is not marked as a view"
        );
    }

    #[test]
    fn entity_referencing_unknown_incident_warns() {
        let stray = incident("i9", &["alice"], "Alice logged out");
        let state = SystemState {
            entities: vec![json!({"entity_id": "alice", "incidents": [stray]})],
            ..SystemState::default()
        };
        let report = validate_system_state(&state).unwrap_or_default();
        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec!["Entity alice: incident i9 is not in the audited ledger".to_owned()]
        );
    }

    #[test]
    fn malformed_record_is_an_error() {
        let state = SystemState {
            incidents: vec![json!("not a mapping")],
            ..SystemState::default()
        };
        assert_eq!(
            validate_system_state(&state).err(),
            Some(ShapeError::NotAMapping { record: "incident" })
        );
    }

    #[test]
    fn state_deserializes_with_missing_collections() {
        let state: SystemState =
            serde_json::from_str(r#"{"incidents": []}"#).unwrap_or_default();
        assert!(state.entities.is_empty());
        assert!(state.snapshots.is_empty());
    }
}
