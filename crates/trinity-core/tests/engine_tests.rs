//! End-to-end tests for the engine facade.
//!
//! Each test drives the public API of the workspace crates through an
//! [`Engine`], the way an embedding application would: record incidents,
//! derive entities, attach meanings, generate snapshots and audit.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use trinity_core::{Engine, EngineConfig, EngineError};
use trinity_ledger::{IdentityError, Incident, IncidentError};
use trinity_meaning::MeaningEntry;
use trinity_types::{IncidentType, MeaningSource};
use trinity_validator::{
    SystemState, validate_append_only_operation, validate_fact, validate_system_state,
};

fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).with_clock(fixed_clock)
}

fn incident(id: &str, date: &str, system: &str, participants: &[&str]) -> Incident {
    Incident::builder(id, date, system)
        .incident_type(IncidentType::Communication)
        .participants(participants.iter().copied())
        .fact("A message was exchanged")
        .build()
        .unwrap()
}

#[test]
fn appends_preserve_count_and_order() {
    let mut engine = engine();
    for (n, date) in ["2024-01-01", "2024-01-02", "2024-01-03"].iter().enumerate() {
        engine
            .record(incident(&format!("i{n}"), date, "chat", &["alice"]))
            .unwrap();
    }

    let all = engine.log().get_all();
    assert_eq!(all.len(), 3);
    let ids: Vec<&str> = all.iter().map(|i| i.incident_id().as_str()).collect();
    assert_eq!(ids, ["i0", "i1", "i2"]);
}

#[test]
fn mutating_a_query_result_does_not_touch_the_log() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice"])).unwrap();

    let mut copy = engine.log().get_all();
    copy.clear();

    assert_eq!(engine.log().get_all().len(), 1);
}

#[test]
fn invalid_incidents_fail_construction() {
    let no_facts = Incident::builder("i1", "2024-01-01", "chat")
        .participant("alice")
        .build();
    assert!(matches!(no_facts, Err(IncidentError::EmptyField("facts"))));

    let no_participants = Incident::builder("i1", "2024-01-01", "chat")
        .fact("A door opened")
        .build();
    assert!(matches!(
        no_participants,
        Err(IncidentError::EmptyField("participants"))
    ));

    let predictive = Incident::builder("i1", "2024-01-01", "chat")
        .participant("alice")
        .fact("This will happen tomorrow")
        .build();
    assert!(matches!(
        predictive,
        Err(IncidentError::ForbiddenLanguage { .. })
    ));

    let mut engine = engine();
    let result = engine.record_value(json!({
        "incident_id": "i2",
        "date": "2024-01-01",
        "system": "chat",
        "participants": ["alice"],
        "facts": ["Alice should do the dishes"],
    }));
    assert!(matches!(result, Err(EngineError::Incident { .. })));
    assert!(engine.log().is_empty());
}

#[test]
fn entity_rejects_incident_it_is_not_part_of() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice"])).unwrap();
    let stranger = engine
        .record(incident("i2", "2024-01-02", "chat", &["bob"]))
        .unwrap();

    let mut alice = engine.entity("alice").unwrap();
    let result = alice.add_incident(stranger);
    assert!(matches!(
        &result,
        Err(IdentityError::NotAParticipant { incident_id, .. }) if incident_id.as_str() == "i2"
    ));
    assert_eq!(alice.get_incident_count(), 1);
}

#[test]
fn first_and_last_incident_follow_dates_not_insertion() {
    let mut engine = engine();
    engine.record(incident("jan", "2024-01-01", "chat", &["alice"])).unwrap();
    engine.record(incident("mar", "2024-03-01", "chat", &["alice"])).unwrap();
    engine.record(incident("feb", "2024-02-01", "chat", &["alice"])).unwrap();

    let alice = engine.entity("alice").unwrap();
    assert_eq!(alice.get_first_incident().unwrap().date(), "2024-01-01");
    assert_eq!(alice.get_last_incident().unwrap().date(), "2024-03-01");
}

#[test]
fn deleting_a_snapshot_leaves_the_log_unchanged() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice", "bob"])).unwrap();
    engine.record(incident("i2", "2024-01-02", "mail", &["alice"])).unwrap();

    let before = engine.log().get_count();
    let snapshot = engine.identity_snapshot("alice").unwrap();
    assert_eq!(snapshot.incident_count, 2);
    assert_eq!(engine.snapshots().cached_count(), 1);

    assert!(engine.delete_snapshot("alice").is_some());
    assert_eq!(engine.snapshots().cached_count(), 0);
    assert_eq!(engine.log().get_count(), before);
}

#[test]
fn recording_refreshes_cached_identity_snapshots() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice"])).unwrap();
    engine.record(incident("i0", "2024-01-01", "chat", &["bob"])).unwrap();
    assert_eq!(engine.identity_snapshot("alice").unwrap().incident_count, 1);
    assert_eq!(engine.identity_snapshot("bob").unwrap().incident_count, 1);

    engine.record(incident("i2", "2024-02-01", "chat", &["alice"])).unwrap();

    assert_eq!(engine.snapshots().cached_count(), 1);
    let refreshed = engine.identity_snapshot("alice").unwrap();
    assert_eq!(refreshed.incident_count, 2);
    assert_eq!(refreshed.last_seen.as_deref(), Some("2024-02-01"));

    let report = engine.audit().unwrap();
    assert!(report.valid, "{:?}", report.violations);
}

#[test]
fn regenerated_snapshot_matches_the_deleted_one() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice", "bob"])).unwrap();

    let first = engine.identity_snapshot("alice").unwrap();
    assert_eq!(engine.regenerate_all_snapshots(), 1);
    let second = engine.identity_snapshot("alice").unwrap();
    assert!(first.same_view_as(&second));
}

#[test]
fn incident_survives_a_value_round_trip() {
    let original = Incident::builder("i1", "2024-01-01", "chat")
        .incident_type(IncidentType::Interaction)
        .participants(["alice", "bob"])
        .fact("Alice paid Bob")
        .context_entry("amount", 12_i64)
        .summary("payment")
        .outcome("settled")
        .build()
        .unwrap();

    let restored = Incident::from_value(original.to_value()).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn fact_validation_cites_the_pattern() {
    assert!(validate_fact("The meeting occurred at 3pm").is_valid());

    let verdict = validate_fact("This will happen tomorrow");
    assert!(!verdict.is_valid());
    assert!(verdict.reason.contains("will"));
}

#[test]
fn only_appending_operations_are_allowed() {
    assert!(!validate_append_only_operation("delete_incident").is_valid());
    assert!(validate_append_only_operation("append_incident").is_valid());
}

#[test]
fn system_snapshot_uses_ledger_order_for_first_seen() {
    let mut engine = engine();
    engine.record(incident("late", "2024-01-02", "x", &["A"])).unwrap();
    engine.record(incident("early", "2024-01-01", "x", &["A"])).unwrap();

    let snapshot = engine.system_snapshot("x");
    let presence = &snapshot.entities["A"];
    assert_eq!(presence.first_seen, "2024-01-02");
    assert_eq!(presence.last_seen, "2024-01-01");
    assert_eq!(presence.incident_count, 2);
    assert_eq!(snapshot.incident_count, 2);
}

#[test]
fn relationship_and_temporal_snapshots_read_the_log() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice", "bob"])).unwrap();
    engine.record(incident("i2", "2024-02-01", "chat", &["alice"])).unwrap();
    engine.record(incident("i3", "2024-03-01", "mail", &["bob", "alice"])).unwrap();

    let shared = engine.relationship_snapshot("alice", "bob");
    assert_eq!(shared.interaction_count, 2);

    let window = engine.temporal_snapshot("2024-01-15", "2024-03-01");
    assert_eq!(window.incident_count, 2);
    assert_eq!(window.systems_involved, ["chat", "mail"]);
}

#[test]
fn meanings_are_layered_by_source() {
    let mut engine = engine();
    let technical =
        MeaningEntry::new("ping", MeaningSource::TechnicalDefinition, "A reachability probe")
            .unwrap();
    let cultural = MeaningEntry::new("ping", MeaningSource::CulturalUsage, "A short nudge").unwrap();

    assert!(engine.add_meaning(technical).unwrap().is_none());
    assert!(engine.add_meaning(cultural).unwrap().is_none());

    let meanings = engine.overlay().get_meanings_for_term("ping");
    assert_eq!(meanings.len(), 2);
    assert_eq!(
        meanings[&MeaningSource::CulturalUsage].definition(),
        "A short nudge"
    );
}

#[test]
fn populated_engine_passes_its_own_audit() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice", "bob"])).unwrap();
    engine.record(incident("i2", "2024-01-02", "mail", &["bob"])).unwrap();
    engine
        .add_meaning(
            MeaningEntry::new("mail", MeaningSource::TechnicalDefinition, "Electronic mail")
                .unwrap(),
        )
        .unwrap();
    engine.identity_snapshot("bob").unwrap();

    let state = engine.system_state().unwrap();
    assert_eq!(state.snapshots.len(), 1);

    let report = engine.audit().unwrap();
    assert!(report.valid, "{:?}", report.violations);
    assert!(report.violations.is_empty());
}

#[test]
fn serialized_state_survives_the_wire() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice"])).unwrap();
    engine.identity_snapshot("alice").unwrap();

    let wire = serde_json::to_string(&engine.system_state().unwrap()).unwrap();
    let state: SystemState = serde_json::from_str(&wire).unwrap();
    let report = validate_system_state(&state).unwrap();
    assert!(report.valid, "{:?}", report.violations);
}

#[test]
fn tampered_state_fails_the_audit() {
    let mut engine = engine();
    engine.record(incident("i1", "2024-01-01", "chat", &["alice"])).unwrap();
    let mut state = engine.system_state().unwrap();
    state.incidents.push(state.incidents[0].clone());
    state.snapshots.push(json!({
        "entity_id": "alice",
        "metadata": { "note": "authoritative record" },
    }));

    let report = validate_system_state(&state).unwrap();
    assert!(!report.valid);
    assert_eq!(report.violations.len(), 2);
}
