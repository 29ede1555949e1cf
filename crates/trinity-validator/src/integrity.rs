//! Structural integrity checks over serialized records.
//!
//! These functions take the dict-shaped JSON records produced by the
//! ledger, meaning, and snapshot crates (or by any external tool) and check
//! required fields, closed field sets, and delegate free text into the
//! content rules. A record that is not even a mapping, or whose fields have
//! the wrong JSON type, is a [`ShapeError`]; everything else is a
//! [`Verdict`].

use serde_json::{Map, Value as JsonValue};

use crate::content::{validate_definition, validate_fact};
use crate::{ShapeError, Verdict};

/// Fields every serialized incident must carry.
pub const INCIDENT_REQUIRED_FIELDS: [&str; 5] =
    ["incident_id", "date", "system", "participants", "facts"];

/// The only fields a serialized entity view may expose.
pub const ENTITY_VIEW_FIELDS: [&str; 2] = ["entity_id", "incidents"];

/// Validate a serialized incident: required fields present and non-empty,
/// and every fact free of forbidden language.
pub fn validate_incident_integrity(incident: &JsonValue) -> Result<Verdict, ShapeError> {
    let record = as_mapping(incident, "incident")?;

    for field in INCIDENT_REQUIRED_FIELDS {
        match record.get(field) {
            None => {
                return Ok(Verdict::fail(format!(
                    "Incident missing required field: {field}"
                )));
            }
            Some(value) if is_empty(value) => {
                return Ok(Verdict::fail(format!(
                    "Incident has empty required field: {field}"
                )));
            }
            Some(_) => {}
        }
    }

    for fact in string_list(record, "incident", "facts")? {
        let verdict = validate_fact(fact);
        if !verdict.is_valid() {
            return Ok(Verdict::fail(format!(
                "Incident contains invalid fact: {}",
                verdict.reason
            )));
        }
    }

    Ok(Verdict::pass())
}

/// Validate that a serialized entity exposes nothing but its identifier
/// and its incident list.
pub fn validate_entity_is_derived(entity: &JsonValue) -> Result<Verdict, ShapeError> {
    let record = as_mapping(entity, "entity")?;

    let extra_keys: Vec<&str> = record
        .keys()
        .map(String::as_str)
        .filter(|key| !ENTITY_VIEW_FIELDS.contains(key))
        .collect();

    if extra_keys.is_empty() {
        Ok(Verdict::pass())
    } else {
        Ok(Verdict::fail(format!(
            "Entity has extra keys (not derived): [{}]",
            extra_keys.join(", ")
        )))
    }
}

/// Validate that every incident in a serialized entity view lists the
/// entity among its participants.
pub fn validate_entity_membership(entity: &JsonValue) -> Result<Verdict, ShapeError> {
    let record = as_mapping(entity, "entity")?;

    let Some(entity_id) = optional_str(record, "entity", "entity_id")? else {
        return Ok(Verdict::pass());
    };
    let Some(incidents) = record.get("incidents") else {
        return Ok(Verdict::pass());
    };
    let incidents = incidents.as_array().ok_or(ShapeError::UnexpectedType {
        record: "entity",
        field: "incidents",
        expected: "a list of incident mappings",
    })?;

    for incident in incidents {
        let incident = as_mapping(incident, "entity incident")?;
        let involved = match incident.get("participants") {
            None => false,
            Some(_) => string_list(incident, "entity incident", "participants")?
                .any(|participant| participant == entity_id),
        };
        if !involved {
            let incident_id = incident
                .get("incident_id")
                .and_then(JsonValue::as_str)
                .unwrap_or("<unknown>");
            return Ok(Verdict::fail(format!(
                "Incident {incident_id} does not list entity {entity_id} as a participant"
            )));
        }
    }

    Ok(Verdict::pass())
}

/// Validate that a serialized meaning entry's definition is descriptive.
///
/// A missing definition is treated as empty text.
pub fn validate_meaning_is_descriptive(meaning: &JsonValue) -> Result<Verdict, ShapeError> {
    let record = as_mapping(meaning, "meaning")?;
    let definition = optional_str(record, "meaning", "definition")?.unwrap_or("");

    let verdict = validate_definition(definition);
    if verdict.is_valid() {
        Ok(verdict)
    } else {
        Ok(Verdict::fail(format!(
            "Meaning contains prescriptive language: {}",
            verdict.reason
        )))
    }
}

/// Validate that a serialized snapshot carries the non-authoritative view
/// disclaimer in `metadata.note`.
pub fn validate_snapshot_is_view(snapshot: &JsonValue) -> Result<Verdict, ShapeError> {
    let record = as_mapping(snapshot, "snapshot")?;

    let note = match record.get("metadata") {
        None => "",
        Some(metadata) => {
            let metadata = as_mapping(metadata, "snapshot metadata")?;
            optional_str(metadata, "snapshot metadata", "note")?.unwrap_or("")
        }
    };

    if is_view_disclaimer(note) {
        Ok(Verdict::pass())
    } else {
        Ok(Verdict::fail("Snapshot is not marked as a view"))
    }
}

/// Whether a note states that a record is a view and not authoritative.
pub fn is_view_disclaimer(note: &str) -> bool {
    let lower = note.to_lowercase();
    lower.contains("view") && lower.contains("not authoritative")
}

// ---------------------------------------------------------------------------
// Shape helpers
// ---------------------------------------------------------------------------

fn as_mapping<'a>(
    value: &'a JsonValue,
    record: &'static str,
) -> Result<&'a Map<String, JsonValue>, ShapeError> {
    value.as_object().ok_or(ShapeError::NotAMapping { record })
}

fn optional_str<'a>(
    map: &'a Map<String, JsonValue>,
    record: &'static str,
    field: &'static str,
) -> Result<Option<&'a str>, ShapeError> {
    match map.get(field) {
        None => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or(ShapeError::UnexpectedType {
            record,
            field,
            expected: "a string",
        }),
    }
}

fn string_list<'a>(
    map: &'a Map<String, JsonValue>,
    record: &'static str,
    field: &'static str,
) -> Result<impl Iterator<Item = &'a str>, ShapeError> {
    let unexpected = ShapeError::UnexpectedType {
        record,
        field,
        expected: "a list of strings",
    };
    let items = map
        .get(field)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| unexpected.clone())?;
    let strings: Vec<&str> = items
        .iter()
        .map(|item| item.as_str().ok_or_else(|| unexpected.clone()))
        .collect::<Result<_, _>>()?;
    Ok(strings.into_iter())
}

fn is_empty(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn clean_incident() -> JsonValue {
        json!({
            "incident_id": "inc-1",
            "date": "2024-01-01",
            "system": "chat",
            "participants": ["alice", "bob"],
            "facts": ["Alice greeted Bob"],
        })
    }

    #[test]
    fn clean_incident_passes() {
        let verdict = validate_incident_integrity(&clean_incident());
        assert_eq!(verdict.ok(), Some(Verdict::pass()));
    }

    #[test]
    fn missing_field_reported() {
        let mut incident = clean_incident();
        if let Some(map) = incident.as_object_mut() {
            map.remove("system");
        }
        let verdict = validate_incident_integrity(&incident).unwrap_or_else(|_| Verdict::pass());
        assert_eq!(verdict.reason, "Incident missing required field: system");
    }

    #[test]
    fn empty_participants_reported() {
        let mut incident = clean_incident();
        incident["participants"] = json!([]);
        let verdict = validate_incident_integrity(&incident).unwrap_or_else(|_| Verdict::pass());
        assert_eq!(verdict.reason, "Incident has empty required field: participants");
    }

    #[test]
    fn forbidden_fact_reported() {
        let mut incident = clean_incident();
        incident["facts"] = json!(["Alice greeted Bob", "Bob will be late"]);
        let verdict = validate_incident_integrity(&incident).unwrap_or_else(|_| Verdict::pass());
        assert!(!verdict.is_valid());
        assert!(verdict.reason.starts_with("Incident contains invalid fact: Fact contains"));
    }

    #[test]
    fn non_string_fact_is_shape_error() {
        let mut incident = clean_incident();
        incident["facts"] = json!(["ok", 7]);
        assert!(matches!(
            validate_incident_integrity(&incident),
            Err(ShapeError::UnexpectedType { field: "facts", .. })
        ));
    }

    #[test]
    fn entity_view_with_only_allowed_keys_passes() {
        let entity = json!({"entity_id": "alice", "incidents": []});
        assert_eq!(validate_entity_is_derived(&entity).ok(), Some(Verdict::pass()));
    }

    #[test]
    fn entity_with_extra_keys_fails() {
        let entity = json!({"entity_id": "alice", "incidents": [], "mood": "calm", "age": 3});
        let verdict = validate_entity_is_derived(&entity).unwrap_or_else(|_| Verdict::pass());
        assert_eq!(verdict.reason, "Entity has extra keys (not derived): [age, mood]");
    }

    #[test]
    fn entity_membership_checks_participants() {
        let entity = json!({
            "entity_id": "carol",
            "incidents": [clean_incident()],
        });
        let verdict = validate_entity_membership(&entity).unwrap_or_else(|_| Verdict::pass());
        assert_eq!(
            verdict.reason,
            "Incident inc-1 does not list entity carol as a participant"
        );

        let member = json!({"entity_id": "bob", "incidents": [clean_incident()]});
        assert_eq!(validate_entity_membership(&member).ok(), Some(Verdict::pass()));
    }

    #[test]
    fn meaning_definition_checked() {
        let clean = json!({"term": "river", "definition": "A flowing body of water"});
        assert_eq!(validate_meaning_is_descriptive(&clean).ok(), Some(Verdict::pass()));

        let prescriptive = json!({"term": "river", "definition": "You should be near one"});
        let verdict =
            validate_meaning_is_descriptive(&prescriptive).unwrap_or_else(|_| Verdict::pass());
        assert!(verdict.reason.starts_with("Meaning contains prescriptive language"));
    }

    #[test]
    fn snapshot_requires_view_note() {
        let marked = json!({
            "entity_id": "alice",
            "metadata": {"note": "This snapshot is a view, not authoritative."},
        });
        assert_eq!(validate_snapshot_is_view(&marked).ok(), Some(Verdict::pass()));

        let unmarked = json!({"entity_id": "alice"});
        let verdict = validate_snapshot_is_view(&unmarked).unwrap_or_else(|_| Verdict::pass());
        assert_eq!(verdict.reason, "Snapshot is not marked as a view");

        let wrong_shape = json!({"metadata": "note"});
        assert!(validate_snapshot_is_view(&wrong_shape).is_err());
    }
}
