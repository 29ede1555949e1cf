//! Append-only enforcement: operation names and record immutability.

use serde_json::Value as JsonValue;

use crate::patterns::MUTATION_RULES;
use crate::{ShapeError, Verdict};

/// Validate that an operation name describes an append-only operation.
///
/// Any mutating verb appearing anywhere in the name (case-insensitive)
/// fails the check, so `bulk_delete` and `ClearCache` are both rejected.
pub fn validate_append_only_operation(operation: &str) -> Verdict {
    match MUTATION_RULES.first_match(operation) {
        Some(rule) => Verdict::fail(format!(
            "Operation violates append-only constraint: {}",
            rule.pattern
        )),
        None => Verdict::pass(),
    }
}

/// Validate that a serialized incident is unchanged.
///
/// Both records must be mappings. On mismatch the reason lists every key
/// whose value differs, including keys present only in `modified`.
pub fn validate_incident_immutability(
    incident_id: &str,
    original: &JsonValue,
    modified: &JsonValue,
) -> Result<Verdict, ShapeError> {
    let original_map = original.as_object().ok_or(ShapeError::NotAMapping {
        record: "original incident",
    })?;
    let modified_map = modified.as_object().ok_or(ShapeError::NotAMapping {
        record: "modified incident",
    })?;

    if original_map == modified_map {
        return Ok(Verdict::pass());
    }

    let mut changed_keys: Vec<&str> = original_map
        .iter()
        .filter(|&(key, value)| modified_map.get(key) != Some(value))
        .map(|(key, _)| key.as_str())
        .collect();
    changed_keys.extend(
        modified_map
            .keys()
            .filter(|key| !original_map.contains_key(key.as_str()))
            .map(String::as_str),
    );

    Ok(Verdict::fail(format!(
        "Incident {incident_id} was modified. Changed keys: [{}]",
        changed_keys.join(", ")
    )))
}
