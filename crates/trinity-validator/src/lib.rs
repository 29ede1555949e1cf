//! Content, append-only, and structural rule checks for the Trinity engine.
//!
//! Every guarantee the engine makes about its records ("facts are
//! observable", "the store is append-only", "entities are derived",
//! "snapshots are views") is checked here. The validator is independent of
//! the record types: it operates on free text and on the `serde_json`
//! form of records, so an auditor can run it over any serialized state.
//!
//! # Architecture
//!
//! - [`patterns`] -- The pattern tables and the single [`RuleSet::first_match`]
//!   evaluator every textual rule goes through.
//! - [`content`] -- Fact, definition, agency, prediction, feedback and
//!   control checks over text.
//! - [`append_only`] -- Operation-name and record-immutability checks.
//! - [`integrity`] -- Structural checks over serialized incidents,
//!   entities, meanings, and snapshots.
//! - [`system`] -- [`validate_system_state`], aggregating every check into a
//!   [`ValidationReport`].
//!
//! # Verdicts and errors
//!
//! A rule that fails is an ordinary outcome and is returned as a
//! [`Verdict`] with `valid == false` and a human-readable reason. Only a
//! record that cannot be inspected at all (not a mapping, or a field of
//! the wrong JSON type) is a [`ShapeError`].
//!
//! # Usage
//!
//! ```
//! use trinity_validator::content::validate_fact;
//!
//! assert!(validate_fact("Alice logged in at 09:00").is_valid());
//! assert!(!validate_fact("Alice will be promoted").is_valid());
//! ```

pub mod append_only;
pub mod content;
pub mod integrity;
pub mod patterns;
pub mod system;

// Re-export primary types at crate root.
pub use append_only::{validate_append_only_operation, validate_incident_immutability};
pub use content::{
    forbidden_language, validate_definition, validate_fact, validate_no_agency,
    validate_no_control, validate_no_feedback_loops, validate_no_prediction,
};
pub use integrity::{
    is_view_disclaimer, validate_entity_is_derived, validate_entity_membership,
    validate_incident_integrity, validate_meaning_is_descriptive, validate_snapshot_is_view,
};
pub use patterns::{RuleCategory, RuleMatch, RuleSet};
pub use system::{SystemState, ValidationReport, validate_system_state};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// The outcome of a single rule check.
///
/// `reason` is empty when the check passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the check passed.
    pub valid: bool,
    /// Why the check failed, or empty on success.
    pub reason: String,
}

impl Verdict {
    /// A passing verdict.
    pub const fn pass() -> Self {
        Self {
            valid: true,
            reason: String::new(),
        }
    }

    /// A failing verdict with the given reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }

    /// Whether the check passed.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Split into the `(valid, reason)` pair.
    pub fn into_pair(self) -> (bool, String) {
        (self.valid, self.reason)
    }
}

impl From<Verdict> for (bool, String) {
    fn from(verdict: Verdict) -> Self {
        verdict.into_pair()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A serialized record could not be inspected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// The record is not a JSON object.
    #[error("{record} is not a mapping")]
    NotAMapping {
        /// Which record was being inspected.
        record: &'static str,
    },

    /// A field has the wrong JSON type.
    #[error("{record} field `{field}` is not {expected}")]
    UnexpectedType {
        /// Which record was being inspected.
        record: &'static str,
        /// The offending field.
        field: &'static str,
        /// A description of the expected type.
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_pair_conversion() {
        let pair: (bool, String) = Verdict::fail("nope").into();
        assert_eq!(pair, (false, "nope".to_owned()));
        assert_eq!(Verdict::pass().into_pair(), (true, String::new()));
    }

    #[test]
    fn shape_error_messages() {
        let err = ShapeError::UnexpectedType {
            record: "incident",
            field: "facts",
            expected: "a list of strings",
        };
        assert_eq!(
            err.to_string(),
            "incident field `facts` is not a list of strings"
        );
        assert_eq!(
            ShapeError::NotAMapping { record: "entity" }.to_string(),
            "entity is not a mapping"
        );
    }
}
