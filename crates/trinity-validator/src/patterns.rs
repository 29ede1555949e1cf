//! Pattern tables and the single rule-evaluation function.
//!
//! Every textual rule in the engine is a `(pattern, category)` pair in one
//! of the static tables below. Tables are compiled once into a [`RuleSet`]
//! and evaluated with [`RuleSet::first_match`]: case-insensitive, in table
//! order, stopping at the first pattern that matches.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::error;

// ---------------------------------------------------------------------------
// Categories and matches
// ---------------------------------------------------------------------------

/// Why a pattern is forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Modal or prescriptive language ("should be", "supposed to").
    Prescriptive,
    /// Language about future outcomes ("will happen", "forecast").
    Predictive,
    /// Directive verbs ("optimize", "recommend").
    Directive,
    /// Language implying the engine acts on the world.
    Agency,
    /// Outputs that feed back into behavior ("adjust", "react to").
    Feedback,
    /// Capabilities that exert control ("decide", "execute action").
    Control,
    /// Operation names that mutate stored records.
    Mutation,
}

/// The rule that matched a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    /// The pattern as written in its table.
    pub pattern: &'static str,
    /// The category of the pattern.
    pub category: RuleCategory,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Forbidden language in facts and meaning definitions.
///
/// The specific modal forms come before the bare modal verbs so the
/// reported pattern names the continuation when there is one.
pub const FORBIDDEN_CONTENT: &[(&str, RuleCategory)] = &[
    (r"\bwill\s+(do|be|happen|occur)", RuleCategory::Predictive),
    (r"\bshould\s+(do|be|happen|occur)", RuleCategory::Prescriptive),
    (r"\bmust\s+(do|be|happen|occur)", RuleCategory::Prescriptive),
    (r"\bpredict", RuleCategory::Predictive),
    (r"\bforecast", RuleCategory::Predictive),
    (r"\boptimize", RuleCategory::Directive),
    (r"\brecommend", RuleCategory::Directive),
    (r"\bshould\s+", RuleCategory::Prescriptive),
    (r"\bwill\s+", RuleCategory::Predictive),
    (r"\bdestiny", RuleCategory::Predictive),
    (r"\bfate", RuleCategory::Predictive),
    (r"\bmeant\s+to", RuleCategory::Prescriptive),
    (r"\bsupposed\s+to", RuleCategory::Prescriptive),
];

/// Language implying that a component acts.
pub const AGENCY: &[(&str, RuleCategory)] = &[
    (r"\bshould\s+", RuleCategory::Agency),
    (r"\bmust\s+", RuleCategory::Agency),
    (r"\bwill\s+", RuleCategory::Agency),
    (r"\bcommand", RuleCategory::Agency),
    (r"\bcontrol", RuleCategory::Agency),
    (r"\binfluence", RuleCategory::Agency),
    (r"\boptimize", RuleCategory::Agency),
    (r"\bmanipulate", RuleCategory::Agency),
];

/// Language that makes predictions.
pub const PREDICTION: &[(&str, RuleCategory)] = &[
    (r"\bwill\s+", RuleCategory::Predictive),
    (r"\bpredict", RuleCategory::Predictive),
    (r"\bforecast", RuleCategory::Predictive),
    (r"\bdestiny", RuleCategory::Predictive),
    (r"\bfate", RuleCategory::Predictive),
    (r"\bfuture", RuleCategory::Predictive),
];

/// Component outputs that indicate a feedback loop. Matched as substrings.
pub const FEEDBACK: &[(&str, RuleCategory)] = &[
    ("adjust", RuleCategory::Feedback),
    ("optimize", RuleCategory::Feedback),
    ("improve", RuleCategory::Feedback),
    ("refine", RuleCategory::Feedback),
    ("enhance", RuleCategory::Feedback),
    ("modify based on", RuleCategory::Feedback),
    ("respond to", RuleCategory::Feedback),
    ("react to", RuleCategory::Feedback),
];

/// Component capabilities that exert control. Matched as substrings.
pub const CONTROL: &[(&str, RuleCategory)] = &[
    ("command", RuleCategory::Control),
    ("control", RuleCategory::Control),
    ("influence", RuleCategory::Control),
    ("manipulate", RuleCategory::Control),
    ("decide", RuleCategory::Control),
    ("determine", RuleCategory::Control),
    ("choose", RuleCategory::Control),
    ("select", RuleCategory::Control),
    ("execute action", RuleCategory::Control),
];

/// Verbs that make an operation name a mutation. Matched as substrings.
pub const MUTATING_VERBS: &[(&str, RuleCategory)] = &[
    ("delete", RuleCategory::Mutation),
    ("remove", RuleCategory::Mutation),
    ("update", RuleCategory::Mutation),
    ("modify", RuleCategory::Mutation),
    ("edit", RuleCategory::Mutation),
    ("overwrite", RuleCategory::Mutation),
    ("replace", RuleCategory::Mutation),
    ("truncate", RuleCategory::Mutation),
    ("clear", RuleCategory::Mutation),
    ("reset", RuleCategory::Mutation),
];

/// Compiled [`FORBIDDEN_CONTENT`].
pub static CONTENT_RULES: Lazy<RuleSet> =
    Lazy::new(|| RuleSet::compile("content", FORBIDDEN_CONTENT));

/// Compiled [`AGENCY`].
pub static AGENCY_RULES: Lazy<RuleSet> = Lazy::new(|| RuleSet::compile("agency", AGENCY));

/// Compiled [`PREDICTION`].
pub static PREDICTION_RULES: Lazy<RuleSet> =
    Lazy::new(|| RuleSet::compile("prediction", PREDICTION));

/// Compiled [`FEEDBACK`].
pub static FEEDBACK_RULES: Lazy<RuleSet> = Lazy::new(|| RuleSet::compile("feedback", FEEDBACK));

/// Compiled [`CONTROL`].
pub static CONTROL_RULES: Lazy<RuleSet> = Lazy::new(|| RuleSet::compile("control", CONTROL));

/// Compiled [`MUTATING_VERBS`].
pub static MUTATION_RULES: Lazy<RuleSet> =
    Lazy::new(|| RuleSet::compile("mutation", MUTATING_VERBS));

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// A compiled, ordered table of rules.
#[derive(Debug)]
pub struct RuleSet {
    name: &'static str,
    rules: Vec<(Regex, RuleMatch)>,
}

impl RuleSet {
    /// Compile a pattern table. Matching is case-insensitive.
    ///
    /// The tables are compile-time constants, so a pattern that fails to
    /// compile is a programming error; it is logged and left out rather
    /// than aborting the process.
    pub fn compile(name: &'static str, table: &[(&'static str, RuleCategory)]) -> Self {
        let rules = table
            .iter()
            .filter_map(|&(pattern, category)| {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(regex) => Some((regex, RuleMatch { pattern, category })),
                    Err(e) => {
                        error!(rule_set = name, pattern, error = %e, "rule failed to compile");
                        None
                    }
                }
            })
            .collect();
        Self { name, rules }
    }

    /// Return the first rule, in table order, that matches `text`.
    pub fn first_match(&self, text: &str) -> Option<RuleMatch> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(text))
            .map(|(_, rule)| *rule)
    }

    /// The name of this rule set.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_compiles_completely() {
        assert_eq!(CONTENT_RULES.len(), FORBIDDEN_CONTENT.len());
        assert_eq!(AGENCY_RULES.len(), AGENCY.len());
        assert_eq!(PREDICTION_RULES.len(), PREDICTION.len());
        assert_eq!(FEEDBACK_RULES.len(), FEEDBACK.len());
        assert_eq!(CONTROL_RULES.len(), CONTROL.len());
        assert_eq!(MUTATION_RULES.len(), MUTATING_VERBS.len());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let hit = CONTENT_RULES.first_match("It WILL BE done");
        assert_eq!(hit.map(|m| m.pattern), Some(r"\bwill\s+(do|be|happen|occur)"));
    }

    #[test]
    fn first_match_follows_table_order() {
        // Both `\bshould\s+(do|be...)` and `\bshould\s+` match; the
        // specific form is listed first.
        let hit = CONTENT_RULES.first_match("it should be fine");
        assert_eq!(hit.map(|m| m.pattern), Some(r"\bshould\s+(do|be|happen|occur)"));
        assert_eq!(hit.map(|m| m.category), Some(RuleCategory::Prescriptive));

        let bare = CONTENT_RULES.first_match("they should leave");
        assert_eq!(bare.map(|m| m.pattern), Some(r"\bshould\s+"));
    }

    #[test]
    fn word_boundary_prevents_partial_matches() {
        assert!(CONTENT_RULES.first_match("Attendance was unpredictable").is_none());
        assert!(CONTENT_RULES.first_match("The willow tree fell").is_none());
    }

    #[test]
    fn substring_tables_match_inside_words() {
        let hit = MUTATION_RULES.first_match("bulk_delete_all");
        assert_eq!(hit.map(|m| m.pattern), Some("delete"));
    }

    #[test]
    fn clean_text_matches_nothing() {
        assert!(CONTENT_RULES.first_match("The meeting occurred at 3pm").is_none());
        assert_eq!(CONTENT_RULES.name(), "content");
    }
}
