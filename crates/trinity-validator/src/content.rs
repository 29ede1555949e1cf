//! Content and agency rules over free text.
//!
//! Each function runs one rule set against its input and turns the first
//! match into a failed [`Verdict`] naming the offending pattern. None of
//! them return errors: forbidden text is an ordinary validation outcome.

use crate::Verdict;
use crate::patterns::{
    AGENCY_RULES, CONTENT_RULES, CONTROL_RULES, FEEDBACK_RULES, PREDICTION_RULES, RuleMatch,
};

/// Return the first forbidden-content rule matched by `text`, if any.
///
/// This is the check record constructors run on facts and definitions.
pub fn forbidden_language(text: &str) -> Option<RuleMatch> {
    CONTENT_RULES.first_match(text)
}

/// Validate that a fact is observable and attestable, not predictive or
/// prescriptive.
pub fn validate_fact(fact: &str) -> Verdict {
    match forbidden_language(fact) {
        Some(rule) => Verdict::fail(format!("Fact contains forbidden pattern: {}", rule.pattern)),
        None => Verdict::pass(),
    }
}

/// Validate that a meaning definition is descriptive, not prescriptive.
pub fn validate_definition(definition: &str) -> Verdict {
    match forbidden_language(definition) {
        Some(rule) => Verdict::fail(format!(
            "Definition contains forbidden pattern: {}",
            rule.pattern
        )),
        None => Verdict::pass(),
    }
}

/// Validate that text does not imply agency or action.
pub fn validate_no_agency(text: &str) -> Verdict {
    match AGENCY_RULES.first_match(text) {
        Some(rule) => Verdict::fail(format!("Text implies agency: {}", rule.pattern)),
        None => Verdict::pass(),
    }
}

/// Validate that text does not make predictions.
pub fn validate_no_prediction(text: &str) -> Verdict {
    match PREDICTION_RULES.first_match(text) {
        Some(rule) => Verdict::fail(format!("Text makes prediction: {}", rule.pattern)),
        None => Verdict::pass(),
    }
}

/// Validate that none of a component's outputs describe a feedback loop.
pub fn validate_no_feedback_loops<I, S>(component_name: &str, outputs: I) -> Verdict
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for output in outputs {
        if let Some(rule) = FEEDBACK_RULES.first_match(output.as_ref()) {
            return Verdict::fail(format!(
                "Component {component_name} creates feedback loop: {}",
                rule.pattern
            ));
        }
    }
    Verdict::pass()
}

/// Validate that none of a component's capabilities exert control.
pub fn validate_no_control<I, S>(component_name: &str, capabilities: I) -> Verdict
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for capability in capabilities {
        if let Some(rule) = CONTROL_RULES.first_match(capability.as_ref()) {
            return Verdict::fail(format!(
                "Component {component_name} exerts control: {}",
                rule.pattern
            ));
        }
    }
    Verdict::pass()
}
