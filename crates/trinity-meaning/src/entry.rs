//! The validated meaning entry.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use trinity_types::{Mapping, MeaningSource, Value};
use trinity_validator::forbidden_language;

use crate::MeaningError;

/// The plain, unvalidated shape of a meaning entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeaningRecord {
    /// The term being described.
    pub term: String,
    /// The layer the entry belongs to.
    pub source: MeaningSource,
    /// Descriptive definition.
    pub definition: String,
    /// Example usages.
    #[serde(default)]
    pub usage_examples: Vec<String>,
    /// Free-form context.
    #[serde(default)]
    pub context: Mapping,
    /// Limits on where the description applies.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Related terms.
    #[serde(default)]
    pub related_terms: Vec<String>,
}

/// A single descriptive annotation for a term.
///
/// Immutable once built. The definition never contains predictive or
/// prescriptive language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeaningRecord", into = "MeaningRecord")]
pub struct MeaningEntry {
    term: String,
    source: MeaningSource,
    definition: String,
    usage_examples: Vec<String>,
    context: Mapping,
    constraints: Vec<String>,
    related_terms: Vec<String>,
}

impl MeaningEntry {
    /// Build an entry with only a term, source and definition.
    ///
    /// # Errors
    ///
    /// See [`MeaningEntry::from_record`].
    pub fn new(
        term: impl Into<String>,
        source: MeaningSource,
        definition: impl Into<String>,
    ) -> Result<Self, MeaningError> {
        Self::builder(term, source, definition).build()
    }

    /// Start building an entry.
    pub fn builder(
        term: impl Into<String>,
        source: MeaningSource,
        definition: impl Into<String>,
    ) -> MeaningEntryBuilder {
        MeaningEntryBuilder {
            record: MeaningRecord {
                term: term.into(),
                source,
                definition: definition.into(),
                usage_examples: Vec::new(),
                context: Mapping::new(),
                constraints: Vec::new(),
                related_terms: Vec::new(),
            },
        }
    }

    /// Validate a record and turn it into an entry.
    ///
    /// # Errors
    ///
    /// Returns [`MeaningError::EmptyField`] if the term or definition is
    /// blank, and [`MeaningError::ForbiddenLanguage`] if the definition
    /// matches a forbidden content pattern.
    pub fn from_record(record: MeaningRecord) -> Result<Self, MeaningError> {
        if record.term.trim().is_empty() {
            return Err(MeaningError::EmptyField("term"));
        }
        if record.definition.trim().is_empty() {
            return Err(MeaningError::EmptyField("definition"));
        }
        if let Some(rule) = forbidden_language(&record.definition) {
            debug!(term = %record.term, pattern = rule.pattern, "meaning rejected");
            return Err(MeaningError::ForbiddenLanguage {
                term: record.term,
                pattern: rule.pattern,
            });
        }

        Ok(Self {
            term: record.term,
            source: record.source,
            definition: record.definition,
            usage_examples: record.usage_examples,
            context: record.context,
            constraints: record.constraints,
            related_terms: record.related_terms,
        })
    }

    /// Parse and validate an entry from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`MeaningError::Malformed`] on a shape mismatch, or any
    /// error from [`MeaningEntry::from_record`].
    pub fn from_value(value: JsonValue) -> Result<Self, MeaningError> {
        let record: MeaningRecord = serde_json::from_value(value)?;
        Self::from_record(record)
    }

    /// The JSON mapping form of this entry.
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// The term being described.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The layer the entry belongs to.
    pub const fn source(&self) -> MeaningSource {
        self.source
    }

    /// Descriptive definition.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Example usages.
    pub fn usage_examples(&self) -> &[String] {
        &self.usage_examples
    }

    /// Free-form context.
    pub const fn context(&self) -> &Mapping {
        &self.context
    }

    /// Limits on where the description applies.
    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    /// Related terms.
    pub fn related_terms(&self) -> &[String] {
        &self.related_terms
    }
}

impl TryFrom<MeaningRecord> for MeaningEntry {
    type Error = MeaningError;

    fn try_from(record: MeaningRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl From<MeaningEntry> for MeaningRecord {
    fn from(entry: MeaningEntry) -> Self {
        Self {
            term: entry.term,
            source: entry.source,
            definition: entry.definition,
            usage_examples: entry.usage_examples,
            context: entry.context,
            constraints: entry.constraints,
            related_terms: entry.related_terms,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for validated [`MeaningEntry`] values.
#[derive(Debug, Clone)]
pub struct MeaningEntryBuilder {
    record: MeaningRecord,
}

impl MeaningEntryBuilder {
    /// Add example usages.
    #[must_use]
    pub fn usage_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record
            .usage_examples
            .extend(examples.into_iter().map(Into::into));
        self
    }

    /// Insert one context entry.
    #[must_use]
    pub fn context_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.context.insert(key.into(), value.into());
        self
    }

    /// Add constraints.
    #[must_use]
    pub fn constraints<I, S>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record
            .constraints
            .extend(constraints.into_iter().map(Into::into));
        self
    }

    /// Add related terms.
    #[must_use]
    pub fn related_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record
            .related_terms
            .extend(terms.into_iter().map(Into::into));
        self
    }

    /// Validate inputs and produce a [`MeaningEntry`].
    ///
    /// # Errors
    ///
    /// Returns any error from [`MeaningEntry::from_record`].
    pub fn build(self) -> Result<MeaningEntry, MeaningError> {
        MeaningEntry::from_record(self.record)
    }
}
