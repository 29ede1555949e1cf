//! The immutable incident record.
//!
//! An [`Incident`] can only be obtained through validation: the
//! [`IncidentBuilder`], [`Incident::from_record`], [`Incident::from_value`],
//! or deserialization all run the same checks. Once constructed, an incident
//! exposes read-only accessors and nothing else.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use trinity_types::{EntityId, IncidentId, IncidentType, Mapping, Value};
use trinity_validator::forbidden_language;

use crate::IncidentError;

// ---------------------------------------------------------------------------
// Serialized form
// ---------------------------------------------------------------------------

/// The plain, unvalidated shape of an incident.
///
/// This is what incidents look like on the wire. Converting it into an
/// [`Incident`] validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Unique, caller-supplied identifier.
    pub incident_id: IncidentId,
    /// ISO-8601 date, compared lexicographically.
    pub date: String,
    /// Label of the system the incident was observed in.
    pub system: String,
    /// Kind of incident. Defaults to `other`.
    #[serde(default)]
    pub incident_type: IncidentType,
    /// Entities involved.
    pub participants: Vec<EntityId>,
    /// Observable, attestable statements.
    pub facts: Vec<String>,
    /// Free-form context.
    #[serde(default)]
    pub context: Mapping,
    /// Plain-language description.
    #[serde(default)]
    pub summary: String,
    /// What was observed to occur.
    #[serde(default)]
    pub outcome: String,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Mapping,
}

// ---------------------------------------------------------------------------
// Incident
// ---------------------------------------------------------------------------

/// An immutable record of something observed.
///
/// Fields are private; there is no method that changes an incident after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IncidentRecord", into = "IncidentRecord")]
pub struct Incident {
    incident_id: IncidentId,
    date: String,
    system: String,
    incident_type: IncidentType,
    participants: Vec<EntityId>,
    facts: Vec<String>,
    context: Mapping,
    summary: String,
    outcome: String,
    metadata: Mapping,
}

impl Incident {
    /// Start building an incident.
    pub fn builder(
        incident_id: impl Into<IncidentId>,
        date: impl Into<String>,
        system: impl Into<String>,
    ) -> IncidentBuilder {
        IncidentBuilder::new(incident_id, date, system)
    }

    /// Validate a record and turn it into an incident.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentError::EmptyField`] if `incident_id`, `date`,
    /// `system`, `participants` or `facts` is empty, or if any participant
    /// identifier is blank. Returns [`IncidentError::ForbiddenLanguage`] if
    /// any fact matches a forbidden content pattern.
    pub fn from_record(record: IncidentRecord) -> Result<Self, IncidentError> {
        if record.incident_id.is_blank() {
            return Err(IncidentError::EmptyField("incident_id"));
        }
        if record.date.trim().is_empty() {
            return Err(IncidentError::EmptyField("date"));
        }
        if record.system.trim().is_empty() {
            return Err(IncidentError::EmptyField("system"));
        }
        if record.participants.is_empty() || record.participants.iter().any(EntityId::is_blank) {
            return Err(IncidentError::EmptyField("participants"));
        }
        if record.facts.is_empty() {
            return Err(IncidentError::EmptyField("facts"));
        }

        for fact in &record.facts {
            if let Some(rule) = forbidden_language(fact) {
                debug!(
                    incident_id = %record.incident_id,
                    pattern = rule.pattern,
                    "incident rejected: forbidden language in fact"
                );
                return Err(IncidentError::ForbiddenLanguage {
                    fact: fact.clone(),
                    pattern: rule.pattern,
                });
            }
        }

        Ok(Self {
            incident_id: record.incident_id,
            date: record.date,
            system: record.system,
            incident_type: record.incident_type,
            participants: record.participants,
            facts: record.facts,
            context: record.context,
            summary: record.summary,
            outcome: record.outcome,
            metadata: record.metadata,
        })
    }

    /// Parse and validate an incident from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`IncidentError::Malformed`] if the value is not shaped like
    /// an [`IncidentRecord`], or any error from [`Incident::from_record`].
    pub fn from_value(value: JsonValue) -> Result<Self, IncidentError> {
        let record: IncidentRecord = serde_json::from_value(value)?;
        Self::from_record(record)
    }

    /// The plain record form of this incident.
    pub fn to_record(&self) -> IncidentRecord {
        IncidentRecord {
            incident_id: self.incident_id.clone(),
            date: self.date.clone(),
            system: self.system.clone(),
            incident_type: self.incident_type,
            participants: self.participants.clone(),
            facts: self.facts.clone(),
            context: self.context.clone(),
            summary: self.summary.clone(),
            outcome: self.outcome.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// The JSON mapping form of this incident.
    ///
    /// A record of strings, enums and closed [`Mapping`]s always serializes,
    /// so the `Null` fallback is never taken.
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self.to_record()).unwrap_or_default()
    }

    /// Whether `entity_id` is listed among the participants.
    pub fn involves(&self, entity_id: &str) -> bool {
        self.participants.iter().any(|p| p.as_str() == entity_id)
    }

    /// Unique identifier.
    pub const fn incident_id(&self) -> &IncidentId {
        &self.incident_id
    }

    /// ISO-8601 date.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Origin system label.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Kind of incident.
    pub const fn incident_type(&self) -> IncidentType {
        self.incident_type
    }

    /// Participating entities, as supplied.
    pub fn participants(&self) -> &[EntityId] {
        &self.participants
    }

    /// Observed facts, in order.
    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// Free-form context.
    pub const fn context(&self) -> &Mapping {
        &self.context
    }

    /// Plain-language description.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// What was observed to occur.
    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    /// Free-form metadata.
    pub const fn metadata(&self) -> &Mapping {
        &self.metadata
    }
}

impl TryFrom<IncidentRecord> for Incident {
    type Error = IncidentError;

    fn try_from(record: IncidentRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl From<Incident> for IncidentRecord {
    fn from(incident: Incident) -> Self {
        Self {
            incident_id: incident.incident_id,
            date: incident.date,
            system: incident.system,
            incident_type: incident.incident_type,
            participants: incident.participants,
            facts: incident.facts,
            context: incident.context,
            summary: incident.summary,
            outcome: incident.outcome,
            metadata: incident.metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for validated [`Incident`] values.
///
/// # Examples
///
/// ```
/// use trinity_ledger::Incident;
///
/// let incident = Incident::builder("inc-7", "2024-05-01", "forum")
///     .participant("alice")
///     .fact("Alice posted a reply")
///     .context_entry("thread", "general")
///     .build();
/// assert!(incident.is_ok());
///
/// let rejected = Incident::builder("inc-8", "2024-05-01", "forum")
///     .participant("alice")
///     .fact("Alice will be banned")
///     .build();
/// assert!(rejected.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct IncidentBuilder {
    record: IncidentRecord,
}

impl IncidentBuilder {
    /// Start building an incident with its identifier, date and system.
    pub fn new(
        incident_id: impl Into<IncidentId>,
        date: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            record: IncidentRecord {
                incident_id: incident_id.into(),
                date: date.into(),
                system: system.into(),
                incident_type: IncidentType::default(),
                participants: Vec::new(),
                facts: Vec::new(),
                context: Mapping::new(),
                summary: String::new(),
                outcome: String::new(),
                metadata: Mapping::new(),
            },
        }
    }

    /// Set the incident type.
    #[must_use]
    pub const fn incident_type(mut self, incident_type: IncidentType) -> Self {
        self.record.incident_type = incident_type;
        self
    }

    /// Add one participant.
    #[must_use]
    pub fn participant(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.record.participants.push(entity_id.into());
        self
    }

    /// Add several participants.
    #[must_use]
    pub fn participants<I, S>(mut self, entity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.record
            .participants
            .extend(entity_ids.into_iter().map(Into::into));
        self
    }

    /// Add one fact.
    #[must_use]
    pub fn fact(mut self, fact: impl Into<String>) -> Self {
        self.record.facts.push(fact.into());
        self
    }

    /// Add several facts.
    #[must_use]
    pub fn facts<I, S>(mut self, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.facts.extend(facts.into_iter().map(Into::into));
        self
    }

    /// Insert one context entry.
    #[must_use]
    pub fn context_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.context.insert(key.into(), value.into());
        self
    }

    /// Replace the whole context mapping.
    #[must_use]
    pub fn context(mut self, context: Mapping) -> Self {
        self.record.context = context;
        self
    }

    /// Set the plain-language summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.record.summary = summary.into();
        self
    }

    /// Set the observed outcome.
    #[must_use]
    pub fn outcome(mut self, outcome: impl Into<String>) -> Self {
        self.record.outcome = outcome.into();
        self
    }

    /// Insert one metadata entry.
    #[must_use]
    pub fn metadata_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.metadata.insert(key.into(), value.into());
        self
    }

    /// Replace the whole metadata mapping.
    #[must_use]
    pub fn metadata(mut self, metadata: Mapping) -> Self {
        self.record.metadata = metadata;
        self
    }

    /// Validate inputs and produce an [`Incident`].
    ///
    /// # Errors
    ///
    /// Returns any error from [`Incident::from_record`].
    pub fn build(self) -> Result<Incident, IncidentError> {
        Incident::from_record(self.record)
    }
}
