//! The multi-source meaning overlay and its annotation functions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use trinity_types::MeaningSource;

use crate::{MeaningEntry, MeaningError, MeaningLayer};

/// Disclaimer attached to every incident annotation.
pub const INCIDENT_ANNOTATION_NOTE: &str =
    "This annotation is descriptive only and does not modify the incident record.";

/// Disclaimer attached to every entity annotation.
pub const ENTITY_ANNOTATION_NOTE: &str =
    "This annotation is descriptive only and does not modify the entity record.";

/// Disclaimer attached to every pattern interpretation.
pub const INTERPRETATION_NOTE: &str =
    "This is a descriptive interpretation. It does not predict, prescribe, or influence outcomes.";

// ---------------------------------------------------------------------------
// Annotation records
// ---------------------------------------------------------------------------

/// What kind of record an annotation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// An incident, by `incident_id`.
    Incident,
    /// An entity, by `entity_id`.
    Entity,
}

/// A descriptive annotation tying a meaning to a record by identifier.
///
/// Building one never looks up or touches the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier of the annotated record.
    pub subject_id: String,
    /// Kind of the annotated record.
    pub subject_kind: SubjectKind,
    /// The annotated term.
    pub term: String,
    /// Source of the meaning.
    pub source: MeaningSource,
    /// The meaning's definition.
    pub definition: String,
    /// The meaning's usage examples.
    pub examples: Vec<String>,
    /// Statement that the annotation changes nothing.
    pub disclaimer: String,
}

/// A descriptive reading of a pattern in terms of meaning entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    /// The pattern being described.
    pub pattern: String,
    /// The meanings it is described with.
    pub interpretations: Vec<MeaningEntry>,
    /// Statement that the interpretation is descriptive only.
    pub disclaimer: String,
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// One [`MeaningLayer`] per [`MeaningSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeaningOverlay {
    etymology: MeaningLayer,
    cultural_usage: MeaningLayer,
    geographic_context: MeaningLayer,
    narrative_role: MeaningLayer,
    technical_definition: MeaningLayer,
    historical_context: MeaningLayer,
}

impl MeaningOverlay {
    /// Capabilities the overlay offers. None of them acts on a record.
    pub const CAPABILITIES: &'static [&'static str] =
        &["annotate incident", "annotate entity", "interpret pattern", "look up term"];

    /// Create an overlay with an empty layer for every source.
    pub const fn new() -> Self {
        Self {
            etymology: MeaningLayer::new(MeaningSource::Etymology),
            cultural_usage: MeaningLayer::new(MeaningSource::CulturalUsage),
            geographic_context: MeaningLayer::new(MeaningSource::GeographicContext),
            narrative_role: MeaningLayer::new(MeaningSource::NarrativeRole),
            technical_definition: MeaningLayer::new(MeaningSource::TechnicalDefinition),
            historical_context: MeaningLayer::new(MeaningSource::HistoricalContext),
        }
    }

    /// Route an entry to the layer for its source.
    ///
    /// Returns the entry previously stored for the same term in that layer.
    ///
    /// # Errors
    ///
    /// Returns any error from [`MeaningLayer::add_entry`].
    pub fn add_meaning(&mut self, entry: MeaningEntry) -> Result<Option<MeaningEntry>, MeaningError> {
        self.layer_mut(entry.source()).add_entry(entry)
    }

    /// Every layer's entry for `term`, for the layers that have one.
    pub fn get_meanings_for_term(&self, term: &str) -> BTreeMap<MeaningSource, &MeaningEntry> {
        self.layers()
            .filter_map(|layer| layer.get_entry(term).map(|entry| (layer.source(), entry)))
            .collect()
    }

    /// The layer for `source`.
    pub const fn get_layer(&self, source: MeaningSource) -> &MeaningLayer {
        match source {
            MeaningSource::Etymology => &self.etymology,
            MeaningSource::CulturalUsage => &self.cultural_usage,
            MeaningSource::GeographicContext => &self.geographic_context,
            MeaningSource::NarrativeRole => &self.narrative_role,
            MeaningSource::TechnicalDefinition => &self.technical_definition,
            MeaningSource::HistoricalContext => &self.historical_context,
        }
    }

    /// Every layer, in [`MeaningSource::ALL`] order.
    pub fn layers(&self) -> impl Iterator<Item = &MeaningLayer> {
        MeaningSource::ALL
            .into_iter()
            .map(move |source| self.get_layer(source))
    }

    /// Every entry across every layer.
    pub fn all_entries(&self) -> Vec<&MeaningEntry> {
        self.layers().flat_map(MeaningLayer::get_all_entries).collect()
    }

    /// The JSON mapping form: `layers` keyed by source name.
    pub fn to_value(&self) -> JsonValue {
        let layers: Map<String, JsonValue> = self
            .layers()
            .map(|layer| (layer.source().as_str().to_owned(), layer.to_value()))
            .collect();
        let mut root = Map::new();
        root.insert("layers".to_owned(), JsonValue::Object(layers));
        JsonValue::Object(root)
    }

    /// Describe an incident with a meaning, without looking it up.
    pub fn annotate_incident(
        incident_id: impl Into<String>,
        term: impl Into<String>,
        meaning: &MeaningEntry,
    ) -> Annotation {
        annotation(
            incident_id.into(),
            SubjectKind::Incident,
            term.into(),
            meaning,
            INCIDENT_ANNOTATION_NOTE,
        )
    }

    /// Describe an entity with a meaning, without looking it up.
    pub fn annotate_entity(
        entity_id: impl Into<String>,
        term: impl Into<String>,
        meaning: &MeaningEntry,
    ) -> Annotation {
        annotation(
            entity_id.into(),
            SubjectKind::Entity,
            term.into(),
            meaning,
            ENTITY_ANNOTATION_NOTE,
        )
    }

    /// Gather meanings into a descriptive interpretation of a pattern.
    pub fn interpret_pattern<'a, I>(description: impl Into<String>, meanings: I) -> Interpretation
    where
        I: IntoIterator<Item = &'a MeaningEntry>,
    {
        Interpretation {
            pattern: description.into(),
            interpretations: meanings.into_iter().cloned().collect(),
            disclaimer: INTERPRETATION_NOTE.to_owned(),
        }
    }

    fn layer_mut(&mut self, source: MeaningSource) -> &mut MeaningLayer {
        match source {
            MeaningSource::Etymology => &mut self.etymology,
            MeaningSource::CulturalUsage => &mut self.cultural_usage,
            MeaningSource::GeographicContext => &mut self.geographic_context,
            MeaningSource::NarrativeRole => &mut self.narrative_role,
            MeaningSource::TechnicalDefinition => &mut self.technical_definition,
            MeaningSource::HistoricalContext => &mut self.historical_context,
        }
    }
}

impl Default for MeaningOverlay {
    fn default() -> Self {
        Self::new()
    }
}

fn annotation(
    subject_id: String,
    subject_kind: SubjectKind,
    term: String,
    meaning: &MeaningEntry,
    disclaimer: &str,
) -> Annotation {
    Annotation {
        subject_id,
        subject_kind,
        term,
        source: meaning.source(),
        definition: meaning.definition().to_owned(),
        examples: meaning.usage_examples().to_vec(),
        disclaimer: disclaimer.to_owned(),
    }
}
