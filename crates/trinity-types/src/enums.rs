//! Enumeration types for the Trinity engine.
//!
//! Both enumerations are closed sets. They serialize as `snake_case`
//! strings so the dict-shaped records consumed by external tools read
//! naturally (`"state_change"`, `"cultural_usage"`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Incident types
// ---------------------------------------------------------------------------

/// The kind of incident that was observed. Purely descriptive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum IncidentType {
    /// Something was seen or measured.
    Observation,
    /// Two or more participants interacted.
    Interaction,
    /// A participant's state changed.
    StateChange,
    /// A message was exchanged.
    Communication,
    /// An event emitted by a system rather than a participant.
    SystemEvent,
    /// Anything not covered above.
    #[default]
    Other,
}

impl IncidentType {
    /// Every incident type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Observation,
        Self::Interaction,
        Self::StateChange,
        Self::Communication,
        Self::SystemEvent,
        Self::Other,
    ];

    /// The serialized name of this incident type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Interaction => "interaction",
            Self::StateChange => "state_change",
            Self::Communication => "communication",
            Self::SystemEvent => "system_event",
            Self::Other => "other",
        }
    }
}

impl core::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Meaning sources
// ---------------------------------------------------------------------------

/// The category a meaning annotation is drawn from.
///
/// A meaning overlay holds exactly one layer per source; no other layers
/// exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MeaningSource {
    /// Word origin and historical linguistic usage.
    Etymology,
    /// How a term is used within particular cultures.
    CulturalUsage,
    /// How a term is understood in particular regions.
    GeographicContext,
    /// The role a term plays in a narrative.
    NarrativeRole,
    /// A technical or domain definition.
    TechnicalDefinition,
    /// How a term was understood historically.
    HistoricalContext,
}

impl MeaningSource {
    /// Every meaning source, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Etymology,
        Self::CulturalUsage,
        Self::GeographicContext,
        Self::NarrativeRole,
        Self::TechnicalDefinition,
        Self::HistoricalContext,
    ];

    /// The serialized name of this source.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Etymology => "etymology",
            Self::CulturalUsage => "cultural_usage",
            Self::GeographicContext => "geographic_context",
            Self::NarrativeRole => "narrative_role",
            Self::TechnicalDefinition => "technical_definition",
            Self::HistoricalContext => "historical_context",
        }
    }
}

impl core::fmt::Display for MeaningSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
