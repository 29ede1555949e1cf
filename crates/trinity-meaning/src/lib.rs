//! Descriptive meaning layers and annotations for the Trinity engine.
//!
//! Meanings answer "how can this term be understood?" and nothing else.
//! They are keyed by term within one [`MeaningSource`] layer, their
//! definitions pass the same forbidden-language rules as incident facts,
//! and annotating an incident or entity returns a new record without
//! touching the subject.
//!
//! # Architecture
//!
//! - [`entry`] -- The validated [`MeaningEntry`] and its builder.
//! - [`layer`] -- [`MeaningLayer`]: the entries for one source, keyed by term.
//! - [`specialized`] -- Etymology, cultural and geographic layers that
//!   pre-fill source and context.
//! - [`overlay`] -- [`MeaningOverlay`]: one layer per source, plus the
//!   annotation and interpretation functions.

pub mod entry;
pub mod layer;
pub mod overlay;
pub mod specialized;

// Re-export primary types at crate root.
pub use entry::{MeaningEntry, MeaningEntryBuilder, MeaningRecord};
pub use layer::MeaningLayer;
pub use overlay::{Annotation, Interpretation, MeaningOverlay, SubjectKind};
pub use specialized::{CulturalLayer, EtymologyLayer, GeographicLayer};

use trinity_types::MeaningSource;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised when building or storing meaning entries.
#[derive(Debug, thiserror::Error)]
pub enum MeaningError {
    /// A required field was empty.
    #[error("meaning field `{0}` cannot be empty")]
    EmptyField(&'static str),

    /// A definition contains predictive or prescriptive language.
    #[error("definition of `{term}` contains forbidden pattern `{pattern}`")]
    ForbiddenLanguage {
        /// The term being defined.
        term: String,
        /// The pattern the definition matched.
        pattern: &'static str,
    },

    /// An entry was routed to a layer for a different source.
    #[error("entry source {entry} does not match layer source {layer}")]
    SourceMismatch {
        /// The entry's source.
        entry: MeaningSource,
        /// The layer's source.
        layer: MeaningSource,
    },

    /// A serialized entry did not have the expected shape.
    #[error("malformed meaning record: {0}")]
    Malformed(#[from] serde_json::Error),
}
