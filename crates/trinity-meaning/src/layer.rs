//! A single meaning layer: the entries for one source, keyed by term.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use trinity_types::MeaningSource;

use crate::{MeaningEntry, MeaningError};

/// The meaning entries for one [`MeaningSource`], keyed by term.
///
/// A layer only ever adds or looks up entries. Adding a second entry for
/// a term replaces the first; the displaced entry is handed back to the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeaningLayer {
    source: MeaningSource,
    entries: BTreeMap<String, MeaningEntry>,
}

impl MeaningLayer {
    /// Create an empty layer for `source`.
    pub const fn new(source: MeaningSource) -> Self {
        Self {
            source,
            entries: BTreeMap::new(),
        }
    }

    /// The source every entry in this layer carries.
    pub const fn source(&self) -> MeaningSource {
        self.source
    }

    /// Add an entry, keyed by its term.
    ///
    /// Returns the entry previously stored for the same term, if any.
    ///
    /// # Errors
    ///
    /// Returns [`MeaningError::SourceMismatch`] if the entry's source is not
    /// this layer's source. The layer is left unchanged.
    pub fn add_entry(&mut self, entry: MeaningEntry) -> Result<Option<MeaningEntry>, MeaningError> {
        if entry.source() != self.source {
            return Err(MeaningError::SourceMismatch {
                entry: entry.source(),
                layer: self.source,
            });
        }

        let term = entry.term().to_owned();
        let displaced = self.entries.insert(term.clone(), entry);
        if displaced.is_some() {
            warn!(source = %self.source, term = %term, "meaning entry replaced an earlier entry");
        } else {
            debug!(source = %self.source, term = %term, "meaning entry added");
        }
        Ok(displaced)
    }

    /// The entry for `term`, if one has been added.
    pub fn get_entry(&self, term: &str) -> Option<&MeaningEntry> {
        self.entries.get(term)
    }

    /// Every entry, ordered by term.
    pub fn get_all_entries(&self) -> Vec<&MeaningEntry> {
        self.entries.values().collect()
    }

    /// Number of terms in the layer.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the layer has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The JSON mapping form: `source` and `entries` keyed by term.
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(term: &str, source: MeaningSource, definition: &str) -> MeaningEntry {
        MeaningEntry::new(term, source, definition).unwrap()
    }

    #[test]
    fn add_and_get() {
        let mut layer = MeaningLayer::new(MeaningSource::NarrativeRole);
        let added = layer.add_entry(entry("guide", MeaningSource::NarrativeRole, "One who shows a path"));
        assert!(matches!(added, Ok(None)));
        assert_eq!(layer.len(), 1);
        assert_eq!(
            layer.get_entry("guide").map(MeaningEntry::definition),
            Some("One who shows a path")
        );
        assert!(layer.get_entry("mentor").is_none());
    }

    #[test]
    fn mismatched_source_rejected() {
        let mut layer = MeaningLayer::new(MeaningSource::Etymology);
        let result = layer.add_entry(entry("guide", MeaningSource::NarrativeRole, "A role"));
        assert!(matches!(
            result,
            Err(MeaningError::SourceMismatch {
                entry: MeaningSource::NarrativeRole,
                layer: MeaningSource::Etymology,
            })
        ));
        assert!(layer.is_empty());
    }

    #[test]
    fn last_write_wins_and_returns_displaced() {
        let mut layer = MeaningLayer::new(MeaningSource::CulturalUsage);
        layer
            .add_entry(entry("feast", MeaningSource::CulturalUsage, "A large shared meal"))
            .unwrap();
        let displaced = layer
            .add_entry(entry("feast", MeaningSource::CulturalUsage, "A celebratory meal"))
            .unwrap();

        assert_eq!(
            displaced.as_ref().map(MeaningEntry::definition),
            Some("A large shared meal")
        );
        assert_eq!(layer.len(), 1);
        assert_eq!(
            layer.get_entry("feast").map(MeaningEntry::definition),
            Some("A celebratory meal")
        );
    }

    #[test]
    fn entries_are_ordered_by_term_and_serialize() {
        let mut layer = MeaningLayer::new(MeaningSource::Etymology);
        for term in ["zephyr", "anchor", "meadow"] {
            layer
                .add_entry(entry(term, MeaningSource::Etymology, "From an older word"))
                .unwrap();
        }
        let terms: Vec<&str> = layer.get_all_entries().into_iter().map(MeaningEntry::term).collect();
        assert_eq!(terms, ["anchor", "meadow", "zephyr"]);

        let value = layer.to_value();
        assert_eq!(value["source"], "etymology");
        assert_eq!(value["entries"]["anchor"]["definition"], "From an older word");
        assert_eq!(serde_json::to_value(&layer).unwrap(), value);
    }
}
