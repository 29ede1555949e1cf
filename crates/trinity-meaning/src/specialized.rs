//! Layers that pre-fill source and context for common kinds of meaning.
//!
//! Each specialized layer wraps a [`MeaningLayer`] for a fixed source and
//! dereferences to it for lookups. The matching `*_entry` functions build
//! the same entries without a layer, for routing through a
//! [`crate::MeaningOverlay`].

use std::ops::Deref;

use trinity_types::{MeaningSource, text_list};

use crate::{MeaningEntry, MeaningError, MeaningLayer};

/// An etymology entry: the definition reads `Etymology: {origin}`.
///
/// # Errors
///
/// Returns any error from [`MeaningEntry::from_record`].
pub fn etymology_entry<I, S>(
    term: impl Into<String>,
    origin: &str,
    historical_usage: I,
) -> Result<MeaningEntry, MeaningError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    MeaningEntry::builder(term, MeaningSource::Etymology, format!("Etymology: {origin}"))
        .usage_examples(historical_usage)
        .context_entry("type", "historical_linguistic")
        .build()
}

/// A cultural-usage entry, with the cultures recorded in its context.
///
/// # Errors
///
/// Returns any error from [`MeaningEntry::from_record`].
pub fn cultural_entry<I, S>(
    term: impl Into<String>,
    cultures: I,
    meaning: impl Into<String>,
) -> Result<MeaningEntry, MeaningError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    MeaningEntry::builder(term, MeaningSource::CulturalUsage, meaning)
        .context_entry("cultures", text_list(cultures))
        .build()
}

/// A geographic-context entry, with the regions recorded in its context.
///
/// # Errors
///
/// Returns any error from [`MeaningEntry::from_record`].
pub fn geographic_entry<I, S>(
    term: impl Into<String>,
    regions: I,
    meaning: impl Into<String>,
) -> Result<MeaningEntry, MeaningError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    MeaningEntry::builder(term, MeaningSource::GeographicContext, meaning)
        .context_entry("regions", text_list(regions))
        .build()
}

macro_rules! specialized_layer {
    ($(#[$meta:meta])* $name:ident, $source:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(MeaningLayer);

        impl $name {
            /// Create an empty layer.
            pub const fn new() -> Self {
                Self(MeaningLayer::new($source))
            }

            /// Unwrap into the generic layer.
            pub fn into_inner(self) -> MeaningLayer {
                self.0
            }

            fn store(&mut self, entry: MeaningEntry) -> Result<MeaningEntry, MeaningError> {
                self.0.add_entry(entry.clone())?;
                Ok(entry)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Deref for $name {
            type Target = MeaningLayer;

            fn deref(&self) -> &MeaningLayer {
                &self.0
            }
        }
    };
}

specialized_layer!(
    /// The etymology layer.
    EtymologyLayer,
    MeaningSource::Etymology
);

specialized_layer!(
    /// The cultural-usage layer.
    CulturalLayer,
    MeaningSource::CulturalUsage
);

specialized_layer!(
    /// The geographic-context layer.
    GeographicLayer,
    MeaningSource::GeographicContext
);

impl EtymologyLayer {
    /// Add an etymology for `term` and return the stored entry.
    ///
    /// # Errors
    ///
    /// Returns any error from [`etymology_entry`].
    pub fn add_etymology<I, S>(
        &mut self,
        term: impl Into<String>,
        origin: &str,
        historical_usage: I,
    ) -> Result<MeaningEntry, MeaningError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store(etymology_entry(term, origin, historical_usage)?)
    }
}

impl CulturalLayer {
    /// Add a cultural meaning for `term` and return the stored entry.
    ///
    /// # Errors
    ///
    /// Returns any error from [`cultural_entry`].
    pub fn add_cultural_meaning<I, S>(
        &mut self,
        term: impl Into<String>,
        cultures: I,
        meaning: impl Into<String>,
    ) -> Result<MeaningEntry, MeaningError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store(cultural_entry(term, cultures, meaning)?)
    }
}

impl GeographicLayer {
    /// Add a geographic meaning for `term` and return the stored entry.
    ///
    /// # Errors
    ///
    /// Returns any error from [`geographic_entry`].
    pub fn add_geographic_meaning<I, S>(
        &mut self,
        term: impl Into<String>,
        regions: I,
        meaning: impl Into<String>,
    ) -> Result<MeaningEntry, MeaningError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store(geographic_entry(term, regions, meaning)?)
    }
}
