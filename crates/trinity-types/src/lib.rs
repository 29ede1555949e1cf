//! Shared type definitions for the Trinity incident-identity engine.
//!
//! This crate holds the small vocabulary every other Trinity crate speaks.
//! Types defined here flow downstream to `TypeScript` via `ts-rs` for
//! external viewers of the serialized records.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for incident and entity identifiers
//! - [`enums`] -- The closed [`IncidentType`] and [`MeaningSource`] sets
//! - [`value`] -- The closed [`Value`] type used by context and metadata maps

pub mod enums;
pub mod ids;
pub mod value;

// Re-export all public types at crate root for convenience.
pub use enums::{IncidentType, MeaningSource};
pub use ids::{EntityId, IncidentId};
pub use value::{Mapping, Value, text_list};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings into `bindings/` relative to the crate
        // root when these are invoked.
        use ts_rs::TS;

        let _ = crate::ids::IncidentId::export_all();
        let _ = crate::ids::EntityId::export_all();
        let _ = crate::enums::IncidentType::export_all();
        let _ = crate::enums::MeaningSource::export_all();
        let _ = crate::value::Value::export_all();
    }
}
