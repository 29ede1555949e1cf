//! Type-safe identifier wrappers around caller-supplied strings.
//!
//! Incident and entity identifiers come from the systems that report
//! incidents, so they are opaque strings rather than generated UUIDs. The
//! newtypes keep the two kinds from being mixed at compile time while still
//! serializing as plain JSON strings.

use core::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(String);

        impl $name {
            /// Wrap a caller-supplied identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return whether the identifier is empty or only whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Return the inner [`String`].
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique, caller-supplied identifier of an incident.
    IncidentId
}

define_id! {
    /// Identifier of a participating entity. Entities carry no state of
    /// their own beyond the incidents that mention them.
    EntityId
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = EntityId::new("alice");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"alice\""));

        let restored: Result<EntityId, _> = serde_json::from_str("\"alice\"");
        assert_eq!(restored.ok(), Some(id));
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(IncidentId::new("").is_blank());
        assert!(IncidentId::new("   ").is_blank());
        assert!(!IncidentId::new("inc-1").is_blank());
    }

    #[test]
    fn ids_can_be_looked_up_by_str() {
        let mut set = BTreeSet::new();
        set.insert(EntityId::new("bob"));
        assert!(set.contains("bob"));
        assert!(!set.contains("carol"));
    }

    #[test]
    fn id_display_matches_inner() {
        let id = IncidentId::from("inc-42");
        assert_eq!(id.to_string(), "inc-42");
        assert_eq!(String::from(id), "inc-42");
    }
}
