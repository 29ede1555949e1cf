//! Regenerable, non-authoritative snapshot views for the Trinity engine.
//!
//! A snapshot is a point-in-time computation over the incident log and the
//! entity identities derived from it. Snapshots are never written back into
//! the log, carry a disclaimer saying they are views, and can be deleted or
//! regenerated without any effect on the records they were computed from.
//!
//! # Architecture
//!
//! - [`snapshots`] -- The snapshot records: identity, timeline, system,
//!   relationship and temporal.
//! - [`generator`] -- [`SnapshotGenerator`]: builds snapshots and keeps an
//!   optional cache of identity snapshots.

pub mod generator;
pub mod snapshots;

// Re-export primary types at crate root.
pub use generator::{Clock, SnapshotGenerator};
pub use snapshots::{
    EntityPresence, IdentitySnapshot, RelationshipSnapshot, SystemSnapshot, TemporalSnapshot,
    TimelineSnapshot,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use trinity_validator::is_view_disclaimer;

/// The note every snapshot carries in `metadata.note`.
pub const VIEW_DISCLAIMER: &str =
    "This snapshot is a view, not authoritative. It can be regenerated or deleted.";

/// Metadata attached to every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// States that the snapshot is a non-authoritative view.
    pub note: String,
}

impl SnapshotMetadata {
    /// Metadata carrying [`VIEW_DISCLAIMER`].
    pub fn view() -> Self {
        Self {
            note: VIEW_DISCLAIMER.to_owned(),
        }
    }

    /// Whether the note marks the snapshot as a view.
    pub fn is_view(&self) -> bool {
        is_view_disclaimer(&self.note)
    }
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self::view()
    }
}

/// Behavior shared by every snapshot record.
pub trait SnapshotView: Serialize {
    /// When the snapshot was computed.
    fn snapshot_date(&self) -> DateTime<Utc>;

    /// The snapshot's metadata.
    fn metadata(&self) -> &SnapshotMetadata;

    /// Whether the snapshot says it is a non-authoritative view.
    fn is_marked_as_view(&self) -> bool {
        self.metadata().is_view()
    }

    /// The JSON mapping form of the snapshot.
    fn to_value(&self) -> JsonValue
    where
        Self: Sized,
    {
        serde_json::to_value(self).unwrap_or_default()
    }
}
