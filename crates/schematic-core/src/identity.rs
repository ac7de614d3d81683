// crates/schematic-core/src/identity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance identity of a schematic.
///
/// Assigned once at creation by an [`IdentitySource`](crate::traits::IdentitySource)
/// and never regenerated. Both `id` and `creator_name` key the watermark,
/// which ties protection to provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIdentity {
    /// Globally unique id (a UUID string in practice).
    pub id: String,
    /// Registered name of the operator who created the asset.
    pub creator_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl AssetIdentity {
    /// Identity stamped with the current time.
    pub fn new(id: impl Into<String>, creator_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            creator_name: creator_name.into(),
            created_at: Utc::now(),
        }
    }

    /// First 8 characters of the id, used to name the watermark container.
    ///
    /// Returns `None` when the id is shorter than 8 characters.
    pub fn short_id(&self) -> Option<&str> {
        let end = self
            .id
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.id.len()))
            .nth(8)?;
        Some(&self.id[..end])
    }
}
