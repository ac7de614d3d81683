// crates/schematic-core/src/traits.rs

use crate::identity::AssetIdentity;

/// Source of asset identities.
///
/// The core never generates ids or creator names itself; callers supply an
/// implementation (e.g. UUIDs plus the configured operator name).
pub trait IdentitySource {
    /// Issue a fresh, globally unique identity for a new asset.
    fn issue_identity(&self) -> AssetIdentity;
}

/// A fixed identity, for replaying a known asset or for tests.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub AssetIdentity);

impl IdentitySource for FixedIdentity {
    fn issue_identity(&self) -> AssetIdentity {
        self.0.clone()
    }
}
