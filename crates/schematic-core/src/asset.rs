// crates/schematic-core/src/asset.rs

use serde::{Deserialize, Serialize};

use crate::identity::AssetIdentity;
use crate::traits::IdentitySource;
use crate::tree::SceneTree;

/// Descriptive, user-editable fields of a schematic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A protected schematic: a scene tree plus its identity and the two
/// protection fields.
///
/// `geometric_hash` is written only by the fingerprint engine and
/// `watermark_data` only by the watermark engine; both are read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    identity: AssetIdentity,
    pub metadata: AssetMetadata,
    tree: SceneTree,
    #[serde(default)]
    geometric_hash: String,
    #[serde(default)]
    watermark_data: Vec<String>,
}

impl Asset {
    /// A new, unprotected asset.
    pub fn new(identity: AssetIdentity, title: impl Into<String>, tree: SceneTree) -> Self {
        Self {
            identity,
            metadata: AssetMetadata {
                title: title.into(),
                ..AssetMetadata::default()
            },
            tree,
            geometric_hash: String::new(),
            watermark_data: Vec::new(),
        }
    }

    /// A new asset whose identity is issued by `source`.
    pub fn create<S: IdentitySource + ?Sized>(
        source: &S,
        title: impl Into<String>,
        tree: SceneTree,
    ) -> Self {
        Self::new(source.issue_identity(), title, tree)
    }

    pub fn identity(&self) -> &AssetIdentity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn creator_name(&self) -> &str {
        &self.identity.creator_name
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Mutable access to the scene. Editing geometry invalidates the stored
    /// fingerprint until it is recomputed.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Stored fingerprint; empty if never computed.
    pub fn geometric_hash(&self) -> &str {
        &self.geometric_hash
    }

    /// Stored watermark record; empty if never applied.
    pub fn watermark_data(&self) -> &[String] {
        &self.watermark_data
    }

    pub fn has_fingerprint(&self) -> bool {
        !self.geometric_hash.is_empty()
    }

    pub fn has_watermark(&self) -> bool {
        !self.watermark_data.is_empty()
    }

    pub(crate) fn set_geometric_hash(&mut self, hash: String) {
        self.geometric_hash = hash;
    }

    pub(crate) fn set_watermark_data(&mut self, data: Vec<String>) {
        self.watermark_data = data;
    }

    pub fn to_json(&self) -> Result<String, crate::ProtectionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, crate::ProtectionError> {
        Ok(serde_json::from_str(json)?)
    }
}
