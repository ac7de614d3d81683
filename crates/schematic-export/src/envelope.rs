// crates/schematic-export/src/envelope.rs
//
// Export envelope: a JSON metadata block wrapped in a comment, followed by
// the scene body.
//
//   /* METADATA_BEGIN
//   { ...metadata... }
//   METADATA_END */
//
//   { ...scene body... }
//
// `contentHash` in the metadata is the SHA-256 hex of the body text, so a
// body edited after export no longer matches its header.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use schematic_core::{crypto, Asset};

use crate::error::ExportError;
use crate::scene::{scene_body, SceneNode};

pub const METADATA_BEGIN: &str = "/* METADATA_BEGIN\n";
pub const METADATA_END: &str = "\nMETADATA_END */\n\n";

pub const FORMAT_VERSION: &str = "1.0.0";
pub const DEFAULT_LICENSE: &str = "Proprietary";
pub const SCP_VERSION: &str = "Latest";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

fn default_scp_version() -> String {
    SCP_VERSION.to_string()
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Metadata block of a full export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub schematic_id: String,
    pub title: String,
    pub creator: String,
    pub creation_date: String,
    pub last_modified: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default = "default_scp_version")]
    pub scp_version: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub geometric_hash: String,
    pub content_hash: String,
    #[serde(default)]
    pub watermark_data: Vec<String>,
}

impl ExportMetadata {
    /// Metadata for `asset` with the given body hash, stamped now.
    ///
    /// Uses whatever fingerprint is stored; callers refresh it first.
    pub fn for_asset(asset: &Asset, content_hash: String) -> Self {
        Self {
            schematic_id: asset.id().to_string(),
            title: asset.metadata.title.clone(),
            creator: asset.creator_name().to_string(),
            creation_date: asset
                .identity()
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            last_modified: timestamp_now(),
            version: default_version(),
            license: default_license(),
            scp_version: default_scp_version(),
            tags: asset.metadata.tags.clone(),
            description: asset.metadata.description.clone(),
            geometric_hash: asset.geometric_hash().to_string(),
            content_hash,
            watermark_data: asset.watermark_data().to_vec(),
        }
    }
}

/// Metadata written by a metadata-only export. Carries no body hash and no
/// watermark record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSummary {
    pub schematic_id: String,
    pub title: String,
    pub creator: String,
    pub creation_date: String,
    pub last_modified: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub geometric_hash: String,
}

impl From<&ExportMetadata> for MetadataSummary {
    fn from(m: &ExportMetadata) -> Self {
        Self {
            schematic_id: m.schematic_id.clone(),
            title: m.title.clone(),
            creator: m.creator.clone(),
            creation_date: m.creation_date.clone(),
            last_modified: m.last_modified.clone(),
            description: m.description.clone(),
            tags: m.tags.clone(),
            geometric_hash: m.geometric_hash.clone(),
        }
    }
}

/// A parsed export: metadata plus the raw body text.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub metadata: ExportMetadata,
    pub body: String,
}

impl Envelope {
    /// Build the envelope for `asset` as it stands.
    pub fn for_asset(asset: &Asset) -> Result<Self, ExportError> {
        let body = scene_body(asset.tree())?;
        let metadata = ExportMetadata::for_asset(asset, crypto::hash_hex(body.as_bytes()));
        Ok(Self { metadata, body })
    }

    /// Decode the body back into a scene.
    pub fn scene(&self) -> Result<SceneNode, ExportError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Render the envelope text.
    pub fn render(&self) -> Result<String, ExportError> {
        let metadata = serde_json::to_string_pretty(&self.metadata)?;
        Ok(format!(
            "{}{}{}{}",
            METADATA_BEGIN, metadata, METADATA_END, self.body
        ))
    }
}

/// Split envelope text into metadata and body, rejecting a body whose hash
/// differs from the recorded `contentHash`.
pub fn parse_envelope(text: &str) -> Result<Envelope, ExportError> {
    let rest = text
        .strip_prefix(METADATA_BEGIN)
        .ok_or_else(|| ExportError::Format("missing METADATA_BEGIN header".to_string()))?;
    let (metadata, body) = rest
        .split_once(METADATA_END)
        .ok_or_else(|| ExportError::Format("missing METADATA_END marker".to_string()))?;

    let metadata: ExportMetadata = serde_json::from_str(metadata)?;
    let actual = crypto::hash_hex(body.as_bytes());
    if actual != metadata.content_hash {
        return Err(ExportError::Format(format!(
            "content hash mismatch: header {} body {}",
            metadata.content_hash, actual
        )));
    }

    Ok(Envelope {
        metadata,
        body: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schematic_core::{protect, AssetIdentity, Node, SceneTree, Vec3};

    fn asset() -> Asset {
        let mut tree = SceneTree::new(Node::new("Tower"));
        let root = tree.root();
        tree.add_child(root, Node::new("Base").with_mesh("Cylinder").at(Vec3::new(0.0, 0.5, 0.0)))
            .unwrap();
        tree.add_child(root, Node::new("Top").with_mesh("Sphere").at(Vec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        let mut asset = Asset::new(
            AssetIdentity::new("c0ffee00-1234-4abc-8def-000000000001", "alice"),
            "Tower",
            tree,
        );
        asset.metadata.tags = vec!["tower".into(), "stone".into()];
        asset.metadata.description = "A tall tower".into();
        protect(&mut asset, false).unwrap();
        asset
    }

    #[test]
    fn render_then_parse() {
        let asset = asset();
        let envelope = Envelope::for_asset(&asset).unwrap();
        let text = envelope.render().unwrap();
        assert!(text.starts_with("/* METADATA_BEGIN\n{"));
        assert!(text.contains("\nMETADATA_END */\n\n{"));

        let parsed = parse_envelope(&text).unwrap();
        assert_eq!(parsed.metadata, envelope.metadata);
        assert_eq!(parsed.body, envelope.body);
        assert_eq!(parsed.metadata.geometric_hash, asset.geometric_hash());
        assert_eq!(parsed.metadata.watermark_data, asset.watermark_data());
        assert_eq!(parsed.scene().unwrap().children.len(), 2);
    }

    #[test]
    fn metadata_uses_camel_case_and_defaults() {
        let envelope = Envelope::for_asset(&asset()).unwrap();
        let value = serde_json::to_value(&envelope.metadata).unwrap();
        assert_eq!(value["schematicId"], "c0ffee00-1234-4abc-8def-000000000001");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["license"], "Proprietary");
        assert_eq!(value["scpVersion"], "Latest");
        assert_eq!(value["tags"][1], "stone");
        assert_eq!(
            value["contentHash"],
            crypto::hash_hex(envelope.body.as_bytes())
        );
    }

    #[test]
    fn tampered_body_is_rejected() {
        let text = Envelope::for_asset(&asset()).unwrap().render().unwrap();
        let tampered = text.replace("\"Top\"", "\"Roof\"");
        assert!(matches!(
            parse_envelope(&tampered),
            Err(ExportError::Format(msg)) if msg.contains("content hash mismatch")
        ));
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(
            parse_envelope("{\"name\":\"x\"}"),
            Err(ExportError::Format(_))
        ));
        assert!(matches!(
            parse_envelope("/* METADATA_BEGIN\n{}"),
            Err(ExportError::Format(_))
        ));
        assert!(matches!(
            parse_envelope("/* METADATA_BEGIN\nnot json\nMETADATA_END */\n\n{}"),
            Err(ExportError::Serialization(_))
        ));
    }

    #[test]
    fn summary_drops_hash_and_record() {
        let envelope = Envelope::for_asset(&asset()).unwrap();
        let summary = MetadataSummary::from(&envelope.metadata);
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("contentHash").is_none());
        assert!(value.get("watermarkData").is_none());
        assert_eq!(value["geometricHash"], envelope.metadata.geometric_hash);
    }
}
