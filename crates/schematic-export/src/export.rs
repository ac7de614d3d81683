// crates/schematic-export/src/export.rs
//
// File-level export operations and the append-only export log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use schematic_core::{fingerprint, Asset};

use crate::envelope::{Envelope, ExportMetadata, MetadataSummary};
use crate::error::ExportError;

/// File name of the export log inside a data directory.
pub const EXPORT_LOG_FILE: &str = "schematic_exports.log";

/// Append-only text log of exports, one line per export.
#[derive(Debug, Clone)]
pub struct ExportLog {
    path: PathBuf,
}

impl ExportLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(EXPORT_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry for `asset` exported to `target`.
    pub fn record(&self, asset: &Asset, target: &Path) -> Result<(), ExportError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "[{}] Exported schematic: {} (ID: {}) by {} to {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            asset.metadata.title,
            asset.id(),
            asset.creator_name(),
            target.display()
        )?;
        Ok(())
    }

    /// All entries, oldest first. A missing log has no entries.
    pub fn entries(&self) -> Result<Vec<String>, ExportError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Options for [`export_schematic`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// License written into the metadata instead of the default.
    pub license: Option<String>,
    /// Log to append an entry to.
    pub log: Option<ExportLog>,
}

impl ExportOptions {
    pub fn logged(log: ExportLog) -> Self {
        Self {
            log: Some(log),
            ..Self::default()
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }
}

/// Export `asset` to `path` as an envelope.
///
/// The stored fingerprint is refreshed first, so the exported
/// `geometricHash` always matches the exported geometry. A failure to write
/// the log entry is logged and does not fail the export.
pub fn export_schematic(
    asset: &mut Asset,
    path: &Path,
    options: &ExportOptions,
) -> Result<ExportMetadata, ExportError> {
    fingerprint::update(asset)?;

    let mut envelope = Envelope::for_asset(asset)?;
    if let Some(license) = &options.license {
        envelope.metadata.license = license.clone();
    }
    fs::write(path, envelope.render()?)?;
    info!(
        asset = %asset.id(),
        path = %path.display(),
        content_hash = %envelope.metadata.content_hash,
        "exported schematic"
    );

    if let Some(log) = &options.log {
        if let Err(e) = log.record(asset, path) {
            warn!(log = %log.path().display(), error = %e, "failed to write export log");
        }
    }

    Ok(envelope.metadata)
}

/// Read and validate an envelope written by [`export_schematic`].
pub fn read_export(path: &Path) -> Result<Envelope, ExportError> {
    let text = fs::read_to_string(path)?;
    crate::envelope::parse_envelope(&text)
}

/// Write only the descriptive metadata of `asset` to `path` as JSON.
///
/// Uses the stored fingerprint as is; nothing on the asset changes.
pub fn export_metadata_only(asset: &Asset, path: &Path) -> Result<MetadataSummary, ExportError> {
    let metadata = ExportMetadata::for_asset(asset, String::new());
    let summary = MetadataSummary::from(&metadata);
    fs::write(path, serde_json::to_string_pretty(&summary)?)?;
    info!(asset = %asset.id(), path = %path.display(), "exported schematic metadata");
    Ok(summary)
}

/// Default export file name for a title: spaces to underscores, lowercased.
pub fn default_file_name(title: &str, suffix: &str) -> String {
    format!("{}{}", title.replace(' ', "_").to_lowercase(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schematic_core::{check_integrity, protect, AssetIdentity, Node, SceneTree, Vec3};

    fn asset() -> Asset {
        let mut tree = SceneTree::new(Node::new("Bridge"));
        let root = tree.root();
        for i in 0..3 {
            tree.add_child(
                root,
                Node::new(format!("Plank{}", i))
                    .with_mesh("Cube")
                    .with_material("Oak")
                    .at(Vec3::new(i as f32 * 0.5, 0.0, 0.0)),
            )
            .unwrap();
        }
        Asset::new(
            AssetIdentity::new("b41d6e2a-7c1f-4e0e-9a55-3d2f1c0b9a88", "alice"),
            "Rope Bridge",
            tree,
        )
    }

    #[test]
    fn export_refreshes_fingerprint_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bridge.schematic");
        let log = ExportLog::in_dir(dir.path().join("data"));

        let mut asset = asset();
        protect(&mut asset, false).unwrap();
        // Edit after protecting: the stored hash is now stale.
        let root = asset.tree().root();
        let plank = asset.tree().find_child(root, "Plank0").unwrap();
        asset.tree_mut().node_mut(plank).unwrap().transform.position.y = 2.0;
        assert!(!check_integrity(&asset).is_intact());

        let options = ExportOptions::logged(log.clone()).with_license("CC-BY-4.0");
        let metadata = export_schematic(&mut asset, &out, &options).unwrap();
        assert_eq!(metadata.license, "CC-BY-4.0");
        assert!(check_integrity(&asset).is_intact());
        assert_eq!(metadata.geometric_hash, asset.geometric_hash());

        let envelope = read_export(&out).unwrap();
        assert_eq!(envelope.metadata, metadata);
        assert_eq!(envelope.metadata.license, "CC-BY-4.0");

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("Exported schematic: Rope Bridge (ID: b41d6e2a-"));
        assert!(entries[0].ends_with(&format!("to {}", out.display())));
    }

    #[test]
    fn log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let log = ExportLog::in_dir(dir.path());
        assert!(log.entries().unwrap().is_empty());

        let options = ExportOptions::logged(log.clone());
        let mut asset = asset();
        for name in ["a.schematic", "b.schematic"] {
            export_schematic(&mut asset, &dir.path().join(name), &options).unwrap();
        }
        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].ends_with("b.schematic"));
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("x.schematic");
        let mut asset = asset();
        assert!(matches!(
            export_schematic(&mut asset, &out, &ExportOptions::default()),
            Err(ExportError::Io(_))
        ));
    }

    #[test]
    fn metadata_only_export() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join(default_file_name("Rope Bridge", "_metadata.json"));
        assert!(out.ends_with("rope_bridge_metadata.json"));

        let mut asset = asset();
        protect(&mut asset, false).unwrap();
        let summary = export_metadata_only(&asset, &out).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["title"], "Rope Bridge");
        assert_eq!(written["geometricHash"], asset.geometric_hash());
        assert!(written.get("watermarkData").is_none());
        assert_eq!(summary.creator, "alice");
    }
}
