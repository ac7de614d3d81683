// crates/schematic-cli/src/files.rs
//
// Asset files on disk (JSON serializations of `Asset`) and the UUID-based
// identity source for new schematics.

use std::fs;
use std::path::Path;

use schematic_core::{Asset, AssetIdentity, IdentitySource};
use schematic_export::ExportError;
use uuid::Uuid;

pub fn load_asset(path: &Path) -> Result<Asset, ExportError> {
    Ok(Asset::from_json(&fs::read_to_string(path)?)?)
}

pub fn save_asset(path: &Path, asset: &Asset) -> Result<(), ExportError> {
    fs::write(path, asset.to_json()?)?;
    Ok(())
}

/// Issues time-ordered UUIDs stamped with the configured creator.
#[derive(Debug, Clone)]
pub struct UuidIdentity {
    pub creator_name: String,
}

impl IdentitySource for UuidIdentity {
    fn issue_identity(&self) -> AssetIdentity {
        AssetIdentity::new(Uuid::now_v7().to_string(), self.creator_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schematic_core::{Node, SceneTree};

    #[test]
    fn identities_are_unique_and_long_enough() {
        let source = UuidIdentity {
            creator_name: "alice".into(),
        };
        let a = source.issue_identity();
        let b = source.issue_identity();
        assert_ne!(a.id, b.id);
        assert_eq!(a.creator_name, "alice");
        assert!(a.short_id().is_some());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        let source = UuidIdentity {
            creator_name: "alice".into(),
        };
        let asset = Asset::create(&source, "Shed", SceneTree::new(Node::new("Shed")));
        save_asset(&path, &asset).unwrap();
        let loaded = load_asset(&path).unwrap();
        assert_eq!(loaded.id(), asset.id());
        assert_eq!(loaded.metadata.title, "Shed");

        assert!(matches!(
            load_asset(&dir.path().join("missing.json")),
            Err(ExportError::Io(_))
        ));
        fs::write(&path, "{").unwrap();
        assert!(matches!(load_asset(&path), Err(ExportError::Core(_))));
    }
}
