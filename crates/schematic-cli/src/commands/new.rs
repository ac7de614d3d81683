// crates/schematic-cli/src/commands/new.rs
//
// `schematic new`: create a schematic asset file with a fresh identity.

use std::fs;
use std::path::Path;

use schematic_core::{protect, Asset, Node, SceneTree};

use super::Context;
use crate::files::{save_asset, UuidIdentity};
use crate::output::{format_json, OutputFormat};

/// Run the new command.
pub async fn run(
    ctx: &Context,
    name: &str,
    out: &Path,
    tree: Option<&Path>,
    description: String,
    tags: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree: SceneTree = match tree {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SceneTree::new(Node::new(name)),
    };

    let source = UuidIdentity {
        creator_name: ctx.config.creator_name.clone(),
    };
    let mut asset = Asset::create(&source, name, tree);
    asset.metadata.description = description;
    asset.metadata.tags = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if ctx.config.auto_protection {
        protect(&mut asset, false)?;
    }
    save_asset(out, &asset)?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&asset)),
        OutputFormat::Text => {
            println!("Schematic created: {}", asset.metadata.title);
            println!("  ID:        {}", asset.id());
            println!("  Creator:   {}", asset.creator_name());
            println!("  Protected: {}", asset.has_watermark());
            println!("  Saved to:  {}", out.display());
        }
    }

    Ok(())
}
