// crates/schematic-cli/src/commands/show.rs
//
// `schematic show`: identity and protection state of one asset.

use std::path::Path;

use serde::Serialize;

use schematic_core::{walker, watermark, Asset, WatermarkOp};

use super::Context;
use crate::files::load_asset;
use crate::output::{format_json, OutputFormat};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetSummary<'a> {
    id: &'a str,
    title: &'a str,
    creator: &'a str,
    created: String,
    description: &'a str,
    tags: &'a [String],
    nodes: usize,
    primitives: usize,
    geometric_hash: &'a str,
    markers: usize,
    offsets: usize,
}

fn summarize(asset: &Asset) -> Result<AssetSummary<'_>, Box<dyn std::error::Error>> {
    let primitives = walker::walk(asset.tree())?
        .iter()
        .filter(|d| d.has_mesh)
        .count();
    let ops = watermark::parse_record(asset.watermark_data())?;
    let markers = ops
        .iter()
        .filter(|op| matches!(op, WatermarkOp::Marker { .. }))
        .count();

    Ok(AssetSummary {
        id: asset.id(),
        title: &asset.metadata.title,
        creator: asset.creator_name(),
        created: asset.identity().created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        description: &asset.metadata.description,
        tags: &asset.metadata.tags,
        nodes: asset.tree().len(),
        primitives,
        geometric_hash: asset.geometric_hash(),
        markers,
        offsets: ops.len() - markers,
    })
}

/// Run the show command.
pub async fn run(ctx: &Context, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let asset = load_asset(file)?;
    let summary = summarize(&asset)?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&summary)),
        OutputFormat::Text => {
            println!("{}", summary.title);
            println!("  ID:          {}", summary.id);
            println!("  Creator:     {}", summary.creator);
            println!("  Created:     {}", summary.created);
            if !summary.description.is_empty() {
                println!("  Description: {}", summary.description);
            }
            if !summary.tags.is_empty() {
                println!("  Tags:        {}", summary.tags.join(", "));
            }
            println!("  Nodes:       {} ({} with meshes)", summary.nodes, summary.primitives);
            if summary.geometric_hash.is_empty() {
                println!("  Fingerprint: none");
            } else {
                println!("  Fingerprint: {}", summary.geometric_hash);
            }
            if summary.markers + summary.offsets == 0 {
                println!("  Watermark:   none");
            } else {
                println!(
                    "  Watermark:   {} markers, {} offsets",
                    summary.markers, summary.offsets
                );
            }
        }
    }

    Ok(())
}
