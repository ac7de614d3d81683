// crates/schematic-cli/src/commands/compare.rs
//
// `schematic {compare, scan}`: similarity between asset files.

use std::path::{Path, PathBuf};

use schematic_core::{scan as scan_assets, score};

use super::Context;
use crate::files::load_asset;
use crate::output::{format_json, format_table, OutputFormat, ScanRow};

/// Score `a` against `b`.
pub async fn run(
    ctx: &Context,
    a: &Path,
    b: &Path,
    threshold: Option<f32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = load_asset(a)?;
    let second = load_asset(b)?;
    let report = score(&first, &second, &ctx.config.protection(threshold))?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Text => {
            println!(
                "Comparing '{}' ({}) with '{}' ({})",
                first.metadata.title,
                first.creator_name(),
                second.metadata.title,
                second.creator_name()
            );
            println!();
            println!("{}", report);
        }
    }

    Ok(())
}

/// Score `target` against every candidate and list those above threshold.
pub async fn scan(
    ctx: &Context,
    target: &Path,
    candidates: &[PathBuf],
    threshold: Option<f32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = load_asset(target)?;
    let mut loaded = Vec::with_capacity(candidates.len());
    for path in candidates {
        match load_asset(path) {
            Ok(asset) => loaded.push(asset),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let config = ctx.config.protection(threshold);
    let hits = scan_assets(&target, &loaded, &config)?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&hits)),
        OutputFormat::Text => {
            println!(
                "Scanned {} schematics against '{}' (threshold {:.0}%)",
                loaded.len(),
                target.metadata.title,
                config.clamped_threshold() * 100.0
            );
            println!();
            if hits.is_empty() {
                println!("No similar schematics found.");
            } else {
                let rows: Vec<ScanRow> = hits.iter().map(ScanRow::from).collect();
                println!("{}", format_table(&rows));
            }
        }
    }

    Ok(())
}
