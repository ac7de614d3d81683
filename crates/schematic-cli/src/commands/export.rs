// crates/schematic-cli/src/commands/export.rs
//
// `schematic {export, export-metadata}`.

use std::path::{Path, PathBuf};

use schematic_export::export::default_file_name;
use schematic_export::{export_metadata_only, export_schematic, ExportLog, ExportOptions};

use super::Context;
use crate::files::{load_asset, save_asset};
use crate::output::{format_json, OutputFormat};

fn beside(file: &Path, name: String) -> PathBuf {
    file.parent().map(|dir| dir.join(&name)).unwrap_or_else(|| PathBuf::from(name))
}

/// Full export. The refreshed fingerprint is saved back to the asset file.
pub async fn run(ctx: &Context, file: &Path, out: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut asset = load_asset(file)?;
    let out = out.unwrap_or_else(|| beside(file, default_file_name(&asset.metadata.title, ".schematic")));
    let log = ExportLog::in_dir(ctx.config.data_dir());

    let options = ExportOptions::logged(log.clone()).with_license(ctx.config.license.clone());
    let metadata = export_schematic(&mut asset, &out, &options)?;
    save_asset(file, &asset)?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&metadata)),
        OutputFormat::Text => {
            println!("Exported '{}' to {}", metadata.title, out.display());
            println!("  Geometric hash: {}", metadata.geometric_hash);
            println!("  Content hash:   {}", metadata.content_hash);
            if ctx.config.export_notification {
                println!("  Logged to:      {}", log.path().display());
            }
        }
    }

    Ok(())
}

/// Metadata-only export.
pub async fn metadata(ctx: &Context, file: &Path, out: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let asset = load_asset(file)?;
    let out =
        out.unwrap_or_else(|| beside(file, default_file_name(&asset.metadata.title, "_metadata.json")));
    let summary = export_metadata_only(&asset, &out)?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&summary)),
        OutputFormat::Text => {
            println!("Metadata for '{}' exported to {}", summary.title, out.display());
        }
    }

    Ok(())
}
