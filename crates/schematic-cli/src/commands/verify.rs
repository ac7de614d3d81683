// crates/schematic-cli/src/commands/verify.rs
//
// `schematic verify`: integrity check of one asset file.

use std::path::Path;

use schematic_core::check_integrity;

use super::Context;
use crate::files::load_asset;
use crate::output::{format_json, OutputFormat};

/// Run the verify command.
pub async fn run(ctx: &Context, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let asset = load_asset(file)?;
    let report = check_integrity(&asset);

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Text => {
            println!("Integrity of {} ({})", asset.metadata.title, asset.id());
            println!();
            println!("{}", report);
            if !report.fingerprint_valid && asset.has_fingerprint() {
                println!();
                println!("Geometry changed since the fingerprint was taken.");
                println!("Run `schematic protect` to accept the change.");
            }
        }
    }

    Ok(())
}
