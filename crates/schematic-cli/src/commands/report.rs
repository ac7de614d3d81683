// crates/schematic-cli/src/commands/report.rs
//
// `schematic report`: record a suspected copy as a local violation report.

use std::path::Path;

use schematic_export::{ReportStore, ViolationReport};

use super::Context;
use crate::files::load_asset;
use crate::output::{format_json, OutputFormat};

/// Run the report command.
pub async fn run(
    ctx: &Context,
    file: &Path,
    violator: &str,
    description: &str,
    evidence: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let original = load_asset(file)?;
    let report = ViolationReport::new(&ctx.config.reporter(), &original, violator, description, evidence)?;
    let path = ReportStore::in_data_dir(ctx.config.data_dir()).save(&report)?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&report)),
        OutputFormat::Text => {
            println!("Violation report recorded for '{}'", report.original_schematic_name);
            println!("  Violator: {}", report.violator_name);
            println!("  Saved to: {}", path.display());
        }
    }

    Ok(())
}
