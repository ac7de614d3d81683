// crates/schematic-cli/src/commands/init.rs
//
// `schematic init`: write a default configuration file and create the
// data directory.

use std::fs;
use std::path::Path;

use super::Context;
use crate::config::{expand_tilde, CliConfig};

/// Run the init command.
pub async fn run(ctx: &Context, config_path: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = expand_tilde(config_path);
    let path = Path::new(&path);

    if path.exists() && !force {
        println!("Configuration already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let config = CliConfig::default();
    fs::write(path, config.to_toml()?)?;

    let data_dir = ctx.config.data_dir();
    fs::create_dir_all(&data_dir)?;

    println!("Configuration written to: {}", path.display());
    println!("  Data directory: {}", data_dir.display());
    println!();
    println!("Set `creator_name` before creating schematics; it keys every watermark.");

    Ok(())
}
