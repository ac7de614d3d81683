// crates/schematic-cli/src/main.rs
//
// CLI entrypoint for the schematic protection tools.
//
// Provides subcommands for creating and protecting schematic asset files,
// verifying their integrity, comparing and scanning for copies, exporting,
// and filing violation reports.

mod commands;
mod config;
mod files;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::Context;
use config::{CliConfig, DEFAULT_CONFIG_PATH};
use output::OutputFormat;

/// Schematic protection CLI.
#[derive(Parser, Debug)]
#[command(
    name = "schematic",
    version = "0.1.0",
    about = "Fingerprint, watermark, verify, and compare schematic assets"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a default configuration file and create the data directory.
    Init {
        /// Overwrite an existing configuration file.
        #[arg(long)]
        force: bool,
    },

    /// Create a new schematic asset file.
    New {
        /// Title of the schematic.
        #[arg(long)]
        name: String,
        /// Where to write the asset file.
        #[arg(long)]
        out: PathBuf,
        /// JSON file holding the scene tree. Defaults to a single root node.
        #[arg(long)]
        tree: Option<PathBuf>,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Embed a watermark (if missing) and refresh the fingerprint.
    Protect {
        file: PathBuf,
        /// Replace an existing watermark.
        #[arg(long)]
        force: bool,
    },

    /// Protect every listed asset that lacks a fingerprint or watermark.
    ProtectAll {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Recompute the fingerprint of every listed asset.
    UpdateAll {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check the stored fingerprint and watermark of an asset.
    Verify { file: PathBuf },

    /// Score two assets against each other.
    Compare {
        a: PathBuf,
        b: PathBuf,
        /// Override the configured similarity threshold.
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Find assets similar to a target.
    Scan {
        target: PathBuf,
        #[arg(required = true)]
        candidates: Vec<PathBuf>,
        /// Override the configured similarity threshold.
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Replace the watermark and refresh the fingerprint.
    Regenerate { file: PathBuf },

    /// Export an asset as a metadata envelope plus scene body.
    Export {
        file: PathBuf,
        /// Output path. Defaults to `<title>.schematic` beside the asset.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export only the descriptive metadata of an asset.
    ExportMetadata {
        file: PathBuf,
        /// Output path. Defaults to `<title>_metadata.json` beside the asset.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Record a suspected copy of an asset as a local violation report.
    Report {
        file: PathBuf,
        /// Name of the suspected violator.
        #[arg(long)]
        violator: String,
        /// What was copied and where.
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        evidence: String,
    },

    /// Display an asset's identity and protection state.
    Show { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Config is read before tracing starts so its log level can apply; a
    // load failure is reported once the subscriber is installed.
    let loaded = CliConfig::load(&cli.config);
    let log_level = loaded
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = match loaded {
        Ok(cfg) => {
            tracing::debug!("Loaded configuration from {}", cli.config);
            cfg
        }
        Err(e) => {
            if !matches!(cli.command, Commands::Init { .. }) {
                tracing::warn!(
                    "Could not load config from {}: {}. Using defaults.",
                    cli.config,
                    e
                );
            }
            CliConfig::default()
        }
    };

    let ctx = Context {
        config,
        format: OutputFormat::from_flag(cli.json),
    };

    match cli.command {
        Commands::Init { force } => commands::init::run(&ctx, &cli.config, force).await?,
        Commands::New {
            name,
            out,
            tree,
            description,
            tags,
        } => commands::new::run(&ctx, &name, &out, tree.as_deref(), description, tags).await?,
        Commands::Protect { file, force } => commands::protect::run(&ctx, &file, force).await?,
        Commands::ProtectAll { files } => commands::protect::run_all(&ctx, files).await?,
        Commands::UpdateAll { files } => commands::protect::update_all(&ctx, files).await?,
        Commands::Verify { file } => commands::verify::run(&ctx, &file).await?,
        Commands::Compare { a, b, threshold } => {
            commands::compare::run(&ctx, &a, &b, threshold).await?
        }
        Commands::Scan {
            target,
            candidates,
            threshold,
        } => commands::compare::scan(&ctx, &target, &candidates, threshold).await?,
        Commands::Regenerate { file } => commands::protect::run(&ctx, &file, true).await?,
        Commands::Export { file, out } => commands::export::run(&ctx, &file, out).await?,
        Commands::ExportMetadata { file, out } => {
            commands::export::metadata(&ctx, &file, out).await?
        }
        Commands::Report {
            file,
            violator,
            description,
            evidence,
        } => commands::report::run(&ctx, &file, &violator, &description, &evidence).await?,
        Commands::Show { file } => commands::show::run(&ctx, &file).await?,
    }

    Ok(())
}
