// crates/schematic-cli/src/commands/mod.rs
//
// Command module declarations for the schematic CLI.

pub mod compare;
pub mod export;
pub mod init;
pub mod new;
pub mod protect;
pub mod report;
pub mod show;
pub mod verify;

use crate::config::CliConfig;
use crate::output::OutputFormat;

/// State shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: CliConfig,
    pub format: OutputFormat,
}
