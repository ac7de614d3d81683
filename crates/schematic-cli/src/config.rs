// crates/schematic-cli/src/config.rs
//
// Operator configuration for the schematic CLI.
// Loaded from a TOML file or populated with defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use schematic_core::ProtectionConfig;
use schematic_export::Reporter;

/// Operator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Creator name stamped on new schematics and watermark seeds.
    #[serde(default = "default_creator_name")]
    pub creator_name: String,

    /// Contact address recorded on violation reports.
    #[serde(default)]
    pub reporting_email: String,

    /// License string written into full exports.
    #[serde(default = "default_license")]
    pub license: String,

    /// Similarity threshold; clamped to [0.5, 1.0] when used.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Protect new schematics as soon as they are created.
    #[serde(default = "default_true")]
    pub auto_protection: bool,

    /// Print where each export was logged.
    #[serde(default = "default_true")]
    pub export_notification: bool,

    /// Directory for the export log and violation reports.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_creator_name() -> String {
    "Unknown".to_string()
}

fn default_license() -> String {
    schematic_export::envelope::DEFAULT_LICENSE.to_string()
}

fn default_similarity_threshold() -> f32 {
    schematic_core::config::DEFAULT_SIMILARITY_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> String {
    "~/.schematic".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            creator_name: default_creator_name(),
            reporting_email: String::new(),
            license: default_license(),
            similarity_threshold: default_similarity_threshold(),
            auto_protection: true,
            export_notification: true,
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(expand_tilde(path))?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Render as TOML, for `schematic init`.
    pub fn to_toml(&self) -> Result<String, Box<dyn std::error::Error>> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Data directory with `~` expanded.
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(expand_tilde(&self.data_dir))
    }

    /// Core protection settings, with an optional threshold override.
    pub fn protection(&self, threshold: Option<f32>) -> ProtectionConfig {
        ProtectionConfig::default()
            .with_creator(self.creator_name.clone())
            .with_threshold(threshold.unwrap_or(self.similarity_threshold))
    }

    pub fn reporter(&self) -> Reporter {
        Reporter {
            name: self.creator_name.clone(),
            email: self.reporting_email.clone(),
        }
    }
}

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "~/.schematic/config.toml";

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).display().to_string();
        }
    }
    path.to_string()
}
