// crates/schematic-core/src/config.rs
//
// Explicit protection settings, passed into the operations that need them.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.8;
pub const MIN_SIMILARITY_THRESHOLD: f32 = 0.5;
pub const MAX_SIMILARITY_THRESHOLD: f32 = 1.0;

/// Settings consumed by protection and comparison calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionConfig {
    /// Name stamped on newly created assets.
    #[serde(default = "default_creator_name")]
    pub creator_name: String,

    /// Overall similarity at or above which two schematics are "similar".
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

fn default_creator_name() -> String {
    "Unknown".to_string()
}

fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            creator_name: default_creator_name(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl ProtectionConfig {
    pub fn with_creator(mut self, creator_name: impl Into<String>) -> Self {
        self.creator_name = creator_name.into();
        self
    }

    /// Set the threshold, clamped to [0.5, 1.0].
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = clamp_threshold(threshold);
        self
    }

    /// The threshold clamped to [0.5, 1.0], whatever was deserialized.
    pub fn clamped_threshold(&self) -> f32 {
        clamp_threshold(self.similarity_threshold)
    }
}

/// Clamp to [0.5, 1.0]. NaN falls back to the default.
pub fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_nan() {
        return DEFAULT_SIMILARITY_THRESHOLD;
    }
    threshold.clamp(MIN_SIMILARITY_THRESHOLD, MAX_SIMILARITY_THRESHOLD)
}
