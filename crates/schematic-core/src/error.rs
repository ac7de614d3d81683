use thiserror::Error;

/// Error types for schematic protection.
///
/// Verification and comparison fail closed (`false` / `0.0`) instead of
/// returning these; only malformed trees and identities surface as errors.
#[derive(Debug, Error)]
pub enum ProtectionError {
    /// The scene tree is structurally invalid (cycle, missing root, dangling child).
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// A node id does not refer to a live node in the tree.
    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    /// The asset identity cannot be used for watermark derivation.
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ProtectionError {
    fn from(e: serde_json::Error) -> Self {
        ProtectionError::Serialization(e.to_string())
    }
}
