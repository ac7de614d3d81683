// crates/schematic-core/src/lib.rs
//
// schematic-core: Canonical fingerprinting, identity-keyed watermarking, and
// similarity scoring for tree-structured scene assets ("schematics").
//
// This is the leaf crate of the workspace. It performs no I/O: callers own
// the asset trees, persistence, and reporting.

pub mod asset;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fingerprint;
pub mod geometry;
pub mod identity;
pub mod integrity;
pub mod protection;
pub mod rng;
pub mod similarity;
pub mod traits;
pub mod tree;
pub mod walker;
pub mod watermark;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use schematic_core::Asset;`

// Data model
pub use asset::{Asset, AssetMetadata};
pub use geometry::{Transform, Vec3};
pub use identity::AssetIdentity;
pub use tree::{Node, NodeId, SceneTree};

// Engines
pub use integrity::{check_integrity, IntegrityReport, IntegrityStatus};
pub use protection::{protect, protect_all, update_all, ProtectOutcome};
pub use similarity::{scan, score, ScanMatch, SimilarityReport};
pub use walker::PrimitiveDescriptor;
pub use watermark::WatermarkOp;

// Configuration
pub use config::ProtectionConfig;

// Error type
pub use error::ProtectionError;

// Traits
pub use traits::{FixedIdentity, IdentitySource};
