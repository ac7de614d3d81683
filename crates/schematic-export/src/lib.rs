// crates/schematic-export/src/lib.rs
//
// schematic-export: File formats around protected schematics.
//
// Provides the export envelope (metadata block, scene body, content hash),
// metadata-only export, an append-only export log, and locally persisted
// violation reports.

pub mod envelope;
pub mod error;
pub mod export;
pub mod report;
pub mod scene;

pub use envelope::{parse_envelope, Envelope, ExportMetadata, MetadataSummary};
pub use error::ExportError;
pub use export::{export_metadata_only, export_schematic, read_export, ExportLog, ExportOptions};
pub use report::{ReportStore, Reporter, ViolationReport};
pub use scene::{scene_body, Component, SceneNode};
