// crates/schematic-export/src/report.rs
//
// Violation reports: a record of suspected copying of a protected schematic,
// persisted as pretty JSON under `<data_dir>/ViolationReports/`.
//
// Files are named `Violation_<schematic id>_<yyyyMMdd_HHmmss>.json`.
// Reports are stored locally only; nothing is sent anywhere.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use schematic_core::Asset;

use crate::error::ExportError;

/// Directory name for reports inside a data directory.
pub const REPORTS_DIR: &str = "ViolationReports";

/// Who is filing a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    pub name: String,
    pub email: String,
}

/// A report of suspected misuse of a schematic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationReport {
    pub reporter_name: String,
    pub reporter_email: String,
    pub original_schematic_id: String,
    pub original_schematic_name: String,
    pub original_creator: String,
    pub violation_description: String,
    pub violator_name: String,
    #[serde(default)]
    pub evidence_description: String,
    pub report_date: DateTime<Utc>,
}

impl ViolationReport {
    /// Build a report against `original`.
    ///
    /// `violator_name` and `description` must be non-blank; evidence is
    /// optional.
    pub fn new(
        reporter: &Reporter,
        original: &Asset,
        violator_name: &str,
        description: &str,
        evidence: &str,
    ) -> Result<Self, ExportError> {
        if violator_name.trim().is_empty() {
            return Err(ExportError::MissingField("violator name"));
        }
        if description.trim().is_empty() {
            return Err(ExportError::MissingField("violation description"));
        }
        Ok(Self {
            reporter_name: reporter.name.clone(),
            reporter_email: reporter.email.clone(),
            original_schematic_id: original.id().to_string(),
            original_schematic_name: original.metadata.title.clone(),
            original_creator: original.creator_name().to_string(),
            violation_description: description.to_string(),
            violator_name: violator_name.to_string(),
            evidence_description: evidence.to_string(),
            report_date: Utc::now(),
        })
    }

    /// File name this report is stored under.
    pub fn file_name(&self) -> String {
        format!(
            "Violation_{}_{}.json",
            self.original_schematic_id,
            self.report_date.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Local directory of saved reports.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The reports directory inside `data_dir`.
    pub fn in_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(REPORTS_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `report`, creating the directory if needed. Returns the path.
    pub fn save(&self, report: &ViolationReport) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(report.file_name());
        fs::write(&path, serde_json::to_string_pretty(report)?)?;
        info!(
            schematic = %report.original_schematic_id,
            path = %path.display(),
            "saved violation report"
        );
        Ok(path)
    }

    pub fn load(&self, path: &Path) -> Result<ViolationReport, ExportError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Paths of all saved reports, sorted by file name.
    pub fn list(&self) -> Result<Vec<PathBuf>, ExportError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_report = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("Violation_") && n.ends_with(".json"));
            if is_report {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}
