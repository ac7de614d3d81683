// crates/schematic-core/src/similarity.rs
//
// Similarity scoring between two schematics: binary geometric match plus
// graded watermark overlap, averaged and thresholded.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::asset::Asset;
use crate::config::ProtectionConfig;
use crate::error::ProtectionError;
use crate::{fingerprint, watermark};

/// Result of comparing two schematics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    /// 1.0 if the fingerprints match, else 0.0.
    pub geometric: f32,
    /// Watermark record overlap in [0, 1].
    pub watermark: f32,
    /// Mean of `geometric` and `watermark`.
    pub overall: f32,
    /// `overall >= threshold`.
    pub decision: bool,
    /// The threshold the decision was made against.
    pub threshold: f32,
    /// The two assets name different creators.
    pub creators_differ: bool,
}

impl SimilarityReport {
    /// Similar schematics attributed to different creators.
    pub fn possible_plagiarism(&self) -> bool {
        self.decision && self.creators_differ
    }
}

impl fmt::Display for SimilarityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Geometric Similarity: {:.2}%", self.geometric * 100.0)?;
        writeln!(f, "Watermark Similarity: {:.2}%", self.watermark * 100.0)?;
        writeln!(f, "Overall Similarity: {:.2}%", self.overall * 100.0)?;
        if self.decision {
            write!(
                f,
                "RESULT: SIMILAR (threshold {:.2}%)",
                self.threshold * 100.0
            )?;
            if self.creators_differ {
                write!(f, "\nWARNING: Different creators; this may indicate plagiarism.")?;
            }
            Ok(())
        } else {
            write!(
                f,
                "RESULT: DIFFERENT (threshold {:.2}%)",
                self.threshold * 100.0
            )
        }
    }
}

fn combine(geometric: f32, watermark: f32, threshold: f32, creators_differ: bool) -> SimilarityReport {
    let overall = (geometric + watermark) / 2.0;
    SimilarityReport {
        geometric,
        watermark,
        overall,
        decision: overall >= threshold,
        threshold,
        creators_differ,
    }
}

/// Score `a` against `b` using the configured (clamped) threshold.
///
/// Pure: nothing is cached or retained between calls.
pub fn score(a: &Asset, b: &Asset, config: &ProtectionConfig) -> Result<SimilarityReport, ProtectionError> {
    let geometric = fingerprint::compare(a.tree(), b.tree())?;
    let watermark = watermark::compare(a.watermark_data(), b.watermark_data());
    let report = combine(
        geometric,
        watermark,
        config.clamped_threshold(),
        a.creator_name() != b.creator_name(),
    );
    debug!(
        a = %a.id(),
        b = %b.id(),
        overall = report.overall,
        decision = report.decision,
        "scored schematic pair"
    );
    Ok(report)
}

/// One hit from [`scan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMatch {
    pub id: String,
    pub title: String,
    pub creator_name: String,
    pub report: SimilarityReport,
}

/// Score `target` against every candidate with a different id and return
/// those at or above the threshold, most similar first.
///
/// A candidate whose tree cannot be walked is skipped with a warning; only
/// an invalid target fails the scan.
pub fn scan<'a, I>(target: &Asset, candidates: I, config: &ProtectionConfig) -> Result<Vec<ScanMatch>, ProtectionError>
where
    I: IntoIterator<Item = &'a Asset>,
{
    let threshold = config.clamped_threshold();
    let target_fingerprint = fingerprint::compute(target.tree())?;

    let mut matches = Vec::new();
    for candidate in candidates {
        if candidate.id() == target.id() {
            continue;
        }
        let candidate_fingerprint = match fingerprint::compute(candidate.tree()) {
            Ok(fp) => fp,
            Err(e) => {
                warn!(candidate = %candidate.id(), error = %e, "skipping unscannable candidate");
                continue;
            }
        };
        let geometric = if candidate_fingerprint == target_fingerprint { 1.0 } else { 0.0 };
        let watermark = watermark::compare(target.watermark_data(), candidate.watermark_data());
        let report = combine(
            geometric,
            watermark,
            threshold,
            target.creator_name() != candidate.creator_name(),
        );
        if report.decision {
            matches.push(ScanMatch {
                id: candidate.id().to_string(),
                title: candidate.metadata.title.clone(),
                creator_name: candidate.creator_name().to_string(),
                report,
            });
        }
    }

    matches.sort_by(|a, b| b.report.overall.total_cmp(&a.report.overall));
    Ok(matches)
}
