// crates/schematic-core/src/integrity.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::{fingerprint, watermark};

/// Overall integrity verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityStatus {
    /// Fingerprint and watermark both check out.
    Intact,
    /// At least one check failed.
    Modified,
}

/// Result of [`check_integrity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub fingerprint_valid: bool,
    pub watermark_valid: bool,
}

impl IntegrityReport {
    pub fn status(&self) -> IntegrityStatus {
        if self.fingerprint_valid && self.watermark_valid {
            IntegrityStatus::Intact
        } else {
            IntegrityStatus::Modified
        }
    }

    pub fn is_intact(&self) -> bool {
        self.status() == IntegrityStatus::Intact
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Geometric Hash: {}",
            if self.fingerprint_valid { "VALID" } else { "INVALID" }
        )?;
        writeln!(
            f,
            "Watermark: {}",
            if self.watermark_valid { "VALID" } else { "NOT FOUND OR INVALID" }
        )?;
        match self.status() {
            IntegrityStatus::Intact => write!(f, "Overall Status: INTACT"),
            IntegrityStatus::Modified => write!(f, "Overall Status: MODIFIED"),
        }
    }
}

/// Run both verifiers. Read-only; safe to call repeatedly.
pub fn check_integrity(asset: &Asset) -> IntegrityReport {
    IntegrityReport {
        fingerprint_valid: fingerprint::verify(asset),
        watermark_valid: watermark::verify(asset),
    }
}
