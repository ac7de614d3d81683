// crates/schematic-core/src/protection.rs
//
// Protection workflows composed from the fingerprint and watermark engines.
// The watermark is always embedded before the fingerprint is taken, since
// embedding moves geometry.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::asset::Asset;
use crate::error::ProtectionError;
use crate::{fingerprint, watermark};

/// What [`protect`] did to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectOutcome {
    /// A watermark was embedded during this call.
    pub watermarked: bool,
    /// The fingerprint stored after the call.
    pub fingerprint: String,
}

/// Embed a watermark if none is recorded (or `force_watermark` is set),
/// then recompute the stored fingerprint.
///
/// A forced re-embed goes through [`watermark::regenerate`], so the old
/// container is removed first.
pub fn protect(asset: &mut Asset, force_watermark: bool) -> Result<ProtectOutcome, ProtectionError> {
    let watermarked = if force_watermark {
        watermark::regenerate(asset)?;
        true
    } else if !asset.has_watermark() {
        watermark::apply(asset)?;
        true
    } else {
        false
    };
    let fingerprint = fingerprint::update(asset)?;
    info!(asset = %asset.id(), watermarked, "protection updated");
    Ok(ProtectOutcome {
        watermarked,
        fingerprint,
    })
}

/// Protect every asset missing a fingerprint or a watermark.
/// Returns how many were touched.
///
/// Assets are independent, so callers holding many may instead fan
/// [`protect`] out across threads, one asset per task.
pub fn protect_all(assets: &mut [Asset]) -> Result<usize, ProtectionError> {
    let mut count = 0;
    for asset in assets.iter_mut() {
        if asset.has_fingerprint() && asset.has_watermark() {
            continue;
        }
        protect(asset, false)?;
        count += 1;
    }
    Ok(count)
}

/// Recompute the stored fingerprint of every asset. Returns how many.
pub fn update_all(assets: &mut [Asset]) -> Result<usize, ProtectionError> {
    for asset in assets.iter_mut() {
        fingerprint::update(asset)?;
    }
    Ok(assets.len())
}
