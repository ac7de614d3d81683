// crates/schematic-core/src/fingerprint.rs
//
// Structural fingerprint: SHA-256 over the sorted, rounded primitive
// descriptors of a scene tree.
//
// Canonical line per descriptor:
//   type|x,y,z|rx,ry,rz|sx,sy,sz|material_hash|child_count|parent_index
// Vector components are rounded half away from zero to 3 decimals so that
// float jitter from repeated save/load cycles does not change the digest.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::asset::Asset;
use crate::crypto;
use crate::error::ProtectionError;
use crate::geometry::Vec3;
use crate::tree::SceneTree;
use crate::walker::{self, PrimitiveDescriptor};

/// Decimal digits kept per vector component.
pub const ROUNDING_DECIMALS: i32 = 3;

/// Round to 3 decimals, half away from zero. Negative zero becomes zero.
pub fn round_component(value: f32) -> f64 {
    let scale = 10f64.powi(ROUNDING_DECIMALS);
    let rounded = (f64::from(value) * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn format_vec(v: Vec3) -> String {
    format!(
        "{},{},{}",
        round_component(v.x),
        round_component(v.y),
        round_component(v.z)
    )
}

/// Canonical text line for one descriptor.
pub fn canonical_line(d: &PrimitiveDescriptor) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        d.primitive_type,
        format_vec(d.position),
        format_vec(d.rotation),
        format_vec(d.scale),
        d.material_hash,
        d.child_count,
        d.parent_index
    )
}

/// Ordering: type, then rounded position x, y, z, then the whole canonical
/// line. Every field compared is part of the hashed text, so jitter that
/// rounds away cannot reorder the payload.
fn compare_lines(a: &(PrimitiveDescriptor, String), b: &(PrimitiveDescriptor, String)) -> Ordering {
    let (da, db) = (&a.0, &b.0);
    da.primitive_type
        .cmp(&db.primitive_type)
        .then_with(|| round_component(da.position.x).total_cmp(&round_component(db.position.x)))
        .then_with(|| round_component(da.position.y).total_cmp(&round_component(db.position.y)))
        .then_with(|| round_component(da.position.z).total_cmp(&round_component(db.position.z)))
        .then_with(|| a.1.cmp(&b.1))
}

/// The newline-terminated payload that gets hashed.
pub fn canonical_payload(tree: &SceneTree) -> Result<String, ProtectionError> {
    let mut lines: Vec<(PrimitiveDescriptor, String)> = walker::walk(tree)?
        .into_iter()
        .map(|d| {
            let line = canonical_line(&d);
            (d, line)
        })
        .collect();
    lines.sort_by(compare_lines);

    let mut payload = String::new();
    for (_, line) in &lines {
        payload.push_str(line);
        payload.push('\n');
    }
    Ok(payload)
}

/// Compute the fingerprint of a tree: 64 lowercase hex characters.
pub fn compute(tree: &SceneTree) -> Result<String, ProtectionError> {
    let payload = canonical_payload(tree)?;
    let fingerprint = crypto::hash_hex(payload.as_bytes());
    debug!(
        primitives = payload.lines().count(),
        fingerprint = %fingerprint,
        "computed geometric fingerprint"
    );
    Ok(fingerprint)
}

/// Recompute the asset's fingerprint and store it. Returns the new value.
pub fn update(asset: &mut Asset) -> Result<String, ProtectionError> {
    let fingerprint = compute(asset.tree())?;
    asset.set_geometric_hash(fingerprint.clone());
    Ok(fingerprint)
}

/// `true` iff the stored fingerprint equals a fresh computation.
///
/// Fails closed: an empty stored value or an invalid tree yields `false`.
pub fn verify(asset: &Asset) -> bool {
    if !asset.has_fingerprint() {
        return false;
    }
    match compute(asset.tree()) {
        Ok(current) => current == asset.geometric_hash(),
        Err(e) => {
            warn!(asset = %asset.id(), error = %e, "fingerprint verification failed");
            false
        }
    }
}

/// Binary similarity: 1.0 if both trees fingerprint identically, else 0.0.
pub fn compare(a: &SceneTree, b: &SceneTree) -> Result<f32, ProtectionError> {
    Ok(if compute(a)? == compute(b)? { 1.0 } else { 0.0 })
}
