// crates/schematic-core/src/watermark.rs
//
// Identity-keyed watermarking.
//
// `apply` derives a PCG32 stream from (id, creator name), then:
//   1. inserts a hidden, inactive container `_wm_<first 8 id chars>` under
//      the root holding 3..=6 marker nodes at small random offsets;
//   2. nudges up to 10 randomly chosen mesh nodes by less than 1 mm.
// Every operation is logged in the record:
//   m<i>:<x>,<y>,<z>           marker draw, before the 0.1 scale
//   o:<path>:<dx>,<dy>,<dz>    offset added to the node at <path>
//
// Draw order (must not change): marker count, then x,y,z per marker, then
// per offset target: index, dx, dy, dz.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::asset::Asset;
use crate::crypto;
use crate::error::ProtectionError;
use crate::geometry::Vec3;
use crate::identity::AssetIdentity;
use crate::rng;
use crate::tree::Node;
use crate::walker;

/// Name prefix of the watermark container.
pub const MARKER_ROOT_PREFIX: &str = "_wm_";
/// Name prefix of individual markers inside the container.
pub const MARKER_PREFIX: &str = "_wm_marker_";
/// Marker count is drawn from `[MIN_MARKERS, MAX_MARKERS)`.
pub const MIN_MARKERS: u32 = 3;
pub const MAX_MARKERS: u32 = 7;
/// Scale applied to marker draws to get the local position.
pub const MARKER_SCALE: f32 = 0.1;
/// Upper bound on primitives nudged per application.
pub const MAX_OFFSET_TARGETS: usize = 10;
/// Largest per-axis nudge, in scene units.
pub const MAX_OFFSET: f32 = 0.001;

/// One recorded watermark operation.
#[derive(Debug, Clone, PartialEq)]
pub enum WatermarkOp {
    Marker { index: usize, draw: Vec3 },
    Offset { path: String, delta: Vec3 },
}

impl fmt::Display for WatermarkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatermarkOp::Marker { index, draw } => {
                write!(f, "m{}:{},{},{}", index, draw.x, draw.y, draw.z)
            }
            WatermarkOp::Offset { path, delta } => {
                write!(f, "o:{}:{},{},{}", path, delta.x, delta.y, delta.z)
            }
        }
    }
}

fn parse_vec(text: &str) -> Option<Vec3> {
    let mut parts = text.split(',').map(|p| p.trim().parse::<f32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Vec3::new(x, y, z))
}

impl FromStr for WatermarkOp {
    type Err = ProtectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProtectionError::Serialization(format!("malformed watermark op: {}", s));

        if let Some(rest) = s.strip_prefix("o:") {
            // Node names may contain ':', so split the vector off the end.
            let (path, vec) = rest.rsplit_once(':').ok_or_else(malformed)?;
            let delta = parse_vec(vec).ok_or_else(malformed)?;
            return Ok(WatermarkOp::Offset {
                path: path.to_string(),
                delta,
            });
        }
        if let Some(rest) = s.strip_prefix('m') {
            let (index, vec) = rest.split_once(':').ok_or_else(malformed)?;
            let index = index.parse::<usize>().map_err(|_| malformed())?;
            let draw = parse_vec(vec).ok_or_else(malformed)?;
            return Ok(WatermarkOp::Marker { index, draw });
        }
        Err(malformed())
    }
}

/// 32-bit seed of `id + creator_name`, widened to `u64`.
///
/// Pure: the same pair always yields the same seed.
pub fn seed(id: &str, creator_name: &str) -> u64 {
    let mut key = String::with_capacity(id.len() + creator_name.len());
    key.push_str(id);
    key.push_str(creator_name);
    u64::from(crypto::hash_prefix_u32(&key))
}

/// Name of the watermark container for an identity.
pub fn marker_root_name(identity: &AssetIdentity) -> Result<String, ProtectionError> {
    let short = identity.short_id().ok_or_else(|| {
        ProtectionError::InvalidIdentity(format!(
            "asset id '{}' is shorter than 8 characters",
            identity.id
        ))
    })?;
    Ok(format!("{}{}", MARKER_ROOT_PREFIX, short))
}

/// Embed a watermark into `asset` and return the operation record.
///
/// Mutates the tree (new marker nodes, nudged primitives) and replaces the
/// stored record. Not idempotent: a container left from a previous call is
/// not removed; use [`regenerate`] for a clean re-embed.
pub fn apply(asset: &mut Asset) -> Result<Vec<String>, ProtectionError> {
    let root_name = marker_root_name(asset.identity())?;
    let seed = seed(asset.id(), asset.creator_name());

    // Walk first: validates the tree before anything is mutated, and fixes
    // the offset pool before marker nodes are added.
    let pool: Vec<_> = walker::walk(asset.tree())?
        .into_iter()
        .filter(|d| d.has_mesh)
        .map(|d| d.node)
        .collect();

    let mut rng = rng::seeded(seed);
    let mut ops = Vec::new();
    let tree = asset.tree_mut();
    let root = tree.root();

    let mut container = Node::new(root_name.clone());
    container.hidden = true;
    container.active = false;
    let container = tree.add_child(root, container)?;

    let marker_count = rng::next_in_range(&mut rng, MIN_MARKERS, MAX_MARKERS) as usize;
    for index in 0..marker_count {
        let draw = Vec3::new(
            rng::next_signed_unit(&mut rng),
            rng::next_signed_unit(&mut rng),
            rng::next_signed_unit(&mut rng),
        );
        tree.add_child(
            container,
            Node::new(format!("{}{}", MARKER_PREFIX, index)).at(draw * MARKER_SCALE),
        )?;
        ops.push(WatermarkOp::Marker { index, draw });
    }

    let offset_count = pool.len().min(MAX_OFFSET_TARGETS);
    for _ in 0..offset_count {
        // Repeats are possible; each draw nudges its target again.
        let target = pool[rng::next_below(&mut rng, pool.len() as u32) as usize];
        let delta = Vec3::new(
            rng::next_signed_unit(&mut rng) * MAX_OFFSET,
            rng::next_signed_unit(&mut rng) * MAX_OFFSET,
            rng::next_signed_unit(&mut rng) * MAX_OFFSET,
        );
        let node = tree.node_mut(target)?;
        node.transform.position = node.transform.position + delta;
        let path = tree.path(target)?;
        debug!(path = %path, "applied watermark offset");
        ops.push(WatermarkOp::Offset { path, delta });
    }

    let record: Vec<String> = ops.iter().map(ToString::to_string).collect();
    info!(
        asset = %asset.id(),
        markers = marker_count,
        offsets = offset_count,
        "applied watermark"
    );
    asset.set_watermark_data(record.clone());
    Ok(record)
}

/// Remove every watermark container directly under the root.
/// Returns how many were removed.
pub fn remove_marker_root(asset: &mut Asset) -> Result<usize, ProtectionError> {
    let root_name = marker_root_name(asset.identity())?;
    let tree = asset.tree_mut();
    let root = tree.root();
    let mut removed = 0;
    while let Some(container) = tree.find_child(root, &root_name) {
        tree.remove_subtree(container)?;
        removed += 1;
    }
    Ok(removed)
}

/// Drop any existing container, then apply a fresh watermark.
pub fn regenerate(asset: &mut Asset) -> Result<Vec<String>, ProtectionError> {
    let removed = remove_marker_root(asset)?;
    debug!(asset = %asset.id(), removed, "removed previous watermark containers");
    apply(asset)
}

/// Presence check: a non-empty record and a container directly under the
/// root. Individual markers and offsets are not re-validated.
pub fn verify(asset: &Asset) -> bool {
    if !asset.has_watermark() {
        return false;
    }
    let Ok(root_name) = marker_root_name(asset.identity()) else {
        return false;
    };
    let tree = asset.tree();
    tree.find_child(tree.root(), &root_name).is_some()
}

/// Fraction of operations in `a` that also appear in `b`, over the longer
/// record's length. Each element of `a` counts at most once, but several
/// equal elements of `a` may all match the same element of `b`.
pub fn compare(a: &[String], b: &[String]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matches = a.iter().filter(|op| b.contains(op)).count();
    matches as f32 / a.len().max(b.len()) as f32
}

/// Parse a stored record. Unparseable entries are reported as errors.
pub fn parse_record(record: &[String]) -> Result<Vec<WatermarkOp>, ProtectionError> {
    record.iter().map(|op| op.parse()).collect()
}
