// crates/schematic-core/src/walker.rs
//
// Canonical tree walker: depth-first pre-order traversal producing one
// primitive descriptor per node.

use crate::crypto;
use crate::error::ProtectionError;
use crate::geometry::Vec3;
use crate::tree::{NodeId, SceneTree};

/// Mesh-name substrings recognized as built-in primitives, checked in order.
pub const RECOGNIZED_PRIMITIVES: [&str; 5] = ["Cube", "Sphere", "Cylinder", "Plane", "Capsule"];

/// Type tag for nodes without a mesh.
pub const UNKNOWN_PRIMITIVE: &str = "Unknown";

/// Prefix for meshes that are not a recognized primitive.
pub const CUSTOM_MESH_PREFIX: &str = "CustomMesh:";

/// Per-node attributes collected during a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveDescriptor {
    /// Node this descriptor was taken from.
    pub node: NodeId,
    pub primitive_type: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub material_hash: i32,
    /// Number of direct children.
    pub child_count: usize,
    /// Discovery index of the parent, -1 for the root.
    pub parent_index: i64,
    /// Whether the node carries a mesh reference.
    pub has_mesh: bool,
}

/// Classify a node by its mesh name.
pub fn classify(mesh: Option<&str>) -> String {
    match mesh.filter(|m| !m.trim().is_empty()) {
        None => UNKNOWN_PRIMITIVE.to_string(),
        Some(name) => RECOGNIZED_PRIMITIVES
            .iter()
            .find(|p| name.contains(*p))
            .map(|p| p.to_string())
            .unwrap_or_else(|| format!("{}{}", CUSTOM_MESH_PREFIX, name)),
    }
}

/// Deterministic 32-bit hash of a material name, 0 when absent or empty.
pub fn material_hash(material: Option<&str>) -> i32 {
    match material.filter(|m| !m.is_empty()) {
        None => 0,
        Some(name) => crypto::hash_prefix_u32(name) as i32,
    }
}

/// Walk `tree` depth-first, pre-order, from the root.
///
/// Each node's position in the output is its discovery index. Uses an
/// explicit stack, and rejects cycles, shared children, dangling child ids,
/// and children whose parent link disagrees with the tree shape.
pub fn walk(tree: &SceneTree) -> Result<Vec<PrimitiveDescriptor>, ProtectionError> {
    let root = tree.root();
    if tree.get(root).is_none() {
        return Err(ProtectionError::InvalidTree(format!(
            "root node {} is missing",
            root.0
        )));
    }

    let mut visited = vec![false; tree.capacity()];
    let mut descriptors = Vec::new();
    // (node, parent discovery index, expected parent id)
    let mut stack: Vec<(NodeId, i64, Option<NodeId>)> = vec![(root, -1, None)];

    while let Some((id, parent_index, expected_parent)) = stack.pop() {
        let node = tree.get(id).ok_or_else(|| {
            ProtectionError::InvalidTree(format!("child {} refers to a missing node", id.0))
        })?;
        if visited[id.0] {
            return Err(ProtectionError::InvalidTree(format!(
                "node {} is reachable more than once (cycle or shared child)",
                id.0
            )));
        }
        visited[id.0] = true;
        if node.parent() != expected_parent {
            return Err(ProtectionError::InvalidTree(format!(
                "node {} has a parent link inconsistent with the tree",
                id.0
            )));
        }

        let index = descriptors.len() as i64;
        descriptors.push(PrimitiveDescriptor {
            node: id,
            primitive_type: classify(node.mesh.as_deref()),
            position: node.transform.position,
            rotation: node.transform.rotation,
            scale: node.transform.scale,
            material_hash: material_hash(node.material.as_deref()),
            child_count: node.children().len(),
            parent_index,
            has_mesh: node.mesh.as_deref().map(|m| !m.trim().is_empty()).unwrap_or(false),
        });

        // Reverse so the first child is popped first.
        for &child in node.children().iter().rev() {
            stack.push((child, index, Some(id)));
        }
    }

    Ok(descriptors)
}
