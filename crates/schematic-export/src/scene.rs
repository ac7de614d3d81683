// crates/schematic-export/src/scene.rs
//
// Nested JSON rendering of a scene tree for export. Watermark containers
// (`_wm_*` children) are left out, so the body carries geometry but not the
// marker nodes; the offsets embedded in primitive positions stay.

use serde::{Deserialize, Serialize};

use schematic_core::tree::{NodeId, SceneTree};
use schematic_core::watermark::MARKER_ROOT_PREFIX;
use schematic_core::{walker, ProtectionError, Vec3};

use crate::error::ExportError;

/// Material name written when a mesh node has no material.
pub const NO_MATERIAL: &str = "None";

/// An exported component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Component {
    #[serde(rename_all = "camelCase")]
    MeshFilter { mesh_name: String },
    #[serde(rename_all = "camelCase")]
    MeshRenderer { material_name: String },
}

/// One node of the exported scene body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Build the export view of `tree`.
    ///
    /// The tree is walked once first so that cycles and dangling ids are
    /// rejected before the recursive build.
    pub fn from_tree(tree: &SceneTree) -> Result<Self, ExportError> {
        walker::walk(tree)?;
        Ok(build(tree, tree.root())?)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }
}

fn build(tree: &SceneTree, id: NodeId) -> Result<SceneNode, ProtectionError> {
    let node = tree.node(id)?;

    let components = match node.mesh.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(mesh) => vec![
            Component::MeshFilter {
                mesh_name: mesh.to_string(),
            },
            Component::MeshRenderer {
                material_name: node
                    .material
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(NO_MATERIAL)
                    .to_string(),
            },
        ],
        None => Vec::new(),
    };

    let mut children = Vec::with_capacity(node.children().len());
    for &child in node.children() {
        if tree.node(child)?.name.starts_with(MARKER_ROOT_PREFIX) {
            continue;
        }
        children.push(build(tree, child)?);
    }

    Ok(SceneNode {
        name: node.name.clone(),
        position: node.transform.position,
        rotation: node.transform.rotation,
        scale: node.transform.scale,
        components,
        children,
    })
}

/// Pretty-printed scene body, as written after the metadata block.
pub fn scene_body(tree: &SceneTree) -> Result<String, ExportError> {
    let scene = SceneNode::from_tree(tree)?;
    Ok(serde_json::to_string_pretty(&scene)?)
}
