// crates/schematic-core/src/tree.rs
//
// Arena-backed scene tree. Nodes live in a flat slot vector and reference
// each other by index; removing a subtree clears its slots.

use serde::{Deserialize, Serialize};

use crate::error::ProtectionError;
use crate::geometry::{Transform, Vec3};

/// Index of a node slot inside a [`SceneTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// One element of a schematic's scene tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    /// Name of the attached mesh, if any. Drives primitive classification.
    #[serde(default)]
    pub mesh: Option<String>,
    /// Name of the attached material, if any.
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Hidden from normal hierarchy listings (watermark containers).
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    parent: Option<NodeId>,
    #[serde(default)]
    children: Vec<NodeId>,
}

fn default_active() -> bool {
    true
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            material: None,
            active: true,
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: impl Into<String>) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Ownership tree of [`Node`]s. The root owns its children exclusively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneTree {
    root: NodeId,
    slots: Vec<Option<Node>>,
}

impl SceneTree {
    /// Create a tree whose root is `root`. Any parent/children links on the
    /// given node are discarded.
    pub fn new(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            root: NodeId(0),
            slots: vec![Some(root)],
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of slots ever allocated (live or removed).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Like [`get`](Self::get), but a missing node is an error.
    pub fn node(&self, id: NodeId) -> Result<&Node, ProtectionError> {
        self.get(id).ok_or(ProtectionError::NodeNotFound(id.0))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, ProtectionError> {
        self.get_mut(id).ok_or(ProtectionError::NodeNotFound(id.0))
    }

    /// Append `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, ProtectionError> {
        self.node(parent)?;
        let id = NodeId(self.slots.len());
        node.parent = Some(parent);
        node.children.clear();
        self.slots.push(Some(node));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// First direct child of `parent` named `name`.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.get(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.get(c).map(|n| n.name == name).unwrap_or(false))
    }

    /// Remove `id` and all its descendants. Returns the number of nodes removed.
    ///
    /// The root cannot be removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize, ProtectionError> {
        if id == self.root {
            return Err(ProtectionError::InvalidTree(
                "the root node cannot be removed".to_string(),
            ));
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            // Bounded by the slot count: each slot is emptied at most once.
            if let Some(node) = self.slots.get_mut(current.0).and_then(Option::take) {
                removed += 1;
                stack.extend(node.children);
            }
        }
        Ok(removed)
    }

    /// Replace the child order of `parent` with `order`, which must be a
    /// permutation of its current children.
    pub fn reorder_children(&mut self, parent: NodeId, order: Vec<NodeId>) -> Result<(), ProtectionError> {
        let node = self.node_mut(parent)?;
        let mut current = node.children.clone();
        let mut proposed = order.clone();
        current.sort();
        proposed.sort();
        if current != proposed {
            return Err(ProtectionError::InvalidTree(format!(
                "child order for node {} is not a permutation of its children",
                parent.0
            )));
        }
        node.children = order;
        Ok(())
    }

    /// Slash-joined names from the root down to `id`, root first.
    pub fn path(&self, id: NodeId) -> Result<String, ProtectionError> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            if names.len() > self.slots.len() {
                return Err(ProtectionError::InvalidTree(format!(
                    "parent chain of node {} does not terminate",
                    id.0
                )));
            }
            let node = self.node(cid)?;
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        Ok(names.join("/"))
    }
}
