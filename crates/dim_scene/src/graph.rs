use macaw::IsoTransform;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::arrow::ArrowGlyph;

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`].
    pub struct NodeId;
}

/// A node in the retained scene graph.
///
/// Nodes are plain containers: a parent link, children, a local transform
/// and an optional arrow glyph payload for the host renderer to draw.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,

    /// Transform relative to the parent node (world when there is none).
    pub local_from_parent: IsoTransform,

    pub glyph: Option<ArrowGlyph>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            local_from_parent: IsoTransform::IDENTITY,
            glyph: None,
        }
    }
}

/// Arena-backed scene graph with parent/child links.
///
/// All nodes live in a single slotmap; handles stay cheap to copy and
/// dangling handles simply resolve to `None`.
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> NodeId {
        self.nodes.insert(SceneNode::default())
    }

    pub fn spawn_glyph(&mut self, glyph: ArrowGlyph) -> NodeId {
        self.nodes.insert(SceneNode {
            glyph: Some(glyph),
            ..Default::default()
        })
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn get(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map_or(&[], |n| n.children.as_slice())
    }

    /// Makes `child` a child of `parent`, detaching it from any previous parent first.
    ///
    /// No-op if either handle is stale or if the edge already exists.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) || child == parent {
            return;
        }
        if self.parent(child) == Some(parent) {
            return;
        }
        self.detach(child);

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Severs the parent link of `node`, keeping the subtree alive.
    ///
    /// No-op if the node has no parent or the handle is stale.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[node].parent = None;
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&mut c| c != node);
        }
    }

    /// Removes all children of `node` from the graph (recursively).
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        let children: SmallVec<[NodeId; 4]> = n.children.clone();
        for child in children {
            self.despawn_subtree(child);
        }
    }

    /// Detaches `node` and removes it plus all its descendants from the graph.
    pub fn despawn_subtree(&mut self, node: NodeId) {
        self.detach(node);

        let mut stack: SmallVec<[NodeId; 8]> = smallvec::smallvec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(id) {
                stack.extend(n.children);
            }
        }
    }

    /// Accumulated transform from node-local space up to the graph root.
    ///
    /// Stale handles yield the identity.
    pub fn world_from_node(&self, node: NodeId) -> IsoTransform {
        let mut transform = IsoTransform::IDENTITY;
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.nodes.get(id) else { break };
            transform = n.local_from_parent * transform;
            current = n.parent;
        }
        transform
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
