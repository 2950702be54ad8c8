//! Arena-based document tree
//!
//! Nodes are created detached and wired up with `insert`/`append`.
//! Detached and deleted nodes keep their arena slot; ids are never
//! reused for the lifetime of the tree.

use crate::{ElementData, Node, NodeData, NodeId};

#[derive(Debug, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arena slots (live and tombstoned).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::new(NodeData::Element(ElementData::new(tag))))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(Node::new(NodeData::Text(text.into())))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.into())))
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Ordered child list, comments included.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Ordered children with comment nodes filtered out.
    pub fn content_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(|&c| !self.node(c).is_comment())
    }

    /// Position of `id` in its parent's child list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Insert `child` into `parent`'s child list at `index` (clamped).
    /// The child is detached from any previous parent first.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let len = self.node(parent).children.len();
        let index = index.min(len);
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let end = self.node(parent).children.len();
        self.insert(parent, end, child);
    }

    /// Unlink `child` from its parent. No-op for detached nodes.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node(child).parent {
            self.node_mut(parent).children.retain(|&c| c != child);
            self.node_mut(child).parent = None;
        }
    }

    /// Element descendants of `id` in pre-order, including `id` itself
    /// when it is an element. Text and comment nodes are skipped.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if self.node(cur).is_element() {
                out.push(cur);
                for &c in self.node(cur).children.iter().rev() {
                    stack.push(c);
                }
            }
        }
        out
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    /// Deep structural copy of the subtree rooted at `id`, within this
    /// arena. The copy is detached; attributes (ids included) are
    /// copied verbatim.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let data = self.node(id).data.clone();
        let copy = self.push(Node::new(data));
        let children = self.node(id).children.clone();
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.node_mut(copy).children.push(child_copy);
            self.node_mut(child_copy).parent = Some(copy);
        }
        copy
    }

    /// Deep copy of a subtree living in another arena into this one.
    /// The copy is detached.
    pub fn copy_subtree_from(&mut self, other: &DomTree, id: NodeId) -> NodeId {
        let copy = self.push(Node::new(other.node(id).data.clone()));
        for &child in other.node(id).children() {
            let child_copy = self.copy_subtree_from(other, child);
            self.node_mut(copy).children.push(child_copy);
            self.node_mut(child_copy).parent = Some(copy);
        }
        copy
    }
}
