use slotmap::SlotMap;
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::{
    kind::SyntaxKind,
    node::{NodeTag, SyntaxNode},
};

slotmap::new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone)]
struct Slot {
    kind: SyntaxKind,
    token: Option<SmolStr>,
    children: SmallVec<[NodeId; 4]>,
    parent: Option<NodeId>,
    tag: Option<NodeTag>,
}

/// Outcome of [`SyntaxTree::replace`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replacement {
    /// Id of the root of the inserted subtree.
    pub id: Option<NodeId>,
    /// Tags that lived in the replaced subtree.
    pub removed: Vec<NodeTag>,
    /// Tags carried by the inserted subtree, in pre-order.
    pub inserted: Vec<(NodeTag, NodeId)>,
}

/// Arena form of a working tree. Replacing a subtree only reallocates that
/// subtree; every other id stays valid.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: SlotMap<NodeId, Slot>,
    root: NodeId,
}

impl SyntaxTree {
    /// Loads `root` as is, keeping whatever tags it carries.
    pub fn new(root: &SyntaxNode) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = alloc(&mut nodes, root, None, &mut |_, _| {});
        Self { nodes, root }
    }

    /// Loads `root` and stamps every node with a fresh tag in pre-order.
    pub fn snapshot(root: &SyntaxNode) -> Self {
        let mut tree = Self::new(root);
        let ids = tree.preorder();

        for (index, id) in ids.into_iter().enumerate() {
            if let Some(slot) = tree.nodes.get_mut(id) {
                slot.tag = Some(NodeTag(index as u32));
            }
        }

        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn kind(&self, id: NodeId) -> Option<SyntaxKind> {
        self.nodes.get(id).map(|slot| slot.kind)
    }

    pub fn token(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|slot| slot.token.as_deref())
    }

    pub fn tag(&self, id: NodeId) -> Option<NodeTag> {
        self.nodes.get(id).and_then(|slot| slot.tag)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|slot| slot.children.as_slice()).unwrap_or_default()
    }

    pub fn preorder(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            ids.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }

        ids
    }

    /// Materialises the subtree rooted at `id`.
    pub fn node(&self, id: NodeId) -> Option<SyntaxNode> {
        let slot = self.nodes.get(id)?;
        let children = slot
            .children
            .iter()
            .map(|child| self.node(*child))
            .collect::<Option<Vec<_>>>()?;

        Some(SyntaxNode::with_parts(slot.kind, slot.token.clone(), children, slot.tag))
    }

    pub fn to_node(&self) -> Option<SyntaxNode> {
        self.node(self.root)
    }

    /// Swaps the subtree at `id` for `replacement`, returning `None` when `id` is stale.
    pub fn replace(&mut self, id: NodeId, replacement: &SyntaxNode) -> Option<Replacement> {
        let parent = self.nodes.get(id)?.parent;
        let mut removed = Vec::new();
        self.free(id, &mut removed);

        let mut inserted = Vec::new();
        let new_id = alloc(&mut self.nodes, replacement, parent, &mut |tag, id| inserted.push((tag, id)));

        match parent {
            Some(parent) => {
                let slot = self.nodes.get_mut(parent)?;
                let position = slot.children.iter().position(|child| *child == id)?;
                slot.children[position] = new_id;
            }
            None => self.root = new_id,
        }

        Some(Replacement {
            id: Some(new_id),
            removed,
            inserted,
        })
    }

    fn free(&mut self, id: NodeId, removed: &mut Vec<NodeTag>) {
        if let Some(slot) = self.nodes.remove(id) {
            removed.extend(slot.tag);
            for child in slot.children {
                self.free(child, removed);
            }
        }
    }
}

fn alloc(
    nodes: &mut SlotMap<NodeId, Slot>,
    node: &SyntaxNode,
    parent: Option<NodeId>,
    on_tag: &mut dyn FnMut(NodeTag, NodeId),
) -> NodeId {
    let id = nodes.insert(Slot {
        kind: node.kind(),
        token: node.token_str().cloned(),
        children: SmallVec::new(),
        parent,
        tag: node.tag(),
    });

    if let Some(tag) = node.tag() {
        on_tag(tag, id);
    }

    let children = node
        .children()
        .iter()
        .map(|child| alloc(nodes, child, Some(id), on_tag))
        .collect::<SmallVec<_>>();

    if let Some(slot) = nodes.get_mut(id) {
        slot.children = children;
    }

    id
}
