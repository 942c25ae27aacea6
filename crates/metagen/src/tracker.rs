use metagen_lang::{NodeId, NodeTag, Replacement, SyntaxTree};
use rustc_hash::FxHashMap;

/// Maps the tag each node received at snapshot time to where that node lives
/// in the current generation of the tree.
#[derive(Debug, Clone, Default)]
pub struct NodeTracker {
    current: FxHashMap<NodeTag, NodeId>,
}

impl NodeTracker {
    /// Tracks every tagged node of a freshly snapshotted tree.
    pub fn new(tree: &SyntaxTree) -> Self {
        let current = tree
            .preorder()
            .into_iter()
            .filter_map(|id| tree.tag(id).map(|tag| (tag, id)))
            .collect();

        Self { current }
    }

    pub fn resolve(&self, tag: NodeTag) -> Option<NodeId> {
        self.current.get(&tag).copied()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Follows a subtree replacement. When a rewrite duplicates a tagged
    /// node, the first copy in pre-order keeps the identity.
    pub fn apply(&mut self, replacement: &Replacement) {
        for tag in &replacement.removed {
            self.current.remove(tag);
        }

        for (tag, id) in &replacement.inserted {
            self.current.entry(*tag).or_insert(*id);
        }
    }
}
