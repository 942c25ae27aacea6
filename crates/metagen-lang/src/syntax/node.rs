use std::sync::Arc;

use smol_str::SmolStr;

use super::kind::SyntaxKind;

/// Identity stamped on a node when a tree is snapshotted.
///
/// Edits made through the `with_*` family keep the tag of the node they are
/// applied to, so a node can be followed across rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeTag(pub(crate) u32);

impl NodeTag {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct NodeData {
    kind: SyntaxKind,
    token: Option<SmolStr>,
    children: Vec<SyntaxNode>,
    tag: Option<NodeTag>,
}

/// An immutable syntax node. Cloning is cheap and every edit returns a new node.
#[derive(Debug, Clone)]
pub struct SyntaxNode(Arc<NodeData>);

impl PartialEq for SyntaxNode {
    // Structural; tags are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.0.kind == other.0.kind && self.0.token == other.0.token && self.0.children == other.0.children)
    }
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, token: Option<SmolStr>, children: Vec<SyntaxNode>) -> Self {
        Self::with_parts(kind, token, children, None)
    }

    pub fn leaf(kind: SyntaxKind, token: impl Into<SmolStr>) -> Self {
        Self::new(kind, Some(token.into()), Vec::new())
    }

    pub fn branch(kind: SyntaxKind, children: Vec<SyntaxNode>) -> Self {
        Self::new(kind, None, children)
    }

    pub(crate) fn with_parts(
        kind: SyntaxKind,
        token: Option<SmolStr>,
        children: Vec<SyntaxNode>,
        tag: Option<NodeTag>,
    ) -> Self {
        Self(Arc::new(NodeData {
            kind,
            token,
            children,
            tag,
        }))
    }

    #[inline(always)]
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind
    }

    #[inline(always)]
    pub fn token(&self) -> Option<&str> {
        self.0.token.as_deref()
    }

    pub(crate) fn token_str(&self) -> Option<&SmolStr> {
        self.0.token.as_ref()
    }

    #[inline(always)]
    pub fn children(&self) -> &[SyntaxNode] {
        &self.0.children
    }

    #[inline(always)]
    pub fn tag(&self) -> Option<NodeTag> {
        self.0.tag
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &SyntaxNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn child(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.children().iter().find(|c| c.kind() == kind)
    }

    pub fn children_of(&self, kind: SyntaxKind) -> impl Iterator<Item = &SyntaxNode> {
        self.children().iter().filter(move |c| c.kind() == kind)
    }

    /// Pre-order walk over every node below this one.
    pub fn descendants(&self) -> Descendants {
        Descendants {
            stack: self.children().iter().rev().cloned().collect(),
        }
    }

    pub fn descendants_and_self(&self) -> Descendants {
        Descendants {
            stack: vec![self.clone()],
        }
    }

    pub fn first_descendant(&self, kind: SyntaxKind) -> Option<SyntaxNode> {
        self.descendants().find(|n| n.kind() == kind)
    }

    pub fn with_token(&self, token: impl Into<SmolStr>) -> Self {
        Self::with_parts(self.kind(), Some(token.into()), self.0.children.clone(), self.tag())
    }

    pub fn with_children(&self, children: Vec<SyntaxNode>) -> Self {
        Self::with_parts(self.kind(), self.0.token.clone(), children, self.tag())
    }

    pub fn with_tag(&self, tag: Option<NodeTag>) -> Self {
        Self::with_parts(self.kind(), self.0.token.clone(), self.0.children.clone(), tag)
    }

    pub fn push_child(&self, child: SyntaxNode) -> Self {
        let mut children = self.0.children.clone();
        children.push(child);
        self.with_children(children)
    }

    pub fn insert_child(&self, index: usize, child: SyntaxNode) -> Self {
        let mut children = self.0.children.clone();
        children.insert(index.min(children.len()), child);
        self.with_children(children)
    }

    /// Substitutes `target` (matched by reference) anywhere in this subtree.
    pub fn replace(&self, target: &SyntaxNode, replacement: SyntaxNode) -> Self {
        if self.ptr_eq(target) {
            return replacement;
        }

        self.replace_all(|n| n.ptr_eq(target), |_| replacement.clone())
    }

    /// Rewrites every outermost node matching `predicate`. Untouched branches are shared.
    pub fn replace_all<P, F>(&self, predicate: P, f: F) -> Self
    where
        P: Fn(&SyntaxNode) -> bool,
        F: Fn(&SyntaxNode) -> SyntaxNode,
    {
        self.rewrite(&predicate, &f).unwrap_or_else(|| self.clone())
    }

    fn rewrite<P, F>(&self, predicate: &P, f: &F) -> Option<Self>
    where
        P: Fn(&SyntaxNode) -> bool,
        F: Fn(&SyntaxNode) -> SyntaxNode,
    {
        let mut changed = false;
        let children = self
            .children()
            .iter()
            .map(|child| {
                if predicate(child) {
                    changed = true;
                    f(child)
                } else if let Some(rewritten) = child.rewrite(predicate, f) {
                    changed = true;
                    rewritten
                } else {
                    child.clone()
                }
            })
            .collect();

        changed.then(|| self.with_children(children))
    }

    /// Drops `target` (matched by reference) from this subtree.
    pub fn remove(&self, target: &SyntaxNode) -> Self {
        self.remove_where(&|n: &SyntaxNode| n.ptr_eq(target)).unwrap_or_else(|| self.clone())
    }

    fn remove_where(&self, predicate: &dyn Fn(&SyntaxNode) -> bool) -> Option<Self> {
        let mut changed = false;
        let mut children = Vec::with_capacity(self.children().len());

        for child in self.children() {
            if predicate(child) {
                changed = true;
            } else if let Some(rewritten) = child.remove_where(predicate) {
                changed = true;
                children.push(rewritten);
            } else {
                children.push(child.clone());
            }
        }

        changed.then(|| self.with_children(children))
    }

    /// Deep copy with every tag cleared.
    pub fn untagged(&self) -> Self {
        Self::with_parts(
            self.kind(),
            self.0.token.clone(),
            self.children().iter().map(SyntaxNode::untagged).collect(),
            None,
        )
    }

    /// Name of a declaration-like node: types, enums, delegates, methods,
    /// constructors, properties, parameters, variable declarators, and fields
    /// (through their first declarator).
    pub fn declared_name(&self) -> Option<&str> {
        match self.kind() {
            k if k.is_type_declaration() => self.token(),
            SyntaxKind::EnumDeclaration
            | SyntaxKind::DelegateDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::ConstructorDeclaration
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::Parameter
            | SyntaxKind::VariableDeclarator => self.token(),
            SyntaxKind::FieldDeclaration => self
                .child(SyntaxKind::VariableDeclaration)
                .and_then(|d| d.child(SyntaxKind::VariableDeclarator))
                .and_then(|d| d.token()),
            _ => None,
        }
    }

    /// Renames a declaration-like node; other kinds are returned unchanged.
    pub fn with_declared_name(&self, name: impl Into<SmolStr>) -> Self {
        match self.kind() {
            SyntaxKind::FieldDeclaration => {
                let Some(declaration) = self.child(SyntaxKind::VariableDeclaration) else {
                    return self.clone();
                };
                let Some(declarator) = declaration.child(SyntaxKind::VariableDeclarator) else {
                    return self.clone();
                };
                let renamed = declaration.replace(declarator, declarator.with_token(name));
                self.replace(declaration, renamed)
            }
            _ if self.declared_name().is_some() => self.with_token(name),
            _ => self.clone(),
        }
    }
}

pub struct Descendants {
    stack: Vec<SyntaxNode>,
}

impl Iterator for Descendants {
    type Item = SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev().cloned());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn method() -> SyntaxNode {
        SyntaxNode::new(
            SyntaxKind::MethodDeclaration,
            Some("Foo".into()),
            vec![
                SyntaxNode::branch(SyntaxKind::ModifierList, vec![]),
                SyntaxNode::leaf(SyntaxKind::Type, "void"),
                SyntaxNode::branch(
                    SyntaxKind::ParameterList,
                    vec![SyntaxNode::new(
                        SyntaxKind::Parameter,
                        Some("bar".into()),
                        vec![
                            SyntaxNode::branch(SyntaxKind::ModifierList, vec![]),
                            SyntaxNode::leaf(SyntaxKind::Type, "int"),
                        ],
                    )],
                ),
                SyntaxNode::branch(SyntaxKind::Block, vec![]),
            ],
        )
    }

    #[rstest]
    fn test_descendants_preorder(method: SyntaxNode) {
        let kinds = method.descendants().map(|n| n.kind()).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::ModifierList,
                SyntaxKind::Type,
                SyntaxKind::ParameterList,
                SyntaxKind::Parameter,
                SyntaxKind::ModifierList,
                SyntaxKind::Type,
                SyntaxKind::Block,
            ]
        );
        assert_eq!(method.descendants_and_self().count(), 8);
    }

    #[rstest]
    fn test_declared_name(method: SyntaxNode) {
        assert_eq!(method.declared_name(), Some("Foo"));
        let parameter = method.first_descendant(SyntaxKind::Parameter).unwrap();
        assert_eq!(parameter.declared_name(), Some("bar"));
        let block = method.first_descendant(SyntaxKind::Block).unwrap();
        assert_eq!(block.declared_name(), None);
    }

    #[rstest]
    fn test_replace_shares_untouched_branches(method: SyntaxNode) {
        let parameter = method.first_descendant(SyntaxKind::Parameter).unwrap();
        let replaced = method.replace(&parameter, parameter.with_token("lol"));

        assert_eq!(
            replaced.first_descendant(SyntaxKind::Parameter).unwrap().declared_name(),
            Some("lol")
        );
        assert!(replaced.children()[1].ptr_eq(&method.children()[1]));
        assert!(replaced.children()[3].ptr_eq(&method.children()[3]));
        assert_ne!(replaced, method);
    }

    #[rstest]
    fn test_replace_missing_target_is_identity(method: SyntaxNode) {
        let stranger = SyntaxNode::leaf(SyntaxKind::IdentifierName, "x");
        assert_eq!(method.replace(&stranger, stranger.clone()), method);
    }

    #[rstest]
    fn test_remove(method: SyntaxNode) {
        let list = method.first_descendant(SyntaxKind::ParameterList).unwrap();
        let parameter = method.first_descendant(SyntaxKind::Parameter).unwrap();
        let removed = method.remove(&parameter);
        assert!(removed.child(SyntaxKind::ParameterList).unwrap().children().is_empty());
        assert_eq!(list.children().len(), 1);
    }

    #[rstest]
    fn test_with_token_keeps_tag(method: SyntaxNode) {
        let tagged = method.with_tag(Some(NodeTag(7)));
        assert_eq!(tagged.with_token("Bar").tag(), Some(NodeTag(7)));
        assert_eq!(tagged.untagged().tag(), None);
    }

    #[test]
    fn test_field_declared_name() {
        let field = SyntaxNode::branch(
            SyntaxKind::FieldDeclaration,
            vec![
                SyntaxNode::branch(SyntaxKind::ModifierList, vec![]),
                SyntaxNode::branch(
                    SyntaxKind::VariableDeclaration,
                    vec![
                        SyntaxNode::leaf(SyntaxKind::Type, "int"),
                        SyntaxNode::leaf(SyntaxKind::VariableDeclarator, "count"),
                        SyntaxNode::leaf(SyntaxKind::VariableDeclarator, "total"),
                    ],
                ),
            ],
        );

        assert_eq!(field.declared_name(), Some("count"));
        assert_eq!(field.with_declared_name("size").declared_name(), Some("size"));
    }
}
