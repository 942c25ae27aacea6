//! Typed views over [`SyntaxNode`].
//!
//! A view is a zero-cost wrapper that checks the node kind once and then
//! offers kind-specific accessors and edits. Every edit returns a new view
//! and keeps the tracking tag of the wrapped node.

use smol_str::SmolStr;

use crate::syntax::{SyntaxKind, SyntaxNode};

pub trait AstNode: Sized {
    /// Human readable kind name used in diagnostics.
    const KIND_NAME: &'static str;

    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(syntax: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;

    fn into_syntax(self) -> SyntaxNode;
}

impl AstNode for SyntaxNode {
    const KIND_NAME: &'static str = "SyntaxNode";

    fn can_cast(_: SyntaxKind) -> bool {
        true
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        Some(syntax)
    }

    fn syntax(&self) -> &SyntaxNode {
        self
    }

    fn into_syntax(self) -> SyntaxNode {
        self
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, |$kind:ident| $can_cast:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            const KIND_NAME: &'static str = stringify!($name);

            fn can_cast($kind: SyntaxKind) -> bool {
                $can_cast
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then(|| Self(syntax))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }

            fn into_syntax(self) -> SyntaxNode {
                self.0
            }
        }

        impl From<$name> for SyntaxNode {
            fn from(node: $name) -> SyntaxNode {
                node.0
            }
        }
    };
}

ast_node!(
    /// `class`, `record`, `struct` or `interface`.
    TypeDeclaration,
    |kind| kind.is_type_declaration()
);
ast_node!(
    /// Any declaration that can appear in a type body.
    MemberDeclaration,
    |kind| kind.is_member()
);
ast_node!(MethodDeclaration, |kind| kind == SyntaxKind::MethodDeclaration);
ast_node!(ConstructorDeclaration, |kind| kind == SyntaxKind::ConstructorDeclaration);
ast_node!(PropertyDeclaration, |kind| kind == SyntaxKind::PropertyDeclaration);
ast_node!(FieldDeclaration, |kind| kind == SyntaxKind::FieldDeclaration);
ast_node!(EnumDeclaration, |kind| kind == SyntaxKind::EnumDeclaration);
ast_node!(DelegateDeclaration, |kind| kind == SyntaxKind::DelegateDeclaration);
ast_node!(Parameter, |kind| kind == SyntaxKind::Parameter);
ast_node!(VariableDeclarator, |kind| kind == SyntaxKind::VariableDeclarator);
ast_node!(Block, |kind| kind == SyntaxKind::Block);
ast_node!(ReturnStatement, |kind| kind == SyntaxKind::ReturnStatement);
ast_node!(InitializerExpression, |kind| kind == SyntaxKind::InitializerExpression);

fn modifiers(node: &SyntaxNode) -> Vec<SmolStr> {
    node.child(SyntaxKind::ModifierList)
        .map(|list| list.children().iter().filter_map(|m| m.token().map(SmolStr::new)).collect())
        .unwrap_or_default()
}

fn type_text(node: &SyntaxNode) -> Option<&str> {
    node.child(SyntaxKind::Type).and_then(SyntaxNode::token)
}

fn parameters(node: &SyntaxNode) -> Vec<Parameter> {
    node.child(SyntaxKind::ParameterList)
        .map(|list| list.children().iter().cloned().filter_map(Parameter::cast).collect())
        .unwrap_or_default()
}

fn replace_child(node: &SyntaxNode, kind: SyntaxKind, replacement: SyntaxNode) -> SyntaxNode {
    match node.child(kind) {
        Some(child) => node.replace(child, replacement),
        None => node.push_child(replacement),
    }
}

impl TypeDeclaration {
    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_token(name))
    }

    pub fn is_record(&self) -> bool {
        self.0.kind() == SyntaxKind::RecordDeclaration
    }

    pub fn modifiers(&self) -> Vec<SmolStr> {
        modifiers(&self.0)
    }

    /// Primary-constructor parameters.
    pub fn parameters(&self) -> Vec<Parameter> {
        parameters(&self.0)
    }

    pub fn base_types(&self) -> Vec<&str> {
        self.0
            .child(SyntaxKind::BaseList)
            .map(|list| list.children().iter().filter_map(SyntaxNode::token).collect())
            .unwrap_or_default()
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        self.0.children().iter().cloned().filter_map(MemberDeclaration::cast)
    }

    /// Appends a primary-constructor parameter, creating the list when missing.
    pub fn add_parameter(&self, parameter: Parameter) -> Self {
        if let Some(list) = self.0.child(SyntaxKind::ParameterList) {
            return Self(self.0.replace(list, list.push_child(parameter.into_syntax())));
        }

        let index = self
            .0
            .children()
            .iter()
            .take_while(|c| matches!(c.kind(), SyntaxKind::ModifierList | SyntaxKind::TypeParameterList))
            .count();
        let list = SyntaxNode::branch(SyntaxKind::ParameterList, vec![parameter.into_syntax()]);

        Self(self.0.insert_child(index, list))
    }

    pub fn add_member(&self, member: impl Into<SyntaxNode>) -> Self {
        Self(self.0.push_child(member.into()))
    }
}

impl MemberDeclaration {
    pub fn name(&self) -> Option<&str> {
        self.0.declared_name()
    }

    pub fn modifiers(&self) -> Vec<SmolStr> {
        modifiers(&self.0)
    }
}

impl MethodDeclaration {
    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_token(name))
    }

    pub fn return_type(&self) -> Option<&str> {
        type_text(&self.0)
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        parameters(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.child(SyntaxKind::Block).cloned().and_then(Block::cast)
    }

    /// The expression after `=>` for expression-bodied methods.
    pub fn expression_body(&self) -> Option<&SyntaxNode> {
        self.0
            .child(SyntaxKind::ArrowExpressionClause)
            .and_then(|arrow| arrow.children().first())
    }

    pub fn with_body(&self, body: Block) -> Self {
        let without_arrow = match self.0.child(SyntaxKind::ArrowExpressionClause) {
            Some(arrow) => self.0.remove(arrow),
            None => self.0.clone(),
        };
        Self(replace_child(&without_arrow, SyntaxKind::Block, body.into_syntax()))
    }

    /// First initializer found anywhere in the method.
    pub fn initializer(&self) -> Option<InitializerExpression> {
        self.0
            .first_descendant(SyntaxKind::InitializerExpression)
            .and_then(InitializerExpression::cast)
    }
}

impl ConstructorDeclaration {
    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        parameters(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        self.0.child(SyntaxKind::Block).cloned().and_then(Block::cast)
    }
}

impl PropertyDeclaration {
    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_token(name))
    }

    pub fn type_name(&self) -> Option<&str> {
        type_text(&self.0)
    }

    pub fn initializer(&self) -> Option<&SyntaxNode> {
        self.0
            .child(SyntaxKind::EqualsValueClause)
            .and_then(|clause| clause.children().first())
    }
}

impl FieldDeclaration {
    pub fn type_name(&self) -> Option<&str> {
        self.0.child(SyntaxKind::VariableDeclaration).and_then(type_text)
    }

    pub fn declarators(&self) -> Vec<VariableDeclarator> {
        self.0
            .child(SyntaxKind::VariableDeclaration)
            .map(|d| d.children().iter().cloned().filter_map(VariableDeclarator::cast).collect())
            .unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.declared_name()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_declared_name(name))
    }
}

impl EnumDeclaration {
    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_token(name))
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.0
            .children_of(SyntaxKind::EnumMemberDeclaration)
            .filter_map(SyntaxNode::token)
            .collect()
    }

    pub fn add_member(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.push_child(SyntaxNode::leaf(SyntaxKind::EnumMemberDeclaration, name)))
    }
}

impl DelegateDeclaration {
    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_token(name))
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        parameters(&self.0)
    }
}

impl Parameter {
    pub fn new(type_text: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self(SyntaxNode::new(
            SyntaxKind::Parameter,
            Some(name.into()),
            vec![
                SyntaxNode::branch(SyntaxKind::ModifierList, vec![]),
                SyntaxNode::leaf(SyntaxKind::Type, type_text),
            ],
        ))
    }

    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_token(name))
    }

    pub fn type_name(&self) -> Option<&str> {
        type_text(&self.0)
    }

    pub fn with_type(&self, type_name: impl Into<SmolStr>) -> Self {
        Self(replace_child(
            &self.0,
            SyntaxKind::Type,
            SyntaxNode::leaf(SyntaxKind::Type, type_name),
        ))
    }
}

impl VariableDeclarator {
    pub fn name(&self) -> &str {
        self.0.token().unwrap_or_default()
    }

    pub fn with_name(&self, name: impl Into<SmolStr>) -> Self {
        Self(self.0.with_token(name))
    }

    pub fn initializer(&self) -> Option<&SyntaxNode> {
        self.0
            .child(SyntaxKind::EqualsValueClause)
            .and_then(|clause| clause.children().first())
    }
}

impl Block {
    pub fn statements(&self) -> &[SyntaxNode] {
        self.0.children()
    }

    pub fn add_statement(&self, statement: SyntaxNode) -> Self {
        Self(self.0.push_child(statement))
    }

    /// First `return` directly in this block.
    pub fn return_statement(&self) -> Option<ReturnStatement> {
        self.0
            .child(SyntaxKind::ReturnStatement)
            .cloned()
            .and_then(ReturnStatement::cast)
    }

    pub fn replace_statement(&self, old: &ReturnStatement, new: ReturnStatement) -> Self {
        Self(self.0.replace(old.syntax(), new.into_syntax()))
    }
}

impl ReturnStatement {
    pub fn expression(&self) -> Option<&SyntaxNode> {
        self.0.children().first()
    }

    pub fn with_expression(&self, expression: SyntaxNode) -> Self {
        Self(self.0.with_children(vec![expression]))
    }
}

impl InitializerExpression {
    pub fn expressions(&self) -> &[SyntaxNode] {
        self.0.children()
    }

    pub fn add_expression(&self, expression: SyntaxNode) -> Self {
        Self(self.0.push_child(expression))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{make, parse};

    fn record() -> TypeDeclaration {
        let unit = parse(
            r#"
            public record MyApiRequestDto(string Id)
            {
                public int SumTwoNumbers()
                {
                    return 0;
                }

                public Dictionary<string, object?> ToDictionary()
                    => new()
                    {
                    };
            }
            "#,
        )
        .unwrap();
        TypeDeclaration::cast(unit.children()[0].clone()).unwrap()
    }

    #[rstest]
    #[case::method(SyntaxKind::MethodDeclaration, true)]
    #[case::field(SyntaxKind::FieldDeclaration, true)]
    #[case::record(SyntaxKind::RecordDeclaration, true)]
    #[case::block(SyntaxKind::Block, false)]
    #[case::parameter(SyntaxKind::Parameter, false)]
    fn test_member_can_cast(#[case] kind: SyntaxKind, #[case] expected: bool) {
        assert_eq!(MemberDeclaration::can_cast(kind), expected);
        assert!(SyntaxNode::can_cast(kind));
    }

    #[test]
    fn test_type_declaration_edits() {
        let record = record();
        assert_eq!(record.name(), "MyApiRequestDto");
        assert!(record.is_record());

        let renamed = record
            .with_name("ProductRequest")
            .add_parameter(make::parameter("String", "Name"));

        assert_eq!(renamed.name(), "ProductRequest");
        assert_eq!(
            renamed.parameters().iter().map(Parameter::name).collect::<Vec<_>>(),
            vec!["Id", "Name"]
        );
        assert_eq!(renamed.parameters()[1].type_name(), Some("String"));
        assert_eq!(renamed.members().count(), 2);
    }

    #[test]
    fn test_add_parameter_creates_list() {
        let class = parse("public class Foo { }").unwrap().children()[0].clone();
        let class = TypeDeclaration::cast(class).unwrap().add_parameter(make::parameter("int", "x"));

        assert_eq!(class.syntax().children()[1].kind(), SyntaxKind::ParameterList);
        assert_eq!(class.parameters().len(), 1);
    }

    #[test]
    fn test_method_views() {
        let record = record();
        let methods = record
            .members()
            .filter_map(|m| MethodDeclaration::cast(m.into_syntax()))
            .collect::<Vec<_>>();

        let sum = &methods[0];
        assert_eq!(sum.return_type(), Some("int"));
        let body = sum.body().unwrap();
        let ret = body.return_statement().unwrap();
        assert_eq!(ret.expression().and_then(SyntaxNode::token), Some("0"));

        let to_dictionary = &methods[1];
        assert!(to_dictionary.body().is_none());
        assert_eq!(
            to_dictionary.expression_body().map(SyntaxNode::kind),
            Some(SyntaxKind::ImplicitObjectCreationExpression)
        );
        assert!(to_dictionary.initializer().unwrap().expressions().is_empty());
    }

    #[test]
    fn test_with_body_replaces_arrow() {
        let record = record();
        let to_dictionary = record
            .members()
            .filter_map(|m| MethodDeclaration::cast(m.into_syntax()))
            .nth(1)
            .unwrap();

        let body = Block::cast(SyntaxNode::branch(SyntaxKind::Block, vec![])).unwrap();
        let method = to_dictionary.with_body(body);

        assert!(method.expression_body().is_none());
        assert!(method.body().is_some());
    }
}
