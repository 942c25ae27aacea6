use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxKind {
    // Structure
    CompilationUnit,
    UsingDirective,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    // Declarations
    ClassDeclaration,
    RecordDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumMemberDeclaration,
    DelegateDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    PropertyDeclaration,
    FieldDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    // Declaration parts
    ModifierList,
    Modifier,
    TypeParameterList,
    TypeParameter,
    ParameterList,
    Parameter,
    BaseList,
    Type,
    AccessorList,
    Accessor,
    ArrowExpressionClause,
    EqualsValueClause,
    // Statements
    Block,
    ReturnStatement,
    ExpressionStatement,
    LocalDeclarationStatement,
    IfStatement,
    ElseClause,
    // Expressions
    NumericLiteral,
    StringLiteral,
    CharLiteral,
    BooleanLiteral,
    NullLiteral,
    IdentifierName,
    ThisExpression,
    MemberAccessExpression,
    InvocationExpression,
    ElementAccessExpression,
    ArgumentList,
    BracketedArgumentList,
    Argument,
    ObjectCreationExpression,
    ImplicitObjectCreationExpression,
    InitializerExpression,
    ImplicitElementAccess,
    AssignmentExpression,
    BinaryExpression,
    PrefixUnaryExpression,
    ConditionalExpression,
    AwaitExpression,
    ParenthesizedExpression,
}

impl SyntaxKind {
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::RecordDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
        )
    }

    /// Kinds that may appear in a type body or directly in a namespace.
    pub fn is_member(self) -> bool {
        self.is_type_declaration()
            || matches!(
                self,
                SyntaxKind::EnumDeclaration
                    | SyntaxKind::DelegateDeclaration
                    | SyntaxKind::MethodDeclaration
                    | SyntaxKind::ConstructorDeclaration
                    | SyntaxKind::PropertyDeclaration
                    | SyntaxKind::FieldDeclaration
            )
    }

    pub fn is_namespace(self) -> bool {
        matches!(
            self,
            SyntaxKind::NamespaceDeclaration | SyntaxKind::FileScopedNamespaceDeclaration
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::ReturnStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::IfStatement
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::BooleanLiteral
                | SyntaxKind::NullLiteral
        )
    }

    pub fn is_expression(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                SyntaxKind::IdentifierName
                    | SyntaxKind::ThisExpression
                    | SyntaxKind::MemberAccessExpression
                    | SyntaxKind::InvocationExpression
                    | SyntaxKind::ElementAccessExpression
                    | SyntaxKind::ObjectCreationExpression
                    | SyntaxKind::ImplicitObjectCreationExpression
                    | SyntaxKind::InitializerExpression
                    | SyntaxKind::ImplicitElementAccess
                    | SyntaxKind::AssignmentExpression
                    | SyntaxKind::BinaryExpression
                    | SyntaxKind::PrefixUnaryExpression
                    | SyntaxKind::ConditionalExpression
                    | SyntaxKind::AwaitExpression
                    | SyntaxKind::ParenthesizedExpression
            )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::CompilationUnit => "CompilationUnit",
            SyntaxKind::UsingDirective => "UsingDirective",
            SyntaxKind::NamespaceDeclaration => "NamespaceDeclaration",
            SyntaxKind::FileScopedNamespaceDeclaration => "FileScopedNamespaceDeclaration",
            SyntaxKind::ClassDeclaration => "ClassDeclaration",
            SyntaxKind::RecordDeclaration => "RecordDeclaration",
            SyntaxKind::StructDeclaration => "StructDeclaration",
            SyntaxKind::InterfaceDeclaration => "InterfaceDeclaration",
            SyntaxKind::EnumDeclaration => "EnumDeclaration",
            SyntaxKind::EnumMemberDeclaration => "EnumMemberDeclaration",
            SyntaxKind::DelegateDeclaration => "DelegateDeclaration",
            SyntaxKind::MethodDeclaration => "MethodDeclaration",
            SyntaxKind::ConstructorDeclaration => "ConstructorDeclaration",
            SyntaxKind::PropertyDeclaration => "PropertyDeclaration",
            SyntaxKind::FieldDeclaration => "FieldDeclaration",
            SyntaxKind::VariableDeclaration => "VariableDeclaration",
            SyntaxKind::VariableDeclarator => "VariableDeclarator",
            SyntaxKind::ModifierList => "ModifierList",
            SyntaxKind::Modifier => "Modifier",
            SyntaxKind::TypeParameterList => "TypeParameterList",
            SyntaxKind::TypeParameter => "TypeParameter",
            SyntaxKind::ParameterList => "ParameterList",
            SyntaxKind::Parameter => "Parameter",
            SyntaxKind::BaseList => "BaseList",
            SyntaxKind::Type => "Type",
            SyntaxKind::AccessorList => "AccessorList",
            SyntaxKind::Accessor => "Accessor",
            SyntaxKind::ArrowExpressionClause => "ArrowExpressionClause",
            SyntaxKind::EqualsValueClause => "EqualsValueClause",
            SyntaxKind::Block => "Block",
            SyntaxKind::ReturnStatement => "ReturnStatement",
            SyntaxKind::ExpressionStatement => "ExpressionStatement",
            SyntaxKind::LocalDeclarationStatement => "LocalDeclarationStatement",
            SyntaxKind::IfStatement => "IfStatement",
            SyntaxKind::ElseClause => "ElseClause",
            SyntaxKind::NumericLiteral => "NumericLiteral",
            SyntaxKind::StringLiteral => "StringLiteral",
            SyntaxKind::CharLiteral => "CharLiteral",
            SyntaxKind::BooleanLiteral => "BooleanLiteral",
            SyntaxKind::NullLiteral => "NullLiteral",
            SyntaxKind::IdentifierName => "IdentifierName",
            SyntaxKind::ThisExpression => "ThisExpression",
            SyntaxKind::MemberAccessExpression => "MemberAccessExpression",
            SyntaxKind::InvocationExpression => "InvocationExpression",
            SyntaxKind::ElementAccessExpression => "ElementAccessExpression",
            SyntaxKind::ArgumentList => "ArgumentList",
            SyntaxKind::BracketedArgumentList => "BracketedArgumentList",
            SyntaxKind::Argument => "Argument",
            SyntaxKind::ObjectCreationExpression => "ObjectCreationExpression",
            SyntaxKind::ImplicitObjectCreationExpression => "ImplicitObjectCreationExpression",
            SyntaxKind::InitializerExpression => "InitializerExpression",
            SyntaxKind::ImplicitElementAccess => "ImplicitElementAccess",
            SyntaxKind::AssignmentExpression => "AssignmentExpression",
            SyntaxKind::BinaryExpression => "BinaryExpression",
            SyntaxKind::PrefixUnaryExpression => "PrefixUnaryExpression",
            SyntaxKind::ConditionalExpression => "ConditionalExpression",
            SyntaxKind::AwaitExpression => "AwaitExpression",
            SyntaxKind::ParenthesizedExpression => "ParenthesizedExpression",
        }
    }
}

impl Display for SyntaxKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}
