pub mod error;

use error::ParseError;
use itertools::Itertools;
use smol_str::SmolStr;

use crate::{
    lexer::token::{Token, TokenKind},
    range::Range,
    syntax::{SyntaxKind, SyntaxNode},
};

type Result<T> = std::result::Result<T, ParseError>;

const TYPE_KEYWORDS: [&str; 4] = ["class", "record", "struct", "interface"];

const MEMBER_MODIFIERS: [&str; 18] = [
    "abstract", "async", "const", "extern", "file", "internal", "new", "override", "partial", "private", "protected",
    "public", "readonly", "required", "sealed", "static", "unsafe", "virtual",
];

const PARAMETER_MODIFIERS: [&str; 6] = ["this", "params", "ref", "out", "in", "scoped"];

// Words that start an expression and therefore never a local declaration.
const EXPRESSION_KEYWORDS: [&str; 10] = [
    "await", "base", "false", "nameof", "new", "null", "this", "throw", "true", "typeof",
];

/// Recursive-descent parser over a token stream produced by [`crate::Lexer`].
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let range = tokens.last().map(|t| t.range).unwrap_or_default();
            tokens.push(Token {
                range: Range {
                    start: range.end,
                    end: range.end,
                },
                kind: TokenKind::Eof,
            });
        }

        Self { tokens, pos: 0 }
    }

    /// Parses a whole template source file.
    pub fn parse(&mut self) -> Result<SyntaxNode> {
        let children = self.parse_declarations(false)?;
        Ok(SyntaxNode::branch(SyntaxKind::CompilationUnit, children))
    }

    /// Parses a single expression that must span every token.
    pub fn parse_expression_only(&mut self) -> Result<SyntaxNode> {
        let expr = self.parse_expression()?;
        self.expect_eof()?;
        Ok(expr)
    }

    /// Parses a single member declaration that must span every token.
    pub fn parse_member_only(&mut self) -> Result<SyntaxNode> {
        let member = self.parse_member(None)?;
        self.expect_eof()?;
        Ok(member)
    }

    fn expect_eof(&mut self) -> Result<()> {
        if self.peek().is_eof() {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken(self.peek().clone()))
        }
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn at_ident(&self, text: &str) -> bool {
        self.peek().is_ident(text)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> ParseError {
        let token = self.peek().clone();
        if token.is_eof() {
            ParseError::UnexpectedEOFDetected(token)
        } else {
            ParseError::UnexpectedToken(token)
        }
    }

    fn expect(&mut self, kind: TokenKind, description: &'static str) -> Result<Token> {
        if self.at(&kind) {
            return Ok(self.bump());
        }

        let token = self.peek().clone();
        Err(match kind {
            TokenKind::RParen => ParseError::ExpectedClosingParen(token),
            TokenKind::RBrace => ParseError::ExpectedClosingBrace(token),
            TokenKind::RBracket => ParseError::ExpectedClosingBracket(token),
            _ => ParseError::Expected(token, description),
        })
    }

    fn expect_ident(&mut self) -> Result<SmolStr> {
        match self.peek().ident().cloned() {
            Some(ident) => {
                self.bump();
                Ok(ident)
            }
            None => Err(ParseError::Expected(self.peek().clone(), "an identifier")),
        }
    }

    fn parse_qualified_name(&mut self) -> Result<String> {
        let mut name = self.expect_ident()?.to_string();
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    // using, namespace and member declarations up to `}` (nested) or EOF.
    fn parse_declarations(&mut self, nested: bool) -> Result<Vec<SyntaxNode>> {
        let mut nodes = Vec::new();

        loop {
            if self.peek().is_eof() {
                if nested {
                    return Err(ParseError::ExpectedClosingBrace(self.peek().clone()));
                }
                break;
            }

            if nested && self.at(&TokenKind::RBrace) {
                break;
            }

            if self.at_ident("using") {
                nodes.push(self.parse_using()?);
            } else if self.at_ident("namespace") {
                nodes.push(self.parse_namespace()?);
            } else {
                nodes.push(self.parse_member(None)?);
            }
        }

        Ok(nodes)
    }

    fn parse_using(&mut self) -> Result<SyntaxNode> {
        self.bump();

        let text = if self.at_ident("static") {
            self.bump();
            format!("static {}", self.parse_qualified_name()?)
        } else if self.peek_nth(1).kind == TokenKind::Equal {
            let alias = self.expect_ident()?;
            self.bump();
            format!("{} = {}", alias, self.parse_type_text()?)
        } else {
            self.parse_qualified_name()?
        };

        self.expect(TokenKind::SemiColon, "`;`")?;
        Ok(SyntaxNode::leaf(SyntaxKind::UsingDirective, text))
    }

    fn parse_namespace(&mut self) -> Result<SyntaxNode> {
        self.bump();
        let name = self.parse_qualified_name()?;

        if self.eat(&TokenKind::SemiColon) {
            let children = self.parse_declarations(false)?;
            return Ok(SyntaxNode::new(
                SyntaxKind::FileScopedNamespaceDeclaration,
                Some(name.into()),
                children,
            ));
        }

        self.expect(TokenKind::LBrace, "`{`")?;
        let children = self.parse_declarations(true)?;
        self.expect(TokenKind::RBrace, "`}`")?;

        Ok(SyntaxNode::new(
            SyntaxKind::NamespaceDeclaration,
            Some(name.into()),
            children,
        ))
    }

    fn parse_modifiers(&mut self, allowed: &[&str]) -> SyntaxNode {
        let mut modifiers = Vec::new();

        while let Some(ident) = self.peek().ident().cloned() {
            // `new(...)` starts an expression, not a modifier.
            if !allowed.contains(&ident.as_str()) || (ident == "new" && self.peek_nth(1).ident().is_none()) {
                break;
            }
            self.bump();
            modifiers.push(SyntaxNode::leaf(SyntaxKind::Modifier, ident));
        }

        SyntaxNode::branch(SyntaxKind::ModifierList, modifiers)
    }

    fn parse_member(&mut self, enclosing_type: Option<&str>) -> Result<SyntaxNode> {
        let modifiers = self.parse_modifiers(&MEMBER_MODIFIERS);

        if TYPE_KEYWORDS.iter().any(|k| self.at_ident(k)) {
            return self.parse_type_declaration(modifiers);
        }

        if self.at_ident("enum") {
            return self.parse_enum(modifiers);
        }

        if self.at_ident("delegate") {
            return self.parse_delegate(modifiers);
        }

        if enclosing_type.is_some_and(|name| self.at_ident(name)) && self.peek_nth(1).kind == TokenKind::LParen {
            return self.parse_constructor(modifiers);
        }

        let ty = self.parse_type()?;
        let name = self.expect_ident()?;

        match self.peek().kind {
            TokenKind::LParen | TokenKind::Lt => self.parse_method(modifiers, ty, name),
            TokenKind::LBrace | TokenKind::FatArrow => self.parse_property(modifiers, ty, name),
            TokenKind::Equal | TokenKind::SemiColon | TokenKind::Comma => self.parse_field(modifiers, ty, name),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_type_declaration(&mut self, modifiers: SyntaxNode) -> Result<SyntaxNode> {
        let kind = match self.expect_ident()?.as_str() {
            "class" => SyntaxKind::ClassDeclaration,
            "struct" => SyntaxKind::StructDeclaration,
            "interface" => SyntaxKind::InterfaceDeclaration,
            _ => {
                if self.at_ident("class") || self.at_ident("struct") {
                    self.bump();
                }
                SyntaxKind::RecordDeclaration
            }
        };

        let name = self.expect_ident()?;
        let mut children = vec![modifiers];

        if self.at(&TokenKind::Lt) {
            children.push(self.parse_type_parameter_list()?);
        }

        if self.at(&TokenKind::LParen) {
            children.push(self.parse_parameter_list()?);
        }

        if self.eat(&TokenKind::Colon) {
            children.push(self.parse_base_list()?);
        }

        if !self.eat(&TokenKind::SemiColon) {
            self.expect(TokenKind::LBrace, "`{`")?;
            while !self.at(&TokenKind::RBrace) {
                if self.peek().is_eof() {
                    return Err(ParseError::ExpectedClosingBrace(self.peek().clone()));
                }
                children.push(self.parse_member(Some(&name))?);
            }
            self.bump();
            self.eat(&TokenKind::SemiColon);
        }

        Ok(SyntaxNode::new(kind, Some(name), children))
    }

    fn parse_enum(&mut self, modifiers: SyntaxNode) -> Result<SyntaxNode> {
        self.bump();
        let name = self.expect_ident()?;
        let mut children = vec![modifiers];

        if self.eat(&TokenKind::Colon) {
            children.push(self.parse_base_list()?);
        }

        self.expect(TokenKind::LBrace, "`{`")?;
        while !self.at(&TokenKind::RBrace) {
            let member = self.expect_ident()?;
            let value = self.parse_equals_value_opt()?;
            children.push(SyntaxNode::new(
                SyntaxKind::EnumMemberDeclaration,
                Some(member),
                value.into_iter().collect(),
            ));

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;

        Ok(SyntaxNode::new(SyntaxKind::EnumDeclaration, Some(name), children))
    }

    fn parse_delegate(&mut self, modifiers: SyntaxNode) -> Result<SyntaxNode> {
        self.bump();
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let mut children = vec![modifiers, ty];

        if self.at(&TokenKind::Lt) {
            children.push(self.parse_type_parameter_list()?);
        }

        children.push(self.parse_parameter_list()?);
        self.expect(TokenKind::SemiColon, "`;`")?;

        Ok(SyntaxNode::new(SyntaxKind::DelegateDeclaration, Some(name), children))
    }

    fn parse_constructor(&mut self, modifiers: SyntaxNode) -> Result<SyntaxNode> {
        let name = self.expect_ident()?;
        let mut children = vec![modifiers, self.parse_parameter_list()?];
        children.extend(self.parse_body()?);

        Ok(SyntaxNode::new(SyntaxKind::ConstructorDeclaration, Some(name), children))
    }

    fn parse_method(&mut self, modifiers: SyntaxNode, ty: SyntaxNode, name: SmolStr) -> Result<SyntaxNode> {
        let mut children = vec![modifiers, ty];

        if self.at(&TokenKind::Lt) {
            children.push(self.parse_type_parameter_list()?);
        }

        children.push(self.parse_parameter_list()?);
        children.extend(self.parse_body()?);

        Ok(SyntaxNode::new(SyntaxKind::MethodDeclaration, Some(name), children))
    }

    // Block, `=> expr;`, or a bare `;`.
    fn parse_body(&mut self) -> Result<Option<SyntaxNode>> {
        match self.peek().kind {
            TokenKind::LBrace => self.parse_block().map(Some),
            TokenKind::FatArrow => {
                let arrow = self.parse_arrow_clause()?;
                self.expect(TokenKind::SemiColon, "`;`")?;
                Ok(Some(arrow))
            }
            _ => {
                self.expect(TokenKind::SemiColon, "`;`")?;
                Ok(None)
            }
        }
    }

    fn parse_arrow_clause(&mut self) -> Result<SyntaxNode> {
        self.expect(TokenKind::FatArrow, "`=>`")?;
        let expr = self.parse_expression()?;
        Ok(SyntaxNode::branch(SyntaxKind::ArrowExpressionClause, vec![expr]))
    }

    fn parse_property(&mut self, modifiers: SyntaxNode, ty: SyntaxNode, name: SmolStr) -> Result<SyntaxNode> {
        let mut children = vec![modifiers, ty];

        if self.at(&TokenKind::FatArrow) {
            children.push(self.parse_arrow_clause()?);
            self.expect(TokenKind::SemiColon, "`;`")?;
            return Ok(SyntaxNode::new(SyntaxKind::PropertyDeclaration, Some(name), children));
        }

        self.expect(TokenKind::LBrace, "`{`")?;
        let mut accessors = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let accessor_modifiers = self.parse_modifiers(&MEMBER_MODIFIERS);
            let keyword = self.expect_ident()?;
            if !matches!(keyword.as_str(), "get" | "set" | "init") {
                return Err(ParseError::Expected(self.tokens[self.pos - 1].clone(), "`get`, `set` or `init`"));
            }

            let mut accessor_children = vec![accessor_modifiers];
            accessor_children.extend(self.parse_body()?);
            accessors.push(SyntaxNode::new(SyntaxKind::Accessor, Some(keyword), accessor_children));
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        children.push(SyntaxNode::branch(SyntaxKind::AccessorList, accessors));

        if let Some(initializer) = self.parse_equals_value_opt()? {
            children.push(initializer);
            self.expect(TokenKind::SemiColon, "`;`")?;
        }

        Ok(SyntaxNode::new(SyntaxKind::PropertyDeclaration, Some(name), children))
    }

    fn parse_field(&mut self, modifiers: SyntaxNode, ty: SyntaxNode, name: SmolStr) -> Result<SyntaxNode> {
        let declaration = self.parse_variable_declaration(ty, name)?;
        Ok(SyntaxNode::branch(
            SyntaxKind::FieldDeclaration,
            vec![modifiers, declaration],
        ))
    }

    fn parse_variable_declaration(&mut self, ty: SyntaxNode, first: SmolStr) -> Result<SyntaxNode> {
        let mut children = vec![ty];
        let mut name = first;

        loop {
            let value = self.parse_equals_value_opt()?;
            children.push(SyntaxNode::new(
                SyntaxKind::VariableDeclarator,
                Some(name),
                value.into_iter().collect(),
            ));

            if !self.eat(&TokenKind::Comma) {
                break;
            }
            name = self.expect_ident()?;
        }

        self.expect(TokenKind::SemiColon, "`;`")?;
        Ok(SyntaxNode::branch(SyntaxKind::VariableDeclaration, children))
    }

    fn parse_equals_value_opt(&mut self) -> Result<Option<SyntaxNode>> {
        if self.eat(&TokenKind::Equal) {
            let expr = self.parse_expression()?;
            Ok(Some(SyntaxNode::branch(SyntaxKind::EqualsValueClause, vec![expr])))
        } else {
            Ok(None)
        }
    }

    fn parse_type_parameter_list(&mut self) -> Result<SyntaxNode> {
        self.expect(TokenKind::Lt, "`<`")?;
        let mut parameters = vec![SyntaxNode::leaf(SyntaxKind::TypeParameter, self.expect_ident()?)];
        while self.eat(&TokenKind::Comma) {
            parameters.push(SyntaxNode::leaf(SyntaxKind::TypeParameter, self.expect_ident()?));
        }
        self.expect(TokenKind::Gt, "`>`")?;

        Ok(SyntaxNode::branch(SyntaxKind::TypeParameterList, parameters))
    }

    fn parse_parameter_list(&mut self) -> Result<SyntaxNode> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut parameters = Vec::new();

        if !self.at(&TokenKind::RParen) {
            loop {
                parameters.push(self.parse_parameter()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen, "`)`")?;
        Ok(SyntaxNode::branch(SyntaxKind::ParameterList, parameters))
    }

    fn parse_parameter(&mut self) -> Result<SyntaxNode> {
        let modifiers = self.parse_modifiers(&PARAMETER_MODIFIERS);
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let mut children = vec![modifiers, ty];
        children.extend(self.parse_equals_value_opt()?);

        Ok(SyntaxNode::new(SyntaxKind::Parameter, Some(name), children))
    }

    fn parse_base_list(&mut self) -> Result<SyntaxNode> {
        let mut types = vec![self.parse_type()?];
        while self.eat(&TokenKind::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(SyntaxNode::branch(SyntaxKind::BaseList, types))
    }

    fn parse_type(&mut self) -> Result<SyntaxNode> {
        let text = self.parse_type_text()?;
        Ok(SyntaxNode::leaf(SyntaxKind::Type, text))
    }

    // Types are kept as normalized text: `Dictionary<string, object?>`, `int[]`, `(int a, string b)`.
    fn parse_type_text(&mut self) -> Result<String> {
        let mut text = if self.eat(&TokenKind::LParen) {
            let mut elements = Vec::new();
            loop {
                let mut element = self.parse_type_text()?;
                if let Some(name) = self.peek().ident().cloned() {
                    self.bump();
                    element = format!("{} {}", element, name);
                }
                elements.push(element);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "`)`")?;
            format!("({})", elements.join(", "))
        } else {
            self.parse_qualified_name()?
        };

        if self.eat(&TokenKind::Lt) {
            let mut arguments = vec![self.parse_type_text()?];
            while self.eat(&TokenKind::Comma) {
                arguments.push(self.parse_type_text()?);
            }
            self.expect(TokenKind::Gt, "`>`")?;
            text = format!("{}<{}>", text, arguments.iter().join(", "));
        }

        if self.eat(&TokenKind::Question) {
            text.push('?');
        }

        while self.at(&TokenKind::LBracket) && self.peek_nth(1).kind == TokenKind::RBracket {
            self.bump();
            self.bump();
            text.push_str("[]");
        }

        Ok(text)
    }

    fn parse_block(&mut self) -> Result<SyntaxNode> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut statements = Vec::new();

        while !self.at(&TokenKind::RBrace) {
            if self.peek().is_eof() {
                return Err(ParseError::ExpectedClosingBrace(self.peek().clone()));
            }
            statements.push(self.parse_statement()?);
        }

        self.bump();
        Ok(SyntaxNode::branch(SyntaxKind::Block, statements))
    }

    fn parse_statement(&mut self) -> Result<SyntaxNode> {
        if self.at(&TokenKind::LBrace) {
            return self.parse_block();
        }

        if self.at_ident("return") {
            self.bump();
            if self.eat(&TokenKind::SemiColon) {
                return Ok(SyntaxNode::branch(SyntaxKind::ReturnStatement, vec![]));
            }
            let expr = self.parse_expression()?;
            self.expect(TokenKind::SemiColon, "`;`")?;
            return Ok(SyntaxNode::branch(SyntaxKind::ReturnStatement, vec![expr]));
        }

        if self.at_ident("if") {
            return self.parse_if();
        }

        if let Some(declaration) = self.try_parse_local_declaration()? {
            return Ok(declaration);
        }

        let expr = self.parse_expression()?;
        self.expect(TokenKind::SemiColon, "`;`")?;
        Ok(SyntaxNode::branch(SyntaxKind::ExpressionStatement, vec![expr]))
    }

    fn parse_if(&mut self) -> Result<SyntaxNode> {
        self.bump();
        self.expect(TokenKind::LParen, "`(`")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "`)`")?;
        let mut children = vec![condition, self.parse_statement()?];

        if self.at_ident("else") {
            self.bump();
            let statement = self.parse_statement()?;
            children.push(SyntaxNode::branch(SyntaxKind::ElseClause, vec![statement]));
        }

        Ok(SyntaxNode::branch(SyntaxKind::IfStatement, children))
    }

    // `T name = ...;` needs lookahead past a full type, so this backtracks on failure.
    fn try_parse_local_declaration(&mut self) -> Result<Option<SyntaxNode>> {
        if EXPRESSION_KEYWORDS.iter().any(|k| self.at_ident(k)) {
            return Ok(None);
        }

        let start = self.pos;
        let is_declaration = self.parse_type().is_ok()
            && self.peek().ident().is_some()
            && matches!(
                self.peek_nth(1).kind,
                TokenKind::Equal | TokenKind::SemiColon | TokenKind::Comma
            );
        self.pos = start;

        if !is_declaration {
            return Ok(None);
        }

        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let declaration = self.parse_variable_declaration(ty, name)?;

        Ok(Some(SyntaxNode::branch(
            SyntaxKind::LocalDeclarationStatement,
            vec![declaration],
        )))
    }

    pub(crate) fn parse_expression(&mut self) -> Result<SyntaxNode> {
        let left = self.parse_conditional()?;

        let op = match self.peek().kind {
            TokenKind::Equal => "=",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            _ => return Ok(left),
        };
        self.bump();
        let right = self.parse_expression()?;

        Ok(SyntaxNode::new(
            SyntaxKind::AssignmentExpression,
            Some(op.into()),
            vec![left, right],
        ))
    }

    fn parse_conditional(&mut self) -> Result<SyntaxNode> {
        let condition = self.parse_binary(0)?;

        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }

        let when_true = self.parse_expression()?;
        self.expect(TokenKind::Colon, "`:`")?;
        let when_false = self.parse_expression()?;

        Ok(SyntaxNode::branch(
            SyntaxKind::ConditionalExpression,
            vec![condition, when_true, when_false],
        ))
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<SyntaxNode> {
        let mut left = self.parse_unary()?;

        while let Some((op, precedence)) = binary_operator(&self.peek().kind) {
            if precedence < min_precedence {
                break;
            }
            self.bump();

            // `??` is right associative.
            let next = if op == "??" { precedence } else { precedence + 1 };
            let right = self.parse_binary(next)?;
            left = SyntaxNode::new(SyntaxKind::BinaryExpression, Some(op.into()), vec![left, right]);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<SyntaxNode> {
        let op = match self.peek().kind {
            TokenKind::Bang => Some("!"),
            TokenKind::Minus => Some("-"),
            TokenKind::Plus => Some("+"),
            _ => None,
        };

        if let Some(op) = op {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(SyntaxNode::new(
                SyntaxKind::PrefixUnaryExpression,
                Some(op.into()),
                vec![operand],
            ));
        }

        if self.at_ident("await") {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(SyntaxNode::branch(SyntaxKind::AwaitExpression, vec![operand]));
        }

        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_primary(&mut self) -> Result<SyntaxNode> {
        let token = self.peek().clone();

        let node = match &token.kind {
            TokenKind::NumberLiteral(n) => SyntaxNode::leaf(SyntaxKind::NumericLiteral, n.clone()),
            TokenKind::StringLiteral(s) => SyntaxNode::leaf(SyntaxKind::StringLiteral, s.clone()),
            TokenKind::CharLiteral(c) => SyntaxNode::leaf(SyntaxKind::CharLiteral, c.clone()),
            TokenKind::Ident(ident) => match ident.as_str() {
                "true" | "false" => SyntaxNode::leaf(SyntaxKind::BooleanLiteral, ident.clone()),
                "null" => SyntaxNode::leaf(SyntaxKind::NullLiteral, "null"),
                "this" => SyntaxNode::leaf(SyntaxKind::ThisExpression, "this"),
                "new" => return self.parse_new(),
                _ => SyntaxNode::leaf(SyntaxKind::IdentifierName, ident.clone()),
            },
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "`)`")?;
                return Ok(SyntaxNode::branch(SyntaxKind::ParenthesizedExpression, vec![expr]));
            }
            TokenKind::LBracket => {
                let arguments = self.parse_argument_list(TokenKind::LBracket, TokenKind::RBracket)?;
                return Ok(SyntaxNode::branch(SyntaxKind::ImplicitElementAccess, vec![arguments]));
            }
            TokenKind::LBrace => return self.parse_initializer(),
            _ => return Err(self.unexpected()),
        };

        self.bump();
        Ok(node)
    }

    fn parse_postfix(&mut self, mut expr: SyntaxNode) -> Result<SyntaxNode> {
        loop {
            expr = match self.peek().kind {
                TokenKind::Dot => {
                    self.bump();
                    let name = self.expect_ident()?;
                    SyntaxNode::new(SyntaxKind::MemberAccessExpression, Some(name), vec![expr])
                }
                TokenKind::LParen => {
                    let arguments = self.parse_argument_list(TokenKind::LParen, TokenKind::RParen)?;
                    SyntaxNode::branch(SyntaxKind::InvocationExpression, vec![expr, arguments])
                }
                TokenKind::LBracket => {
                    let arguments = self.parse_argument_list(TokenKind::LBracket, TokenKind::RBracket)?;
                    SyntaxNode::branch(SyntaxKind::ElementAccessExpression, vec![expr, arguments])
                }
                _ => return Ok(expr),
            };
        }
    }

    fn parse_argument_list(&mut self, open: TokenKind, close: TokenKind) -> Result<SyntaxNode> {
        let kind = if open == TokenKind::LBracket {
            SyntaxKind::BracketedArgumentList
        } else {
            SyntaxKind::ArgumentList
        };

        self.expect(open, "an argument list")?;
        let mut arguments = Vec::new();

        if !self.at(&close) {
            loop {
                let name = if self.peek().ident().is_some() && self.peek_nth(1).kind == TokenKind::Colon {
                    let name = self.expect_ident()?;
                    self.bump();
                    Some(name)
                } else {
                    None
                };
                let expr = self.parse_expression()?;
                arguments.push(SyntaxNode::new(SyntaxKind::Argument, name, vec![expr]));

                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(close, "a closing delimiter")?;
        Ok(SyntaxNode::branch(kind, arguments))
    }

    fn parse_new(&mut self) -> Result<SyntaxNode> {
        self.bump();

        if self.at(&TokenKind::LParen) {
            let mut children = vec![self.parse_argument_list(TokenKind::LParen, TokenKind::RParen)?];
            if self.at(&TokenKind::LBrace) {
                children.push(self.parse_initializer()?);
            }
            return Ok(SyntaxNode::branch(
                SyntaxKind::ImplicitObjectCreationExpression,
                children,
            ));
        }

        let mut children = vec![self.parse_type()?];
        if self.at(&TokenKind::LParen) {
            children.push(self.parse_argument_list(TokenKind::LParen, TokenKind::RParen)?);
        }
        if self.at(&TokenKind::LBrace) {
            children.push(self.parse_initializer()?);
        }

        Ok(SyntaxNode::branch(SyntaxKind::ObjectCreationExpression, children))
    }

    fn parse_initializer(&mut self) -> Result<SyntaxNode> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut expressions = Vec::new();

        while !self.at(&TokenKind::RBrace) {
            expressions.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::RBrace, "`}`")?;
        Ok(SyntaxNode::branch(SyntaxKind::InitializerExpression, expressions))
    }
}

fn binary_operator(kind: &TokenKind) -> Option<(&'static str, u8)> {
    let op = match kind {
        TokenKind::QuestionQuestion => "??",
        TokenKind::OrOr => "||",
        TokenKind::AndAnd => "&&",
        TokenKind::EqEq => "==",
        TokenKind::NeEq => "!=",
        TokenKind::Lt => "<",
        TokenKind::Gt => ">",
        TokenKind::Lte => "<=",
        TokenKind::Gte => ">=",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Asterisk => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        _ => return None,
    };

    binary_precedence(op).map(|precedence| (op, precedence))
}

/// Binding strength of a binary operator, higher binds tighter.
pub fn binary_precedence(op: &str) -> Option<u8> {
    match op {
        "??" => Some(1),
        "||" => Some(2),
        "&&" => Some(3),
        "==" | "!=" => Some(4),
        "<" | ">" | "<=" | ">=" => Some(5),
        "+" | "-" => Some(6),
        "*" | "/" | "%" => Some(7),
        _ => None,
    }
}
