use itertools::Itertools;
use metagen_lang::{SyntaxKind, SyntaxNode};

#[cfg(target_os = "windows")]
const NEW_LINE: &str = "\r\n";
#[cfg(not(target_os = "windows"))]
const NEW_LINE: &str = "\n";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// The host platform's separator.
    #[default]
    Native,
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Native => NEW_LINE,
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormatterConfig {
    pub indent_width: usize,
    pub line_ending: LineEnding,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            line_ending: LineEnding::Native,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Formatter {
    config: FormatterConfig,
    output: String,
}

impl Formatter {
    pub fn new(config: Option<FormatterConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
            output: String::new(),
        }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    #[allow(clippy::result_large_err)]
    pub fn format(&mut self, code: &str) -> Result<String, metagen_lang::Error> {
        if code.trim().is_empty() {
            return Ok(String::new());
        }

        let unit = metagen_lang::parse(code)?;
        Ok(self.format_syntax(&unit))
    }

    /// Renders any node at indentation level zero.
    pub fn format_syntax(&mut self, node: &SyntaxNode) -> String {
        self.output.clear();
        self.format_node(node, 0);

        let line_ending = self.config.line_ending.as_str();
        let mut result = String::with_capacity(self.output.len());

        for (i, line) in self.output.lines().enumerate() {
            if i > 0 {
                result.push_str(line_ending);
            }
            result.push_str(line.trim_end());
        }

        if self.output.ends_with('\n') {
            result.push_str(line_ending);
        }

        result
    }

    fn format_node(&mut self, node: &SyntaxNode, indent_level: usize) {
        match node.kind() {
            SyntaxKind::CompilationUnit => self.format_compilation_unit(node),
            SyntaxKind::UsingDirective => self.format_using(node, indent_level),
            SyntaxKind::NamespaceDeclaration => self.format_namespace(node, indent_level),
            SyntaxKind::FileScopedNamespaceDeclaration => self.format_file_scoped_namespace(node, indent_level),
            kind if kind.is_type_declaration() => self.format_type_declaration(node, indent_level),
            SyntaxKind::EnumDeclaration => self.format_enum(node, indent_level),
            SyntaxKind::DelegateDeclaration => self.format_delegate(node, indent_level),
            SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration => {
                self.format_method(node, indent_level)
            }
            SyntaxKind::PropertyDeclaration => self.format_property(node, indent_level),
            SyntaxKind::FieldDeclaration => {
                self.append_indent(indent_level);
                self.append_modifiers(node);
                if let Some(declaration) = node.child(SyntaxKind::VariableDeclaration) {
                    self.format_variable_declaration(declaration);
                }
                self.output.push(';');
            }
            kind if kind.is_statement() => self.format_statement(node, indent_level),
            SyntaxKind::ElseClause => {
                self.append_indent(indent_level);
                self.output.push_str("else");
                if let Some(statement) = node.children().first() {
                    self.append_newline();
                    self.format_embedded_statement(statement, indent_level);
                }
            }
            kind if kind.is_expression() => {
                self.append_indent(indent_level);
                self.format_expr(node);
            }
            _ => {
                self.append_indent(indent_level);
                self.format_part(node);
            }
        }
    }

    fn format_compilation_unit(&mut self, node: &SyntaxNode) {
        let (usings, members): (Vec<_>, Vec<_>) = node
            .children()
            .iter()
            .partition(|c| c.kind() == SyntaxKind::UsingDirective);

        self.format_usings_and_members(&usings, &members, 0);
    }

    fn format_usings_and_members(&mut self, usings: &[&SyntaxNode], members: &[&SyntaxNode], indent_level: usize) {
        for using in usings {
            self.format_using(using, indent_level);
            self.append_newline();
        }

        for (i, member) in members.iter().enumerate() {
            if i > 0 || !usings.is_empty() {
                self.append_newline();
            }
            self.format_node(member, indent_level);
            self.append_newline();
        }

        if !usings.is_empty() || !members.is_empty() {
            self.output.pop();
        }
    }

    fn format_using(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.output.push_str("using ");
        self.output.push_str(node.token().unwrap_or_default());
        self.output.push(';');
    }

    fn format_namespace(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.output.push_str("namespace ");
        self.output.push_str(node.token().unwrap_or_default());
        self.append_newline();
        self.append_indent(indent_level);
        self.output.push('{');
        self.append_newline();

        let (usings, members): (Vec<_>, Vec<_>) = node
            .children()
            .iter()
            .partition(|c| c.kind() == SyntaxKind::UsingDirective);

        if !usings.is_empty() || !members.is_empty() {
            self.format_usings_and_members(&usings, &members, indent_level + 1);
            self.append_newline();
        }

        self.append_indent(indent_level);
        self.output.push('}');
    }

    fn format_file_scoped_namespace(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.output.push_str("namespace ");
        self.output.push_str(node.token().unwrap_or_default());
        self.output.push(';');

        let (usings, members): (Vec<_>, Vec<_>) = node
            .children()
            .iter()
            .partition(|c| c.kind() == SyntaxKind::UsingDirective);

        if !usings.is_empty() || !members.is_empty() {
            self.append_newline();
            self.append_newline();
            self.format_usings_and_members(&usings, &members, indent_level);
        }
    }

    fn format_type_declaration(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.append_modifiers(node);
        self.output.push_str(match node.kind() {
            SyntaxKind::ClassDeclaration => "class ",
            SyntaxKind::StructDeclaration => "struct ",
            SyntaxKind::InterfaceDeclaration => "interface ",
            _ => "record ",
        });
        self.output.push_str(node.token().unwrap_or_default());

        for part in node.children().iter().filter(|c| !c.kind().is_member()) {
            match part.kind() {
                SyntaxKind::TypeParameterList | SyntaxKind::ParameterList | SyntaxKind::BaseList => {
                    self.format_part(part)
                }
                _ => {}
            }
        }

        let members = node.children().iter().filter(|c| c.kind().is_member()).collect::<Vec<_>>();

        // `record Foo(string Id);`
        if members.is_empty()
            && node.kind() == SyntaxKind::RecordDeclaration
            && node.child(SyntaxKind::ParameterList).is_some()
        {
            self.output.push(';');
            return;
        }

        self.format_member_body(&members, indent_level);
    }

    fn format_member_body(&mut self, members: &[&SyntaxNode], indent_level: usize) {
        self.append_newline();
        self.append_indent(indent_level);
        self.output.push('{');
        self.append_newline();

        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.append_newline();
            }
            self.format_node(member, indent_level + 1);
            self.append_newline();
        }

        self.append_indent(indent_level);
        self.output.push('}');
    }

    fn format_enum(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.append_modifiers(node);
        self.output.push_str("enum ");
        self.output.push_str(node.token().unwrap_or_default());
        if let Some(base) = node.child(SyntaxKind::BaseList) {
            self.format_part(base);
        }

        self.append_newline();
        self.append_indent(indent_level);
        self.output.push('{');
        self.append_newline();

        let members = node.children_of(SyntaxKind::EnumMemberDeclaration).collect::<Vec<_>>();
        for (i, member) in members.iter().enumerate() {
            self.append_indent(indent_level + 1);
            self.output.push_str(member.token().unwrap_or_default());
            if let Some(value) = member.child(SyntaxKind::EqualsValueClause) {
                self.format_part(value);
            }
            if i + 1 < members.len() {
                self.output.push(',');
            }
            self.append_newline();
        }

        self.append_indent(indent_level);
        self.output.push('}');
    }

    fn format_delegate(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.append_modifiers(node);
        self.output.push_str("delegate ");
        self.format_signature(node);
        self.output.push(';');
    }

    // Return type, name, type parameters and parameters.
    fn format_signature(&mut self, node: &SyntaxNode) {
        if let Some(ty) = node.child(SyntaxKind::Type) {
            self.output.push_str(ty.token().unwrap_or_default());
            self.output.push(' ');
        }
        self.output.push_str(node.token().unwrap_or_default());

        if let Some(type_parameters) = node.child(SyntaxKind::TypeParameterList) {
            self.format_part(type_parameters);
        }

        match node.child(SyntaxKind::ParameterList) {
            Some(parameters) => self.format_part(parameters),
            None => self.output.push_str("()"),
        }
    }

    fn format_method(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.append_modifiers(node);
        self.format_signature(node);
        self.format_body(node, indent_level);
    }

    fn format_body(&mut self, node: &SyntaxNode, indent_level: usize) {
        if let Some(block) = node.child(SyntaxKind::Block) {
            self.append_newline();
            self.format_block(block, indent_level);
        } else if let Some(arrow) = node.child(SyntaxKind::ArrowExpressionClause) {
            self.append_newline();
            self.append_indent(indent_level + 1);
            self.format_part(arrow);
            self.output.push(';');
        } else {
            self.output.push(';');
        }
    }

    fn format_property(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.append_modifiers(node);
        self.format_signature_without_parameters(node);

        if let Some(arrow) = node.child(SyntaxKind::ArrowExpressionClause) {
            self.append_newline();
            self.append_indent(indent_level + 1);
            self.format_part(arrow);
            self.output.push(';');
            return;
        }

        if let Some(accessors) = node.child(SyntaxKind::AccessorList) {
            let multiline = accessors.descendants().any(|n| n.kind() == SyntaxKind::Block);

            if multiline {
                self.append_newline();
                self.append_indent(indent_level);
                self.output.push('{');
                self.append_newline();
                for accessor in accessors.children() {
                    self.append_indent(indent_level + 1);
                    self.append_modifiers(accessor);
                    self.output.push_str(accessor.token().unwrap_or_default());
                    self.format_body(accessor, indent_level + 1);
                    self.append_newline();
                }
                self.append_indent(indent_level);
                self.output.push('}');
            } else {
                self.output.push(' ');
                self.format_part(accessors);
            }
        }

        if let Some(initializer) = node.child(SyntaxKind::EqualsValueClause) {
            self.format_part(initializer);
            self.output.push(';');
        }
    }

    fn format_signature_without_parameters(&mut self, node: &SyntaxNode) {
        if let Some(ty) = node.child(SyntaxKind::Type) {
            self.output.push_str(ty.token().unwrap_or_default());
            self.output.push(' ');
        }
        self.output.push_str(node.token().unwrap_or_default());
    }

    fn format_variable_declaration(&mut self, node: &SyntaxNode) {
        if let Some(ty) = node.child(SyntaxKind::Type) {
            self.output.push_str(ty.token().unwrap_or_default());
            self.output.push(' ');
        }

        for (i, declarator) in node.children_of(SyntaxKind::VariableDeclarator).enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(declarator.token().unwrap_or_default());
            if let Some(value) = declarator.child(SyntaxKind::EqualsValueClause) {
                self.format_part(value);
            }
        }
    }

    fn format_block(&mut self, node: &SyntaxNode, indent_level: usize) {
        self.append_indent(indent_level);
        self.output.push('{');
        self.append_newline();

        for statement in node.children() {
            self.format_statement(statement, indent_level + 1);
            self.append_newline();
        }

        self.append_indent(indent_level);
        self.output.push('}');
    }

    fn format_statement(&mut self, node: &SyntaxNode, indent_level: usize) {
        match node.kind() {
            SyntaxKind::Block => self.format_block(node, indent_level),
            SyntaxKind::ReturnStatement => {
                self.append_indent(indent_level);
                self.output.push_str("return");
                if let Some(expr) = node.children().first() {
                    self.output.push(' ');
                    self.format_expr(expr);
                }
                self.output.push(';');
            }
            SyntaxKind::ExpressionStatement => {
                self.append_indent(indent_level);
                if let Some(expr) = node.children().first() {
                    self.format_expr(expr);
                }
                self.output.push(';');
            }
            SyntaxKind::LocalDeclarationStatement => {
                self.append_indent(indent_level);
                if let Some(declaration) = node.child(SyntaxKind::VariableDeclaration) {
                    self.format_variable_declaration(declaration);
                }
                self.output.push(';');
            }
            SyntaxKind::IfStatement => {
                self.append_indent(indent_level);
                self.format_if(node, indent_level);
            }
            _ => self.format_node(node, indent_level),
        }
    }

    // Assumes the indent for the `if` line has already been written.
    fn format_if(&mut self, node: &SyntaxNode, indent_level: usize) {
        let [condition, statement, rest @ ..] = node.children() else {
            return;
        };

        self.output.push_str("if (");
        self.format_expr(condition);
        self.output.push(')');
        self.append_newline();
        self.format_embedded_statement(statement, indent_level);

        if let Some(else_clause) = rest.first() {
            self.append_newline();
            self.append_indent(indent_level);
            self.output.push_str("else");

            match else_clause.children().first() {
                Some(nested) if nested.kind() == SyntaxKind::IfStatement => {
                    self.output.push(' ');
                    self.format_if(nested, indent_level);
                }
                Some(statement) => {
                    self.append_newline();
                    self.format_embedded_statement(statement, indent_level);
                }
                None => {}
            }
        }
    }

    fn format_embedded_statement(&mut self, node: &SyntaxNode, indent_level: usize) {
        if node.kind() == SyntaxKind::Block {
            self.format_block(node, indent_level);
        } else {
            self.format_statement(node, indent_level + 1);
        }
    }

    // Declaration parts that render inline.
    fn format_part(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::ModifierList => {
                self.append_modifiers_list(node);
            }
            SyntaxKind::TypeParameterList => {
                self.output.push('<');
                self.output
                    .push_str(&node.children().iter().filter_map(SyntaxNode::token).join(", "));
                self.output.push('>');
            }
            SyntaxKind::ParameterList => {
                self.output.push('(');
                for (i, parameter) in node.children().iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.format_part(parameter);
                }
                self.output.push(')');
            }
            SyntaxKind::Parameter => {
                if let Some(modifiers) = node.child(SyntaxKind::ModifierList) {
                    self.append_modifiers_list(modifiers);
                }
                if let Some(ty) = node.child(SyntaxKind::Type) {
                    self.output.push_str(ty.token().unwrap_or_default());
                    self.output.push(' ');
                }
                self.output.push_str(node.token().unwrap_or_default());
                if let Some(value) = node.child(SyntaxKind::EqualsValueClause) {
                    self.format_part(value);
                }
            }
            SyntaxKind::BaseList => {
                self.output.push_str(" : ");
                self.output
                    .push_str(&node.children().iter().filter_map(SyntaxNode::token).join(", "));
            }
            SyntaxKind::EqualsValueClause => {
                self.output.push_str(" = ");
                if let Some(expr) = node.children().first() {
                    self.format_expr(expr);
                }
            }
            SyntaxKind::ArrowExpressionClause => {
                self.output.push_str("=> ");
                if let Some(expr) = node.children().first() {
                    self.format_expr(expr);
                }
            }
            SyntaxKind::Type | SyntaxKind::Modifier | SyntaxKind::TypeParameter => {
                self.output.push_str(node.token().unwrap_or_default());
            }
            SyntaxKind::VariableDeclaration => self.format_variable_declaration(node),
            SyntaxKind::VariableDeclarator | SyntaxKind::EnumMemberDeclaration => {
                self.output.push_str(node.token().unwrap_or_default());
                if let Some(value) = node.child(SyntaxKind::EqualsValueClause) {
                    self.format_part(value);
                }
            }
            SyntaxKind::ArgumentList | SyntaxKind::BracketedArgumentList => self.format_arguments(node),
            SyntaxKind::Argument => self.format_argument(node),
            SyntaxKind::AccessorList => {
                self.output.push('{');
                for accessor in node.children() {
                    self.output.push(' ');
                    self.format_part(accessor);
                }
                self.output.push_str(" }");
            }
            SyntaxKind::Accessor => {
                self.append_modifiers(node);
                self.output.push_str(node.token().unwrap_or_default());
                if let Some(arrow) = node.child(SyntaxKind::ArrowExpressionClause) {
                    self.output.push(' ');
                    self.format_part(arrow);
                }
                self.output.push(';');
            }
            kind if kind.is_expression() => self.format_expr(node),
            _ => self.format_node(node, 0),
        }
    }

    fn format_expr(&mut self, node: &SyntaxNode) {
        match node.kind() {
            kind if kind.is_literal() => self.output.push_str(node.token().unwrap_or_default()),
            SyntaxKind::IdentifierName => self.output.push_str(node.token().unwrap_or_default()),
            SyntaxKind::ThisExpression => self.output.push_str("this"),
            SyntaxKind::MemberAccessExpression => {
                if let Some(target) = node.children().first() {
                    self.format_operand(target, u8::MAX);
                }
                self.output.push('.');
                self.output.push_str(node.token().unwrap_or_default());
            }
            SyntaxKind::InvocationExpression | SyntaxKind::ElementAccessExpression => {
                if let [target, arguments] = node.children() {
                    self.format_operand(target, u8::MAX);
                    self.format_arguments(arguments);
                }
            }
            SyntaxKind::ImplicitElementAccess => {
                if let Some(arguments) = node.children().first() {
                    self.format_arguments(arguments);
                }
            }
            SyntaxKind::ObjectCreationExpression => {
                self.output.push_str("new ");
                for child in node.children() {
                    match child.kind() {
                        SyntaxKind::Type => self.output.push_str(child.token().unwrap_or_default()),
                        SyntaxKind::ArgumentList => self.format_arguments(child),
                        _ => self.format_initializer(child),
                    }
                }
            }
            SyntaxKind::ImplicitObjectCreationExpression => {
                self.output.push_str("new");
                for child in node.children() {
                    match child.kind() {
                        SyntaxKind::ArgumentList => self.format_arguments(child),
                        _ => self.format_initializer(child),
                    }
                }
            }
            SyntaxKind::InitializerExpression => self.format_initializer(node),
            SyntaxKind::AssignmentExpression => {
                if let [left, right] = node.children() {
                    self.format_expr(left);
                    self.output.push(' ');
                    self.output.push_str(node.token().unwrap_or("="));
                    self.output.push(' ');
                    self.format_expr(right);
                }
            }
            SyntaxKind::BinaryExpression => self.format_binary(node),
            SyntaxKind::PrefixUnaryExpression => {
                self.output.push_str(node.token().unwrap_or_default());
                if let Some(operand) = node.children().first() {
                    self.format_operand(operand, u8::MAX);
                }
            }
            SyntaxKind::AwaitExpression => {
                self.output.push_str("await ");
                if let Some(operand) = node.children().first() {
                    self.format_operand(operand, u8::MAX);
                }
            }
            SyntaxKind::ConditionalExpression => {
                if let [condition, when_true, when_false] = node.children() {
                    self.format_operand(condition, 1);
                    self.output.push_str(" ? ");
                    self.format_expr(when_true);
                    self.output.push_str(" : ");
                    self.format_expr(when_false);
                }
            }
            SyntaxKind::ParenthesizedExpression => {
                self.output.push('(');
                if let Some(expr) = node.children().first() {
                    self.format_expr(expr);
                }
                self.output.push(')');
            }
            _ => self.format_part(node),
        }
    }

    fn format_binary(&mut self, node: &SyntaxNode) {
        let [left, right] = node.children() else {
            return;
        };
        let op = node.token().unwrap_or_default();
        let precedence = metagen_lang::binary_precedence(op).unwrap_or(0);
        let right_assoc = op == "??";

        self.format_operand(left, if right_assoc { precedence + 1 } else { precedence });
        self.output.push(' ');
        self.output.push_str(op);
        self.output.push(' ');
        self.format_operand(right, if right_assoc { precedence } else { precedence + 1 });
    }

    // Wraps `node` in parentheses when it binds looser than `min_precedence`.
    fn format_operand(&mut self, node: &SyntaxNode, min_precedence: u8) {
        let precedence = match node.kind() {
            SyntaxKind::BinaryExpression => node.token().and_then(metagen_lang::binary_precedence).unwrap_or(0),
            SyntaxKind::AssignmentExpression | SyntaxKind::ConditionalExpression => 0,
            SyntaxKind::PrefixUnaryExpression | SyntaxKind::AwaitExpression => 8,
            _ => u8::MAX,
        };

        if precedence < min_precedence {
            self.output.push('(');
            self.format_expr(node);
            self.output.push(')');
        } else {
            self.format_expr(node);
        }
    }

    fn format_arguments(&mut self, node: &SyntaxNode) {
        let (open, close) = if node.kind() == SyntaxKind::BracketedArgumentList {
            ('[', ']')
        } else {
            ('(', ')')
        };

        self.output.push(open);
        for (i, argument) in node.children().iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.format_argument(argument);
        }
        self.output.push(close);
    }

    fn format_argument(&mut self, node: &SyntaxNode) {
        if node.kind() != SyntaxKind::Argument {
            self.format_expr(node);
            return;
        }

        if let Some(name) = node.token() {
            self.output.push_str(name);
            self.output.push_str(": ");
        }
        if let Some(expr) = node.children().first() {
            self.format_expr(expr);
        }
    }

    // Braces line up with the line that opened the initializer.
    fn format_initializer(&mut self, node: &SyntaxNode) {
        let indent_level = self.current_line_indent();

        if !self.is_line_start() {
            self.append_newline();
            self.append_indent(indent_level);
        }

        self.output.push('{');
        self.append_newline();

        let count = node.children().len();
        for (i, expr) in node.children().iter().enumerate() {
            self.append_indent(indent_level + 1);
            self.format_expr(expr);
            if i + 1 < count {
                self.output.push(',');
            }
            self.append_newline();
        }

        self.append_indent(indent_level);
        self.output.push('}');
    }

    fn append_modifiers(&mut self, node: &SyntaxNode) {
        if let Some(modifiers) = node.child(SyntaxKind::ModifierList) {
            self.append_modifiers_list(modifiers);
        }
    }

    fn append_modifiers_list(&mut self, modifiers: &SyntaxNode) {
        for modifier in modifiers.children() {
            self.output.push_str(modifier.token().unwrap_or_default());
            self.output.push(' ');
        }
    }

    fn append_indent(&mut self, level: usize) {
        self.output.push_str(&" ".repeat(level * self.config.indent_width));
    }

    fn append_newline(&mut self) {
        self.output.push('\n');
    }

    fn last_line(&self) -> &str {
        self.output.rsplit('\n').next().unwrap_or_default()
    }

    fn is_line_start(&self) -> bool {
        self.last_line().trim().is_empty()
    }

    pub fn current_line_indent(&self) -> usize {
        if self.config.indent_width == 0 {
            return 0;
        }

        let line = self.last_line();
        (line.len() - line.trim_start().len()) / self.config.indent_width
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn lf() -> Option<FormatterConfig> {
        Some(FormatterConfig {
            indent_width: 4,
            line_ending: LineEnding::Lf,
        })
    }

    #[rstest]
    #[case::usings("using B;\nusing   A.C;", "using B;\nusing A.C;")]
    #[case::positional_record("public record Foo(string Id);", "public record Foo(string Id);")]
    #[case::empty_class("class Foo{}", "class Foo\n{\n}")]
    #[case::file_scoped_namespace(
        "using A;namespace Demo;public record Foo(string Id);",
        "using A;\n\nnamespace Demo;\n\npublic record Foo(string Id);"
    )]
    #[case::block_namespace(
        "namespace Demo{class Foo{int x;}}",
        "namespace Demo\n{\n    class Foo\n    {\n        int x;\n    }\n}"
    )]
    #[case::method_block(
        "class A{public int Sum(){return 0+42+7+21;}}",
        "class A\n{\n    public int Sum()\n    {\n        return 0 + 42 + 7 + 21;\n    }\n}"
    )]
    #[case::expression_body(
        "class A{public string Name() => name.ToString();}",
        "class A\n{\n    public string Name()\n        => name.ToString();\n}"
    )]
    #[case::dictionary_initializer(
        r#"class A{public Dictionary<string,object?> ToDictionary()=>new(){["Name"]=Name,["Price"]=Price};}"#,
        "class A\n{\n    public Dictionary<string, object?> ToDictionary()\n        => new()\n        {\n            [\"Name\"] = Name,\n            [\"Price\"] = Price\n        };\n}"
    )]
    #[case::empty_initializer(
        "class A{public Dictionary<string, object?> ToDictionary() => new() { };}",
        "class A\n{\n    public Dictionary<string, object?> ToDictionary()\n        => new()\n        {\n        };\n}"
    )]
    #[case::property(
        "class A{public Uri Endpoint{get;}=new(\"\");public int X{get;private set;}}",
        "class A\n{\n    public Uri Endpoint { get; } = new(\"\");\n\n    public int X { get; private set; }\n}"
    )]
    #[case::property_accessor_block(
        "class A{int X{get{return 1;}}}",
        "class A\n{\n    int X\n    {\n        get\n        {\n            return 1;\n        }\n    }\n}"
    )]
    #[case::if_else(
        "class A{int F(){if(a){return 1;}else if(b)return 2;else{return 3;}}}",
        "class A\n{\n    int F()\n    {\n        if (a)\n        {\n            return 1;\n        }\n        else if (b)\n            return 2;\n        else\n        {\n            return 3;\n        }\n    }\n}"
    )]
    #[case::enum_decl(
        "public enum Color{Red,Green=2,}",
        "public enum Color\n{\n    Red,\n    Green = 2\n}"
    )]
    #[case::delegate("delegate void Handler(object sender, int count = 1);", "delegate void Handler(object sender, int count = 1);")]
    #[case::generic_method("T Id<T>(this T value) => value;", "T Id<T>(this T value)\n    => value;")]
    #[case::base_list(
        "private interface IRewrite : IRewriteRules, IOther{}",
        "private interface IRewrite : IRewriteRules, IOther\n{\n}"
    )]
    #[case::await_named(
        "class A{async Task F()=>await client.PutAsync(request.Endpoint, content: x);}",
        "class A\n{\n    async Task F()\n        => await client.PutAsync(request.Endpoint, content: x);\n}"
    )]
    #[case::local_and_conditional(
        "class A{void F(){var x=a?b:c;x+=1;}}",
        "class A\n{\n    void F()\n    {\n        var x = a ? b : c;\n        x += 1;\n    }\n}"
    )]
    #[case::nested_object_creation(
        "class A{F G()=>new(new Dictionary<string,string>{});}",
        "class A\n{\n    F G()\n        => new(new Dictionary<string, string>\n        {\n        });\n}"
    )]
    fn test_format(#[case] code: &str, #[case] expected: &str) {
        let result = Formatter::new(lf()).format(code);
        assert_eq!(result.unwrap(), expected);
    }

    #[rstest]
    #[case::lower_precedence_left("(1 + 2) * 3", "(1 + 2) * 3")]
    #[case::flat_sum("1 + 2 + 3", "1 + 2 + 3")]
    #[case::unary("!a && -b", "!a && -b")]
    fn test_format_expression(#[case] code: &str, #[case] expected: &str) {
        let expr = metagen_lang::parse_expression(code).unwrap();
        assert_eq!(Formatter::new(lf()).format_syntax(&expr), expected);
    }

    #[test]
    fn test_constructed_binary_gets_parentheses() {
        let sum = metagen_lang::make::binary(
            "+",
            metagen_lang::make::identifier_name("a"),
            metagen_lang::make::identifier_name("b"),
        );
        let product = metagen_lang::make::binary("*", sum, metagen_lang::make::numeric_literal(2));

        assert_eq!(Formatter::new(lf()).format_syntax(&product), "(a + b) * 2");
    }

    #[test]
    fn test_crlf_line_ending() {
        let config = FormatterConfig {
            indent_width: 2,
            line_ending: LineEnding::CrLf,
        };
        let result = Formatter::new(Some(config)).format("class Foo{int x;}").unwrap();
        assert_eq!(result, "class Foo\r\n{\r\n  int x;\r\n}");
    }

    #[test]
    fn test_native_line_ending() {
        assert_eq!(LineEnding::Native.as_str(), NEW_LINE);
        assert_eq!(LineEnding::default(), LineEnding::Native);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Formatter::new(None).format("  \n").unwrap(), "");
    }
}
