//! Node constructors for rule authors.

use smol_str::SmolStr;

use crate::{
    Error,
    ast::Parameter,
    syntax::{SyntaxKind, SyntaxNode},
};

pub fn identifier_name(name: impl Into<SmolStr>) -> SyntaxNode {
    SyntaxNode::leaf(SyntaxKind::IdentifierName, name)
}

/// A regular string literal; `value` is escaped.
pub fn string_literal(value: &str) -> SyntaxNode {
    SyntaxNode::leaf(SyntaxKind::StringLiteral, format!("\"{}\"", escape_string(value)))
}

pub fn numeric_literal(value: i64) -> SyntaxNode {
    SyntaxNode::leaf(SyntaxKind::NumericLiteral, value.to_string())
}

pub fn float_literal(value: f64) -> SyntaxNode {
    SyntaxNode::leaf(SyntaxKind::NumericLiteral, format!("{:?}", value))
}

pub fn bool_literal(value: bool) -> SyntaxNode {
    SyntaxNode::leaf(SyntaxKind::BooleanLiteral, if value { "true" } else { "false" })
}

pub fn null_literal() -> SyntaxNode {
    SyntaxNode::leaf(SyntaxKind::NullLiteral, "null")
}

pub fn type_name(text: impl Into<SmolStr>) -> SyntaxNode {
    SyntaxNode::leaf(SyntaxKind::Type, text)
}

pub fn parameter(type_text: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Parameter {
    Parameter::new(type_text, name)
}

pub fn member_access(expression: SyntaxNode, name: impl Into<SmolStr>) -> SyntaxNode {
    SyntaxNode::new(SyntaxKind::MemberAccessExpression, Some(name.into()), vec![expression])
}

pub fn argument(expression: SyntaxNode) -> SyntaxNode {
    SyntaxNode::branch(SyntaxKind::Argument, vec![expression])
}

pub fn invocation(expression: SyntaxNode, arguments: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::branch(
        SyntaxKind::InvocationExpression,
        vec![
            expression,
            SyntaxNode::branch(SyntaxKind::ArgumentList, arguments.into_iter().map(argument).collect()),
        ],
    )
}

pub fn binary(op: &str, left: SyntaxNode, right: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(SyntaxKind::BinaryExpression, Some(op.into()), vec![left, right])
}

pub fn assignment(left: SyntaxNode, right: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(SyntaxKind::AssignmentExpression, Some("=".into()), vec![left, right])
}

/// `[key] = value`, the element form of a dictionary initializer.
pub fn dictionary_entry(key: SyntaxNode, value: SyntaxNode) -> SyntaxNode {
    let element = SyntaxNode::branch(
        SyntaxKind::ImplicitElementAccess,
        vec![SyntaxNode::branch(SyntaxKind::BracketedArgumentList, vec![argument(key)])],
    );
    assignment(element, value)
}

pub fn return_statement(expression: SyntaxNode) -> SyntaxNode {
    SyntaxNode::branch(SyntaxKind::ReturnStatement, vec![expression])
}

#[allow(clippy::result_large_err)]
pub fn parse_expression(code: &str) -> Result<SyntaxNode, Error> {
    crate::parse_expression(code)
}

pub fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("Name", "\"Name\"")]
    #[case::quote("a\"b", "\"a\\\"b\"")]
    #[case::newline("a\nb", "\"a\\nb\"")]
    fn test_string_literal(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(string_literal(value).token(), Some(expected));
    }

    #[test]
    fn test_dictionary_entry_matches_parsed() {
        let made = dictionary_entry(string_literal("Name"), identifier_name("Name"));
        let parsed = parse_expression(r#"["Name"] = Name"#).unwrap();
        assert_eq!(made, parsed);
    }

    #[test]
    fn test_invocation_matches_parsed() {
        let made = invocation(member_access(identifier_name("Name"), "ToString"), vec![]);
        assert_eq!(made, parse_expression("Name.ToString()").unwrap());
    }

    #[test]
    fn test_literals() {
        assert_eq!(numeric_literal(-3).token(), Some("-3"));
        assert_eq!(float_literal(1.5).token(), Some("1.5"));
        assert_eq!(bool_literal(true).kind(), SyntaxKind::BooleanLiteral);
        assert_eq!(null_literal().token(), Some("null"));
    }
}
