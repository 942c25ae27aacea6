//! Property-based tests for the metagen printer.
use metagen_formatter::{Formatter, FormatterConfig, LineEnding};
use proptest::prelude::*;

mod strategies {
    use super::*;

    /// Capitalized names never collide with keywords.
    pub fn ident() -> impl Strategy<Value = String> {
        "[A-Z][a-zA-Z0-9]{0,8}"
    }

    pub fn operand() -> impl Strategy<Value = String> {
        prop_oneof![ident(), (0i64..1000).prop_map(|n| n.to_string())]
    }

    pub fn expression() -> impl Strategy<Value = String> {
        let leaf = operand();
        leaf.prop_recursive(3, 16, 2, |inner| {
            (inner.clone(), prop_oneof![Just("+"), Just("*"), Just("-"), Just("&&")], inner)
                .prop_map(|(l, op, r)| format!("({l}) {op} {r}"))
        })
    }

    pub fn member() -> impl Strategy<Value = String> {
        prop_oneof![
            (ident(), ident()).prop_map(|(ty, name)| format!("public {ty} {name} {{ get; set; }}")),
            (ident(), ident(), expression()).prop_map(|(ty, name, e)| format!("{ty} {name}() => {e};")),
            (ident(), ident(), expression()).prop_map(|(ty, name, e)| format!("{ty} {name}() {{ return {e}; }}")),
            (ident(), ident()).prop_map(|(ty, name)| format!("private {ty} {name};")),
        ]
    }

    pub fn unit() -> impl Strategy<Value = String> {
        (ident(), ident(), prop::collection::vec(member(), 0..5)).prop_map(|(namespace, name, members)| {
            format!("using System;namespace {namespace};public class {name}{{{}}}", members.join(""))
        })
    }
}

fn formatter() -> Formatter {
    Formatter::new(Some(FormatterConfig {
        indent_width: 4,
        line_ending: LineEnding::Lf,
    }))
}

proptest! {
    #[test]
    fn formatting_is_idempotent(code in strategies::unit()) {
        let once = formatter().format(&code).unwrap();
        let twice = formatter().format(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn formatted_lines_have_no_trailing_whitespace(code in strategies::unit()) {
        let formatted = formatter().format(&code).unwrap();
        prop_assert!(formatted.lines().all(|line| line == line.trim_end()));
    }

    #[test]
    fn formatting_preserves_structure(code in strategies::unit()) {
        let original = metagen_lang::parse(&code).unwrap();
        let formatted = formatter().format(&code).unwrap();
        prop_assert_eq!(metagen_lang::parse(&formatted).unwrap(), original);
    }
}
