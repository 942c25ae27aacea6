use metagen_lang::{LexerOptions, SyntaxKind, TokenKind, parse, parse_expression, tokenize};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,12}"
}

proptest! {
    #[test]
    fn identifiers_lex_to_single_token(name in identifier()) {
        let tokens = tokenize(&name, LexerOptions::default()).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(&tokens[0].kind, &TokenKind::Ident(name.as_str().into()));
    }

    #[test]
    fn sums_parse_left_associative(values in prop::collection::vec(0u32..1000, 1..8)) {
        let code = values.iter().map(u32::to_string).collect::<Vec<_>>().join(" + ");
        let mut expr = parse_expression(&code).unwrap();
        let mut seen = Vec::new();

        while expr.kind() == SyntaxKind::BinaryExpression {
            seen.push(expr.children()[1].token().unwrap().to_string());
            expr = expr.children()[0].clone();
        }
        seen.push(expr.token().unwrap().to_string());
        seen.reverse();

        prop_assert_eq!(seen, values.iter().map(u32::to_string).collect::<Vec<_>>());
    }

    #[test]
    fn declared_names_survive_parsing(
        type_name in "[A-Z][a-z]{1,8}",
        method in "[A-Z][a-z]{1,8}",
        parameter in "[a-z]{1,8}",
    ) {
        prop_assume!(!["if", "in", "new", "out", "ref", "this", "params", "scoped"].contains(&parameter.as_str()));
        let code = format!("public class {type_name} {{ public void {method}(int {parameter}) {{ }} }}");
        let unit = parse(&code).unwrap();
        let names = unit
            .descendants()
            .filter_map(|n| n.declared_name().map(str::to_string))
            .collect::<Vec<_>>();

        prop_assert_eq!(names, vec![type_name, method, parameter]);
    }
}
