//! Templates shipped with the binary and the rules that rewrite them.

use metagen::{
    AstNode, EmbeddedTemplates, RuleError, RuleRegistry, RuleSet, SyntaxKind, SyntaxNode,
    TemplateResolver, TypeName,
    ast::{MethodDeclaration, Parameter, TypeDeclaration},
    make,
};

pub const MY_API_REQUEST_DTO: &str = "Metagen.Source.MyApiRequestDto";
pub const REQUEST_INPUT: &str = "Metagen.Source.RequestInput";
pub const MY_API_CLIENT: &str = "Metagen.Source.MyApiClient";

const SOURCES: [(&str, &str); 3] = [
    (
        MY_API_REQUEST_DTO,
        include_str!("../templates/Metagen.Source.MyApiRequestDto.cs"),
    ),
    (
        REQUEST_INPUT,
        include_str!("../templates/Metagen.Source.RequestInput.cs"),
    ),
    (
        MY_API_CLIENT,
        include_str!("../templates/Metagen.Source.MyApiClient.cs"),
    ),
];

pub fn ids() -> impl Iterator<Item = &'static str> {
    SOURCES.iter().map(|(id, _)| *id)
}

pub fn embedded() -> EmbeddedTemplates {
    SOURCES
        .iter()
        .fold(EmbeddedTemplates::new(), |templates, (id, source)| templates.with(*id, *source))
}

/// Bundled templates, minus those `resolver` finds on disk.
pub fn embedded_except(resolver: &impl TemplateResolver) -> EmbeddedTemplates {
    SOURCES
        .iter()
        .filter(|(id, _)| resolver.resolve(id).is_err())
        .fold(EmbeddedTemplates::new(), |templates, (id, source)| templates.with(*id, *source))
}

pub fn registry() -> RuleRegistry {
    RuleRegistry::new()
        .with(MY_API_REQUEST_DTO, request_dto_rules())
        .with(REQUEST_INPUT, request_input_rules())
        .with(MY_API_CLIENT, client_rules())
}

fn request_dto_rules() -> RuleSet {
    RuleSet::new()
        .rule("MyApiRequestDto", |node: TypeDeclaration, name: String| {
            node.with_name(format!("{}Request", name))
        })
        .rule("MyApiRequestDto", add_parameter)
        .rule("ToDictionary", |node: MethodDeclaration, _: TypeName, name: String| {
            add_entry(node, make::string_literal(&name), make::identifier_name(name.as_str()))
        })
        .rule(
            "ToFormUrlEncodedContent",
            |node: MethodDeclaration, _: TypeName, name: String| {
                let value = make::invocation(
                    make::member_access(make::identifier_name(name.as_str()), "ToString"),
                    Vec::new(),
                );
                add_entry(node, make::string_literal(&name), value)
            },
        )
        .rule("Bar", rename_parameter)
        .rule("SumTwoNumbers", add_to_return)
}

fn request_input_rules() -> RuleSet {
    RuleSet::new()
        .rule("Bar", rename_parameter)
        .rule("RequestInput", |node: TypeDeclaration, prefix: String| {
            node.with_name(format!("{}RequestInput", prefix))
        })
        .rule("RequestInput", add_parameter)
        .rule("SumTwoNumbers", add_to_return)
        .rule("ToDictionary", |node: MethodDeclaration, key: String, value: String| {
            add_entry(node, make::string_literal(&key), make::string_literal(&value))
        })
}

fn client_rules() -> RuleSet {
    RuleSet::new().rule("SaveAsync", |node: MethodDeclaration, name: String| {
        let request = format!("{}Request", name);
        let renamed = node.syntax().replace_all(
            |n| {
                matches!(n.kind(), SyntaxKind::IdentifierName | SyntaxKind::Type)
                    && n.token() == Some("MyApiRequestDto")
            },
            |n| n.with_token(request.as_str()),
        );

        MethodDeclaration::cast(renamed)
            .map(|method| method.with_name(format!("Save{}Async", name)))
            .ok_or_else(|| RuleError::new("SaveAsync is no longer a method"))
    })
}

fn add_parameter(node: TypeDeclaration, ty: TypeName, name: String) -> TypeDeclaration {
    node.add_parameter(Parameter::new(ty.name(), name))
}

fn rename_parameter(node: Parameter, _: i32) -> Parameter {
    node.with_name("lol")
}

fn add_to_return(node: MethodDeclaration, value: i64) -> Result<MethodDeclaration, RuleError> {
    let body = node
        .body()
        .ok_or_else(|| RuleError::new(format!("`{}` has no block body", node.name())))?;
    let ret = body
        .return_statement()
        .ok_or_else(|| RuleError::new(format!("`{}` has no return statement", node.name())))?;
    let expression = ret
        .expression()
        .cloned()
        .ok_or_else(|| RuleError::new(format!("`{}` returns nothing", node.name())))?;

    let ret_new = ret.with_expression(make::binary("+", expression, make::numeric_literal(value)));
    Ok(node.with_body(body.replace_statement(&ret, ret_new)))
}

// `[key] = value` appended to the first initializer in the method.
fn add_entry(node: MethodDeclaration, key: SyntaxNode, value: SyntaxNode) -> Result<MethodDeclaration, RuleError> {
    let initializer = node
        .initializer()
        .ok_or_else(|| RuleError::new(format!("`{}` has no initializer", node.name())))?;
    let extended = initializer.add_expression(make::dictionary_entry(key, value));

    MethodDeclaration::cast(node.syntax().replace(initializer.syntax(), extended.into_syntax()))
        .ok_or_else(|| RuleError::new(format!("`{}` is no longer a method", node.name())))
}
