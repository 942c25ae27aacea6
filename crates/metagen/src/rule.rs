//! Rewrite rules and the registry that pairs them with templates.
//!
//! A rule is any function `Fn(N, A1, .., An) -> R` where `N` is the typed view
//! of the node it rewrites, every `Ai` implements [`FromArg`], and `R` is `N`
//! or `Result<N, RuleError>`. The rule name selects the target declaration in
//! the template, compared case-insensitively against declared names.

use std::{
    borrow::Cow,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use metagen_lang::{AstNode, SyntaxKind, SyntaxNode};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::args::{Arg, ArgType, FromArg};

/// Failure reported by a rule body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RuleError(Cow<'static, str>);

impl RuleError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self(message.into())
    }
}

/// The node kinds a rule may rewrite, taken from its typed view.
#[derive(Clone, Copy)]
pub struct TargetKind {
    name: &'static str,
    can_cast: fn(SyntaxKind) -> bool,
}

impl TargetKind {
    pub fn of<N: AstNode>() -> Self {
        Self {
            name: N::KIND_NAME,
            can_cast: N::can_cast,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, kind: SyntaxKind) -> bool {
        (self.can_cast)(kind)
    }
}

impl Debug for TargetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for TargetKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

pub trait IntoRuleOutput<N> {
    fn into_rule_output(self) -> Result<N, RuleError>;
}

impl<N: AstNode> IntoRuleOutput<N> for N {
    fn into_rule_output(self) -> Result<N, RuleError> {
        Ok(self)
    }
}

impl<N: AstNode> IntoRuleOutput<N> for Result<N, RuleError> {
    fn into_rule_output(self) -> Result<N, RuleError> {
        self
    }
}

/// Functions usable as rules. Implemented for closures and fn items taking
/// the target view plus up to four arguments.
pub trait Rule<N, Args>: Send + Sync + 'static {
    fn params() -> Vec<ArgType>;

    /// `None` when the arguments do not fit the declared parameters.
    fn call(&self, node: N, args: &[Arg]) -> Option<Result<N, RuleError>>;
}

macro_rules! impl_rule {
    ($arity:expr; $($ty:ident),*) => {
        impl<F, N, R, $($ty,)*> Rule<N, ($($ty,)*)> for F
        where
            F: Fn(N, $($ty),*) -> R + Send + Sync + 'static,
            N: AstNode,
            R: IntoRuleOutput<N>,
            $($ty: FromArg,)*
        {
            fn params() -> Vec<ArgType> {
                vec![$(<$ty as FromArg>::arg_type()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call(&self, node: N, args: &[Arg]) -> Option<Result<N, RuleError>> {
                if args.len() != $arity {
                    return None;
                }

                let mut args = args.iter();
                $(let $ty = <$ty as FromArg>::from_arg(args.next()?)?;)*

                Some((self)(node, $($ty),*).into_rule_output())
            }
        }
    };
}

impl_rule!(0;);
impl_rule!(1; A1);
impl_rule!(2; A1, A2);
impl_rule!(3; A1, A2, A3);
impl_rule!(4; A1, A2, A3, A4);

type ApplyFn = dyn Fn(SyntaxNode, &[Arg]) -> Option<Result<SyntaxNode, RuleError>> + Send + Sync;

/// One named rule with its erased signature.
#[derive(Clone)]
pub struct RuleDefinition {
    name: SmolStr,
    target_kind: TargetKind,
    params: Vec<ArgType>,
    apply: Arc<ApplyFn>,
}

impl RuleDefinition {
    pub fn new<N, Args, F>(name: impl Into<SmolStr>, rule: F) -> Self
    where
        N: AstNode + 'static,
        F: Rule<N, Args>,
    {
        let apply = move |node: SyntaxNode, args: &[Arg]| {
            let node = N::cast(node)?;
            rule.call(node, args).map(|result| result.map(AstNode::into_syntax))
        };

        Self {
            name: name.into(),
            target_kind: TargetKind::of::<N>(),
            params: F::params(),
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target_kind
    }

    /// Parameters after the target node.
    pub fn params(&self) -> &[ArgType] {
        &self.params
    }

    /// Whether `node` is a target of this rule: assignable kind and the same
    /// name, ignoring case.
    pub fn targets(&self, node: &SyntaxNode) -> bool {
        self.target_kind.matches(node.kind())
            && node
                .declared_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(&self.name))
    }

    /// Runs the rule against `[node, ..args]`. `None` means the arguments do
    /// not fit this rule, which is not an error.
    pub fn try_apply(&self, node: &SyntaxNode, args: &[Arg]) -> Option<Result<SyntaxNode, RuleError>> {
        (self.apply)(node.clone(), args)
    }

    /// Signature in the form `Name(MethodDeclaration, int, string)`.
    pub fn signature(&self) -> String {
        let params = std::iter::once(self.target_kind.name().to_string())
            .chain(self.params.iter().map(ToString::to_string))
            .collect::<Vec<_>>();
        format!("{}({})", self.name, params.join(", "))
    }
}

impl Debug for RuleDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("name", &self.name)
            .field("target_kind", &self.target_kind)
            .field("params", &self.params)
            .finish()
    }
}

/// Ordered rules of one template; declaration order is application order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RuleDefinition>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule<N, Args, F>(mut self, name: impl Into<SmolStr>, rule: F) -> Self
    where
        N: AstNode + 'static,
        F: Rule<N, Args>,
    {
        self.rules.push(RuleDefinition::new(name, rule));
        self
    }

    pub fn push(&mut self, definition: RuleDefinition) {
        self.rules.push(definition);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleDefinition;
    type IntoIter = std::slice::Iter<'a, RuleDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Rule sets keyed by template id.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rule_sets: FxHashMap<SmolStr, RuleSet>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, template_id: impl Into<SmolStr>, rules: RuleSet) -> Self {
        self.register(template_id, rules);
        self
    }

    pub fn register(&mut self, template_id: impl Into<SmolStr>, rules: RuleSet) {
        self.rule_sets.insert(template_id.into(), rules);
    }

    pub fn get(&self, template_id: &str) -> Option<&RuleSet> {
        self.rule_sets.get(template_id)
    }

    /// Registered template ids, sorted.
    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids = self.rule_sets.keys().map(SmolStr::as_str).collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use metagen_lang::{
        ast::{MethodDeclaration, Parameter, TypeDeclaration},
        parse_member,
    };
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{args, args::TypeName};

    #[fixture]
    fn rules() -> RuleSet {
        RuleSet::new()
            .rule("Dto", |node: TypeDeclaration, name: String| {
                node.with_name(format!("{}Request", name))
            })
            .rule("Dto", |node: TypeDeclaration, ty: TypeName, name: String| {
                node.add_parameter(Parameter::new(ty.name(), name))
            })
            .rule("Bar", |node: Parameter, _value: i32| node.with_name("lol"))
            .rule("Fail", |_: MethodDeclaration| -> Result<MethodDeclaration, RuleError> {
                Err(RuleError::new("boom"))
            })
    }

    fn dto() -> SyntaxNode {
        parse_member("public record Dto(string Id);").unwrap()
    }

    #[rstest]
    fn test_signatures(rules: RuleSet) {
        let signatures = rules.iter().map(RuleDefinition::signature).collect::<Vec<_>>();
        assert_eq!(
            signatures,
            vec![
                "Dto(TypeDeclaration, string)",
                "Dto(TypeDeclaration, Type, string)",
                "Bar(Parameter, int)",
                "Fail(MethodDeclaration)",
            ]
        );
    }

    #[rstest]
    #[case::name_only(args!["Product"], Some("public record ProductRequest(string Id);"))]
    #[case::wrong_type(args![5], None)]
    #[case::wrong_arity(args!["Product", "extra"], None)]
    #[case::null_argument(args![None::<String>], None)]
    fn test_try_apply(rules: RuleSet, #[case] args: Vec<Arg>, #[case] expected: Option<&str>) {
        let rule = rules.iter().next().unwrap();
        let result = rule.try_apply(&dto(), &args).map(|r| r.unwrap());

        assert_eq!(result, expected.map(|code| parse_member(code).unwrap()));
    }

    #[rstest]
    fn test_try_apply_with_type_argument(rules: RuleSet) {
        let rule = rules.iter().nth(1).unwrap();
        let result = rule
            .try_apply(&dto(), &args![TypeName::new("Int32"), "Price"])
            .unwrap()
            .unwrap();

        assert_eq!(
            result,
            parse_member("public record Dto(string Id, Int32 Price);").unwrap()
        );
    }

    #[rstest]
    fn test_try_apply_rejects_wrong_target_kind(rules: RuleSet) {
        let rule = rules.iter().nth(2).unwrap();
        assert!(rule.try_apply(&dto(), &args![1]).is_none());
    }

    #[rstest]
    fn test_rule_error_is_returned(rules: RuleSet) {
        let rule = rules.iter().nth(3).unwrap();
        let method = parse_member("void Fail() { }").unwrap();

        assert_eq!(
            rule.try_apply(&method, &args![]),
            Some(Err(RuleError::new("boom")))
        );
    }

    #[rstest]
    #[case::same_case("public record Dto();", true)]
    #[case::other_case("public record DTO();", true)]
    #[case::other_name("public record Other();", false)]
    #[case::other_kind("public int Dto() => 1;", false)]
    fn test_targets(rules: RuleSet, #[case] code: &str, #[case] expected: bool) {
        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.targets(&parse_member(code).unwrap()), expected);
    }

    #[test]
    fn test_registry() {
        let registry = RuleRegistry::new()
            .with("B", RuleSet::new())
            .with("A", RuleSet::new().rule("X", |n: SyntaxNode| n));

        assert_eq!(registry.template_ids(), vec!["A", "B"]);
        assert_eq!(registry.get("A").map(RuleSet::len), Some(1));
        assert!(registry.get("C").is_none());
    }
}
