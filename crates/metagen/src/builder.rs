use std::{borrow::Cow, sync::Arc};

use metagen_lang::{NodeTag, SyntaxKind, SyntaxNode, SyntaxTree};
use smol_str::SmolStr;

use crate::{
    args::Arg,
    error::Error,
    rule::RuleDefinition,
    template::Template,
    tracker::NodeTracker,
};

/// A rule bound to the pristine node it rewrites.
#[derive(Debug, Clone)]
struct BoundRule {
    definition: RuleDefinition,
    target: NodeTag,
}

/// One generation of a template's working tree plus its rules.
///
/// [`Builder::broadcast`] never mutates; it returns the next generation.
#[derive(Debug, Clone)]
pub struct Builder {
    template_id: SmolStr,
    rule_module: SmolStr,
    tree: SyntaxTree,
    tracker: NodeTracker,
    rules: Arc<[BoundRule]>,
    generation: usize,
    applied: Vec<Vec<SmolStr>>,
}

impl Builder {
    /// Snapshots the template tree and binds every rule to its target.
    #[allow(clippy::result_large_err)]
    pub fn create(template: Template) -> Result<Self, Error> {
        let tree = SyntaxTree::snapshot(&template.root);
        let pristine = tree.to_node().ok_or_else(|| Error::TrackingLost {
            id: Cow::Owned(template.id.to_string()),
            rule: Cow::Borrowed("<root>"),
        })?;

        let rules = template
            .rules
            .iter()
            .map(|definition| bind(&template.id, &pristine, definition))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            template = %template.id,
            rule_module = %template.rule_module,
            rules = rules.len(),
            nodes = tree.len(),
            "builder created"
        );

        Ok(Self {
            tracker: NodeTracker::new(&tree),
            template_id: template.id,
            rule_module: template.rule_module,
            tree,
            rules: rules.into(),
            generation: 0,
            applied: Vec::new(),
        })
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn rule_module(&self) -> &str {
        &self.rule_module
    }

    pub fn rules(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter().map(|rule| &rule.definition)
    }

    /// Number of broadcasts this generation has seen.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Names of the rules that rewrote the tree, one entry per broadcast.
    pub fn applied(&self) -> &[Vec<SmolStr>] {
        &self.applied
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// The current tree.
    pub fn node(&self) -> SyntaxNode {
        self.tree
            .to_node()
            .unwrap_or_else(|| SyntaxNode::branch(SyntaxKind::CompilationUnit, Vec::new()))
    }

    /// Applies every rule whose parameters accept `[target, ..args]`, in
    /// declaration order. Later rules see the edits of earlier ones.
    #[allow(clippy::result_large_err)]
    pub fn broadcast(&self, args: &[Arg]) -> Result<Self, Error> {
        let mut next = self.clone();
        let mut fired = Vec::new();

        for rule in self.rules.iter() {
            let name = rule.definition.name();
            let tracking_lost = || Error::TrackingLost {
                id: Cow::Owned(self.template_id.to_string()),
                rule: Cow::Owned(name.to_string()),
            };

            let id = next.tracker.resolve(rule.target).ok_or_else(tracking_lost)?;
            let current = next.tree.node(id).ok_or_else(tracking_lost)?;

            let Some(result) = rule.definition.try_apply(&current, args) else {
                tracing::trace!(template = %self.template_id, rule = name, "rule skipped");
                continue;
            };

            let replacement = result.map_err(|source| Error::RuleFailed {
                id: Cow::Owned(self.template_id.to_string()),
                rule: Cow::Owned(name.to_string()),
                source,
            })?;

            tracing::trace!(template = %self.template_id, rule = name, "rule applied");
            fired.push(rule.definition.name().into());

            if replacement.ptr_eq(&current) {
                continue;
            }

            // A freshly built node takes over the identity of the node it replaces.
            let replacement = match replacement.tag() {
                Some(_) => replacement,
                None => replacement.with_tag(current.tag()),
            };

            let replaced = next.tree.replace(id, &replacement).ok_or_else(tracking_lost)?;
            next.tracker.apply(&replaced);
        }

        next.generation += 1;
        next.applied.push(fired);

        Ok(next)
    }
}

#[allow(clippy::result_large_err)]
fn bind(template_id: &str, pristine: &SyntaxNode, definition: &RuleDefinition) -> Result<BoundRule, Error> {
    let targets = pristine
        .descendants_and_self()
        .filter(|node| definition.targets(node))
        .collect::<Vec<_>>();

    let target = match targets.as_slice() {
        [target] => target,
        [] => {
            return Err(Error::TargetNotFound {
                id: Cow::Owned(template_id.to_string()),
                rule: Cow::Owned(definition.name().to_string()),
                kind: definition.target_kind().name(),
            });
        }
        _ => {
            return Err(Error::TargetAmbiguous {
                id: Cow::Owned(template_id.to_string()),
                rule: Cow::Owned(definition.name().to_string()),
                kind: definition.target_kind().name(),
                count: targets.len(),
            });
        }
    };

    let tag = target.tag().ok_or_else(|| Error::TrackingLost {
        id: Cow::Owned(template_id.to_string()),
        rule: Cow::Owned(definition.name().to_string()),
    })?;

    Ok(BoundRule {
        definition: definition.clone(),
        target: tag,
    })
}

#[cfg(test)]
mod tests {
    use metagen_lang::{
        ast::{AstNode, MemberDeclaration, MethodDeclaration, Parameter, TypeDeclaration},
        make,
    };
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{
        args,
        args::TypeName,
        rule::{RuleError, RuleSet},
        template::{EmbeddedTemplates, TemplateLoader},
        RuleRegistry,
    };

    const DTO: &str = r#"
        namespace Demo;

        public record Dto(string Id)
        {
            public int Sum()
            {
                return 0;
            }

            public void Foo(int bar)
            {
            }

            private int sum;

            private interface IRewriteDto : IRewriteRules { }
        }
    "#;

    fn sum(node: MethodDeclaration, value: i64) -> MethodDeclaration {
        let Some(body) = node.body() else {
            return node;
        };
        let Some(ret) = body.return_statement() else {
            return node;
        };
        let Some(expr) = ret.expression().cloned() else {
            return node;
        };

        let ret_new = ret.with_expression(make::binary("+", expr, make::numeric_literal(value)));
        node.with_body(body.replace_statement(&ret, ret_new))
    }

    fn template(rules: RuleSet) -> Template {
        TemplateLoader::new(
            EmbeddedTemplates::new().with("Demo.Dto", DTO),
            RuleRegistry::new().with("Demo.Dto", rules),
        )
        .load("Demo.Dto")
        .unwrap()
    }

    #[fixture]
    fn builder() -> Builder {
        Builder::create(template(
            RuleSet::new()
                .rule("Dto", |node: TypeDeclaration, name: String| {
                    node.with_name(format!("{}Request", name))
                })
                .rule("Dto", |node: TypeDeclaration, ty: TypeName, name: String| {
                    node.add_parameter(Parameter::new(ty.name(), name))
                })
                .rule("Sum", sum)
                .rule("bar", |node: Parameter, _: i64| node.with_name("lol")),
        ))
        .unwrap()
    }

    fn record(builder: &Builder) -> TypeDeclaration {
        builder
            .node()
            .descendants()
            .find_map(TypeDeclaration::cast)
            .unwrap()
    }

    #[rstest]
    fn test_broadcast_renames_and_keeps_tracking(builder: Builder) {
        let next = builder
            .broadcast(&args!["Product"])
            .and_then(|b| b.broadcast(&args![TypeName::new("String"), "Name"]))
            .and_then(|b| b.broadcast(&args![5]))
            .unwrap();

        let record = record(&next);
        assert_eq!(record.name(), "ProductRequest");
        assert_eq!(
            record.parameters().iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
            vec!["Id", "Name"]
        );
        assert!(next.node().descendants().any(|n| n.declared_name() == Some("lol")));
        assert_eq!(next.generation(), 3);
        assert_eq!(
            next.applied(),
            &[
                vec![SmolStr::new("Dto")],
                vec![SmolStr::new("Dto")],
                vec![SmolStr::new("Sum"), SmolStr::new("bar")],
            ]
        );
    }

    #[rstest]
    fn test_broadcast_does_not_mutate_previous_generation(builder: Builder) {
        let before = builder.node();
        let next = builder.broadcast(&args!["Product"]).unwrap();

        assert_eq!(builder.node(), before);
        assert_eq!(builder.generation(), 0);
        assert_ne!(next.node(), before);
    }

    #[rstest]
    fn test_broadcast_without_match_is_noop(builder: Builder) {
        let next = builder.broadcast(&args![true, false, true]).unwrap();

        assert_eq!(next.node(), builder.node());
        assert_eq!(next.applied(), &[Vec::<SmolStr>::new()]);
    }

    #[rstest]
    fn test_sum_accumulates_left_to_right(builder: Builder) {
        let next = [42, 7, 21]
            .into_iter()
            .try_fold(builder, |b, n| b.broadcast(&args![n]))
            .unwrap();
        let ret = next.node().first_descendant(SyntaxKind::ReturnStatement).unwrap();

        assert_eq!(
            ret.children()[0],
            metagen_lang::parse_expression("0 + 42 + 7 + 21").unwrap()
        );
    }

    #[rstest]
    #[case::missing(RuleSet::new().rule("Missing", |n: MethodDeclaration| n))]
    #[case::wrong_kind(RuleSet::new().rule("Sum", |n: Parameter| n))]
    fn test_create_target_not_found(#[case] rules: RuleSet) {
        assert!(matches!(
            Builder::create(template(rules)),
            Err(Error::TargetNotFound { .. })
        ));
    }

    #[rstest]
    #[case::members(RuleSet::new().rule("sum", |n: MemberDeclaration| n), 2)]
    #[case::any_kind(RuleSet::new().rule("SUM", |n: SyntaxNode| n), 3)]
    fn test_create_target_ambiguous(#[case] rules: RuleSet, #[case] expected: usize) {
        assert!(matches!(
            Builder::create(template(rules)),
            Err(Error::TargetAmbiguous { count, .. }) if count == expected
        ));
    }

    #[test]
    fn test_rule_failure_aborts_broadcast() {
        let builder = Builder::create(template(RuleSet::new().rule(
            "Sum",
            |_: MethodDeclaration, _: String| -> Result<MethodDeclaration, RuleError> {
                Err(RuleError::new("no"))
            },
        )))
        .unwrap();

        assert!(builder.broadcast(&args![1]).is_ok());
        assert!(matches!(
            builder.broadcast(&args!["x"]),
            Err(Error::RuleFailed { rule, .. }) if rule == "Sum"
        ));
    }

    #[test]
    fn test_tracking_lost_when_target_removed() {
        let builder = Builder::create(template(
            RuleSet::new()
                .rule("Dto", |node: TypeDeclaration| {
                    let members = node.syntax().children().iter().filter(|c| !c.kind().is_member()).cloned().collect();
                    TypeDeclaration::cast(node.syntax().with_children(members)).unwrap_or(node)
                })
                .rule("Sum", |node: MethodDeclaration| node),
        ))
        .unwrap();

        assert!(matches!(
            builder.broadcast(&args![]),
            Err(Error::TrackingLost { rule, .. }) if rule == "Sum"
        ));
    }
}
