use metagen_formatter::{Formatter, FormatterConfig};
use metagen_lang::{SyntaxKind, SyntaxNode};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

#[derive(Debug, Clone, Default)]
pub struct EmitterConfig {
    pub formatter: FormatterConfig,
}

/// Turns the working trees of a session into text blocks.
///
/// Output order: the deduplicated using directives of every tree, then each
/// outermost namespace rewritten into braced form, then declarations that sit
/// outside any namespace. Every block after the directives starts with a line
/// separator.
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    config: EmitterConfig,
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn render<'a>(&self, trees: impl IntoIterator<Item = &'a SyntaxNode>) -> Vec<String> {
        let trees = trees.into_iter().collect::<Vec<_>>();
        let line_ending = self.config.formatter.line_ending.as_str();
        let mut formatter = Formatter::new(Some(self.config.formatter.clone()));

        let usings = collect_usings(&trees);
        let (namespaces, loose) = collect_blocks(&trees);

        tracing::debug!(
            trees = trees.len(),
            usings = usings.len(),
            namespaces = namespaces.len(),
            members = loose.len(),
            "rendering"
        );

        let mut blocks = usings
            .iter()
            .map(|using| formatter.format_syntax(using))
            .collect::<Vec<_>>();

        blocks.extend(
            namespaces
                .iter()
                .chain(loose.iter())
                .map(|node| format!("{}{}", line_ending, formatter.format_syntax(node))),
        );

        blocks
    }

    /// All blocks, each terminated by the configured line separator.
    pub fn render_to_string<'a>(&self, trees: impl IntoIterator<Item = &'a SyntaxNode>) -> String {
        let line_ending = self.config.formatter.line_ending.as_str();

        self.render(trees).into_iter().fold(String::new(), |mut acc, block| {
            acc.push_str(&block);
            acc.push_str(line_ending);
            acc
        })
    }
}

// First occurrence wins; two directives are the same when they print the same.
fn collect_usings(trees: &[&SyntaxNode]) -> Vec<SyntaxNode> {
    let mut seen = FxHashSet::default();

    trees
        .iter()
        .flat_map(|tree| tree.descendants_and_self())
        .filter(|node| node.kind() == SyntaxKind::UsingDirective)
        .filter(|node| seen.insert(node.token().unwrap_or_default().trim().to_string()))
        .map(|node| SyntaxNode::leaf(SyntaxKind::UsingDirective, node.token().unwrap_or_default().trim()))
        .collect()
}

fn collect_blocks(trees: &[&SyntaxNode]) -> (Vec<SyntaxNode>, Vec<SyntaxNode>) {
    let mut namespaces = Vec::new();
    let mut loose = Vec::new();

    for tree in trees {
        let top_level = match tree.kind() {
            SyntaxKind::CompilationUnit => tree.children(),
            _ => std::slice::from_ref(*tree),
        };

        for node in top_level {
            match node.kind() {
                SyntaxKind::UsingDirective => {}
                kind if kind.is_namespace() => namespaces.push(braced_namespace(node)),
                _ => loose.push(node.clone()),
            }
        }
    }

    (namespaces, loose)
}

/// Rewrites a namespace, and every namespace nested in it, into braced form
/// without using directives.
fn braced_namespace(node: &SyntaxNode) -> SyntaxNode {
    let children = node
        .children()
        .iter()
        .filter(|child| child.kind() != SyntaxKind::UsingDirective)
        .map(|child| {
            if child.kind().is_namespace() {
                braced_namespace(child)
            } else {
                child.clone()
            }
        })
        .collect();

    SyntaxNode::new(
        SyntaxKind::NamespaceDeclaration,
        node.token().map(SmolStr::new),
        children,
    )
}

#[cfg(test)]
mod tests {
    use metagen_formatter::LineEnding;
    use metagen_lang::parse;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn emitter() -> Emitter {
        Emitter::new(EmitterConfig {
            formatter: FormatterConfig {
                line_ending: LineEnding::Lf,
                ..Default::default()
            },
        })
    }

    #[rstest]
    fn test_file_scoped_namespace_is_braced(emitter: Emitter) {
        let unit = parse("using System; namespace Demo; public record Foo(string Id);").unwrap();

        assert_eq!(
            emitter.render([&unit]),
            vec![
                "using System;".to_string(),
                "\nnamespace Demo\n{\n    public record Foo(string Id);\n}".to_string(),
            ]
        );
    }

    #[rstest]
    fn test_usings_are_deduplicated_in_first_seen_order(emitter: Emitter) {
        let first = parse("using System; using System.Net; namespace A; class X { }").unwrap();
        let second = parse("using System.Linq; using System; namespace B; class Y { }").unwrap();

        let blocks = emitter.render([&first, &second]);

        assert_eq!(
            blocks[..3],
            ["using System;", "using System.Net;", "using System.Linq;"]
        );
        assert_eq!(blocks.len(), 5);
        assert!(blocks[3].starts_with("\nnamespace A"));
        assert!(blocks[4].starts_with("\nnamespace B"));
    }

    #[rstest]
    fn test_namespace_usings_are_hoisted(emitter: Emitter) {
        let unit = parse("namespace Demo { using System.Text; namespace Inner { using System; class X { } } }").unwrap();

        assert_eq!(
            emitter.render_to_string([&unit]),
            "using System.Text;\nusing System;\n\nnamespace Demo\n{\n    namespace Inner\n    {\n        class X\n        {\n        }\n    }\n}\n"
        );
    }

    #[rstest]
    fn test_declarations_without_namespace(emitter: Emitter) {
        let unit = parse("using System; public record Foo(int A); namespace N; class Bar { }").unwrap();
        let blocks = emitter.render([&unit]);

        assert_eq!(blocks.len(), 3);
        assert!(blocks[1].starts_with("\nnamespace N"));
        assert_eq!(blocks[2], "\npublic record Foo(int A);");
    }

    #[rstest]
    fn test_crlf_line_ending() {
        let emitter = Emitter::new(EmitterConfig {
            formatter: FormatterConfig {
                line_ending: LineEnding::CrLf,
                ..Default::default()
            },
        });
        let unit = parse("using System; namespace Demo; class Foo { }").unwrap();

        assert_eq!(
            emitter.render_to_string([&unit]),
            "using System;\r\n\r\nnamespace Demo\r\n{\r\n    class Foo\r\n    {\r\n    }\r\n}\r\n"
        );
    }

    #[rstest]
    fn test_nothing_to_render(emitter: Emitter) {
        let trees = Vec::<&SyntaxNode>::new();

        assert!(emitter.render(trees.clone()).is_empty());
        assert_eq!(emitter.render_to_string(trees), "");
    }
}
