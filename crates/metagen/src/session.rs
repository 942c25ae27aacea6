use itertools::Itertools;
use metagen_lang::SyntaxNode;

use crate::{
    args::Arg,
    builder::Builder,
    emitter::{Emitter, EmitterConfig},
    error::Error,
    template::{LocalFsTemplateResolver, TemplateLoader, TemplateResolver},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Number of builders waiting for [`Session::complete`].
    Open(usize),
}

/// Stack of open builders plus the builders already completed.
///
/// A failed operation leaves the session exactly as it was before the call.
#[derive(Debug, Clone)]
pub struct Session<R: TemplateResolver = LocalFsTemplateResolver> {
    loader: TemplateLoader<R>,
    open: Vec<Builder>,
    completed: Vec<Builder>,
    emitter: Emitter,
}

impl<R: TemplateResolver> Session<R> {
    pub fn new(loader: TemplateLoader<R>) -> Self {
        Self::with_config(loader, EmitterConfig::default())
    }

    pub fn with_config(loader: TemplateLoader<R>, config: EmitterConfig) -> Self {
        Self {
            loader,
            open: Vec::new(),
            completed: Vec::new(),
            emitter: Emitter::new(config),
        }
    }

    pub fn loader(&self) -> &TemplateLoader<R> {
        &self.loader
    }

    /// Loads a template and pushes a fresh builder for it.
    #[allow(clippy::result_large_err)]
    pub fn start(&mut self, template_id: &str) -> Result<(), Error> {
        let template = self.loader.load(template_id)?;
        let builder = Builder::create(template)?;

        self.open.push(builder);
        tracing::debug!(template = template_id, pending = self.pending(), "started");
        Ok(())
    }

    /// Sends `args` to every open builder. Either every builder advances a
    /// generation or, on the first error, none does.
    #[allow(clippy::result_large_err)]
    pub fn broadcast(&mut self, args: &[Arg]) -> Result<(), Error> {
        if self.open.is_empty() {
            tracing::debug!("broadcast without open builders ignored");
            return Ok(());
        }

        let next = self
            .open
            .iter()
            .map(|builder| builder.broadcast(args))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            args = %args.iter().join(", "),
            builders = next.len(),
            "broadcast"
        );

        self.open = next;
        Ok(())
    }

    /// Moves the most recently started builder to the completed list.
    #[allow(clippy::result_large_err)]
    pub fn complete(&mut self) -> Result<(), Error> {
        let builder = self.open.pop().ok_or(Error::NoOpenBuilder)?;

        tracing::debug!(
            template = builder.template_id(),
            generation = builder.generation(),
            pending = self.pending(),
            "completed"
        );
        self.completed.push(builder);
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.open.len()
    }

    pub fn state(&self) -> SessionState {
        match self.open.len() {
            0 => SessionState::Idle,
            n => SessionState::Open(n),
        }
    }

    /// Open builders, oldest first.
    pub fn open_builders(&self) -> &[Builder] {
        &self.open
    }

    /// Completed builders in completion order.
    pub fn completed(&self) -> &[Builder] {
        &self.completed
    }

    /// Renders completed builders first, then the open ones in start order.
    pub fn render(&self) -> Vec<String> {
        self.emitter.render(&self.trees())
    }

    pub fn render_to_string(&self) -> String {
        self.emitter.render_to_string(&self.trees())
    }

    fn trees(&self) -> Vec<SyntaxNode> {
        if !self.open.is_empty() {
            tracing::warn!(pending = self.pending(), "rendering with open builders");
        }

        self.completed
            .iter()
            .chain(self.open.iter())
            .map(Builder::node)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use metagen_lang::ast::{MethodDeclaration, TypeDeclaration};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::{
        args,
        rule::{RuleRegistry, RuleSet},
        template::EmbeddedTemplates,
    };

    const FOO: &str = r#"
        using System;

        namespace Demo;

        public class Foo
        {
            private interface IRewriteFoo : IRewriteRules { }
        }
    "#;

    const BAR: &str = r#"
        using System;
        using System.Text;

        namespace Demo;

        public class Bar
        {
            public int Count() => 0;

            private interface IRewriteBar : IRewriteRules { }
        }
    "#;

    const BROKEN: &str = r#"
        namespace Demo;

        public class Broken
        {
            private interface IRewriteBroken : IRewriteRules { }
        }
    "#;

    #[fixture]
    fn session() -> Session<EmbeddedTemplates> {
        let templates = EmbeddedTemplates::new()
            .with("Foo", FOO)
            .with("Bar", BAR)
            .with("Broken", BROKEN);
        let registry = RuleRegistry::new()
            .with(
                "Foo",
                RuleSet::new().rule("Foo", |node: TypeDeclaration, name: String| node.with_name(name)),
            )
            .with(
                "Bar",
                RuleSet::new().rule("Count", |node: MethodDeclaration, _: bool| node.with_name("Total")),
            )
            .with(
                "Broken",
                RuleSet::new().rule("Missing", |node: TypeDeclaration| node),
            );

        Session::with_config(
            TemplateLoader::new(templates, registry),
            EmitterConfig {
                formatter: metagen_formatter::FormatterConfig {
                    line_ending: metagen_formatter::LineEnding::Lf,
                    ..Default::default()
                },
            },
        )
    }

    #[rstest]
    fn test_start_and_complete(mut session: Session<EmbeddedTemplates>) {
        assert_eq!(session.state(), SessionState::Idle);

        session.start("Foo").unwrap();
        session.start("Bar").unwrap();
        assert_eq!(session.state(), SessionState::Open(2));

        session.complete().unwrap();
        assert_eq!(session.completed()[0].template_id(), "Bar");
        assert_eq!(session.open_builders()[0].template_id(), "Foo");

        session.complete().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(matches!(session.complete(), Err(Error::NoOpenBuilder)));
    }

    #[rstest]
    #[case::unknown("Nope")]
    #[case::bad_target("Broken")]
    fn test_failed_start_leaves_session_unchanged(mut session: Session<EmbeddedTemplates>, #[case] id: &str) {
        session.start("Foo").unwrap();

        assert!(session.start(id).is_err());
        assert_eq!(session.pending(), 1);
        assert!(session.completed().is_empty());
    }

    #[rstest]
    fn test_broadcast_reaches_every_open_builder(mut session: Session<EmbeddedTemplates>) {
        session.start("Foo").unwrap();
        session.start("Bar").unwrap();

        session.broadcast(&args!["Renamed"]).unwrap();
        session.broadcast(&args![true]).unwrap();

        let generations = session
            .open_builders()
            .iter()
            .map(Builder::generation)
            .collect::<Vec<_>>();
        assert_eq!(generations, vec![2, 2]);

        let rendered = session.render_to_string();
        assert!(rendered.contains("class Renamed"));
        assert!(rendered.contains("public int Total()\n            => 0;"));
    }

    #[rstest]
    fn test_broadcast_on_empty_stack_is_noop(mut session: Session<EmbeddedTemplates>) {
        assert!(session.broadcast(&args!["x"]).is_ok());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[rstest]
    fn test_broadcast_is_all_or_nothing() {
        let templates = EmbeddedTemplates::new().with("Foo", FOO).with("Bar", BAR);
        let registry = RuleRegistry::new()
            .with(
                "Foo",
                RuleSet::new().rule("Foo", |node: TypeDeclaration, name: String| node.with_name(name)),
            )
            .with(
                "Bar",
                RuleSet::new().rule(
                    "Count",
                    |_: MethodDeclaration, _: String| -> Result<MethodDeclaration, crate::RuleError> {
                        Err(crate::RuleError::new("nope"))
                    },
                ),
            );
        let mut session = Session::new(TemplateLoader::new(templates, registry));
        session.start("Foo").unwrap();
        session.start("Bar").unwrap();

        assert!(session.broadcast(&args!["Renamed"]).is_err());
        assert!(session.open_builders().iter().all(|b| b.generation() == 0));
    }

    #[rstest]
    fn test_render_orders_completed_before_open(mut session: Session<EmbeddedTemplates>) {
        session.start("Foo").unwrap();
        session.start("Bar").unwrap();
        session.complete().unwrap();

        assert_eq!(
            session.render(),
            vec![
                "using System;".to_string(),
                "using System.Text;".to_string(),
                "\nnamespace Demo\n{\n    public class Bar\n    {\n        public int Count()\n            => 0;\n    }\n}".to_string(),
                "\nnamespace Demo\n{\n    public class Foo\n    {\n    }\n}".to_string(),
            ]
        );
    }
}
