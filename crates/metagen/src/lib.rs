//! `metagen` rewrites C# template declarations into generated source.
//!
//! A template is a source file whose nested rule module (a declaration
//! deriving from `IRewriteRules`) is paired with a [`RuleSet`] registered under
//! the template id. A [`Session`] keeps a stack of open [`Builder`]s; every
//! broadcast hands one argument tuple to each of them, and each rule fires only
//! when the tuple fits its parameters.
//!
//! ## Examples
//!
//! ```rust
//! use metagen::{
//!     EmbeddedTemplates, RuleRegistry, RuleSet, Session, TemplateLoader, args,
//!     ast::TypeDeclaration,
//! };
//!
//! let templates = EmbeddedTemplates::new().with(
//!     "Demo.Dto",
//!     "namespace Demo; public record Dto(string Id) { private interface IRewriteDto : IRewriteRules { } }",
//! );
//! let registry = RuleRegistry::new().with(
//!     "Demo.Dto",
//!     RuleSet::new().rule("Dto", |node: TypeDeclaration, name: String| {
//!         node.with_name(format!("{}Request", name))
//!     }),
//! );
//!
//! let mut session = Session::new(TemplateLoader::new(templates, registry));
//! session.start("Demo.Dto").unwrap();
//! session.broadcast(&args!["Product"]).unwrap();
//! session.complete().unwrap();
//!
//! assert!(session.render_to_string().contains("public record ProductRequest(string Id);"));
//! ```
mod args;
mod builder;
mod emitter;
mod error;
mod rule;
mod session;
mod template;
mod tracker;

pub use args::{Arg, ArgType, FromArg, TypeName};
pub use builder::Builder;
pub use emitter::{Emitter, EmitterConfig};
pub use error::{Error, ErrorCategory};
pub use metagen_formatter::{FormatterConfig, LineEnding};
pub use metagen_lang::{AstNode, SyntaxKind, SyntaxNode, ast, make};
pub use rule::{IntoRuleOutput, Rule, RuleDefinition, RuleError, RuleRegistry, RuleSet, TargetKind};
pub use session::{Session, SessionState};
pub use template::{
    EmbeddedTemplates, LocalFsTemplateResolver, RULE_MODULE_MARKER, TEMPLATE_EXTENSION, Template,
    TemplateLoader, TemplateResolver, find_rule_modules, template_file_name,
};
pub use tracker::NodeTracker;
