//! Template lookup and loading.
//!
//! A template is a source file whose id maps to a file name (`<id>.cs`) and to
//! a registered [`RuleSet`]. The template marks its rule module with a nested
//! declaration deriving from [`RULE_MODULE_MARKER`]; that declaration is
//! stripped before the tree is used.

use std::{borrow::Cow, fs, path::PathBuf};

use metagen_lang::{SyntaxKind, SyntaxNode};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::{
    error::Error,
    rule::{RuleRegistry, RuleSet},
};

pub const RULE_MODULE_MARKER: &str = "IRewriteRules";

pub const TEMPLATE_EXTENSION: &str = "cs";

const DEFAULT_PATHS: [&str; 3] = ["$HOME/.metagen/templates", "$ORIGIN/templates", "$ORIGIN"];

pub trait TemplateResolver: Clone + Default {
    fn resolve(&self, id: &str) -> Result<String, Error>;
    fn search_paths(&self) -> Vec<PathBuf>;
    fn set_search_paths(&mut self, paths: Vec<PathBuf>);
}

pub fn template_file_name(id: &str) -> String {
    format!("{}.{}", id, TEMPLATE_EXTENSION)
}

/// In-memory templates, typically filled with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedTemplates {
    sources: FxHashMap<SmolStr, Cow<'static, str>>,
}

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<SmolStr>, source: impl Into<Cow<'static, str>>) -> Self {
        self.insert(id, source);
        self
    }

    pub fn insert(&mut self, id: impl Into<SmolStr>, source: impl Into<Cow<'static, str>>) {
        self.sources.insert(id.into(), source.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids = self.sources.keys().map(SmolStr::as_str).collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}

impl TemplateResolver for EmbeddedTemplates {
    fn resolve(&self, id: &str) -> Result<String, Error> {
        self.sources
            .get(id)
            .map(|source| source.to_string())
            .ok_or_else(|| Error::TemplateNotFound(Cow::Owned(id.to_string())))
    }

    fn search_paths(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    fn set_search_paths(&mut self, _paths: Vec<PathBuf>) {}
}

/// Looks templates up on disk. `$HOME` and `$ORIGIN` (the working directory)
/// are expanded in search paths.
#[derive(Debug, Clone, Default)]
pub struct LocalFsTemplateResolver {
    pub(crate) paths: Option<Vec<PathBuf>>,
}

impl LocalFsTemplateResolver {
    pub fn new(paths: Option<Vec<PathBuf>>) -> Self {
        Self { paths }
    }

    pub fn get_path(&self, id: &str) -> Result<PathBuf, Error> {
        search(id, &self.search_paths())
    }
}

impl TemplateResolver for LocalFsTemplateResolver {
    fn resolve(&self, id: &str) -> Result<String, Error> {
        let path = self.get_path(id)?;
        fs::read_to_string(&path).map_err(|e| Error::TemplateUnreadable {
            id: Cow::Owned(id.to_string()),
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn search_paths(&self) -> Vec<PathBuf> {
        self.paths
            .clone()
            .unwrap_or_else(|| DEFAULT_PATHS.iter().map(PathBuf::from).collect())
    }

    fn set_search_paths(&mut self, paths: Vec<PathBuf>) {
        self.paths = if paths.is_empty() { None } else { Some(paths) };
    }
}

fn search(id: &str, search_paths: &[PathBuf]) -> Result<PathBuf, Error> {
    let home = dirs::home_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let origin = std::env::current_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = template_file_name(id);

    search_paths
        .iter()
        .map(|path| {
            let path = path
                .to_string_lossy()
                .replace("$ORIGIN", &origin)
                .replace("$HOME", &home);
            PathBuf::from(path).join(&file_name)
        })
        .find(|p| p.is_file())
        .ok_or_else(|| Error::TemplateNotFound(Cow::Owned(id.to_string())))
}

/// A parsed template with its rule module stripped, ready for a builder.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: SmolStr,
    pub source: String,
    pub root: SyntaxNode,
    /// Name of the declaration that carried the rule module.
    pub rule_module: SmolStr,
    pub rules: RuleSet,
}

/// Resolves template sources and pairs them with registered rules.
/// Embedded templates take precedence over the resolver.
#[derive(Debug, Clone, Default)]
pub struct TemplateLoader<R: TemplateResolver = LocalFsTemplateResolver> {
    embedded: EmbeddedTemplates,
    resolver: R,
    registry: RuleRegistry,
}

impl<R: TemplateResolver> TemplateLoader<R> {
    pub fn new(resolver: R, registry: RuleRegistry) -> Self {
        Self {
            embedded: EmbeddedTemplates::default(),
            resolver,
            registry,
        }
    }

    pub fn with_embedded(mut self, embedded: EmbeddedTemplates) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.resolver.search_paths()
    }

    pub fn set_search_paths(&mut self, paths: Vec<PathBuf>) {
        self.resolver.set_search_paths(paths);
    }

    pub fn resolve(&self, id: &str) -> Result<String, Error> {
        if self.embedded.contains(id) {
            self.embedded.resolve(id)
        } else {
            self.resolver.resolve(id)
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn load(&self, id: &str) -> Result<Template, Error> {
        let source = self.resolve(id)?;
        let root = metagen_lang::parse(&source).map_err(|e| Error::Parse {
            id: Cow::Owned(id.to_string()),
            source: e,
        })?;

        let markers = find_rule_modules(&root);
        let marker = match markers.as_slice() {
            [marker] => marker.clone(),
            [] => return Err(Error::RuleModuleMissing(Cow::Owned(id.to_string()))),
            _ => {
                return Err(Error::RuleModuleAmbiguous {
                    id: Cow::Owned(id.to_string()),
                    count: markers.len(),
                });
            }
        };

        let rules = self
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| Error::RuleModuleMissing(Cow::Owned(id.to_string())))?;

        warn_undeclared_rules(id, &marker, &rules);

        Ok(Template {
            id: id.into(),
            root: root.remove(&marker),
            rule_module: marker.token().unwrap_or_default().into(),
            source,
            rules,
        })
    }
}

/// Declarations whose base list names the rule-module marker.
pub fn find_rule_modules(root: &SyntaxNode) -> Vec<SyntaxNode> {
    root.descendants()
        .filter(|node| node.kind().is_type_declaration())
        .filter(|node| {
            node.child(SyntaxKind::BaseList).is_some_and(|bases| {
                bases.children().iter().filter_map(SyntaxNode::token).any(|base| {
                    base.rsplit('.')
                        .next()
                        .is_some_and(|name| name == RULE_MODULE_MARKER)
                })
            })
        })
        .collect()
}

// The marker may list the rule signatures it expects; flag registered rules it does not mention.
fn warn_undeclared_rules(id: &str, marker: &SyntaxNode, rules: &RuleSet) {
    let declared = marker
        .children_of(SyntaxKind::MethodDeclaration)
        .filter_map(SyntaxNode::token)
        .collect::<Vec<_>>();

    if declared.is_empty() {
        return;
    }

    for rule in rules {
        if !declared.iter().any(|name| name.eq_ignore_ascii_case(rule.name())) {
            tracing::warn!(
                template = id,
                rule = rule.name(),
                "rule is not declared by the template's rule module"
            );
        }
    }
}
