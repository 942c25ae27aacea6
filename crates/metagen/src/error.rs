use std::borrow::Cow;

use miette::Diagnostic;
use thiserror::Error;

use crate::rule::RuleError;

/// Broad class of an [`Error`], deciding who has to fix it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A template could not be turned into a builder.
    Resolution,
    /// A rule set does not fit its template.
    Configuration,
    /// Start and Complete calls are unbalanced.
    Protocol,
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Template `{0}` not found")]
    #[diagnostic(
        code(metagen::template_not_found),
        help("Check the template id and the template search paths.")
    )]
    TemplateNotFound(Cow<'static, str>),

    #[error("Template `{id}` could not be read: {message}")]
    #[diagnostic(code(metagen::template_unreadable))]
    TemplateUnreadable { id: Cow<'static, str>, message: String },

    #[error("Template `{id}` could not be parsed")]
    #[diagnostic(code(metagen::parse_error))]
    Parse {
        id: Cow<'static, str>,
        #[diagnostic_source]
        source: metagen_lang::Error,
    },

    #[error("Template `{0}` has no rule module")]
    #[diagnostic(
        code(metagen::rule_module_missing),
        help("Declare a nested interface deriving from `IRewriteRules` and register a rule set for the template.")
    )]
    RuleModuleMissing(Cow<'static, str>),

    #[error("Template `{id}` declares {count} rule modules")]
    #[diagnostic(
        code(metagen::rule_module_ambiguous),
        help("Keep exactly one nested declaration deriving from `IRewriteRules`.")
    )]
    RuleModuleAmbiguous { id: Cow<'static, str>, count: usize },

    #[error("Could not find target {rule} of type {kind} in `{id}`")]
    #[diagnostic(
        code(metagen::target_not_found),
        help("A rule is named after the declaration it rewrites; rename the rule or the declaration.")
    )]
    TargetNotFound {
        id: Cow<'static, str>,
        rule: Cow<'static, str>,
        kind: &'static str,
    },

    #[error("Rule {rule} of type {kind} matches {count} declarations in `{id}`")]
    #[diagnostic(
        code(metagen::target_ambiguous),
        help("Declaration names are compared case-insensitively; give each rule target a unique name.")
    )]
    TargetAmbiguous {
        id: Cow<'static, str>,
        rule: Cow<'static, str>,
        kind: &'static str,
        count: usize,
    },

    #[error("Target of rule {rule} is no longer tracked in `{id}`")]
    #[diagnostic(code(metagen::tracking_lost))]
    TrackingLost {
        id: Cow<'static, str>,
        rule: Cow<'static, str>,
    },

    #[error("Rule {rule} failed in `{id}`: {source}")]
    #[diagnostic(code(metagen::rule_failed))]
    RuleFailed {
        id: Cow<'static, str>,
        rule: Cow<'static, str>,
        source: RuleError,
    },

    #[error("No open builder to complete")]
    #[diagnostic(
        code(metagen::no_open_builder),
        help("Every Complete must be preceded by a matching Start.")
    )]
    NoOpenBuilder,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::TemplateNotFound(_)
            | Error::TemplateUnreadable { .. }
            | Error::Parse { .. }
            | Error::RuleModuleMissing(_)
            | Error::RuleModuleAmbiguous { .. } => ErrorCategory::Resolution,
            Error::TargetNotFound { .. }
            | Error::TargetAmbiguous { .. }
            | Error::TrackingLost { .. }
            | Error::RuleFailed { .. } => ErrorCategory::Configuration,
            Error::NoOpenBuilder => ErrorCategory::Protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::not_found(Error::TemplateNotFound("A".into()), ErrorCategory::Resolution)]
    #[case::missing(Error::RuleModuleMissing("A".into()), ErrorCategory::Resolution)]
    #[case::ambiguous_module(Error::RuleModuleAmbiguous { id: "A".into(), count: 2 }, ErrorCategory::Resolution)]
    #[case::target_not_found(
        Error::TargetNotFound { id: "A".into(), rule: "Foo".into(), kind: "MethodDeclaration" },
        ErrorCategory::Configuration
    )]
    #[case::tracking_lost(Error::TrackingLost { id: "A".into(), rule: "Foo".into() }, ErrorCategory::Configuration)]
    #[case::no_open_builder(Error::NoOpenBuilder, ErrorCategory::Protocol)]
    fn test_category(#[case] error: Error, #[case] expected: ErrorCategory) {
        assert_eq!(error.category(), expected);
    }

    #[test]
    fn test_parse_error_keeps_diagnostic() {
        let source = metagen_lang::parse("class A {").unwrap_err();
        let error = Error::Parse {
            id: "A".into(),
            source,
        };

        assert_eq!(error.to_string(), "Template `A` could not be parsed");
        assert!(error.diagnostic_source().is_some());
        assert_eq!(error.code().unwrap().to_string(), "metagen::parse_error");
    }

    #[test]
    fn test_target_not_found_message() {
        let error = Error::TargetNotFound {
            id: "Demo".into(),
            rule: "SaveAsync".into(),
            kind: "MethodDeclaration",
        };
        assert_eq!(
            error.to_string(),
            "Could not find target SaveAsync of type MethodDeclaration in `Demo`"
        );
    }
}
