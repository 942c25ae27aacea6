//! `metagen-lang` parses the C#-flavoured declaration language used by
//! metagen templates into immutable [`SyntaxNode`] trees.
//!
//! ## Examples
//!
//! ```rust
//! use metagen_lang::{SyntaxKind, parse};
//!
//! let unit = parse("namespace Demo; public record Foo(string Id);").unwrap();
//! let record = unit.first_descendant(SyntaxKind::RecordDeclaration).unwrap();
//!
//! assert_eq!(record.declared_name(), Some("Foo"));
//! ```
pub mod ast;
mod error;
mod lexer;
pub mod make;
mod parser;
mod range;
pub mod syntax;

pub use ast::AstNode;
pub use error::{Error, InnerError};
pub use lexer::Options as LexerOptions;
pub use lexer::error::LexerError;
pub use lexer::token::{Token, TokenKind};
pub use parser::Parser;
pub use parser::binary_precedence;
pub use parser::error::ParseError;
pub use range::{Position, Range};
pub use syntax::{NodeId, NodeTag, Replacement, SyntaxKind, SyntaxNode, SyntaxTree};

use lexer::Lexer;

#[allow(clippy::result_large_err)]
pub fn tokenize(code: &str, options: LexerOptions) -> Result<Vec<Token>, Error> {
    Lexer::new(options)
        .tokenize(code)
        .map_err(|e| Error::from_error(code, InnerError::Lexer(e)))
}

/// Parses a complete template source.
#[allow(clippy::result_large_err)]
pub fn parse(code: &str) -> Result<SyntaxNode, Error> {
    Parser::new(tokenize(code, LexerOptions::default())?)
        .parse()
        .map_err(|e| Error::from_error(code, InnerError::Parse(e)))
}

#[allow(clippy::result_large_err)]
pub fn parse_expression(code: &str) -> Result<SyntaxNode, Error> {
    Parser::new(tokenize(code, LexerOptions::default())?)
        .parse_expression_only()
        .map_err(|e| Error::from_error(code, InnerError::Parse(e)))
}

/// Parses a single member declaration such as a method or property.
#[allow(clippy::result_large_err)]
pub fn parse_member(code: &str) -> Result<SyntaxNode, Error> {
    Parser::new(tokenize(code, LexerOptions::default())?)
        .parse_member_only()
        .map_err(|e| Error::from_error(code, InnerError::Parse(e)))
}
