use miette::{Diagnostic, SourceOffset, SourceSpan};

use crate::{lexer::error::LexerError, parser::error::ParseError, range::Range};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InnerError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl InnerError {
    fn range(&self) -> Range {
        match self {
            InnerError::Lexer(err) => err.range(),
            InnerError::Parse(err) => err.token().range,
        }
    }
}

/// A lexer or parser failure, positioned in the template source.
#[derive(PartialEq, Debug, thiserror::Error)]
#[error("{cause}")]
pub struct Error {
    pub cause: InnerError,
    pub source_code: String,
    pub location: SourceSpan,
}

impl Error {
    pub fn from_error(source_code: impl Into<String>, cause: InnerError) -> Self {
        let source_code = source_code.into();
        let range = cause.range();

        let start = SourceOffset::from_location(&source_code, range.start.line as usize, range.start.column);
        let end = SourceOffset::from_location(&source_code, range.end.line as usize, range.end.column);
        let location = SourceSpan::new(start, std::cmp::max(end.offset().saturating_sub(start.offset()), 1));

        Self {
            cause,
            source_code,
            location,
        }
    }
}

impl Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let c = match &self.cause {
            InnerError::Lexer(LexerError::UnexpectedCharacter(_, _)) => "LexerError::UnexpectedCharacter",
            InnerError::Lexer(LexerError::UnterminatedLiteral(_)) => "LexerError::UnterminatedLiteral",
            InnerError::Parse(ParseError::UnexpectedToken(_)) => "ParseError::UnexpectedToken",
            InnerError::Parse(ParseError::UnexpectedEOFDetected(_)) => "ParseError::UnexpectedEOFDetected",
            InnerError::Parse(ParseError::Expected(_, _)) => "ParseError::Expected",
            InnerError::Parse(ParseError::ExpectedClosingParen(_)) => "ParseError::ExpectedClosingParen",
            InnerError::Parse(ParseError::ExpectedClosingBrace(_)) => "ParseError::ExpectedClosingBrace",
            InnerError::Parse(ParseError::ExpectedClosingBracket(_)) => "ParseError::ExpectedClosingBracket",
        };
        Some(Box::new(c))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let msg = match &self.cause {
            InnerError::Lexer(LexerError::UnexpectedCharacter(_, _)) => {
                "Templates only accept the declaration subset of C#; remove or rewrite this character."
            }
            InnerError::Lexer(LexerError::UnterminatedLiteral(_)) => "Close the string or character literal.",
            InnerError::Parse(ParseError::UnexpectedEOFDetected(_)) => {
                "The template ended unexpectedly. Make sure every declaration is complete."
            }
            InnerError::Parse(ParseError::ExpectedClosingParen(_))
            | InnerError::Parse(ParseError::ExpectedClosingBrace(_))
            | InnerError::Parse(ParseError::ExpectedClosingBracket(_)) => "Check that every delimiter is balanced.",
            InnerError::Parse(_) => "Check for unexpected or misplaced tokens in the template.",
        };
        Some(Box::new(msg))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(miette::LabeledSpan::new_with_span(
            Some(format!("{}", self.cause)),
            self.location,
        ))))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }
}
