use thiserror::Error;

use crate::lexer::token::Token;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token `{0}`")]
    UnexpectedToken(Token),
    #[error("Unexpected EOF detected")]
    UnexpectedEOFDetected(Token),
    #[error("Expected {} but got `{}`", .1, if .0.is_eof() { "EOF".to_string() } else { .0.to_string() })]
    Expected(Token, &'static str),
    #[error("Expected a closing parenthesis `)` but got `{}` delimiter", if .0.is_eof() { "EOF".to_string() } else { .0.to_string() })]
    ExpectedClosingParen(Token),
    #[error("Expected a closing brace `}}` but got `{}` delimiter", if .0.is_eof() { "EOF".to_string() } else { .0.to_string() })]
    ExpectedClosingBrace(Token),
    #[error("Expected a closing bracket `]` but got `{}` delimiter", if .0.is_eof() { "EOF".to_string() } else { .0.to_string() })]
    ExpectedClosingBracket(Token),
}

impl ParseError {
    pub fn token(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken(token)
            | ParseError::UnexpectedEOFDetected(token)
            | ParseError::Expected(token, _)
            | ParseError::ExpectedClosingParen(token)
            | ParseError::ExpectedClosingBrace(token)
            | ParseError::ExpectedClosingBracket(token) => token,
        }
    }
}
