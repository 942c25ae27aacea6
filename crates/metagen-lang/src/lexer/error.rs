use thiserror::Error;

use crate::range::Range;

#[derive(Error, Debug, PartialEq)]
pub enum LexerError {
    #[error("Unexpected character `{0}`")]
    UnexpectedCharacter(char, Range),
    #[error("Unterminated literal")]
    UnterminatedLiteral(Range),
}

impl LexerError {
    pub fn range(&self) -> Range {
        match self {
            LexerError::UnexpectedCharacter(_, range) => *range,
            LexerError::UnterminatedLiteral(range) => *range,
        }
    }
}
