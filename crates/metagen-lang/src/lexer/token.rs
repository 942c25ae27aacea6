use std::fmt::{self, Display, Formatter};

use smol_str::SmolStr;

use crate::range::Range;

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone)]
pub struct Token {
    pub range: Range,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the identifier text when the token is an identifier or contextual keyword.
    pub fn ident(&self) -> Option<&SmolStr> {
        match &self.kind {
            TokenKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.ident().is_some_and(|ident| ident == text)
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone)]
pub enum TokenKind {
    AndAnd,
    Asterisk,
    Bang,
    CharLiteral(SmolStr),
    Colon,
    Comma,
    Dot,
    Eof,
    EqEq,
    Equal,
    FatArrow,
    Gt,
    Gte,
    Ident(SmolStr),
    LBrace,
    LBracket,
    LParen,
    Lt,
    Lte,
    Minus,
    MinusEqual,
    NeEq,
    NumberLiteral(SmolStr),
    OrOr,
    Percent,
    Plus,
    PlusEqual,
    Question,
    QuestionQuestion,
    RBrace,
    RBracket,
    RParen,
    SemiColon,
    Slash,
    StringLiteral(SmolStr),
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.kind)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match &self {
            TokenKind::AndAnd => write!(f, "&&"),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::CharLiteral(c) => write!(f, "{}", c),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Eof => write!(f, ""),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::Equal => write!(f, "="),
            TokenKind::FatArrow => write!(f, "=>"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Gte => write!(f, ">="),
            TokenKind::Ident(ident) => write!(f, "{}", ident),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::LParen => write!(f, "("),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Lte => write!(f, "<="),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::MinusEqual => write!(f, "-="),
            TokenKind::NeEq => write!(f, "!="),
            TokenKind::NumberLiteral(n) => write!(f, "{}", n),
            TokenKind::OrOr => write!(f, "||"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::PlusEqual => write!(f, "+="),
            TokenKind::Question => write!(f, "?"),
            TokenKind::QuestionQuestion => write!(f, "??"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::SemiColon => write!(f, ";"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::StringLiteral(s) => write!(f, "{}", s),
        }
    }
}
