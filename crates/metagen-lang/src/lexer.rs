pub mod error;
pub mod token;

use error::LexerError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take, take_until},
    character::complete::{alpha1, alphanumeric1, anychar, char, digit1, hex_digit1, multispace1, none_of, not_line_ending, one_of},
    combinator::{map, opt, recognize, value},
    error::ErrorKind,
    multi::many0,
    sequence::{delimited, pair, preceded},
};
use smol_str::SmolStr;
use token::{Token, TokenKind};

use crate::range::{Position, Range, Span};

macro_rules! define_token_parser {
    ($name:ident, $tag:expr, $kind:expr) => {
        fn $name(input: Span) -> IResult<Span, Token> {
            map(tag($tag), |span: Span| Token {
                range: span.into(),
                kind: $kind,
            })
            .parse(input)
        }
    };
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Stop at the first unrecognised character instead of failing.
    pub ignore_errors: bool,
}

pub struct Lexer {
    options: Options,
}

impl Lexer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, LexerError> {
        match tokens(Span::new(input)) {
            Ok((span, mut tokens)) => match span.fragment().chars().next() {
                Some(c) if !self.options.ignore_errors => {
                    let start: Position = span.into();
                    Err(LexerError::UnexpectedCharacter(
                        c,
                        Range {
                            start,
                            end: Position::new(start.line, start.column + 1),
                        },
                    ))
                }
                _ => {
                    let eof: Position = span.into();
                    tokens.push(Token {
                        range: Range { start: eof, end: eof },
                        kind: TokenKind::Eof,
                    });
                    Ok(tokens)
                }
            },
            Err(nom::Err::Failure(e)) => Err(LexerError::UnterminatedLiteral(e.input.into())),
            Err(nom::Err::Error(e)) => {
                let start: Position = e.input.into();
                let c = e.input.fragment().chars().next().unwrap_or_default();
                Err(LexerError::UnexpectedCharacter(
                    c,
                    Range {
                        start,
                        end: Position::new(start.line, start.column + 1),
                    },
                ))
            }
            Err(nom::Err::Incomplete(_)) => unreachable!(),
        }
    }
}

// Whitespace, comments and preprocessor lines carry no meaning for templates.
fn trivia(input: Span) -> IResult<Span, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), preceded(tag("//"), not_line_ending)),
            value((), delimited(tag("/*"), take_until("*/"), tag("*/"))),
            value((), preceded(char('#'), not_line_ending)),
        ))),
    )
    .parse(input)
}

fn ident(input: Span) -> IResult<Span, Token> {
    map(
        recognize(pair(
            opt(char('@')),
            pair(alt((alpha1, tag("_"))), many0(alt((alphanumeric1, tag("_"))))),
        )),
        |span: Span| {
            let text = span.fragment().trim_start_matches('@');
            Token {
                range: span.into(),
                kind: TokenKind::Ident(SmolStr::new(text)),
            }
        },
    )
    .parse(input)
}

fn number_literal(input: Span) -> IResult<Span, Token> {
    map(
        recognize(pair(
            alt((
                recognize(pair(tag_no_case("0x"), hex_digit1)),
                recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            )),
            opt(one_of("mMfFdDlLuU")),
        )),
        |span: Span| Token {
            range: span.into(),
            kind: TokenKind::NumberLiteral(SmolStr::new(span.fragment())),
        },
    )
    .parse(input)
}

fn char_literal(input: Span) -> IResult<Span, Token> {
    map(
        recognize(delimited(
            char('\''),
            alt((
                recognize((char('\\'), one_of("ux"), hex_digit1)),
                recognize(pair(char('\\'), anychar)),
                recognize(none_of("'\\\n")),
            )),
            char('\''),
        )),
        |span: Span| Token {
            range: span.into(),
            kind: TokenKind::CharLiteral(SmolStr::new(span.fragment())),
        },
    )
    .parse(input)
}

/// Regular, verbatim (`@`) and interpolated (`$`) strings, kept verbatim.
fn string_literal(input: Span) -> IResult<Span, Token> {
    let fragment = *input.fragment();
    let prefix_len = fragment.chars().take_while(|c| matches!(c, '$' | '@')).count();
    let prefix = &fragment[..prefix_len];

    if prefix_len > 2 || !fragment[prefix_len..].starts_with('"') {
        return Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::Char)));
    }

    let body_start = prefix_len + 1;
    let Some(body_len) = scan_string(&fragment[body_start..], prefix.contains('@'), prefix.contains('$')) else {
        return Err(nom::Err::Failure(nom::error::Error::new(input, ErrorKind::Char)));
    };

    let char_count = fragment[..body_start + body_len].chars().count();
    let (rest, span) = take(char_count).parse(input)?;

    Ok((
        rest,
        Token {
            range: span.into(),
            kind: TokenKind::StringLiteral(SmolStr::new(span.fragment())),
        },
    ))
}

/// Returns the byte length of the string body including its closing quote.
fn scan_string(body: &str, verbatim: bool, interpolated: bool) -> Option<usize> {
    let mut chars = body.char_indices().peekable();
    let mut depth = 0usize;

    while let Some((i, c)) = chars.next() {
        if depth > 0 {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                '"' => {
                    let end = i + 1 + scan_string(&body[i + 1..], false, false)?;
                    while chars.peek().is_some_and(|(j, _)| *j < end) {
                        chars.next();
                    }
                }
                _ => {}
            }
            continue;
        }

        match c {
            '\\' if !verbatim => {
                chars.next();
            }
            '"' if verbatim && chars.peek().is_some_and(|(_, n)| *n == '"') => {
                chars.next();
            }
            '"' => return Some(i + 1),
            '{' if interpolated => {
                if chars.peek().is_some_and(|(_, n)| *n == '{') {
                    chars.next();
                } else {
                    depth = 1;
                }
            }
            '}' if interpolated && chars.peek().is_some_and(|(_, n)| *n == '}') => {
                chars.next();
            }
            '\n' if !verbatim => return None,
            _ => {}
        }
    }

    None
}

define_token_parser!(and_and, "&&", TokenKind::AndAnd);
define_token_parser!(asterisk, "*", TokenKind::Asterisk);
define_token_parser!(bang, "!", TokenKind::Bang);
define_token_parser!(colon, ":", TokenKind::Colon);
define_token_parser!(comma, ",", TokenKind::Comma);
define_token_parser!(dot, ".", TokenKind::Dot);
define_token_parser!(eq_eq, "==", TokenKind::EqEq);
define_token_parser!(equal, "=", TokenKind::Equal);
define_token_parser!(fat_arrow, "=>", TokenKind::FatArrow);
define_token_parser!(gt, ">", TokenKind::Gt);
define_token_parser!(gte, ">=", TokenKind::Gte);
define_token_parser!(l_brace, "{", TokenKind::LBrace);
define_token_parser!(l_bracket, "[", TokenKind::LBracket);
define_token_parser!(l_paren, "(", TokenKind::LParen);
define_token_parser!(lt, "<", TokenKind::Lt);
define_token_parser!(lte, "<=", TokenKind::Lte);
define_token_parser!(minus, "-", TokenKind::Minus);
define_token_parser!(minus_equal, "-=", TokenKind::MinusEqual);
define_token_parser!(ne_eq, "!=", TokenKind::NeEq);
define_token_parser!(or_or, "||", TokenKind::OrOr);
define_token_parser!(percent, "%", TokenKind::Percent);
define_token_parser!(plus, "+", TokenKind::Plus);
define_token_parser!(plus_equal, "+=", TokenKind::PlusEqual);
define_token_parser!(question, "?", TokenKind::Question);
define_token_parser!(question_question, "??", TokenKind::QuestionQuestion);
define_token_parser!(r_brace, "}", TokenKind::RBrace);
define_token_parser!(r_bracket, "]", TokenKind::RBracket);
define_token_parser!(r_paren, ")", TokenKind::RParen);
define_token_parser!(semi_colon, ";", TokenKind::SemiColon);
define_token_parser!(slash, "/", TokenKind::Slash);

fn operator(input: Span) -> IResult<Span, Token> {
    alt((
        fat_arrow,
        eq_eq,
        ne_eq,
        lte,
        gte,
        and_and,
        or_or,
        question_question,
        plus_equal,
        minus_equal,
        equal,
        lt,
        gt,
        bang,
        question,
        plus,
        minus,
        asterisk,
        slash,
        percent,
    ))
    .parse(input)
}

fn punctuation(input: Span) -> IResult<Span, Token> {
    alt((
        l_brace, r_brace, l_paren, r_paren, l_bracket, r_bracket, semi_colon, comma, dot, colon,
    ))
    .parse(input)
}

fn token(input: Span) -> IResult<Span, Token> {
    alt((string_literal, char_literal, number_literal, ident, operator, punctuation)).parse(input)
}

fn tokens(input: Span) -> IResult<Span, Vec<Token>> {
    let (input, tokens) = many0(preceded(trivia, token)).parse(input)?;
    let (input, _) = trivia(input)?;
    Ok((input, tokens))
}
