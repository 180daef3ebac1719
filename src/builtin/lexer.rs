//! Tokenizer for the built-in modeling language.
//!
//! Uses nom for the individual lexemes; the driver loop keeps going after an
//! unexpected character so every lexical problem ends up in the diagnostics.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, digit1, multispace1},
    combinator::{map, recognize, value},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};

use crate::engine::{Diagnostics, Pos};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Int(u32),
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,
    Hash,
    Plus,
    Minus,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Bang,
    AndAnd,
    OrOr,
    Implies,
    Eof,
}

impl Token {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Ident(s) if s == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            Token::Ident(s) => return write!(f, "`{s}`"),
            Token::Int(n) => return write!(f, "`{n}`"),
            Token::Eof => return f.write_str("end of input"),
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Hash => "#",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Eq => "=",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::Le => "<=",
            Token::Gt => ">",
            Token::Ge => ">=",
            Token::Bang => "!",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Implies => "=>",
        };
        write!(f, "`{sym}`")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub pos: Pos,
}

enum Lexeme<'a> {
    Token(Token),
    Number(&'a str),
}

/// Maps byte offsets to line/column positions.
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, starts }
    }

    fn pos(&self, offset: usize) -> Pos {
        let line = self.starts.partition_point(|&s| s <= offset);
        let start = self.starts[line - 1];
        let column = self.source[start..offset].chars().count() + 1;
        Pos::new(line, column)
    }
}

// ============================================================================
// Lexemes
// ============================================================================

fn trivia(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(alt((tag("--"), tag("//"))), take_while(|c: char| c != '\n'))),
            value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
        ))),
    )(input)
}

fn identifier(input: &str) -> IResult<&str, Token> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '\''),
        )),
        |s: &str| Token::Ident(s.to_string()),
    )(input)
}

fn operator(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Implies, tag("=>")),
        value(Token::Le, tag("<=")),
        value(Token::Le, tag("=<")),
        value(Token::Ge, tag(">=")),
        value(Token::NotEq, tag("!=")),
        value(Token::AndAnd, tag("&&")),
        value(Token::OrOr, tag("||")),
        value(Token::Eq, char('=')),
        value(Token::Lt, char('<')),
        value(Token::Gt, char('>')),
        value(Token::Bang, char('!')),
        value(Token::Plus, char('+')),
        value(Token::Minus, char('-')),
        value(Token::Hash, char('#')),
    ))(input)
}

fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::LBrace, char('{')),
        value(Token::RBrace, char('}')),
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
        value(Token::Comma, char(',')),
        value(Token::Colon, char(':')),
    ))(input)
}

fn lexeme(input: &str) -> IResult<&str, Lexeme<'_>> {
    alt((
        map(digit1, Lexeme::Number),
        map(identifier, Lexeme::Token),
        map(operator, Lexeme::Token),
        map(punctuation, Lexeme::Token),
    ))(input)
}

// ============================================================================
// Driver
// ============================================================================

/// Split `source` into tokens, always ending with `Token::Eof`.
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Vec<Spanned> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        if let Ok((after, ())) = trivia(rest) {
            rest = after;
        }
        if rest.is_empty() {
            break;
        }

        let pos = index.pos(source.len() - rest.len());

        if rest.starts_with("/*") {
            diagnostics.error(Some(pos), "unterminated block comment");
            break;
        }

        match lexeme(rest) {
            Ok((after, Lexeme::Token(token))) => {
                tokens.push(Spanned { token, pos });
                rest = after;
            }
            Ok((after, Lexeme::Number(digits))) => {
                let token = match digits.parse::<u32>() {
                    Ok(n) => Token::Int(n),
                    Err(_) => {
                        diagnostics
                            .error(Some(pos), format!("integer literal {digits} is too large"));
                        Token::Int(u32::MAX)
                    }
                };
                tokens.push(Spanned { token, pos });
                rest = after;
            }
            Err(_) => {
                let ch = rest.chars().next().unwrap_or('\u{fffd}');
                diagnostics.error(Some(pos), format!("unexpected character `{ch}`"));
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    tokens.push(Spanned {
        token: Token::Eof,
        pos: index.pos(source.len()),
    });
    tokens
}
