//! Token definitions

use crate::ast::Span;
use logos::Logos;
use std::fmt;

/// Brisk token kind
///
/// Keywords carry no logos pattern: the identifier rule scans them and
/// [`lookup_ident`] reclassifies the run afterwards.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\n\r]+")]
pub enum TokenKind {
    /// End of input
    Eof,
    /// Character that starts no token
    Illegal,

    // Identifiers and literals
    #[regex(r"[a-zA-Z_]+")]
    Ident,
    #[regex(r"[0-9]+")]
    Int,
    /// Unterminated strings run to end of input
    #[regex(r#""[^"]*"?"#)]
    Str,

    // Operators
    #[token("=")]
    Assign,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Delimiters
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Keywords
    Var,
    Func,
    Return,
    If,
    Else,
    True,
    False,
}

/// Reserved words, matched exactly against a scanned identifier
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("var", TokenKind::Var),
    ("func", TokenKind::Func),
    ("return", TokenKind::Return),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
];

/// Classify an identifier-shaped run as a keyword or a plain identifier
pub fn lookup_ident(ident: &str) -> TokenKind {
    KEYWORDS
        .iter()
        .find(|(word, _)| *word == ident)
        .map(|(_, kind)| *kind)
        .unwrap_or(TokenKind::Ident)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
            TokenKind::Assign => "=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Bang => "!",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Var => "var",
            TokenKind::Func => "func",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::True => "true",
            TokenKind::False => "false",
        };
        f.write_str(name)
    }
}

/// A scanned token: its kind, the literal text, and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    /// End-of-input token positioned at `offset`
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(offset, offset))
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.literal)
    }
}
