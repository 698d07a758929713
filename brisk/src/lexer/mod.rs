//! Lexer implementation using logos

mod token;

pub use token::{lookup_ident, Token, TokenKind};

use crate::ast::Span;
use logos::Logos;

/// Streaming lexer over a source string
///
/// Once the input is exhausted, [`Lexer::next_token`] keeps returning `EOF`.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    end: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            end: source.len(),
        }
    }

    /// Consume and return the next token
    pub fn next_token(&mut self) -> Token {
        let Some(result) = self.inner.next() else {
            return Token::eof(self.end);
        };

        let span = Span::from(self.inner.span());
        let slice = self.inner.slice();
        match result {
            Ok(TokenKind::Ident) => Token::new(lookup_ident(slice), slice, span),
            Ok(TokenKind::Str) => {
                let inner = &slice[1..];
                Token::new(TokenKind::Str, inner.strip_suffix('"').unwrap_or(inner), span)
            }
            Ok(kind) => Token::new(kind, slice, span),
            Err(()) => Token::new(TokenKind::Illegal, slice, span),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (!token.is(TokenKind::Eof)).then_some(token)
    }
}

/// Tokenize source code, stopping before end of input
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_whitespace_only() {
        assert!(tokenize("  \t\n\r\n ").is_empty());
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        for _ in 0..3 {
            let token = lexer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(token.literal, "");
        }
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("var func return if else true false"),
            vec![
                TokenKind::Var,
                TokenKind::Func,
                TokenKind::Return,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::True,
                TokenKind::False,
            ]
        );
    }

    #[test]
    fn test_tokenize_identifiers() {
        let tokens = tokenize("foo bar_baz _x vars");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Ident));
        let literals: Vec<_> = tokens.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(literals, vec!["foo", "bar_baz", "_x", "vars"]);
    }

    #[test]
    fn test_identifier_stops_at_digit() {
        let tokens = tokenize("x1");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].literal, "x");
        assert_eq!(tokens[1].kind, TokenKind::Int);
        assert_eq!(tokens[1].literal, "1");
    }

    #[test]
    fn test_tokenize_integer() {
        let tokens = tokenize("12345");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].literal, "12345");
    }

    #[test]
    fn test_negative_integer_is_minus_then_int() {
        assert_eq!(kinds("-42"), vec![TokenKind::Minus, TokenKind::Int]);
    }

    #[test]
    fn test_tokenize_string() {
        let tokens = tokenize(r#""hello world""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].literal, "hello world");
    }

    #[test]
    fn test_string_has_no_escapes() {
        let tokens = tokenize(r#""a\nb""#);
        assert_eq!(tokens[0].literal, r"a\nb");
    }

    #[test]
    fn test_empty_string() {
        let tokens = tokenize(r#""""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].literal, "");
    }

    #[test]
    fn test_unterminated_string_reads_to_end() {
        let tokens = tokenize(r#""abc def"#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].literal, "abc def");
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("= + - * / % ! < >"),
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Bang,
                TokenKind::Lt,
                TokenKind::Gt,
            ]
        );
    }

    #[test]
    fn test_tokenize_two_char_operators() {
        assert_eq!(
            kinds("== != <= >="),
            vec![TokenKind::EqEq, TokenKind::NotEq, TokenKind::LtEq, TokenKind::GtEq]
        );
    }

    #[test]
    fn test_two_char_operator_without_space() {
        assert_eq!(
            kinds("a==b!c"),
            vec![
                TokenKind::Ident,
                TokenKind::EqEq,
                TokenKind::Ident,
                TokenKind::Bang,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_tokenize_delimiters() {
        assert_eq!(
            kinds(", ; : ( ) { } [ ]"),
            vec![
                TokenKind::Comma,
                TokenKind::Semi,
                TokenKind::Colon,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
            ]
        );
    }

    #[test]
    fn test_illegal_character() {
        let tokens = tokenize("5 @ 6");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].literal, "@");
    }

    #[test]
    fn test_single_quote_is_illegal() {
        let tokens = tokenize("'a'");
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert_eq!(tokens[0].literal, "'");
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("var answer");
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(4, 10));
    }

    #[test]
    fn test_eof_span_is_end_of_input() {
        let mut lexer = Lexer::new("ab  ");
        lexer.next_token();
        assert_eq!(lexer.next_token().span, Span::new(4, 4));
    }

    #[test]
    fn test_tokenize_program() {
        let source = r#"
            var add = func(x, y) {
                return x + y;
            };
            var result = add(five, 10);
            if (5 < 10) { true } else { false }
            [1, 2];
            {"one": 1}
        "#;
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[3].kind, TokenKind::Func);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Illegal));
        let strings: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Str).collect();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].literal, "one");
    }

    #[test]
    fn test_brace_counting() {
        let tokens = tokenize("func() { if (x) {");
        let open = tokens.iter().filter(|t| t.is(TokenKind::LBrace)).count();
        let close = tokens.iter().filter(|t| t.is(TokenKind::RBrace)).count();
        assert_eq!(open - close, 2);
    }
}
