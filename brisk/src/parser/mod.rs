//! Pratt parser
//!
//! Expressions are parsed by precedence climbing: every token kind may own a
//! prefix handler (starts an expression) and an infix handler (extends the
//! expression to its left). The handler tables are built once per parser.
//!
//! The parser never stops at the first problem. Errors are collected in
//! order and the offending construct is dropped, so callers must check
//! [`Parser::errors`] before evaluating the returned program.

use crate::ast::{BlockStatement, Expr, Identifier, InfixOp, PrefixOp, Program, Statement};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use std::collections::HashMap;
use std::mem;


/// Stack growth parameters for deeply nested expressions
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Binding power, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==` `!=`
    Equals,
    /// `<` `<=` `>` `>=`
    LessGreater,
    /// `+` `-`
    Sum,
    /// `*` `/` `%`
    Product,
    /// `-x` `!x`
    Prefix,
    /// `f(x)`
    Call,
    /// `a[i]`
    Index,
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EqEq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => {
                Precedence::LessGreater
            }
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixParseFn<I> = fn(&mut Parser<I>) -> Option<Expr>;
type InfixParseFn<I> = fn(&mut Parser<I>, Expr) -> Option<Expr>;

/// Parser over any token stream
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: I,
    cur: Token,
    peek: Token,
    errors: Vec<ParseError>,
    prefix_fns: HashMap<TokenKind, PrefixParseFn<I>>,
    infix_fns: HashMap<TokenKind, InfixParseFn<I>>,
}

impl<'src> Parser<Lexer<'src>> {
    /// Parser reading straight from source text
    pub fn from_source(source: &'src str) -> Self {
        Parser::new(Lexer::new(source))
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        let mut parser = Parser {
            tokens,
            cur: Token::eof(0),
            peek: Token::eof(0),
            errors: Vec::new(),
            prefix_fns: HashMap::new(),
            infix_fns: HashMap::new(),
        };

        parser.register_prefix(TokenKind::Ident, Self::parse_identifier);
        parser.register_prefix(TokenKind::Int, Self::parse_integer_literal);
        parser.register_prefix(TokenKind::Str, Self::parse_string_literal);
        parser.register_prefix(TokenKind::True, Self::parse_boolean);
        parser.register_prefix(TokenKind::False, Self::parse_boolean);
        parser.register_prefix(TokenKind::Bang, Self::parse_prefix_expression);
        parser.register_prefix(TokenKind::Minus, Self::parse_prefix_expression);
        parser.register_prefix(TokenKind::LParen, Self::parse_grouped_expression);
        parser.register_prefix(TokenKind::If, Self::parse_if_expression);
        parser.register_prefix(TokenKind::Func, Self::parse_function_literal);
        parser.register_prefix(TokenKind::LBracket, Self::parse_array_literal);
        parser.register_prefix(TokenKind::LBrace, Self::parse_dictionary_literal);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
        ] {
            parser.register_infix(kind, Self::parse_infix_expression);
        }
        parser.register_infix(TokenKind::LParen, Self::parse_call_expression);
        parser.register_infix(TokenKind::LBracket, Self::parse_index_expression);

        parser.next_token();
        parser.next_token();
        parser
    }

    fn register_prefix(&mut self, kind: TokenKind, f: PrefixParseFn<I>) {
        self.prefix_fns.insert(kind, f);
    }

    fn register_infix(&mut self, kind: TokenKind, f: InfixParseFn<I>) {
        self.infix_fns.insert(kind, f);
    }

    /// Errors recorded so far, in source order
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn next_token(&mut self) {
        let next = self
            .tokens
            .next()
            .unwrap_or_else(|| Token::eof(self.peek.span.end));
        self.cur = mem::replace(&mut self.peek, next);
    }

    /// Parse every statement up to end of input
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }

        log::debug!(
            "parsed {} statement(s) with {} error(s)",
            program.statements.len(),
            self.errors.len()
        );
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur.kind {
            TokenKind::Var => self.parse_var_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_var_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.cur.literal.clone());
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_to_semicolon();
        Some(Statement::Var { name, value: value? })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_to_semicolon();
        Some(Statement::Return { value: value? })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest);
        if self.peek_is(TokenKind::Semi) {
            self.next_token();
        }
        Some(Statement::Expression { expr: expr? })
    }

    /// Advance until the current token is `;`, ignoring nesting
    fn skip_to_semicolon(&mut self) {
        while !self.cur_is(TokenKind::Semi) && !self.cur_is(TokenKind::Eof) {
            self.next_token();
        }
    }

    /// Parse an expression, growing the stack as nesting deepens
    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.parse_expression_inner(precedence)
        })
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expr> {
        let Some(prefix) = self.prefix_fns.get(&self.cur.kind).copied() else {
            self.no_prefix_parse_fn_error();
            return None;
        };
        let mut left = prefix(self)?;

        while !self.peek_is(TokenKind::Semi) && precedence < self.peek_precedence() {
            let Some(infix) = self.infix_fns.get(&self.peek.kind).copied() else {
                return Some(left);
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Ident(Identifier::new(self.cur.literal.clone())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        match self.cur.literal.parse::<i64>() {
            Ok(n) => Some(Expr::IntLit(n)),
            Err(_) => {
                let message = format!("could not parse {:?} as integer", self.cur.literal);
                self.errors.push(ParseError::new(message, self.cur.span));
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expr> {
        Some(Expr::StringLit(self.cur.literal.clone()))
    }

    fn parse_boolean(&mut self) -> Option<Expr> {
        Some(Expr::BoolLit(self.cur_is(TokenKind::True)))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let op = PrefixOp::from_token(self.cur.kind)?;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix {
            op,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let op = InfixOp::from_token(self.cur.kind)?;
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest);
        self.expect_peek(TokenKind::RParen)?;
        expr
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest);
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expr::If {
            condition: Box::new(condition?),
            consequence,
            alternative,
        })
    }

    /// Statements until `}` or end of input; the current token must be `{`
    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut block = BlockStatement::default();
        self.next_token();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                block.statements.push(stmt);
            }
            self.next_token();
        }

        block
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();
        Some(Expr::FuncLit { parameters, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }

        self.expect_peek(TokenKind::Ident)?;
        parameters.push(Identifier::new(self.cur.literal.clone()));

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            parameters.push(Identifier::new(self.cur.literal.clone()));
        }

        self.expect_peek(TokenKind::RParen)?;
        Some(parameters)
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expr::ArrayLit(elements))
    }

    /// Comma-separated expressions closed by `end`
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        if self.peek_is(end) {
            self.next_token();
            return Some(Vec::new());
        }

        self.next_token();
        let mut list = vec![self.parse_expression(Precedence::Lowest)];

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest));
        }

        self.expect_peek(end)?;
        list.into_iter().collect()
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest);
        self.expect_peek(TokenKind::RBracket)?;
        Some(Expr::Index {
            left: Box::new(left),
            index: Box::new(index?),
        })
    }

    fn parse_dictionary_literal(&mut self) -> Option<Expr> {
        let mut pairs = Vec::new();

        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest);
            self.expect_peek(TokenKind::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest);
            pairs.push((key?, value?));

            if !self.peek_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }

        self.expect_peek(TokenKind::RBrace)?;
        Some(Expr::DictLit(pairs))
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.is(kind)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    /// Advance if the next token has the expected kind, else record an error
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_is(kind) {
            self.next_token();
            Some(())
        } else {
            self.peek_error(kind);
            None
        }
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let message = format!(
            "expected next token to be {expected}, got {} instead",
            self.peek.kind
        );
        self.errors.push(ParseError::new(message, self.peek.span));
    }

    fn no_prefix_parse_fn_error(&mut self) {
        let message = format!("no prefix parse function for {} found", self.cur.kind);
        self.errors.push(ParseError::new(message, self.cur.span));
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur.kind)
    }
}

/// Parse source text into a program and its ordered parse errors
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();
    (program, parser.into_errors())
}
