//! Brisk Interpreter Library
//!
//! A small dynamically typed language with closures, arrays and
//! dictionaries, evaluated by a tree-walking interpreter.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;

pub use ast::Span;
pub use error::{Error, ParseError, Result};
pub use interp::{eval, EnvRef, Environment, Object};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{parse, Parser};

/// Parse and evaluate a whole source text in `env`.
///
/// Parse errors are returned before anything runs; a runtime failure becomes
/// [`Error::Runtime`]. A trailing binding yields `None`.
pub fn run_source(source: &str, env: &EnvRef) -> Result<Option<Object>> {
    let (program, errors) = parse(source);
    if !errors.is_empty() {
        return Err(Error::Parse(errors));
    }
    interp::Interpreter::new()
        .execute(&program, env)
        .map_err(|err| Error::Runtime(err.message))
}
