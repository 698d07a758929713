//! Abstract Syntax Tree definitions
//!
//! Every node renders a canonical source form through `Display`. The form is
//! fully parenthesised, so feeding it back through the parser yields a tree
//! of the same shape.

mod expr;
mod span;

pub use expr::*;
pub use span::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A program is a sequence of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `var name = value;`
    Var { name: Identifier, value: Expr },
    /// `return value;`
    Return { value: Expr },
    /// Bare expression, optional trailing `;`
    Expression { expr: Expr },
}

/// Block: `{ stmt; stmt; }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

/// Identifier used as a variable reference, binding name or parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Comma-join displayable items
pub(crate) fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Var { name, value } => write!(f, "var {name} = {value};"),
            Statement::Return { value } => write!(f, "return {value};"),
            Statement::Expression { expr } => write!(f, "{expr};"),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for stmt in &self.statements {
            write!(f, "{stmt} ")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}
