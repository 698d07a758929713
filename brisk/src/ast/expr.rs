//! Expression AST nodes

use super::{join, BlockStatement, Identifier};
use crate::lexer::TokenKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Variable reference
    Ident(Identifier),
    /// Integer literal
    IntLit(i64),
    /// String literal (raw contents, no escapes)
    StringLit(String),
    /// Boolean literal
    BoolLit(bool),

    /// Prefix operation: `-x`, `!x`
    Prefix { op: PrefixOp, right: Box<Expr> },

    /// Infix operation: `a + b`
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },

    /// Conditional: `if (condition) { ... } else { ... }`
    If {
        condition: Box<Expr>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },

    /// Function literal: `func(a, b) { ... }`
    FuncLit {
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },

    /// Call: `callee(args...)`
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// Array literal: `[a, b, c]`
    ArrayLit(Vec<Expr>),

    /// Index: `left[index]`
    Index { left: Box<Expr>, index: Box<Expr> },

    /// Dictionary literal, pairs kept in source order
    DictLit(Vec<(Expr, Expr)>),
}

/// Prefix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrefixOp {
    /// Logical not: `!`
    Not,
    /// Negation: `-`
    Neg,
}

impl PrefixOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(PrefixOp::Not),
            TokenKind::Minus => Some(PrefixOp::Neg),
            _ => None,
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Not => write!(f, "!"),
            PrefixOp::Neg => write!(f, "-"),
        }
    }
}

/// Infix operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfixOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl InfixOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Percent => InfixOp::Mod,
            TokenKind::EqEq => InfixOp::Eq,
            TokenKind::NotEq => InfixOp::Ne,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::LtEq => InfixOp::Le,
            TokenKind::Gt => InfixOp::Gt,
            TokenKind::GtEq => InfixOp::Ge,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Mod => "%",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::Gt => ">",
            InfixOp::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(ident) => write!(f, "{ident}"),
            Expr::IntLit(n) => write!(f, "{n}"),
            Expr::StringLit(s) => write!(f, "\"{s}\""),
            Expr::BoolLit(b) => write!(f, "{b}"),
            Expr::Prefix { op, right } => write!(f, "({op}{right})"),
            Expr::Infix { left, op, right } => write!(f, "({left} {op} {right})"),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({condition}) {consequence}")?;
                if let Some(alt) = alternative {
                    write!(f, " else {alt}")?;
                }
                Ok(())
            }
            Expr::FuncLit { parameters, body } => {
                write!(f, "func({}) {body}", join(parameters))
            }
            Expr::Call { function, arguments } => {
                write!(f, "{function}({})", join(arguments))
            }
            Expr::ArrayLit(elements) => write!(f, "[{}]", join(elements)),
            Expr::Index { left, index } => write!(f, "({left}[{index}])"),
            Expr::DictLit(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
