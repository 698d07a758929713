//! Runtime errors for the interpreter

use super::Object;
use std::fmt;

/// Runtime error during evaluation
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Name bound neither in scope nor as a builtin
    IdentifierNotFound,
    /// Operands of different types
    TypeMismatch,
    /// Operator not defined for the operand type(s)
    UnknownOperator,
    /// `/` or `%` by zero
    DivisionByZero,
    /// Callee is not a function or builtin
    NotAFunction,
    /// Dictionary key of a non-hashable type
    UnusableAsKey,
    /// Argument count mismatch
    ArityMismatch,
    /// Index applied to a value that cannot be indexed
    IndexNotSupported,
    /// Builtin called with an argument of the wrong type
    BuiltinArgument,
    /// Call depth limit reached
    StackOverflow,
    /// Control flow: early return from function (with value)
    Return(Box<Object>),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError { kind, message }
    }

    pub fn identifier_not_found(name: &str) -> Self {
        Self::new(
            ErrorKind::IdentifierNotFound,
            format!("identifier not found: {name}"),
        )
    }

    pub fn type_mismatch(left: &str, op: impl fmt::Display, right: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type mismatch: {left} {op} {right}"),
        )
    }

    pub fn unknown_prefix_operator(op: impl fmt::Display, right: &str) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator: {op}{right}"),
        )
    }

    pub fn unknown_infix_operator(left: &str, op: impl fmt::Display, right: &str) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator: {left} {op} {right}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }

    pub fn not_a_function(type_name: &str) -> Self {
        Self::new(
            ErrorKind::NotAFunction,
            format!("not a function: {type_name}"),
        )
    }

    pub fn unusable_as_key(type_name: &str) -> Self {
        Self::new(
            ErrorKind::UnusableAsKey,
            format!("unusable as dictionary key: {type_name}"),
        )
    }

    pub fn arity_mismatch(want: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("wrong number of arguments: want={want}, got={got}"),
        )
    }

    pub fn index_not_supported(type_name: &str) -> Self {
        Self::new(
            ErrorKind::IndexNotSupported,
            format!("index operator not supported: {type_name}"),
        )
    }

    pub fn builtin_arity(name: &str, want: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("wrong number of arguments to `{name}`: want={want}, got={got}"),
        )
    }

    pub fn builtin_unsupported(name: &str, type_name: &str) -> Self {
        Self::new(
            ErrorKind::BuiltinArgument,
            format!("argument to `{name}` not supported, got {type_name}"),
        )
    }

    pub fn stack_overflow() -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            "stack overflow: too deep recursion".to_string(),
        )
    }

    /// Wrap a returned value so it unwinds to the nearest call boundary
    pub fn return_value(value: Object) -> Self {
        Self::new(ErrorKind::Return(Box::new(value)), "return".to_string())
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            RuntimeError::identifier_not_found("foobar").message,
            "identifier not found: foobar"
        );
        assert_eq!(
            RuntimeError::type_mismatch("INTEGER", "+", "BOOLEAN").message,
            "type mismatch: INTEGER + BOOLEAN"
        );
        assert_eq!(
            RuntimeError::unknown_prefix_operator("-", "BOOLEAN").message,
            "unknown operator: -BOOLEAN"
        );
        assert_eq!(
            RuntimeError::unknown_infix_operator("STRING", "-", "STRING").message,
            "unknown operator: STRING - STRING"
        );
        assert_eq!(
            RuntimeError::builtin_arity("len", 1, 2).message,
            "wrong number of arguments to `len`: want=1, got=2"
        );
    }

    #[test]
    fn test_display_prefix() {
        let err = RuntimeError::division_by_zero();
        assert_eq!(err.to_string(), "Runtime error: division by zero");
    }

    #[test]
    fn test_kind_compares_by_discriminant() {
        let a = ErrorKind::Return(Box::new(Object::Integer(1)));
        let b = ErrorKind::Return(Box::new(Object::Null));
        assert_eq!(a, b);
        assert_ne!(ErrorKind::DivisionByZero, ErrorKind::StackOverflow);
    }
}
