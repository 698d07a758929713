//! Tree-walking interpreter
//!
//! Evaluates parsed programs against a shared environment. Runtime failures
//! travel as `Err(RuntimeError)` inside the evaluator and come out of
//! [`eval`] as [`Object::Error`].

pub mod builtins;
mod env;
mod error;
mod eval;
mod object;

pub use env::{enclosed_env, EnvRef, Environment};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{eval, Interpreter, MAX_CALL_DEPTH};
pub use object::{
    fnv1a_64, Builtin, BuiltinFn, Dictionary, DictionaryKey, DictionaryPair, Function, KeyKind,
    Object,
};
