//! Runtime objects

use super::env::EnvRef;
use super::error::{InterpResult, RuntimeError};
use crate::ast::{join, BlockStatement, Identifier};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Native function signature
pub type BuiltinFn = fn(&[Object]) -> InterpResult<Object>;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    String(Rc<str>),
    Boolean(bool),
    Null,
    /// Evaluation failure surfaced as a value
    Error(String),
    Function(Rc<Function>),
    Builtin(Builtin),
    Array(Rc<Vec<Object>>),
    Dictionary(Rc<Dictionary>),
}

impl Object {
    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::String(_) => "STRING",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::Error(_) => "ERROR",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Array(_) => "ARRAY",
            Object::Dictionary(_) => "DICTIONARY",
        }
    }

    /// Null and false are falsy, everything else is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Object::String(s.into())
    }

    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(elements))
    }
}

/// Structural equality, used by tests and dictionary buckets.
/// Functions compare by allocation.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Error(a), Object::Error(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a.name == b.name,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Dictionary(a), Object::Dictionary(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(n) => write!(f, "{n}"),
            Object::String(s) => f.write_str(s),
            Object::Boolean(b) => write!(f, "{b}"),
            Object::Null => f.write_str("null"),
            Object::Error(message) => write!(f, "ERROR: {message}"),
            Object::Function(func) => write!(f, "{func}"),
            Object::Builtin(_) => f.write_str("builtin function"),
            Object::Array(elements) => write!(f, "[{}]", join(elements.as_slice())),
            Object::Dictionary(dict) => write!(f, "{dict}"),
        }
    }
}

/// User function: parameters, body and the environment it closed over
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: EnvRef,
}

// The captured environment may hold this function again.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func({}) {}", join(&self.parameters), self.body)
    }
}

/// Native function
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Integer,
    Boolean,
    String,
}

/// Hash of a dictionary key, tagged with the key's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DictionaryKey {
    pub kind: KeyKind,
    pub value: u64,
}

impl DictionaryKey {
    /// `None` for types that cannot be used as keys
    pub fn of(object: &Object) -> Option<Self> {
        let (kind, value) = match object {
            Object::Integer(n) => (KeyKind::Integer, *n as u64),
            Object::Boolean(b) => (KeyKind::Boolean, u64::from(*b)),
            Object::String(s) => (KeyKind::String, fnv1a_64(s.as_bytes())),
            _ => return None,
        };
        Some(DictionaryKey { kind, value })
    }

    fn require(object: &Object) -> InterpResult<Self> {
        Self::of(object).ok_or_else(|| RuntimeError::unusable_as_key(object.type_name()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryPair {
    pub key: Object,
    pub value: Object,
}

/// Insertion-ordered dictionary.
///
/// Each hash bucket lists positions into `pairs`; keys that collide are told
/// apart by comparing the original key objects.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    pairs: Vec<DictionaryPair>,
    index: HashMap<DictionaryKey, Vec<usize>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, hash: &DictionaryKey, key: &Object) -> Option<usize> {
        self.index
            .get(hash)?
            .iter()
            .copied()
            .find(|&i| self.pairs[i].key == *key)
    }

    /// Insert or overwrite; an overwritten key keeps its original position
    pub fn insert(&mut self, key: Object, value: Object) -> InterpResult<()> {
        let hash = DictionaryKey::require(&key)?;
        match self.position(&hash, &key) {
            Some(i) => self.pairs[i].value = value,
            None => {
                self.index.entry(hash).or_default().push(self.pairs.len());
                self.pairs.push(DictionaryPair { key, value });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &Object) -> InterpResult<Option<&Object>> {
        let hash = DictionaryKey::require(key)?;
        Ok(self.position(&hash, key).map(|i| &self.pairs[i].value))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &DictionaryPair> {
        self.pairs.iter()
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", pair.key, pair.value)?;
        }
        write!(f, "}}")
    }
}
