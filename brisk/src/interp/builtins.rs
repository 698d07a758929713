//! Native functions available to every program

use super::error::{InterpResult, RuntimeError};
use super::object::{Builtin, Object};
use std::rc::Rc;

/// Every builtin, by name
pub const BUILTINS: &[Builtin] = &[
    Builtin { name: "len", func: builtin_len },
    Builtin { name: "first", func: builtin_first },
    Builtin { name: "last", func: builtin_last },
    Builtin { name: "rest", func: builtin_rest },
    Builtin { name: "push", func: builtin_push },
    Builtin { name: "keys", func: builtin_keys },
    Builtin { name: "values", func: builtin_values },
];

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

fn check_arity(name: &str, args: &[Object], want: usize) -> InterpResult<()> {
    if args.len() == want {
        Ok(())
    } else {
        Err(RuntimeError::builtin_arity(name, want, args.len()))
    }
}

fn expect_array<'a>(name: &str, arg: &'a Object) -> InterpResult<&'a Rc<Vec<Object>>> {
    match arg {
        Object::Array(elements) => Ok(elements),
        other => Err(RuntimeError::builtin_unsupported(name, other.type_name())),
    }
}

fn builtin_len(args: &[Object]) -> InterpResult<Object> {
    check_arity("len", args, 1)?;
    let len = match &args[0] {
        Object::String(s) => s.len(),
        Object::Array(elements) => elements.len(),
        Object::Dictionary(dict) => dict.len(),
        other => return Err(RuntimeError::builtin_unsupported("len", other.type_name())),
    };
    Ok(Object::Integer(len as i64))
}

fn builtin_first(args: &[Object]) -> InterpResult<Object> {
    check_arity("first", args, 1)?;
    let elements = expect_array("first", &args[0])?;
    Ok(elements.first().cloned().unwrap_or(Object::Null))
}

fn builtin_last(args: &[Object]) -> InterpResult<Object> {
    check_arity("last", args, 1)?;
    let elements = expect_array("last", &args[0])?;
    Ok(elements.last().cloned().unwrap_or(Object::Null))
}

fn builtin_rest(args: &[Object]) -> InterpResult<Object> {
    check_arity("rest", args, 1)?;
    let elements = expect_array("rest", &args[0])?;
    match elements.split_first() {
        Some((_, tail)) => Ok(Object::array(tail.to_vec())),
        None => Ok(Object::Null),
    }
}

fn builtin_push(args: &[Object]) -> InterpResult<Object> {
    check_arity("push", args, 2)?;
    let elements = expect_array("push", &args[0])?;
    let mut pushed = Vec::with_capacity(elements.len() + 1);
    pushed.extend(elements.iter().cloned());
    pushed.push(args[1].clone());
    Ok(Object::array(pushed))
}

fn builtin_keys(args: &[Object]) -> InterpResult<Object> {
    check_arity("keys", args, 1)?;
    match &args[0] {
        Object::Dictionary(dict) => Ok(Object::array(
            dict.iter().map(|pair| pair.key.clone()).collect(),
        )),
        other => Err(RuntimeError::builtin_unsupported("keys", other.type_name())),
    }
}

fn builtin_values(args: &[Object]) -> InterpResult<Object> {
    check_arity("values", args, 1)?;
    match &args[0] {
        Object::Dictionary(dict) => Ok(Object::array(
            dict.iter().map(|pair| pair.value.clone()).collect(),
        )),
        other => Err(RuntimeError::builtin_unsupported("values", other.type_name())),
    }
}
