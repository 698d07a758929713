//! Tree-walking evaluator

use super::builtins;
use super::env::{enclosed_env, EnvRef};
use super::error::{ErrorKind, InterpResult, RuntimeError};
use super::object::{Dictionary, Function, Object};
use crate::ast::{BlockStatement, Expr, Identifier, InfixOp, PrefixOp, Program, Statement};
use std::rc::Rc;

/// Maximum depth of nested function calls
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// The interpreter
///
/// Holds no program state of its own: bindings live in the environment
/// passed to each call, so one interpreter can serve several environments.
#[derive(Debug, Default)]
pub struct Interpreter {
    /// Current function call depth
    call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a program, surfacing failures as `Err`.
    ///
    /// Yields `None` when the last statement is a binding rather than a value.
    pub fn execute(&mut self, program: &Program, env: &EnvRef) -> InterpResult<Option<Object>> {
        log::debug!("evaluating {} statement(s)", program.statements.len());
        match self.eval_statements(&program.statements, env) {
            Err(RuntimeError {
                kind: ErrorKind::Return(value),
                ..
            }) => Ok(Some(*value)),
            other => other,
        }
    }

    /// Evaluate a program, turning a failure into an `Error` object
    pub fn eval_program(&mut self, program: &Program, env: &EnvRef) -> Option<Object> {
        self.execute(program, env).unwrap_or_else(|err| {
            log::debug!("evaluation failed: {}", err.message);
            Some(Object::Error(err.message))
        })
    }

    fn eval_statements(
        &mut self,
        statements: &[Statement],
        env: &EnvRef,
    ) -> InterpResult<Option<Object>> {
        let mut result = None;
        for stmt in statements {
            result = self.eval_statement(stmt, env)?;
        }
        Ok(result)
    }

    fn eval_block(&mut self, block: &BlockStatement, env: &EnvRef) -> InterpResult<Object> {
        Ok(self
            .eval_statements(&block.statements, env)?
            .unwrap_or(Object::Null))
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &EnvRef) -> InterpResult<Option<Object>> {
        match stmt {
            Statement::Var { name, value } => {
                let value = self.eval_expr(value, env)?;
                env.borrow_mut().set(name.name.clone(), value);
                Ok(None)
            }
            Statement::Return { value } => {
                let value = self.eval_expr(value, env)?;
                Err(RuntimeError::return_value(value))
            }
            Statement::Expression { expr } => self.eval_expr(expr, env).map(Some),
        }
    }

    /// Evaluate an expression with automatic stack growth for deep recursion
    fn eval_expr(&mut self, expr: &Expr, env: &EnvRef) -> InterpResult<Object> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_expr_inner(expr, env)
        })
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &EnvRef) -> InterpResult<Object> {
        match expr {
            Expr::Ident(ident) => self.eval_identifier(ident, env),
            Expr::IntLit(n) => Ok(Object::Integer(*n)),
            Expr::StringLit(s) => Ok(Object::string(s.as_str())),
            Expr::BoolLit(b) => Ok(Object::Boolean(*b)),

            Expr::Prefix { op, right } => {
                let right = self.eval_expr(right, env)?;
                eval_prefix(*op, right)
            }

            Expr::Infix { left, op, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                eval_infix(*op, left, right)
            }

            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expr(condition, env)?;
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alt) = alternative {
                    self.eval_block(alt, env)
                } else {
                    Ok(Object::Null)
                }
            }

            Expr::FuncLit { parameters, body } => Ok(Object::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            }))),

            Expr::Call {
                function,
                arguments,
            } => {
                let callee = self.eval_expr(function, env)?;
                let args = arguments
                    .iter()
                    .map(|arg| self.eval_expr(arg, env))
                    .collect::<InterpResult<Vec<_>>>()?;
                self.apply(callee, args)
            }

            Expr::ArrayLit(elements) => {
                let elements = elements
                    .iter()
                    .map(|e| self.eval_expr(e, env))
                    .collect::<InterpResult<Vec<_>>>()?;
                Ok(Object::array(elements))
            }

            Expr::Index { left, index } => {
                let left = self.eval_expr(left, env)?;
                let index = self.eval_expr(index, env)?;
                eval_index(left, index)
            }

            Expr::DictLit(pairs) => {
                let mut dict = Dictionary::new();
                for (key, value) in pairs {
                    let key = self.eval_expr(key, env)?;
                    let value = self.eval_expr(value, env)?;
                    dict.insert(key, value)?;
                }
                Ok(Object::Dictionary(Rc::new(dict)))
            }
        }
    }

    /// Scope chain first, then builtins
    fn eval_identifier(&self, ident: &Identifier, env: &EnvRef) -> InterpResult<Object> {
        let bound = env.borrow().get(&ident.name);
        bound
            .or_else(|| builtins::lookup(&ident.name).map(Object::Builtin))
            .ok_or_else(|| RuntimeError::identifier_not_found(&ident.name))
    }

    fn apply(&mut self, callee: Object, args: Vec<Object>) -> InterpResult<Object> {
        match callee {
            Object::Function(func) => self.call_function(&func, args),
            Object::Builtin(builtin) => (builtin.func)(&args),
            other => Err(RuntimeError::not_a_function(other.type_name())),
        }
    }

    fn call_function(&mut self, func: &Function, args: Vec<Object>) -> InterpResult<Object> {
        if func.parameters.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                func.parameters.len(),
                args.len(),
            ));
        }

        self.call_depth += 1;
        if self.call_depth > MAX_CALL_DEPTH {
            self.call_depth -= 1;
            log::debug!("call depth limit {MAX_CALL_DEPTH} reached");
            return Err(RuntimeError::stack_overflow());
        }

        let call_env = enclosed_env(&func.env);
        {
            let mut scope = call_env.borrow_mut();
            for (param, arg) in func.parameters.iter().zip(args) {
                scope.set(param.name.clone(), arg);
            }
        }

        let result = self.eval_block(&func.body, &call_env);
        self.call_depth -= 1;

        match result {
            Err(RuntimeError {
                kind: ErrorKind::Return(value),
                ..
            }) => Ok(*value),
            other => other,
        }
    }
}

/// Evaluate a program in `env`; failures become `Error` objects and a
/// trailing binding yields `Null`
pub fn eval(program: &Program, env: &EnvRef) -> Object {
    Interpreter::new()
        .eval_program(program, env)
        .unwrap_or(Object::Null)
}

fn eval_prefix(op: PrefixOp, right: Object) -> InterpResult<Object> {
    match op {
        PrefixOp::Not => Ok(Object::Boolean(!right.is_truthy())),
        PrefixOp::Neg => match right {
            Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
            other => Err(RuntimeError::unknown_prefix_operator(op, other.type_name())),
        },
    }
}

fn eval_infix(op: InfixOp, left: Object, right: Object) -> InterpResult<Object> {
    match (&left, &right) {
        (Object::Integer(a), Object::Integer(b)) => eval_integer_infix(op, *a, *b),
        (Object::String(a), Object::String(b)) => eval_string_infix(op, a, b),
        // Values of different types are never identical, so equality cannot fail.
        _ if op == InfixOp::Eq => Ok(Object::Boolean(identical(&left, &right))),
        _ if op == InfixOp::Ne => Ok(Object::Boolean(!identical(&left, &right))),
        _ if left.type_name() != right.type_name() => Err(RuntimeError::type_mismatch(
            left.type_name(),
            op,
            right.type_name(),
        )),
        _ => Err(RuntimeError::unknown_infix_operator(
            left.type_name(),
            op,
            right.type_name(),
        )),
    }
}

fn eval_integer_infix(op: InfixOp, a: i64, b: i64) -> InterpResult<Object> {
    let value = match op {
        InfixOp::Add => Object::Integer(a.wrapping_add(b)),
        InfixOp::Sub => Object::Integer(a.wrapping_sub(b)),
        InfixOp::Mul => Object::Integer(a.wrapping_mul(b)),
        InfixOp::Div if b == 0 => return Err(RuntimeError::division_by_zero()),
        InfixOp::Div => Object::Integer(a.wrapping_div(b)),
        InfixOp::Mod if b == 0 => return Err(RuntimeError::division_by_zero()),
        InfixOp::Mod => Object::Integer(a.wrapping_rem(b)),
        InfixOp::Eq => Object::Boolean(a == b),
        InfixOp::Ne => Object::Boolean(a != b),
        InfixOp::Lt => Object::Boolean(a < b),
        InfixOp::Le => Object::Boolean(a <= b),
        InfixOp::Gt => Object::Boolean(a > b),
        InfixOp::Ge => Object::Boolean(a >= b),
    };
    Ok(value)
}

fn eval_string_infix(op: InfixOp, a: &str, b: &str) -> InterpResult<Object> {
    match op {
        InfixOp::Add => Ok(Object::string(format!("{a}{b}"))),
        InfixOp::Eq => Ok(Object::Boolean(a == b)),
        InfixOp::Ne => Ok(Object::Boolean(a != b)),
        _ => Err(RuntimeError::unknown_infix_operator("STRING", op, "STRING")),
    }
}

/// Identity for `==`: scalars by value, heap objects by allocation
fn identical(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
        (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
        (Object::Dictionary(a), Object::Dictionary(b)) => Rc::ptr_eq(a, b),
        _ => left == right,
    }
}

fn eval_index(left: Object, index: Object) -> InterpResult<Object> {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Object::Null)),
        (Object::Dictionary(dict), _) => Ok(dict.get(&index)?.cloned().unwrap_or(Object::Null)),
        _ => Err(RuntimeError::index_not_supported(left.type_name())),
    }
}
