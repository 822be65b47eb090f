//! Tree-walking interpreter. Evaluates a `Program` against an `Environment`.
//!
//! Internally every step returns `Result<Value, Unwind>`: `Ok` is a plain
//! value, `Err(Unwind::Return)` is a `return` in flight and
//! `Err(Unwind::Error)` is a runtime error in flight. `?` therefore stops a
//! block, an argument list or an array literal at the first non-normal
//! outcome. Function calls absorb `Return`; `eval_program` absorbs both and
//! hands the host a single `Value`.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::builtins::{BuiltinRegistry, RuntimeState};
use crate::config::EvalConfig;
use crate::error::RuntimeError;
use crate::runtime::environment::Environment;
use crate::runtime::operators::{eval_index, eval_infix, eval_prefix};
use crate::stack::ensure_sufficient_stack;
use crate::runtime::value::{Function, HashPair, NULL, Value};
use crate::syntax::ast::{Block, Expr, Program, Stmt};

// ─── Control outcome ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(e: RuntimeError) -> Self { Unwind::Error(e) }
}

type Flow = Result<Value, Unwind>;

// ─── Interpreter ──────────────────────────────────────────────────────────────

pub struct Interpreter<'a> {
    registry: &'a BuiltinRegistry,
    config: &'a EvalConfig,
    depth: usize,
    runtime_state: RuntimeState,
}

impl<'a> Interpreter<'a> {
    pub fn new(registry: &'a BuiltinRegistry, config: &'a EvalConfig) -> Self {
        Self { registry, config, depth: 0, runtime_state: RuntimeState::default() }
    }

    /// Seed the interpreter with state (buffered `puts` output) carried over
    /// from an earlier run.
    pub fn with_runtime_state(mut self, rs: RuntimeState) -> Self {
        self.runtime_state = rs;
        self
    }

    pub fn take_runtime_state(&mut self) -> RuntimeState {
        std::mem::take(&mut self.runtime_state)
    }

    // ─── Entry point ──────────────────────────────────────────────────────────

    /// Evaluates every statement in order and returns the last value. A
    /// top-level `return` ends the program with its value; a runtime error
    /// ends it with `Value::Error`.
    pub fn eval_program(&mut self, program: &Program, env: &Environment) -> Value {
        let mut result = NULL;
        for stmt in &program.statements {
            match self.eval_stmt(stmt, env) {
                Ok(v) => result = v,
                Err(Unwind::Return(v)) => return v,
                Err(Unwind::Error(e)) => {
                    debug!(error = %e, "evaluation failed");
                    return Value::Error(e.to_string());
                }
            }
        }
        result
    }

    // ─── Statements ───────────────────────────────────────────────────────────

    fn eval_block(&mut self, block: &Block, env: &Environment) -> Flow {
        let mut result = NULL;
        for stmt in &block.statements {
            result = self.eval_stmt(stmt, env)?;
        }
        Ok(result)
    }

    fn eval_stmt(&mut self, stmt: &Stmt, env: &Environment) -> Flow {
        match stmt {
            Stmt::Let(l) => {
                let value = self.eval_expr(&l.value, env)?;
                env.set(l.name.as_str(), value);
                Ok(NULL)
            }
            Stmt::Return(expr, _) => {
                let value = match expr {
                    Some(e) => self.eval_expr(e, env)?,
                    None => NULL,
                };
                Err(Unwind::Return(value))
            }
            Stmt::Expr(e) => self.eval_expr(e, env),
        }
    }

    // ─── Expressions ──────────────────────────────────────────────────────────

    fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> Flow {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Environment) -> Flow {
        match expr {
            Expr::Int(v, _)       => Ok(Value::Integer(*v)),
            Expr::Bool(v, _)      => Ok(Value::from(*v)),
            Expr::StringLit(s, _) => Ok(Value::Str(s.clone())),

            // An Error bound by the host resumes propagating when read.
            Expr::Ident(name, _) => match env.get(name).or_else(|| self.registry.get(name)) {
                Some(Value::Error(msg)) => Err(RuntimeError::Raised(msg).into()),
                Some(v) => Ok(v),
                None => Err(RuntimeError::IdentifierNotFound(name.clone()).into()),
            },

            Expr::UnOp { op, operand, .. } => {
                let v = self.eval_expr(operand, env)?;
                Ok(eval_prefix(*op, v)?)
            }

            Expr::BinOp { left, op, right, .. } => {
                let l = self.eval_expr(left, env)?;
                let r = self.eval_expr(right, env)?;
                Ok(eval_infix(*op, l, r)?)
            }

            Expr::If { condition, then_block, else_block, .. } => {
                let cond = self.eval_expr(condition, env)?;
                if cond.is_truthy() {
                    self.eval_block(then_block, env)
                } else if let Some(else_block) = else_block {
                    self.eval_block(else_block, env)
                } else {
                    Ok(NULL)
                }
            }

            Expr::Fn { params, body, .. } => Ok(Value::Function(Rc::new(Function {
                params: Rc::clone(params),
                body: Rc::clone(body),
                env: env.clone(),
            }))),

            Expr::Call { callee, args, .. } => {
                let func = self.eval_expr(callee, env)?;
                let args = self.eval_exprs(args, env)?;
                Ok(self.apply(func, args)?)
            }

            Expr::Index { expr, index, .. } => {
                let target = self.eval_expr(expr, env)?;
                let index = self.eval_expr(index, env)?;
                Ok(eval_index(target, index)?)
            }

            Expr::Array(items, _) => {
                let vals = self.eval_exprs(items, env)?;
                Ok(Value::Array(Rc::new(vals)))
            }

            Expr::Hash(pairs, _) => {
                let mut map = FxHashMap::default();
                for (key_expr, value_expr) in pairs {
                    let key = self.eval_expr(key_expr, env)?;
                    let hash_key = key.hash_key()
                        .ok_or(RuntimeError::UnusableHashKey(key.type_name()))?;
                    let value = self.eval_expr(value_expr, env)?;
                    map.insert(hash_key, HashPair { key, value });
                }
                Ok(Value::Hash(Rc::new(map)))
            }
        }
    }

    /// Left to right, stopping at the first error.
    fn eval_exprs(&mut self, exprs: &[Expr], env: &Environment) -> Result<Vec<Value>, Unwind> {
        exprs.iter().map(|e| self.eval_expr(e, env)).collect()
    }

    // ─── Call dispatch ────────────────────────────────────────────────────────

    fn apply(&mut self, func: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded(self.config.max_call_depth));
        }
        self.depth += 1;
        let result = self.apply_inner(func, args);
        self.depth -= 1;
        result
    }

    fn apply_inner(&mut self, func: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match func {
            Value::Function(f) => {
                if args.len() != f.params.len() {
                    return Err(RuntimeError::WrongArgumentCount { got: args.len(), want: f.params.len() });
                }
                trace!(params = ?f.params, depth = self.depth, "call");
                let call_env = Environment::enclosed(&f.env);
                for (param, arg) in f.params.iter().zip(args) {
                    call_env.set(param.as_str(), arg);
                }
                match self.eval_block(&f.body, &call_env) {
                    Ok(v) | Err(Unwind::Return(v)) => Ok(v),
                    Err(Unwind::Error(e)) => Err(e),
                }
            }
            Value::Builtin(b) => {
                trace!(builtin = b.name, argc = args.len(), depth = self.depth, "call");
                match (b.func)(&args, &mut self.runtime_state)? {
                    Value::Error(msg) => Err(RuntimeError::Raised(msg)),
                    v => Ok(v),
                }
            }
            other => Err(RuntimeError::NotAFunction(other.type_name())),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeResult;
    use crate::syntax::ast::{BinOp, LetStmt, Span};

    fn sp() -> Span { Span::new(1, 1) }

    fn int(v: i64) -> Expr { Expr::Int(v, sp()) }

    fn ident(name: &str) -> Expr { Expr::Ident(name.into(), sp()) }

    fn run(program: &Program, env: &Environment) -> Value {
        let registry = BuiltinRegistry::standard();
        let config = EvalConfig::default();
        Interpreter::new(&registry, &config).eval_program(program, env)
    }

    #[test]
    fn empty_program_is_null() {
        assert_eq!(run(&Program::default(), &Environment::new()), NULL);
    }

    #[test]
    fn let_binds_in_given_env() {
        let env = Environment::new();
        let program = Program {
            statements: vec![Stmt::Let(LetStmt { name: "x".into(), value: int(7), span: sp() })],
        };
        assert_eq!(run(&program, &env), NULL);
        assert_eq!(env.get("x"), Some(Value::Integer(7)));
    }

    #[test]
    fn failed_let_does_not_bind() {
        let env = Environment::new();
        let program = Program {
            statements: vec![Stmt::Let(LetStmt { name: "x".into(), value: ident("nope"), span: sp() })],
        };
        assert_eq!(run(&program, &env), Value::Error("identifier not found: `nope`".into()));
        assert!(env.get("x").is_none());
    }

    #[test]
    fn return_stops_program() {
        let program = Program {
            statements: vec![
                Stmt::Expr(int(9)),
                Stmt::Return(Some(int(10)), sp()),
                Stmt::Expr(int(11)),
            ],
        };
        assert_eq!(run(&program, &Environment::new()), Value::Integer(10));
    }

    #[test]
    fn bare_return_is_null() {
        let program = Program { statements: vec![Stmt::Return(None, sp()), Stmt::Expr(int(1))] };
        assert_eq!(run(&program, &Environment::new()), NULL);
    }

    #[test]
    fn env_binding_shadows_builtin() {
        let env = Environment::new();
        env.set("len", Value::Integer(3));
        let program = Program { statements: vec![Stmt::Expr(ident("len"))] };
        assert_eq!(run(&program, &env), Value::Integer(3));
    }

    #[test]
    fn error_is_first_in_source_order() {
        let bad = |name: &str| Expr::BinOp {
            left: Box::new(int(1)),
            op: BinOp::Add,
            right: Box::new(ident(name)),
            span: sp(),
        };
        let program = Program {
            statements: vec![Stmt::Expr(Expr::Array(vec![int(1), bad("a"), bad("b")], sp()))],
        };
        assert_eq!(run(&program, &Environment::new()), Value::Error("identifier not found: `a`".into()));
    }

    #[test]
    fn bound_error_propagates_on_read() {
        let env = Environment::new();
        env.set("e", Value::Error("boom".into()));
        let program = Program {
            statements: vec![
                Stmt::Expr(Expr::Array(vec![ident("e"), int(2)], sp())),
                Stmt::Expr(int(5)),
            ],
        };
        assert_eq!(run(&program, &env), Value::Error("boom".into()));
    }

    fn raise(_: &[Value], _: &mut RuntimeState) -> RuntimeResult<Value> {
        Ok(Value::Error("host said no".into()))
    }

    #[test]
    fn builtin_error_value_propagates() {
        let mut registry = BuiltinRegistry::standard();
        registry.register("raise", raise);
        let config = EvalConfig::default();
        let call = Expr::Call { callee: Box::new(ident("raise")), args: vec![], span: sp() };
        let program = Program {
            statements: vec![Stmt::Expr(Expr::Array(vec![call, Expr::Bool(true, sp())], sp()))],
        };
        let v = Interpreter::new(&registry, &config).eval_program(&program, &Environment::new());
        assert_eq!(v, Value::Error("host said no".into()));
    }

    #[test]
    fn depth_limit_applies_to_builtins() {
        let registry = BuiltinRegistry::standard();
        let config = EvalConfig::new().with_max_call_depth(0);
        let call = Expr::Call {
            callee: Box::new(ident("len")),
            args: vec![Expr::StringLit("x".into(), sp())],
            span: sp(),
        };
        let program = Program { statements: vec![Stmt::Expr(call)] };
        let v = Interpreter::new(&registry, &config).eval_program(&program, &Environment::new());
        assert_eq!(v, Value::Error("maximum call depth exceeded: 0".into()));
    }

    #[test]
    fn runtime_state_round_trips() {
        let registry = BuiltinRegistry::standard();
        let config = EvalConfig::default();
        let seeded = RuntimeState { output: vec!["earlier".into()] };
        let call = Expr::Call {
            callee: Box::new(ident("puts")),
            args: vec![Expr::Bool(true, sp())],
            span: sp(),
        };
        let program = Program { statements: vec![Stmt::Expr(call)] };
        let mut interp = Interpreter::new(&registry, &config).with_runtime_state(seeded);
        assert_eq!(interp.eval_program(&program, &Environment::new()), NULL);
        assert_eq!(interp.take_runtime_state().output, vec!["earlier", "true"]);
    }
}
