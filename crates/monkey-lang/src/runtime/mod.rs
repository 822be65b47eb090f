pub mod value;
pub mod environment;
pub mod operators;
pub mod interpreter;

use crate::builtins::BuiltinRegistry;
use crate::config::EvalConfig;
use crate::syntax::ast::Program;

use environment::Environment;
use interpreter::Interpreter;
use value::Value;

/// Evaluates `program` in `env` with the standard builtins and default limits.
/// `puts` output is discarded; use a `Session` to collect it.
pub fn eval(program: &Program, env: &Environment) -> Value {
    let registry = BuiltinRegistry::standard();
    let config = EvalConfig::default();
    Interpreter::new(&registry, &config).eval_program(program, env)
}
