pub mod syntax;
pub mod runtime;
pub mod builtins;
pub mod config;
pub mod error;
pub mod stack;

pub use builtins::{BuiltinRegistry, RuntimeState};
pub use config::EvalConfig;
pub use error::{Error, ErrorCode, RuntimeError};
pub use runtime::environment::Environment;
pub use runtime::value::Value;
pub use syntax::ast::Program;
pub use syntax::token::{Token, TokenKind};

use tracing::{debug, instrument};

use runtime::interpreter::Interpreter;

// ─── Public API ───────────────────────────────────────────────────────────────

/// Lex and parse source text. All syntax errors are collected before returning.
pub fn parse(source: &str) -> Result<Program, Vec<Error>> {
    let tokens = syntax::lexer::Lexer::new(source).tokenize()?;
    syntax::parser::Parser::new(tokens).parse()
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// Host-side evaluation context: one root environment, the builtins visible to
/// programs, and the evaluation limits.
///
/// Bindings made by one `eval` are visible to the next, which is what the REPL
/// relies on. A `Session` is single-threaded; run independent programs in
/// independent sessions.
pub struct Session {
    env: Environment,
    registry: BuiltinRegistry,
    config: EvalConfig,
    runtime_state: RuntimeState,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            env: Environment::new(),
            registry: BuiltinRegistry::standard(),
            config,
            runtime_state: RuntimeState::default(),
        }
    }

    /// Replace the builtin set, e.g. with one extended by host functions.
    pub fn with_registry(mut self, registry: BuiltinRegistry) -> Self {
        debug!(builtins = ?registry.names(), "builtin registry replaced");
        self.registry = registry;
        self
    }

    pub fn env(&self) -> &Environment { &self.env }

    /// Parse and evaluate `source`. Syntax errors are the only `Err`; runtime
    /// failures come back as `Ok(Value::Error(..))`.
    #[instrument(level = "debug", skip(self, source), fields(len = source.len()))]
    pub fn eval(&mut self, source: &str) -> Result<Value, Vec<Error>> {
        let program = parse(source).inspect_err(|errors| {
            debug!(count = errors.len(), "syntax errors");
        })?;
        Ok(self.eval_program(&program))
    }

    pub fn eval_program(&mut self, program: &Program) -> Value {
        let state = std::mem::take(&mut self.runtime_state);
        let mut interp = Interpreter::new(&self.registry, &self.config).with_runtime_state(state);
        let value = interp.eval_program(program, &self.env);
        self.runtime_state = interp.take_runtime_state();
        value
    }

    /// Drain everything `puts` has written since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.runtime_state.output)
    }
}

impl Default for Session {
    fn default() -> Self { Self::new() }
}
