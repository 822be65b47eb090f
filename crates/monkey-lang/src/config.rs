//! Evaluator configuration supplied by the host.

/// Limits applied while evaluating a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Nested function/builtin applications allowed before evaluation fails
    /// with `maximum call depth exceeded`.
    pub max_call_depth: usize,
}

impl EvalConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

    pub fn new() -> Self {
        Self { max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH }
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth() {
        assert_eq!(EvalConfig::default().max_call_depth, EvalConfig::DEFAULT_MAX_CALL_DEPTH);
    }

    #[test]
    fn builder_overrides_depth() {
        assert_eq!(EvalConfig::new().with_max_call_depth(3).max_call_depth, 3);
    }
}
