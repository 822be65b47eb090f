//! Stack growth for deeply nested programs.
//!
//! The parser, the evaluator and AST formatting recurse once per level of
//! nesting, so `((((1))))`, `----1` or a long `1 + 1 + ... + 1` chain would
//! otherwise overflow the native stack on large inputs.

/// Runs `f`, first growing the stack when less than the red zone is left.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (128KB red zone).
    const RED_ZONE: usize = 128 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
