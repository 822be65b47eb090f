use thiserror::Error as ThisError;

/// Error codes prefixed by phase: L = lexer, P = parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character
    L002, // unterminated string literal
    L003, // invalid escape sequence
    L004, // integer literal out of range

    // Parser
    P001, // unexpected token
    P002, // missing expected token
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::L003 => "L003",
            Self::L004 => "L004",
            Self::P001 => "P001",
            Self::P002 => "P002",
        }
    }
}

/// A positioned syntax error produced by the lexer or parser.
#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}:{} — {}", self.code.as_str(), self.line, self.column, self.message)
    }
}

impl std::error::Error for Error {}

// ─────────────────────────────────────────────────────────────────────────────

/// Everything that can go wrong while evaluating.
///
/// The `Display` text of each variant is the message a program sees in its
/// `Value::Error`, so the wording (including `missmatch`) is load-bearing.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RuntimeError {
    #[error("type missmatch: {left} {op} {right}")]
    TypeMismatch { left: &'static str, op: String, right: &'static str },

    #[error("unknown operation: {op}{operand}")]
    UnknownPrefix { op: String, operand: &'static str },

    #[error("unknown operation: {left} {op} {right}")]
    UnknownInfix { left: &'static str, op: String, right: &'static str },

    #[error("identifier not found: `{0}`")]
    IdentifierNotFound(String),

    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),

    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),

    #[error("not a function: {0}")]
    NotAFunction(&'static str),

    #[error("wrong number of arguments. Got: {got}, take: {want}")]
    WrongArgumentCount { got: usize, want: usize },

    #[error("argument to `{builtin}` not supported: {ty}")]
    UnsupportedArgument { builtin: &'static str, ty: &'static str },

    #[error("argument to `{builtin}` must be {expected}, got {ty}")]
    ExpectedArgument { builtin: &'static str, expected: &'static str, ty: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("maximum call depth exceeded: {0}")]
    CallDepthExceeded(usize),

    /// An `Error` value handed back by a host builtin, message kept verbatim.
    #[error("{0}")]
    Raised(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
