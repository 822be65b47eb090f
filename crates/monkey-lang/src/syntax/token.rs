use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Bool(bool),
    Ident(String),
    StringLit(String),

    // Keywords
    Fn,
    Let,
    If,
    Else,
    Return,

    // Operators
    Assign,     // =
    Plus,       // +
    Minus,      // -
    Bang,       // !
    Star,       // *
    Slash,      // /
    EqEq,       // ==
    BangEq,     // !=
    Lt,         // <
    Gt,         // >

    // Punctuation
    Colon,      // :
    Comma,      // ,
    Semicolon,  // ;
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]

    Eof,
}

/// Source form used in syntax error messages.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Int(v)       => return write!(f, "integer `{v}`"),
            Self::Bool(v)      => return write!(f, "`{v}`"),
            Self::Ident(name)  => return write!(f, "identifier `{name}`"),
            Self::StringLit(_) => "string literal",
            Self::Fn        => "`fn`",
            Self::Let       => "`let`",
            Self::If        => "`if`",
            Self::Else      => "`else`",
            Self::Return    => "`return`",
            Self::Assign    => "`=`",
            Self::Plus      => "`+`",
            Self::Minus     => "`-`",
            Self::Bang      => "`!`",
            Self::Star      => "`*`",
            Self::Slash     => "`/`",
            Self::EqEq      => "`==`",
            Self::BangEq    => "`!=`",
            Self::Lt        => "`<`",
            Self::Gt        => "`>`",
            Self::Colon     => "`:`",
            Self::Comma     => "`,`",
            Self::Semicolon => "`;`",
            Self::LParen    => "`(`",
            Self::RParen    => "`)`",
            Self::LBrace    => "`{`",
            Self::RBrace    => "`}`",
            Self::LBracket  => "`[`",
            Self::RBracket  => "`]`",
            Self::Eof       => "end of input",
        };
        f.write_str(s)
    }
}

/// Maps an identifier string to its keyword token, or returns `Ident`.
pub fn keyword_or_ident(s: String) -> TokenKind {
    match s.as_str() {
        "fn"     => TokenKind::Fn,
        "let"    => TokenKind::Let,
        "if"     => TokenKind::If,
        "else"   => TokenKind::Else,
        "return" => TokenKind::Return,
        "true"   => TokenKind::Bool(true),
        "false"  => TokenKind::Bool(false),
        _        => TokenKind::Ident(s),
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}
