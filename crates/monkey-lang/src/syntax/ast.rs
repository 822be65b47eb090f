use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::stack::ensure_sufficient_stack;

/// Source location attached to every node for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// `{ stmt; stmt }`: the body of an `if` branch or a function.
#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `let x = 5;`
    Let(LetStmt),
    /// `return expr;` or bare `return;`
    Return(Option<Expr>, Span),
    /// A standalone expression used as a statement; its value is the block's value
    /// when it comes last.
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct LetStmt {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64, Span),
    Bool(bool, Span),
    StringLit(String, Span),
    Ident(String, Span),

    /// `a + b`, `a == b`, etc.
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
        span: Span,
    },

    /// `!x`, `-x`
    UnOp {
        op: UnOp,
        operand: Box<Expr>,
        span: Span,
    },

    /// `if (cond) { ... } else { ... }`
    If {
        condition: Box<Expr>,
        then_block: Block,
        else_block: Option<Block>,
        span: Span,
    },

    /// `fn(a, b) { ... }`. The body is shared with every closure built from it.
    Fn {
        params: Rc<[String]>,
        body: Rc<Block>,
        span: Span,
    },

    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },

    /// `expr[index]`
    Index {
        expr: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },

    /// `[1, 2, 3]`
    Array(Vec<Expr>, Span),

    /// `{"a": 1, 2: true}`. Pairs kept in source order.
    Hash(Vec<(Expr, Expr)>, Span),
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Int(_, s)        => s,
            Expr::Bool(_, s)       => s,
            Expr::StringLit(_, s)  => s,
            Expr::Ident(_, s)      => s,
            Expr::BinOp { span, .. } => span,
            Expr::UnOp { span, .. }  => span,
            Expr::If { span, .. }    => span,
            Expr::Fn { span, .. }    => span,
            Expr::Call { span, .. }  => span,
            Expr::Index { span, .. } => span,
            Expr::Array(_, s)      => s,
            Expr::Hash(_, s)       => s,
        }
    }
}

// ─── Drop ────────────────────────────────────────────────────────────────────

impl Expr {
    fn is_leaf(&self) -> bool {
        matches!(self, Expr::Int(..) | Expr::Bool(..) | Expr::StringLit(..) | Expr::Ident(..))
    }

    /// Moves every non-leaf child expression into `out`.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        fn take(slot: &mut Expr, out: &mut Vec<Expr>) {
            if !slot.is_leaf() {
                out.push(mem::replace(slot, Expr::Int(0, Span::new(0, 0))));
            }
        }
        fn take_block(block: &mut Block, out: &mut Vec<Expr>) {
            for stmt in mem::take(&mut block.statements) {
                match stmt {
                    Stmt::Let(l)             => out.push(l.value),
                    Stmt::Return(Some(e), _) => out.push(e),
                    Stmt::Return(None, _)    => {}
                    Stmt::Expr(e)            => out.push(e),
                }
            }
        }

        match self {
            Expr::Int(..) | Expr::Bool(..) | Expr::StringLit(..) | Expr::Ident(..) => {}
            Expr::BinOp { left, right, .. } => {
                take(left, out);
                take(right, out);
            }
            Expr::UnOp { operand, .. } => take(operand, out),
            Expr::If { condition, then_block, else_block, .. } => {
                take(condition, out);
                take_block(then_block, out);
                if let Some(b) = else_block { take_block(b, out); }
            }
            // A body still shared with a closure is dropped with the closure.
            Expr::Fn { body, .. } => {
                if let Some(b) = Rc::get_mut(body) { take_block(b, out); }
            }
            Expr::Call { callee, args, .. } => {
                take(callee, out);
                out.append(args);
            }
            Expr::Index { expr, index, .. } => {
                take(expr, out);
                take(index, out);
            }
            Expr::Array(items, _) => out.append(items),
            Expr::Hash(pairs, _) => {
                for (k, v) in mem::take(pairs) {
                    out.push(k);
                    out.push(v);
                }
            }
        }
    }
}

/// Tears the tree down with an explicit worklist; the derived drop would
/// recurse once per nesting level.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

// ─── Operators ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add, Sub, Mul, Div,
    Eq, NotEq,
    Lt, Gt,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add   => "+",
            BinOp::Sub   => "-",
            BinOp::Mul   => "*",
            BinOp::Div   => "/",
            BinOp::Eq    => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt    => "<",
            BinOp::Gt    => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

// ─── Display ─────────────────────────────────────────────────────────────────
//
// Canonical, fully parenthesised source form. Used when a function value is
// inspected and in parser tests to check precedence.

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 { write!(f, ", ")?; }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements { write!(f, "{stmt}")?; }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements { write!(f, "{stmt}")?; }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(l)               => write!(f, "let {} = {};", l.name, l.value),
            Stmt::Return(Some(e), _)   => write!(f, "return {e};"),
            Stmt::Return(None, _)      => write!(f, "return;"),
            Stmt::Expr(e)              => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| self.fmt_inner(f))
    }
}

impl Expr {
    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(v, _)        => write!(f, "{v}"),
            Expr::Bool(v, _)       => write!(f, "{v}"),
            Expr::StringLit(s, _)  => write!(f, "{s:?}"),
            Expr::Ident(name, _)   => f.write_str(name),
            Expr::BinOp { left, op, right, .. } => write!(f, "({left} {op} {right})"),
            Expr::UnOp { op, operand, .. }      => write!(f, "({op}{operand})"),
            Expr::If { condition, then_block, else_block, .. } => {
                write!(f, "if {condition} {then_block}")?;
                if let Some(e) = else_block { write!(f, "else {e}")?; }
                Ok(())
            }
            Expr::Fn { params, body, .. } => {
                write!(f, "fn(")?;
                join(f, params)?;
                write!(f, ") {body}")
            }
            Expr::Call { callee, args, .. } => {
                write!(f, "{callee}(")?;
                join(f, args)?;
                write!(f, ")")
            }
            Expr::Index { expr, index, .. } => write!(f, "({expr}[{index}])"),
            Expr::Array(items, _) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            Expr::Hash(pairs, _) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
