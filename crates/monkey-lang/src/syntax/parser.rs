use std::rc::Rc;

use crate::syntax::ast::*;
use crate::error::{Error, ErrorCode};
use crate::stack::ensure_sufficient_stack;
use crate::syntax::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(mut self) -> Result<Program, Vec<Error>> {
        let mut errors = Vec::new();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let pos_before = self.pos;

            match self.parse_stmt() {
                Ok(s) => statements.push(s),
                Err(e) => { errors.push(e); self.recover(); }
            }

            // guarantee progress: if nothing was consumed, force-advance
            // to prevent an infinite loop on unrecognised tokens
            if self.pos == pos_before {
                self.advance();
            }
        }

        if errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(errors)
        }
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Block, Error> {
        let span = self.span();
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block { statements, span })
    }

    /// Parses one statement and the optional `;` after it.
    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        let stmt = match self.peek_kind() {
            TokenKind::Let    => self.parse_let()?,
            TokenKind::Return => self.parse_return()?,
            _ => Stmt::Expr(self.parse_expr()?),
        };
        self.matches(TokenKind::Semicolon);
        Ok(stmt)
    }

    fn parse_let(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::Let)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Let(LetStmt { name, value, span }))
    }

    fn parse_return(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.expect(TokenKind::Return)?;
        let value = if self.check(TokenKind::Semicolon) || self.check(TokenKind::RBrace) || self.is_at_end() {
            None
        } else {
            Some(self.parse_expr()?)
        };
        Ok(Stmt::Return(value, span))
    }

    // ─── Expressions (precedence climbing) ───────────────────────────────────

    /// Every nested expression (parentheses, arguments, blocks) re-enters here.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, Error> {
        ensure_sufficient_stack(|| self.parse_equality())
    }

    fn parse_equality(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq   => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_addition()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_addition()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_multiplication()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus  => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_multiplication()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, Error> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star  => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            let span = left.span().clone();
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinOp { left: Box::new(left), op, right: Box::new(right), span };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<Expr, Error> {
        let span = self.span();
        if self.matches(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::UnOp { op: UnOp::Neg, operand: Box::new(operand), span });
        }
        if self.matches(TokenKind::Bang) {
            let operand = self.parse_unary()?;
            return Ok(Expr::UnOp { op: UnOp::Not, operand: Box::new(operand), span });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, Error> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                // call: expr(args)
                TokenKind::LParen => {
                    let span = expr.span().clone();
                    self.advance();
                    let args = self.parse_expr_list(TokenKind::RParen)?;
                    expr = Expr::Call { callee: Box::new(expr), args, span };
                }

                // index: expr[i]
                TokenKind::LBracket => {
                    let span = expr.span().clone();
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index { expr: Box::new(expr), index: Box::new(index), span };
                }

                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        let tok = self.peek().clone();
        let span = Span::new(tok.line, tok.column);

        match tok.kind {
            TokenKind::Int(v)       => { self.advance(); Ok(Expr::Int(v, span)) }
            TokenKind::Bool(v)      => { self.advance(); Ok(Expr::Bool(v, span)) }
            TokenKind::StringLit(s) => { self.advance(); Ok(Expr::StringLit(s, span)) }
            TokenKind::Ident(name)  => { self.advance(); Ok(Expr::Ident(name, span)) }

            // grouped expression
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            // array literal
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_expr_list(TokenKind::RBracket)?;
                Ok(Expr::Array(items, span))
            }

            TokenKind::LBrace => self.parse_hash(),
            TokenKind::If     => self.parse_if(),
            TokenKind::Fn     => self.parse_fn(),

            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_if(&mut self) -> Result<Expr, Error> {
        let span = self.span();
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_block = self.parse_block()?;
        let else_block = if self.matches(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Expr::If { condition: Box::new(condition), then_block, else_block, span })
    }

    fn parse_fn(&mut self) -> Result<Expr, Error> {
        let span = self.span();
        self.expect(TokenKind::Fn)?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            params.push(self.expect_ident()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Expr::Fn { params: params.into(), body: Rc::new(body), span })
    }

    fn parse_hash(&mut self) -> Result<Expr, Error> {
        let span = self.span();
        self.expect(TokenKind::LBrace)?;
        let mut pairs = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let key = self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            pairs.push((key, value));
            if !self.matches(TokenKind::Comma) { break; }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::Hash(pairs, span))
    }

    // ─── Argument lists ──────────────────────────────────────────────────────

    /// Comma-separated expressions up to and including `close`.
    fn parse_expr_list(&mut self, close: TokenKind) -> Result<Vec<Expr>, Error> {
        let mut items = Vec::new();
        while !self.check(close.clone()) && !self.is_at_end() {
            items.push(self.parse_expr()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        self.expect(close)?;
        Ok(items)
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind.clone()) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(Error::new(
                ErrorCode::P002,
                tok.line,
                tok.column,
                format!("expected {kind}, found {}", tok.kind),
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, Error> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Ident(s) => { self.advance(); Ok(s) }
            _ => Err(self.error_at(&tok, "expected identifier")),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn span(&self) -> Span {
        let tok = self.peek();
        Span::new(tok.line, tok.column)
    }

    fn unexpected(&self, expected: &str) -> Error {
        let tok = self.peek();
        Error::new(
            ErrorCode::P001,
            tok.line,
            tok.column,
            format!("expected {expected}, found {}", tok.kind),
        )
    }

    fn error_at(&self, tok: &Token, msg: &str) -> Error {
        Error::new(ErrorCode::P001, tok.line, tok.column, msg)
    }

    /// Skip tokens until we find something that looks like a new statement.
    /// Used after a parse error to attempt recovery.
    fn recover(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof
                | TokenKind::Let
                | TokenKind::Return => break,
                TokenKind::Semicolon => { self.advance(); break; }
                _ => { self.advance(); }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
