use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind, keyword_or_ident};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<Error>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.line, self.column));
                break;
            }

            match self.next_token() {
                Ok(Some(tok)) => tokens.push(tok),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let line = self.line;
        let col = self.column;
        let ch = self.advance();

        let kind = match ch {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,

            b'/' => {
                if self.peek() == b'/' { self.skip_line(); return Ok(None); }
                else { TokenKind::Slash }
            }
            b'=' => {
                if self.peek() == b'=' { self.advance(); TokenKind::EqEq }
                else { TokenKind::Assign }
            }
            b'!' => {
                if self.peek() == b'=' { self.advance(); TokenKind::BangEq }
                else { TokenKind::Bang }
            }

            b'"' => TokenKind::StringLit(self.read_string(line, col)?),
            b'0'..=b'9' => TokenKind::Int(self.read_integer(ch, line, col)?),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => keyword_or_ident(self.read_ident(ch)),

            other => {
                // Swallow the rest of a multi-byte character so it is reported once.
                while !self.is_at_end() && (self.peek() & 0xC0) == 0x80 { self.advance(); }
                let shown = if other.is_ascii() { (other as char).to_string() } else { "non-ASCII character".into() };
                return Err(Error::new(ErrorCode::L001, line, col,
                    format!("unexpected character `{shown}`")));
            }
        };

        Ok(Some(Token::new(kind, line, col)))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => { self.advance(); }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<String, Error> {
        let mut bytes = Vec::new();
        let mut error: Option<Error> = None;
        loop {
            if self.is_at_end() || self.peek() == b'\n' {
                return Err(Error::new(ErrorCode::L002, start_line, start_col,
                    "unterminated string literal"));
            }
            let ch = self.advance();
            if ch == b'"' { break; }
            if ch == b'\\' {
                let esc_line = self.line;
                let esc_col  = self.column;
                if self.is_at_end() { continue; }
                match self.advance() {
                    b'n'  => bytes.push(b'\n'),
                    b't'  => bytes.push(b'\t'),
                    b'"'  => bytes.push(b'"'),
                    b'\\' => bytes.push(b'\\'),
                    other => {
                        // Keep consuming so the rest of the string does not cascade.
                        if error.is_none() {
                            error = Some(Error::new(ErrorCode::L003, esc_line, esc_col,
                                format!("unknown escape sequence `\\{}`", other as char)));
                        }
                    }
                }
            } else {
                bytes.push(ch);
            }
        }
        if let Some(e) = error { return Err(e); }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_integer(&mut self, first: u8, line: usize, col: usize) -> Result<i64, Error> {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance() as char);
        }
        s.parse().map_err(|_| Error::new(ErrorCode::L004, line, col,
            format!("integer literal `{s}` is out of range")))
    }

    fn read_ident(&mut self, first: u8) -> String {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            s.push(self.advance() as char);
        }
        s
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(src: &str) -> Vec<Error> {
        Lexer::new(src).tokenize().unwrap_err()
    }

    #[test]
    fn empty() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn integer_literal() {
        assert_eq!(lex("42069"), vec![TokenKind::Int(42069), TokenKind::Eof]);
    }

    #[test]
    fn negative_is_prefix_minus() {
        assert_eq!(lex("-5"), vec![TokenKind::Minus, TokenKind::Int(5), TokenKind::Eof]);
    }

    #[test]
    fn keywords() {
        assert_eq!(lex("fn"),     vec![TokenKind::Fn,     TokenKind::Eof]);
        assert_eq!(lex("let"),    vec![TokenKind::Let,    TokenKind::Eof]);
        assert_eq!(lex("if"),     vec![TokenKind::If,     TokenKind::Eof]);
        assert_eq!(lex("else"),   vec![TokenKind::Else,   TokenKind::Eof]);
        assert_eq!(lex("return"), vec![TokenKind::Return, TokenKind::Eof]);
    }

    #[test]
    fn bool_literals() {
        assert_eq!(lex("true"),  vec![TokenKind::Bool(true),  TokenKind::Eof]);
        assert_eq!(lex("false"), vec![TokenKind::Bool(false), TokenKind::Eof]);
    }

    #[test]
    fn bang_and_bang_eq() {
        assert_eq!(lex("!"),  vec![TokenKind::Bang,   TokenKind::Eof]);
        assert_eq!(lex("!="), vec![TokenKind::BangEq, TokenKind::Eof]);
        assert_eq!(lex("!!x"), vec![
            TokenKind::Bang, TokenKind::Bang, TokenKind::Ident("x".into()), TokenKind::Eof,
        ]);
    }

    #[test]
    fn assign_vs_eq_eq() {
        assert_eq!(lex("= =="), vec![TokenKind::Assign, TokenKind::EqEq, TokenKind::Eof]);
    }

    #[test]
    fn line_comment_skipped() {
        assert_eq!(lex("// comment\n42"), vec![TokenKind::Int(42), TokenKind::Eof]);
    }

    #[test]
    fn string_literal() {
        assert_eq!(lex(r#""hello""#), vec![TokenKind::StringLit("hello".into()), TokenKind::Eof]);
    }

    #[test]
    fn string_escape_newline() {
        assert_eq!(lex(r#""a\nb""#), vec![TokenKind::StringLit("a\nb".into()), TokenKind::Eof]);
    }

    #[test]
    fn string_keeps_utf8() {
        assert_eq!(lex("\"héllo\""), vec![TokenKind::StringLit("héllo".into()), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_error() {
        let errs = lex_err(r#""oops"#);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L002);
    }

    #[test]
    fn invalid_escape_error() {
        let errs = lex_err(r#""\q""#);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L003);
    }

    #[test]
    fn integer_overflow_error() {
        let errs = lex_err("99999999999999999999");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::L004);
    }

    #[test]
    fn unexpected_character_error() {
        let errs = lex_err("5 @ 5 # 5");
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.code == ErrorCode::L001));
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = Lexer::new("a\n  b").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }

    #[test]
    fn let_statement() {
        assert_eq!(
            lex("let five = 5;"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("five".into()),
                TokenKind::Assign,
                TokenKind::Int(5),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn function_literal_and_hash() {
        assert_eq!(
            lex(r#"fn(x, y) { {"a": x}[y] }"#),
            vec![
                TokenKind::Fn,
                TokenKind::LParen,
                TokenKind::Ident("x".into()),
                TokenKind::Comma,
                TokenKind::Ident("y".into()),
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::LBrace,
                TokenKind::StringLit("a".into()),
                TokenKind::Colon,
                TokenKind::Ident("x".into()),
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::Ident("y".into()),
                TokenKind::RBracket,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::RParen.to_string(), "`)`");
        assert_eq!(TokenKind::Ident("x".into()).to_string(), "identifier `x`");
        assert_eq!(TokenKind::Int(7).to_string(), "integer `7`");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
