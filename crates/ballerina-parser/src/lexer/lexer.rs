//! Main lexer implementation for Ballerina.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s.
//! It dispatches on the first character of each token.

use bumpalo::Bump;

use super::cursor::{Cursor, Mark, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, TokenSource, lookup_keyword};
use ballerina_core::LexError;

/// Lexer for Ballerina source code.
///
/// Lexemes are copied into the arena, so the produced tokens outlive the
/// source string.
pub struct Lexer<'src, 'ast> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Arena that owns token lexemes.
    arena: &'ast Bump,
    /// Accumulated errors.
    errors: Vec<LexError>,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            errors: Vec::new(),
        }
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'ast> {
        self.scan_token()
    }

    /// Lex the whole input, including the final `Eof` token.
    pub fn tokenize(mut self) -> (Vec<Token<'ast>>, Vec<LexError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.errors)
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self) -> Token<'ast> {
        loop {
            self.skip_whitespace();

            let mark = self.cursor.mark();
            let Some(c) = self.cursor.peek() else {
                return self.make_token(TokenKind::Eof, mark);
            };

            return match c {
                '/' => match self.cursor.peek_nth(1) {
                    Some('/') => self.scan_line_comment(mark),
                    Some('*') => {
                        if self.skip_block_comment(mark) {
                            continue;
                        }
                        self.make_error_token(mark)
                    }
                    _ => {
                        self.cursor.advance();
                        self.make_token(TokenKind::Slash, mark)
                    }
                },
                '"' => self.scan_string(mark),
                '`' => self.scan_backtick(mark),
                c if c.is_ascii_digit() => self.scan_number(mark),
                '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.scan_number(mark)
                }
                c if is_ident_start(c) => self.scan_identifier(mark),
                _ => self.scan_operator(mark),
            };
        }
    }

    /// Skip whitespace and a leading BOM.
    fn skip_whitespace(&mut self) {
        if self.cursor.offset() == 0 && self.cursor.check_str("\u{FEFF}") {
            self.cursor.advance();
        }
        self.cursor.eat_while(|c| c.is_whitespace());
    }

    /// Create a token from a mark to the current position.
    fn make_token(&self, kind: TokenKind, mark: Mark) -> Token<'ast> {
        let span = self.cursor.span_from(mark);
        let lexeme = self.arena.alloc_str(self.cursor.slice_from(mark.offset));
        Token::new(kind, lexeme, span)
    }

    /// Create an error token covering the input consumed since `mark`.
    ///
    /// The matching [`LexError`] must already have been recorded.
    fn make_error_token(&self, mark: Mark) -> Token<'ast> {
        self.make_token(TokenKind::Error, mark)
    }

    // =========================================
    // Scanning: Comments
    // =========================================

    fn scan_line_comment(&mut self, mark: Mark) -> Token<'ast> {
        self.cursor.eat_while(|c| c != '\n' && c != '\r');
        self.make_token(TokenKind::LineComment, mark)
    }

    /// Skip a `/* ... */` comment. Returns false if it never closes.
    fn skip_block_comment(&mut self, mark: Mark) -> bool {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                None => {
                    let span = self.cursor.span_from(mark);
                    self.errors.push(LexError::UnterminatedComment { span });
                    return false;
                }
                Some('*') if self.cursor.eat('/') => return true,
                Some(_) => {}
            }
        }
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Scan a double-quoted string. Strings do not span lines.
    fn scan_string(&mut self, mark: Mark) -> Token<'ast> {
        self.cursor.advance();

        loop {
            match self.cursor.peek() {
                None | Some('\n') | Some('\r') => {
                    let span = self.cursor.span_from(mark);
                    self.errors.push(LexError::UnterminatedString { span });
                    return self.make_error_token(mark);
                }
                Some('\\') => {
                    let escape = self.cursor.mark();
                    self.cursor.advance();
                    self.scan_escape(escape);
                }
                Some('"') => {
                    self.cursor.advance();
                    return self.make_token(TokenKind::StringLiteral, mark);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Consume the body of an escape sequence after the backslash.
    fn scan_escape(&mut self, escape: Mark) {
        match self.cursor.peek() {
            Some('b' | 't' | 'n' | 'f' | 'r' | '"' | '\'' | '\\') => {
                self.cursor.advance();
            }
            Some('0'..='7') => {
                // Octal escape: up to three digits.
                for _ in 0..3 {
                    if !self.cursor.check(|c| ('0'..='7').contains(&c)) {
                        break;
                    }
                    self.cursor.advance();
                }
            }
            Some('u') => {
                while self.cursor.eat('u') {}
                for _ in 0..4 {
                    if !self.cursor.check(|c| c.is_ascii_hexdigit()) {
                        break;
                    }
                    self.cursor.advance();
                }
            }
            Some(c) if c != '\n' && c != '\r' => {
                self.cursor.advance();
                let span = self.cursor.span_from(escape);
                self.errors.push(LexError::UnknownEscape { ch: c, span });
            }
            _ => {}
        }
    }

    /// Scan a backtick template string. Templates may span lines.
    fn scan_backtick(&mut self, mark: Mark) -> Token<'ast> {
        self.cursor.advance();

        loop {
            match self.cursor.advance() {
                None => {
                    let span = self.cursor.span_from(mark);
                    self.errors.push(LexError::UnterminatedTemplate { span });
                    return self.make_error_token(mark);
                }
                Some('\\') => {
                    self.cursor.advance();
                }
                Some('`') => return self.make_token(TokenKind::BacktickLiteral, mark),
                Some(_) => {}
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    fn scan_number(&mut self, mark: Mark) -> Token<'ast> {
        if self.cursor.peek() == Some('0') {
            let radix = match self.cursor.peek_nth(1) {
                Some('x' | 'X') => Some(16),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                return self.scan_radix_integer(mark, radix);
            }
        }
        self.scan_decimal_number(mark)
    }

    /// Scan `0x...` or `0b...` integers.
    fn scan_radix_integer(&mut self, mark: Mark, radix: u32) -> Token<'ast> {
        self.cursor.advance();
        self.cursor.advance();

        let digits = self.cursor.eat_while(|c| c.is_digit(radix) || c == '_');
        if digits.is_empty() {
            let span = self.cursor.span_from(mark);
            self.errors.push(LexError::InvalidNumber {
                span,
                detail: "expected digits after radix prefix".to_string(),
            });
            return self.make_error_token(mark);
        }

        self.eat_integer_suffix();
        self.make_token(TokenKind::IntegerLiteral, mark)
    }

    /// Scan decimal and octal integers and every floating-point form.
    fn scan_decimal_number(&mut self, mark: Mark) -> Token<'ast> {
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');

        let mut is_float = false;

        if self.cursor.peek() == Some('.') && matches!(self.cursor.peek_nth(1), Some('0'..='9')) {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            is_float = true;
        }

        if let Some('e' | 'E') = self.cursor.peek() {
            let sign = matches!(self.cursor.peek_nth(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if matches!(self.cursor.peek_nth(digit_at), Some('0'..='9')) {
                self.cursor.advance();
                if sign {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
                is_float = true;
            } else {
                self.cursor.advance();
                let span = self.cursor.span_from(mark);
                self.errors.push(LexError::InvalidNumber {
                    span,
                    detail: "missing exponent digits".to_string(),
                });
                return self.make_error_token(mark);
            }
        }

        if let Some('f' | 'F' | 'd' | 'D') = self.cursor.peek() {
            self.cursor.advance();
            is_float = true;
        } else if !is_float {
            self.eat_integer_suffix();
        }

        if self.cursor.check(is_ident_continue) {
            self.cursor.eat_while(is_ident_continue);
            let span = self.cursor.span_from(mark);
            self.errors.push(LexError::InvalidNumber {
                span,
                detail: "unexpected characters after number".to_string(),
            });
            return self.make_error_token(mark);
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        self.make_token(kind, mark)
    }

    fn eat_integer_suffix(&mut self) {
        if !self.cursor.eat('l') {
            self.cursor.eat('L');
        }
    }

    // =========================================
    // Scanning: Identifiers and keywords
    // =========================================

    fn scan_identifier(&mut self, mark: Mark) -> Token<'ast> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, mark)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    fn scan_operator(&mut self, mark: Mark) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_token(TokenKind::Eof, mark);
        };

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '@' => TokenKind::At,
            '+' => TokenKind::Plus,
            '^' => TokenKind::Caret,
            '*' => TokenKind::Star,
            '%' => TokenKind::Percent,

            '-' => {
                if self.cursor.eat('>') {
                    TokenKind::RightArrow
                } else {
                    TokenKind::Minus
                }
            }
            '<' => {
                if self.cursor.eat('=') {
                    TokenKind::LessEqual
                } else if self.cursor.eat('-') {
                    TokenKind::LeftArrow
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.cursor.eat('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '=' => {
                if self.cursor.eat('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.cursor.eat('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '&' if self.cursor.eat('&') => TokenKind::AmpAmp,
            '|' if self.cursor.eat('|') => TokenKind::PipePipe,

            _ => {
                let span = self.cursor.span_from(mark);
                self.errors.push(LexError::UnexpectedChar { ch: c, span });
                return self.make_error_token(mark);
            }
        };

        self.make_token(kind, mark)
    }
}

impl<'ast> TokenSource<'ast> for Lexer<'_, 'ast> {
    fn next_token(&mut self) -> Token<'ast> {
        self.scan_token()
    }

    fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }
}
