//! Character-level scanning over a source string.
//!
//! The lexer never indexes the source directly; it moves a [`Cursor`]
//! forward one `char` at a time and asks it for [`Mark`]s and spans.

use ballerina_core::Span;

/// Position of the cursor: byte offset, 1-based line, 1-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Mark {
    const START: Mark = Mark {
        offset: 0,
        line: 1,
        column: 1,
    };
}

pub struct Cursor<'src> {
    source: &'src str,
    pos: Mark,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: Mark::START,
        }
    }

    #[inline]
    fn remaining(&self) -> &'src str {
        &self.source[self.pos.offset as usize..]
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.pos.offset
    }

    #[inline]
    pub fn mark(&self) -> Mark {
        self.pos
    }

    /// The span covering everything consumed since `mark` was taken.
    #[inline]
    pub fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.offset, self.pos.offset, mark.line, mark.column)
    }

    /// Text consumed since byte offset `start`.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.pos.offset as usize]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Look `n` characters past the current one without moving.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    #[inline]
    pub fn check(&self, pred: impl Fn(char) -> bool) -> bool {
        matches!(self.peek(), Some(c) if pred(c))
    }

    #[inline]
    pub fn check_str(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Step over one character. A newline moves to column 1 of the next line.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        let width = c.len_utf8() as u32;
        self.pos.offset += width;
        match c {
            '\n' => {
                self.pos.line += 1;
                self.pos.column = 1;
            }
            _ => self.pos.column += width,
        }
        Some(c)
    }

    #[inline]
    pub fn eat(&mut self, expected: char) -> bool {
        let hit = self.peek() == Some(expected);
        if hit {
            self.advance();
        }
        hit
    }

    /// Advance over the longest run of characters accepted by `pred`.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let from = self.pos.offset;
        while self.check(&pred) {
            self.advance();
        }
        self.slice_from(from)
    }
}

/// Identifiers are ASCII letters, digits, `_` and `$`, not led by a digit.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_' | '$')
}

#[inline]
pub fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
