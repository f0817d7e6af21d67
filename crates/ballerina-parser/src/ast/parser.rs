//! Parser infrastructure for Ballerina.
//!
//! Provides the main [`Parser`] struct with token navigation, diagnostic
//! bookkeeping, error recovery and the side-effect free lookahead helpers
//! shared by the rule parsers.

use crate::ast::stmt::CommentStmt;
use crate::ast::{
    CompilationUnit, Expr, Ident, ParseError, ParseErrorKind, ParseErrors, Stmt, TokenMarker,
    TypeName,
};
use crate::lexer::{Lexer, Span, Token, TokenKind, TokenSource};
use ballerina_core::Recovery;
use bumpalo::Bump;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of blocks, expressions and types, counted together.
    ///
    /// Each level costs stack; the default stays inside a 2 MiB thread
    /// stack in unoptimized builds.
    pub max_depth: usize,
    /// Stop recording diagnostics after this many.
    pub max_errors: Option<usize>,
    /// Turn line comments in statement position into comment statements.
    pub keep_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_errors: None,
            keep_comments: true,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }

    pub fn with_keep_comments(mut self, keep_comments: bool) -> Self {
        self.keep_comments = keep_comments;
        self
    }
}

/// Where panic-mode recovery is allowed to resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SyncPoint {
    /// Inside a statement list.
    Statement,
    /// Inside a service, connector, struct or annotation body.
    Member,
}

/// The main parser for Ballerina source code.
///
/// Tokens are pulled from the [`TokenSource`] up front. Line comments are
/// kept aside, keyed by the index of the token that follows them, so that
/// lookahead never has to step over them.
///
/// The `'ast` lifetime refers to the arena where AST nodes and token
/// lexemes are allocated.
pub struct Parser<'ast> {
    /// Buffered tokens, comments removed, always ending with `Eof`.
    pub(super) tokens: Vec<Token<'ast>>,
    /// Current position in the buffer
    pub(super) position: usize,
    /// Line comments with the index of the token that follows each one.
    comments: Vec<(usize, Token<'ast>)>,
    next_comment: usize,
    /// Accumulated diagnostics
    pub(super) errors: ParseErrors,
    /// Offsets that already carry an error, for suppressing repeats.
    reported_at: FxHashSet<u32>,
    error_limit_hit: bool,
    /// Current nesting depth
    pub(super) depth: usize,
    pub(super) options: ParseOptions,
    /// Arena allocator for AST nodes
    pub(super) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Create a parser over source text with default options.
    pub fn new(source: &str, arena: &'ast Bump) -> Self {
        Self::with_options(source, arena, ParseOptions::default())
    }

    /// Create a parser over source text.
    ///
    /// The source string is only needed during this call; all token lexemes
    /// are copied into the arena.
    pub fn with_options(source: &str, arena: &'ast Bump, options: ParseOptions) -> Self {
        Self::from_tokens(Lexer::new(source, arena), arena, options)
    }

    /// Create a parser over any token source.
    ///
    /// `Error` tokens are dropped; the lexical errors the source reports
    /// become diagnostics instead.
    pub fn from_tokens<S: TokenSource<'ast>>(
        mut source: S,
        arena: &'ast Bump,
        options: ParseOptions,
    ) -> Self {
        let mut tokens = Vec::new();
        let mut comments = Vec::new();

        let eof = loop {
            let token = source.next_token();
            match token.kind {
                TokenKind::Eof => break token,
                TokenKind::LineComment => comments.push((tokens.len(), token)),
                TokenKind::Error => {}
                _ => tokens.push(token),
            }
        };
        tokens.push(eof);

        let mut parser = Self {
            tokens,
            position: 0,
            comments,
            next_comment: 0,
            errors: ParseErrors::new(),
            reported_at: FxHashSet::default(),
            error_limit_hit: false,
            depth: 0,
            options,
            arena,
        };
        for lex_error in source.take_errors() {
            parser.report(ParseError::from(lex_error));
        }
        parser
    }

    /// Check if any diagnostics were recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take the diagnostics, leaving an empty collection.
    pub fn take_errors(&mut self) -> ParseErrors {
        std::mem::take(&mut self.errors)
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Parse a complete source file.
    ///
    /// Returns the tree when no error-severity diagnostic was recorded.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<CompilationUnit<'ast>, ParseErrors> {
        let (unit, errors) = Self::parse_lenient(source, arena);
        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(unit)
        }
    }

    /// Parse a complete source file, always returning a (possibly partial)
    /// tree together with every diagnostic.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_lenient(source: &str, arena: &'ast Bump) -> (CompilationUnit<'ast>, ParseErrors) {
        Self::parse_with_options(source, arena, ParseOptions::default())
    }

    /// Lenient parse with explicit options.
    pub fn parse_with_options(
        source: &str,
        arena: &'ast Bump,
        options: ParseOptions,
    ) -> (CompilationUnit<'ast>, ParseErrors) {
        let mut parser = Self::with_options(source, arena, options);
        let unit = parser.parse_compilation_unit();
        (unit, parser.take_errors())
    }

    /// Lenient parse of pre-lexed tokens.
    pub fn parse_tokens<S: TokenSource<'ast>>(
        source: S,
        arena: &'ast Bump,
        options: ParseOptions,
    ) -> (CompilationUnit<'ast>, ParseErrors) {
        let mut parser = Self::from_tokens(source, arena, options);
        let unit = parser.parse_compilation_unit();
        (unit, parser.take_errors())
    }

    /// Parse a single expression that must span the whole input.
    pub fn expression(source: &str, arena: &'ast Bump) -> Result<Expr<'ast>, ParseErrors> {
        let mut parser = Self::new(source, arena);
        let result = parser.parse_expr(0);
        parser.finish_fragment(result)
    }

    /// Parse a single statement that must span the whole input.
    pub fn statement(source: &str, arena: &'ast Bump) -> Result<Stmt<'ast>, ParseErrors> {
        let mut parser = Self::new(source, arena);
        let result = parser.parse_statement();
        parser.finish_fragment(result)
    }

    /// Parse a single type name that must span the whole input.
    pub fn type_name(source: &str, arena: &'ast Bump) -> Result<TypeName<'ast>, ParseErrors> {
        let mut parser = Self::new(source, arena);
        let result = parser.parse_type();
        parser.finish_fragment(result)
    }

    fn finish_fragment<T>(&mut self, result: Result<T, ParseError>) -> Result<T, ParseErrors> {
        match result {
            Ok(node) => {
                if !self.is_eof() {
                    let token = *self.peek();
                    self.report(ParseError::expected_token(
                        token.span,
                        TokenKind::Eof.description(),
                        token.kind.description(),
                    ));
                }
                if self.errors.has_errors() {
                    Err(self.take_errors())
                } else {
                    Ok(node)
                }
            }
            Err(err) => {
                self.report(err);
                Err(self.take_errors())
            }
        }
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    fn eof_token(&self) -> &Token<'ast> {
        // `tokens` always ends with `Eof`.
        &self.tokens[self.tokens.len() - 1]
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> &Token<'ast> {
        self.tokens
            .get(self.position)
            .unwrap_or_else(|| self.eof_token())
    }

    /// Peek ahead n tokens without consuming.
    pub fn peek_nth(&self, n: usize) -> &Token<'ast> {
        self.tokens
            .get(self.position + n)
            .unwrap_or_else(|| self.eof_token())
    }

    /// Get the current token and advance to the next. Never moves past `Eof`.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// The most recently consumed token, or the current one at the start.
    pub(super) fn previous(&self) -> &Token<'ast> {
        match self.position.checked_sub(1) {
            Some(index) => &self.tokens[index],
            None => self.peek(),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        if self.position == 0 {
            return start;
        }
        start.merge(self.previous().span)
    }

    /// Check if the current token matches the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Check the kind of the token `n` ahead.
    pub fn check_nth(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_nth(n).kind == kind
    }

    /// Check if the current token is EOF.
    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// If the current token matches the given kind, consume it and return Some.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect the current token to be of the given kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = *self.peek();
            Err(self.expected_error(token, kind.description()))
        }
    }

    /// Expect an identifier and build an [`Ident`] from it.
    pub fn expect_ident(&mut self) -> Result<Ident<'ast>, ParseError> {
        let token = *self.peek();
        if token.kind == TokenKind::Identifier {
            self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else if token.kind == TokenKind::Eof {
            Err(ParseError::unexpected_eof(token.span))
        } else {
            Err(ParseError::expected_identifier(
                token.span,
                token.kind.description(),
            ))
        }
    }

    pub(super) fn expected_error(&self, found: Token<'ast>, expected: &str) -> ParseError {
        if found.kind == TokenKind::Eof {
            ParseError::new(
                ParseErrorKind::UnexpectedEof,
                found.span,
                format!("expected {expected}, found end of file"),
            )
        } else {
            ParseError::expected_token(found.span, expected, found.kind.description())
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Record a diagnostic.
    ///
    /// A second error at an offset that already has one is dropped, and once
    /// `max_errors` is reached a single `TooManyErrors` closes the list.
    pub(super) fn report(&mut self, error: ParseError) {
        if self.error_limit_hit {
            return;
        }
        if error.is_error() && !self.reported_at.insert(error.span.start) {
            trace!(offset = error.span.start, kind = %error.kind, "suppressed repeated diagnostic");
            return;
        }
        if let Some(max) = self.options.max_errors {
            if self.errors.len() >= max {
                self.error_limit_hit = true;
                self.errors.push(ParseError::new(
                    ParseErrorKind::TooManyErrors,
                    error.span,
                    format!("too many errors, stopped reporting after {max}"),
                ));
                return;
            }
        }
        self.errors.push(error);
    }

    /// Record an error for a delimiter that is not there and return a
    /// synthetic marker standing in for it.
    ///
    /// The current token is left alone so the enclosing rule can use it.
    pub(super) fn insert_missing(&mut self, kind: TokenKind) -> TokenMarker {
        let found = *self.peek();
        let at = if self.position == 0 {
            found.span
        } else {
            self.previous().span.after()
        };
        let error = self
            .expected_error(found, kind.description())
            .with_recovery(Recovery::InsertedMissing(kind.description()));
        debug!(
            expected = kind.description(),
            found = found.kind.description(),
            "assumed missing token"
        );
        self.report(error);
        TokenMarker::missing(at)
    }

    /// Consume a closing `}`, or assume it when the statement loop stopped
    /// somewhere else.
    pub(super) fn expect_closing_brace(&mut self) -> TokenMarker {
        match self.eat(TokenKind::RightBrace) {
            Some(token) => TokenMarker::present(token.span),
            None => self.insert_missing(TokenKind::RightBrace),
        }
    }

    /// Consume a terminating `;`.
    ///
    /// When it is absent but the current token can start what comes next,
    /// the `;` is assumed and parsing continues; otherwise this fails.
    pub(super) fn expect_semicolon(&mut self) -> Result<TokenMarker, ParseError> {
        if let Some(token) = self.eat(TokenKind::Semicolon) {
            return Ok(TokenMarker::present(token.span));
        }
        let kind = self.peek().kind;
        let assumable = kind.starts_statement()
            || kind.starts_definition()
            || kind == TokenKind::Worker
            || matches!(kind, TokenKind::RightBrace | TokenKind::Eof | TokenKind::At);
        if assumable {
            Ok(self.insert_missing(TokenKind::Semicolon))
        } else {
            let token = *self.peek();
            Err(self.expected_error(token, TokenKind::Semicolon.description()))
        }
    }

    // ========================================================================
    // Error Recovery
    // ========================================================================

    /// Skip tokens until a point where `sync` parsing can resume.
    ///
    /// Braces are balanced on the way: a `;` or a closing `}` only counts at
    /// the nesting level recovery started from. Returns the number of
    /// tokens skipped.
    pub(super) fn synchronize(&mut self, start: usize, sync: SyncPoint) -> usize {
        let from = self.position;
        let mut depth = 0usize;

        loop {
            let kind = self.peek().kind;
            match kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                k if k.starts_definition() => break,
                k if depth == 0 && self.position > start && k.starts_statement() => break,
                TokenKind::Worker if depth == 0 && self.position > start => break,
                TokenKind::Resource | TokenKind::Action | TokenKind::At
                    if depth == 0 && sync == SyncPoint::Member && self.position > start =>
                {
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }

        self.position - from
    }

    /// Report `error` and skip past the broken statement that began at token
    /// index `start`, returning the placeholder that covers it.
    pub(super) fn recover_statement(&mut self, error: ParseError, start: usize) -> Stmt<'ast> {
        let span = self.recover(error, start, SyncPoint::Statement);
        Stmt::Error(span)
    }

    /// Report `error` and skip past the broken body member that began at `start`.
    pub(super) fn recover_member(&mut self, error: ParseError, start: usize) -> Span {
        self.recover(error, start, SyncPoint::Member)
    }

    fn recover(&mut self, error: ParseError, start: usize, sync: SyncPoint) -> Span {
        // Always make progress, otherwise the caller would fail again here.
        if self.position == start && !self.is_eof() {
            self.advance();
        }
        self.synchronize(start, sync);
        let skipped = self.position - start;

        let span = if skipped == 0 {
            self.peek().span
        } else {
            self.tokens[start].span.merge(self.previous().span)
        };
        debug!(
            skipped,
            resume = self.peek().kind.description(),
            "resynchronized after syntax error"
        );

        let recovery = if skipped == 0 {
            Recovery::SingleToken
        } else {
            Recovery::Skipped {
                tokens: skipped as u32,
            }
        };
        self.report(error.with_recovery(recovery));
        span
    }

    /// Skip a broken top-level definition that began at `start`.
    ///
    /// Resumes at a definition keyword or a `@` at nesting level zero,
    /// after a `;`, or after a balanced `}`. Braces the definition opened
    /// before failing count toward that balance.
    pub(super) fn recover_definition(&mut self, error: ParseError, start: usize) -> Span {
        let mut depth = 0usize;
        for token in self.tokens.get(start..self.position).unwrap_or_default() {
            match token.kind {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if self.position == start && !self.is_eof() {
            self.advance();
        }
        loop {
            let kind = self.peek().kind;
            match kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                // A run of unmatched braces is one piece of garbage.
                TokenKind::RightBrace if depth == 0 => {
                    while self.eat(TokenKind::RightBrace).is_some() {}
                    break;
                }
                TokenKind::RightBrace => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                k if k.starts_definition() => break,
                TokenKind::At if depth == 0 => break,
                _ => {
                    self.advance();
                }
            }
        }

        let skipped = self.position - start;
        let span = if skipped == 0 {
            self.peek().span
        } else {
            self.tokens[start].span.merge(self.previous().span)
        };
        debug!(
            skipped,
            resume = self.peek().kind.description(),
            "skipped broken definition"
        );
        self.report(error.with_recovery(Recovery::Skipped {
            tokens: skipped as u32,
        }));
        span
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    /// Run `f` one nesting level deeper, failing once `max_depth` is reached.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.options.max_depth {
            let span = self.peek().span;
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep,
                span,
                format!("nesting exceeds the limit of {}", self.options.max_depth),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// The next comment that sits directly before the current token.
    ///
    /// Comments before earlier tokens were in non-statement positions and
    /// are dropped.
    pub(super) fn take_comment(&mut self) -> Option<CommentStmt<'ast>> {
        if !self.options.keep_comments {
            return None;
        }
        while let Some(&(index, token)) = self.comments.get(self.next_comment) {
            if index > self.position {
                return None;
            }
            self.next_comment += 1;
            if index == self.position {
                return Some(CommentStmt {
                    text: token.lexeme,
                    span: token.span,
                });
            }
        }
        None
    }

    // ========================================================================
    // Disambiguation Helpers
    // ========================================================================

    /// Check if the current token can start a type name.
    pub fn is_type_start(&self) -> bool {
        let kind = self.peek().kind;
        kind == TokenKind::Any
            || kind == TokenKind::Identifier
            || kind.is_value_type()
            || kind.is_builtin_reference_type()
    }

    /// Check if the current position starts a variable definition:
    /// a type name followed by an identifier.
    pub fn is_var_def(&mut self) -> bool {
        if !self.is_type_start() {
            return false;
        }
        let saved = self.position;
        let is_var = self.try_skip_type(0) && self.check(TokenKind::Identifier);
        self.position = saved;
        is_var
    }

    /// Check for `name (: name)? . name (`, the shape of an action invocation.
    pub fn is_action_invocation(&self) -> bool {
        if !self.check(TokenKind::Identifier) {
            return false;
        }
        let mut n = 1;
        if self.check_nth(1, TokenKind::Colon) && self.check_nth(2, TokenKind::Identifier) {
            n = 3;
        }
        self.check_nth(n, TokenKind::Dot)
            && self.check_nth(n + 1, TokenKind::Identifier)
            && self.check_nth(n + 2, TokenKind::LeftParen)
    }

    /// Check whether the `(` at the current position opens a cast.
    ///
    /// The parenthesized tokens must form a type name, and the token after
    /// `)` must start an operand. A bare user-defined name followed by `+`,
    /// `-` or `<` reads as a braced expression instead.
    pub fn is_cast(&mut self) -> bool {
        if !self.check(TokenKind::LeftParen) {
            return false;
        }
        let saved = self.position;
        self.advance();
        let first = self.peek().kind;
        let mut is_cast = self.try_skip_type(0) && self.check(TokenKind::RightParen);
        if is_cast {
            let bare_name =
                first == TokenKind::Identifier && self.previous().kind == TokenKind::Identifier;
            self.advance();
            let next = self.peek().kind;
            let ambiguous = matches!(next, TokenKind::Plus | TokenKind::Minus | TokenKind::Less);
            is_cast = Self::starts_operand(next) && !(bare_name && ambiguous);
        }
        self.position = saved;
        trace!(is_cast, "classified parenthesized expression");
        is_cast
    }

    /// Whether `kind` can begin a prefix-level operand.
    pub(super) fn starts_operand(kind: TokenKind) -> bool {
        use TokenKind::*;
        kind.is_literal()
            || kind.is_value_type()
            || kind.is_builtin_reference_type()
            || matches!(
                kind,
                Identifier | LeftParen | LeftBracket | LeftBrace | Less | Plus | Minus | Bang
            )
    }

    /// Skip past a type name without building anything.
    fn try_skip_type(&mut self, depth: usize) -> bool {
        if depth > self.options.max_depth {
            return false;
        }
        let kind = self.peek().kind;
        match kind {
            TokenKind::Any => {
                self.advance();
            }
            k if k.is_value_type() => {
                self.advance();
            }
            TokenKind::Identifier => {
                self.advance();
                if self.check(TokenKind::Colon) && self.check_nth(1, TokenKind::Identifier) {
                    self.advance();
                    self.advance();
                }
            }
            TokenKind::Map => {
                self.advance();
                if self.eat(TokenKind::Less).is_some()
                    && !(self.try_skip_type(depth + 1) && self.eat(TokenKind::Greater).is_some())
                {
                    return false;
                }
            }
            TokenKind::Xml | TokenKind::XmlDocument | TokenKind::Json => {
                self.advance();
                if self.eat(TokenKind::Less).is_some() && !self.try_skip_type_constraint(kind) {
                    return false;
                }
            }
            TokenKind::Message | TokenKind::Datatable => {
                self.advance();
            }
            _ => return false,
        }

        while self.check(TokenKind::LeftBracket) && self.check_nth(1, TokenKind::RightBracket) {
            self.advance();
            self.advance();
        }
        true
    }

    /// Skip `{"ns"}local>` or `{"schema"}>` after the `<` of a constrained type.
    fn try_skip_type_constraint(&mut self, kind: TokenKind) -> bool {
        let mut has_braces = false;
        if self.eat(TokenKind::LeftBrace).is_some() {
            if self.eat(TokenKind::StringLiteral).is_none()
                || self.eat(TokenKind::RightBrace).is_none()
            {
                return false;
            }
            has_braces = true;
        }
        if kind == TokenKind::Json {
            if !has_braces {
                return false;
            }
        } else if self.eat(TokenKind::Identifier).is_none() {
            return false;
        }
        self.eat(TokenKind::Greater).is_some()
    }
}
