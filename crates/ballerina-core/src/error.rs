//! Diagnostics reported while lexing and parsing.
//!
//! ```text
//! LexError     scanner problem, lifted into a ParseError of kind Lexical
//! ParseError   one diagnostic: kind, severity, span, message, recovery
//! ParseErrors  every diagnostic of a compilation unit, in report order
//! ```
//!
//! The parser keeps going after a problem. Grammar rules return
//! `Result<T, ParseError>`; recovery points move the error into the unit's
//! [`ParseErrors`] and resynchronize.
//!
//! ```
//! use ballerina_core::{ParseError, ParseErrors, Span};
//!
//! let mut errors = ParseErrors::new();
//! errors.push(ParseError::expected_token(Span::new(4, 5, 1, 5), "';'", "'}'"));
//! assert_eq!(errors.len(), 1);
//! assert!(errors.has_errors());
//! ```

use std::fmt;

use thiserror::Error;

use crate::Span;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("stray character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    #[error("string literal not closed before end of line at {span}")]
    UnterminatedString { span: Span },

    #[error("backtick template not closed at {span}")]
    UnterminatedTemplate { span: Span },

    #[error("block comment not closed at {span}")]
    UnterminatedComment { span: Span },

    #[error("malformed numeric literal at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },

    /// Recoverable: the string token is still produced.
    #[error("'\\{ch}' is not a recognised escape (at {span})")]
    UnknownEscape { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedTemplate { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidNumber { span, .. }
            | LexError::UnknownEscape { span, .. } => *span,
        }
    }

    pub fn severity(&self) -> Severity {
        if matches!(self, LexError::UnknownEscape { .. }) {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// What the parser did to get past a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recovery {
    /// Nothing consumed; the caller picked up at the same token.
    SingleToken,
    /// Parsing continued as if this token had been present.
    InsertedMissing(&'static str),
    /// `tokens` tokens were thrown away to reach a sync point.
    Skipped { tokens: u32 },
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Recovery::SingleToken => f.write_str("resumed at the current token"),
            Recovery::InsertedMissing(token) => write!(f, "assumed missing {token}"),
            Recovery::Skipped { tokens } => {
                let plural = if tokens == 1 { "" } else { "s" };
                write!(f, "skipped {tokens} token{plural}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    ExpectedToken,
    UnexpectedToken,
    UnexpectedEof,
    /// Forwarded from the token source.
    Lexical,

    ExpectedExpression,
    /// e.g. a `some N` join count that does not fit.
    InvalidLiteral,
    /// Left of `=` or `<-` is not a variable reference.
    InvalidAssignmentTarget,
    ExpectedType,

    ExpectedStatement,
    /// Second `catch`, `aborted` or `committed` where one is allowed.
    DuplicateClause,
    /// e.g. `try` with no `catch`, `fork` with no `join`.
    MissingClause,

    ExpectedDefinition,
    /// Inside a service, connector, struct or annotation body.
    ExpectedMember,
    ExpectedIdentifier,

    NestingTooDeep,
    TooManyErrors,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        use ParseErrorKind::*;
        match self {
            ExpectedToken => "missing token",
            UnexpectedToken => "unexpected token",
            UnexpectedEof => "premature end of input",
            Lexical => "lexical error",
            ExpectedExpression => "missing expression",
            InvalidLiteral => "invalid literal",
            InvalidAssignmentTarget => "invalid assignment target",
            ExpectedType => "missing type",
            ExpectedStatement => "missing statement",
            DuplicateClause => "duplicate clause",
            MissingClause => "missing clause",
            ExpectedDefinition => "missing definition",
            ExpectedMember => "missing member",
            ExpectedIdentifier => "missing identifier",
            NestingTooDeep => "nesting limit exceeded",
            TooManyErrors => "error limit reached",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub severity: Severity,
    pub span: Span,
    pub message: String,
    /// Filled in once the parser has resynchronized.
    pub recovery: Option<Recovery>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            span,
            message: message.into(),
            recovery: None,
        }
    }

    pub fn with_severity(self, severity: Severity) -> Self {
        Self { severity, ..self }
    }

    pub fn with_recovery(self, recovery: Recovery) -> Self {
        Self {
            recovery: Some(recovery),
            ..self
        }
    }

    fn missing(kind: ParseErrorKind, span: Span, wanted: &str, found: &str) -> Self {
        Self::new(kind, span, format!("expected {wanted}, found {found}"))
    }

    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::missing(ParseErrorKind::ExpectedToken, span, expected, found)
    }

    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::missing(
            ParseErrorKind::ExpectedIdentifier,
            span,
            "identifier",
            found,
        )
    }

    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::missing(
            ParseErrorKind::ExpectedExpression,
            span,
            "expression",
            found,
        )
    }

    pub fn expected_type(span: Span, found: &str) -> Self {
        Self::missing(ParseErrorKind::ExpectedType, span, "type name", found)
    }

    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("{token} is not allowed here"),
        )
    }

    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            "source ended in the middle of a construct",
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Render the diagnostic with the offending line and an underline.
    ///
    /// ```text
    /// error[2:1] missing token: expected ';', found 'int'
    ///    2 | int y = 2;
    ///      | ^~~
    ///      = assumed missing ';'
    /// ```
    pub fn display_with_source(&self, source: &str) -> String {
        use std::fmt::Write;

        let Span { line, col, .. } = self.span;
        let mut out = format!("{}[{line}:{col}] {}", self.severity, self.kind);
        if !self.message.is_empty() {
            let _ = write!(out, ": {}", self.message);
        }
        out.push('\n');

        let text = (line as usize)
            .checked_sub(1)
            .and_then(|index| source.lines().nth(index));
        if let Some(text) = text {
            let gutter = line.to_string().len().max(4);
            let tail = self.span.len().saturating_sub(1) as usize;
            let underline = format!("^{}", "~".repeat(tail));
            let _ = writeln!(out, "{line:>gutter$} | {text}");
            let _ = writeln!(
                out,
                "{:gutter$} | {:pad$}{underline}",
                "",
                "",
                pad = col.saturating_sub(1) as usize
            );
            if let Some(recovery) = self.recovery {
                let _ = writeln!(out, "{:gutter$} = {recovery}", "");
            }
        } else if let Some(recovery) = self.recovery {
            let _ = writeln!(out, "  = {recovery}");
        }
        out
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::Lexical, error.span(), error.to_string())
            .with_severity(error.severity())
    }
}

/// Diagnostics of one compilation unit, in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// No diagnostics of any severity.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// At least one diagnostic is an error; warnings alone do not count.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ParseError::is_error)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    pub fn last_mut(&mut self) -> Option<&mut ParseError> {
        self.errors.last_mut()
    }

    /// Forget diagnostics past `len`; used when a speculative parse is undone.
    pub fn truncate(&mut self, len: usize) {
        self.errors.truncate(len);
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }

    /// `Err` with the first error-severity diagnostic, if there is one.
    pub fn into_result(self) -> Result<(), ParseError> {
        self.errors
            .into_iter()
            .find(ParseError::is_error)
            .map_or(Ok(()), Err)
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        std::iter::once(error).collect()
    }
}

impl FromIterator<ParseError> for ParseErrors {
    fn from_iter<I: IntoIterator<Item = ParseError>>(iter: I) -> Self {
        Self {
            errors: Vec::from_iter(iter),
        }
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for error in &self.errors {
            write!(f, "{sep}{error}")?;
            sep = "\n";
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32, col: u32, len: u32) -> Span {
        Span::new(col - 1, col - 1 + len, line, col)
    }

    #[test]
    fn lex_errors_render_their_location() {
        let err = LexError::UnexpectedChar {
            ch: '#',
            span: at(1, 5, 1),
        };
        assert_eq!(err.to_string(), "stray character '#' at 1:5");
        assert_eq!(err.span(), at(1, 5, 1));
    }

    #[test]
    fn unknown_escape_is_only_a_warning() {
        let lifted = ParseError::from(LexError::UnknownEscape {
            ch: 'q',
            span: at(2, 3, 2),
        });
        assert_eq!(lifted.kind, ParseErrorKind::Lexical);
        assert_eq!(lifted.severity, Severity::Warning);
        assert!(!lifted.is_error());

        let lifted = ParseError::from(LexError::UnterminatedString { span: at(1, 1, 4) });
        assert!(lifted.is_error());
    }

    #[test]
    fn display_joins_kind_span_and_message() {
        let err = ParseError::expected_token(at(1, 10, 3), "';'", "'}'");
        assert_eq!(
            err.to_string(),
            "missing token at 1:10: expected ';', found '}'"
        );
    }

    #[test]
    fn constructors_pick_their_kind() {
        let span = at(5, 20, 5);
        let cases = [
            (ParseError::expected_identifier(span, "'('"), ParseErrorKind::ExpectedIdentifier),
            (ParseError::expected_expression(span, "';'"), ParseErrorKind::ExpectedExpression),
            (ParseError::expected_type(span, "'='"), ParseErrorKind::ExpectedType),
            (ParseError::unexpected_token(span, "'@'"), ParseErrorKind::UnexpectedToken),
            (ParseError::unexpected_eof(span), ParseErrorKind::UnexpectedEof),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind, kind);
            assert_eq!(err.recovery, None);
        }
        assert!(
            ParseError::expected_type(span, "'='")
                .message
                .contains("found '='")
        );
    }

    #[test]
    fn source_rendering_underlines_the_span() {
        let source = "int x = 1\nint y = 2;";
        let err = ParseError::expected_token(Span::new(10, 13, 2, 1), "';'", "'int'")
            .with_recovery(Recovery::InsertedMissing("';'"));
        let rendered = err.display_with_source(source);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            [
                "error[2:1] missing token: expected ';', found 'int'",
                "   2 | int y = 2;",
                "     | ^~~",
                "     = assumed missing ';'",
            ]
        );
    }

    #[test]
    fn rendering_past_the_last_line_keeps_the_header() {
        let err = ParseError::unexpected_eof(Span::new(40, 40, 9, 1))
            .with_severity(Severity::Warning);
        let rendered = err.display_with_source("x");
        assert!(rendered.starts_with("warning[9:1] premature end of input"));
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn warnings_do_not_fail_the_unit() {
        let mut errors = ParseErrors::new();
        assert!(errors.is_empty());

        errors.push(
            ParseError::new(ParseErrorKind::Lexical, at(1, 1, 1), "w")
                .with_severity(Severity::Warning),
        );
        assert!(!errors.has_errors());
        assert_eq!(errors.clone().into_result(), Ok(()));

        errors.push(ParseError::unexpected_token(at(2, 1, 1), "'}'"));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.clone().into_result().map_err(|e| e.kind),
            Err(ParseErrorKind::UnexpectedToken)
        );
        assert_eq!(errors.to_string().lines().count(), 2);

        errors.truncate(1);
        assert_eq!(errors.into_vec().len(), 1);
    }

    #[test]
    fn recovery_notes() {
        let skipped = |tokens| Recovery::Skipped { tokens }.to_string();
        assert_eq!(skipped(1), "skipped 1 token");
        assert_eq!(skipped(3), "skipped 3 tokens");
        assert_eq!(
            Recovery::SingleToken.to_string(),
            "resumed at the current token"
        );
    }
}
