//! Common AST node types used throughout the parser.
//!
//! Provides identifiers, package-qualified name references, dotted package
//! names and the marker left behind for tokens synthesized during recovery.

use crate::lexer::Span;
use std::fmt;

/// An identifier with source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    /// The identifier name (allocated in arena).
    pub name: &'ast str,
    /// Source location.
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A possibly package-qualified name: `name` or `pkg:name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameReference<'ast> {
    /// Package alias before the colon.
    pub package: Option<Ident<'ast>>,
    /// The referenced name.
    pub name: Ident<'ast>,
    /// Source location covering both parts.
    pub span: Span,
}

impl<'ast> NameReference<'ast> {
    /// An unqualified reference.
    pub fn simple(name: Ident<'ast>) -> Self {
        Self {
            package: None,
            name,
            span: name.span,
        }
    }

    /// A `pkg:name` reference.
    pub fn qualified(package: Ident<'ast>, name: Ident<'ast>) -> Self {
        Self {
            package: Some(package),
            name,
            span: package.span.merge(name.span),
        }
    }

    /// Whether a package alias is present.
    pub fn is_qualified(&self) -> bool {
        self.package.is_some()
    }
}

impl fmt::Display for NameReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(package) = self.package {
            write!(f, "{package}:")?;
        }
        write!(f, "{}", self.name)
    }
}

/// A dotted package path such as `ballerina.net.http`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageName<'ast> {
    /// The path segments, at least one.
    pub segments: &'ast [Ident<'ast>],
    /// Source location covering the whole path.
    pub span: Span,
}

impl<'ast> PackageName<'ast> {
    /// The last segment, which is the default import alias.
    pub fn last(&self) -> Option<&'ast Ident<'ast>> {
        self.segments.last()
    }
}

impl fmt::Display for PackageName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// A delimiter or terminator slot.
///
/// When the token was absent and error recovery assumed it, `synthetic` is
/// set and the span is empty, positioned right after the previous token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMarker {
    pub span: Span,
    pub synthetic: bool,
}

impl TokenMarker {
    /// A token that was really present.
    pub fn present(span: Span) -> Self {
        Self {
            span,
            synthetic: false,
        }
    }

    /// A token inserted by error recovery.
    pub fn missing(span: Span) -> Self {
        Self {
            span,
            synthetic: true,
        }
    }

    /// Whether the token was actually in the source.
    pub fn is_present(&self) -> bool {
        !self.synthetic
    }
}
