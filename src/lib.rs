//! Syntax analysis for the Ballerina language.
//!
//! This crate is the entry point to the workspace: it re-exports the lexer,
//! the AST and the parser from `ballerina-parser`, the diagnostic types from
//! `ballerina-core`, and offers free-function shortcuts for the common
//! parse calls.
//!
//! # Example
//!
//! ```
//! use ballerina::{ast::Item, parse_lenient};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     service<http> hello {
//!         resource sayHello(message m) {
//!             message response = {};
//!             reply response;
//!         }
//!     }
//!     function broken( {
//! "#;
//!
//! let (unit, errors) = parse_lenient(source, &arena);
//! assert!(matches!(unit.items()[0], Item::Service(_)));
//! for error in errors.iter() {
//!     eprintln!("{}", error.display_with_source(source));
//! }
//! assert!(errors.has_errors());
//! ```

pub use ballerina_core::{
    LexError, ParseError, ParseErrorKind, ParseErrors, Recovery, Severity, Span,
};
pub use ballerina_parser::{Lexer, ParseOptions, Parser, Token, TokenKind, TokenSource, ast, lexer};

use ast::CompilationUnit;
use bumpalo::Bump;

/// Parse a source file, failing if any error diagnostic was recorded.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse<'ast>(source: &str, arena: &'ast Bump) -> Result<CompilationUnit<'ast>, ParseErrors> {
    Parser::parse(source, arena)
}

/// Parse a source file, always returning a tree plus every diagnostic.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_lenient<'ast>(
    source: &str,
    arena: &'ast Bump,
) -> (CompilationUnit<'ast>, ParseErrors) {
    Parser::parse_lenient(source, arena)
}

/// Parse a source file with explicit [`ParseOptions`].
pub fn parse_with_options<'ast>(
    source: &str,
    arena: &'ast Bump,
    options: ParseOptions,
) -> (CompilationUnit<'ast>, ParseErrors) {
    Parser::parse_with_options(source, arena, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_matches_parser() {
        let arena = Bump::new();
        let source = "function f() { int x = 1 + 2; }";
        let unit = parse(source, &arena).unwrap();
        let (lenient, errors) = parse_lenient(source, &arena);
        assert!(errors.is_empty());
        assert_eq!(unit, lenient);
    }

    #[test]
    fn options_reach_the_parser() {
        let arena = Bump::new();
        let source = "function f() { a = ; b = ; c = ; }";
        let options = ParseOptions::default().with_max_errors(1);
        let (_, errors) = parse_with_options(source, &arena, options);
        assert_eq!(errors.len(), 2);
        assert!(
            errors
                .iter()
                .any(|e| e.kind == ParseErrorKind::TooManyErrors)
        );
    }
}
