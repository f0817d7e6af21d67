//! Lexical analysis for Ballerina source text.
//!
//! The parser consumes any [`TokenSource`]; [`Lexer`] is the built-in one.

mod cursor;
mod lexer;
mod token;

pub use ballerina_core::{LexError, Span};
pub use lexer::Lexer;
pub use token::{Token, TokenKind, TokenSource, lookup_keyword};
