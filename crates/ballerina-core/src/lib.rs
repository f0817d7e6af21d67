//! Shared primitives for the Ballerina syntax front end.
//!
//! This crate holds the types every later stage agrees on: source
//! [`Span`]s and the diagnostic types produced while lexing and parsing.

pub mod error;
pub mod span;

pub use error::{LexError, ParseError, ParseErrorKind, ParseErrors, Recovery, Severity};
pub use span::Span;
