//! Ballerina Parser crate.
//!
//! This crate provides the lexer and parser for Ballerina source code.
//! It includes:
//! - Lexical analysis (tokenization) behind the [`TokenSource`] trait
//! - Abstract Syntax Tree (AST) definitions
//! - Parser with error recovery for transforming tokens into AST
//! - Visitor and listener interfaces for AST traversal
//!
//! # Example
//!
//! ```
//! use ballerina_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     function add(int a, int b) (int) {
//!         return a + b;
//!     }
//! "#;
//!
//! match Parser::parse(source, &arena) {
//!     Ok(unit) => println!("Parsed successfully: {} items", unit.items().len()),
//!     Err(errors) => eprintln!("Parse errors: {}", errors),
//! }
//! ```

// Lexer module
pub mod lexer;

// AST module
pub mod ast;

// Re-export commonly used types at crate root
pub use ast::{ParseOptions, Parser};
pub use lexer::{Lexer, Span, Token, TokenKind, TokenSource};
