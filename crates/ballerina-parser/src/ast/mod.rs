//! Abstract Syntax Tree (AST) for Ballerina.
//!
//! This module provides:
//! - AST node definitions for every Ballerina construct
//! - Parser for transforming tokens into AST
//! - Visitor and listener interfaces for AST traversal
//!
//! # Example
//!
//! ```
//! use ballerina_parser::ast::Item;
//! use ballerina_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     import ballerina.net.http;
//!
//!     @http:BasePath {value: "/echo"}
//!     service<http> echo {
//!         resource echo(message m) {
//!             reply m;
//!         }
//!     }
//! "#;
//!
//! let unit = Parser::parse(source, &arena).unwrap();
//! assert_eq!(unit.imports().count(), 1);
//! assert!(matches!(unit.items()[0], Item::Service(_)));
//! ```

// Core types
pub mod node;
pub mod ops;

mod parser;
mod type_parser;
pub mod types;

pub mod expr;
mod expr_parser;

pub mod stmt;
mod stmt_parser;

pub mod decl;
mod decl_parser;

pub mod listener;
pub mod visitor;

// Re-export error types from core
pub use ballerina_core::{ParseError, ParseErrorKind, ParseErrors, Recovery, Severity};

pub use decl::*;
pub use expr::*;
pub use node::*;
pub use ops::*;
pub use parser::{ParseOptions, Parser};
pub use stmt::*;
pub use types::*;
