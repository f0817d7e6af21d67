// tests/test_harness.rs
//! Test harness infrastructure for Ballerina parser integration tests
//!
//! This module provides utilities for loading `.bal` fixtures, validating
//! parse results, and counting AST nodes.

#![allow(dead_code)]

use ballerina::ast::visitor::*;
use ballerina::ast::*;
use ballerina::{ParseErrors, Span, parse_lenient};
use bumpalo::Bump;
use std::fs;
use std::path::PathBuf;

/// Test harness for loading Ballerina files
pub struct TestHarness {
    test_scripts_dir: PathBuf,
}

impl TestHarness {
    /// Create a new test harness
    pub fn new() -> Self {
        let test_scripts_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_scripts");
        Self { test_scripts_dir }
    }

    /// Load a fixture file
    pub fn load(&self, filename: &str) -> Fixture {
        let path = self.test_scripts_dir.join(filename);
        let source = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        Fixture {
            source,
            arena: Bump::new(),
        }
    }
}

/// A loaded source file together with the arena its tree lives in.
pub struct Fixture {
    pub source: String,
    arena: Bump,
}

impl Fixture {
    /// Parse leniently, keeping every diagnostic.
    pub fn parse(&self) -> TestResult<'_> {
        let (unit, errors) = parse_lenient(&self.source, &self.arena);
        TestResult {
            unit,
            errors,
            source: &self.source,
        }
    }
}

/// Parsed tree and any errors
pub struct TestResult<'a> {
    pub unit: CompilationUnit<'a>,
    pub errors: ParseErrors,
    pub source: &'a str,
}

impl<'a> TestResult<'a> {
    /// Assert that parsing succeeded with no errors
    pub fn assert_success(&self) {
        if !self.errors.is_empty() {
            eprintln!("Source:\n{}", self.source);
            eprintln!("\nErrors:");
            for err in self.errors.iter() {
                eprintln!("{}", err.display_with_source(self.source));
            }
            panic!(
                "Expected successful parse, but got {} errors",
                self.errors.len()
            );
        }
    }

    pub fn functions(&self) -> Vec<&'a FunctionDef<'a>> {
        self.unit
            .items()
            .iter()
            .filter_map(|item| match item {
                Item::Function(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    pub fn services(&self) -> Vec<&'a ServiceDef<'a>> {
        self.unit
            .items()
            .iter()
            .filter_map(|item| match item {
                Item::Service(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn connectors(&self) -> Vec<&'a ConnectorDef<'a>> {
        self.unit
            .items()
            .iter()
            .filter_map(|item| match item {
                Item::Connector(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Names of all named items, in source order
    pub fn item_names(&self) -> Vec<&'a str> {
        self.unit
            .items()
            .iter()
            .filter_map(|item| item.name().map(|n| n.name))
            .collect()
    }

    pub fn count(&self) -> AstCounter {
        let mut counter = AstCounter::default();
        counter.visit_compilation_unit(&self.unit);
        counter
    }
}

/// Helper for counting AST nodes
#[derive(Debug, Default)]
pub struct AstCounter {
    pub function_count: usize,
    pub resource_count: usize,
    pub action_count: usize,
    pub worker_count: usize,
    pub stmt_count: usize,
    pub if_count: usize,
    pub loop_count: usize,
    pub fork_count: usize,
    pub binary_expr_count: usize,
    pub call_count: usize,
    pub action_invocation_count: usize,
    pub annotation_count: usize,
    pub error_count: usize,
}

impl Visitor for AstCounter {
    fn visit_function_def(&mut self, function: &FunctionDef) {
        self.function_count += 1;
        walk_function_def(self, function);
    }

    fn visit_resource_def(&mut self, resource: &ResourceDef) {
        self.resource_count += 1;
        walk_resource_def(self, resource);
    }

    fn visit_action_def(&mut self, action: &ActionDef) {
        self.action_count += 1;
        walk_action_def(self, action);
    }

    fn visit_worker_decl(&mut self, worker: &WorkerDecl) {
        self.worker_count += 1;
        walk_worker_decl(self, worker);
    }

    fn visit_annotation_attachment(&mut self, attachment: &AnnotationAttachment) {
        self.annotation_count += 1;
        walk_annotation_attachment(self, attachment);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.stmt_count += 1;
        match stmt {
            Stmt::If(_) => self.if_count += 1,
            Stmt::Iterate(_) | Stmt::While(_) => self.loop_count += 1,
            Stmt::ForkJoin(_) => self.fork_count += 1,
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_binary(&mut self, expr: &BinaryExpr) {
        self.binary_expr_count += 1;
        walk_binary(self, expr);
    }

    fn visit_function_call(&mut self, call: &FunctionCallExpr) {
        self.call_count += 1;
        walk_function_call(self, call);
    }

    fn visit_action_invocation(&mut self, action: &ActionInvocationExpr) {
        self.action_invocation_count += 1;
        walk_action_invocation(self, action);
    }

    fn visit_error_item(&mut self, _span: Span) {
        self.error_count += 1;
    }

    fn visit_error_stmt(&mut self, _span: Span) {
        self.error_count += 1;
    }
}
