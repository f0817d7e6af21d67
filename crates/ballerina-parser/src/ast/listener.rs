//! Enter/exit listener over a parsed tree.
//!
//! A [`Listener`] receives an `enter_*` call before a node's children are
//! walked and the matching `exit_*` call after. [`ListenerWalker`] drives it
//! by adapting the listener to a [`Visitor`], so the traversal order is
//! exactly the one defined by the `walk_*` functions.
//!
//! # Example
//!
//! ```
//! use ballerina_parser::ast::listener::{Listener, ListenerWalker};
//! use ballerina_parser::ast::WorkerDecl;
//! use ballerina_parser::Parser;
//! use bumpalo::Bump;
//!
//! #[derive(Default)]
//! struct WorkerDepth {
//!     current: usize,
//!     max: usize,
//! }
//!
//! impl Listener for WorkerDepth {
//!     fn enter_worker(&mut self, _worker: &WorkerDecl) {
//!         self.current += 1;
//!         self.max = self.max.max(self.current);
//!     }
//!
//!     fn exit_worker(&mut self, _worker: &WorkerDecl) {
//!         self.current -= 1;
//!     }
//! }
//!
//! let arena = Bump::new();
//! let unit = Parser::parse("function f() { worker a { worker b { } } }", &arena).unwrap();
//!
//! let mut depth = WorkerDepth::default();
//! ListenerWalker::walk(&mut depth, &unit);
//! assert_eq!(depth.max, 2);
//! ```

use crate::ast::decl::*;
use crate::ast::expr::{Expr, VarRef};
use crate::ast::stmt::{Block, CallableBody, CommentStmt, Stmt, WorkerDecl};
use crate::ast::types::TypeName;
use crate::ast::visitor::*;

/// Callbacks fired on the way into and out of each rule.
///
/// All methods default to doing nothing.
#[allow(unused_variables)]
pub trait Listener {
    fn enter_compilation_unit(&mut self, unit: &CompilationUnit) {}
    fn exit_compilation_unit(&mut self, unit: &CompilationUnit) {}

    fn enter_package(&mut self, package: &PackageDecl) {}
    fn exit_package(&mut self, package: &PackageDecl) {}

    fn enter_import(&mut self, import: &ImportDecl) {}
    fn exit_import(&mut self, import: &ImportDecl) {}

    /// Called for namespace declarations at top level and in statement position.
    fn enter_namespace(&mut self, namespace: &NamespaceDecl) {}
    fn exit_namespace(&mut self, namespace: &NamespaceDecl) {}

    fn enter_service(&mut self, service: &ServiceDef) {}
    fn exit_service(&mut self, service: &ServiceDef) {}

    fn enter_resource(&mut self, resource: &ResourceDef) {}
    fn exit_resource(&mut self, resource: &ResourceDef) {}

    fn enter_function(&mut self, function: &FunctionDef) {}
    fn exit_function(&mut self, function: &FunctionDef) {}

    fn enter_connector(&mut self, connector: &ConnectorDef) {}
    fn exit_connector(&mut self, connector: &ConnectorDef) {}

    fn enter_action(&mut self, action: &ActionDef) {}
    fn exit_action(&mut self, action: &ActionDef) {}

    fn enter_struct(&mut self, struct_def: &StructDef) {}
    fn exit_struct(&mut self, struct_def: &StructDef) {}

    fn enter_annotation_def(&mut self, annotation: &AnnotationDef) {}
    fn exit_annotation_def(&mut self, annotation: &AnnotationDef) {}

    fn enter_type_mapper(&mut self, mapper: &TypeMapperDef) {}
    fn exit_type_mapper(&mut self, mapper: &TypeMapperDef) {}

    fn enter_constant(&mut self, constant: &ConstantDef) {}
    fn exit_constant(&mut self, constant: &ConstantDef) {}

    fn enter_global_var(&mut self, var: &GlobalVarDef) {}
    fn exit_global_var(&mut self, var: &GlobalVarDef) {}

    fn enter_annotation_attachment(&mut self, attachment: &AnnotationAttachment) {}
    fn exit_annotation_attachment(&mut self, attachment: &AnnotationAttachment) {}

    fn enter_parameter(&mut self, param: &Param) {}
    fn exit_parameter(&mut self, param: &Param) {}

    fn enter_callable_body(&mut self, body: &CallableBody) {}
    fn exit_callable_body(&mut self, body: &CallableBody) {}

    fn enter_worker(&mut self, worker: &WorkerDecl) {}
    fn exit_worker(&mut self, worker: &WorkerDecl) {}

    fn enter_block(&mut self, block: &Block) {}
    fn exit_block(&mut self, block: &Block) {}

    fn enter_statement(&mut self, stmt: &Stmt) {}
    fn exit_statement(&mut self, stmt: &Stmt) {}

    fn enter_comment(&mut self, comment: &CommentStmt) {}
    fn exit_comment(&mut self, comment: &CommentStmt) {}

    fn enter_expression(&mut self, expr: &Expr) {}
    fn exit_expression(&mut self, expr: &Expr) {}

    fn enter_variable_reference(&mut self, var_ref: &VarRef) {}
    fn exit_variable_reference(&mut self, var_ref: &VarRef) {}

    fn enter_type_name(&mut self, ty: &TypeName) {}
    fn exit_type_name(&mut self, ty: &TypeName) {}
}

/// Drives a [`Listener`] through a tree.
pub struct ListenerWalker<'l, L: Listener> {
    listener: &'l mut L,
}

impl<'l, L: Listener> ListenerWalker<'l, L> {
    pub fn new(listener: &'l mut L) -> Self {
        Self { listener }
    }

    /// Walk a whole compilation unit.
    pub fn walk(listener: &'l mut L, unit: &CompilationUnit) {
        ListenerWalker::new(listener).visit_compilation_unit(unit);
    }
}

impl<L: Listener> Visitor for ListenerWalker<'_, L> {
    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) {
        self.listener.enter_compilation_unit(unit);
        walk_compilation_unit(self, unit);
        self.listener.exit_compilation_unit(unit);
    }

    fn visit_package_decl(&mut self, package: &PackageDecl) {
        self.listener.enter_package(package);
        self.listener.exit_package(package);
    }

    fn visit_import_decl(&mut self, import: &ImportDecl) {
        self.listener.enter_import(import);
        self.listener.exit_import(import);
    }

    fn visit_namespace_decl(&mut self, namespace: &NamespaceDecl) {
        self.listener.enter_namespace(namespace);
        self.listener.exit_namespace(namespace);
    }

    fn visit_service_def(&mut self, service: &ServiceDef) {
        self.listener.enter_service(service);
        walk_service_def(self, service);
        self.listener.exit_service(service);
    }

    fn visit_resource_def(&mut self, resource: &ResourceDef) {
        self.listener.enter_resource(resource);
        walk_resource_def(self, resource);
        self.listener.exit_resource(resource);
    }

    fn visit_function_def(&mut self, function: &FunctionDef) {
        self.listener.enter_function(function);
        walk_function_def(self, function);
        self.listener.exit_function(function);
    }

    fn visit_connector_def(&mut self, connector: &ConnectorDef) {
        self.listener.enter_connector(connector);
        walk_connector_def(self, connector);
        self.listener.exit_connector(connector);
    }

    fn visit_action_def(&mut self, action: &ActionDef) {
        self.listener.enter_action(action);
        walk_action_def(self, action);
        self.listener.exit_action(action);
    }

    fn visit_struct_def(&mut self, struct_def: &StructDef) {
        self.listener.enter_struct(struct_def);
        walk_struct_def(self, struct_def);
        self.listener.exit_struct(struct_def);
    }

    fn visit_annotation_def(&mut self, annotation: &AnnotationDef) {
        self.listener.enter_annotation_def(annotation);
        walk_annotation_def(self, annotation);
        self.listener.exit_annotation_def(annotation);
    }

    fn visit_type_mapper_def(&mut self, mapper: &TypeMapperDef) {
        self.listener.enter_type_mapper(mapper);
        walk_type_mapper_def(self, mapper);
        self.listener.exit_type_mapper(mapper);
    }

    fn visit_constant_def(&mut self, constant: &ConstantDef) {
        self.listener.enter_constant(constant);
        walk_constant_def(self, constant);
        self.listener.exit_constant(constant);
    }

    fn visit_global_var_def(&mut self, var: &GlobalVarDef) {
        self.listener.enter_global_var(var);
        walk_global_var_def(self, var);
        self.listener.exit_global_var(var);
    }

    fn visit_annotation_attachment(&mut self, attachment: &AnnotationAttachment) {
        self.listener.enter_annotation_attachment(attachment);
        walk_annotation_attachment(self, attachment);
        self.listener.exit_annotation_attachment(attachment);
    }

    fn visit_param(&mut self, param: &Param) {
        self.listener.enter_parameter(param);
        walk_param(self, param);
        self.listener.exit_parameter(param);
    }

    fn visit_callable_body(&mut self, body: &CallableBody) {
        self.listener.enter_callable_body(body);
        walk_callable_body(self, body);
        self.listener.exit_callable_body(body);
    }

    fn visit_worker_decl(&mut self, worker: &WorkerDecl) {
        self.listener.enter_worker(worker);
        walk_worker_decl(self, worker);
        self.listener.exit_worker(worker);
    }

    fn visit_block(&mut self, block: &Block) {
        self.listener.enter_block(block);
        walk_block(self, block);
        self.listener.exit_block(block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.listener.enter_statement(stmt);
        walk_stmt(self, stmt);
        self.listener.exit_statement(stmt);
    }

    fn visit_comment_stmt(&mut self, comment: &CommentStmt) {
        self.listener.enter_comment(comment);
        self.listener.exit_comment(comment);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.listener.enter_expression(expr);
        walk_expr(self, expr);
        self.listener.exit_expression(expr);
    }

    fn visit_var_ref(&mut self, var_ref: &VarRef) {
        self.listener.enter_variable_reference(var_ref);
        walk_var_ref(self, var_ref);
        self.listener.exit_variable_reference(var_ref);
    }

    fn visit_type_name(&mut self, ty: &TypeName) {
        self.listener.enter_type_name(ty);
        walk_type_name(self, ty);
        self.listener.exit_type_name(ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Parser;
    use bumpalo::Bump;

    #[derive(Default)]
    struct Trace {
        events: Vec<&'static str>,
    }

    impl Listener for Trace {
        fn enter_compilation_unit(&mut self, _unit: &CompilationUnit) {
            self.events.push("enter unit");
        }
        fn exit_compilation_unit(&mut self, _unit: &CompilationUnit) {
            self.events.push("exit unit");
        }
        fn enter_function(&mut self, _function: &FunctionDef) {
            self.events.push("enter function");
        }
        fn exit_function(&mut self, _function: &FunctionDef) {
            self.events.push("exit function");
        }
        fn enter_callable_body(&mut self, _body: &CallableBody) {
            self.events.push("enter body");
        }
        fn exit_callable_body(&mut self, _body: &CallableBody) {
            self.events.push("exit body");
        }
        fn enter_statement(&mut self, _stmt: &Stmt) {
            self.events.push("enter stmt");
        }
        fn exit_statement(&mut self, _stmt: &Stmt) {
            self.events.push("exit stmt");
        }
        fn enter_expression(&mut self, _expr: &Expr) {
            self.events.push("enter expr");
        }
        fn exit_expression(&mut self, _expr: &Expr) {
            self.events.push("exit expr");
        }
        fn enter_block(&mut self, _block: &Block) {
            self.events.push("enter block");
        }
        fn exit_block(&mut self, _block: &Block) {
            self.events.push("exit block");
        }
    }

    #[test]
    fn enter_and_exit_are_nested() {
        let arena = Bump::new();
        let unit = Parser::parse("function f() { if (x) { } }", &arena).unwrap();

        let mut trace = Trace::default();
        ListenerWalker::walk(&mut trace, &unit);
        assert_eq!(
            trace.events,
            vec![
                "enter unit",
                "enter function",
                "enter body",
                "enter stmt",
                "enter expr",
                "exit expr",
                "enter block",
                "exit block",
                "exit stmt",
                "exit body",
                "exit function",
                "exit unit",
            ]
        );
    }

    #[test]
    fn header_and_parameters() {
        #[derive(Default)]
        struct Header {
            imports: Vec<String>,
            namespaces: usize,
            params: Vec<String>,
        }

        impl Listener for Header {
            fn enter_import(&mut self, import: &ImportDecl) {
                self.imports.push(import.package.to_string());
            }
            fn enter_namespace(&mut self, _namespace: &NamespaceDecl) {
                self.namespaces += 1;
            }
            fn enter_parameter(&mut self, param: &Param) {
                self.params.push(param.name.name.to_string());
            }
        }

        let arena = Bump::new();
        let source = r#"
            import ballerina.net.http;
            xmlns "urn:a" as a;
            function f(int x, string y) {
                xmlns "urn:b" as b;
            }
        "#;
        let unit = Parser::parse(source, &arena).unwrap();

        let mut header = Header::default();
        ListenerWalker::walk(&mut header, &unit);
        assert_eq!(header.imports, vec!["ballerina.net.http"]);
        assert_eq!(header.namespaces, 2);
        assert_eq!(header.params, vec!["x", "y"]);
    }

    #[test]
    fn balanced_on_recovered_tree() {
        #[derive(Default)]
        struct Balance {
            depth: isize,
            min: isize,
        }

        impl Listener for Balance {
            fn enter_statement(&mut self, _stmt: &Stmt) {
                self.depth += 1;
            }
            fn exit_statement(&mut self, _stmt: &Stmt) {
                self.depth -= 1;
                self.min = self.min.min(self.depth);
            }
        }

        let arena = Bump::new();
        let (unit, errors) =
            Parser::parse_lenient("function f() { x = ; while (y { z = 1; } }", &arena);
        assert!(!errors.is_empty());

        let mut balance = Balance::default();
        ListenerWalker::walk(&mut balance, &unit);
        assert_eq!(balance.depth, 0);
        assert_eq!(balance.min, 0);
    }
}
