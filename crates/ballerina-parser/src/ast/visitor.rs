//! Visitor pattern for traversing the AST.
//!
//! This module provides a `Visitor` trait and corresponding `walk_*` functions
//! that enable traversal and analysis of Ballerina syntax trees.
//!
//! # Example: Counting Resources
//!
//! ```
//! use ballerina_parser::ast::visitor::{Visitor, walk_resource_def};
//! use ballerina_parser::ast::{ResourceDef, CompilationUnit};
//! use ballerina_parser::Parser;
//! use bumpalo::Bump;
//!
//! struct ResourceCounter {
//!     count: usize,
//! }
//!
//! impl Visitor for ResourceCounter {
//!     fn visit_resource_def(&mut self, resource: &ResourceDef) {
//!         self.count += 1;
//!         walk_resource_def(self, resource);
//!     }
//! }
//!
//! let arena = Bump::new();
//! let source = "service<http> s { resource a(message m) { } resource b(message m) { } }";
//! let unit = Parser::parse(source, &arena).unwrap();
//!
//! let mut counter = ResourceCounter { count: 0 };
//! counter.visit_compilation_unit(&unit);
//! assert_eq!(counter.count, 2);
//! ```

use crate::ast::decl::*;
use crate::ast::expr::*;
use crate::ast::stmt::*;
use crate::ast::types::*;
use crate::lexer::Span;

/// Visitor trait for traversing AST nodes.
///
/// Each `visit_*` method corresponds to an AST node type and is called
/// when that node is encountered during traversal. The default implementations
/// call the corresponding `walk_*` function to continue traversal.
///
/// Override any `visit_*` method to customize behavior for specific node types.
pub trait Visitor: Sized {
    // === Compilation Unit and Items ===

    /// Visit a compilation unit (root node).
    fn visit_compilation_unit(&mut self, unit: &CompilationUnit) {
        walk_compilation_unit(self, unit);
    }

    fn visit_package_decl(&mut self, _package: &PackageDecl) {}

    fn visit_import_decl(&mut self, _import: &ImportDecl) {}

    fn visit_namespace_decl(&mut self, _namespace: &NamespaceDecl) {}

    /// Visit a top-level definition.
    fn visit_item(&mut self, item: &Item) {
        walk_item(self, item);
    }

    fn visit_service_def(&mut self, service: &ServiceDef) {
        walk_service_def(self, service);
    }

    fn visit_resource_def(&mut self, resource: &ResourceDef) {
        walk_resource_def(self, resource);
    }

    fn visit_function_def(&mut self, function: &FunctionDef) {
        walk_function_def(self, function);
    }

    fn visit_connector_def(&mut self, connector: &ConnectorDef) {
        walk_connector_def(self, connector);
    }

    fn visit_action_def(&mut self, action: &ActionDef) {
        walk_action_def(self, action);
    }

    fn visit_struct_def(&mut self, struct_def: &StructDef) {
        walk_struct_def(self, struct_def);
    }

    fn visit_annotation_def(&mut self, annotation: &AnnotationDef) {
        walk_annotation_def(self, annotation);
    }

    fn visit_type_mapper_def(&mut self, mapper: &TypeMapperDef) {
        walk_type_mapper_def(self, mapper);
    }

    fn visit_constant_def(&mut self, constant: &ConstantDef) {
        walk_constant_def(self, constant);
    }

    fn visit_global_var_def(&mut self, var: &GlobalVarDef) {
        walk_global_var_def(self, var);
    }

    /// Visit the placeholder left by a skipped definition.
    fn visit_error_item(&mut self, _span: Span) {}

    // === Definition Parts ===

    fn visit_signature(&mut self, signature: &Signature) {
        walk_signature(self, signature);
    }

    fn visit_param(&mut self, param: &Param) {
        walk_param(self, param);
    }

    fn visit_field_def(&mut self, field: &FieldDef) {
        walk_field_def(self, field);
    }

    fn visit_annotation_attachment(&mut self, attachment: &AnnotationAttachment) {
        walk_annotation_attachment(self, attachment);
    }

    fn visit_annotation_value(&mut self, value: &AnnotationValue) {
        walk_annotation_value(self, value);
    }

    // === Bodies ===

    fn visit_callable_body(&mut self, body: &CallableBody) {
        walk_callable_body(self, body);
    }

    fn visit_worker_decl(&mut self, worker: &WorkerDecl) {
        walk_worker_decl(self, worker);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    // === Statements ===

    /// Visit a statement.
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_var_def_stmt(&mut self, stmt: &VarDefStmt) {
        walk_var_def_stmt(self, stmt);
    }

    fn visit_assign_stmt(&mut self, stmt: &AssignStmt) {
        walk_assign_stmt(self, stmt);
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt) {
        walk_if_stmt(self, stmt);
    }

    fn visit_iterate_stmt(&mut self, stmt: &IterateStmt) {
        walk_iterate_stmt(self, stmt);
    }

    fn visit_while_stmt(&mut self, stmt: &WhileStmt) {
        walk_while_stmt(self, stmt);
    }

    fn visit_fork_join_stmt(&mut self, stmt: &ForkJoinStmt) {
        walk_fork_join_stmt(self, stmt);
    }

    fn visit_try_catch_stmt(&mut self, stmt: &TryCatchStmt) {
        walk_try_catch_stmt(self, stmt);
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnStmt) {
        walk_return_stmt(self, stmt);
    }

    fn visit_worker_send_stmt(&mut self, stmt: &WorkerSendStmt) {
        walk_worker_send_stmt(self, stmt);
    }

    fn visit_worker_receive_stmt(&mut self, stmt: &WorkerReceiveStmt) {
        walk_worker_receive_stmt(self, stmt);
    }

    fn visit_transform_stmt(&mut self, stmt: &TransformStmt) {
        walk_transform_stmt(self, stmt);
    }

    fn visit_transaction_stmt(&mut self, stmt: &TransactionStmt) {
        walk_transaction_stmt(self, stmt);
    }

    fn visit_comment_stmt(&mut self, _stmt: &CommentStmt) {}

    /// Visit the placeholder left by a skipped statement.
    fn visit_error_stmt(&mut self, _span: Span) {}

    // === Expressions ===

    /// Visit an expression.
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_literal(&mut self, _literal: &LiteralExpr) {}

    fn visit_var_ref(&mut self, var_ref: &VarRef) {
        walk_var_ref(self, var_ref);
    }

    fn visit_function_call(&mut self, call: &FunctionCallExpr) {
        walk_function_call(self, call);
    }

    fn visit_action_invocation(&mut self, action: &ActionInvocationExpr) {
        walk_action_invocation(self, action);
    }

    fn visit_connector_init(&mut self, init: &ConnectorInitExpr) {
        walk_connector_init(self, init);
    }

    fn visit_binary(&mut self, expr: &BinaryExpr) {
        walk_binary(self, expr);
    }

    fn visit_unary(&mut self, expr: &UnaryExpr) {
        walk_unary(self, expr);
    }

    fn visit_cast(&mut self, expr: &CastExpr) {
        walk_cast(self, expr);
    }

    fn visit_conversion(&mut self, expr: &ConversionExpr) {
        walk_conversion(self, expr);
    }

    // === Types ===

    /// Visit a type name.
    fn visit_type_name(&mut self, ty: &TypeName) {
        walk_type_name(self, ty);
    }
}

// === Walk Functions ===
// These provide default traversal logic for each node type.

/// Walk a compilation unit (root node).
pub fn walk_compilation_unit<V: Visitor>(visitor: &mut V, unit: &CompilationUnit) {
    if let Some(package) = &unit.package {
        visitor.visit_package_decl(package);
    }
    for directive in unit.directives {
        match directive {
            Directive::Import(import) => visitor.visit_import_decl(import),
            Directive::Namespace(namespace) => visitor.visit_namespace_decl(namespace),
        }
    }
    for item in unit.items {
        visitor.visit_item(item);
    }
}

/// Walk a top-level definition.
pub fn walk_item<V: Visitor>(visitor: &mut V, item: &Item) {
    match item {
        Item::Service(service) => visitor.visit_service_def(service),
        Item::Function(function) => visitor.visit_function_def(function),
        Item::Connector(connector) => visitor.visit_connector_def(connector),
        Item::Struct(struct_def) => visitor.visit_struct_def(struct_def),
        Item::TypeMapper(mapper) => visitor.visit_type_mapper_def(mapper),
        Item::Constant(constant) => visitor.visit_constant_def(constant),
        Item::Annotation(annotation) => visitor.visit_annotation_def(annotation),
        Item::GlobalVar(var) => visitor.visit_global_var_def(var),
        Item::Error(span) => visitor.visit_error_item(*span),
    }
}

fn walk_annotations<V: Visitor>(visitor: &mut V, annotations: &[AnnotationAttachment]) {
    for attachment in annotations {
        visitor.visit_annotation_attachment(attachment);
    }
}

pub fn walk_service_def<V: Visitor>(visitor: &mut V, service: &ServiceDef) {
    walk_annotations(visitor, service.annotations);
    for var in service.variables {
        visitor.visit_var_def_stmt(var);
    }
    for resource in service.resources {
        visitor.visit_resource_def(resource);
    }
}

pub fn walk_resource_def<V: Visitor>(visitor: &mut V, resource: &ResourceDef) {
    walk_annotations(visitor, resource.annotations);
    for param in resource.params {
        visitor.visit_param(param);
    }
    visitor.visit_callable_body(&resource.body);
}

pub fn walk_function_def<V: Visitor>(visitor: &mut V, function: &FunctionDef) {
    walk_annotations(visitor, function.annotations);
    visitor.visit_signature(&function.signature);
    if let Some(body) = &function.body {
        visitor.visit_callable_body(body);
    }
}

pub fn walk_connector_def<V: Visitor>(visitor: &mut V, connector: &ConnectorDef) {
    walk_annotations(visitor, connector.annotations);
    for param in connector.params {
        visitor.visit_param(param);
    }
    for var in connector.variables {
        visitor.visit_var_def_stmt(var);
    }
    for action in connector.actions {
        visitor.visit_action_def(action);
    }
}

pub fn walk_action_def<V: Visitor>(visitor: &mut V, action: &ActionDef) {
    walk_annotations(visitor, action.annotations);
    visitor.visit_signature(&action.signature);
    if let Some(body) = &action.body {
        visitor.visit_callable_body(body);
    }
}

pub fn walk_struct_def<V: Visitor>(visitor: &mut V, struct_def: &StructDef) {
    walk_annotations(visitor, struct_def.annotations);
    for field in struct_def.fields {
        visitor.visit_field_def(field);
    }
}

pub fn walk_annotation_def<V: Visitor>(visitor: &mut V, annotation: &AnnotationDef) {
    walk_annotations(visitor, annotation.annotations);
    for field in annotation.fields {
        visitor.visit_field_def(field);
    }
}

pub fn walk_type_mapper_def<V: Visitor>(visitor: &mut V, mapper: &TypeMapperDef) {
    walk_annotations(visitor, mapper.annotations);
    visitor.visit_param(&mapper.param);
    visitor.visit_type_name(&mapper.return_type);
    if let Some(body) = &mapper.body {
        visitor.visit_block(body);
    }
}

pub fn walk_constant_def<V: Visitor>(visitor: &mut V, constant: &ConstantDef) {
    walk_annotations(visitor, constant.annotations);
    visitor.visit_type_name(&constant.ty);
    visitor.visit_expr(&constant.value);
}

pub fn walk_global_var_def<V: Visitor>(visitor: &mut V, var: &GlobalVarDef) {
    walk_annotations(visitor, var.annotations);
    visitor.visit_type_name(&var.ty);
    if let Some(init) = &var.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_signature<V: Visitor>(visitor: &mut V, signature: &Signature) {
    for param in signature.params {
        visitor.visit_param(param);
    }
    match &signature.returns {
        Some(ReturnParams::Named(params)) => {
            for param in *params {
                visitor.visit_param(param);
            }
        }
        Some(ReturnParams::Types(types)) => {
            for ty in *types {
                visitor.visit_type_name(ty);
            }
        }
        None => {}
    }
}

pub fn walk_param<V: Visitor>(visitor: &mut V, param: &Param) {
    walk_annotations(visitor, param.annotations);
    visitor.visit_type_name(&param.ty);
}

pub fn walk_field_def<V: Visitor>(visitor: &mut V, field: &FieldDef) {
    visitor.visit_type_name(&field.ty);
    if let Some(default) = &field.default {
        visitor.visit_literal(default);
    }
}

pub fn walk_annotation_attachment<V: Visitor>(visitor: &mut V, attachment: &AnnotationAttachment) {
    for attribute in attachment.attributes {
        visitor.visit_annotation_value(&attribute.value);
    }
}

pub fn walk_annotation_value<V: Visitor>(visitor: &mut V, value: &AnnotationValue) {
    match value {
        AnnotationValue::Literal(literal) => visitor.visit_literal(literal),
        AnnotationValue::Annotation(attachment) => visitor.visit_annotation_attachment(attachment),
        AnnotationValue::Array { elements, .. } => {
            for element in *elements {
                visitor.visit_annotation_value(element);
            }
        }
    }
}

// === Bodies ===

pub fn walk_callable_body<V: Visitor>(visitor: &mut V, body: &CallableBody) {
    for stmt in body.stmts {
        visitor.visit_stmt(stmt);
    }
    for worker in body.workers {
        visitor.visit_worker_decl(worker);
    }
}

pub fn walk_worker_decl<V: Visitor>(visitor: &mut V, worker: &WorkerDecl) {
    visitor.visit_callable_body(&worker.body);
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    for stmt in block.stmts {
        visitor.visit_stmt(stmt);
    }
}

// === Statements ===

/// Walk a statement, dispatching on its kind.
pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::VarDef(s) => visitor.visit_var_def_stmt(s),
        Stmt::Assign(s) => visitor.visit_assign_stmt(s),
        Stmt::If(s) => visitor.visit_if_stmt(s),
        Stmt::Iterate(s) => visitor.visit_iterate_stmt(s),
        Stmt::While(s) => visitor.visit_while_stmt(s),
        Stmt::Continue(_) | Stmt::Break(_) | Stmt::Abort(_) => {}
        Stmt::ForkJoin(s) => visitor.visit_fork_join_stmt(s),
        Stmt::TryCatch(s) => visitor.visit_try_catch_stmt(s),
        Stmt::Throw(s) => visitor.visit_expr(&s.value),
        Stmt::Return(s) => visitor.visit_return_stmt(s),
        Stmt::Reply(s) => visitor.visit_expr(&s.value),
        Stmt::WorkerSend(s) => visitor.visit_worker_send_stmt(s),
        Stmt::WorkerReceive(s) => visitor.visit_worker_receive_stmt(s),
        Stmt::Comment(s) => visitor.visit_comment_stmt(s),
        Stmt::ActionInvocation(s) => visitor.visit_action_invocation(s),
        Stmt::FunctionInvocation(s) => visitor.visit_function_call(s),
        Stmt::Transform(s) => visitor.visit_transform_stmt(s),
        Stmt::Transaction(s) => visitor.visit_transaction_stmt(s),
        Stmt::Namespace(s) => visitor.visit_namespace_decl(s),
        Stmt::Error(span) => visitor.visit_error_stmt(*span),
    }
}

pub fn walk_var_def_stmt<V: Visitor>(visitor: &mut V, stmt: &VarDefStmt) {
    visitor.visit_type_name(&stmt.ty);
    if let Some(init) = &stmt.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_assign_stmt<V: Visitor>(visitor: &mut V, stmt: &AssignStmt) {
    for target in stmt.targets {
        visitor.visit_var_ref(target);
    }
    visitor.visit_expr(&stmt.value);
}

pub fn walk_if_stmt<V: Visitor>(visitor: &mut V, stmt: &IfStmt) {
    visitor.visit_expr(&stmt.condition);
    visitor.visit_block(&stmt.then_block);
    for clause in stmt.else_ifs {
        visitor.visit_expr(&clause.condition);
        visitor.visit_block(&clause.block);
    }
    if let Some(else_block) = &stmt.else_block {
        visitor.visit_block(else_block);
    }
}

pub fn walk_iterate_stmt<V: Visitor>(visitor: &mut V, stmt: &IterateStmt) {
    visitor.visit_type_name(&stmt.var_type);
    visitor.visit_expr(&stmt.collection);
    visitor.visit_block(&stmt.body);
}

pub fn walk_while_stmt<V: Visitor>(visitor: &mut V, stmt: &WhileStmt) {
    visitor.visit_expr(&stmt.condition);
    visitor.visit_block(&stmt.body);
}

pub fn walk_fork_join_stmt<V: Visitor>(visitor: &mut V, stmt: &ForkJoinStmt) {
    for worker in stmt.workers {
        visitor.visit_worker_decl(worker);
    }
    if let Some(join) = &stmt.join {
        visitor.visit_type_name(&join.binding_type);
        visitor.visit_block(&join.body);
    }
    if let Some(timeout) = &stmt.timeout {
        visitor.visit_expr(&timeout.timeout);
        visitor.visit_type_name(&timeout.binding_type);
        visitor.visit_block(&timeout.body);
    }
}

pub fn walk_try_catch_stmt<V: Visitor>(visitor: &mut V, stmt: &TryCatchStmt) {
    visitor.visit_block(&stmt.body);
    for catch in stmt.catches {
        visitor.visit_type_name(&catch.error_type);
        visitor.visit_block(&catch.body);
    }
    if let Some(finally) = &stmt.finally {
        visitor.visit_block(finally);
    }
}

pub fn walk_return_stmt<V: Visitor>(visitor: &mut V, stmt: &ReturnStmt) {
    for value in stmt.values {
        visitor.visit_expr(value);
    }
}

pub fn walk_worker_send_stmt<V: Visitor>(visitor: &mut V, stmt: &WorkerSendStmt) {
    for value in stmt.values {
        visitor.visit_expr(value);
    }
}

pub fn walk_worker_receive_stmt<V: Visitor>(visitor: &mut V, stmt: &WorkerReceiveStmt) {
    for target in stmt.targets {
        visitor.visit_expr(target);
    }
}

pub fn walk_transform_stmt<V: Visitor>(visitor: &mut V, stmt: &TransformStmt) {
    visitor.visit_block(&stmt.body);
}

pub fn walk_transaction_stmt<V: Visitor>(visitor: &mut V, stmt: &TransactionStmt) {
    visitor.visit_block(&stmt.body);
    if let Some(aborted) = &stmt.aborted {
        visitor.visit_block(aborted);
    }
    if let Some(committed) = &stmt.committed {
        visitor.visit_block(committed);
    }
}

// === Expressions ===

/// Walk an expression, dispatching on its kind.
pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Literal(literal) => visitor.visit_literal(literal),
        Expr::ArrayLiteral(array) => {
            for element in array.elements {
                visitor.visit_expr(element);
            }
        }
        Expr::MapStructLiteral(map) => {
            for entry in map.entries {
                visitor.visit_expr(&entry.key);
                visitor.visit_expr(&entry.value);
            }
        }
        Expr::Template(_) => {}
        Expr::VarRef(var_ref) => visitor.visit_var_ref(var_ref),
        Expr::FunctionCall(call) => visitor.visit_function_call(call),
        Expr::ActionInvocation(action) => visitor.visit_action_invocation(action),
        Expr::ConnectorInit(init) => visitor.visit_connector_init(init),
        Expr::TypeAccess(access) => visitor.visit_type_name(&access.ty),
        Expr::Cast(cast) => visitor.visit_cast(cast),
        Expr::Conversion(conversion) => visitor.visit_conversion(conversion),
        Expr::Unary(unary) => visitor.visit_unary(unary),
        Expr::Binary(binary) => visitor.visit_binary(binary),
        Expr::Paren(paren) => visitor.visit_expr(&paren.expr),
    }
}

/// Walk a reference chain from the outermost suffix inwards.
pub fn walk_var_ref<V: Visitor>(visitor: &mut V, var_ref: &VarRef) {
    match &var_ref.kind {
        VarRefKind::Simple(_) => {}
        VarRefKind::Index { base, index } => {
            visitor.visit_var_ref(base);
            visitor.visit_expr(index);
        }
        VarRefKind::Field { base, .. } => visitor.visit_var_ref(base),
        VarRefKind::XmlAttribute { base, selector } => {
            visitor.visit_var_ref(base);
            if let XmlAttributeSelector::Expr(expr) = selector {
                visitor.visit_expr(expr);
            }
        }
    }
}

pub fn walk_function_call<V: Visitor>(visitor: &mut V, call: &FunctionCallExpr) {
    for arg in call.args {
        visitor.visit_expr(arg);
    }
}

pub fn walk_action_invocation<V: Visitor>(visitor: &mut V, action: &ActionInvocationExpr) {
    for arg in action.args {
        visitor.visit_expr(arg);
    }
}

pub fn walk_connector_init<V: Visitor>(visitor: &mut V, init: &ConnectorInitExpr) {
    for arg in init.args {
        visitor.visit_expr(arg);
    }
}

pub fn walk_binary<V: Visitor>(visitor: &mut V, expr: &BinaryExpr) {
    visitor.visit_expr(&expr.left);
    visitor.visit_expr(&expr.right);
}

pub fn walk_unary<V: Visitor>(visitor: &mut V, expr: &UnaryExpr) {
    visitor.visit_expr(&expr.operand);
}

pub fn walk_cast<V: Visitor>(visitor: &mut V, expr: &CastExpr) {
    visitor.visit_type_name(&expr.target);
    visitor.visit_expr(&expr.operand);
}

pub fn walk_conversion<V: Visitor>(visitor: &mut V, expr: &ConversionExpr) {
    visitor.visit_type_name(&expr.target);
    visitor.visit_expr(&expr.operand);
}

// === Types ===

/// Walk a type name into its array element or map constraint.
pub fn walk_type_name<V: Visitor>(visitor: &mut V, ty: &TypeName) {
    match &ty.kind {
        TypeKind::Array(element) => visitor.visit_type_name(element),
        TypeKind::BuiltIn(BuiltInType::Map(Some(constraint))) => {
            visitor.visit_type_name(constraint)
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Parser;
    use bumpalo::Bump;

    /// Collects every simple name that is read or written.
    struct NameCollector {
        names: Vec<String>,
    }

    impl Visitor for NameCollector {
        fn visit_var_ref(&mut self, var_ref: &VarRef) {
            if let VarRefKind::Simple(name) = var_ref.kind {
                self.names.push(name.to_string());
            }
            walk_var_ref(self, var_ref);
        }
    }

    #[derive(Default)]
    struct Counter {
        functions: usize,
        workers: usize,
        statements: usize,
        errors: usize,
    }

    impl Visitor for Counter {
        fn visit_function_def(&mut self, function: &FunctionDef) {
            self.functions += 1;
            walk_function_def(self, function);
        }

        fn visit_worker_decl(&mut self, worker: &WorkerDecl) {
            self.workers += 1;
            walk_worker_decl(self, worker);
        }

        fn visit_stmt(&mut self, stmt: &Stmt) {
            self.statements += 1;
            walk_stmt(self, stmt);
        }

        fn visit_error_stmt(&mut self, _span: Span) {
            self.errors += 1;
        }
    }

    #[test]
    fn collects_names_in_order() {
        let arena = Bump::new();
        let expr = Parser::expression("a.b[i] + f(c, -d)", &arena).unwrap();

        let mut collector = NameCollector { names: Vec::new() };
        collector.visit_expr(&expr);
        assert_eq!(collector.names, vec!["a", "i", "c", "d"]);
    }

    #[test]
    fn counts_nested_structure() {
        let arena = Bump::new();
        let source = r#"
            function main(string[] args) {
                int x = 1;
                fork {
                    worker w1 { x -> fork; }
                    worker w2 { if (x > 0) { x = 0; } }
                } join (all) (message[] r) { }
                worker w3 { }
            }
            function helper() { return; }
        "#;
        let unit = Parser::parse(source, &arena).unwrap();

        let mut counter = Counter::default();
        counter.visit_compilation_unit(&unit);
        assert_eq!(counter.functions, 2);
        assert_eq!(counter.workers, 3);
        // int x, fork, send, if, assign, return
        assert_eq!(counter.statements, 6);
        assert_eq!(counter.errors, 0);
    }

    #[test]
    fn override_stops_descent() {
        struct SkipBlocks {
            blocks: usize,
            statements: usize,
        }

        impl Visitor for SkipBlocks {
            fn visit_block(&mut self, _block: &Block) {
                self.blocks += 1;
            }

            fn visit_stmt(&mut self, stmt: &Stmt) {
                self.statements += 1;
                walk_stmt(self, stmt);
            }
        }

        let arena = Bump::new();
        let stmt = Parser::statement("while (true) { a = 1; b = 2; }", &arena).unwrap();
        let mut visitor = SkipBlocks {
            blocks: 0,
            statements: 0,
        };
        visitor.visit_stmt(&stmt);
        assert_eq!(visitor.blocks, 1);
        assert_eq!(visitor.statements, 1);
    }

    #[test]
    fn error_placeholders_are_visited() {
        let arena = Bump::new();
        let (unit, _) = Parser::parse_lenient("function f() { x = ; y = 1; }", &arena);

        let mut counter = Counter::default();
        counter.visit_compilation_unit(&unit);
        assert_eq!(counter.errors, 1);
        assert_eq!(counter.statements, 2);
    }
}
