//! Statement AST nodes.
//!
//! Provides nodes for every statement form, the blocks that hold them, the
//! clauses of compound statements (else-if, catch, join, timeout, ...), and
//! worker declarations.

use crate::ast::decl::NamespaceDecl;
use crate::ast::expr::{ActionInvocationExpr, Expr, FunctionCallExpr, VarRef};
use crate::ast::{Ident, TokenMarker, TypeName};
use crate::lexer::Span;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `T name (= init)?;`
    VarDef(&'ast VarDefStmt<'ast>),
    /// `var? a, b = value;`
    Assign(&'ast AssignStmt<'ast>),
    /// `if (...) { } else if (...) { } else { }`
    If(&'ast IfStmt<'ast>),
    /// `iterate (T x : coll) { }`
    Iterate(&'ast IterateStmt<'ast>),
    /// `while (...) { }`
    While(&'ast WhileStmt<'ast>),
    /// `continue;`
    Continue(Span),
    /// `break;`
    Break(Span),
    /// `fork { workers } join ... timeout ...`
    ForkJoin(&'ast ForkJoinStmt<'ast>),
    /// `try { } catch (...) { } finally { }`
    TryCatch(&'ast TryCatchStmt<'ast>),
    /// `throw e;`
    Throw(&'ast ThrowStmt<'ast>),
    /// `return a, b;`
    Return(&'ast ReturnStmt<'ast>),
    /// `reply m;`
    Reply(&'ast ReplyStmt<'ast>),
    /// `a, b -> w;` or `a -> fork;`
    WorkerSend(&'ast WorkerSendStmt<'ast>),
    /// `a, b <- w;`
    WorkerReceive(&'ast WorkerReceiveStmt<'ast>),
    /// `// text`
    Comment(CommentStmt<'ast>),
    /// `conn.action(args);`
    ActionInvocation(&'ast ActionInvocationExpr<'ast>),
    /// `pkg:fn(args);`
    FunctionInvocation(&'ast FunctionCallExpr<'ast>),
    /// `transform { ... }`
    Transform(&'ast TransformStmt<'ast>),
    /// `transaction { } aborted { } committed { }`
    Transaction(&'ast TransactionStmt<'ast>),
    /// `abort;`
    Abort(Span),
    /// `xmlns "uri" as p;`
    Namespace(&'ast NamespaceDecl<'ast>),
    /// Tokens skipped by error recovery.
    Error(Span),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::VarDef(s) => s.span,
            Self::Assign(s) => s.span,
            Self::If(s) => s.span,
            Self::Iterate(s) => s.span,
            Self::While(s) => s.span,
            Self::Continue(span) | Self::Break(span) | Self::Abort(span) | Self::Error(span) => {
                *span
            }
            Self::ForkJoin(s) => s.span,
            Self::TryCatch(s) => s.span,
            Self::Throw(s) => s.span,
            Self::Return(s) => s.span,
            Self::Reply(s) => s.span,
            Self::WorkerSend(s) => s.span,
            Self::WorkerReceive(s) => s.span,
            Self::Comment(s) => s.span,
            Self::ActionInvocation(s) => s.span,
            Self::FunctionInvocation(s) => s.span,
            Self::Transform(s) => s.span,
            Self::Transaction(s) => s.span,
            Self::Namespace(s) => s.span,
        }
    }

    /// Whether this is a recovery placeholder.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A `{ statement* }` block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    /// The closing brace, synthetic when recovery assumed it.
    pub close: TokenMarker,
    pub span: Span,
}

/// The body of a resource, function, action or worker:
/// `{ statement* worker* }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallableBody<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub workers: &'ast [WorkerDecl<'ast>],
    pub close: TokenMarker,
    pub span: Span,
}

/// `worker name { statement* worker* }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerDecl<'ast> {
    pub name: Ident<'ast>,
    pub body: CallableBody<'ast>,
    pub span: Span,
}

/// Variable definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDefStmt<'ast> {
    pub ty: TypeName<'ast>,
    pub name: Ident<'ast>,
    /// Expression, `create` connector init, or action invocation.
    pub init: Option<Expr<'ast>>,
    pub span: Span,
}

/// Assignment to one or more variable references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    /// Leading `var` keyword (declare-and-assign).
    pub declare: bool,
    pub targets: &'ast [&'ast VarRef<'ast>],
    /// Expression, `create` connector init, or action invocation.
    pub value: Expr<'ast>,
    pub span: Span,
}

/// If statement with its else-if chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: Expr<'ast>,
    pub then_block: Block<'ast>,
    pub else_ifs: &'ast [ElseIfClause<'ast>],
    pub else_block: Option<Block<'ast>>,
    pub span: Span,
}

/// `else if (condition) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElseIfClause<'ast> {
    pub condition: Expr<'ast>,
    pub block: Block<'ast>,
    pub span: Span,
}

/// `iterate (T name : collection) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterateStmt<'ast> {
    pub var_type: TypeName<'ast>,
    pub var_name: Ident<'ast>,
    pub collection: Expr<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// `while (condition) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: Expr<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// `fork { worker* } join? timeout?`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForkJoinStmt<'ast> {
    pub workers: &'ast [WorkerDecl<'ast>],
    pub join: Option<JoinClause<'ast>>,
    pub timeout: Option<TimeoutClause<'ast>>,
    pub span: Span,
}

/// `join (condition)? (T name) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinClause<'ast> {
    pub condition: Option<JoinCondition<'ast>>,
    pub binding_type: TypeName<'ast>,
    pub binding_name: Ident<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// Which workers a join waits for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoinCondition<'ast> {
    /// `some N w1, w2` (also written `any N ...`): the first `count` to finish.
    Any {
        count: u32,
        workers: &'ast [Ident<'ast>],
        span: Span,
    },
    /// `all w1, w2`: every listed worker, or every worker when none are listed.
    All {
        workers: &'ast [Ident<'ast>],
        span: Span,
    },
}

impl<'ast> JoinCondition<'ast> {
    pub fn workers(&self) -> &'ast [Ident<'ast>] {
        match *self {
            JoinCondition::Any { workers, .. } | JoinCondition::All { workers, .. } => workers,
        }
    }

    pub fn span(&self) -> Span {
        match *self {
            JoinCondition::Any { span, .. } | JoinCondition::All { span, .. } => span,
        }
    }
}

/// `timeout (expr) (T name) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeoutClause<'ast> {
    pub timeout: Expr<'ast>,
    pub binding_type: TypeName<'ast>,
    pub binding_name: Ident<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// `try { } catch (T e) { }* finally { }?`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TryCatchStmt<'ast> {
    pub body: Block<'ast>,
    pub catches: &'ast [CatchClause<'ast>],
    pub finally: Option<Block<'ast>>,
    pub span: Span,
}

/// `catch (T name) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchClause<'ast> {
    pub error_type: TypeName<'ast>,
    pub error_name: Ident<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

/// `throw expr;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowStmt<'ast> {
    pub value: Expr<'ast>,
    pub span: Span,
}

/// `return expr, ...;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub values: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `reply expr;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplyStmt<'ast> {
    pub value: Expr<'ast>,
    pub span: Span,
}

/// Destination of a worker send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkerTarget<'ast> {
    /// A named worker.
    Worker(Ident<'ast>),
    /// The enclosing fork.
    Fork(Span),
}

/// `exprs -> target;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerSendStmt<'ast> {
    pub values: &'ast [Expr<'ast>],
    pub target: WorkerTarget<'ast>,
    pub span: Span,
}

/// `refs <- worker;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerReceiveStmt<'ast> {
    pub targets: &'ast [Expr<'ast>],
    pub worker: Ident<'ast>,
    pub span: Span,
}

/// A line comment in statement position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommentStmt<'ast> {
    /// Comment text including the leading `//`.
    pub text: &'ast str,
    pub span: Span,
}

/// `transform { ... }`
///
/// The body only holds assignments, variable definitions with an
/// initializer, nested transforms and comments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformStmt<'ast> {
    pub body: Block<'ast>,
    pub span: Span,
}

/// `transaction { } (aborted { })? (committed { })?` in either handler order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionStmt<'ast> {
    pub body: Block<'ast>,
    pub aborted: Option<Block<'ast>>,
    pub committed: Option<Block<'ast>>,
    pub span: Span,
}
