//! Statement parsing functions for Ballerina.
//!
//! Implements parsing of every statement form, blocks, callable bodies with
//! their workers, and the statement-list loop that recovers from errors.

use super::parser::Parser;
use crate::ast::expr::{Expr, VarRef};
use crate::ast::stmt::*;
use crate::ast::{Ident, ParseError, ParseErrorKind, TypeName};
use crate::lexer::{Span, TokenKind};
use bumpalo::collections::Vec as BVec;
use tracing::trace;

/// What a statement list may contain besides statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    /// `{ statement* }`
    Block,
    /// `{ statement* worker* }`
    Callable,
    /// The restricted body of `transform { }`.
    Transform,
}

impl<'ast> Parser<'ast> {
    /// Parse a statement.
    ///
    /// Keyword statements are dispatched first; the rest is told apart by
    /// lookahead (variable definition, action invocation) and finally by
    /// the token after an expression list (`=`, `->`, `<-`, `;`).
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::Var => self.parse_var_assignment(),
            TokenKind::If => self.parse_if(),
            TokenKind::Iterate => self.parse_iterate(),
            TokenKind::While => self.parse_while(),
            TokenKind::Continue => {
                self.advance();
                self.expect_semicolon()?;
                Ok(Stmt::Continue(self.span_from(token.span)))
            }
            TokenKind::Break => {
                self.advance();
                self.expect_semicolon()?;
                Ok(Stmt::Break(self.span_from(token.span)))
            }
            TokenKind::Abort => {
                self.advance();
                self.expect_semicolon()?;
                Ok(Stmt::Abort(self.span_from(token.span)))
            }
            TokenKind::Fork => self.parse_fork_join(),
            TokenKind::Try => self.parse_try_catch(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Reply => self.parse_reply(),
            TokenKind::Transform => self.parse_transform(),
            TokenKind::Transaction => self.parse_transaction(),
            TokenKind::Xmlns => Ok(Stmt::Namespace(self.parse_namespace_decl()?)),
            _ if self.is_var_def() => {
                let def = self.parse_var_def()?;
                Ok(Stmt::VarDef(self.arena.alloc(def)))
            }
            _ if self.is_action_invocation() => {
                let action = self.parse_action_invocation()?;
                self.expect_semicolon()?;
                Ok(Stmt::ActionInvocation(action))
            }
            _ => self.parse_simple_statement(),
        }
    }

    /// Parse `T name (= initializer)?;`.
    ///
    /// Shared by statement lists and service/connector bodies.
    pub(super) fn parse_var_def(&mut self) -> Result<VarDefStmt<'ast>, ParseError> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let init = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_initializer()?)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(VarDefStmt {
            ty,
            name,
            init,
            span: self.span_from(ty.span),
        })
    }

    /// Parse `var a, b = initializer;`.
    fn parse_var_assignment(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Var)?;
        let mut targets = BVec::new_in(self.arena);
        loop {
            targets.push(self.parse_variable_reference()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Equal)?;
        let value = self.parse_initializer()?;
        self.expect_semicolon()?;
        Ok(Stmt::Assign(self.arena.alloc(AssignStmt {
            declare: true,
            targets: targets.into_bump_slice(),
            value,
            span: self.span_from(start.span),
        })))
    }

    /// Statements that begin with an expression list: assignment, worker
    /// send, worker receive and function invocation.
    fn parse_simple_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let token = *self.peek();
        if !Self::starts_operand(token.kind) {
            return Err(Self::not_a_statement(token.kind, token.span));
        }

        let exprs = self.parse_expression_list()?;
        let first = exprs[0].span();

        match self.peek().kind {
            TokenKind::Equal => {
                let targets = self.assignment_targets(exprs)?;
                self.advance();
                let value = self.parse_initializer()?;
                self.expect_semicolon()?;
                Ok(Stmt::Assign(self.arena.alloc(AssignStmt {
                    declare: false,
                    targets,
                    value,
                    span: self.span_from(first),
                })))
            }
            TokenKind::RightArrow => {
                self.advance();
                let target = match self.eat(TokenKind::Fork) {
                    Some(fork) => WorkerTarget::Fork(fork.span),
                    None => WorkerTarget::Worker(self.expect_ident()?),
                };
                self.expect_semicolon()?;
                Ok(Stmt::WorkerSend(self.arena.alloc(WorkerSendStmt {
                    values: exprs,
                    target,
                    span: self.span_from(first),
                })))
            }
            TokenKind::LeftArrow => {
                self.assignment_targets(exprs)?;
                self.advance();
                let worker = self.expect_ident()?;
                self.expect_semicolon()?;
                Ok(Stmt::WorkerReceive(self.arena.alloc(WorkerReceiveStmt {
                    targets: exprs,
                    worker,
                    span: self.span_from(first),
                })))
            }
            _ => match exprs {
                [Expr::FunctionCall(call)] => {
                    self.expect_semicolon()?;
                    Ok(Stmt::FunctionInvocation(*call))
                }
                _ => {
                    let span = first.merge(exprs[exprs.len() - 1].span());
                    Err(ParseError::new(
                        ParseErrorKind::ExpectedStatement,
                        span,
                        "expression is not a statement",
                    ))
                }
            },
        }
    }

    /// Every expression on the left of `=` or `<-` must be a variable reference.
    fn assignment_targets(
        &self,
        exprs: &[Expr<'ast>],
    ) -> Result<&'ast [&'ast VarRef<'ast>], ParseError> {
        let mut targets = BVec::with_capacity_in(exprs.len(), self.arena);
        for expr in exprs {
            match expr.as_var_ref() {
                Some(var_ref) => targets.push(var_ref),
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidAssignmentTarget,
                        expr.span(),
                        "only variable references can be assigned to",
                    ));
                }
            }
        }
        Ok(targets.into_bump_slice())
    }

    fn not_a_statement(kind: TokenKind, span: Span) -> ParseError {
        if kind == TokenKind::Eof {
            ParseError::unexpected_eof(span)
        } else {
            ParseError::new(
                ParseErrorKind::ExpectedStatement,
                span,
                format!("expected statement, found {}", kind.description()),
            )
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parse `{ statement* }`.
    ///
    /// A missing closing brace is assumed where the statement list stopped.
    pub fn parse_block(&mut self) -> Result<Block<'ast>, ParseError> {
        self.parse_block_of(ListKind::Block)
    }

    fn parse_block_of(&mut self, kind: ListKind) -> Result<Block<'ast>, ParseError> {
        self.nested(|p| {
            let open = p.expect(TokenKind::LeftBrace)?;
            let (stmts, _) = p.parse_statement_list(kind);
            let close = p.expect_closing_brace();
            Ok(Block {
                stmts,
                close,
                span: p.span_from(open.span),
            })
        })
    }

    /// Parse `{ statement* worker* }`, the body of a resource, function,
    /// action or worker. Workers and statements may be interleaved.
    pub fn parse_callable_body(&mut self) -> Result<CallableBody<'ast>, ParseError> {
        self.nested(|p| {
            let open = p.expect(TokenKind::LeftBrace)?;
            let (stmts, workers) = p.parse_statement_list(ListKind::Callable);
            let close = p.expect_closing_brace();
            Ok(CallableBody {
                stmts,
                workers,
                close,
                span: p.span_from(open.span),
            })
        })
    }

    /// Parse `worker name { statement* worker* }`.
    pub(super) fn parse_worker_decl(&mut self) -> Result<WorkerDecl<'ast>, ParseError> {
        let start = self.expect(TokenKind::Worker)?;
        let name = self.expect_ident()?;
        let body = self.parse_callable_body()?;
        Ok(WorkerDecl {
            name,
            body,
            span: start.span.merge(body.span),
        })
    }

    /// Parse statements until `}`, end of input, or something that can only
    /// start a definition or a body member.
    ///
    /// Never fails: a broken statement becomes [`Stmt::Error`] and parsing
    /// resumes after it.
    fn parse_statement_list(
        &mut self,
        kind: ListKind,
    ) -> (&'ast [Stmt<'ast>], &'ast [WorkerDecl<'ast>]) {
        let mut stmts = BVec::new_in(self.arena);
        let mut workers = BVec::new_in(self.arena);

        loop {
            while let Some(comment) = self.take_comment() {
                stmts.push(Stmt::Comment(comment));
            }

            let token = *self.peek();
            match token.kind {
                TokenKind::RightBrace | TokenKind::Eof => break,
                TokenKind::Resource | TokenKind::Action | TokenKind::At => break,
                k if k.starts_definition() => break,
                _ => {}
            }

            let start = self.position;
            let result = match (token.kind, kind) {
                (TokenKind::Worker, ListKind::Callable) => match self.parse_worker_decl() {
                    Ok(worker) => {
                        workers.push(worker);
                        continue;
                    }
                    Err(err) => Err(err),
                },
                (TokenKind::Worker, _) => Err(ParseError::new(
                    ParseErrorKind::ExpectedStatement,
                    token.span,
                    "workers can only be declared in a callable body or a fork",
                )),
                (_, ListKind::Transform) => self.parse_transform_statement(),
                _ => self.parse_statement(),
            };

            match result {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    let stmt = self.recover_statement(err, start);
                    stmts.push(stmt);
                }
            }
        }

        (stmts.into_bump_slice(), workers.into_bump_slice())
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// Parse `(expr)`.
    fn parse_condition(&mut self) -> Result<Expr<'ast>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        Ok(condition)
    }

    /// Parse `if (c) { } (else if (c) { })* (else { })?`.
    pub fn parse_if(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_block = self.parse_block()?;

        let mut else_ifs = BVec::new_in(self.arena);
        let mut else_block = None;
        while let Some(else_token) = self.eat(TokenKind::Else) {
            if self.eat(TokenKind::If).is_some() {
                let condition = self.parse_condition()?;
                let block = self.parse_block()?;
                else_ifs.push(ElseIfClause {
                    condition,
                    block,
                    span: else_token.span.merge(block.span),
                });
            } else {
                else_block = Some(self.parse_block()?);
                break;
            }
        }

        Ok(Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_block,
            else_ifs: else_ifs.into_bump_slice(),
            else_block,
            span: self.span_from(start.span),
        })))
    }

    /// Parse `iterate (T name : collection) { }`.
    pub fn parse_iterate(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Iterate)?;
        self.expect(TokenKind::LeftParen)?;
        let var_type = self.parse_type()?;
        let var_name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let collection = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_block()?;

        Ok(Stmt::Iterate(self.arena.alloc(IterateStmt {
            var_type,
            var_name,
            collection,
            body,
            span: start.span.merge(body.span),
        })))
    }

    /// Parse `while (c) { }`.
    pub fn parse_while(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;

        Ok(Stmt::While(self.arena.alloc(WhileStmt {
            condition,
            body,
            span: start.span.merge(body.span),
        })))
    }

    /// Parse `throw expr;`.
    fn parse_throw(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Throw)?;
        let value = self.parse_expr(0)?;
        self.expect_semicolon()?;
        Ok(Stmt::Throw(self.arena.alloc(ThrowStmt {
            value,
            span: self.span_from(start.span),
        })))
    }

    /// Parse `return (expr (, expr)*)?;`.
    pub fn parse_return(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Return)?;
        let values = if Self::starts_operand(self.peek().kind) {
            self.parse_expression_list()?
        } else {
            &[][..]
        };
        self.expect_semicolon()?;
        Ok(Stmt::Return(self.arena.alloc(ReturnStmt {
            values,
            span: self.span_from(start.span),
        })))
    }

    /// Parse `reply expr;`.
    fn parse_reply(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Reply)?;
        let value = self.parse_expr(0)?;
        self.expect_semicolon()?;
        Ok(Stmt::Reply(self.arena.alloc(ReplyStmt {
            value,
            span: self.span_from(start.span),
        })))
    }

    // ========================================================================
    // Fork / join
    // ========================================================================

    /// Parse `fork { worker* } join? timeout?`.
    pub fn parse_fork_join(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Fork)?;
        self.expect(TokenKind::LeftBrace)?;

        let mut workers = BVec::new_in(self.arena);
        loop {
            match self.peek().kind {
                TokenKind::RightBrace | TokenKind::Eof => break,
                TokenKind::Resource | TokenKind::Action | TokenKind::At => break,
                k if k.starts_definition() => break,
                _ => {}
            }
            let member_start = self.position;
            let result = if self.check(TokenKind::Worker) {
                self.parse_worker_decl()
            } else {
                let token = *self.peek();
                Err(self.expected_error(token, TokenKind::Worker.description()))
            };
            match result {
                Ok(worker) => workers.push(worker),
                Err(err) => {
                    self.recover_member(err, member_start);
                }
            }
        }
        self.expect_closing_brace();

        let join = if self.check(TokenKind::Join) {
            Some(self.parse_join_clause()?)
        } else {
            None
        };
        let timeout = if self.check(TokenKind::Timeout) {
            Some(self.parse_timeout_clause()?)
        } else {
            None
        };

        Ok(Stmt::ForkJoin(self.arena.alloc(ForkJoinStmt {
            workers: workers.into_bump_slice(),
            join,
            timeout,
            span: self.span_from(start.span),
        })))
    }

    /// Parse `join ((condition))? (T name) { }`.
    fn parse_join_clause(&mut self) -> Result<JoinClause<'ast>, ParseError> {
        let start = self.expect(TokenKind::Join)?;

        let has_condition = self.check(TokenKind::LeftParen)
            && match self.peek_nth(1).kind {
                TokenKind::SomeKw | TokenKind::All => true,
                TokenKind::Any => self.check_nth(2, TokenKind::IntegerLiteral),
                _ => false,
            };
        let condition = if has_condition {
            self.advance();
            let condition = self.parse_join_condition()?;
            self.expect(TokenKind::RightParen)?;
            Some(condition)
        } else {
            None
        };

        let (binding_type, binding_name) = self.parse_clause_binding()?;
        let body = self.parse_block()?;
        Ok(JoinClause {
            condition,
            binding_type,
            binding_name,
            body,
            span: start.span.merge(body.span),
        })
    }

    /// Parse `some N w1, w2`, `any N w1, w2` or `all w1, w2`.
    fn parse_join_condition(&mut self) -> Result<JoinCondition<'ast>, ParseError> {
        let keyword = self.advance();
        match keyword.kind {
            TokenKind::SomeKw | TokenKind::Any => {
                let count_token = self.expect(TokenKind::IntegerLiteral)?;
                let count = count_token.lexeme.parse::<u32>().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidLiteral,
                        count_token.span,
                        format!("invalid worker count {}", count_token.lexeme),
                    )
                })?;
                let workers = self.parse_worker_names()?;
                Ok(JoinCondition::Any {
                    count,
                    workers,
                    span: self.span_from(keyword.span),
                })
            }
            TokenKind::All => {
                let workers = self.parse_worker_names()?;
                Ok(JoinCondition::All {
                    workers,
                    span: self.span_from(keyword.span),
                })
            }
            _ => Err(self.expected_error(keyword, "'some' or 'all'")),
        }
    }

    /// Parse an optional `name (, name)*` list.
    fn parse_worker_names(&mut self) -> Result<&'ast [Ident<'ast>], ParseError> {
        let mut names = BVec::new_in(self.arena);
        if self.check(TokenKind::Identifier) {
            loop {
                names.push(self.expect_ident()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        Ok(names.into_bump_slice())
    }

    /// Parse `timeout (expr) (T name) { }`.
    fn parse_timeout_clause(&mut self) -> Result<TimeoutClause<'ast>, ParseError> {
        let start = self.expect(TokenKind::Timeout)?;
        let timeout = self.parse_condition()?;
        let (binding_type, binding_name) = self.parse_clause_binding()?;
        let body = self.parse_block()?;
        Ok(TimeoutClause {
            timeout,
            binding_type,
            binding_name,
            body,
            span: start.span.merge(body.span),
        })
    }

    /// Parse `(T name)`, the binding of a join, timeout or catch clause.
    fn parse_clause_binding(&mut self) -> Result<(TypeName<'ast>, Ident<'ast>), ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::RightParen)?;
        Ok((ty, name))
    }

    // ========================================================================
    // Try / transaction
    // ========================================================================

    /// Parse `try { } (catch (T e) { })* (finally { })?`.
    ///
    /// A try with neither catch nor finally is reported but kept.
    pub fn parse_try_catch(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Try)?;
        let body = self.parse_block()?;

        let mut catches = BVec::new_in(self.arena);
        while let Some(catch) = self.eat(TokenKind::Catch) {
            let (error_type, error_name) = self.parse_clause_binding()?;
            let block = self.parse_block()?;
            catches.push(CatchClause {
                error_type,
                error_name,
                body: block,
                span: catch.span.merge(block.span),
            });
        }
        let finally = if self.eat(TokenKind::Finally).is_some() {
            Some(self.parse_block()?)
        } else {
            None
        };

        let span = self.span_from(start.span);
        if catches.is_empty() && finally.is_none() {
            self.report(ParseError::new(
                ParseErrorKind::MissingClause,
                span,
                "try needs at least one catch or a finally clause",
            ));
        }

        Ok(Stmt::TryCatch(self.arena.alloc(TryCatchStmt {
            body,
            catches: catches.into_bump_slice(),
            finally,
            span,
        })))
    }

    /// Parse `transaction { }` followed by `aborted { }` and `committed { }`
    /// in either order, each at most once.
    pub fn parse_transaction(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Transaction)?;
        let body = self.parse_block()?;

        let mut aborted: Option<Block<'ast>> = None;
        let mut committed: Option<Block<'ast>> = None;
        while matches!(self.peek().kind, TokenKind::Aborted | TokenKind::Committed) {
            let keyword = self.advance();
            let block = self.parse_block()?;
            let slot = if keyword.kind == TokenKind::Aborted {
                &mut aborted
            } else {
                &mut committed
            };
            if slot.is_some() {
                self.report(ParseError::new(
                    ParseErrorKind::DuplicateClause,
                    keyword.span,
                    format!("duplicate {} clause", keyword.kind.description()),
                ));
            } else {
                *slot = Some(block);
            }
        }

        Ok(Stmt::Transaction(self.arena.alloc(TransactionStmt {
            body,
            aborted,
            committed,
            span: self.span_from(start.span),
        })))
    }

    // ========================================================================
    // Transform
    // ========================================================================

    /// Parse `transform { ... }`.
    pub fn parse_transform(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::Transform)?;
        let body = self.parse_block_of(ListKind::Transform)?;
        Ok(Stmt::Transform(self.arena.alloc(TransformStmt {
            body,
            span: start.span.merge(body.span),
        })))
    }

    /// One statement of a transform body: a nested transform, a variable
    /// definition with an initializer, or an assignment of a plain expression.
    fn parse_transform_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        if self.check(TokenKind::Transform) {
            return self.parse_transform();
        }

        if self.is_var_def() {
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            self.expect(TokenKind::Equal)?;
            let init = self.parse_expr(0)?;
            self.expect_semicolon()?;
            let def = VarDefStmt {
                ty,
                name,
                init: Some(init),
                span: self.span_from(ty.span),
            };
            return Ok(Stmt::VarDef(self.arena.alloc(def)));
        }

        let token = *self.peek();
        if token.kind != TokenKind::Identifier {
            trace!(
                found = token.kind.description(),
                "rejected transform statement"
            );
            return Err(Self::not_a_statement(token.kind, token.span));
        }
        let mut targets = BVec::new_in(self.arena);
        loop {
            targets.push(self.parse_variable_reference()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expr(0)?;
        self.expect_semicolon()?;
        Ok(Stmt::Assign(self.arena.alloc(AssignStmt {
            declare: false,
            targets: targets.into_bump_slice(),
            value,
            span: self.span_from(token.span),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expr::VarRefKind;
    use crate::ast::{ParseErrors, Recovery};
    use bumpalo::Bump;

    fn parse_stmt<'a>(source: &str, arena: &'a Bump) -> Stmt<'a> {
        let mut parser = Parser::new(source, arena);
        let stmt = parser.parse_statement().unwrap();
        assert!(
            !parser.has_errors(),
            "diagnostics for {source:?}: {:?}",
            parser.errors
        );
        stmt
    }

    /// Parse the inside of a block, returning the statements and diagnostics.
    fn parse_body<'a>(source: &str, arena: &'a Bump) -> (Block<'a>, ParseErrors) {
        let mut parser = Parser::new(source, arena);
        let block = parser.parse_block().unwrap();
        (block, parser.take_errors())
    }

    #[test]
    fn parse_var_def() {
        let arena = Bump::new();
        match parse_stmt("int x = 42;", &arena) {
            Stmt::VarDef(def) => {
                assert_eq!(def.name.name, "x");
                assert!(def.init.is_some());
                assert_eq!((def.span.start, def.span.end), (0, 11));
            }
            other => panic!("Expected variable definition, got {other:?}"),
        }
    }

    #[test]
    fn parse_var_def_with_connector_init() {
        let arena = Bump::new();
        let source = "http:ClientConnector c = create http:ClientConnector(\"http://x\");";
        match parse_stmt(source, &arena) {
            Stmt::VarDef(def) => assert!(matches!(def.init, Some(Expr::ConnectorInit(_)))),
            other => panic!("Expected variable definition, got {other:?}"),
        }
    }

    #[test]
    fn parse_var_def_without_init() {
        let arena = Bump::new();
        match parse_stmt("message m;", &arena) {
            Stmt::VarDef(def) => assert!(def.init.is_none()),
            other => panic!("Expected variable definition, got {other:?}"),
        }
    }

    #[test]
    fn parse_multi_assignment() {
        let arena = Bump::new();
        match parse_stmt("a, b.c = f(x);", &arena) {
            Stmt::Assign(assign) => {
                assert!(!assign.declare);
                assert_eq!(assign.targets.len(), 2);
                assert!(matches!(assign.targets[1].kind, VarRefKind::Field { .. }));
                assert!(matches!(assign.value, Expr::FunctionCall(_)));
            }
            other => panic!("Expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn parse_var_assignment() {
        let arena = Bump::new();
        match parse_stmt("var r, e = conn.get(m);", &arena) {
            Stmt::Assign(assign) => {
                assert!(assign.declare);
                assert_eq!(assign.targets.len(), 2);
                assert!(matches!(assign.value, Expr::ActionInvocation(_)));
            }
            other => panic!("Expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn assignment_to_non_reference_is_rejected() {
        let arena = Bump::new();
        let mut parser = Parser::new("f() = 1;", &arena);
        let err = parser.parse_statement().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidAssignmentTarget);
    }

    #[test]
    fn parse_invocations() {
        let arena = Bump::new();
        assert!(matches!(
            parse_stmt("system:println(\"hi\");", &arena),
            Stmt::FunctionInvocation(_)
        ));
        match parse_stmt("http:ClientConnector.post(c, \"/\", m);", &arena) {
            Stmt::ActionInvocation(action) => {
                assert_eq!(action.action.name, "post");
                assert_eq!(action.args.len(), 3);
            }
            other => panic!("Expected action invocation, got {other:?}"),
        }
    }

    #[test]
    fn bare_expression_is_not_a_statement() {
        let arena = Bump::new();
        let mut parser = Parser::new("x + 1;", &arena);
        let err = parser.parse_statement().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedStatement);
    }

    #[test]
    fn parse_worker_interactions() {
        let arena = Bump::new();
        match parse_stmt("a, b -> w1;", &arena) {
            Stmt::WorkerSend(send) => {
                assert_eq!(send.values.len(), 2);
                assert!(matches!(send.target, WorkerTarget::Worker(w) if w.name == "w1"));
            }
            other => panic!("Expected worker send, got {other:?}"),
        }
        match parse_stmt("m -> fork;", &arena) {
            Stmt::WorkerSend(send) => assert!(matches!(send.target, WorkerTarget::Fork(_))),
            other => panic!("Expected worker send, got {other:?}"),
        }
        match parse_stmt("x, y <- default;", &arena) {
            Stmt::WorkerReceive(recv) => {
                assert_eq!(recv.targets.len(), 2);
                assert_eq!(recv.worker.name, "default");
            }
            other => panic!("Expected worker receive, got {other:?}"),
        }
    }

    #[test]
    fn parse_if_chain() {
        let arena = Bump::new();
        let source = "if (a > 1) { x = 1; } else if (a < 0) { x = 2; } \
                      else if (b) { } else { x = 3; }";
        match parse_stmt(source, &arena) {
            Stmt::If(stmt) => {
                assert_eq!(stmt.then_block.stmts.len(), 1);
                assert_eq!(stmt.else_ifs.len(), 2);
                assert!(stmt.else_block.is_some());
                assert_eq!(stmt.span.end as usize, source.len());
            }
            other => panic!("Expected if, got {other:?}"),
        }
    }

    #[test]
    fn parse_loops() {
        let arena = Bump::new();
        match parse_stmt("iterate (string s : names) { count = count + 1; }", &arena) {
            Stmt::Iterate(stmt) => {
                assert_eq!(stmt.var_name.name, "s");
                assert_eq!(stmt.body.stmts.len(), 1);
            }
            other => panic!("Expected iterate, got {other:?}"),
        }
        match parse_stmt("while (i < 10) { i = i + 1; break; continue; }", &arena) {
            Stmt::While(stmt) => {
                assert_eq!(stmt.body.stmts.len(), 3);
                assert!(matches!(stmt.body.stmts[1], Stmt::Break(_)));
                assert!(matches!(stmt.body.stmts[2], Stmt::Continue(_)));
            }
            other => panic!("Expected while, got {other:?}"),
        }
    }

    #[test]
    fn parse_return_forms() {
        let arena = Bump::new();
        match parse_stmt("return;", &arena) {
            Stmt::Return(ret) => assert!(ret.values.is_empty()),
            other => panic!("Expected return, got {other:?}"),
        }
        match parse_stmt("return a, b + 1;", &arena) {
            Stmt::Return(ret) => assert_eq!(ret.values.len(), 2),
            other => panic!("Expected return, got {other:?}"),
        }
        assert!(matches!(parse_stmt("reply m;", &arena), Stmt::Reply(_)));
        assert!(matches!(parse_stmt("throw e;", &arena), Stmt::Throw(_)));
        assert!(matches!(parse_stmt("abort;", &arena), Stmt::Abort(_)));
    }

    #[test]
    fn parse_fork_join_timeout() {
        let arena = Bump::new();
        let source = "fork { worker w1 { m -> fork; } worker w2 { } } \
                      join (some 1 w1, w2) (message[] results) { } \
                      timeout (100) (message[] partial) { }";
        match parse_stmt(source, &arena) {
            Stmt::ForkJoin(fork) => {
                assert_eq!(fork.workers.len(), 2);
                let join = fork.join.unwrap();
                match join.condition {
                    Some(JoinCondition::Any { count, workers, .. }) => {
                        assert_eq!(count, 1);
                        assert_eq!(workers.len(), 2);
                    }
                    other => panic!("Expected some-condition, got {other:?}"),
                }
                assert_eq!(join.binding_type.array_depth(), 1);
                assert_eq!(fork.timeout.unwrap().binding_name.name, "partial");
            }
            other => panic!("Expected fork, got {other:?}"),
        }
    }

    #[test]
    fn parse_join_conditions() {
        let arena = Bump::new();
        let all = "fork { } join (all) (message[] r) { }";
        match parse_stmt(all, &arena) {
            Stmt::ForkJoin(fork) => match fork.join.unwrap().condition {
                Some(JoinCondition::All { workers, .. }) => assert!(workers.is_empty()),
                other => panic!("Expected all-condition, got {other:?}"),
            },
            other => panic!("Expected fork, got {other:?}"),
        }

        let any = "fork { } join (any 2 a, b) (message[] r) { }";
        match parse_stmt(any, &arena) {
            Stmt::ForkJoin(fork) => assert!(matches!(
                fork.join.unwrap().condition,
                Some(JoinCondition::Any { count: 2, .. })
            )),
            other => panic!("Expected fork, got {other:?}"),
        }

        let bare = "fork { } join (any r) { }";
        match parse_stmt(bare, &arena) {
            Stmt::ForkJoin(fork) => {
                let join = fork.join.unwrap();
                assert!(join.condition.is_none());
                assert_eq!(join.binding_name.name, "r");
            }
            other => panic!("Expected fork, got {other:?}"),
        }
    }

    #[test]
    fn fork_body_only_holds_workers() {
        let arena = Bump::new();
        let mut parser = Parser::new("fork { x = 1; worker w { } }", &arena);
        match parser.parse_statement().unwrap() {
            Stmt::ForkJoin(fork) => assert_eq!(fork.workers.len(), 1),
            other => panic!("Expected fork, got {other:?}"),
        }
        assert_eq!(parser.errors.len(), 1);
    }

    #[test]
    fn parse_try_catch_finally() {
        let arena = Bump::new();
        let source = "try { f(); } catch (errors:Error e) { } catch (exception ex) { } finally { }";
        match parse_stmt(source, &arena) {
            Stmt::TryCatch(stmt) => {
                assert_eq!(stmt.catches.len(), 2);
                assert_eq!(stmt.catches[0].error_name.name, "e");
                assert!(stmt.finally.is_some());
            }
            other => panic!("Expected try, got {other:?}"),
        }
    }

    #[test]
    fn try_without_handlers_is_reported() {
        let arena = Bump::new();
        let mut parser = Parser::new("try { }", &arena);
        let stmt = parser.parse_statement().unwrap();
        assert!(matches!(stmt, Stmt::TryCatch(_)));
        let err = parser.errors.iter().next().unwrap();
        assert_eq!(err.kind, ParseErrorKind::MissingClause);
    }

    #[test]
    fn transaction_handlers_in_either_order() {
        let arena = Bump::new();
        for source in [
            "transaction { } aborted { abort; } committed { }",
            "transaction { } committed { } aborted { abort; }",
        ] {
            match parse_stmt(source, &arena) {
                Stmt::Transaction(tx) => {
                    assert_eq!(tx.aborted.unwrap().stmts.len(), 1);
                    assert!(tx.committed.is_some());
                }
                other => panic!("Expected transaction, got {other:?}"),
            }
        }
    }

    #[test]
    fn duplicate_transaction_handler() {
        let arena = Bump::new();
        let mut parser = Parser::new("transaction { } aborted { } aborted { }", &arena);
        assert!(matches!(parser.parse_statement().unwrap(), Stmt::Transaction(_)));
        let err = parser.errors.iter().next().unwrap();
        assert_eq!(err.kind, ParseErrorKind::DuplicateClause);
    }

    #[test]
    fn parse_transform_body() {
        let arena = Bump::new();
        let source = "transform { // map fields\n \
                      string n = p.name; t.age = p.age + 1; transform { a = b; } }";
        match parse_stmt(source, &arena) {
            Stmt::Transform(stmt) => {
                let stmts = stmt.body.stmts;
                assert_eq!(stmts.len(), 4);
                assert!(matches!(stmts[0], Stmt::Comment(_)));
                assert!(matches!(stmts[1], Stmt::VarDef(_)));
                assert!(matches!(stmts[2], Stmt::Assign(_)));
                assert!(matches!(stmts[3], Stmt::Transform(_)));
            }
            other => panic!("Expected transform, got {other:?}"),
        }
    }

    #[test]
    fn transform_rejects_other_statements() {
        let arena = Bump::new();
        let (block, errors) = parse_body("{ transform { int x; return y; a = b; } }", &arena);
        match block.stmts[0] {
            Stmt::Transform(stmt) => {
                assert_eq!(stmt.body.stmts.len(), 3);
                assert!(stmt.body.stmts[0].is_error());
                assert!(stmt.body.stmts[1].is_error());
                assert!(matches!(stmt.body.stmts[2], Stmt::Assign(_)));
            }
            other => panic!("Expected transform, got {other:?}"),
        }
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn parse_namespace_statement() {
        let arena = Bump::new();
        match parse_stmt("xmlns \"http://example.com\" as ex;", &arena) {
            Stmt::Namespace(ns) => assert_eq!(ns.prefix.map(|p| p.name), Some("ex")),
            other => panic!("Expected xmlns, got {other:?}"),
        }
    }

    #[test]
    fn comments_become_statements() {
        let arena = Bump::new();
        let (block, errors) = parse_body("{ // first\n x = 1; // trailing\n }", &arena);
        assert!(errors.is_empty());
        assert_eq!(block.stmts.len(), 3);
        match block.stmts[0] {
            Stmt::Comment(comment) => assert_eq!(comment.text, "// first"),
            other => panic!("Expected comment, got {other:?}"),
        }
        assert!(matches!(block.stmts[2], Stmt::Comment(_)));
    }

    #[test]
    fn callable_body_collects_workers() {
        let arena = Bump::new();
        let source = "{ a -> w; worker w { int x; x <- default; } reply m; }";
        let mut parser = Parser::new(source, &arena);
        let body = parser.parse_callable_body().unwrap();
        assert!(!parser.has_errors());
        assert_eq!(body.stmts.len(), 2);
        assert_eq!(body.workers.len(), 1);
        assert_eq!(body.workers[0].body.stmts.len(), 2);
    }

    #[test]
    fn worker_in_plain_block_is_an_error() {
        let arena = Bump::new();
        let (block, errors) = parse_body("{ worker w { } x = 1; }", &arena);
        assert!(block.stmts[0].is_error());
        assert!(matches!(block.stmts[1], Stmt::Assign(_)));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn recovery_resumes_at_next_statement() {
        let arena = Bump::new();
        let (block, errors) = parse_body("{ x = = 1; int y = 2; }", &arena);
        assert_eq!(block.stmts.len(), 2);
        assert!(block.stmts[0].is_error());
        assert!(matches!(block.stmts[1], Stmt::VarDef(_)));
        assert_eq!(errors.len(), 1);
        assert!(block.close.is_present());
    }

    #[test]
    fn missing_semicolon_is_inserted() {
        let arena = Bump::new();
        let (block, errors) = parse_body("{ int x = 1 return x; }", &arena);
        assert_eq!(block.stmts.len(), 2);
        assert!(!block.stmts[0].is_error());
        assert_eq!(errors.len(), 1);
        let err = errors.iter().next().unwrap();
        assert_eq!(err.recovery, Some(Recovery::InsertedMissing("';'")));
    }

    #[test]
    fn missing_closing_brace_is_assumed() {
        let arena = Bump::new();
        let (block, errors) = parse_body("{ x = 1;", &arena);
        assert_eq!(block.stmts.len(), 1);
        assert!(block.close.synthetic);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn statement_list_stops_at_definition() {
        let arena = Bump::new();
        let mut parser = Parser::new("{ x = 1; function f() { }", &arena);
        let block = parser.parse_block().unwrap();
        assert_eq!(block.stmts.len(), 1);
        assert!(parser.check(TokenKind::Function));
    }
}
