//! Declaration parsing functions for Ballerina.
//!
//! Implements parsing of the compilation unit (package, imports, namespace
//! declarations) and of every top-level definition: services, functions,
//! connectors, structs, annotations, type mappers, constants and global
//! variables, together with their annotation attachments.

use super::parser::Parser;
use crate::ast::decl::*;
use crate::ast::expr::LiteralExpr;
use crate::ast::stmt::CallableBody;
use crate::ast::{Ident, PackageName, ParseError, ParseErrorKind, TokenMarker, TypeName};
use crate::lexer::{Span, TokenKind};
use bumpalo::collections::Vec as BVec;
use tracing::debug;

impl<'ast> Parser<'ast> {
    /// Parse a complete compilation unit.
    ///
    /// Grammar: `package? (import | xmlns)* (annotation* definition)* EOF`
    ///
    /// Never fails; broken definitions become [`Item::Error`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_compilation_unit(&mut self) -> CompilationUnit<'ast> {
        let first = self.peek().span;

        let package = if self.check(TokenKind::Package) {
            let start = self.position;
            match self.parse_package_decl() {
                Ok(package) => Some(package),
                Err(err) => {
                    self.recover_definition(err, start);
                    None
                }
            }
        } else {
            None
        };

        let mut directives = BVec::new_in(self.arena);
        while matches!(self.peek().kind, TokenKind::Import | TokenKind::Xmlns) {
            let start = self.position;
            let result = if self.check(TokenKind::Import) {
                self.parse_import_decl()
                    .map(|import| Directive::Import(self.arena.alloc(import)))
            } else {
                self.parse_namespace_decl().map(Directive::Namespace)
            };
            match result {
                Ok(directive) => directives.push(directive),
                Err(err) => {
                    self.recover_definition(err, start);
                }
            }
        }

        let mut items = BVec::new_in(self.arena);
        while !self.is_eof() {
            let start = self.position;
            match self.parse_definition() {
                Ok(item) => items.push(item),
                Err(err) => {
                    let span = self.recover_definition(err, start);
                    items.push(Item::Error(span));
                }
            }
        }

        debug!(
            items = items.len(),
            errors = self.errors.len(),
            "parsed compilation unit"
        );
        CompilationUnit {
            package,
            directives: directives.into_bump_slice(),
            items: items.into_bump_slice(),
            span: first.merge(self.peek().span),
        }
    }

    /// Parse `package a.b.c;`.
    fn parse_package_decl(&mut self) -> Result<PackageDecl<'ast>, ParseError> {
        let start = self.expect(TokenKind::Package)?;
        let name = self.parse_package_name()?;
        self.expect_semicolon()?;
        Ok(PackageDecl {
            name,
            span: self.span_from(start.span),
        })
    }

    /// Parse `import a.b.c (as alias)?;`.
    fn parse_import_decl(&mut self) -> Result<ImportDecl<'ast>, ParseError> {
        let start = self.expect(TokenKind::Import)?;
        let package = self.parse_package_name()?;
        let alias = if self.eat(TokenKind::As).is_some() {
            Some(self.expect_ident()?)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(ImportDecl {
            package,
            alias,
            span: self.span_from(start.span),
        })
    }

    /// Parse `xmlns "uri" (as prefix)?;`, at top level or as a statement.
    pub(super) fn parse_namespace_decl(&mut self) -> Result<&'ast NamespaceDecl<'ast>, ParseError> {
        let start = self.expect(TokenKind::Xmlns)?;
        let uri = self.expect(TokenKind::StringLiteral)?;
        let prefix = if self.eat(TokenKind::As).is_some() {
            Some(self.expect_ident()?)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(self.arena.alloc(NamespaceDecl {
            uri: uri.lexeme,
            prefix,
            span: self.span_from(start.span),
        }))
    }

    /// Parse `a.b.c`.
    fn parse_package_name(&mut self) -> Result<PackageName<'ast>, ParseError> {
        let mut segments = BVec::new_in(self.arena);
        let first = self.expect_ident()?;
        segments.push(first);
        while self.check(TokenKind::Dot) && self.check_nth(1, TokenKind::Identifier) {
            self.advance();
            segments.push(self.expect_ident()?);
        }
        Ok(PackageName {
            segments: segments.into_bump_slice(),
            span: self.span_from(first.span),
        })
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    /// Parse one annotated top-level definition.
    pub fn parse_definition(&mut self) -> Result<Item<'ast>, ParseError> {
        let start = self.peek().span;
        let annotations = self.parse_annotation_attachments()?;
        let token = *self.peek();
        let found = token.kind.description();

        match token.kind {
            TokenKind::Service => Ok(Item::Service(self.parse_service(annotations, start)?)),
            TokenKind::Function => Ok(Item::Function(self.parse_function(annotations, start)?)),
            TokenKind::Native => match self.peek_nth(1).kind {
                TokenKind::Function => Ok(Item::Function(self.parse_function(annotations, start)?)),
                TokenKind::TypeMapper => {
                    Ok(Item::TypeMapper(self.parse_type_mapper(annotations, start)?))
                }
                _ => {
                    let next = *self.peek_nth(1);
                    Err(self.expected_error(next, "'function' or 'typemapper'"))
                }
            },
            TokenKind::Connector => Ok(Item::Connector(self.parse_connector(annotations, start)?)),
            TokenKind::Struct => Ok(Item::Struct(self.parse_struct(annotations, start)?)),
            TokenKind::TypeMapper => {
                Ok(Item::TypeMapper(self.parse_type_mapper(annotations, start)?))
            }
            TokenKind::Const => Ok(Item::Constant(self.parse_constant(annotations, start)?)),
            TokenKind::Annotation => {
                Ok(Item::Annotation(self.parse_annotation_def(annotations, start)?))
            }
            TokenKind::Package | TokenKind::Import | TokenKind::Xmlns => Err(ParseError::new(
                ParseErrorKind::ExpectedDefinition,
                token.span,
                format!("{found} must come before all definitions"),
            )),
            _ if self.is_var_def() => {
                Ok(Item::GlobalVar(self.parse_global_var(annotations, start)?))
            }
            TokenKind::Eof => Err(ParseError::unexpected_eof(token.span)),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedDefinition,
                token.span,
                format!("expected definition, found {found}"),
            )),
        }
    }

    /// Parse `service<protocol> name { varDef* resource* }`.
    fn parse_service(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast ServiceDef<'ast>, ParseError> {
        self.expect(TokenKind::Service)?;
        self.expect(TokenKind::Less)?;
        let protocol = self.expect_ident()?;
        self.expect(TokenKind::Greater)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LeftBrace)?;

        let mut variables = BVec::new_in(self.arena);
        let mut resources = BVec::new_in(self.arena);
        self.parse_body_members(|p| {
            if matches!(p.peek().kind, TokenKind::Resource | TokenKind::At) {
                resources.push(p.parse_resource()?);
            } else if p.is_var_def() {
                variables.push(p.parse_var_def()?);
            } else {
                return Err(p.member_error("a variable definition or resource"));
            }
            Ok(())
        });

        Ok(self.arena.alloc(ServiceDef {
            annotations,
            protocol,
            name,
            variables: variables.into_bump_slice(),
            resources: resources.into_bump_slice(),
            span: self.span_from(start),
        }))
    }

    /// Parse `@annotations resource name(params) { statement* worker* }`.
    fn parse_resource(&mut self) -> Result<ResourceDef<'ast>, ParseError> {
        let start = self.peek().span;
        let annotations = self.parse_annotation_attachments()?;
        self.expect(TokenKind::Resource)?;
        let name = self.expect_ident()?;
        let params = self.parse_parameter_list()?;
        let body = self.parse_callable_body()?;
        Ok(ResourceDef {
            annotations,
            name,
            params,
            body,
            span: start.merge(body.span),
        })
    }

    /// Parse `native function sig;` or `function sig { ... }`.
    fn parse_function(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast FunctionDef<'ast>, ParseError> {
        let native = self.eat(TokenKind::Native).is_some();
        self.expect(TokenKind::Function)?;
        let signature = self.parse_signature()?;
        let body = self.parse_callable_tail(native)?;
        Ok(self.arena.alloc(FunctionDef {
            annotations,
            native,
            signature,
            body,
            span: self.span_from(start),
        }))
    }

    /// A native callable ends with `;`, any other one with its body.
    fn parse_callable_tail(
        &mut self,
        native: bool,
    ) -> Result<Option<CallableBody<'ast>>, ParseError> {
        if native {
            self.expect_semicolon()?;
            Ok(None)
        } else {
            Ok(Some(self.parse_callable_body()?))
        }
    }

    /// Parse `name(params) returnParameters?`.
    fn parse_signature(&mut self) -> Result<Signature<'ast>, ParseError> {
        let name = self.expect_ident()?;
        let params = self.parse_parameter_list()?;
        let returns = if self.check(TokenKind::LeftParen) {
            Some(self.parse_return_params()?)
        } else {
            None
        };
        Ok(Signature {
            name,
            params,
            returns,
            span: self.span_from(name.span),
        })
    }

    /// Parse `(T a, U b)` or `(T, U)`.
    fn parse_return_params(&mut self) -> Result<ReturnParams<'ast>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let returns = if self.check(TokenKind::At) || self.is_var_def() {
            let mut params = BVec::new_in(self.arena);
            loop {
                params.push(self.parse_parameter()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            ReturnParams::Named(params.into_bump_slice())
        } else {
            let mut types = BVec::new_in(self.arena);
            loop {
                types.push(self.parse_type()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            ReturnParams::Types(types.into_bump_slice())
        };
        self.expect(TokenKind::RightParen)?;
        Ok(returns)
    }

    /// Parse `(param, ...)`, possibly empty.
    fn parse_parameter_list(&mut self) -> Result<&'ast [Param<'ast>], ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut params = BVec::new_in(self.arena);
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_parameter()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(params.into_bump_slice())
    }

    /// Parse `@annotations T name`.
    fn parse_parameter(&mut self) -> Result<Param<'ast>, ParseError> {
        let start = self.peek().span;
        let annotations = self.parse_annotation_attachments()?;
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        Ok(Param {
            annotations,
            ty,
            name,
            span: start.merge(name.span),
        })
    }

    /// Parse `connector Name(params) { varDef* action* }`.
    fn parse_connector(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast ConnectorDef<'ast>, ParseError> {
        self.expect(TokenKind::Connector)?;
        let name = self.expect_ident()?;
        let params = self.parse_parameter_list()?;
        self.expect(TokenKind::LeftBrace)?;

        let mut variables = BVec::new_in(self.arena);
        let mut actions = BVec::new_in(self.arena);
        self.parse_body_members(|p| {
            let kind = p.peek().kind;
            if matches!(kind, TokenKind::Action | TokenKind::Native | TokenKind::At) {
                actions.push(p.parse_action()?);
            } else if p.is_var_def() {
                variables.push(p.parse_var_def()?);
            } else {
                return Err(p.member_error("a variable definition or action"));
            }
            Ok(())
        });

        Ok(self.arena.alloc(ConnectorDef {
            annotations,
            name,
            params,
            variables: variables.into_bump_slice(),
            actions: actions.into_bump_slice(),
            span: self.span_from(start),
        }))
    }

    /// Parse `@annotations native action sig;` or `@annotations action sig { ... }`.
    fn parse_action(&mut self) -> Result<ActionDef<'ast>, ParseError> {
        let start = self.peek().span;
        let annotations = self.parse_annotation_attachments()?;
        let native = self.eat(TokenKind::Native).is_some();
        self.expect(TokenKind::Action)?;
        let signature = self.parse_signature()?;
        let body = self.parse_callable_tail(native)?;
        Ok(ActionDef {
            annotations,
            native,
            signature,
            body,
            span: self.span_from(start),
        })
    }

    /// Parse `struct Name { field* }`.
    fn parse_struct(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast StructDef<'ast>, ParseError> {
        self.expect(TokenKind::Struct)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LeftBrace)?;
        let fields = self.parse_field_list();
        Ok(self.arena.alloc(StructDef {
            annotations,
            name,
            fields,
            span: self.span_from(start),
        }))
    }

    /// Parse fields up to and including the closing `}`.
    fn parse_field_list(&mut self) -> &'ast [FieldDef<'ast>] {
        let mut fields = BVec::new_in(self.arena);
        self.parse_body_members(|p| {
            fields.push(p.parse_field()?);
            Ok(())
        });
        fields.into_bump_slice()
    }

    /// Parse `T name (= simpleLiteral)?;`.
    fn parse_field(&mut self) -> Result<FieldDef<'ast>, ParseError> {
        if !self.is_type_start() {
            return Err(self.member_error("a field definition"));
        }
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let default = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_simple_literal()?)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(FieldDef {
            ty,
            name,
            default,
            span: self.span_from(ty.span),
        })
    }

    /// Parse `annotation Name (attach point, ...)? { field* }`.
    fn parse_annotation_def(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast AnnotationDef<'ast>, ParseError> {
        self.expect(TokenKind::Annotation)?;
        let name = self.expect_ident()?;

        let mut attach_points = BVec::new_in(self.arena);
        if self.eat(TokenKind::Attach).is_some() {
            loop {
                attach_points.push(self.parse_attach_point()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect(TokenKind::LeftBrace)?;
        let fields = self.parse_field_list();
        Ok(self.arena.alloc(AnnotationDef {
            annotations,
            name,
            attach_points: attach_points.into_bump_slice(),
            fields,
            span: self.span_from(start),
        }))
    }

    fn parse_attach_point(&mut self) -> Result<AttachPoint, ParseError> {
        let token = *self.peek();
        let kind = match token.kind {
            TokenKind::Service => AttachPointKind::Service,
            TokenKind::Resource => AttachPointKind::Resource,
            TokenKind::Function => AttachPointKind::Function,
            TokenKind::Connector => AttachPointKind::Connector,
            TokenKind::Action => AttachPointKind::Action,
            TokenKind::TypeMapper => AttachPointKind::TypeMapper,
            TokenKind::Struct => AttachPointKind::Struct,
            TokenKind::Const => AttachPointKind::Const,
            TokenKind::Parameter => AttachPointKind::Parameter,
            TokenKind::Annotation => AttachPointKind::Annotation,
            _ => return Err(self.expected_error(token, "attachment point")),
        };
        self.advance();
        Ok(AttachPoint {
            kind,
            span: token.span,
        })
    }

    /// Parse `native? typemapper Name(param)(T) (; | { statement* })`.
    fn parse_type_mapper(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast TypeMapperDef<'ast>, ParseError> {
        let native = self.eat(TokenKind::Native).is_some();
        self.expect(TokenKind::TypeMapper)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LeftParen)?;
        let param = self.parse_parameter()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::LeftParen)?;
        let return_type = self.parse_type()?;
        self.expect(TokenKind::RightParen)?;

        let body = if native {
            self.expect_semicolon()?;
            None
        } else {
            Some(self.parse_block()?)
        };

        Ok(self.arena.alloc(TypeMapperDef {
            annotations,
            native,
            name,
            param,
            return_type,
            body,
            span: self.span_from(start),
        }))
    }

    /// Parse `const valueType name = expr;`.
    fn parse_constant(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast ConstantDef<'ast>, ParseError> {
        self.expect(TokenKind::Const)?;
        let token = *self.peek();
        if !token.kind.is_value_type() {
            let found = token.kind.description();
            return Err(ParseError::new(
                ParseErrorKind::ExpectedType,
                token.span,
                format!("expected value type for constant, found {found}"),
            ));
        }
        let ty: TypeName<'ast> = self.parse_base_type()?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expr(0)?;
        self.expect_semicolon()?;
        Ok(self.arena.alloc(ConstantDef {
            annotations,
            ty,
            name,
            value,
            span: self.span_from(start),
        }))
    }

    /// Parse `T name (= expr)?;` at top level.
    fn parse_global_var(
        &mut self,
        annotations: &'ast [AnnotationAttachment<'ast>],
        start: Span,
    ) -> Result<&'ast GlobalVarDef<'ast>, ParseError> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let init = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        self.expect_semicolon()?;
        Ok(self.arena.alloc(GlobalVarDef {
            annotations,
            ty,
            name,
            init,
            span: self.span_from(start),
        }))
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// Run `member` for each member of a `{ ... }` body whose `{` has been
    /// consumed, then consume (or assume) the closing `}`.
    ///
    /// A failed member is reported and skipped. The loop also stops at a
    /// definition keyword, except for `native action`.
    fn parse_body_members(
        &mut self,
        mut member: impl FnMut(&mut Self) -> Result<(), ParseError>,
    ) -> TokenMarker {
        loop {
            let kind = self.peek().kind;
            let native_action = kind == TokenKind::Native && self.check_nth(1, TokenKind::Action);
            if kind == TokenKind::RightBrace
                || kind == TokenKind::Eof
                || (kind.starts_definition() && !native_action)
            {
                break;
            }

            let start = self.position;
            if let Err(err) = member(self) {
                self.recover_member(err, start);
            }
        }
        self.expect_closing_brace()
    }

    fn member_error(&self, expected: &str) -> ParseError {
        let token = *self.peek();
        if token.kind == TokenKind::Eof {
            return ParseError::unexpected_eof(token.span);
        }
        ParseError::new(
            ParseErrorKind::ExpectedMember,
            token.span,
            format!("expected {expected}, found {}", token.kind.description()),
        )
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Parse zero or more `@name { ... }` attachments.
    pub(super) fn parse_annotation_attachments(
        &mut self,
    ) -> Result<&'ast [AnnotationAttachment<'ast>], ParseError> {
        let mut annotations = BVec::new_in(self.arena);
        while self.check(TokenKind::At) {
            annotations.push(self.parse_annotation_attachment()?);
        }
        Ok(annotations.into_bump_slice())
    }

    /// Parse `@pkg:Name { key: value, ... }`.
    fn parse_annotation_attachment(&mut self) -> Result<AnnotationAttachment<'ast>, ParseError> {
        self.nested(|p| {
            let at = p.expect(TokenKind::At)?;
            let name = p.parse_name_reference()?;
            p.expect(TokenKind::LeftBrace)?;

            let mut attributes = BVec::new_in(p.arena);
            if !p.check(TokenKind::RightBrace) {
                loop {
                    let key: Ident<'ast> = p.expect_ident()?;
                    p.expect(TokenKind::Colon)?;
                    let value = p.parse_annotation_value()?;
                    attributes.push(AnnotationAttribute {
                        key,
                        value,
                        span: key.span.merge(value.span()),
                    });
                    if p.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }

            let close = p.expect(TokenKind::RightBrace)?;
            Ok(AnnotationAttachment {
                name,
                attributes: attributes.into_bump_slice(),
                span: at.span.merge(close.span),
            })
        })
    }

    /// Parse a literal, a nested annotation, or `[value, ...]`.
    fn parse_annotation_value(&mut self) -> Result<AnnotationValue<'ast>, ParseError> {
        match self.peek().kind {
            TokenKind::At => {
                let nested = self.parse_annotation_attachment()?;
                Ok(AnnotationValue::Annotation(self.arena.alloc(nested)))
            }
            TokenKind::LeftBracket => self.nested(|p| {
                let open = p.advance();
                let mut elements = BVec::new_in(p.arena);
                if !p.check(TokenKind::RightBracket) {
                    loop {
                        elements.push(p.parse_annotation_value()?);
                        if p.eat(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                }
                let close = p.expect(TokenKind::RightBracket)?;
                Ok(AnnotationValue::Array {
                    elements: elements.into_bump_slice(),
                    span: open.span.merge(close.span),
                })
            }),
            _ => Ok(AnnotationValue::Literal(self.parse_simple_literal()?)),
        }
    }

    /// Parse `-? number`, a string, a boolean or `null`.
    fn parse_simple_literal(&mut self) -> Result<LiteralExpr<'ast>, ParseError> {
        let minus = self.check(TokenKind::Minus)
            && matches!(
                self.peek_nth(1).kind,
                TokenKind::IntegerLiteral | TokenKind::FloatLiteral
            );
        let sign = if minus { Some(self.advance()) } else { None };

        let token = *self.peek();
        if token.kind == TokenKind::Eof {
            return Err(ParseError::unexpected_eof(token.span));
        }
        let mut literal = Self::literal_from(token)?;
        self.advance();
        if let Some(sign) = sign {
            literal.negative = true;
            literal.span = sign.span.merge(token.span);
        }
        Ok(literal)
    }
}
