//! Expression parsing using Pratt parsing (precedence climbing).
//!
//! Binary operators are folded by binding power. Casts, conversions and
//! unary operators take a single prefix-level operand, so `(int) x + 1`
//! is `Add(Cast(int, x), 1)`.

use super::parser::Parser;
use crate::ast::expr::*;
use crate::ast::{BinaryOp, NameReference, ParseError, ParseErrorKind, UnaryOp};
use crate::lexer::{Span, Token, TokenKind};
use bumpalo::collections::Vec as BumpVec;

impl<'ast> Parser<'ast> {
    /// Parse an expression with a minimum binding power.
    ///
    /// Pass `0` to parse a full expression.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<Expr<'ast>, ParseError> {
        self.nested(|p| p.parse_expr_bp(min_bp))
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr<'ast>, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some(op) = BinaryOp::from_token(self.peek().kind) {
            let (left_bp, right_bp) = op.binding_power();
            if left_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr(right_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary(self.arena.alloc(BinaryExpr {
                left: lhs,
                op,
                right: rhs,
                span,
            }));
        }

        Ok(lhs)
    }

    /// Parse a prefix form or a primary expression.
    fn parse_prefix(&mut self) -> Result<Expr<'ast>, ParseError> {
        let token = *self.peek();
        match token.kind {
            // `-5` is a literal, not a negation
            TokenKind::Minus
                if matches!(
                    self.peek_nth(1).kind,
                    TokenKind::IntegerLiteral | TokenKind::FloatLiteral
                ) =>
            {
                self.advance();
                let literal = self.advance();
                let mut lit = Self::literal_from(literal)?;
                lit.negative = true;
                lit.span = token.span.merge(literal.span);
                Ok(Expr::Literal(lit))
            }
            TokenKind::Plus | TokenKind::Minus | TokenKind::Bang => {
                self.advance();
                let op = UnaryOp::from_token(token.kind)
                    .ok_or_else(|| ParseError::unexpected_token(token.span, token.lexeme))?;
                let operand = self.parse_expr(UnaryOp::binding_power())?;
                let span = token.span.merge(operand.span());
                Ok(Expr::Unary(self.arena.alloc(UnaryExpr { op, operand, span })))
            }
            TokenKind::Less => self.parse_conversion(),
            TokenKind::LeftParen => {
                if self.is_cast() {
                    self.parse_cast()
                } else {
                    self.parse_paren()
                }
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr<'ast>, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::IntegerLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral => {
                self.advance();
                Ok(Expr::Literal(Self::literal_from(token)?))
            }
            TokenKind::BacktickLiteral => {
                self.advance();
                Ok(Expr::Template(TemplateExpr {
                    text: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_map_struct_literal(),
            TokenKind::Identifier => {
                let name = self.parse_name_reference()?;
                if self.check(TokenKind::LeftParen) {
                    let (args, close) = self.parse_arguments()?;
                    let span = name.span.merge(close);
                    Ok(Expr::FunctionCall(self.arena.alloc(FunctionCallExpr { name, args, span })))
                } else {
                    Ok(Expr::VarRef(self.parse_var_ref_suffixes(name)?))
                }
            }
            k if k.is_value_type() || k.is_builtin_reference_type() => self.parse_type_access(),
            TokenKind::Create => Err(ParseError::new(
                ParseErrorKind::ExpectedExpression,
                token.span,
                "connector creation is only allowed as an initializer",
            )),
            TokenKind::Eof => Err(ParseError::unexpected_eof(token.span)),
            _ => Err(ParseError::expected_expression(
                token.span,
                token.kind.description(),
            )),
        }
    }

    /// Build a literal node from a literal token.
    pub(super) fn literal_from(token: Token<'ast>) -> Result<LiteralExpr<'ast>, ParseError> {
        let kind = match token.kind {
            TokenKind::IntegerLiteral => LiteralKind::Integer(token.lexeme),
            TokenKind::FloatLiteral => LiteralKind::Float(token.lexeme),
            TokenKind::StringLiteral => LiteralKind::String(token.lexeme),
            TokenKind::BooleanLiteral => LiteralKind::Boolean(token.lexeme == "true"),
            TokenKind::NullLiteral => LiteralKind::Null,
            _ => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidLiteral,
                    token.span,
                    format!("expected literal, found {}", token.kind.description()),
                ));
            }
        };
        Ok(LiteralExpr {
            kind,
            negative: false,
            span: token.span,
        })
    }

    /// `(T) operand`
    fn parse_cast(&mut self) -> Result<Expr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftParen)?;
        let target = self.parse_type()?;
        self.expect(TokenKind::RightParen)?;
        let operand = self.parse_expr(UnaryOp::binding_power())?;
        let span = open.span.merge(operand.span());
        Ok(Expr::Cast(self.arena.alloc(CastExpr {
            target,
            operand,
            span,
        })))
    }

    /// `<T> operand`
    fn parse_conversion(&mut self) -> Result<Expr<'ast>, ParseError> {
        let open = self.expect(TokenKind::Less)?;
        let target = self.parse_type()?;
        self.expect(TokenKind::Greater)?;
        let operand = self.parse_expr(UnaryOp::binding_power())?;
        let span = open.span.merge(operand.span());
        Ok(Expr::Conversion(self.arena.alloc(ConversionExpr {
            target,
            operand,
            span,
        })))
    }

    /// `(expr)`
    fn parse_paren(&mut self) -> Result<Expr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expr(0)?;
        let close = self.expect(TokenKind::RightParen)?;
        let span = open.span.merge(close.span);
        Ok(Expr::Paren(self.arena.alloc(ParenExpr { expr, span })))
    }

    /// `valueType.member` or `builtInType.member`
    fn parse_type_access(&mut self) -> Result<Expr<'ast>, ParseError> {
        let ty = self.parse_base_type()?;
        self.expect(TokenKind::Dot)?;
        let member = self.expect_ident()?;
        let span = ty.span.merge(member.span);
        Ok(Expr::TypeAccess(self.arena.alloc(TypeAccessExpr { ty, member, span })))
    }

    /// `[a, b, c]`
    fn parse_array_literal(&mut self) -> Result<Expr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftBracket)?;
        let elements = if self.check(TokenKind::RightBracket) {
            &[][..]
        } else {
            self.parse_expression_list()?
        };
        let close = self.expect(TokenKind::RightBracket)?;
        let span = open.span.merge(close.span);
        Ok(Expr::ArrayLiteral(self.arena.alloc(ArrayLiteralExpr { elements, span })))
    }

    /// `{key: value, ...}`
    ///
    /// A bare `name:` is always a key, never the start of `pkg:name`.
    fn parse_map_struct_literal(&mut self) -> Result<Expr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let mut entries = BumpVec::new_in(self.arena);

        if !self.check(TokenKind::RightBrace) {
            loop {
                let bare_key =
                    self.check(TokenKind::Identifier) && self.check_nth(1, TokenKind::Colon);
                let key = if bare_key {
                    let ident = self.expect_ident()?;
                    let var = self.arena.alloc(VarRef {
                        kind: VarRefKind::Simple(NameReference::simple(ident)),
                        span: ident.span,
                    });
                    Expr::VarRef(var)
                } else {
                    self.parse_expr(0)?
                };
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expr(0)?;
                let span = key.span().merge(value.span());
                entries.push(KeyValue { key, value, span });

                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let close = self.expect(TokenKind::RightBrace)?;
        let span = open.span.merge(close.span);
        Ok(Expr::MapStructLiteral(self.arena.alloc(MapStructLiteralExpr {
            entries: entries.into_bump_slice(),
            span,
        })))
    }

    /// Parse a variable reference: a name followed by any chain of index,
    /// field and xml-attribute suffixes.
    pub fn parse_variable_reference(&mut self) -> Result<&'ast VarRef<'ast>, ParseError> {
        let name = self.parse_name_reference()?;
        self.parse_var_ref_suffixes(name)
    }

    /// Apply suffixes to `name` left to right until none matches.
    fn parse_var_ref_suffixes(
        &mut self,
        name: NameReference<'ast>,
    ) -> Result<&'ast VarRef<'ast>, ParseError> {
        let mut base: &'ast VarRef<'ast> = self.arena.alloc(VarRef {
            kind: VarRefKind::Simple(name),
            span: name.span,
        });

        loop {
            let (kind, end) = match self.peek().kind {
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expr(0)?;
                    let close = self.expect(TokenKind::RightBracket)?;
                    (VarRefKind::Index { base, index }, close.span)
                }
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_ident()?;
                    (VarRefKind::Field { base, field }, field.span)
                }
                TokenKind::At => {
                    let at = self.advance();
                    let (selector, end) = if self.check(TokenKind::Identifier) {
                        let name = self.expect_ident()?;
                        (XmlAttributeSelector::Name(name), name.span)
                    } else if self.eat(TokenKind::LeftBracket).is_some() {
                        let expr = self.parse_expr(0)?;
                        let close = self.expect(TokenKind::RightBracket)?;
                        (XmlAttributeSelector::Expr(expr), close.span)
                    } else {
                        (XmlAttributeSelector::All, at.span)
                    };
                    (VarRefKind::XmlAttribute { base, selector }, end)
                }
                _ => break,
            };
            let span = base.span.merge(end);
            base = self.arena.alloc(VarRef { kind, span });
        }

        Ok(base)
    }

    /// Parse `(expr, ...)`, returning the arguments and the span of `)`.
    pub(super) fn parse_arguments(&mut self) -> Result<(&'ast [Expr<'ast>], Span), ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let args = if self.check(TokenKind::RightParen) {
            &[][..]
        } else {
            self.parse_expression_list()?
        };
        let close = self.expect(TokenKind::RightParen)?;
        Ok((args, close.span))
    }

    /// Parse one or more comma-separated expressions.
    pub(super) fn parse_expression_list(&mut self) -> Result<&'ast [Expr<'ast>], ParseError> {
        let mut exprs = BumpVec::new_in(self.arena);
        loop {
            exprs.push(self.parse_expr(0)?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        Ok(exprs.into_bump_slice())
    }

    /// Parse the right-hand side of `=` in a definition or assignment:
    /// a connector creation, an action invocation or an expression.
    pub fn parse_initializer(&mut self) -> Result<Expr<'ast>, ParseError> {
        if self.check(TokenKind::Create) {
            Ok(Expr::ConnectorInit(self.parse_connector_init()?))
        } else if self.is_action_invocation() {
            Ok(Expr::ActionInvocation(self.parse_action_invocation()?))
        } else {
            self.parse_expr(0)
        }
    }

    /// `create pkg:Connector(args)`
    fn parse_connector_init(&mut self) -> Result<&'ast ConnectorInitExpr<'ast>, ParseError> {
        let create = self.expect(TokenKind::Create)?;
        let connector = self.parse_name_reference()?;
        let (args, close) = self.parse_arguments()?;
        Ok(self.arena.alloc(ConnectorInitExpr {
            connector,
            args,
            span: create.span.merge(close),
        }))
    }

    /// `pkg:Connector.action(args)`
    pub(super) fn parse_action_invocation(
        &mut self,
    ) -> Result<&'ast ActionInvocationExpr<'ast>, ParseError> {
        let connector = self.parse_name_reference()?;
        self.expect(TokenKind::Dot)?;
        let action = self.expect_ident()?;
        let (args, close) = self.parse_arguments()?;
        Ok(self.arena.alloc(ActionInvocationExpr {
            connector,
            action,
            args,
            span: connector.span.merge(close),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    /// Render an expression as an s-expression for structural assertions.
    fn sexp(expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => {
                let text = match lit.kind {
                    LiteralKind::Integer(t) | LiteralKind::Float(t) | LiteralKind::String(t) => {
                        t.to_string()
                    }
                    LiteralKind::Boolean(b) => b.to_string(),
                    LiteralKind::Null => "null".to_string(),
                };
                if lit.negative {
                    format!("-{text}")
                } else {
                    text
                }
            }
            Expr::ArrayLiteral(a) => {
                let parts: Vec<_> = a.elements.iter().map(sexp).collect();
                format!("[{}]", parts.join(" "))
            }
            Expr::MapStructLiteral(m) => {
                let parts: Vec<_> = m
                    .entries
                    .iter()
                    .map(|kv| format!("{}:{}", sexp(&kv.key), sexp(&kv.value)))
                    .collect();
                format!("{{{}}}", parts.join(" "))
            }
            Expr::Template(t) => t.text.to_string(),
            Expr::VarRef(v) => var(v),
            Expr::FunctionCall(c) => {
                let args: Vec<_> = c.args.iter().map(sexp).collect();
                format!("(call {} {})", c.name, args.join(" "))
            }
            Expr::ActionInvocation(a) => {
                format!("(action {}.{} {})", a.connector, a.action, a.args.len())
            }
            Expr::ConnectorInit(c) => format!("(create {} {})", c.connector, c.args.len()),
            Expr::TypeAccess(t) => format!("(type {}.{})", t.ty, t.member),
            Expr::Cast(c) => format!("(cast {} {})", c.target, sexp(&c.operand)),
            Expr::Conversion(c) => format!("(conv {} {})", c.target, sexp(&c.operand)),
            Expr::Unary(u) => format!("({} {})", u.op, sexp(&u.operand)),
            Expr::Binary(b) => format!("({} {} {})", b.op, sexp(&b.left), sexp(&b.right)),
            Expr::Paren(p) => format!("(paren {})", sexp(&p.expr)),
        }
    }

    fn var(v: &VarRef) -> String {
        match v.kind {
            VarRefKind::Simple(name) => name.to_string(),
            VarRefKind::Index { base, index } => format!("{}[{}]", var(base), sexp(&index)),
            VarRefKind::Field { base, field } => format!("{}.{}", var(base), field),
            VarRefKind::XmlAttribute { base, selector } => match selector {
                XmlAttributeSelector::All => format!("{}@", var(base)),
                XmlAttributeSelector::Name(name) => format!("{}@{}", var(base), name),
                XmlAttributeSelector::Expr(e) => format!("{}@[{}]", var(base), sexp(&e)),
            },
        }
    }

    fn parse(source: &str) -> String {
        let arena = Bump::new();
        let mut parser = Parser::new(source, &arena);
        let expr = parser.parse_expr(0).unwrap();
        assert!(parser.is_eof(), "trailing input in {source:?}");
        assert!(!parser.has_errors(), "diagnostics for {source:?}");
        sexp(&expr)
    }

    #[test]
    fn parse_precedence() {
        assert_eq!(parse("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(parse("1 * 2 + 3"), "(+ (* 1 2) 3)");
        assert_eq!(parse("a || b && c"), "(|| a (&& b c))");
        assert_eq!(parse("a == b < c"), "(== a (< b c))");
        assert_eq!(parse("a + b >= c % d"), "(>= (+ a b) (% c d))");
    }

    #[test]
    fn parse_left_associative() {
        assert_eq!(parse("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(parse("a / b * c"), "(* (/ a b) c)");
    }

    #[test]
    fn parse_power_is_right_associative() {
        assert_eq!(parse("2 ^ 3 ^ 2"), "(^ 2 (^ 3 2))");
        assert_eq!(parse("2 * 3 ^ 2"), "(* 2 (^ 3 2))");
    }

    #[test]
    fn parse_cast_binds_one_operand() {
        assert_eq!(parse("(int) x + 1"), "(+ (cast int x) 1)");
        assert_eq!(parse("(string[]) a[0]"), "(cast string[] a[0])");
    }

    #[test]
    fn parse_braced_when_not_a_cast() {
        assert_eq!(parse("(x) - y"), "(- (paren x) y)");
        assert_eq!(parse("(a + b) * c"), "(* (paren (+ a b)) c)");
    }

    #[test]
    fn parse_conversion() {
        assert_eq!(parse("<json> m + 1"), "(+ (conv json m) 1)");
        assert_eq!(parse("<xml<order>> doc"), "(conv xml<order> doc)");
    }

    #[test]
    fn parse_unary() {
        assert_eq!(parse("!a && b"), "(&& (! a) b)");
        assert_eq!(parse("-x ^ 2"), "(^ (- x) 2)");
        assert_eq!(parse("+ x"), "(+ x)");
    }

    #[test]
    fn parse_negative_literals() {
        assert_eq!(parse("-5"), "-5");
        assert_eq!(parse("a - 5"), "(- a 5)");
        assert_eq!(parse("-1.5e3"), "-1.5e3");
    }

    #[test]
    fn parse_literals() {
        assert_eq!(parse("true"), "true");
        assert_eq!(parse("null"), "null");
        assert_eq!(parse("\"hi\""), "\"hi\"");
        assert_eq!(parse("0x1F"), "0x1F");
    }

    #[test]
    fn parse_reference_chain() {
        let arena = Bump::new();
        let mut parser = Parser::new("a.b[0].c", &arena);
        let expr = parser.parse_expr(0).unwrap();
        let var_ref = expr.as_var_ref().unwrap();

        assert_eq!(var(var_ref), "a.b[0].c");
        assert_eq!(var_ref.chain_len(), 4);
        assert_eq!(var_ref.root().name.name, "a");
        match var_ref.kind {
            VarRefKind::Field { base, field } => {
                assert_eq!(field.name, "c");
                assert!(matches!(base.kind, VarRefKind::Index { .. }));
            }
            _ => panic!("Expected field access"),
        }
        assert_eq!((var_ref.span.start, var_ref.span.end), (0, 8));
    }

    #[test]
    fn parse_xml_attribute_suffixes() {
        assert_eq!(parse("doc@"), "doc@");
        assert_eq!(parse("doc@id"), "doc@id");
        assert_eq!(parse("doc@[\"{urn:a}id\"]"), "doc@[\"{urn:a}id\"]");
        assert_eq!(parse("p.items[1]@lang"), "p.items[1]@lang");
    }

    #[test]
    fn parse_qualified_names() {
        assert_eq!(
            parse("system:println(\"x\", 1)"),
            "(call system:println \"x\" 1)"
        );
        assert_eq!(parse("pkg:value.field"), "pkg:value.field");
        assert_eq!(parse("f()"), "(call f )");
    }

    #[test]
    fn parse_collection_literals() {
        assert_eq!(parse("[1, 2, [3]]"), "[1 2 [3]]");
        assert_eq!(parse("[]"), "[]");
        assert_eq!(parse("{}"), "{}");
        assert_eq!(
            parse("{\"name\": n, age: 1 + 2}"),
            "{\"name\":n age:(+ 1 2)}"
        );
    }

    #[test]
    fn map_keys_are_never_qualified() {
        assert_eq!(parse("{a: b, c: d}"), "{a:b c:d}");
    }

    #[test]
    fn parse_type_access() {
        assert_eq!(parse("int.max"), "(type int.max)");
        assert_eq!(parse("json.parse"), "(type json.parse)");
    }

    #[test]
    fn parse_template() {
        assert_eq!(parse("`<a>{{x}}</a>`"), "`<a>{{x}}</a>`");
    }

    #[test]
    fn parse_initializer_forms() {
        let arena = Bump::new();
        let mut parser = Parser::new("create http:ClientConnector(\"http://x\")", &arena);
        let init = parser.parse_initializer().unwrap();
        assert_eq!(sexp(&init), "(create http:ClientConnector 1)");

        let mut parser = Parser::new("http:ClientConnector.get(c, \"/\", m)", &arena);
        let init = parser.parse_initializer().unwrap();
        assert_eq!(sexp(&init), "(action http:ClientConnector.get 3)");

        let mut parser = Parser::new("conn.field", &arena);
        let init = parser.parse_initializer().unwrap();
        assert_eq!(sexp(&init), "conn.field");
    }

    #[test]
    fn create_outside_initializer_is_an_error() {
        let arena = Bump::new();
        let mut parser = Parser::new("1 + create C()", &arena);
        let err = parser.parse_expr(0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);
    }

    #[test]
    fn missing_operand() {
        let arena = Bump::new();
        let mut parser = Parser::new("1 +", &arena);
        let err = parser.parse_expr(0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);

        let mut parser = Parser::new("1 + ;", &arena);
        let err = parser.parse_expr(0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);
    }

    #[test]
    fn binary_span_covers_operands() {
        let arena = Bump::new();
        let mut parser = Parser::new("a + bc", &arena);
        let expr = parser.parse_expr(0).unwrap();
        assert_eq!((expr.span().start, expr.span().end), (0, 6));
    }

    #[test]
    fn deep_parentheses_hit_the_depth_limit() {
        let arena = Bump::new();
        let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        let options = crate::ast::ParseOptions::default().with_max_depth(32);
        let mut parser = Parser::with_options(&source, &arena, options);
        let err = parser.parse_expr(0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
    }
}
