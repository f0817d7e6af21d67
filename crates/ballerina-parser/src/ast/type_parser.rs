//! Type parsing functions for Ballerina.
//!
//! Implements parsing of type names including:
//! - `any` and the value types
//! - Built-in reference types with their constraints
//! - Package-qualified user-defined names
//! - Array suffixes, folded left to right into nested `Array` nodes

use super::parser::Parser;
use crate::ast::types::*;
use crate::ast::{Ident, NameReference, ParseError};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a complete type name.
    ///
    /// Grammar: `BASE ('[' ']')*`
    ///
    /// Examples:
    /// - `int`
    /// - `map<string>[]`
    /// - `pkg:Person[][]`
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_type(&mut self) -> Result<TypeName<'ast>, ParseError> {
        self.nested(|p| {
            let base = p.parse_base_type()?;
            Ok(p.parse_array_suffixes(base))
        })
    }

    /// Wrap `element` once per `[]` pair that follows.
    ///
    /// A `[` not directly closed by `]` is left alone; it is an index.
    pub(super) fn parse_array_suffixes(&mut self, element: TypeName<'ast>) -> TypeName<'ast> {
        let mut ty = element;
        while self.check(TokenKind::LeftBracket) && self.check_nth(1, TokenKind::RightBracket) {
            self.advance();
            let close = self.advance();
            let span = ty.span.merge(close.span);
            ty = TypeName::new(TypeKind::Array(self.arena.alloc(ty)), span);
        }
        ty
    }

    /// Parse a type name without array suffixes.
    pub(super) fn parse_base_type(&mut self) -> Result<TypeName<'ast>, ParseError> {
        let token = *self.peek();
        let value = |v| Some(TypeKind::Value(v));
        let simple = match token.kind {
            TokenKind::Any => Some(TypeKind::Any),
            TokenKind::Boolean => value(ValueType::Boolean),
            TokenKind::Int => value(ValueType::Int),
            TokenKind::Float => value(ValueType::Float),
            TokenKind::String => value(ValueType::String),
            TokenKind::Blob => value(ValueType::Blob),
            TokenKind::Message => Some(TypeKind::BuiltIn(BuiltInType::Message)),
            TokenKind::Datatable => Some(TypeKind::BuiltIn(BuiltInType::Datatable)),
            _ => None,
        };
        if let Some(kind) = simple {
            self.advance();
            return Ok(TypeName::new(kind, token.span));
        }

        let kind = match token.kind {
            TokenKind::Map => {
                self.advance();
                let constraint = if self.eat(TokenKind::Less).is_some() {
                    let inner = self.parse_type()?;
                    self.expect(TokenKind::Greater)?;
                    Some(&*self.arena.alloc(inner))
                } else {
                    None
                };
                TypeKind::BuiltIn(BuiltInType::Map(constraint))
            }
            TokenKind::Xml => {
                self.advance();
                TypeKind::BuiltIn(BuiltInType::Xml(self.parse_xml_constraint()?))
            }
            TokenKind::XmlDocument => {
                self.advance();
                TypeKind::BuiltIn(BuiltInType::XmlDocument(self.parse_xml_constraint()?))
            }
            TokenKind::Json => {
                self.advance();
                TypeKind::BuiltIn(BuiltInType::Json(self.parse_schema_ref()?))
            }
            TokenKind::Identifier => TypeKind::Named(self.parse_name_reference()?),
            _ => return Err(self.type_error()),
        };

        Ok(TypeName::new(kind, self.span_from(token.span)))
    }

    /// Parse `name` or `pkg:name`.
    pub fn parse_name_reference(&mut self) -> Result<NameReference<'ast>, ParseError> {
        let first = self.expect_ident()?;
        if self.check(TokenKind::Colon) && self.check_nth(1, TokenKind::Identifier) {
            self.advance();
            let name = self.expect_ident()?;
            Ok(NameReference::qualified(first, name))
        } else {
            Ok(NameReference::simple(first))
        }
    }

    /// Parse the optional `<{"ns"}local>` after `xml` or `xmlDocument`.
    fn parse_xml_constraint(&mut self) -> Result<Option<XmlConstraint<'ast>>, ParseError> {
        let Some(open) = self.eat(TokenKind::Less) else {
            return Ok(None);
        };
        let namespace = if self.eat(TokenKind::LeftBrace).is_some() {
            let uri = self.expect(TokenKind::StringLiteral)?;
            self.expect(TokenKind::RightBrace)?;
            Some(uri.lexeme)
        } else {
            None
        };
        let local: Ident<'ast> = self.expect_ident()?;
        let close = self.expect(TokenKind::Greater)?;
        Ok(Some(XmlConstraint {
            namespace,
            local,
            span: open.span.merge(close.span),
        }))
    }

    /// Parse the optional `<{"schema"}>` after `json`.
    fn parse_schema_ref(&mut self) -> Result<Option<SchemaRef<'ast>>, ParseError> {
        let Some(open) = self.eat(TokenKind::Less) else {
            return Ok(None);
        };
        self.expect(TokenKind::LeftBrace)?;
        let location = self.expect(TokenKind::StringLiteral)?;
        self.expect(TokenKind::RightBrace)?;
        let close = self.expect(TokenKind::Greater)?;
        Ok(Some(SchemaRef {
            location: location.lexeme,
            span: open.span.merge(close.span),
        }))
    }

    fn type_error(&self) -> ParseError {
        let token = *self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::unexpected_eof(token.span)
        } else {
            ParseError::expected_type(token.span, token.kind.description())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ParseErrorKind;
    use bumpalo::Bump;

    #[test]
    fn parse_value_types() {
        let cases = [
            ("boolean", ValueType::Boolean),
            ("int", ValueType::Int),
            ("float", ValueType::Float),
            ("string", ValueType::String),
            ("blob", ValueType::Blob),
        ];
        for (source, expected) in cases {
            let arena = Bump::new();
            let mut parser = Parser::new(source, &arena);
            let ty = parser.parse_type().unwrap();
            assert_eq!(ty.kind, TypeKind::Value(expected));
        }
    }

    #[test]
    fn parse_any() {
        let arena = Bump::new();
        let mut parser = Parser::new("any", &arena);
        assert_eq!(parser.parse_type().unwrap().kind, TypeKind::Any);
    }

    #[test]
    fn parse_array_depth() {
        let arena = Bump::new();
        let mut parser = Parser::new("int[][]", &arena);
        let ty = parser.parse_type().unwrap();

        assert_eq!(ty.array_depth(), 2);
        match ty.kind {
            TypeKind::Array(inner) => match inner.kind {
                TypeKind::Array(base) => assert_eq!(base.kind, TypeKind::Value(ValueType::Int)),
                _ => panic!("Expected nested array"),
            },
            _ => panic!("Expected array"),
        }
        assert_eq!((ty.span.start, ty.span.end), (0, 7));
    }

    #[test]
    fn index_bracket_is_not_a_suffix() {
        let arena = Bump::new();
        let mut parser = Parser::new("int[0]", &arena);
        let ty = parser.parse_type().unwrap();
        assert!(!ty.is_array());
        assert!(parser.check(TokenKind::LeftBracket));
    }

    #[test]
    fn parse_qualified_name() {
        let arena = Bump::new();
        let mut parser = Parser::new("http:ClientConnector", &arena);
        let ty = parser.parse_type().unwrap();
        match ty.kind {
            TypeKind::Named(name) => {
                assert_eq!(name.package.map(|p| p.name), Some("http"));
                assert_eq!(name.name.name, "ClientConnector");
            }
            _ => panic!("Expected named type"),
        }
    }

    #[test]
    fn parse_constrained_map() {
        let arena = Bump::new();
        let mut parser = Parser::new("map<string[]>", &arena);
        let ty = parser.parse_type().unwrap();
        match ty.kind {
            TypeKind::BuiltIn(BuiltInType::Map(Some(inner))) => assert_eq!(inner.array_depth(), 1),
            _ => panic!("Expected constrained map"),
        }
        assert_eq!(ty.to_string(), "map<string[]>");
    }

    #[test]
    fn parse_xml_with_namespace() {
        let arena = Bump::new();
        let mut parser = Parser::new("xml<{\"urn:orders\"}order>", &arena);
        let ty = parser.parse_type().unwrap();
        match ty.kind {
            TypeKind::BuiltIn(BuiltInType::Xml(Some(c))) => {
                assert_eq!(c.namespace, Some("\"urn:orders\""));
                assert_eq!(c.local.name, "order");
            }
            _ => panic!("Expected constrained xml"),
        }
    }

    #[test]
    fn parse_xml_document_local_only() {
        let arena = Bump::new();
        let mut parser = Parser::new("xmlDocument<order>", &arena);
        let ty = parser.parse_type().unwrap();
        match ty.kind {
            TypeKind::BuiltIn(BuiltInType::XmlDocument(Some(c))) => {
                assert!(c.namespace.is_none());
                assert_eq!(c.local.name, "order");
            }
            _ => panic!("Expected constrained xmlDocument"),
        }
    }

    #[test]
    fn parse_json_schema() {
        let arena = Bump::new();
        let mut parser = Parser::new("json<{\"person.json\"}>", &arena);
        let ty = parser.parse_type().unwrap();
        match ty.kind {
            TypeKind::BuiltIn(BuiltInType::Json(Some(schema))) => {
                assert_eq!(schema.location, "\"person.json\"");
            }
            _ => panic!("Expected json with schema"),
        }
    }

    #[test]
    fn parse_plain_builtins() {
        for keyword in ["message", "datatable", "json"] {
            let arena = Bump::new();
            let mut parser = Parser::new(keyword, &arena);
            match parser.parse_type().unwrap().kind {
                TypeKind::BuiltIn(builtin) => assert_eq!(builtin.keyword(), keyword),
                _ => panic!("Expected built-in type"),
            }
        }
    }

    #[test]
    fn reject_non_type() {
        let arena = Bump::new();
        let mut parser = Parser::new("return", &arena);
        let err = parser.parse_type().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedType);
    }

    #[test]
    fn unclosed_map_constraint() {
        let arena = Bump::new();
        let mut parser = Parser::new("map<int x", &arena);
        let err = parser.parse_type().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
    }
}
