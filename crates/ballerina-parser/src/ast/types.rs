//! Type name AST nodes.
//!
//! ```text
//! int                      // value type
//! any                      // any
//! map<string>              // built-in reference type with constraint
//! xml<{"urn:ns"}order>     // xml with namespace and local name
//! json<{"schema.json"}>    // json with schema
//! pkg:Person               // user-defined name
//! int[][]                  // Array(Array(int))
//! ```

use crate::ast::{Ident, NameReference};
use crate::lexer::Span;
use std::fmt;

/// A type name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeName<'ast> {
    pub kind: TypeKind<'ast>,
    pub span: Span,
}

/// The shape of a [`TypeName`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeKind<'ast> {
    /// `any`
    Any,
    /// A primitive value type.
    Value(ValueType),
    /// A built-in reference type.
    BuiltIn(BuiltInType<'ast>),
    /// A user-defined type name.
    Named(NameReference<'ast>),
    /// One array dimension over the element type.
    Array(&'ast TypeName<'ast>),
}

/// Primitive value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Int,
    Float,
    String,
    Blob,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Blob => "blob",
        }
    }
}

/// Built-in reference types and their optional constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuiltInType<'ast> {
    /// `message`
    Message,
    /// `map` or `map<T>`
    Map(Option<&'ast TypeName<'ast>>),
    /// `xml` or `xml<{ns}local>`
    Xml(Option<XmlConstraint<'ast>>),
    /// `xmlDocument` or `xmlDocument<{ns}local>`
    XmlDocument(Option<XmlConstraint<'ast>>),
    /// `json` or `json<{schema}>`
    Json(Option<SchemaRef<'ast>>),
    /// `datatable`
    Datatable,
}

impl BuiltInType<'_> {
    /// The keyword that introduces this type.
    pub fn keyword(&self) -> &'static str {
        match self {
            BuiltInType::Message => "message",
            BuiltInType::Map(_) => "map",
            BuiltInType::Xml(_) => "xml",
            BuiltInType::XmlDocument(_) => "xmlDocument",
            BuiltInType::Json(_) => "json",
            BuiltInType::Datatable => "datatable",
        }
    }
}

/// The `<{"ns"}local>` constraint of an xml type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XmlConstraint<'ast> {
    /// Namespace URI as written, including quotes.
    pub namespace: Option<&'ast str>,
    /// Local element name.
    pub local: Ident<'ast>,
    pub span: Span,
}

/// The `<{"schema"}>` constraint of a json type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaRef<'ast> {
    /// Schema location as written, including quotes.
    pub location: &'ast str,
    pub span: Span,
}

impl<'ast> TypeName<'ast> {
    pub fn new(kind: TypeKind<'ast>, span: Span) -> Self {
        Self { kind, span }
    }

    /// Number of array dimensions wrapped around the innermost type.
    pub fn array_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let TypeKind::Array(element) = current.kind {
            depth += 1;
            current = element;
        }
        depth
    }

    /// The innermost non-array type.
    pub fn base(&self) -> &TypeName<'ast> {
        let mut current = self;
        while let TypeKind::Array(element) = current.kind {
            current = element;
        }
        current
    }

    /// Whether this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Any => write!(f, "any"),
            TypeKind::Value(value) => write!(f, "{}", value.as_str()),
            TypeKind::Named(name) => write!(f, "{name}"),
            TypeKind::Array(element) => write!(f, "{element}[]"),
            TypeKind::BuiltIn(builtin) => {
                write!(f, "{}", builtin.keyword())?;
                match builtin {
                    BuiltInType::Map(Some(constraint)) => write!(f, "<{constraint}>"),
                    BuiltInType::Xml(Some(c)) | BuiltInType::XmlDocument(Some(c)) => {
                        match c.namespace {
                            Some(ns) => write!(f, "<{{{ns}}}{}>", c.local),
                            None => write!(f, "<{}>", c.local),
                        }
                    }
                    BuiltInType::Json(Some(schema)) => write!(f, "<{{{}}}>", schema.location),
                    _ => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn span() -> Span {
        Span::new(0, 3, 1, 1)
    }

    #[test]
    fn array_depth_and_base() {
        let arena = Bump::new();
        let int = arena.alloc(TypeName::new(TypeKind::Value(ValueType::Int), span()));
        let one = arena.alloc(TypeName::new(TypeKind::Array(int), span()));
        let two = TypeName::new(TypeKind::Array(one), span());

        assert_eq!(two.array_depth(), 2);
        assert!(two.is_array());
        assert_eq!(two.base().kind, TypeKind::Value(ValueType::Int));
        assert_eq!(two.to_string(), "int[][]");
    }

    #[test]
    fn builtin_display() {
        let arena = Bump::new();
        let string = arena.alloc(TypeName::new(TypeKind::Value(ValueType::String), span()));
        let map = TypeName::new(TypeKind::BuiltIn(BuiltInType::Map(Some(&*string))), span());
        assert_eq!(map.to_string(), "map<string>");

        let xml = TypeName::new(
            TypeKind::BuiltIn(BuiltInType::Xml(Some(XmlConstraint {
                namespace: Some("\"urn:a\""),
                local: Ident::new("order", span()),
                span: span(),
            }))),
            span(),
        );
        assert_eq!(xml.to_string(), "xml<{\"urn:a\"}order>");
    }
}
