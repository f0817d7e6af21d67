//! Top-level AST nodes.
//!
//! A [`CompilationUnit`] holds an optional package declaration, the
//! import/namespace directives and the definitions of one source file.
//!
//! # Example Structure
//!
//! ```text
//! package samples.echo;                   // PackageDecl
//! import ballerina.net.http;              // Directive::Import
//! xmlns "urn:orders" as o;                // Directive::Namespace
//!
//! @http:BasePath {value: "/echo"}         // AnnotationAttachment
//! service<http> echo {                    // Item::Service
//!     resource ping(message m) { ... }    // ResourceDef
//! }
//! ```

use crate::ast::expr::{Expr, LiteralExpr};
use crate::ast::stmt::{Block, CallableBody, VarDefStmt};
use crate::ast::{Ident, NameReference, PackageName, TypeName};
use crate::lexer::Span;
use std::fmt;

/// One parsed source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompilationUnit<'ast> {
    pub package: Option<PackageDecl<'ast>>,
    pub directives: &'ast [Directive<'ast>],
    pub items: &'ast [Item<'ast>],
    pub span: Span,
}

impl<'ast> CompilationUnit<'ast> {
    /// The top-level definitions, in source order.
    pub fn items(&self) -> &'ast [Item<'ast>] {
        self.items
    }

    /// Import directives only.
    pub fn imports(&self) -> impl Iterator<Item = &'ast ImportDecl<'ast>> {
        self.directives.iter().filter_map(|directive| match directive {
            Directive::Import(import) => Some(*import),
            Directive::Namespace(_) => None,
        })
    }
}

/// `package a.b.c;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageDecl<'ast> {
    pub name: PackageName<'ast>,
    pub span: Span,
}

/// A header directive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive<'ast> {
    Import(&'ast ImportDecl<'ast>),
    Namespace(&'ast NamespaceDecl<'ast>),
}

impl Directive<'_> {
    pub fn span(&self) -> Span {
        match self {
            Directive::Import(d) => d.span,
            Directive::Namespace(d) => d.span,
        }
    }
}

/// `import a.b (as x)?;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportDecl<'ast> {
    pub package: PackageName<'ast>,
    pub alias: Option<Ident<'ast>>,
    pub span: Span,
}

impl<'ast> ImportDecl<'ast> {
    /// The alias the package is referenced by: the explicit one, or the last
    /// path segment.
    pub fn effective_alias(&self) -> Option<&'ast str> {
        match self.alias {
            Some(alias) => Some(alias.name),
            None => self.package.last().map(|segment| segment.name),
        }
    }
}

/// `xmlns "uri" (as prefix)?;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceDecl<'ast> {
    /// The namespace URI including quotes.
    pub uri: &'ast str,
    pub prefix: Option<Ident<'ast>>,
    pub span: Span,
}

/// A top-level definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    Service(&'ast ServiceDef<'ast>),
    Function(&'ast FunctionDef<'ast>),
    Connector(&'ast ConnectorDef<'ast>),
    Struct(&'ast StructDef<'ast>),
    TypeMapper(&'ast TypeMapperDef<'ast>),
    Constant(&'ast ConstantDef<'ast>),
    Annotation(&'ast AnnotationDef<'ast>),
    GlobalVar(&'ast GlobalVarDef<'ast>),
    /// Tokens skipped by error recovery.
    Error(Span),
}

impl<'ast> Item<'ast> {
    /// Get the span of this item.
    pub fn span(&self) -> Span {
        match self {
            Item::Service(d) => d.span,
            Item::Function(d) => d.span,
            Item::Connector(d) => d.span,
            Item::Struct(d) => d.span,
            Item::TypeMapper(d) => d.span,
            Item::Constant(d) => d.span,
            Item::Annotation(d) => d.span,
            Item::GlobalVar(d) => d.span,
            Item::Error(span) => *span,
        }
    }

    /// The defined name, if this is not an error placeholder.
    pub fn name(&self) -> Option<Ident<'ast>> {
        Some(match self {
            Item::Service(d) => d.name,
            Item::Function(d) => d.signature.name,
            Item::Connector(d) => d.name,
            Item::Struct(d) => d.name,
            Item::TypeMapper(d) => d.name,
            Item::Constant(d) => d.name,
            Item::Annotation(d) => d.name,
            Item::GlobalVar(d) => d.name,
            Item::Error(_) => return None,
        })
    }

    /// Annotations attached in front of the definition.
    pub fn annotations(&self) -> &'ast [AnnotationAttachment<'ast>] {
        match self {
            Item::Service(d) => d.annotations,
            Item::Function(d) => d.annotations,
            Item::Connector(d) => d.annotations,
            Item::Struct(d) => d.annotations,
            Item::TypeMapper(d) => d.annotations,
            Item::Constant(d) => d.annotations,
            Item::Annotation(d) => d.annotations,
            Item::GlobalVar(d) => d.annotations,
            Item::Error(_) => &[],
        }
    }
}

/// `service<protocol> name { varDef* resource* }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub protocol: Ident<'ast>,
    pub name: Ident<'ast>,
    pub variables: &'ast [VarDefStmt<'ast>],
    pub resources: &'ast [ResourceDef<'ast>],
    pub span: Span,
}

/// `resource name(params) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub body: CallableBody<'ast>,
    pub span: Span,
}

/// `native? function sig (body | ;)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub native: bool,
    pub signature: Signature<'ast>,
    /// `None` for native functions.
    pub body: Option<CallableBody<'ast>>,
    pub span: Span,
}

/// `name(params) returns?`, shared by functions and actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signature<'ast> {
    pub name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub returns: Option<ReturnParams<'ast>>,
    pub span: Span,
}

/// The parenthesized return list of a signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReturnParams<'ast> {
    /// `(int a, string b)`
    Named(&'ast [Param<'ast>]),
    /// `(int, string)`
    Types(&'ast [TypeName<'ast>]),
}

impl ReturnParams<'_> {
    pub fn len(&self) -> usize {
        match self {
            ReturnParams::Named(params) => params.len(),
            ReturnParams::Types(types) => types.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `@annotation* T name`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub ty: TypeName<'ast>,
    pub name: Ident<'ast>,
    pub span: Span,
}

/// `connector name(params) { varDef* action* }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub variables: &'ast [VarDefStmt<'ast>],
    pub actions: &'ast [ActionDef<'ast>],
    pub span: Span,
}

/// `native? action sig (body | ;)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub native: bool,
    pub signature: Signature<'ast>,
    pub body: Option<CallableBody<'ast>>,
    pub span: Span,
}

/// `struct name { field* }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub name: Ident<'ast>,
    pub fields: &'ast [FieldDef<'ast>],
    pub span: Span,
}

/// `T name (= literal)?;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef<'ast> {
    pub ty: TypeName<'ast>,
    pub name: Ident<'ast>,
    pub default: Option<LiteralExpr<'ast>>,
    pub span: Span,
}

/// `annotation name (attach point, ...)? { field* }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub name: Ident<'ast>,
    pub attach_points: &'ast [AttachPoint],
    pub fields: &'ast [FieldDef<'ast>],
    pub span: Span,
}

/// A place an annotation may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachPoint {
    pub kind: AttachPointKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachPointKind {
    Service,
    Resource,
    Function,
    Connector,
    Action,
    TypeMapper,
    Struct,
    Const,
    Parameter,
    Annotation,
}

impl fmt::Display for AttachPointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttachPointKind::Service => "service",
            AttachPointKind::Resource => "resource",
            AttachPointKind::Function => "function",
            AttachPointKind::Connector => "connector",
            AttachPointKind::Action => "action",
            AttachPointKind::TypeMapper => "typemapper",
            AttachPointKind::Struct => "struct",
            AttachPointKind::Const => "const",
            AttachPointKind::Parameter => "parameter",
            AttachPointKind::Annotation => "annotation",
        };
        write!(f, "{s}")
    }
}

/// `native? typemapper name(param)(T) (body | ;)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeMapperDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub native: bool,
    pub name: Ident<'ast>,
    pub param: Param<'ast>,
    pub return_type: TypeName<'ast>,
    /// `None` for native type mappers.
    pub body: Option<Block<'ast>>,
    pub span: Span,
}

/// `const valueType name = expr;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    /// Always a value type.
    pub ty: TypeName<'ast>,
    pub name: Ident<'ast>,
    pub value: Expr<'ast>,
    pub span: Span,
}

/// `T name (= expr)?;` at top level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalVarDef<'ast> {
    pub annotations: &'ast [AnnotationAttachment<'ast>],
    pub ty: TypeName<'ast>,
    pub name: Ident<'ast>,
    pub init: Option<Expr<'ast>>,
    pub span: Span,
}

/// `@pkg:Name { key: value, ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationAttachment<'ast> {
    pub name: NameReference<'ast>,
    pub attributes: &'ast [AnnotationAttribute<'ast>],
    pub span: Span,
}

impl<'ast> AnnotationAttachment<'ast> {
    /// Look up an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&'ast AnnotationValue<'ast>> {
        self.attributes
            .iter()
            .find(|attr| attr.key.name == key)
            .map(|attr| &attr.value)
    }
}

/// `key: value`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationAttribute<'ast> {
    pub key: Ident<'ast>,
    pub value: AnnotationValue<'ast>,
    pub span: Span,
}

/// Values allowed inside an annotation attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnotationValue<'ast> {
    Literal(LiteralExpr<'ast>),
    Annotation(&'ast AnnotationAttachment<'ast>),
    Array {
        elements: &'ast [AnnotationValue<'ast>],
        span: Span,
    },
}

impl AnnotationValue<'_> {
    pub fn span(&self) -> Span {
        match self {
            AnnotationValue::Literal(lit) => lit.span,
            AnnotationValue::Annotation(attachment) => attachment.span,
            AnnotationValue::Array { span, .. } => *span,
        }
    }
}
