//! Expression AST nodes.
//!
//! Expressions are built by the Pratt parser in `expr_parser.rs`. Small
//! leaves are stored inline; everything with children lives in the arena.

use crate::ast::{BinaryOp, Ident, NameReference, TypeName, UnaryOp};
use crate::lexer::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// `42`, `-1.5`, `"text"`, `true`, `null`
    Literal(LiteralExpr<'ast>),
    /// `[a, b, c]`
    ArrayLiteral(&'ast ArrayLiteralExpr<'ast>),
    /// `{"name": value, ...}`
    MapStructLiteral(&'ast MapStructLiteralExpr<'ast>),
    /// `` `<name>{{n}}</name>` ``
    Template(TemplateExpr<'ast>),
    /// `a`, `pkg:a`, `a.b[0]@[x]`
    VarRef(&'ast VarRef<'ast>),
    /// `pkg:fn(args)`
    FunctionCall(&'ast FunctionCallExpr<'ast>),
    /// `Conn.action(args)`, only on the right of `=` or as a statement
    ActionInvocation(&'ast ActionInvocationExpr<'ast>),
    /// `create pkg:Conn(args)`, only on the right of `=`
    ConnectorInit(&'ast ConnectorInitExpr<'ast>),
    /// `int.max`, `json.parse`
    TypeAccess(&'ast TypeAccessExpr<'ast>),
    /// `(T) expr`
    Cast(&'ast CastExpr<'ast>),
    /// `<T> expr`
    Conversion(&'ast ConversionExpr<'ast>),
    /// `-x`, `!flag`
    Unary(&'ast UnaryExpr<'ast>),
    /// `a + b`
    Binary(&'ast BinaryExpr<'ast>),
    /// `(a + b)`
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::ArrayLiteral(e) => e.span,
            Self::MapStructLiteral(e) => e.span,
            Self::Template(e) => e.span,
            Self::VarRef(e) => e.span,
            Self::FunctionCall(e) => e.span,
            Self::ActionInvocation(e) => e.span,
            Self::ConnectorInit(e) => e.span,
            Self::TypeAccess(e) => e.span,
            Self::Cast(e) => e.span,
            Self::Conversion(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// The variable reference, if this expression is one.
    pub fn as_var_ref(&self) -> Option<&'ast VarRef<'ast>> {
        match *self {
            Self::VarRef(var) => Some(var),
            _ => None,
        }
    }
}

/// A literal value, kept as written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    /// A leading `-` was part of the literal.
    pub negative: bool,
    pub span: Span,
}

/// Kinds of literal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    /// Integer text, including any radix prefix or `L` suffix.
    Integer(&'ast str),
    /// Floating-point text, including any suffix.
    Float(&'ast str),
    /// String text, including the surrounding quotes.
    String(&'ast str),
    Boolean(bool),
    Null,
}

/// `[elements]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayLiteralExpr<'ast> {
    pub elements: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `{key: value, ...}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStructLiteralExpr<'ast> {
    pub entries: &'ast [KeyValue<'ast>],
    pub span: Span,
}

/// One `key: value` entry of a map/struct literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyValue<'ast> {
    pub key: Expr<'ast>,
    pub value: Expr<'ast>,
    pub span: Span,
}

/// A backtick template string. The body is not decomposed further.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateExpr<'ast> {
    /// Raw text including the backticks.
    pub text: &'ast str,
    pub span: Span,
}

impl<'ast> TemplateExpr<'ast> {
    /// The text between the backticks.
    pub fn body(&self) -> &'ast str {
        self.text
            .strip_prefix('`')
            .and_then(|t| t.strip_suffix('`'))
            .unwrap_or(self.text)
    }
}

/// A variable reference: a name, or a suffix applied to another reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarRef<'ast> {
    pub kind: VarRefKind<'ast>,
    pub span: Span,
}

/// The shapes of a [`VarRef`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarRefKind<'ast> {
    /// `name` or `pkg:name`
    Simple(NameReference<'ast>),
    /// `base[index]`
    Index {
        base: &'ast VarRef<'ast>,
        index: Expr<'ast>,
    },
    /// `base.field`
    Field {
        base: &'ast VarRef<'ast>,
        field: Ident<'ast>,
    },
    /// `base@`, `base@name`, `base@[expr]`
    XmlAttribute {
        base: &'ast VarRef<'ast>,
        selector: XmlAttributeSelector<'ast>,
    },
}

/// Which attributes an xml-attribute suffix selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XmlAttributeSelector<'ast> {
    /// `@` alone: every attribute.
    All,
    /// `@name`
    Name(Ident<'ast>),
    /// `@[expr]`
    Expr(Expr<'ast>),
}

impl<'ast> VarRef<'ast> {
    /// The reference this suffix applies to, if any.
    pub fn base(&self) -> Option<&'ast VarRef<'ast>> {
        match self.kind {
            VarRefKind::Simple(_) => None,
            VarRefKind::Index { base, .. }
            | VarRefKind::Field { base, .. }
            | VarRefKind::XmlAttribute { base, .. } => Some(base),
        }
    }

    /// The name at the root of the chain.
    pub fn root(&self) -> NameReference<'ast> {
        let mut current = self;
        loop {
            match current.kind {
                VarRefKind::Simple(name) => return name,
                VarRefKind::Index { base, .. }
                | VarRefKind::Field { base, .. }
                | VarRefKind::XmlAttribute { base, .. } => current = base,
            }
        }
    }

    /// Number of nodes in the chain, including the root name.
    pub fn chain_len(&self) -> usize {
        let mut len = 1;
        let mut current = self.base();
        while let Some(var) = current {
            len += 1;
            current = var.base();
        }
        len
    }
}

/// `name(args)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionCallExpr<'ast> {
    pub name: NameReference<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `connector.action(args)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionInvocationExpr<'ast> {
    pub connector: NameReference<'ast>,
    pub action: Ident<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `create Connector(args)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorInitExpr<'ast> {
    pub connector: NameReference<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `valueType.member` or `builtInType.member`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeAccessExpr<'ast> {
    pub ty: TypeName<'ast>,
    pub member: Ident<'ast>,
    pub span: Span,
}

/// `(T) operand`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastExpr<'ast> {
    pub target: TypeName<'ast>,
    pub operand: Expr<'ast>,
    pub span: Span,
}

/// `<T> operand`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionExpr<'ast> {
    pub target: TypeName<'ast>,
    pub operand: Expr<'ast>,
    pub span: Span,
}

/// `op operand`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: Expr<'ast>,
    pub span: Span,
}

/// `left op right`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: Expr<'ast>,
    pub op: BinaryOp,
    pub right: Expr<'ast>,
    pub span: Span,
}

/// `(expr)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: Expr<'ast>,
    pub span: Span,
}
