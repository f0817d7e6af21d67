//! Token types and definitions for the Ballerina lexer.

use ballerina_core::{LexError, Span};
use std::fmt;

/// One lexeme together with its kind and location.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'src> {
    /// The type of token.
    pub kind: TokenKind,
    /// Exact source slice, quotes and escapes included.
    pub lexeme: &'src str,
    /// Location in source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// Anything that can feed classified tokens to the parser.
///
/// A source yields tokens in order and ends with exactly one
/// [`TokenKind::Eof`]; after that it keeps returning `Eof`. Lexical problems
/// are reported through [`take_errors`](Self::take_errors) and the offending
/// input shows up as a [`TokenKind::Error`] token.
pub trait TokenSource<'src> {
    /// Produce the next token.
    fn next_token(&mut self) -> Token<'src>;

    /// Take the lexical errors gathered so far.
    fn take_errors(&mut self) -> Vec<LexError> {
        Vec::new()
    }
}

/// Pre-lexed tokens. A missing trailing `Eof` is supplied at the end.
impl<'src> TokenSource<'src> for std::vec::IntoIter<Token<'src>> {
    fn next_token(&mut self) -> Token<'src> {
        match self.next() {
            Some(token) => token,
            None => Token::new(TokenKind::Eof, "", Span::default()),
        }
    }
}

/// All token types in Ballerina.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal: `42`, `0x1F`, `017`, `0b101`, `10L`
    IntegerLiteral,
    /// Floating-point literal: `3.14`, `1e10`, `2.5f`
    FloatLiteral,
    /// `true` or `false`
    BooleanLiteral,
    /// Quoted string: `"hello"`
    StringLiteral,
    /// Backtick template: `` `<a>{{x}}</a>` ``
    BacktickLiteral,
    /// `null`
    NullLiteral,

    /// User-defined identifier
    Identifier,
    /// `// ...` up to the end of the line
    LineComment,

    // =========================================
    // Keywords - Compilation unit
    // =========================================
    /// `package`
    Package,
    /// `import`
    Import,
    /// `as`
    As,
    /// `xmlns`
    Xmlns,

    // =========================================
    // Keywords - Definitions
    // =========================================
    /// `service`
    Service,
    /// `resource`
    Resource,
    /// `native`
    Native,
    /// `function`
    Function,
    /// `connector`
    Connector,
    /// `action`
    Action,
    /// `struct`
    Struct,
    /// `annotation`
    Annotation,
    /// `attach`
    Attach,
    /// `typemapper`
    TypeMapper,
    /// `const`
    Const,
    /// `parameter`
    Parameter,
    /// `worker`
    Worker,

    // =========================================
    // Keywords - Types
    // =========================================
    /// `any`
    Any,
    /// `boolean`
    Boolean,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `string`
    String,
    /// `blob`
    Blob,
    /// `message`
    Message,
    /// `map`
    Map,
    /// `xml`
    Xml,
    /// `xmlDocument`
    XmlDocument,
    /// `json`
    Json,
    /// `datatable`
    Datatable,

    // =========================================
    // Keywords - Statements
    // =========================================
    /// `transform`
    Transform,
    /// `create`
    Create,
    /// `var`
    Var,
    /// `if`
    If,
    /// `else`
    Else,
    /// `iterate`
    Iterate,
    /// `while`
    While,
    /// `continue`
    Continue,
    /// `break`
    Break,
    /// `fork`
    Fork,
    /// `join`
    Join,
    /// `some`
    SomeKw,
    /// `all`
    All,
    /// `timeout`
    Timeout,
    /// `try`
    Try,
    /// `catch`
    Catch,
    /// `finally`
    Finally,
    /// `throw`
    Throw,
    /// `return`
    Return,
    /// `reply`
    Reply,
    /// `transaction`
    Transaction,
    /// `aborted`
    Aborted,
    /// `committed`
    Committed,
    /// `abort`
    Abort,

    // =========================================
    // Operators
    // =========================================
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    Bang,
    /// `^`
    Caret,
    /// `/`
    Slash,
    /// `*`
    Star,
    /// `%`
    Percent,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `=`
    Equal,
    /// `->`
    RightArrow,
    /// `<-`
    LeftArrow,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `@`
    At,

    // =========================================
    // Special
    // =========================================
    /// End of file
    Eof,
    /// Input the scanner could not classify; dropped by the parser.
    Error,
}

impl TokenKind {
    /// Check if this token kind is a reserved word.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Package
                | Import
                | As
                | Xmlns
                | Service
                | Resource
                | Native
                | Function
                | Connector
                | Action
                | Struct
                | Annotation
                | Attach
                | TypeMapper
                | Const
                | Parameter
                | Worker
                | Any
                | Boolean
                | Int
                | Float
                | String
                | Blob
                | Message
                | Map
                | Xml
                | XmlDocument
                | Json
                | Datatable
                | Transform
                | Create
                | Var
                | If
                | Else
                | Iterate
                | While
                | Continue
                | Break
                | Fork
                | Join
                | SomeKw
                | All
                | Timeout
                | Try
                | Catch
                | Finally
                | Throw
                | Return
                | Reply
                | Transaction
                | Aborted
                | Committed
                | Abort
        )
    }

    /// Number, string, template, boolean or `null`.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntegerLiteral
                | FloatLiteral
                | BooleanLiteral
                | StringLiteral
                | BacktickLiteral
                | NullLiteral
        )
    }

    /// Primitive value type keywords.
    pub fn is_value_type(self) -> bool {
        use TokenKind::*;
        matches!(self, Boolean | Int | Float | String | Blob)
    }

    /// Built-in reference type keywords.
    pub fn is_builtin_reference_type(self) -> bool {
        use TokenKind::*;
        matches!(self, Message | Map | Xml | XmlDocument | Json | Datatable)
    }

    /// Keywords that can only begin a top-level definition or header.
    pub fn starts_definition(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Package
                | Import
                | Service
                | Native
                | Function
                | Connector
                | Struct
                | TypeMapper
                | Const
                | Annotation
        )
    }

    /// Keywords that begin a statement.
    pub fn starts_statement(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Var | If
                | Iterate
                | While
                | Continue
                | Break
                | Fork
                | Try
                | Throw
                | Return
                | Reply
                | Transform
                | Transaction
                | Abort
                | Xmlns
        )
    }

    /// Human-facing name used in diagnostics.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntegerLiteral => "integer literal",
            FloatLiteral => "floating-point literal",
            BooleanLiteral => "boolean literal",
            StringLiteral => "string literal",
            BacktickLiteral => "template string",
            NullLiteral => "'null'",
            Identifier => "identifier",
            LineComment => "comment",
            Package => "'package'",
            Import => "'import'",
            As => "'as'",
            Xmlns => "'xmlns'",
            Service => "'service'",
            Resource => "'resource'",
            Native => "'native'",
            Function => "'function'",
            Connector => "'connector'",
            Action => "'action'",
            Struct => "'struct'",
            Annotation => "'annotation'",
            Attach => "'attach'",
            TypeMapper => "'typemapper'",
            Const => "'const'",
            Parameter => "'parameter'",
            Worker => "'worker'",
            Any => "'any'",
            Boolean => "'boolean'",
            Int => "'int'",
            Float => "'float'",
            String => "'string'",
            Blob => "'blob'",
            Message => "'message'",
            Map => "'map'",
            Xml => "'xml'",
            XmlDocument => "'xmlDocument'",
            Json => "'json'",
            Datatable => "'datatable'",
            Transform => "'transform'",
            Create => "'create'",
            Var => "'var'",
            If => "'if'",
            Else => "'else'",
            Iterate => "'iterate'",
            While => "'while'",
            Continue => "'continue'",
            Break => "'break'",
            Fork => "'fork'",
            Join => "'join'",
            SomeKw => "'some'",
            All => "'all'",
            Timeout => "'timeout'",
            Try => "'try'",
            Catch => "'catch'",
            Finally => "'finally'",
            Throw => "'throw'",
            Return => "'return'",
            Reply => "'reply'",
            Transaction => "'transaction'",
            Aborted => "'aborted'",
            Committed => "'committed'",
            Abort => "'abort'",
            Plus => "'+'",
            Minus => "'-'",
            Bang => "'!'",
            Caret => "'^'",
            Slash => "'/'",
            Star => "'*'",
            Percent => "'%'",
            Less => "'<'",
            Greater => "'>'",
            LessEqual => "'<='",
            GreaterEqual => "'>='",
            EqualEqual => "'=='",
            BangEqual => "'!='",
            AmpAmp => "'&&'",
            PipePipe => "'||'",
            Equal => "'='",
            RightArrow => "'->'",
            LeftArrow => "'<-'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LeftBracket => "'['",
            RightBracket => "']'",
            Semicolon => "';'",
            Comma => "','",
            Dot => "'.'",
            Colon => "':'",
            At => "'@'",
            Eof => "end of file",
            Error => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Reserved word lookup; plain identifiers give `None`.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "package" => Package,
        "import" => Import,
        "as" => As,
        "xmlns" => Xmlns,

        "service" => Service,
        "resource" => Resource,
        "native" => Native,
        "function" => Function,
        "connector" => Connector,
        "action" => Action,
        "struct" => Struct,
        "annotation" => Annotation,
        "attach" => Attach,
        "typemapper" => TypeMapper,
        "const" => Const,
        "parameter" => Parameter,
        "worker" => Worker,

        "any" => Any,
        "boolean" => Boolean,
        "int" => Int,
        "float" => Float,
        "string" => String,
        "blob" => Blob,
        "message" => Message,
        "map" => Map,
        "xml" => Xml,
        "xmlDocument" => XmlDocument,
        "json" => Json,
        "datatable" => Datatable,

        "transform" => Transform,
        "create" => Create,
        "var" => Var,
        "if" => If,
        "else" => Else,
        "iterate" => Iterate,
        "while" => While,
        "continue" => Continue,
        "break" => Break,
        "fork" => Fork,
        "join" => Join,
        "some" => SomeKw,
        "all" => All,
        "timeout" => Timeout,
        "try" => Try,
        "catch" => Catch,
        "finally" => Finally,
        "throw" => Throw,
        "return" => Return,
        "reply" => Reply,
        "transaction" => Transaction,
        "aborted" => Aborted,
        "committed" => Committed,
        "abort" => Abort,

        "true" | "false" => BooleanLiteral,
        "null" => NullLiteral,

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(lookup_keyword("service"), Some(TokenKind::Service));
        assert_eq!(lookup_keyword("xmlDocument"), Some(TokenKind::XmlDocument));
        assert_eq!(lookup_keyword("true"), Some(TokenKind::BooleanLiteral));
        assert_eq!(lookup_keyword("null"), Some(TokenKind::NullLiteral));
        assert_eq!(lookup_keyword("xmldocument"), None);
        assert_eq!(lookup_keyword("Service"), None);
    }

    #[test]
    fn every_keyword_is_classified() {
        for word in [
            "package", "import", "as", "service", "function", "worker", "json", "abort", "some",
        ] {
            let kind = lookup_keyword(word).unwrap();
            assert!(kind.is_keyword(), "{word} should be a keyword");
            assert_eq!(kind.description(), format!("'{word}'"));
        }
    }

    #[test]
    fn token_categories() {
        assert!(TokenKind::Int.is_value_type());
        assert!(!TokenKind::Map.is_value_type());
        assert!(TokenKind::Map.is_builtin_reference_type());
        assert!(TokenKind::Native.starts_definition());
        assert!(TokenKind::Transaction.starts_statement());
        assert!(!TokenKind::Worker.starts_statement());
        assert!(TokenKind::BacktickLiteral.is_literal());
    }

    #[test]
    fn vec_source_supplies_eof() {
        let span = Span::new(0, 1, 1, 1);
        let mut source = vec![Token::new(TokenKind::Identifier, "a", span)].into_iter();
        assert_eq!(source.next_token().kind, TokenKind::Identifier);
        assert_eq!(source.next_token().kind, TokenKind::Eof);
        assert_eq!(source.next_token().kind, TokenKind::Eof);
    }
}
