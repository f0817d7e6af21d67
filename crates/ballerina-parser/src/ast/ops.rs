//! Operator definitions for Ballerina expressions.
//!
//! Provides enums for binary and unary operators along with precedence and
//! associativity information for the Pratt parser.

use crate::lexer::TokenKind;
use std::fmt;

/// Binary operators, organized by precedence from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Level 1
    /// `||`
    Or,

    // Level 2
    /// `&&`
    And,

    // Level 3
    /// `==`
    Equal,
    /// `!=`
    NotEqual,

    // Level 4
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,

    // Level 5
    /// `+`
    Add,
    /// `-`
    Sub,

    // Level 6
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,

    // Level 7
    /// `^`
    Pow,
}

impl BinaryOp {
    /// Get the binding power (precedence) for this operator.
    ///
    /// Returns (left_bp, right_bp). Left-associative operators have
    /// right_bp = left_bp + 1; `^` has right_bp < left_bp so that it
    /// associates to the right.
    pub fn binding_power(&self) -> (u8, u8) {
        use BinaryOp::*;
        match self {
            Or => (2, 3),
            And => (4, 5),
            Equal | NotEqual => (6, 7),
            Less | LessEqual | Greater | GreaterEqual => (8, 9),
            Add | Sub => (10, 11),
            Mul | Div | Mod => (12, 13),
            Pow => (15, 14),
        }
    }

    /// The precedence level, 1 (loosest) to 7 (tightest).
    pub fn level(&self) -> u8 {
        let (left, _) = self.binding_power();
        left / 2
    }

    /// Whether the operator associates to the right.
    pub fn is_right_associative(&self) -> bool {
        let (left, right) = self.binding_power();
        right < left
    }

    /// Try to convert a token kind to a binary operator.
    pub fn from_token(token: TokenKind) -> Option<Self> {
        use TokenKind::*;
        Some(match token {
            PipePipe => BinaryOp::Or,
            AmpAmp => BinaryOp::And,
            EqualEqual => BinaryOp::Equal,
            BangEqual => BinaryOp::NotEqual,
            Less => BinaryOp::Less,
            LessEqual => BinaryOp::LessEqual,
            Greater => BinaryOp::Greater,
            GreaterEqual => BinaryOp::GreaterEqual,
            Plus => BinaryOp::Add,
            Minus => BinaryOp::Sub,
            Star => BinaryOp::Mul,
            Slash => BinaryOp::Div,
            Percent => BinaryOp::Mod,
            Caret => BinaryOp::Pow,
            _ => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;
        let s = match self {
            Or => "||",
            And => "&&",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "^",
        };
        write!(f, "{s}")
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl UnaryOp {
    /// Binding power of every prefix form (unary, cast, conversion).
    ///
    /// Higher than all binary operators, so the operand is a single
    /// prefix-level expression.
    pub fn binding_power() -> u8 {
        16
    }

    /// Try to convert a token kind to a unary operator.
    pub fn from_token(token: TokenKind) -> Option<Self> {
        use TokenKind::*;
        Some(match token {
            Plus => UnaryOp::Plus,
            Minus => UnaryOp::Neg,
            Bang => UnaryOp::Not,
            _ => return None,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_the_precedence_table() {
        assert_eq!(BinaryOp::Or.level(), 1);
        assert_eq!(BinaryOp::And.level(), 2);
        assert_eq!(BinaryOp::NotEqual.level(), 3);
        assert_eq!(BinaryOp::GreaterEqual.level(), 4);
        assert_eq!(BinaryOp::Sub.level(), 5);
        assert_eq!(BinaryOp::Mod.level(), 6);
        assert_eq!(BinaryOp::Pow.level(), 7);
    }

    #[test]
    fn only_pow_is_right_associative() {
        assert!(BinaryOp::Pow.is_right_associative());
        assert!(!BinaryOp::Add.is_right_associative());
        assert!(!BinaryOp::Or.is_right_associative());
    }

    #[test]
    fn prefix_binds_tighter_than_any_binary() {
        let (pow_left, _) = BinaryOp::Pow.binding_power();
        assert!(UnaryOp::binding_power() > pow_left);
    }

    #[test]
    fn from_token() {
        assert_eq!(BinaryOp::from_token(TokenKind::Caret), Some(BinaryOp::Pow));
        assert_eq!(BinaryOp::from_token(TokenKind::RightArrow), None);
        assert_eq!(UnaryOp::from_token(TokenKind::Bang), Some(UnaryOp::Not));
        assert_eq!(UnaryOp::from_token(TokenKind::Star), None);
    }

    #[test]
    fn display() {
        assert_eq!(BinaryOp::LessEqual.to_string(), "<=");
        assert_eq!(UnaryOp::Neg.to_string(), "-");
    }
}
