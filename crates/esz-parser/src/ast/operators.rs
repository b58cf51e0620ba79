//! Operator enums for unary, update, binary, logical and assignment nodes.

use esz_scanner::SyntaxKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    BitwiseNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOperator {
    pub fn from_token(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::MinusToken => UnaryOperator::Minus,
            SyntaxKind::PlusToken => UnaryOperator::Plus,
            SyntaxKind::ExclamationToken => UnaryOperator::Not,
            SyntaxKind::TildeToken => UnaryOperator::BitwiseNot,
            SyntaxKind::TypeOfKeyword => UnaryOperator::TypeOf,
            SyntaxKind::VoidKeyword => UnaryOperator::Void,
            SyntaxKind::DeleteKeyword => UnaryOperator::Delete,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::TypeOf => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

impl UpdateOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOperator::Increment => "++",
            UpdateOperator::Decrement => "--",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    ShiftLeft,
    ShiftRight,
    ShiftRightUnsigned,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponent,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    In,
    InstanceOf,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanEqual => ">=",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::ShiftRightUnsigned => ">>>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Exponent => "**",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::In => "in",
            BinaryOperator::InstanceOf => "instanceof",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
    NullishCoalescing,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::NullishCoalescing => "??",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponent,
    ShiftLeft,
    ShiftRight,
    ShiftRightUnsigned,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    LogicalOr,
    LogicalAnd,
    NullishCoalescing,
}

impl AssignmentOperator {
    pub fn from_token(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::EqualsToken => AssignmentOperator::Assign,
            SyntaxKind::PlusEqualsToken => AssignmentOperator::Add,
            SyntaxKind::MinusEqualsToken => AssignmentOperator::Subtract,
            SyntaxKind::AsteriskEqualsToken => AssignmentOperator::Multiply,
            SyntaxKind::SlashEqualsToken => AssignmentOperator::Divide,
            SyntaxKind::PercentEqualsToken => AssignmentOperator::Remainder,
            SyntaxKind::AsteriskAsteriskEqualsToken => AssignmentOperator::Exponent,
            SyntaxKind::LessThanLessThanEqualsToken => AssignmentOperator::ShiftLeft,
            SyntaxKind::GreaterThanGreaterThanEqualsToken => AssignmentOperator::ShiftRight,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => {
                AssignmentOperator::ShiftRightUnsigned
            }
            SyntaxKind::BarEqualsToken => AssignmentOperator::BitwiseOr,
            SyntaxKind::CaretEqualsToken => AssignmentOperator::BitwiseXor,
            SyntaxKind::AmpersandEqualsToken => AssignmentOperator::BitwiseAnd,
            SyntaxKind::BarBarEqualsToken => AssignmentOperator::LogicalOr,
            SyntaxKind::AmpersandAmpersandEqualsToken => AssignmentOperator::LogicalAnd,
            SyntaxKind::QuestionQuestionEqualsToken => AssignmentOperator::NullishCoalescing,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::Add => "+=",
            AssignmentOperator::Subtract => "-=",
            AssignmentOperator::Multiply => "*=",
            AssignmentOperator::Divide => "/=",
            AssignmentOperator::Remainder => "%=",
            AssignmentOperator::Exponent => "**=",
            AssignmentOperator::ShiftLeft => "<<=",
            AssignmentOperator::ShiftRight => ">>=",
            AssignmentOperator::ShiftRightUnsigned => ">>>=",
            AssignmentOperator::BitwiseOr => "|=",
            AssignmentOperator::BitwiseXor => "^=",
            AssignmentOperator::BitwiseAnd => "&=",
            AssignmentOperator::LogicalOr => "||=",
            AssignmentOperator::LogicalAnd => "&&=",
            AssignmentOperator::NullishCoalescing => "??=",
        }
    }
}

/// Operator of a binary-position token, for precedence climbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InfixOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

impl InfixOperator {
    /// Map a token to its infix operator. `in` is only an operator when
    /// `allow_in` holds.
    pub(crate) fn from_token(kind: SyntaxKind, allow_in: bool) -> Option<Self> {
        use BinaryOperator as B;
        let op = match kind {
            SyntaxKind::QuestionQuestionToken => {
                return Some(InfixOperator::Logical(LogicalOperator::NullishCoalescing));
            }
            SyntaxKind::BarBarToken => return Some(InfixOperator::Logical(LogicalOperator::Or)),
            SyntaxKind::AmpersandAmpersandToken => {
                return Some(InfixOperator::Logical(LogicalOperator::And));
            }
            SyntaxKind::BarToken => B::BitwiseOr,
            SyntaxKind::CaretToken => B::BitwiseXor,
            SyntaxKind::AmpersandToken => B::BitwiseAnd,
            SyntaxKind::EqualsEqualsToken => B::Equal,
            SyntaxKind::ExclamationEqualsToken => B::NotEqual,
            SyntaxKind::EqualsEqualsEqualsToken => B::StrictEqual,
            SyntaxKind::ExclamationEqualsEqualsToken => B::StrictNotEqual,
            SyntaxKind::LessThanToken => B::LessThan,
            SyntaxKind::GreaterThanToken => B::GreaterThan,
            SyntaxKind::LessThanEqualsToken => B::LessThanEqual,
            SyntaxKind::GreaterThanEqualsToken => B::GreaterThanEqual,
            SyntaxKind::InstanceOfKeyword => B::InstanceOf,
            SyntaxKind::InKeyword if allow_in => B::In,
            SyntaxKind::LessThanLessThanToken => B::ShiftLeft,
            SyntaxKind::GreaterThanGreaterThanToken => B::ShiftRight,
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => B::ShiftRightUnsigned,
            SyntaxKind::PlusToken => B::Add,
            SyntaxKind::MinusToken => B::Subtract,
            SyntaxKind::AsteriskToken => B::Multiply,
            SyntaxKind::SlashToken => B::Divide,
            SyntaxKind::PercentToken => B::Remainder,
            SyntaxKind::AsteriskAsteriskToken => B::Exponent,
            _ => return None,
        };
        Some(InfixOperator::Binary(op))
    }

    /// Binding power; higher binds tighter.
    pub(crate) fn precedence(self) -> u8 {
        use BinaryOperator as B;
        match self {
            InfixOperator::Logical(LogicalOperator::NullishCoalescing) => 1,
            InfixOperator::Logical(LogicalOperator::Or) => 2,
            InfixOperator::Logical(LogicalOperator::And) => 3,
            InfixOperator::Binary(op) => match op {
                B::BitwiseOr => 4,
                B::BitwiseXor => 5,
                B::BitwiseAnd => 6,
                B::Equal | B::NotEqual | B::StrictEqual | B::StrictNotEqual => 7,
                B::LessThan
                | B::GreaterThan
                | B::LessThanEqual
                | B::GreaterThanEqual
                | B::InstanceOf
                | B::In => 8,
                B::ShiftLeft | B::ShiftRight | B::ShiftRightUnsigned => 9,
                B::Add | B::Subtract => 10,
                B::Multiply | B::Divide | B::Remainder => 11,
                B::Exponent => 12,
            },
        }
    }

    pub(crate) fn is_right_associative(self) -> bool {
        self == InfixOperator::Binary(BinaryOperator::Exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_table_order() {
        let prec = |kind| InfixOperator::from_token(kind, true).map(InfixOperator::precedence);
        assert!(prec(SyntaxKind::AsteriskAsteriskToken) > prec(SyntaxKind::AsteriskToken));
        assert!(prec(SyntaxKind::AsteriskToken) > prec(SyntaxKind::PlusToken));
        assert!(prec(SyntaxKind::PlusToken) > prec(SyntaxKind::LessThanLessThanToken));
        assert!(prec(SyntaxKind::LessThanLessThanToken) > prec(SyntaxKind::InKeyword));
        assert!(prec(SyntaxKind::InKeyword) > prec(SyntaxKind::EqualsEqualsToken));
        assert!(prec(SyntaxKind::AmpersandToken) > prec(SyntaxKind::CaretToken));
        assert!(prec(SyntaxKind::BarToken) > prec(SyntaxKind::AmpersandAmpersandToken));
        assert!(prec(SyntaxKind::BarBarToken) > prec(SyntaxKind::QuestionQuestionToken));
    }

    #[test]
    fn in_needs_allow_in() {
        assert!(InfixOperator::from_token(SyntaxKind::InKeyword, false).is_none());
        assert_eq!(
            InfixOperator::from_token(SyntaxKind::InKeyword, true),
            Some(InfixOperator::Binary(BinaryOperator::In))
        );
    }

    #[test]
    fn logical_assignment_operators() {
        assert_eq!(
            AssignmentOperator::from_token(SyntaxKind::QuestionQuestionEqualsToken).map(|op| op.as_str()),
            Some("??=")
        );
        assert_eq!(AssignmentOperator::from_token(SyntaxKind::EqualsEqualsToken), None);
    }
}
