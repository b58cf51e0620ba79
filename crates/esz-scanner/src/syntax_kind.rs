//! Token kinds.

use serde::Serialize;

/// Kind of a scanned token.
///
/// Contextual keywords (`async`, `of`, `let`, ...) get their own kinds so the
/// parser can test for them cheaply; [`SyntaxKind::is_identifier_like`] treats
/// them as identifiers. An identifier written with escapes never gets a
/// keyword kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    NoSubstitutionTemplateLiteral,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,
    JsxText,

    // Names
    Identifier,
    PrivateIdentifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    ColonToken,
    AtToken,
    QuestionQuestionToken,

    // Assignments
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    BarBarEqualsToken,
    AmpersandAmpersandEqualsToken,
    QuestionQuestionEqualsToken,

    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,

    // Strict mode reserved words
    ImplementsKeyword,
    InterfaceKeyword,
    LetKeyword,
    PackageKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    StaticKeyword,
    YieldKeyword,

    // Contextual keywords
    AsKeyword,
    AsyncKeyword,
    AwaitKeyword,
    FromKeyword,
    GetKeyword,
    OfKeyword,
    SetKeyword,
}

/// Token classification reported by `tokenize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    Keyword,
    Identifier,
    PrivateIdentifier,
    Punctuator,
    Numeric,
    String,
    BigInt,
    Boolean,
    Null,
    RegularExpression,
    Template,
    JsxText,
    EOF,
}

impl SyntaxKind {
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::QuestionQuestionEqualsToken;
    pub const FIRST_ASSIGNMENT: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_ASSIGNMENT: SyntaxKind = SyntaxKind::QuestionQuestionEqualsToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_RESERVED_WORD: SyntaxKind = SyntaxKind::WithKeyword;
    pub const FIRST_STRICT_RESERVED_WORD: SyntaxKind = SyntaxKind::ImplementsKeyword;
    pub const LAST_STRICT_RESERVED_WORD: SyntaxKind = SyntaxKind::YieldKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::SetKeyword;

    #[inline]
    fn between(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        (first as u8) <= (self as u8) && (self as u8) <= (last as u8)
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.between(Self::FIRST_PUNCTUATION, Self::LAST_PUNCTUATION)
    }

    /// `=` and every compound assignment operator.
    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self.between(Self::FIRST_ASSIGNMENT, Self::LAST_ASSIGNMENT)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        self.between(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    /// Words that can never be identifiers.
    #[inline]
    pub fn is_reserved_word(self) -> bool {
        self.between(Self::FIRST_KEYWORD, Self::LAST_RESERVED_WORD)
    }

    /// Words that are identifiers only in sloppy mode.
    #[inline]
    pub fn is_strict_mode_reserved_word(self) -> bool {
        self.between(Self::FIRST_STRICT_RESERVED_WORD, Self::LAST_STRICT_RESERVED_WORD)
    }

    /// Identifiers and every keyword that can act as an identifier somewhere.
    #[inline]
    pub fn is_identifier_like(self) -> bool {
        self == SyntaxKind::Identifier
            || self.between(Self::FIRST_STRICT_RESERVED_WORD, Self::LAST_KEYWORD)
    }

    /// Anything usable as a property name after `.` or in an object literal key.
    #[inline]
    pub fn is_identifier_name(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    #[inline]
    pub fn is_template(self) -> bool {
        matches!(
            self,
            SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
                | SyntaxKind::TemplateMiddle
                | SyntaxKind::TemplateTail
        )
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::RegularExpressionLiteral
        )
    }

    pub fn token_type(self) -> TokenType {
        match self {
            SyntaxKind::EndOfFileToken | SyntaxKind::Unknown => TokenType::EOF,
            SyntaxKind::NumericLiteral => TokenType::Numeric,
            SyntaxKind::BigIntLiteral => TokenType::BigInt,
            SyntaxKind::StringLiteral => TokenType::String,
            SyntaxKind::RegularExpressionLiteral => TokenType::RegularExpression,
            SyntaxKind::JsxText => TokenType::JsxText,
            SyntaxKind::PrivateIdentifier => TokenType::PrivateIdentifier,
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => TokenType::Boolean,
            SyntaxKind::NullKeyword => TokenType::Null,
            kind if kind.is_template() => TokenType::Template,
            kind if kind.is_punctuation() => TokenType::Punctuator,
            kind if kind.is_reserved_word() => TokenType::Keyword,
            _ => TokenType::Identifier,
        }
    }

    /// Source text of fixed-text tokens.
    pub fn text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::DotToken => ".",
            SyntaxKind::DotDotDotToken => "...",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::QuestionDotToken => "?.",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::LessThanEqualsToken => "<=",
            SyntaxKind::GreaterThanEqualsToken => ">=",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::ExclamationEqualsToken => "!=",
            SyntaxKind::EqualsEqualsEqualsToken => "===",
            SyntaxKind::ExclamationEqualsEqualsToken => "!==",
            SyntaxKind::EqualsGreaterThanToken => "=>",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::AsteriskAsteriskToken => "**",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::PercentToken => "%",
            SyntaxKind::PlusPlusToken => "++",
            SyntaxKind::MinusMinusToken => "--",
            SyntaxKind::LessThanLessThanToken => "<<",
            SyntaxKind::GreaterThanGreaterThanToken => ">>",
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => ">>>",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::BarToken => "|",
            SyntaxKind::CaretToken => "^",
            SyntaxKind::ExclamationToken => "!",
            SyntaxKind::TildeToken => "~",
            SyntaxKind::AmpersandAmpersandToken => "&&",
            SyntaxKind::BarBarToken => "||",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::AtToken => "@",
            SyntaxKind::QuestionQuestionToken => "??",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::PlusEqualsToken => "+=",
            SyntaxKind::MinusEqualsToken => "-=",
            SyntaxKind::AsteriskEqualsToken => "*=",
            SyntaxKind::AsteriskAsteriskEqualsToken => "**=",
            SyntaxKind::SlashEqualsToken => "/=",
            SyntaxKind::PercentEqualsToken => "%=",
            SyntaxKind::LessThanLessThanEqualsToken => "<<=",
            SyntaxKind::GreaterThanGreaterThanEqualsToken => ">>=",
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
            SyntaxKind::AmpersandEqualsToken => "&=",
            SyntaxKind::BarEqualsToken => "|=",
            SyntaxKind::CaretEqualsToken => "^=",
            SyntaxKind::BarBarEqualsToken => "||=",
            SyntaxKind::AmpersandAmpersandEqualsToken => "&&=",
            SyntaxKind::QuestionQuestionEqualsToken => "??=",
            SyntaxKind::BreakKeyword => "break",
            SyntaxKind::CaseKeyword => "case",
            SyntaxKind::CatchKeyword => "catch",
            SyntaxKind::ClassKeyword => "class",
            SyntaxKind::ConstKeyword => "const",
            SyntaxKind::ContinueKeyword => "continue",
            SyntaxKind::DebuggerKeyword => "debugger",
            SyntaxKind::DefaultKeyword => "default",
            SyntaxKind::DeleteKeyword => "delete",
            SyntaxKind::DoKeyword => "do",
            SyntaxKind::ElseKeyword => "else",
            SyntaxKind::EnumKeyword => "enum",
            SyntaxKind::ExportKeyword => "export",
            SyntaxKind::ExtendsKeyword => "extends",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::FinallyKeyword => "finally",
            SyntaxKind::ForKeyword => "for",
            SyntaxKind::FunctionKeyword => "function",
            SyntaxKind::IfKeyword => "if",
            SyntaxKind::ImportKeyword => "import",
            SyntaxKind::InKeyword => "in",
            SyntaxKind::InstanceOfKeyword => "instanceof",
            SyntaxKind::NewKeyword => "new",
            SyntaxKind::NullKeyword => "null",
            SyntaxKind::ReturnKeyword => "return",
            SyntaxKind::SuperKeyword => "super",
            SyntaxKind::SwitchKeyword => "switch",
            SyntaxKind::ThisKeyword => "this",
            SyntaxKind::ThrowKeyword => "throw",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::TryKeyword => "try",
            SyntaxKind::TypeOfKeyword => "typeof",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::VoidKeyword => "void",
            SyntaxKind::WhileKeyword => "while",
            SyntaxKind::WithKeyword => "with",
            SyntaxKind::ImplementsKeyword => "implements",
            SyntaxKind::InterfaceKeyword => "interface",
            SyntaxKind::LetKeyword => "let",
            SyntaxKind::PackageKeyword => "package",
            SyntaxKind::PrivateKeyword => "private",
            SyntaxKind::ProtectedKeyword => "protected",
            SyntaxKind::PublicKeyword => "public",
            SyntaxKind::StaticKeyword => "static",
            SyntaxKind::YieldKeyword => "yield",
            SyntaxKind::AsKeyword => "as",
            SyntaxKind::AsyncKeyword => "async",
            SyntaxKind::AwaitKeyword => "await",
            SyntaxKind::FromKeyword => "from",
            SyntaxKind::GetKeyword => "get",
            SyntaxKind::OfKeyword => "of",
            SyntaxKind::SetKeyword => "set",
            _ => return None,
        })
    }
}

/// Map an identifier's text to its keyword kind.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    // Every keyword is 2..=10 lowercase ASCII letters.
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes.len() > 10 || !bytes[0].is_ascii_lowercase() {
        return None;
    }
    Some(match text {
        "break" => SyntaxKind::BreakKeyword,
        "case" => SyntaxKind::CaseKeyword,
        "catch" => SyntaxKind::CatchKeyword,
        "class" => SyntaxKind::ClassKeyword,
        "const" => SyntaxKind::ConstKeyword,
        "continue" => SyntaxKind::ContinueKeyword,
        "debugger" => SyntaxKind::DebuggerKeyword,
        "default" => SyntaxKind::DefaultKeyword,
        "delete" => SyntaxKind::DeleteKeyword,
        "do" => SyntaxKind::DoKeyword,
        "else" => SyntaxKind::ElseKeyword,
        "enum" => SyntaxKind::EnumKeyword,
        "export" => SyntaxKind::ExportKeyword,
        "extends" => SyntaxKind::ExtendsKeyword,
        "false" => SyntaxKind::FalseKeyword,
        "finally" => SyntaxKind::FinallyKeyword,
        "for" => SyntaxKind::ForKeyword,
        "function" => SyntaxKind::FunctionKeyword,
        "if" => SyntaxKind::IfKeyword,
        "import" => SyntaxKind::ImportKeyword,
        "in" => SyntaxKind::InKeyword,
        "instanceof" => SyntaxKind::InstanceOfKeyword,
        "new" => SyntaxKind::NewKeyword,
        "null" => SyntaxKind::NullKeyword,
        "return" => SyntaxKind::ReturnKeyword,
        "super" => SyntaxKind::SuperKeyword,
        "switch" => SyntaxKind::SwitchKeyword,
        "this" => SyntaxKind::ThisKeyword,
        "throw" => SyntaxKind::ThrowKeyword,
        "true" => SyntaxKind::TrueKeyword,
        "try" => SyntaxKind::TryKeyword,
        "typeof" => SyntaxKind::TypeOfKeyword,
        "var" => SyntaxKind::VarKeyword,
        "void" => SyntaxKind::VoidKeyword,
        "while" => SyntaxKind::WhileKeyword,
        "with" => SyntaxKind::WithKeyword,
        "implements" => SyntaxKind::ImplementsKeyword,
        "interface" => SyntaxKind::InterfaceKeyword,
        "let" => SyntaxKind::LetKeyword,
        "package" => SyntaxKind::PackageKeyword,
        "private" => SyntaxKind::PrivateKeyword,
        "protected" => SyntaxKind::ProtectedKeyword,
        "public" => SyntaxKind::PublicKeyword,
        "static" => SyntaxKind::StaticKeyword,
        "yield" => SyntaxKind::YieldKeyword,
        "as" => SyntaxKind::AsKeyword,
        "async" => SyntaxKind::AsyncKeyword,
        "await" => SyntaxKind::AwaitKeyword,
        "from" => SyntaxKind::FromKeyword,
        "get" => SyntaxKind::GetKeyword,
        "of" => SyntaxKind::OfKeyword,
        "set" => SyntaxKind::SetKeyword,
        _ => return None,
    })
}

/// Whether `text` is a word that can never be used as an identifier.
#[inline]
pub fn is_reserved_word_text(text: &str) -> bool {
    text_to_keyword(text).is_some_and(SyntaxKind::is_reserved_word)
}

/// Whether `text` is reserved only in strict mode code.
#[inline]
pub fn is_strict_mode_reserved_word_text(text: &str) -> bool {
    text_to_keyword(text).is_some_and(SyntaxKind::is_strict_mode_reserved_word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_text_round_trips() {
        for word in ["break", "instanceof", "yield", "async", "of", "with"] {
            let kind = text_to_keyword(word).unwrap();
            assert_eq!(kind.text(), Some(word));
            assert!(kind.is_keyword());
        }
        assert_eq!(text_to_keyword("Break"), None);
        assert_eq!(text_to_keyword("constructor"), None);
    }

    #[test]
    fn keyword_categories() {
        assert!(SyntaxKind::ClassKeyword.is_reserved_word());
        assert!(!SyntaxKind::LetKeyword.is_reserved_word());
        assert!(SyntaxKind::LetKeyword.is_strict_mode_reserved_word());
        assert!(SyntaxKind::LetKeyword.is_identifier_like());
        assert!(SyntaxKind::AwaitKeyword.is_identifier_like());
        assert!(!SyntaxKind::AwaitKeyword.is_strict_mode_reserved_word());
        assert!(!SyntaxKind::ClassKeyword.is_identifier_like());
        assert!(SyntaxKind::ClassKeyword.is_identifier_name());
    }

    #[test]
    fn token_types() {
        assert_eq!(SyntaxKind::TrueKeyword.token_type(), TokenType::Boolean);
        assert_eq!(SyntaxKind::NullKeyword.token_type(), TokenType::Null);
        assert_eq!(SyntaxKind::IfKeyword.token_type(), TokenType::Keyword);
        assert_eq!(SyntaxKind::LetKeyword.token_type(), TokenType::Identifier);
        assert_eq!(SyntaxKind::QuestionQuestionEqualsToken.token_type(), TokenType::Punctuator);
        assert_eq!(SyntaxKind::TemplateHead.token_type(), TokenType::Template);
    }
}
