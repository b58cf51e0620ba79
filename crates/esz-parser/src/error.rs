use esz_common::{Diagnostic, DiagnosticCategory, Range};
use thiserror::Error;

/// The error a non-tolerant parse stops at.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Line {}: {}", .line + 1, .message)]
pub struct ParseError {
    pub message: String,
    pub code: u32,
    pub category: DiagnosticCategory,
    /// 0-based.
    pub line: u32,
    /// 0-based byte column.
    pub column: u32,
    pub range: Range,
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        ParseError {
            message: diagnostic.message,
            code: diagnostic.code,
            category: diagnostic.category,
            line: diagnostic.line,
            column: diagnostic.column,
            range: diagnostic.range,
        }
    }
}

impl ParseError {
    /// 0-based byte offset of the error.
    pub fn index(&self) -> u32 {
        self.range.start
    }
}

/// Internal unwinding signal; the diagnostic has not been recorded yet.
#[derive(Debug)]
pub(crate) struct ParseFailure(pub(crate) Box<Diagnostic>);

impl From<Diagnostic> for ParseFailure {
    fn from(diagnostic: Diagnostic) -> Self {
        ParseFailure(Box::new(diagnostic))
    }
}

pub(crate) type PResult<T> = Result<T, ParseFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use esz_common::Position;
    use esz_common::diagnostics::diagnostic_codes;

    #[test]
    fn display_is_one_based() {
        let diagnostic = Diagnostic::from_code(
            diagnostic_codes::ILLEGAL_RETURN,
            &[],
            Range::new(4, 10),
            Position::new(2, 0),
        );
        let error = ParseError::from(diagnostic);
        assert_eq!(error.to_string(), "Line 3: Illegal return statement");
        assert_eq!(error.category, DiagnosticCategory::Early);
        assert_eq!(error.index(), 4);
    }
}
