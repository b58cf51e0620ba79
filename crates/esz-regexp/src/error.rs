use std::time::Duration;

/// Coarse classification of a [`RegexError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegexErrorKind {
    Syntax,
    Unsupported,
    Timeout,
}

/// Why a pattern could not be translated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegexError {
    /// The pattern is not valid ECMAScript regular expression syntax.
    #[error("Invalid regular expression: {0}")]
    Syntax(String),
    /// Valid ECMAScript with no equivalent in the host engine.
    #[error("Unsupported regular expression construct: {0}")]
    Unsupported(String),
    /// Translation ran past its deadline.
    #[error("Regular expression translation exceeded {0:?}")]
    Timeout(Duration),
}

impl RegexError {
    pub fn kind(&self) -> RegexErrorKind {
        match self {
            RegexError::Syntax(_) => RegexErrorKind::Syntax,
            RegexError::Unsupported(_) => RegexErrorKind::Unsupported,
            RegexError::Timeout(_) => RegexErrorKind::Timeout,
        }
    }

    /// The message without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            RegexError::Syntax(message) | RegexError::Unsupported(message) => message.clone(),
            RegexError::Timeout(budget) => format!("timed out after {budget:?}"),
        }
    }
}

pub(crate) fn syntax<T>(message: impl Into<String>) -> Result<T, RegexError> {
    Err(RegexError::Syntax(message.into()))
}

pub(crate) fn unsupported<T>(message: impl Into<String>) -> Result<T, RegexError> {
    Err(RegexError::Unsupported(message.into()))
}
