//! Parser configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use esz_common::Range;
use esz_common::limits::{DEFAULT_REGEX_TIMEOUT, MAX_ASSIGNMENT_DEPTH};

use crate::ast::NodeKind;

/// Called once for every node the parser constructs.
pub type NodeObserver = Arc<dyn Fn(NodeKind, Range) + Send + Sync>;

/// Options for one parse call.
#[derive(Clone)]
pub struct ParserOptions {
    /// Record errors and keep going instead of stopping at the first one.
    pub tolerant: bool,
    /// Return the token list.
    pub tokens: bool,
    /// Return the comment list.
    pub comments: bool,
    pub jsx: bool,
    /// Translate regular expression literals into the host dialect.
    pub adapt_regexp: bool,
    /// Treat a failed translation as a parse error.
    pub require_regexp_adaptation: bool,
    pub regex_timeout: Duration,
    pub max_assignment_depth: u32,
    pub allow_return_outside_function: bool,
    pub on_node_created: Option<NodeObserver>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            tolerant: false,
            tokens: false,
            comments: false,
            jsx: false,
            adapt_regexp: false,
            require_regexp_adaptation: false,
            regex_timeout: DEFAULT_REGEX_TIMEOUT,
            max_assignment_depth: MAX_ASSIGNMENT_DEPTH,
            allow_return_outside_function: false,
            on_node_created: None,
        }
    }
}

impl ParserOptions {
    pub fn with_tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }

    pub fn with_tokens(mut self, tokens: bool) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_jsx(mut self, jsx: bool) -> Self {
        self.jsx = jsx;
        self
    }

    pub fn with_adapt_regexp(mut self, adapt: bool) -> Self {
        self.adapt_regexp = adapt;
        self
    }

    /// Implies `adapt_regexp`.
    pub fn with_require_regexp_adaptation(mut self, require: bool) -> Self {
        self.require_regexp_adaptation = require;
        if require {
            self.adapt_regexp = true;
        }
        self
    }

    pub fn with_regex_timeout(mut self, timeout: Duration) -> Self {
        self.regex_timeout = timeout;
        self
    }

    pub fn with_max_assignment_depth(mut self, depth: u32) -> Self {
        self.max_assignment_depth = depth;
        self
    }

    pub fn with_allow_return_outside_function(mut self, allow: bool) -> Self {
        self.allow_return_outside_function = allow;
        self
    }

    pub fn with_node_observer(mut self, observer: impl Fn(NodeKind, Range) + Send + Sync + 'static) -> Self {
        self.on_node_created = Some(Arc::new(observer));
        self
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("tolerant", &self.tolerant)
            .field("tokens", &self.tokens)
            .field("comments", &self.comments)
            .field("jsx", &self.jsx)
            .field("adapt_regexp", &self.adapt_regexp)
            .field("require_regexp_adaptation", &self.require_regexp_adaptation)
            .field("regex_timeout", &self.regex_timeout)
            .field("max_assignment_depth", &self.max_assignment_depth)
            .field("allow_return_outside_function", &self.allow_return_outside_function)
            .field("on_node_created", &self.on_node_created.is_some())
            .finish()
    }
}
