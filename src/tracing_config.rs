//! Tracing configuration for debugging parses.
//!
//! Supports three output formats controlled by `ESZ_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: hierarchical indented output via `tracing-tree`, one level per
//!   parse or translation span
//! - `json`: one JSON object per span or event
//!
//! ## Quick start
//!
//! ```bash
//! ESZ_LOG=debug ESZ_LOG_FORMAT=tree cargo test -p esz
//! ESZ_LOG="esz_parser=trace,esz_regexp=debug" ESZ_LOG_FORMAT=json my-tool input.js
//! ```
//!
//! The subscriber is only installed when `ESZ_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat text lines (default).
    Text,
    /// Indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to `Text`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("ESZ_LOG_FORMAT").unwrap_or_default())
    }
}

/// `ESZ_LOG` takes precedence over `RUST_LOG`. Both use `RUST_LOG` syntax.
fn build_filter() -> EnvFilter {
    match std::env::var("ESZ_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global tracing subscriber.
///
/// Does nothing when neither `ESZ_LOG` nor `RUST_LOG` is set, or when a
/// global subscriber is already installed. Output goes to stderr.
pub fn init_tracing() {
    let has_esz_log = std::env::var("ESZ_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_esz_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
