//! ECMAScript regular expressions for the esz front end.
//!
//! This crate provides:
//! - `RegexFlags` - Validated flag sets (`dgimsuvy`)
//! - `CodePointSet` - Sorted interval sets used for character classes
//! - `ir` - The parsed form of a pattern
//! - `translate` / `validate` - Parse a pattern and re-emit it for the `regex` crate
//!
//! The host engine matches Unicode scalar values over `&str` and has no
//! look-around or back-references; patterns that need them fail with
//! [`RegexError::Unsupported`] rather than translating to something that
//! matches differently.

pub mod code_point_set;
pub use code_point_set::{CodePointSet, Interval};

mod error;
pub use error::{RegexError, RegexErrorKind};

mod flags;
pub use flags::RegexFlags;

pub mod ir;

mod case_fold;
mod deadline;
mod emit;
mod parse;
mod properties;

mod translate;
pub use translate::{TranslateOptions, TranslatedRegex, parse_pattern, translate, validate};
