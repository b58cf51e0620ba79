use std::time::Duration;

use esz_common::limits::{DEFAULT_REGEX_TIMEOUT, MAX_REGEX_SIZE};
use regex::{Captures, Match, Regex, RegexBuilder};

use crate::deadline::Deadline;
use crate::emit::{GroupNames, emit};
use crate::error::RegexError;
use crate::flags::RegexFlags;
use crate::ir::Pattern;
use crate::parse::parse;

/// Limits for a single translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranslateOptions {
    pub timeout: Duration,
    /// Compiled-program size limit handed to the host builder.
    pub size_limit: usize,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            timeout: DEFAULT_REGEX_TIMEOUT,
            size_limit: MAX_REGEX_SIZE,
        }
    }
}

impl TranslateOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }
}

/// A pattern rewritten for the `regex` crate.
#[derive(Clone, Debug)]
pub struct TranslatedRegex {
    /// Host pattern text.
    pub pattern: String,
    pub flags: RegexFlags,
    /// ECMAScript group names with every host group number that carries them.
    /// More than one number means the name was reused across alternatives.
    pub group_names: GroupNames,
    pub capture_count: u32,
    /// Outside Unicode mode `.` and negated classes consume one UTF-16 code
    /// unit; the host consumes a whole code point.
    code_unit_atoms: bool,
    size_limit: usize,
}

impl TranslatedRegex {
    /// The `y` flag. The host has no sticky mode; callers anchor matches at
    /// their own `lastIndex`.
    pub fn sticky(&self) -> bool {
        self.flags.contains(RegexFlags::STICKY)
    }

    pub fn global(&self) -> bool {
        self.flags.contains(RegexFlags::GLOBAL)
    }

    /// Whether host matches on `haystack` agree with ECMAScript's code-unit
    /// semantics. Only a haystack outside the BMP can disagree.
    pub fn exact_for(&self, haystack: &str) -> bool {
        !self.code_unit_atoms || haystack.chars().all(|c| (c as u32) <= 0xFFFF)
    }

    pub fn compile(&self) -> Result<Regex, RegexError> {
        build_host(&self.pattern, self.size_limit)
    }

    /// First host group number for an ECMAScript group name.
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.group_indices(name).first().copied()
    }

    pub fn group_indices(&self, name: &str) -> &[usize] {
        self.group_names
            .get(name)
            .map(|indices| indices.as_slice())
            .unwrap_or_default()
    }

    /// The match for `name`, from whichever of its groups participated.
    pub fn named_match<'h>(&self, captures: &Captures<'h>, name: &str) -> Option<Match<'h>> {
        self.group_indices(name)
            .iter()
            .find_map(|&index| captures.get(index))
    }
}

fn build_host(pattern: &str, size_limit: usize) -> Result<Regex, RegexError> {
    RegexBuilder::new(pattern)
        .size_limit(size_limit)
        .build()
        .map_err(|err| match err {
            regex::Error::CompiledTooBig(limit) => RegexError::Unsupported(format!(
                "compiled pattern exceeds the {limit} byte size limit"
            )),
            other => RegexError::Unsupported(format!("host engine rejected the pattern: {other}")),
        })
}

/// Parse a pattern without translating it.
pub fn parse_pattern(pattern: &str, flags: RegexFlags) -> Result<Pattern, RegexError> {
    parse(pattern, flags, &Deadline::new(DEFAULT_REGEX_TIMEOUT))
}

/// Check a pattern and its flags for ECMAScript syntax errors only.
pub fn validate(pattern: &str, flags: &str) -> Result<RegexFlags, RegexError> {
    let flags = RegexFlags::parse(flags)?;
    parse_pattern(pattern, flags)?;
    Ok(flags)
}

/// Translate an ECMAScript pattern and flags into a host pattern.
///
/// Syntax errors take precedence over unsupported constructs: a pattern is
/// fully parsed before anything is emitted.
pub fn translate(
    pattern: &str,
    flags: &str,
    options: &TranslateOptions,
) -> Result<TranslatedRegex, RegexError> {
    let _span = tracing::debug_span!("translate_regexp", len = pattern.len(), flags).entered();
    let deadline = Deadline::new(options.timeout);
    let flags = RegexFlags::parse(flags)?;
    let parsed = parse(pattern, flags, &deadline)?;
    let emitted = emit(&parsed, &deadline)?;
    deadline.check()?;
    build_host(&emitted.pattern, options.size_limit)?;
    tracing::trace!(host = %emitted.pattern, "translated regular expression");
    Ok(TranslatedRegex {
        pattern: emitted.pattern,
        flags,
        group_names: emitted.group_names,
        capture_count: parsed.capture_count,
        code_unit_atoms: emitted.code_unit_atoms,
        size_limit: options.size_limit,
    })
}
