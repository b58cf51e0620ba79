//! IR to `regex` crate syntax.
//!
//! The emitter walks a parsed [`Pattern`] and writes an equivalent pattern for
//! the host engine, or fails with [`RegexError::Unsupported`] when the host
//! cannot express the construct with the same meaning.

use std::fmt::Write as _;

use esz_common::limits::MAX_REGEX_REPETITION;
use esz_scanner::char_codes::{combine_surrogates, is_high_surrogate, is_low_surrogate, is_surrogate};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::case_fold::close_over_case;
use crate::code_point_set::{CodePointSet, Interval, LAST_BMP};
use crate::deadline::Deadline;
use crate::error::{RegexError, unsupported};
use crate::flags::RegexFlags;
use crate::ir::{
    AnchorKind, Capture, CharClass, ClassOp, ClassOperand, Node, Pattern, PropertyEscape,
    Quantifier,
};

/// ECMAScript group name to the host group numbers that carry it.
pub type GroupNames = IndexMap<String, SmallVec<[usize; 2]>>;

/// Anything but `LineTerminator`.
const DOT: &str = r"[^\n\r\x{2028}\x{2029}]";
const DOT_ALL: &str = "(?s:.)";
const NOTHING: &str = r"[^\x{0}-\x{10FFFF}]";

pub(crate) struct Emitted {
    pub(crate) pattern: String,
    pub(crate) group_names: GroupNames,
    /// An atom matches one UTF-16 code unit in ECMAScript but a whole code
    /// point in the host.
    pub(crate) code_unit_atoms: bool,
}

struct Emitter<'d> {
    flags: RegexFlags,
    out: String,
    group_names: GroupNames,
    deadline: &'d Deadline,
    /// Non-Unicode `i`: case variants are written out instead of `(?i)`.
    explicit_case: bool,
    code_unit_atoms: bool,
}

pub(crate) fn emit(pattern: &Pattern, deadline: &Deadline) -> Result<Emitted, RegexError> {
    let ignore_case = pattern.flags.contains(RegexFlags::IGNORE_CASE);
    let unicode = pattern.flags.is_unicode_mode();
    let mut emitter = Emitter {
        flags: pattern.flags,
        out: String::new(),
        group_names: GroupNames::default(),
        deadline,
        explicit_case: ignore_case && !unicode,
        code_unit_atoms: false,
    };
    if ignore_case && unicode {
        emitter.out.push_str("(?i)");
    }
    emitter.emit_node(&pattern.node)?;
    Ok(Emitted {
        pattern: emitter.out,
        group_names: emitter.group_names,
        code_unit_atoms: emitter.code_unit_atoms,
    })
}

/// Whether the host accepts `name` as a capture group name.
fn is_host_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn push_literal(out: &mut String, cp: u32) {
    match char::from_u32(cp) {
        Some(c) if c.is_ascii_alphanumeric() || c == ' ' => out.push(c),
        Some(c) if c.is_ascii_punctuation() => {
            let mut buf = [0u8; 4];
            out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
        Some(c) if !c.is_ascii() && !c.is_control() && !c.is_whitespace() => out.push(c),
        _ => {
            let _ = write!(out, r"\x{{{cp:X}}}");
        }
    }
}

fn push_class_char(out: &mut String, cp: u32) {
    match char::from_u32(cp) {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
        _ => {
            let _ = write!(out, r"\x{{{cp:X}}}");
        }
    }
}

fn push_property(out: &mut String, property: &PropertyEscape) {
    out.push_str(if property.negated { r"\P{" } else { r"\p{" });
    if let Some(name) = &property.name {
        out.push_str(name);
        out.push('=');
    }
    out.push_str(&property.value);
    out.push('}');
}

fn push_quantifier(out: &mut String, quantifier: Quantifier) {
    match (quantifier.min, quantifier.max) {
        (0, None) => out.push('*'),
        (1, None) => out.push('+'),
        (0, Some(1)) => out.push('?'),
        (min, None) => {
            let _ = write!(out, "{{{min},}}");
        }
        (min, Some(max)) if min == max => {
            let _ = write!(out, "{{{min}}}");
        }
        (min, Some(max)) => {
            let _ = write!(out, "{{{min},{max}}}");
        }
    }
    if !quantifier.greedy {
        out.push('?');
    }
}

/// Nodes the host treats as a single atom under a quantifier.
fn is_atom(node: &Node) -> bool {
    match node {
        Node::Char(_) | Node::Dot | Node::Class(_) | Node::Property(_) | Node::Group { .. } => {
            true
        }
        _ => false,
    }
}

impl Emitter<'_> {
    fn emit_node(&mut self, node: &Node) -> Result<(), RegexError> {
        self.deadline.check()?;
        match node {
            Node::Empty => {}
            Node::Char(cp) => self.emit_char(*cp)?,
            Node::Dot => {
                self.code_unit_atoms |= !self.flags.is_unicode_mode();
                let dot = if self.flags.contains(RegexFlags::DOT_ALL) { DOT_ALL } else { DOT };
                self.out.push_str(dot);
            }
            Node::Class(class) => self.emit_class(class)?,
            Node::Property(property) => push_property(&mut self.out, property),
            Node::Anchor(kind) => {
                if self.flags.contains(RegexFlags::MULTILINE) {
                    return unsupported("line anchors in multiline mode");
                }
                self.out.push(match kind {
                    AnchorKind::Start => '^',
                    AnchorKind::End => '$',
                });
            }
            Node::WordBoundary { negated } => {
                self.out.push_str(if *negated { r"(?-u:\B)" } else { r"(?-u:\b)" });
            }
            Node::Group { capture, node } => self.emit_group(capture.as_ref(), node)?,
            Node::LookAround { behind, .. } => {
                return unsupported(if *behind {
                    "lookbehind assertions"
                } else {
                    "lookahead assertions"
                });
            }
            Node::BackReference(_) => return unsupported("backreferences"),
            Node::Repeat { node, quantifier } => self.emit_repeat(node, *quantifier)?,
            Node::Cat(nodes) => self.emit_sequence(nodes)?,
            Node::Alt(nodes) => {
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        self.out.push('|');
                    }
                    self.emit_node(node)?;
                }
            }
        }
        Ok(())
    }

    fn emit_char(&mut self, cp: u32) -> Result<(), RegexError> {
        if is_surrogate(cp) {
            return unsupported(format!("lone surrogate \\u{cp:X}"));
        }
        if self.explicit_case && cp <= LAST_BMP {
            let mut set = CodePointSet::new();
            set.add_one(cp);
            let variants = close_over_case(&set);
            if variants.len() > 1 {
                self.out.push('[');
                self.emit_ranges_into_out(&variants)?;
                self.out.push(']');
                return Ok(());
            }
        }
        push_literal(&mut self.out, cp);
        Ok(())
    }

    /// Emit a sequence, joining surrogate pairs that were split into two
    /// code units.
    fn emit_sequence(&mut self, nodes: &[Node]) -> Result<(), RegexError> {
        let mut i = 0;
        while let Some(node) = nodes.get(i) {
            if let Node::Char(high) = node
                && is_high_surrogate(*high)
                && let Some(Node::Char(low)) = nodes.get(i + 1)
                && is_low_surrogate(*low)
            {
                push_literal(&mut self.out, combine_surrogates(*high, *low));
                i += 2;
                continue;
            }
            if matches!(node, Node::Alt(_)) {
                self.out.push_str("(?:");
                self.emit_node(node)?;
                self.out.push(')');
            } else {
                self.emit_node(node)?;
            }
            i += 1;
        }
        Ok(())
    }

    fn emit_group(&mut self, capture: Option<&Capture>, node: &Node) -> Result<(), RegexError> {
        match capture {
            None => self.out.push_str("(?:"),
            Some(Capture { name: None, .. }) => self.out.push('('),
            Some(Capture {
                name: Some(name),
                index,
            }) => {
                let host = self.host_group_name(name, *index);
                let _ = write!(self.out, "(?<{host}>");
            }
        }
        self.emit_node(node)?;
        self.out.push(')');
        Ok(())
    }

    /// Host name for an ECMAScript group. Names repeat across alternatives
    /// in ECMAScript but must be unique for the host, so later occurrences
    /// get the group number appended.
    fn host_group_name(&mut self, name: &str, index: u32) -> String {
        let indices = self.group_names.entry(name.to_string()).or_default();
        let first = indices.is_empty();
        indices.push(index as usize);
        match (first, is_host_group_name(name)) {
            (true, true) => name.to_string(),
            (false, true) => format!("{name}.{index}"),
            (_, false) => format!("g.{index}"),
        }
    }

    fn emit_repeat(&mut self, node: &Node, quantifier: Quantifier) -> Result<(), RegexError> {
        let bound = quantifier.max.unwrap_or(quantifier.min);
        if quantifier.min > MAX_REGEX_REPETITION || bound > MAX_REGEX_REPETITION {
            return unsupported(format!(
                "repetition count above {MAX_REGEX_REPETITION}"
            ));
        }
        if is_atom(node) {
            self.emit_node(node)?;
        } else {
            self.out.push_str("(?:");
            self.emit_node(node)?;
            self.out.push(')');
        }
        push_quantifier(&mut self.out, quantifier);
        Ok(())
    }

    fn emit_class(&mut self, class: &CharClass) -> Result<(), RegexError> {
        if class.lone_surrogates {
            return unsupported("lone surrogates in a character class");
        }
        if !self.flags.is_unicode_mode() {
            return self.emit_code_unit_class(class);
        }
        let exempt = class.fold_exempt && self.flags.contains(RegexFlags::IGNORE_CASE);
        if exempt {
            self.out.push_str("(?-i:");
        }
        let mut text = String::new();
        self.emit_class_into(&mut text, class)?;
        self.out.push_str(&text);
        if exempt {
            self.out.push(')');
        }
        Ok(())
    }

    /// A class outside Unicode mode: a plain set of code units, closed over
    /// case variants under `i`.
    fn emit_code_unit_class(&mut self, class: &CharClass) -> Result<(), RegexError> {
        let Some(set) = self.as_plain_set(class) else {
            return unsupported("set operations outside Unicode mode");
        };
        let set = if self.explicit_case { close_over_case(&set) } else { set };
        let reaches_astral = set.intervals().last().is_some_and(|iv| iv.last > LAST_BMP);
        self.code_unit_atoms |= class.negated || reaches_astral;
        let mut text = String::new();
        self.emit_class_into(&mut text, &CharClass::from_set(set, class.negated))?;
        self.out.push_str(&text);
        Ok(())
    }

    fn emit_ranges_into_out(&mut self, set: &CodePointSet) -> Result<(), RegexError> {
        let mut text = String::new();
        self.emit_ranges(&mut text, set)?;
        self.out.push_str(&text);
        Ok(())
    }

    /// Write `class` as a bracketed host class.
    fn emit_class_into(&self, out: &mut String, class: &CharClass) -> Result<(), RegexError> {
        self.deadline.check()?;
        if let Some(set) = self.as_plain_set(class)
            && set.is_empty()
        {
            out.push_str(if class.negated { DOT_ALL } else { NOTHING });
            return Ok(());
        }
        out.push('[');
        if class.negated {
            out.push('^');
        }
        match class.op {
            ClassOp::Union => {
                for operand in &class.operands {
                    self.emit_operand(out, operand, false)?;
                }
            }
            ClassOp::Intersection | ClassOp::Difference => {
                let separator = if class.op == ClassOp::Intersection { "&&" } else { "--" };
                for (i, operand) in class.operands.iter().enumerate() {
                    if i > 0 {
                        out.push_str(separator);
                    }
                    self.emit_operand(out, operand, true)?;
                }
            }
        }
        out.push(']');
        Ok(())
    }

    /// The class as one code point set, if it is a plain union of sets.
    fn as_plain_set(&self, class: &CharClass) -> Option<CodePointSet> {
        if class.op != ClassOp::Union {
            return None;
        }
        let mut set = CodePointSet::new();
        for operand in &class.operands {
            match operand {
                ClassOperand::Set(other) => set.add_set(&other.without_surrogates()),
                _ => return None,
            }
        }
        Some(set)
    }

    fn emit_operand(
        &self,
        out: &mut String,
        operand: &ClassOperand,
        bracketed: bool,
    ) -> Result<(), RegexError> {
        match operand {
            ClassOperand::Set(set) => {
                let set = set.without_surrogates();
                if set.is_empty() {
                    if bracketed {
                        out.push_str(NOTHING);
                    }
                    return Ok(());
                }
                if bracketed {
                    out.push('[');
                }
                self.emit_ranges(out, &set)?;
                if bracketed {
                    out.push(']');
                }
            }
            ClassOperand::Property(property) => {
                if bracketed {
                    out.push('[');
                }
                push_property(out, property);
                if bracketed {
                    out.push(']');
                }
            }
            ClassOperand::Nested(class) => self.emit_class_into(out, class)?,
            ClassOperand::Strings(_) => {
                return unsupported("multi-character strings in a character class");
            }
        }
        Ok(())
    }

    fn emit_ranges(&self, out: &mut String, set: &CodePointSet) -> Result<(), RegexError> {
        for Interval { first, last } in set.split_at_bmp() {
            self.deadline.check()?;
            push_class_char(out, first);
            if last > first {
                out.push('-');
                push_class_char(out, last);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use std::time::Duration;

    fn emit_str(pattern: &str, flags: &str) -> Result<String, RegexError> {
        let deadline = Deadline::new(Duration::from_secs(5));
        let parsed = parse(pattern, RegexFlags::parse(flags)?, &deadline)?;
        Ok(emit(&parsed, &deadline)?.pattern)
    }

    #[test]
    fn literals_and_quantifiers() {
        assert_eq!(emit_str("ab+c{2,3}?", "").unwrap(), "ab+c{2,3}?");
        assert_eq!(emit_str("(?:ab)*", "").unwrap(), "(?:ab)*");
        assert_eq!(emit_str("a.b", "").unwrap(), format!("a{DOT}b"));
        assert_eq!(emit_str("\\.", "").unwrap(), "\\.");
    }

    #[test]
    fn surrogate_pairs_are_joined() {
        assert_eq!(emit_str("\\ud83d\\udca9", "").unwrap(), "\u{1F4A9}");
        assert_eq!(emit_str("\\ud83d\\udca9", "u").unwrap(), "\u{1F4A9}");
        assert!(matches!(emit_str("\\ud83d", ""), Err(RegexError::Unsupported(_))));
    }

    #[test]
    fn classes_clip_surrogates() {
        assert_eq!(emit_str("[a-c]", "").unwrap(), "[a-c]");
        assert_eq!(emit_str("[^]", "").unwrap(), DOT_ALL);
        assert_eq!(emit_str("[]", "").unwrap(), NOTHING);
        assert_eq!(
            emit_str("[\\0-\\u{10FFFF}]", "u").unwrap(),
            r"[\x{0}-\x{D7FF}\x{E000}-\x{FFFF}\x{10000}-\x{10FFFF}]"
        );
    }

    #[test]
    fn duplicate_group_names_get_suffixes() {
        let deadline = Deadline::new(Duration::from_secs(5));
        let parsed = parse("(?<y>a)|(?<y>b)", RegexFlags::empty(), &deadline).unwrap();
        let emitted = emit(&parsed, &deadline).unwrap();
        assert_eq!(emitted.pattern, "(?<y>a)|(?<y.2>b)");
        assert_eq!(emitted.group_names["y"].as_slice(), &[1, 2]);
    }

    #[test]
    fn word_class_is_exempt_from_case_folding() {
        assert_eq!(
            emit_str("\\w", "iu").unwrap(),
            r"(?i)(?-i:[0-9A-Z_a-z\x{17F}\x{212A}])"
        );
        assert_eq!(emit_str("\\w", "i").unwrap(), "[0-9A-Z_a-z]");
    }

    #[test]
    fn ignore_case_without_unicode_spells_out_variants() {
        assert_eq!(emit_str("s1", "i").unwrap(), "[Ss]1");
        assert_eq!(emit_str("[k-l]", "i").unwrap(), "[K-Lk-l]");
        assert_eq!(emit_str("\\u00df", "i").unwrap(), "\u{DF}");
        assert_eq!(emit_str("s", "iu").unwrap(), "(?i)s");
    }

    #[test]
    fn code_unit_atoms_are_reported() {
        let deadline = Deadline::new(Duration::from_secs(5));
        let flagged = |pattern: &str, flags: &str| {
            let parsed = parse(pattern, RegexFlags::parse(flags).unwrap(), &deadline).unwrap();
            emit(&parsed, &deadline).unwrap().code_unit_atoms
        };
        assert!(flagged("a.b", ""));
        assert!(flagged("[^a]", ""));
        assert!(!flagged("[a-z]+", ""));
        assert!(!flagged("a.b", "u"));
        assert!(!flagged("[^a]", "u"));
    }

    #[test]
    fn set_operations_bracket_operands() {
        assert_eq!(
            emit_str("[\\p{L}--[a-z]]", "v").unwrap(),
            r"[[\p{L}]--[a-z]]"
        );
    }
}
