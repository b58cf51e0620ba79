//! Parser from ECMAScript patterns to IR.
//!
//! Outside Unicode mode the pattern is read as UTF-16 code units, so an astral
//! character in the source becomes two surrogate atoms exactly as the
//! language defines it. Unicode mode (`u` or `v`) reads code points.

use crate::code_point_set::{CodePointSet, Interval};
use crate::deadline::Deadline;
use crate::error::{RegexError, syntax};
use crate::flags::RegexFlags;
use crate::ir::{
    AnchorKind, BackReference, Capture, CharClass, ClassOp, ClassOperand, Node, Pattern,
    PropertyEscape, Quantifier,
};
use crate::properties::check_property;
use esz_scanner::char_codes::{
    combine_surrogates, is_high_surrogate, is_identifier_part, is_identifier_start,
    is_low_surrogate, is_surrogate,
};

const DIGITS: [Interval; 1] = [Interval::new(0x30, 0x39)];

const WORD_CHARS: [Interval; 4] = [
    Interval::new(0x30, 0x39),
    Interval::new(0x41, 0x5A),
    Interval::single(0x5F),
    Interval::new(0x61, 0x7A),
];

/// `WhiteSpace` and `LineTerminator`.
const SPACES: [Interval; 10] = [
    Interval::new(0x09, 0x0D),
    Interval::single(0x20),
    Interval::single(0xA0),
    Interval::single(0x1680),
    Interval::new(0x2000, 0x200A),
    Interval::new(0x2028, 0x2029),
    Interval::single(0x202F),
    Interval::single(0x205F),
    Interval::single(0x3000),
    Interval::single(0xFEFF),
];

/// Code points that case-fold into `\w` only under Unicode case folding.
const UNICODE_WORD_FOLDS: [u32; 2] = [0x017F, 0x212A];

enum ClassAtom {
    Char(u32),
    Set(CodePointSet),
    Property(PropertyEscape),
}

/// Operand of a `v`-mode class before union merging.
enum SetOperand {
    Char(u32),
    Operand(ClassOperand),
}

struct NamedGroup {
    name: String,
    index: u32,
    /// `(disjunction, alternative)` pairs from the root to the group.
    path: Vec<(u32, u32)>,
}

struct Parser<'d> {
    units: Vec<u32>,
    pos: usize,
    flags: RegexFlags,
    unicode: bool,
    sets: bool,
    capture_count: u32,
    /// Captures in the whole pattern, known before parsing starts so that
    /// forward references resolve.
    total_captures: u32,
    has_named_groups: bool,
    named_groups: Vec<NamedGroup>,
    named_references: Vec<String>,
    path: Vec<(u32, u32)>,
    next_disjunction: u32,
    deadline: &'d Deadline,
}

/// Parse `pattern` under `flags`.
pub(crate) fn parse(
    pattern: &str,
    flags: RegexFlags,
    deadline: &Deadline,
) -> Result<Pattern, RegexError> {
    let unicode = flags.is_unicode_mode();
    let units: Vec<u32> = if unicode {
        pattern.chars().map(u32::from).collect()
    } else {
        pattern.encode_utf16().map(u32::from).collect()
    };
    let mut parser = Parser {
        units,
        pos: 0,
        flags,
        unicode,
        sets: flags.contains(RegexFlags::UNICODE_SETS),
        capture_count: 0,
        total_captures: 0,
        has_named_groups: false,
        named_groups: Vec::new(),
        named_references: Vec::new(),
        path: Vec::new(),
        next_disjunction: 0,
        deadline,
    };
    parser.parse_pattern()
}

fn in_different_alternatives(a: &[(u32, u32)], b: &[(u32, u32)]) -> bool {
    a.iter()
        .zip(b)
        .any(|(x, y)| x.0 == y.0 && x.1 != y.1)
}

fn may_contain_strings(class: &CharClass) -> bool {
    let operand_may = |operand: &ClassOperand| match operand {
        ClassOperand::Strings(_) => true,
        ClassOperand::Nested(nested) => !nested.negated && may_contain_strings(nested),
        ClassOperand::Set(_) | ClassOperand::Property(_) => false,
    };
    match class.op {
        ClassOp::Union => class.operands.iter().any(operand_may),
        ClassOp::Intersection => class.operands.iter().all(operand_may),
        ClassOp::Difference => class.operands.first().is_some_and(operand_may),
    }
}

fn is_syntax_character(c: char) -> bool {
    matches!(
        c,
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
    )
}

fn is_class_set_syntax_character(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '[' | ']' | '{' | '}' | '/' | '-' | '\\' | '|'
    )
}

fn is_class_set_reserved_punctuator(c: char) -> bool {
    matches!(
        c,
        '&' | '-' | '!' | '#' | '%' | ',' | ':' | ';' | '<' | '=' | '>' | '@' | '`' | '~'
    )
}

fn is_class_set_reserved_double_punctuator(c: char) -> bool {
    matches!(
        c,
        '&' | '!' | '#' | '$' | '%' | '*' | '+' | ',' | '.' | ':' | ';' | '<' | '=' | '>' | '?'
            | '@' | '^' | '`' | '~'
    )
}

impl Parser<'_> {
    // =========================================================================
    // Input
    // =========================================================================

    #[inline]
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    #[inline]
    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.units
            .get(self.pos + ahead)
            .map(|&unit| char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    #[inline]
    fn bump(&mut self) -> Option<u32> {
        let unit = self.units.get(self.pos).copied()?;
        self.pos += 1;
        Some(unit)
    }

    #[inline]
    fn eat(&mut self, c: char) -> bool {
        if self.units.get(self.pos) == Some(&u32::from(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_str(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.units.get(self.pos + i) == Some(&u32::from(c)))
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.at_str(s) {
            self.pos += s.chars().count();
            true
        } else {
            false
        }
    }

    fn parse_decimal(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(digit);
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn parse_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for _ in 0..count {
            let digit = self.peek().and_then(|c| c.to_digit(16))?;
            value = value * 16 + digit;
            self.pos += 1;
        }
        Some(value)
    }

    // =========================================================================
    // Pattern structure
    // =========================================================================

    fn parse_pattern(&mut self) -> Result<Pattern, RegexError> {
        self.count_captures();
        let node = self.parse_disjunction()?;
        if let Some(c) = self.peek() {
            return if c == ')' {
                syntax("Unmatched ')'")
            } else {
                syntax(format!("Unexpected character '{c}'"))
            };
        }
        for name in &self.named_references {
            if !self.named_groups.iter().any(|group| &group.name == name) {
                return syntax(format!("Invalid named capture referenced '{name}'"));
            }
        }
        Ok(Pattern {
            node,
            flags: self.flags,
            capture_count: self.capture_count,
            named_groups: self
                .named_groups
                .iter()
                .map(|group| (group.name.clone(), group.index))
                .collect(),
        })
    }

    /// Count capturing groups ahead of the real parse.
    fn count_captures(&mut self) {
        let (mut total, mut named) = (0, false);
        let mut class_depth = 0u32;
        let mut i = 0;
        while let Some(&unit) = self.units.get(i) {
            match char::from_u32(unit) {
                Some('\\') => i += 1,
                Some('[') if class_depth == 0 || self.sets => class_depth += 1,
                Some(']') if class_depth > 0 => class_depth -= 1,
                Some('(') if class_depth == 0 => {
                    let at = |offset: usize| self.units.get(i + offset).copied();
                    if at(1) != Some(u32::from('?')) {
                        total += 1;
                    } else if at(2) == Some(u32::from('<'))
                        && !matches!(at(3), Some(0x3D | 0x21))
                    {
                        total += 1;
                        named = true;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        self.total_captures = total;
        self.has_named_groups = named;
    }

    fn parse_disjunction(&mut self) -> Result<Node, RegexError> {
        let id = self.next_disjunction;
        self.next_disjunction += 1;
        let mut alternatives = Vec::new();
        let mut index = 0;
        loop {
            self.path.push((id, index));
            let alternative = self.parse_alternative();
            self.path.pop();
            alternatives.push(alternative?);
            if !self.eat('|') {
                break;
            }
            index += 1;
        }
        Ok(Node::alt(alternatives))
    }

    fn parse_alternative(&mut self) -> Result<Node, RegexError> {
        let mut terms = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            self.deadline.check()?;
            self.parse_term(&mut terms)?;
        }
        Ok(Node::cat(terms))
    }

    fn parse_term(&mut self, terms: &mut Vec<Node>) -> Result<(), RegexError> {
        let start = self.pos;
        let Some(unit) = self.bump() else {
            return Ok(());
        };
        let c = char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER);
        let quantifiable = match c {
            '^' => {
                terms.push(Node::Anchor(AnchorKind::Start));
                false
            }
            '$' => {
                terms.push(Node::Anchor(AnchorKind::End));
                false
            }
            '\\' if matches!(self.peek(), Some('b' | 'B')) => {
                let negated = self.peek() == Some('B');
                self.pos += 1;
                terms.push(Node::WordBoundary { negated });
                false
            }
            '\\' => {
                self.parse_atom_escape(terms)?;
                true
            }
            '.' => {
                terms.push(Node::Dot);
                true
            }
            '(' => self.parse_group(terms)?,
            '[' => {
                let class = self.parse_class()?;
                terms.push(Node::Class(class));
                true
            }
            '*' | '+' | '?' => return syntax("Nothing to repeat"),
            '{' => {
                self.pos = start;
                if self.try_parse_braced_quantifier()?.is_some() {
                    return syntax("Nothing to repeat");
                }
                if self.unicode {
                    return syntax("Lone quantifier brackets");
                }
                self.pos = start + 1;
                terms.push(Node::Char(unit));
                true
            }
            '}' if self.unicode => return syntax("Lone quantifier brackets"),
            ']' if self.unicode => return syntax("Lone ']'"),
            _ => {
                terms.push(Node::Char(unit));
                true
            }
        };
        self.parse_quantifier(terms, quantifiable)
    }

    fn parse_quantifier(
        &mut self,
        terms: &mut Vec<Node>,
        quantifiable: bool,
    ) -> Result<(), RegexError> {
        let Some(quantifier) = self.try_parse_quantifier()? else {
            return Ok(());
        };
        if !quantifiable {
            return syntax("Nothing to repeat");
        }
        let Some(node) = terms.pop() else {
            return syntax("Nothing to repeat");
        };
        terms.push(Node::Repeat {
            node: Box::new(node),
            quantifier,
        });
        Ok(())
    }

    fn try_parse_quantifier(&mut self) -> Result<Option<Quantifier>, RegexError> {
        let (min, max) = match self.peek() {
            Some('*') => {
                self.pos += 1;
                (0, None)
            }
            Some('+') => {
                self.pos += 1;
                (1, None)
            }
            Some('?') => {
                self.pos += 1;
                (0, Some(1))
            }
            Some('{') => match self.try_parse_braced_quantifier()? {
                Some(bounds) => bounds,
                None if self.unicode => return syntax("Incomplete quantifier"),
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        let greedy = !self.eat('?');
        Ok(Some(Quantifier { min, max, greedy }))
    }

    /// `{n}`, `{n,}` or `{n,m}`. Leaves the position untouched when the text
    /// is not a quantifier.
    fn try_parse_braced_quantifier(&mut self) -> Result<Option<(u32, Option<u32>)>, RegexError> {
        let start = self.pos;
        if !self.eat('{') {
            return Ok(None);
        }
        let Some(min) = self.parse_decimal() else {
            self.pos = start;
            return Ok(None);
        };
        let max = if self.eat(',') {
            self.parse_decimal()
        } else {
            Some(min)
        };
        if !self.eat('}') {
            self.pos = start;
            return Ok(None);
        }
        if let Some(max) = max
            && max < min
        {
            return syntax("numbers out of order in {} quantifier");
        }
        Ok(Some((min, max)))
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Parse a group after its `(`. Returns whether the group may be
    /// quantified.
    fn parse_group(&mut self, terms: &mut Vec<Node>) -> Result<bool, RegexError> {
        if !self.eat('?') {
            let node = self.parse_capture(None)?;
            terms.push(node);
            return Ok(true);
        }
        let look_around = if self.eat('=') {
            Some((false, false))
        } else if self.eat('!') {
            Some((false, true))
        } else if self.eat_str("<=") {
            Some((true, false))
        } else if self.eat_str("<!") {
            Some((true, true))
        } else {
            None
        };
        if let Some((behind, negated)) = look_around {
            let node = self.parse_disjunction()?;
            self.expect_close_paren()?;
            terms.push(Node::LookAround {
                behind,
                negated,
                node: Box::new(node),
            });
            return Ok(!behind && !self.unicode);
        }
        if self.eat(':') {
            let node = self.parse_disjunction()?;
            self.expect_close_paren()?;
            terms.push(Node::Group {
                capture: None,
                node: Box::new(node),
            });
            return Ok(true);
        }
        if self.eat('<') {
            let name = self.parse_group_name()?;
            let node = self.parse_capture(Some(name))?;
            terms.push(node);
            return Ok(true);
        }
        syntax("Invalid group")
    }

    fn parse_capture(&mut self, name: Option<String>) -> Result<Node, RegexError> {
        self.capture_count += 1;
        let index = self.capture_count;
        if let Some(name) = &name {
            self.declare_group_name(name, index)?;
        }
        let node = self.parse_disjunction()?;
        self.expect_close_paren()?;
        Ok(Node::Group {
            capture: Some(Capture { index, name }),
            node: Box::new(node),
        })
    }

    fn declare_group_name(&mut self, name: &str, index: u32) -> Result<(), RegexError> {
        let clash = self
            .named_groups
            .iter()
            .any(|group| group.name == name && !in_different_alternatives(&group.path, &self.path));
        if clash {
            return syntax(format!("Duplicate capture group name '{name}'"));
        }
        self.named_groups.push(NamedGroup {
            name: name.to_string(),
            index,
            path: self.path.clone(),
        });
        Ok(())
    }

    fn expect_close_paren(&mut self) -> Result<(), RegexError> {
        if self.eat(')') {
            Ok(())
        } else {
            syntax("Unterminated group")
        }
    }

    /// Parse a group name after its `<`, through the closing `>`.
    fn parse_group_name(&mut self) -> Result<String, RegexError> {
        let mut name = String::new();
        loop {
            let Some(unit) = self.bump() else {
                return syntax("Invalid capture group name");
            };
            if unit == u32::from('>') {
                break;
            }
            let cp = if unit == u32::from('\\') {
                if !self.eat('u') {
                    return syntax("Invalid capture group name");
                }
                match self.parse_unicode_escape(true) {
                    Some(cp) => cp,
                    None => return syntax("Invalid Unicode escape"),
                }
            } else if is_high_surrogate(unit)
                && let Some(&low) = self.units.get(self.pos)
                && is_low_surrogate(low)
            {
                self.pos += 1;
                combine_surrogates(unit, low)
            } else {
                unit
            };
            let valid = if name.is_empty() {
                is_identifier_start(cp)
            } else {
                is_identifier_part(cp)
            };
            match char::from_u32(cp) {
                Some(c) if valid => name.push(c),
                _ => return syntax("Invalid capture group name"),
            }
        }
        if name.is_empty() {
            return syntax("Invalid capture group name");
        }
        Ok(name)
    }

    // =========================================================================
    // Escapes
    // =========================================================================

    /// Parse an escape outside a class, after its `\`.
    fn parse_atom_escape(&mut self, terms: &mut Vec<Node>) -> Result<(), RegexError> {
        let Some(c) = self.peek() else {
            return syntax("\\ at end of pattern");
        };
        match c {
            'd' | 'D' | 's' | 'S' | 'w' | 'W' => {
                self.pos += 1;
                let mut class = CharClass::from_set(self.class_escape_set(c), false);
                class.fold_exempt = matches!(c, 'w' | 'W');
                terms.push(Node::Class(class));
            }
            'p' | 'P' if self.unicode => {
                self.pos += 1;
                let property = self.parse_property(c == 'P')?;
                terms.push(Node::Property(property));
            }
            '1'..='9' => {
                let start = self.pos;
                let number = self.parse_decimal().unwrap_or(0);
                if number <= self.total_captures {
                    terms.push(Node::BackReference(BackReference::Index(number)));
                    return Ok(());
                }
                if self.unicode {
                    return syntax("Invalid escape");
                }
                self.pos = start;
                if c >= '8' {
                    self.pos += 1;
                    terms.push(Node::Char(u32::from(c)));
                } else {
                    terms.push(Node::Char(self.parse_legacy_octal()));
                }
            }
            'k' if self.unicode || self.has_named_groups => {
                self.pos += 1;
                if !self.eat('<') {
                    return syntax("Invalid named reference");
                }
                let name = self.parse_group_name()?;
                self.named_references.push(name.clone());
                terms.push(Node::BackReference(BackReference::Named(name)));
            }
            _ => {
                let cp = self.parse_character_escape(false)?;
                terms.push(Node::Char(cp));
            }
        }
        Ok(())
    }

    /// Parse a `CharacterEscape` or identity escape after its `\`.
    fn parse_character_escape(&mut self, in_class: bool) -> Result<u32, RegexError> {
        let start = self.pos;
        let Some(unit) = self.bump() else {
            return syntax("\\ at end of pattern");
        };
        let c = char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER);
        let cp = match c {
            'f' => 0x0C,
            'n' => 0x0A,
            'r' => 0x0D,
            't' => 0x09,
            'v' => 0x0B,
            'c' => match self.peek() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.pos += 1;
                    u32::from(letter) % 32
                }
                Some(letter)
                    if in_class && !self.unicode && (letter.is_ascii_digit() || letter == '_') =>
                {
                    self.pos += 1;
                    u32::from(letter) % 32
                }
                _ if self.unicode => return syntax("Invalid unicode escape"),
                _ => {
                    // The backslash matches itself and `c` is read again.
                    self.pos = start;
                    u32::from('\\')
                }
            },
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => 0,
            '0'..='7' => {
                if self.unicode {
                    return syntax("Invalid decimal escape");
                }
                self.pos = start;
                self.parse_legacy_octal()
            }
            '8' | '9' if self.unicode => return syntax("Invalid escape"),
            'x' => match self.parse_hex_digits(2) {
                Some(value) => value,
                None if self.unicode => return syntax("Invalid escape"),
                None => {
                    self.pos = start + 1;
                    u32::from('x')
                }
            },
            'u' => match self.parse_unicode_escape(self.unicode) {
                Some(value) => value,
                None if self.unicode => return syntax("Invalid Unicode escape"),
                None => u32::from('u'),
            },
            '/' => unit,
            c if is_syntax_character(c) => unit,
            '-' if self.unicode && in_class => unit,
            c if self.sets && in_class && is_class_set_reserved_punctuator(c) => unit,
            _ if self.unicode => return syntax("Invalid escape"),
            _ => unit,
        };
        Ok(cp)
    }

    /// Annex B legacy octal escape: up to three octal digits, at most `\377`.
    fn parse_legacy_octal(&mut self) -> u32 {
        let max_digits = if matches!(self.peek(), Some('0'..='3')) { 3 } else { 2 };
        let mut value = 0;
        let mut count = 0;
        while count < max_digits
            && let Some(digit) = self.peek().and_then(|c| c.to_digit(8))
        {
            value = value * 8 + digit;
            self.pos += 1;
            count += 1;
        }
        value
    }

    /// Parse the rest of a `\u` escape. On failure the position is restored
    /// to just after the `u`.
    fn parse_unicode_escape(&mut self, unicode: bool) -> Option<u32> {
        let start = self.pos;
        if unicode && self.eat('{') {
            let digits_start = self.pos;
            let mut value: u32 = 0;
            while let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) {
                value = value.saturating_mul(16).saturating_add(digit);
                self.pos += 1;
            }
            if self.pos == digits_start || value > 0x10_FFFF || !self.eat('}') {
                self.pos = start;
                return None;
            }
            return Some(value);
        }
        let Some(lead) = self.parse_hex_digits(4) else {
            self.pos = start;
            return None;
        };
        if unicode && is_high_surrogate(lead) {
            let after_lead = self.pos;
            if self.eat_str("\\u")
                && let Some(trail) = self.parse_hex_digits(4)
                && is_low_surrogate(trail)
            {
                return Some(combine_surrogates(lead, trail));
            }
            self.pos = after_lead;
        }
        Some(lead)
    }

    fn class_escape_set(&self, c: char) -> CodePointSet {
        let mut set = match c.to_ascii_lowercase() {
            'd' => CodePointSet::from_intervals(&DIGITS),
            's' => CodePointSet::from_intervals(&SPACES),
            _ => {
                let mut words = CodePointSet::from_intervals(&WORD_CHARS);
                if self.unicode && self.flags.contains(RegexFlags::IGNORE_CASE) {
                    for cp in UNICODE_WORD_FOLDS {
                        words.add_one(cp);
                    }
                }
                words
            }
        };
        if c.is_ascii_uppercase() {
            set = set.inverted();
        }
        set
    }

    /// Parse `{name=value}` or `{value}` after `\p` / `\P`.
    fn parse_property(&mut self, negated: bool) -> Result<PropertyEscape, RegexError> {
        if !self.eat('{') {
            return syntax("Invalid property name");
        }
        let mut name = None;
        let mut buffer = String::new();
        loop {
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some('=') if name.is_none() && !buffer.is_empty() => {
                    self.pos += 1;
                    name = Some(std::mem::take(&mut buffer));
                }
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    self.pos += 1;
                    buffer.push(c);
                }
                _ => return syntax("Invalid property name"),
            }
        }
        if buffer.is_empty() {
            return syntax("Invalid property name");
        }
        check_property(name.as_deref(), &buffer)?;
        Ok(PropertyEscape {
            name,
            value: buffer,
            negated,
        })
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Parse a character class after its `[`.
    fn parse_class(&mut self) -> Result<CharClass, RegexError> {
        if self.sets {
            return self.parse_class_set_expression();
        }
        let negated = self.eat('^');
        let mut set = CodePointSet::new();
        let mut properties = Vec::new();
        let mut lone_surrogates = false;
        loop {
            self.deadline.check()?;
            match self.peek() {
                None => return syntax("Unterminated character class"),
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                _ => {}
            }
            let first = self.parse_class_atom()?;
            let is_range = self.peek() == Some('-') && self.peek_at(1).is_some_and(|c| c != ']');
            if !is_range {
                self.add_class_atom(first, &mut set, &mut properties, &mut lone_surrogates);
                continue;
            }
            self.pos += 1;
            let second = self.parse_class_atom()?;
            match (first, second) {
                (ClassAtom::Char(low), ClassAtom::Char(high)) => {
                    if low > high {
                        return syntax("Range out of order in character class");
                    }
                    if !self.unicode && (is_surrogate(low) || is_surrogate(high)) {
                        lone_surrogates = true;
                    }
                    set.add(Interval::new(low, high));
                }
                (first, second) => {
                    if self.unicode {
                        return syntax("Invalid character class");
                    }
                    self.add_class_atom(first, &mut set, &mut properties, &mut lone_surrogates);
                    set.add_one(u32::from('-'));
                    self.add_class_atom(second, &mut set, &mut properties, &mut lone_surrogates);
                }
            }
        }
        let mut operands = vec![ClassOperand::Set(set)];
        operands.extend(properties.into_iter().map(ClassOperand::Property));
        Ok(CharClass {
            negated,
            op: ClassOp::Union,
            operands,
            lone_surrogates,
            fold_exempt: false,
        })
    }

    fn add_class_atom(
        &self,
        atom: ClassAtom,
        set: &mut CodePointSet,
        properties: &mut Vec<PropertyEscape>,
        lone_surrogates: &mut bool,
    ) {
        match atom {
            ClassAtom::Char(cp) => {
                if !self.unicode && is_surrogate(cp) {
                    *lone_surrogates = true;
                }
                set.add_one(cp);
            }
            ClassAtom::Set(other) => set.add_set(&other),
            ClassAtom::Property(property) => properties.push(property),
        }
    }

    fn parse_class_atom(&mut self) -> Result<ClassAtom, RegexError> {
        let Some(unit) = self.bump() else {
            return syntax("Unterminated character class");
        };
        if unit != u32::from('\\') {
            return Ok(ClassAtom::Char(unit));
        }
        match self.peek() {
            None => syntax("\\ at end of pattern"),
            Some(c @ ('d' | 'D' | 's' | 'S' | 'w' | 'W')) => {
                self.pos += 1;
                Ok(ClassAtom::Set(self.class_escape_set(c)))
            }
            Some(c @ ('p' | 'P')) if self.unicode => {
                self.pos += 1;
                Ok(ClassAtom::Property(self.parse_property(c == 'P')?))
            }
            Some('b') => {
                self.pos += 1;
                Ok(ClassAtom::Char(0x08))
            }
            _ => Ok(ClassAtom::Char(self.parse_character_escape(true)?)),
        }
    }

    /// Parse a `v`-mode class after its `[`.
    fn parse_class_set_expression(&mut self) -> Result<CharClass, RegexError> {
        let negated = self.eat('^');
        let mut operands = Vec::new();
        if self.eat(']') {
            return Ok(self.finish_class_set(negated, ClassOp::Union, operands));
        }
        operands.push(self.parse_class_set_range()?);
        let op = if self.eat_str("&&") {
            ClassOp::Intersection
        } else if self.eat_str("--") {
            ClassOp::Difference
        } else {
            ClassOp::Union
        };
        if op == ClassOp::Union {
            loop {
                match self.peek() {
                    None => return syntax("Unterminated character class"),
                    Some(']') => {
                        self.pos += 1;
                        break;
                    }
                    _ => {}
                }
                if self.at_str("&&") || self.at_str("--") {
                    return syntax("Invalid set operation in character class");
                }
                operands.push(self.parse_class_set_range()?);
            }
        } else {
            let separator = if op == ClassOp::Intersection { "&&" } else { "--" };
            loop {
                operands.push(self.parse_class_set_operand()?);
                if self.eat(']') {
                    break;
                }
                if !self.eat_str(separator) {
                    return syntax("Invalid set operation in character class");
                }
            }
        }
        let class = self.finish_class_set(negated, op, operands);
        if negated && may_contain_strings(&class) {
            return syntax("Negated character class may contain strings");
        }
        Ok(class)
    }

    fn finish_class_set(&self, negated: bool, op: ClassOp, operands: Vec<SetOperand>) -> CharClass {
        let mut merged = Vec::with_capacity(operands.len());
        if op == ClassOp::Union {
            let mut set = CodePointSet::new();
            let mut rest = Vec::new();
            for operand in operands {
                match operand {
                    SetOperand::Char(cp) => set.add_one(cp),
                    SetOperand::Operand(ClassOperand::Set(other)) => set.add_set(&other),
                    SetOperand::Operand(other) => rest.push(other),
                }
            }
            merged.push(ClassOperand::Set(set));
            merged.extend(rest);
        } else {
            for operand in operands {
                merged.push(match operand {
                    SetOperand::Char(cp) => {
                        let mut set = CodePointSet::new();
                        set.add_one(cp);
                        ClassOperand::Set(set)
                    }
                    SetOperand::Operand(operand) => operand,
                });
            }
        }
        CharClass {
            negated,
            op,
            operands: merged,
            lone_surrogates: false,
            fold_exempt: false,
        }
    }

    /// An operand that may be the start of a `a-z` range.
    fn parse_class_set_range(&mut self) -> Result<SetOperand, RegexError> {
        let operand = self.parse_class_set_operand()?;
        let SetOperand::Char(low) = operand else {
            return Ok(operand);
        };
        if self.peek() != Some('-') || self.at_str("--") {
            return Ok(operand);
        }
        self.pos += 1;
        let SetOperand::Char(high) = self.parse_class_set_operand()? else {
            return syntax("Invalid character class");
        };
        if low > high {
            return syntax("Range out of order in character class");
        }
        let mut set = CodePointSet::new();
        set.add(Interval::new(low, high));
        Ok(SetOperand::Operand(ClassOperand::Set(set)))
    }

    fn parse_class_set_operand(&mut self) -> Result<SetOperand, RegexError> {
        self.deadline.check()?;
        let Some(c) = self.peek() else {
            return syntax("Unterminated character class");
        };
        match c {
            '[' => {
                self.pos += 1;
                let nested = self.parse_class_set_expression()?;
                Ok(SetOperand::Operand(ClassOperand::Nested(nested)))
            }
            '\\' => {
                self.pos += 1;
                match self.peek() {
                    Some(e @ ('d' | 'D' | 's' | 'S' | 'w' | 'W')) => {
                        self.pos += 1;
                        Ok(SetOperand::Operand(ClassOperand::Set(self.class_escape_set(e))))
                    }
                    Some(e @ ('p' | 'P')) => {
                        self.pos += 1;
                        let property = self.parse_property(e == 'P')?;
                        Ok(SetOperand::Operand(ClassOperand::Property(property)))
                    }
                    Some('q') => {
                        self.pos += 1;
                        self.parse_class_string_disjunction()
                    }
                    Some('b') => {
                        self.pos += 1;
                        Ok(SetOperand::Char(0x08))
                    }
                    _ => Ok(SetOperand::Char(self.parse_character_escape(true)?)),
                }
            }
            _ if is_class_set_syntax_character(c) => {
                syntax(format!("Invalid character '{c}' in character class"))
            }
            _ if is_class_set_reserved_double_punctuator(c) && self.peek_at(1) == Some(c) => {
                syntax("Invalid set operation in character class")
            }
            _ => {
                let unit = self.bump().unwrap_or(u32::from(c));
                Ok(SetOperand::Char(unit))
            }
        }
    }

    /// Parse `{a|bc}` after `\q`.
    fn parse_class_string_disjunction(&mut self) -> Result<SetOperand, RegexError> {
        if !self.eat('{') {
            return syntax("Invalid escape");
        }
        let mut strings = Vec::new();
        let mut current = Vec::new();
        loop {
            match self.peek() {
                None => return syntax("Unterminated class string disjunction"),
                Some('}') => {
                    self.pos += 1;
                    strings.push(std::mem::take(&mut current));
                    break;
                }
                Some('|') => {
                    self.pos += 1;
                    strings.push(std::mem::take(&mut current));
                }
                Some('\\') => {
                    self.pos += 1;
                    current.push(self.parse_character_escape(true)?);
                }
                Some(c) if is_class_set_syntax_character(c) => {
                    return syntax(format!("Invalid character '{c}' in character class"));
                }
                Some(_) => {
                    if let Some(unit) = self.bump() {
                        current.push(unit);
                    }
                }
            }
        }
        let mut set = CodePointSet::new();
        let mut long = Vec::new();
        for string in strings {
            match string.as_slice() {
                [cp] => set.add_one(*cp),
                _ => long.push(string),
            }
        }
        if long.is_empty() {
            return Ok(SetOperand::Operand(ClassOperand::Set(set)));
        }
        Ok(SetOperand::Operand(ClassOperand::Nested(CharClass {
            negated: false,
            op: ClassOp::Union,
            operands: vec![ClassOperand::Set(set), ClassOperand::Strings(long)],
            lone_surrogates: false,
            fold_exempt: false,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse_with(pattern: &str, flags: &str) -> Result<Pattern, RegexError> {
        let deadline = Deadline::new(Duration::from_secs(5));
        parse(pattern, RegexFlags::parse(flags)?, &deadline)
    }

    #[test]
    fn astral_literal_is_two_units_outside_unicode_mode() {
        let pattern = parse_with("\u{1F4A9}", "").unwrap();
        assert_eq!(pattern.node, Node::Cat(vec![Node::Char(0xD83D), Node::Char(0xDCA9)]));
        let pattern = parse_with("\u{1F4A9}", "u").unwrap();
        assert_eq!(pattern.node, Node::Char(0x1F4A9));
    }

    #[test]
    fn quantifier_binds_to_last_atom() {
        let pattern = parse_with("ab+?", "").unwrap();
        let Node::Cat(nodes) = pattern.node else {
            panic!("expected a sequence");
        };
        assert_eq!(
            nodes[1],
            Node::Repeat {
                node: Box::new(Node::Char(u32::from('b'))),
                quantifier: Quantifier {
                    min: 1,
                    max: None,
                    greedy: false,
                },
            }
        );
    }

    #[test]
    fn decimal_escapes_follow_annex_b() {
        assert_eq!(parse_with("\\1", "").unwrap().node, Node::Char(1));
        assert_eq!(parse_with("\\8", "").unwrap().node, Node::Char(u32::from('8')));
        assert_eq!(
            parse_with("(a)\\1", "").unwrap().node,
            Node::Cat(vec![
                Node::Group {
                    capture: Some(Capture { index: 1, name: None }),
                    node: Box::new(Node::Char(u32::from('a'))),
                },
                Node::BackReference(BackReference::Index(1)),
            ])
        );
        assert!(parse_with("\\1", "u").is_err());
    }

    #[test]
    fn forward_references_count_later_groups() {
        let pattern = parse_with("\\2(a)(b)", "").unwrap();
        let Node::Cat(nodes) = pattern.node else {
            panic!("expected a sequence");
        };
        assert_eq!(nodes[0], Node::BackReference(BackReference::Index(2)));
        assert_eq!(pattern.capture_count, 2);
    }

    #[test]
    fn duplicate_names_need_separate_alternatives() {
        assert!(parse_with("(?<a>x)|(?<a>y)", "").is_ok());
        assert!(parse_with("(?:(?<a>x)|(?<a>y))\\k<a>", "").is_ok());
        assert!(matches!(
            parse_with("(?<a>x)(?<a>y)", ""),
            Err(RegexError::Syntax(_))
        ));
        assert!(parse_with("((?<a>x)|b)(?<a>y)", "").is_err());
    }

    #[test]
    fn unknown_named_reference_is_an_error() {
        assert!(parse_with("(?<a>x)\\k<b>", "").is_err());
        assert!(parse_with("\\k<b>", "u").is_err());
        assert_eq!(
            parse_with("\\k", "").unwrap().node,
            Node::Char(u32::from('k'))
        );
    }

    #[test]
    fn group_names_accept_escapes_and_astral_letters() {
        let pattern = parse_with("(?<\\u0061b>x)(?<\u{1D4D0}>y)", "").unwrap();
        assert_eq!(
            pattern.named_groups,
            vec![("ab".to_string(), 1), ("\u{1D4D0}".to_string(), 2)]
        );
    }

    #[test]
    fn class_escape_ranges_are_literal_outside_unicode_mode() {
        let pattern = parse_with("[\\d-z]", "").unwrap();
        let Node::Class(class) = pattern.node else {
            panic!("expected a class");
        };
        let ClassOperand::Set(set) = &class.operands[0] else {
            panic!("expected a set");
        };
        assert!(set.contains(u32::from('5')));
        assert!(set.contains(u32::from('-')));
        assert!(set.contains(u32::from('z')));
        assert!(!set.contains(u32::from('y')));
        assert!(parse_with("[\\d-z]", "u").is_err());
    }

    #[test]
    fn unicode_set_operations() {
        let pattern = parse_with("[\\p{L}--[a-z]]", "v").unwrap();
        let Node::Class(class) = pattern.node else {
            panic!("expected a class");
        };
        assert_eq!(class.op, ClassOp::Difference);
        assert_eq!(class.operands.len(), 2);
        assert!(parse_with("[a&&&b]", "v").is_err());
        assert!(parse_with("[(]", "v").is_err());
        assert!(parse_with("[^\\q{ab}]", "v").is_err());
    }

    #[test]
    fn control_escape_fallback() {
        // `\c` without a letter is a literal backslash followed by `c`.
        assert_eq!(
            parse_with("\\c1", "").unwrap().node,
            Node::Cat(vec![
                Node::Char(u32::from('\\')),
                Node::Char(u32::from('c')),
                Node::Char(u32::from('1')),
            ])
        );
        assert_eq!(parse_with("\\cJ", "").unwrap().node, Node::Char(0x0A));
        assert!(parse_with("\\c1", "u").is_err());
    }
}
