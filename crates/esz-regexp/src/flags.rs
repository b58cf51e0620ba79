use crate::error::{RegexError, syntax};
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Regular expression flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RegexFlags: u8 {
        const HAS_INDICES = 1 << 0;
        const GLOBAL = 1 << 1;
        const IGNORE_CASE = 1 << 2;
        const MULTILINE = 1 << 3;
        const DOT_ALL = 1 << 4;
        const UNICODE = 1 << 5;
        const UNICODE_SETS = 1 << 6;
        const STICKY = 1 << 7;
    }
}

const FLAG_CHARS: [(char, RegexFlags); 8] = [
    ('d', RegexFlags::HAS_INDICES),
    ('g', RegexFlags::GLOBAL),
    ('i', RegexFlags::IGNORE_CASE),
    ('m', RegexFlags::MULTILINE),
    ('s', RegexFlags::DOT_ALL),
    ('u', RegexFlags::UNICODE),
    ('v', RegexFlags::UNICODE_SETS),
    ('y', RegexFlags::STICKY),
];

impl RegexFlags {
    /// Parse a flag string. Unknown letters, repeats and `u` together with
    /// `v` are errors.
    pub fn parse(text: &str) -> Result<RegexFlags, RegexError> {
        let mut flags = RegexFlags::empty();
        for c in text.chars() {
            let Some(&(_, flag)) = FLAG_CHARS.iter().find(|(letter, _)| *letter == c) else {
                return syntax(format!("Invalid flags supplied to RegExp constructor '{text}'"));
            };
            if flags.contains(flag) {
                return syntax(format!("Duplicate flag '{c}'"));
            }
            flags |= flag;
        }
        if flags.contains(RegexFlags::UNICODE | RegexFlags::UNICODE_SETS) {
            return syntax("Flags 'u' and 'v' cannot be combined");
        }
        Ok(flags)
    }

    /// Either `u` or `v`: the pattern is parsed over code points.
    #[inline]
    pub fn is_unicode_mode(self) -> bool {
        self.intersects(RegexFlags::UNICODE | RegexFlags::UNICODE_SETS)
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, flag) in FLAG_CHARS {
            if self.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_in_canonical_order() {
        let flags = RegexFlags::parse("yigu").unwrap();
        assert_eq!(flags.to_string(), "giuy");
        assert!(flags.is_unicode_mode());
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(RegexFlags::parse("gg").is_err());
        assert!(RegexFlags::parse("x").is_err());
        assert!(RegexFlags::parse("uv").is_err());
        assert_eq!(RegexFlags::parse("").unwrap(), RegexFlags::empty());
    }
}
