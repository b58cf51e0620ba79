//! Character classification for the scanner.
//!
//! All predicates take a code point (`u32`) so callers can classify values
//! decoded from `\u` escapes without first proving they are scalar values.
//! ASCII is answered inline; the rest of the BMP goes through a generated
//! nibble table and astral code points through a binary search over
//! generated range tables.

include!(concat!(env!("OUT_DIR"), "/char_tables.rs"));

const WHITE_SPACE_BIT: u8 = 1;
const ID_START_BIT: u8 = 2;
const ID_PART_BIT: u8 = 4;

pub const NULL: u32 = 0x00;
pub const TAB: u32 = 0x09;
pub const LINE_FEED: u32 = 0x0A;
pub const VERTICAL_TAB: u32 = 0x0B;
pub const FORM_FEED: u32 = 0x0C;
pub const CARRIAGE_RETURN: u32 = 0x0D;
pub const SPACE: u32 = 0x20;
pub const NON_BREAKING_SPACE: u32 = 0xA0;
pub const ZERO_WIDTH_NON_JOINER: u32 = 0x200C;
pub const ZERO_WIDTH_JOINER: u32 = 0x200D;
pub const LINE_SEPARATOR: u32 = 0x2028;
pub const PARAGRAPH_SEPARATOR: u32 = 0x2029;
pub const BYTE_ORDER_MARK: u32 = 0xFEFF;
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;
pub const MAX_CODE_POINT: u32 = 0x10_FFFF;

#[inline]
fn bmp_bits(cp: u32) -> u8 {
    let byte = BMP_TABLE[(cp >> 1) as usize];
    if cp & 1 == 0 { byte & 0x0F } else { byte >> 4 }
}

#[inline]
fn in_ranges(ranges: &[(u32, u32)], cp: u32) -> bool {
    ranges
        .binary_search_by(|&(start, end)| {
            if end < cp {
                std::cmp::Ordering::Less
            } else if start > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// ECMAScript `WhiteSpace`: TAB, VT, FF, ZWNBSP and any `Zs` code point.
#[inline]
pub fn is_white_space(cp: u32) -> bool {
    if cp < 0x80 {
        return matches!(cp, TAB | VERTICAL_TAB | FORM_FEED | SPACE);
    }
    cp < 0x1_0000 && bmp_bits(cp) & WHITE_SPACE_BIT != 0
}

/// ECMAScript `LineTerminator`: LF, CR, LS, PS.
#[inline]
pub fn is_line_terminator(cp: u32) -> bool {
    matches!(
        cp,
        LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR
    )
}

/// ECMAScript `IdentifierStartChar`: `$`, `_` or a Unicode identifier start.
#[inline]
pub fn is_identifier_start(cp: u32) -> bool {
    if cp < 0x80 {
        return (cp as u8).is_ascii_alphabetic() || cp == u32::from(b'$') || cp == u32::from(b'_');
    }
    if cp < 0x1_0000 {
        return bmp_bits(cp) & ID_START_BIT != 0;
    }
    cp <= MAX_CODE_POINT && in_ranges(&ASTRAL_ID_START, cp)
}

/// ECMAScript `IdentifierPartChar`: `$`, ZWNJ, ZWJ or a Unicode identifier part.
#[inline]
pub fn is_identifier_part(cp: u32) -> bool {
    if cp < 0x80 {
        return (cp as u8).is_ascii_alphanumeric() || cp == u32::from(b'$') || cp == u32::from(b'_');
    }
    if cp == ZERO_WIDTH_NON_JOINER || cp == ZERO_WIDTH_JOINER {
        return true;
    }
    if cp < 0x1_0000 {
        return bmp_bits(cp) & ID_PART_BIT != 0;
    }
    cp <= MAX_CODE_POINT && in_ranges(&ASTRAL_ID_PART, cp)
}

#[inline]
pub fn is_identifier_start_char(c: char) -> bool {
    is_identifier_start(c as u32)
}

#[inline]
pub fn is_identifier_part_char(c: char) -> bool {
    is_identifier_part(c as u32)
}

#[inline]
pub fn is_decimal_digit(cp: u32) -> bool {
    (u32::from(b'0')..=u32::from(b'9')).contains(&cp)
}

#[inline]
pub fn is_octal_digit(cp: u32) -> bool {
    (u32::from(b'0')..=u32::from(b'7')).contains(&cp)
}

#[inline]
pub fn is_hex_digit(cp: u32) -> bool {
    char::from_u32(cp).is_some_and(|c| c.is_ascii_hexdigit())
}

/// Whether `cp` is a UTF-16 surrogate code unit.
#[inline]
pub fn is_surrogate(cp: u32) -> bool {
    (0xD800..=0xDFFF).contains(&cp)
}

#[inline]
pub fn is_high_surrogate(cp: u32) -> bool {
    (0xD800..=0xDBFF).contains(&cp)
}

#[inline]
pub fn is_low_surrogate(cp: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&cp)
}

/// Combine a surrogate pair into the scalar value it encodes.
#[inline]
pub fn combine_surrogates(high: u32, low: u32) -> u32 {
    0x1_0000 + ((high - 0xD800) << 10) + (low - 0xDC00)
}
