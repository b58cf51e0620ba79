//! The generated classification tables must agree with the Unicode reference
//! for every scalar value.

use esz_scanner::char_codes::{
    is_identifier_part, is_identifier_start, is_line_terminator, is_white_space,
};

fn reference_white_space(c: char) -> bool {
    (c.is_whitespace() && !matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'))
        || c == '\u{FEFF}'
}

/// ID_Start code points outside XID_Start (UAX #31, NFKC modifications).
const NOT_XID_START: [u32; 23] = [
    0x037A, 0x0E33, 0x0EB3, 0x309B, 0x309C, 0xFC5E, 0xFC5F, 0xFC60, 0xFC61, 0xFC62, 0xFC63,
    0xFDFA, 0xFDFB, 0xFE70, 0xFE72, 0xFE74, 0xFE76, 0xFE78, 0xFE7A, 0xFE7C, 0xFE7E, 0xFF9E,
    0xFF9F,
];

/// ID_Continue code points outside XID_Continue.
const NOT_XID_CONTINUE: [u32; 19] = [
    0x037A, 0x309B, 0x309C, 0xFC5E, 0xFC5F, 0xFC60, 0xFC61, 0xFC62, 0xFC63, 0xFDFA, 0xFDFB,
    0xFE70, 0xFE72, 0xFE74, 0xFE76, 0xFE78, 0xFE7A, 0xFE7C, 0xFE7E,
];

fn reference_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || unicode_ident::is_xid_start(c) || NOT_XID_START.contains(&(c as u32))
}

fn reference_identifier_part(c: char) -> bool {
    c == '$'
        || c == '\u{200C}'
        || c == '\u{200D}'
        || unicode_ident::is_xid_continue(c)
        || NOT_XID_CONTINUE.contains(&(c as u32))
}

#[test]
fn classifier_matches_reference_for_every_scalar_value() {
    let mut mismatches = Vec::new();
    for cp in 0u32..=0x10_FFFF {
        let Some(c) = char::from_u32(cp) else {
            continue;
        };
        if is_white_space(cp) != reference_white_space(c) {
            mismatches.push(format!("white space U+{cp:04X}"));
        }
        if is_identifier_start(cp) != reference_identifier_start(c) {
            mismatches.push(format!("identifier start U+{cp:04X}"));
        }
        if is_identifier_part(cp) != reference_identifier_part(c) {
            mismatches.push(format!("identifier part U+{cp:04X}"));
        }
        if mismatches.len() > 20 {
            break;
        }
    }
    assert!(mismatches.is_empty(), "mismatches: {mismatches:?}");
}

#[test]
fn surrogates_and_out_of_range_are_never_identifiers() {
    for cp in 0xD800u32..=0xDFFF {
        assert!(!is_identifier_start(cp));
        assert!(!is_identifier_part(cp));
        assert!(!is_white_space(cp));
    }
    assert!(!is_identifier_part(0x11_0000));
    assert!(!is_identifier_part(u32::MAX));
}

#[test]
fn line_terminators() {
    for cp in [0x0A, 0x0D, 0x2028, 0x2029] {
        assert!(is_line_terminator(cp));
        assert!(!is_white_space(cp));
    }
    assert!(!is_line_terminator(0x85));
}

#[test]
fn identifier_tables_use_id_not_xid() {
    // Other_ID_Start and NFKC-unstable letters.
    for cp in [0x309B, 0x309C, 0x037A, 0x0E33, 0x0EB3, 0xFC5E, 0xFDFA, 0xFE70, 0xFF9E] {
        assert!(is_identifier_start(cp), "U+{cp:04X} should start an identifier");
        assert!(is_identifier_part(cp), "U+{cp:04X} should continue an identifier");
        assert!(!char::from_u32(cp).is_some_and(unicode_ident::is_xid_start));
    }
    // Combining marks continue but never start.
    assert!(!is_identifier_start(0x0301));
    assert!(is_identifier_part(0x0301));
}
