//! Build script for esz-scanner
//!
//! Generates the character classification tables used by `char_codes`:
//! - a BMP table with one classification nibble per code unit
//!   (bit 0 = WhiteSpace, bit 1 = IdentifierStart, bit 2 = IdentifierPart)
//! - sorted inclusive range tables for astral IdentifierStart/IdentifierPart
//!
//! Identifier properties are ID_Start/ID_Continue: `unicode-ident` answers
//! XID_Start/XID_Continue, and the code points that NFKC closure removes
//! from those are added back here. `$`, `_`, ZWNJ and ZWJ are added in
//! `char_codes`, not here.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const WHITE_SPACE: u8 = 1;
const ID_START: u8 = 2;
const ID_PART: u8 = 4;

/// In ID_Start but not XID_Start.
const ID_START_ONLY: &[(u32, u32)] = &[
    (0x037A, 0x037A),
    (0x0E33, 0x0E33),
    (0x0EB3, 0x0EB3),
    (0x309B, 0x309C),
    (0xFC5E, 0xFC63),
    (0xFDFA, 0xFDFB),
    (0xFE70, 0xFE70),
    (0xFE72, 0xFE72),
    (0xFE74, 0xFE74),
    (0xFE76, 0xFE76),
    (0xFE78, 0xFE78),
    (0xFE7A, 0xFE7A),
    (0xFE7C, 0xFE7C),
    (0xFE7E, 0xFE7E),
    (0xFF9E, 0xFF9F),
];

/// In ID_Continue but not XID_Continue.
const ID_CONTINUE_ONLY: &[(u32, u32)] = &[
    (0x037A, 0x037A),
    (0x309B, 0x309C),
    (0xFC5E, 0xFC63),
    (0xFDFA, 0xFDFB),
    (0xFE70, 0xFE70),
    (0xFE72, 0xFE72),
    (0xFE74, 0xFE74),
    (0xFE76, 0xFE76),
    (0xFE78, 0xFE78),
    (0xFE7A, 0xFE7A),
    (0xFE7C, 0xFE7C),
    (0xFE7E, 0xFE7E),
];

fn in_ranges(ranges: &[(u32, u32)], cp: u32) -> bool {
    ranges.iter().any(|&(start, end)| start <= cp && cp <= end)
}

fn is_id_start(c: char) -> bool {
    unicode_ident::is_xid_start(c) || in_ranges(ID_START_ONLY, c as u32)
}

fn is_id_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || in_ranges(ID_CONTINUE_ONLY, c as u32)
}

fn is_es_white_space(c: char) -> bool {
    // Unicode White_Space minus the ECMAScript line terminators and NEL is
    // exactly TAB, VT, FF and the Zs category.
    (c.is_whitespace() && !matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'))
        || c == '\u{FEFF}'
}

fn classify(c: char) -> u8 {
    let mut bits = 0;
    if is_es_white_space(c) {
        bits |= WHITE_SPACE;
    }
    if is_id_start(c) {
        bits |= ID_START;
    }
    if is_id_continue(c) {
        bits |= ID_PART;
    }
    bits
}

fn astral_ranges(pred: impl Fn(char) -> bool) -> Vec<(u32, u32)> {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for cp in 0x1_0000u32..=0x10_FFFF {
        let Some(c) = char::from_u32(cp) else {
            continue;
        };
        if !pred(c) {
            continue;
        }
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == cp => *end = cp,
            _ => ranges.push((cp, cp)),
        }
    }
    ranges
}

fn write_ranges(out: &mut String, name: &str, ranges: &[(u32, u32)]) {
    let _ = writeln!(out, "static {name}: [(u32, u32); {}] = [", ranges.len());
    for (start, end) in ranges {
        let _ = writeln!(out, "    (0x{start:X}, 0x{end:X}),");
    }
    out.push_str("];\n\n");
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let mut bmp = vec![0u8; 0x1_0000 / 2];
    for cp in 0u32..0x1_0000 {
        let Some(c) = char::from_u32(cp) else {
            continue;
        };
        let bits = classify(c);
        let slot = &mut bmp[(cp >> 1) as usize];
        if cp & 1 == 0 {
            *slot |= bits;
        } else {
            *slot |= bits << 4;
        }
    }

    let mut out = String::with_capacity(256 * 1024);
    out.push_str("// @generated by build.rs from unicode-ident. Do not edit.\n\n");
    let _ = writeln!(out, "static BMP_TABLE: [u8; {}] = [", bmp.len());
    for chunk in bmp.chunks(32) {
        out.push_str("   ");
        for byte in chunk {
            let _ = write!(out, " 0x{byte:02X},");
        }
        out.push('\n');
    }
    out.push_str("];\n\n");

    write_ranges(
        &mut out,
        "ASTRAL_ID_START",
        &astral_ranges(is_id_start),
    );
    write_ranges(
        &mut out,
        "ASTRAL_ID_PART",
        &astral_ranges(is_id_continue),
    );

    let out_dir = env::var("OUT_DIR").unwrap_or_else(|_| ".".to_string());
    let dest = Path::new(&out_dir).join("char_tables.rs");
    if let Err(err) = fs::write(&dest, out) {
        panic!("failed to write {}: {err}", dest.display());
    }
}
