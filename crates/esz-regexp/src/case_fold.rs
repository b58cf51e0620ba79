//! Case-insensitive matching outside Unicode mode.
//!
//! Without `u`, two code units match under `i` when their `toUpperCase`
//! images are equal, except that a non-ASCII unit never maps onto ASCII and
//! a multi-unit uppercase leaves the unit alone. The host's `(?i)` uses
//! simple case folding instead (`ſ` ~ `s`, `K` ~ `k`), so these classes are
//! written out explicitly.

use once_cell::sync::Lazy;

use crate::code_point_set::{CodePointSet, LAST_BMP};

/// `(canonical, unit)` for every BMP unit whose canonical form differs from
/// itself, sorted by canonical form.
static CANONICAL_TABLE: Lazy<Vec<(u32, u32)>> = Lazy::new(|| {
    let mut table: Vec<(u32, u32)> = (0..=LAST_BMP)
        .filter_map(|unit| {
            let canonical = canonicalize(unit);
            (canonical != unit).then_some((canonical, unit))
        })
        .collect();
    table.sort_unstable();
    table
});

/// Canonical form of a code unit for non-Unicode ignore-case matching.
pub(crate) fn canonicalize(unit: u32) -> u32 {
    if unit > LAST_BMP {
        return unit;
    }
    let Some(c) = char::from_u32(unit) else {
        return unit;
    };
    let mut upper = c.to_uppercase();
    let (Some(first), None) = (upper.next(), upper.next()) else {
        return unit;
    };
    let upper = first as u32;
    if upper > LAST_BMP || (unit >= 0x80 && upper < 0x80) {
        return unit;
    }
    upper
}

fn units_with_canonical(canonical: u32) -> impl Iterator<Item = u32> {
    let table = CANONICAL_TABLE.as_slice();
    let from = table.partition_point(|&(key, _)| key < canonical);
    table[from..]
        .iter()
        .take_while(move |&&(key, _)| key == canonical)
        .map(|&(_, unit)| unit)
}

/// `set` plus every code unit that matches one of its members under `i`.
pub(crate) fn close_over_case(set: &CodePointSet) -> CodePointSet {
    let mut canonicals: Vec<u32> = CANONICAL_TABLE
        .iter()
        .filter_map(|&(canonical, unit)| {
            if set.contains(unit) {
                Some(canonical)
            } else if set.contains(canonical) && canonicalize(canonical) == canonical {
                Some(canonical)
            } else {
                None
            }
        })
        .collect();
    canonicals.sort_unstable();
    canonicals.dedup();

    let mut closed = set.clone();
    for canonical in canonicals {
        if canonicalize(canonical) == canonical {
            closed.add_one(canonical);
        }
        for unit in units_with_canonical(canonical) {
            closed.add_one(unit);
        }
    }
    closed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_units(cp: u32) -> Vec<u32> {
        let mut set = CodePointSet::new();
        set.add_one(cp);
        close_over_case(&set)
            .intervals()
            .iter()
            .flat_map(|iv| iv.first..=iv.last)
            .collect()
    }

    #[test]
    fn ascii_letters_pair_up() {
        assert_eq!(closed_units('a' as u32), ['A' as u32, 'a' as u32]);
        assert_eq!(closed_units('Z' as u32), ['Z' as u32, 'z' as u32]);
        assert_eq!(closed_units('1' as u32), ['1' as u32]);
    }

    #[test]
    fn non_ascii_never_folds_onto_ascii() {
        assert_eq!(canonicalize(0x017F), 0x017F);
        assert_eq!(canonicalize(0x212A), 0x212A);
        assert_eq!(closed_units('s' as u32), ['S' as u32, 's' as u32]);
        assert_eq!(closed_units('k' as u32), ['K' as u32, 'k' as u32]);
    }

    #[test]
    fn multi_unit_uppercase_is_left_alone() {
        assert_eq!(canonicalize(0x00DF), 0x00DF);
        assert_eq!(closed_units(0x00DF), [0x00DF]);
    }

    #[test]
    fn sigma_forms_share_one_class() {
        assert_eq!(closed_units(0x03C3), [0x03A3, 0x03C2, 0x03C3]);
        assert_eq!(closed_units(0x03C2), [0x03A3, 0x03C2, 0x03C3]);
    }
}
