//! Sets of code points as sorted, disjoint, non-adjacent inclusive intervals.

use esz_scanner::char_codes::MAX_CODE_POINT;

pub const FIRST_SURROGATE: u32 = 0xD800;
pub const LAST_SURROGATE: u32 = 0xDFFF;
pub const LAST_BMP: u32 = 0xFFFF;

/// An inclusive range of code points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    pub first: u32,
    pub last: u32,
}

impl Interval {
    pub const fn new(first: u32, last: u32) -> Self {
        Interval { first, last }
    }

    pub const fn single(cp: u32) -> Self {
        Interval { first: cp, last: cp }
    }

    #[inline]
    pub fn contains(self, cp: u32) -> bool {
        self.first <= cp && cp <= self.last
    }

    #[inline]
    pub fn overlaps(self, other: Interval) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodePointSet {
    ivs: Vec<Interval>,
}

impl CodePointSet {
    pub fn new() -> Self {
        CodePointSet::default()
    }

    /// Build from intervals that are already sorted and disjoint.
    pub fn from_sorted_disjoint_intervals(ivs: Vec<Interval>) -> Self {
        debug_assert!(ivs.windows(2).all(|w| w[0].last < w[1].first));
        let mut set = CodePointSet { ivs: Vec::with_capacity(ivs.len()) };
        for iv in ivs {
            set.add(iv);
        }
        set
    }

    pub fn from_intervals(ivs: &[Interval]) -> Self {
        let mut set = CodePointSet::new();
        for &iv in ivs {
            set.add(iv);
        }
        set
    }

    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.ivs
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ivs.is_empty()
    }

    /// Number of code points in the set.
    pub fn len(&self) -> u32 {
        self.ivs.iter().map(|iv| iv.last - iv.first + 1).sum()
    }

    pub fn contains(&self, cp: u32) -> bool {
        let idx = self.ivs.partition_point(|iv| iv.last < cp);
        self.ivs.get(idx).is_some_and(|iv| iv.contains(cp))
    }

    /// Add an interval, merging with any neighbors it touches.
    pub fn add(&mut self, new: Interval) {
        debug_assert!(new.first <= new.last);
        let start = self
            .ivs
            .partition_point(|iv| iv.last.saturating_add(1) < new.first);
        let end = self
            .ivs
            .partition_point(|iv| iv.first <= new.last.saturating_add(1));
        if start >= end {
            self.ivs.insert(start, new);
            return;
        }
        let first = new.first.min(self.ivs[start].first);
        let last = new.last.max(self.ivs[end - 1].last);
        self.ivs.splice(start..end, std::iter::once(Interval { first, last }));
    }

    pub fn add_one(&mut self, cp: u32) {
        self.add(Interval::single(cp));
    }

    pub fn add_set(&mut self, other: &CodePointSet) {
        for &iv in &other.ivs {
            self.add(iv);
        }
    }

    /// Complement over `0..=0x10FFFF`.
    pub fn inverted(&self) -> CodePointSet {
        let mut ivs = Vec::with_capacity(self.ivs.len() + 1);
        let mut next = 0u32;
        for iv in &self.ivs {
            if iv.first > next {
                ivs.push(Interval::new(next, iv.first - 1));
            }
            next = iv.last + 1;
        }
        if next <= MAX_CODE_POINT {
            ivs.push(Interval::new(next, MAX_CODE_POINT));
        }
        CodePointSet { ivs }
    }

    pub fn intersection(&self, other: &CodePointSet) -> CodePointSet {
        let mut ivs = Vec::new();
        let (mut i, mut j) = (0, 0);
        while let (Some(a), Some(b)) = (self.ivs.get(i), other.ivs.get(j)) {
            if a.overlaps(*b) {
                ivs.push(Interval::new(a.first.max(b.first), a.last.min(b.last)));
            }
            if a.last < b.last {
                i += 1;
            } else {
                j += 1;
            }
        }
        CodePointSet { ivs }
    }

    pub fn difference(&self, other: &CodePointSet) -> CodePointSet {
        self.intersection(&other.inverted())
    }

    pub fn has_surrogates(&self) -> bool {
        self.ivs
            .iter()
            .any(|iv| iv.overlaps(Interval::new(FIRST_SURROGATE, LAST_SURROGATE)))
    }

    /// The set restricted to Unicode scalar values.
    pub fn without_surrogates(&self) -> CodePointSet {
        let mut surrogates = CodePointSet::new();
        surrogates.add(Interval::new(FIRST_SURROGATE, LAST_SURROGATE));
        self.difference(&surrogates)
    }

    /// Intervals with any interval that crosses from the BMP into the astral
    /// planes split at the plane boundary.
    pub fn split_at_bmp(&self) -> Vec<Interval> {
        let mut out = Vec::with_capacity(self.ivs.len() + 1);
        for &iv in &self.ivs {
            if iv.first <= LAST_BMP && iv.last > LAST_BMP {
                out.push(Interval::new(iv.first, LAST_BMP));
                out.push(Interval::new(LAST_BMP + 1, iv.last));
            } else {
                out.push(iv);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ivs: &[(u32, u32)]) -> CodePointSet {
        let ivs: Vec<_> = ivs.iter().map(|&(a, b)| Interval::new(a, b)).collect();
        CodePointSet::from_intervals(&ivs)
    }

    #[test]
    fn add_merges_overlapping_and_adjacent() {
        let s = set(&[(10, 20), (30, 40), (21, 25), (5, 9)]);
        assert_eq!(s.intervals(), &[Interval::new(5, 25), Interval::new(30, 40)]);
        let s = set(&[(10, 20), (30, 40), (15, 35)]);
        assert_eq!(s.intervals(), &[Interval::new(10, 40)]);
        assert!(s.contains(10) && s.contains(40) && !s.contains(41));
    }

    #[test]
    fn inversion_round_trips() {
        let s = set(&[(0, 5), (100, 200), (0x10_FFFF, 0x10_FFFF)]);
        let inv = s.inverted();
        assert_eq!(inv.intervals(), &[Interval::new(6, 99), Interval::new(201, 0x10_FFFE)]);
        assert_eq!(inv.inverted(), s);
        assert!(CodePointSet::new().inverted().contains(0x10_FFFF));
    }

    #[test]
    fn intersection_and_difference() {
        let a = set(&[(0, 10), (20, 30)]);
        let b = set(&[(5, 25)]);
        assert_eq!(a.intersection(&b), set(&[(5, 10), (20, 25)]));
        assert_eq!(a.difference(&b), set(&[(0, 4), (26, 30)]));
    }

    #[test]
    fn surrogates_are_clipped_and_planes_split() {
        let s = set(&[(0xD000, 0x1_0010)]);
        assert!(s.has_surrogates());
        let clipped = s.without_surrogates();
        assert!(!clipped.has_surrogates());
        assert_eq!(
            clipped.split_at_bmp(),
            vec![
                Interval::new(0xD000, 0xD7FF),
                Interval::new(0xE000, 0xFFFF),
                Interval::new(0x1_0000, 0x1_0010),
            ]
        );
    }
}
