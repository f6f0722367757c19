//! Growable bitset with set algebra.
//!
//! Storage is a [`FixedBitSet`]; this type adds the growth rules the ECS
//! relies on. Writing past the end grows the set and zero-fills the new
//! positions. The binary operators (`&`, `|`, `^`) size their result to the
//! longer operand and read missing bits as zero, so a short accepted-set never
//! hides a match against a longer enabled-set.
//!
//! Shifts change the length: `a << n` inserts `n` zero bits at index 0 (bit
//! `i` moves to `i + n`), `a >> n` drops the `n` lowest bits (bit `i` moves to
//! `i - n`). No bit is ever lost off the high end.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Index, Not, Shl, Shr};

use fixedbitset::FixedBitSet;

static TRUE: bool = true;
static FALSE: bool = false;

/// Dynamically sized sequence of boolean flags.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitset {
    bits: FixedBitSet,
}

impl Bitset {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bitset of `len` cleared bits.
    pub fn with_len(len: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(len),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when no bit is set. A bitset of non-zero length full of zeros
    /// is empty; use [`Bitset::len`] to ask about size.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones(..)
    }

    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// True when every bit up to `len` is set. An empty-length bitset
    /// trivially qualifies.
    pub fn is_all_set(&self) -> bool {
        self.count_ones() == self.len()
    }

    /// Reads bit `index`; positions past the end read as `false`.
    pub fn get(&self, index: usize) -> bool {
        self.bits.contains(index)
    }

    /// Writes bit `index`, growing the set when `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len() {
            self.bits.grow(index + 1);
        }
        self.bits.set(index, value);
    }

    /// Changes the length, keeping existing bits and zero-filling new ones.
    pub fn resize(&mut self, len: usize) {
        if len >= self.len() {
            self.bits.grow(len);
            return;
        }
        let mut shrunk = FixedBitSet::with_capacity(len);
        for index in self.bits.ones().take_while(|index| *index < len) {
            shrunk.insert(index);
        }
        self.bits = shrunk;
    }

    /// Clears every bit, keeping the length.
    pub fn reset(&mut self) {
        self.bits.clear();
    }

    /// Drops every bit; the length becomes zero.
    pub fn clear(&mut self) {
        self.bits = FixedBitSet::new();
    }

    /// True when both sets share at least one set bit.
    pub fn intersects(&self, other: &Bitset) -> bool {
        !self.bits.is_disjoint(&other.bits)
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |index| self.bits.contains(index))
    }

    /// Applies `op` to a copy of `self` grown to the longer length.
    fn combine(&self, other: &Bitset, op: impl FnOnce(&mut FixedBitSet, &FixedBitSet)) -> Bitset {
        let mut bits = self.bits.clone();
        if other.len() > bits.len() {
            bits.grow(other.len());
        }
        op(&mut bits, &other.bits);
        Bitset { bits }
    }
}

/// Panics when `index >= len`; use [`Bitset::get`] for a non-panicking read.
impl Index<usize> for Bitset {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        assert!(
            index < self.len(),
            "bit index {index} out of range for bitset of length {}",
            self.len()
        );
        if self.get(index) {
            &TRUE
        } else {
            &FALSE
        }
    }
}

impl Not for &Bitset {
    type Output = Bitset;

    fn not(self) -> Bitset {
        let mut bits = self.bits.clone();
        bits.toggle_range(..);
        Bitset { bits }
    }
}

impl Not for Bitset {
    type Output = Bitset;

    fn not(mut self) -> Bitset {
        self.bits.toggle_range(..);
        self
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $with:ident) => {
        impl $trait<&Bitset> for &Bitset {
            type Output = Bitset;

            fn $method(self, rhs: &Bitset) -> Bitset {
                self.combine(rhs, |bits, other| bits.$with(other))
            }
        }

        impl $trait<Bitset> for Bitset {
            type Output = Bitset;

            fn $method(self, rhs: Bitset) -> Bitset {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Bitset> for Bitset {
            type Output = Bitset;

            fn $method(self, rhs: &Bitset) -> Bitset {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binary_op!(BitAnd, bitand, intersect_with);
impl_binary_op!(BitOr, bitor, union_with);
impl_binary_op!(BitXor, bitxor, symmetric_difference_with);

impl Shl<usize> for &Bitset {
    type Output = Bitset;

    fn shl(self, shift: usize) -> Bitset {
        let mut result = Bitset::with_len(self.len() + shift);
        for index in self.iter_ones() {
            result.bits.insert(index + shift);
        }
        result
    }
}

impl Shl<usize> for Bitset {
    type Output = Bitset;

    fn shl(self, shift: usize) -> Bitset {
        &self << shift
    }
}

impl Shr<usize> for &Bitset {
    type Output = Bitset;

    fn shr(self, shift: usize) -> Bitset {
        let mut result = Bitset::with_len(self.len().saturating_sub(shift));
        for index in self.iter_ones().filter(|index| *index >= shift) {
            result.bits.insert(index - shift);
        }
        result
    }
}

impl Shr<usize> for Bitset {
    type Output = Bitset;

    fn shr(self, shift: usize) -> Bitset {
        &self >> shift
    }
}

impl FromIterator<bool> for Bitset {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bitset = Bitset::new();
        for (index, value) in iter.into_iter().enumerate() {
            bitset.set(index, value);
        }
        bitset
    }
}

/// Index 0 is printed first.
impl fmt::Display for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitset({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(pattern: &str) -> Bitset {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_set_grows_and_zero_fills() {
        let mut set = Bitset::new();
        set.set(70, true);
        assert_eq!(set.len(), 71);
        assert!(set.get(70));
        assert_eq!(set.count_ones(), 1);
        assert_eq!(set.count_zeros(), 70);
        assert!(!set.get(69));
        assert!(!set.get(500));
    }

    #[test]
    fn test_clearing_past_the_end_still_grows() {
        let mut set = Bitset::new();
        set.set(4, false);
        assert_eq!(set.len(), 5);
        assert!(set.is_empty());
    }

    #[test]
    fn test_empty_means_no_bit_set() {
        let set = Bitset::with_len(10);
        assert!(set.is_empty());
        assert_eq!(set.len(), 10);

        let set = bits("0010");
        assert!(!set.is_empty());
    }

    #[test]
    fn test_resize_reset_clear() {
        let mut set = bits("1101");
        set.resize(2);
        assert_eq!(set, bits("11"));
        set.resize(6);
        assert_eq!(set, bits("110000"));

        set.reset();
        assert_eq!(set.len(), 6);
        assert!(set.is_empty());

        set.clear();
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_algebra_identities() {
        let a = bits("1011001110001011101");
        assert_eq!(&a & &a, a);
        assert_eq!(&a | &a, a);
        assert!((&a ^ &a).is_empty());
        assert_eq!((&a ^ &a).len(), a.len());
        assert_eq!(!!a.clone(), a);
        assert!((!&a | &a).is_all_set());
        assert_eq!((!&a | &a).len(), a.len());
    }

    /// Every third bit set, which leaves partial words at all these lengths.
    fn striped(len: usize) -> Bitset {
        (0..len).map(|index| index % 3 == 0).collect()
    }

    #[test]
    fn test_identities_across_word_boundaries() {
        for len in [0, 1, 63, 64, 65, 128, 129] {
            let a = striped(len);
            let ones = len.div_ceil(3);
            assert_eq!(a.len(), len, "len {len}");
            assert_eq!(a.count_ones(), ones, "len {len}");
            assert_eq!(a.count_zeros(), len - ones, "len {len}");

            assert_eq!(&a & &a, a, "len {len}");
            assert_eq!(&a | &a, a, "len {len}");
            let xor = &a ^ &a;
            assert!(xor.is_empty(), "len {len}");
            assert_eq!(xor.len(), len, "len {len}");

            let inverted = !&a;
            assert_eq!(inverted.len(), len, "len {len}");
            assert_eq!(inverted.count_ones(), len - ones, "len {len}");
            assert_eq!(!inverted.clone(), a, "len {len}");
            assert!((&inverted | &a).is_all_set(), "len {len}");
            assert_eq!((&inverted | &a).count_zeros(), 0, "len {len}");
            assert!(!(&inverted).intersects(&a), "len {len}");

            let full = !Bitset::with_len(len);
            assert!(full.is_all_set(), "len {len}");
            assert_eq!(full.count_ones(), len, "len {len}");
        }
    }

    #[test]
    fn test_resize_shrinks_across_words() {
        let mut set = !Bitset::with_len(129);
        set.resize(65);
        assert_eq!(set.len(), 65);
        assert_eq!(set.count_ones(), 65);
        assert!(set.is_all_set());

        set.resize(63);
        assert_eq!(set.count_ones(), 63);
        set.resize(130);
        assert_eq!(set.count_ones(), 63);
        assert_eq!(set.count_zeros(), 67);
        assert!(!set.get(63));
        assert!(!set.get(128));
        assert_eq!(set, {
            let mut expected = !Bitset::with_len(63);
            expected.resize(130);
            expected
        });
    }

    #[test]
    fn test_binary_ops_extend_to_longer_operand() {
        let short = bits("11");
        let long = bits("01101");

        assert_eq!(&short & &long, bits("01000"));
        assert_eq!(&short | &long, bits("11101"));
        assert_eq!(&short ^ &long, bits("10101"));
        assert_eq!(&long & &short, bits("01000"));
    }

    #[test]
    fn test_intersects_matches_and_result() {
        let accepted = bits("001");
        let enabled = bits("0010000");
        assert!(accepted.intersects(&enabled));
        assert!(!(&accepted & &enabled).is_empty());

        let other = bits("1100000001");
        assert!(!accepted.intersects(&other));
        assert!((&accepted & &other).is_empty());
    }

    #[test]
    fn test_shifts_change_length() {
        let set = bits("101");
        let left = &set << 2;
        assert_eq!(left, bits("00101"));

        let right = &left >> 3;
        assert_eq!(right, bits("01"));

        assert_eq!((bits("11") >> 5).len(), 0);
    }

    #[test]
    fn test_not_keeps_tail_clear() {
        let set = Bitset::with_len(3);
        let inverted = !&set;
        assert_eq!(inverted.count_ones(), 3);
        assert_eq!(inverted.len(), 3);
    }

    #[test]
    fn test_equality_compares_length() {
        assert_ne!(bits("10"), bits("100"));
        assert_eq!(bits("100"), bits("100"));
    }

    #[test]
    fn test_iter_ones_ascending() {
        let mut set = Bitset::new();
        for index in [3, 64, 65, 130] {
            set.set(index, true);
        }
        assert_eq!(set.iter_ones().collect::<Vec<_>>(), vec![3, 64, 65, 130]);
    }

    #[test]
    fn test_display_prints_low_index_first() {
        assert_eq!(bits("0110").to_string(), "0110");
        assert_eq!(format!("{:?}", bits("1")), "Bitset(1)");
    }

    #[test]
    fn test_index_reads_bits() {
        let set = bits("01");
        assert!(!set[0]);
        assert!(set[1]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let set = bits("01");
        let _ = set[2];
    }
}
