/*! Sets of bytes over the fixed 256-symbol alphabet.

Character classes and the named sets (`\w`, `\W`, `\s`, `\S`, `\d`, `\D`
and `.`) are computed with a membership bitmap with one bit per byte. Turning
a bitmap back into a list of bytes always yields a sorted, duplicate-free
list, which is what the parser needs for producing deterministic token
streams.
*/

use bitvec::array::BitArray;
use bitvec::order::Lsb0;
use lazy_static::lazy_static;

use crate::re::ALPHABET_LEN;

/// A set of bytes backed by a 256-bit membership table.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteSet(BitArray<[u8; ALPHABET_LEN / 8], Lsb0>);

impl ByteSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(BitArray::new([0_u8; ALPHABET_LEN / 8]))
    }

    /// Creates a set containing every byte in `bytes`.
    pub fn from_bytes<I: IntoIterator<Item = u8>>(bytes: I) -> Self {
        let mut set = Self::new();
        set.extend(bytes);
        set
    }

    /// Adds a byte to the set.
    #[inline]
    pub fn insert(&mut self, b: u8) {
        self.0.set(b as usize, true);
    }

    /// Adds every byte in the inclusive range `first..=last`.
    pub fn insert_range(&mut self, first: u8, last: u8) {
        for b in first..=last {
            self.insert(b);
        }
    }

    /// Adds every byte in `other` to this set.
    pub fn union(&mut self, other: &ByteSet) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn contains(&self, b: u8) -> bool {
        self.0[b as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }

    /// Returns the set of bytes that are not in this set.
    pub fn complement(&self) -> Self {
        Self(!self.0)
    }

    /// Returns the bytes in the set in ascending order.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        // The bitmap has exactly 256 bits, indexes always fit in a u8.
        self.0.iter_ones().map(|i| i as u8)
    }

    /// Returns the bytes in the set as a sorted vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes().collect()
    }
}

impl Extend<u8> for ByteSet {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        for b in iter {
            self.insert(b);
        }
    }
}

impl std::fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.bytes()).finish()
    }
}

lazy_static! {
    /// `\w`: ASCII letters, digits and underscore.
    pub static ref WORD: ByteSet = {
        let mut set = ByteSet::new();
        set.insert_range(b'a', b'z');
        set.insert_range(b'A', b'Z');
        set.insert_range(b'0', b'9');
        set.insert(b'_');
        set
    };

    /// `\W`: complement of `\w`.
    pub static ref NOT_WORD: ByteSet = WORD.complement();

    /// `\s`: space and horizontal tab. Line terminators are not included.
    pub static ref SPACE: ByteSet = ByteSet::from_bytes([b' ', b'\t']);

    /// `\S`: complement of `\s`.
    pub static ref NOT_SPACE: ByteSet = SPACE.complement();

    /// `\d`: ASCII digits.
    pub static ref DIGIT: ByteSet = {
        let mut set = ByteSet::new();
        set.insert_range(b'0', b'9');
        set
    };

    /// `\D`: complement of `\d`.
    pub static ref NOT_DIGIT: ByteSet = DIGIT.complement();

    /// `.`: any byte except newline.
    pub static ref DOT: ByteSet = ByteSet::from_bytes([b'\n']).complement();
}

/// Returns the named set for a class escape like `\w`, or `None` if `c` is
/// not the letter of a class escape.
pub fn class_escape(c: u8) -> Option<&'static ByteSet> {
    match c {
        b'w' => Some(&WORD),
        b'W' => Some(&NOT_WORD),
        b's' => Some(&SPACE),
        b'S' => Some(&NOT_SPACE),
        b'd' => Some(&DIGIT),
        b'D' => Some(&NOT_DIGIT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sorted_and_deduplicated() {
        let set = ByteSet::from_bytes(*b"edffcck a");
        assert_eq!(set.to_vec(), b" acdefk".to_vec());
    }

    #[test]
    fn complement() {
        let abc = ByteSet::from_bytes(*b"abc");
        let not_abc = abc.complement();

        assert_eq!(not_abc.len(), 253);
        for b in 0..=255_u8 {
            assert_eq!(abc.contains(b), !not_abc.contains(b));
        }
    }

    #[test]
    fn named_sets() {
        assert_eq!(DIGIT.to_vec(), b"0123456789".to_vec());
        assert_eq!(WORD.len(), 63);
        assert_eq!(NOT_DIGIT.len(), 246);
        assert!(!DOT.contains(b'\n'));
        assert_eq!(DOT.len(), 255);

        for b in 0..=255_u8 {
            assert_ne!(DIGIT.contains(b), NOT_DIGIT.contains(b));
            assert_ne!(WORD.contains(b), NOT_WORD.contains(b));
            assert_ne!(SPACE.contains(b), NOT_SPACE.contains(b));
        }
    }

    #[test]
    fn class_escapes() {
        assert_eq!(class_escape(b'd'), Some(&*DIGIT));
        assert_eq!(class_escape(b'S'), Some(&*NOT_SPACE));
        assert_eq!(class_escape(b'x'), None);
    }
}
