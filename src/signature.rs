use std::fmt;
use std::ops::{Add, AddAssign, SubAssign};

pub const ALPHABET_LEN: usize = 26;

/// A multiset of the letters `a`–`z`, stored as one count per letter.
///
/// Two texts are anagrams of each other exactly when their signatures are
/// equal. The derived ordering is only meant for use as a map key.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature {
    counts: [u32; ALPHABET_LEN],
}

/// Raised when subtracting a signature that is not a subset of the minuend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot remove letter '{letter}': {have} available, {wanted} requested")]
pub struct Underflow {
    pub letter: char,
    pub have: u32,
    pub wanted: u32,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the letters of an already normalized text.
    ///
    /// The text must only contain `a`–`z`; see [`crate::normalize`].
    pub fn from_text(text: &str) -> Self {
        let mut signature = Self::new();
        for b in text.bytes() {
            debug_assert!(b.is_ascii_lowercase(), "unnormalized byte {:?} in {:?}", b, text);
            signature.counts[(b - b'a') as usize] += 1;
        }
        signature
    }

    pub fn count(&self, letter: char) -> u32 {
        debug_assert!(letter.is_ascii_lowercase());
        self.counts[(letter as u8 - b'a') as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// True iff every letter occurs in `self` at most as often as in `other`.
    pub fn is_subset_of(&self, other: &Signature) -> bool {
        self.counts.iter().zip(other.counts.iter()).all(|(a, b)| a <= b)
    }

    pub fn char_count(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn subtract(&self, other: &Signature) -> Result<Signature, Underflow> {
        let mut result = *self;
        for (i, (have, &wanted)) in result.counts.iter_mut().zip(other.counts.iter()).enumerate() {
            *have = have.checked_sub(wanted).ok_or(Underflow {
                letter: (b'a' + i as u8) as char,
                have: *have,
                wanted,
            })?;
        }
        Ok(result)
    }

    /// Letters in alphabetical order, each repeated by its count.
    pub fn to_canonical_string(&self) -> String {
        let mut s = String::with_capacity(self.char_count());
        for (i, &count) in self.counts.iter().enumerate() {
            for _ in 0..count {
                s.push((b'a' + i as u8) as char);
            }
        }
        s
    }
}

impl AddAssign<&Signature> for Signature {
    fn add_assign(&mut self, rhs: &Signature) {
        for (a, b) in self.counts.iter_mut().zip(rhs.counts.iter()) {
            *a += b;
        }
    }
}

impl Add for Signature {
    type Output = Signature;

    fn add(mut self, rhs: Signature) -> Signature {
        self += &rhs;
        self
    }
}

// Only used to undo a previous `+=` while backtracking.
impl SubAssign<&Signature> for Signature {
    fn sub_assign(&mut self, rhs: &Signature) {
        for (a, b) in self.counts.iter_mut().zip(rhs.counts.iter()) {
            debug_assert!(*a >= *b, "signature underflow");
            *a -= b;
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_canonical_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn counts_letters() {
        let s = Signature::from_text("banana");
        assert_eq!(s.count('a'), 3);
        assert_eq!(s.count('n'), 2);
        assert_eq!(s.count('b'), 1);
        assert_eq!(s.count('z'), 0);
        assert_eq!(s.char_count(), 6);
        assert_eq!(s.to_canonical_string(), "aaabnn");
    }

    #[test]
    fn anagrams_share_a_signature() {
        assert_eq!(Signature::from_text("listen"), Signature::from_text("silent"));
        assert_ne!(Signature::from_text("listen"), Signature::from_text("listens"));
    }

    #[test]
    fn empty_signature() {
        let s = Signature::from_text("");
        assert!(s.is_empty());
        assert_eq!(s.char_count(), 0);
        assert!(s.is_subset_of(&Signature::from_text("abc")));
        assert_eq!(s.to_string(), "");
    }

    #[test]
    fn subset() {
        let stream = Signature::from_text("stream");
        assert!(Signature::from_text("art").is_subset_of(&stream));
        assert!(!Signature::from_text("tart").is_subset_of(&stream));
        assert!(!stream.is_subset_of(&Signature::from_text("art")));
    }

    #[test]
    fn subtract_underflow() {
        let err = Signature::from_text("art")
            .subtract(&Signature::from_text("tt"))
            .unwrap_err();
        assert_eq!(err, Underflow { letter: 't', have: 1, wanted: 2 });
    }

    #[test]
    fn subtract_subset() {
        let rest = Signature::from_text("stream")
            .subtract(&Signature::from_text("art"))
            .unwrap();
        assert_eq!(rest, Signature::from_text("mes"));
    }

    fn word() -> impl Strategy<Value = String> {
        "[a-z]{0,24}"
    }

    proptest! {
        #[test]
        fn subset_is_reflexive(w in word()) {
            let s = Signature::from_text(&w);
            prop_assert!(s.is_subset_of(&s));
        }

        #[test]
        fn add_then_subtract_round_trips(a in word(), b in word()) {
            let s = Signature::from_text(&a);
            let t = Signature::from_text(&b);
            prop_assert_eq!((s + t).subtract(&t), Ok(s));

            let mut acc = s;
            acc += &t;
            acc -= &t;
            prop_assert_eq!(acc, s);
        }

        #[test]
        fn subset_is_transitive(a in word(), b in word(), c in word()) {
            let s = Signature::from_text(&a);
            let t = s + Signature::from_text(&b);
            let u = t + Signature::from_text(&c);
            prop_assert!(s.is_subset_of(&t));
            prop_assert!(t.is_subset_of(&u));
            prop_assert!(s.is_subset_of(&u));
        }

        #[test]
        fn concatenation_adds(a in word(), b in word()) {
            let joined = format!("{}{}", a, b);
            prop_assert_eq!(
                Signature::from_text(&joined),
                Signature::from_text(&a) + Signature::from_text(&b)
            );
            prop_assert_eq!(Signature::from_text(&joined).char_count(), joined.len());
        }
    }
}
