//! Odometer enumeration of the candidate space.

use num_bigint::BigUint;

use crate::charset::Charset;

/// Lazily yields every string of every length in `min..=max` over a charset.
///
/// Candidates of one length are produced in odometer order: the index vector
/// starts at all zeroes and slot 0 is the most significant position, so the
/// last slot ticks fastest. When the carry propagates past slot 0 the
/// enumerator moves on to the next length. Only the current index vector is
/// ever materialized, which keeps memory constant no matter how large the
/// space is.
#[derive(Clone, Debug)]
pub struct CombinationEnumerator {
    charset: Charset,
    max_length: usize,
    indices: Vec<usize>,
    exhausted: bool,
}

impl CombinationEnumerator {
    /// Creates an enumerator positioned on the first candidate of `min_length`.
    pub fn new(charset: Charset, min_length: usize, max_length: usize) -> Self {
        let exhausted = charset.is_empty() || min_length == 0 || min_length > max_length;

        Self {
            indices: vec![0; min_length],
            charset,
            max_length,
            exhausted,
        }
    }
}

impl Iterator for CombinationEnumerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let candidate: String = self
            .indices
            .iter()
            .map(|&i| self.charset[i] as char)
            .collect();

        // increment with carry, least significant slot first
        let mut carry = true;
        for slot in self.indices.iter_mut().rev() {
            *slot += 1;
            if *slot == self.charset.len() {
                *slot = 0;
            } else {
                carry = false;
                break;
            }
        }

        if carry {
            let next_length = self.indices.len() + 1;
            if next_length > self.max_length {
                self.exhausted = true;
            } else {
                self.indices = vec![0; next_length];
            }
        }

        Some(candidate)
    }
}

/// Computes the total candidate count in closed form, without enumerating.
///
/// The count can exceed the machine word range for large alphabets and
/// lengths, hence the arbitrary-precision result.
pub fn total_combinations(charset_len: usize, min_length: usize, max_length: usize) -> BigUint {
    let size = BigUint::from(charset_len);
    let mut total = BigUint::default();

    for length in min_length..=max_length {
        total += size.pow(length as u32);
    }

    total
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use num_traits::ToPrimitive;

    use super::*;
    use crate::charset::CharsetBuilder;

    fn charset(chars: &[u8]) -> Charset {
        CharsetBuilder::new().base(chars).build().unwrap()
    }

    #[test]
    fn test_odometer_order() {
        let candidates: Vec<String> = CombinationEnumerator::new(charset(b"ab"), 1, 2).collect();

        assert_eq!(vec!["a", "b", "aa", "ab", "ba", "bb"], candidates);
    }

    #[test]
    fn test_order_is_reproducible() {
        let charset = charset(b"xyz");
        let first: Vec<String> = CombinationEnumerator::new(charset.clone(), 1, 3).collect();
        let second: Vec<String> = CombinationEnumerator::new(charset, 1, 3).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_yields_exactly_the_whole_space() {
        let charset = charset(b"abc");
        let candidates: Vec<String> =
            CombinationEnumerator::new(charset.clone(), 1, 3).collect();

        let expected = total_combinations(charset.len(), 1, 3).to_usize().unwrap();
        assert_eq!(expected, candidates.len());
        assert_eq!(3 + 9 + 27, candidates.len());

        let unique: HashSet<&String> = candidates.iter().collect();
        assert_eq!(candidates.len(), unique.len());

        for candidate in &candidates {
            assert!((1..=3).contains(&candidate.len()));
            assert!(candidate.bytes().all(|c| charset.contains(&c)));
        }
    }

    #[test]
    fn test_single_char_charset() {
        let candidates: Vec<String> = CombinationEnumerator::new(charset(b"a"), 1, 3).collect();

        assert_eq!(vec!["a", "aa", "aaa"], candidates);
    }

    #[test]
    fn test_fixed_length_range() {
        let candidates: Vec<String> = CombinationEnumerator::new(charset(b"ab"), 2, 2).collect();

        assert_eq!(vec!["aa", "ab", "ba", "bb"], candidates);
    }

    #[test]
    fn test_total_combinations_closed_form() {
        assert_eq!(BigUint::from(14u32), total_combinations(2, 1, 3));
        assert_eq!(BigUint::from(4u32), total_combinations(2, 2, 2));
        assert_eq!(BigUint::from(3u32), total_combinations(1, 1, 3));
    }

    #[test]
    fn test_total_combinations_beyond_word_range() {
        let total = total_combinations(72, 1, 12);

        assert!(total > BigUint::from(u64::MAX));
        assert!(total.to_u64().is_none());
    }
}
