use std::cell::RefCell;

use crate::error::StateMachineError;

use super::Bitvector;

#[derive(Debug, Clone)]
enum Centers {
    Mutable,
    Finalized(Vec<i64>),
}

/// Paired ("signed-rank") bitvector.
///
/// Words are grouped into pairs; each pair shares a single counter storing the popcount up to
/// the boundary between its two words. A query in the left word of a pair subtracts the
/// popcount of the bits *after* it from the counter; a query in the right word adds the
/// popcount of the bits *before* it. This halves the counter memory of
/// [`TwoLevelBitvector`](super::TwoLevelBitvector) at the cost of one extra popcount per rank.
///
/// `rank` implicitly finalizes a freshly built vector; `push_back` after that fails with
/// [`StateMachineError::PushBackAfterFinalize`]. Not savefile-serializable in its `Mutable`
/// state; only finalized instances round-trip.
#[derive(Debug, Clone)]
pub struct PairedBitvector {
    words: Vec<u64>,
    len: usize,
    centers: RefCell<Centers>,
}

impl PairedBitvector {
    /// An empty, mutable paired bitvector.
    pub fn new() -> Self {
        Self {
            words: vec![0],
            len: 0,
            centers: RefCell::new(Centers::Mutable),
        }
    }

    /// Builds an already-finalized paired bitvector from a sized iterator of bits.
    pub fn construct(bits: impl IntoIterator<Item = bool, IntoIter: ExactSizeIterator>) -> Self {
        let bits = bits.into_iter();
        let bv = Self {
            words: {
                let mut words = vec![0u64; bits.len().div_ceil(64).max(1)];
                for (i, bit) in bits.enumerate() {
                    if bit {
                        words[i / 64] |= 1 << (i % 64);
                    }
                }
                words
            },
            len: bits.len(),
            centers: RefCell::new(Centers::Mutable),
        };

        bv.finalize();
        bv
    }

    /// Appends one bit. Fails if this vector was already finalized by a `rank` call.
    pub fn push_back(&mut self, bit: bool) -> Result<(), StateMachineError> {
        if matches!(*self.centers.borrow(), Centers::Finalized(_)) {
            return Err(StateMachineError::PushBackAfterFinalize);
        }

        if self.len % 64 == 0 && self.len != 0 {
            self.words.push(0);
        }

        if bit {
            let word_idx = self.len / 64;
            self.words[word_idx] |= 1 << (self.len % 64);
        }

        self.len += 1;
        Ok(())
    }

    fn finalize(&self) {
        if matches!(*self.centers.borrow(), Centers::Finalized(_)) {
            return;
        }

        let num_pairs = self.words.len().div_ceil(2);
        let mut centers = Vec::with_capacity(num_pairs);
        let mut cumulative: i64 = 0;

        for pair in self.words.chunks(2) {
            let left_count = pair[0].count_ones() as i64;
            centers.push(cumulative + left_count);

            cumulative += left_count;
            if let Some(&right) = pair.get(1) {
                cumulative += right.count_ones() as i64;
            }
        }

        *self.centers.borrow_mut() = Centers::Finalized(centers);
    }
}

impl Default for PairedBitvector {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitvector for PairedBitvector {
    fn size(&self) -> usize {
        self.len
    }

    fn symbol(&self, idx: usize) -> bool {
        assert!(idx < self.size());
        (self.words[idx / 64] >> (idx % 64)) & 1 == 1
    }

    fn rank(&self, idx: usize) -> usize {
        assert!(idx <= self.size());
        self.finalize();

        if self.words.is_empty() {
            return 0;
        }

        let word_idx = idx / 64;
        let centers = self.centers.borrow();
        let Centers::Finalized(centers) = &*centers else {
            unreachable!("finalize() was just called")
        };

        // `idx` is one past the last word (only possible when `idx == size()` and the length is
        // a multiple of 64). There is no pair to look up; the last center already covers the
        // whole vector unless the last pair's right word is still unaccounted for.
        if word_idx == self.words.len() {
            let last_center = centers[centers.len() - 1];
            return if self.words.len() % 2 == 0 {
                last_center as usize + self.words[self.words.len() - 1].count_ones() as usize
            } else {
                last_center as usize
            };
        }

        let pair_idx = word_idx / 2;
        let center = centers[pair_idx];
        let in_left_half = word_idx % 2 == 0;

        let bit_in_word = idx % 64;

        let count = if in_left_half {
            let remaining_mask = if bit_in_word == 64 {
                0
            } else {
                !((1u64 << bit_in_word) - 1)
            };
            let tail_ones = (self.words[word_idx] & remaining_mask).count_ones() as i64;
            center - tail_ones
        } else {
            let head_mask = if bit_in_word == 0 {
                0
            } else {
                (1u64 << bit_in_word) - 1
            };
            let head_ones = (self.words[word_idx] & head_mask).count_ones() as i64;
            center + head_ones
        };

        count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_rank(bits: &[bool], idx: usize) -> usize {
        bits[..idx].iter().filter(|&&b| b).count()
    }

    #[test]
    fn empty() {
        let bv = PairedBitvector::construct([]);
        assert_eq!(bv.size(), 0);
        assert_eq!(bv.rank(0), 0);
    }

    #[test]
    fn against_naive() {
        let bits: Vec<bool> = (0..3_000).map(|i| (i * 2654435761u32) % 5 == 0).collect();
        let bv = PairedBitvector::construct(bits.iter().copied());

        for i in 0..=bits.len() {
            assert_eq!(bv.rank(i), naive_rank(&bits, i), "mismatch at {i}");
        }
    }

    #[test]
    fn push_back_after_rank_fails() {
        let mut bv = PairedBitvector::new();
        bv.push_back(true).unwrap();
        bv.push_back(false).unwrap();
        let _ = bv.rank(1);

        assert!(matches!(
            bv.push_back(true),
            Err(StateMachineError::PushBackAfterFinalize)
        ));
    }

    #[test]
    fn rank_at_word_aligned_lengths_does_not_panic() {
        for len in [64, 128, 192, 256] {
            let bits: Vec<bool> = (0..len).map(|i| i % 3 == 0).collect();
            let bv = PairedBitvector::construct(bits.iter().copied());
            assert_eq!(bv.rank(len), naive_rank(&bits, len), "len={len}");
        }
    }

    #[test]
    fn incremental_build_matches_construct() {
        let bits: Vec<bool> = (0..513).map(|i| i % 3 == 0).collect();

        let mut incremental = PairedBitvector::new();
        for &b in &bits {
            incremental.push_back(b).unwrap();
        }

        let constructed = PairedBitvector::construct(bits.iter().copied());

        for i in 0..=bits.len() {
            assert_eq!(incremental.rank(i), constructed.rank(i));
        }
    }
}
