use super::{Bitvector, TwoLevelBitvector};

/// Run-block encoded bitvector, tuned for sparse inputs.
///
/// The stream is partitioned into blocks of `2^block_bits_log2` bits. An indicator bitvector
/// marks which blocks are entirely zero; only the bits of the remaining ("mixed") blocks are
/// stored in full. `rank` is the indicator's rank (to count compressed-away blocks) combined
/// with a rank into the uncompressed remainder.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct RunBlockBitvector {
    block_bits_log2: u32,
    indicator: TwoLevelBitvector,
    uncompressed: TwoLevelBitvector,
    len: usize,
}

impl RunBlockBitvector {
    /// Builds the bitvector with the given block size (as a power of two, e.g. `2` for 4-bit
    /// blocks). Smaller blocks compress sparser inputs better but add more indicator overhead.
    pub fn construct(
        bits: impl IntoIterator<Item = bool, IntoIter: ExactSizeIterator>,
        block_bits_log2: u32,
    ) -> Self {
        let bits: Vec<bool> = bits.into_iter().collect();
        let block_len = 1usize << block_bits_log2;
        let len = bits.len();

        let complete_blocks = len / block_len;

        let mut indicator_bits = Vec::with_capacity(complete_blocks + 1);
        let mut uncompressed_bits = Vec::new();

        for block in bits.chunks_exact(block_len).take(complete_blocks) {
            let all_zero = block.iter().all(|&b| !b);
            indicator_bits.push(all_zero);
            if !all_zero {
                uncompressed_bits.extend_from_slice(block);
            }
        }

        // the last (possibly partial) block is never compressed, so rank(size()) is always valid
        indicator_bits.push(false);
        let tail_start = complete_blocks * block_len;
        for i in 0..block_len {
            uncompressed_bits.push(bits.get(tail_start + i).copied().unwrap_or(false));
        }

        Self {
            block_bits_log2,
            indicator: TwoLevelBitvector::construct(indicator_bits),
            uncompressed: TwoLevelBitvector::construct(uncompressed_bits),
            len,
        }
    }

    /// An estimate, in bits, of the memory this encoding would use for an input with the given
    /// number of blocks and number of all-zero blocks, used by [`AutoSelectedBitvector`] to pick
    /// a block size.
    fn estimate_size_bits(block_bits_log2: u32, num_blocks: usize, zero_blocks: usize) -> usize {
        let block_len = 1usize << block_bits_log2;
        let non_zero_blocks = num_blocks - zero_blocks;
        // indicator bitvector (roughly 1.1 bits per stored bit, two-level overhead included)
        let indicator_bits = (num_blocks * 11) / 10;
        let uncompressed_bits = (non_zero_blocks * block_len * 11) / 10;
        indicator_bits + uncompressed_bits
    }
}

impl Bitvector for RunBlockBitvector {
    fn size(&self) -> usize {
        self.len
    }

    fn symbol(&self, idx: usize) -> bool {
        assert!(idx < self.size());
        let block_id = idx >> self.block_bits_log2;

        if self.indicator.symbol(block_id) {
            return false;
        }

        let compressed_blocks_before = self.indicator.rank(block_id);
        let block_len = 1usize << self.block_bits_log2;
        let detail_idx = idx - compressed_blocks_before * block_len;
        self.uncompressed.symbol(detail_idx)
    }

    fn rank(&self, idx: usize) -> usize {
        assert!(idx <= self.size());
        let block_id = idx >> self.block_bits_log2;

        let is_compressed_block = self.indicator.symbol(block_id);
        let compressed_blocks_before = self.indicator.rank(block_id);
        let block_len = 1usize << self.block_bits_log2;

        let detail_idx = if is_compressed_block {
            compressed_blocks_before * block_len
        } else {
            idx - compressed_blocks_before * block_len
        };

        self.uncompressed.rank(detail_idx)
    }
}

/// Picks the smallest-estimated-size encoding among a fixed set of run-block granularities and
/// the uncompressed baseline, at construction time.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub enum AutoSelectedBitvector {
    Uncompressed(TwoLevelBitvector),
    RunBlock(RunBlockBitvector),
}

impl AutoSelectedBitvector {
    /// Candidate run-block granularities considered by the selector, in bits.
    const CANDIDATE_BLOCK_BITS_LOG2: [u32; 3] = [1, 2, 3];

    pub fn construct(bits: impl IntoIterator<Item = bool, IntoIter: ExactSizeIterator>) -> Self {
        let bits: Vec<bool> = bits.into_iter().collect();
        let len = bits.len();

        let uncompressed_estimate = len.div_ceil(64) * 64 + len / 8;

        let mut best: Option<(usize, u32, usize)> = None;
        for &block_bits_log2 in &Self::CANDIDATE_BLOCK_BITS_LOG2 {
            let block_len = 1usize << block_bits_log2;
            let num_blocks = len.div_ceil(block_len);
            let zero_blocks = bits
                .chunks(block_len)
                .filter(|block| block.iter().all(|&b| !b))
                .count();

            let estimate =
                RunBlockBitvector::estimate_size_bits(block_bits_log2, num_blocks, zero_blocks);

            if best.is_none_or(|(best_estimate, _, _)| estimate < best_estimate) {
                best = Some((estimate, block_bits_log2, zero_blocks));
            }
        }

        let (best_estimate, block_bits_log2, _) = best.expect("candidate list is non-empty");

        if best_estimate < uncompressed_estimate {
            AutoSelectedBitvector::RunBlock(RunBlockBitvector::construct(bits, block_bits_log2))
        } else {
            AutoSelectedBitvector::Uncompressed(TwoLevelBitvector::construct(bits))
        }
    }
}

impl Bitvector for AutoSelectedBitvector {
    fn size(&self) -> usize {
        match self {
            AutoSelectedBitvector::Uncompressed(bv) => bv.size(),
            AutoSelectedBitvector::RunBlock(bv) => bv.size(),
        }
    }

    fn symbol(&self, idx: usize) -> bool {
        match self {
            AutoSelectedBitvector::Uncompressed(bv) => bv.symbol(idx),
            AutoSelectedBitvector::RunBlock(bv) => bv.symbol(idx),
        }
    }

    fn rank(&self, idx: usize) -> usize {
        match self {
            AutoSelectedBitvector::Uncompressed(bv) => bv.rank(idx),
            AutoSelectedBitvector::RunBlock(bv) => bv.rank(idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_rank(bits: &[bool], idx: usize) -> usize {
        bits[..idx].iter().filter(|&&b| b).count()
    }

    #[test]
    fn sparse_against_naive() {
        let bits: Vec<bool> = (0..10_000).map(|i| i % 97 == 0).collect();
        let bv = RunBlockBitvector::construct(bits.iter().copied(), 3);

        for i in 0..=bits.len() {
            assert_eq!(bv.rank(i), naive_rank(&bits, i), "mismatch at {i}");
        }
        for (i, &b) in bits.iter().enumerate() {
            assert_eq!(bv.symbol(i), b);
        }
    }

    #[test]
    fn dense_against_naive() {
        let bits: Vec<bool> = (0..5_000).map(|i| i % 2 == 0).collect();
        let bv = RunBlockBitvector::construct(bits.iter().copied(), 2);

        for i in 0..=bits.len() {
            assert_eq!(bv.rank(i), naive_rank(&bits, i));
        }
    }

    #[test]
    fn auto_selector_picks_run_block_for_sparse_input() {
        let bits: Vec<bool> = (0..100_000).map(|i| i % 1000 == 0).collect();
        let selected = AutoSelectedBitvector::construct(bits.iter().copied());

        assert!(matches!(selected, AutoSelectedBitvector::RunBlock(_)));
        for i in (0..=bits.len()).step_by(137) {
            assert_eq!(selected.rank(i), naive_rank(&bits, i));
        }
    }

    #[test]
    fn auto_selector_picks_uncompressed_for_dense_input() {
        let bits: Vec<bool> = (0..10_000).map(|i| i % 2 == 0).collect();
        let selected = AutoSelectedBitvector::construct(bits.iter().copied());

        assert!(matches!(selected, AutoSelectedBitvector::Uncompressed(_)));
    }
}
