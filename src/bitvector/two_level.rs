use super::Bitvector;

/// Words per block (the granularity of the 16-bit relative counter).
const BLOCK_WORDS: usize = 8;
/// Words per superblock (the granularity of the 64-bit absolute counter).
const SUPERBLOCK_WORDS: usize = 128;

/// Baseline two-level interleaved bitvector.
///
/// One `u64` absolute counter per superblock (`SUPERBLOCK_WORDS` words, i.e. 8192 bits) and one
/// `u16` counter per block (`BLOCK_WORDS` words, i.e. 512 bits), relative to its enclosing
/// superblock. `rank(i)` is two array lookups plus a popcount over at most `BLOCK_WORDS` words.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct TwoLevelBitvector {
    words: Vec<u64>,
    block_offsets: Vec<u16>,
    superblock_offsets: Vec<u64>,
    len: usize,
}

impl TwoLevelBitvector {
    /// Builds the bitvector from a sized iterator of bits.
    pub fn construct(bits: impl IntoIterator<Item = bool, IntoIter: ExactSizeIterator>) -> Self {
        let bits = bits.into_iter();
        let len = bits.len();

        let mut words = vec![0u64; len.div_ceil(64)];
        for (i, bit) in bits.enumerate() {
            if bit {
                words[i / 64] |= 1 << (i % 64);
            }
        }

        Self::from_words(words, len)
    }

    /// Builds the bitvector directly from 64-bit words, the last one right-padded with zeros.
    pub fn from_words(words: Vec<u64>, len: usize) -> Self {
        assert!(words.len() == len.div_ceil(64));

        let num_superblocks = words.len().div_ceil(SUPERBLOCK_WORDS);
        let num_blocks = words.len().div_ceil(BLOCK_WORDS);

        let mut superblock_offsets = Vec::with_capacity(num_superblocks);
        let mut block_offsets = Vec::with_capacity(num_blocks);

        let mut absolute_rank: u64 = 0;

        for superblock in words.chunks(SUPERBLOCK_WORDS) {
            superblock_offsets.push(absolute_rank);

            let mut relative_rank: u16 = 0;
            for block in superblock.chunks(BLOCK_WORDS) {
                block_offsets.push(relative_rank);

                for &word in block {
                    let ones = word.count_ones() as u16;
                    relative_rank += ones;
                    absolute_rank += ones as u64;
                }
            }
        }

        Self {
            words,
            block_offsets,
            superblock_offsets,
            len,
        }
    }
}

impl Bitvector for TwoLevelBitvector {
    fn size(&self) -> usize {
        self.len
    }

    fn symbol(&self, idx: usize) -> bool {
        assert!(idx < self.size());
        (self.words[idx / 64] >> (idx % 64)) & 1 == 1
    }

    fn rank(&self, idx: usize) -> usize {
        assert!(idx <= self.size());

        if self.words.is_empty() {
            return 0;
        }

        let word_idx = idx / 64;
        let superblock_idx = word_idx / SUPERBLOCK_WORDS;
        let block_idx = word_idx / BLOCK_WORDS;

        let mut count = self.superblock_offsets[superblock_idx] as usize
            + self.block_offsets[block_idx] as usize;

        let block_start_word = block_idx * BLOCK_WORDS;
        for &word in &self.words[block_start_word..word_idx] {
            count += word.count_ones() as usize;
        }

        if idx % 64 != 0 {
            let last_word = self.words.get(word_idx).copied().unwrap_or(0);
            let mask = (1u64 << (idx % 64)) - 1;
            count += (last_word & mask).count_ones() as usize;
        }

        count
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
        let bv = TwoLevelBitvector::construct([]);
        assert_eq!(bv.size(), 0);
        assert_eq!(bv.rank(0), 0);
    }

    #[test]
    fn against_naive() {
        let bits: Vec<bool> = (0..20_000).map(|i| (i * 2654435761u32) % 7 == 0).collect();
        let bv = TwoLevelBitvector::construct(bits.iter().copied());

        for i in 0..=bits.len() {
            assert_eq!(bv.rank(i), naive_rank(&bits, i), "mismatch at {i}");
        }
        for (i, &b) in bits.iter().enumerate() {
            assert_eq!(bv.symbol(i), b);
        }
    }

    #[test]
    fn crosses_superblock_boundary() {
        let bits: Vec<bool> = (0..SUPERBLOCK_WORDS * 64 * 2 + 37)
            .map(|i| i % 3 == 0)
            .collect();
        let bv = TwoLevelBitvector::construct(bits.iter().copied());

        for i in (0..=bits.len()).step_by(97) {
            assert_eq!(bv.rank(i), naive_rank(&bits, i));
        }
    }
}
