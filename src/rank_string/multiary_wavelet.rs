//! Multiary wavelet strategy: a two-level split of the alphabet where an outer EPR string
//! indexes the high-order "group" of each symbol and one inner EPR string per group indexes
//! its low-order remainder. Grounded on `fmindex_collection::string::MultiaryWavelet`'s L0/L1
//! split, using [`TextWithRankSupport`] (this crate's own EPR strategy) for both levels instead
//! of the paired-bitvector string type the original uses.

use crate::block::{Block, Block64};
use crate::text_with_rank_support::TextWithRankSupport;
use num_traits::PrimInt;

use super::RankString;

/// Two-level EPR string: `l0` indexes `symbol / l1_size`, `l1[g]` indexes `symbol % l1_size`
/// restricted to the positions where the outer group is `g`.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug)]
pub struct MultiaryWaveletString<I, B = Block64> {
    l0: TextWithRankSupport<I, B>,
    l1: Vec<TextWithRankSupport<I, B>>,
    l1_size: usize,
    alphabet_size: usize,
}

impl<I: PrimInt + Send + Sync, B: Block> MultiaryWaveletString<I, B> {
    /// Builds the structure from a dense-encoded string over `0..alphabet_size`.
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 2);

        let (l0_size, l1_size) = choose_split(alphabet_size);

        let l0_text: Vec<u8> = text
            .iter()
            .map(|&c| (c as usize / l1_size) as u8)
            .collect();

        let mut l1_buffers: Vec<Vec<u8>> = vec![Vec::new(); l0_size];
        for &c in text {
            let group = c as usize / l1_size;
            let remainder = c as usize % l1_size;
            l1_buffers[group].push(remainder as u8);
        }

        let l0 = TextWithRankSupport::construct(&l0_text, l0_size);
        let l1 = l1_buffers
            .into_iter()
            .map(|buf| TextWithRankSupport::construct(&buf, l1_size))
            .collect();

        Self {
            l0,
            l1,
            l1_size,
            alphabet_size,
        }
    }
}

/// Picks `(l0_size, l1_size)` such that `l0_size * l1_size >= alphabet_size` and both factors are
/// at least 2 (the minimum alphabet size [`TextWithRankSupport`] supports), favoring a roughly
/// square split.
fn choose_split(alphabet_size: usize) -> (usize, usize) {
    let l0_size = ((alphabet_size as f64).sqrt().ceil() as usize).max(2);
    let mut l1_size = alphabet_size.div_ceil(l0_size).max(2);

    while l0_size * l1_size < alphabet_size {
        l1_size += 1;
    }

    (l0_size, l1_size)
}

impl<I: PrimInt, B: Block> RankString for MultiaryWaveletString<I, B> {
    fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn size(&self) -> usize {
        RankString::size(&self.l0)
    }

    fn symbol(&self, idx: usize) -> u8 {
        let group = RankString::symbol(&self.l0, idx);
        let local_idx = RankString::rank(&self.l0, idx, group);
        let remainder = RankString::symbol(&self.l1[group as usize], local_idx);

        group * self.l1_size as u8 + remainder
    }

    fn rank(&self, idx: usize, c: u8) -> usize {
        let group = c as usize / self.l1_size;
        let remainder = c as usize % self.l1_size;

        let local_idx = RankString::rank(&self.l0, idx, group as u8);
        RankString::rank(&self.l1[group], local_idx, remainder as u8)
    }

    fn prefix_rank(&self, idx: usize, c: u8) -> usize {
        let group = c as usize / self.l1_size;
        let remainder = c as usize % self.l1_size;

        let group_prefix = RankString::prefix_rank(&self.l0, idx, group as u8);
        let local_idx = RankString::rank(&self.l0, idx, group as u8);

        group_prefix + RankString::prefix_rank(&self.l1[group], local_idx, remainder as u8)
    }
}
