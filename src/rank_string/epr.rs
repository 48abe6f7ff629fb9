//! EPR (interleaved bitplane) strategy: a thin adapter over [`crate::TextWithRankSupport`], the
//! same structure the FM-index itself uses for its BWT.

use crate::block::Block;
use crate::text_with_rank_support::TextWithRankSupport;
use num_traits::PrimInt;

use super::RankString;

impl<I: PrimInt, B: Block> RankString for TextWithRankSupport<I, B> {
    fn alphabet_size(&self) -> usize {
        TextWithRankSupport::alphabet_size(self)
    }

    fn size(&self) -> usize {
        self.text_len()
    }

    fn symbol(&self, idx: usize) -> u8 {
        self.symbol_at(idx)
    }

    fn rank(&self, idx: usize, c: u8) -> usize {
        TextWithRankSupport::rank(self, c, idx)
    }

    // `all_ranks`/`all_ranks_and_prefix_ranks` keep the default O(Σ)-independent-rank-calls
    // implementation from the trait: each call is already O(1) via the ternary bit kernel, so Σ
    // of them is the same asymptotic cost a dedicated single-pass cascade would have.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block64;
    use crate::rank_string::test_util::check_against_reference;

    #[test]
    fn matches_naive_reference() {
        let text = [0u8, 1, 2, 1, 0, 3, 2, 2, 1, 0, 3, 3, 3, 0, 1, 2];
        let rs = TextWithRankSupport::<i32, Block64>::construct(&text, 4);
        check_against_reference(&rs, &text);
    }
}
