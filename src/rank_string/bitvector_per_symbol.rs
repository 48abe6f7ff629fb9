//! Bitvector-per-symbol strategy: one rank-supporting bitvector per alphabet symbol, set at the
//! positions where that symbol occurs. `rank` is a single bitvector rank; `prefix_rank` and
//! `all_ranks` cost O(Σ) bitvector ranks.

use crate::bitvector::{Bitvector, TwoLevelBitvector};

use super::RankString;

/// One [`TwoLevelBitvector`] per symbol, set at the positions where that symbol occurs in the
/// BWT. Conceptually a dense prefix-sum occurrence column per symbol, but backed by real
/// rank-supporting bitvectors instead of a materialized prefix-sum array.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct BitvectorPerSymbolString {
    columns: Vec<TwoLevelBitvector>,
    len: usize,
}

impl BitvectorPerSymbolString {
    /// Builds the structure from a dense-encoded string over `0..alphabet_size`.
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 2);

        let columns = (0..alphabet_size as u8)
            .map(|c| TwoLevelBitvector::construct(text.iter().map(move |&s| s == c)))
            .collect();

        Self {
            columns,
            len: text.len(),
        }
    }
}

impl RankString for BitvectorPerSymbolString {
    fn alphabet_size(&self) -> usize {
        self.columns.len()
    }

    fn size(&self) -> usize {
        self.len
    }

    fn symbol(&self, idx: usize) -> u8 {
        for (c, column) in self.columns.iter().enumerate() {
            if column.symbol(idx) {
                return c as u8;
            }
        }

        unreachable!("every position must belong to exactly one column")
    }

    fn rank(&self, idx: usize, c: u8) -> usize {
        self.columns[c as usize].rank(idx)
    }
}
