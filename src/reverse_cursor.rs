use crate::{FmIndex, IndexStorage, text_with_rank_support::block::Block};

/// A cursor over the reverse half of a bidirectional index, extending the query only at the
/// back. The mirror image of [`crate::Cursor`]: same `(lower_bound, length)` representation,
/// but walking the BWT of the individually-reversed texts instead of the forward one.
///
/// Unlike [`crate::Cursor`], this cursor cannot [`locate`](crate::FmIndex::locate) its hits: the
/// reversed texts have no suffix array of their own, only a rank-supporting BWT (see
/// [`build_reverse_bwt`](crate::FmIndexConfig::build_reverse_bwt)). Use [`BiCursor`](crate::BiCursor)
/// when locating matters.
#[derive(Clone, Copy)]
pub struct ReverseCursor<'a, I, B> {
    index: &'a FmIndex<I, B>,
    lb_rev: usize,
    len: usize,
}

impl<'a, I: IndexStorage, B: Block> ReverseCursor<'a, I, B> {
    pub(crate) fn new_empty(index: &'a FmIndex<I, B>) -> Self {
        assert!(
            index.is_bidirectional(),
            "ReverseCursor requires an index built with build_reverse_bwt"
        );

        ReverseCursor {
            index,
            lb_rev: 0,
            len: index.total_text_len(),
        }
    }

    /// Extends the currently searched query at the back by one symbol.
    ///
    /// Running time is in O(1).
    pub fn extend_query_back(&mut self, symbol: u8) {
        let symbol = self.index.alphabet.io_to_dense_representation(symbol);

        if self.len == 0 {
            return;
        }

        let new_lb_rev = self.index.rf_mapping_step(symbol, self.lb_rev);
        let new_len = self.index.rf_mapping_step(symbol, self.lb_rev + self.len) - new_lb_rev;

        self.lb_rev = new_lb_rev;
        self.len = new_len;
    }

    /// Returns the number of occurrences of the currently searched query in the set of indexed
    /// texts.
    ///
    /// Running time is in O(1).
    pub fn count(&self) -> usize {
        self.len
    }
}
