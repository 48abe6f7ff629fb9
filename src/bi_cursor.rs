use crate::rank_string::RankString;
use crate::{Cursor, FmIndex, HalfOpenInterval, Hit, IndexStorage, text_with_rank_support::block::Block};

/// A cursor to a bidirectional FM-Index, able to extend the currently searched query on either
/// side.
///
/// Requires an index built with [`build_reverse_bwt`](crate::FmIndexConfig::build_reverse_bwt).
/// Tracks three numbers: `lb`, the lower bound of the interval in the forward suffix array;
/// `lb_rev`, the lower bound of the interval in the suffix array of the individually-reversed
/// texts; and `len`, the shared interval length. Grounded on
/// `fmindex_collection::BiFMIndexCursor`'s `(lb, lbRev, len)` representation and its
/// `extendLeft`/`extendRight` rank-and-prefix-rank formulas.
#[derive(Clone, Copy)]
pub struct BiCursor<'a, I, B> {
    index: &'a FmIndex<I, B>,
    lb: usize,
    lb_rev: usize,
    len: usize,
}

impl<'a, I: IndexStorage, B: Block> BiCursor<'a, I, B> {
    pub(crate) fn new_empty(index: &'a FmIndex<I, B>) -> Self {
        assert!(
            index.is_bidirectional(),
            "BiCursor requires an index built with build_reverse_bwt"
        );

        BiCursor {
            index,
            lb: 0,
            lb_rev: 0,
            len: index.total_text_len(),
        }
    }

    /// The number of occurrences of the currently searched query.
    ///
    /// Running time is in O(1).
    pub fn count(&self) -> usize {
        self.len
    }

    /// Locates every occurrence of the currently searched query.
    ///
    /// Same cost model as [`FmIndex::locate`].
    pub fn locate(&self) -> impl Iterator<Item = Hit> {
        let interval = HalfOpenInterval {
            start: self.lb,
            end: self.lb + self.len,
        };

        // SAFETY: lb/len are always maintained as a valid interval into the forward suffix array
        unsafe { self.index.locate_interval(interval) }
    }

    /// The dense-encoded BWT symbol at the left end of a single-occurrence interval. Only
    /// meaningful when `count() == 1`; used by the search engine's single-cursor fast path to
    /// avoid an `all_ranks` call when there is just one row left to inspect.
    pub(crate) fn symbol_left(&self) -> u8 {
        self.index.text_with_rank_support.symbol_at(self.lb)
    }

    /// The dense-encoded BWT symbol at the right end of a single-occurrence interval, read from
    /// the reverse BWT. Same fast-path role as [`symbol_left`](Self::symbol_left).
    pub(crate) fn symbol_right(&self) -> u8 {
        self.index
            .reverse_text_with_rank_support
            .as_ref()
            .expect("symbol_right requires an index built with build_reverse_bwt")
            .symbol_at(self.lb_rev)
    }

    /// Shrinks `len` to `new_len` without moving either lower bound. Used by `search_n` to make
    /// the last reported cursor's count add up to exactly `n`.
    pub(crate) fn truncated(&self, new_len: usize) -> Self {
        debug_assert!(new_len <= self.len);
        BiCursor {
            len: new_len,
            ..*self
        }
    }

    /// Drops right-extension capability, keeping only the forward `lb`/`len` pair. Used once a
    /// search only has left steps remaining; the result is identical to a plain [`Cursor`].
    pub fn into_left_cursor(self) -> Cursor<'a, I, B> {
        Cursor {
            index: self.index,
            interval: HalfOpenInterval {
                start: self.lb,
                end: self.lb + self.len,
            },
        }
    }

    /// Extends the query at the front (prepends `symbol`) using the forward BWT.
    ///
    /// Running time is in O(1).
    pub fn extend_left(&self, symbol: u8) -> Self {
        let symbol = self.index.alphabet.io_to_dense_representation(symbol);
        self.extend_left_dense(symbol)
    }

    pub(crate) fn extend_left_dense(&self, symbol: u8) -> Self {
        if self.len == 0 {
            return *self;
        }

        let bwt = &self.index.text_with_rank_support;

        let new_lb = self.index.lf_mapping_step(symbol, self.lb);
        let new_lb_rev = self.lb_rev
            + (bwt.prefix_rank(self.lb + self.len, symbol) - bwt.prefix_rank(self.lb, symbol));
        let new_len = self.index.lf_mapping_step(symbol, self.lb + self.len) - new_lb;

        BiCursor {
            index: self.index,
            lb: new_lb,
            lb_rev: new_lb_rev,
            len: new_len,
        }
    }

    /// Extends the query at the back (appends `symbol`) using the reverse BWT.
    ///
    /// Running time is in O(1).
    pub fn extend_right(&self, symbol: u8) -> Self {
        let symbol = self.index.alphabet.io_to_dense_representation(symbol);
        self.extend_right_dense(symbol)
    }

    pub(crate) fn extend_right_dense(&self, symbol: u8) -> Self {
        if self.len == 0 {
            return *self;
        }

        let reverse_bwt = self
            .index
            .reverse_text_with_rank_support
            .as_ref()
            .expect("extend_right requires an index built with build_reverse_bwt");

        let new_lb = self.lb
            + (reverse_bwt.prefix_rank(self.lb_rev + self.len, symbol)
                - reverse_bwt.prefix_rank(self.lb_rev, symbol));
        let new_lb_rev = self.index.rf_mapping_step(symbol, self.lb_rev);
        let new_len = self.index.rf_mapping_step(symbol, self.lb_rev + self.len) - new_lb_rev;

        BiCursor {
            index: self.index,
            lb: new_lb,
            lb_rev: new_lb_rev,
            len: new_len,
        }
    }

    /// Extends the query at the front with every searchable symbol at once.
    ///
    /// Uses a single pass over [`all_ranks_and_prefix_ranks`](RankString::all_ranks_and_prefix_ranks)
    /// rather than one `extend_left` call per symbol.
    pub fn extend_left_all(&self) -> Vec<Self> {
        let bwt = &self.index.text_with_rank_support;
        let (ranks1, prefix_ranks1) = bwt.all_ranks_and_prefix_ranks(self.lb);
        let (ranks2, prefix_ranks2) = bwt.all_ranks_and_prefix_ranks(self.lb + self.len);

        (1..=self.index.alphabet.num_searchable_dense_symbols())
            .map(|symbol| {
                let new_lb = self.index.count[symbol] + ranks1[symbol];
                let new_end = self.index.count[symbol] + ranks2[symbol];
                BiCursor {
                    index: self.index,
                    lb: new_lb,
                    lb_rev: self.lb_rev + (prefix_ranks2[symbol] - prefix_ranks1[symbol]),
                    len: new_end - new_lb,
                }
            })
            .collect()
    }

    /// Extends the query at the back with every searchable symbol at once.
    ///
    /// Same single-pass guarantee as [`extend_left_all`](Self::extend_left_all).
    pub fn extend_right_all(&self) -> Vec<Self> {
        let reverse_bwt = self
            .index
            .reverse_text_with_rank_support
            .as_ref()
            .expect("extend_right_all requires an index built with build_reverse_bwt");

        let (ranks1, prefix_ranks1) = reverse_bwt.all_ranks_and_prefix_ranks(self.lb_rev);
        let (ranks2, prefix_ranks2) =
            reverse_bwt.all_ranks_and_prefix_ranks(self.lb_rev + self.len);

        (1..=self.index.alphabet.num_searchable_dense_symbols())
            .map(|symbol| {
                let new_lb_rev = self.index.count[symbol] + ranks1[symbol];
                let new_end = self.index.count[symbol] + ranks2[symbol];
                BiCursor {
                    index: self.index,
                    lb: self.lb + (prefix_ranks2[symbol] - prefix_ranks1[symbol]),
                    lb_rev: new_lb_rev,
                    len: new_end - new_lb_rev,
                }
            })
            .collect()
    }
}
