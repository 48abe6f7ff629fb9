use crate::bitvector::Bitvector;

/// A bidirectional cursor over a two-symbol BWT, specialized to use a single bitvector for both
/// extension directions instead of a forward and a reverse BWT.
///
/// For `Σ = 2`, the reverse BWT's rank function can be derived from the forward one by swapping
/// the roles of 0 and 1, so no second structure needs to be built or stored — this is the
/// "mirror trick". Grounded on
/// `fmc::BinaryMirroredBiFMIndexCursor`'s `(lb, lbRev, len)` representation and its
/// `rank`/`ranks_and_prefixes` helpers.
///
/// This cursor is constructed directly from a caller-supplied bitvector and a two-entry C-table,
/// rather than from an [`crate::FmIndex`]: the main index type is generic over an arbitrary
/// alphabet and always backs its BWT with a [`crate::TextWithRankSupport`], never a raw
/// [`Bitvector`], so this specialization is a standalone utility for callers who already have a
/// binary BWT (e.g. one derived from a two-symbol alphabet outside of this crate's main
/// construction path).
#[derive(Clone, Copy)]
pub struct BinaryMirroredCursor<'a, BV> {
    bwt: &'a BV,
    count: [usize; 2],
    lb: usize,
    lb_rev: usize,
    len: usize,
}

impl<'a, BV: Bitvector> BinaryMirroredCursor<'a, BV> {
    /// Builds a cursor with the empty query currently searched. `count` must be the two-entry
    /// C-table (`count[0]` occurrences of symbol 0 before symbol 1's block starts, `count[1]`
    /// the same boundary after it) over `bwt`.
    pub fn new(bwt: &'a BV, count: [usize; 2]) -> Self {
        BinaryMirroredCursor {
            bwt,
            count,
            lb: 0,
            lb_rev: 0,
            len: bwt.size(),
        }
    }

    /// The number of occurrences of the currently searched query.
    pub fn count(&self) -> usize {
        self.len
    }

    fn rank(&self, idx: usize, symbol: u8) -> usize {
        let ones = self.bwt.rank(idx);
        if symbol == 1 { ones } else { idx - ones }
    }

    // (ranks, prefix_ranks) for both symbols at once, from a single underlying bitvector rank
    // call, mirroring the C++ helper of the same purpose.
    fn ranks_and_prefixes(&self, idx: usize) -> ([usize; 2], [usize; 2]) {
        let ones = self.bwt.rank(idx);
        let zeros = idx - ones;

        let prefix_ranks = [zeros, idx];
        let ranks = [zeros + self.count[0], ones + self.count[1]];

        (ranks, prefix_ranks)
    }

    fn with(&self, lb: usize, lb_rev: usize, len: usize) -> Self {
        BinaryMirroredCursor {
            bwt: self.bwt,
            count: self.count,
            lb,
            lb_rev,
            len,
        }
    }

    /// Extends the query at the front with `symbol`.
    pub fn extend_left(&self, symbol: u8) -> Self {
        if self.len == 0 {
            return *self;
        }

        let new_lb = self.rank(self.lb, symbol);
        let new_lb_rev = self.lb_rev
            + if symbol == 0 {
                0
            } else {
                self.bwt.rank(self.lb + self.len) - self.bwt.rank(self.lb)
            };
        let new_len = self.rank(self.lb + self.len, symbol) - new_lb;

        self.with(new_lb + self.count[symbol as usize], new_lb_rev, new_len)
    }

    /// Extends the query at the back with `symbol`.
    pub fn extend_right(&self, symbol: u8) -> Self {
        if self.len == 0 {
            return *self;
        }

        let new_lb = self.lb
            + if symbol == 0 {
                0
            } else {
                self.bwt.rank(self.lb_rev + self.len) - self.bwt.rank(self.lb_rev)
            };
        let new_lb_rev = self.rank(self.lb_rev, symbol);
        let new_len = self.rank(self.lb_rev + self.len, symbol) - new_lb_rev;

        self.with(new_lb, new_lb_rev + self.count[symbol as usize], new_len)
    }

    /// Extends the query at the front with both symbols at once.
    pub fn extend_left_all(&self) -> [Self; 2] {
        let (ranks1, prefix_ranks1) = self.ranks_and_prefixes(self.lb);
        let (ranks2, prefix_ranks2) = self.ranks_and_prefixes(self.lb + self.len);

        [
            self.with(ranks1[0], self.lb_rev, ranks2[0] - ranks1[0]),
            self.with(
                ranks1[1],
                self.lb_rev + (prefix_ranks2[0] - prefix_ranks1[0]),
                ranks2[1] - ranks1[1],
            ),
        ]
    }

    /// Extends the query at the back with both symbols at once.
    pub fn extend_right_all(&self) -> [Self; 2] {
        let (ranks1, prefix_ranks1) = self.ranks_and_prefixes(self.lb_rev);
        let (ranks2, prefix_ranks2) = self.ranks_and_prefixes(self.lb_rev + self.len);

        [
            self.with(self.lb, ranks1[0], ranks2[0] - ranks1[0]),
            self.with(
                self.lb + (prefix_ranks2[0] - prefix_ranks1[0]),
                ranks1[1],
                ranks2[1] - ranks1[1],
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitvector::TwoLevelBitvector;

    #[test]
    fn count_shrinks_monotonically_while_extending() {
        let bits: Vec<bool> = (0..2_000).map(|i| i % 3 == 0).collect();
        let bwt = TwoLevelBitvector::construct(bits);
        let zeros = bwt.size() - bwt.rank(bwt.size());
        let cursor = BinaryMirroredCursor::new(&bwt, [0, zeros]);

        assert_eq!(cursor.count(), bwt.size());

        let extended = cursor.extend_left(1);
        assert!(extended.count() <= cursor.count());

        let further = extended.extend_right(0);
        assert!(further.count() <= extended.count());
    }

    #[test]
    fn extend_left_all_partitions_the_interval() {
        let bits: Vec<bool> = (0..500).map(|i| i % 5 < 2).collect();
        let bwt = TwoLevelBitvector::construct(bits);
        let zeros = bwt.size() - bwt.rank(bwt.size());
        let cursor = BinaryMirroredCursor::new(&bwt, [0, zeros]);

        let [left0, left1] = cursor.extend_left_all();
        assert_eq!(left0.count() + left1.count(), cursor.count());
    }
}
