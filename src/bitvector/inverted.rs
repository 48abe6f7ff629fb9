use super::Bitvector;

/// Wraps a bitvector and exposes the complement of its bits.
///
/// Useful to reuse a compressor tuned for sparse 1s on an input that is sparse in 0s instead,
/// or vice versa: build the inverted stream with the inner type, then read through this wrapper.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct InvertedBitvector<BV> {
    inner: BV,
}

impl<BV: Bitvector> InvertedBitvector<BV> {
    /// Builds the wrapper from an inner bitvector that was constructed over the complement of
    /// the bits this wrapper should report.
    pub fn from_inverted_inner(inner: BV) -> Self {
        Self { inner }
    }
}

impl<BV: Bitvector> Bitvector for InvertedBitvector<BV> {
    fn size(&self) -> usize {
        self.inner.size()
    }

    fn symbol(&self, idx: usize) -> bool {
        !self.inner.symbol(idx)
    }

    fn rank(&self, idx: usize) -> usize {
        idx - self.inner.rank(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitvector::TwoLevelBitvector;

    fn naive_rank(bits: &[bool], idx: usize) -> usize {
        bits[..idx].iter().filter(|&&b| b).count()
    }

    #[test]
    fn inverts_a_sparse_ones_bitvector() {
        let bits: Vec<bool> = (0..4_000).map(|i| i % 37 == 0).collect();
        let inverted_bits: Vec<bool> = bits.iter().map(|&b| !b).collect();

        let inner = TwoLevelBitvector::construct(inverted_bits);
        let bv = InvertedBitvector::from_inverted_inner(inner);

        for i in 0..=bits.len() {
            assert_eq!(bv.rank(i), naive_rank(&bits, i), "mismatch at {i}");
        }
        for (i, &b) in bits.iter().enumerate() {
            assert_eq!(bv.symbol(i), b);
        }
    }
}
