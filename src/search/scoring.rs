/// A Σ×Σ substitution-cost matrix, the scoring-matrix variant of the search engine's
/// substitution rule. Every entry is one of:
/// - `0` — allowed as a match, does not consume either error budget.
/// - `1` — ambiguous, consumes one unit of the *ambiguous* budget.
/// - `2` — mismatch, consumes one unit of the *mismatch* budget.
///
/// Indices are dense symbol codes (`1..=alphabet.num_searchable_dense_symbols()`); `reference` is
/// the BWT symbol a cursor is being extended with, `query` is the query symbol it is compared
/// against.
#[derive(Debug, Clone)]
pub struct ScoringMatrix {
    alphabet_size: usize,
    entries: Vec<u8>,
}

impl ScoringMatrix {
    /// Builds a matrix from a row-major `alphabet_size * alphabet_size` entry list. Every entry
    /// must be `0`, `1` or `2`.
    pub fn new(alphabet_size: usize, entries: Vec<u8>) -> Self {
        assert_eq!(entries.len(), alphabet_size * alphabet_size);
        assert!(entries.iter().all(|&e| e <= 2));

        Self {
            alphabet_size,
            entries,
        }
    }

    /// Plain Hamming scoring: every substitution is a mismatch, matches are free.
    pub fn hamming(alphabet_size: usize) -> Self {
        let entries = (0..alphabet_size * alphabet_size)
            .map(|idx| {
                let (r, q) = (idx / alphabet_size, idx % alphabet_size);
                u8::from(r != q) * 2
            })
            .collect();

        Self {
            alphabet_size,
            entries,
        }
    }

    /// The cost class of substituting `query` for `reference`: `0` (match), `1` (ambiguous) or
    /// `2` (mismatch).
    pub fn classify(&self, reference: u8, query: u8) -> u8 {
        self.entries[reference as usize * self.alphabet_size + query as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_matrix_only_allows_identity_matches() {
        let matrix = ScoringMatrix::hamming(4);
        for r in 0..4u8 {
            for q in 0..4u8 {
                let expected = if r == q { 0 } else { 2 };
                assert_eq!(matrix.classify(r, q), expected);
            }
        }
    }
}
