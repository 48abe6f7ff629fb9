/// One entry of a [`SearchScheme`]: an order in which to walk the query's parts, and per-part
/// inclusive error bounds. `pi`, `l` and `u` are parallel vectors of equal length.
///
/// Grounded on `fmc::search_scheme::Search`'s `(pi, l, u)` triple.
#[derive(Debug, Clone)]
pub struct Search {
    /// A permutation of `0..num_parts`, the order the parts are visited in. Does not need to be
    /// contiguous in text order; a jump flips the extension direction for the next part.
    pub pi: Vec<usize>,
    /// Per-part inclusive lower error bound, indexed by position in `pi` (not by part id).
    pub l: Vec<usize>,
    /// Per-part inclusive upper error bound, indexed by position in `pi`.
    pub u: Vec<usize>,
}

impl Search {
    /// Builds a search, checking the invariants from the search-scheme data model: equal-length
    /// vectors and `l[i] <= u[i]` everywhere.
    pub fn new(pi: Vec<usize>, l: Vec<usize>, u: Vec<usize>) -> Self {
        assert_eq!(pi.len(), l.len());
        assert_eq!(pi.len(), u.len());
        assert!(l.iter().zip(&u).all(|(lo, hi)| lo <= hi));

        Self { pi, l, u }
    }

    pub(crate) fn num_parts(&self) -> usize {
        self.pi.len()
    }
}

/// An ordered collection of [`Search`]es, tried in turn until one of them reports a match via the
/// engine's delegate.
#[derive(Debug, Clone, Default)]
pub struct SearchScheme {
    pub searches: Vec<Search>,
}

impl SearchScheme {
    pub fn new(searches: Vec<Search>) -> Self {
        Self { searches }
    }

    /// The trivial scheme for exact search: a single search with one part covering the whole
    /// query, `l = u = 0` everywhere.
    pub fn exact() -> Self {
        Self {
            searches: vec![Search::new(vec![0], vec![0], vec![0])],
        }
    }

    /// A single search that processes `num_parts` contiguous parts left to right, allowing up to
    /// `max_errors` total, spread arbitrarily across the whole query (`l = 0`, `u = max_errors`
    /// at every part). Not an optimal search scheme (those minimize backtracking by tightening
    /// `l`/`u` per part), but a correct one for any `num_parts >= 1`.
    pub fn unoptimized(num_parts: usize, max_errors: usize) -> Self {
        assert!(num_parts >= 1);

        Self {
            searches: vec![Search::new(
                (0..num_parts).collect(),
                vec![0; num_parts],
                vec![max_errors; num_parts],
            )],
        }
    }
}

/// Splits a query of length `query_len` into `num_parts` contiguous parts of nearly equal size,
/// the partition vector every [`Search`] in a scheme shares.
pub fn even_partition(query_len: usize, num_parts: usize) -> Vec<usize> {
    assert!(num_parts >= 1);
    assert!(query_len >= num_parts);

    let base = query_len / num_parts;
    let remainder = query_len % num_parts;

    (0..num_parts)
        .map(|i| base + usize::from(i < remainder))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_partition_sums_to_query_length() {
        for query_len in 1..30 {
            for num_parts in 1..=query_len {
                let partition = even_partition(query_len, num_parts);
                assert_eq!(partition.len(), num_parts);
                assert_eq!(partition.iter().sum::<usize>(), query_len);
            }
        }
    }

    #[test]
    fn exact_scheme_has_zero_error_budget() {
        let scheme = SearchScheme::exact();
        assert_eq!(scheme.searches.len(), 1);
        assert_eq!(scheme.searches[0].l, vec![0]);
        assert_eq!(scheme.searches[0].u, vec![0]);
    }
}
