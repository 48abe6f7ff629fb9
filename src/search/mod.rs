//! The approximate-search engine: a depth-first driver that walks an index under an explicit
//! [`SearchScheme`], producing matches within a given Hamming or edit distance.
//!
//! Grounded on `fmc::search_ng25` (the DFS recursion, partitioning, and the single-cursor fast
//! path) and `fmc::search_hamming_sm` (the scoring-matrix variant).

mod engine;
mod scheme;
mod scoring;

pub use scheme::{Search, SearchScheme, even_partition};
pub use scoring::ScoringMatrix;

use crate::{BiCursor, FmIndex, IndexStorage, text_with_rank_support::block::Block};

/// Selects whether the engine allows insertions/deletions (edit distance) or only substitutions
/// (Hamming distance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMode {
    Hamming,
    Edit,
}

/// Runs every search in `scheme` against `query`, depth-first, calling `delegate(cursor, errors)`
/// for every match that satisfies the scheme's error bounds. `partition` gives the length of each
/// query part in original (unpermuted) order; `partition.iter().sum()` must equal `query.len()`.
///
/// Returns as soon as `delegate` returns `true` (cooperative cancellation), or once every search
/// in the scheme has been exhausted. A query containing a byte outside the index's alphabet, an
/// empty query, or an empty scheme all yield no matches rather than an error.
pub fn search<'a, I: IndexStorage, B: Block>(
    index: &'a FmIndex<I, B>,
    query: &[u8],
    scheme: &SearchScheme,
    partition: &[usize],
    mode: DistanceMode,
    mut delegate: impl FnMut(BiCursor<'a, I, B>, usize) -> bool,
) {
    engine::run(
        index,
        query,
        scheme,
        partition,
        mode == DistanceMode::Edit,
        &mut delegate,
    );
}

/// Like [`search`], but stops once the cumulative sum of reported `cursor.count()` reaches `n`,
/// truncating the last reported cursor's length so the total is exactly `n`.
pub fn search_n<'a, I: IndexStorage, B: Block>(
    index: &'a FmIndex<I, B>,
    query: &[u8],
    scheme: &SearchScheme,
    partition: &[usize],
    mode: DistanceMode,
    n: usize,
    mut delegate: impl FnMut(BiCursor<'a, I, B>, usize) -> bool,
) {
    if n == 0 {
        return;
    }

    let mut found = 0usize;
    search(index, query, scheme, partition, mode, |cur, e| {
        let remaining = n - found;
        let cur = if cur.count() > remaining {
            cur.truncated(remaining)
        } else {
            cur
        };
        found += cur.count();
        let stop = delegate(cur, e);
        stop || found >= n
    });
}

/// Runs a substitution-only search scored against a [`ScoringMatrix`] instead of a fixed
/// "substitution costs 1" rule, tracking the *ambiguous* and *mismatch* error budgets
/// independently. `delegate` receives `(cursor, ambiguous_used, mismatch_used)`.
pub fn search_with_scoring_matrix<'a, I: IndexStorage, B: Block>(
    index: &'a FmIndex<I, B>,
    query: &[u8],
    matrix: &ScoringMatrix,
    ambiguous_budget: usize,
    mismatch_budget: usize,
    mut delegate: impl FnMut(BiCursor<'a, I, B>, usize, usize) -> bool,
) {
    engine::run_with_scoring_matrix(
        index,
        query,
        matrix,
        ambiguous_budget,
        mismatch_budget,
        &mut delegate,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FmIndexConfig, alphabet};

    fn build_index(texts: &[&[u8]]) -> FmIndex<i32> {
        FmIndexConfig::<i32>::new()
            .build_reverse_bwt(true)
            .construct_index(texts.iter().copied(), alphabet::ascii_dna())
            .unwrap()
    }

    #[test]
    fn exact_search_finds_every_occurrence() {
        let texts: &[&[u8]] = &[b"ACGTACGTACG", b"TTACGTTT"];
        let index = build_index(texts);
        let scheme = SearchScheme::exact();

        let mut hits = Vec::new();
        search(
            &index,
            b"ACG",
            &scheme,
            &[3],
            DistanceMode::Hamming,
            |cur, e| {
                assert_eq!(e, 0);
                hits.extend(cur.locate());
                false
            },
        );

        assert_eq!(hits.len(), 4); // 3 occurrences in text 0, 1 in text 1
    }

    #[test]
    fn hamming_one_search_matches_single_substitution() {
        // Text = "AGATCA", query = "AGG" with max-errors=1: expect (0,0) with 1 error.
        let texts: &[&[u8]] = &[b"AGATCA"];
        let index = build_index(texts);
        let scheme = SearchScheme::unoptimized(1, 1);

        let mut found = Vec::new();
        search(
            &index,
            b"AGG",
            &scheme,
            &[3],
            DistanceMode::Hamming,
            |cur, e| {
                for hit in cur.locate() {
                    found.push((hit.text_id, hit.position, e));
                }
                false
            },
        );

        assert!(found.contains(&(0, 0, 1)), "{found:?}");
    }

    #[test]
    fn out_of_alphabet_query_yields_no_matches() {
        let texts: &[&[u8]] = &[b"ACGTACGT"];
        let index = build_index(texts);
        let scheme = SearchScheme::exact();

        let mut calls = 0;
        search(&index, b"ACX", &scheme, &[3], DistanceMode::Hamming, |_, _| {
            calls += 1;
            false
        });

        assert_eq!(calls, 0);
    }

    #[test]
    fn search_n_truncates_to_exactly_n() {
        let texts: &[&[u8]] = &[b"AAAAAAAAAA"];
        let index = build_index(texts);
        let scheme = SearchScheme::exact();

        let mut total = 0;
        search_n(&index, b"A", &scheme, &[1], DistanceMode::Hamming, 4, |cur, _| {
            total += cur.count();
            false
        });

        assert_eq!(total, 4);
    }
}
