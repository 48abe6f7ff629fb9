//! Merges two FM-Indices into one via an interleave vector, instead of re-running suffix array
//! construction over the concatenation of both texts.
//!
//! Grounded on `original_source/.../fmindex/merge.h`: `computeInterleavingR` simulates the
//! backward search of every suffix of the right-hand BWT through both BWTs in lockstep, producing
//! a bit per merged row saying which side it came from; `mergeBwt`/`mergeCsa` then zip the two
//! BWTs (and, here, the recovered suffix array values) together according to that vector.

use num_traits::NumCast;

use crate::lookup_table::{self, LookupTables};
use crate::sampled_suffix_array::SampledSuffixArray;
use crate::text_id_search_tree::TexdIdSearchTree;
use crate::text_with_rank_support::TextWithRankSupport;
use crate::text_with_rank_support::block::Block;
use crate::{FmIndex, IndexStorage};

pub(crate) fn merge<I: IndexStorage, B: Block>(
    lhs: &FmIndex<I, B>,
    rhs: &FmIndex<I, B>,
    suffix_array_sampling_rate: usize,
) -> FmIndex<I, B> {
    assert_eq!(
        lhs.alphabet.num_dense_symbols(),
        rhs.alphabet.num_dense_symbols(),
        "cannot merge indices built over different alphabets"
    );
    assert_eq!(
        lhs.is_bidirectional(),
        rhs.is_bidirectional(),
        "cannot merge a bidirectional index with a unidirectional one"
    );

    let alphabet_size = lhs.alphabet.num_dense_symbols();

    let count: Vec<usize> = lhs
        .count
        .iter()
        .zip(&rhs.count)
        .map(|(&a, &b)| a + b)
        .collect();

    let r_fwd = compute_interleaving_r(
        &lhs.text_with_rank_support,
        &lhs.count,
        &rhs.text_with_rank_support,
        &rhs.count,
    );
    let merged_bwt = merge_bwt(
        &r_fwd,
        &lhs.text_with_rank_support,
        &rhs.text_with_rank_support,
    );
    let text_with_rank_support = TextWithRankSupport::construct(&merged_bwt, alphabet_size);

    let reverse_text_with_rank_support = if lhs.is_bidirectional() {
        let lhs_rev = lhs.reverse_text_with_rank_support.as_ref().unwrap();
        let rhs_rev = rhs.reverse_text_with_rank_support.as_ref().unwrap();

        // reversing a string does not change its symbol multiset, so the same C-table applies.
        let r_rev = compute_interleaving_r(lhs_rev, &lhs.count, rhs_rev, &rhs.count);
        let merged_bwt_rev = merge_bwt(&r_rev, lhs_rev, rhs_rev);

        Some(TextWithRankSupport::construct(
            &merged_bwt_rev,
            alphabet_size,
        ))
    } else {
        None
    };

    let suffix_array = merge_suffix_array(
        &r_fwd,
        lhs,
        rhs,
        &merged_bwt,
        suffix_array_sampling_rate,
    );

    let sentinel_indices: Vec<usize> = lhs
        .text_ids
        .sentinel_indices
        .iter()
        .copied()
        .chain(
            rhs.text_ids
                .sentinel_indices
                .iter()
                .map(|&idx| idx + lhs.total_text_len()),
        )
        .collect();
    let text_ids = TexdIdSearchTree::new_from_sentinel_indices(sentinel_indices);

    let mut index = FmIndex {
        alphabet: lhs.alphabet.clone(),
        count,
        text_with_rank_support,
        reverse_text_with_rank_support,
        suffix_array,
        text_ids,
        lookup_tables: LookupTables::new_empty(),
        sequence_id_offset: lhs.sequence_id_offset,
    };

    let lookup_table_depth = lhs
        .lookup_tables
        .max_depth()
        .min(rhs.lookup_tables.max_depth());
    lookup_table::fill_lookup_tables(
        &mut index,
        lookup_table_depth,
        lhs.alphabet.num_searchable_dense_symbols(),
    );

    index
}

/// Builds the interleave vector: `false` means "take the next row from `lhs`", `true` means
/// "take the next row from `rhs`". Simulates, for every sentinel row of `rhs`, the backward search
/// of that text's suffixes through both BWTs in lockstep.
fn compute_interleaving_r<I: IndexStorage, B: Block>(
    lhs: &TextWithRankSupport<I, B>,
    lhs_count: &[usize],
    rhs: &TextWithRankSupport<I, B>,
    rhs_count: &[usize],
) -> Vec<bool> {
    let mut r = vec![false; lhs.text_len() + rhs.text_len()];

    let num_sequences_rhs = rhs.rank(0, rhs.text_len());

    for n in 0..num_sequences_rhs {
        let mut idx1 = 0usize;
        let mut idx2 = n;

        loop {
            debug_assert!(!r[idx1 + idx2]);
            r[idx1 + idx2] = true;

            let symbol = rhs.symbol_at(idx2);
            idx1 = lhs.rank(symbol, idx1) + lhs_count[symbol as usize];
            idx2 = rhs.rank(symbol, idx2) + rhs_count[symbol as usize];

            if symbol == 0 {
                break;
            }
        }
    }

    r
}

fn merge_bwt<I: IndexStorage, B: Block>(
    r: &[bool],
    lhs: &TextWithRankSupport<I, B>,
    rhs: &TextWithRankSupport<I, B>,
) -> Vec<u8> {
    let mut merged = Vec::with_capacity(r.len());
    let (mut idx1, mut idx2) = (0usize, 0usize);

    for &from_rhs in r {
        if from_rhs {
            merged.push(rhs.symbol_at(idx2));
            idx2 += 1;
        } else {
            merged.push(lhs.symbol_at(idx1));
            idx1 += 1;
        }
    }

    merged
}

fn merge_suffix_array<I: IndexStorage, B: Block>(
    r_fwd: &[bool],
    lhs: &FmIndex<I, B>,
    rhs: &FmIndex<I, B>,
    merged_bwt: &[u8],
    suffix_array_sampling_rate: usize,
) -> SampledSuffixArray<I> {
    let lhs_sa: Vec<usize> = lhs
        .suffix_array
        .recover_range(0..lhs.total_text_len(), lhs)
        .collect();
    let rhs_sa: Vec<usize> = rhs
        .suffix_array
        .recover_range(0..rhs.total_text_len(), rhs)
        .collect();

    let lhs_offset = lhs.total_text_len();
    let mut merged_sa = Vec::with_capacity(r_fwd.len());
    let (mut idx1, mut idx2) = (0usize, 0usize);

    for &from_rhs in r_fwd {
        if from_rhs {
            merged_sa.push(rhs_sa[idx2] + lhs_offset);
            idx2 += 1;
        } else {
            merged_sa.push(lhs_sa[idx1]);
            idx1 += 1;
        }
    }

    let mut text_border_lookup = std::collections::HashMap::new();
    for (row, &symbol) in merged_bwt.iter().enumerate() {
        if symbol == 0 {
            text_border_lookup.insert(row, <I as NumCast>::from(merged_sa[row]).unwrap());
        }
    }

    let suffix_array_values: Vec<I> = merged_sa
        .iter()
        .map(|&v| <I as NumCast>::from(v).unwrap())
        .collect();
    let suffix_array_bytes = bytemuck::cast_slice(&suffix_array_values).to_vec();

    I::sample_suffix_array_maybe_u32_compressed(
        suffix_array_bytes,
        suffix_array_sampling_rate,
        text_border_lookup,
    )
}

#[cfg(test)]
mod tests {
    use crate::{FmIndexConfig, alphabet};

    fn build_index<T: AsRef<[u8]> + Clone>(texts: &[T], bidirectional: bool) -> crate::FmIndex<i32> {
        FmIndexConfig::<i32>::new()
            .build_reverse_bwt(bidirectional)
            .suffix_array_sampling_rate(2)
            .construct_index(texts.to_vec(), alphabet::ascii_dna())
            .unwrap()
    }

    #[test]
    fn merged_index_counts_match_union_of_both_sides() {
        let lhs = build_index(&[b"ACGTACGT".as_slice(), b"TTTT".as_slice()], false);
        let rhs = build_index(&[b"GGGGACGT".as_slice()], false);

        let merged = lhs.merge(&rhs, 3);

        assert_eq!(merged.num_texts(), 3);
        assert_eq!(merged.count(b"ACGT"), lhs.count(b"ACGT") + rhs.count(b"ACGT"));
        assert_eq!(merged.count(b"GGGG"), rhs.count(b"GGGG"));
        assert_eq!(merged.count(b"TTTT"), lhs.count(b"TTTT"));
    }

    #[test]
    fn merged_index_locate_recovers_every_occurrence() {
        let lhs = build_index(&[b"ACGTACGT".as_slice()], false);
        let rhs = build_index(&[b"ACGTTT".as_slice()], false);

        let merged = lhs.merge(&rhs, 1);

        let mut hits: Vec<_> = merged.locate(b"ACGT").collect();
        hits.sort();

        let mut expected = vec![
            crate::Hit { text_id: 0, position: 0 },
            crate::Hit { text_id: 0, position: 4 },
            crate::Hit { text_id: 1, position: 0 },
        ];
        expected.sort();

        assert_eq!(hits, expected);
    }

    #[test]
    fn merged_bidirectional_index_supports_bi_cursor_extension() {
        let lhs = build_index(&[b"ACGTACGT".as_slice()], true);
        let rhs = build_index(&[b"GGACGTTT".as_slice()], true);

        let merged = lhs.merge(&rhs, 2);
        assert!(merged.is_bidirectional());

        let cursor = merged.bi_cursor_empty().extend_right(b'A');
        assert_eq!(cursor.count(), merged.count(b"A"));
    }
}
