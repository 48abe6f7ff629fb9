mod bwt;

use bytemuck::Pod;
use libsais::{OutputElement, ThreadCount};
use num_traits::{NumCast, PrimInt};
use rayon::prelude::*;

use crate::alphabet::Alphabet;
use crate::error::ConstructionError;
use crate::sampled_suffix_array::SampledSuffixArray;
use crate::text_id_search_tree::TexdIdSearchTree;
use crate::text_with_rank_support::TextWithRankSupport;
use crate::text_with_rank_support::block::Block;
use crate::{FmIndexConfig, maybe_savefile, sealed};

pub(crate) struct DataStructures<I, B> {
    pub(crate) count: Vec<usize>,
    pub(crate) sampled_suffix_array: SampledSuffixArray<I>,
    pub(crate) text_ids: TexdIdSearchTree,
    pub(crate) text_with_rank_support: TextWithRankSupport<I, B>,
    pub(crate) reverse_text_with_rank_support: Option<TextWithRankSupport<I, B>>,
}

pub(crate) fn create_data_structures<I: IndexStorage, B: Block, T: AsRef<[u8]>>(
    texts: impl IntoIterator<Item = T>,
    config: FmIndexConfig<I, B>,
    alphabet: &Alphabet,
) -> Result<DataStructures<I, B>, ConstructionError> {
    assert!(
        config.use_sentinels,
        "sentinel-free construction is not supported yet, see DESIGN.md"
    );

    let generic_texts: Vec<_> = texts.into_iter().map(|t| t.as_ref().to_vec()).collect();

    let (text, mut frequency_table, sentinel_indices) =
        create_concatenated_densely_encoded_text(generic_texts.iter(), alphabet);

    let max_len = <usize as NumCast>::from(I::max_value()).unwrap();
    if text.len() > max_len {
        return Err(ConstructionError::TextTooLarge {
            text_len: text.len(),
            max_len,
        });
    }

    let text_ids = TexdIdSearchTree::new_from_sentinel_indices(sentinel_indices);

    let count = frequency_table_to_count(&frequency_table, alphabet.num_dense_symbols());

    let (sampled_suffix_array, bwt) = I::construct_sampled_suffix_array_and_bwt(
        &text,
        &mut frequency_table,
        config.suffix_array_sampling_rate,
        config.sa_thread_hint,
    );

    let text_with_rank_support =
        TextWithRankSupport::construct(&bwt, alphabet.num_dense_symbols());

    let reverse_text_with_rank_support = config.build_reverse_bwt.then(|| {
        let reversed_texts: Vec<Vec<u8>> = generic_texts
            .iter()
            .map(|t| t.iter().rev().copied().collect())
            .collect();

        let (reverse_text, mut reverse_frequency_table, _) =
            create_concatenated_densely_encoded_text(reversed_texts.iter(), alphabet);

        let (_, reverse_bwt) = I::construct_sampled_suffix_array_and_bwt(
            &reverse_text,
            &mut reverse_frequency_table,
            config.suffix_array_sampling_rate,
            config.sa_thread_hint,
        );

        TextWithRankSupport::construct(&reverse_bwt, alphabet.num_dense_symbols())
    });

    Ok(DataStructures {
        count,
        sampled_suffix_array,
        text_ids,
        text_with_rank_support,
        reverse_text_with_rank_support,
    })
}

/// Types that can be used to store indices inside the FM-Index.
///
/// The maximum value of the type is an upper bound for the sum of lengths of indexed texts. Types with
/// larger maximum values allow indexing larger texts.
///
/// On the other hand, larger types lead to higher memory usage, especially during index
/// construction. For example, to index the 3.3 GB large human genome, `i32` would be a good
/// choice if all texts fit below the 32 bit limit; `u32` trades a little recovery overhead for
/// lower memory use at that scale, and `i64` is needed beyond it.
pub trait IndexStorage:
    PrimInt + Pod + maybe_savefile::MaybeSavefile + sealed::Sealed + Send + Sync + 'static
{
    #[doc(hidden)]
    type LibsaisOutput: OutputElement + IndexStorage;

    #[doc(hidden)]
    fn construct_libsais_suffix_array(
        text: &[u8],
        frequency_table: &mut [Self::LibsaisOutput],
        thread_hint: usize,
    ) -> Vec<u8> {
        // allocate the buffer in bytes, because maybe we want to muck around with integer types later (compress i64 into u32)
        let mut suffix_array_bytes = vec![0u8; text.len() * size_of::<Self::LibsaisOutput>()];
        let suffix_array_buffer: &mut [Self::LibsaisOutput] =
            bytemuck::cast_slice_mut(&mut suffix_array_bytes);

        let num_threads = if thread_hint == 0 {
            rayon::current_num_threads()
        } else {
            thread_hint
        };

        let mut construction = libsais::SuffixArrayConstruction::for_text(text)
            .in_borrowed_buffer(suffix_array_buffer)
            .multi_threaded(ThreadCount::fixed(
                num_threads
                    .try_into()
                    .expect("Number of threads should fit into u16"),
            ));

        unsafe {
            construction = construction.with_frequency_table(frequency_table);
        }

        construction
            .run()
            .expect("libsais suffix array construction");

        suffix_array_bytes
    }

    #[doc(hidden)]
    fn construct_sampled_suffix_array_and_bwt(
        text: &[u8],
        frequency_table: &mut [Self::LibsaisOutput],
        suffix_array_sampling_rate: usize,
        thread_hint: usize,
    ) -> (SampledSuffixArray<Self>, Vec<u8>) {
        let suffix_array_bytes =
            Self::construct_libsais_suffix_array(text, frequency_table, thread_hint);
        let suffix_array_buffer: &[Self::LibsaisOutput] = bytemuck::cast_slice(&suffix_array_bytes);

        let (bwt, text_border_lookup) = bwt::bwt_from_suffix_array(suffix_array_buffer, text);

        let sampled_suffix_array = Self::sample_suffix_array_maybe_u32_compressed(
            suffix_array_bytes,
            suffix_array_sampling_rate,
            text_border_lookup,
        );

        (sampled_suffix_array, bwt)
    }

    #[doc(hidden)]
    fn sample_suffix_array_maybe_u32_compressed(
        suffix_array_bytes: Vec<u8>,
        sampling_rate: usize,
        text_border_lookup: std::collections::HashMap<usize, Self>,
    ) -> SampledSuffixArray<Self> {
        SampledSuffixArray::new_uncompressed(suffix_array_bytes, sampling_rate, text_border_lookup)
    }
}

impl sealed::Sealed for i32 {}

impl IndexStorage for i32 {
    type LibsaisOutput = i32;
}

impl sealed::Sealed for u32 {}

impl IndexStorage for u32 {
    type LibsaisOutput = i64;

    fn sample_suffix_array_maybe_u32_compressed(
        suffix_array_bytes: Vec<u8>,
        sampling_rate: usize,
        text_border_lookup: std::collections::HashMap<usize, Self>,
    ) -> SampledSuffixArray<Self> {
        SampledSuffixArray::new_u32_compressed(
            suffix_array_bytes,
            sampling_rate,
            text_border_lookup,
        )
    }
}

impl sealed::Sealed for i64 {}

impl IndexStorage for i64 {
    type LibsaisOutput = i64;
}

pub(crate) fn create_concatenated_densely_encoded_text<I: OutputElement, T: AsRef<[u8]>>(
    texts: impl IntoIterator<Item = T>,
    alphabet: &Alphabet,
) -> (Vec<u8>, Vec<I>, Vec<usize>) {
    // this generic texts owned vec is needed for the as_ref interface
    let generic_texts: Vec<_> = texts.into_iter().collect();
    let texts: Vec<&[u8]> = generic_texts.iter().map(|t| t.as_ref()).collect();
    let num_texts = texts.len();

    let needed_capacity = texts.iter().map(|t| t.len()).sum::<usize>() + num_texts;

    let sentinel_indices: Vec<_> = texts
        .iter()
        .scan(0, |state, t| {
            let temp = *state + t.len();
            *state += t.len() + 1;
            Some(temp)
        })
        .collect();

    let mut concatenated_text = vec![0; needed_capacity];
    let mut concatenated_text_splits = Vec::with_capacity(num_texts);
    let mut remaining_slice = concatenated_text.as_mut_slice();

    for t in texts.iter() {
        let (this, remaining) = remaining_slice.split_at_mut(t.len() + 1);
        concatenated_text_splits.push(this);
        remaining_slice = remaining;
    }

    let mut frequency_table = texts
        .into_par_iter()
        .zip(concatenated_text_splits)
        .map(|(text, concatenated_text_split)| {
            let mut frequency_table = vec![I::zero(); 256];

            for (source, target) in text.iter().zip(concatenated_text_split) {
                *target = alphabet.io_to_dense_representation(*source);
                frequency_table[*target as usize] = frequency_table[*target as usize] + I::one();
            }

            frequency_table
        })
        .reduce_with(merge_frequency_tables)
        .expect("There should be at least one texts");

    frequency_table[0] = <I as NumCast>::from(num_texts).unwrap();

    (concatenated_text, frequency_table, sentinel_indices)
}

fn merge_frequency_tables<I: OutputElement>(mut f1: Vec<I>, f2: Vec<I>) -> Vec<I> {
    for (x1, x2) in f1.iter_mut().zip(f2) {
        *x1 = *x1 + x2;
    }

    f1
}

fn frequency_table_to_count<I: OutputElement>(
    frequency_table: &[I],
    alphabet_size: usize,
) -> Vec<usize> {
    let mut count: Vec<_> = frequency_table[..alphabet_size]
        .iter()
        .map(|&value| <usize as NumCast>::from(value).unwrap())
        .collect();

    let mut sum = 0;

    for entry in count.iter_mut() {
        let temp = *entry;
        *entry = sum;
        sum += temp;
    }

    count
}
