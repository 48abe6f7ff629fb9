use crate::IndexStorage;
use num_traits::NumCast;
use rayon::prelude::*;
use std::collections::HashMap;

// I1: current suffix array indices, I2: IndexStorage we want to use for the FM-Index
pub(crate) fn bwt_from_suffix_array<I1: IndexStorage, I2: IndexStorage>(
    suffix_array: &[I1],
    text: &[u8],
) -> (Vec<u8>, HashMap<usize, I2>) {
    let mut bwt = vec![0; text.len()];

    // collecting the text border lookup values while constructing the BWT made the function
    // run much slower. this two-level chunk scheme leads to the same performance as before
    let outer_chunk_size = std::cmp::max(text.len().div_ceil(rayon::current_num_threads() * 4), 1);
    let inner_chunk_size = 128;

    let text_border_lookup = suffix_array
        .par_chunks(outer_chunk_size)
        .zip(bwt.par_chunks_mut(outer_chunk_size))
        .enumerate()
        .map(
            |(outer_chunk_index, (outer_suffix_array_chunk, outer_bwt_chunk))| {
                let mut text_border_lookup = HashMap::new();

                for (inner_chunk_index, (inner_suffix_array_chunk, inner_bwt_chunk)) in
                    outer_suffix_array_chunk
                        .chunks(inner_chunk_size)
                        .zip(outer_bwt_chunk.chunks_mut(inner_chunk_size))
                        .enumerate()
                {
                    for (&text_index, bwt_entry) in inner_suffix_array_chunk
                        .iter()
                        .zip(inner_bwt_chunk.iter_mut())
                    {
                        let text_index_usize = <usize as NumCast>::from(text_index).unwrap();

                        let text_index_usize = if text_index_usize > 0 {
                            text_index_usize
                        } else {
                            text.len()
                        };

                        *bwt_entry = text[text_index_usize - 1];
                    }

                    for i in memchr::memchr_iter(0, inner_bwt_chunk) {
                        let suffix_array_index = outer_chunk_size * outer_chunk_index
                            + inner_chunk_size * inner_chunk_index
                            + i;

                        let text_index =
                            <I2 as NumCast>::from(inner_suffix_array_chunk[i]).unwrap();
                        text_border_lookup.insert(suffix_array_index, text_index);
                    }
                }

                text_border_lookup
            },
        )
        .reduce_with(|mut m0, m1| {
            for (key, value) in m1.into_iter() {
                m0.insert(key, value);
            }
            m0
        })
        .unwrap_or_default();

    (bwt, text_border_lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borders_land_on_sentinel_rows() {
        let text: Vec<u8> = vec![2, 2, 2, 1, 1, 1, 0, 1, 2, 0];
        let suffix_array: Vec<i32> = libsais::SuffixArrayConstruction::for_text(&text)
            .in_owned_buffer32()
            .single_threaded()
            .run()
            .unwrap()
            .into_vec();

        let (bwt, text_border_lookup): (Vec<u8>, HashMap<usize, i32>) =
            bwt_from_suffix_array(&suffix_array, &text);

        assert_eq!(bwt.len(), text.len());
        assert_eq!(text_border_lookup.len(), 2);

        for (&sa_index, &recovered_text_index) in &text_border_lookup {
            assert_eq!(suffix_array[sa_index], recovered_text_index);
        }
    }
}
