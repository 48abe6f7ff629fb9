use crate::{
    Alphabet, ConstructionError, FmIndex, IndexStorage,
    text_with_rank_support::block::{Block, Block64},
};
use std::marker::PhantomData;

/// A builder-like API to configure and construct the FM-Index.
#[derive(Clone, Copy)]
pub struct FmIndexConfig<I, B = Block64> {
    pub(crate) suffix_array_sampling_rate: usize,
    pub(crate) lookup_table_depth: usize,
    pub(crate) use_sentinels: bool,
    pub(crate) build_reverse_bwt: bool,
    pub(crate) sa_thread_hint: usize,
    pub(crate) sequence_id_offset: usize,
    _index_storage_marker: PhantomData<I>,
    _block_marker: PhantomData<B>,
}

impl<I: IndexStorage, B: Block> FmIndexConfig<I, B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The FM-Index internally stores a suffix array. Every entry of this array at a position
    /// divisible by `suffix_array_sampling_rate` is retained. For example, a rate of 3
    /// would retain every third entry of the suffix array.
    ///
    /// A larger rate leads to less memory usage, but higher locate running time. The default is `4`.
    pub fn suffix_array_sampling_rate(self, suffix_array_sampling_rate: usize) -> Self {
        assert!(suffix_array_sampling_rate > 0);

        Self {
            suffix_array_sampling_rate,
            ..self
        }
    }

    /// The FM-Index stores a lookup table to skip the first `lookup_table_depth` many search steps
    /// when searching a query. The size of the lookup table grows exponentially in its depth,
    /// with the number of searchable alphabet symbols as base. The default is `8`.
    ///
    /// For large texts like genomes and small alphabets like DNA alphabets with 4 searchable symbols,
    /// values up to around `13` might be reasonable choices.
    pub fn lookup_table_depth(self, lookup_table_depth: usize) -> Self {
        Self {
            lookup_table_depth,
            ..self
        }
    }

    /// Whether each indexed text is delimited by a sentinel symbol (dense symbol `0`) during
    /// construction. This is currently the only supported mode; the value is carried in the
    /// configuration to match the enumerated options, but `false` is rejected at construction
    /// time. See `DESIGN.md` for the rationale.
    pub fn use_sentinels(self, use_sentinels: bool) -> Self {
        Self {
            use_sentinels,
            ..self
        }
    }

    /// Also construct a rank-support structure over the BWT of every text reversed. This doubles
    /// construction time and the size of the rank-support structure, but is required for a
    /// bidirectional [`Cursor`](crate::Cursor) that can extend a query on either end.
    ///
    /// Default is `false`.
    pub fn build_reverse_bwt(self, build_reverse_bwt: bool) -> Self {
        Self {
            build_reverse_bwt,
            ..self
        }
    }

    /// A hint for the number of threads used by the parallel suffix array construction. `0`
    /// (the default) uses [`rayon::current_num_threads`].
    pub fn sa_thread_hint(self, sa_thread_hint: usize) -> Self {
        Self {
            sa_thread_hint,
            ..self
        }
    }

    /// An offset added to every `text_id` reported by [`count`](FmIndex::count) and
    /// [`locate`](FmIndex::locate). Useful when this index only covers a subrange of a larger,
    /// externally tracked collection of texts. Default is `0`.
    pub fn sequence_id_offset(self, sequence_id_offset: usize) -> Self {
        Self {
            sequence_id_offset,
            ..self
        }
    }

    /// Construct the FM-Index.
    ///
    /// The number of threads for the build procedure is controlled by [`rayon`], unless
    /// overridden with [`sa_thread_hint`](Self::sa_thread_hint).
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::TextTooLarge`] if the concatenated texts do not fit the
    /// index storage type `I` chosen on this config.
    pub fn construct_index<T: AsRef<[u8]>>(
        self,
        texts: impl IntoIterator<Item = T>,
        alphabet: Alphabet,
    ) -> Result<FmIndex<I, B>, ConstructionError> {
        FmIndex::new(texts, alphabet, self)
    }
}

impl<I: IndexStorage, B: Block> Default for FmIndexConfig<I, B> {
    fn default() -> Self {
        Self {
            suffix_array_sampling_rate: 4,
            lookup_table_depth: 8,
            use_sentinels: true,
            build_reverse_bwt: false,
            sa_thread_hint: 0,
            sequence_id_offset: 0,
            _index_storage_marker: PhantomData,
            _block_marker: PhantomData,
        }
    }
}
