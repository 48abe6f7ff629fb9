//! Fixed-bit-width integer vectors, the storage primitive underneath the suffix array layer.

/// Cross-word packed integer vector.
///
/// Stores `n` non-negative integers in `⌈n·w/64⌉` 64-bit words, where `w` is the configured bit
/// width; values may span a word boundary. Supports an optional `common_divisor`: every stored
/// value is divided by it before being packed, and multiplied back on read, which lowers `w` for
/// inputs that are all multiples of the same number (e.g. sampled suffix array positions).
///
/// Append-only during construction; read-only after via [`access`](Self::access).
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct PackedIntVec {
    words: Vec<u64>,
    bit_width: u32,
    common_divisor: u64,
    len: usize,
}

impl PackedIntVec {
    /// Creates an empty vector with the given bit width and common divisor. `bit_width` must be
    /// in `1..=64`, `common_divisor` must be nonzero.
    pub fn new(bit_width: u32, common_divisor: u64) -> Self {
        assert!((1..=64).contains(&bit_width));
        assert!(common_divisor > 0);

        Self {
            words: Vec::new(),
            bit_width,
            common_divisor,
            len: 0,
        }
    }

    /// The smallest bit width that can represent `max_value`.
    pub fn bit_width_for(max_value: u64) -> u32 {
        64 - max_value.leading_zeros().min(63)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Appends `value`. `value` must be divisible by `common_divisor` and `value /
    /// common_divisor` must fit in `bit_width` bits; violating this is a programmer error
    /// (debug-checked only).
    pub fn push_back(&mut self, value: u64) {
        debug_assert!(value % self.common_divisor == 0);
        let scaled = value / self.common_divisor;
        debug_assert!(self.bit_width == 64 || scaled < (1u64 << self.bit_width));

        let bit_offset = self.len as u64 * self.bit_width as u64;
        let word_idx = (bit_offset / 64) as usize;
        let bit_in_word = bit_offset % 64;

        if word_idx == self.words.len() {
            self.words.push(0);
        }

        self.words[word_idx] |= scaled << bit_in_word;

        let bits_in_first_word = 64 - bit_in_word;
        if bits_in_first_word < self.bit_width as u64 {
            self.words.push(scaled >> bits_in_first_word);
        }

        self.len += 1;
    }

    /// Reads the value at `idx`. `idx` must be smaller than [`len`](Self::len).
    pub fn access(&self, idx: usize) -> u64 {
        assert!(idx < self.len);

        let bit_offset = idx as u64 * self.bit_width as u64;
        let word_idx = (bit_offset / 64) as usize;
        let bit_in_word = bit_offset % 64;

        let mask = if self.bit_width == 64 {
            u64::MAX
        } else {
            (1u64 << self.bit_width) - 1
        };

        let low = self.words[word_idx] >> bit_in_word;

        let bits_in_first_word = 64 - bit_in_word;
        let scaled = if bits_in_first_word < self.bit_width as u64 {
            let high = self.words[word_idx + 1] << bits_in_first_word;
            (low | high) & mask
        } else {
            low & mask
        };

        scaled * self.common_divisor
    }
}

/// Array-of-packed-words integer vector.
///
/// Unlike [`PackedIntVec`], each 64-bit word holds a whole number of entries
/// (`entries_per_word = 64 / bit_width`) and no value spans a word boundary. This wastes up to
/// `64 % bit_width` bits per word but allows in-place [`set`](Self::set), which the suffix array
/// layer needs when it overwrites sampled entries during construction.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct PackedWordVec {
    words: Vec<u64>,
    bit_width: u32,
    entries_per_word: usize,
    len: usize,
}

impl PackedWordVec {
    pub fn new(bit_width: u32, len: usize) -> Self {
        assert!((1..=64).contains(&bit_width));

        let entries_per_word = (64 / bit_width) as usize;
        let num_words = len.div_ceil(entries_per_word);

        Self {
            words: vec![0; num_words],
            bit_width,
            entries_per_word,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn mask(&self) -> u64 {
        if self.bit_width == 64 {
            u64::MAX
        } else {
            (1u64 << self.bit_width) - 1
        }
    }

    pub fn access(&self, idx: usize) -> u64 {
        assert!(idx < self.len);
        let word_idx = idx / self.entries_per_word;
        let slot = idx % self.entries_per_word;
        let shift = slot as u32 * self.bit_width;

        (self.words[word_idx] >> shift) & self.mask()
    }

    /// Overwrites the value at `idx` in place. `value` must fit in `bit_width` bits.
    pub fn set(&mut self, idx: usize, value: u64) {
        assert!(idx < self.len);
        debug_assert!(value <= self.mask());

        let word_idx = idx / self.entries_per_word;
        let slot = idx % self.entries_per_word;
        let shift = slot as u32 * self.bit_width;

        self.words[word_idx] &= !(self.mask() << shift);
        self.words[word_idx] |= value << shift;
    }
}
