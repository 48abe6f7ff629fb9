//! Functions to create the alphabets that texts and queries are encoded over.
//!
//! Internally, every symbol is translated to a "dense" representation: a small integer
//! starting at 1 (0 is reserved for the sentinel that terminates every indexed text). An
//! [`Alphabet`] carries this translation table plus the sizing information the rest of the
//! library needs to build rank structures and run backward search over it.
//!
//! There might be symbols at the end of the alphabet that are never searched (like `N`).
//! Sentinel `0` is NOT allowed to be a defined value for any alphabet.

/// An alphabet: a translation table from raw input bytes to the dense representation used
/// internally, plus the resulting dense alphabet size.
///
/// Symbols that are not part of the alphabet translate to `255` and must not occur in
/// indexed texts or queries.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct Alphabet {
    translation_table: Vec<u8>,
    num_dense_symbols: usize,
    num_symbols_not_searched: usize,
}

impl Alphabet {
    /// Builds a custom alphabet from a `[u8; 256]`-style translation table.
    ///
    /// `table[byte]` must be `0` for the sentinel (never set it), `1..num_dense_symbols` for
    /// symbols that are part of the alphabet, or `255` for bytes that are not.
    /// `num_dense_symbols` includes the sentinel. `num_symbols_not_searched` counts dense
    /// symbols at the end of the range (e.g. `N`) that lookup table precomputation skips.
    pub fn from_translation_table(
        table: [u8; 256],
        num_dense_symbols: usize,
        num_symbols_not_searched: usize,
    ) -> Self {
        assert!(num_dense_symbols >= 2);
        assert!(num_symbols_not_searched < num_dense_symbols);

        Self {
            translation_table: table.to_vec(),
            num_dense_symbols,
            num_symbols_not_searched,
        }
    }

    pub(crate) fn io_to_dense_representation(&self, byte: u8) -> u8 {
        let dense = self.translation_table[byte as usize];
        debug_assert!(dense != 255, "byte not part of the alphabet");
        dense
    }

    /// Same translation, but `None` instead of a debug-assert for a byte outside the alphabet.
    /// Used by callers (like the search engine) that must treat an out-of-alphabet query symbol
    /// as "no matches" rather than a programmer error.
    pub(crate) fn try_io_to_dense_representation(&self, byte: u8) -> Option<u8> {
        match self.translation_table[byte as usize] {
            255 => None,
            dense => Some(dense),
        }
    }

    /// The total number of dense symbols, including the sentinel (symbol `0`).
    pub fn num_dense_symbols(&self) -> usize {
        self.num_dense_symbols
    }

    /// The number of dense symbols (excluding the sentinel) that backward search considers.
    ///
    /// Symbols at the end of the dense range, like `N` in DNA-with-N alphabets, are part of
    /// the alphabet but excluded from lookup table precomputation, since queries ending in
    /// such wildcard-like symbols are rarely searched for directly.
    pub fn num_searchable_dense_symbols(&self) -> usize {
        self.num_dense_symbols - 1 - self.num_symbols_not_searched
    }
}

const ASCII_DNA_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = [255; 256];

    table[b'A' as usize] = 1;
    table[b'a' as usize] = 1;

    table[b'C' as usize] = 2;
    table[b'c' as usize] = 2;

    table[b'G' as usize] = 3;
    table[b'g' as usize] = 3;

    table[b'T' as usize] = 4;
    table[b't' as usize] = 4;

    table
};

const ASCII_DNA_N_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = ASCII_DNA_TRANSLATION_TABLE;
    table[b'N' as usize] = 5;
    table[b'n' as usize] = 5;

    table
};

const ASCII_DNA_IUPAC_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = ASCII_DNA_N_TRANSLATION_TABLE;
    table[b'R' as usize] = 6;
    table[b'r' as usize] = 6;

    table[b'Y' as usize] = 7;
    table[b'y' as usize] = 7;

    table[b'K' as usize] = 8;
    table[b'k' as usize] = 8;

    table[b'M' as usize] = 9;
    table[b'm' as usize] = 9;

    table[b'S' as usize] = 10;
    table[b's' as usize] = 10;

    table[b'W' as usize] = 11;
    table[b'w' as usize] = 11;

    table[b'B' as usize] = 12;
    table[b'b' as usize] = 12;

    table[b'D' as usize] = 13;
    table[b'd' as usize] = 13;

    table[b'H' as usize] = 14;
    table[b'h' as usize] = 14;

    table[b'V' as usize] = 15;
    table[b'v' as usize] = 15;

    table
};

const ASCII_DNA_IUPAC_AS_DNA_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = ASCII_DNA_TRANSLATION_TABLE;
    table[b'R' as usize] = 1;
    table[b'r' as usize] = 1;

    table[b'Y' as usize] = 2;
    table[b'y' as usize] = 2;

    table[b'K' as usize] = 3;
    table[b'k' as usize] = 3;

    table[b'M' as usize] = 1;
    table[b'm' as usize] = 1;

    table[b'S' as usize] = 2;
    table[b's' as usize] = 2;

    table[b'W' as usize] = 1;
    table[b'w' as usize] = 1;

    table[b'B' as usize] = 2;
    table[b'b' as usize] = 2;

    table[b'D' as usize] = 1;
    table[b'd' as usize] = 1;

    table[b'H' as usize] = 1;
    table[b'h' as usize] = 1;

    table[b'V' as usize] = 1;
    table[b'v' as usize] = 1;

    table
};

const ASCII_DNA_IUPAC_AS_DNA_N_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = ASCII_DNA_N_TRANSLATION_TABLE;
    table[b'R' as usize] = 5;
    table[b'r' as usize] = 5;

    table[b'Y' as usize] = 5;
    table[b'y' as usize] = 5;

    table[b'K' as usize] = 5;
    table[b'k' as usize] = 5;

    table[b'M' as usize] = 5;
    table[b'm' as usize] = 5;

    table[b'S' as usize] = 5;
    table[b's' as usize] = 5;

    table[b'W' as usize] = 5;
    table[b'w' as usize] = 5;

    table[b'B' as usize] = 5;
    table[b'b' as usize] = 5;

    table[b'D' as usize] = 5;
    table[b'd' as usize] = 5;

    table[b'H' as usize] = 5;
    table[b'h' as usize] = 5;

    table[b'V' as usize] = 5;
    table[b'v' as usize] = 5;

    table
};

const ASCII_PROTEIN_TRANSLATION_TABLE: [u8; 256] = {
    let mut table = [255; 256];

    let aminos = *b"ACDEFGHIKLMNPQRSTVWY";
    let mut i = 0;
    while i < aminos.len() {
        let symbol = (i + 1) as u8;
        table[aminos[i] as usize] = symbol;
        table[aminos[i].to_ascii_lowercase() as usize] = symbol;
        i += 1;
    }

    table[b'X' as usize] = 21;
    table[b'x' as usize] = 21;

    table
};

/// The alphabet `{A, C, G, T}`, case-insensitive.
pub fn ascii_dna() -> Alphabet {
    Alphabet::from_translation_table(ASCII_DNA_TRANSLATION_TABLE, 5, 0)
}

/// The alphabet `{A, C, G, T, N}`, case-insensitive. `N` is excluded from lookup tables.
pub fn ascii_dna_with_n() -> Alphabet {
    Alphabet::from_translation_table(ASCII_DNA_N_TRANSLATION_TABLE, 6, 1)
}

/// The full IUPAC nucleotide ambiguity code alphabet, case-insensitive.
pub fn ascii_dna_iupac() -> Alphabet {
    Alphabet::from_translation_table(ASCII_DNA_IUPAC_TRANSLATION_TABLE, 16, 0)
}

/// The IUPAC alphabet, but ambiguity codes are mapped onto one of their represented DNA bases.
///
/// This keeps the alphabet size at 4 searchable symbols (no growth from ambiguity codes), at
/// the cost of losing the ability to distinguish an ambiguity code from one concrete base it
/// stands for.
pub fn ascii_dna_iupac_as_dna() -> Alphabet {
    Alphabet::from_translation_table(ASCII_DNA_IUPAC_AS_DNA_TRANSLATION_TABLE, 5, 0)
}

/// Like [`ascii_dna_iupac_as_dna`], but ambiguity codes collapse onto a shared `N` symbol
/// instead of an arbitrary represented base.
pub fn ascii_dna_iupac_as_dna_with_n() -> Alphabet {
    Alphabet::from_translation_table(ASCII_DNA_IUPAC_AS_DNA_N_TRANSLATION_TABLE, 6, 1)
}

/// The alphabet of the 20 standard amino acids plus `X` for any/unknown, case-insensitive.
pub fn ascii_protein() -> Alphabet {
    Alphabet::from_translation_table(ASCII_PROTEIN_TRANSLATION_TABLE, 22, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_translation() {
        let alphabet = ascii_dna();
        assert_eq!(alphabet.io_to_dense_representation(b'A'), 1);
        assert_eq!(alphabet.io_to_dense_representation(b'c'), 2);
        assert_eq!(alphabet.io_to_dense_representation(b'G'), 3);
        assert_eq!(alphabet.io_to_dense_representation(b't'), 4);
        assert_eq!(alphabet.num_dense_symbols(), 5);
        assert_eq!(alphabet.num_searchable_dense_symbols(), 4);
    }

    #[test]
    fn dna_with_n_excludes_n_from_search() {
        let alphabet = ascii_dna_with_n();
        assert_eq!(alphabet.num_dense_symbols(), 6);
        assert_eq!(alphabet.num_searchable_dense_symbols(), 4);
        assert_eq!(alphabet.io_to_dense_representation(b'n'), 5);
    }

    #[test]
    fn iupac_as_dna_collapses_ambiguity_codes() {
        let alphabet = ascii_dna_iupac_as_dna();
        assert_eq!(alphabet.num_dense_symbols(), 5);
        assert_eq!(
            alphabet.io_to_dense_representation(b'R'),
            alphabet.io_to_dense_representation(b'A')
        );
    }

    #[test]
    fn custom_alphabet() {
        let mut table = [255u8; 256];
        table[b'0' as usize] = 1;
        table[b'1' as usize] = 1;
        table[b'2' as usize] = 2;
        table[b'3' as usize] = 2;

        let alphabet = Alphabet::from_translation_table(table, 3, 0);
        assert_eq!(alphabet.num_dense_symbols(), 3);
        assert_eq!(alphabet.io_to_dense_representation(b'0'), 1);
        assert_eq!(alphabet.io_to_dense_representation(b'3'), 2);
    }
}
