//! Wavelet tree strategy: a balanced binary tree of bitvectors over the bit decomposition of
//! each symbol. Grounded on `fmc::string::Wavelet`'s heap-indexed node array and descent
//! arithmetic, adapted to this crate's own [`Bitvector`] family instead of an external
//! bitvector type, and cross-checked against the bit-plane decomposition in
//! `ajalab-fm-index`'s `wavelet_matrix.rs`.

use crate::bitvector::{Bitvector, TwoLevelBitvector};

use super::RankString;

/// A complete binary tree of bitvectors, one per internal node, indexed in heap order
/// (`id = (1 << depth) - 1 + prefix`, where `prefix` is the symbol's `depth`-bit prefix already
/// decoded).
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct WaveletTreeString {
    nodes: Vec<TwoLevelBitvector>,
    bits: u32,
    alphabet_size: usize,
    len: usize,
}

impl WaveletTreeString {
    /// Builds the tree from a dense-encoded string over `0..alphabet_size`.
    pub fn construct(text: &[u8], alphabet_size: usize) -> Self {
        assert!(alphabet_size >= 2);

        let bits = bits_for(alphabet_size);
        let num_nodes = (1usize << bits) - 1;
        let mut node_bits: Vec<Vec<bool>> = vec![Vec::new(); num_nodes];

        for &symbol in text {
            for (bit, id) in path(symbol, bits) {
                node_bits[id].push(bit);
            }
        }

        let nodes = node_bits
            .into_iter()
            .map(TwoLevelBitvector::construct)
            .collect();

        Self {
            nodes,
            bits,
            alphabet_size,
            len: text.len(),
        }
    }

    fn collect_all_ranks(&self, depth: u32, prefix: usize, idx: usize, out: &mut [usize]) {
        if prefix >= self.alphabet_size {
            return;
        }

        if depth == self.bits {
            out[prefix] = idx;
            return;
        }

        let id = (1usize << depth) - 1 + prefix;
        let ones_idx = self.nodes[id].rank(idx);

        self.collect_all_ranks(depth + 1, prefix << 1, idx - ones_idx, out);
        self.collect_all_ranks(depth + 1, (prefix << 1) | 1, ones_idx, out);
    }
}

/// `(bit, node_id)` for every level of `symbol`'s root-to-leaf path, most significant bit first.
fn path(symbol: u8, bits: u32) -> Vec<(bool, usize)> {
    (0..bits)
        .map(|depth| {
            let bit_pos = bits - depth - 1;
            let bit = (symbol >> bit_pos) & 1 != 0;
            let prefix = (symbol >> (bit_pos + 1)) as usize;
            let id = (1usize << depth) - 1 + prefix;
            (bit, id)
        })
        .collect()
}

fn bits_for(alphabet_size: usize) -> u32 {
    usize::BITS - (alphabet_size - 1).leading_zeros()
}

impl RankString for WaveletTreeString {
    fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    fn size(&self) -> usize {
        self.len
    }

    fn symbol(&self, idx: usize) -> u8 {
        let mut idx = idx;
        let mut symbol: u8 = 0;

        for depth in 0..self.bits {
            let id = (1usize << depth) - 1 + symbol as usize;

            let (bit, new_idx) = if id < self.nodes.len() {
                (self.nodes[id].symbol(idx), self.nodes[id].rank(idx))
            } else {
                (false, 0)
            };

            symbol = (symbol << 1) | bit as u8;
            idx = if bit { new_idx } else { idx - new_idx };
        }

        symbol
    }

    fn rank(&self, idx: usize, c: u8) -> usize {
        let mut idx = idx;

        for (bit, id) in path(c, self.bits) {
            let new_idx = self.nodes[id].rank(idx);
            idx = if bit { new_idx } else { idx - new_idx };
        }

        idx
    }

    fn prefix_rank(&self, idx: usize, c: u8) -> usize {
        if c == 0 {
            return 0;
        }

        let mut idx = idx;
        let mut accumulated = 0;

        for (bit, id) in path(c - 1, self.bits) {
            let new_idx = self.nodes[id].rank(idx);
            if bit {
                accumulated += idx - new_idx;
                idx = new_idx;
            } else {
                idx -= new_idx;
            }
        }

        accumulated + idx
    }

    fn all_ranks(&self, idx: usize) -> Vec<usize> {
        let mut out = vec![0; self.alphabet_size];
        self.collect_all_ranks(0, 0, idx, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank_string::test_util::check_against_reference;

    #[test]
    fn matches_naive_reference_power_of_two_alphabet() {
        let text = [0u8, 1, 2, 1, 0, 3, 2, 2, 1, 0, 3, 3, 3, 0, 1, 2];
        let rs = WaveletTreeString::construct(&text, 4);
        check_against_reference(&rs, &text);
    }

    #[test]
    fn matches_naive_reference_non_power_of_two_alphabet() {
        let text = [0u8, 1, 2, 3, 4, 2, 1, 0, 4, 3, 2, 1, 0, 4, 4, 2, 1, 3, 0];
        let rs = WaveletTreeString::construct(&text, 5);
        check_against_reference(&rs, &text);
    }
}
