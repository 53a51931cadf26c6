//! Word-level bit utilities for fermionic occupation vectors.

/// Number of bits per storage word.
pub const WORD_BITS: usize = 64;

/// Number of words needed to store `nbit` bits.
pub fn nword_for(nbit: usize) -> usize {
    (nbit + WORD_BITS - 1) / WORD_BITS
}

/// Parity (as a bool) of the number of set bits in `word` strictly below
/// position `ibit`.
pub fn parity_below(word: u64, ibit: usize) -> bool {
    debug_assert!(ibit < WORD_BITS, "bit position out of word bounds");
    let mask = (1u64 << ibit) - 1;
    (word & mask).count_ones() & 1 == 1
}

/// Iterator over the set-bit positions of a single word, ascending.
#[derive(Debug, Clone, Copy)]
pub struct SetBits(pub u64);

impl Iterator for SetBits {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let ibit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(ibit)
    }
}
