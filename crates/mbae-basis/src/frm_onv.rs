//! Fermionic occupation-number vectors.
//!
//! A [`FrmOnv`] is a fixed-capacity bitset with one bit per spin-orbital
//! (capacity 2 x nsite). Word-level access is exposed so that connections can
//! be extracted and phases computed without per-bit loops.

use std::fmt;

use mbae_core::{ErrorInfo, MbaeError};
use serde::{Deserialize, Serialize};

use crate::bit::{nword_for, SetBits, WORD_BITS};

/// Extent descriptor for a fermionic basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrmBasis {
    /// Number of spatial sites (orbitals); each carries two spin-orbitals.
    pub nsite: usize,
}

impl FrmBasis {
    /// Creates a basis descriptor over `nsite` spatial sites.
    pub fn new(nsite: usize) -> Self {
        Self { nsite }
    }

    /// Total number of spin-orbitals (bitset capacity).
    pub fn nspinorb(&self) -> usize {
        2 * self.nsite
    }
}

/// Bitset occupation-number vector over a fermionic basis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrmOnv {
    basis: FrmBasis,
    words: Box<[u64]>,
}

impl FrmOnv {
    /// Creates the zero (vacuum) vector for a basis.
    pub fn zero(basis: FrmBasis) -> Self {
        Self {
            basis,
            words: vec![0u64; nword_for(basis.nspinorb())].into_boxed_slice(),
        }
    }

    /// Creates a vector with exactly the listed spin-orbitals occupied.
    ///
    /// Indices must be in range and pairwise distinct, but may be supplied in
    /// any order.
    pub fn from_occ(basis: FrmBasis, occ: &[usize]) -> Result<Self, MbaeError> {
        let mut onv = Self::zero(basis);
        for &ispinorb in occ {
            if ispinorb >= basis.nspinorb() {
                let info = ErrorInfo::new("spinorb-out-of-range", "occupied index exceeds basis")
                    .with_context("index", ispinorb.to_string())
                    .with_context("nspinorb", basis.nspinorb().to_string());
                return Err(MbaeError::Basis(info));
            }
            if onv.get(ispinorb) {
                let info = ErrorInfo::new("spinorb-duplicate", "occupied index listed twice")
                    .with_context("index", ispinorb.to_string());
                return Err(MbaeError::Basis(info));
            }
            onv.set(ispinorb);
        }
        Ok(onv)
    }

    /// Returns the basis descriptor.
    pub fn basis(&self) -> FrmBasis {
        self.basis
    }

    /// Number of storage words.
    pub fn nword(&self) -> usize {
        self.words.len()
    }

    /// Returns the `iword`-th storage word.
    pub fn word(&self, iword: usize) -> u64 {
        self.words[iword]
    }

    /// True if the given spin-orbital is occupied.
    pub fn get(&self, ispinorb: usize) -> bool {
        debug_assert!(ispinorb < self.basis.nspinorb(), "spin-orbital index OOB");
        self.words[ispinorb / WORD_BITS] >> (ispinorb % WORD_BITS) & 1 == 1
    }

    /// Marks the given spin-orbital occupied.
    pub fn set(&mut self, ispinorb: usize) {
        debug_assert!(ispinorb < self.basis.nspinorb(), "spin-orbital index OOB");
        self.words[ispinorb / WORD_BITS] |= 1u64 << (ispinorb % WORD_BITS);
    }

    /// Marks the given spin-orbital vacant.
    pub fn clr(&mut self, ispinorb: usize) {
        debug_assert!(ispinorb < self.basis.nspinorb(), "spin-orbital index OOB");
        self.words[ispinorb / WORD_BITS] &= !(1u64 << (ispinorb % WORD_BITS));
    }

    /// Total number of occupied spin-orbitals.
    pub fn nsetbit(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True for the vacuum (all-vacant) vector.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Overwrites this vector with the contents of another of the same
    /// basis.
    pub fn copy_from(&mut self, src: &FrmOnv) {
        debug_assert!(self.basis == src.basis, "src and dst bases are incompatible");
        self.words.copy_from_slice(&src.words);
    }

    /// Iterates the occupied spin-orbital indices in ascending order.
    pub fn occ_iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(iword, &word)| {
            SetBits(word).map(move |ibit| iword * WORD_BITS + ibit)
        })
    }
}

impl fmt::Display for FrmOnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ispinorb in 0..self.basis.nspinorb() {
            write!(f, "{}", u8::from(self.get(ispinorb)))?;
        }
        Ok(())
    }
}
