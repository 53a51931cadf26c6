//! Excitation signatures of second-quantized operator products.
//!
//! An [`OpSig`] packs the four operator counts of a connection or estimator
//! rank (fermion creation, fermion annihilation, boson creation, boson
//! annihilation) into a single integer, giving constant-time dispatch from a
//! sampled connection to the estimators it feeds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of bits encoding each fermion operator count.
const NBIT_FRM: u32 = 3;
/// Number of bits encoding each boson operator count.
const NBIT_BOS: u32 = 2;
/// Mask and maximum value for a fermion operator count.
const MASK_FRM: u32 = (1 << NBIT_FRM) - 1;
/// Mask and maximum value for a boson operator count.
const MASK_BOS: u32 = (1 << NBIT_BOS) - 1;

/// Compact signature of a second-quantized operator product.
///
/// The encoding is exact for up to 7 fermion operators of each kind and 3
/// boson operators of each kind; the all-zero signature denotes a diagonal
/// (no-change) contribution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct OpSig(u32);

impl OpSig {
    /// Total number of distinct encodable signatures.
    pub const NDISTINCT: usize = 1 << (2 * NBIT_FRM + 2 * NBIT_BOS);

    /// Maximum number of fermion operators per channel.
    pub const MAX_NFRM: usize = MASK_FRM as usize;

    /// Maximum number of boson operators per channel.
    pub const MAX_NBOS: usize = MASK_BOS as usize;

    /// The diagonal (null) signature.
    pub const DIAGONAL: OpSig = OpSig(0);

    /// Encodes the four operator counts, or `None` when a channel overflows
    /// its bit width.
    pub fn encode(
        nfrm_cre: usize,
        nfrm_ann: usize,
        nbos_cre: usize,
        nbos_ann: usize,
    ) -> Option<Self> {
        if nfrm_cre > Self::MAX_NFRM
            || nfrm_ann > Self::MAX_NFRM
            || nbos_cre > Self::MAX_NBOS
            || nbos_ann > Self::MAX_NBOS
        {
            return None;
        }
        let raw = nfrm_cre as u32
            | ((nfrm_ann as u32) << NBIT_FRM)
            | ((nbos_cre as u32) << (2 * NBIT_FRM))
            | ((nbos_ann as u32) << (2 * NBIT_FRM + NBIT_BOS));
        Some(Self(raw))
    }

    /// Encodes a number-conserving, purely fermionic signature of the given
    /// excitation level.
    pub fn frm(nexcit: usize) -> Option<Self> {
        Self::encode(nexcit, nexcit, 0, 0)
    }

    /// Reconstructs a signature from its raw integer representation.
    pub fn from_raw(raw: u32) -> Option<Self> {
        if (raw as usize) < Self::NDISTINCT {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Returns the raw integer representation, suitable for array indexing.
    pub fn as_raw(self) -> usize {
        self.0 as usize
    }

    /// Number of fermion creation operators.
    pub fn nfrm_cre(self) -> usize {
        (self.0 & MASK_FRM) as usize
    }

    /// Number of fermion annihilation operators.
    pub fn nfrm_ann(self) -> usize {
        ((self.0 >> NBIT_FRM) & MASK_FRM) as usize
    }

    /// Number of boson creation operators.
    pub fn nbos_cre(self) -> usize {
        ((self.0 >> (2 * NBIT_FRM)) & MASK_BOS) as usize
    }

    /// Number of boson annihilation operators.
    pub fn nbos_ann(self) -> usize {
        ((self.0 >> (2 * NBIT_FRM + NBIT_BOS)) & MASK_BOS) as usize
    }

    /// Total number of fermion operators.
    pub fn nfrm(self) -> usize {
        self.nfrm_cre() + self.nfrm_ann()
    }

    /// Total number of boson operators.
    pub fn nbos(self) -> usize {
        self.nbos_cre() + self.nbos_ann()
    }

    /// Total number of operators of any particle type.
    pub fn nop(self) -> usize {
        self.nfrm() + self.nbos()
    }

    /// True for the diagonal (no-change) signature.
    pub fn is_diagonal(self) -> bool {
        self.0 == 0
    }

    /// True when the signature has no boson operators.
    pub fn is_pure_frm(self) -> bool {
        self.nbos() == 0
    }

    /// True when the signature has no fermion operators.
    pub fn is_pure_bos(self) -> bool {
        self.nfrm() == 0
    }

    /// True when fermion creation and annihilation counts are equal.
    pub fn conserves_nfrm(self) -> bool {
        self.nfrm_cre() == self.nfrm_ann()
    }

    /// True for signatures carrying exactly one boson operator ("ladder"
    /// contributions).
    pub fn takes_bos_ladder(self) -> bool {
        self.nbos() == 1
    }

    /// Signature with `nop_insert` fermion creation-annihilation pairs
    /// inserted, or `None` on channel overflow.
    pub fn promoted(self, nop_insert: usize) -> Option<Self> {
        Self::encode(
            self.nfrm_cre() + nop_insert,
            self.nfrm_ann() + nop_insert,
            self.nbos_cre(),
            self.nbos_ann(),
        )
    }

    /// Parses a four-digit signature string such as `"2200"`.
    pub fn parse(text: &str) -> Option<Self> {
        let digits: Vec<usize> = text
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as usize))
            .collect::<Option<_>>()?;
        if digits.len() != 4 {
            return None;
        }
        Self::encode(digits[0], digits[1], digits[2], digits[3])
    }
}

impl fmt::Display for OpSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.nfrm_cre(),
            self.nfrm_ann(),
            self.nbos_cre(),
            self.nbos_ann()
        )
    }
}
