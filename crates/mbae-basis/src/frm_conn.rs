//! Fermionic connections between pairs of occupation-number vectors.
//!
//! A [`FrmConn`] stores the creation and annihilation strings describing the
//! difference in occupation between a source and destination [`FrmOnv`],
//! and computes the antisymmetric phase of the normal-ordered operator
//! product in O(excitation rank + common size) time via word prefix
//! parities.

use mbae_core::{ErrorInfo, MbaeError, OpSig};
use serde::{Deserialize, Serialize};

use crate::bit::{parity_below, SetBits, WORD_BITS};
use crate::frm_onv::{FrmBasis, FrmOnv};
use crate::ops::FrmOps;

/// Creation and annihilation strings connecting two fermionic ONVs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrmConn {
    cre: FrmOps,
    ann: FrmOps,
}

/// Folds word popcount parities forward so that ascending bit queries cost
/// O(1) amortized over a whole scan.
struct PrefixParity<'a> {
    onv: &'a FrmOnv,
    iword_done: usize,
    parity: bool,
}

impl<'a> PrefixParity<'a> {
    fn new(onv: &'a FrmOnv) -> Self {
        Self {
            onv,
            iword_done: 0,
            parity: false,
        }
    }

    /// Parity of the number of occupied spin-orbitals strictly below `ibit`.
    /// Queries must be made in ascending order of `ibit`.
    fn below(&mut self, ibit: usize) -> bool {
        let iword = ibit / WORD_BITS;
        while self.iword_done < iword {
            self.parity ^= self.onv.word(self.iword_done).count_ones() & 1 == 1;
            self.iword_done += 1;
        }
        self.parity ^ parity_below(self.onv.word(iword), ibit % WORD_BITS)
    }
}

impl FrmConn {
    /// Creates an empty connection with scratch capacity for a basis.
    pub fn new(basis: FrmBasis) -> Self {
        Self {
            cre: FrmOps::new(basis.nspinorb()),
            ann: FrmOps::new(basis.nspinorb()),
        }
    }

    /// The creation string (indices occupied in dst, vacant in src).
    pub fn cre(&self) -> &FrmOps {
        &self.cre
    }

    /// The annihilation string (indices occupied in src, vacant in dst).
    pub fn ann(&self) -> &FrmOps {
        &self.ann
    }

    /// Resets the connection to the null excitation.
    pub fn clear(&mut self) {
        self.cre.clear();
        self.ann.clear();
    }

    /// Total number of operators in the connection product.
    pub fn size(&self) -> usize {
        self.cre.len() + self.ann.len()
    }

    /// Excitation signature of the connection, `None` if the rank overflows
    /// the signature encoding.
    pub fn exsig(&self) -> Option<OpSig> {
        OpSig::encode(self.cre.len(), self.ann.len(), 0, 0)
    }

    /// Signature of the connection with `nop_insert` spectator pairs
    /// inserted, `None` on overflow of either channel.
    pub fn exsig_promoted(&self, nop_insert: usize) -> Option<OpSig> {
        self.exsig().and_then(|sig| sig.promoted(nop_insert))
    }

    fn check_compatible(src: &FrmOnv, dst: &FrmOnv) -> Result<(), MbaeError> {
        if src.basis() != dst.basis() {
            let info = ErrorInfo::new("frm-capacity-mismatch", "src and dst ONVs are incompatible")
                .with_context("src_nspinorb", src.basis().nspinorb().to_string())
                .with_context("dst_nspinorb", dst.basis().nspinorb().to_string());
            return Err(MbaeError::Connection(info));
        }
        Ok(())
    }

    /// Updates the internal state with the difference in occupation between
    /// the two given vectors.
    pub fn connect(&mut self, src: &FrmOnv, dst: &FrmOnv) -> Result<(), MbaeError> {
        Self::check_compatible(src, dst)?;
        debug_assert!(!src.is_zero(), "connection from the zero ONV");
        debug_assert!(!dst.is_zero(), "connection to the zero ONV");
        self.clear();
        for iword in 0..src.nword() {
            let bit_offset = iword * WORD_BITS;
            let src_work = src.word(iword);
            let dst_work = dst.word(iword);
            for ibit in SetBits(src_work & !dst_work) {
                self.ann.add(ibit + bit_offset);
            }
            for ibit in SetBits(dst_work & !src_work) {
                self.cre.add(ibit + bit_offset);
            }
        }
        debug_assert!(self.cre.is_valid() && self.ann.is_valid());
        Ok(())
    }

    /// Updates the internal state as [`FrmConn::connect`], additionally
    /// filling `com` with the indices occupied in both vectors and returning
    /// the antisymmetric phase of the connection.
    pub fn connect_with_com(
        &mut self,
        src: &FrmOnv,
        dst: &FrmOnv,
        com: &mut FrmOps,
    ) -> Result<bool, MbaeError> {
        self.connect(src, dst)?;
        com.clear();
        let mut nperm = 0usize;
        let mut iann = 0usize;
        let mut icre = 0usize;
        for iword in 0..src.nword() {
            let bit_offset = iword * WORD_BITS;
            for ibit in SetBits(src.word(iword) & dst.word(iword)) {
                let setbit = ibit + bit_offset;
                while iann < self.ann.len() && self.ann.get(iann) < setbit {
                    iann += 1;
                    nperm += com.len();
                }
                while icre < self.cre.len() && self.cre.get(icre) < setbit {
                    icre += 1;
                    nperm += com.len();
                }
                com.add(setbit);
            }
        }
        while iann < self.ann.len() {
            iann += 1;
            nperm += com.len();
        }
        while icre < self.cre.len() {
            icre += 1;
            nperm += com.len();
        }
        Ok(nperm & 1 == 1)
    }

    /// Writes `dst = connection applied to src`.
    pub fn apply(&self, src: &FrmOnv, dst: &mut FrmOnv) {
        debug_assert!(src.basis() == dst.basis(), "src and dst ONVs are incompatible");
        debug_assert!(self.ann.all_occ(src), "annihilation index vacant in src");
        debug_assert!(self.cre.all_vac(src), "creation index occupied in src");
        dst.copy_from(src);
        for &i in self.ann.as_slice() {
            dst.clr(i);
        }
        for &i in self.cre.as_slice() {
            dst.set(i);
        }
        debug_assert_eq!(src.nsetbit(), dst.nsetbit(), "excitation must conserve particle number");
    }

    /// Fills `com` with the common indices derivable from `src` alone,
    /// returning the merge permutation parity, equal to the phase returned
    /// by [`FrmConn::connect_with_com`].
    pub fn apply_com(&self, src: &FrmOnv, com: &mut FrmOps) -> bool {
        com.clear();
        let mut nperm = 0usize;
        let mut iann = 0usize;
        let mut icre = 0usize;
        for iword in 0..src.nword() {
            let bit_offset = iword * WORD_BITS;
            'bits: for ibit in SetBits(src.word(iword)) {
                let setbit = ibit + bit_offset;
                if iann < self.ann.len() && setbit == self.ann.get(iann) {
                    iann += 1;
                    nperm += com.len();
                    continue 'bits;
                }
                debug_assert!(
                    icre >= self.cre.len() || setbit != self.cre.get(icre),
                    "cannot create a fermion in an occupied orbital"
                );
                while icre < self.cre.len() && self.cre.get(icre) < setbit {
                    icre += 1;
                    nperm += com.len();
                }
                com.add(setbit);
            }
        }
        while icre < self.cre.len() {
            icre += 1;
            nperm += com.len();
        }
        nperm & 1 == 1
    }

    /// Antisymmetric phase of the normal-ordered operator product acting on
    /// `src`: true for a negative sign.
    ///
    /// Both strings are stored ascending, but the creation string is
    /// conjugated and so algebraically applies in descending order. The scan
    /// merges the two strings in ascending index order; each creation
    /// operator additionally picks up one exchange per annihilation operator
    /// not yet processed. The closing corrections account for the fixed
    /// number of transpositions needed to reverse the creation ordering:
    /// floor(n_ann/2) pair swaps plus the joint parity of n_ann * n_cre.
    pub fn phase(&self, src: &FrmOnv) -> bool {
        debug_assert!(self.ann.all_occ(src), "annihilation index vacant in src");
        debug_assert!(self.cre.all_vac(src), "creation index occupied in src");
        let ncre = self.cre.len();
        let nann = self.ann.len();
        let mut prefix = PrefixParity::new(src);
        let mut out = false;
        let mut icre = 0usize;
        let mut iann = 0usize;
        while iann < nann || icre < ncre {
            if icre < ncre && (iann == nann || self.cre.get(icre) < self.ann.get(iann)) {
                let ann_remain_odd = (nann - iann) & 1 == 1;
                out ^= prefix.below(self.cre.get(icre)) ^ ann_remain_odd;
                icre += 1;
            } else {
                out ^= prefix.below(self.ann.get(iann));
                iann += 1;
            }
        }
        out ^= (nann / 2) & 1 == 1;
        out ^= (nann & 1 == 1) && (ncre & 1 == 1);
        out
    }
}
