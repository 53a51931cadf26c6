//! Bosonic connections between pairs of occupation-number vectors.

use mbae_core::{ErrorInfo, MbaeError, OpSig};
use serde::{Deserialize, Serialize};

use crate::bos_onv::BosOnv;
use crate::ops::BosOps;

/// Creation and annihilation operator products connecting two bosonic ONVs.
///
/// Per mode, the signed occupation difference determines whether the mode
/// contributes annihilations (source higher), creations (destination
/// higher), or is common to both endpoints (equal and nonzero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BosConn {
    cre: BosOps,
    ann: BosOps,
}

impl BosConn {
    /// Creates an empty connection over a basis of `nmode` modes.
    pub fn new(nmode: usize) -> Self {
        Self {
            cre: BosOps::new(nmode),
            ann: BosOps::new(nmode),
        }
    }

    /// The creation operator product.
    pub fn cre(&self) -> &BosOps {
        &self.cre
    }

    /// The annihilation operator product.
    pub fn ann(&self) -> &BosOps {
        &self.ann
    }

    /// Resets the connection to the null excitation.
    pub fn clear(&mut self) {
        self.cre.clear();
        self.ann.clear();
    }

    /// Total number of operators in the connection product.
    pub fn size(&self) -> u32 {
        self.cre.nop() + self.ann.nop()
    }

    /// Excitation signature, `None` if a channel overflows the encoding.
    pub fn exsig(&self) -> Option<OpSig> {
        OpSig::encode(0, 0, self.cre.nop() as usize, self.ann.nop() as usize)
    }

    fn check_compatible(src: &BosOnv, dst: &BosOnv) -> Result<(), MbaeError> {
        if src.basis() != dst.basis() {
            let info = ErrorInfo::new("bos-extent-mismatch", "src and dst ONVs are incompatible")
                .with_context("src_nmode", src.nmode().to_string())
                .with_context("dst_nmode", dst.nmode().to_string())
                .with_context("src_cutoff", src.basis().occ_cutoff.to_string())
                .with_context("dst_cutoff", dst.basis().occ_cutoff.to_string());
            return Err(MbaeError::Connection(info));
        }
        Ok(())
    }

    /// Updates the internal state with the difference in occupation between
    /// the two given vectors.
    pub fn connect(&mut self, src: &BosOnv, dst: &BosOnv) -> Result<(), MbaeError> {
        Self::check_compatible(src, dst)?;
        self.clear();
        for imode in 0..src.nmode() {
            let (s, d) = (src.occ(imode), dst.occ(imode));
            if s > d {
                self.ann.add(imode, s - d);
            } else if s < d {
                self.cre.add(imode, d - s);
            }
        }
        Ok(())
    }

    /// Updates the internal state as [`BosConn::connect`], additionally
    /// filling `com` with the modes of equal nonzero occupation in both
    /// endpoints, carrying their occupations as multiplicities.
    pub fn connect_with_com(
        &mut self,
        src: &BosOnv,
        dst: &BosOnv,
        com: &mut BosOps,
    ) -> Result<(), MbaeError> {
        Self::check_compatible(src, dst)?;
        self.clear();
        com.clear();
        for imode in 0..src.nmode() {
            let (s, d) = (src.occ(imode), dst.occ(imode));
            if s > d {
                self.ann.add(imode, s - d);
            } else if s < d {
                self.cre.add(imode, d - s);
            } else if s > 0 {
                com.add(imode, s);
            }
        }
        Ok(())
    }

    /// Writes `dst = connection applied to src`.
    pub fn apply(&self, src: &BosOnv, dst: &mut BosOnv) {
        dst.copy_from(src);
        for pair in self.ann.pairs() {
            dst.occ_mut()[pair.imode] -= pair.nop;
        }
        for pair in self.cre.pairs() {
            dst.occ_mut()[pair.imode] += pair.nop;
        }
    }

    /// Fills `com` with the per-mode occupations of `src` after the
    /// annihilation part of the connection has been discounted.
    pub fn apply_com(&self, src: &BosOnv, com: &mut BosOps) {
        com.clear();
        let ann = self.ann.pairs();
        let mut iann = 0usize;
        for imode in 0..src.nmode() {
            let mut occ = src.occ(imode);
            if iann < ann.len() && ann[iann].imode == imode {
                occ -= ann[iann].nop;
                iann += 1;
            }
            if occ > 0 {
                com.add(imode, occ);
            }
        }
    }

    /// True when applying the connection to `src` keeps every mode
    /// occupation within `[0, cutoff]`. This is a checkable value, never a
    /// fault.
    pub fn respects_occ_range(&self, src: &BosOnv) -> bool {
        let cutoff = src.basis().occ_cutoff;
        for pair in self.cre.pairs() {
            if src.occ(pair.imode) + pair.nop > cutoff {
                return false;
            }
        }
        for pair in self.ann.pairs() {
            if src.occ(pair.imode) < pair.nop {
                return false;
            }
        }
        true
    }
}
