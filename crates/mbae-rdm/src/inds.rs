//! Packed operator-index keys of accumulated rows.
//!
//! A density-matrix row is addressed by the full target-rank operator index
//! tuple. The reusable [`RdmIndsBuf`] scratch is filled channel by channel
//! (fermion creation, fermion annihilation, boson creation, boson
//! annihilation) and packed into an immutable [`RdmKey`] at contribution
//! time.

use mbae_basis::BosConn;
use mbae_core::OpSig;
use serde::{Deserialize, Serialize};

/// Immutable packed key of one accumulated row: the four index channels
/// concatenated in frm_cre | frm_ann | bos_cre | bos_ann order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RdmKey {
    inds: Box<[u32]>,
}

impl RdmKey {
    /// The packed index slice.
    pub fn as_slice(&self) -> &[u32] {
        &self.inds
    }
}

/// Reusable scratch for assembling the operator indices of one contribution.
#[derive(Debug, Clone)]
pub struct RdmIndsBuf {
    sig: OpSig,
    frm_cre: Vec<u32>,
    frm_ann: Vec<u32>,
    bos_cre: Vec<u32>,
    bos_ann: Vec<u32>,
}

impl RdmIndsBuf {
    /// Creates an empty buffer sized for the channel counts of `sig`.
    pub fn new(sig: OpSig) -> Self {
        Self {
            sig,
            frm_cre: Vec::with_capacity(sig.nfrm_cre()),
            frm_ann: Vec::with_capacity(sig.nfrm_ann()),
            bos_cre: Vec::with_capacity(sig.nbos_cre()),
            bos_ann: Vec::with_capacity(sig.nbos_ann()),
        }
    }

    /// Target signature the packed key must satisfy.
    pub fn sig(&self) -> OpSig {
        self.sig
    }

    /// Clears all four channels.
    pub fn clear(&mut self) {
        self.clear_frm();
        self.clear_bos();
    }

    /// Clears the fermionic channels only.
    pub fn clear_frm(&mut self) {
        self.frm_cre.clear();
        self.frm_ann.clear();
    }

    /// Clears the bosonic channels only.
    pub fn clear_bos(&mut self) {
        self.bos_cre.clear();
        self.bos_ann.clear();
    }

    /// Fermion creation indices assembled so far.
    pub fn frm_cre(&self) -> &[u32] {
        &self.frm_cre
    }

    /// Fermion annihilation indices assembled so far.
    pub fn frm_ann(&self) -> &[u32] {
        &self.frm_ann
    }

    /// Boson creation modes assembled so far.
    pub fn bos_cre(&self) -> &[u32] {
        &self.bos_cre
    }

    /// Boson annihilation modes assembled so far.
    pub fn bos_ann(&self) -> &[u32] {
        &self.bos_ann
    }

    pub(crate) fn frm_channels_mut(&mut self) -> (&mut Vec<u32>, &mut Vec<u32>) {
        (&mut self.frm_cre, &mut self.frm_ann)
    }

    /// Stamps the fermionic channels from ascending index slices.
    pub fn set_frm(&mut self, cre: &[u32], ann: &[u32]) {
        self.frm_cre.clear();
        self.frm_cre.extend_from_slice(cre);
        self.frm_ann.clear();
        self.frm_ann.extend_from_slice(ann);
    }

    /// Stamps the bosonic channels with a number-conserving diagonal pair on
    /// a single mode.
    pub fn set_bos_diagonal(&mut self, imode: usize) {
        self.clear_bos();
        self.bos_cre.push(narrow(imode));
        self.bos_ann.push(narrow(imode));
    }

    /// Stamps the bosonic channels from a bosonic connection, one entry per
    /// operator of the expanded product.
    pub fn set_bos_from_conn(&mut self, conn: &BosConn) {
        self.clear_bos();
        for pair in conn.cre().pairs() {
            for _ in 0..pair.nop {
                self.bos_cre.push(narrow(pair.imode));
            }
        }
        for pair in conn.ann().pairs() {
            for _ in 0..pair.nop {
                self.bos_ann.push(narrow(pair.imode));
            }
        }
    }

    /// True when every channel is ascending; the fermionic channels must
    /// additionally be strictly ascending.
    pub fn is_ordered(&self) -> bool {
        self.frm_cre.windows(2).all(|w| w[0] < w[1])
            && self.frm_ann.windows(2).all(|w| w[0] < w[1])
            && self.bos_cre.windows(2).all(|w| w[0] <= w[1])
            && self.bos_ann.windows(2).all(|w| w[0] <= w[1])
    }

    /// Packs the four channels into an owned key.
    pub fn key(&self) -> RdmKey {
        debug_assert_eq!(self.frm_cre.len(), self.sig.nfrm_cre(), "frm cre channel incomplete");
        debug_assert_eq!(self.frm_ann.len(), self.sig.nfrm_ann(), "frm ann channel incomplete");
        debug_assert_eq!(self.bos_cre.len(), self.sig.nbos_cre(), "bos cre channel incomplete");
        debug_assert_eq!(self.bos_ann.len(), self.sig.nbos_ann(), "bos ann channel incomplete");
        debug_assert!(self.is_ordered(), "operator indices must be stored in ascending order");
        let mut inds = Vec::with_capacity(self.sig.nop());
        inds.extend_from_slice(&self.frm_cre);
        inds.extend_from_slice(&self.frm_ann);
        inds.extend_from_slice(&self.bos_cre);
        inds.extend_from_slice(&self.bos_ann);
        RdmKey {
            inds: inds.into_boxed_slice(),
        }
    }
}

pub(crate) fn narrow(i: usize) -> u32 {
    debug_assert!(u32::try_from(i).is_ok(), "operator index exceeds u32 range");
    i as u32
}
