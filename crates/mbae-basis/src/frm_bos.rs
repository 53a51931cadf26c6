//! Combined fermion-boson sectors, basis functions and connections.
//!
//! A purely fermionic system is expressed as a combined sector with zero
//! boson modes; the bosonic halves then degenerate to no-ops, so the
//! estimator layer needs a single code path.

use mbae_core::{ErrorInfo, MbaeError, OpSig};
use serde::{Deserialize, Serialize};

use crate::bos_conn::BosConn;
use crate::bos_onv::{BosBasis, BosOnv};
use crate::frm_conn::FrmConn;
use crate::frm_onv::{FrmBasis, FrmOnv};
use crate::ops::{BosOps, FrmOps};

/// Basis extents plus the conserved electron count of a simulation sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    /// Fermionic basis extents.
    pub frm: FrmBasis,
    /// Bosonic basis extents.
    pub bos: BosBasis,
    /// Number of electrons; every physical ONV has this popcount.
    pub nelec: usize,
}

impl Sector {
    /// Creates a combined sector descriptor.
    pub fn new(frm: FrmBasis, bos: BosBasis, nelec: usize) -> Result<Self, MbaeError> {
        if nelec > frm.nspinorb() {
            let info = ErrorInfo::new("nelec-exceeds-basis", "more electrons than spin-orbitals")
                .with_context("nelec", nelec.to_string())
                .with_context("nspinorb", frm.nspinorb().to_string());
            return Err(MbaeError::Basis(info));
        }
        Ok(Self { frm, bos, nelec })
    }

    /// Creates a purely fermionic sector.
    pub fn pure_frm(nsite: usize, nelec: usize) -> Result<Self, MbaeError> {
        Self::new(FrmBasis::new(nsite), BosBasis::empty(), nelec)
    }
}

/// A combined basis function: one fermionic bitset and one bosonic
/// occupation vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrmBosOnv {
    /// Fermionic half.
    pub frm: FrmOnv,
    /// Bosonic half.
    pub bos: BosOnv,
}

impl FrmBosOnv {
    /// Creates the vacuum basis function of a sector.
    pub fn zero(sector: &Sector) -> Self {
        Self {
            frm: FrmOnv::zero(sector.frm),
            bos: BosOnv::zero(sector.bos),
        }
    }

    /// Creates a basis function from occupied spin-orbitals and per-mode
    /// boson occupations.
    pub fn from_occ(sector: &Sector, frm_occ: &[usize], bos_occ: &[u32]) -> Result<Self, MbaeError> {
        Ok(Self {
            frm: FrmOnv::from_occ(sector.frm, frm_occ)?,
            bos: BosOnv::from_occ(sector.bos, bos_occ)?,
        })
    }
}

/// Reusable scratch pair of common-operator strings.
#[derive(Debug, Clone)]
pub struct ComOps {
    /// Common fermionic spin-orbital indices.
    pub frm: FrmOps,
    /// Common bosonic modes with their occupations.
    pub bos: BosOps,
}

impl ComOps {
    /// Creates empty scratch sized for a sector.
    pub fn new(sector: &Sector) -> Self {
        Self {
            frm: FrmOps::new(sector.frm.nspinorb()),
            bos: BosOps::new(sector.bos.nmode),
        }
    }

    /// Clears both halves.
    pub fn clear(&mut self) {
        self.frm.clear();
        self.bos.clear();
    }
}

/// A combined fermion-boson connection.
#[derive(Debug, Clone)]
pub struct FrmBosConn {
    /// Fermionic half.
    pub frm: FrmConn,
    /// Bosonic half.
    pub bos: BosConn,
}

impl FrmBosConn {
    /// Creates an empty connection with scratch capacity for a sector.
    pub fn new(sector: &Sector) -> Self {
        Self {
            frm: FrmConn::new(sector.frm),
            bos: BosConn::new(sector.bos.nmode),
        }
    }

    /// Resets both halves to the null excitation.
    pub fn clear(&mut self) {
        self.frm.clear();
        self.bos.clear();
    }

    /// Updates both halves with the differences between the two given basis
    /// functions.
    pub fn connect(&mut self, src: &FrmBosOnv, dst: &FrmBosOnv) -> Result<(), MbaeError> {
        self.frm.connect(&src.frm, &dst.frm)?;
        self.bos.connect(&src.bos, &dst.bos)
    }

    /// Updates both halves as [`FrmBosConn::connect`], additionally filling
    /// the common-operator strings, and returns the fermionic phase.
    pub fn connect_with_com(
        &mut self,
        src: &FrmBosOnv,
        dst: &FrmBosOnv,
        com: &mut ComOps,
    ) -> Result<bool, MbaeError> {
        let phase = self.frm.connect_with_com(&src.frm, &dst.frm, &mut com.frm)?;
        self.bos.connect_with_com(&src.bos, &dst.bos, &mut com.bos)?;
        Ok(phase)
    }

    /// Excitation signature across both particle species, `None` if any
    /// channel overflows the encoding.
    pub fn exsig(&self) -> Option<OpSig> {
        OpSig::encode(
            self.frm.cre().len(),
            self.frm.ann().len(),
            self.bos.cre().nop() as usize,
            self.bos.ann().nop() as usize,
        )
    }
}
