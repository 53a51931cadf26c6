//! Bosonic occupation-number vectors and occupation (normalization) factors.
//!
//! Boson creation and annihilation operators carry sqrt(n)-type factors; the
//! routines here compute their integer-exact squares so that products of many
//! operators accumulate without rounding, with `f64::sqrt` applied once at
//! the end.

use mbae_core::{ErrorInfo, MbaeError};
use serde::{Deserialize, Serialize};

use crate::bos_conn::BosConn;
use crate::ops::BosOps;

/// Extent descriptor for a bosonic basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BosBasis {
    /// Number of boson modes. Zero expresses a purely fermionic sector.
    pub nmode: usize,
    /// Maximum occupation of any single mode.
    pub occ_cutoff: u32,
}

impl BosBasis {
    /// Creates a basis descriptor over `nmode` modes with the given cutoff.
    pub fn new(nmode: usize, occ_cutoff: u32) -> Self {
        Self { nmode, occ_cutoff }
    }

    /// The empty bosonic basis of a purely fermionic sector.
    pub fn empty() -> Self {
        Self {
            nmode: 0,
            occ_cutoff: 0,
        }
    }
}

/// Occupation-number vector over a bosonic basis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BosOnv {
    basis: BosBasis,
    occ: Box<[u32]>,
}

impl BosOnv {
    /// Creates the zero-occupation vector for a basis.
    pub fn zero(basis: BosBasis) -> Self {
        Self {
            basis,
            occ: vec![0u32; basis.nmode].into_boxed_slice(),
        }
    }

    /// Creates a vector from per-mode occupations, checked against the
    /// basis extent and cutoff.
    pub fn from_occ(basis: BosBasis, occ: &[u32]) -> Result<Self, MbaeError> {
        if occ.len() != basis.nmode {
            let info = ErrorInfo::new("bos-extent-mismatch", "wrong number of mode occupations")
                .with_context("expected", basis.nmode.to_string())
                .with_context("actual", occ.len().to_string());
            return Err(MbaeError::Basis(info));
        }
        if let Some((imode, &n)) = occ.iter().enumerate().find(|(_, &n)| n > basis.occ_cutoff) {
            let info = ErrorInfo::new("bos-occ-cutoff", "mode occupation exceeds cutoff")
                .with_context("mode", imode.to_string())
                .with_context("occ", n.to_string())
                .with_context("cutoff", basis.occ_cutoff.to_string());
            return Err(MbaeError::Basis(info));
        }
        Ok(Self {
            basis,
            occ: occ.to_vec().into_boxed_slice(),
        })
    }

    /// Returns the basis descriptor.
    pub fn basis(&self) -> BosBasis {
        self.basis
    }

    /// Number of modes.
    pub fn nmode(&self) -> usize {
        self.occ.len()
    }

    /// Occupation of the given mode.
    pub fn occ(&self, imode: usize) -> u32 {
        self.occ[imode]
    }

    /// Overwrites the occupation of a single mode, checked against the
    /// cutoff.
    pub fn set_occ(&mut self, imode: usize, n: u32) -> Result<(), MbaeError> {
        if n > self.basis.occ_cutoff {
            let info = ErrorInfo::new("bos-occ-cutoff", "mode occupation exceeds cutoff")
                .with_context("mode", imode.to_string())
                .with_context("occ", n.to_string())
                .with_context("cutoff", self.basis.occ_cutoff.to_string());
            return Err(MbaeError::Basis(info));
        }
        self.occ[imode] = n;
        Ok(())
    }

    /// Total boson number.
    pub fn nboson(&self) -> u32 {
        self.occ.iter().sum()
    }

    /// Overwrites this vector with the contents of another of the same
    /// extent.
    pub fn copy_from(&mut self, src: &BosOnv) {
        debug_assert_eq!(self.nmode(), src.nmode(), "src and dst extents are incompatible");
        self.occ.copy_from_slice(&src.occ);
    }

    pub(crate) fn occ_mut(&mut self) -> &mut [u32] {
        &mut self.occ
    }

    /// Squared occupation factor of the whole connection acting on this
    /// vector: a falling-factorial product per annihilated mode and a
    /// rising-factorial product per created mode.
    pub fn occ_fac_square(&self, conn: &BosConn) -> u64 {
        let mut fac = 1u64;
        for pair in conn.ann().pairs() {
            fac *= occ_fac_square_ann(self.occ[pair.imode], pair.nop);
        }
        for pair in conn.cre().pairs() {
            fac *= occ_fac_square_cre(self.occ[pair.imode], pair.nop);
        }
        fac
    }

    /// Occupation factor of the connection acting on this vector.
    pub fn occ_fac(&self, conn: &BosConn) -> f64 {
        (self.occ_fac_square(conn) as f64).sqrt()
    }

    /// Squared occupation factor of a common-operator string alone.
    pub fn occ_fac_square_com(&self, com: &BosOps) -> u64 {
        let mut fac = 1u64;
        for pair in com.pairs() {
            fac *= occ_fac_square_com(self.occ[pair.imode], pair.nop);
        }
        fac
    }

    /// Occupation factor of a common-operator string alone.
    pub fn occ_fac_com(&self, com: &BosOps) -> f64 {
        (self.occ_fac_square_com(com) as f64).sqrt()
    }

    /// Squared occupation factor of a connection in the presence of common
    /// operators shared between bra and ket.
    ///
    /// Normal ordering places the common pairs inside the annihilation
    /// string, so a common mode that is also annihilated sees the residual
    /// occupation after those annihilations. Annihilating more bosons than
    /// are present destroys the state: the factor is 0.
    pub fn occ_fac_square_corrected(&self, conn: &BosConn, com: &BosOps) -> u64 {
        let mut fac = 1u64;
        let com_pairs = com.pairs();
        let mut icom = 0usize;
        for pair in conn.ann().pairs() {
            let occ = self.occ[pair.imode];
            if pair.nop > occ {
                return 0;
            }
            fac *= occ_fac_square_ann(occ, pair.nop);
            while icom < com_pairs.len() && com_pairs[icom].imode <= pair.imode {
                if com_pairs[icom].imode == pair.imode {
                    fac *= occ_fac_square_com(occ - pair.nop, com_pairs[icom].nop);
                } else {
                    fac *= occ_fac_square_com(self.occ[com_pairs[icom].imode], com_pairs[icom].nop);
                }
                icom += 1;
            }
        }
        // creation operators are unaffected by the common pairs
        for pair in conn.cre().pairs() {
            fac *= occ_fac_square_cre(self.occ[pair.imode], pair.nop);
        }
        for pair in &com_pairs[icom..] {
            fac *= occ_fac_square_com(self.occ[pair.imode], pair.nop);
        }
        fac
    }

    /// Occupation factor of a connection with common operators.
    pub fn occ_fac_corrected(&self, conn: &BosConn, com: &BosOps) -> f64 {
        (self.occ_fac_square_corrected(conn, com) as f64).sqrt()
    }
}

/// Squared factor for `nop` annihilations on a mode of occupation `occ`:
/// occ (occ-1) ... (occ-nop+1). Zero when `nop > occ`.
pub fn occ_fac_square_ann(occ: u32, nop: u32) -> u64 {
    let mut fac = 1u64;
    for i in 0..nop {
        fac *= occ.saturating_sub(i) as u64;
    }
    fac
}

/// Squared factor for `nop` creations on a mode of occupation `occ`:
/// (occ+1) (occ+2) ... (occ+nop).
pub fn occ_fac_square_cre(occ: u32, nop: u32) -> u64 {
    let mut fac = 1u64;
    for i in 1..=nop {
        fac *= (occ + i) as u64;
    }
    fac
}

/// Squared factor for `nop` common (bra and ket) operator pairs on a mode of
/// occupation `occ`: each pair contributes (occ-i) squared.
pub fn occ_fac_square_com(occ: u32, nop: u32) -> u64 {
    let mut fac = 1u64;
    for i in 0..nop {
        let com_fac = occ.saturating_sub(i) as u64;
        fac *= com_fac * com_fac;
    }
    fac
}
