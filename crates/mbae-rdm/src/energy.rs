//! Energy contraction of accumulated density matrices against externally
//! supplied Hamiltonian coefficients.

use mbae_core::{ErrorInfo, MbaeError, OpSig};

use crate::comm::Collective;
use crate::set::RdmSet;

/// Read-only fermionic Hamiltonian coefficient accessors.
pub trait FrmHamCoeffs {
    /// Scalar core energy.
    fn e_core(&self) -> f64;
    /// One-body coefficient of the (creation, annihilation) index pair.
    fn coeff_1100(&self, i: u32, j: u32) -> f64;
    /// Antisymmetrized two-body coefficient of ordered index pairs
    /// (i < j created, k < l annihilated).
    fn coeff_2200(&self, i: u32, j: u32, k: u32, l: u32) -> f64;
}

/// Read-only bosonic Hamiltonian coefficient accessors.
pub trait BosHamCoeffs {
    /// Number-conserving coefficient of the (creation, annihilation) mode
    /// pair.
    fn coeff_0011(&self, n: u32, m: u32) -> f64;
}

fn nspair(nelec: usize) -> f64 {
    (nelec * (nelec - 1) / 2) as f64
}

fn rdm_or_err(set: &RdmSet, ranksig: OpSig) -> Result<&crate::rdm::Rdm, MbaeError> {
    set.rdm(ranksig).ok_or_else(|| {
        let info = ErrorInfo::new("rdm-not-active", "required estimator is not accumulated")
            .with_context("ranksig", ranksig.to_string());
        MbaeError::Accumulation(info)
    })
}

/// Contracts the 2-body fermionic store into the total electronic energy.
///
/// Equal-index coincidences between the creation and annihilation halves of
/// each row fold into an effective one-body trace, with the sign of bringing
/// the like-valued operators together; the one-body sum over-counts by a
/// factor of nelec - 1. The fully diagonal rows accumulate the 2-RDM trace,
/// which is cross-checked against the independently sampled total norm
/// within the set's configured relative tolerance.
pub fn frm_energy(
    set: &RdmSet,
    ham: &impl FrmHamCoeffs,
    comm: &impl Collective,
) -> Result<f64, MbaeError> {
    let ranksig = OpSig::frm(2).unwrap_or_default();
    let rdm2 = rdm_or_err(set, ranksig)?;
    let mut e1 = 0.0;
    let mut e2 = 0.0;
    let mut trace = 0.0;
    for (key, &value) in rdm2.store() {
        let inds = key.as_slice();
        let (i, j, k, l) = (inds[0], inds[1], inds[2], inds[3]);
        debug_assert!(i < j, "creation indices should be ordered");
        debug_assert!(k < l, "annihilation indices should be ordered");
        e2 += value * ham.coeff_2200(i, j, k, l);
        if i == k {
            e1 += value * ham.coeff_1100(j, l);
        }
        if j == l {
            e1 += value * ham.coeff_1100(i, k);
        }
        if i == l {
            e1 -= value * ham.coeff_1100(j, k);
        }
        if j == k {
            e1 -= value * ham.coeff_1100(i, l);
        }
        if i == k && j == l {
            trace += value;
        }
    }
    let nelec = set.sector().nelec;
    e1 /= (nelec - 1) as f64;
    e1 = comm.sum(e1)?;
    e2 = comm.sum(e2)?;
    trace = comm.sum(trace)?;
    if trace == 0.0 {
        let info = ErrorInfo::new("rdm-trace-zero", "2-RDM trace has not been accumulated")
            .with_hint("end_cycle must complete before contraction");
        return Err(MbaeError::Consistency(info));
    }
    let norm = trace / nspair(nelec);
    let total_norm = set.total_norm();
    if (norm - total_norm).abs() > set.norm_tolerance() * norm.abs().max(total_norm.abs()) {
        let info = ErrorInfo::new(
            "trace-norm-mismatch",
            "2-RDM trace disagrees with the total of sampled diagonal contributions",
        )
        .with_context("trace_norm", norm.to_string())
        .with_context("total_norm", total_norm.to_string())
        .with_context("tolerance", set.norm_tolerance().to_string())
        .with_hint("an upstream sampling or configuration defect, not recoverable here");
        return Err(MbaeError::Consistency(info));
    }
    Ok(ham.e_core() + (e1 + e2) / norm)
}

/// Contracts the number-conserving bosonic store into the boson energy.
///
/// The 0011 store currently only takes diagonal contributions, so every row
/// must carry equal creation and annihilation modes.
pub fn bos_energy(
    set: &RdmSet,
    ham: &impl BosHamCoeffs,
    comm: &impl Collective,
) -> Result<f64, MbaeError> {
    let ranksig = OpSig::encode(0, 0, 1, 1).unwrap_or_default();
    let rdm = rdm_or_err(set, ranksig)?;
    let mut e = 0.0;
    for (key, &value) in rdm.store() {
        let inds = key.as_slice();
        let (n, m) = (inds[0], inds[1]);
        if n != m {
            let info = ErrorInfo::new(
                "bos-rdm-off-diagonal",
                "the number-conserving boson store should hold diagonal rows only",
            )
            .with_context("cre_mode", n.to_string())
            .with_context("ann_mode", m.to_string());
            return Err(MbaeError::Consistency(info));
        }
        e += value * ham.coeff_0011(n, m);
    }
    let e = comm.sum(e)?;
    let total_norm = set.total_norm();
    if total_norm == 0.0 {
        let info = ErrorInfo::new("norm-zero", "total norm has not been accumulated")
            .with_hint("end_cycle must complete before contraction");
        return Err(MbaeError::Consistency(info));
    }
    Ok(e / total_norm)
}
