//! Promotion of low-rank excitations into higher-rank density matrices.
//!
//! A connection of excitation level N contributes to every rank-R density
//! matrix with R >= N, once for each way of choosing R - N spectator
//! (common) operators to insert as creation-annihilation pairs. The
//! [`FermionPromoter`] precomputes the combination table for one
//! (ncom, nins) pair and merges the chosen spectators into the connection
//! strings, tracking the antisymmetric sign each insertion incurs.

use mbae_basis::{FrmConn, FrmOps};
use mbae_core::{ErrorInfo, MbaeError};

use crate::inds::{narrow, RdmIndsBuf};

/// Precomputed spectator-insertion table for one promotion level.
#[derive(Debug, Clone)]
pub struct FermionPromoter {
    ncom: usize,
    nins: usize,
    ncomb: usize,
    /// Flattened lexicographic enumeration of all nins-subsets of 0..ncom.
    combs: Box<[u32]>,
}

impl FermionPromoter {
    /// Builds the table of all `C(ncom, nins)` spectator combinations.
    pub fn new(ncom: usize, nins: usize) -> Result<Self, MbaeError> {
        if nins > ncom {
            let info = ErrorInfo::new(
                "promoter-overfull",
                "cannot insert more operator pairs than there are common operators",
            )
            .with_context("ncom", ncom.to_string())
            .with_context("nins", nins.to_string());
            return Err(MbaeError::Promotion(info));
        }
        let ncomb = combinatorial(ncom, nins);
        let mut combs = Vec::with_capacity(ncomb * nins);
        let mut comb: Vec<usize> = (0..nins).collect();
        loop {
            combs.extend(comb.iter().map(|&i| narrow(i)));
            if !next_combination(&mut comb, ncom) {
                break;
            }
        }
        debug_assert_eq!(combs.len(), ncomb * nins);
        Ok(Self {
            ncom,
            nins,
            ncomb,
            combs: combs.into_boxed_slice(),
        })
    }

    /// Number of common operators the table was built for.
    pub fn ncom(&self) -> usize {
        self.ncom
    }

    /// Number of spectator pairs inserted per combination.
    pub fn nins(&self) -> usize {
        self.nins
    }

    /// Number of combinations, `C(ncom, nins)`.
    pub fn ncomb(&self) -> usize {
        self.ncomb
    }

    /// The `icomb`-th combination as positions into the common string.
    pub fn comb(&self, icomb: usize) -> &[u32] {
        debug_assert!(icomb < self.ncomb, "combination index OOB");
        &self.combs[icomb * self.nins..(icomb + 1) * self.nins]
    }

    /// Applies the `icomb`-th promotion to the connection, writing the
    /// target-rank fermionic index channels of `inds` and returning the
    /// incremental antisymmetric sign of the insertions.
    ///
    /// The caller must XOR the returned sign with the connection's own phase
    /// before storing the contribution. With `nins == 0` the connection
    /// strings pass through verbatim and the sign is always false.
    pub fn apply(&self, icomb: usize, conn: &FrmConn, com: &FrmOps, inds: &mut RdmIndsBuf) -> bool {
        debug_assert_eq!(com.len(), self.ncom, "common string size mismatch");
        inds.clear_frm();
        let comb = self.comb(icomb);
        let (out_cre, out_ann) = inds.frm_channels_mut();
        let mut nperm = 0usize;
        nperm += merge_insert(conn.cre().as_slice(), com, comb, out_cre);
        nperm += merge_insert(conn.ann().as_slice(), com, comb, out_ann);
        nperm & 1 == 1
    }
}

/// Merges the connection operators of one side with the selected spectators
/// into a single ascending string, returning the number of operator
/// exchanges: each inserted spectator operator is exchanged once with every
/// connection operator already placed before it.
fn merge_insert(conn_ops: &[usize], com: &FrmOps, comb: &[u32], out: &mut Vec<u32>) -> usize {
    let mut nperm = 0usize;
    let mut iconn = 0usize;
    for &pos in comb {
        let spectator = com.get(pos as usize);
        while iconn < conn_ops.len() && conn_ops[iconn] < spectator {
            out.push(narrow(conn_ops[iconn]));
            iconn += 1;
        }
        debug_assert!(
            iconn >= conn_ops.len() || conn_ops[iconn] != spectator,
            "spectator indices must be disjoint from the connection"
        );
        nperm += iconn;
        out.push(narrow(spectator));
    }
    out.extend(conn_ops[iconn..].iter().map(|&i| narrow(i)));
    nperm
}

/// Advances `comb` to the next lexicographic nins-subset of `0..n`,
/// returning false after the last.
fn next_combination(comb: &mut [usize], n: usize) -> bool {
    let k = comb.len();
    if k == 0 {
        return false;
    }
    let mut i = k;
    while i > 0 {
        i -= 1;
        if comb[i] < n - (k - i) {
            comb[i] += 1;
            for j in i + 1..k {
                comb[j] = comb[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Binomial coefficient `C(n, k)`.
pub fn combinatorial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut out = 1usize;
    for i in 0..k {
        out = out * (n - i) / (i + 1);
    }
    out
}

/// Binomial coefficient with repetition, `C(n + k - 1, k)`.
pub fn combinatorial_with_repetition(n: usize, k: usize) -> usize {
    if n == 0 {
        return usize::from(k == 0);
    }
    combinatorial(n + k - 1, k)
}

/// Factorial of `n`.
pub fn factorial(n: usize) -> usize {
    (2..=n).product()
}
