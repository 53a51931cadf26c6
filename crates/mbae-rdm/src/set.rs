//! The estimator dispatch layer.
//!
//! An [`RdmSet`] owns one [`Rdm`] per active rank signature and an
//! immutable-after-construction association from every contributing
//! excitation signature to the accumulators it must feed: the exact match,
//! plus every signature reachable by decrementing the fermion and boson
//! channels of a rank signature in step (those contribute by promotion).

use indexmap::IndexMap;
use mbae_basis::{ComOps, FrmBosConn, FrmBosOnv, Sector};
use mbae_core::{ErrorInfo, MbaeError, OpSig};

use crate::comm::Collective;
use crate::config::RdmConfig;
use crate::rdm::Rdm;

/// The set of active density-matrix accumulators of one partition.
#[derive(Debug)]
pub struct RdmSet {
    sector: Sector,
    ranksigs: Vec<OpSig>,
    /// Indexed by raw exsig: the rank signatures taking that contribution.
    exsig_ranks: Vec<Vec<OpSig>>,
    rdms: IndexMap<OpSig, Rdm>,
    norm_tolerance: f64,
    work_conn: FrmBosConn,
    work_com: ComOps,
    norm_local: f64,
    norm_reduced: f64,
}

fn make_exsig_ranks(ranksigs: &[OpSig]) -> Vec<Vec<OpSig>> {
    let mut exsig_ranks: Vec<Vec<OpSig>> = (0..OpSig::NDISTINCT).map(|_| Vec::new()).collect();
    for &ranksig in ranksigs {
        let mut nfrm = ranksig.nfrm_cre();
        loop {
            let mut nbos_cre = ranksig.nbos_cre();
            let mut nbos_ann = ranksig.nbos_ann();
            loop {
                if let Some(exsig) = OpSig::encode(nfrm, nfrm, nbos_cre, nbos_ann) {
                    exsig_ranks[exsig.as_raw()].push(ranksig);
                }
                if nbos_cre == 0 || nbos_ann == 0 {
                    break;
                }
                nbos_cre -= 1;
                nbos_ann -= 1;
            }
            if nfrm == 0 {
                break;
            }
            nfrm -= 1;
        }
    }
    exsig_ranks
}

impl RdmSet {
    /// Builds the accumulator set of one partition from the configuration.
    pub fn new(
        config: &RdmConfig,
        sector: Sector,
        npart: usize,
        ipart: usize,
    ) -> Result<Self, MbaeError> {
        let ranksigs = config.parse_ranksigs()?;
        let mut rdms = IndexMap::with_capacity(ranksigs.len());
        for &ranksig in &ranksigs {
            if ranksig.is_diagonal() {
                let info = ErrorInfo::new(
                    "ranksig-null",
                    "estimators require a nonzero number of operator indices",
                );
                return Err(MbaeError::Accumulation(info));
            }
            if ranksig.nbos_cre() > 1 || ranksig.nbos_ann() > 1 {
                let info = ErrorInfo::new(
                    "ranksig-bos-rank",
                    "estimators with more than one boson operator per channel are not supported",
                )
                .with_context("ranksig", ranksig.to_string());
                return Err(MbaeError::Accumulation(info));
            }
            if rdms.contains_key(&ranksig) {
                let info = ErrorInfo::new("ranksig-duplicate", "rank signature listed twice")
                    .with_context("ranksig", ranksig.to_string());
                return Err(MbaeError::Accumulation(info));
            }
            let rdm = Rdm::new(config, ranksig, sector, npart, ipart)?;
            rdms.insert(ranksig, rdm);
        }
        Ok(Self {
            sector,
            exsig_ranks: make_exsig_ranks(&ranksigs),
            ranksigs,
            rdms,
            norm_tolerance: config.norm_tolerance,
            work_conn: FrmBosConn::new(&sector),
            work_com: ComOps::new(&sector),
            norm_local: 0.0,
            norm_reduced: 0.0,
        })
    }

    /// Sector the set was built for.
    pub fn sector(&self) -> &Sector {
        &self.sector
    }

    /// Active rank signatures in configuration order.
    pub fn ranksigs(&self) -> &[OpSig] {
        &self.ranksigs
    }

    /// The accumulator of one rank signature.
    pub fn rdm(&self, ranksig: OpSig) -> Option<&Rdm> {
        self.rdms.get(&ranksig)
    }

    /// Relative tolerance of the trace/norm consistency check.
    pub fn norm_tolerance(&self) -> f64 {
        self.norm_tolerance
    }

    /// True when contributions of the given signature feed at least one
    /// active accumulator.
    pub fn takes_contribs_from(&self, exsig: OpSig) -> bool {
        !self.exsig_ranks[exsig.as_raw()].is_empty()
    }

    /// Connects the endpoint pair and dispatches the weighted contribution
    /// to every accumulator taking its excitation signature. A diagonal
    /// signature also feeds the running total norm.
    pub fn make_contribs(
        &mut self,
        src: &FrmBosOnv,
        dst: &FrmBosOnv,
        weight: f64,
    ) -> Result<(), MbaeError> {
        let Self {
            work_conn, work_com, ..
        } = self;
        work_conn.connect_with_com(src, dst, work_com)?;
        let Some(exsig) = self.work_conn.exsig() else {
            // beyond the encodable rank no estimator can take it
            return Ok(());
        };
        if exsig.is_diagonal() {
            self.norm_local += weight;
        }
        for &ranksig in &self.exsig_ranks[exsig.as_raw()] {
            if let Some(rdm) = self.rdms.get_mut(&ranksig) {
                rdm.make_contribs_frmbos(src, &self.work_conn, &self.work_com, weight);
            }
        }
        Ok(())
    }

    /// Dispatches a contribution whose connection was computed upstream.
    pub fn make_contribs_conn(
        &mut self,
        src: &FrmBosOnv,
        conn: &FrmBosConn,
        com: &ComOps,
        weight: f64,
    ) {
        let Some(exsig) = conn.exsig() else { return };
        if exsig.is_diagonal() {
            self.norm_local += weight;
        }
        for &ranksig in &self.exsig_ranks[exsig.as_raw()] {
            if let Some(rdm) = self.rdms.get_mut(&ranksig) {
                rdm.make_contribs_frmbos(src, conn, com, weight);
            }
        }
    }

    /// Adds directly to the running total norm, for diagonal contributions
    /// sampled outside the connection path.
    pub fn add_norm(&mut self, weight: f64) {
        self.norm_local += weight;
    }

    /// Exchanges every accumulator's buffers and reduces the total norm.
    pub fn end_cycle(&mut self, comm: &impl Collective) -> Result<(), MbaeError> {
        for rdm in self.rdms.values_mut() {
            rdm.end_cycle(comm)?;
        }
        self.norm_reduced += comm.sum(self.norm_local)?;
        self.norm_local = 0.0;
        Ok(())
    }

    /// Total of the sampled diagonal contributions, reduced over all
    /// partitions up to the last completed cycle.
    pub fn total_norm(&self) -> f64 {
        self.norm_reduced
    }

    /// True when no accumulator has merged any rows yet.
    pub fn all_stores_empty(&self) -> bool {
        self.rdms.values().all(|rdm| rdm.store().is_empty())
    }
}
