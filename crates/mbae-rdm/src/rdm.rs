//! A single density-matrix accumulator of one target rank signature.

use indexmap::IndexMap;
use mbae_basis::{ComOps, FrmBosConn, FrmBosOnv, FrmConn, FrmOnv, FrmOps, Sector};
use mbae_core::{ErrorInfo, MbaeError, OpSig};

use crate::comm::{Collective, Row};
use crate::config::RdmConfig;
use crate::inds::{RdmIndsBuf, RdmKey};
use crate::promoter::FermionPromoter;
use crate::table::{nrow_estimate, AccumTable};

/// One distributed accumulator: a target rank signature, the promoter bank
/// taking lower-rank contributions into it, reusable index scratch, and the
/// partitioned table the weighted rows land in.
#[derive(Debug, Clone)]
pub struct Rdm {
    ranksig: OpSig,
    sector: Sector,
    name: String,
    /// Indexed by the number of spectator pairs to insert.
    promoters: Vec<FermionPromoter>,
    inds: RdmIndsBuf,
    table: AccumTable,
}

impl Rdm {
    /// Creates the local slice of an accumulator for `ranksig` over `sector`,
    /// with buffers sized from the config and the sector extents.
    pub fn new(
        config: &RdmConfig,
        ranksig: OpSig,
        sector: Sector,
        npart: usize,
        ipart: usize,
    ) -> Result<Self, MbaeError> {
        if !ranksig.conserves_nfrm() {
            let info = ErrorInfo::new(
                "ranksig-nonconserving",
                "fermion number non-conserving estimators are not supported",
            )
            .with_context("ranksig", ranksig.to_string());
            return Err(MbaeError::Accumulation(info));
        }
        let frm_rank = ranksig.nfrm_cre();
        if frm_rank > sector.nelec {
            let info = ErrorInfo::new(
                "ranksig-exceeds-nelec",
                "estimator rank exceeds the sector electron count",
            )
            .with_context("ranksig", ranksig.to_string())
            .with_context("nelec", sector.nelec.to_string());
            return Err(MbaeError::Accumulation(info));
        }
        // the promoter taking a level-(rank - nins) excitation inserts nins
        // pairs chosen from the nelec - (rank - nins) common operators
        let mut promoters = Vec::with_capacity(frm_rank + 1);
        for nins in 0..=frm_rank {
            let nexcit = frm_rank - nins;
            promoters.push(FermionPromoter::new(sector.nelec - nexcit, nins)?);
        }
        let row_estimate = (nrow_estimate(ranksig, &sector) as f64
            * config.buffers.store_row_estimate_factor) as usize;
        Ok(Self {
            ranksig,
            sector,
            name: ranksig.to_string(),
            promoters,
            inds: RdmIndsBuf::new(ranksig),
            table: AccumTable::new(npart, ipart, row_estimate, config.buffers.grow_factor),
        })
    }

    /// Target rank signature.
    pub fn ranksig(&self) -> OpSig {
        self.ranksig
    }

    /// Name under which the accumulator's store is archived.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sector the accumulator was built for.
    pub fn sector(&self) -> &Sector {
        &self.sector
    }

    /// Read-only view of the persistent store.
    pub fn store(&self) -> &IndexMap<RdmKey, f64> {
        self.table.store()
    }

    /// Makes every promoted contribution of a fermionic connection.
    ///
    /// The dispatch layer guarantees the connection's excitation level does
    /// not exceed the fermionic rank.
    pub fn make_contribs_frm(&mut self, src: &FrmOnv, conn: &FrmConn, com: &FrmOps, weight: f64) {
        let exlvl = conn.cre().len();
        debug_assert_eq!(conn.cre().len(), conn.ann().len(), "non-conserving connection");
        debug_assert!(exlvl <= self.ranksig.nfrm_cre(), "connection rank exceeds target rank");
        let nins = self.ranksig.nfrm_cre() - exlvl;
        let promoter = &self.promoters[nins];
        let conn_phase = conn.phase(src);
        for icomb in 0..promoter.ncomb() {
            let phase = promoter.apply(icomb, conn, com, &mut self.inds) ^ conn_phase;
            self.table
                .contribute(self.inds.key(), if phase { -weight } else { weight });
        }
    }

    /// Makes every contribution of a combined fermion-boson connection.
    ///
    /// Pure-fermion signatures delegate to the fermionic path. A connection
    /// carrying exactly one boson operator ("ladder") stamps that operator
    /// into the key and scales the weight by the boson occupation factor. A
    /// number-conserving boson target fed by a pure-fermion connection
    /// treats every occupied mode of the source as a common boson pair
    /// scaled by its occupation.
    pub fn make_contribs_frmbos(
        &mut self,
        src: &FrmBosOnv,
        conn: &FrmBosConn,
        com: &ComOps,
        weight: f64,
    ) {
        let Some(exsig) = conn.exsig() else { return };
        self.inds.clear();
        if exsig.is_pure_frm() && self.ranksig.is_pure_frm() {
            self.make_contribs_frm(&src.frm, &conn.frm, &com.frm, weight);
            return;
        }
        if exsig.nbos() == 1 && self.ranksig.nbos() == 1 {
            // ladder contribution: fermion promotion happens in the
            // delegated path, the boson half only scales and stamps
            let occ_fac = src.bos.occ_fac(&conn.bos);
            self.inds.set_bos_from_conn(&conn.bos);
            self.make_contribs_frm(&src.frm, &conn.frm, &com.frm, weight * occ_fac);
            return;
        }
        if self.ranksig.nbos_cre() == 1 && self.ranksig.nbos_ann() == 1 && exsig.is_pure_frm() {
            // boson promotion: every occupied mode of the source is a
            // common pair weighted by its occupation
            for imode in 0..src.bos.nmode() {
                let ncom = src.bos.occ(imode);
                if ncom == 0 {
                    continue;
                }
                self.inds.set_bos_diagonal(imode);
                self.make_contribs_frm(&src.frm, &conn.frm, &com.frm, f64::from(ncom) * weight);
            }
        }
    }

    /// Drains the cycle's send buffers; the multi-partition in-process seam.
    pub fn take_send(&mut self) -> Vec<Vec<Row>> {
        self.table.take_send()
    }

    /// Folds exchanged rows into the persistent store.
    pub fn merge_recv(&mut self, rows: Vec<Row>) {
        self.table.merge_recv(rows)
    }

    /// Exchanges and merges the cycle's buffered contributions.
    pub fn end_cycle(&mut self, comm: &impl Collective) -> Result<(), MbaeError> {
        self.table.end_cycle(comm)
    }
}
