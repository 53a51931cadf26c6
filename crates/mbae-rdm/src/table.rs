//! Partitioned, key-deduplicating accumulation tables.
//!
//! Every contribution is routed to the partition owning its key by the same
//! fixed-key hash used for the walker population, buffered in a per-partition
//! send map, and folded into the owning partition's persistent store at the
//! end of each sampling cycle. All merges are additive, so the final store is
//! independent of contribution order.

use indexmap::IndexMap;
use mbae_basis::Sector;
use mbae_core::{partition_of_key, ErrorInfo, MbaeError, OpSig};

use crate::comm::{Collective, Row};
use crate::inds::RdmKey;
use crate::promoter::{combinatorial, combinatorial_with_repetition, factorial};

/// One partition's slice of a distributed, deduplicating accumulation table.
#[derive(Debug, Clone)]
pub struct AccumTable {
    npart: usize,
    ipart: usize,
    grow_factor: f64,
    send: Vec<IndexMap<RdmKey, f64>>,
    store: IndexMap<RdmKey, f64>,
}

impl AccumTable {
    /// Creates the local slice of an `npart`-partition table, pre-sizing the
    /// buffers for `row_estimate` rows.
    pub fn new(npart: usize, ipart: usize, row_estimate: usize, grow_factor: f64) -> Self {
        debug_assert!(ipart < npart, "partition index OOB");
        let per_part = (row_estimate / npart).max(1);
        Self {
            npart,
            ipart,
            grow_factor,
            send: (0..npart)
                .map(|_| IndexMap::with_capacity(per_part))
                .collect(),
            store: IndexMap::with_capacity(per_part),
        }
    }

    /// Number of partitions of the full table.
    pub fn npart(&self) -> usize {
        self.npart
    }

    /// Index of the local partition.
    pub fn ipart(&self) -> usize {
        self.ipart
    }

    /// Adds a weighted contribution to the send buffer of the partition
    /// owning `key`, merging with any contribution already buffered under the
    /// same key. Never blocks.
    pub fn contribute(&mut self, key: RdmKey, value: f64) {
        let dst = partition_of_key(&key, self.npart);
        let buf = &mut self.send[dst];
        if buf.len() == buf.capacity() {
            let extra = ((buf.len() as f64 * (self.grow_factor - 1.0)).ceil() as usize).max(1);
            buf.reserve(extra);
        }
        *buf.entry(key).or_insert(0.0) += value;
    }

    /// Drains the cycle's send buffers into per-partition row lists.
    pub fn take_send(&mut self) -> Vec<Vec<Row>> {
        self.send.iter_mut().map(|buf| buf.drain(..).collect()).collect()
    }

    /// Folds rows received from the exchange into the persistent store.
    pub fn merge_recv(&mut self, rows: Vec<Row>) {
        for (key, value) in rows {
            debug_assert_eq!(
                partition_of_key(&key, self.npart),
                self.ipart,
                "received a row owned by another partition"
            );
            if self.store.len() == self.store.capacity() {
                let extra =
                    ((self.store.len() as f64 * (self.grow_factor - 1.0)).ceil() as usize).max(1);
                self.store.reserve(extra);
            }
            *self.store.entry(key).or_insert(0.0) += value;
        }
    }

    /// Exchanges the cycle's send buffers through the collective and merges
    /// the received rows. Every partition must call this exactly once per
    /// cycle.
    pub fn end_cycle(&mut self, comm: &impl Collective) -> Result<(), MbaeError> {
        if comm.nrank() != self.npart {
            let info = ErrorInfo::new("comm-shape-mismatch", "collective size must equal npart")
                .with_context("npart", self.npart.to_string())
                .with_context("nrank", comm.nrank().to_string());
            return Err(MbaeError::Comm(info));
        }
        let recv = comm.exchange(self.take_send())?;
        self.merge_recv(recv);
        Ok(())
    }

    /// Read-only view of the persistent store for finalization.
    pub fn store(&self) -> &IndexMap<RdmKey, f64> {
        &self.store
    }

    /// True when no rows have been merged into the persistent store.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Crude estimate of the number of distinct keys of a given rank signature
/// over a sector, used for initial buffer sizing.
pub fn nrow_estimate(sig: OpSig, sector: &Sector) -> usize {
    let nspinorb = sector.frm.nspinorb();
    let nmode = sector.bos.nmode;
    let mut nrow = combinatorial(nspinorb, sig.nfrm_cre()) as f64;
    nrow *= combinatorial(nspinorb, sig.nfrm_ann()) as f64;
    nrow *= combinatorial_with_repetition(nmode, sig.nbos_cre()) as f64;
    nrow *= combinatorial_with_repetition(nmode, sig.nbos_ann()) as f64;
    nrow /= factorial(sig.nfrm()) as f64;
    nrow /= factorial(sig.nbos()) as f64;
    (nrow as usize).max(1)
}
