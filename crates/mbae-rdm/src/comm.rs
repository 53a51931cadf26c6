//! The collective-exchange seam between accumulation and transport.
//!
//! Accumulation tables never talk to a transport directly; they hand their
//! per-partition send buffers to a [`Collective`] and fold back whatever rows
//! it returns. [`SinglePartition`] is the identity transport of a
//! one-partition ensemble; in-process multi-partition tests route buffers
//! between tables with [`route_rows`].

use mbae_core::{ErrorInfo, MbaeError};

use crate::inds::RdmKey;

/// One exchanged accumulation row.
pub type Row = (RdmKey, f64);

/// Collective operations required of the communication substrate.
///
/// Transport faults are fatal to the whole ensemble; implementations must
/// never drop rows.
pub trait Collective {
    /// Number of partitions in the ensemble.
    fn nrank(&self) -> usize;

    /// Index of the local partition.
    fn irank(&self) -> usize;

    /// All-to-all exchange: element `i` of `send` is destined for partition
    /// `i`; the return value is every row addressed to the local partition.
    fn exchange(&self, send: Vec<Vec<Row>>) -> Result<Vec<Row>, MbaeError>;

    /// Global sum of a scalar across all partitions.
    fn sum(&self, x: f64) -> Result<f64, MbaeError>;
}

/// Identity transport of a one-partition ensemble.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePartition;

impl Collective for SinglePartition {
    fn nrank(&self) -> usize {
        1
    }

    fn irank(&self) -> usize {
        0
    }

    fn exchange(&self, mut send: Vec<Vec<Row>>) -> Result<Vec<Row>, MbaeError> {
        if send.len() != 1 {
            let info = ErrorInfo::new("comm-shape-mismatch", "send buffer count must equal nrank")
                .with_context("nrank", "1")
                .with_context("nsend", send.len().to_string());
            return Err(MbaeError::Comm(info));
        }
        Ok(send.pop().unwrap_or_default())
    }

    fn sum(&self, x: f64) -> Result<f64, MbaeError> {
        Ok(x)
    }
}

/// Routes the send buffers of an in-process ensemble: `sends[isrc][idst]`
/// becomes the concatenation `recv[idst]` over all sources.
pub fn route_rows(sends: Vec<Vec<Vec<Row>>>) -> Result<Vec<Vec<Row>>, MbaeError> {
    let npart = sends.len();
    if let Some(bad) = sends.iter().position(|s| s.len() != npart) {
        let info = ErrorInfo::new("comm-shape-mismatch", "send buffer count must equal nrank")
            .with_context("nrank", npart.to_string())
            .with_context("source", bad.to_string())
            .with_context("nsend", sends[bad].len().to_string());
        return Err(MbaeError::Comm(info));
    }
    let mut recv: Vec<Vec<Row>> = (0..npart).map(|_| Vec::new()).collect();
    for send in sends {
        for (idst, rows) in send.into_iter().enumerate() {
            recv[idst].extend(rows);
        }
    }
    Ok(recv)
}
