#![deny(missing_docs)]

//! Reduced density matrix accumulation.
//!
//! The estimator layer of the sampling engine: connections sampled by the
//! random walk are promoted into every active density-matrix rank, routed by
//! key to the owning partition, and merged into deduplicating persistent
//! stores which are contracted against Hamiltonian coefficients and archived
//! at the end of the run.

pub mod comm;
pub mod config;
pub mod energy;
pub mod inds;
pub mod promoter;
pub mod rdm;
pub mod save;
pub mod set;
pub mod table;

pub use comm::{route_rows, Collective, Row, SinglePartition};
pub use config::{BufferConfig, RdmConfig};
pub use energy::{bos_energy, frm_energy, BosHamCoeffs, FrmHamCoeffs};
pub use inds::{RdmIndsBuf, RdmKey};
pub use promoter::FermionPromoter;
pub use rdm::Rdm;
pub use save::{RdmArchive, RdmTablePayload};
pub use set::RdmSet;
pub use table::AccumTable;
