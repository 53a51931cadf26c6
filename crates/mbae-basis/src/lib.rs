#![deny(missing_docs)]

//! Many-body basis functions, operator strings and connections.
//!
//! The types here describe occupation-number vectors (ONVs) for fermions
//! (bitsets over spin-orbitals) and bosons (bounded per-mode occupations),
//! and the "connection" between two ONVs: the second-quantized operator
//! product taking one to the other, together with its fermionic
//! antisymmetric phase or bosonic occupation factor.

pub mod bit;
pub mod bos_conn;
pub mod bos_onv;
pub mod frm_bos;
pub mod frm_conn;
pub mod frm_onv;
pub mod ops;

pub use bos_conn::BosConn;
pub use bos_onv::{BosBasis, BosOnv};
pub use frm_bos::{ComOps, FrmBosConn, FrmBosOnv, Sector};
pub use frm_conn::FrmConn;
pub use frm_onv::{FrmBasis, FrmOnv};
pub use ops::{BosOpPair, BosOps, FrmOps};
