#![deny(missing_docs)]

//! Core contracts and data types for the mbae estimator engine.
//!
//! This crate holds the pieces every other mbae crate agrees on: the
//! structured error type, the excitation-signature encoding used to dispatch
//! sampled connections to estimators, the deterministic key-to-partition
//! routing function, and the provenance descriptors attached to archives.

pub mod errors;
pub mod opsig;
pub mod provenance;
pub mod rng;
pub mod routing;

pub use errors::{ErrorInfo, MbaeError};
pub use opsig::OpSig;
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
pub use routing::{partition_of_key, routing_hash};
