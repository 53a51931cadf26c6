//! Archive payloads of finalized estimator stores.
//!
//! Finalization snapshots every accumulator's persistent store, sorted by
//! key, together with the reduced total norm, a schema version and run
//! provenance. Archives round trip through JSON and bincode and carry a
//! canonical SHA-256 content hash. There is no load path: estimator
//! accumulation is not restartable from file.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use mbae_core::{ErrorInfo, MbaeError, RunProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::set::RdmSet;

/// One accumulator's sorted store content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdmTablePayload {
    /// Packed operator-index keys in ascending order.
    pub keys: Vec<Vec<u32>>,
    /// Accumulated value per key, parallel to `keys`.
    pub values: Vec<f64>,
}

/// Serializable snapshot of a finalized estimator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdmArchive {
    /// Schema version of this payload layout.
    pub schema_version: SchemaVersion,
    /// Provenance of the producing run.
    pub provenance: RunProvenance,
    /// Reduced total of the sampled diagonal contributions.
    pub norm: f64,
    /// Sorted store content per accumulator, keyed by accumulator name.
    pub rdms: BTreeMap<String, RdmTablePayload>,
}

fn serde_err(op: &str, detail: String) -> MbaeError {
    MbaeError::Serde(
        ErrorInfo::new("archive-serde", "archive (de)serialization failed")
            .with_context("op", op)
            .with_context("detail", detail),
    )
}

impl RdmArchive {
    /// Snapshots the finalized stores of a set.
    pub fn from_set(set: &RdmSet, provenance: RunProvenance) -> Self {
        let mut rdms = BTreeMap::new();
        for &ranksig in set.ranksigs() {
            let Some(rdm) = set.rdm(ranksig) else { continue };
            let mut rows: Vec<(Vec<u32>, f64)> = rdm
                .store()
                .iter()
                .map(|(key, &value)| (key.as_slice().to_vec(), value))
                .collect();
            rows.sort_by(|a, b| a.0.cmp(&b.0));
            let (keys, values) = rows.into_iter().unzip();
            rdms.insert(rdm.name().to_string(), RdmTablePayload { keys, values });
        }
        Self {
            schema_version: SchemaVersion::default(),
            provenance,
            norm: set.total_norm(),
            rdms,
        }
    }

    /// Serializes the archive to JSON.
    pub fn to_json(&self) -> Result<String, MbaeError> {
        serde_json::to_string_pretty(self).map_err(|err| serde_err("to-json", err.to_string()))
    }

    /// Deserializes an archive from JSON.
    pub fn from_json(text: &str) -> Result<Self, MbaeError> {
        serde_json::from_str(text).map_err(|err| serde_err("from-json", err.to_string()))
    }

    /// Serializes the archive to compact binary.
    pub fn to_bincode(&self) -> Result<Vec<u8>, MbaeError> {
        bincode::serialize(self).map_err(|err| serde_err("to-bincode", err.to_string()))
    }

    /// Deserializes an archive from compact binary.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self, MbaeError> {
        bincode::deserialize(bytes).map_err(|err| serde_err("from-bincode", err.to_string()))
    }

    /// Canonical SHA-256 hash of the store content (names, sorted keys,
    /// values and norm; provenance excluded so reruns of identical data
    /// hash identically).
    pub fn content_hash(&self) -> Result<String, MbaeError> {
        let canonical = bincode::serialize(&(&self.norm, &self.rdms))
            .map_err(|err| serde_err("content-hash", err.to_string()))?;
        let digest = Sha256::digest(&canonical);
        let mut out = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(out, "{byte:02x}");
        }
        Ok(out)
    }

    /// Restoring accumulation state from an archive is unsupported:
    /// estimators are not restartable.
    pub fn load_into_set(&self, _set: &mut RdmSet) -> Result<(), MbaeError> {
        let info = ErrorInfo::new(
            "archive-load-unsupported",
            "estimator accumulation cannot be restarted from an archive",
        )
        .with_hint("archives are terminal artifacts for analysis only");
        Err(MbaeError::Serde(info))
    }
}
