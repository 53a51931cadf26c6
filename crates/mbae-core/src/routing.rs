//! Deterministic key to partition routing.
//!
//! Every partitioned table in the program must locate a key on the same
//! partition, so routing is a single fixed-key SipHash-2-4 of the key's
//! canonical byte representation. The same function is shared by the walker
//! population table and every estimator table.

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher24;

/// Fixed SipHash keys; changing these is a cross-partition breaking change.
const ROUTING_KEY_0: u64 = 0x6d62_6165_726f_7574;
const ROUTING_KEY_1: u64 = 0x7061_7274_6974_696e;

/// Returns the 64-bit routing hash of a hashable key.
pub fn routing_hash<K: Hash>(key: &K) -> u64 {
    let mut hasher = SipHasher24::new_with_keys(ROUTING_KEY_0, ROUTING_KEY_1);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Returns the owning partition of a key among `npart` partitions.
///
/// `npart` must be nonzero; this is a configuration-time invariant of the
/// ensemble, not a runtime input.
pub fn partition_of_key<K: Hash>(key: &K, npart: usize) -> usize {
    debug_assert!(npart > 0, "ensemble must have at least one partition");
    (routing_hash(key) % npart as u64) as usize
}
