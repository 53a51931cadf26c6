use mbae_core::routing::{partition_of_key, routing_hash};
use proptest::prelude::*;

#[test]
fn same_key_same_partition() {
    let key: Vec<u32> = vec![0, 3, 1, 4];
    for npart in 1..=16 {
        let first = partition_of_key(&key, npart);
        let second = partition_of_key(&key.clone(), npart);
        assert_eq!(first, second);
        assert!(first < npart);
    }
}

#[test]
fn hash_is_stable_across_calls() {
    let key = (7u64, vec![1u32, 2, 3]);
    assert_eq!(routing_hash(&key), routing_hash(&key));
}

proptest! {
    #[test]
    fn partition_always_in_range(key in proptest::collection::vec(any::<u32>(), 0..8), npart in 1usize..64) {
        prop_assert!(partition_of_key(&key, npart) < npart);
    }
}
