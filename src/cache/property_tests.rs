//! Property-Based Tests for the In-Memory Store
//!
//! Uses proptest to check the store against a `HashMap` model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntryOptions, DistributedCache, MemoryCache};

const TEST_MAX_ENTRIES: usize = 100;
const TEST_MAX_VALUE_SIZE: usize = 512;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,32}"
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

#[derive(Debug, Clone)]
enum StoreOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Refresh { key: String },
    Remove { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| StoreOp::Set { key, value }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
        key_strategy().prop_map(|key| StoreOp::Refresh { key }),
        key_strategy().prop_map(|key| StoreOp::Remove { key }),
    ]
}

fn long_lived() -> CacheEntryOptions {
    CacheEntryOptions::new().with_sliding_expiration(Duration::from_secs(600))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without evictions or expirations the store behaves like a HashMap,
    // and its byte gauge matches the sum of stored values.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(store_op_strategy(), 1..60)) {
        let store = MemoryCache::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();

        for op in ops {
            match op {
                StoreOp::Set { key, value } => {
                    store.set(&key, value.clone(), &long_lived()).unwrap();
                    model.insert(key, value);
                }
                StoreOp::Get { key } => {
                    prop_assert_eq!(store.get(&key).unwrap(), model.get(&key).cloned());
                }
                StoreOp::Refresh { key } => {
                    store.refresh(&key).unwrap();
                }
                StoreOp::Remove { key } => {
                    store.remove(&key).unwrap();
                    model.remove(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total_entries, model.len());
        prop_assert_eq!(stats.total_bytes, model.values().map(Vec::len).sum::<usize>());
    }

    // The entry count never exceeds capacity, and the newest key always survives.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let max_entries = 20;
        let store = MemoryCache::new(max_entries, TEST_MAX_VALUE_SIZE);

        for (key, value) in entries {
            store.set(&key, value.clone(), &long_lived()).unwrap();
            prop_assert!(store.len() <= max_entries);
            prop_assert_eq!(store.get(&key).unwrap(), Some(value));
        }
    }

    // Oversized values are refused and leave the previous value in place.
    #[test]
    fn prop_value_size_bound(key in key_strategy(), extra in 1usize..64) {
        let store = MemoryCache::new(TEST_MAX_ENTRIES, TEST_MAX_VALUE_SIZE);
        store.set(&key, b"kept".to_vec(), &long_lived()).unwrap();

        let result = store.set(&key, vec![0; TEST_MAX_VALUE_SIZE + extra], &long_lived());

        prop_assert!(result.is_err());
        prop_assert_eq!(store.get(&key).unwrap(), Some(b"kept".to_vec()));
    }
}
