//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the bounded cache against a simple reference
//! model of LRU behaviour.

use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::cache::BoundedCache;
use crate::storage::mock::RecordingStorage;
use crate::storage::{Context, Storage};

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

// == Reference Model ==
/// Front = most recently used. Mirrors both the index and the store.
#[derive(Debug, Default)]
struct Model {
    order: VecDeque<String>,
    store: HashMap<String, Vec<u8>>,
}

impl Model {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push_front(key.to_string());
    }

    fn evict(&mut self, capacity: usize) {
        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_back() {
                self.store.remove(&oldest);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any operation sequence leaves the cache in the state an ideal LRU
    // over a destructive store would be in.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let store = Arc::new(RecordingStorage::new());
        let cache = BoundedCache::new(capacity as i64, store.clone());
        let ctx = Context::background();
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(&ctx, &key, value.clone()).unwrap();
                    model.store.insert(key.clone(), value);
                    model.touch(&key);
                    model.evict(capacity);
                }
                CacheOp::Get { key } => {
                    let result = cache.get(&ctx, &key);
                    match model.store.get(&key).cloned() {
                        Some(expected) => {
                            prop_assert_eq!(result.unwrap().to_vec(), expected);
                            model.touch(&key);
                            model.evict(capacity);
                        }
                        None => prop_assert!(result.unwrap_err().is_not_found()),
                    }
                }
                CacheOp::Delete { key } => {
                    cache.delete(&ctx, &key).unwrap();
                    model.order.retain(|k| k != &key);
                    model.store.remove(&key);
                }
            }

            prop_assert!(cache.len() <= capacity);
            let expected: Vec<String> = model.order.iter().cloned().collect();
            prop_assert_eq!(cache.keys(), expected);
            prop_assert_eq!(store.size(), model.store.len());
        }
    }

    // With distinct keys, exactly the last `capacity` writes stay cached
    // and every older key is gone from the store.
    #[test]
    fn prop_distinct_sets_keep_most_recent(
        capacity in 1usize..10,
        count in 1usize..40
    ) {
        let store = Arc::new(RecordingStorage::new());
        let cache = BoundedCache::new(capacity as i64, store.clone());
        let ctx = Context::background();

        for i in 0..count {
            cache.set(&ctx, &format!("key{i}"), format!("value{i}")).unwrap();
        }

        let kept = count.min(capacity);
        let expected: Vec<String> = (count - kept..count).rev().map(|i| format!("key{i}")).collect();
        prop_assert_eq!(cache.keys(), expected);

        for i in 0..count - kept {
            let key = format!("key{i}");
            prop_assert!(!store.contains(&key));
            prop_assert_eq!(store.delete_count(&key), 1);
        }
        prop_assert_eq!(store.size(), kept);
    }

    // Non-positive capacity never retains anything but always stores.
    #[test]
    fn prop_non_positive_capacity_stores_everything(
        capacity in -5i64..=0,
        keys in prop::collection::hash_set(key_strategy(), 1..10)
    ) {
        let store = Arc::new(RecordingStorage::new());
        let cache = BoundedCache::new(capacity, store.clone());
        let ctx = Context::background();

        for key in &keys {
            cache.set(&ctx, key, key.clone()).unwrap();
            prop_assert!(cache.is_empty());
        }
        prop_assert_eq!(store.size(), keys.len());
    }
}
