use std::collections::BTreeMap;

use bptree::{BPTreeMap, Error, InsertOutcome};
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates random keys in a range small enough to force collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -5_000i64..5_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64),
    Get(i64),
    ContainsKey(i64),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => key_strategy().prop_map(MapOp::Insert),
        3 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
    ]
}

// ─── Model-based comparison against std BTreeMap ─────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Replays a random insert/lookup sequence on both BPTreeMap and
    /// BTreeMap and asserts identical observable results at every step.
    ///
    /// Values mirror keys, under which the duplicate probe degenerates to
    /// exact re-insert detection and the two maps agree entry for entry.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut bp_map: BPTreeMap<i64, i64> = BPTreeMap::with_order(5).unwrap();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k) => {
                    let outcome = bp_map.insert(*k, *k);
                    let existed = bt_map.insert(*k, *k).is_some();
                    prop_assert_eq!(outcome.is_duplicate(), existed, "insert({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(bp_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(bp_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
            }
            prop_assert_eq!(bp_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(bp_map.is_empty(), bt_map.is_empty());
        }
    }

    /// Inserting the same unique entry set in any order yields identical
    /// lookup results, whatever internal shape each order produced.
    #[test]
    fn insertion_order_does_not_change_lookups(
        order in 3_usize..=6,
        keys in proptest::collection::btree_set(-1_000i64..1_000, 1..120),
        seed in any::<u64>(),
    ) {
        let sorted: Vec<i64> = keys.into_iter().collect();

        // A cheap deterministic shuffle keyed off the seed.
        let mut shuffled = sorted.clone();
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            #[allow(clippy::cast_possible_truncation)]
            let j = (state % (i as u64 + 1)) as usize;
            shuffled.swap(i, j);
        }

        let mut forward = BPTreeMap::with_order(order).unwrap();
        let mut permuted = BPTreeMap::with_order(order).unwrap();
        for &key in &sorted {
            forward.insert(key, key * 3);
        }
        for &key in &shuffled {
            permuted.insert(key, key * 3);
        }

        prop_assert_eq!(forward.len(), permuted.len());
        for &key in &sorted {
            prop_assert_eq!(forward.get(&key), Some(&(key * 3)));
            prop_assert_eq!(forward.get(&key), permuted.get(&key));
        }
    }
}

// ─── Construction ────────────────────────────────────────────────────────────

#[test]
fn construction_rejects_orders_below_three() {
    assert!(matches!(BPTreeMap::<i64, i64>::with_order(0), Err(Error::InvalidOrder(0))));
    assert!(matches!(BPTreeMap::<i64, i64>::with_order(2), Err(Error::InvalidOrder(2))));
    assert!(BPTreeMap::<i64, i64>::with_order(3).is_ok());
}

#[test]
fn empty_tree_reports_not_found() {
    let index: BPTreeMap<i64, i64> = BPTreeMap::with_order(3).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.height(), 0);
    assert_eq!(index.get(&1), None);
}

// ─── Root emergence ──────────────────────────────────────────────────────────

#[test]
fn root_splits_into_internal_root_with_two_children() {
    for order in [3_usize, 4, 5] {
        let mut index = BPTreeMap::with_order(order).unwrap();

        // The root leaf absorbs `order - 1` entries without splitting.
        for key in 0..(order as i64 - 1) {
            index.insert(key, key);
            assert_eq!(index.height(), 1, "order {order}: premature split");
        }

        // One more forces the first split: an internal root with a single
        // separator over two leaves, i.e. exactly two downward edges.
        index.insert(order as i64 - 1, order as i64 - 1);
        assert_eq!(index.height(), 2, "order {order}: root did not split");
        assert_eq!(index.to_dot().structure.matches(" -> ").count(), 2);
    }
}

// ─── Concrete scenario from the classic textbook sequence ────────────────────

#[test]
fn classic_order_three_scenario() {
    let keys = [10_i64, 20, 5, 6, 12, 30, 7, 17];
    let mut index = BPTreeMap::with_order(3).unwrap();

    for (i, &key) in keys.iter().enumerate() {
        assert!(!index.insert(key, key * 10).is_duplicate());
        if i == 3 {
            // By the 4th insertion at least one leaf has split.
            assert!(index.height() > 1);
        }
    }

    for &key in &keys {
        assert_eq!(index.get(&key), Some(&(key * 10)));
    }
    assert_eq!(index.get(&99), None);
    assert_eq!(index.len(), keys.len());
}

// ─── Duplicate handling ──────────────────────────────────────────────────────

#[test]
fn exact_reinsert_is_rejected_without_mutation() {
    let mut index = BPTreeMap::with_order(3).unwrap();
    let first = index.insert(5, 100);
    let second = index.insert(5, 100);

    assert!(!first.is_duplicate());
    assert!(matches!(second, InsertOutcome::Duplicate(_)));
    assert_eq!(second.node(), first.node());
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(&5), Some(&100));
}

#[test]
fn duplicate_probe_matches_value_not_key() {
    let mut index = BPTreeMap::with_order(4).unwrap();
    index.insert(10, 7);

    // Key 5 is absent, but the entry at its insertion position carries the
    // inserted value, so the probe rejects it anyway.
    assert!(index.insert(5, 7).is_duplicate());
    assert_eq!(index.get(&5), None);
    assert_eq!(index.len(), 1);

    // A value the resident entry does not carry goes in fine.
    assert!(!index.insert(5, 8).is_duplicate());
    assert_eq!(index.get(&5), Some(&8));
}

#[test]
fn reinsert_with_new_value_shadows_old() {
    let mut index = BPTreeMap::with_order(4).unwrap();
    index.insert(5, 100);

    // A differing value passes the probe; the newer entry sits first in
    // key order and wins every subsequent lookup.
    assert!(!index.insert(5, 200).is_duplicate());
    assert_eq!(index.len(), 2);
    assert_eq!(index.get(&5), Some(&200));
}

// ─── Rebuild round-trip ──────────────────────────────────────────────────────

#[test]
fn rebuild_from_same_sequence_is_equivalent() {
    let keys = [26_i64, 19, 10, 37, 3, 6, 8, 18, 13, 25, 23, 29, 30, 38, 35, 40, 31, 51, 55];

    let mut original = BPTreeMap::with_order(5).unwrap();
    for &key in &keys {
        original.insert(key, key);
    }
    // Export the topology, then discard it and rebuild from scratch.
    let _ = original.to_dot();

    let mut rebuilt = BPTreeMap::with_order(5).unwrap();
    for &key in &keys {
        rebuilt.insert(key, key);
    }

    assert_eq!(original.len(), rebuilt.len());
    assert_eq!(original.height(), rebuilt.height());
    for &key in &keys {
        assert_eq!(original.get(&key), rebuilt.get(&key));
    }
    assert_eq!(original.get(&1_000), rebuilt.get(&1_000));
}
