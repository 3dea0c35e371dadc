use rand::prelude::*;
use std::collections::BTreeSet;
use wbtree::{NullObserver, WbTree, WbtParams};

type Tree = WbTree<i32, ordtree_core::ByValue, NullObserver>;

/// Hand-rolled randomized fuzzer in the style of `content-tree`'s own
/// `tests/fuzzer.rs`: drive a tree and a `BTreeSet` oracle through the same
/// sequence of inserts/removes under a skewed (Zipf-ish) key distribution
/// and cross-check membership, in-order sortedness and the balance bound
/// after every checkpoint.
#[test]
fn fuzz_against_btreeset_oracle_with_skewed_keys() {
    let mut rng = SmallRng::seed_from_u64(0xA5A5_1234);
    let mut tree: Tree = WbTree::with_params(WbtParams::balanced());
    let mut oracle: BTreeSet<i32> = BTreeSet::new();
    let mut handles = std::collections::HashMap::new();

    for step in 0..5000 {
        // A handful of hot keys get picked disproportionately often,
        // mimicking a Zipf-distributed workload without pulling in a
        // dedicated distribution crate.
        let v = if rng.gen_bool(0.7) {
            rng.gen_range(0..10)
        } else {
            rng.gen_range(0..500)
        };

        if rng.gen_bool(0.6) {
            if !oracle.contains(&v) {
                let h = tree.insert(v);
                handles.insert(v, h);
                oracle.insert(v);
            }
        } else if oracle.remove(&v) {
            if let Some(h) = handles.remove(&v) {
                tree.remove(h);
            }
        }

        if step % 200 == 0 {
            tree.dbg_verify();
            let n = oracle.len();
            if n > 0 {
                let bound = 2.0 * ((n + 1) as f64).log2();
                assert!(
                    (tree.dbg_max_depth() as f64) <= bound + 2.0,
                    "depth {} exceeds bound {} at n={}",
                    tree.dbg_max_depth(),
                    bound,
                    n
                );
            }
        }
    }

    tree.dbg_verify();
    let collected: Vec<_> = tree.iter().copied().collect();
    let expected: Vec<_> = oracle.iter().copied().collect();
    assert_eq!(collected, expected);
}

#[test]
fn round_trip_insert_then_remove_all() {
    let mut rng = SmallRng::seed_from_u64(11);
    let mut tree: Tree = Tree::new();
    let mut values: Vec<i32> = (0..2000).collect();
    values.shuffle(&mut rng);

    let mut handles = Vec::new();
    for &v in &values {
        handles.push(tree.insert(v));
    }
    tree.dbg_verify();
    assert_eq!(tree.size(), 2000);

    handles.shuffle(&mut rng);
    for h in handles {
        tree.remove(h);
    }
    tree.dbg_verify();
    assert!(tree.is_empty());
}

#[test]
fn every_preset_survives_insert_remove_round_trip() {
    for params in [
        WbtParams::lai_wood_3_1(),
        WbtParams::lai_wood_4_3(),
        WbtParams::balanced(),
        WbtParams::super_balanced(),
        WbtParams::integral(),
    ] {
        let mut rng = SmallRng::seed_from_u64(params.delta_num * 1000 + params.gamma_num);
        let mut tree: Tree = WbTree::with_params(params);
        let mut values: Vec<i32> = (0..800).collect();
        values.shuffle(&mut rng);
        let mut handles = Vec::new();
        for &v in &values {
            handles.push(tree.insert(v));
        }
        tree.dbg_verify();
        handles.shuffle(&mut rng);
        for h in handles {
            tree.remove(h);
        }
        tree.dbg_verify();
        assert!(tree.is_empty());
    }
}
