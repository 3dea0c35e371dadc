use crate::{NullObserver, WbTree, WbtParams};
use ordtree_core::{ByValue, Multiplicity, SizeTracking, TreeConfig};

type Tree = WbTree<i32, ByValue, NullObserver>;

#[test]
fn empty_tree_is_empty() {
    let t = Tree::new();
    assert!(t.is_empty());
    assert_eq!(t.size(), 0);
    t.dbg_verify();
}

#[test]
fn insert_and_find() {
    let mut t = Tree::new();
    for v in [5, 3, 7, 1, 4, 6, 8] {
        t.insert(v);
    }
    t.dbg_verify();
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 6, 7, 8]);
    for v in [5, 3, 7, 1, 4, 6, 8] {
        assert!(t.find(&v).is_some());
    }
    assert!(t.find(&100).is_none());
}

/// Small deterministic scenario: δ=2, γ=3/2, two-pass, insert
/// [5,3,7,1,4,6,8], expect in-order [1,3,4,5,6,7,8] with depth <= 3.
#[test]
fn scenario_small_insert_stays_shallow() {
    let mut t: WbTree<i32, ByValue, NullObserver> = WbTree::with_params(WbtParams::balanced());
    for v in [5, 3, 7, 1, 4, 6, 8] {
        t.insert(v);
        t.dbg_verify();
    }
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 6, 7, 8]);
    assert!(t.dbg_max_depth() <= 3, "depth {} exceeds 3", t.dbg_max_depth());
}

#[test]
fn unique_multiplicity_rejects_duplicate() {
    let mut t = Tree::new();
    let h1 = t.insert(1);
    let h2 = t.insert(1);
    assert_eq!(h1, h2);
    assert_eq!(t.size(), 1);
}

#[test]
fn allow_duplicates_keeps_both_and_orders_ties_right() {
    let mut t: WbTree<i32, ByValue, NullObserver> = WbTree::with_config(TreeConfig {
        multiplicity: Multiplicity::AllowDuplicates,
        size_tracking: SizeTracking::ConstantTime,
    });
    t.insert(1);
    t.insert(1);
    t.insert(1);
    t.dbg_verify();
    assert_eq!(t.size(), 3);
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 1, 1]);
}

#[test]
fn erase_reduces_multiplicity_by_one() {
    let mut t: WbTree<i32, ByValue, NullObserver> = WbTree::with_config(TreeConfig {
        multiplicity: Multiplicity::AllowDuplicates,
        size_tracking: SizeTracking::ConstantTime,
    });
    t.insert(1);
    t.insert(1);
    assert!(t.erase(&1));
    assert_eq!(t.size(), 1);
    assert!(t.erase(&1));
    assert_eq!(t.size(), 0);
    assert!(!t.erase(&1));
}

#[test]
fn remove_returns_payload_and_unlinks() {
    let mut t = Tree::new();
    let h = t.insert(42);
    t.insert(1);
    t.insert(100);
    let v = t.remove(h);
    assert_eq!(v, 42);
    t.dbg_verify();
    assert!(t.find(&42).is_none());
}

#[test]
fn lower_upper_bound() {
    let mut t = Tree::new();
    for v in [10, 20, 30, 40] {
        t.insert(v);
    }
    assert_eq!(t.lower_bound(&25).map(|h| *h.value()), Some(30));
    assert_eq!(t.upper_bound(&30).map(|h| *h.value()), Some(40));
    assert_eq!(t.lower_bound(&10).map(|h| *h.value()), Some(10));
    assert_eq!(t.upper_bound(&40), None);
}

#[test]
fn sequential_insert_then_reverse_remove() {
    let mut t = Tree::new();
    let mut handles = Vec::new();
    for v in 1..=1024 {
        handles.push((v, t.insert(v)));
        if v % 64 == 0 {
            t.dbg_verify();
        }
    }
    t.dbg_verify();
    assert_eq!(t.size(), 1024);

    for (i, (_, h)) in handles.into_iter().enumerate().rev() {
        t.remove(h);
        if i % 64 == 0 {
            t.dbg_verify();
        }
    }
    t.dbg_verify();
    assert!(t.is_empty());
}

#[test]
fn all_presets_keep_tree_balanced_after_many_inserts() {
    for params in [
        WbtParams::lai_wood_3_1(),
        WbtParams::lai_wood_4_3(),
        WbtParams::balanced(),
        WbtParams::super_balanced(),
        WbtParams::integral(),
    ] {
        let mut t: WbTree<i32, ByValue, NullObserver> = WbTree::with_params(params);
        for v in 0..500 {
            t.insert(v);
        }
        t.dbg_verify();
        assert_eq!(t.size(), 500);
    }
}

#[test]
fn clear_empties_tree() {
    let mut t = Tree::new();
    for v in 0..50 {
        t.insert(v);
    }
    t.clear();
    assert!(t.is_empty());
    t.dbg_verify();
}

#[test]
fn dot_dump_succeeds() {
    let mut t = Tree::new();
    for v in [2, 1, 3] {
        t.insert(v);
    }
    let mut buf = Vec::new();
    t.dbg_dump_dot(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("digraph wbtree"));
}
