use crate::{NullObserver, ZtParams, ZtTree};
use ordtree_core::{ByValue, Multiplicity, SizeTracking, TreeConfig};

type Tree = ZtTree<i32, ByValue, NullObserver>;

#[test]
fn empty_tree_is_empty() {
    let t = Tree::new();
    assert!(t.is_empty());
    assert_eq!(t.size(), 0);
    t.dbg_verify();
}

#[test]
fn insert_and_find() {
    let mut t: Tree = ZtTree::with_seed(TreeConfig::default(), ZtParams::random(8), 42);
    for v in [5, 3, 7, 1, 4, 6, 8] {
        t.insert(v);
        t.dbg_verify();
    }
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 6, 7, 8]);
    for v in [5, 3, 7, 1, 4, 6, 8] {
        assert!(t.find(&v).is_some());
    }
    assert!(t.find(&100).is_none());
}

/// §4.3/§8 scenario: hashed ranks with coefficient 3445358421, 8-bit rank.
/// Insert [10, 20, 30, 40, 50], remove 30, check membership and invariants.
#[test]
fn scenario_hashed_rank_insert_then_remove() {
    let params = ZtParams::hashed(3445358421, 1 << 30, 8);
    let mut t: Tree = ZtTree::with_seed(TreeConfig::default(), params, 0);
    let handles: Vec<_> = [10, 20, 30, 40, 50].into_iter().map(|v| t.insert(v)).collect();
    t.dbg_verify();
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30, 40, 50]);

    let h30 = handles[2];
    t.remove(h30);
    t.dbg_verify();

    assert!(t.find(&30).is_none());
    assert!(t.find(&20).is_some());
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![10, 20, 40, 50]);
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
    let mut t: Tree = ZtTree::with_seed(
        TreeConfig { multiplicity: Multiplicity::AllowDuplicates, size_tracking: SizeTracking::ConstantTime },
        ZtParams::default(),
        3,
    );
    t.insert(1);
    t.insert(1);
    t.insert(1);
    t.dbg_verify();
    assert_eq!(t.size(), 3);
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 1, 1]);
}

#[test]
fn erase_reduces_multiplicity_by_one() {
    let mut t: Tree = ZtTree::with_seed(
        TreeConfig { multiplicity: Multiplicity::AllowDuplicates, size_tracking: SizeTracking::ConstantTime },
        ZtParams::default(),
        4,
    );
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
    let mut t: Tree = ZtTree::with_seed(TreeConfig::default(), ZtParams::default(), 9);
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
    let mut t: Tree = ZtTree::with_seed(TreeConfig::default(), ZtParams::default(), 5);
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
    let mut t: Tree = ZtTree::with_seed(TreeConfig::default(), ZtParams::default(), 99);
    let mut handles = Vec::new();
    for v in 1..=512 {
        handles.push((v, t.insert(v)));
        if v % 64 == 0 {
            t.dbg_verify();
        }
    }
    t.dbg_verify();
    assert_eq!(t.size(), 512);

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
fn clear_empties_tree() {
    let mut t: Tree = ZtTree::with_seed(TreeConfig::default(), ZtParams::default(), 1);
    for v in 0..50 {
        t.insert(v);
    }
    t.clear();
    assert!(t.is_empty());
    t.dbg_verify();
}

#[test]
fn dot_dump_succeeds() {
    let mut t: Tree = ZtTree::with_seed(TreeConfig::default(), ZtParams::default(), 1);
    for v in [2, 1, 3] {
        t.insert(v);
    }
    let mut buf = Vec::new();
    t.dbg_dump_dot(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("digraph ziptree"));
}
