use crate::{Combiner, DynSegTree, Interval, MaxCombiner, RangedMaxCombiner};

#[test]
fn empty_tree_has_neutral_aggregate() {
    let t: DynSegTree<MaxCombiner> = DynSegTree::new();
    assert!(t.is_empty());
    assert_eq!(t.query(0.0), 0.0);
    assert!(t.get_combined() < 0.0); // NEG_INFINITY: no data to be maximum of
}

#[test]
fn single_interval_point_queries() {
    let mut t: DynSegTree<MaxCombiner> = DynSegTree::new();
    t.insert(Interval::half_open(0.0, 10.0, 1.0));
    t.dbg_verify();
    assert_eq!(t.query(-1.0), 0.0);
    assert_eq!(t.query(0.0), 1.0);
    assert_eq!(t.query(5.0), 1.0);
    assert_eq!(t.query(10.0), 0.0); // half-open: hi excluded
}

/// §8 scenario (c): a DST over the red-black backend with a max combiner,
/// four overlapping half-open intervals, and a battery of point queries.
#[test]
fn scenario_max_combiner_point_queries() {
    let mut t: DynSegTree<MaxCombiner> = DynSegTree::new();
    t.insert(Interval::half_open(0.0, 10.0, 1.0));
    t.insert(Interval::half_open(0.5, 10.0, 2.0));
    t.insert(Interval::half_open(10.0, 15.0, 3.0));
    t.insert(Interval::half_open(12.0, 20.0, 8.0));
    t.dbg_verify();

    assert_eq!(t.query(0.0), 1.0);
    assert_eq!(t.query(0.5), 3.0);
    assert_eq!(t.query(5.0), 3.0);
    assert_eq!(t.query(10.0), 3.0);
    assert_eq!(t.query(14.0), 11.0);
    assert_eq!(t.query(15.0), 8.0);
    assert_eq!(t.query(20.0), 0.0);
}

/// §8 scenario (d): the same intervals, queried through a ranged-max
/// combiner for whole-tree and range-restricted aggregates.
#[test]
fn scenario_ranged_max_combiner_whole_tree() {
    let mut t: DynSegTree<RangedMaxCombiner> = DynSegTree::new();
    t.insert(Interval::half_open(0.0, 10.0, 1.0));
    t.insert(Interval::half_open(0.5, 10.0, 2.0));
    t.insert(Interval::half_open(10.0, 15.0, 3.0));
    t.insert(Interval::half_open(12.0, 20.0, 8.0));
    t.dbg_verify();

    let whole = t.get_combiner();
    assert_eq!(whole.best, 11.0);
    assert_eq!(whole.best_lo.0, 12.0);
    assert_eq!(whole.best_hi.map(|p| p.0), Some(15.0));
}

#[test]
fn scenario_ranged_max_combiner_restricted_ranges() {
    let mut t: DynSegTree<RangedMaxCombiner> = DynSegTree::new();
    t.insert(Interval::half_open(0.0, 10.0, 1.0));
    t.insert(Interval::half_open(0.5, 10.0, 2.0));
    t.insert(Interval::half_open(10.0, 15.0, 3.0));
    t.insert(Interval::half_open(12.0, 20.0, 8.0));

    let restricted = t.get_combiner_range(0.0, 10.0, true, false);
    assert_eq!(restricted.best, 3.0);
    assert_eq!(restricted.best_lo.0, 0.5);
    assert_eq!(restricted.best_hi.map(|p| p.0), Some(10.0));

    assert_eq!(t.get_combined_range(10.0, 12.0, true, true), 11.0);
}

#[test]
fn remove_retracts_interval_contribution() {
    let mut t: DynSegTree<MaxCombiner> = DynSegTree::new();
    let a = t.insert(Interval::half_open(0.0, 10.0, 1.0));
    let _b = t.insert(Interval::half_open(5.0, 15.0, 4.0));
    t.dbg_verify();
    assert_eq!(t.query(7.0), 5.0);

    assert!(t.remove(a));
    t.dbg_verify();
    assert_eq!(t.query(7.0), 4.0);
    assert_eq!(t.len(), 1);

    assert!(!t.remove(a));
}

#[test]
fn closed_upper_border_includes_endpoint() {
    let mut t: DynSegTree<MaxCombiner> = DynSegTree::new();
    t.insert(Interval::closed(0.0, 10.0, 1.0));
    t.dbg_verify();
    assert_eq!(t.query(10.0), 1.0);
    assert_eq!(t.query(10.0001), 0.0);
}

/// A `CombinerPack` tuple keeps two independent combiners on the same tree,
/// rebuilt together on every insert/remove, instead of duplicating the
/// intervals into two separate trees.
#[test]
fn combiner_pack_maintains_both_members_together() {
    let mut t: DynSegTree<(MaxCombiner, RangedMaxCombiner)> = DynSegTree::new();
    t.insert(Interval::half_open(0.0, 10.0, 1.0));
    t.insert(Interval::half_open(0.5, 10.0, 2.0));
    t.insert(Interval::half_open(10.0, 15.0, 3.0));
    t.insert(Interval::half_open(12.0, 20.0, 8.0));
    t.dbg_verify();

    let (max, ranged) = t.get_combiner();
    assert_eq!(MaxCombiner::headline(&max), 11.0);
    assert_eq!(RangedMaxCombiner::headline(&ranged), 11.0);
    assert_eq!(ranged.best_lo.0, 12.0);
    assert_eq!(ranged.best_hi.map(|p| p.0), Some(15.0));
}

#[test]
fn iter_events_reports_every_boundary_in_order() {
    let mut t: DynSegTree<MaxCombiner> = DynSegTree::new();
    t.insert(Interval::half_open(0.0, 10.0, 1.0));
    t.insert(Interval::half_open(5.0, 8.0, 2.0));
    let points: Vec<f64> = t.iter_events().map(|e| e.point).collect();
    assert_eq!(points, vec![0.0, 5.0, 8.0, 10.0]);
    let starts: Vec<bool> = t.iter_events().map(|e| e.is_start).collect();
    assert_eq!(starts, vec![true, true, false, false]);
}
