use dst::{DynSegTree, Interval, IntervalId, MaxCombiner};
use rand::prelude::*;

/// Drives a `DynSegTree` and a brute-force `Vec<Interval>` oracle through the
/// same sequence of interval inserts/removes and cross-checks point queries
/// and the whole-tree max aggregate after every step, in the style of the
/// other crates' `BTreeSet`-oracle fuzzers.
#[test]
fn fuzz_against_brute_force_oracle() {
    let mut rng = SmallRng::seed_from_u64(0x5EED_D57A);
    let mut tree: DynSegTree<MaxCombiner> = DynSegTree::new();
    let mut oracle: Vec<(f64, f64, bool, bool, f64)> = Vec::new();
    let mut live: Vec<(IntervalId, usize)> = Vec::new();

    for step in 0..2000 {
        if live.is_empty() || rng.gen_bool(0.65) {
            let lo = (rng.gen_range(0..50) as f64) / 2.0;
            let width = (rng.gen_range(1..20) as f64) / 2.0;
            let hi = lo + width;
            let value = rng.gen_range(1..10) as f64;
            let lo_closed = rng.gen_bool(0.5);
            let hi_closed = rng.gen_bool(0.5);
            let id = tree.insert(Interval { lo, hi, lo_closed, hi_closed, value });
            oracle.push((lo, hi, lo_closed, hi_closed, value));
            live.push((id, oracle.len() - 1));
        } else {
            let idx = rng.gen_range(0..live.len());
            let (id, oracle_idx) = live.remove(idx);
            assert!(tree.remove(id));
            oracle[oracle_idx].4 = 0.0; // zero out instead of shifting indices
        }

        if step % 50 == 0 {
            tree.dbg_verify();
            for _ in 0..10 {
                let p = (rng.gen_range(0..60) as f64) / 2.0;
                let expected: f64 = oracle
                    .iter()
                    .filter(|(lo, hi, lo_closed, hi_closed, _)| {
                        let after_lo = if *lo_closed { p >= *lo } else { p > *lo };
                        let before_hi = if *hi_closed { p <= *hi } else { p < *hi };
                        after_lo && before_hi
                    })
                    .map(|(_, _, _, _, v)| v)
                    .sum();
                assert!((tree.query(p) - expected).abs() < 1e-9, "point {p} step {step}");
            }
        }
    }
}

#[test]
fn max_combiner_matches_brute_force_sweep() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut tree: DynSegTree<MaxCombiner> = DynSegTree::new();
    let mut oracle = Vec::new();

    for _ in 0..40 {
        let lo = rng.gen_range(0..100) as f64;
        let hi = lo + rng.gen_range(1..30) as f64;
        let value = rng.gen_range(1..5) as f64;
        tree.insert(Interval::half_open(lo, hi, value));
        oracle.push((lo, hi, value));
    }
    tree.dbg_verify();

    let mut best = f64::NEG_INFINITY;
    let mut p = 0.0;
    while p <= 130.0 {
        let sum: f64 = oracle.iter().filter(|(lo, hi, _)| p >= *lo && p < *hi).map(|(_, _, v)| v).sum();
        if sum > best {
            best = sum;
        }
        p += 0.5;
    }

    assert_eq!(tree.get_combined(), best);
}
