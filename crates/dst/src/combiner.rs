use crate::interval::Pos;

/// The aggregation protocol a `dst` user plugs in to compute something over
/// every point covered by the tree (or a sub-range of it) in O(log n), per
/// §4.4. Each node contributes its own boundary event (`point`, `delta`);
/// `combine` re-derives the aggregate for a subtree from its own
/// contribution plus its two children's already-correct aggregates, the
/// same "re-derive bottom-up from children" shape every tree variant's
/// `rebuild` hook expects.
pub trait Combiner {
    type Value: Clone;

    /// The aggregate of an empty range.
    fn neutral() -> Self::Value;

    /// The aggregate of a single event with no children.
    fn leaf(point: Pos, delta: f64) -> Self::Value;

    /// Re-derives this node's aggregate from its own `(point, delta)` plus
    /// its left and right children's aggregates (`None` for a missing
    /// child). `left` and `right` need not come from the node's literal
    /// tree children — [`crate::tree::DynSegTree`]'s range queries also feed
    /// `combine` a synthetic, range-filtered child aggregate.
    fn combine(left: Option<&Self::Value>, point: Pos, delta: f64, right: Option<&Self::Value>) -> Self::Value;

    /// The single headline number `get_combined::<C>()` reports.
    fn headline(value: &Self::Value) -> f64;
}

/// What [`crate::tree::DynSegTree`] is actually generic over: either a
/// single [`Combiner`], or a heterogeneous tuple of them maintained together
/// as one unit (§4.4's "combiner pack" — `rebuild` fans out to every member
/// on each structural change, so a caller can keep e.g. a [`MaxCombiner`]
/// and a [`RangedMaxCombiner`] on the same tree instead of building two
/// separate trees over the same intervals).
///
/// Every `Combiner` is trivially a pack of one via the blanket impl below,
/// so `DynSegTree<MaxCombiner>` and `DynSegTree<(MaxCombiner,
/// RangedMaxCombiner)>` share the exact same tree machinery.
pub trait CombinerPack {
    type Value: Clone;

    fn neutral() -> Self::Value;
    fn leaf(point: Pos, delta: f64) -> Self::Value;
    fn combine(left: Option<&Self::Value>, point: Pos, delta: f64, right: Option<&Self::Value>) -> Self::Value;
}

impl<T: Combiner> CombinerPack for T {
    type Value = T::Value;

    fn neutral() -> Self::Value {
        T::neutral()
    }

    fn leaf(point: Pos, delta: f64) -> Self::Value {
        T::leaf(point, delta)
    }

    fn combine(left: Option<&Self::Value>, point: Pos, delta: f64, right: Option<&Self::Value>) -> Self::Value {
        T::combine(left, point, delta, right)
    }
}

impl<A: Combiner, B: Combiner> CombinerPack for (A, B) {
    type Value = (A::Value, B::Value);

    fn neutral() -> Self::Value {
        (A::neutral(), B::neutral())
    }

    fn leaf(point: Pos, delta: f64) -> Self::Value {
        (A::leaf(point, delta), B::leaf(point, delta))
    }

    fn combine(left: Option<&Self::Value>, point: Pos, delta: f64, right: Option<&Self::Value>) -> Self::Value {
        (
            A::combine(left.map(|l| &l.0), point, delta, right.map(|r| &r.0)),
            B::combine(left.map(|l| &l.1), point, delta, right.map(|r| &r.1)),
        )
    }
}

impl<A: Combiner, B: Combiner, C: Combiner> CombinerPack for (A, B, C) {
    type Value = (A::Value, B::Value, C::Value);

    fn neutral() -> Self::Value {
        (A::neutral(), B::neutral(), C::neutral())
    }

    fn leaf(point: Pos, delta: f64) -> Self::Value {
        (A::leaf(point, delta), B::leaf(point, delta), C::leaf(point, delta))
    }

    fn combine(left: Option<&Self::Value>, point: Pos, delta: f64, right: Option<&Self::Value>) -> Self::Value {
        (
            A::combine(left.map(|l| &l.0), point, delta, right.map(|r| &r.0)),
            B::combine(left.map(|l| &l.1), point, delta, right.map(|r| &r.1)),
            C::combine(left.map(|l| &l.2), point, delta, right.map(|r| &r.2)),
        )
    }
}

/// The running stabbing-sum at every point covered by a subtree, the
/// maximum such value, the contiguous `[lo, hi)` plateau where that maximum
/// holds, and the subtree's own point-domain extremes (needed to resolve a
/// plateau's still-open upper border against whatever comes next).
///
/// This is the classic "maximum prefix sum" segment-tree augmentation
/// applied to a balanced BST of boundary events: `total` is the ordinary
/// subtree delta sum, and `best`/`best_lo`/`best_hi` track the largest
/// prefix sum attainable anywhere in the subtree's domain, exactly the way
/// a max-subarray-sum segment tree tracks its own best prefix.
#[derive(Debug, Clone)]
pub struct MaxState {
    pub total: f64,
    pub best: f64,
    pub best_lo: Pos,
    pub best_hi: Option<Pos>,
    pub min_point: Pos,
    pub max_point: Pos,
}

fn max_combine(left: Option<&MaxState>, point: Pos, delta: f64, right: Option<&MaxState>) -> MaxState {
    let l_total = left.map(|l| l.total).unwrap_or(0.0);
    let r_total = right.map(|r| r.total).unwrap_or(0.0);
    let total = l_total + delta + r_total;
    let min_point = left.map(|l| l.min_point).unwrap_or(point);
    let max_point = right.map(|r| r.max_point).unwrap_or(point);

    // Candidate A: the best prefix lies entirely inside the left subtree.
    // If its own upper border was still open (nothing to its right was
    // known when it was computed), `point` is exactly what follows it.
    let cand_a = left.map(|l| (l.best, l.best_lo, l.best_hi.or(Some(point))));

    // Candidate B: the best prefix ends exactly at this node.
    let mid_value = l_total + delta;
    let cand_b = (mid_value, point, right.map(|r| r.min_point));

    // Candidate C: the best prefix extends into the right subtree's own
    // best prefix; its borders are already fully resolved relative to its
    // own domain and remain valid unchanged.
    let cand_c = right.map(|r| (l_total + delta + r.best, r.best_lo, r.best_hi));

    let mut best = f64::NEG_INFINITY;
    let mut best_lo = point;
    let mut best_hi = None;
    if let Some((v, lo, hi)) = cand_a {
        if v > best {
            best = v;
            best_lo = lo;
            best_hi = hi;
        }
    }
    if mid_value > best {
        best = mid_value;
        best_lo = cand_b.1;
        best_hi = cand_b.2;
    }
    if let Some((v, lo, hi)) = cand_c {
        if v > best {
            best = v;
            best_lo = lo;
            best_hi = hi;
        }
    }

    MaxState { total, best, best_lo, best_hi, min_point, max_point }
}

fn max_neutral() -> MaxState {
    MaxState { total: 0.0, best: f64::NEG_INFINITY, best_lo: Pos(0.0), best_hi: None, min_point: Pos(0.0), max_point: Pos(0.0) }
}

fn max_leaf(point: Pos, delta: f64) -> MaxState {
    MaxState { total: delta, best: delta, best_lo: point, best_hi: None, min_point: point, max_point: point }
}

/// Aggregate = the maximum stabbing-sum value attained anywhere in range
/// (§4.4's "Max combiner").
pub struct MaxCombiner;

impl Combiner for MaxCombiner {
    type Value = MaxState;

    fn neutral() -> MaxState {
        max_neutral()
    }

    fn leaf(point: Pos, delta: f64) -> MaxState {
        max_leaf(point, delta)
    }

    fn combine(left: Option<&MaxState>, point: Pos, delta: f64, right: Option<&MaxState>) -> MaxState {
        max_combine(left, point, delta, right)
    }

    fn headline(value: &MaxState) -> f64 {
        value.best
    }
}

/// Aggregate = `(max, borders)`: the same maximum as [`MaxCombiner`], plus
/// the narrowest `[lo, hi)` plateau attaining it (§4.4's "Ranged-max
/// combiner"). Shares `MaxCombiner`'s computation exactly — the two
/// combiners differ only in which fields of the same augmentation a caller
/// reads back via [`crate::tree::DynSegTree::get_combiner`].
pub struct RangedMaxCombiner;

impl Combiner for RangedMaxCombiner {
    type Value = MaxState;

    fn neutral() -> MaxState {
        max_neutral()
    }

    fn leaf(point: Pos, delta: f64) -> MaxState {
        max_leaf(point, delta)
    }

    fn combine(left: Option<&MaxState>, point: Pos, delta: f64, right: Option<&MaxState>) -> MaxState {
        max_combine(left, point, delta, right)
    }

    fn headline(value: &MaxState) -> f64 {
        value.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_leaf_is_its_own_best() {
        let v = <MaxCombiner as Combiner>::leaf(Pos(1.0), 5.0);
        assert_eq!(MaxCombiner::headline(&v), 5.0);
        assert_eq!(v.best_lo, Pos(1.0));
        assert_eq!(v.best_hi, None);
    }

    #[test]
    fn combine_prefers_left_then_mid_then_right_on_ties() {
        let l = max_leaf(Pos(0.0), 10.0);
        let r = max_leaf(Pos(2.0), 10.0);
        // mid delta is 0, so left's own best (10) ties with extending into
        // right's best (0 + 0 + 10); left should win the tie.
        let combined = max_combine(Some(&l), Pos(1.0), 0.0, Some(&r));
        assert_eq!(combined.best, 10.0);
        assert_eq!(combined.best_lo, Pos(0.0));
        assert_eq!(combined.best_hi, Some(Pos(1.0)));
    }
}
