use crate::combiner::{Combiner, CombinerPack};
use crate::interval::{EventView, Interval, IntervalId, Pos};
use ordtree_core::{Multiplicity, SizeTracking, TreeConfig, TreeTraits};
use rbtree::{Handle, RbObserver, RbTree};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::marker::PhantomData;

pub(crate) struct EventNode<C: CombinerPack> {
    point: Pos,
    delta: f64,
    open: bool,
    is_start: bool,
    interval_id: IntervalId,
    subtree_sum: f64,
    combiner: C::Value,
}

pub(crate) struct EventTraits<C>(PhantomData<C>);

impl<C: CombinerPack> TreeTraits<EventNode<C>> for EventTraits<C> {
    type Key = Pos;

    fn key(value: &EventNode<C>) -> &Pos {
        &value.point
    }

    fn compare_keys(a: &Pos, b: &Pos) -> Ordering {
        a.cmp(b)
    }
}

/// Keeps `subtree_sum` (the plain stabbing-sum augmentation every point
/// query needs, regardless of which [`CombinerPack`] the caller picked) and
/// the caller's own combiner value(s) correct after every structural
/// change, via the same bottom-up `rebuild` walk `rbtree` already performs
/// for its own insert/remove.
struct CombinerObserver<C>(PhantomData<C>);

impl<C> Default for CombinerObserver<C> {
    fn default() -> Self {
        CombinerObserver(PhantomData)
    }
}

impl<C: CombinerPack> RbObserver<EventNode<C>> for CombinerObserver<C> {
    fn rebuild(&mut self, node: &mut EventNode<C>, left: Option<&EventNode<C>>, right: Option<&EventNode<C>>) {
        let l_sum = left.map(|l| l.subtree_sum).unwrap_or(0.0);
        let r_sum = right.map(|r| r.subtree_sum).unwrap_or(0.0);
        node.subtree_sum = l_sum + node.delta + r_sum;
        node.combiner = C::combine(
            left.map(|l| &l.combiner),
            node.point,
            node.delta,
            right.map(|r| &r.combiner),
        );
    }
}

type Backend<C> = RbTree<EventNode<C>, EventTraits<C>, CombinerObserver<C>>;

/// Intervals layered over an ordered tree of boundary events (§4): each
/// inserted interval becomes two events (a `+value` start and a `-value`
/// end), and [`Self::query`]/[`Self::get_combined`] read off the resulting
/// stabbing sum in O(log n) without ever materializing per-unit cells.
///
/// Generic over the aggregation performed by `get_combiner`: either a single
/// [`Combiner`] such as [`crate::MaxCombiner`], or a [`CombinerPack`] —a
/// heterogeneous tuple of combiners maintained together as one unit, so a
/// caller can keep e.g. a max combiner and a ranged-max combiner on the same
/// tree without building two trees over the same intervals. Layered
/// concretely over `rbtree::RbTree` rather than a choice of backend, since
/// all three balanced-tree crates expose the same `Handle`-based navigation
/// this module needs and the worked examples (§8) only ever exercise the
/// red-black backend.
pub struct DynSegTree<C: CombinerPack> {
    tree: Backend<C>,
    intervals: HashMap<u64, (Handle<EventNode<C>>, Handle<EventNode<C>>)>,
    next_id: u64,
}

impl<C: CombinerPack> Default for DynSegTree<C> {
    fn default() -> Self {
        DynSegTree::new()
    }
}

impl<C: CombinerPack> DynSegTree<C> {
    pub fn new() -> Self {
        let config = TreeConfig { multiplicity: Multiplicity::AllowDuplicates, size_tracking: SizeTracking::ConstantTime };
        DynSegTree { tree: RbTree::with_config(config), intervals: HashMap::new(), next_id: 0 }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Inserts an interval as a start/end event pair. Two events sharing a
    /// point (e.g. one interval's end coinciding with another's start, §8
    /// scenario (c)'s point 10) are expected and handled by
    /// `Multiplicity::AllowDuplicates`; which of the two lands left or right
    /// of the other in the tree does not affect query correctness, since
    /// each event's inclusion test depends only on its own `(point, open)`.
    pub fn insert(&mut self, interval: Interval) -> IntervalId {
        let id = IntervalId(self.next_id);
        self.next_id += 1;

        let lo = Pos(interval.lo);
        let hi = Pos(interval.hi);
        // A start event's own openness mirrors the interval's lower-border
        // openness directly. An end event's openness is the *interval's*
        // upper-border closedness (inverted): for the common half-open
        // `[lo, hi)`, the `-value` must take effect exactly at `hi` so the
        // point query at `hi` no longer counts this interval, which is the
        // "closed" (>=) threshold test, not the "open" one.
        let start = EventNode::<C> {
            point: lo,
            delta: interval.value,
            open: !interval.lo_closed,
            is_start: true,
            interval_id: id,
            subtree_sum: interval.value,
            combiner: C::leaf(lo, interval.value),
        };
        let end = EventNode::<C> {
            point: hi,
            delta: -interval.value,
            open: interval.hi_closed,
            is_start: false,
            interval_id: id,
            subtree_sum: -interval.value,
            combiner: C::leaf(hi, -interval.value),
        };

        let hs = self.tree.insert(start);
        let he = self.tree.insert(end);
        self.intervals.insert(id.0, (hs, he));
        id
    }

    /// Removes a previously inserted interval. Returns `false` if `id` is
    /// unknown (already removed, or from a different tree).
    pub fn remove(&mut self, id: IntervalId) -> bool {
        match self.intervals.remove(&id.0) {
            Some((hs, he)) => {
                self.tree.remove(hs);
                self.tree.remove(he);
                true
            }
            None => false,
        }
    }

    /// The stabbing sum at `point`: the sum of every interval's value whose
    /// border conditions currently cover `point` (§4.5).
    ///
    /// `Multiplicity::AllowDuplicates` always threads a new same-point event
    /// into the *right* subtree of an existing one (§ rbtree tie-break), so
    /// events sharing a point form a right-leaning chain rather than a flat
    /// cluster, and `open` is independently configurable per event. A node
    /// whose own point is strictly less/greater than `point` still lets us
    /// skip straight past a whole subtree (BST order guarantees every event
    /// in it compares the same way), but at an exact match we can only
    /// resolve *this* event's own inclusion and must keep walking right to
    /// find the rest of the chain.
    pub fn query(&self, point: f64) -> f64 {
        let p = Pos(point);
        let mut acc = 0.0;
        let mut cur = self.tree.root_handle();
        while let Some(h) = cur {
            let n = h.value();
            match n.point.cmp(&p) {
                Ordering::Less => {
                    let left_sum = self.tree.left_of(h).map(|l| l.value().subtree_sum).unwrap_or(0.0);
                    acc += n.delta + left_sum;
                    cur = self.tree.right_of(h);
                }
                Ordering::Greater => {
                    cur = self.tree.left_of(h);
                }
                Ordering::Equal => {
                    if !n.open {
                        acc += n.delta;
                    }
                    let left_sum = self.tree.left_of(h).map(|l| l.value().subtree_sum).unwrap_or(0.0);
                    acc += left_sum;
                    cur = self.tree.right_of(h);
                }
            }
        }
        acc
    }

    /// The whole-tree combiner value itself (gives e.g. `RangedMaxCombiner`
    /// callers access to `MaxState::best_lo`/`best_hi`, or a pack's callers
    /// each member's value via `.0`, `.1`, ...).
    pub fn get_combiner(&self) -> C::Value {
        match self.tree.root_handle() {
            Some(h) => h.value().combiner.clone(),
            None => C::neutral(),
        }
    }

    pub fn get_combiner_range(&self, lo: f64, hi: f64, lo_closed: bool, hi_closed: bool) -> C::Value {
        self.range(self.tree.root_handle(), Pos(lo), Pos(hi), lo_closed, hi_closed)
    }

    /// The combiner value of everything in this subtree whose point is
    /// `>= lo` (or `> lo` if `lo` is open). `n` and its whole left subtree
    /// are skipped in one step whenever they fall below the bound, since
    /// BST order guarantees everything there is also below it.
    fn ge(&self, node: Option<Handle<EventNode<C>>>, lo: Pos, lo_closed: bool) -> C::Value {
        let Some(h) = node else { return C::neutral() };
        let n = h.value();
        let after = if lo_closed { n.point >= lo } else { n.point > lo };
        if after {
            let left_val = self.ge(self.tree.left_of(h), lo, lo_closed);
            let right_val = self.tree.right_of(h).map(|r| r.value().combiner.clone());
            C::combine(Some(&left_val), n.point, n.delta, right_val.as_ref())
        } else {
            self.ge(self.tree.right_of(h), lo, lo_closed)
        }
    }

    /// Symmetric to [`Self::ge`]: everything in this subtree whose point is
    /// `<= hi` (or `< hi` if `hi` is open).
    fn le(&self, node: Option<Handle<EventNode<C>>>, hi: Pos, hi_closed: bool) -> C::Value {
        let Some(h) = node else { return C::neutral() };
        let n = h.value();
        let before = if hi_closed { n.point <= hi } else { n.point < hi };
        if before {
            let left_val = self.tree.left_of(h).map(|l| l.value().combiner.clone());
            let right_val = self.le(self.tree.right_of(h), hi, hi_closed);
            C::combine(left_val.as_ref(), n.point, n.delta, Some(&right_val))
        } else {
            self.le(self.tree.left_of(h), hi, hi_closed)
        }
    }

    /// The standard augmented-BST range decomposition: once a node's own
    /// point falls inside `[lo, hi)`, its left subtree only needs the
    /// lower-bound filter (everything in it is already `< hi`) and its
    /// right subtree only needs the upper-bound filter, which is exactly
    /// what `ge`/`le` compute.
    fn range(&self, node: Option<Handle<EventNode<C>>>, lo: Pos, hi: Pos, lo_closed: bool, hi_closed: bool) -> C::Value {
        let Some(h) = node else { return C::neutral() };
        let n = h.value();
        let after_lo = if lo_closed { n.point >= lo } else { n.point > lo };
        let before_hi = if hi_closed { n.point <= hi } else { n.point < hi };
        if !after_lo {
            self.range(self.tree.right_of(h), lo, hi, lo_closed, hi_closed)
        } else if !before_hi {
            self.range(self.tree.left_of(h), lo, hi, lo_closed, hi_closed)
        } else {
            let left_val = self.ge(self.tree.left_of(h), lo, lo_closed);
            let right_val = self.le(self.tree.right_of(h), hi, hi_closed);
            C::combine(Some(&left_val), n.point, n.delta, Some(&right_val))
        }
    }

    /// Every boundary event in ascending point order (§4.5).
    pub fn iter_events(&self) -> impl Iterator<Item = EventView> + '_ {
        self.tree.iter().map(|n| EventView {
            point: n.point.0,
            is_start: n.is_start,
            open: n.open,
            interval_id: n.interval_id,
        })
    }

    pub fn dbg_verify(&self) {
        self.tree.dbg_verify();
    }
}

/// Single-headline-number accessors: only meaningful when `C` is one
/// concrete [`Combiner`] rather than a multi-member [`CombinerPack`], since
/// a pack's value is heterogeneous and has no single `headline` to report.
/// Callers using a pack read each member's value off `get_combiner()`
/// directly and call that member's own `Combiner::headline`.
impl<C: Combiner> DynSegTree<C> {
    /// The whole-tree combined aggregate, O(1) (§4.4).
    pub fn get_combined(&self) -> f64 {
        C::headline(&self.get_combiner())
    }

    /// The combined aggregate restricted to `[lo, hi)` (or another
    /// closedness per `lo_closed`/`hi_closed`), O(log n) (§4.4).
    pub fn get_combined_range(&self, lo: f64, hi: f64, lo_closed: bool, hi_closed: bool) -> f64 {
        C::headline(&self.get_combiner_range(lo, hi, lo_closed, hi_closed))
    }
}
