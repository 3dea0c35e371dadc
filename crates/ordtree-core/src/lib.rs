//! Shared traits and configuration record types used by every balanced-tree
//! crate in the workspace (`rbtree`, `wbtree`, `ziptree`) and by `dst`.
//!
//! None of the balancing algorithms live here — this crate is purely the
//! "traits contract" component from the system overview: how a caller tells
//! a tree how to order its payloads, and the small configuration records
//! (§6) every variant recognizes.

use std::cmp::Ordering;

/// A user-supplied total order over `T`. Trees never require `T: Ord`
/// directly so that the same payload type can be stored in multiple trees
/// under different orderings (e.g. a DST orders interval events by point,
/// then by event kind).
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural-order comparator, for payloads that already implement `Ord`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Wraps a plain `Fn(&T, &T) -> Ordering` closure as a `Comparator`.
#[derive(Clone)]
pub struct FnComparator<F>(pub F);

impl<T, F: Fn(&T, &T) -> Ordering> Comparator<T> for FnComparator<F> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

/// The "traits contract" component from the system overview: a zero-sized
/// marker type implements this once per payload type to tell a tree how to
/// pull a key out of a stored payload and how to order two keys. Every tree
/// in the workspace is generic over `Tr: TreeTraits<T>` rather than over a
/// comparator closure, so the same key-extraction logic used for ordering
/// can also be reused by `find`/`lower_bound`/`upper_bound`, which search by
/// key rather than by a full constructed payload.
pub trait TreeTraits<T> {
    /// The projection of `T` that determines its tree position. May be `T`
    /// itself (`ByValue`) or a field of it (e.g. an interval's lower point).
    type Key: ?Sized;

    fn key(value: &T) -> &Self::Key;
    fn compare_keys(a: &Self::Key, b: &Self::Key) -> Ordering;
}

/// Orders payloads directly by their own `Ord` implementation. The common
/// case for plain ordered sets/maps.
#[derive(Debug, Copy, Clone, Default)]
pub struct ByValue;

impl<T: Ord> TreeTraits<T> for ByValue {
    type Key = T;

    fn key(value: &T) -> &T {
        value
    }

    fn compare_keys(a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Whether a tree accepts more than one payload comparing equal under its
/// comparator. Corresponds to the `allow_multiple` compile-time option in §6.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Multiplicity {
    /// `insert` of a key already present is rejected (returns the existing
    /// handle instead of creating a new node).
    #[default]
    Unique,
    /// Equal keys are allowed; ties are broken by arrival order (ties are
    /// always placed to the right of existing equal keys, keeping iteration
    /// order stable, per §4.1).
    AllowDuplicates,
}

/// Whether a tree maintains an O(1) size counter. Corresponds to the
/// `constant_time_size` compile-time option in §6.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SizeTracking {
    /// `size()` walks the tree, O(n).
    Linear,
    /// `size()` reads a maintained counter, O(1).
    #[default]
    ConstantTime,
}

/// Shared, per-tree-instance configuration every variant recognizes in
/// addition to its own algorithm-specific parameters (WBT's δ/γ, ZT's rank
/// source, RB's color-compression flag).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TreeConfig {
    pub multiplicity: Multiplicity,
    pub size_tracking: SizeTracking,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            multiplicity: Multiplicity::Unique,
            size_tracking: SizeTracking::ConstantTime,
        }
    }
}

/// Direction of descent/rotation, shared vocabulary across all three
/// balancing algorithms (a left rotation pulls a node's right child up, and
/// so on).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_matches_ord() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(NaturalOrder.compare(&2, &2), Ordering::Equal);
    }

    #[test]
    fn fn_comparator_reverses() {
        let cmp = FnComparator(|a: &i32, b: &i32| b.cmp(a));
        assert_eq!(cmp.compare(&1, &2), Ordering::Greater);
    }
}
