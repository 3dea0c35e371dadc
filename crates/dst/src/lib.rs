//! A dynamic segment tree (§4): intervals represented as a pair of boundary
//! events (start/end) stored in an ordered tree, so that point queries,
//! whole-structure aggregates and range-restricted aggregates are all
//! O(log n) without ever materializing per-unit cells.
//!
//! The event ordering and combiner maintenance are layered on top of
//! `rbtree::RbTree` via its `RbObserver::rebuild` hook; see
//! [`tree::DynSegTree`] for the public surface.

mod combiner;
mod interval;
mod tree;

pub use combiner::{Combiner, CombinerPack, MaxCombiner, MaxState, RangedMaxCombiner};
pub use interval::{EventView, Interval, IntervalId};
pub use tree::DynSegTree;

#[cfg(test)]
mod tests;
