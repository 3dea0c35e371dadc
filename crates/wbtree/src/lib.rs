//! A weight-balanced (BB[α] / Adams) tree whose nodes are owned by the tree
//! itself in individual heap allocations, parameterized by a caller-supplied
//! [`ordtree_core::TreeTraits`] implementation for ordering, a [`WbObserver`]
//! for structural-change notifications, and a choice of [`WbtParams`]
//! rebalancing ratios.
//!
//! See [`WbTree::dbg_verify`] for the invariant checker used by the test
//! suite.

mod cursor;
mod dot;
mod nav;
mod node;
mod observer;
mod params;
mod tree;
mod verify;

pub use cursor::{Cursor, ReverseCursor};
pub use dot::DumpError;
pub use node::Handle;
pub use observer::{NullObserver, WbObserver};
pub use params::{PassPolicy, WbtParams};
pub use tree::WbTree;

#[cfg(test)]
mod tests;
