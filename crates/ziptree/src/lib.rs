//! A zip tree whose nodes are owned by the tree itself in individual heap
//! allocations, parameterized by a caller-supplied [`ordtree_core::TreeTraits`]
//! implementation for ordering, a [`ZtObserver`] for structural-change
//! notifications, and a choice of [`ZtParams`] rank source.
//!
//! See [`ZtTree::dbg_verify`] for the invariant checker used by the test
//! suite.

mod cursor;
mod dot;
mod nav;
mod node;
mod observer;
mod rank;
mod tree;
mod verify;

pub use cursor::{Cursor, ReverseCursor};
pub use dot::DumpError;
pub use node::Handle;
pub use observer::{NullObserver, ZtObserver};
pub use rank::{RankMode, ZtParams};
pub use tree::ZtTree;

#[cfg(test)]
mod tests;
