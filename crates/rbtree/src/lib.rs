//! A red-black tree whose nodes are owned by the tree itself in individual
//! heap allocations, parameterized by a caller-supplied [`ordtree_core::TreeTraits`]
//! implementation for ordering and an [`RbObserver`] for structural-change
//! notifications (used by the `dst` crate to keep combiners consistent).
//!
//! Rotations, insert-fixup and delete-fixup follow the textbook red-black
//! algorithm; see [`RbTree::dbg_verify`] for the invariant checker used by
//! the test suite.

mod cursor;
mod dot;
mod nav;
mod node;
mod observer;
mod tree;
mod verify;

pub use cursor::{Cursor, ReverseCursor};
pub use dot::DumpError;
pub use node::Handle;
pub use observer::{NullObserver, RbObserver};
pub use tree::RbTree;

#[cfg(test)]
mod tests;
