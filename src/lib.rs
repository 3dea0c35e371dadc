//! Three intrusive-style balanced search trees and a dynamic segment tree
//! layered on top of them.
//!
//! - [`rbtree`]: a red-black tree.
//! - [`wbtree`]: a weight-balanced (BB[α] / Adams) tree, with a choice of
//!   δ/γ parameter presets.
//! - [`ziptree`]: a randomized (or deterministically hash-ranked) zip tree.
//! - [`dst`]: intervals stored as boundary events in an ordered tree, with
//!   pluggable combiners (`dst::MaxCombiner`, `dst::RangedMaxCombiner`) for
//!   O(log n) range aggregation.
//!
//! All three tree crates share [`ordtree_core`]'s `TreeTraits`/`TreeConfig`
//! contract, so the same key-extraction and duplicate-handling rules apply
//! uniformly regardless of which balancing algorithm is chosen.

pub use dst;
pub use ordtree_core;
pub use rbtree;
pub use wbtree;
pub use ziptree;
