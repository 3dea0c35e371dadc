use crate::nav::{maximum, minimum, predecessor, successor};
use crate::node::Node;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Forward in-order iterator over a [`crate::RbTree`]. Produced by
/// `RbTree::iter`/`RbTree::begin`.
pub struct Cursor<'a, T> {
    pub(crate) node: Option<NonNull<Node<T>>>,
    pub(crate) marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn at_leftmost(root: Option<NonNull<Node<T>>>) -> Self {
        let node = root.map(|r| unsafe { minimum(r) });
        Cursor { node, marker: PhantomData }
    }

    pub(crate) fn sentinel() -> Self {
        Cursor { node: None, marker: PhantomData }
    }

    /// The node currently referenced, or `None` at end-of-iteration.
    pub fn get(&self) -> Option<&'a T> {
        self.node.map(|n| unsafe { &(*n.as_ptr()).payload })
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.node?;
        self.node = unsafe { successor(cur) };
        Some(unsafe { &(*cur.as_ptr()).payload })
    }
}

/// Reverse in-order iterator. Produced by `RbTree::iter_rev`/`RbTree::rbegin`.
pub struct ReverseCursor<'a, T> {
    pub(crate) node: Option<NonNull<Node<T>>>,
    pub(crate) marker: PhantomData<&'a T>,
}

impl<'a, T> ReverseCursor<'a, T> {
    pub(crate) fn at_rightmost(root: Option<NonNull<Node<T>>>) -> Self {
        let node = root.map(|r| unsafe { maximum(r) });
        ReverseCursor { node, marker: PhantomData }
    }

    pub(crate) fn sentinel() -> Self {
        ReverseCursor { node: None, marker: PhantomData }
    }

    pub fn get(&self) -> Option<&'a T> {
        self.node.map(|n| unsafe { &(*n.as_ptr()).payload })
    }
}

impl<'a, T> Iterator for ReverseCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.node?;
        self.node = unsafe { predecessor(cur) };
        Some(unsafe { &(*cur.as_ptr()).payload })
    }
}
