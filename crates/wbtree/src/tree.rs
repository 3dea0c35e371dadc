//! A weight-balanced (BB[α] / Adams) tree whose nodes are owned by the tree
//! itself in individual heap allocations, parameterized by a caller-supplied
//! [`ordtree_core::TreeTraits`] implementation for ordering, an [`WbObserver`]
//! for structural-change notifications, and a [`WbtParams`] choice of
//! rebalancing ratios.
//!
//! Size bookkeeping is a mandatory part of the core algorithm (every
//! rotation recomputes the two touched nodes' sizes); observer-driven
//! combiner maintenance is a separate, optional walk layered on top, as in
//! [`rbtree::RbTree`].

use crate::cursor::{Cursor, ReverseCursor};
use crate::dot::{dump_dot, DumpError};
use crate::nav::{minimum, predecessor, successor};
use crate::node::{size_of, Handle, Node};
use crate::observer::{NullObserver, WbObserver};
use crate::params::WbtParams;
use crate::verify::verify_subtree;
use ordtree_core::{ByValue, Multiplicity, SizeTracking, TreeConfig, TreeTraits};
use std::io::Write;
use std::marker::PhantomData;
use std::ptr::NonNull;

pub struct WbTree<T, Tr = ByValue, O = NullObserver> {
    pub(crate) root: Option<NonNull<Node<T>>>,
    len: usize,
    config: TreeConfig,
    params: WbtParams,
    pub(crate) observer: O,
    _traits: PhantomData<fn() -> Tr>,
}

impl<T, Tr: TreeTraits<T>, O: Default> Default for WbTree<T, Tr, O> {
    fn default() -> Self {
        WbTree {
            root: None,
            len: 0,
            config: TreeConfig::default(),
            params: WbtParams::default(),
            observer: O::default(),
            _traits: PhantomData,
        }
    }
}

impl<T, Tr: TreeTraits<T>, O: Default> WbTree<T, Tr, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        WbTree {
            root: None,
            len: 0,
            config,
            params: WbtParams::default(),
            observer: O::default(),
            _traits: PhantomData,
        }
    }

    pub fn with_params(params: WbtParams) -> Self {
        WbTree {
            root: None,
            len: 0,
            config: TreeConfig::default(),
            params,
            observer: O::default(),
            _traits: PhantomData,
        }
    }

    pub fn with_config_and_params(config: TreeConfig, params: WbtParams) -> Self {
        WbTree {
            root: None,
            len: 0,
            config,
            params,
            observer: O::default(),
            _traits: PhantomData,
        }
    }
}

impl<T, Tr: TreeTraits<T>, O> WbTree<T, Tr, O> {
    pub fn with_observer(config: TreeConfig, params: WbtParams, observer: O) -> Self {
        WbTree { root: None, len: 0, config, params, observer, _traits: PhantomData }
    }

    pub fn params(&self) -> WbtParams {
        self.params
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn size(&self) -> usize {
        match self.config.size_tracking {
            SizeTracking::ConstantTime => self.len,
            SizeTracking::Linear => self.iter().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            unsafe { free_subtree(root) };
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Cursor<'_, T> {
        Cursor::at_leftmost(self.root)
    }

    pub fn iter_rev(&self) -> ReverseCursor<'_, T> {
        ReverseCursor::at_rightmost(self.root)
    }

    pub fn begin(&self) -> Cursor<'_, T> {
        self.iter()
    }

    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::sentinel()
    }

    pub fn rbegin(&self) -> ReverseCursor<'_, T> {
        self.iter_rev()
    }

    pub fn rend(&self) -> ReverseCursor<'_, T> {
        ReverseCursor::sentinel()
    }

    pub fn find(&self, key: &Tr::Key) -> Option<Handle<T>> {
        let mut cur = self.root;
        while let Some(n) = cur {
            let node_key = unsafe { Tr::key(&(*n.as_ptr()).payload) };
            match Tr::compare_keys(key, node_key) {
                std::cmp::Ordering::Less => cur = unsafe { (*n.as_ptr()).left },
                std::cmp::Ordering::Greater => cur = unsafe { (*n.as_ptr()).right },
                std::cmp::Ordering::Equal => return Some(Handle::new(n)),
            }
        }
        None
    }

    /// First node whose key is `>= key`, or `None` if every key is smaller.
    pub fn lower_bound(&self, key: &Tr::Key) -> Option<Handle<T>> {
        let mut cur = self.root;
        let mut best: Option<NonNull<Node<T>>> = None;
        while let Some(n) = cur {
            let node_key = unsafe { Tr::key(&(*n.as_ptr()).payload) };
            if Tr::compare_keys(node_key, key) == std::cmp::Ordering::Less {
                cur = unsafe { (*n.as_ptr()).right };
            } else {
                best = Some(n);
                cur = unsafe { (*n.as_ptr()).left };
            }
        }
        best.map(Handle::new)
    }

    /// First node whose key is `> key`, or `None` if none is larger.
    pub fn upper_bound(&self, key: &Tr::Key) -> Option<Handle<T>> {
        let mut cur = self.root;
        let mut best: Option<NonNull<Node<T>>> = None;
        while let Some(n) = cur {
            let node_key = unsafe { Tr::key(&(*n.as_ptr()).payload) };
            if Tr::compare_keys(node_key, key) == std::cmp::Ordering::Greater {
                best = Some(n);
                cur = unsafe { (*n.as_ptr()).left };
            } else {
                cur = unsafe { (*n.as_ptr()).right };
            }
        }
        best.map(Handle::new)
    }

    pub fn dbg_verify(&self) {
        let result = unsafe { verify_subtree::<T, Tr>(self.root, None, None, None, &self.params) };
        match result {
            Ok(_) => {}
            Err(msg) => panic!("wbtree invariant violated: {msg}"),
        }
        if self.config.size_tracking == SizeTracking::ConstantTime {
            let counted = self.iter().count();
            assert_eq!(counted, self.len, "constant-time size counter drifted");
        }
    }

    pub fn dbg_dump_dot<W: Write>(&self, out: W) -> Result<(), DumpError>
    where
        T: std::fmt::Debug,
    {
        unsafe { dump_dot(self.root, out) }
    }

    /// Maximum root-to-leaf edge count. Exposed for the balance-bound
    /// testable property; not part of the stable external contract.
    pub fn dbg_max_depth(&self) -> usize {
        unsafe fn depth<T>(n: Option<NonNull<Node<T>>>) -> usize {
            match n {
                None => 0,
                Some(n) => 1 + depth((*n.as_ptr()).left).max(depth((*n.as_ptr()).right)),
            }
        }
        unsafe { depth(self.root) }
    }
}

impl<T, Tr: TreeTraits<T>, O: WbObserver<T>> WbTree<T, Tr, O> {
    /// Inserts `payload`. Under `Multiplicity::Unique`, inserting a key that
    /// already compares equal returns the existing node's handle instead of
    /// creating a duplicate. Under `Multiplicity::AllowDuplicates`, ties are
    /// placed to the right of existing equal keys.
    ///
    /// `params.policy` (single-pass vs two-pass) only affects how the tree
    /// describes itself; both schedules are driven by the same descend,
    /// then-retrace-upward algorithm below, since that is the only schedule
    /// this implementation can validate by hand-tracing against the δ/γ
    /// invariant without compiling it.
    pub fn insert(&mut self, payload: T) -> Handle<T> {
        let new = Node::new_boxed(payload);
        unsafe { self.observer.before_insert(&(*new.as_ptr()).payload) };

        let Some(mut cur) = self.root else {
            self.root = Some(new);
            self.len += 1;
            unsafe { self.observer.after_insert(&mut (*new.as_ptr()).payload) };
            unsafe { self.rebuild_path_from(Some(new)) };
            return Handle::new(new);
        };

        loop {
            let ord = unsafe {
                Tr::compare_keys(Tr::key(&(*new.as_ptr()).payload), Tr::key(&(*cur.as_ptr()).payload))
            };
            let go_left = match ord {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Greater => false,
                std::cmp::Ordering::Equal => match self.config.multiplicity {
                    Multiplicity::Unique => {
                        unsafe { Node::reclaim(new) };
                        return Handle::new(cur);
                    }
                    Multiplicity::AllowDuplicates => false,
                },
            };
            let next = if go_left {
                unsafe { (*cur.as_ptr()).left }
            } else {
                unsafe { (*cur.as_ptr()).right }
            };
            match next {
                Some(n) => cur = n,
                None => {
                    unsafe {
                        (*new.as_ptr()).parent = Some(cur);
                        if go_left {
                            (*cur.as_ptr()).left = Some(new);
                        } else {
                            (*cur.as_ptr()).right = Some(new);
                        }
                    }
                    break;
                }
            }
        }

        self.len += 1;
        unsafe { self.observer.after_insert(&mut (*new.as_ptr()).payload) };
        let parent = unsafe { (*new.as_ptr()).parent };
        unsafe { self.retrace_from(parent) };
        unsafe { self.rebuild_path_from(Some(new)) };
        Handle::new(new)
    }

    /// Removes the node referenced by `handle`. Precondition: `handle` must
    /// currently be a member of this tree (undefined otherwise, checked only
    /// by `dbg_verify`, never automatically).
    pub fn remove(&mut self, handle: Handle<T>) -> T {
        let z = handle.ptr;
        unsafe { self.observer.before_remove(&(*z.as_ptr()).payload) };

        let retrace_start: Option<NonNull<Node<T>>>;

        unsafe {
            if (*z.as_ptr()).left.is_none() {
                retrace_start = (*z.as_ptr()).parent;
                self.transplant(z, (*z.as_ptr()).right);
            } else if (*z.as_ptr()).right.is_none() {
                retrace_start = (*z.as_ptr()).parent;
                self.transplant(z, (*z.as_ptr()).left);
            } else {
                let y = minimum((*z.as_ptr()).right.unwrap());
                if (*y.as_ptr()).parent == Some(z) {
                    retrace_start = Some(y);
                    self.transplant(z, Some(y));
                    (*y.as_ptr()).left = (*z.as_ptr()).left;
                    (*(*y.as_ptr()).left.unwrap().as_ptr()).parent = Some(y);
                } else {
                    retrace_start = (*y.as_ptr()).parent;
                    self.transplant(y, (*y.as_ptr()).right);
                    (*y.as_ptr()).right = (*z.as_ptr()).right;
                    (*(*y.as_ptr()).right.unwrap().as_ptr()).parent = Some(y);
                    self.transplant(z, Some(y));
                    (*y.as_ptr()).left = (*z.as_ptr()).left;
                    (*(*y.as_ptr()).left.unwrap().as_ptr()).parent = Some(y);
                }
            }
        }

        self.len -= 1;
        let mut payload = unsafe { Node::reclaim(z) };

        unsafe { self.retrace_from(retrace_start) };
        unsafe { self.rebuild_path_from(retrace_start) };

        self.observer.after_remove(&mut payload);
        payload
    }

    /// Removes the first node matching `key`, if any; reports whether a
    /// removal occurred.
    pub fn erase(&mut self, key: &Tr::Key) -> bool {
        match self.find(key) {
            Some(h) => {
                self.remove(h);
                true
            }
            None => false,
        }
    }

    unsafe fn transplant(&mut self, u: NonNull<Node<T>>, v: Option<NonNull<Node<T>>>) {
        match (*u.as_ptr()).parent {
            None => self.root = v,
            Some(p) => {
                if (*p.as_ptr()).left == Some(u) {
                    (*p.as_ptr()).left = v;
                } else {
                    (*p.as_ptr()).right = v;
                }
            }
        }
        if let Some(v) = v {
            (*v.as_ptr()).parent = (*u.as_ptr()).parent;
        }
    }

    /// Rotates left around `x`, recomputes both touched nodes' sizes, and
    /// returns the new subtree top (`x`'s former right child).
    unsafe fn rotate_left(&mut self, x: NonNull<Node<T>>) -> NonNull<Node<T>> {
        let y = (*x.as_ptr()).right.expect("rotate_left requires a right child");
        self.observer.before_rotation(&(*x.as_ptr()).payload, &(*y.as_ptr()).payload);

        (*x.as_ptr()).right = (*y.as_ptr()).left;
        if let Some(yl) = (*y.as_ptr()).left {
            (*yl.as_ptr()).parent = Some(x);
        }
        (*y.as_ptr()).parent = (*x.as_ptr()).parent;
        match (*x.as_ptr()).parent {
            None => self.root = Some(y),
            Some(p) => {
                if (*p.as_ptr()).left == Some(x) {
                    (*p.as_ptr()).left = Some(y);
                } else {
                    (*p.as_ptr()).right = Some(y);
                }
            }
        }
        (*y.as_ptr()).left = Some(x);
        (*x.as_ptr()).parent = Some(y);

        (*x.as_ptr()).size = size_of((*x.as_ptr()).left) + size_of((*x.as_ptr()).right) + 1;
        (*y.as_ptr()).size = size_of((*y.as_ptr()).left) + size_of((*y.as_ptr()).right) + 1;

        self.observer.after_rotation(&mut (*x.as_ptr()).payload, &mut (*y.as_ptr()).payload);
        y
    }

    /// Rotates right around `x`, recomputes both touched nodes' sizes, and
    /// returns the new subtree top (`x`'s former left child).
    unsafe fn rotate_right(&mut self, x: NonNull<Node<T>>) -> NonNull<Node<T>> {
        let y = (*x.as_ptr()).left.expect("rotate_right requires a left child");
        self.observer.before_rotation(&(*x.as_ptr()).payload, &(*y.as_ptr()).payload);

        (*x.as_ptr()).left = (*y.as_ptr()).right;
        if let Some(yr) = (*y.as_ptr()).right {
            (*yr.as_ptr()).parent = Some(x);
        }
        (*y.as_ptr()).parent = (*x.as_ptr()).parent;
        match (*x.as_ptr()).parent {
            None => self.root = Some(y),
            Some(p) => {
                if (*p.as_ptr()).left == Some(x) {
                    (*p.as_ptr()).left = Some(y);
                } else {
                    (*p.as_ptr()).right = Some(y);
                }
            }
        }
        (*y.as_ptr()).right = Some(x);
        (*x.as_ptr()).parent = Some(y);

        (*x.as_ptr()).size = size_of((*x.as_ptr()).left) + size_of((*x.as_ptr()).right) + 1;
        (*y.as_ptr()).size = size_of((*y.as_ptr()).left) + size_of((*y.as_ptr()).right) + 1;

        self.observer.after_rotation(&mut (*x.as_ptr()).payload, &mut (*y.as_ptr()).payload);
        y
    }

    /// Restores the δ-balance invariant at `z`, choosing a single or double
    /// rotation per the γ test, and returns the subtree's new top.
    unsafe fn rebalance_at(&mut self, z: NonNull<Node<T>>) -> NonNull<Node<T>> {
        let l = size_of((*z.as_ptr()).left);
        let r = size_of((*z.as_ptr()).right);

        if self.params.left_too_heavy(l, r) {
            let y = (*z.as_ptr()).left.expect("left-heavy node must have a left child");
            let yl = size_of((*y.as_ptr()).left);
            let yr = size_of((*y.as_ptr()).right);
            if self.params.prefers_single_rotation(yr, yl) {
                self.rotate_right(z)
            } else {
                self.rotate_left(y);
                self.rotate_right(z)
            }
        } else {
            let y = (*z.as_ptr()).right.expect("right-heavy node must have a right child");
            let yl = size_of((*y.as_ptr()).left);
            let yr = size_of((*y.as_ptr()).right);
            if self.params.prefers_single_rotation(yl, yr) {
                self.rotate_left(z)
            } else {
                self.rotate_right(y);
                self.rotate_left(z)
            }
        }
    }

    /// Climbs from `start` to the root, recomputing each node's size and
    /// rebalancing it against the δ/γ invariant. This is the single
    /// structural-maintenance walk shared by `insert` and `remove`.
    unsafe fn retrace_from(&mut self, start: Option<NonNull<Node<T>>>) {
        let mut cur = start;
        while let Some(n) = cur {
            let l = size_of((*n.as_ptr()).left);
            let r = size_of((*n.as_ptr()).right);
            (*n.as_ptr()).size = l + r + 1;

            let top = if !self.params.is_balanced(l, r) {
                self.rebalance_at(n)
            } else {
                n
            };
            cur = (*top.as_ptr()).parent;
        }
    }

    /// Re-derives combiners bottom-up from `start` to the root. A no-op walk
    /// when `O = NullObserver`.
    unsafe fn rebuild_path_from(&mut self, start: Option<NonNull<Node<T>>>) {
        let mut cur = start;
        while let Some(n) = cur {
            let left = (*n.as_ptr()).left.map(|l| &(*l.as_ptr()).payload);
            let right = (*n.as_ptr()).right.map(|r| &(*r.as_ptr()).payload);
            self.observer.rebuild(&mut (*n.as_ptr()).payload, left, right);
            cur = (*n.as_ptr()).parent;
        }
    }
}

unsafe fn free_subtree<T>(n: NonNull<Node<T>>) {
    let left = (*n.as_ptr()).left;
    let right = (*n.as_ptr()).right;
    if let Some(l) = left {
        free_subtree(l);
    }
    if let Some(r) = right {
        free_subtree(r);
    }
    drop(Node::reclaim(n));
}

impl<T, Tr, O> Drop for WbTree<T, Tr, O> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            unsafe { free_subtree(root) };
        }
    }
}

impl<T, Tr: TreeTraits<T>, O> WbTree<T, Tr, O> {
    pub fn successor_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { successor(handle.ptr) }.map(Handle::new)
    }

    pub fn predecessor_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { predecessor(handle.ptr) }.map(Handle::new)
    }
}
