//! A zip tree whose nodes are owned by the tree itself in individual heap
//! allocations, parameterized by a caller-supplied [`ordtree_core::TreeTraits`]
//! implementation for ordering, a [`ZtObserver`] for structural-change
//! notifications, and a [`ZtParams`] choice of rank source.
//!
//! Insert splits ("unzips") the subtree at the insertion point into two
//! spines that become the new node's children; remove merges ("zips") a
//! node's two children back into one subtree by repeatedly taking the
//! higher-ranked head.

use crate::cursor::{Cursor, ReverseCursor};
use crate::dot::{dump_dot, DumpError};
use crate::nav::{predecessor, successor};
use crate::node::{Handle, Node};
use crate::observer::{NullObserver, ZtObserver};
use crate::rank::ZtParams;
use crate::verify::verify_subtree;
use ordtree_core::{ByValue, Multiplicity, SizeTracking, TreeConfig, TreeTraits};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::hash::Hash;
use std::io::Write;
use std::marker::PhantomData;
use std::ptr::NonNull;

pub struct ZtTree<T, Tr = ByValue, O = NullObserver> {
    pub(crate) root: Option<NonNull<Node<T>>>,
    len: usize,
    config: TreeConfig,
    params: ZtParams,
    rng: SmallRng,
    pub(crate) observer: O,
    _traits: PhantomData<fn() -> Tr>,
}

impl<T, Tr: TreeTraits<T>, O: Default> Default for ZtTree<T, Tr, O> {
    fn default() -> Self {
        ZtTree {
            root: None,
            len: 0,
            config: TreeConfig::default(),
            params: ZtParams::default(),
            rng: SmallRng::from_entropy(),
            observer: O::default(),
            _traits: PhantomData,
        }
    }
}

impl<T, Tr: TreeTraits<T>, O: Default> ZtTree<T, Tr, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        ZtTree {
            root: None,
            len: 0,
            config,
            params: ZtParams::default(),
            rng: SmallRng::from_entropy(),
            observer: O::default(),
            _traits: PhantomData,
        }
    }

    pub fn with_params(params: ZtParams) -> Self {
        ZtTree {
            root: None,
            len: 0,
            config: TreeConfig::default(),
            params,
            rng: SmallRng::from_entropy(),
            observer: O::default(),
            _traits: PhantomData,
        }
    }

    /// Deterministic construction for tests: the rank source's internal RNG
    /// (used only under `RankMode::Random`; ignored under `Hashed`) is seeded
    /// explicitly instead of drawn from entropy.
    pub fn with_seed(config: TreeConfig, params: ZtParams, seed: u64) -> Self {
        ZtTree {
            root: None,
            len: 0,
            config,
            params,
            rng: SmallRng::seed_from_u64(seed),
            observer: O::default(),
            _traits: PhantomData,
        }
    }
}

impl<T, Tr: TreeTraits<T>, O> ZtTree<T, Tr, O> {
    pub fn with_observer(config: TreeConfig, params: ZtParams, seed: u64, observer: O) -> Self {
        ZtTree {
            root: None,
            len: 0,
            config,
            params,
            rng: SmallRng::seed_from_u64(seed),
            observer,
            _traits: PhantomData,
        }
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
        let result = unsafe { verify_subtree::<T, Tr>(self.root, None, None, None) };
        if let Err(msg) = result {
            panic!("ziptree invariant violated: {msg}");
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

enum Side {
    Left,
    Right,
}

impl<T: Hash, Tr: TreeTraits<T>, O: ZtObserver<T>> ZtTree<T, Tr, O> {
    /// Inserts `payload`. Descends comparing ranks first: the insertion
    /// point is the first node whose rank is `<=` the new node's rank,
    /// except that on a rank *tie* the descent only continues rightward —
    /// continuing leftward through an equal-ranked node would leave that
    /// node as a left child with a rank equal to its new parent's, which
    /// violates §3's tie-break (`left child strictly less`). Left-ward ties
    /// therefore stop immediately and hand the position to the new node,
    /// which is always legal since the new node becomes the parent.
    pub fn insert(&mut self, payload: T) -> Handle<T> {
        let rank = self.params.assign_rank(&payload, &mut self.rng);
        let new = Node::new_boxed(payload, rank);
        unsafe { self.observer.before_insert(&(*new.as_ptr()).payload) };

        let Some(mut cur) = self.root else {
            self.len += 1;
            self.root = Some(new);
            unsafe { self.observer.after_insert(&mut (*new.as_ptr()).payload) };
            unsafe { self.rebuild_path_from(Some(new)) };
            return Handle::new(new);
        };

        let mut parent: Option<NonNull<Node<T>>> = None;
        let mut parent_side = Side::Left;

        loop {
            let cur_ref = unsafe { &*cur.as_ptr() };
            let ord = unsafe { Tr::compare_keys(Tr::key(&(*new.as_ptr()).payload), Tr::key(&cur_ref.payload)) };

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

            let stop = if go_left {
                rank >= cur_ref.rank
            } else {
                rank > cur_ref.rank
            };
            let next = if go_left { cur_ref.left } else { cur_ref.right };
            // Even when the rank test says "keep descending", there may be no
            // child left on that side — the new node becomes a leaf right
            // here, same as if `stop` had been true.
            let Some(next) = (if stop { None } else { next }) else {
                break;
            };

            parent = Some(cur);
            parent_side = if go_left { Side::Left } else { Side::Right };
            cur = next;
        }

        // `cur` is the root of the subtree being split; unzip it around the
        // new key and hang the two halves off `new`.
        unsafe { self.observer.init_unzipping(&(*new.as_ptr()).payload) };
        let (left, right) = unsafe { self.unzip(cur, new) };
        unsafe {
            (*new.as_ptr()).left = left;
            (*new.as_ptr()).right = right;
            if let Some(l) = left {
                (*l.as_ptr()).parent = Some(new);
            }
            if let Some(r) = right {
                (*r.as_ptr()).parent = Some(new);
            }
        }
        unsafe { self.observer.unzip_done(&(*new.as_ptr()).payload) };

        match parent {
            None => self.root = Some(new),
            Some(p) => unsafe {
                match parent_side {
                    Side::Left => (*p.as_ptr()).left = Some(new),
                    Side::Right => (*p.as_ptr()).right = Some(new),
                }
            },
        }
        unsafe { (*new.as_ptr()).parent = parent };

        self.len += 1;
        unsafe { self.observer.after_insert(&mut (*new.as_ptr()).payload) };
        unsafe { self.rebuild_path_from(Some(new)) };
        Handle::new(new)
    }

    /// Splits the subtree rooted at `old_root` into two subtrees: every node
    /// whose key sorts before `new`'s key, and every node whose key sorts
    /// after it. Implemented as the single-loop form the design notes call
    /// out as an acceptable alternative to the three-phase unzip state
    /// machine.
    unsafe fn unzip(
        &mut self,
        old_root: NonNull<Node<T>>,
        new: NonNull<Node<T>>,
    ) -> (Option<NonNull<Node<T>>>, Option<NonNull<Node<T>>>) {
        let new_key = Tr::key(&(*new.as_ptr()).payload);

        let mut cur = Some(old_root);
        let mut left_head: Option<NonNull<Node<T>>> = None;
        let mut left_tail: Option<NonNull<Node<T>>> = None;
        let mut right_head: Option<NonNull<Node<T>>> = None;
        let mut right_tail: Option<NonNull<Node<T>>> = None;

        while let Some(n) = cur {
            let n_key = Tr::key(&(*n.as_ptr()).payload);
            // Equal keys join the left spine so that a newly inserted
            // duplicate lands to the right of any existing equal key,
            // matching the tie-break used by `rbtree`/`wbtree`.
            if Tr::compare_keys(n_key, new_key) != std::cmp::Ordering::Greater {
                self.observer.unzip_to_left(&(*n.as_ptr()).payload);
                match left_tail {
                    None => left_head = Some(n),
                    Some(t) => {
                        (*t.as_ptr()).right = Some(n);
                        (*n.as_ptr()).parent = Some(t);
                    }
                }
                left_tail = Some(n);
                cur = (*n.as_ptr()).right;
            } else {
                self.observer.unzip_to_right(&(*n.as_ptr()).payload);
                match right_tail {
                    None => right_head = Some(n),
                    Some(t) => {
                        (*t.as_ptr()).left = Some(n);
                        (*n.as_ptr()).parent = Some(t);
                    }
                }
                right_tail = Some(n);
                cur = (*n.as_ptr()).left;
            }
        }

        if let Some(t) = left_tail {
            (*t.as_ptr()).right = None;
        }
        if let Some(t) = right_tail {
            (*t.as_ptr()).left = None;
        }

        (left_head, right_head)
    }

    /// Removes the node referenced by `handle`. Precondition: `handle` must
    /// currently be a member of this tree.
    pub fn remove(&mut self, handle: Handle<T>) -> T {
        let z = handle.ptr;
        unsafe { self.observer.before_remove(&(*z.as_ptr()).payload) };

        let parent = unsafe { (*z.as_ptr()).parent };
        let left = unsafe { (*z.as_ptr()).left };
        let right = unsafe { (*z.as_ptr()).right };

        let merged = unsafe { self.zip(left, right) };
        match parent {
            None => self.root = merged,
            Some(p) => unsafe {
                if (*p.as_ptr()).left == Some(z) {
                    (*p.as_ptr()).left = merged;
                } else {
                    (*p.as_ptr()).right = merged;
                }
            },
        }
        if let Some(m) = merged {
            unsafe { (*m.as_ptr()).parent = parent };
        }

        self.len -= 1;
        let mut payload = unsafe { Node::reclaim(z) };

        unsafe { self.rebuild_path_from(merged.or(parent)) };
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

    /// Merges two subtrees into one, repeatedly attaching the higher-ranked
    /// head (ties prefer the left subtree's head), in the single-loop form
    /// the design notes call out as an acceptable alternative to an explicit
    /// per-case state machine.
    unsafe fn zip(
        &mut self,
        mut l: Option<NonNull<Node<T>>>,
        mut r: Option<NonNull<Node<T>>>,
    ) -> Option<NonNull<Node<T>>> {
        if l.is_none() || r.is_none() {
            let survivor = l.or(r);
            if let Some(s) = survivor {
                self.observer.delete_without_zipping(&(*s.as_ptr()).payload);
            }
            return survivor;
        }

        self.observer.init_zipping();

        let mut result: Option<NonNull<Node<T>>> = None;
        let mut prev: Option<(NonNull<Node<T>>, Side)> = None;

        loop {
            match (l, r) {
                (Some(ln), Some(rn)) => {
                    let left_wins = (*ln.as_ptr()).rank >= (*rn.as_ptr()).rank;
                    if left_wins {
                        self.observer.before_zip_from_left(&(*ln.as_ptr()).payload);
                        self.attach(&mut result, &mut prev, ln, Side::Right);
                        l = (*ln.as_ptr()).right;
                    } else {
                        self.observer.before_zip_from_right(&(*rn.as_ptr()).payload);
                        self.attach(&mut result, &mut prev, rn, Side::Left);
                        r = (*rn.as_ptr()).left;
                    }
                }
                (Some(ln), None) => {
                    self.observer.before_zip_tree_from_left(&(*ln.as_ptr()).payload);
                    self.attach(&mut result, &mut prev, ln, Side::Right);
                    self.observer.zipping_ended_right_without_tree();
                    break;
                }
                (None, Some(rn)) => {
                    self.observer.before_zip_tree_from_right(&(*rn.as_ptr()).payload);
                    self.attach(&mut result, &mut prev, rn, Side::Left);
                    self.observer.zipping_ended_left_without_tree();
                    break;
                }
                (None, None) => break,
            }
        }

        self.observer.zipping_done();
        result
    }

    /// Attaches `node` at the previous attachment point (or as the result
    /// root, if it is the first), then records `node` as the new
    /// attachment point for `side`.
    unsafe fn attach(
        &mut self,
        result: &mut Option<NonNull<Node<T>>>,
        prev: &mut Option<(NonNull<Node<T>>, Side)>,
        node: NonNull<Node<T>>,
        side: Side,
    ) {
        if result.is_none() {
            *result = Some(node);
        }
        if let Some((p, ref s)) = *prev {
            match s {
                Side::Left => (*p.as_ptr()).left = Some(node),
                Side::Right => (*p.as_ptr()).right = Some(node),
            }
            (*node.as_ptr()).parent = Some(p);
        }
        *prev = Some((node, side));
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

impl<T, Tr, O> Drop for ZtTree<T, Tr, O> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            unsafe { free_subtree(root) };
        }
    }
}

impl<T, Tr: TreeTraits<T>, O> ZtTree<T, Tr, O> {
    pub fn successor_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { successor(handle.ptr) }.map(Handle::new)
    }

    pub fn predecessor_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { predecessor(handle.ptr) }.map(Handle::new)
    }
}
