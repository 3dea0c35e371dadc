use crate::cursor::{Cursor, ReverseCursor};
use crate::dot::{dump_dot, DumpError};
use crate::nav::{minimum, predecessor, successor};
use crate::node::{Color, Handle, Node};
use crate::observer::{NullObserver, RbObserver};
use crate::verify::verify_subtree;
use ordtree_core::{ByValue, Multiplicity, SizeTracking, TreeConfig, TreeTraits};
use std::io::Write;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A red-black tree. `T` is the stored payload, `Tr` extracts the ordering
/// key from it (`ByValue` by default, i.e. `T: Ord`), and `O` receives
/// structural-change notifications (`NullObserver` by default, i.e. zero
/// overhead).
///
/// Nodes are owned by the tree in individual heap allocations; `insert`
/// returns an opaque [`Handle`] used for `remove` and direct payload access.
pub struct RbTree<T, Tr = ByValue, O = NullObserver> {
    pub(crate) root: Option<NonNull<Node<T>>>,
    len: usize,
    config: TreeConfig,
    pub(crate) observer: O,
    _traits: PhantomData<fn() -> Tr>,
}

fn color_of<T>(n: Option<NonNull<Node<T>>>) -> Color {
    match n {
        None => Color::Black,
        Some(p) => unsafe { (*p.as_ptr()).color },
    }
}

impl<T, Tr: TreeTraits<T>, O: Default> Default for RbTree<T, Tr, O> {
    fn default() -> Self {
        RbTree {
            root: None,
            len: 0,
            config: TreeConfig::default(),
            observer: O::default(),
            _traits: PhantomData,
        }
    }
}

impl<T, Tr: TreeTraits<T>, O: Default> RbTree<T, Tr, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        RbTree {
            root: None,
            len: 0,
            config,
            observer: O::default(),
            _traits: PhantomData,
        }
    }
}

impl<T, Tr: TreeTraits<T>, O> RbTree<T, Tr, O> {
    pub fn with_observer(config: TreeConfig, observer: O) -> Self {
        RbTree { root: None, len: 0, config, observer, _traits: PhantomData }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// `size()` from §6: an O(1) read of the maintained counter when
    /// `constant_time_size` is enabled, otherwise an O(n) traversal.
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
        let result = unsafe { verify_subtree::<T, Tr>(self.root, None, None, None) };
        match result {
            Ok(_) => {}
            Err(msg) => panic!("rbtree invariant violated: {msg}"),
        }
        assert_eq!(color_of(self.root), Color::Black, "root must be black");
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

    /// The tree's root, if any. Together with [`Self::left_of`]/[`Self::right_of`]
    /// this lets a caller that needs the raw shape (e.g. an augmented
    /// structure layered on top of this tree) walk it without reaching into
    /// crate-private fields.
    pub fn root_handle(&self) -> Option<Handle<T>> {
        self.root.map(Handle::new)
    }

    pub fn left_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { handle.ptr.as_ref().left }.map(Handle::new)
    }

    pub fn right_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { handle.ptr.as_ref().right }.map(Handle::new)
    }

    /// Maximum root-to-leaf edge count. Exposed for the balance-bound
    /// testable property (§8.3); not part of the stable external contract.
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

impl<T, Tr: TreeTraits<T>, O: RbObserver<T>> RbTree<T, Tr, O> {
    /// Inserts `payload`. Under `Multiplicity::Unique`, inserting a key that
    /// already compares equal returns the existing node's handle instead of
    /// creating a duplicate. Under `Multiplicity::AllowDuplicates`, ties are
    /// placed to the right of existing equal keys, keeping iteration order
    /// stable across repeated inserts of equal keys.
    pub fn insert(&mut self, payload: T) -> Handle<T> {
        let new = Node::new_boxed(payload);
        unsafe { self.observer.before_insert(&(*new.as_ptr()).payload) };

        let Some(mut cur) = self.root else {
            unsafe {
                (*new.as_ptr()).color = Color::Black;
            }
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
        unsafe { self.insert_fixup(new) };
        unsafe { self.rebuild_path_from(Some(new)) };
        Handle::new(new)
    }

    /// Removes the node referenced by `handle`. Precondition: `handle` must
    /// currently be a member of this tree (§7: undefined otherwise, checked
    /// only by `dbg_verify`, never automatically).
    pub fn remove(&mut self, handle: Handle<T>) -> T {
        let z = handle.ptr;
        unsafe { self.observer.before_remove(&(*z.as_ptr()).payload) };

        let x: Option<NonNull<Node<T>>>;
        let x_parent: Option<NonNull<Node<T>>>;
        let y_original_color: Color;

        unsafe {
            if (*z.as_ptr()).left.is_none() {
                x = (*z.as_ptr()).right;
                x_parent = (*z.as_ptr()).parent;
                y_original_color = (*z.as_ptr()).color;
                self.transplant(z, (*z.as_ptr()).right);
            } else if (*z.as_ptr()).right.is_none() {
                x = (*z.as_ptr()).left;
                x_parent = (*z.as_ptr()).parent;
                y_original_color = (*z.as_ptr()).color;
                self.transplant(z, (*z.as_ptr()).left);
            } else {
                let y = minimum((*z.as_ptr()).right.unwrap());
                y_original_color = (*y.as_ptr()).color;
                x = (*y.as_ptr()).right;
                if (*y.as_ptr()).parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = (*y.as_ptr()).parent;
                    self.transplant(y, (*y.as_ptr()).right);
                    (*y.as_ptr()).right = (*z.as_ptr()).right;
                    (*(*y.as_ptr()).right.unwrap().as_ptr()).parent = Some(y);
                }
                self.transplant(z, Some(y));
                (*y.as_ptr()).left = (*z.as_ptr()).left;
                (*(*y.as_ptr()).left.unwrap().as_ptr()).parent = Some(y);
                (*y.as_ptr()).color = (*z.as_ptr()).color;
            }
        }

        self.len -= 1;
        let mut payload = unsafe { Node::reclaim(z) };

        if y_original_color == Color::Black {
            unsafe { self.delete_fixup(x, x_parent) };
        }
        unsafe { self.rebuild_path_from(x.or(x_parent)) };

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

    unsafe fn rotate_left(&mut self, x: NonNull<Node<T>>) {
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

        self.observer.after_rotation(&mut (*x.as_ptr()).payload, &mut (*y.as_ptr()).payload);
    }

    unsafe fn rotate_right(&mut self, x: NonNull<Node<T>>) {
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

        self.observer.after_rotation(&mut (*x.as_ptr()).payload, &mut (*y.as_ptr()).payload);
    }

    unsafe fn insert_fixup(&mut self, mut z: NonNull<Node<T>>) {
        while color_of((*z.as_ptr()).parent) == Color::Red {
            let parent = (*z.as_ptr()).parent.unwrap();
            let grandparent = (*parent.as_ptr()).parent.expect("red parent implies a grandparent");

            if Some(parent) == (*grandparent.as_ptr()).left {
                let uncle = (*grandparent.as_ptr()).right;
                if color_of(uncle) == Color::Red {
                    (*parent.as_ptr()).color = Color::Black;
                    (*uncle.unwrap().as_ptr()).color = Color::Black;
                    (*grandparent.as_ptr()).color = Color::Red;
                    z = grandparent;
                } else {
                    if Some(z) == (*parent.as_ptr()).right {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = (*z.as_ptr()).parent.unwrap();
                    let grandparent = (*parent.as_ptr()).parent.unwrap();
                    (*parent.as_ptr()).color = Color::Black;
                    (*grandparent.as_ptr()).color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = (*grandparent.as_ptr()).left;
                if color_of(uncle) == Color::Red {
                    (*parent.as_ptr()).color = Color::Black;
                    (*uncle.unwrap().as_ptr()).color = Color::Black;
                    (*grandparent.as_ptr()).color = Color::Red;
                    z = grandparent;
                } else {
                    if Some(z) == (*parent.as_ptr()).left {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = (*z.as_ptr()).parent.unwrap();
                    let grandparent = (*parent.as_ptr()).parent.unwrap();
                    (*parent.as_ptr()).color = Color::Black;
                    (*grandparent.as_ptr()).color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }
        (*self.root.unwrap().as_ptr()).color = Color::Black;
    }

    unsafe fn delete_fixup(
        &mut self,
        mut x: Option<NonNull<Node<T>>>,
        mut x_parent: Option<NonNull<Node<T>>>,
    ) {
        while x != self.root && color_of(x) == Color::Black {
            let Some(parent) = x_parent else { break };

            if x == (*parent.as_ptr()).left {
                let mut w = (*parent.as_ptr()).right.expect("rb invariant: sibling must exist");
                if color_of(Some(w)) == Color::Red {
                    (*w.as_ptr()).color = Color::Black;
                    (*parent.as_ptr()).color = Color::Red;
                    self.rotate_left(parent);
                    w = (*parent.as_ptr()).right.unwrap();
                }
                if color_of((*w.as_ptr()).left) == Color::Black && color_of((*w.as_ptr()).right) == Color::Black {
                    (*w.as_ptr()).color = Color::Red;
                    x = Some(parent);
                    x_parent = (*parent.as_ptr()).parent;
                } else {
                    if color_of((*w.as_ptr()).right) == Color::Black {
                        if let Some(wl) = (*w.as_ptr()).left {
                            (*wl.as_ptr()).color = Color::Black;
                        }
                        (*w.as_ptr()).color = Color::Red;
                        self.rotate_right(w);
                        w = (*parent.as_ptr()).right.unwrap();
                    }
                    (*w.as_ptr()).color = (*parent.as_ptr()).color;
                    (*parent.as_ptr()).color = Color::Black;
                    if let Some(wr) = (*w.as_ptr()).right {
                        (*wr.as_ptr()).color = Color::Black;
                    }
                    self.rotate_left(parent);
                    x = self.root;
                    x_parent = None;
                }
            } else {
                let mut w = (*parent.as_ptr()).left.expect("rb invariant: sibling must exist");
                if color_of(Some(w)) == Color::Red {
                    (*w.as_ptr()).color = Color::Black;
                    (*parent.as_ptr()).color = Color::Red;
                    self.rotate_right(parent);
                    w = (*parent.as_ptr()).left.unwrap();
                }
                if color_of((*w.as_ptr()).right) == Color::Black && color_of((*w.as_ptr()).left) == Color::Black {
                    (*w.as_ptr()).color = Color::Red;
                    x = Some(parent);
                    x_parent = (*parent.as_ptr()).parent;
                } else {
                    if color_of((*w.as_ptr()).left) == Color::Black {
                        if let Some(wr) = (*w.as_ptr()).right {
                            (*wr.as_ptr()).color = Color::Black;
                        }
                        (*w.as_ptr()).color = Color::Red;
                        self.rotate_left(w);
                        w = (*parent.as_ptr()).left.unwrap();
                    }
                    (*w.as_ptr()).color = (*parent.as_ptr()).color;
                    (*parent.as_ptr()).color = Color::Black;
                    if let Some(wl) = (*w.as_ptr()).left {
                        (*wl.as_ptr()).color = Color::Black;
                    }
                    self.rotate_right(parent);
                    x = self.root;
                    x_parent = None;
                }
            }
        }
        if let Some(xx) = x {
            (*xx.as_ptr()).color = Color::Black;
        }
    }

    /// Re-derives combiners bottom-up from `start` to the root. A no-op walk
    /// when `O = NullObserver`, since `rebuild` is then a no-op body the
    /// optimizer discards.
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

impl<T, Tr, O> Drop for RbTree<T, Tr, O> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            unsafe { free_subtree(root) };
        }
    }
}

// Successor/predecessor are re-exported for callers that hold a `Handle`
// and want to walk from it directly without going through a cursor.
impl<T, Tr: TreeTraits<T>, O> RbTree<T, Tr, O> {
    pub fn successor_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { successor(handle.ptr) }.map(Handle::new)
    }

    pub fn predecessor_of(&self, handle: Handle<T>) -> Option<Handle<T>> {
        unsafe { predecessor(handle.ptr) }.map(Handle::new)
    }
}
