/// The zip tree's structural-change notifications, carrying the full named
/// surface from §6 rather than the coarser before/after-rotation shape used
/// by the rotation-based trees: unzip walks a node at a time down two
/// spines, and zip merges two spines a node at a time, so a combiner
/// consumer needs per-step hooks to know which side just grew.
///
/// As with [`rbtree::RbObserver`]/[`wbtree::WbObserver`], none of these
/// hooks are required for combiner correctness: the tree also performs one
/// bottom-up `rebuild` walk after each insert/remove, which is sufficient
/// to satisfy §3's "combiners correct once the operation returns"
/// invariant. The named hooks remain available for observers that want
/// fine-grained structural notifications instead.
pub trait ZtObserver<T> {
    fn before_insert(&mut self, _new_value: &T) {}
    fn after_insert(&mut self, _new_value: &mut T) {}
    fn before_remove(&mut self, _value: &T) {}
    fn after_remove(&mut self, _value: &mut T) {}

    fn init_unzipping(&mut self, _new_value: &T) {}
    fn unzip_to_left(&mut self, _node: &T) {}
    fn unzip_to_right(&mut self, _node: &T) {}
    fn unzip_done(&mut self, _new_value: &T) {}

    fn init_zipping(&mut self) {}
    fn before_zip_from_left(&mut self, _node: &T) {}
    fn before_zip_from_right(&mut self, _node: &T) {}
    fn before_zip_tree_from_left(&mut self, _node: &T) {}
    fn before_zip_tree_from_right(&mut self, _node: &T) {}
    fn zipping_ended_left_without_tree(&mut self) {}
    fn zipping_ended_right_without_tree(&mut self) {}
    fn zipping_done(&mut self) {}
    fn delete_without_zipping(&mut self, _value: &T) {}

    /// Re-derive this node's augmentation from its own contribution plus its
    /// two children's current combiners. Called bottom-up after every
    /// structural change.
    fn rebuild(&mut self, _node: &mut T, _left: Option<&T>, _right: Option<&T>) {}
}

#[derive(Debug, Default, Copy, Clone)]
pub struct NullObserver;

impl<T> ZtObserver<T> for NullObserver {}
