/// Structural-change notifications a weight-balanced tree emits, mirroring
/// [`rbtree::RbObserver`]'s shape for the same reasons: a single insert or
/// remove can retrace and rotate along one root-ward path, and combiner
/// maintenance only needs to be correct once the operation returns (§3), so
/// it is driven by one bottom-up `rebuild` walk rather than interleaved with
/// every individual rotation.
pub trait WbObserver<T> {
    fn before_insert(&mut self, _new_value: &T) {}
    fn after_insert(&mut self, _new_value: &mut T) {}
    fn before_remove(&mut self, _value: &T) {}
    fn after_remove(&mut self, _value: &mut T) {}
    fn before_rotation(&mut self, _top: &T, _pivot: &T) {}
    fn after_rotation(&mut self, _old_top: &mut T, _new_top: &mut T) {}

    /// Re-derive this node's augmentation from its own contribution plus its
    /// two children's current combiners. Called bottom-up after every
    /// structural change.
    fn rebuild(&mut self, _node: &mut T, _left: Option<&T>, _right: Option<&T>) {}
}

#[derive(Debug, Default, Copy, Clone)]
pub struct NullObserver;

impl<T> WbObserver<T> for NullObserver {}
