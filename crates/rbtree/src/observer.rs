/// Structural-change notifications a red-black tree emits, matching the
/// RB/WBT callback surface from §6: `before_insert`/`after_insert`,
/// `before_rotation`/`after_rotation`, symmetric for delete. Every method is
/// defaulted to a no-op so plain ordered-set/map users pay nothing; `dst`
/// implements `rebuild` to keep combiners consistent.
///
/// Combiner maintenance does not hook `before_rotation`/`after_rotation`
/// directly: a single insert or remove can trigger several rotations along
/// one root-ward path, and the only externally-observable requirement
/// (§3) is that combiners are correct again once the operation returns. So
/// the tree instead performs one bottom-up `rebuild` walk, from the deepest
/// structurally-touched node to the root, after the whole insert/remove
/// (including any fixup rotations) has completed. The rotation hooks remain
/// for observers that only want coarse structural notifications (e.g. a
/// statistics collector counting rotations).
pub trait RbObserver<T> {
    fn before_insert(&mut self, _new_value: &T) {}
    fn after_insert(&mut self, _new_value: &mut T) {}
    fn before_remove(&mut self, _value: &T) {}
    fn after_remove(&mut self, _value: &mut T) {}
    fn before_rotation(&mut self, _top: &T, _pivot: &T) {}
    fn after_rotation(&mut self, _old_top: &mut T, _new_top: &mut T) {}

    /// Re-derive this node's augmentation from its own contribution plus its
    /// two children's current combiners. Called bottom-up (children before
    /// parents) after every structural change.
    fn rebuild(&mut self, _node: &mut T, _left: Option<&T>, _right: Option<&T>) {}
}

/// The default, zero-cost observer: every hook is a no-op.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullObserver;

impl<T> RbObserver<T> for NullObserver {}
