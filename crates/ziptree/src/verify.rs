use crate::node::Node;
use ordtree_core::TreeTraits;
use std::ptr::NonNull;

/// Recursively checks in-order sortedness and the rank heap-order from §3:
/// parent's rank >= child's rank, with the left child strictly less on a tie
/// and the right child allowed to equal the parent's rank.
pub(crate) unsafe fn verify_subtree<T, Tr: TreeTraits<T>>(
    node: Option<NonNull<Node<T>>>,
    parent: Option<NonNull<Node<T>>>,
    lo: Option<&Tr::Key>,
    hi: Option<&Tr::Key>,
) -> Result<(), String> {
    let Some(n) = node else { return Ok(()) };

    let n_ref = n.as_ref();
    if n_ref.parent != parent {
        return Err("parent pointer is not symmetric with child link".to_string());
    }

    let key = Tr::key(&n_ref.payload);
    if let Some(lo) = lo {
        if Tr::compare_keys(key, lo) == std::cmp::Ordering::Less {
            return Err("in-order sortedness violated (node smaller than lower bound)".to_string());
        }
    }
    if let Some(hi) = hi {
        if Tr::compare_keys(key, hi) == std::cmp::Ordering::Greater {
            return Err("in-order sortedness violated (node larger than upper bound)".to_string());
        }
    }

    if let Some(l) = n_ref.left {
        if l.as_ref().rank >= n_ref.rank {
            return Err("left child's rank must be strictly less than its parent's".to_string());
        }
    }
    if let Some(r) = n_ref.right {
        if r.as_ref().rank > n_ref.rank {
            return Err("right child's rank must not exceed its parent's".to_string());
        }
    }

    verify_subtree::<T, Tr>(n_ref.left, Some(n), lo, Some(key))?;
    verify_subtree::<T, Tr>(n_ref.right, Some(n), Some(key), hi)?;
    Ok(())
}
