use crate::node::Node;
use crate::params::WbtParams;
use ordtree_core::TreeTraits;
use std::ptr::NonNull;

/// Recursively checks in-order sortedness, size bookkeeping, and the δ
/// weight-balance invariant from §3, returning the subtree's size on
/// success.
pub(crate) unsafe fn verify_subtree<T, Tr: TreeTraits<T>>(
    node: Option<NonNull<Node<T>>>,
    parent: Option<NonNull<Node<T>>>,
    lo: Option<&Tr::Key>,
    hi: Option<&Tr::Key>,
    params: &WbtParams,
) -> Result<usize, String> {
    let Some(n) = node else { return Ok(0) };

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

    let left_size = verify_subtree::<T, Tr>(n_ref.left, Some(n), lo, Some(key), params)?;
    let right_size = verify_subtree::<T, Tr>(n_ref.right, Some(n), Some(key), hi, params)?;

    if n_ref.size != left_size + right_size + 1 {
        return Err(format!(
            "stored size {} does not match recomputed size {}",
            n_ref.size,
            left_size + right_size + 1
        ));
    }

    if !params.is_balanced(left_size, right_size) {
        return Err(format!(
            "delta-balance violated: left size {left_size}, right size {right_size}"
        ));
    }

    Ok(left_size + right_size + 1)
}
