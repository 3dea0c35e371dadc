use crate::node::{Color, Node};
use ordtree_core::TreeTraits;
use std::ptr::NonNull;

/// Recursively checks the red-black invariants from §3 plus in-order
/// sortedness under `Tr`, returning the subtree's black-height on success.
pub(crate) unsafe fn verify_subtree<T, Tr: TreeTraits<T>>(
    node: Option<NonNull<Node<T>>>,
    parent: Option<NonNull<Node<T>>>,
    lo: Option<&Tr::Key>,
    hi: Option<&Tr::Key>,
) -> Result<usize, String> {
    let Some(n) = node else { return Ok(1) }; // a null child counts as black, height 1

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

    if n_ref.color == Color::Red {
        for child in [n_ref.left, n_ref.right] {
            if let Some(c) = child {
                if c.as_ref().color == Color::Red {
                    return Err("red node has a red child".to_string());
                }
            }
        }
    }

    let left_height = verify_subtree::<T, Tr>(n_ref.left, Some(n), lo, Some(key))?;
    let right_height = verify_subtree::<T, Tr>(n_ref.right, Some(n), Some(key), hi)?;
    if left_height != right_height {
        return Err(format!(
            "unequal black-height across subtrees ({left_height} vs {right_height})"
        ));
    }

    Ok(left_height + if n_ref.color == Color::Black { 1 } else { 0 })
}
