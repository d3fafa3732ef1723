//! Bottom-up tree folds.
//!
//! Mirrors `sowing.traversal.fold(fn, traversal.depth(tree, preorder=False))`
//! from the reference implementation: visit a tree postorder, replacing
//! each node (possibly dropping it, possibly collapsing it into a single
//! child) from the bottom up. Branch data is `()` throughout this crate
//! (neither the host nor the event/associate trees carry branch lengths),
//! so this fold is specialized to unit-branch trees rather than generic
//! over `B`.

use std::sync::Arc;

use super::node::{Edge, Node};

/// Outcome of folding a single node in [`fold_postorder`].
pub enum FoldStep<U> {
    /// Remove this node (and its subtree) entirely from the result.
    Drop,
    /// Replace this node by one of its already-folded children.
    Collapse(Arc<Node<U>>),
    /// Keep this node with a new payload, using only the children that
    /// survived folding (dropped children vanish, their branch with them).
    Keep(U, Vec<Option<Arc<Node<U>>>>),
}

/// Bottom-up fold that may drop a node, collapse it into one of its
/// (already-folded) children, or keep it with its folded children.
///
/// `f` receives the original node's data and the already-folded children
/// (in original order, `None` for a child that was dropped) and returns
/// one of [`FoldStep`].
pub fn fold_postorder<T, U>(
    tree: &Node<T>,
    f: &mut impl FnMut(&T, Vec<Option<Arc<Node<U>>>>) -> FoldStep<U>,
) -> Option<Arc<Node<U>>> {
    let children: Vec<Option<Arc<Node<U>>>> = tree
        .children
        .iter()
        .map(|edge| fold_postorder(edge.node.as_ref(), f))
        .collect();

    match f(&tree.data, children) {
        FoldStep::Drop => None,
        FoldStep::Collapse(child) => Some(child),
        FoldStep::Keep(data, children) => Some(Arc::new(Node::with_children(
            data,
            children
                .into_iter()
                .flatten()
                .map(|node| Edge { branch: (), node })
                .collect(),
        ))),
    }
}
