//! A zipper cursor over [`Node`] for localized traversal and replacement.
//!
//! Standard Huet-style zipper: a breadcrumb trail of "everything we didn't
//! descend into" plus the currently focused subtree. Moving down pushes a
//! breadcrumb, moving up pops one and rebuilds the parent from the
//! (possibly replaced) focus plus its siblings. Only the spine from the
//! focus back to the root is ever rebuilt; untouched subtrees remain
//! shared `Arc` pointers.

use std::sync::Arc;

use super::node::{Edge, Node};

struct Breadcrumb<T, B> {
    /// Parent's own payload.
    data: T,
    /// Siblings to the left of the focus, closest sibling last.
    left: Vec<Edge<T, B>>,
    /// Branch data from the parent down to the focus.
    branch: B,
    /// Siblings to the right of the focus, closest sibling first.
    right: Vec<Edge<T, B>>,
}

/// A cursor into an immutable [`Node`] tree, supporting `up`/`down`/`replace`.
pub struct Cursor<T, B = ()> {
    focus: Arc<Node<T, B>>,
    trail: Vec<Breadcrumb<T, B>>,
}

impl<T: Clone, B: Clone> Cursor<T, B> {
    /// Start a cursor focused on the root of `tree`.
    pub fn new(tree: Arc<Node<T, B>>) -> Self {
        Self {
            focus: tree,
            trail: Vec::new(),
        }
    }

    /// The node currently in focus.
    #[must_use]
    pub fn node(&self) -> &Node<T, B> {
        self.focus.as_ref()
    }

    /// True if the focus has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.focus.is_leaf()
    }

    /// True if the focus is the root (no breadcrumbs).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.trail.is_empty()
    }

    /// Descend into the `i`th child, returning `None` if out of range.
    #[must_use]
    pub fn down(mut self, i: usize) -> Option<Self> {
        if i >= self.focus.children.len() {
            return None;
        }
        let mut children = self.focus.children.clone();
        let Edge { branch, node } = children.remove(i);
        let left: Vec<Edge<T, B>> = children.drain(..i.min(children.len())).collect();
        let right = children;

        self.trail.push(Breadcrumb {
            data: self.focus.data.clone(),
            left,
            branch,
            right,
        });
        self.focus = node;
        Some(self)
    }

    /// Ascend to the parent, rebuilding it from the (possibly replaced)
    /// focus and its stored siblings.
    #[must_use]
    pub fn up(mut self) -> Option<Self> {
        let crumb = self.trail.pop()?;
        let mut children = crumb.left;
        children.push(Edge {
            branch: crumb.branch,
            node: self.focus,
        });
        children.extend(crumb.right);

        self.focus = Arc::new(Node::with_children(crumb.data, children));
        Some(self)
    }

    /// Replace the focused subtree wholesale.
    #[must_use]
    pub fn replace(mut self, node: Node<T, B>) -> Self {
        self.focus = Arc::new(node);
        self
    }

    /// Rebuild every ancestor up to the root and return it.
    #[must_use]
    pub fn rebuild(mut self) -> Arc<Node<T, B>> {
        while let Some(next) = self.up() {
            self = next;
        }
        self.focus
    }
}
