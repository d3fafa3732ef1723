//! Minimum-contents analysis: the two-pass algorithm that computes, for
//! every associate-tree node, the smallest set of contents any
//! reconciliation could assign it, plus the [`EXTRA`] sentinel that
//! records where a gain *could* still be scheduled without forcing where.
//!
//! Grounded in
//! `examples/original_source/src/superrec2/compute/superdtlx/contents.py`.
//! The recurrence only ever needs a lower bound on contents at each node
//! (an upper bound would over-constrain which gains are legal); this module
//! computes that bound by a postorder union pass followed by a preorder
//! gain-push pass.

use std::collections::BTreeMap;

use crate::event::Associate;
use crate::tree::Node;

/// The unordered-set representation of contents the DP engine is
/// monomorphized over.
pub type ContentsSet = std::collections::BTreeSet<String>;

/// Sentinel item standing in for "one unit of not-yet-named content, to be
/// gained somewhere on the path down to this node". The recurrence
/// (`paths`/`recurrence`) inserts one of these into a node's working
/// contents whenever it considers a `Gain` of content that has no leaf
/// evidence anywhere below it (content invented by the history rather
/// than inherited) — see the compressible-path composer in `paths`. This
/// module only defines the marker and the helpers to count/strip it;
/// [`compute_min_contents`] itself never introduces one, since every
/// node's minimum is fully determined by the leaves beneath it.
pub const EXTRA: &str = "\u{0}EXTRA\u{0}";

/// Per-node minimum contents, keyed by associate node name.
pub type MinContents = BTreeMap<String, ContentsSet>;

/// Compute the minimum contents of every node of `tree`: the smallest set
/// of concrete (leaf-evidenced) items any reconciliation must account for
/// at that point in the associate tree.
///
/// Two passes. First, postorder: a leaf's minimum is its annotated
/// contents; an internal node's is the union of its children's (content
/// is never required to shrink going up a lineage split, since both
/// results of a divergence descend from the same ancestral contents).
/// Second, preorder: content an internal node owes to *both* children is
/// pushed no further than that node (it's gained there, once); content
/// owed to only one child is pushed down onto that child instead and
/// subtracted from the node's own minimum, since the other branch never
/// needed it. Skipping this second pass (a plain union) over-counts a
/// node's own minimum by whatever its children would gain independently,
/// which in turn forces spurious `Loss` events on whichever branch didn't
/// need that content.
#[must_use]
pub fn compute_min_contents(tree: &Node<Associate>) -> MinContents {
    let mut min_contents = MinContents::new();

    for node in tree.postorder() {
        let contents: ContentsSet = if node.is_leaf() {
            node.data
                .contents
                .as_ref()
                .map(crate::event::Contents::to_set)
                .unwrap_or_default()
        } else {
            node.children
                .iter()
                .flat_map(|e| min_contents.get(&e.node.data.name).cloned().unwrap_or_default())
                .collect()
        };
        min_contents.insert(node.data.name.clone(), contents);
    }

    let mut gains: BTreeMap<String, ContentsSet> = BTreeMap::new();
    gains.insert(tree.data.name.clone(), min_contents.get(&tree.data.name).cloned().unwrap_or_default());

    for node in tree.preorder() {
        if node.is_leaf() {
            continue;
        }
        let left = node.child(0).expect("associate tree must be binarized before reconciliation");
        let right = node.child(1).expect("associate tree must be binarized before reconciliation");
        let left_contents = min_contents.get(&left.data.name).cloned().unwrap_or_default();
        let right_contents = min_contents.get(&right.data.name).cloned().unwrap_or_default();
        let gained_here = gains.get(&node.data.name).cloned().unwrap_or_default();

        let left_only: ContentsSet = gained_here.intersection(&left_contents.difference(&right_contents).cloned().collect()).cloned().collect();
        let right_only: ContentsSet = gained_here.intersection(&right_contents.difference(&left_contents).cloned().collect()).cloned().collect();

        gains.insert(left.data.name.clone(), left_only.clone());
        gains.insert(right.data.name.clone(), right_only.clone());

        if let Some(own) = min_contents.get_mut(&node.data.name) {
            for item in left_only.iter().chain(right_only.iter()) {
                own.remove(item);
            }
        }
    }

    min_contents
}

/// Count of [`EXTRA`] markers in a contents set (how many not-yet-placed
/// gains a working contents set still owes).
#[must_use]
pub fn extra_count(contents: &ContentsSet) -> usize {
    contents.iter().filter(|c| c.as_str() == EXTRA).count()
}

/// Contents with every [`EXTRA`] marker stripped — the concrete,
/// fully-resolved portion.
#[must_use]
pub fn without_extra(contents: &ContentsSet) -> ContentsSet {
    contents.iter().filter(|c| c.as_str() != EXTRA).cloned().collect()
}
