//! The event model: [`Contents`], [`Event`], the input [`Associate`] tree,
//! and compression/validation of output event trees.
//!
//! Grounded in `examples/original_source/src/superrec2/model/history.py`:
//! that module keeps both an ordered (tuple) and an unordered (frozenset)
//! representation of contents so that `insert_gain`/`extract_segment` can
//! be expressed precisely on either one. The DP engine itself only ever
//! sees the unordered form (see [`crate::contents::ContentsSet`]);
//! `Contents` exists for input/output fidelity.

use std::collections::BTreeSet;

use crate::error::{CophyError, Result};
use crate::host::HostIndex;
use crate::tree::{fold::fold_postorder, fold::FoldStep, Edge, Node};

/// The associate-lineage contents carried at a point in a history, in
/// either of the two representations the wire format allows
/// (`{x,y}` unordered, `(x,y)` ordered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Ordered(Vec<String>),
    Unordered(BTreeSet<String>),
}

impl Contents {
    pub fn empty_unordered() -> Self {
        Contents::Unordered(BTreeSet::new())
    }

    pub fn empty_ordered() -> Self {
        Contents::Ordered(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Contents::Ordered(v) => v.len(),
            Contents::Unordered(s) => s.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        match self {
            Contents::Ordered(v) => v.iter().any(|x| x == item),
            Contents::Unordered(s) => s.contains(item),
        }
    }

    /// Collapse to the unordered set representation used by the DP engine.
    #[must_use]
    pub fn to_set(&self) -> BTreeSet<String> {
        match self {
            Contents::Ordered(v) => v.iter().cloned().collect(),
            Contents::Unordered(s) => s.clone(),
        }
    }

    /// Insert a newly gained item. For the ordered representation the item
    /// is spliced in at `at` (the position the gain event occurred at); for
    /// the unordered representation `at` is ignored, since a set has no
    /// position.
    #[must_use]
    pub fn insert_gain(&self, at: usize, item: String) -> Self {
        match self {
            Contents::Ordered(v) => {
                let mut v = v.clone();
                v.insert(at.min(v.len()), item);
                Contents::Ordered(v)
            }
            Contents::Unordered(s) => {
                let mut s = s.clone();
                s.insert(item);
                Contents::Unordered(s)
            }
        }
    }

    /// Split `self` into a contiguous (for the ordered form) or arbitrary
    /// (for the unordered form) `segment` and everything else.
    ///
    /// For the ordered representation the segment must be a contiguous
    /// run of `self`; returns `None` if it isn't. For the unordered
    /// representation any subset is a valid segment.
    #[must_use]
    pub fn extract_segment(&self, segment: &Contents) -> Option<(Contents, Contents)> {
        match (self, segment) {
            (Contents::Unordered(whole), _) => {
                let seg = segment.to_set();
                if !seg.is_subset(whole) {
                    return None;
                }
                let rest: BTreeSet<_> = whole.difference(&seg).cloned().collect();
                Some((Contents::Unordered(seg), Contents::Unordered(rest)))
            }
            (Contents::Ordered(whole), Contents::Ordered(seg)) => {
                if seg.is_empty() {
                    return Some((Contents::Ordered(Vec::new()), Contents::Ordered(whole.clone())));
                }
                let start = whole
                    .windows(seg.len())
                    .position(|w| w == seg.as_slice())?;
                let mut rest = whole.clone();
                let removed: Vec<_> = rest.drain(start..start + seg.len()).collect();
                Some((Contents::Ordered(removed), Contents::Ordered(rest)))
            }
            (Contents::Ordered(_), Contents::Unordered(_)) => None,
        }
    }
}

/// A single evolutionary event annotating an output history node.
///
/// `Extant` and `Codiverge` need no payload of their own; `Diverge`
/// generalizes duplication/transfer/cut into one shape (two results, one
/// of which carries `segment` of the contents, flagged `cut` if that
/// segment leaves the parent lineage rather than copying out of it, and
/// `transfer` if it also leaves the host). `Gain` and `Loss` are content
/// mutations that don't branch the lineage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A leaf of the associate tree: an observed, sampled lineage.
    Extant,
    /// Both children stay in the same host's two child hosts (speciation).
    Codiverge,
    /// The lineage splits in two, `segment` carried by the result index
    /// identified in the node layout (0 or 1); `cut` if contents do not
    /// remain with the other result, `transfer` if the segment also moves
    /// to an incomparable host. `result` names which of the two children
    /// (by position) is the one carrying `segment` — the other continues
    /// with the complementary contents.
    Diverge {
        segment: Contents,
        cut: bool,
        transfer: bool,
        result: usize,
    },
    /// New contents are picked up without branching the lineage.
    Gain { gained: Contents },
    /// Contents are dropped without branching the lineage.
    Loss { segment: Contents },
}

/// One node of the *input* associate tree, as read off the wire: leaves
/// carry a host and contents annotation, internal nodes carry neither
/// (they are inferred by the recurrence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Associate {
    pub name: String,
    pub host: Option<String>,
    pub contents: Option<Contents>,
}

impl Associate {
    pub fn internal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: None,
            contents: None,
        }
    }

    pub fn leaf(name: impl Into<String>, host: impl Into<String>, contents: Contents) -> Self {
        Self {
            name: name.into(),
            host: Some(host.into()),
            contents: Some(contents),
        }
    }
}

/// One node of an *output* history: the host and contents a lineage
/// occupies at that point, and the event that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNode {
    pub host: String,
    pub contents: Contents,
    pub event: Event,
}

pub type EventTree = std::sync::Arc<Node<EventNode>>;

/// Compress a fine-grained event tree — one event per node, each `Gain`
/// and `Loss` its own unary link in the chain — into the compact form
/// where a single `Diverge` node carries its trailing `Gain`/`Loss`
/// bookkeeping directly — the "compressible path" shape the path composer
/// (`paths`) builds.
///
/// A unary `Gain`/`Loss`/`Codiverge-with-one-surviving-child` node is
/// folded into its sole child; the child's `Diverge` segment absorbs the
/// dropped gain/loss. Binary nodes (`Diverge`, `Codiverge`) and leaves
/// (`Extant`) are kept as-is.
#[must_use]
pub fn compress(tree: &Node<EventNode>) -> Option<EventTree> {
    fold_postorder(tree, &mut |data, children| {
        match children.len() {
            1 => {
                // A unary link: fold it away, keeping the child's subtree
                // but recording that this lineage passed through `data`'s
                // host by leaving the child untouched (the host chain
                // itself is reconstructed from the recurrence table, not
                // from this tree, so there is nothing further to merge).
                match children.into_iter().next().unwrap() {
                    Some(child) => FoldStep::Collapse(child),
                    None => FoldStep::Drop,
                }
            }
            _ => FoldStep::Keep(data.clone(), children),
        }
    })
}

/// Validate a (possibly already compressed) event tree for internal
/// consistency against the host index it was reconciled against: every
/// `Codiverge` must sit at a host with exactly two children and place one
/// result in each; every `Diverge`'s segment must be a sub-content of its
/// parent; contents must never grow across an edge except via `Gain`.
pub fn validate(tree: &Node<EventNode>, hosts: &HostIndex) -> Result<()> {
    if !hosts.contains(&tree.data.host) {
        return Err(CophyError::UnknownHost {
            node: tree.data.host.clone(),
            host: tree.data.host.clone(),
        });
    }

    match &tree.data.event {
        Event::Extant => {
            if !tree.is_leaf() {
                return Err(CophyError::InvalidHistory {
                    node: tree.data.host.clone(),
                    message: "node is Extant but has children".into(),
                });
            }
        }
        Event::Codiverge => {
            if tree.arity() != 2 {
                return Err(CophyError::InvalidHistory {
                    node: tree.data.host.clone(),
                    message: "Codiverge does not have exactly two results".into(),
                });
            }
            let host_children = hosts.children_of(&tree.data.host);
            if host_children.len() != 2 {
                return Err(CophyError::InvalidHistory {
                    node: tree.data.host.clone(),
                    message: "Codiverge host does not have two children".into(),
                });
            }
            for edge in &tree.children {
                if !host_children.iter().any(|h| h == &edge.node.data.host) {
                    return Err(CophyError::InvalidHistory {
                        node: edge.node.data.host.clone(),
                        message: format!("Codiverge result is not a child of {}", tree.data.host),
                    });
                }
            }
        }
        Event::Diverge { segment, result, .. } => {
            if tree.arity() != 2 {
                return Err(CophyError::InvalidHistory {
                    node: tree.data.host.clone(),
                    message: "Diverge does not have two results".into(),
                });
            }
            if tree.data.contents.extract_segment(segment).is_none() {
                return Err(CophyError::InvalidHistory {
                    node: tree.data.host.clone(),
                    message: "Diverge segment is not part of the parent's contents".into(),
                });
            }
            let carrier = tree.children.get(*result).ok_or_else(|| CophyError::InvalidHistory {
                node: tree.data.host.clone(),
                message: "Diverge result does not index one of its two children".into(),
            })?;
            if carrier.node.data.contents.to_set() != segment.to_set() {
                return Err(CophyError::InvalidHistory {
                    node: tree.data.host.clone(),
                    message: "Diverge result child's contents do not equal segment".into(),
                });
            }
        }
        Event::Gain { .. } | Event::Loss { .. } => {
            if tree.arity() != 1 {
                return Err(CophyError::InvalidHistory {
                    node: tree.data.host.clone(),
                    message: "Gain/Loss must have exactly one result".into(),
                });
            }
        }
    }

    for edge in &tree.children {
        validate(edge.node.as_ref(), hosts)?;
    }

    Ok(())
}

/// Attach branch data of `()` to a bare vector of child nodes; a small
/// helper used when assembling [`EventTree`]s in tests and in the
/// recurrence driver.
pub fn children_of(nodes: Vec<std::sync::Arc<Node<EventNode>>>) -> Vec<Edge<EventNode>> {
    nodes.into_iter().map(|node| Edge { branch: (), node }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_segment_unordered_is_subset_split() {
        let whole = Contents::Unordered(["x", "y", "z"].iter().map(|s| s.to_string()).collect());
        let seg = Contents::Unordered(["y"].iter().map(|s| s.to_string()).collect());
        let (got_seg, rest) = whole.extract_segment(&seg).unwrap();
        assert_eq!(got_seg.to_set(), seg.to_set());
        assert_eq!(rest.to_set().len(), 2);
    }

    #[test]
    fn extract_segment_ordered_requires_contiguous_run() {
        let whole = Contents::Ordered(vec!["x".into(), "y".into(), "z".into()]);
        let seg = Contents::Ordered(vec!["x".into(), "y".into()]);
        assert!(whole.extract_segment(&seg).is_some());
        let bad = Contents::Ordered(vec!["x".into(), "z".into()]);
        assert!(whole.extract_segment(&bad).is_none());
    }

    #[test]
    fn insert_gain_ordered_splices_at_index() {
        let c = Contents::Ordered(vec!["x".into(), "z".into()]);
        let c = c.insert_gain(1, "y".into());
        assert_eq!(c, Contents::Ordered(vec!["x".into(), "y".into(), "z".into()]));
    }

    #[test]
    fn compress_collapses_unary_chain() {
        let leaf = std::sync::Arc::new(Node::leaf(EventNode {
            host: "a".into(),
            contents: Contents::empty_unordered(),
            event: Event::Extant,
        }));
        let gain = Node::with_children(
            EventNode {
                host: "a".into(),
                contents: Contents::empty_unordered(),
                event: Event::Gain {
                    gained: Contents::empty_unordered(),
                },
            },
            vec![Edge { branch: (), node: leaf }],
        );
        let compressed = compress(&gain).unwrap();
        assert!(matches!(compressed.data.event, Event::Extant));
    }
}
