//! The host phylogeny and its indexed ancestor/LCA structure.
//!
//! Grounded in `examples/original_source/superrec2/utils/lowest_common_ancestor.py`:
//! an Euler tour of the tree plus a sparse-table range-minimum-query
//! structure answers `ancestor_of`/`lca`/`level`/`distance` in O(1) after
//! O(N log N) preprocessing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tree::Node;

/// Payload of a host tree node: a clade identifier plus an opaque
/// property bag. The only property the core interprets is `sampled`
/// anything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Clade identifier, unique within one host tree.
    pub name: String,
    /// Whether this host was actually observed (`false` = "ghost"
    /// intermediate). Defaults to `true`.
    pub sampled: bool,
    /// Opaque key-value property bag, beyond `sampled`.
    pub props: HashMap<String, String>,
}

impl Host {
    /// Construct a sampled host with no extra properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sampled: true,
            props: HashMap::new(),
        }
    }

    /// Construct an unsampled ("ghost") host.
    #[must_use]
    pub fn unsampled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sampled: false,
            props: HashMap::new(),
        }
    }
}

pub type HostTree = Arc<Node<Host>>;

/// A host tree indexed once for O(1) ancestor/LCA/level/distance queries.
///
/// Built from an Euler tour of the tree: walking the tour and recording
/// `(depth, name)` at every visit (including re-visits on the way back up
/// from a child) turns LCA into a range-minimum query over depth, answered
/// by a sparse table in O(1) per query after O(N log N) preprocessing.
///
/// Immutable after construction: host trees never mutate in place.
#[derive(Debug, Clone)]
pub struct HostIndex {
    /// Euler tour: `(level, name)` at each visit.
    tour: Vec<(u32, String)>,
    /// First position of each name in `tour`.
    first_occurrence: HashMap<String, usize>,
    /// Sparse table over `tour` indices, keyed by level, for RMQ.
    sparse: SparseTable,
    parent: HashMap<String, Option<String>>,
    children: HashMap<String, Vec<String>>,
    nodes: HashMap<String, Host>,
}

impl HostIndex {
    /// Build the index. O(N log N).
    #[must_use]
    pub fn build(tree: &HostTree) -> Self {
        let mut tour = Vec::new();
        let mut parent = HashMap::new();
        let mut children = HashMap::new();
        let mut nodes = HashMap::new();

        fn visit(
            node: &Node<Host>,
            level: u32,
            parent_name: Option<&str>,
            tour: &mut Vec<(u32, String)>,
            parent: &mut HashMap<String, Option<String>>,
            children: &mut HashMap<String, Vec<String>>,
            nodes: &mut HashMap<String, Host>,
        ) {
            let name = node.data.name.clone();
            tour.push((level, name.clone()));
            parent.insert(name.clone(), parent_name.map(str::to_string));
            nodes.insert(name.clone(), node.data.clone());
            let mut kids = Vec::new();

            for edge in &node.children {
                kids.push(edge.node.data.name.clone());
                visit(
                    edge.node.as_ref(),
                    level + 1,
                    Some(&name),
                    tour,
                    parent,
                    children,
                    nodes,
                );
                tour.push((level, name.clone()));
            }

            children.insert(name, kids);
        }

        visit(
            tree.as_ref(),
            0,
            None,
            &mut tour,
            &mut parent,
            &mut children,
            &mut nodes,
        );

        let mut first_occurrence = HashMap::new();
        for (i, (_, name)) in tour.iter().enumerate() {
            first_occurrence.entry(name.clone()).or_insert(i);
        }

        let sparse = SparseTable::build(&tour);

        Self {
            tour,
            first_occurrence,
            sparse,
            parent,
            children,
            nodes,
        }
    }

    /// Iterate over every host name in the tree, in first-occurrence (i.e.
    /// preorder) order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.first_occurrence.keys().map(String::as_str)
    }

    /// True if `name` is indexed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.first_occurrence.contains_key(name)
    }

    /// Host data for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Host> {
        self.nodes.get(name)
    }

    /// Names of the children of `name`, empty for a leaf.
    #[must_use]
    pub fn children_of(&self, name: &str) -> &[String] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Name of the parent of `name`, `None` at the root.
    #[must_use]
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parent.get(name).and_then(|p| p.as_deref())
    }

    /// Name of the sibling of `name` (the other child of its parent),
    /// `None` at the root.
    #[must_use]
    pub fn sibling_of(&self, name: &str) -> Option<&str> {
        let parent = self.parent_of(name)?;
        self.children_of(parent).iter().find(|c| c.as_str() != name).map(String::as_str)
    }

    /// True if `name` is a leaf of the host tree.
    #[must_use]
    pub fn is_leaf(&self, name: &str) -> bool {
        self.children_of(name).is_empty()
    }

    /// Lowest common ancestor of `a` and `b`. O(1).
    ///
    /// # Panics
    /// Panics if `a` or `b` is not indexed.
    #[must_use]
    pub fn lca<'a>(&'a self, a: &str, b: &str) -> &'a str {
        let ia = self.first_occurrence[a];
        let ib = self.first_occurrence[b];
        let (lo, hi) = if ia <= ib { (ia, ib) } else { (ib, ia) };
        self.sparse.range_min(lo, hi + 1)
    }

    /// True if `a` is an ancestor of `b` (reflexive: `a` is an ancestor of
    /// itself). O(1).
    #[must_use]
    pub fn is_ancestor_of(&self, a: &str, b: &str) -> bool {
        self.lca(a, b) == a
    }

    /// True if `a` is a strict ancestor of `b` (`a` ancestor of `b` and
    /// `a != b`). O(1).
    #[must_use]
    pub fn is_strict_ancestor_of(&self, a: &str, b: &str) -> bool {
        a != b && self.is_ancestor_of(a, b)
    }

    /// True if `a` and `b` are comparable (either is an ancestor of the
    /// other). O(1).
    #[must_use]
    pub fn is_comparable(&self, a: &str, b: &str) -> bool {
        self.is_ancestor_of(a, b) || self.is_ancestor_of(b, a)
    }

    /// Depth of `name` from the root (root is level 0). O(1).
    #[must_use]
    pub fn level(&self, name: &str) -> u32 {
        self.tour[self.first_occurrence[name]].0
    }

    /// Tree distance between `a` and `b`. O(1).
    #[must_use]
    pub fn distance(&self, a: &str, b: &str) -> u32 {
        let lca = self.lca(a, b).to_string();
        self.level(a) + self.level(b) - 2 * self.level(&lca)
    }
}

/// Sparse table over an Euler tour for O(1) range-minimum-by-level queries,
/// tie-broken by returning the *name* rather than the raw tour entry.
#[derive(Debug, Clone)]
struct SparseTable {
    tour: Vec<(u32, String)>,
    // table[k][i] = index (into `tour`) of the minimum-level entry in
    // the range [i, i + 2^k).
    table: Vec<Vec<usize>>,
}

impl SparseTable {
    fn build(tour: &[(u32, String)]) -> Self {
        let n = tour.len();
        let mut k = 0;
        while (1 << (k + 1)) <= n.max(1) {
            k += 1;
        }
        let levels = k + 1;

        let mut table = vec![(0..n).collect::<Vec<_>>()];
        for j in 1..levels {
            let half = 1usize << (j - 1);
            let mut row = Vec::with_capacity(n);
            for i in 0..n {
                let left = table[j - 1][i];
                let right_idx = i + half;
                let right = if right_idx < n { table[j - 1][right_idx] } else { left };
                row.push(if tour[left].0 <= tour[right].0 { left } else { right });
            }
            table.push(row);
        }

        Self {
            tour: tour.to_vec(),
            table,
        }
    }

    /// Minimum-level entry's name over the half-open range `[lo, hi)`.
    fn range_min(&self, lo: usize, hi: usize) -> &str {
        let len = hi - lo;
        let k = (usize::BITS - 1 - len.leading_zeros()) as usize;
        let a = self.table[k][lo];
        let b = self.table[k][hi - (1 << k)];
        let idx = if self.tour[a].0 <= self.tour[b].0 { a } else { b };
        &self.tour[idx].1
    }
}

/// Graft an unsampled sibling at every existing host node: each original
/// host `H` becomes an internal node with children `H[U]` (the unsampled
/// sibling) and `H[P]` (renamed, carrying the original subtree).
///
/// Used when the façade is asked to search for histories that pass through
/// hosts not actually sampled.
#[must_use]
pub fn graft_unsampled(tree: &HostTree) -> HostTree {
    fn graft(node: &Node<Host>) -> Arc<Node<Host>> {
        let children: Vec<_> = node
            .children
            .iter()
            .map(|e| crate::tree::Edge {
                branch: (),
                node: graft(e.node.as_ref()),
            })
            .collect();
        let renamed = Host {
            name: format!("{}[P]", node.data.name),
            ..node.data.clone()
        };
        let ghost = Host::unsampled(format!("{}[U]", node.data.name));
        let original_subtree = Arc::new(Node::with_children(renamed, children));

        Arc::new(Node::with_children(
            node.data.clone(),
            vec![
                crate::tree::Edge {
                    branch: (),
                    node: Arc::new(Node::leaf(ghost)),
                },
                crate::tree::Edge {
                    branch: (),
                    node: original_subtree,
                },
            ],
        ))
    }

    graft(tree.as_ref())
}
