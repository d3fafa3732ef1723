//! The public entry point: validate, optionally graft unsampled hosts,
//! binarize the associate tree, run the recurrence over every
//! binarization in parallel, and accumulate with the semiring's `+`.
//!
//! Grounded in
//! `examples/original_source/src/superrec2/compute/util.py::reconciliation_algorithm`
//! for the validate→binarize→recur→accumulate shape, and in `rayon` for
//! running independent binarization branches across a thread pool.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{CophyError, Result};
use crate::event::Associate;
use crate::host::{graft_unsampled, Host, HostIndex, HostTree};
use crate::recurrence;
use crate::semiring::Semiring;
use crate::tree::{Edge, Node};

/// One leaf-renaming-free binarization of a multifurcating associate
/// subtree, produced by [`binarizations`].
pub type AssociateTree = std::sync::Arc<Node<Associate>>;

fn validate_host_binary(node: &Node<Host>) -> Result<()> {
    if !(node.children.is_empty() || node.children.len() == 2) {
        return Err(CophyError::HostTreeNotBinary {
            host: node.data.name.clone(),
        });
    }
    for edge in &node.children {
        validate_host_binary(edge.node.as_ref())?;
    }
    Ok(())
}

fn validate_associate(node: &Node<Associate>, hosts: &HostIndex) -> Result<()> {
    if node.is_leaf() {
        let host = node
            .data
            .host
            .as_ref()
            .ok_or_else(|| CophyError::MissingLeafAssociate {
                node: node.data.name.clone(),
            })?;
        if node.data.contents.is_none() {
            return Err(CophyError::MissingLeafAssociate {
                node: node.data.name.clone(),
            });
        }
        if !hosts.contains(host) {
            return Err(CophyError::UnknownHost {
                node: node.data.name.clone(),
                host: host.clone(),
            });
        }
        if !hosts.is_leaf(host) {
            return Err(CophyError::LeafHostNotTerminal {
                node: node.data.name.clone(),
                host: host.clone(),
            });
        }
    } else {
        for edge in &node.children {
            validate_associate(edge.node.as_ref(), hosts)?;
        }
    }
    Ok(())
}

fn cartesian<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    lists.iter().fold(vec![Vec::new()], |acc, list| {
        acc.into_iter()
            .flat_map(|prefix| {
                list.iter().map(move |item| {
                    let mut next = prefix.clone();
                    next.push(item.clone());
                    next
                })
            })
            .collect()
    })
}

/// Combine a caterpillar of already-chosen subtrees into one binary node,
/// labeling intermediate joins synthetically and the final, root-facing
/// join with `root_data` (so the visible root keeps its original name).
fn caterpillar(items: Vec<AssociateTree>, root_data: &Associate) -> AssociateTree {
    let mut iter = items.into_iter();
    let mut acc = iter.next().expect("caterpillar needs at least one item");
    let mut remaining: Vec<_> = iter.collect();
    if remaining.is_empty() {
        return acc;
    }
    let last = remaining.pop().unwrap();
    for next in remaining {
        let synthetic = Associate::internal(format!("{}#bin", root_data.name));
        acc = std::sync::Arc::new(Node::with_children(
            synthetic,
            vec![Edge { branch: (), node: acc }, Edge { branch: (), node: next }],
        ));
    }
    std::sync::Arc::new(Node::with_children(
        root_data.clone(),
        vec![Edge { branch: (), node: acc }, Edge { branch: (), node: last }],
    ))
}

/// Every way to resolve `tree`'s multifurcations into binary splits.
///
/// A node with 0–2 children contributes exactly the cartesian product of
/// its (already binarized) children's alternatives. A node with more than
/// two children is ambiguous about pairing order; this produces one
/// caterpillar binarization per rotation of its children (rather than
/// every Catalan-many binary shape), keeping the branch count linear in
/// arity while still covering every distinct pairing order a polytomy
/// could represent.
#[must_use]
pub fn binarizations(tree: &Node<Associate>) -> Vec<AssociateTree> {
    if tree.is_leaf() {
        return vec![std::sync::Arc::new(tree.clone())];
    }

    let child_alts: Vec<Vec<AssociateTree>> =
        tree.children.iter().map(|e| binarizations(e.node.as_ref())).collect();

    if child_alts.len() <= 2 {
        cartesian(&child_alts)
            .into_iter()
            .map(|combo| {
                std::sync::Arc::new(Node::with_children(
                    tree.data.clone(),
                    combo.into_iter().map(|node| Edge { branch: (), node }).collect(),
                ))
            })
            .collect()
    } else {
        let n = child_alts.len();
        (0..n)
            .map(|rotation| {
                let mut order: Vec<usize> = (0..n).collect();
                order.rotate_left(rotation);
                let items: Vec<AssociateTree> = order.into_iter().map(|i| child_alts[i][0].clone()).collect();
                caterpillar(items, &tree.data)
            })
            .collect()
    }
}

/// Run the reconciliation: validate, optionally graft unsampled hosts,
/// binarize the associate tree, evaluate every binarization in parallel,
/// and accumulate with `S::add` (associative and commutative, so the
/// order binarizations finish in doesn't matter).
#[instrument(skip(ctx, assoc, host_tree))]
pub fn reconcile<S>(
    ctx: &S::Context,
    assoc: &Node<Associate>,
    host_tree: &HostTree,
    allow_unsampled: bool,
) -> Result<S::Value>
where
    S: Semiring,
    S::Value: Send,
    S::Context: Sync,
{
    validate_host_binary(host_tree.as_ref())?;

    let grafted;
    let effective_hosts = if allow_unsampled {
        grafted = graft_unsampled(host_tree);
        &grafted
    } else {
        host_tree
    };
    let host_index = HostIndex::build(effective_hosts);

    validate_associate(assoc, &host_index)?;

    let branches = binarizations(assoc);
    debug!(branch_count = branches.len(), "evaluating binarizations in parallel");
    let results: Vec<S::Value> = branches
        .par_iter()
        .map(|branch| recurrence::reconcile::<S>(ctx, branch, &host_index))
        .collect();

    Ok(results.iter().fold(S::null(ctx), |acc, v| S::add(ctx, &acc, v)))
}
