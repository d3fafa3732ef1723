//! Brute-force reconciliation enumeration, used only as a test oracle to
//! cross-check the DP engine against exhaustive search.
//!
//! Grounded in `examples/original_source/src/superrec2/compute/exhaustive.py`:
//! walk every admissible combination of host assignment and event choice
//! without memoization or pruning, score each complete assignment, and
//! compare the minimum found against the DP. This is exponential in the
//! number of associate-tree nodes and is wired in only under `#[cfg(test)]`
//! (see `lib.rs`) — never part of the public API.
//!
//! The bridging between a parent's host/contents and a child's own table
//! entry is delegated to [`crate::paths::make_path`], the same composer the
//! DP engine uses, via the `MinPlus` semiring — so this oracle shares the
//! bridging logic but none of the DP's memoization or host-choice pruning,
//! trying every candidate end host explicitly.

use crate::contents::{compute_min_contents, ContentsSet, MinContents};
use crate::costs::EventCosts;
use crate::event::{Associate, Contents, Event};
use crate::host::HostIndex;
use crate::paths::make_path;
use crate::semiring::MinPlus;
use crate::tree::Node;

/// Every total cost reachable by some valid reconciliation of `node` at
/// `host`, enumerated without memoization. A leaf contributes `[0]` when
/// its annotated host matches, or nothing (no valid way) otherwise; an
/// internal node contributes one total per combination of codivergence
/// order, duplication, cut, transfer target, and every host the far end
/// of each child's bridge could land on.
fn enumerate_at(node: &Node<Associate>, host: &str, hosts: &HostIndex, min_contents: &MinContents, ctx: &EventCosts) -> Vec<i64> {
    if node.is_leaf() {
        return match &node.data.host {
            Some(h) if h == host => vec![0],
            _ => vec![],
        };
    }

    let left = node.child(0).expect("binarized associate tree");
    let right = node.child(1).expect("binarized associate tree");
    let own_contents = min_contents.get(&node.data.name).cloned().unwrap_or_default();
    let left_contents: ContentsSet = min_contents.get(&left.data.name).cloned().unwrap_or_default().intersection(&own_contents).cloned().collect();
    let right_contents: ContentsSet = min_contents.get(&right.data.name).cloned().unwrap_or_default().intersection(&own_contents).cloned().collect();

    let mut totals = Vec::new();

    let host_children = hosts.children_of(host).to_vec();
    if host_children.len() == 2 {
        let (hl, hr) = (host_children[0].clone(), host_children[1].clone());
        for (host_left, host_right) in [(hl.clone(), hr.clone()), (hr, hl)] {
            let left_totals = bridge_totals(left, false, &host_left, &own_contents, hosts, min_contents, ctx);
            let right_totals = bridge_totals(right, false, &host_right, &own_contents, hosts, min_contents, ctx);
            for &l in &left_totals {
                for &r in &right_totals {
                    totals.push(ctx.of(&Event::Codiverge) + l + r);
                }
            }
        }
    }

    let left_same = bridge_totals(left, false, host, &own_contents, hosts, min_contents, ctx);
    let right_same = bridge_totals(right, false, host, &own_contents, hosts, min_contents, ctx);

    let duplication_result = if right_contents == own_contents { 0 } else { 1 };
    let duplication = Event::Diverge {
        segment: Contents::Unordered(left_contents.clone()),
        cut: false,
        transfer: false,
        result: duplication_result,
    };
    for &l in &left_same {
        for &r in &right_same {
            totals.push(ctx.of(&duplication) + l + r);
        }
    }

    // Cut only makes sense when the two results genuinely partition the
    // parent's contents: every item goes to exactly one side, none shared,
    // none dropped.
    let partitions: ContentsSet = left_contents.union(&right_contents).cloned().collect();
    let is_partition = partitions == own_contents && left_contents.is_disjoint(&right_contents);

    if is_partition {
        let cut = Event::Diverge {
            segment: Contents::Unordered(left_contents.clone()),
            cut: true,
            transfer: false,
            result: 0,
        };
        for &l in &left_same {
            for &r in &right_same {
                totals.push(ctx.of(&cut) + l + r);
            }
        }
    }

    for h2 in hosts.keys().map(str::to_string).collect::<Vec<_>>() {
        if hosts.is_comparable(host, &h2) {
            continue;
        }

        let left_separate = bridge_totals(left, true, &h2, &own_contents, hosts, min_contents, ctx);
        let right_separate = bridge_totals(right, true, &h2, &own_contents, hosts, min_contents, ctx);

        let transfer_left = Event::Diverge {
            segment: Contents::Unordered(left_contents.clone()),
            cut: false,
            transfer: true,
            result: 0,
        };
        for &l in &left_separate {
            for &r in &right_same {
                totals.push(ctx.of(&transfer_left) + l + r);
            }
        }

        let transfer_right = Event::Diverge {
            segment: Contents::Unordered(right_contents.clone()),
            cut: false,
            transfer: true,
            result: 1,
        };
        for &l in &left_same {
            for &r in &right_separate {
                totals.push(ctx.of(&transfer_right) + l + r);
            }
        }

        if is_partition {
            let cut_transfer_left = Event::Diverge {
                segment: Contents::Unordered(left_contents.clone()),
                cut: true,
                transfer: true,
                result: 0,
            };
            for &l in &left_separate {
                for &r in &right_same {
                    totals.push(ctx.of(&cut_transfer_left) + l + r);
                }
            }

            let cut_transfer_right = Event::Diverge {
                segment: Contents::Unordered(right_contents.clone()),
                cut: true,
                transfer: true,
                result: 1,
            };
            for &l in &left_same {
                for &r in &right_separate {
                    totals.push(ctx.of(&cut_transfer_right) + l + r);
                }
            }
        }
    }

    totals
}

/// Every total reachable by bridging `child`'s own table entry back up to
/// `(start_host, own_contents)`. When `separate` (a transfer), the child is
/// pinned to `start_host` directly; otherwise every host not a strict
/// ancestor of `start_host` is tried as the child's actual table entry,
/// mirroring the DP engine's `child_choice` but without memoizing any of
/// the recursive totals it enumerates.
fn bridge_totals(
    child: &Node<Associate>,
    separate: bool,
    start_host: &str,
    own_contents: &ContentsSet,
    hosts: &HostIndex,
    min_contents: &MinContents,
    ctx: &EventCosts,
) -> Vec<i64> {
    let child_min = min_contents.get(&child.data.name).cloned().unwrap_or_default();
    let start_contents: ContentsSet = child_min.intersection(own_contents).cloned().collect();

    if separate {
        return enumerate_at(child, start_host, hosts, min_contents, ctx)
            .into_iter()
            .map(|l| make_path::<MinPlus>(ctx, start_host, start_host, &start_contents, &child_min, hosts, &l))
            .collect();
    }

    let mut totals = Vec::new();
    for end_host in hosts.keys().map(str::to_string).collect::<Vec<_>>() {
        if hosts.is_strict_ancestor_of(&end_host, start_host) {
            continue;
        }
        for l in enumerate_at(child, &end_host, hosts, min_contents, ctx) {
            totals.push(make_path::<MinPlus>(ctx, start_host, &end_host, &start_contents, &child_min, hosts, &l));
        }
    }
    totals
}

/// Every total cost reachable by some reconciliation of `assoc` against
/// `hosts`, trying every root host assignment and the root's own `Gain`.
#[must_use]
pub fn enumerate_all_reconciliations(assoc: &Node<Associate>, hosts: &HostIndex, ctx: &EventCosts) -> Vec<i64> {
    let min_contents = compute_min_contents(assoc);
    let root_contents = min_contents.get(&assoc.data.name).cloned().unwrap_or_default();

    hosts
        .keys()
        .flat_map(|host| {
            enumerate_at(assoc, host, hosts, &min_contents, ctx)
                .into_iter()
                .map(|l| make_path::<MinPlus>(ctx, host, host, &ContentsSet::new(), &root_contents, hosts, &l))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::reconcile;
    use crate::host::Host;
    use crate::tree::Edge;
    use std::sync::Arc;

    fn host_leaf(name: &str) -> Arc<Node<Host>> {
        Arc::new(Node::leaf(Host::new(name)))
    }

    fn host_binary(name: &str, l: Arc<Node<Host>>, r: Arc<Node<Host>>) -> Arc<Node<Host>> {
        Arc::new(Node::with_children(
            Host::new(name),
            vec![Edge { branch: (), node: l }, Edge { branch: (), node: r }],
        ))
    }

    fn assoc_leaf(name: &str, host: &str, contents: &[&str]) -> Arc<Node<Associate>> {
        Arc::new(Node::leaf(Associate::leaf(
            name,
            host,
            Contents::Unordered(contents.iter().map(|s| s.to_string()).collect()),
        )))
    }

    #[test]
    fn matches_dp_on_simple_codivergence() {
        // Scenario S1: host (a,b)c; associate 1@a{x}, 2@b{x}.
        let hosts = host_binary("c", host_leaf("a"), host_leaf("b"));
        let assoc = Node::with_children(
            Associate::internal("r"),
            vec![
                Edge { branch: (), node: assoc_leaf("1", "a", &["x"]) },
                Edge { branch: (), node: assoc_leaf("2", "b", &["x"]) },
            ],
        );
        let ctx = EventCosts::default();
        let index = HostIndex::build(&hosts);
        let brute = enumerate_all_reconciliations(&assoc, &index, &ctx).into_iter().min().unwrap();
        let dp = reconcile::<MinPlus>(&ctx, &assoc, &hosts, false).unwrap();
        assert_eq!(brute, dp);
        assert_eq!(dp, 0);
    }

    #[test]
    fn matches_dp_on_empty_speciation() {
        // Scenario S3: host (a,b)c; associate 1@a{x}, 2@b{y}.
        let hosts = host_binary("c", host_leaf("a"), host_leaf("b"));
        let assoc = Node::with_children(
            Associate::internal("r"),
            vec![
                Edge { branch: (), node: assoc_leaf("1", "a", &["x"]) },
                Edge { branch: (), node: assoc_leaf("2", "b", &["y"]) },
            ],
        );
        let ctx = EventCosts::default();
        let index = HostIndex::build(&hosts);
        let brute = enumerate_all_reconciliations(&assoc, &index, &ctx).into_iter().min().unwrap();
        let dp = reconcile::<MinPlus>(&ctx, &assoc, &hosts, false).unwrap();
        assert_eq!(brute, dp);
    }

    #[test]
    fn matches_dp_on_single_host_duplication() {
        let hosts = host_leaf("a");
        let assoc = Node::with_children(
            Associate::internal("r"),
            vec![
                Edge { branch: (), node: assoc_leaf("1", "a", &["x"]) },
                Edge { branch: (), node: assoc_leaf("2", "a", &["x"]) },
            ],
        );
        let ctx = EventCosts::default();
        let index = HostIndex::build(&hosts);
        let brute = enumerate_all_reconciliations(&assoc, &index, &ctx).into_iter().min().unwrap();
        let dp = reconcile::<MinPlus>(&ctx, &assoc, &hosts, false).unwrap();
        assert_eq!(brute, dp);
    }

    #[test]
    fn matches_dp_on_mismatched_contents() {
        // Same shape as `matches_dp_on_empty_speciation` but with disjoint
        // leaf contents, exercising a larger bridging loss/gain chain.
        let hosts = host_binary("c", host_leaf("a"), host_leaf("b"));
        let assoc = Node::with_children(
            Associate::internal("r"),
            vec![
                Edge { branch: (), node: assoc_leaf("1", "a", &["x", "y"]) },
                Edge { branch: (), node: assoc_leaf("2", "b", &["z"]) },
            ],
        );
        let ctx = EventCosts::default();
        let index = HostIndex::build(&hosts);
        let brute = enumerate_all_reconciliations(&assoc, &index, &ctx).into_iter().min().unwrap();
        let dp = reconcile::<MinPlus>(&ctx, &assoc, &hosts, false).unwrap();
        assert_eq!(brute, dp);
    }

    #[test]
    fn matches_dp_on_factorized_losses() {
        // Host (((a,b)c,d)e,f)g, four leaves with overlapping contents
        // requiring losses on more than one branch.
        let c = host_binary("c", host_leaf("a"), host_leaf("b"));
        let e = host_binary("e", c, host_leaf("d"));
        let hosts = host_binary("g", e, host_leaf("f"));
        let a_node = Associate::internal("bc");
        let bc = Node::with_children(
            a_node,
            vec![
                Edge { branch: (), node: assoc_leaf("1", "a", &["x", "y"]) },
                Edge { branch: (), node: assoc_leaf("2", "b", &["y", "z"]) },
            ],
        );
        let bcd = Node::with_children(
            Associate::internal("bcd"),
            vec![
                Edge { branch: (), node: Arc::new(bc) },
                Edge { branch: (), node: assoc_leaf("3", "d", &["w", "x", "y", "z"]) },
            ],
        );
        let assoc = Node::with_children(
            Associate::internal("r"),
            vec![
                Edge { branch: (), node: Arc::new(bcd) },
                Edge { branch: (), node: assoc_leaf("4", "f", &["w", "x", "y", "z"]) },
            ],
        );
        let ctx = EventCosts {
            loss: 1,
            duplication: 2,
            cut: 3,
            transfer_duplication: 4,
            transfer_cut: 5,
            ..EventCosts::default()
        };
        let index = HostIndex::build(&hosts);
        let brute = enumerate_all_reconciliations(&assoc, &index, &ctx).into_iter().min().unwrap();
        let dp = reconcile::<MinPlus>(&ctx, &assoc, &hosts, false).unwrap();
        assert_eq!(brute, dp);
    }

    #[test]
    fn matches_dp_on_cut_duplication() {
        // Three associates sharing one host, one of which carries the
        // union of the other two's contents — the case a `cut` event is
        // meant to explain cheaply.
        let hosts = host_leaf("a");
        let assoc = Node::with_children(
            Associate::internal("r"),
            vec![
                Edge { branch: (), node: assoc_leaf("1", "a", &["x", "y"]) },
                Edge {
                    branch: (),
                    node: Arc::new(Node::with_children(
                        Associate::internal("r2"),
                        vec![
                            Edge { branch: (), node: assoc_leaf("2", "a", &["z"]) },
                            Edge { branch: (), node: assoc_leaf("3", "a", &["x", "y", "z"]) },
                        ],
                    )),
                },
            ],
        );
        let ctx = EventCosts {
            duplication: 2,
            cut: 1,
            ..EventCosts::default()
        };
        let index = HostIndex::build(&hosts);
        let brute = enumerate_all_reconciliations(&assoc, &index, &ctx).into_iter().min().unwrap();
        let dp = reconcile::<MinPlus>(&ctx, &assoc, &hosts, false).unwrap();
        assert_eq!(brute, dp);
    }

    #[test]
    fn matches_dp_on_transfer() {
        // Host ((a,b)c,(d,e)f)g, with one associate leaf at `d` that must
        // be explained by a transfer out of the `a`/`b`/`c` clade
        // (incomparable to `d`).
        let c = host_binary("c", host_leaf("a"), host_leaf("b"));
        let f = host_binary("f", host_leaf("d"), host_leaf("e"));
        let hosts = host_binary("g", c, f);
        let assoc = Node::with_children(
            Associate::internal("r"),
            vec![
                Edge {
                    branch: (),
                    node: Arc::new(Node::with_children(
                        Associate::internal("r2"),
                        vec![
                            Edge { branch: (), node: assoc_leaf("1", "a", &["x", "y", "z"]) },
                            Edge { branch: (), node: assoc_leaf("2", "d", &["x"]) },
                        ],
                    )),
                },
                Edge { branch: (), node: assoc_leaf("3", "b", &["x", "y", "z"]) },
            ],
        );
        let ctx = EventCosts {
            transfer_duplication: 4,
            ..EventCosts::default()
        };
        let index = HostIndex::build(&hosts);
        let brute = enumerate_all_reconciliations(&assoc, &index, &ctx).into_iter().min().unwrap();
        let dp = reconcile::<MinPlus>(&ctx, &assoc, &hosts, false).unwrap();
        assert_eq!(brute, dp);
    }
}
