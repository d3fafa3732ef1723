//! The compressible-path composer: turns a run of host-tree edges a
//! lineage passes through *without* branching into a short chain of
//! `Codiverge`/`Gain`/`Loss` events bridging two real recurrence table
//! entries.
//!
//! Grounded in
//! `examples/original_source/src/superrec2/compute/superdtlx/paths.py`.
//! The recurrence (§4.4) only tabulates states at nodes where something
//! interesting happens (a codivergence, a duplication, a transfer, a
//! leaf); everything that happens between two such nodes — a lineage
//! riding along several unbranched host-tree edges, the sibling branch at
//! each of them going extinct or staying unsampled, content lost because
//! a sibling branch doesn't need it, content gained because the associate
//! acquired it — is composed here directly into a semiring value, built
//! from the continuation (`path`) the recurrence already computed for the
//! far end of the bridge.
//!
//! Unlike a flat list of events folded onto one accumulator, a
//! codivergence genuinely branches: one child is the short side-branch
//! that goes no further (a `Loss` if its host is sampled, an `Extant` leaf
//! otherwise), the other is the entire continuing `path`. Building this
//! with `Semiring::mul` directly — rather than through an intermediate
//! `Vec<Event>` — is what lets that branching come out right.

use crate::contents::{ContentsSet, EXTRA};
use crate::event::{Contents, Event};
use crate::host::HostIndex;
use crate::semiring::Semiring;

/// Bridge `path` (already at `end_host`, with `end_contents`) back up to
/// `start_host`, walking one host-tree edge at a time. At each level, the
/// edge not taken is closed off with a single `Loss` (if that host is
/// sampled) or `Extant` (if it is a ghost), and a `Codiverge` joins that
/// closed-off side to the (so-far-built) continuation.
///
/// `null` if `start_host` is not an ancestor of `end_host`.
pub fn make_codiv_path<S: Semiring>(
    ctx: &S::Context,
    start_host: &str,
    end_host: &str,
    segment: &ContentsSet,
    hosts: &HostIndex,
    path: &S::Value,
) -> S::Value {
    if !hosts.is_ancestor_of(start_host, end_host) {
        return S::null(ctx);
    }

    let mut host = end_host.to_string();
    let mut acc = path.clone();

    while host != start_host {
        let sibling = hosts
            .sibling_of(&host)
            .expect("start_host is an ancestor of host, so host is not the host-tree root")
            .to_string();
        let parent = hosts
            .parent_of(&host)
            .expect("start_host is an ancestor of host, so host has a parent")
            .to_string();

        let sampled = hosts.get(&sibling).map(|h| h.sampled).unwrap_or(true);
        let side_event = if sampled {
            Event::Loss {
                segment: Contents::Unordered(segment.clone()),
            }
        } else {
            Event::Extant
        };
        let side = S::make(ctx, &side_event);
        let branch = S::mul(ctx, &S::make(ctx, &Event::Codiverge), &side);
        acc = S::mul(ctx, &branch, &acc);

        host = parent;
    }

    acc
}

/// Bridge `path` (at `end_host`, with `end_contents`) to `start_host` via
/// a transfer: either a direct jump (if the two hosts are incomparable),
/// or a codivergence-path descent to the host-tree child that separates
/// toward `end_host`, followed by the jump from there.
///
/// `null` if `end_host` is a (non-strict) ancestor of `start_host`, or if
/// `end_contents` is not a subset of `start_contents` (a transfer can
/// only carry contents the source lineage actually has).
#[allow(clippy::too_many_arguments)]
pub fn make_transfer_path<S: Semiring>(
    ctx: &S::Context,
    start_host: &str,
    end_host: &str,
    start_contents: &ContentsSet,
    end_contents: &ContentsSet,
    hosts: &HostIndex,
    path: &S::Value,
) -> S::Value {
    if hosts.is_ancestor_of(end_host, start_host) {
        return S::null(ctx);
    }
    if !end_contents.is_subset(start_contents) {
        return S::null(ctx);
    }

    if hosts.is_comparable(start_host, end_host) {
        let children = hosts.children_of(start_host);
        let (left, right) = match children {
            [l, r] => (l.as_str(), r.as_str()),
            _ => return S::null(ctx),
        };
        let separating = if hosts.is_ancestor_of(left, end_host) { left } else { right };
        let subpath = make_transfer_path::<S>(ctx, separating, end_host, start_contents, end_contents, hosts, path);
        return make_codiv_path::<S>(ctx, start_host, separating, start_contents, hosts, &subpath);
    }

    let remaining: ContentsSet = start_contents.difference(end_contents).cloned().collect();
    let sampled = hosts.get(start_host).map(|h| h.sampled).unwrap_or(true);
    let closing = |ctx: &S::Context, leftover: &ContentsSet| -> S::Value {
        if sampled {
            S::make(ctx, &Event::Loss { segment: Contents::Unordered(leftover.clone()) })
        } else {
            S::make(ctx, &Event::Extant)
        }
    };

    let copy_event = Event::Diverge {
        segment: Contents::Unordered(end_contents.clone()),
        cut: false,
        transfer: true,
        result: 1,
    };
    let copy = S::mul(ctx, &S::make(ctx, &copy_event), &closing(ctx, start_contents));

    let cut_result = if start_contents == end_contents { 0 } else { 1 };
    let cut_event = Event::Diverge {
        segment: Contents::Unordered(end_contents.clone()),
        cut: true,
        transfer: true,
        result: cut_result,
    };
    let cut = if start_contents == end_contents {
        S::make(ctx, &cut_event)
    } else {
        S::mul(ctx, &S::make(ctx, &cut_event), &closing(ctx, &remaining))
    };

    let combined = S::add(ctx, &copy, &cut);
    S::mul(ctx, &combined, path)
}

/// Prepend a `Gain` to `path` for content present in `end` but absent
/// from `start` (content the associate picks up without branching).
#[must_use]
pub fn make_gain_path<S: Semiring>(ctx: &S::Context, start: &ContentsSet, end: &ContentsSet, path: &S::Value) -> S::Value {
    let gained: ContentsSet = end.difference(start).cloned().collect();
    if gained.is_empty() {
        path.clone()
    } else {
        S::mul(ctx, &S::make(ctx, &Event::Gain { gained: Contents::Unordered(gained) }), path)
    }
}

/// Compose the full bridging path between a parent's `(start_host,
/// start_contents)` and a child's `(end_host, end_contents)`: losses shed
/// as early as possible, gains picked up right before they're needed,
/// then whichever of a codivergence descent or a transfer actually
/// reaches `end_host`, summed as alternatives.
#[must_use]
pub fn make_path<S: Semiring>(
    ctx: &S::Context,
    start_host: &str,
    end_host: &str,
    start_contents: &ContentsSet,
    end_contents: &ContentsSet,
    hosts: &HostIndex,
    path: &S::Value,
) -> S::Value {
    let contents = end_contents.clone();

    if start_contents.is_subset(&contents) && !start_contents.contains(EXTRA) && contents.contains(EXTRA) {
        return S::null(ctx);
    }

    let mut gain_domain = start_contents.clone();
    gain_domain.insert(EXTRA.to_string());
    let without_gains: ContentsSet = contents.intersection(&gain_domain).cloned().collect();

    let gained_path = make_gain_path::<S>(ctx, &without_gains, &contents, path);
    let contents = without_gains;

    let to_lose: ContentsSet = start_contents.difference(&contents).cloned().collect();
    let codiv_path = if !to_lose.is_empty() && !contents.contains(EXTRA) {
        S::mul(ctx, &S::make(ctx, &Event::Loss { segment: Contents::Unordered(to_lose) }), &gained_path)
    } else {
        gained_path
    };

    let codiv_path = make_codiv_path::<S>(ctx, start_host, end_host, start_contents, hosts, &codiv_path);
    let transfer_path = make_transfer_path::<S>(ctx, start_host, end_host, start_contents, &contents, hosts, path);

    S::add(ctx, &codiv_path, &transfer_path)
}
