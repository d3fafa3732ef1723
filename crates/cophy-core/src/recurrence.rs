//! The bottom-up dynamic-programming driver.
//!
//! Grounded in
//! `examples/original_source/src/superrec2/compute/superdtlx/recurrence.py`.
//! One semiring value is computed per (associate node, host) pair. A
//! binary event (codivergence, duplication, transfer) combines its two
//! children's values, each bridged in from wherever its own table entry
//! sits via a [`HostChoice`] (`child_choice`): `Left`/`Right`/`Incoming`
//! try every host not a strict ancestor of the chosen starting host,
//! letting the bridging path in [`crate::paths`] walk down as many
//! unbranched host-tree levels as needed; `Separate` (a transfer) jumps
//! directly to one fixed incomparable host. The table is memoized so
//! each (node, host) pair is computed once; [`reconcile`] sums over every
//! possible host for the associate root, each wrapped in the `Gain` the
//! root needs to first acquire its own contents.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::contents::{compute_min_contents, ContentsSet, MinContents};
use crate::event::{Associate, Contents, Event};
use crate::host::HostIndex;
use crate::paths::make_path;
use crate::semiring::Semiring;
use crate::tree::Node;

/// Which host a recurrence table entry assigns to an associate node,
/// relative to the host its parent was assigned: staying there pending a
/// later branching event (`Incoming`), moving to the left or right child
/// of that host (`Left`/`Right`, the two codivergence orders), or jumping
/// to an unrelated host entirely (`Separate`, a transfer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostChoice {
    Incoming,
    Left,
    Right,
    Separate,
}

/// Which contents a recurrence table entry uses at a node: exactly what
/// its parent passed down (`Incoming`), or the smallest set any valid
/// history must account for there (`Minimal`, from
/// [`crate::contents::compute_min_contents`]). This implementation always
/// resolves to `Minimal` internally — the bridging path composed by
/// [`crate::paths`] absorbs the difference between a parent's contents
/// and whatever a child's minimum actually is — but both variants are
/// named here since they are the vocabulary the recurrence table is
/// described with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentsChoice {
    Incoming,
    Minimal,
}

struct Engine<'a, S: Semiring> {
    ctx: &'a S::Context,
    hosts: &'a HostIndex,
    min_contents: &'a MinContents,
    memo: RefCell<HashMap<(String, String), S::Value>>,
}

impl<'a, S: Semiring> Engine<'a, S> {
    #[instrument(level = "trace", skip(self, node))]
    fn compute(&self, node: &Node<Associate>, host: &str) -> S::Value {
        let key = (node.data.name.clone(), host.to_string());
        if let Some(v) = self.memo.borrow().get(&key) {
            trace!("memo hit");
            return v.clone();
        }
        // Guard against revisiting a (node, host) pair that is already
        // on the call stack: the host tree and associate tree are both
        // finite DAGs of strictly decreasing size, so this only ever
        // protects against a bug, not a real input shape.
        self.memo.borrow_mut().insert(key.clone(), S::null(self.ctx));

        let value = if node.is_leaf() {
            self.leaf_value(node, host)
        } else {
            self.internal_value(node, host)
        };

        self.memo.borrow_mut().insert(key, value.clone());
        value
    }

    fn leaf_value(&self, node: &Node<Associate>, host: &str) -> S::Value {
        match &node.data.host {
            Some(h) if h == host => S::make(self.ctx, &Event::Extant),
            _ => S::null(self.ctx),
        }
    }

    fn internal_value(&self, node: &Node<Associate>, host: &str) -> S::Value {
        let left = node.child(0).expect("associate tree must be binarized before reconciliation");
        let right = node.child(1).expect("associate tree must be binarized before reconciliation");
        let own_contents = self.min_contents.get(&node.data.name).cloned().unwrap_or_default();
        let left_contents: ContentsSet = self
            .min_contents
            .get(&left.data.name)
            .cloned()
            .unwrap_or_default()
            .intersection(&own_contents)
            .cloned()
            .collect();
        let right_contents: ContentsSet = self
            .min_contents
            .get(&right.data.name)
            .cloned()
            .unwrap_or_default()
            .intersection(&own_contents)
            .cloned()
            .collect();

        let mut total = S::null(self.ctx);

        // Codivergence: `host` splits into its two children, each
        // associate child bridged (possibly through several unbranched
        // host-tree levels) down to wherever its own table entry sits.
        let host_children = self.hosts.children_of(host).to_vec();
        if host_children.len() == 2 {
            let (hl, hr) = (host_children[0].clone(), host_children[1].clone());
            for (host_left, host_right) in [(hl.clone(), hr.clone()), (hr, hl)] {
                let left_value = self.child_choice(left, HostChoice::Left, &host_left, &own_contents);
                let right_value = self.child_choice(right, HostChoice::Right, &host_right, &own_contents);
                let event_value = S::make(self.ctx, &Event::Codiverge);
                let combined = S::mul(self.ctx, &S::mul(self.ctx, &event_value, &left_value), &right_value);
                total = S::add(self.ctx, &total, &combined);
            }
        }

        // Both children staying at `host` pending a later event: the
        // shared bridging value used by Duplication and Cut below.
        let left_same = self.child_choice(left, HostChoice::Incoming, host, &own_contents);
        let right_same = self.child_choice(right, HostChoice::Incoming, host, &own_contents);

        // Duplication: a copy stays with each result. `segment` is always
        // the left child's contents; `result` names whichever side is the
        // exact (unreduced) copy of the parent's own contents.
        let duplication_result = if right_contents == own_contents { 0 } else { 1 };
        let duplication = Event::Diverge {
            segment: Contents::Unordered(left_contents.clone()),
            cut: false,
            transfer: false,
            result: duplication_result,
        };
        let duplication_value = S::mul(
            self.ctx,
            &S::mul(self.ctx, &S::make(self.ctx, &duplication), &left_same),
            &right_same,
        );
        total = S::add(self.ctx, &total, &duplication_value);

        // Cut and cut-transfer only make sense when the two results
        // genuinely partition the parent's contents: every item goes to
        // exactly one side, none shared, none dropped.
        let partitions: ContentsSet = left_contents.union(&right_contents).cloned().collect();
        let is_partition = partitions == own_contents && left_contents.is_disjoint(&right_contents);

        if is_partition {
            let cut = Event::Diverge {
                segment: Contents::Unordered(left_contents.clone()),
                cut: true,
                transfer: false,
                result: 0,
            };
            let cut_value = S::mul(self.ctx, &S::mul(self.ctx, &S::make(self.ctx, &cut), &left_same), &right_same);
            total = S::add(self.ctx, &total, &cut_value);
        }

        // Transfer-duplication and cut-transfer: one child jumps to a
        // host incomparable with `host`, the other stays behind.
        for h2 in self.hosts.keys().map(str::to_string).collect::<Vec<_>>() {
            if self.hosts.is_comparable(host, &h2) {
                continue;
            }

            let left_separate = self.child_choice(left, HostChoice::Separate, &h2, &own_contents);
            let right_separate = self.child_choice(right, HostChoice::Separate, &h2, &own_contents);

            let transfer_left = Event::Diverge {
                segment: Contents::Unordered(left_contents.clone()),
                cut: false,
                transfer: true,
                result: 0,
            };
            let value = S::mul(
                self.ctx,
                &S::mul(self.ctx, &S::make(self.ctx, &transfer_left), &left_separate),
                &right_same,
            );
            total = S::add(self.ctx, &total, &value);

            let transfer_right = Event::Diverge {
                segment: Contents::Unordered(right_contents.clone()),
                cut: false,
                transfer: true,
                result: 1,
            };
            let value = S::mul(
                self.ctx,
                &S::mul(self.ctx, &S::make(self.ctx, &transfer_right), &left_same),
                &right_separate,
            );
            total = S::add(self.ctx, &total, &value);

            if is_partition {
                let cut_transfer_left = Event::Diverge {
                    segment: Contents::Unordered(left_contents.clone()),
                    cut: true,
                    transfer: true,
                    result: 0,
                };
                let value = S::mul(
                    self.ctx,
                    &S::mul(self.ctx, &S::make(self.ctx, &cut_transfer_left), &left_separate),
                    &right_same,
                );
                total = S::add(self.ctx, &total, &value);

                let cut_transfer_right = Event::Diverge {
                    segment: Contents::Unordered(right_contents.clone()),
                    cut: true,
                    transfer: true,
                    result: 1,
                };
                let value = S::mul(
                    self.ctx,
                    &S::mul(self.ctx, &S::make(self.ctx, &cut_transfer_right), &left_same),
                    &right_separate,
                );
                total = S::add(self.ctx, &total, &value);
            }
        }

        total
    }

    /// Bridge a child's recurrence value back up to the contents it
    /// carries at `start_host`, from whichever host its own table entry
    /// actually sits at. `choice` is the [`HostChoice`] the caller is
    /// resolving `start_host` for — only `Separate` changes behavior (a
    /// transfer jumps straight to `start_host`, no further descent); the
    /// other three all try every host not a strict ancestor of
    /// `start_host`, the gap to each bridged by [`make_path`]'s
    /// multi-level codivergence/loss walk, so the child may sit at
    /// `start_host` itself or arbitrarily far down one of its descendants.
    fn child_choice(&self, child: &Node<Associate>, choice: HostChoice, start_host: &str, own_contents: &ContentsSet) -> S::Value {
        let child_min = self.min_contents.get(&child.data.name).cloned().unwrap_or_default();
        let start_contents: ContentsSet = child_min.intersection(own_contents).cloned().collect();

        if choice == HostChoice::Separate {
            let inner = self.compute(child, start_host);
            return make_path::<S>(self.ctx, start_host, start_host, &start_contents, &child_min, self.hosts, &inner);
        }

        let mut total = S::null(self.ctx);
        for end_host in self.hosts.keys().map(str::to_string).collect::<Vec<_>>() {
            if self.hosts.is_strict_ancestor_of(&end_host, start_host) {
                continue;
            }
            let inner = self.compute(child, &end_host);
            let bridged = make_path::<S>(self.ctx, start_host, &end_host, &start_contents, &child_min, self.hosts, &inner);
            total = S::add(self.ctx, &total, &bridged);
        }
        total
    }
}

/// Run the full recurrence over `assoc`, trying every host
/// as the root's assignment and wrapping each in the `Gain` the root
/// needs to first acquire its own contents (the root wrap-in-gain step),
/// summed via the semiring's `+`.
#[must_use]
#[instrument(level = "debug", skip(ctx, assoc, hosts))]
pub fn reconcile<S: Semiring>(ctx: &S::Context, assoc: &Node<Associate>, hosts: &HostIndex) -> S::Value {
    let min_contents = compute_min_contents(assoc);
    let engine = Engine::<S> {
        ctx,
        hosts,
        min_contents: &min_contents,
        memo: RefCell::new(HashMap::new()),
    };

    let root_contents = min_contents.get(&assoc.data.name).cloned().unwrap_or_default();
    let mut total = S::null(ctx);
    for host in hosts.keys() {
        let sub = engine.compute(assoc, host);
        let gained = make_path::<S>(ctx, host, host, &ContentsSet::new(), &root_contents, hosts, &sub);
        total = S::add(ctx, &total, &gained);
    }
    total
}
