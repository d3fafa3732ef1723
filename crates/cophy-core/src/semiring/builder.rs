//! Structural semirings that build actual history shapes rather than
//! scores: "a single representative history" and "every history".
//!
//! A fragment is a bare [`tree::Node<Event>`] — just the event at each
//! point, no host/contents annotation (those are attached afterwards by
//! the recurrence driver, which already tracks them outside the
//! semiring algebra). The calling convention these two semirings assume
//! is: `mul(make(event), mul(left_child, right_child))` for a binary
//! event, or `mul(make(event), only_child)` for a unary one — i.e. the
//! recurrence always multiplies a freshly `make`d event fragment by its
//! (already computed) children, never the other way around. A `make`d
//! fragment is recognizable by having no children yet, so `mul` knows to
//! attach rather than append.

use std::sync::Arc;

use crate::event::Event;
use crate::tree::{Edge, Node};

use super::Semiring;

/// A history fragment: an event, with its already-built children.
pub type Fragment = Arc<Node<Event>>;

fn attach(parent: &Fragment, child: &Fragment) -> Fragment {
    let mut children = parent.children.clone();
    children.push(Edge {
        branch: (),
        node: child.clone(),
    });
    Arc::new(Node::with_children(parent.data.clone(), children))
}

/// Builds one representative history (the `--method single-solution` semiring).
pub struct SingleHistory;

impl Semiring for SingleHistory {
    type Value = Option<Fragment>;
    type Context = ();

    fn null(_ctx: &Self::Context) -> Self::Value {
        None
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        Some(Arc::new(Node::leaf(Event::Extant)))
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        // "Single" means any valid choice is acceptable; prefer whichever
        // side already has one.
        a.clone().or_else(|| b.clone())
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        match (a, b) {
            (Some(parent), Some(child)) => Some(attach(parent, child)),
            _ => None,
        }
    }

    fn make(_ctx: &Self::Context, event: &Event) -> Self::Value {
        Some(Arc::new(Node::leaf(event.clone())))
    }
}

/// Builds every valid history (the `--method all-solutions` semiring).
pub struct AllHistories;

impl Semiring for AllHistories {
    type Value = Vec<Fragment>;
    type Context = ();

    fn null(_ctx: &Self::Context) -> Self::Value {
        Vec::new()
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        vec![Arc::new(Node::leaf(Event::Extant))]
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        let mut out = a.clone();
        for frag in b {
            if !out.contains(frag) {
                out.push(frag.clone());
            }
        }
        out
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        let mut out = Vec::with_capacity(a.len() * b.len());
        for parent in a {
            for child in b {
                out.push(attach(parent, child));
            }
        }
        out
    }

    fn make(_ctx: &Self::Context, event: &Event) -> Self::Value {
        vec![Arc::new(Node::leaf(event.clone()))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_history_mul_attaches_child() {
        let parent = SingleHistory::make(&(), &Event::Codiverge);
        let child = SingleHistory::unit(&());
        let combined = SingleHistory::mul(&(), &parent, &child);
        assert_eq!(combined.unwrap().children.len(), 1);
    }

    #[test]
    fn all_histories_mul_is_cartesian() {
        let a = AllHistories::make(&(), &Event::Codiverge);
        let b = vec![
            Arc::new(Node::leaf(Event::Extant)),
            Arc::new(Node::leaf(Event::Extant)),
        ];
        let combined = AllHistories::mul(&(), &a, &b);
        assert_eq!(combined.len(), 2);
    }

    #[test]
    fn all_histories_add_concatenates_without_duplicates() {
        let a = vec![Arc::new(Node::leaf(Event::Extant))];
        let b = a.clone();
        let combined = AllHistories::add(&(), &a, &b);
        assert_eq!(combined.len(), 1);
    }
}
