//! The Pareto-front semiring: track every cost-vector combination no other
//! reachable combination dominates.

use crate::costs::EventVector;
use crate::event::Event;

use super::Semiring;

/// A Pareto frontier of [`EventVector`]s: no element of the vector
/// dominates another.
pub struct Pareto;

impl Pareto {
    /// Insert `v` into `frontier`, dropping anything `v` dominates and
    /// refusing the insert if something already in `frontier` dominates
    /// `v`. Used by both `add` and `mul` to keep the frontier minimal.
    fn insert(frontier: &mut Vec<EventVector>, v: EventVector) {
        if frontier.iter().any(|existing| existing.dominates(&v) && *existing != v) {
            return;
        }
        frontier.retain(|existing| !(v.dominates(existing) && *existing != v));
        if !frontier.contains(&v) {
            frontier.push(v);
        }
    }

    fn merge(a: &[EventVector], b: &[EventVector]) -> Vec<EventVector> {
        let mut out = a.to_vec();
        for v in b {
            Self::insert(&mut out, *v);
        }
        out
    }
}

impl Semiring for Pareto {
    type Value = Vec<EventVector>;
    type Context = ();

    fn null(_ctx: &Self::Context) -> Self::Value {
        Vec::new()
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        vec![EventVector::default()]
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        Self::merge(a, b)
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        let mut out = Vec::new();
        for x in a {
            for y in b {
                Self::insert(&mut out, *x + *y);
            }
        }
        out
    }

    fn make(_ctx: &Self::Context, event: &Event) -> Self::Value {
        vec![EventVector::of(event)]
    }
}
