//! Selector semirings: run a cost semiring and a structural (builder)
//! semiring together, keeping only the structural values attached to the
//! best cost(s) found. This is the "absorption trick": the recurrence's actual
//! choice of path is driven entirely by the cost component; the builder
//! component just rides along and gets pruned whenever its cost loses.

use std::marker::PhantomData;

use crate::costs::EventVector;
use crate::event::Event;

use super::{CostOrder, Semiring};

/// Pairs a [`CostOrder`] semiring `C` with a structural semiring `B`:
/// `add` keeps only the `B` values attached to the better (or tied) `C`
/// cost; `mul` runs both componentwise. Realizes `--method single-solution`
/// (`Selector<MinPlus, SingleHistory>`) and `--method all-solutions`
/// (`Selector<MinPlus, AllHistories>`).
pub struct Selector<C, B>(PhantomData<(C, B)>);

impl<C, B> Semiring for Selector<C, B>
where
    C: CostOrder,
    B: Semiring<Context = C::Context>,
{
    type Value = (C::Value, B::Value);
    type Context = C::Context;

    fn null(ctx: &Self::Context) -> Self::Value {
        (C::null(ctx), B::null(ctx))
    }

    fn unit(ctx: &Self::Context) -> Self::Value {
        (C::unit(ctx), B::unit(ctx))
    }

    fn add(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        if C::equally_good(ctx, &a.0, &b.0) {
            (a.0.clone(), B::add(ctx, &a.1, &b.1))
        } else if C::at_least_as_good(ctx, &a.0, &b.0) {
            a.clone()
        } else {
            b.clone()
        }
    }

    fn mul(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        (C::mul(ctx, &a.0, &b.0), B::mul(ctx, &a.1, &b.1))
    }

    fn make(ctx: &Self::Context, event: &Event) -> Self::Value {
        (C::make(ctx, event), B::make(ctx, event))
    }
}

/// A selector over the multi-objective [`EventVector`] cost, keeping the
/// Pareto-optimal cost vectors and the `B` values tied to each one.
/// Realizes `--method pareto` (`ParetoSelector<Count>`).
pub struct ParetoSelector<B>(PhantomData<B>);

impl<B> ParetoSelector<B>
where
    B: Semiring<Context = ()>,
{
    fn insert(frontier: &mut Vec<(EventVector, B::Value)>, cand: (EventVector, B::Value)) {
        if frontier
            .iter()
            .any(|(v, _)| v.dominates(&cand.0) && *v != cand.0)
        {
            return;
        }
        frontier.retain(|(v, _)| !(cand.0.dominates(v) && *v != cand.0));
        if let Some(slot) = frontier.iter_mut().find(|(v, _)| *v == cand.0) {
            slot.1 = B::add(&(), &slot.1, &cand.1);
        } else {
            frontier.push(cand);
        }
    }
}

impl<B> Semiring for ParetoSelector<B>
where
    B: Semiring<Context = ()>,
{
    type Value = Vec<(EventVector, B::Value)>;
    type Context = ();

    fn null(_ctx: &Self::Context) -> Self::Value {
        Vec::new()
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        vec![(EventVector::default(), B::unit(&()))]
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        let mut out = a.clone();
        for cand in b {
            Self::insert(&mut out, cand.clone());
        }
        out
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        let mut out = Vec::new();
        for (av, ab) in a {
            for (bv, bb) in b {
                Self::insert(&mut out, (*av + *bv, B::mul(&(), ab, bb)));
            }
        }
        out
    }

    fn make(_ctx: &Self::Context, event: &Event) -> Self::Value {
        vec![(EventVector::of(event), B::make(&(), event))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::EventCosts;
    use crate::semiring::{Count, MinPlus};

    #[test]
    fn selector_keeps_the_cheaper_side() {
        let ctx = EventCosts::default();
        let a = (3i64, 1u64);
        let b = (5i64, 2u64);
        let chosen = Selector::<MinPlus, Count>::add(&ctx, &a, &b);
        assert_eq!(chosen, (3, 1));
    }

    #[test]
    fn selector_merges_on_tie() {
        let ctx = EventCosts::default();
        let a = (3i64, 1u64);
        let b = (3i64, 2u64);
        let chosen = Selector::<MinPlus, Count>::add(&ctx, &a, &b);
        assert_eq!(chosen, (3, 3));
    }

    #[test]
    fn pareto_selector_drops_dominated_vectors() {
        let cheap = (EventVector { duplication: 1, ..Default::default() }, 1u64);
        let costly = (EventVector { duplication: 2, ..Default::default() }, 1u64);
        let merged = ParetoSelector::<Count>::add(&(), &vec![cheap], &vec![costly]);
        assert_eq!(merged.len(), 1);
    }
}
