//! Scalar-valued semirings: minimum cost, maximum (e.g. likelihood under a
//! max-weight model), Viterbi probability, existence, and event count.

use crate::costs::EventCosts;
use crate::event::Event;

use super::{CostOrder, Semiring};

/// Minimum-cost semiring: `+` is `min`, `×` is `+`, `null` is `+infinity`.
/// This is the semiring `cophy reconcile` uses by default.
pub struct MinPlus;

impl Semiring for MinPlus {
    type Value = i64;
    type Context = EventCosts;

    fn null(_ctx: &Self::Context) -> Self::Value {
        i64::MAX
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        0
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        (*a).min(*b)
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        if *a == i64::MAX || *b == i64::MAX {
            i64::MAX
        } else {
            a + b
        }
    }

    fn make(ctx: &Self::Context, event: &Event) -> Self::Value {
        ctx.of(event)
    }
}

impl CostOrder for MinPlus {
    fn at_least_as_good(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> bool {
        a <= b
    }
}

/// Maximum-cost semiring: `+` is `max`, `×` is `+`, `null` is `-infinity`.
pub struct MaxPlus;

impl Semiring for MaxPlus {
    type Value = i64;
    type Context = EventCosts;

    fn null(_ctx: &Self::Context) -> Self::Value {
        i64::MIN
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        0
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        (*a).max(*b)
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        if *a == i64::MIN || *b == i64::MIN {
            i64::MIN
        } else {
            a + b
        }
    }

    fn make(ctx: &Self::Context, event: &Event) -> Self::Value {
        ctx.of(event)
    }
}

impl CostOrder for MaxPlus {
    fn at_least_as_good(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> bool {
        a >= b
    }
}

/// Viterbi (most-probable-history) semiring: `+` is `max`, `×` is
/// multiplication of probabilities, `null` is `0`. `Context` maps each
/// event kind to a probability via the same `EventCosts`-shaped table,
/// reinterpreting costs as negative log-probabilities is left to the
/// caller; here the context is already per-event probabilities.
pub struct Viterbi;

impl Semiring for Viterbi {
    type Value = f64;
    type Context = EventCosts;

    fn null(_ctx: &Self::Context) -> Self::Value {
        0.0
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        1.0
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        a.max(*b)
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        a * b
    }

    fn make(ctx: &Self::Context, event: &Event) -> Self::Value {
        // Reuses the cost table as a per-event weight in [0, 1]; a weight
        // of 0 means "impossible", matching `null`.
        let cost = ctx.of(event).max(0) as f64;
        (-cost).exp()
    }
}

/// Existence (boolean) semiring: does at least one valid history exist?
/// `+` is logical OR, `×` is logical AND, `null` is `false`.
pub struct Exists;

impl Semiring for Exists {
    type Value = bool;
    type Context = ();

    fn null(_ctx: &Self::Context) -> Self::Value {
        false
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        true
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        *a || *b
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        *a && *b
    }

    fn make(_ctx: &Self::Context, _event: &Event) -> Self::Value {
        true
    }
}

/// Count semiring: how many histories exist at all? `+` is addition, `×`
/// is multiplication, `null` is `0`.
pub struct Count;

impl Semiring for Count {
    type Value = u64;
    type Context = ();

    fn null(_ctx: &Self::Context) -> Self::Value {
        0
    }

    fn unit(_ctx: &Self::Context) -> Self::Value {
        1
    }

    fn add(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        a.saturating_add(*b)
    }

    fn mul(_ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        a.saturating_mul(*b)
    }

    fn make(_ctx: &Self::Context, _event: &Event) -> Self::Value {
        1
    }
}
