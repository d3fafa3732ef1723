//! The generic semiring algebra the recurrence is written against, and its
//! concrete instances.
//!
//! Grounded in
//! `examples/original_source/src/superrec2/utils/algebras.py`: a semiring
//! here is `null` (the annihilator, "no valid way"), `unit` (the identity,
//! "the empty/base case"), `+` (combine alternative ways to reach the same
//! subproblem) and `×` (combine two independent sub-results into one), plus
//! a `make` hook that lifts a single event into the semiring's value. The
//! recurrence (`crate::recurrence`) is written once against the
//! [`Semiring`] trait and instantiated with whichever concrete semiring the
//! caller asked for (the CLI's `--method`).

pub mod builder;
pub mod cost;
pub mod pareto;
pub mod product;
pub mod selector;

use crate::event::Event;

/// A semiring over event histories.
///
/// `Context` is the "free parameter" to `make` — for the cost semirings
/// this is [`crate::costs::EventCosts`]; for the
/// structural semirings (builder, set-generator, boolean, count) it is
/// `()`.
pub trait Semiring {
    type Value: Clone;
    type Context;

    /// The annihilator: "there is no valid way to do this".
    fn null(ctx: &Self::Context) -> Self::Value;

    /// The identity for `×`: "the empty continuation".
    fn unit(ctx: &Self::Context) -> Self::Value;

    /// Combine two alternative ways of reaching the same subproblem.
    fn add(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Combine two independent sub-results into one.
    fn mul(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Lift a single event into this semiring's value type.
    fn make(ctx: &Self::Context, event: &Event) -> Self::Value;
}

/// A semiring whose values admit a total "is at least as good as" order,
/// so that [`selector::Selector`] can decide which of two equal-cost
/// alternatives to keep a representative of.
pub trait CostOrder: Semiring {
    /// True if `a` is at least as good a value as `b` (e.g. `a <= b` for
    /// a minimizing semiring, `a >= b` for a maximizing one).
    fn at_least_as_good(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> bool;

    /// True if `a` and `b` are equally good (neither dominates the other).
    fn equally_good(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> bool {
        Self::at_least_as_good(ctx, a, b) && Self::at_least_as_good(ctx, b, a)
    }
}

pub use builder::{AllHistories, SingleHistory};
pub use cost::{Count, Exists, MaxPlus, MinPlus, Viterbi};
pub use pareto::Pareto;
pub use product::Product;
pub use selector::{ParetoSelector, Selector};
