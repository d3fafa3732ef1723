//! The Cartesian-product combinator: run two semirings side by side over
//! the same context, pairing their results — e.g. minimum cost alongside
//! event count.

use std::marker::PhantomData;

use crate::event::Event;

use super::Semiring;

/// `Product<A, B>`'s value is `(A::Value, B::Value)`; every operation is
/// applied componentwise.
pub struct Product<A, B>(PhantomData<(A, B)>);

impl<Ctx, A, B> Semiring for Product<A, B>
where
    A: Semiring<Context = Ctx>,
    B: Semiring<Context = Ctx>,
{
    type Value = (A::Value, B::Value);
    type Context = Ctx;

    fn null(ctx: &Self::Context) -> Self::Value {
        (A::null(ctx), B::null(ctx))
    }

    fn unit(ctx: &Self::Context) -> Self::Value {
        (A::unit(ctx), B::unit(ctx))
    }

    fn add(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        (A::add(ctx, &a.0, &b.0), B::add(ctx, &a.1, &b.1))
    }

    fn mul(ctx: &Self::Context, a: &Self::Value, b: &Self::Value) -> Self::Value {
        (A::mul(ctx, &a.0, &b.0), B::mul(ctx, &a.1, &b.1))
    }

    fn make(ctx: &Self::Context, event: &Event) -> Self::Value {
        (A::make(ctx, event), B::make(ctx, event))
    }
}
