//! `cophy-core`: a semiring-polymorphic dynamic-programming engine for
//! cophylogeny reconciliation.
//!
//! This crate has no I/O of its own — parsing, file access and CLI
//! concerns live entirely in `cophy-cli`. Given a host tree, an associate
//! tree with host/contents annotations, event costs and a choice of
//! semiring, [`facade::reconcile`] runs the recurrence and returns whatever
//! that semiring's values mean (a minimum cost, a Pareto frontier, a single
//! history, every history, ...).

#![forbid(unsafe_code)]

pub mod contents;
pub mod costs;
pub mod error;
pub mod event;
#[cfg(test)]
mod exhaustive;
pub mod facade;
pub mod host;
pub mod paths;
pub mod recurrence;
pub mod semiring;
pub mod tree;

pub use error::{CophyError, Result};
