//! Persistent rooted trees with node data and arbitrary branch data.
//!
//! [`Node`] is the generic tree primitive shared by the host phylogeny and
//! the associate phylogeny: a rooted tree where every node carries a
//! payload and every edge carries its own (possibly unit) data. Trees are
//! immutable and structurally shared (`Arc`-backed), so cloning a [`Node`]
//! is O(1) and cheap copies can be handed to worker threads.
//!
//! [`Cursor`] is a zipper over a [`Node`]: it supports descending into a
//! child, ascending back to the parent, and replacing the focused subtree,
//! rebuilding only the spine back to the root (the rest of the tree is
//! shared, not copied).

pub mod fold;
pub mod node;
pub mod zipper;

pub use node::{Edge, Node};
pub use zipper::Cursor;
