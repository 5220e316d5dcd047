//! Deep clone and deep mixin over dynamically-typed value trees.
//!
//! [`deep_clone`] produces a fully independent copy of a value. [`mixin`]
//! folds a chain of sources onto a clone of a base value, filling in only what
//! the base leaves open and letting later sources win. [`classify`] computes
//! the closed type tag both operations branch on.
//!
//! Recursion is bounded by [`MAX_DEPTH`]; exceeding it fails the call with
//! [`Error::RecursionLimitExceeded`].

mod classify;
mod clone;
mod depth;
mod error;
mod json;
mod mixin;
mod value;

pub use classify::{classify, is_object, TypeTag};
pub use clone::deep_clone;
pub use depth::{Depth, MAX_DEPTH};
pub use error::{Error, Operation, Result};
pub use mixin::{mixin, MixinExt, MAX_ARRAY_LEN};
pub use value::{parse_array_index, Callable, Map, Members, Value};
