//! Generic algorithms over shaped values.
//!
//! [`DeferredBinding`] is the building block for any algorithm whose
//! per-type workers refer to each other: it lets a worker for a recursive
//! type be assembled before the workers it depends on exist.
//! [`StructuralEquality`] is the reference consumer.

mod deferred;
mod equality;
mod span_eq;
mod stack;

pub use deferred::{DeferredBinding, DeferredError, DeferredHandle};
pub use equality::{
    EqualityConfig, EqualityError, StringComparison, StructuralEquality, TypeComparer,
};
pub use span_eq::{ByteOrdinal, CharOrdinal, CharOrdinalIgnoreCase, SpanEquality};
pub use stack::ensure_sufficient_stack;
