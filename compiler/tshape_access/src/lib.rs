//! Runtime access to shaped types.
//!
//! A [`TypeShapeProvider`] pairs a [`ShapeProvider`](tshape_types::ShapeProvider)
//! with a [`MemberAccessorProvider`] that turns shapes into callable
//! operations over [`Value`]s: property getters and setters, constructors,
//! and container population and enumeration.
//!
//! Two accessor providers exist. [`AheadOfTimeAccessors`] synthesizes every
//! operation when it is created; [`LazyAccessors`] synthesizes on first use
//! and memoizes. Callers cannot tell them apart.

mod accessor;
mod aot;
mod check;
mod error;
mod facade;
mod lazy;
mod synth;
mod value;

#[cfg(test)]
mod test_fixtures;

pub use accessor::{
    Accessor, AccessorKey, ArgumentSetter, ArgumentState, ArgumentStateFactory,
    CollectionConstructor, Contents, DefaultConstructor, DictionaryAdd, ElementReader,
    EnumerableAdd, EntryReader, Getter, MemberAccessorProvider, ParameterizedConstructor,
    Setter,
};
pub use aot::AheadOfTimeAccessors;
pub use error::AccessError;
pub use facade::{AccessorMode, TypeAccessors, TypeShapeProvider};
pub use lazy::LazyAccessors;
pub use value::{default_value, primitive_default, ListRef, MapRef, ObjectRef, Value};
