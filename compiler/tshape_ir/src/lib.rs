//! Core vocabulary for tshape: how types are referenced, identified, and
//! described by the host.
//!
//! The shape engine never inspects language metadata itself. Instead it asks
//! an injected [`FactSource`] for the [`TypeFacts`] of each [`TypeRef`] it
//! discovers, and keys every result by [`TypeIdentity`].
//!
//! # Identity Before Shape
//!
//! A `TypeIdentity` is computed from a `TypeRef` alone. This lets a shape
//! point at a type whose own shape has not been produced yet, which is what
//! makes self-referential and mutually recursive types representable.

mod facts;
mod identity;
mod primitive;
mod type_ref;

pub use facts::{
    ConstructorFacts, ContainerContract, EnumFacts, EnumMemberFacts, FactRegistry, FactSource,
    MemberFacts, MemberFlags, MethodFacts, ParameterFacts, TypeFacts, TypeKind,
};
pub use identity::TypeIdentity;
pub use primitive::Primitive;
pub use type_ref::{TypeRef, UnsupportedKind};
