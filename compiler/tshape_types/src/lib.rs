//! Shape classification and type-graph traversal.
//!
//! The [`GraphBuilder`] walks the transitive closure of a root set, asks the
//! [`ShapeClassifier`] for one [`TypeShape`] per discovered type, and freezes
//! the result into an immutable [`ShapeProvider`].
//!
//! # Cycles
//!
//! A type's shape is claimed in the result map before its dependents are
//! visited, and shapes refer to each other by [`TypeIdentity`] only, so
//! self-referential and mutually recursive types terminate without special
//! casing.
//!
//! [`TypeIdentity`]: tshape_ir::TypeIdentity

mod classify;
mod error;
mod graph;
mod provider;
mod shape;
mod store;

pub use classify::{Classification, Dependents, ShapeClassifier, ADD_METHOD};
pub use error::ShapeError;
pub use graph::{
    build_provider, build_sharded, BuildOutput, ContainingDeclaration, GraphBuilder,
    ProviderDeclaration,
};
pub use provider::{ProviderId, ShapeProvider};
pub use shape::{
    ConstructionStrategy, ConstructorShape, DictionaryKind, DictionaryShape, EnumMember,
    EnumShape, EnumerableShape, Factories, NullableShape, ObjectShape, ParameterShape,
    PropertyShape, ShapeCategory, ShapeKind, TypeShape,
};
pub use store::ProviderStore;
