//! Structural equality over shaped values.
//!
//! One comparer is built per shape. Comparers of nested types are reached
//! through [`DeferredBinding`] handles: every handle is created before any
//! comparer, so recursive and mutually recursive types need no special
//! treatment. Cycles among *instances* are handled while comparing, by
//! assuming a pair of references already under comparison is equal.

mod config;
mod nodes;
mod walk;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;
use tshape_access::{AccessError, TypeShapeProvider, Value};
use tshape_ir::{Primitive, TypeIdentity};
use tshape_types::{ShapeError, ShapeKind, TypeShape};

pub use config::{EqualityConfig, StringComparison};

use nodes::{
    DictionaryEquality, DynamicEquality, Node, NodeHandle, NullableEquality, ObjectEquality,
    ScalarEquality, SequenceEquality, Table,
};
use walk::{EqWalk, HashWalk};

use crate::{DeferredBinding, DeferredError};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EqualityError {
    #[error("comparison nested deeper than the limit of {limit}")]
    DepthExceeded { limit: usize },
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Deferred(#[from] DeferredError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Equality and hashing for every shape of one provider.
pub struct StructuralEquality {
    table: Table,
    config: EqualityConfig,
}

impl StructuralEquality {
    /// Build comparers for every shape in `provider`.
    #[tracing::instrument(level = "debug", skip_all, fields(shapes = provider.shapes().len()))]
    pub fn build(
        provider: &TypeShapeProvider,
        config: EqualityConfig,
    ) -> Result<Self, EqualityError> {
        let shapes = provider.shapes();
        let bindings: Vec<(TypeIdentity, DeferredBinding<Node>)> = shapes
            .identities()
            .map(|id| (id.clone(), DeferredBinding::new()))
            .collect();
        let table: Table = Arc::new(
            bindings
                .iter()
                .map(|(id, binding)| (id.clone(), binding.handle()))
                .collect::<FxHashMap<_, _>>(),
        );

        for (id, binding) in &bindings {
            let node = build_node(provider, shapes.get(id)?, &table)?;
            binding.bind(node)?;
        }

        debug!(comparers = bindings.len(), strings = ?config.strings, "built structural equality");
        Ok(StructuralEquality { table, config })
    }

    pub fn config(&self) -> &EqualityConfig {
        &self.config
    }

    /// The comparer for values of type `id`.
    pub fn comparer(&self, id: &TypeIdentity) -> Result<TypeComparer<'_>, EqualityError> {
        let slot = handle(&self.table, id)?;
        Ok(TypeComparer {
            node: Arc::clone(slot.get()?),
            config: &self.config,
        })
    }

    pub fn equals(&self, id: &TypeIdentity, a: &Value, b: &Value) -> Result<bool, EqualityError> {
        self.comparer(id)?.equals(a, b)
    }

    pub fn hash(&self, id: &TypeIdentity, value: &Value) -> Result<u64, EqualityError> {
        self.comparer(id)?.hash(value)
    }
}

/// Equality and hashing for one type.
#[derive(Clone)]
pub struct TypeComparer<'e> {
    node: Node,
    config: &'e EqualityConfig,
}

impl TypeComparer<'_> {
    pub fn equals(&self, a: &Value, b: &Value) -> Result<bool, EqualityError> {
        self.node.equals(a, b, &mut EqWalk::new(self.config))
    }

    /// A hash consistent with [`equals`](Self::equals).
    pub fn hash(&self, value: &Value) -> Result<u64, EqualityError> {
        self.node.hash(value, &mut HashWalk::new(self.config))
    }
}

fn handle(table: &Table, id: &TypeIdentity) -> Result<NodeHandle, ShapeError> {
    table
        .get(id)
        .cloned()
        .ok_or_else(|| ShapeError::UnknownIdentity(id.clone()))
}

fn build_node(
    provider: &TypeShapeProvider,
    shape: &TypeShape,
    table: &Table,
) -> Result<Node, EqualityError> {
    let id = shape.id();
    let accessors = provider.member_accessors();
    Ok(match shape.kind() {
        ShapeKind::Object(object) => match object.primitive {
            Some(Primitive::Object) => Arc::new(DynamicEquality {
                table: Arc::clone(table),
            }),
            Some(_) => Arc::new(ScalarEquality),
            None => {
                let mut properties = Vec::new();
                for (index, property) in object.properties.iter().enumerate() {
                    if property.readable {
                        let getter = accessors.getter(id, index)?;
                        properties.push((getter, handle(table, &property.ty)?));
                    }
                }
                Arc::new(ObjectEquality { properties })
            }
        },
        ShapeKind::Enum(_) => Arc::new(ScalarEquality),
        ShapeKind::Nullable(nullable) => Arc::new(NullableEquality {
            inner: handle(table, &nullable.element)?,
        }),
        ShapeKind::Enumerable(enumerable) => Arc::new(SequenceEquality {
            elements: accessors.elements(id)?,
            element: handle(table, &enumerable.element)?,
        }),
        ShapeKind::Dictionary(dictionary) => Arc::new(DictionaryEquality {
            entries: accessors.entries(id)?,
            key: handle(table, &dictionary.key)?,
            value: handle(table, &dictionary.value)?,
        }),
    })
}
