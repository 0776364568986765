//! Immutable shape collections.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use tshape_ir::{TypeIdentity, TypeRef};

use crate::{ShapeError, ShapeKind, TypeShape};

static NEXT_PROVIDER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique provider identifier.
///
/// Shapes remember the provider that produced them so that shapes from two
/// different traversals are never mixed up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(u64);

impl ProviderId {
    pub(crate) fn fresh() -> Self {
        ProviderId(NEXT_PROVIDER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of shapes produced by one traversal.
///
/// Iteration is ordered by identity, so two providers built from the same
/// roots and facts enumerate identically.
#[derive(Clone, Debug)]
pub struct ShapeProvider {
    id: ProviderId,
    shapes: BTreeMap<TypeIdentity, TypeShape>,
}

impl ShapeProvider {
    pub(crate) fn from_resolved(resolved: FxHashMap<TypeIdentity, ShapeKind>) -> Self {
        let id = ProviderId::fresh();
        let shapes = resolved
            .into_iter()
            .map(|(identity, kind)| (identity.clone(), TypeShape::new(identity, id, kind)))
            .collect();
        ShapeProvider { id, shapes }
    }

    /// Combine several providers into a new one, keeping the first shape seen
    /// for each identity.
    pub fn merge<'p>(providers: impl IntoIterator<Item = &'p ShapeProvider>) -> Self {
        let id = ProviderId::fresh();
        let mut shapes = BTreeMap::new();
        for provider in providers {
            for (identity, shape) in &provider.shapes {
                if !shapes.contains_key(identity) {
                    let rehomed = TypeShape::new(identity.clone(), id, shape.kind().clone());
                    shapes.insert(identity.clone(), rehomed);
                }
            }
        }
        ShapeProvider { id, shapes }
    }

    #[inline]
    pub fn id(&self) -> ProviderId {
        self.id
    }

    /// Look up a shape by identity.
    pub fn get(&self, id: &TypeIdentity) -> Result<&TypeShape, ShapeError> {
        self.shapes
            .get(id)
            .ok_or_else(|| ShapeError::UnknownIdentity(id.clone()))
    }

    pub fn try_get(&self, id: &TypeIdentity) -> Option<&TypeShape> {
        self.shapes.get(id)
    }

    /// Look up the shape of a type reference.
    pub fn shape_of(&self, ty: &TypeRef) -> Result<&TypeShape, ShapeError> {
        self.get(&ty.identity())
    }

    pub fn contains(&self, id: &TypeIdentity) -> bool {
        self.shapes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// All shapes, ordered by identity.
    pub fn iter(&self) -> impl Iterator<Item = &TypeShape> {
        self.shapes.values()
    }

    pub fn identities(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.shapes.keys()
    }

    /// Whether `shape` was produced by this provider.
    pub fn owns(&self, shape: &TypeShape) -> bool {
        shape.provider() == self.id
    }

    /// Fail with [`ShapeError::ForeignShape`] unless this provider owns
    /// `shape`.
    pub fn check_owned(&self, shape: &TypeShape) -> Result<(), ShapeError> {
        if self.owns(shape) {
            Ok(())
        } else {
            Err(ShapeError::ForeignShape {
                id: shape.id().clone(),
                owner: shape.provider(),
                expected: self.id,
            })
        }
    }
}
