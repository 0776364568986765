//! Shape descriptors.
//!
//! A [`TypeShape`] is the uniform description of one type: enough structure
//! for a generic algorithm to traverse and rebuild values of that type
//! without type-specific code. Every type reference inside a shape is a
//! [`TypeIdentity`], resolved through the owning provider.

use std::fmt;

use tshape_ir::{Primitive, TypeIdentity};

use crate::ProviderId;

/// The structural category of a shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    Object,
    Enum,
    Nullable,
    Enumerable,
    Dictionary,
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShapeCategory::Object => "object",
            ShapeCategory::Enum => "enum",
            ShapeCategory::Nullable => "nullable",
            ShapeCategory::Enumerable => "enumerable",
            ShapeCategory::Dictionary => "dictionary",
        };
        f.write_str(text)
    }
}

/// How a container can be instantiated and populated.
///
/// Variants are declared in ascending priority, so `Ord` ranks them:
/// `SpanBased > Parameterized > Mutable > None`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstructionStrategy {
    /// No way to build; the shape is a read-only view.
    #[default]
    None,
    /// Parameterless constructor followed by repeated `Add` calls.
    Mutable,
    /// Constructor taking a sequence of elements.
    Parameterized,
    /// Constructor taking a contiguous view of elements.
    SpanBased,
}

/// Distinguishes typed key/value containers from legacy untyped ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DictionaryKind {
    /// Mutable typed dictionary.
    Generic,
    /// Read-only typed dictionary.
    ReadOnly,
    /// Legacy dictionary with `object` keys and values.
    Untyped,
}

/// An instance property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyShape {
    pub name: String,
    pub ty: TypeIdentity,
    pub readable: bool,
    pub writable: bool,
}

/// A constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterShape {
    pub name: String,
    pub ty: TypeIdentity,
    pub position: usize,
    /// Index of the property this parameter initializes, matched by name.
    pub property: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorShape {
    pub parameters: Vec<ParameterShape>,
}

impl ConstructorShape {
    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Primitive or user-defined object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    /// Set for built-in scalars, which have no members of their own.
    pub primitive: Option<Primitive>,
    pub properties: Vec<PropertyShape>,
    pub constructors: Vec<ConstructorShape>,
}

impl ObjectShape {
    /// Find a property by exact name.
    pub fn property(&self, name: &str) -> Option<(usize, &PropertyShape)> {
        self.properties
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == name)
    }

    /// Index of the parameterless constructor, if there is one.
    pub fn default_constructor(&self) -> Option<usize> {
        self.constructors
            .iter()
            .position(ConstructorShape::is_parameterless)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumShape {
    pub underlying: TypeIdentity,
    pub members: Vec<EnumMember>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NullableShape {
    pub element: TypeIdentity,
}

/// Alternatives to the container's own constructors.
///
/// At most one factory is set, matching the strategy it provides. Values
/// built through an implementation type carry that type's identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Factories {
    /// Concrete type constructed in place of an abstract container.
    pub implementation: Option<TypeIdentity>,
    /// Static method taking a sequence of elements.
    pub sequence_factory: Option<String>,
    /// Static method taking a span of elements.
    pub span_factory: Option<String>,
}

impl Factories {
    /// Whether `ty` is the concrete type instances are built as.
    pub fn builds_as(&self, ty: &TypeIdentity) -> bool {
        self.implementation.as_ref() == Some(ty)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumerableShape {
    pub element: TypeIdentity,
    /// 1 for flat sequences, greater for multi-dimensional arrays.
    pub rank: u32,
    pub strategy: ConstructionStrategy,
    /// Name of the element-append method; set when `strategy` is `Mutable`.
    pub add_method: Option<String>,
    pub factories: Factories,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DictionaryShape {
    pub key: TypeIdentity,
    pub value: TypeIdentity,
    pub kind: DictionaryKind,
    pub strategy: ConstructionStrategy,
    /// Name of the pair-insert method; set when `strategy` is `Mutable`.
    pub add_method: Option<String>,
    pub factories: Factories,
}

/// Category-specific shape data.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Object(ObjectShape),
    Enum(EnumShape),
    Nullable(NullableShape),
    Enumerable(EnumerableShape),
    Dictionary(DictionaryShape),
}

impl ShapeKind {
    pub fn category(&self) -> ShapeCategory {
        match self {
            ShapeKind::Object(_) => ShapeCategory::Object,
            ShapeKind::Enum(_) => ShapeCategory::Enum,
            ShapeKind::Nullable(_) => ShapeCategory::Nullable,
            ShapeKind::Enumerable(_) => ShapeCategory::Enumerable,
            ShapeKind::Dictionary(_) => ShapeCategory::Dictionary,
        }
    }

    /// Every type identity this shape refers to, in declaration order.
    pub fn referenced_types(&self) -> Vec<&TypeIdentity> {
        match self {
            ShapeKind::Object(object) => object
                .properties
                .iter()
                .map(|p| &p.ty)
                .chain(
                    object
                        .constructors
                        .iter()
                        .flat_map(|c| c.parameters.iter().map(|p| &p.ty)),
                )
                .collect(),
            ShapeKind::Enum(e) => vec![&e.underlying],
            ShapeKind::Nullable(n) => vec![&n.element],
            ShapeKind::Enumerable(e) => std::iter::once(&e.element)
                .chain(&e.factories.implementation)
                .collect(),
            ShapeKind::Dictionary(d) => [&d.key, &d.value]
                .into_iter()
                .chain(&d.factories.implementation)
                .collect(),
        }
    }
}

/// The shape of one type, owned by a [`ShapeProvider`](crate::ShapeProvider).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeShape {
    id: TypeIdentity,
    provider: ProviderId,
    kind: ShapeKind,
}

impl TypeShape {
    pub(crate) fn new(id: TypeIdentity, provider: ProviderId, kind: ShapeKind) -> Self {
        TypeShape { id, provider, kind }
    }

    #[inline]
    pub fn id(&self) -> &TypeIdentity {
        &self.id
    }

    /// The provider this shape was produced by.
    #[inline]
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn category(&self) -> ShapeCategory {
        self.kind.category()
    }

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match &self.kind {
            ShapeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumShape> {
        match &self.kind {
            ShapeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_nullable(&self) -> Option<&NullableShape> {
        match &self.kind {
            ShapeKind::Nullable(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_enumerable(&self) -> Option<&EnumerableShape> {
        match &self.kind {
            ShapeKind::Enumerable(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&DictionaryShape> {
        match &self.kind {
            ShapeKind::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Construction alternatives for containers; `None` for other shapes.
    pub fn factories(&self) -> Option<&Factories> {
        match &self.kind {
            ShapeKind::Enumerable(e) => Some(&e.factories),
            ShapeKind::Dictionary(d) => Some(&d.factories),
            _ => None,
        }
    }

    /// The construction strategy for containers; `None` for other shapes.
    pub fn strategy(&self) -> ConstructionStrategy {
        match &self.kind {
            ShapeKind::Enumerable(e) => e.strategy,
            ShapeKind::Dictionary(d) => d.strategy,
            _ => ConstructionStrategy::None,
        }
    }
}
