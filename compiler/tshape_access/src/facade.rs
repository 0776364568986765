//! The provider façade generic algorithms consume.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tshape_ir::{TypeIdentity, TypeRef};
use tshape_types::{ShapeError, ShapeProvider, TypeShape};

use crate::accessor::{
    ArgumentSetter, ArgumentStateFactory, CollectionConstructor, DefaultConstructor,
    DictionaryAdd, ElementReader, EnumerableAdd, EntryReader, Getter, ParameterizedConstructor,
    Setter,
};
use crate::value::default_value;
use crate::{AccessError, AheadOfTimeAccessors, LazyAccessors, MemberAccessorProvider, Value};

/// When accessor operations are synthesized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessorMode {
    /// Everything up front.
    AheadOfTime,
    /// On first request.
    #[default]
    Lazy,
}

impl AccessorMode {
    pub fn create(
        self,
        provider: Arc<ShapeProvider>,
    ) -> Result<Arc<dyn MemberAccessorProvider>, AccessError> {
        Ok(match self {
            AccessorMode::AheadOfTime => Arc::new(AheadOfTimeAccessors::emit(provider)?),
            AccessorMode::Lazy => Arc::new(LazyAccessors::new(provider)),
        })
    }
}

impl fmt::Display for AccessorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorMode::AheadOfTime => write!(f, "aot"),
            AccessorMode::Lazy => write!(f, "lazy"),
        }
    }
}

impl FromStr for AccessorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aot" | "ahead-of-time" => Ok(AccessorMode::AheadOfTime),
            "lazy" => Ok(AccessorMode::Lazy),
            other => Err(format!("unknown accessor mode `{other}` (expected `aot` or `lazy`)")),
        }
    }
}

/// A shape provider paired with an accessor provider.
#[derive(Clone)]
pub struct TypeShapeProvider {
    shapes: Arc<ShapeProvider>,
    accessors: Arc<dyn MemberAccessorProvider>,
}

impl TypeShapeProvider {
    pub fn new(shapes: Arc<ShapeProvider>, mode: AccessorMode) -> Result<Self, AccessError> {
        let accessors = mode.create(Arc::clone(&shapes))?;
        Ok(TypeShapeProvider { shapes, accessors })
    }

    /// Pair `shapes` with an existing accessor provider.
    pub fn with_accessors(
        shapes: Arc<ShapeProvider>,
        accessors: Arc<dyn MemberAccessorProvider>,
    ) -> Self {
        TypeShapeProvider { shapes, accessors }
    }

    pub fn shapes(&self) -> &ShapeProvider {
        &self.shapes
    }

    pub fn member_accessors(&self) -> &dyn MemberAccessorProvider {
        &*self.accessors
    }

    pub fn get(&self, id: &TypeIdentity) -> Result<&TypeShape, ShapeError> {
        self.shapes.get(id)
    }

    pub fn shape_of(&self, ty: &TypeRef) -> Result<&TypeShape, ShapeError> {
        self.shapes.shape_of(ty)
    }

    /// Accessors scoped to one shape.
    pub fn accessors(&self, id: &TypeIdentity) -> Result<TypeAccessors<'_>, ShapeError> {
        Ok(TypeAccessors {
            shape: self.shapes.get(id)?,
            accessors: &*self.accessors,
        })
    }

    /// The value an unset slot of type `id` holds.
    pub fn default_value(&self, id: &TypeIdentity) -> Result<Value, ShapeError> {
        default_value(&self.shapes, id)
    }
}

/// Accessor operations of one shape, with properties addressed by name.
#[derive(Clone, Copy)]
pub struct TypeAccessors<'p> {
    shape: &'p TypeShape,
    accessors: &'p dyn MemberAccessorProvider,
}

impl<'p> TypeAccessors<'p> {
    pub fn shape(&self) -> &'p TypeShape {
        self.shape
    }

    fn property_index(&self, name: &str) -> Result<usize, AccessError> {
        self.shape
            .as_object()
            .and_then(|object| object.property(name))
            .map(|(index, _)| index)
            .ok_or_else(|| AccessError::UnknownMember {
                owner: self.shape.id().clone(),
                member: name.to_owned(),
            })
    }

    pub fn getter(&self, property: &str) -> Result<Getter, AccessError> {
        let index = self.property_index(property)?;
        self.accessors.getter(self.shape.id(), index)
    }

    pub fn setter(&self, property: &str) -> Result<Setter, AccessError> {
        let index = self.property_index(property)?;
        self.accessors.setter(self.shape.id(), index)
    }

    pub fn default_constructor(&self) -> Result<DefaultConstructor, AccessError> {
        self.accessors.default_constructor(self.shape.id())
    }

    pub fn argument_state(&self, constructor: usize) -> Result<ArgumentStateFactory, AccessError> {
        self.accessors.argument_state(self.shape.id(), constructor)
    }

    pub fn argument_setter(
        &self,
        constructor: usize,
        position: usize,
    ) -> Result<ArgumentSetter, AccessError> {
        self.accessors
            .argument_setter(self.shape.id(), constructor, position)
    }

    pub fn parameterized_constructor(
        &self,
        constructor: usize,
    ) -> Result<ParameterizedConstructor, AccessError> {
        self.accessors
            .parameterized_constructor(self.shape.id(), constructor)
    }

    pub fn enumerable_add(&self) -> Result<EnumerableAdd, AccessError> {
        self.accessors.enumerable_add(self.shape.id())
    }

    pub fn dictionary_add(&self) -> Result<DictionaryAdd, AccessError> {
        self.accessors.dictionary_add(self.shape.id())
    }

    pub fn elements(&self) -> Result<ElementReader, AccessError> {
        self.accessors.elements(self.shape.id())
    }

    pub fn entries(&self) -> Result<EntryReader, AccessError> {
        self.accessors.entries(self.shape.id())
    }

    pub fn sequence_constructor(&self) -> Result<CollectionConstructor, AccessError> {
        self.accessors.sequence_constructor(self.shape.id())
    }

    pub fn span_constructor(&self) -> Result<CollectionConstructor, AccessError> {
        self.accessors.span_constructor(self.shape.id())
    }
}
