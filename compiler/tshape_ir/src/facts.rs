//! Structural facts supplied by the host.
//!
//! A [`FactSource`] is the only window the shape engine has onto the host's
//! type system. It answers "what does this type look like" in terms of
//! members, constructors, methods, and the container contracts it
//! implements. [`FactRegistry`] is the in-memory implementation.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::{Primitive, TypeIdentity, TypeRef};

bitflags! {
    /// Access facts for a member.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct MemberFlags: u8 {
        /// Has an accessible getter.
        const READABLE = 1 << 0;
        /// Has an accessible setter.
        const WRITABLE = 1 << 1;
        /// Belongs to the type rather than to instances.
        const STATIC = 1 << 2;
        /// Visible to generated code.
        const ACCESSIBLE = 1 << 3;
    }
}

/// A field or property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberFacts {
    pub name: String,
    pub ty: TypeRef,
    pub flags: MemberFlags,
}

impl MemberFacts {
    /// A public read/write instance member.
    pub fn property(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::with_flags(
            name,
            ty,
            MemberFlags::READABLE | MemberFlags::WRITABLE | MemberFlags::ACCESSIBLE,
        )
    }

    /// A public instance member with a getter only.
    pub fn read_only(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::with_flags(name, ty, MemberFlags::READABLE | MemberFlags::ACCESSIBLE)
    }

    pub fn with_flags(name: impl Into<String>, ty: TypeRef, flags: MemberFlags) -> Self {
        MemberFacts {
            name: name.into(),
            ty,
            flags,
        }
    }

    /// Whether the member can appear in an instance shape.
    pub fn is_instance_visible(&self) -> bool {
        self.flags.contains(MemberFlags::ACCESSIBLE)
            && !self.flags.contains(MemberFlags::STATIC)
            && self
                .flags
                .intersects(MemberFlags::READABLE | MemberFlags::WRITABLE)
    }
}

/// A constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterFacts {
    pub name: String,
    pub ty: TypeRef,
}

impl ParameterFacts {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        ParameterFacts {
            name: name.into(),
            ty,
        }
    }
}

/// A constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorFacts {
    pub params: Vec<ParameterFacts>,
    pub accessible: bool,
}

impl ConstructorFacts {
    /// An accessible constructor with the given parameters.
    pub fn new(params: impl IntoIterator<Item = ParameterFacts>) -> Self {
        ConstructorFacts {
            params: params.into_iter().collect(),
            accessible: true,
        }
    }

    /// An accessible parameterless constructor.
    pub fn parameterless() -> Self {
        Self::new([])
    }

    /// An accessible constructor taking a single argument.
    pub fn taking(ty: TypeRef) -> Self {
        Self::new([ParameterFacts::new("source", ty)])
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.accessible = false;
        self
    }

    pub fn is_parameterless(&self) -> bool {
        self.params.is_empty()
    }

    /// The type of the only parameter, if there is exactly one.
    pub fn single_param(&self) -> Option<&TypeRef> {
        match self.params.as_slice() {
            [param] => Some(&param.ty),
            _ => None,
        }
    }
}

/// An instance method, as far as shape construction cares.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodFacts {
    pub name: String,
    pub params: Vec<TypeRef>,
}

impl MethodFacts {
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = TypeRef>) -> Self {
        MethodFacts {
            name: name.into(),
            params: params.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumMemberFacts {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumFacts {
    /// The integral representation type.
    pub underlying: TypeRef,
    pub members: Vec<EnumMemberFacts>,
}

/// The special-case kind of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Primitive(Primitive),
    Enum(EnumFacts),
    /// A nullable wrapper around the given type.
    Nullable(TypeRef),
}

/// A container contract implemented by a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerContract {
    /// Typed element iteration.
    Enumerable(TypeRef),
    /// Legacy element iteration without an element type.
    UntypedEnumerable,
    /// Mutable typed key/value container.
    Dictionary { key: TypeRef, value: TypeRef },
    /// Read-only typed key/value container.
    ReadOnlyDictionary { key: TypeRef, value: TypeRef },
    /// Legacy key/value container without key or value types.
    UntypedDictionary,
}

impl ContainerContract {
    pub fn is_dictionary(&self) -> bool {
        matches!(
            self,
            ContainerContract::Dictionary { .. }
                | ContainerContract::ReadOnlyDictionary { .. }
                | ContainerContract::UntypedDictionary
        )
    }
}

/// Everything the host knows about one type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeFacts {
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub base: Option<TypeRef>,
    pub contracts: Vec<ContainerContract>,
    pub members: Vec<MemberFacts>,
    pub constructors: Vec<ConstructorFacts>,
    pub methods: Vec<MethodFacts>,
    /// Static methods returning an instance of this type.
    pub factories: Vec<MethodFacts>,
    /// Concrete type instantiated in place of an abstract container.
    pub implementation: Option<TypeRef>,
}

impl TypeFacts {
    fn of_kind(kind: TypeKind) -> Self {
        TypeFacts {
            kind,
            is_abstract: false,
            base: None,
            contracts: Vec::new(),
            members: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            factories: Vec::new(),
            implementation: None,
        }
    }

    pub fn class() -> Self {
        Self::of_kind(TypeKind::Class)
    }

    pub fn structure() -> Self {
        Self::of_kind(TypeKind::Struct)
    }

    /// Interfaces are abstract and have no constructors.
    pub fn interface() -> Self {
        let mut facts = Self::of_kind(TypeKind::Interface);
        facts.is_abstract = true;
        facts
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::of_kind(TypeKind::Primitive(primitive))
    }

    pub fn enumeration(
        underlying: TypeRef,
        members: impl IntoIterator<Item = (&'static str, i64)>,
    ) -> Self {
        Self::of_kind(TypeKind::Enum(EnumFacts {
            underlying,
            members: members
                .into_iter()
                .map(|(name, value)| EnumMemberFacts {
                    name: name.to_owned(),
                    value,
                })
                .collect(),
        }))
    }

    pub fn nullable(inner: TypeRef) -> Self {
        Self::of_kind(TypeKind::Nullable(inner))
    }

    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_contract(mut self, contract: ContainerContract) -> Self {
        self.contracts.push(contract);
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: MemberFacts) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_property(self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.with_member(MemberFacts::property(name, ty))
    }

    #[must_use]
    pub fn with_read_only(self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.with_member(MemberFacts::read_only(name, ty))
    }

    #[must_use]
    pub fn with_constructor(mut self, ctor: ConstructorFacts) -> Self {
        self.constructors.push(ctor);
        self
    }

    #[must_use]
    pub fn with_method(
        mut self,
        name: impl Into<String>,
        params: impl IntoIterator<Item = TypeRef>,
    ) -> Self {
        self.methods.push(MethodFacts::new(name, params));
        self
    }

    /// Declare a static factory method returning this type.
    #[must_use]
    pub fn with_factory(
        mut self,
        name: impl Into<String>,
        params: impl IntoIterator<Item = TypeRef>,
    ) -> Self {
        self.factories.push(MethodFacts::new(name, params));
        self
    }

    #[must_use]
    pub fn with_implementation(mut self, implementation: TypeRef) -> Self {
        self.implementation = Some(implementation);
        self
    }

    /// A factory taking exactly one parameter of type `param`.
    pub fn find_factory(&self, param: &TypeRef) -> Option<&MethodFacts> {
        self.factories
            .iter()
            .find(|f| matches!(f.params.as_slice(), [only] if only == param))
    }

    /// Find an accessible instance method by name and exact parameter list.
    pub fn find_method(&self, name: &str, params: &[TypeRef]) -> Option<&MethodFacts> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.params == params)
    }

    /// Whether an instance can be created with no arguments.
    pub fn has_default_constructor(&self) -> bool {
        !self.is_abstract
            && self
                .constructors
                .iter()
                .any(|c| c.accessible && c.is_parameterless())
    }
}

/// Oracle answering structural questions about types.
///
/// Returning `None` means the host knows nothing about the type.
pub trait FactSource {
    fn facts_of(&self, ty: &TypeRef) -> Option<TypeFacts>;
}

/// In-memory [`FactSource`] keyed by type identity.
#[derive(Clone, Debug, Default)]
pub struct FactRegistry {
    types: FxHashMap<TypeIdentity, TypeFacts>,
}

impl FactRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        FactRegistry {
            types: FxHashMap::default(),
        }
    }

    /// Create a registry with every [`Primitive`] pre-registered.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        for primitive in Primitive::ALL {
            registry.register(&primitive.type_ref(), TypeFacts::primitive(primitive));
        }
        registry
    }

    /// Register (or replace) the facts for a type.
    ///
    /// Returns the facts previously registered for the same identity.
    pub fn register(&mut self, ty: &TypeRef, facts: TypeFacts) -> Option<TypeFacts> {
        self.types.insert(ty.identity(), facts)
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.types.contains_key(&ty.identity())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FactSource for FactRegistry {
    fn facts_of(&self, ty: &TypeRef) -> Option<TypeFacts> {
        self.types.get(&ty.identity()).cloned()
    }
}
