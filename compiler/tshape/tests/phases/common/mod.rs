//! Shared fixtures for phase tests.
//!
//! One fact registry covers every scenario: recursive object graphs,
//! containers with competing constructors, legacy dictionaries, and objects
//! with restricted members.

use tshape::{
    AccessorMode, ConstructorFacts, ContainerContract, FactRegistry, ParameterFacts, Primitive,
    ShapeProvider, ShapeSystem, ShapeSystemConfig, TypeFacts, TypeRef, ADD_METHOD,
};

/// Both accessor modes, for tests that must hold in each.
pub const MODES: [AccessorMode; 2] = [AccessorMode::AheadOfTime, AccessorMode::Lazy];

pub fn int() -> TypeRef {
    Primitive::Int32.type_ref()
}

pub fn string() -> TypeRef {
    Primitive::String.type_ref()
}

pub fn object() -> TypeRef {
    Primitive::Object.type_ref()
}

/// Refers to itself through `Manager` and to [`department`] through
/// `Department`.
pub fn employee() -> TypeRef {
    TypeRef::named("Employee")
}

/// Refers back to [`employee`] through `Head`.
pub fn department() -> TypeRef {
    TypeRef::named("Department")
}

/// Offers a span constructor, a sequence constructor, and a parameterless
/// constructor with `Add`.
pub fn immutable_list() -> TypeRef {
    TypeRef::generic("ImmutableList", [int()])
}

/// Legacy dictionary with a parameterless constructor and `Add`.
pub fn hashtable() -> TypeRef {
    TypeRef::named("Hashtable")
}

/// Legacy dictionary with no usable constructor.
pub fn frozen_table() -> TypeRef {
    TypeRef::named("FrozenTable")
}

/// Read-only coordinates, constructible only with arguments.
pub fn point() -> TypeRef {
    TypeRef::named("Point")
}

pub fn roster() -> TypeRef {
    TypeRef::generic("Dictionary", [string(), employee()])
}

pub fn registry() -> FactRegistry {
    let mut registry = FactRegistry::with_primitives();

    registry.register(
        &employee(),
        TypeFacts::class()
            .with_property("Name", string())
            .with_property("Manager", employee())
            .with_property("Department", department())
            .with_constructor(ConstructorFacts::parameterless()),
    );
    registry.register(
        &department(),
        TypeFacts::class()
            .with_property("Title", string())
            .with_property("Head", employee())
            .with_constructor(ConstructorFacts::parameterless()),
    );
    registry.register(
        &immutable_list(),
        TypeFacts::class()
            .with_contract(ContainerContract::Enumerable(int()))
            .with_constructor(ConstructorFacts::parameterless())
            .with_constructor(ConstructorFacts::taking(TypeRef::sequence_of(int())))
            .with_constructor(ConstructorFacts::taking(TypeRef::span_of(int())))
            .with_method(ADD_METHOD, [int()]),
    );
    registry.register(
        &hashtable(),
        TypeFacts::class()
            .with_contract(ContainerContract::UntypedDictionary)
            .with_constructor(ConstructorFacts::parameterless())
            .with_method(ADD_METHOD, [object(), object()]),
    );
    registry.register(
        &frozen_table(),
        TypeFacts::class()
            .with_contract(ContainerContract::UntypedDictionary)
            .with_method(ADD_METHOD, [object(), object()]),
    );
    registry.register(
        &point(),
        TypeFacts::structure()
            .with_read_only("X", int())
            .with_read_only("Y", int())
            .with_constructor(ConstructorFacts::new([
                ParameterFacts::new("x", int()),
                ParameterFacts::new("y", int()),
            ])),
    );
    registry.register(
        &roster(),
        TypeFacts::class()
            .with_contract(ContainerContract::Dictionary {
                key: string(),
                value: employee(),
            })
            .with_constructor(ConstructorFacts::parameterless())
            .with_method(ADD_METHOD, [string(), employee()]),
    );

    registry
}

/// Every named root in the registry.
pub fn all_roots() -> Vec<TypeRef> {
    vec![
        employee(),
        immutable_list(),
        hashtable(),
        frozen_table(),
        point(),
        roster(),
    ]
}

pub fn system(mode: AccessorMode) -> ShapeSystem<FactRegistry> {
    tshape::init_tracing();
    ShapeSystem::with_config(
        registry(),
        ShapeSystemConfig::default().with_accessor_mode(mode),
    )
}

/// Identity names in enumeration order.
pub fn names(provider: &ShapeProvider) -> Vec<&str> {
    provider.identities().map(|id| id.name()).collect()
}
