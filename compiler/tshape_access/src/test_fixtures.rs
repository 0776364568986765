//! Shared fact registry for accessor tests.

use std::sync::Arc;

use tshape_ir::{
    ConstructorFacts, ContainerContract, FactRegistry, ParameterFacts, Primitive, TypeFacts,
    TypeRef,
};
use tshape_types::{build_provider, ShapeProvider, ADD_METHOD};

pub fn int() -> TypeRef {
    Primitive::Int32.type_ref()
}

pub fn string() -> TypeRef {
    Primitive::String.type_ref()
}

pub fn person() -> TypeRef {
    TypeRef::named("Person")
}

/// Mutable list of ints.
pub fn int_list() -> TypeRef {
    TypeRef::generic("List", [int()])
}

/// Span-constructed immutable array.
pub fn frozen() -> TypeRef {
    TypeRef::generic("Frozen", [int()])
}

/// Sequence-constructed queue.
pub fn queue() -> TypeRef {
    TypeRef::generic("Queue", [string()])
}

/// Read-only view with no construction path.
pub fn view() -> TypeRef {
    TypeRef::generic("View", [int()])
}

pub fn scores() -> TypeRef {
    TypeRef::generic("Dictionary", [string(), int()])
}

/// Interface dictionary built as [`scores`].
pub fn counts() -> TypeRef {
    TypeRef::generic("IDictionary", [string(), int()])
}

/// Interface list built through a static span factory.
pub fn batch() -> TypeRef {
    TypeRef::generic("Batch", [int()])
}

pub fn hashtable() -> TypeRef {
    TypeRef::named("Hashtable")
}

pub fn color() -> TypeRef {
    TypeRef::named("Color")
}

pub fn registry() -> FactRegistry {
    let mut registry = FactRegistry::with_primitives();
    let object = Primitive::Object.type_ref();

    registry.register(
        &person(),
        TypeFacts::class()
            .with_property("Name", string())
            .with_property("Age", int())
            .with_read_only("Id", Primitive::Int64.type_ref())
            .with_constructor(ConstructorFacts::parameterless())
            .with_constructor(ConstructorFacts::new([
                ParameterFacts::new("name", string()),
                ParameterFacts::new("age", int()),
                ParameterFacts::new("nickname", string()),
            ])),
    );
    registry.register(
        &int_list(),
        TypeFacts::class()
            .with_contract(ContainerContract::Enumerable(int()))
            .with_constructor(ConstructorFacts::parameterless())
            .with_method(ADD_METHOD, [int()]),
    );
    registry.register(
        &frozen(),
        TypeFacts::structure()
            .with_contract(ContainerContract::Enumerable(int()))
            .with_constructor(ConstructorFacts::taking(TypeRef::span_of(int()))),
    );
    registry.register(
        &queue(),
        TypeFacts::class()
            .with_contract(ContainerContract::Enumerable(string()))
            .with_constructor(ConstructorFacts::taking(TypeRef::sequence_of(string()))),
    );
    registry.register(
        &view(),
        TypeFacts::interface().with_contract(ContainerContract::Enumerable(int())),
    );
    registry.register(
        &scores(),
        TypeFacts::class()
            .with_contract(ContainerContract::Dictionary {
                key: string(),
                value: int(),
            })
            .with_constructor(ConstructorFacts::parameterless())
            .with_method(ADD_METHOD, [string(), int()]),
    );
    registry.register(
        &counts(),
        TypeFacts::interface()
            .with_contract(ContainerContract::Dictionary {
                key: string(),
                value: int(),
            })
            .with_implementation(scores()),
    );
    registry.register(
        &batch(),
        TypeFacts::interface()
            .with_contract(ContainerContract::Enumerable(int()))
            .with_factory("Create", [TypeRef::span_of(int())]),
    );
    registry.register(
        &hashtable(),
        TypeFacts::class()
            .with_contract(ContainerContract::UntypedDictionary)
            .with_constructor(ConstructorFacts::parameterless())
            .with_method(ADD_METHOD, [object.clone(), object]),
    );
    registry.register(
        &color(),
        TypeFacts::enumeration(int(), [("Red", 1), ("Green", 2)]),
    );
    registry
}

pub fn provider() -> Arc<ShapeProvider> {
    let roots = [
        person(),
        int_list(),
        frozen(),
        queue(),
        view(),
        scores(),
        counts(),
        batch(),
        hashtable(),
        color(),
        TypeRef::array(int(), 1),
        TypeRef::array(int(), 2),
    ];
    build_provider(&registry(), roots).provider
}
