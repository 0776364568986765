//! Shape classifier.
//!
//! Assigns every type exactly one [`ShapeCategory`](crate::ShapeCategory)
//! and reports the type references the graph builder must visit next. The
//! classifier never recurses into those references itself, so it is safe on
//! cyclic type graphs.
//!
//! # Rules
//!
//! First match wins:
//! 1. Intrinsic refs (`T[]`, `Span<T>`, `Sequence<T>`, `Pair<K, V>`)
//! 2. Enum facts
//! 3. Nullable wrappers
//! 4. Primitives
//! 5. Dictionary contracts (typed, read-only, then untyped)
//! 6. Enumerable contracts (typed, then untyped)
//! 7. Everything else is an object
//!
//! A container that also declares ordinary properties is classified purely
//! as a container; its properties are not exposed.

use smallvec::SmallVec;
use tshape_ir::{
    ContainerContract, FactSource, MemberFlags, Primitive, TypeFacts, TypeKind, TypeRef,
};

use crate::{
    ConstructionStrategy, ConstructorShape, DictionaryKind, DictionaryShape, EnumMember,
    EnumShape, EnumerableShape, Factories, NullableShape, ObjectShape, ParameterShape,
    PropertyShape, ShapeKind,
};

/// Method name looked up for mutable container population.
pub const ADD_METHOD: &str = "Add";

/// Type references discovered while classifying one type.
pub type Dependents = SmallVec<[TypeRef; 4]>;

/// Result of classifying a single type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub kind: ShapeKind,
    /// Types this shape refers to, in discovery order.
    pub dependents: Dependents,
    /// The fact source had nothing for this type; it was shaped as an inert
    /// object.
    pub facts_missing: bool,
}

impl Classification {
    fn new(kind: ShapeKind) -> Self {
        Classification {
            kind,
            dependents: SmallVec::new(),
            facts_missing: false,
        }
    }

    fn with_dependents(mut self, dependents: impl IntoIterator<Item = TypeRef>) -> Self {
        self.dependents.extend(dependents);
        self
    }
}

/// Container facts resolved from a type's contracts.
struct ContainerInfo {
    element: TypeRef,
    dictionary: Option<(TypeRef, TypeRef, DictionaryKind)>,
}

/// Classifies types using an injected [`FactSource`].
pub struct ShapeClassifier<'f, F: ?Sized> {
    facts: &'f F,
}

impl<'f, F: FactSource + ?Sized> ShapeClassifier<'f, F> {
    pub fn new(facts: &'f F) -> Self {
        ShapeClassifier { facts }
    }

    /// Classify one type.
    pub fn classify(&self, ty: &TypeRef) -> Classification {
        match ty {
            TypeRef::Array { element, rank } => {
                // Rank 0 shares the rank-1 identity; shape it the same way.
                let rank = (*rank).max(1);
                // Multi-dimensional arrays have no flat constructor.
                let strategy = if rank == 1 {
                    ConstructionStrategy::SpanBased
                } else {
                    ConstructionStrategy::None
                };
                enumerable(element, rank, Construction::built_with(strategy, None))
            }
            TypeRef::Span(element) | TypeRef::Sequence(element) => {
                enumerable(element, 1, Construction::unavailable())
            }
            TypeRef::Pair(key, value) => pair(key, value),
            TypeRef::Named { .. } => match self.facts.facts_of(ty) {
                Some(facts) => {
                    let implementation = self.implementation_of(&facts);
                    let classification = classify_facts(&facts, implementation.as_ref());
                    let base = facts.base.iter().cloned();
                    classification
                        .with_dependents(ty.generic_args().iter().cloned())
                        .with_dependents(base)
                }
                None => {
                    let mut classification = Classification::new(ShapeKind::Object(
                        ObjectShape::default(),
                    ))
                    .with_dependents(ty.generic_args().iter().cloned());
                    classification.facts_missing = true;
                    classification
                }
            },
            // Only reachable as member types; roots of these kinds are
            // rejected before traversal.
            TypeRef::Pointer(_) | TypeRef::ByRef(_) | TypeRef::Param(_) | TypeRef::Void => {
                Classification::new(ShapeKind::Object(ObjectShape::default()))
            }
        }
    }

    /// The concrete type an abstract container is built as, with its facts.
    fn implementation_of(&self, facts: &TypeFacts) -> Option<Implementation> {
        let ty = facts.implementation.as_ref().filter(|_| facts.is_abstract)?;
        let implementation = self.facts.facts_of(ty)?;
        (!implementation.is_abstract).then(|| Implementation {
            ty: ty.clone(),
            facts: implementation,
        })
    }
}

struct Implementation {
    ty: TypeRef,
    facts: TypeFacts,
}

/// How a container is built.
struct Construction {
    strategy: ConstructionStrategy,
    add_method: Option<String>,
    factories: Factories,
    /// Set when the implementation type's constructors are used; it becomes
    /// a dependent.
    implementation: Option<TypeRef>,
}

impl Construction {
    fn unavailable() -> Self {
        Construction {
            strategy: ConstructionStrategy::None,
            add_method: None,
            factories: Factories::default(),
            implementation: None,
        }
    }

    fn built_with(strategy: ConstructionStrategy, add_method: Option<String>) -> Self {
        Construction {
            strategy,
            add_method,
            ..Self::unavailable()
        }
    }
}

fn classify_facts(facts: &TypeFacts, implementation: Option<&Implementation>) -> Classification {
    match &facts.kind {
        TypeKind::Enum(e) => Classification::new(ShapeKind::Enum(EnumShape {
            underlying: e.underlying.identity(),
            members: e
                .members
                .iter()
                .map(|m| EnumMember {
                    name: m.name.clone(),
                    value: m.value,
                })
                .collect(),
        }))
        .with_dependents([e.underlying.clone()]),

        TypeKind::Nullable(inner) => Classification::new(ShapeKind::Nullable(NullableShape {
            element: inner.identity(),
        }))
        .with_dependents([inner.clone()]),

        // Checked before contracts: strings iterate chars but are scalars.
        TypeKind::Primitive(primitive) => Classification::new(ShapeKind::Object(ObjectShape {
            primitive: Some(*primitive),
            ..ObjectShape::default()
        })),

        TypeKind::Class | TypeKind::Struct | TypeKind::Interface => {
            match resolve_container(&facts.contracts) {
                Some(ContainerInfo {
                    element,
                    dictionary: Some((key, value, kind)),
                }) => {
                    let construction = resolve_strategy(
                        facts,
                        implementation,
                        &element,
                        &[key.clone(), value.clone()],
                    );
                    let built_as = construction.implementation.clone();
                    Classification::new(ShapeKind::Dictionary(DictionaryShape {
                        key: key.identity(),
                        value: value.identity(),
                        kind,
                        strategy: construction.strategy,
                        add_method: construction.add_method,
                        factories: construction.factories,
                    }))
                    .with_dependents([key, value])
                    .with_dependents(built_as)
                }
                Some(ContainerInfo {
                    element,
                    dictionary: None,
                }) => {
                    let construction = resolve_strategy(
                        facts,
                        implementation,
                        &element,
                        std::slice::from_ref(&element),
                    );
                    let built_as = construction.implementation.clone();
                    enumerable(&element, 1, construction).with_dependents(built_as)
                }
                None => object(facts),
            }
        }
    }
}

/// Pick the container contract with the highest precedence.
fn resolve_container(contracts: &[ContainerContract]) -> Option<ContainerInfo> {
    let object = Primitive::Object.type_ref();

    let dictionary = |kind: DictionaryKind| {
        contracts.iter().find_map(|contract| match (kind, contract) {
            (DictionaryKind::Generic, ContainerContract::Dictionary { key, value })
            | (DictionaryKind::ReadOnly, ContainerContract::ReadOnlyDictionary { key, value }) => {
                Some((key.clone(), value.clone(), kind))
            }
            (DictionaryKind::Untyped, ContainerContract::UntypedDictionary) => {
                Some((object.clone(), object.clone(), kind))
            }
            _ => None,
        })
    };

    let found = dictionary(DictionaryKind::Generic)
        .or_else(|| dictionary(DictionaryKind::ReadOnly))
        .or_else(|| dictionary(DictionaryKind::Untyped));
    if let Some((key, value, kind)) = found {
        return Some(ContainerInfo {
            element: TypeRef::pair(key.clone(), value.clone()),
            dictionary: Some((key, value, kind)),
        });
    }

    let typed = contracts.iter().find_map(|contract| match contract {
        ContainerContract::Enumerable(element) => Some(element.clone()),
        _ => None,
    });
    let untyped = || {
        contracts
            .iter()
            .any(|c| matches!(c, ContainerContract::UntypedEnumerable))
            .then(|| object.clone())
    };
    typed.or_else(untyped).map(|element| ContainerInfo {
        element,
        dictionary: None,
    })
}

/// Try construction paths in priority order: span constructor or factory,
/// sequence constructor or factory, then parameterless-plus-add.
///
/// Constructors and `Add` come from the type itself or, when it is abstract,
/// from its implementation type. Factories are static methods on the type
/// itself, so they also serve abstract types.
fn resolve_strategy(
    facts: &TypeFacts,
    implementation: Option<&Implementation>,
    element: &TypeRef,
    add_params: &[TypeRef],
) -> Construction {
    let built = if facts.is_abstract {
        implementation.map(|i| &i.facts)
    } else {
        Some(facts)
    };

    let span = TypeRef::span_of(element.clone());
    let sequence = TypeRef::sequence_of(element.clone());
    let has_single = |expected: &TypeRef| {
        built.is_some_and(|b| {
            b.constructors
                .iter()
                .any(|c| c.accessible && c.single_param() == Some(expected))
        })
    };
    let factory = |expected: &TypeRef| facts.find_factory(expected).map(|f| f.name.clone());

    let mut construction = if has_single(&span) {
        Construction::built_with(ConstructionStrategy::SpanBased, None)
    } else if let Some(name) = factory(&span) {
        let mut construction = Construction::built_with(ConstructionStrategy::SpanBased, None);
        construction.factories.span_factory = Some(name);
        return construction;
    } else if has_single(&sequence) {
        Construction::built_with(ConstructionStrategy::Parameterized, None)
    } else if let Some(name) = factory(&sequence) {
        let mut construction = Construction::built_with(ConstructionStrategy::Parameterized, None);
        construction.factories.sequence_factory = Some(name);
        return construction;
    } else if built.is_some_and(|b| {
        b.has_default_constructor() && b.find_method(ADD_METHOD, add_params).is_some()
    }) {
        Construction::built_with(ConstructionStrategy::Mutable, Some(ADD_METHOD.to_owned()))
    } else {
        return Construction::unavailable();
    };

    if let Some(implementation) = implementation.filter(|_| facts.is_abstract) {
        construction.factories.implementation = Some(implementation.ty.identity());
        construction.implementation = Some(implementation.ty.clone());
    }
    construction
}

fn enumerable(element: &TypeRef, rank: u32, construction: Construction) -> Classification {
    Classification::new(ShapeKind::Enumerable(EnumerableShape {
        element: element.identity(),
        rank,
        strategy: construction.strategy,
        add_method: construction.add_method,
        factories: construction.factories,
    }))
    .with_dependents([element.clone()])
}

fn pair(key: &TypeRef, value: &TypeRef) -> Classification {
    let property = |name: &str, ty: &TypeRef| PropertyShape {
        name: name.to_owned(),
        ty: ty.identity(),
        readable: true,
        writable: false,
    };
    let parameter = |name: &str, ty: &TypeRef, position: usize| ParameterShape {
        name: name.to_owned(),
        ty: ty.identity(),
        position,
        property: Some(position),
    };
    Classification::new(ShapeKind::Object(ObjectShape {
        primitive: None,
        properties: vec![property("Key", key), property("Value", value)],
        constructors: vec![ConstructorShape {
            parameters: vec![parameter("key", key, 0), parameter("value", value, 1)],
        }],
    }))
    .with_dependents([key.clone(), value.clone()])
}

fn object(facts: &TypeFacts) -> Classification {
    let mut dependents = Dependents::new();

    let properties: Vec<PropertyShape> = facts
        .members
        .iter()
        .filter(|m| m.is_instance_visible())
        .map(|m| {
            dependents.push(m.ty.clone());
            PropertyShape {
                name: m.name.clone(),
                ty: m.ty.identity(),
                readable: m.flags.contains(MemberFlags::READABLE),
                writable: m.flags.contains(MemberFlags::WRITABLE),
            }
        })
        .collect();

    let constructors = if facts.is_abstract {
        Vec::new()
    } else {
        facts
            .constructors
            .iter()
            .filter(|c| c.accessible)
            .map(|c| ConstructorShape {
                parameters: c
                    .params
                    .iter()
                    .enumerate()
                    .map(|(position, param)| {
                        dependents.push(param.ty.clone());
                        ParameterShape {
                            name: param.name.clone(),
                            ty: param.ty.identity(),
                            position,
                            property: bind_parameter(&properties, &param.name),
                        }
                    })
                    .collect(),
            })
            .collect()
    };

    Classification::new(ShapeKind::Object(ObjectShape {
        primitive: None,
        properties,
        constructors,
    }))
    .with_dependents(dependents)
}

/// Match a constructor parameter to a property by case-insensitive name.
fn bind_parameter(properties: &[PropertyShape], name: &str) -> Option<usize> {
    properties
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name))
}
