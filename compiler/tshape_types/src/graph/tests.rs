#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tshape_diagnostic::{ErrorCode, Severity};
use tshape_ir::{ConstructorFacts, ContainerContract, FactRegistry, Primitive, TypeFacts};

use super::*;
use crate::{ShapeCategory, ADD_METHOD};

fn string() -> TypeRef {
    Primitive::String.type_ref()
}

fn int() -> TypeRef {
    Primitive::Int32.type_ref()
}

fn list_of(element: TypeRef) -> TypeRef {
    TypeRef::generic("List", [element])
}

fn register_list(registry: &mut FactRegistry, element: TypeRef) {
    registry.register(
        &list_of(element.clone()),
        TypeFacts::class()
            .with_contract(ContainerContract::Enumerable(element.clone()))
            .with_constructor(ConstructorFacts::parameterless())
            .with_method(ADD_METHOD, [element]),
    );
}

/// `Person` refers to `Address` and to a list of itself.
fn people() -> FactRegistry {
    let mut registry = FactRegistry::with_primitives();
    let person = TypeRef::named("Person");
    registry.register(
        &person,
        TypeFacts::class()
            .with_property("Name", string())
            .with_property("Home", TypeRef::named("Address"))
            .with_property("Friends", list_of(person.clone()))
            .with_constructor(ConstructorFacts::parameterless()),
    );
    registry.register(
        &TypeRef::named("Address"),
        TypeFacts::structure().with_property("City", string()),
    );
    register_list(&mut registry, person);
    registry
}

fn names(provider: &ShapeProvider) -> Vec<&str> {
    provider.identities().map(TypeIdentity::name).collect()
}

#[test]
fn closure_contains_every_reachable_type_once() {
    let output = build_provider(&people(), [TypeRef::named("Person")]);
    assert!(output.diagnostics.is_empty());
    assert_eq!(
        names(&output.provider),
        vec!["Address", "List<Person>", "Person", "string"]
    );
}

#[test]
fn self_referential_type_terminates() {
    let mut registry = FactRegistry::with_primitives();
    let node = TypeRef::named("Node");
    registry.register(
        &node,
        TypeFacts::class()
            .with_property("Value", int())
            .with_property("Next", node.clone()),
    );

    let output = build_provider(&registry, [node.clone()]);
    let shape = output.provider.shape_of(&node).unwrap();
    let object = shape.as_object().unwrap();
    assert_eq!(object.properties[1].ty, node.identity());
    assert_eq!(names(&output.provider), vec!["Node", "i32"]);
}

#[test]
fn mutually_recursive_types_resolve() {
    let mut registry = FactRegistry::with_primitives();
    let a = TypeRef::named("A");
    let b = TypeRef::named("B");
    registry.register(&a, TypeFacts::class().with_property("B", b.clone()));
    registry.register(&b, TypeFacts::class().with_property("A", a.clone()));

    let output = build_provider(&registry, [a.clone()]);
    let provider = &output.provider;
    let a_shape = provider.shape_of(&a).unwrap().as_object().unwrap();
    let b_id = &a_shape.properties[0].ty;
    let b_shape = provider.get(b_id).unwrap().as_object().unwrap();
    assert_eq!(b_shape.properties[0].ty, a.identity());
}

#[test]
fn duplicate_roots_are_deduplicated() {
    let output = build_provider(
        &people(),
        [
            TypeRef::named("Person"),
            TypeRef::named("Address"),
            TypeRef::named("Person"),
        ],
    );
    assert_eq!(output.provider.len(), 4);
}

#[test]
fn unsupported_roots_are_reported_and_skipped() {
    let roots = [
        TypeRef::pointer_to(int()),
        TypeRef::by_ref(int()),
        TypeRef::span_of(int()),
        list_of(TypeRef::param("T")),
        TypeRef::Void,
        TypeRef::named("Address"),
    ];
    let output = build_provider(&people(), roots);

    assert_eq!(output.diagnostics.error_count(), 5);
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.code == ErrorCode::S0001));
    assert_eq!(names(&output.provider), vec!["Address", "string"]);
}

#[test]
fn add_root_reports_acceptance() {
    let facts = people();
    let mut builder = GraphBuilder::new(&facts);
    assert!(builder.add_root(TypeRef::named("Person")));
    assert!(!builder.add_root(TypeRef::Void));
    assert!(builder.build().has_errors());
}

#[test]
fn span_members_are_shaped_even_though_span_roots_are_not() {
    let mut registry = FactRegistry::with_primitives();
    let holder = TypeRef::named("Holder");
    registry.register(
        &holder,
        TypeFacts::class().with_property("View", TypeRef::span_of(int())),
    );
    let output = build_provider(&registry, [holder]);
    let span = output.provider.shape_of(&TypeRef::span_of(int())).unwrap();
    assert_eq!(span.category(), ShapeCategory::Enumerable);
}

#[test]
fn sealed_declaration_is_reported_but_graph_is_built() {
    let facts = people();
    let mut builder = GraphBuilder::new(&facts);
    builder.declare(&ProviderDeclaration::new("Shapes").nested_in("Outer", false));
    builder.add_root(TypeRef::named("Address"));
    let output = builder.build();

    let codes: Vec<_> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::S0002]);
    assert_eq!(output.provider.len(), 2);
}

#[test]
fn first_sealed_declaration() {
    assert_eq!(ProviderDeclaration::new("P").first_sealed(), None);
    assert_eq!(ProviderDeclaration::new("P").sealed().first_sealed(), Some("P"));
    let nested = ProviderDeclaration::new("P")
        .nested_in("Inner", true)
        .nested_in("Outer", false);
    assert_eq!(nested.first_sealed(), Some("Outer"));
}

#[test]
fn missing_facts_produce_a_warning() {
    let mut registry = FactRegistry::with_primitives();
    let holder = TypeRef::named("Holder");
    registry.register(
        &holder,
        TypeFacts::class().with_property("Ghost", TypeRef::named("Ghost")),
    );
    let output = build_provider(&registry, [holder]);

    assert!(!output.has_errors());
    assert_eq!(output.diagnostics.count(Severity::Warning), 1);
    let warning = output.diagnostics.iter().next().unwrap();
    assert_eq!(warning.code, ErrorCode::S1001);
    assert_eq!(
        warning.type_identity().map(TypeIdentity::name),
        Some("Ghost")
    );
    let ghost = output.provider.shape_of(&TypeRef::named("Ghost")).unwrap();
    assert_eq!(ghost.as_object(), Some(&crate::ObjectShape::default()));
}

#[test]
fn builds_are_deterministic() {
    let facts = people();
    let roots = [TypeRef::named("Person")];
    let a = build_provider(&facts, roots.clone()).provider;
    let b = build_provider(&facts, roots).provider;

    let kinds = |p: &ShapeProvider| {
        p.iter()
            .map(|s| (s.id().clone(), s.kind().clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(kinds(&*a), kinds(&*b));
}

#[test]
fn sharded_build_matches_single_pass() {
    let facts = people();
    let single = build_provider(
        &facts,
        [TypeRef::named("Person"), TypeRef::named("Address")],
    );
    let sharded = build_sharded(
        &facts,
        &[
            vec![TypeRef::named("Person")],
            vec![TypeRef::named("Address")],
            vec![TypeRef::Void],
            vec![TypeRef::Void],
        ],
    );

    assert_eq!(names(&single.provider), names(&sharded.provider));
    assert!(sharded.provider.iter().all(|s| sharded.provider.owns(s)));
    // The same rejected root in two shards is reported once.
    assert_eq!(sharded.diagnostics.error_count(), 1);
}

// Random type graphs: `T{i}` has a property for every index in `edges[i]`.
fn random_graph() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<usize>)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(0..n, 0..4), n),
            prop::collection::vec(0..n, 1..4),
        )
    })
}

fn graph_registry(edges: &[Vec<usize>]) -> FactRegistry {
    let mut registry = FactRegistry::with_primitives();
    for (i, targets) in edges.iter().enumerate() {
        let mut facts = TypeFacts::class();
        for (slot, target) in targets.iter().enumerate() {
            facts = facts.with_property(format!("P{slot}"), TypeRef::named(format!("T{target}")));
        }
        registry.register(&TypeRef::named(format!("T{i}")), facts);
    }
    registry
}

fn reachable(edges: &[Vec<usize>], roots: &[usize]) -> Vec<String> {
    let mut seen = vec![false; edges.len()];
    let mut stack = roots.to_vec();
    while let Some(i) = stack.pop() {
        if !std::mem::replace(&mut seen[i], true) {
            stack.extend(edges[i].iter().copied());
        }
    }
    let mut names: Vec<_> = (0..edges.len())
        .filter(|&i| seen[i])
        .map(|i| format!("T{i}"))
        .collect();
    names.sort();
    names
}

proptest! {
    #[test]
    fn closure_is_exact_and_order_independent((edges, roots) in random_graph()) {
        let registry = graph_registry(&edges);
        let refs: Vec<_> = roots.iter().map(|i| TypeRef::named(format!("T{i}"))).collect();

        let forward = build_provider(&registry, refs.iter().cloned());
        let backward = build_provider(&registry, refs.iter().rev().cloned());

        let got: Vec<String> = forward.provider.identities().map(|id| id.name().to_owned()).collect();
        prop_assert_eq!(&got, &reachable(&edges, &roots));
        prop_assert!(forward.diagnostics.is_empty());

        let kinds = |p: &ShapeProvider| p.iter().map(|s| s.kind().clone()).collect::<Vec<_>>();
        prop_assert_eq!(kinds(&*forward.provider), kinds(&*backward.provider));

        // Every referenced identity resolves.
        for shape in forward.provider.iter() {
            for referenced in shape.kind().referenced_types() {
                prop_assert!(forward.provider.contains(referenced));
            }
        }
    }
}
