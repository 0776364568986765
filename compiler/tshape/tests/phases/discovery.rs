//! Root validation and closure discovery.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tshape::{
    AccessorMode, ErrorCode, Location, ProviderDeclaration, Severity, ShapeCategory, ShapeKind,
    TypeRef,
};

use crate::common::{
    all_roots, department, employee, int, names, roster, string, system, MODES,
};

#[test]
fn closure_holds_every_reachable_type_once() {
    for mode in MODES {
        let session = system(mode).session(&[employee(), employee()]).unwrap();
        let shapes = session.provider().shapes();

        assert_eq!(names(shapes), vec!["Department", "Employee", "string"]);
        assert!(session.diagnostics().is_empty());
        for shape in shapes.iter() {
            assert!(shapes.owns(shape));
            for referenced in shape.kind().referenced_types() {
                assert!(shapes.contains(referenced), "{referenced} escaped the closure");
            }
        }
    }
}

#[test]
fn self_reference_points_back_at_its_own_shape() {
    let session = system(AccessorMode::Lazy).session(&[employee()]).unwrap();
    let shape = session.provider().shape_of(&employee()).unwrap();
    let object = shape.as_object().unwrap();

    let (_, manager) = object.property("Manager").unwrap();
    assert_eq!(&manager.ty, shape.id());
    let looked_up = session.provider().get(&manager.ty).unwrap();
    assert_eq!(looked_up, shape);
}

#[test]
fn mutual_recursion_closes_from_either_side() {
    let system = system(AccessorMode::Lazy);
    let from_employee = system.session(&[employee()]).unwrap();
    let from_department = system.session(&[department()]).unwrap();

    assert_eq!(
        names(from_employee.provider().shapes()),
        names(from_department.provider().shapes())
    );
    let head = from_department
        .provider()
        .shape_of(&department())
        .unwrap()
        .as_object()
        .unwrap()
        .property("Head")
        .map(|(_, p)| p.ty.clone());
    assert_eq!(head, Some(employee().identity()));
}

#[test]
fn unsupported_roots_are_reported_and_skipped() {
    let roots = [
        TypeRef::pointer_to(int()),
        TypeRef::by_ref(int()),
        TypeRef::span_of(int()),
        TypeRef::generic("List", [TypeRef::param("T")]),
        TypeRef::Void,
        employee(),
    ];
    let session = system(AccessorMode::Lazy).session(&roots).unwrap();

    assert!(session.has_errors());
    assert_eq!(session.diagnostics().error_count(), 5);
    assert!(session
        .diagnostics()
        .iter()
        .all(|d| d.code == ErrorCode::S0001));
    assert_eq!(
        names(session.provider().shapes()),
        vec!["Department", "Employee", "string"]
    );
}

#[test]
fn unknown_types_become_empty_objects_with_a_warning() {
    let ghost = TypeRef::named("Ghost");
    let session = system(AccessorMode::Lazy).session(&[ghost.clone()]).unwrap();

    assert!(!session.has_errors());
    let warnings: Vec<_> = session.diagnostics().iter().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, ErrorCode::S1001);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert_eq!(warnings[0].type_identity(), Some(&ghost.identity()));

    let shape = session.provider().shape_of(&ghost).unwrap();
    assert_eq!(shape.category(), ShapeCategory::Object);
    assert_eq!(shape.kind(), &ShapeKind::Object(Default::default()));
}

#[test]
fn sealed_declaration_is_reported_without_stopping_the_build() {
    let declaration = ProviderDeclaration::new("Shapes").nested_in("Outer", false);
    let session = system(AccessorMode::Lazy)
        .declared_session(&declaration, &[employee()])
        .unwrap();

    let diagnostics: Vec<_> = session.diagnostics().iter().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::S0002);
    assert_eq!(
        diagnostics[0].location,
        Location::Declaration("Shapes".to_owned())
    );
    assert_eq!(session.provider().shapes().len(), 3);

    let open = ProviderDeclaration::new("Shapes").nested_in("Outer", true);
    let session = system(AccessorMode::Lazy)
        .declared_session(&open, &[employee()])
        .unwrap();
    assert!(session.diagnostics().is_empty());
}

#[test]
fn sessions_for_the_same_roots_share_one_build() {
    let system = system(AccessorMode::Lazy);
    let first = system.session(&[employee(), roster()]).unwrap();
    let again = system.session(&[roster(), employee(), roster()]).unwrap();
    let other = system.session(&[department()]).unwrap();

    assert!(first.shares_shapes_with(&again));
    assert!(!first.shares_shapes_with(&other));
    assert_eq!(system.store().len(), 2);
}

#[test]
fn sharded_build_matches_single_pass() {
    let system = system(AccessorMode::AheadOfTime);
    let shards = vec![vec![employee()], vec![roster(), department()], vec![string()]];
    let sharded = system.sharded_session(&shards).unwrap();
    let single = system.session(&shards.concat()).unwrap();

    assert_eq!(
        names(sharded.provider().shapes()),
        names(single.provider().shapes())
    );
    let kinds = |session: &tshape::ShapeSession| {
        session
            .provider()
            .shapes()
            .iter()
            .map(|s| s.kind().clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(kinds(&sharded), kinds(&single));
}

proptest! {
    #[test]
    fn enumeration_ignores_root_order(roots in Just(all_roots()).prop_shuffle()) {
        let system = system(AccessorMode::Lazy);
        let declaration = ProviderDeclaration::new("Shapes");
        let shuffled = system.declared_session(&declaration, &roots).unwrap();
        let ordered = system.declared_session(&declaration, &all_roots()).unwrap();

        let shapes = |session: &tshape::ShapeSession| {
            session
                .provider()
                .shapes()
                .iter()
                .map(|s| (s.id().clone(), s.kind().clone()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(shapes(&shuffled), shapes(&ordered));
    }
}
