//! Categories and construction strategies, checked through sessions.

use pretty_assertions::assert_eq;
use tshape::{AccessorMode, ConstructionStrategy, DictionaryKind, ShapeCategory, TypeRef};

use crate::common::{
    all_roots, employee, frozen_table, hashtable, immutable_list, int, object, point, roster,
    string, system,
};

fn session() -> tshape::ShapeSession {
    system(AccessorMode::Lazy).session(&all_roots()).unwrap()
}

#[test]
fn span_constructor_outranks_every_other_strategy() {
    let session = session();
    let list = session
        .provider()
        .shape_of(&immutable_list())
        .unwrap()
        .as_enumerable()
        .cloned()
        .unwrap();

    assert_eq!(list.strategy, ConstructionStrategy::SpanBased);
    assert_eq!(list.element, int().identity());
    assert_eq!(list.rank, 1);
    assert_eq!(list.add_method, None);
}

#[test]
fn untyped_dictionary_uses_object_keys_and_values() {
    let session = session();
    for (ty, strategy) in [
        (hashtable(), ConstructionStrategy::Mutable),
        (frozen_table(), ConstructionStrategy::None),
    ] {
        let shape = session.provider().shape_of(&ty).unwrap();
        let dictionary = shape.as_dictionary().unwrap();
        assert_eq!(dictionary.kind, DictionaryKind::Untyped);
        assert_eq!(dictionary.key, object().identity());
        assert_eq!(dictionary.value, object().identity());
        assert_eq!(dictionary.strategy, strategy, "{ty}");
    }
}

#[test]
fn typed_dictionary_keeps_its_argument_types() {
    let session = session();
    let shape = session.provider().shape_of(&roster()).unwrap();
    let dictionary = shape.as_dictionary().unwrap();

    assert_eq!(shape.category(), ShapeCategory::Dictionary);
    assert_eq!(dictionary.kind, DictionaryKind::Generic);
    assert_eq!(dictionary.key, string().identity());
    assert_eq!(dictionary.value, employee().identity());
    assert_eq!(dictionary.strategy, ConstructionStrategy::Mutable);
    assert_eq!(dictionary.add_method.as_deref(), Some(tshape::ADD_METHOD));
}

#[test]
fn arrays_are_classified_by_rank() {
    let roots = [TypeRef::array(point(), 1), TypeRef::array(int(), 3)];
    let session = system(AccessorMode::Lazy).session(&roots).unwrap();
    let strategies: Vec<_> = roots
        .iter()
        .map(|ty| session.provider().shape_of(ty).unwrap().strategy())
        .collect();
    assert_eq!(
        strategies,
        vec![ConstructionStrategy::SpanBased, ConstructionStrategy::None]
    );
}

#[test]
fn objects_bind_constructor_parameters_to_properties() {
    let session = session();
    let point = session
        .provider()
        .shape_of(&point())
        .unwrap()
        .as_object()
        .cloned()
        .unwrap();

    assert_eq!(point.default_constructor(), None);
    assert_eq!(point.constructors.len(), 1);
    let bindings: Vec<_> = point.constructors[0]
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.property))
        .collect();
    assert_eq!(bindings, vec![("x", Some(0)), ("y", Some(1))]);
    assert!(point.properties.iter().all(|p| p.readable && !p.writable));
}
