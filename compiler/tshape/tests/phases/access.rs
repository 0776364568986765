//! Member accessors through sessions, in both accessor modes.

use pretty_assertions::assert_eq;
use tshape::{AccessError, AccessorKey, Contents, TypeRef, Value};

use crate::common::{
    all_roots, department, employee, hashtable, immutable_list, int, point, roster, string,
    system, MODES,
};

fn unavailable(owner: &TypeRef, operation: AccessorKey) -> AccessError {
    AccessError::CapabilityUnavailable {
        owner: owner.identity(),
        operation,
    }
}

#[test]
fn read_only_property_has_no_setter() {
    for mode in MODES {
        let session = system(mode).session(&[point()]).unwrap();
        let accessors = session.provider().accessors(&point().identity()).unwrap();

        assert!(accessors.getter("X").is_ok());
        assert_eq!(
            accessors.setter("X").err(),
            Some(unavailable(&point(), AccessorKey::Setter(0)))
        );
    }
}

#[test]
fn missing_default_constructor_is_unavailable() {
    for mode in MODES {
        let session = system(mode).session(&[point(), immutable_list()]).unwrap();
        let provider = session.provider();

        let point_accessors = provider.accessors(&point().identity()).unwrap();
        assert_eq!(
            point_accessors.default_constructor().err(),
            Some(unavailable(&point(), AccessorKey::DefaultConstructor))
        );

        // The list has a parameterless constructor, but its strategy is
        // span-based, so only the span constructor is offered.
        let list_accessors = provider.accessors(&immutable_list().identity()).unwrap();
        assert_eq!(
            list_accessors.default_constructor().err(),
            Some(unavailable(&immutable_list(), AccessorKey::DefaultConstructor))
        );
        assert_eq!(
            list_accessors.enumerable_add().err(),
            Some(unavailable(&immutable_list(), AccessorKey::EnumerableAdd))
        );
    }
}

#[test]
fn read_only_object_is_built_from_arguments() {
    for mode in MODES {
        let session = system(mode).session(&[point()]).unwrap();
        let accessors = session.provider().accessors(&point().identity()).unwrap();

        let mut state = accessors.argument_state(0).unwrap()();
        accessors.argument_setter(0, 0).unwrap()(&mut state, Value::Int(3)).unwrap();
        accessors.argument_setter(0, 1).unwrap()(&mut state, Value::Int(4)).unwrap();
        assert!(state.is_complete());

        let value = accessors.parameterized_constructor(0).unwrap()(state).unwrap();
        let x = accessors.getter("X").unwrap()(&value).unwrap();
        let y = accessors.getter("Y").unwrap()(&value).unwrap();
        assert_eq!((x.as_int(), y.as_int()), (Some(3), Some(4)));
    }
}

#[test]
fn span_constructor_builds_and_elements_read_back() {
    for mode in MODES {
        let session = system(mode).session(&[immutable_list()]).unwrap();
        let accessors = session
            .provider()
            .accessors(&immutable_list().identity())
            .unwrap();

        let items = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        let list = accessors.span_constructor().unwrap()(Contents::Elements(items)).unwrap();
        let read: Vec<_> = accessors.elements().unwrap()(&list)
            .unwrap()
            .iter()
            .map(Value::as_int)
            .collect();
        assert_eq!(read, vec![Some(1), Some(2), Some(3)]);
    }
}

#[test]
fn untyped_dictionary_is_populated_through_add() {
    for mode in MODES {
        let session = system(mode).session(&[hashtable()]).unwrap();
        let accessors = session.provider().accessors(&hashtable().identity()).unwrap();

        let table = accessors.default_constructor().unwrap()().unwrap();
        let add = accessors.dictionary_add().unwrap();
        add(&table, Value::from("a"), Value::Int(1)).unwrap();
        add(&table, Value::Int(7), Value::from("seven")).unwrap();
        add(&table, Value::from("a"), Value::Int(2)).unwrap();

        let entries = accessors.entries().unwrap()(&table).unwrap();
        assert_eq!(entries.len(), 2);
        let a = table.as_map().unwrap().get(&Value::from("a")).unwrap();
        assert_eq!(a.as_int(), Some(2));
    }
}

fn mismatch(expected: &TypeRef, found: &str) -> Option<AccessError> {
    Some(AccessError::TypeMismatch {
        expected: expected.identity(),
        found: found.to_owned(),
    })
}

#[test]
fn writes_are_checked_against_declared_types() {
    for mode in MODES {
        let session = system(mode).session(&[employee(), point(), roster()]).unwrap();
        let provider = session.provider();
        let people = provider.accessors(&employee().identity()).unwrap();
        let teams = provider.accessors(&department().identity()).unwrap();

        let ada = people.default_constructor().unwrap()().unwrap();
        let research = teams.default_constructor().unwrap()().unwrap();
        assert_eq!(
            people.setter("Name").unwrap()(&ada, Value::Int(42)).err(),
            mismatch(&string(), "an int")
        );
        assert_eq!(
            people.setter("Manager").unwrap()(&ada, research.clone()).err(),
            mismatch(&employee(), "a `Department` object")
        );
        // Reference slots take null and values of their own type.
        people.setter("Manager").unwrap()(&ada, Value::Null).unwrap();
        people.setter("Department").unwrap()(&ada, research).unwrap();

        let points = provider.accessors(&point().identity()).unwrap();
        let mut state = points.argument_state(0).unwrap()();
        assert_eq!(
            points.argument_setter(0, 0).unwrap()(&mut state, Value::Float(0.5)).err(),
            mismatch(&int(), "a float")
        );

        let staff = provider.accessors(&roster().identity()).unwrap();
        let map = staff.default_constructor().unwrap()().unwrap();
        let add = staff.dictionary_add().unwrap();
        assert_eq!(
            add(&map, Value::Int(1), Value::from("not an employee")).err(),
            mismatch(&string(), "an int")
        );
        assert_eq!(
            add(&map, Value::from("ada"), Value::from("not an employee")).err(),
            mismatch(&employee(), "a string")
        );
        add(&map, Value::from("ada"), ada).unwrap();
        assert_eq!(staff.entries().unwrap()(&map).unwrap().len(), 1);
    }
}

#[test]
fn cyclic_instances_are_reachable_through_getters() {
    for mode in MODES {
        let session = system(mode).session(&[employee()]).unwrap();
        let accessors = session.provider().accessors(&employee().identity()).unwrap();

        let boss = accessors.default_constructor().unwrap()().unwrap();
        accessors.setter("Name").unwrap()(&boss, Value::from("Grace")).unwrap();
        accessors.setter("Manager").unwrap()(&boss, boss.clone()).unwrap();

        let manager = accessors.getter("Manager").unwrap()(&boss).unwrap();
        assert!(manager
            .as_object()
            .unwrap()
            .ptr_eq(boss.as_object().unwrap()));
        let name = accessors.getter("Name").unwrap()(&manager).unwrap();
        assert_eq!(name.as_str(), Some("Grace"));
    }
}

#[test]
fn accessor_modes_offer_the_same_operations() {
    let keys = [
        AccessorKey::Getter(0),
        AccessorKey::Getter(1),
        AccessorKey::Getter(2),
        AccessorKey::Setter(0),
        AccessorKey::Setter(2),
        AccessorKey::DefaultConstructor,
        AccessorKey::ArgumentState(0),
        AccessorKey::ArgumentSetter {
            constructor: 0,
            position: 1,
        },
        AccessorKey::ParameterizedConstructor(0),
        AccessorKey::EnumerableAdd,
        AccessorKey::DictionaryAdd,
        AccessorKey::Elements,
        AccessorKey::Entries,
        AccessorKey::SequenceConstructor,
        AccessorKey::SpanConstructor,
    ];
    let [aot, lazy] = MODES.map(|mode| system(mode).session(&all_roots()).unwrap());

    for shape in aot.provider().shapes().iter() {
        for key in keys {
            let ahead = aot.provider().member_accessors().accessor(shape.id(), key);
            let on_demand = lazy.provider().member_accessors().accessor(shape.id(), key);
            assert_eq!(
                ahead.as_ref().err(),
                on_demand.as_ref().err(),
                "{} {key}",
                shape.id()
            );
        }
    }

    let roster_accessors = lazy.provider().accessors(&roster().identity()).unwrap();
    assert!(roster_accessors.dictionary_add().is_ok());
}
