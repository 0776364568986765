//! Structural equality over recursive shapes.

use pretty_assertions::assert_eq;
use tshape::{
    AccessorMode, DeferredBinding, DeferredError, EqualityConfig, FactRegistry, ShapeSession,
    ShapeSystem, ShapeSystemConfig, Value,
};

use crate::common::{department, employee, registry, roster, string, system, MODES};

/// An employee heading their own department and managing themself.
fn founder(session: &ShapeSession, name: &str, title: &str) -> Value {
    let provider = session.provider();
    let person = provider.accessors(&employee().identity()).unwrap();
    let team = provider.accessors(&department().identity()).unwrap();

    let founder = person.default_constructor().unwrap()().unwrap();
    let dept = team.default_constructor().unwrap()().unwrap();
    person.setter("Name").unwrap()(&founder, Value::from(name)).unwrap();
    person.setter("Manager").unwrap()(&founder, founder.clone()).unwrap();
    person.setter("Department").unwrap()(&founder, dept.clone()).unwrap();
    team.setter("Title").unwrap()(&dept, Value::from(title)).unwrap();
    team.setter("Head").unwrap()(&dept, founder.clone()).unwrap();
    founder
}

#[test]
fn mutually_recursive_values_compare_structurally() {
    for mode in MODES {
        let session = system(mode).session(&[employee()]).unwrap();
        let equality = session.equality().unwrap();
        let comparer = equality.comparer(&employee().identity()).unwrap();

        let a = founder(&session, "Ada", "Research");
        let b = founder(&session, "Ada", "Research");
        let c = founder(&session, "Ada", "Sales");

        assert!(comparer.equals(&a, &b).unwrap());
        assert!(!comparer.equals(&a, &c).unwrap());
        assert_eq!(comparer.hash(&a).unwrap(), comparer.hash(&b).unwrap());

        let dept = equality.comparer(&department().identity()).unwrap();
        let head = |v: &Value| v.as_object().unwrap().get(2).unwrap();
        assert!(dept.equals(&head(&a), &head(&b)).unwrap());
    }
}

#[test]
fn dictionary_values_ignore_insertion_order() {
    let session = system(AccessorMode::AheadOfTime)
        .session(&[roster()])
        .unwrap();
    let equality = session.equality().unwrap();
    let roster_ty = roster().identity();
    let accessors = session.provider().accessors(&roster_ty).unwrap();
    let add = accessors.dictionary_add().unwrap();

    let fill = |names: &[&str]| {
        let map = accessors.default_constructor().unwrap()().unwrap();
        for name in names {
            add(&map, Value::from(*name), founder(&session, name, "Ops")).unwrap();
        }
        map
    };
    let forward = fill(&["Ada", "Grace"]);
    let backward = fill(&["Grace", "Ada"]);
    let partial = fill(&["Ada"]);

    assert!(equality.equals(&roster_ty, &forward, &backward).unwrap());
    assert!(!equality.equals(&roster_ty, &forward, &partial).unwrap());
    assert_eq!(
        equality.hash(&roster_ty, &forward).unwrap(),
        equality.hash(&roster_ty, &backward).unwrap()
    );
}

#[test]
fn string_comparison_comes_from_the_system_config() {
    let config = ShapeSystemConfig::default().with_equality(EqualityConfig::ignore_case());
    let system: ShapeSystem<FactRegistry> = ShapeSystem::with_config(registry(), config);
    let session = system.session(&[string()]).unwrap();
    let equality = session.equality().unwrap();

    let id = string().identity();
    assert!(equality
        .equals(&id, &Value::from("Straße"), &Value::from("STRASSE"))
        .unwrap());
    assert!(equality
        .equals(&id, &Value::from("tshape"), &Value::from("TSHAPE"))
        .unwrap());
}

#[test]
fn deferred_results_bind_exactly_once() {
    let binding: DeferredBinding<u32> = DeferredBinding::new();
    let handle = binding.handle();
    assert_eq!(handle.get().err(), Some(DeferredError::Unbound));

    binding.bind(7).unwrap();
    assert_eq!(handle.get().copied(), Ok(7));
    assert_eq!(binding.bind(8), Err(DeferredError::DoubleBinding));
    assert_eq!(handle.clone().get().copied(), Ok(7));
}
