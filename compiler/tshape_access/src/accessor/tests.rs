use pretty_assertions::assert_eq;
use tshape_ir::TypeRef;

use super::*;

fn state() -> ArgumentState {
    let owner = TypeRef::named("Point").identity();
    ArgumentState::new(owner, 0, Arc::from(vec![Value::Int(0), Value::Null]))
}

#[test]
fn argument_state_tracks_set_positions() {
    let mut state = state();
    assert_eq!(state.arity(), 2);
    assert_eq!(state.set_count(), 0);

    assert!(state.set(1, Value::from("y")).is_ok());
    assert!(state.is_set(1));
    assert!(!state.is_set(0));
    assert!(!state.is_set(9));
    assert_eq!(state.get(1).and_then(Value::as_str), Some("y"));
    assert_eq!(state.missing().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn out_of_range_position_is_an_error() {
    let mut state = state();
    assert_eq!(
        state.set(2, Value::Null),
        Err(AccessError::ParameterOutOfRange {
            owner: TypeRef::named("Point").identity(),
            position: 2,
            arity: 2,
        })
    );
}

#[test]
fn missing_arguments_take_defaults() {
    let mut state = state();
    assert!(state.set(1, Value::Int(5)).is_ok());
    let args = state.into_arguments();
    let ints: Vec<_> = args.iter().map(Value::as_int).collect();
    assert_eq!(ints, vec![Some(0), Some(5)]);
}

#[test]
fn key_descriptions() {
    assert_eq!(AccessorKey::Setter(3).to_string(), "a setter for property 3");
    assert_eq!(
        AccessorKey::ArgumentSetter {
            constructor: 1,
            position: 0
        }
        .to_string(),
        "an argument setter for position 0 of constructor 1"
    );
}

#[test]
fn accessor_identity() {
    let a = Accessor::Elements(Arc::new(|_: &Value| Ok(Vec::new())));
    let b = Accessor::Elements(Arc::new(|_: &Value| Ok(Vec::new())));
    assert!(a.ptr_eq(&a.clone()));
    assert!(!a.ptr_eq(&b));
    assert_eq!(format!("{a:?}"), "Accessor::Elements");
}
