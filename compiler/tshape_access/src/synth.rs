//! Accessor synthesis.
//!
//! Both accessor providers build their operations here, so an operation
//! synthesized ahead of time and one synthesized on demand are the same
//! closure over the same captured data.

use std::sync::Arc;

use tracing::trace;
use tshape_ir::TypeIdentity;
use tshape_types::{
    ConstructionStrategy, DictionaryShape, EnumerableShape, Factories, ObjectShape, ShapeKind,
    ShapeProvider, TypeShape,
};

use crate::check::ValueCheck;
use crate::value::{default_value, ListRef, MapRef, ObjectRef};
use crate::{AccessError, Accessor, AccessorKey, ArgumentState, Contents, Value};

/// Build the operation `key` for `owner`.
pub(crate) fn synthesize(
    provider: &ShapeProvider,
    owner: &TypeIdentity,
    key: AccessorKey,
) -> Result<Accessor, AccessError> {
    let shape = provider.get(owner)?;
    let accessor = match shape.kind() {
        ShapeKind::Object(object) => object_accessor(provider, owner, object, key)?,
        ShapeKind::Enumerable(enumerable) => {
            enumerable_accessor(provider, owner, enumerable, key)?
        }
        ShapeKind::Dictionary(dictionary) => {
            dictionary_accessor(provider, owner, dictionary, key)?
        }
        ShapeKind::Enum(_) | ShapeKind::Nullable(_) => {
            return Err(AccessError::unavailable(owner, key))
        }
    };
    trace!(owner = %owner, operation = %key, "synthesized accessor");
    Ok(accessor)
}

/// Every key `synthesize` succeeds on for `shape`.
pub(crate) fn available_keys(shape: &TypeShape) -> Vec<AccessorKey> {
    let mut keys = Vec::new();
    match shape.kind() {
        ShapeKind::Object(object) => {
            for (i, property) in object.properties.iter().enumerate() {
                if property.readable {
                    keys.push(AccessorKey::Getter(i));
                }
                if property.writable {
                    keys.push(AccessorKey::Setter(i));
                }
            }
            if object.default_constructor().is_some() {
                keys.push(AccessorKey::DefaultConstructor);
            }
            for (c, ctor) in object.constructors.iter().enumerate() {
                keys.push(AccessorKey::ArgumentState(c));
                keys.push(AccessorKey::ParameterizedConstructor(c));
                keys.extend((0..ctor.parameters.len()).map(|position| {
                    AccessorKey::ArgumentSetter {
                        constructor: c,
                        position,
                    }
                }));
            }
        }
        ShapeKind::Enumerable(enumerable) => {
            keys.push(AccessorKey::Elements);
            keys.extend(strategy_keys(enumerable.strategy, AccessorKey::EnumerableAdd));
        }
        ShapeKind::Dictionary(dictionary) => {
            keys.push(AccessorKey::Entries);
            keys.extend(strategy_keys(dictionary.strategy, AccessorKey::DictionaryAdd));
        }
        ShapeKind::Enum(_) | ShapeKind::Nullable(_) => {}
    }
    keys
}

fn strategy_keys(strategy: ConstructionStrategy, add: AccessorKey) -> Vec<AccessorKey> {
    match strategy {
        ConstructionStrategy::None => Vec::new(),
        ConstructionStrategy::Mutable => vec![AccessorKey::DefaultConstructor, add],
        ConstructionStrategy::Parameterized => vec![AccessorKey::SequenceConstructor],
        ConstructionStrategy::SpanBased => vec![AccessorKey::SpanConstructor],
    }
}

fn mismatch(owner: &TypeIdentity, found: &Value) -> AccessError {
    AccessError::TypeMismatch {
        expected: owner.clone(),
        found: found.describe(),
    }
}

fn object_of<'v>(owner: &TypeIdentity, value: &'v Value) -> Result<&'v ObjectRef, AccessError> {
    match value.as_object() {
        Some(object) if object.ty() == owner => Ok(object),
        _ => Err(mismatch(owner, value)),
    }
}

/// Containers built as an implementation type carry its identity instead.
fn list_of<'v>(
    owner: &TypeIdentity,
    factories: &Factories,
    value: &'v Value,
) -> Result<&'v ListRef, AccessError> {
    match value.as_list() {
        Some(list) if list.ty() == owner || factories.builds_as(list.ty()) => Ok(list),
        _ => Err(mismatch(owner, value)),
    }
}

fn map_of<'v>(
    owner: &TypeIdentity,
    factories: &Factories,
    value: &'v Value,
) -> Result<&'v MapRef, AccessError> {
    match value.as_map() {
        Some(map) if map.ty() == owner || factories.builds_as(map.ty()) => Ok(map),
        _ => Err(mismatch(owner, value)),
    }
}

/// Identity of the values a container's constructors produce.
fn built_identity(owner: &TypeIdentity, factories: &Factories) -> TypeIdentity {
    factories
        .implementation
        .clone()
        .unwrap_or_else(|| owner.clone())
}

fn trace_factory(owner: &TypeIdentity, factories: &Factories) {
    let factory = factories
        .span_factory
        .as_deref()
        .or(factories.sequence_factory.as_deref());
    if let Some(factory) = factory {
        trace!(owner = %owner, factory, "collection built through factory");
    }
}

fn check_state(
    owner: &TypeIdentity,
    constructor: usize,
    state: &ArgumentState,
) -> Result<(), AccessError> {
    if state.owner() == owner && state.constructor() == constructor {
        Ok(())
    } else {
        Err(AccessError::TypeMismatch {
            expected: owner.clone(),
            found: format!(
                "argument state for constructor {} of `{}`",
                state.constructor(),
                state.owner()
            ),
        })
    }
}

fn object_accessor(
    provider: &ShapeProvider,
    owner: &TypeIdentity,
    object: &ObjectShape,
    key: AccessorKey,
) -> Result<Accessor, AccessError> {
    let unavailable = || AccessError::unavailable(owner, key);
    let owner = owner.clone();

    match key {
        AccessorKey::Getter(slot) => {
            if !object.properties.get(slot).is_some_and(|p| p.readable) {
                return Err(unavailable());
            }
            Ok(Accessor::Getter(Arc::new(move |value: &Value| {
                let instance = object_of(&owner, value)?;
                instance.get(slot).ok_or_else(|| mismatch(&owner, value))
            })))
        }
        AccessorKey::Setter(slot) => {
            let property = object
                .properties
                .get(slot)
                .filter(|p| p.writable)
                .ok_or_else(unavailable)?;
            let value_check = ValueCheck::resolve(provider, &property.ty)?;
            Ok(Accessor::Setter(Arc::new(move |target: &Value, value: Value| {
                let instance = object_of(&owner, target)?;
                value_check.check(&value)?;
                if instance.set(slot, value) {
                    Ok(())
                } else {
                    Err(mismatch(&owner, target))
                }
            })))
        }
        AccessorKey::DefaultConstructor => {
            if object.default_constructor().is_none() {
                return Err(unavailable());
            }
            let slots = property_defaults(provider, object)?;
            Ok(Accessor::DefaultConstructor(Arc::new(move || {
                Ok(Value::object(owner.clone(), slots.to_vec()))
            })))
        }
        AccessorKey::ArgumentState(c) => {
            let ctor = object.constructors.get(c).ok_or_else(unavailable)?;
            let defaults: Arc<[Value]> = ctor
                .parameters
                .iter()
                .map(|p| default_value(provider, &p.ty))
                .collect::<Result<_, _>>()?;
            Ok(Accessor::ArgumentState(Arc::new(move || {
                ArgumentState::new(owner.clone(), c, Arc::clone(&defaults))
            })))
        }
        AccessorKey::ArgumentSetter {
            constructor,
            position,
        } => {
            let ctor = object.constructors.get(constructor).ok_or_else(unavailable)?;
            let Some(parameter) = ctor.parameters.get(position) else {
                return Err(AccessError::ParameterOutOfRange {
                    owner,
                    position,
                    arity: ctor.parameters.len(),
                });
            };
            let value_check = ValueCheck::resolve(provider, &parameter.ty)?;
            Ok(Accessor::ArgumentSetter(Arc::new(
                move |state: &mut ArgumentState, value: Value| {
                    check_state(&owner, constructor, state)?;
                    value_check.check(&value)?;
                    state.set(position, value)
                },
            )))
        }
        AccessorKey::ParameterizedConstructor(c) => {
            let ctor = object.constructors.get(c).ok_or_else(unavailable)?;
            let slots = property_defaults(provider, object)?;
            // Parameters that match no property are accepted and dropped.
            let bindings: Arc<[Option<usize>]> =
                ctor.parameters.iter().map(|p| p.property).collect();
            Ok(Accessor::ParameterizedConstructor(Arc::new(move |state: ArgumentState| {
                check_state(&owner, c, &state)?;
                let mut values = slots.to_vec();
                let arguments = state.into_arguments();
                for (argument, binding) in arguments.into_iter().zip(bindings.iter()) {
                    if let Some(target) = binding.and_then(|slot| values.get_mut(slot)) {
                        *target = argument;
                    }
                }
                Ok(Value::object(owner.clone(), values))
            })))
        }
        _ => Err(unavailable()),
    }
}

fn property_defaults(
    provider: &ShapeProvider,
    object: &ObjectShape,
) -> Result<Arc<[Value]>, AccessError> {
    object
        .properties
        .iter()
        .map(|p| default_value(provider, &p.ty).map_err(AccessError::from))
        .collect()
}

fn enumerable_accessor(
    provider: &ShapeProvider,
    owner: &TypeIdentity,
    enumerable: &EnumerableShape,
    key: AccessorKey,
) -> Result<Accessor, AccessError> {
    let offered = strategy_keys(enumerable.strategy, AccessorKey::EnumerableAdd);
    if key != AccessorKey::Elements && !offered.contains(&key) {
        return Err(AccessError::unavailable(owner, key));
    }
    let factories = enumerable.factories.clone();
    let built = built_identity(owner, &factories);
    let owner = owner.clone();
    if key == AccessorKey::Elements {
        return Ok(Accessor::Elements(Arc::new(move |value: &Value| {
            Ok(list_of(&owner, &factories, value)?.items())
        })));
    }

    let element = ValueCheck::resolve(provider, &enumerable.element)?;
    Ok(match key {
        AccessorKey::EnumerableAdd => {
            Accessor::EnumerableAdd(Arc::new(move |target: &Value, item: Value| {
                let list = list_of(&owner, &factories, target)?;
                element.check(&item)?;
                list.push(item);
                Ok(())
            }))
        }
        AccessorKey::DefaultConstructor => Accessor::DefaultConstructor(Arc::new(move || {
            Ok(Value::list(built.clone(), Vec::new()))
        })),
        // Sequence or span constructor, whichever the strategy allows.
        _ => {
            trace_factory(&owner, &factories);
            Accessor::Collection(Arc::new(move |contents: Contents| match contents {
                Contents::Elements(items) => {
                    element.check_all(&items)?;
                    Ok(Value::list(built.clone(), items))
                }
                Contents::Entries(_) => Err(AccessError::TypeMismatch {
                    expected: owner.clone(),
                    found: "dictionary entries".to_owned(),
                }),
            }))
        }
    })
}

fn dictionary_accessor(
    provider: &ShapeProvider,
    owner: &TypeIdentity,
    dictionary: &DictionaryShape,
    key: AccessorKey,
) -> Result<Accessor, AccessError> {
    let offered = strategy_keys(dictionary.strategy, AccessorKey::DictionaryAdd);
    if key != AccessorKey::Entries && !offered.contains(&key) {
        return Err(AccessError::unavailable(owner, key));
    }
    let factories = dictionary.factories.clone();
    let built = built_identity(owner, &factories);
    let owner = owner.clone();
    if key == AccessorKey::Entries {
        return Ok(Accessor::Entries(Arc::new(move |value: &Value| {
            Ok(map_of(&owner, &factories, value)?.entries())
        })));
    }

    let key_check = ValueCheck::resolve(provider, &dictionary.key)?;
    let value_check = ValueCheck::resolve(provider, &dictionary.value)?;
    Ok(match key {
        AccessorKey::DictionaryAdd => {
            Accessor::DictionaryAdd(Arc::new(
                move |target: &Value, entry_key: Value, value: Value| {
                    let map = map_of(&owner, &factories, target)?;
                    key_check.check(&entry_key)?;
                    value_check.check(&value)?;
                    map.insert(entry_key, value);
                    Ok(())
                },
            ))
        }
        AccessorKey::DefaultConstructor => Accessor::DefaultConstructor(Arc::new(move || {
            Ok(Value::map(built.clone(), Vec::new()))
        })),
        _ => {
            trace_factory(&owner, &factories);
            Accessor::Collection(Arc::new(move |contents: Contents| match contents {
                Contents::Entries(entries) => {
                    for (entry_key, value) in &entries {
                        key_check.check(entry_key)?;
                        value_check.check(value)?;
                    }
                    Ok(Value::map(built.clone(), entries))
                }
                Contents::Elements(_) => Err(AccessError::TypeMismatch {
                    expected: owner.clone(),
                    found: "enumerable elements".to_owned(),
                }),
            }))
        }
    })
}
