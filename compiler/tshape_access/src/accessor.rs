//! Accessor operations and the provider trait that hands them out.
//!
//! Every operation is a shared closure over [`Value`]s. Which operations a
//! type offers follows from its shape alone; asking for anything else is
//! [`AccessError::CapabilityUnavailable`], never a silent no-op.

use std::fmt;
use std::sync::Arc;

use tshape_ir::TypeIdentity;

use crate::{AccessError, Value};

pub type Getter = Arc<dyn Fn(&Value) -> Result<Value, AccessError> + Send + Sync>;
pub type Setter = Arc<dyn Fn(&Value, Value) -> Result<(), AccessError> + Send + Sync>;
pub type DefaultConstructor = Arc<dyn Fn() -> Result<Value, AccessError> + Send + Sync>;
pub type ArgumentStateFactory = Arc<dyn Fn() -> ArgumentState + Send + Sync>;
pub type ArgumentSetter =
    Arc<dyn Fn(&mut ArgumentState, Value) -> Result<(), AccessError> + Send + Sync>;
pub type ParameterizedConstructor =
    Arc<dyn Fn(ArgumentState) -> Result<Value, AccessError> + Send + Sync>;
pub type EnumerableAdd = Arc<dyn Fn(&Value, Value) -> Result<(), AccessError> + Send + Sync>;
pub type DictionaryAdd =
    Arc<dyn Fn(&Value, Value, Value) -> Result<(), AccessError> + Send + Sync>;
pub type ElementReader = Arc<dyn Fn(&Value) -> Result<Vec<Value>, AccessError> + Send + Sync>;
pub type EntryReader =
    Arc<dyn Fn(&Value) -> Result<Vec<(Value, Value)>, AccessError> + Send + Sync>;
pub type CollectionConstructor =
    Arc<dyn Fn(Contents) -> Result<Value, AccessError> + Send + Sync>;

/// Input to a collection constructor.
#[derive(Clone, Debug)]
pub enum Contents {
    /// Elements of an enumerable.
    Elements(Vec<Value>),
    /// Key/value pairs of a dictionary.
    Entries(Vec<(Value, Value)>),
}

/// Names one operation on one type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKey {
    /// Read the property at this index.
    Getter(usize),
    /// Write the property at this index.
    Setter(usize),
    DefaultConstructor,
    /// Create an argument state for the constructor at this index.
    ArgumentState(usize),
    ArgumentSetter {
        constructor: usize,
        position: usize,
    },
    /// Finish the constructor at this index from an argument state.
    ParameterizedConstructor(usize),
    EnumerableAdd,
    DictionaryAdd,
    Elements,
    Entries,
    SequenceConstructor,
    SpanConstructor,
}

impl fmt::Display for AccessorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorKey::Getter(i) => write!(f, "a getter for property {i}"),
            AccessorKey::Setter(i) => write!(f, "a setter for property {i}"),
            AccessorKey::DefaultConstructor => write!(f, "a default constructor"),
            AccessorKey::ArgumentState(c) => write!(f, "argument state for constructor {c}"),
            AccessorKey::ArgumentSetter {
                constructor,
                position,
            } => write!(
                f,
                "an argument setter for position {position} of constructor {constructor}"
            ),
            AccessorKey::ParameterizedConstructor(c) => write!(f, "parameterized constructor {c}"),
            AccessorKey::EnumerableAdd => write!(f, "adding elements"),
            AccessorKey::DictionaryAdd => write!(f, "adding entries"),
            AccessorKey::Elements => write!(f, "reading elements"),
            AccessorKey::Entries => write!(f, "reading entries"),
            AccessorKey::SequenceConstructor => write!(f, "a sequence constructor"),
            AccessorKey::SpanConstructor => write!(f, "a span constructor"),
        }
    }
}

/// A synthesized operation.
#[derive(Clone)]
pub enum Accessor {
    Getter(Getter),
    Setter(Setter),
    DefaultConstructor(DefaultConstructor),
    ArgumentState(ArgumentStateFactory),
    ArgumentSetter(ArgumentSetter),
    ParameterizedConstructor(ParameterizedConstructor),
    EnumerableAdd(EnumerableAdd),
    DictionaryAdd(DictionaryAdd),
    Elements(ElementReader),
    Entries(EntryReader),
    /// Shared by the sequence and span constructor keys.
    Collection(CollectionConstructor),
}

impl Accessor {
    /// Whether two accessors are the same synthesized instance.
    pub fn ptr_eq(&self, other: &Accessor) -> bool {
        fn same<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
            std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
        }
        match (self, other) {
            (Accessor::Getter(a), Accessor::Getter(b)) => same(a, b),
            (Accessor::Setter(a), Accessor::Setter(b)) => same(a, b),
            (Accessor::DefaultConstructor(a), Accessor::DefaultConstructor(b)) => same(a, b),
            (Accessor::ArgumentState(a), Accessor::ArgumentState(b)) => same(a, b),
            (Accessor::ArgumentSetter(a), Accessor::ArgumentSetter(b)) => same(a, b),
            (Accessor::ParameterizedConstructor(a), Accessor::ParameterizedConstructor(b)) => {
                same(a, b)
            }
            (Accessor::EnumerableAdd(a), Accessor::EnumerableAdd(b)) => same(a, b),
            (Accessor::DictionaryAdd(a), Accessor::DictionaryAdd(b)) => same(a, b),
            (Accessor::Elements(a), Accessor::Elements(b)) => same(a, b),
            (Accessor::Entries(a), Accessor::Entries(b)) => same(a, b),
            (Accessor::Collection(a), Accessor::Collection(b)) => same(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accessor::Getter(_) => "Getter",
            Accessor::Setter(_) => "Setter",
            Accessor::DefaultConstructor(_) => "DefaultConstructor",
            Accessor::ArgumentState(_) => "ArgumentState",
            Accessor::ArgumentSetter(_) => "ArgumentSetter",
            Accessor::ParameterizedConstructor(_) => "ParameterizedConstructor",
            Accessor::EnumerableAdd(_) => "EnumerableAdd",
            Accessor::DictionaryAdd(_) => "DictionaryAdd",
            Accessor::Elements(_) => "Elements",
            Accessor::Entries(_) => "Entries",
            Accessor::Collection(_) => "Collection",
        };
        write!(f, "Accessor::{name}")
    }
}

/// Arguments collected for one parameterized constructor call.
///
/// Positions may be set in any order; any position still missing when the
/// constructor runs takes its parameter type's default value.
#[derive(Clone, Debug)]
pub struct ArgumentState {
    owner: TypeIdentity,
    constructor: usize,
    values: Vec<Option<Value>>,
    /// Per-position defaults used for missing arguments.
    defaults: Arc<[Value]>,
}

impl ArgumentState {
    pub(crate) fn new(owner: TypeIdentity, constructor: usize, defaults: Arc<[Value]>) -> Self {
        ArgumentState {
            owner,
            constructor,
            values: vec![None; defaults.len()],
            defaults,
        }
    }

    pub fn owner(&self) -> &TypeIdentity {
        &self.owner
    }

    pub fn constructor(&self) -> usize {
        self.constructor
    }

    pub fn arity(&self) -> usize {
        self.values.len()
    }

    pub fn is_set(&self, position: usize) -> bool {
        matches!(self.values.get(position), Some(Some(_)))
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position).and_then(Option::as_ref)
    }

    pub fn set_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Positions not yet set, ascending.
    pub fn missing(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    pub(crate) fn set(&mut self, position: usize, value: Value) -> Result<(), AccessError> {
        let arity = self.arity();
        match self.values.get_mut(position) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(AccessError::ParameterOutOfRange {
                owner: self.owner.clone(),
                position,
                arity,
            }),
        }
    }

    /// Every argument, with defaults filled in.
    pub(crate) fn into_arguments(self) -> Vec<Value> {
        self.values
            .into_iter()
            .zip(self.defaults.iter())
            .map(|(value, default)| value.unwrap_or_else(|| default.clone()))
            .collect()
    }
}

macro_rules! typed_accessor {
    ($(#[$doc:meta])* $name:ident($($arg:ident: $ty:ty),*) => $key:expr, $variant:ident, $out:ty) => {
        $(#[$doc])*
        fn $name(&self, owner: &TypeIdentity $(, $arg: $ty)*) -> Result<$out, AccessError> {
            let key = $key;
            match self.accessor(owner, key)? {
                Accessor::$variant(op) => Ok(op),
                _ => Err(AccessError::unavailable(owner, key)),
            }
        }
    };
}

/// Hands out accessor operations for the shapes of one provider.
///
/// Implementations differ only in when they synthesize: observable results,
/// including errors, are the same.
pub trait MemberAccessorProvider: Send + Sync {
    /// The operation `key` on `owner`.
    fn accessor(&self, owner: &TypeIdentity, key: AccessorKey) -> Result<Accessor, AccessError>;

    typed_accessor!(getter(property: usize) => AccessorKey::Getter(property), Getter, Getter);
    typed_accessor!(setter(property: usize) => AccessorKey::Setter(property), Setter, Setter);
    typed_accessor!(
        default_constructor() => AccessorKey::DefaultConstructor,
        DefaultConstructor,
        DefaultConstructor
    );
    typed_accessor!(
        /// Step one of a parameterized construction.
        argument_state(constructor: usize) => AccessorKey::ArgumentState(constructor),
        ArgumentState,
        ArgumentStateFactory
    );
    typed_accessor!(
        /// Step two: set one position.
        argument_setter(constructor: usize, position: usize) => AccessorKey::ArgumentSetter {
            constructor,
            position,
        },
        ArgumentSetter,
        ArgumentSetter
    );
    typed_accessor!(
        /// Step three: build the instance.
        parameterized_constructor(constructor: usize) =>
            AccessorKey::ParameterizedConstructor(constructor),
        ParameterizedConstructor,
        ParameterizedConstructor
    );
    typed_accessor!(enumerable_add() => AccessorKey::EnumerableAdd, EnumerableAdd, EnumerableAdd);
    typed_accessor!(dictionary_add() => AccessorKey::DictionaryAdd, DictionaryAdd, DictionaryAdd);
    typed_accessor!(elements() => AccessorKey::Elements, Elements, ElementReader);
    typed_accessor!(entries() => AccessorKey::Entries, Entries, EntryReader);
    typed_accessor!(
        sequence_constructor() => AccessorKey::SequenceConstructor,
        Collection,
        CollectionConstructor
    );
    typed_accessor!(
        span_constructor() => AccessorKey::SpanConstructor,
        Collection,
        CollectionConstructor
    );
}

#[cfg(test)]
mod tests;
