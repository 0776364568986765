//! Dynamically typed runtime values.
//!
//! Accessors read and build values of any shaped type through this model.
//! Scalars are stored inline; objects, lists and maps are shared mutable
//! references tagged with the [`TypeIdentity`] of the type they instantiate.
//!
//! # Cycles
//!
//! Reference values may point at each other, including at themselves.
//! Nothing here recurses through references: `Debug` prints a reference as
//! its type and address, and key equality on references is pointer identity.
//! A cyclic graph of references is never freed; callers that build one own
//! that tradeoff.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tshape_ir::{Primitive, TypeIdentity};
use tshape_types::{ShapeError, ShapeKind, ShapeProvider};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// Absent reference or empty nullable.
    Null,
    Bool(bool),
    /// Signed integers and enum members.
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(Arc<str>),
    Object(ObjectRef),
    List(ListRef),
    Map(MapRef),
}

impl Value {
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Allocate an object with the given property slots.
    pub fn object(ty: TypeIdentity, slots: Vec<Value>) -> Self {
        Value::Object(ObjectRef(Arc::new(Instance {
            ty,
            data: RwLock::new(slots),
        })))
    }

    pub fn list(ty: TypeIdentity, items: Vec<Value>) -> Self {
        Value::List(ListRef(Arc::new(Instance {
            ty,
            data: RwLock::new(items),
        })))
    }

    /// Allocate a map. Later entries replace earlier ones with an equal key.
    pub fn map(ty: TypeIdentity, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = MapRef(Arc::new(Instance {
            ty,
            data: RwLock::new(Vec::new()),
        }));
        for (key, value) in entries {
            map.insert(key, value);
        }
        Value::Map(map)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The type a reference value instantiates. `None` for scalars.
    pub fn type_identity(&self) -> Option<&TypeIdentity> {
        match self {
            Value::Object(o) => Some(o.ty()),
            Value::List(l) => Some(l.ty()),
            Value::Map(m) => Some(m.ty()),
            _ => None,
        }
    }

    /// Short description used in mismatch errors.
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Bool(_) => "a bool".to_owned(),
            Value::Int(_) => "an int".to_owned(),
            Value::UInt(_) => "an unsigned int".to_owned(),
            Value::Float(_) => "a float".to_owned(),
            Value::Char(_) => "a char".to_owned(),
            Value::Str(_) => "a string".to_owned(),
            Value::Object(o) => format!("a `{}` object", o.ty()),
            Value::List(l) => format!("a `{}` list", l.ty()),
            Value::Map(m) => format!("a `{}` map", m.ty()),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Address of the referenced instance. `None` for scalars.
    pub fn ref_addr(&self) -> Option<usize> {
        match self {
            Value::Object(o) => Some(o.addr()),
            Value::List(l) => Some(l.addr()),
            Value::Map(m) => Some(m.addr()),
            _ => None,
        }
    }

    /// Equality used for dictionary keys: scalars by value (floats by bit
    /// pattern), strings by content, references by identity.
    pub fn key_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => match (self.ref_addr(), other.ref_addr()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::UInt(n) => write!(f, "UInt({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Char(c) => write!(f, "Char({c:?})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Object(o) => write!(f, "Object({}@{:#x})", o.ty(), o.addr()),
            Value::List(l) => write!(f, "List({}@{:#x}, len={})", l.ty(), l.addr(), l.len()),
            Value::Map(m) => write!(f, "Map({}@{:#x}, len={})", m.ty(), m.addr(), m.len()),
        }
    }
}

/// Shared storage behind every reference value.
struct Instance<T> {
    ty: TypeIdentity,
    data: RwLock<T>,
}

/// A shared object: one slot per property, in shape order.
#[derive(Clone)]
pub struct ObjectRef(Arc<Instance<Vec<Value>>>);

impl ObjectRef {
    pub fn ty(&self) -> &TypeIdentity {
        &self.0.ty
    }

    pub fn get(&self, slot: usize) -> Option<Value> {
        self.0.data.read().get(slot).cloned()
    }

    /// Overwrite a slot. Returns `false` if the slot does not exist.
    pub fn set(&self, slot: usize, value: Value) -> bool {
        match self.0.data.write().get_mut(slot) {
            Some(target) => {
                *target = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

/// A shared growable sequence.
#[derive(Clone)]
pub struct ListRef(Arc<Instance<Vec<Value>>>);

impl ListRef {
    pub fn ty(&self) -> &TypeIdentity {
        &self.0.ty
    }

    /// Snapshot of the current elements.
    pub fn items(&self) -> Vec<Value> {
        self.0.data.read().clone()
    }

    pub fn push(&self, value: Value) {
        self.0.data.write().push(value);
    }

    pub fn len(&self) -> usize {
        self.0.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &ListRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

/// A shared insertion-ordered map keyed by [`Value::key_eq`].
#[derive(Clone)]
pub struct MapRef(Arc<Instance<Vec<(Value, Value)>>>);

impl MapRef {
    pub fn ty(&self) -> &TypeIdentity {
        &self.0.ty
    }

    /// Snapshot of the current entries, in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.data.read().clone()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .data
            .read()
            .iter()
            .find(|(k, _)| k.key_eq(key))
            .map(|(_, v)| v.clone())
    }

    /// Insert or replace. Returns the replaced value.
    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        let mut entries = self.0.data.write();
        match entries.iter_mut().find(|(k, _)| k.key_eq(&key)) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &MapRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

/// The zero value of a primitive.
pub fn primitive_default(primitive: Primitive) -> Value {
    match primitive {
        Primitive::Bool => Value::Bool(false),
        Primitive::Int32 | Primitive::Int64 => Value::Int(0),
        Primitive::Byte | Primitive::UInt32 | Primitive::UInt64 => Value::UInt(0),
        Primitive::Float32 | Primitive::Float64 => Value::Float(0.0),
        Primitive::Char => Value::Char('\0'),
        Primitive::String | Primitive::Object => Value::Null,
    }
}

/// The value an unset slot of type `id` holds.
///
/// Primitives take their zero value, enums their zero member value, and
/// every other type is `Null`.
pub fn default_value(provider: &ShapeProvider, id: &TypeIdentity) -> Result<Value, ShapeError> {
    Ok(match provider.get(id)?.kind() {
        ShapeKind::Object(object) => object.primitive.map_or(Value::Null, primitive_default),
        ShapeKind::Enum(_) => Value::Int(0),
        ShapeKind::Nullable(_) | ShapeKind::Enumerable(_) | ShapeKind::Dictionary(_) => {
            Value::Null
        }
    })
}
