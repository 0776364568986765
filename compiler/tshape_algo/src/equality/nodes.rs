//! Per-category comparers.
//!
//! Comparers refer to the comparers of nested types only through deferred
//! handles, so a recursive type's comparer can be built before the comparers
//! it depends on are bound.

use std::hash::Hasher;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHasher};
use tshape_access::{ElementReader, EntryReader, Getter, Value};
use tshape_ir::TypeIdentity;
use tshape_types::ShapeError;

use super::walk::{EqWalk, HashWalk};
use super::{EqualityError, StringComparison};
use crate::span_eq::{ByteOrdinal, CharOrdinalIgnoreCase, SpanEquality};
use crate::DeferredHandle;

pub(crate) type Node = Arc<dyn ValueEquality>;
pub(crate) type NodeHandle = DeferredHandle<Node>;
/// Comparer handle for every shape of a provider.
pub(crate) type Table = Arc<FxHashMap<TypeIdentity, NodeHandle>>;

const NULL_HASH: u64 = 0x51_7cc1_b727_220a;

pub(crate) trait ValueEquality: Send + Sync {
    fn equals(&self, a: &Value, b: &Value, walk: &mut EqWalk<'_>) -> Result<bool, EqualityError>;

    fn hash(&self, value: &Value, walk: &mut HashWalk<'_>) -> Result<u64, EqualityError>;
}

fn nested_equals(
    node: &NodeHandle,
    a: &Value,
    b: &Value,
    walk: &mut EqWalk<'_>,
) -> Result<bool, EqualityError> {
    let node = node.get()?;
    walk.descend(|walk| node.equals(a, b, walk))
}

fn nested_hash(
    node: &NodeHandle,
    value: &Value,
    walk: &mut HashWalk<'_>,
) -> Result<u64, EqualityError> {
    let node = node.get()?;
    walk.descend(|walk| node.hash(value, walk))
}

fn string_equals(a: &str, b: &str, strings: StringComparison) -> bool {
    match strings {
        StringComparison::Ordinal => ByteOrdinal.equals(a.as_bytes(), b.as_bytes()),
        StringComparison::OrdinalIgnoreCase => {
            let a: Vec<char> = a.chars().collect();
            let b: Vec<char> = b.chars().collect();
            CharOrdinalIgnoreCase.equals(&a, &b)
        }
    }
}

fn string_hash(s: &str, strings: StringComparison) -> u64 {
    match strings {
        StringComparison::Ordinal => ByteOrdinal.hash(s.as_bytes()),
        StringComparison::OrdinalIgnoreCase => {
            let chars: Vec<char> = s.chars().collect();
            CharOrdinalIgnoreCase.hash(&chars)
        }
    }
}

/// Compare two non-reference values. `None` if either is a reference.
fn scalar_equals(a: &Value, b: &Value, strings: StringComparison) -> Option<bool> {
    if a.ref_addr().is_some() || b.ref_addr().is_some() {
        return None;
    }
    Some(match (a, b) {
        (Value::Str(a), Value::Str(b)) => string_equals(a, b, strings),
        // Floats by bit pattern, so equality stays reflexive for NaN.
        _ => a.key_eq(b),
    })
}

fn scalar_hash(value: &Value, strings: StringComparison) -> Option<u64> {
    let mut hasher = FxHasher::default();
    match value {
        Value::Null => return Some(NULL_HASH),
        Value::Bool(b) => hasher.write_u8(u8::from(*b)),
        Value::Int(n) => hasher.write_i64(*n),
        Value::UInt(n) => hasher.write_u64(*n),
        Value::Float(x) => hasher.write_u64(x.to_bits()),
        Value::Char(c) => hasher.write_u32(u32::from(*c)),
        Value::Str(s) => return Some(string_hash(s, strings)),
        Value::Object(_) | Value::List(_) | Value::Map(_) => return None,
    }
    Some(hasher.finish())
}

/// Primitives and enums.
pub(crate) struct ScalarEquality;

impl ValueEquality for ScalarEquality {
    fn equals(&self, a: &Value, b: &Value, walk: &mut EqWalk<'_>) -> Result<bool, EqualityError> {
        Ok(scalar_equals(a, b, walk.config().strings).unwrap_or(false))
    }

    fn hash(&self, value: &Value, walk: &mut HashWalk<'_>) -> Result<u64, EqualityError> {
        Ok(scalar_hash(value, walk.config().strings).unwrap_or(NULL_HASH))
    }
}

/// The `object` primitive: dispatches on the runtime type of each value.
pub(crate) struct DynamicEquality {
    pub(crate) table: Table,
}

impl DynamicEquality {
    fn lookup(&self, id: &TypeIdentity) -> Result<&NodeHandle, EqualityError> {
        self.table
            .get(id)
            .ok_or_else(|| ShapeError::UnknownIdentity(id.clone()).into())
    }
}

impl ValueEquality for DynamicEquality {
    fn equals(&self, a: &Value, b: &Value, walk: &mut EqWalk<'_>) -> Result<bool, EqualityError> {
        if let Some(equal) = scalar_equals(a, b, walk.config().strings) {
            return Ok(equal);
        }
        match (a.type_identity(), b.type_identity()) {
            (Some(ta), Some(tb)) if ta == tb => nested_equals(self.lookup(ta)?, a, b, walk),
            _ => Ok(false),
        }
    }

    fn hash(&self, value: &Value, walk: &mut HashWalk<'_>) -> Result<u64, EqualityError> {
        if let Some(hash) = scalar_hash(value, walk.config().strings) {
            return Ok(hash);
        }
        match value.type_identity() {
            Some(ty) => nested_hash(self.lookup(ty)?, value, walk),
            None => Ok(NULL_HASH),
        }
    }
}

pub(crate) struct NullableEquality {
    pub(crate) inner: NodeHandle,
}

impl ValueEquality for NullableEquality {
    fn equals(&self, a: &Value, b: &Value, walk: &mut EqWalk<'_>) -> Result<bool, EqualityError> {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ok(true),
            (false, false) => nested_equals(&self.inner, a, b, walk),
            _ => Ok(false),
        }
    }

    fn hash(&self, value: &Value, walk: &mut HashWalk<'_>) -> Result<u64, EqualityError> {
        if value.is_null() {
            Ok(NULL_HASH)
        } else {
            nested_hash(&self.inner, value, walk)
        }
    }
}

/// Objects: readable properties in declaration order.
pub(crate) struct ObjectEquality {
    pub(crate) properties: Vec<(Getter, NodeHandle)>,
}

impl ValueEquality for ObjectEquality {
    fn equals(&self, a: &Value, b: &Value, walk: &mut EqWalk<'_>) -> Result<bool, EqualityError> {
        let (Some(x), Some(y)) = (a.ref_addr(), b.ref_addr()) else {
            return Ok(a.is_null() && b.is_null());
        };
        walk.pair(x, y, |walk| {
            for (getter, node) in &self.properties {
                let (pa, pb) = (getter(a)?, getter(b)?);
                if !nested_equals(node, &pa, &pb, walk)? {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }

    fn hash(&self, value: &Value, walk: &mut HashWalk<'_>) -> Result<u64, EqualityError> {
        if value.is_null() {
            return Ok(NULL_HASH);
        }
        let mut hasher = FxHasher::default();
        for (getter, node) in &self.properties {
            hasher.write_u64(nested_hash(node, &getter(value)?, walk)?);
        }
        Ok(hasher.finish())
    }
}

/// Enumerables: element-wise, in order.
pub(crate) struct SequenceEquality {
    pub(crate) elements: ElementReader,
    pub(crate) element: NodeHandle,
}

impl ValueEquality for SequenceEquality {
    fn equals(&self, a: &Value, b: &Value, walk: &mut EqWalk<'_>) -> Result<bool, EqualityError> {
        let (Some(x), Some(y)) = (a.ref_addr(), b.ref_addr()) else {
            return Ok(a.is_null() && b.is_null());
        };
        walk.pair(x, y, |walk| {
            let (ea, eb) = ((self.elements)(a)?, (self.elements)(b)?);
            if ea.len() != eb.len() {
                return Ok(false);
            }
            for (ia, ib) in ea.iter().zip(&eb) {
                if !nested_equals(&self.element, ia, ib, walk)? {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }

    fn hash(&self, value: &Value, walk: &mut HashWalk<'_>) -> Result<u64, EqualityError> {
        if value.is_null() {
            return Ok(NULL_HASH);
        }
        let items = (self.elements)(value)?;
        let mut hasher = FxHasher::default();
        hasher.write_usize(items.len());
        for item in &items {
            hasher.write_u64(nested_hash(&self.element, item, walk)?);
        }
        Ok(hasher.finish())
    }
}

/// Dictionaries: same entry count and, for every key of one side, an equal
/// key on the other side with an equal value. Order is irrelevant.
pub(crate) struct DictionaryEquality {
    pub(crate) entries: EntryReader,
    pub(crate) key: NodeHandle,
    pub(crate) value: NodeHandle,
}

impl ValueEquality for DictionaryEquality {
    fn equals(&self, a: &Value, b: &Value, walk: &mut EqWalk<'_>) -> Result<bool, EqualityError> {
        let (Some(x), Some(y)) = (a.ref_addr(), b.ref_addr()) else {
            return Ok(a.is_null() && b.is_null());
        };
        walk.pair(x, y, |walk| {
            let (ea, eb) = ((self.entries)(a)?, (self.entries)(b)?);
            if ea.len() != eb.len() {
                return Ok(false);
            }
            'entries: for (ka, va) in &ea {
                for (kb, vb) in &eb {
                    if nested_equals(&self.key, ka, kb, walk)? {
                        if nested_equals(&self.value, va, vb, walk)? {
                            continue 'entries;
                        }
                        return Ok(false);
                    }
                }
                return Ok(false);
            }
            Ok(true)
        })
    }

    fn hash(&self, value: &Value, walk: &mut HashWalk<'_>) -> Result<u64, EqualityError> {
        if value.is_null() {
            return Ok(NULL_HASH);
        }
        let entries = (self.entries)(value)?;
        // Summing per-entry hashes makes the result independent of order.
        let mut sum = 0u64;
        for (k, v) in &entries {
            let mut hasher = FxHasher::default();
            hasher.write_u64(nested_hash(&self.key, k, walk)?);
            hasher.write_u64(nested_hash(&self.value, v, walk)?);
            sum = sum.wrapping_add(hasher.finish());
        }
        let mut hasher = FxHasher::default();
        hasher.write_usize(entries.len());
        hasher.write_u64(sum);
        Ok(hasher.finish())
    }
}
