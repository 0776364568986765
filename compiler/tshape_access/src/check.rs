//! Checks of incoming values against the declared type of a slot.
//!
//! Setters, argument setters and container population resolve a
//! [`ValueCheck`] once, when the accessor is synthesized, and run it on
//! every call.

use tshape_ir::{Primitive, TypeIdentity};
use tshape_types::{ShapeKind, ShapeProvider, TypeShape};

use crate::{AccessError, Value};

/// What a slot of one declared type accepts.
#[derive(Clone, Debug)]
pub(crate) struct ValueCheck {
    expected: TypeIdentity,
    accepts: Accepts,
    nullable: bool,
}

#[derive(Clone, Debug)]
enum Accepts {
    /// The `object` top type.
    Anything,
    Scalar(Primitive),
    /// Enum members are stored as their integral value.
    EnumMember,
    Reference {
        kind: ReferenceKind,
        ty: TypeIdentity,
        /// Identity of values built as the type's implementation.
        built_as: Option<TypeIdentity>,
    },
}

#[derive(Clone, Copy, Debug)]
enum ReferenceKind {
    Object,
    List,
    Map,
}

impl ValueCheck {
    /// Resolve the check for slots declared as `expected`.
    pub(crate) fn resolve(
        provider: &ShapeProvider,
        expected: &TypeIdentity,
    ) -> Result<Self, AccessError> {
        let shape = provider.get(expected)?;
        let check = match shape.kind() {
            ShapeKind::Nullable(nullable) => ValueCheck {
                expected: expected.clone(),
                accepts: accepts(provider.get(&nullable.element)?),
                nullable: true,
            },
            _ => {
                let accepts = accepts(shape);
                ValueCheck {
                    expected: expected.clone(),
                    nullable: accepts.admits_null(),
                    accepts,
                }
            }
        };
        Ok(check)
    }

    pub(crate) fn check(&self, value: &Value) -> Result<(), AccessError> {
        if self.admits(value) {
            Ok(())
        } else {
            Err(AccessError::TypeMismatch {
                expected: self.expected.clone(),
                found: value.describe(),
            })
        }
    }

    /// Check every element of a collection before any is stored.
    pub(crate) fn check_all<'v>(
        &self,
        values: impl IntoIterator<Item = &'v Value>,
    ) -> Result<(), AccessError> {
        values.into_iter().try_for_each(|value| self.check(value))
    }

    fn admits(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        match &self.accepts {
            Accepts::Anything => true,
            Accepts::Scalar(primitive) => scalar_fits(*primitive, value),
            Accepts::EnumMember => matches!(value, Value::Int(_) | Value::UInt(_)),
            Accepts::Reference { kind, ty, built_as } => {
                let found = match (kind, value) {
                    (ReferenceKind::Object, Value::Object(o)) => o.ty(),
                    (ReferenceKind::List, Value::List(l)) => l.ty(),
                    (ReferenceKind::Map, Value::Map(m)) => m.ty(),
                    _ => return false,
                };
                found == ty || built_as.as_ref() == Some(found)
            }
        }
    }
}

fn accepts(shape: &TypeShape) -> Accepts {
    let reference = |kind, built_as: Option<&TypeIdentity>| Accepts::Reference {
        kind,
        ty: shape.id().clone(),
        built_as: built_as.cloned(),
    };
    match shape.kind() {
        ShapeKind::Object(object) => match object.primitive {
            Some(Primitive::Object) => Accepts::Anything,
            Some(primitive) => Accepts::Scalar(primitive),
            None => reference(ReferenceKind::Object, None),
        },
        ShapeKind::Enum(_) => Accepts::EnumMember,
        ShapeKind::Enumerable(e) => {
            reference(ReferenceKind::List, e.factories.implementation.as_ref())
        }
        ShapeKind::Dictionary(d) => {
            reference(ReferenceKind::Map, d.factories.implementation.as_ref())
        }
        // A nullable of a nullable never arises from classification.
        ShapeKind::Nullable(_) => Accepts::Anything,
    }
}

impl Accepts {
    fn admits_null(&self) -> bool {
        match self {
            Accepts::Anything | Accepts::Reference { .. } => true,
            Accepts::Scalar(primitive) => *primitive == Primitive::String,
            Accepts::EnumMember => false,
        }
    }
}

fn scalar_fits(primitive: Primitive, value: &Value) -> bool {
    match (primitive, value) {
        (Primitive::Bool, Value::Bool(_))
        | (Primitive::Char, Value::Char(_))
        | (Primitive::String, Value::Str(_))
        | (Primitive::Float32 | Primitive::Float64, Value::Float(_)) => true,
        (_, Value::Int(n)) => integral_fits(primitive, i128::from(*n)),
        (_, Value::UInt(n)) => integral_fits(primitive, i128::from(*n)),
        _ => false,
    }
}

fn integral_fits(primitive: Primitive, n: i128) -> bool {
    let (min, max) = match primitive {
        Primitive::Byte => (0, i128::from(u8::MAX)),
        Primitive::Int32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
        Primitive::Int64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
        Primitive::UInt32 => (0, i128::from(u32::MAX)),
        Primitive::UInt64 => (0, i128::from(u64::MAX)),
        _ => return false,
    };
    (min..=max).contains(&n)
}
