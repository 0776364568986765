//! Built-in scalar types known to every fact registry.

use crate::TypeRef;

/// A primitive type.
///
/// Primitives classify as leaf objects: they have no properties and no
/// constructors, only a default value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Bool,
    Byte,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Char,
    String,
    /// The top type; also the fallback key/value/element type of untyped
    /// containers.
    Object,
}

impl Primitive {
    pub const ALL: [Primitive; 11] = [
        Primitive::Bool,
        Primitive::Byte,
        Primitive::Int32,
        Primitive::Int64,
        Primitive::UInt32,
        Primitive::UInt64,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::Char,
        Primitive::String,
        Primitive::Object,
    ];

    /// The name primitives are registered under.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Byte => "u8",
            Primitive::Int32 => "i32",
            Primitive::Int64 => "i64",
            Primitive::UInt32 => "u32",
            Primitive::UInt64 => "u64",
            Primitive::Float32 => "f32",
            Primitive::Float64 => "f64",
            Primitive::Char => "char",
            Primitive::String => "string",
            Primitive::Object => "object",
        }
    }

    pub fn type_ref(self) -> TypeRef {
        TypeRef::named(self.name())
    }
}
