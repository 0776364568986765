//! Canonical type identities.

use std::fmt;
use std::sync::Arc;

use crate::TypeRef;

/// Canonical, collision-free key for a type.
///
/// Derived purely from a [`TypeRef`], so it is available before the type's
/// shape exists. Cloning is a reference-count bump. Ordering follows the
/// fully-qualified name, which is what makes provider enumeration stable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    /// Fully-resolved display name, including generic arguments.
    name: Arc<str>,
    /// Identifier-safe rendering of the name (`List<i32>` -> `List_i32`).
    generated_name: Arc<str>,
}

impl TypeIdentity {
    /// Compute the identity of a type reference.
    pub fn of(ty: &TypeRef) -> Self {
        let mut generated = String::new();
        write_generated_name(ty, &mut generated);
        TypeIdentity {
            name: Arc::from(ty.to_string()),
            generated_name: Arc::from(generated),
        }
    }

    /// The fully-qualified name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identifier-safe name, usable as a generated member name.
    #[inline]
    pub fn generated_name(&self) -> &str {
        &self.generated_name
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&TypeRef> for TypeIdentity {
    fn from(ty: &TypeRef) -> Self {
        TypeIdentity::of(ty)
    }
}

fn push_sanitized(path: &str, out: &mut String) {
    for ch in path.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
}

fn write_generated_name(ty: &TypeRef, out: &mut String) {
    match ty {
        TypeRef::Named { path, args } => {
            push_sanitized(path, out);
            for arg in args {
                out.push('_');
                write_generated_name(arg, out);
            }
        }
        TypeRef::Array { element, rank } => {
            write_generated_name(element, out);
            out.push_str("_Array");
            if *rank > 1 {
                out.push_str(&rank.to_string());
            }
        }
        TypeRef::Span(element) => {
            out.push_str("Span_");
            write_generated_name(element, out);
        }
        TypeRef::Sequence(element) => {
            out.push_str("Sequence_");
            write_generated_name(element, out);
        }
        TypeRef::Pair(key, value) => {
            out.push_str("Pair_");
            write_generated_name(key, out);
            out.push('_');
            write_generated_name(value, out);
        }
        TypeRef::Pointer(inner) => {
            write_generated_name(inner, out);
            out.push_str("_Ptr");
        }
        TypeRef::ByRef(inner) => {
            write_generated_name(inner, out);
            out.push_str("_Ref");
        }
        TypeRef::Param(name) => push_sanitized(name, out),
        TypeRef::Void => out.push_str("Void"),
    }
}
