//! Structural references to host types.

use std::fmt;

use crate::TypeIdentity;

/// A reference to a type, as the host would spell it.
///
/// References are structural: two refs that print the same denote the same
/// type. The variants other than `Named` are intrinsic forms the shape engine
/// understands without consulting the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    /// A named type, possibly a constructed generic (`List<i32>`).
    Named { path: String, args: Vec<TypeRef> },
    /// A built-in array with the given rank (`T[]`, `T[,]`).
    Array { element: Box<TypeRef>, rank: u32 },
    /// A contiguous view over elements. Ref-like: cannot be stored.
    Span(Box<TypeRef>),
    /// A lazily iterated sequence of elements.
    Sequence(Box<TypeRef>),
    /// A key/value pair, the element type of dictionaries.
    Pair(Box<TypeRef>, Box<TypeRef>),
    /// An unmanaged pointer.
    Pointer(Box<TypeRef>),
    /// A by-reference-only type.
    ByRef(Box<TypeRef>),
    /// An unbound generic parameter (`T` in an open `List<T>`).
    Param(String),
    /// The absence of a value.
    Void,
}

/// Why a type cannot be used as a shape root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedKind {
    Pointer,
    ByRef,
    RefLike,
    UnboundGeneric,
    ZeroRank,
    Void,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnsupportedKind::Pointer => "pointer types",
            UnsupportedKind::ByRef => "by-reference types",
            UnsupportedKind::RefLike => "ref-like types",
            UnsupportedKind::UnboundGeneric => "types with unbound generic parameters",
            UnsupportedKind::ZeroRank => "arrays of rank zero",
            UnsupportedKind::Void => "void",
        };
        f.write_str(text)
    }
}

impl TypeRef {
    /// A non-generic named type.
    pub fn named(path: impl Into<String>) -> Self {
        TypeRef::Named {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// A constructed generic type.
    pub fn generic(path: impl Into<String>, args: impl IntoIterator<Item = TypeRef>) -> Self {
        TypeRef::Named {
            path: path.into(),
            args: args.into_iter().collect(),
        }
    }

    /// An array type. Rank 0 is clamped to 1.
    pub fn array(element: TypeRef, rank: u32) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: rank.max(1),
        }
    }

    pub fn span_of(element: TypeRef) -> Self {
        TypeRef::Span(Box::new(element))
    }

    pub fn sequence_of(element: TypeRef) -> Self {
        TypeRef::Sequence(Box::new(element))
    }

    pub fn pair(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Pair(Box::new(key), Box::new(value))
    }

    pub fn pointer_to(inner: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(inner))
    }

    pub fn by_ref(inner: TypeRef) -> Self {
        TypeRef::ByRef(Box::new(inner))
    }

    pub fn param(name: impl Into<String>) -> Self {
        TypeRef::Param(name.into())
    }

    /// The canonical identity of this reference.
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::of(self)
    }

    /// Generic arguments of a constructed named type; empty otherwise.
    pub fn generic_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Check whether an unbound generic parameter occurs anywhere inside.
    pub fn contains_generic_params(&self) -> bool {
        match self {
            TypeRef::Param(_) => true,
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::contains_generic_params),
            TypeRef::Array { element, .. }
            | TypeRef::Span(element)
            | TypeRef::Sequence(element)
            | TypeRef::Pointer(element)
            | TypeRef::ByRef(element) => element.contains_generic_params(),
            TypeRef::Pair(key, value) => {
                key.contains_generic_params() || value.contains_generic_params()
            }
            TypeRef::Void => false,
        }
    }

    /// Check whether a rank-0 array occurs anywhere inside.
    ///
    /// Such a ref prints like its rank-1 counterpart, so it would share that
    /// identity.
    pub fn contains_zero_rank(&self) -> bool {
        match self {
            TypeRef::Array { rank: 0, .. } => true,
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::contains_zero_rank),
            TypeRef::Array { element, .. }
            | TypeRef::Span(element)
            | TypeRef::Sequence(element)
            | TypeRef::Pointer(element)
            | TypeRef::ByRef(element) => element.contains_zero_rank(),
            TypeRef::Pair(key, value) => key.contains_zero_rank() || value.contains_zero_rank(),
            TypeRef::Param(_) | TypeRef::Void => false,
        }
    }

    /// Why this type cannot be shaped as a root, if it cannot.
    pub fn unsupported_reason(&self) -> Option<UnsupportedKind> {
        match self {
            TypeRef::Pointer(_) => Some(UnsupportedKind::Pointer),
            TypeRef::ByRef(_) => Some(UnsupportedKind::ByRef),
            TypeRef::Span(_) => Some(UnsupportedKind::RefLike),
            TypeRef::Void => Some(UnsupportedKind::Void),
            _ if self.contains_generic_params() => Some(UnsupportedKind::UnboundGeneric),
            _ if self.contains_zero_rank() => Some(UnsupportedKind::ZeroRank),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { path, args } => {
                f.write_str(path)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                write!(f, "{element}[{commas}]")
            }
            TypeRef::Span(element) => write!(f, "Span<{element}>"),
            TypeRef::Sequence(element) => write!(f, "Sequence<{element}>"),
            TypeRef::Pair(key, value) => write!(f, "Pair<{key}, {value}>"),
            TypeRef::Pointer(inner) => write!(f, "{inner}*"),
            TypeRef::ByRef(inner) => write!(f, "ref {inner}"),
            TypeRef::Param(name) => f.write_str(name),
            TypeRef::Void => f.write_str("void"),
        }
    }
}
