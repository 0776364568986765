use thiserror::Error;
use tshape_ir::TypeIdentity;
use tshape_types::ShapeError;

use crate::AccessorKey;

/// Failures of accessor lookup or invocation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The shape has no such operation, e.g. a setter on a read-only
    /// property or a default constructor on a type without one.
    #[error("`{owner}` does not support {operation}")]
    CapabilityUnavailable {
        owner: TypeIdentity,
        operation: AccessorKey,
    },
    #[error("`{owner}` has no member named `{member}`")]
    UnknownMember { owner: TypeIdentity, member: String },
    #[error("expected a `{expected}` value, found {found}")]
    TypeMismatch {
        expected: TypeIdentity,
        found: String,
    },
    #[error("argument position {position} is out of range for a {arity}-parameter constructor of `{owner}`")]
    ParameterOutOfRange {
        owner: TypeIdentity,
        position: usize,
        arity: usize,
    },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl AccessError {
    pub(crate) fn unavailable(owner: &TypeIdentity, operation: AccessorKey) -> Self {
        AccessError::CapabilityUnavailable {
            owner: owner.clone(),
            operation,
        }
    }
}
