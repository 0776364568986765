use thiserror::Error;
use tshape_ir::TypeIdentity;

use crate::ProviderId;

/// Lookup failures against a [`ShapeProvider`](crate::ShapeProvider).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The identity was never reached from the provider's roots.
    #[error("no shape for `{0}` in this provider")]
    UnknownIdentity(TypeIdentity),
    /// A shape produced by one provider was handed to another.
    #[error("shape `{id}` belongs to provider {owner}, not {expected}")]
    ForeignShape {
        id: TypeIdentity,
        owner: ProviderId,
        expected: ProviderId,
    },
}
